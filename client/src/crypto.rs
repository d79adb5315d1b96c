//! Crypto provider: the RSA identity key pair and the AES content cipher.
//!
//! The content cipher is AES-128-CBC with an all-zero IV. A fixed IV is not
//! cryptographically sound, but it is part of the wire contract with the
//! server and must not be randomized here.

use aes::cipher::{block_padding::Pkcs7, BlockDecryptMut, BlockEncryptMut, KeyIvInit};
use protocol::types::SessionKey;
use rand::rngs::OsRng;
use rsa::{
    pkcs1::{DecodeRsaPrivateKey, EncodeRsaPrivateKey, EncodeRsaPublicKey},
    Oaep, RsaPrivateKey, RsaPublicKey,
};
use sha1::Sha1;
use spki::{
    der::{asn1::BitStringRef, oid::ObjectIdentifier, Encode},
    AlgorithmIdentifier, SubjectPublicKeyInfoRef,
};

use crate::error::{ClientError, ClientResult};

type Aes128CbcEnc = cbc::Encryptor<aes::Aes128>;
type Aes128CbcDec = cbc::Decryptor<aes::Aes128>;

/// RSA modulus size used by the protocol.
const RSA_BITS: usize = 1024;

/// rsaEncryption, the algorithm identifier of the public key blob.
const RSA_ENCRYPTION_OID: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.2.840.113549.1.1.1");

/// The client's long-lived RSA key pair.
#[derive(Debug)]
pub struct RsaIdentityKey {
    private: RsaPrivateKey,
}

impl RsaIdentityKey {
    /// Generates a fresh key pair.
    pub fn generate() -> ClientResult<Self> {
        let private = RsaPrivateKey::new(&mut OsRng, RSA_BITS)
            .map_err(|err| ClientError::Crypto(format!("RSA key generation failed: {err}")))?;
        Ok(Self { private })
    }

    /// Parses persisted PKCS#1 DER key material.
    pub fn from_pkcs1_der(der: &[u8]) -> ClientResult<Self> {
        let private = RsaPrivateKey::from_pkcs1_der(der).map_err(|err| {
            ClientError::Validation(format!("private key material is unparseable: {err}"))
        })?;
        Ok(Self { private })
    }

    /// Serializes the private key as PKCS#1 DER for persistence.
    pub fn to_pkcs1_der(&self) -> ClientResult<Vec<u8>> {
        Ok(self
            .private
            .to_pkcs1_der()
            .map_err(|err| ClientError::Crypto(format!("private key serialization failed: {err}")))?
            .as_bytes()
            .to_vec())
    }

    /// Exports the public key as SubjectPublicKeyInfo DER.
    ///
    /// The AlgorithmIdentifier deliberately carries no NULL parameter: the
    /// server expects the 160-byte form of a 1024-bit key, not the 162-byte
    /// form the usual pkcs8 encoding produces.
    pub fn public_key_blob(&self) -> ClientResult<Vec<u8>> {
        let pkcs1 = RsaPublicKey::from(&self.private)
            .to_pkcs1_der()
            .map_err(|err| ClientError::Crypto(format!("public key encoding failed: {err}")))?;
        let info = SubjectPublicKeyInfoRef {
            algorithm: AlgorithmIdentifier {
                oid: RSA_ENCRYPTION_OID,
                parameters: None,
            },
            subject_public_key: BitStringRef::from_bytes(pkcs1.as_bytes())
                .map_err(|err| ClientError::Crypto(format!("public key encoding failed: {err}")))?,
        };
        info.to_der()
            .map_err(|err| ClientError::Crypto(format!("public key encoding failed: {err}")))
    }

    /// RSA-OAEP decryption with the padding digest the server pads with.
    pub fn decrypt(&self, ciphertext: &[u8]) -> ClientResult<Vec<u8>> {
        self.private
            .decrypt(Oaep::new::<Sha1>(), ciphertext)
            .map_err(|err| ClientError::Crypto(format!("RSA decryption failed: {err}")))
    }
}

/// Seals file content under the session key.
pub fn aes_encrypt(key: &SessionKey, plaintext: &[u8]) -> Vec<u8> {
    let iv = [0u8; 16];
    Aes128CbcEnc::new(key.into(), (&iv).into()).encrypt_padded_vec_mut::<Pkcs7>(plaintext)
}

/// Opens content sealed under the session key.
pub fn aes_decrypt(key: &SessionKey, ciphertext: &[u8]) -> ClientResult<Vec<u8>> {
    let iv = [0u8; 16];
    Aes128CbcDec::new(key.into(), (&iv).into())
        .decrypt_padded_vec_mut::<Pkcs7>(ciphertext)
        .map_err(|err| ClientError::Crypto(format!("AES decryption failed: {err}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use protocol::types::PUBLIC_KEY_SIZE;

    #[test]
    fn aes_roundtrip_under_fixed_iv() {
        let key: SessionKey = [0x42; 16];
        let content = b"files are ferried in sixteen-byte blocks".to_vec();

        let sealed = aes_encrypt(&key, &content);
        assert_ne!(sealed, content);
        // CBC output is block-aligned and strictly longer than the input
        assert_eq!(sealed.len() % 16, 0);
        assert!(sealed.len() > content.len());

        assert_eq!(aes_decrypt(&key, &sealed).unwrap(), content);
    }

    #[test]
    fn aes_rejects_garbage_ciphertext() {
        let key: SessionKey = [0x42; 16];
        // not block-aligned
        assert!(aes_decrypt(&key, &[0u8; 17]).is_err());
    }

    #[test]
    fn public_key_blob_fills_the_wire_field() {
        let key = RsaIdentityKey::generate().unwrap();
        let blob = key.public_key_blob().unwrap();
        assert_eq!(blob.len(), PUBLIC_KEY_SIZE);
    }

    #[test]
    fn private_key_der_roundtrip() {
        let key = RsaIdentityKey::generate().unwrap();
        let der = key.to_pkcs1_der().unwrap();
        let restored = RsaIdentityKey::from_pkcs1_der(&der).unwrap();
        assert_eq!(restored.to_pkcs1_der().unwrap(), der);
    }

    #[test]
    fn oaep_roundtrip() {
        let key = RsaIdentityKey::generate().unwrap();
        let public = RsaPublicKey::from(&key.private);

        let sealed = public
            .encrypt(&mut OsRng, Oaep::new::<Sha1>(), &[7u8; 16])
            .unwrap();
        assert_eq!(key.decrypt(&sealed).unwrap(), [7u8; 16]);
    }
}
