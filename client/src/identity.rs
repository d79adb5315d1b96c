//! The durable client identity: username, server-issued id, RSA private key.
//!
//! Persisted as a small line-oriented file: the username, the id in hex,
//! then the private key in base64 wrapped over as many lines as needed.
//! The file is only ever written after a fully successful registration.

use std::{fs, path::Path};

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use protocol::types::ClientId;

use crate::{
    config,
    crypto::RsaIdentityKey,
    error::{ClientError, ClientResult},
};

const KEY_WRAP_WIDTH: usize = 64;

#[derive(Debug)]
pub struct Identity {
    pub username: String,
    pub client_id: ClientId,
    pub key: RsaIdentityKey,
}

impl Identity {
    /// Parses a previously persisted identity file.
    pub fn load(path: &Path) -> ClientResult<Self> {
        let text = fs::read_to_string(path).map_err(|err| {
            ClientError::Validation(format!(
                "cannot read identity file {}: {err}",
                path.display()
            ))
        })?;
        let mut lines = text.lines().map(str::trim);

        let username = lines
            .next()
            .ok_or_else(|| corrupt("username line missing"))?
            .to_owned();
        config::validate_username(&username)?;

        let id_line = lines
            .next()
            .ok_or_else(|| corrupt("client id line missing"))?;
        let id_bytes =
            hex::decode(id_line).map_err(|_| corrupt("client id line is not valid hex"))?;
        let client_id: ClientId = id_bytes
            .try_into()
            .map_err(|_| corrupt("client id must decode to exactly 16 bytes"))?;

        // key material may be wrapped over any number of lines; decoded
        // fragments are concatenated in file order
        let mut der = Vec::new();
        for line in lines.filter(|line| !line.is_empty()) {
            let fragment = BASE64
                .decode(line)
                .map_err(|_| corrupt("private key line is not valid base64"))?;
            der.extend_from_slice(&fragment);
        }
        if der.is_empty() {
            return Err(corrupt("private key material missing"));
        }
        let key = RsaIdentityKey::from_pkcs1_der(&der)?;

        Ok(Self {
            username,
            client_id,
            key,
        })
    }

    /// Writes the identity file.
    pub fn persist(&self, path: &Path) -> ClientResult<()> {
        let mut out = String::new();
        out.push_str(&self.username);
        out.push('\n');
        out.push_str(&hex::encode(self.client_id));
        out.push('\n');

        let encoded = BASE64.encode(self.key.to_pkcs1_der()?);
        let mut start = 0;
        while start < encoded.len() {
            let end = (start + KEY_WRAP_WIDTH).min(encoded.len());
            out.push_str(&encoded[start..end]);
            out.push('\n');
            start = end;
        }

        fs::write(path, out).map_err(|err| {
            ClientError::Validation(format!(
                "cannot write identity file {}: {err}",
                path.display()
            ))
        })
    }
}

fn corrupt(what: &str) -> ClientError {
    ClientError::Validation(format!("identity file: {what}"))
}
