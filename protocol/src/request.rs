//! Client-to-server messages.
//!
//! Every request starts with a 23-byte header: client id (16), version (1),
//! operation code (u16 LE) and payload length (u32 LE). Payload shapes are
//! fixed per operation except for the file upload, whose ciphertext tail is
//! variable.

use crate::{
    error::{WireError, WireResult},
    fields,
    types::{
        ClientId, CLIENT_ID_SIZE, FILE_NAME_SIZE, PROTOCOL_VERSION, PUBLIC_KEY_SIZE, USERNAME_SIZE,
    },
};

/// Size of the request header in bytes.
pub const REQUEST_HEADER_SIZE: usize = CLIENT_ID_SIZE + 1 + 2 + 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u16)]
pub enum RequestCode {
    Registration = 1100,
    PublicKey = 1101,
    File = 1103,
    CrcOk = 1104,
    CrcRetry = 1105,
    CrcAbort = 1106,
}

impl TryFrom<u16> for RequestCode {
    type Error = WireError;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            1100 => Ok(Self::Registration),
            1101 => Ok(Self::PublicKey),
            1103 => Ok(Self::File),
            1104 => Ok(Self::CrcOk),
            1105 => Ok(Self::CrcRetry),
            1106 => Ok(Self::CrcAbort),
            _ => Err(WireError::UnknownRequestCode { actual: value }),
        }
    }
}

/// Frame prefix of every client-to-server message.
#[derive(Debug, Clone, Copy)]
pub struct RequestHeader {
    pub client_id: ClientId,
    pub version: u8,
    pub code: RequestCode,
    pub payload_len: u32,
}

impl RequestHeader {
    pub fn new(client_id: ClientId, code: RequestCode, payload_len: u32) -> Self {
        Self {
            client_id,
            version: PROTOCOL_VERSION,
            code,
            payload_len,
        }
    }

    /// Serializes the header; integers go out in canonical little-endian.
    pub fn to_bytes(&self) -> [u8; REQUEST_HEADER_SIZE] {
        let mut buf = [0u8; REQUEST_HEADER_SIZE];
        buf[..CLIENT_ID_SIZE].copy_from_slice(&self.client_id);
        buf[16] = self.version;
        buf[17..19].copy_from_slice(&(self.code as u16).to_le_bytes());
        buf[19..23].copy_from_slice(&self.payload_len.to_le_bytes());
        buf
    }

    /// Parses the 23-byte prefix of an incoming request.
    pub fn from_bytes(raw: &[u8]) -> WireResult<Self> {
        if raw.len() < REQUEST_HEADER_SIZE {
            return Err(WireError::Truncated {
                needed: REQUEST_HEADER_SIZE,
                len: raw.len(),
            });
        }
        let mut client_id = [0u8; CLIENT_ID_SIZE];
        client_id.copy_from_slice(&raw[..CLIENT_ID_SIZE]);
        let code = RequestCode::try_from(u16::from_le_bytes([raw[17], raw[18]]))?;
        Ok(Self {
            client_id,
            version: raw[16],
            code,
            payload_len: u32::from_le_bytes([raw[19], raw[20], raw[21], raw[22]]),
        })
    }
}

/// A fully framed request: header plus payload bytes.
#[derive(Debug, Clone)]
pub struct Request {
    pub header: RequestHeader,
    pub payload: Vec<u8>,
}

impl Request {
    fn new(client_id: ClientId, code: RequestCode, payload: Vec<u8>) -> WireResult<Self> {
        let payload_len = u32::try_from(payload.len()).map_err(|_| WireError::Oversize {
            field: "payload",
            len: payload.len(),
        })?;
        Ok(Self {
            header: RequestHeader::new(client_id, code, payload_len),
            payload,
        })
    }

    /// Registration carries the username only. The header's client id stays
    /// all-zero; the server ignores it for this operation.
    pub fn registration(username: &str) -> WireResult<Self> {
        let mut payload = Vec::with_capacity(USERNAME_SIZE);
        fields::put_padded(&mut payload, "username", username.as_bytes(), USERNAME_SIZE)?;
        Self::new([0u8; CLIENT_ID_SIZE], RequestCode::Registration, payload)
    }

    pub fn public_key(client_id: ClientId, username: &str, key_blob: &[u8]) -> WireResult<Self> {
        let mut payload = Vec::with_capacity(USERNAME_SIZE + PUBLIC_KEY_SIZE);
        fields::put_padded(&mut payload, "username", username.as_bytes(), USERNAME_SIZE)?;
        fields::put_exact(&mut payload, "public key", key_blob, PUBLIC_KEY_SIZE)?;
        Self::new(client_id, RequestCode::PublicKey, payload)
    }

    /// File upload: client id, ciphertext length, padded file name, then the
    /// ciphertext itself. The caller sends the header and the payload as two
    /// separate writes so the server can pre-size its receive buffer.
    pub fn file_upload(client_id: ClientId, filename: &str, ciphertext: &[u8]) -> WireResult<Self> {
        let ciphertext_len = u32::try_from(ciphertext.len()).map_err(|_| WireError::Oversize {
            field: "ciphertext",
            len: ciphertext.len(),
        })?;

        let mut payload =
            Vec::with_capacity(CLIENT_ID_SIZE + 4 + FILE_NAME_SIZE + ciphertext.len());
        payload.extend_from_slice(&client_id);
        payload.extend_from_slice(&ciphertext_len.to_le_bytes());
        fields::put_padded(&mut payload, "file name", filename.as_bytes(), FILE_NAME_SIZE)?;
        payload.extend_from_slice(ciphertext);
        Self::new(client_id, RequestCode::File, payload)
    }

    pub fn crc_ok(client_id: ClientId, filename: &str) -> WireResult<Self> {
        Self::checksum_report(client_id, filename, RequestCode::CrcOk)
    }

    pub fn crc_retry(client_id: ClientId, filename: &str) -> WireResult<Self> {
        Self::checksum_report(client_id, filename, RequestCode::CrcRetry)
    }

    pub fn crc_abort(client_id: ClientId, filename: &str) -> WireResult<Self> {
        Self::checksum_report(client_id, filename, RequestCode::CrcAbort)
    }

    // the three checksum verdict requests share one payload shape
    fn checksum_report(
        client_id: ClientId,
        filename: &str,
        code: RequestCode,
    ) -> WireResult<Self> {
        let mut payload = Vec::with_capacity(CLIENT_ID_SIZE + FILE_NAME_SIZE);
        payload.extend_from_slice(&client_id);
        fields::put_padded(&mut payload, "file name", filename.as_bytes(), FILE_NAME_SIZE)?;
        Self::new(client_id, code, payload)
    }

    /// Serializes header and payload as one contiguous frame.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(REQUEST_HEADER_SIZE + self.payload.len());
        buf.extend_from_slice(&self.header.to_bytes());
        buf.extend_from_slice(&self.payload);
        buf
    }
}
