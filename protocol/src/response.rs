//! Server-to-client messages.
//!
//! Responses start with a 7-byte header: server version (1), result code
//! (u16 LE) and payload length (u32 LE). Registration, file-received and
//! confirm responses have statically known payload sizes; the AES key
//! response is sized by its header.

use crate::{
    error::{WireError, WireResult},
    fields,
    types::{ClientId, CLIENT_ID_SIZE, FILE_NAME_SIZE},
};

/// Size of the response header in bytes.
pub const RESPONSE_HEADER_SIZE: usize = 1 + 2 + 4;

/// Payload size of a successful registration response.
pub const REGISTRATION_OK_PAYLOAD_SIZE: u32 = CLIENT_ID_SIZE as u32;

/// Payload size of a file-received response.
pub const FILE_RECEIVED_PAYLOAD_SIZE: u32 = (CLIENT_ID_SIZE + 4 + FILE_NAME_SIZE + 4) as u32;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u16)]
pub enum ResponseCode {
    RegistrationOk = 2100,
    RegistrationFail = 2101,
    AesKey = 2102,
    FileReceived = 2103,
    Confirm = 2104,
}

impl TryFrom<u16> for ResponseCode {
    type Error = WireError;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            2100 => Ok(Self::RegistrationOk),
            2101 => Ok(Self::RegistrationFail),
            2102 => Ok(Self::AesKey),
            2103 => Ok(Self::FileReceived),
            2104 => Ok(Self::Confirm),
            _ => Err(WireError::UnexpectedCode { actual: value }),
        }
    }
}

impl ResponseCode {
    /// Payload size fixed by the protocol, or `None` when the header decides.
    pub fn fixed_payload_len(self) -> Option<u32> {
        match self {
            Self::RegistrationOk => Some(REGISTRATION_OK_PAYLOAD_SIZE),
            Self::FileReceived => Some(FILE_RECEIVED_PAYLOAD_SIZE),
            Self::RegistrationFail | Self::Confirm => Some(0),
            Self::AesKey => None,
        }
    }
}

/// Frame prefix of every server-to-client message.
#[derive(Debug, Clone, Copy)]
pub struct ResponseHeader {
    pub version: u8,
    pub code: ResponseCode,
    pub payload_len: u32,
}

impl ResponseHeader {
    pub fn new(version: u8, code: ResponseCode, payload_len: u32) -> Self {
        Self {
            version,
            code,
            payload_len,
        }
    }

    /// Parses the 7-byte prefix; integers are canonical little-endian.
    pub fn from_bytes(raw: &[u8]) -> WireResult<Self> {
        if raw.len() < RESPONSE_HEADER_SIZE {
            return Err(WireError::Truncated {
                needed: RESPONSE_HEADER_SIZE,
                len: raw.len(),
            });
        }
        let code = ResponseCode::try_from(u16::from_le_bytes([raw[1], raw[2]]))?;
        Ok(Self {
            version: raw[0],
            code,
            payload_len: u32::from_le_bytes([raw[3], raw[4], raw[5], raw[6]]),
        })
    }

    pub fn to_bytes(&self) -> [u8; RESPONSE_HEADER_SIZE] {
        let mut buf = [0u8; RESPONSE_HEADER_SIZE];
        buf[0] = self.version;
        buf[1..3].copy_from_slice(&(self.code as u16).to_le_bytes());
        buf[3..7].copy_from_slice(&self.payload_len.to_le_bytes());
        buf
    }

    /// Validates the code expected at the current protocol step and, for
    /// fixed-shape responses, the announced payload length.
    pub fn expect(&self, code: ResponseCode) -> WireResult<()> {
        if self.code != code {
            return Err(WireError::UnexpectedCode {
                actual: self.code as u16,
            });
        }
        if let Some(expected) = code.fixed_payload_len() {
            if self.payload_len != expected {
                return Err(WireError::PayloadLength {
                    code: code as u16,
                    expected,
                    actual: self.payload_len,
                });
            }
        }
        Ok(())
    }
}

/// Payload of a successful registration: the server-issued client id.
pub fn registration_ok_id(payload: &[u8]) -> WireResult<ClientId> {
    payload.try_into().map_err(|_| WireError::Truncated {
        needed: CLIENT_ID_SIZE,
        len: payload.len(),
    })
}

/// Payload of the AES key response: echoed client id, then the RSA-sealed
/// session key filling the rest of the payload.
#[derive(Debug, Clone)]
pub struct AesKey {
    pub client_id: ClientId,
    pub encrypted_key: Vec<u8>,
}

impl AesKey {
    pub fn from_payload(payload: &[u8]) -> WireResult<Self> {
        if payload.len() <= CLIENT_ID_SIZE {
            return Err(WireError::Truncated {
                needed: CLIENT_ID_SIZE + 1,
                len: payload.len(),
            });
        }
        let mut client_id = [0u8; CLIENT_ID_SIZE];
        client_id.copy_from_slice(&payload[..CLIENT_ID_SIZE]);
        Ok(Self {
            client_id,
            encrypted_key: payload[CLIENT_ID_SIZE..].to_vec(),
        })
    }
}

/// Payload of a file-received response: what the server stored, and the
/// checksum it computed over the decrypted content.
#[derive(Debug, Clone)]
pub struct FileReceived {
    pub client_id: ClientId,
    pub content_len: u32,
    pub filename: String,
    pub checksum: u32,
}

impl FileReceived {
    pub fn from_payload(payload: &[u8]) -> WireResult<Self> {
        if payload.len() != FILE_RECEIVED_PAYLOAD_SIZE as usize {
            return Err(WireError::PayloadLength {
                code: ResponseCode::FileReceived as u16,
                expected: FILE_RECEIVED_PAYLOAD_SIZE,
                actual: payload.len() as u32,
            });
        }
        let mut client_id = [0u8; CLIENT_ID_SIZE];
        client_id.copy_from_slice(&payload[..CLIENT_ID_SIZE]);
        let content_len = u32::from_le_bytes([payload[16], payload[17], payload[18], payload[19]]);
        let filename = fields::read_padded_text("file name", &payload[20..20 + FILE_NAME_SIZE])?;
        let crc_at = 20 + FILE_NAME_SIZE;
        let checksum = u32::from_le_bytes([
            payload[crc_at],
            payload[crc_at + 1],
            payload[crc_at + 2],
            payload[crc_at + 3],
        ]);
        Ok(Self {
            client_id,
            content_len,
            filename,
            checksum,
        })
    }
}
