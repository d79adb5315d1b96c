//! Protocol-wide types and field sizes.

/// Server-issued durable client identifier. All-zero before registration.
pub type ClientId = [u8; CLIENT_ID_SIZE];

/// Symmetric key negotiated during the key exchange, never persisted.
pub type SessionKey = [u8; SESSION_KEY_SIZE];

/// Version byte carried in every request header.
pub const PROTOCOL_VERSION: u8 = 3;

pub const CLIENT_ID_SIZE: usize = 16;
pub const SESSION_KEY_SIZE: usize = 16;

/// Width of the username field, including the terminating NUL.
pub const USERNAME_SIZE: usize = 255;

/// Width of the file name field, including the terminating NUL.
pub const FILE_NAME_SIZE: usize = 255;

/// Width of the public key field; the key blob must fill it exactly.
pub const PUBLIC_KEY_SIZE: usize = 160;
