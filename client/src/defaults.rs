//! Default values and policy constants for the client.

/// The instructions file read at startup, expected next to the binary.
pub const INSTRUCTIONS_FILE: &str = "transfer.info";

/// The identity file created after the first successful registration.
pub const IDENTITY_FILE: &str = "me.info";

/// Total number of upload attempts before the transfer is abandoned.
pub const MAX_UPLOAD_ATTEMPTS: u32 = 4;

/// Upper bound accepted for the variable-length key exchange payload. An
/// RSA-sealed session key is a few hundred bytes; anything near this limit
/// means the peer is not speaking the protocol.
pub const MAX_KEY_EXCHANGE_PAYLOAD: usize = 4096;
