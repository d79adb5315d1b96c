//! Error taxonomy for one client run.

use protocol::error::WireError;
use thiserror::Error;

/// Failure kinds surfaced by the session engine. Apart from the checksum
/// retry loop, none of these is recoverable within a run: each unwinds to
/// the run controller, which closes the transport and reports once.
#[derive(Error, Debug)]
pub enum ClientError {
    /// Socket connect/send/receive failure.
    #[error("transport failure: {0}")]
    Transport(#[source] std::io::Error),

    /// Unexpected result code, payload length mismatch or malformed field.
    #[error("protocol violation: {0}")]
    Protocol(String),

    /// The server refused to register the configured username.
    #[error("server rejected the registration request")]
    Registration,

    /// RSA/AES failure, including a decrypted session key of the wrong size.
    #[error("crypto failure: {0}")]
    Crypto(String),

    /// Bad instructions or identity data, or an unusable input file.
    #[error("validation failure: {0}")]
    Validation(String),

    /// Checksums still disagreed after the final upload attempt.
    #[error(
        "checksum mismatch after {attempts} attempts (local {local:#010x}, server {remote:#010x})"
    )]
    ChecksumMismatch {
        attempts: u32,
        local: u32,
        remote: u32,
    },
}

impl From<WireError> for ClientError {
    fn from(err: WireError) -> Self {
        ClientError::Protocol(err.to_string())
    }
}

pub type ClientResult<T> = Result<T, ClientError>;

/// A fatal error tagged with the protocol step it interrupted; its display
/// form is the one-line diagnostic the operator sees.
#[derive(Error, Debug)]
#[error("{step} failed: {source}")]
pub struct RunFailure {
    pub step: &'static str,
    #[source]
    pub source: ClientError,
}

impl RunFailure {
    /// Adapter for `map_err`: tags the error with the interrupted step.
    pub fn at(step: &'static str) -> impl FnOnce(ClientError) -> RunFailure {
        move |source| RunFailure { step, source }
    }
}
