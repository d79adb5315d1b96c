//! Encode/decode failures.

use thiserror::Error;

/// Everything that can go wrong while building or parsing a frame.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WireError {
    #[error("{field} is {len} bytes, must be shorter than {max}")]
    FieldTooLong {
        field: &'static str,
        len: usize,
        max: usize,
    },

    #[error("{field} must be exactly {expected} bytes, got {len}")]
    FieldLength {
        field: &'static str,
        expected: usize,
        len: usize,
    },

    #[error("{field} of {len} bytes exceeds the wire's 32-bit length field")]
    Oversize { field: &'static str, len: usize },

    #[error("{field} is not valid UTF-8")]
    InvalidText { field: &'static str },

    #[error("unexpected response code {actual}")]
    UnexpectedCode { actual: u16 },

    #[error("unknown request code {actual}")]
    UnknownRequestCode { actual: u16 },

    #[error("response {code} announces {actual} payload bytes, expected {expected}")]
    PayloadLength {
        code: u16,
        expected: u32,
        actual: u32,
    },

    #[error("buffer truncated: needed {needed} bytes, got {len}")]
    Truncated { needed: usize, len: usize },
}

pub type WireResult<T> = Result<T, WireError>;
