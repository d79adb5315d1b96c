//! Wire-level definitions for the transfer protocol.
//!
//! Everything the client and server must agree on lives here: operation
//! codes, header layouts, fixed field widths, payload shapes and the file
//! checksum algorithm. The crate is pure encode/decode; it performs no I/O.
//!
//! Every multi-byte integer on the wire is little-endian. Conversion happens
//! per field at encode/decode time, so the produced bytes are identical on
//! every host architecture.

pub mod checksum;
pub mod error;
pub mod fields;
pub mod request;
pub mod response;
pub mod types;
