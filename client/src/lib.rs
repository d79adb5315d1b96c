#![deny(unused_must_use, deprecated)]
#![warn(clippy::pedantic)]
#![allow(clippy::missing_errors_doc, clippy::module_name_repetitions)]

//! Batch-mode encrypted file transfer client.
//!
//! One run drives a single sequential session: load or register a durable
//! identity, exchange an RSA-sealed AES session key, upload one file
//! encrypted under that key, and reconcile checksums with the server until
//! they agree or the retry ceiling is hit.

pub mod config;
pub mod crypto;
pub mod defaults;
pub mod error;
pub mod identity;
pub mod net;
pub mod session;
