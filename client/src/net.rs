//! TCP transport: one connection, strict exact-length reads.

use std::net::SocketAddrV4;

use tokio::{
    io::{AsyncReadExt, AsyncWriteExt},
    net::TcpStream,
};

use crate::error::{ClientError, ClientResult};

/// Exclusive handle to the single server connection of a run.
pub struct Transport {
    stream: TcpStream,
}

impl Transport {
    pub async fn connect(addr: SocketAddrV4) -> ClientResult<Self> {
        let stream = TcpStream::connect(addr)
            .await
            .map_err(ClientError::Transport)?;
        stream.set_nodelay(true).map_err(ClientError::Transport)?;
        Ok(Self { stream })
    }

    pub async fn send(&mut self, bytes: &[u8]) -> ClientResult<()> {
        self.stream
            .write_all(bytes)
            .await
            .map_err(ClientError::Transport)
    }

    /// Reads exactly `len` bytes, returned as an owned buffer. A peer that
    /// closes or stalls mid-read surfaces as a transport failure.
    pub async fn recv_exact(&mut self, len: usize) -> ClientResult<Vec<u8>> {
        let mut buf = vec![0u8; len];
        self.stream
            .read_exact(&mut buf)
            .await
            .map_err(ClientError::Transport)?;
        Ok(buf)
    }

    /// Closes the connection. Errors are discarded; the session is over
    /// either way.
    pub async fn shutdown(&mut self) {
        let _ = self.stream.shutdown().await;
    }
}
