//! The session protocol engine.
//!
//! Drives the request/response exchanges of one transfer run as a strict
//! forward state machine: connect, load-or-register the identity, exchange
//! the session key, upload, reconcile checksums. The only backward motion is
//! the bounded upload retry loop; everything else fails the run. The engine
//! owns the transport exclusively and closes it on every exit path.

pub mod reconcile;

use std::{fmt, path::PathBuf};

use protocol::{
    checksum,
    request::Request,
    response::{self, ResponseCode, ResponseHeader, RESPONSE_HEADER_SIZE},
    types::{SessionKey, PUBLIC_KEY_SIZE, SESSION_KEY_SIZE},
};
use tracing::{debug, info};

use crate::{
    config::Instructions,
    crypto::{self, RsaIdentityKey},
    defaults,
    error::{ClientError, ClientResult, RunFailure},
    identity::Identity,
    net::Transport,
    session::reconcile::Verdict,
};

/// Where the engine currently stands. Forward-only, except that the upload
/// retry loop moves `Uploaded` back to `Keyed` for another attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Init,
    Connected,
    Identified,
    Keyed,
    Uploaded,
    Reconciled,
    Closed,
    Failed,
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Init => "init",
            Self::Connected => "connected",
            Self::Identified => "identified",
            Self::Keyed => "keyed",
            Self::Uploaded => "uploaded",
            Self::Reconciled => "reconciled",
            Self::Closed => "closed",
            Self::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// One sequential transfer session. Identity and session key are threaded
/// through the transition methods; nothing protocol-visible is global.
pub struct Session {
    transport: Transport,
    instructions: Instructions,
    identity_path: PathBuf,
    state: SessionState,
}

impl Session {
    /// Opens the connection, leaving the engine in `Connected`.
    pub async fn connect(instructions: Instructions, identity_path: PathBuf) -> ClientResult<Self> {
        let transport = Transport::connect(instructions.server).await?;
        info!("connected to {}", instructions.server);
        Ok(Self {
            transport,
            instructions,
            identity_path,
            state: SessionState::Connected,
        })
    }

    /// Runs the remaining exchanges to completion. The transport is closed
    /// exactly once on every exit path before the outcome surfaces.
    pub async fn run(mut self) -> Result<(), RunFailure> {
        let result = self.drive().await;
        self.transport.shutdown().await;
        self.state = if result.is_ok() {
            SessionState::Closed
        } else {
            SessionState::Failed
        };
        result
    }

    async fn drive(&mut self) -> Result<(), RunFailure> {
        let identity = self
            .identify()
            .await
            .map_err(RunFailure::at("identification"))?;
        let session_key = self
            .exchange_key(&identity)
            .await
            .map_err(RunFailure::at("key exchange"))?;
        self.upload(&identity, &session_key)
            .await
            .map_err(RunFailure::at("file upload"))?;
        Ok(())
    }

    /// Loads the persisted identity when one exists, otherwise registers
    /// with the server and persists the result.
    async fn identify(&mut self) -> ClientResult<Identity> {
        debug_assert_eq!(self.state, SessionState::Connected);

        let identity = if self.identity_path.exists() {
            let identity = Identity::load(&self.identity_path)?;
            info!(
                "loaded identity {} from {}",
                identity.username,
                self.identity_path.display()
            );
            identity
        } else {
            self.register().await?
        };

        self.state = SessionState::Identified;
        Ok(identity)
    }

    async fn register(&mut self) -> ClientResult<Identity> {
        let username = self.instructions.username.clone();
        info!("no identity file, registering as {username}");

        let request = Request::registration(&username)?;
        self.transport.send(&request.to_bytes()).await?;

        let header = self.read_header().await?;
        if header.code == ResponseCode::RegistrationFail {
            return Err(ClientError::Registration);
        }
        header.expect(ResponseCode::RegistrationOk)?;
        let payload = self.read_payload(&header).await?;
        let client_id = response::registration_ok_id(&payload)?;

        let identity = Identity {
            username,
            client_id,
            key: RsaIdentityKey::generate()?,
        };
        identity.persist(&self.identity_path)?;
        info!("registered, client id {}", hex::encode(client_id));

        Ok(identity)
    }

    /// Sends the public key and decrypts the session key the server returns.
    async fn exchange_key(&mut self, identity: &Identity) -> ClientResult<SessionKey> {
        debug_assert_eq!(self.state, SessionState::Identified);

        let blob = identity.key.public_key_blob()?;
        if blob.len() != PUBLIC_KEY_SIZE {
            return Err(ClientError::Crypto(format!(
                "public key serialized to {} bytes, the wire field holds exactly {PUBLIC_KEY_SIZE}",
                blob.len()
            )));
        }

        let request = Request::public_key(identity.client_id, &identity.username, &blob)?;
        self.transport.send(&request.to_bytes()).await?;

        let header = self.read_header().await?;
        header.expect(ResponseCode::AesKey)?;
        if header.payload_len as usize > defaults::MAX_KEY_EXCHANGE_PAYLOAD {
            return Err(ClientError::Protocol(format!(
                "key exchange payload of {} bytes is implausibly large",
                header.payload_len
            )));
        }
        let payload = self.read_payload(&header).await?;
        let sealed = response::AesKey::from_payload(&payload)?;

        // the leading client id echo is skipped; the id of record is the one
        // from registration
        let key_bytes = identity.key.decrypt(&sealed.encrypted_key)?;
        let session_key: SessionKey = key_bytes.try_into().map_err(|bytes: Vec<u8>| {
            ClientError::Crypto(format!(
                "decrypted session key is {} bytes, expected {SESSION_KEY_SIZE}",
                bytes.len()
            ))
        })?;

        self.state = SessionState::Keyed;
        info!("session key established");
        Ok(session_key)
    }

    /// Reads and seals the file once, then drives upload attempts until the
    /// checksums agree or the retry ceiling is hit.
    async fn upload(&mut self, identity: &Identity, session_key: &SessionKey) -> ClientResult<()> {
        debug_assert_eq!(self.state, SessionState::Keyed);

        let filename = self.instructions.filename.clone();
        let content = tokio::fs::read(&filename)
            .await
            .map_err(|err| ClientError::Validation(format!("cannot read file {filename}: {err}")))?;
        if content.is_empty() {
            return Err(ClientError::Validation(format!("file {filename} is empty")));
        }

        // checksum of record and ciphertext are fixed for the whole retry
        // cycle; retries re-send the exact same bytes
        let local_crc = checksum::crc32(&content);
        let ciphertext = crypto::aes_encrypt(session_key, &content);
        debug!(
            "sealed {} bytes into {} ciphertext bytes, local crc {local_crc:#010x}",
            content.len(),
            ciphertext.len()
        );

        let mut attempt = 1;
        loop {
            let remote_crc = self.send_file(identity, &filename, &ciphertext).await?;
            self.state = SessionState::Uploaded;

            match reconcile::verdict(local_crc, remote_crc, attempt, defaults::MAX_UPLOAD_ATTEMPTS)
            {
                Verdict::Accept => {
                    self.acknowledge(Request::crc_ok(identity.client_id, &filename)?)
                        .await?;
                    self.state = SessionState::Reconciled;
                    info!("server checksum matches after {attempt} attempt(s)");
                    return Ok(());
                }
                Verdict::Resend => {
                    info!(
                        "checksum mismatch on attempt {attempt} \
                         (local {local_crc:#010x}, server {remote_crc:#010x}), resending"
                    );
                    self.acknowledge(Request::crc_retry(identity.client_id, &filename)?)
                        .await?;
                    self.state = SessionState::Keyed;
                    attempt += 1;
                }
                Verdict::Abort => {
                    self.acknowledge(Request::crc_abort(identity.client_id, &filename)?)
                        .await?;
                    return Err(ClientError::ChecksumMismatch {
                        attempts: attempt,
                        local: local_crc,
                        remote: remote_crc,
                    });
                }
            }
        }
    }

    /// One REQ_FILE exchange. The header goes out first so the server can
    /// pre-size its receive buffer, then the payload as a second write.
    async fn send_file(
        &mut self,
        identity: &Identity,
        filename: &str,
        ciphertext: &[u8],
    ) -> ClientResult<u32> {
        let request = Request::file_upload(identity.client_id, filename, ciphertext)?;
        self.transport.send(&request.header.to_bytes()).await?;
        self.transport.send(&request.payload).await?;

        let header = self.read_header().await?;
        header.expect(ResponseCode::FileReceived)?;
        let payload = self.read_payload(&header).await?;
        let received = response::FileReceived::from_payload(&payload)?;
        Ok(received.checksum)
    }

    /// Sends a checksum verdict request and waits for the confirmation.
    async fn acknowledge(&mut self, request: Request) -> ClientResult<()> {
        self.transport.send(&request.to_bytes()).await?;
        let header = self.read_header().await?;
        header.expect(ResponseCode::Confirm)?;
        Ok(())
    }

    async fn read_header(&mut self) -> ClientResult<ResponseHeader> {
        let raw = self.transport.recv_exact(RESPONSE_HEADER_SIZE).await?;
        Ok(ResponseHeader::from_bytes(&raw)?)
    }

    /// Reads the complete payload a validated header announces.
    async fn read_payload(&mut self, header: &ResponseHeader) -> ClientResult<Vec<u8>> {
        if header.payload_len == 0 {
            return Ok(Vec::new());
        }
        self.transport.recv_exact(header.payload_len as usize).await
    }
}
