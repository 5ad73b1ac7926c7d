//! Client for the resmgr device broker.
//!
//! The protocol has no framing: one write is one command and one read is
//! one reply. [`Client`] keeps a connection open for several exchanges;
//! [`send_command`] is the one-shot form used by the `resmgr-client` binary.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod error;

use std::path::{Path, PathBuf};

use bytes::{Bytes, BytesMut};
pub use error::ClientError;
use tokio::{
    io::{AsyncReadExt, AsyncWriteExt},
    net::UnixStream,
};

/// Socket path the server listens on by default.
pub const DEFAULT_SOCKET_PATH: &str = "/tmp/example_resmgr.sock";

/// Largest reply read in one exchange. Covers a full default-size device.
pub const REPLY_BUFFER_SIZE: usize = 8192;

/// An open connection to the broker.
#[derive(Debug)]
pub struct Client {
    stream: UnixStream,
    path: PathBuf,
}

impl Client {
    /// Connect to the broker listening at `path`.
    pub async fn connect(path: impl AsRef<Path>) -> Result<Self, ClientError> {
        let path = path.as_ref().to_path_buf();
        let stream = UnixStream::connect(&path)
            .await
            .map_err(|source| ClientError::Connect { path: path.clone(), source })?;
        Ok(Self { stream, path })
    }

    /// Socket path this client is connected to.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Send one command and wait for its reply.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Closed` if the server hung up before replying.
    pub async fn request(&mut self, command: impl AsRef<[u8]>) -> Result<Bytes, ClientError> {
        self.stream.write_all(command.as_ref()).await.map_err(ClientError::Send)?;

        let mut buf = BytesMut::zeroed(REPLY_BUFFER_SIZE);
        let n = self.stream.read(&mut buf[..]).await.map_err(ClientError::Receive)?;
        if n == 0 {
            return Err(ClientError::Closed);
        }

        buf.truncate(n);
        Ok(buf.freeze())
    }
}

/// Connect, send `command`, return the reply and disconnect.
pub async fn send_command(
    path: impl AsRef<Path>,
    command: impl AsRef<[u8]>,
) -> Result<Bytes, ClientError> {
    let mut client = Client::connect(path).await?;
    client.request(command).await
}
