//! Connection session.
//!
//! One session per accepted client. The session reads a chunk, dispatches it
//! against the shared device and writes the reply back before reading again.
//!
//! ## Locking
//!
//! The device lock is taken twice per session for the flag updates and once
//! per command for [`dispatch`]. It is never held across a socket read or
//! write, so an idle client cannot stall the others.
//!
//! ## Framing
//!
//! There is none. Each successful read is one command. A command split
//! across reads, or several commands in one read, is handled best-effort
//! as whatever bytes arrived.

use std::fmt;

use bytes::BytesMut;
use resmgr_core::dispatch;
use tokio::{
    io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt},
    net::UnixStream,
};

use crate::SharedDevice;

/// Size of the per-session receive buffer. Longer commands are split.
pub const RECV_BUFFER_SIZE: usize = 1024;

/// Identifier assigned to each accepted connection, for log correlation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SessionId(pub u64);

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Server side of one client connection.
pub struct Session<S = UnixStream> {
    id: SessionId,
    stream: S,
    device: SharedDevice,
}

impl<S> Session<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    /// Create a session for an accepted connection.
    pub fn new(id: SessionId, stream: S, device: SharedDevice) -> Self {
        Self { id, stream, device }
    }

    /// Session identifier.
    pub fn id(&self) -> SessionId {
        self.id
    }

    /// Drive the receive/dispatch/reply loop until the peer goes away.
    ///
    /// Read errors and end-of-stream both end the session. Write errors are
    /// logged and the session keeps reading.
    pub async fn run(mut self) {
        let id = self.id;
        self.device.lock().await.open_session();
        tracing::debug!(session = %id, "Connection opened");

        let mut buf = BytesMut::zeroed(RECV_BUFFER_SIZE);

        loop {
            let n = match self.stream.read(&mut buf[..]).await {
                Ok(0) => {
                    tracing::debug!(session = %id, "Peer closed connection");
                    break;
                },
                Ok(n) => n,
                Err(e) => {
                    tracing::debug!(session = %id, "Read error: {}", e);
                    break;
                },
            };

            let reply = {
                let mut device = self.device.lock().await;
                dispatch(&mut device, &buf[..n])
            };

            if reply.is_error() {
                tracing::debug!(session = %id, ?reply, "Command rejected");
            }

            if let Err(e) = self.stream.write_all(&reply.to_bytes()).await {
                tracing::warn!(session = %id, "Failed to write reply: {}", e);
            }
        }

        self.device.lock().await.close_session();
        tracing::debug!(session = %id, "Connection closed");
    }
}

impl<S> fmt::Debug for Session<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session").field("id", &self.id).finish_non_exhaustive()
    }
}
