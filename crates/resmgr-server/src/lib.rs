//! resmgr device broker.
//!
//! Exposes a single shared [`Device`] to local clients over a Unix stream
//! socket. Every accepted connection gets its own task running a
//! [`Session`]; all sessions share one device behind one mutex.
//!
//! ## Architecture
//!
//! ```text
//! resmgr-server
//!   ├─ SocketEndpoint   (Acceptor: stale cleanup, bind, unlink on drop)
//!   ├─ Server           (accept loop, shutdown)
//!   └─ Session          (per-connection read/dispatch/reply)
//!        └─ resmgr_core::dispatch(&mut Device, chunk)
//! ```
//!
//! ## Known limitations
//!
//! Concurrency is unbounded: one task per connection and no idle timeout.
//! A client that connects and never sends keeps its task and socket alive
//! until it disconnects. Many such clients exhaust file descriptors.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod endpoint;
mod error;
mod session;

use std::{
    future::Future,
    io,
    path::{Path, PathBuf},
    sync::Arc,
};

pub use endpoint::{Acceptor, SocketEndpoint};
pub use error::ServerError;
use resmgr_core::{DEFAULT_CAPACITY, Device};
pub use session::{RECV_BUFFER_SIZE, Session, SessionId};
use tokio::sync::Mutex;

/// Rendezvous path used when none is configured.
pub const DEFAULT_SOCKET_PATH: &str = "/tmp/example_resmgr.sock";

/// Handle to the process-wide device.
///
/// The mutex is the only access path. It covers buffer, size, flags and
/// permission as one critical section.
pub type SharedDevice = Arc<Mutex<Device>>;

/// Server configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Filesystem path of the listening socket.
    pub socket_path: PathBuf,
    /// Device buffer capacity in bytes.
    pub capacity: usize,
}

impl ServerConfig {
    /// Check the configuration before binding.
    ///
    /// # Errors
    ///
    /// Returns `ServerError::Config` if the capacity is zero or the socket
    /// path is empty.
    pub fn validate(&self) -> Result<(), ServerError> {
        if self.capacity == 0 {
            return Err(ServerError::Config("capacity must be non-zero".to_string()));
        }
        if self.socket_path.as_os_str().is_empty() {
            return Err(ServerError::Config("socket path must not be empty".to_string()));
        }
        Ok(())
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { socket_path: PathBuf::from(DEFAULT_SOCKET_PATH), capacity: DEFAULT_CAPACITY }
    }
}

/// Why the accept loop stopped.
#[derive(Debug)]
pub enum ShutdownReason {
    /// The shutdown future resolved.
    Requested,
    /// `accept` failed with a non-retryable error.
    AcceptFailed(io::Error),
}

/// The listener half of the broker.
#[derive(Debug)]
pub struct Server<A = SocketEndpoint> {
    acceptor: A,
    device: SharedDevice,
}

impl Server {
    /// Validate the configuration, create the device and bind the socket.
    ///
    /// Must be called from within a Tokio runtime.
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - The configuration is invalid
    /// - The socket path cannot be prepared or bound
    pub fn bind(config: ServerConfig) -> Result<Self, ServerError> {
        config.validate()?;

        let endpoint = SocketEndpoint::bind(config.socket_path)?;
        let device = Arc::new(Mutex::new(Device::with_capacity(config.capacity)));

        Ok(Self::with_acceptor(endpoint, device))
    }
}

impl<A: Acceptor> Server<A> {
    /// Serve `device` to connections produced by `acceptor`.
    pub fn with_acceptor(acceptor: A, device: SharedDevice) -> Self {
        Self { acceptor, device }
    }

    /// Path the server is listening on.
    pub fn local_path(&self) -> &Path {
        self.acceptor.path()
    }

    /// Shared handle to the device.
    pub fn device(&self) -> SharedDevice {
        Arc::clone(&self.device)
    }

    /// Run the accept loop until `shutdown` resolves or `accept` fails.
    ///
    /// Interrupted accepts are retried. On exit the acceptor is dropped,
    /// which for a [`SocketEndpoint`] closes the listening socket and removes
    /// its filesystem entry. Sessions already running are not drained; they
    /// keep their own tasks.
    pub async fn run_until<F>(self, shutdown: F) -> ShutdownReason
    where
        F: Future<Output = ()>,
    {
        tracing::info!("Listening on {}", self.local_path().display());

        tokio::pin!(shutdown);
        let mut next_id = 0u64;

        let reason = loop {
            let accepted = tokio::select! {
                () = &mut shutdown => break ShutdownReason::Requested,
                accepted = self.acceptor.accept() => accepted,
            };

            match accepted {
                Ok(stream) => {
                    next_id += 1;
                    let device = Arc::clone(&self.device);
                    let session = Session::new(SessionId(next_id), stream, device);
                    tracing::debug!(session = %session.id(), "Connection accepted");
                    tokio::spawn(session.run());
                },
                Err(e) if e.kind() == io::ErrorKind::Interrupted => {
                    tracing::debug!("Accept interrupted, retrying");
                },
                Err(e) => {
                    tracing::error!("Accept error: {}", e);
                    break ShutdownReason::AcceptFailed(e);
                },
            }
        };

        tracing::info!("Listener stopped: {:?}", reason);
        drop(self.acceptor);
        reason
    }
}
