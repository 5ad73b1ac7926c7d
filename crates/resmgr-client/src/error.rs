//! Client error types.

use std::path::PathBuf;

use thiserror::Error;

/// Errors from client operations.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Could not connect to the broker socket.
    #[error("connect to {}: {source}", path.display())]
    Connect {
        /// Socket path.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// Writing the command failed.
    #[error("send: {0}")]
    Send(#[source] std::io::Error),

    /// Reading the reply failed.
    #[error("recv: {0}")]
    Receive(#[source] std::io::Error),

    /// The server closed the connection without replying.
    #[error("connection closed by server")]
    Closed,
}
