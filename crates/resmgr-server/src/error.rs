//! Server error types.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur in the server.
#[derive(Debug, Error)]
pub enum ServerError {
    /// Runtime configuration rejected before startup.
    #[error("configuration error: {0}")]
    Config(String),

    /// The rendezvous socket could not be prepared or bound.
    #[error("failed to bind {}: {source}", path.display())]
    Bind {
        /// Socket path that failed.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
}
