//! Rendezvous endpoint.
//!
//! Owns the listening Unix socket and its filesystem entry. A stale socket
//! left behind by a previous run is removed before binding, and the entry is
//! removed again when the endpoint is dropped.

use std::{
    fs,
    future::Future,
    io,
    os::unix::fs::FileTypeExt,
    path::{Path, PathBuf},
};

use tokio::net::{UnixListener, UnixStream};

use crate::error::ServerError;

/// Source of inbound connections for the accept loop.
///
/// [`SocketEndpoint`] is the production implementation. Tests wrap it to
/// inject accept failures.
pub trait Acceptor {
    /// Filesystem path clients connect to.
    fn path(&self) -> &Path;

    /// Wait for the next inbound connection.
    fn accept(&self) -> impl Future<Output = io::Result<UnixStream>> + Send;
}

/// Bound listening socket at a fixed path.
#[derive(Debug)]
pub struct SocketEndpoint {
    path: PathBuf,
    listener: UnixListener,
}

impl SocketEndpoint {
    /// Remove any stale socket at `path` and bind a new listener there.
    ///
    /// Must be called from within a Tokio runtime.
    ///
    /// # Errors
    ///
    /// Returns `ServerError::Bind` if:
    /// - `path` exists and is not a socket
    /// - the stale socket cannot be removed
    /// - binding fails
    pub fn bind(path: impl Into<PathBuf>) -> Result<Self, ServerError> {
        let path = path.into();

        let bind_error = |source| ServerError::Bind { path: path.clone(), source };

        remove_stale(&path).map_err(bind_error)?;
        let listener = UnixListener::bind(&path).map_err(bind_error)?;

        Ok(Self { path, listener })
    }
}

impl Acceptor for SocketEndpoint {
    fn path(&self) -> &Path {
        &self.path
    }

    async fn accept(&self) -> io::Result<UnixStream> {
        let (stream, _addr) = self.listener.accept().await?;
        Ok(stream)
    }
}

impl Drop for SocketEndpoint {
    fn drop(&mut self) {
        match fs::remove_file(&self.path) {
            Ok(()) => tracing::info!("Removed socket {}", self.path.display()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {},
            Err(e) => tracing::warn!("Failed to remove socket {}: {}", self.path.display(), e),
        }
    }
}

/// Remove a leftover socket file. Refuses to touch anything that is not a
/// socket.
fn remove_stale(path: &Path) -> io::Result<()> {
    let metadata = match fs::symlink_metadata(path) {
        Ok(metadata) => metadata,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(()),
        Err(e) => return Err(e),
    };

    if !metadata.file_type().is_socket() {
        return Err(io::Error::new(io::ErrorKind::AlreadyExists, "path exists and is not a socket"));
    }

    fs::remove_file(path)?;
    tracing::debug!("Removed stale socket {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn bind_creates_and_drop_removes_socket() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dev.sock");

        let endpoint = SocketEndpoint::bind(&path).unwrap();
        assert_eq!(endpoint.path(), path);
        assert!(fs::symlink_metadata(&path).unwrap().file_type().is_socket());

        drop(endpoint);
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn bind_replaces_stale_socket() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dev.sock");

        // A std listener leaves the file behind once dropped.
        drop(std::os::unix::net::UnixListener::bind(&path).unwrap());
        assert!(path.exists());

        let endpoint = SocketEndpoint::bind(&path).unwrap();
        assert!(UnixStream::connect(&path).await.is_ok());
        drop(endpoint);
    }

    #[tokio::test]
    async fn accept_yields_connected_stream() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dev.sock");
        let endpoint = SocketEndpoint::bind(&path).unwrap();

        let (accepted, connected) = tokio::join!(endpoint.accept(), UnixStream::connect(&path));
        assert!(accepted.is_ok());
        assert!(connected.is_ok());
    }

    #[tokio::test]
    async fn bind_refuses_regular_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("not-a-socket");
        fs::write(&path, b"data").unwrap();

        let result = SocketEndpoint::bind(&path);
        assert!(matches!(result, Err(ServerError::Bind { .. })));
        assert_eq!(fs::read(&path).unwrap(), b"data");
    }

    #[tokio::test]
    async fn bind_fails_in_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("dev.sock");

        let result = SocketEndpoint::bind(&path);
        assert!(matches!(result, Err(ServerError::Bind { .. })));
    }
}
