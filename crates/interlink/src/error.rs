//! Lifecycle errors.

use thiserror::Error;

/// Failures reported by the lifecycle controller to the integration facade.
///
/// Any of these means bridging is not active; the host must not proceed as
/// if it were.
#[derive(Debug, Error)]
pub enum LifecycleError {
    /// `start` was called before `initialize` produced a handle.
    #[error("bridge server not initialized")]
    NotInitialized,

    /// `start` was called on a handle that is already listening.
    #[error("bridge server already listening on {0}")]
    AlreadyListening(std::net::SocketAddr),

    /// `initialize` was called while a live handle exists.
    #[error("bridge server already initialized")]
    AlreadyInitialized,

    /// Bridging is enabled on a privileged port.
    #[error("invalid bridge port {0}: must be an unprivileged port")]
    InvalidPort(u16),

    /// Binding the listening socket failed.
    #[error("failed to bind bridge server to {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },
}
