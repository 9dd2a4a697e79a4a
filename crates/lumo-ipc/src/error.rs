//! Error types for lumo-ipc.

/// IPC service/client errors.
#[derive(Debug, thiserror::Error)]
pub enum IpcError {
    #[error("D-Bus error: {0}")]
    DBus(#[from] zbus::Error),

    #[error("D-Bus fdo error: {0}")]
    Fdo(#[from] zbus::fdo::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Daemon not connected")]
    NotConnected,
}
