//! lumo-ipc: D-Bus contract between the lumod daemon and its clients.
//!
//! The daemon owns a well-known name on the session bus and exposes cache
//! and indexing status, a fire-and-forget force-update, and two broadcast
//! signals. The client side degrades silently when the daemon is absent;
//! the daemon is an optional accelerator, never a hard dependency.

mod client;
mod error;
mod service;
mod state;

pub use client::{DaemonClient, LumodProxy};
pub use error::IpcError;
pub use service::{DaemonService, emit_cache_updated, emit_indexing_progress};
pub use state::{IndexingSnapshot, IndexingState};

/// Well-known bus name owned by the daemon.
pub const BUS_NAME: &str = "dev.lumo.Lumod";
/// Object path the service is registered at.
pub const OBJECT_PATH: &str = "/dev/lumo/Lumod";
/// Interface name, shared by service and client.
pub const INTERFACE: &str = "dev.lumo.Lumod1";
