//! D-Bus service exposed by the lumod daemon.

use crate::error::IpcError;
use crate::state::IndexingState;
use crate::{BUS_NAME, OBJECT_PATH};
use log::info;
use std::path::PathBuf;
use std::time::UNIX_EPOCH;
use tokio::sync::mpsc;
use zbus::Connection;
use zbus::object_server::SignalContext;

/// The daemon's bus interface. Status methods answer from shared state so
/// they stay responsive while a scan runs on a worker.
pub struct DaemonService {
    state: IndexingState,
    cache_path: PathBuf,
    force_tx: mpsc::Sender<()>,
}

impl DaemonService {
    pub fn new(state: IndexingState, cache_path: PathBuf, force_tx: mpsc::Sender<()>) -> Self {
        Self {
            state,
            cache_path,
            force_tx,
        }
    }

    /// Register on the session bus and claim the well-known name.
    pub async fn start(self) -> Result<Connection, IpcError> {
        let conn = zbus::connection::Builder::session()?
            .name(BUS_NAME)?
            .serve_at(OBJECT_PATH, self)?
            .build()
            .await?;

        info!("D-Bus service started: {BUS_NAME}");
        Ok(conn)
    }
}

#[zbus::interface(name = "dev.lumo.Lumod1")]
impl DaemonService {
    /// Whether a cache file exists, where it lives, and its mtime (unix
    /// seconds, 0 when unknown).
    async fn get_cache_status(&self) -> (bool, String, i64) {
        let available = self.cache_path.exists();
        let last_updated = if available {
            file_mtime_unix(&self.cache_path)
        } else {
            0
        };

        (
            available,
            self.cache_path.to_string_lossy().into_owned(),
            last_updated,
        )
    }

    /// Snapshot of the indexing state machine.
    async fn get_indexing_status(&self) -> (bool, f64, i32) {
        let snap = self.state.snapshot();
        (snap.is_indexing, snap.progress, snap.apps_count)
    }

    /// Ask the loop to start a cycle now instead of waiting for the timer.
    /// Returns immediately; requests arriving while a cycle is already
    /// pending or running are coalesced into one.
    async fn force_update(&self) {
        let _ = self.force_tx.try_send(());
    }

    #[zbus(property)]
    async fn version(&self) -> String {
        env!("CARGO_PKG_VERSION").to_string()
    }

    /// Emitted once per completed scan cycle.
    #[zbus(signal)]
    pub async fn cache_updated(
        ctxt: &SignalContext<'_>,
        apps_count: i32,
        timestamp: i64,
    ) -> zbus::Result<()>;

    /// Emitted at least at scan start (0.0) and completion (1.0).
    #[zbus(signal)]
    pub async fn indexing_progress(
        ctxt: &SignalContext<'_>,
        progress: f64,
        apps_count: i32,
    ) -> zbus::Result<()>;
}

/// Broadcast `CacheUpdated` to every subscriber.
pub async fn emit_cache_updated(
    conn: &Connection,
    apps_count: i32,
    timestamp: i64,
) -> Result<(), IpcError> {
    let iface = conn
        .object_server()
        .interface::<_, DaemonService>(OBJECT_PATH)
        .await?;
    DaemonService::cache_updated(iface.signal_context(), apps_count, timestamp).await?;
    Ok(())
}

/// Broadcast `IndexingProgress` to every subscriber.
pub async fn emit_indexing_progress(
    conn: &Connection,
    progress: f64,
    apps_count: i32,
) -> Result<(), IpcError> {
    let iface = conn
        .object_server()
        .interface::<_, DaemonService>(OBJECT_PATH)
        .await?;
    DaemonService::indexing_progress(iface.signal_context(), progress, apps_count).await?;
    Ok(())
}

fn file_mtime_unix(path: &std::path::Path) -> i64 {
    std::fs::metadata(path)
        .and_then(|m| m.modified())
        .ok()
        .and_then(|t| t.duration_since(UNIX_EPOCH).ok())
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0)
}
