//! The indexing daemon loop.
//!
//! Timer-driven cycles with an out-of-band force-update nudge from the bus.
//! Scans run on a blocking worker so status queries answered from shared
//! state stay responsive. A failed (or panicked) cycle is logged and the
//! loop simply waits for the next tick; no immediate retry, no backoff.

use log::{debug, error, info, warn};
use lumo_apps::{AppIndex, ApplicationEntry, write_cache};
use lumo_ipc::{DaemonService, IndexingState, emit_cache_updated, emit_indexing_progress};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use tokio::sync::mpsc;
use zbus::Connection;

/// How often a full rescan runs.
const SCAN_INTERVAL: Duration = Duration::from_secs(60);
/// Progress checkpoint once the in-memory list is built but the cache is not
/// yet written.
const PROGRESS_SCANNED: f64 = 0.8;

pub struct DaemonConfig {
    pub cache_path: PathBuf,
    pub scan_interval: Duration,
}

impl Default for DaemonConfig {
    fn default() -> Self {
        Self {
            cache_path: lumo_apps::default_cache_path(),
            scan_interval: SCAN_INTERVAL,
        }
    }
}

/// What the daemon indexes. Split out from [`AppIndex`] so the loop can be
/// exercised with a misbehaving scanner.
pub trait AppSource: Send + Sync + 'static {
    fn rescan(&self) -> usize;
    fn entries(&self) -> Vec<ApplicationEntry>;
}

impl AppSource for AppIndex {
    fn rescan(&self) -> usize {
        self.scan()
    }

    fn entries(&self) -> Vec<ApplicationEntry> {
        self.entries()
    }
}

pub struct Daemon<S: AppSource> {
    config: DaemonConfig,
    source: Arc<S>,
    state: IndexingState,
}

impl<S: AppSource> Daemon<S> {
    pub fn new(config: DaemonConfig, source: S) -> Self {
        Self {
            config,
            source: Arc::new(source),
            state: IndexingState::new(),
        }
    }

    /// Serve the bus interface and run scan cycles until SIGINT/SIGTERM.
    pub async fn run(self) -> Result<(), lumo_ipc::IpcError> {
        let (force_tx, mut force_rx) = mpsc::channel(1);
        let service = DaemonService::new(
            self.state.clone(),
            self.config.cache_path.clone(),
            force_tx,
        );
        let conn = service.start().await?;

        let mut interval = tokio::time::interval(self.config.scan_interval);
        let mut sigterm =
            tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())?;

        loop {
            tokio::select! {
                // First tick fires immediately, so the cache is warm from
                // startup.
                _ = interval.tick() => {
                    self.run_cycle(Some(&conn)).await;
                }
                Some(()) = force_rx.recv() => {
                    info!("Force update requested");
                    self.run_cycle(Some(&conn)).await;
                }
                _ = tokio::signal::ctrl_c() => {
                    info!("SIGINT received, shutting down");
                    break;
                }
                _ = sigterm.recv() => {
                    info!("SIGTERM received, shutting down");
                    break;
                }
            }

            // Forces that arrived while a cycle was running are stale now.
            while force_rx.try_recv().is_ok() {}
        }

        Ok(())
    }

    /// One scan cycle: Idle -> Indexing -> cache write -> Idle. Signal
    /// emission is best-effort; state transitions always complete.
    async fn run_cycle(&self, conn: Option<&Connection>) {
        self.state.begin_scan();
        let prior_count = self.state.snapshot().apps_count;
        self.emit_progress(conn, 0.0, prior_count).await;

        let source = Arc::clone(&self.source);
        let scanned = tokio::task::spawn_blocking(move || source.rescan()).await;

        let count = match scanned {
            Ok(count) => count as i32,
            Err(err) => {
                error!("Scan task failed: {err}");
                self.state.finish_scan(prior_count);
                self.emit_progress(conn, 1.0, prior_count).await;
                return;
            }
        };

        self.state.set_progress(PROGRESS_SCANNED, count);
        self.emit_progress(conn, PROGRESS_SCANNED, count).await;

        let entries = self.source.entries();
        if let Err(err) = write_cache(&entries, &self.config.cache_path) {
            warn!("Cache write failed: {err}");
            self.state.finish_scan(count);
            self.emit_progress(conn, 1.0, count).await;
            return;
        }

        self.state.finish_scan(count);
        self.emit_progress(conn, 1.0, count).await;

        if let Some(conn) = conn {
            if let Err(err) = emit_cache_updated(conn, count, unix_now()).await {
                debug!("CacheUpdated emit failed: {err}");
            }
        }
        debug!("Cycle complete: {count} applications cached");
    }

    async fn emit_progress(&self, conn: Option<&Connection>, progress: f64, count: i32) {
        if let Some(conn) = conn {
            if let Err(err) = emit_indexing_progress(conn, progress, count).await {
                debug!("IndexingProgress emit failed: {err}");
            }
        }
    }
}

fn unix_now() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0)
}
