//! Client for the lumod daemon.
//!
//! Designed for launcher front ends: connection attempts run on a
//! background task and never block a startup path, and every call degrades
//! to "not connected" instead of surfacing an error the UI would have to
//! handle. Callers that find the daemon absent fall back to scanning
//! locally.

use crate::error::IpcError;
use futures_util::StreamExt;
use log::{debug, info};
use std::sync::{Arc, RwLock};
use zbus::Connection;

/// D-Bus proxy for the daemon interface.
#[zbus::proxy(
    interface = "dev.lumo.Lumod1",
    default_service = "dev.lumo.Lumod",
    default_path = "/dev/lumo/Lumod"
)]
pub trait Lumod {
    fn get_cache_status(&self) -> zbus::Result<(bool, String, i64)>;

    fn get_indexing_status(&self) -> zbus::Result<(bool, f64, i32)>;

    fn force_update(&self) -> zbus::Result<()>;

    #[zbus(property)]
    fn version(&self) -> zbus::Result<String>;

    #[zbus(signal)]
    fn cache_updated(&self, apps_count: i32, timestamp: i64) -> zbus::Result<()>;

    #[zbus(signal)]
    fn indexing_progress(&self, progress: f64, apps_count: i32) -> zbus::Result<()>;
}

/// Handle to the daemon, shareable across tasks.
#[derive(Clone, Debug, Default)]
pub struct DaemonClient {
    proxy: Arc<RwLock<Option<LumodProxy<'static>>>>,
}

impl DaemonClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Try to connect to the daemon. Failure is a normal steady state, not
    /// an error.
    pub async fn connect(&self) -> bool {
        match build_proxy().await {
            Ok(proxy) => {
                *self.proxy.write().unwrap() = Some(proxy);
                info!("Connected to lumod daemon");
                true
            }
            Err(err) => {
                debug!("Daemon not available: {err}");
                false
            }
        }
    }

    /// Connect on a background task and report the outcome via callback.
    /// Never blocks the caller.
    pub fn spawn_connect<F>(&self, on_done: F)
    where
        F: FnOnce(bool) + Send + 'static,
    {
        let client = self.clone();
        tokio::spawn(async move {
            let ok = client.connect().await;
            on_done(ok);
        });
    }

    pub fn is_connected(&self) -> bool {
        self.proxy.read().unwrap().is_some()
    }

    pub fn disconnect(&self) {
        *self.proxy.write().unwrap() = None;
        debug!("Disconnected from daemon");
    }

    fn proxy(&self) -> Option<LumodProxy<'static>> {
        self.proxy.read().unwrap().clone()
    }

    /// `(available, cache_path, last_updated)`, or `None` when the daemon is
    /// unreachable. A failed call drops the connection so callers fall back
    /// to local scanning.
    pub async fn get_cache_status(&self) -> Option<(bool, String, i64)> {
        let proxy = self.proxy()?;
        match proxy.get_cache_status().await {
            Ok(status) => Some(status),
            Err(err) => {
                debug!("GetCacheStatus failed: {err}");
                self.disconnect();
                None
            }
        }
    }

    /// `(is_indexing, progress, apps_count)`, or `None` when unreachable.
    pub async fn get_indexing_status(&self) -> Option<(bool, f64, i32)> {
        let proxy = self.proxy()?;
        match proxy.get_indexing_status().await {
            Ok(status) => Some(status),
            Err(err) => {
                debug!("GetIndexingStatus failed: {err}");
                self.disconnect();
                None
            }
        }
    }

    /// Fire-and-forget rescan request. Returns whether the request was
    /// delivered.
    pub async fn force_update(&self) -> bool {
        let Some(proxy) = self.proxy() else {
            debug!("Not connected to daemon");
            return false;
        };
        match proxy.force_update().await {
            Ok(()) => {
                info!("Force update requested");
                true
            }
            Err(err) => {
                debug!("ForceUpdate failed: {err}");
                self.disconnect();
                false
            }
        }
    }

    /// Invoke `callback(apps_count, timestamp)` for every CacheUpdated
    /// broadcast. Returns false when not connected.
    pub async fn subscribe_cache_updated<F>(&self, callback: F) -> bool
    where
        F: Fn(i32, i64) + Send + Sync + 'static,
    {
        let Some(proxy) = self.proxy() else {
            return false;
        };
        let mut stream = match proxy.receive_cache_updated().await {
            Ok(stream) => stream,
            Err(err) => {
                debug!("Could not subscribe to CacheUpdated: {err}");
                return false;
            }
        };

        tokio::spawn(async move {
            while let Some(signal) = stream.next().await {
                if let Ok(args) = signal.args() {
                    callback(args.apps_count, args.timestamp);
                }
            }
            debug!("CacheUpdated stream ended");
        });
        true
    }

    /// Invoke `callback(progress, apps_count)` for every IndexingProgress
    /// broadcast. Returns false when not connected.
    pub async fn subscribe_indexing_progress<F>(&self, callback: F) -> bool
    where
        F: Fn(f64, i32) + Send + Sync + 'static,
    {
        let Some(proxy) = self.proxy() else {
            return false;
        };
        let mut stream = match proxy.receive_indexing_progress().await {
            Ok(stream) => stream,
            Err(err) => {
                debug!("Could not subscribe to IndexingProgress: {err}");
                return false;
            }
        };

        tokio::spawn(async move {
            while let Some(signal) = stream.next().await {
                if let Ok(args) = signal.args() {
                    callback(args.progress, args.apps_count);
                }
            }
            debug!("IndexingProgress stream ended");
        });
        true
    }
}

async fn build_proxy() -> Result<LumodProxy<'static>, IpcError> {
    let conn = Connection::session().await?;
    let proxy = LumodProxy::new(&conn).await?;
    // Round-trip a property read to prove the daemon actually answers;
    // merely building a proxy succeeds even with nobody on the name.
    proxy.version().await?;
    Ok(proxy)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_client_is_disconnected() {
        let client = DaemonClient::new();
        assert!(!client.is_connected());
    }

    #[tokio::test]
    async fn calls_degrade_to_none_when_disconnected() {
        let client = DaemonClient::new();
        assert_eq!(client.get_cache_status().await, None);
        assert_eq!(client.get_indexing_status().await, None);
        assert!(!client.force_update().await);
        assert!(!client.subscribe_cache_updated(|_, _| {}).await);
        assert!(!client.subscribe_indexing_progress(|_, _| {}).await);
    }
}
