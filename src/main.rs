//! lumod - application indexing daemon.
//!
//! Periodically rescans desktop entries into a JSON cache and publishes
//! progress over D-Bus, so a launcher front end can start warm instead of
//! walking the filesystem itself.

mod daemon;

use daemon::{Daemon, DaemonConfig};
use log::{error, info};
use lumo_apps::{AppIndex, SearchPaths};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = DaemonConfig::default();
    info!("Starting lumod (cache: {})", config.cache_path.display());

    let index = AppIndex::new(SearchPaths::default());
    if let Err(err) = Daemon::new(config, index).run().await {
        error!("Daemon failed: {err}");
        std::process::exit(1);
    }
}
