//! lumo-apps: desktop application indexing for Linux desktops.
//!
//! Provides a unified core for launcher front ends:
//! - Desktop-entry parsing from `.desktop` files
//! - Icon lookup across ordered search roots, memoized per process
//! - A filterable in-memory application index with cross-directory
//!   precedence dedup
//! - A JSON cache with a freshness window, shared with the lumod daemon

mod cache;
mod catalog;
mod desktop_entry;
mod entry;
mod icons;
mod paths;

pub use cache::{FRESHNESS_WINDOW, read_cache, write_cache};
pub use catalog::{AppIndex, IndexEvent};
pub use desktop_entry::{ParsedEntry, parse_desktop_file};
pub use entry::ApplicationEntry;
pub use icons::IconResolver;
pub use paths::{SearchPaths, default_cache_path};
