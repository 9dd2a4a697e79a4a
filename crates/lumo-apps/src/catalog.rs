//! Application index: scanning, dedup, filtering.

use crate::cache;
use crate::desktop_entry::{ParsedEntry, parse_desktop_file};
use crate::entry::ApplicationEntry;
use crate::icons::IconResolver;
use crate::paths::SearchPaths;
use log::{debug, info};
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::RwLock;
use tokio::sync::broadcast;

/// Events emitted when the index changes.
#[derive(Debug, Clone)]
pub enum IndexEvent {
    Refresh,
}

/// In-memory application index.
///
/// The entry list is rebuilt wholesale on every [`AppIndex::scan`]. The parse
/// and icon caches persist across scans: desktop files and icon themes rarely
/// change within one process lifetime.
pub struct AppIndex {
    entries: RwLock<Vec<ApplicationEntry>>,
    /// Parsed desktop entries keyed by absolute file path; `None` records a
    /// file that parsed to nothing (filtered or unreadable).
    parse_cache: RwLock<HashMap<PathBuf, Option<ParsedEntry>>>,
    icons: IconResolver,
    paths: SearchPaths,
    show_hidden: bool,
    event_tx: broadcast::Sender<IndexEvent>,
}

impl AppIndex {
    pub fn new(paths: SearchPaths) -> Self {
        let (tx, _) = broadcast::channel(16);

        Self {
            entries: RwLock::new(Vec::new()),
            parse_cache: RwLock::new(HashMap::new()),
            icons: IconResolver::new(paths.icon_dirs.clone()),
            paths,
            show_hidden: false,
            event_tx: tx,
        }
    }

    /// Include entries marked `NoDisplay=true` in future scans.
    pub fn with_hidden(mut self, show_hidden: bool) -> Self {
        self.show_hidden = show_hidden;
        self
    }

    /// Full rescan of all configured directories. Returns the entry count.
    ///
    /// Directories are visited in priority order and the first entry seen
    /// under a given name wins; later duplicates are dropped. Absent
    /// directories are expected and skipped. The new list replaces the old
    /// one only after the walk completes, so concurrent readers never see a
    /// half-built index.
    pub fn scan(&self) -> usize {
        let mut seen = HashSet::new();
        let mut new_entries = Vec::new();

        for dir in &self.paths.app_dirs {
            if !dir.is_dir() {
                continue;
            }
            self.scan_dir(dir, &mut seen, &mut new_entries);
        }

        let count = new_entries.len();
        *self.entries.write().unwrap() = new_entries;
        let _ = self.event_tx.send(IndexEvent::Refresh);

        info!("Indexed {count} applications");
        count
    }

    fn scan_dir(&self, dir: &Path, seen: &mut HashSet<String>, out: &mut Vec<ApplicationEntry>) {
        let read = match fs::read_dir(dir) {
            Ok(read) => read,
            Err(err) => {
                debug!("Skipping unreadable directory {}: {err}", dir.display());
                return;
            }
        };

        for file in read.filter_map(|e| e.ok()) {
            let path = file.path();
            if path.extension().and_then(|e| e.to_str()) != Some("desktop") {
                continue;
            }

            let Some(parsed) = self.parse_cached(&path) else {
                continue;
            };
            if parsed.name.is_empty() {
                debug!("Skipping nameless entry {}", path.display());
                continue;
            }
            // Earlier directory already provided this name.
            if !seen.insert(parsed.name.clone()) {
                continue;
            }

            let icon = parsed
                .icon_name
                .as_deref()
                .and_then(|name| self.icons.resolve(name))
                .map(|p| p.to_string_lossy().into_owned());

            debug!("Loaded application: {}", parsed.name);
            out.push(ApplicationEntry {
                entry_type: if parsed.entry_type.is_empty() {
                    "Application".to_string()
                } else {
                    parsed.entry_type.clone()
                },
                name: parsed.name.clone(),
                description: parsed.description.clone(),
                exec_cmd: parsed.exec_cmd.clone(),
                desktop_id: path.file_name().map(|f| f.to_string_lossy().into_owned()),
                icon,
            });
        }
    }

    fn parse_cached(&self, path: &Path) -> Option<ParsedEntry> {
        {
            let cache = self.parse_cache.read().unwrap();
            if let Some(cached) = cache.get(path) {
                return cached.clone();
            }
        }

        let parsed = match parse_desktop_file(path, self.show_hidden) {
            Ok(parsed) => parsed,
            Err(err) => {
                debug!("Skipping unreadable {}: {err}", path.display());
                None
            }
        };

        self.parse_cache
            .write()
            .unwrap()
            .insert(path.to_path_buf(), parsed.clone());
        parsed
    }

    /// Case-insensitive substring filter on the entry name, sorted
    /// case-insensitively. An empty query matches everything.
    pub fn filter(&self, query: &str) -> Vec<ApplicationEntry> {
        let query = query.to_lowercase();
        let entries = self.entries.read().unwrap();

        let mut matched: Vec<ApplicationEntry> = entries
            .iter()
            .filter(|e| query.is_empty() || e.name.to_lowercase().contains(&query))
            .cloned()
            .collect();
        matched.sort_by_key(|e| e.name.to_lowercase());
        matched
    }

    /// All current entries, sorted by name.
    pub fn entries(&self) -> Vec<ApplicationEntry> {
        self.filter("")
    }

    /// Replace the index with the contents of a fresh cache file. Returns
    /// false (leaving the index untouched) when the cache is absent or
    /// stale.
    pub fn load_from_cache(&self, path: &Path) -> bool {
        let Some(loaded) = cache::read_cache(path) else {
            return false;
        };

        info!("Loaded {} applications from cache", loaded.len());
        *self.entries.write().unwrap() = loaded;
        let _ = self.event_tx.send(IndexEvent::Refresh);
        true
    }

    /// Foreground startup path: serve from the cache when fresh, otherwise
    /// rescan. Returns true when the cache was used.
    pub fn load_or_scan(&self, cache_path: &Path) -> bool {
        if self.load_from_cache(cache_path) {
            return true;
        }
        self.scan();
        false
    }

    /// Subscribe to index refresh events.
    pub fn subscribe(&self) -> broadcast::Receiver<IndexEvent> {
        self.event_tx.subscribe()
    }
}
