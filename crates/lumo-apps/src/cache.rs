//! On-disk JSON cache for the application index.
//!
//! Single writer (the daemon), any number of readers. No locking: the
//! freshness window already tolerates a reader seeing a slightly stale
//! snapshot, and the write is atomic (temp file + rename) so a reader never
//! observes a truncated array.

use crate::entry::ApplicationEntry;
use log::{debug, warn};
use std::fs;
use std::io;
use std::path::Path;
use std::time::{Duration, SystemTime};

/// Maximum age a cache file may have and still be trusted without a rescan.
pub const FRESHNESS_WINDOW: Duration = Duration::from_secs(3600);

/// Whether a file modified at `modified` is still trustworthy at `now`.
/// The boundary is exclusive: a file exactly one window old is stale.
fn is_fresh(modified: SystemTime, now: SystemTime) -> bool {
    match now.duration_since(modified) {
        Ok(age) => age < FRESHNESS_WINDOW,
        // Modified timestamp in the future (clock skew); trust it.
        Err(_) => true,
    }
}

/// Serialize the entry list to `path`, creating parent directories as
/// needed. Writes to a temp file in the same directory and renames it over
/// the target.
pub fn write_cache(entries: &[ApplicationEntry], path: &Path) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let json = serde_json::to_vec(entries)?;
    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, json)?;
    fs::rename(&tmp, path)
}

/// Read the cache if it exists and is fresh.
///
/// An absent, stale or wholly unparseable file is reported as `None`, never
/// as an error; the caller falls back to a full rescan. Individual rows that
/// fail to deserialize are skipped.
pub fn read_cache(path: &Path) -> Option<Vec<ApplicationEntry>> {
    let meta = fs::metadata(path).ok()?;
    let modified = meta.modified().ok()?;
    if !is_fresh(modified, SystemTime::now()) {
        debug!("Cache file too old: {}", path.display());
        return None;
    }

    let content = fs::read_to_string(path).ok()?;
    let rows: Vec<serde_json::Value> = match serde_json::from_str(&content) {
        Ok(rows) => rows,
        Err(err) => {
            warn!("Unreadable cache {}: {err}", path.display());
            return None;
        }
    };

    let mut entries = Vec::with_capacity(rows.len());
    for row in rows {
        match serde_json::from_value::<ApplicationEntry>(row) {
            Ok(entry) => entries.push(entry),
            Err(err) => debug!("Skipping malformed cache row: {err}"),
        }
    }
    Some(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn entry(name: &str, exec: &str) -> ApplicationEntry {
        ApplicationEntry {
            entry_type: "Application".to_string(),
            name: name.to_string(),
            description: None,
            exec_cmd: Some(exec.to_string()),
            desktop_id: Some(format!("{name}.desktop")),
            icon: None,
        }
    }

    #[test]
    fn freshness_boundary_is_exclusive() {
        let now = SystemTime::now();
        assert!(!is_fresh(now - FRESHNESS_WINDOW, now));
        assert!(!is_fresh(now - FRESHNESS_WINDOW - Duration::from_secs(3600), now));
        assert!(is_fresh(now - (FRESHNESS_WINDOW - Duration::from_secs(1)), now));
        assert!(is_fresh(now - Duration::from_secs(10), now));
    }

    #[test]
    fn future_mtime_is_treated_as_fresh() {
        let now = SystemTime::now();
        assert!(is_fresh(now + Duration::from_secs(5), now));
    }

    #[test]
    fn round_trip_preserves_all_fields() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("applications_cache.json");

        let mut original = vec![ApplicationEntry {
            entry_type: "Application".to_string(),
            name: "Files".to_string(),
            description: Some("Browse files".to_string()),
            exec_cmd: Some("nautilus --new-window".to_string()),
            desktop_id: Some("org.gnome.Nautilus.desktop".to_string()),
            icon: Some("/usr/share/icons/nautilus.png".to_string()),
        }];
        for i in 0..300 {
            original.push(entry(&format!("App {i}"), &format!("app-{i}")));
        }

        write_cache(&original, &path).unwrap();
        let loaded = read_cache(&path).unwrap();
        assert_eq!(loaded, original);
    }

    #[test]
    fn round_trip_empty_list() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("applications_cache.json");

        write_cache(&[], &path).unwrap();
        assert_eq!(read_cache(&path).unwrap(), Vec::new());
    }

    #[test]
    fn absent_file_reports_no_cache() {
        let dir = TempDir::new().unwrap();
        assert_eq!(read_cache(&dir.path().join("nope.json")), None);
    }

    #[test]
    fn malformed_rows_are_skipped_individually() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("applications_cache.json");
        fs::write(
            &path,
            r#"[
                {"type":"Application","name":"Bar","exec_cmd":"bar","icon":null,"description":null,"desktop_id":null},
                {"unexpected":"shape"},
                42
            ]"#,
        )
        .unwrap();

        let loaded = read_cache(&path).unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].name, "Bar");
        assert_eq!(loaded[0].exec_cmd.as_deref(), Some("bar"));
    }

    #[test]
    fn non_array_payload_reports_no_cache() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("applications_cache.json");
        fs::write(&path, "{\"not\":\"an array\"}").unwrap();
        assert_eq!(read_cache(&path), None);
    }

    #[test]
    fn write_creates_parent_directories() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("deep/nested/cache.json");
        write_cache(&[entry("A", "a")], &path).unwrap();
        assert_eq!(read_cache(&path).unwrap().len(), 1);
    }

    #[test]
    fn no_temp_file_left_behind() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("applications_cache.json");
        write_cache(&[entry("A", "a")], &path).unwrap();

        let names: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(names, vec!["applications_cache.json"]);
    }
}
