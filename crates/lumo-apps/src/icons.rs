//! Icon lookup across ordered search roots.

use log::debug;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::RwLock;
use std::sync::atomic::{AtomicUsize, Ordering};
use walkdir::WalkDir;

/// Accepted icon file extensions, best first.
const ICON_EXTENSIONS: [&str; 3] = ["png", "svg", "xpm"];

/// Resolves icon names to files, remembering hits and misses for the
/// lifetime of the process.
///
/// A lookup is a recursive walk over potentially large theme trees, so it is
/// performed at most once per unique name; negative results are cached too.
pub struct IconResolver {
    roots: Vec<PathBuf>,
    cache: RwLock<HashMap<String, Option<PathBuf>>>,
    searches: AtomicUsize,
}

impl IconResolver {
    pub fn new(roots: Vec<PathBuf>) -> Self {
        Self {
            roots,
            cache: RwLock::new(HashMap::new()),
            searches: AtomicUsize::new(0),
        }
    }

    /// Number of filesystem walks performed so far. Grows at most once per
    /// unique icon name thanks to the memo cache.
    pub fn searches_performed(&self) -> usize {
        self.searches.load(Ordering::Relaxed)
    }

    /// Resolve an icon name to a file path.
    ///
    /// Roots are tried in priority order; each root is searched exhaustively
    /// before moving on, and within a root the extension order (png, svg,
    /// xpm) decides between competing matches.
    pub fn resolve(&self, name: &str) -> Option<PathBuf> {
        if name.is_empty() {
            return None;
        }

        // Desktop entries may carry an absolute path instead of a theme name.
        if name.starts_with('/') {
            let path = PathBuf::from(name);
            return path.is_file().then_some(path);
        }

        {
            let cache = self.cache.read().unwrap();
            if let Some(cached) = cache.get(name) {
                return cached.clone();
            }
        }

        self.searches.fetch_add(1, Ordering::Relaxed);
        let result = self.search(name);
        if result.is_none() {
            debug!("No icon found for '{name}'");
        }

        self.cache
            .write()
            .unwrap()
            .insert(name.to_string(), result.clone());
        result
    }

    fn search(&self, name: &str) -> Option<PathBuf> {
        for root in &self.roots {
            if !root.is_dir() {
                continue;
            }
            if let Some(path) = search_root(root, name) {
                return Some(path);
            }
        }
        None
    }
}

/// Exhaustive search of one root: collect every `{name}.{ext}` match, then
/// pick the best extension.
fn search_root(root: &Path, name: &str) -> Option<PathBuf> {
    let mut best: Option<(usize, PathBuf)> = None;

    let walker = WalkDir::new(root).follow_links(true);
    for entry in walker.into_iter().filter_map(|e| e.ok()) {
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.path();
        if path.file_stem().and_then(|s| s.to_str()) != Some(name) {
            continue;
        }
        let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
            continue;
        };
        let Some(rank) = ICON_EXTENSIONS
            .iter()
            .position(|e| ext.eq_ignore_ascii_case(e))
        else {
            continue;
        };

        match &best {
            Some((r, _)) if *r <= rank => {}
            _ => best = Some((rank, path.to_path_buf())),
        }
    }

    best.map(|(_, path)| path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn finds_icon_in_nested_directory() {
        let root = TempDir::new().unwrap();
        let nested = root.path().join("hicolor/48x48/apps");
        fs::create_dir_all(&nested).unwrap();
        fs::write(nested.join("firefox.png"), b"png").unwrap();

        let resolver = IconResolver::new(vec![root.path().to_path_buf()]);
        let found = resolver.resolve("firefox").unwrap();
        assert_eq!(found, nested.join("firefox.png"));
    }

    #[test]
    fn extension_priority_prefers_png() {
        let root = TempDir::new().unwrap();
        fs::write(root.path().join("app.svg"), b"svg").unwrap();
        fs::write(root.path().join("app.png"), b"png").unwrap();

        let resolver = IconResolver::new(vec![root.path().to_path_buf()]);
        let found = resolver.resolve("app").unwrap();
        assert_eq!(found.extension().unwrap(), "png");
    }

    #[test]
    fn earlier_root_wins() {
        let first = TempDir::new().unwrap();
        let second = TempDir::new().unwrap();
        // Only an svg in the first root, a png in the second: the first root
        // is still exhausted and wins.
        fs::write(first.path().join("term.svg"), b"svg").unwrap();
        fs::write(second.path().join("term.png"), b"png").unwrap();

        let resolver = IconResolver::new(vec![
            first.path().to_path_buf(),
            second.path().to_path_buf(),
        ]);
        let found = resolver.resolve("term").unwrap();
        assert!(found.starts_with(first.path()));
    }

    #[test]
    fn results_are_memoized_including_misses() {
        let root = TempDir::new().unwrap();
        fs::write(root.path().join("hit.png"), b"png").unwrap();

        let resolver = IconResolver::new(vec![root.path().to_path_buf()]);

        assert!(resolver.resolve("hit").is_some());
        assert!(resolver.resolve("hit").is_some());
        assert_eq!(resolver.searches_performed(), 1);

        assert!(resolver.resolve("miss").is_none());
        assert!(resolver.resolve("miss").is_none());
        assert_eq!(resolver.searches_performed(), 2);
    }

    #[test]
    fn absolute_path_short_circuits() {
        let root = TempDir::new().unwrap();
        let file = root.path().join("direct.png");
        fs::write(&file, b"png").unwrap();

        let resolver = IconResolver::new(Vec::new());
        assert_eq!(resolver.resolve(file.to_str().unwrap()), Some(file));
        assert_eq!(resolver.resolve("/nonexistent/icon.png"), None);
        assert_eq!(resolver.searches_performed(), 0);
    }

    #[test]
    fn missing_roots_are_skipped() {
        let resolver = IconResolver::new(vec![PathBuf::from("/does/not/exist")]);
        assert_eq!(resolver.resolve("anything"), None);
    }
}
