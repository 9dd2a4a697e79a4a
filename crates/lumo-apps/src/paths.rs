//! Search-path configuration.
//!
//! The index does not decide where to look by itself; it is handed an
//! ordered list of roots, most specific first. The defaults reproduce the
//! lists a sandboxed (Flatpak) launcher needs, where the real filesystem is
//! mirrored under `/run/host`. Most of these directories will not exist on
//! any given machine; the scanner skips absent ones silently.

use std::path::PathBuf;

const HOST_PREFIX: &str = "/run/host";

/// Ordered filesystem roots for desktop entries and icons, highest
/// priority first.
#[derive(Clone, Debug)]
pub struct SearchPaths {
    pub app_dirs: Vec<PathBuf>,
    pub icon_dirs: Vec<PathBuf>,
}

impl SearchPaths {
    pub fn new(app_dirs: Vec<PathBuf>, icon_dirs: Vec<PathBuf>) -> Self {
        Self {
            app_dirs,
            icon_dirs,
        }
    }
}

impl Default for SearchPaths {
    fn default() -> Self {
        let home = std::env::var("HOME").unwrap_or_default();

        let app_dirs = vec![
            PathBuf::from("/usr/share/applications"),
            PathBuf::from(format!("{HOST_PREFIX}/usr/share/applications")),
            PathBuf::from(format!(
                "{HOST_PREFIX}/var/lib/flatpak/exports/share/applications"
            )),
            PathBuf::from(format!("{home}/.local/share/applications")),
            PathBuf::from(format!("{HOST_PREFIX}{home}/.local/share/applications")),
        ];

        let icon_dirs = vec![
            PathBuf::from("/usr/share/icons"),
            PathBuf::from("/usr/share/pixmaps"),
            PathBuf::from(format!("{home}/.local/share/icons")),
            PathBuf::from(format!("{home}/.icons")),
            PathBuf::from(format!("{HOST_PREFIX}/usr/share/icons")),
            PathBuf::from(format!("{HOST_PREFIX}/usr/share/pixmaps")),
            PathBuf::from(format!("{HOST_PREFIX}{home}/.local/share/icons")),
            PathBuf::from(format!("{HOST_PREFIX}{home}/.icons")),
            PathBuf::from(format!("{HOST_PREFIX}/var/lib/flatpak/app")),
            PathBuf::from(format!("{HOST_PREFIX}/var/lib/flatpak/runtime")),
        ];

        Self {
            app_dirs,
            icon_dirs,
        }
    }
}

/// Default location of the applications cache, shared between the daemon
/// (writer) and foreground readers.
pub fn default_cache_path() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join("lumo")
        .join("applications_cache.json")
}
