//! Application entry records.

use serde::{Deserialize, Serialize};

/// One launchable application, as discovered from a desktop entry or
/// deserialized from the cache file. Field names match the cache rows.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ApplicationEntry {
    /// Entry category, e.g. "Application".
    #[serde(rename = "type")]
    pub entry_type: String,
    /// Display name. Unique within one index; dedup key across scans.
    pub name: String,
    /// Comment line from the desktop entry, if any.
    #[serde(default)]
    pub description: Option<String>,
    /// Launch command. Absent for non-executable placeholder entries.
    #[serde(default)]
    pub exec_cmd: Option<String>,
    /// Identifier derived from the source file name, e.g. "firefox.desktop".
    #[serde(default)]
    pub desktop_id: Option<String>,
    /// Resolved icon path, if the resolver found one.
    #[serde(default)]
    pub icon: Option<String>,
}
