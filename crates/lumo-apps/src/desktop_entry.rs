//! Desktop entry parsing.

use std::fs;
use std::io;
use std::path::Path;

/// Fields read from the `[Desktop Entry]` section of one `.desktop` file.
///
/// `name` may be empty here; the index rejects nameless entries before they
/// reach the entry list.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ParsedEntry {
    pub entry_type: String,
    pub name: String,
    pub exec_cmd: Option<String>,
    pub icon_name: Option<String>,
    pub description: Option<String>,
}

/// Parse a `.desktop` file.
///
/// Only lines inside `[Desktop Entry]` are interpreted; blank lines,
/// comments, unknown keys and other sections are ignored. The value is taken
/// verbatim after the first `=`.
///
/// Returns `Ok(None)` for entries filtered out by `Terminal=true`, or by
/// `NoDisplay=true` unless `show_hidden` is set. Both flags may appear
/// anywhere in the section, so filtering happens after the whole file is
/// read. An unreadable file propagates the I/O error; the caller decides
/// whether that is fatal.
pub fn parse_desktop_file(path: &Path, show_hidden: bool) -> io::Result<Option<ParsedEntry>> {
    let content = fs::read_to_string(path)?;
    let mut entry = ParsedEntry::default();
    let mut in_desktop_entry = false;
    let mut terminal = false;
    let mut no_display = false;

    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        if line.starts_with('[') && line.ends_with(']') {
            in_desktop_entry = line == "[Desktop Entry]";
            continue;
        }

        if !in_desktop_entry {
            continue;
        }

        let Some((key, value)) = line.split_once('=') else {
            continue;
        };
        let (key, value) = (key.trim(), value.trim());

        match key {
            "Type" => entry.entry_type = value.to_string(),
            "Name" => entry.name = value.to_string(),
            "Exec" => entry.exec_cmd = Some(value.to_string()),
            "Icon" => entry.icon_name = Some(value.to_string()),
            "Comment" => entry.description = Some(value.to_string()),
            "Terminal" => terminal = value.eq_ignore_ascii_case("true"),
            "NoDisplay" => no_display = value.eq_ignore_ascii_case("true"),
            _ => {}
        }
    }

    if terminal {
        return Ok(None);
    }
    if no_display && !show_hidden {
        return Ok(None);
    }

    Ok(Some(entry))
}
