//! URL rename map
//!
//! `pages/renames.json` maps literal strings to literal strings, e.g.
//! `{"Search": "https://example.com/search"}`. Keys are what the user sees or
//! types in the navigation bar; values are where the engine actually goes.
//!
//! The file is read on every lookup so edits apply without a restart.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::json_file::read_json;
use crate::Result;

#[derive(Debug, Clone)]
pub struct RenameMap {
    path: PathBuf,
}

impl RenameMap {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Current contents of the map file. Missing file is an empty map.
    pub fn table(&self) -> Result<HashMap<String, String>> {
        Ok(read_json(&self.path)?.unwrap_or_default())
    }

    /// Exact-match forward lookup: the mapped value, or `key` unchanged.
    ///
    /// An unreadable or malformed map is logged and treated as a miss.
    pub fn resolve(&self, key: &str) -> String {
        match self.table() {
            Ok(table) => table.get(key).cloned().unwrap_or_else(|| key.to_string()),
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "Rename lookup failed, passing through");
                key.to_string()
            }
        }
    }

    /// Name to show in the navigation bar for `url`.
    ///
    /// Forward match first, then a key whose value is exactly `url`, then
    /// `url` unchanged. When several keys map to the same value the
    /// lexicographically smallest key wins so the result is stable.
    pub fn display_name(&self, url: &str) -> String {
        let table = match self.table() {
            Ok(table) => table,
            Err(e) => {
                tracing::warn!(url = %url, error = %e, "Rename lookup failed, passing through");
                return url.to_string();
            }
        };

        if let Some(mapped) = table.get(url) {
            return mapped.clone();
        }

        table
            .iter()
            .filter(|(_, target)| target.as_str() == url)
            .map(|(name, _)| name)
            .min()
            .cloned()
            .unwrap_or_else(|| url.to_string())
    }

    /// URL that `display_name` turned into `display`.
    ///
    /// A key whose value is exactly `display` came from a forward match, so
    /// that key is the URL (smallest key on ties). Otherwise `display` is
    /// looked up forward, which undoes a reverse match.
    pub fn target_for(&self, display: &str) -> String {
        let table = match self.table() {
            Ok(table) => table,
            Err(e) => {
                let display_value = display;
                tracing::warn!(display = %display_value, error = %e, "Rename lookup failed, passing through");
                return display.to_string();
            }
        };

        table
            .iter()
            .filter(|(_, name)| name.as_str() == display)
            .map(|(url, _)| url)
            .min()
            .or_else(|| table.get(display))
            .cloned()
            .unwrap_or_else(|| display.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::fs;

    fn map_with(contents: &str) -> (tempfile::TempDir, RenameMap) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pages/renames.json");
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, contents).unwrap();
        (dir, RenameMap::new(path))
    }

    #[rstest]
    #[case("Search", "https://example.com/search")]
    #[case("Home", "file:///browserdata/pages/newtab.html")]
    #[case("https://unmapped.example", "https://unmapped.example")]
    #[case("", "")]
    #[case("search", "search")]
    fn test_resolve_present_map(#[case] key: &str, #[case] expected: &str) {
        let (_dir, map) = map_with(
            r#"{"Search": "https://example.com/search",
                "Home": "file:///browserdata/pages/newtab.html"}"#,
        );
        assert_eq!(map.resolve(key), expected);
    }

    #[rstest]
    #[case("Search")]
    #[case("https://example.com/search")]
    #[case("")]
    fn test_resolve_absent_map_passes_through(#[case] key: &str) {
        let dir = tempfile::tempdir().unwrap();
        let map = RenameMap::new(dir.path().join("pages/renames.json"));
        assert_eq!(map.resolve(key), key);
        assert_eq!(map.display_name(key), key);
    }

    #[test]
    fn test_malformed_map_passes_through() {
        let (_dir, map) = map_with("[1, 2, 3]");
        assert!(map.table().unwrap_err().is_corruption());
        assert_eq!(map.resolve("Search"), "Search");
        assert_eq!(map.display_name("https://x.example"), "https://x.example");
    }

    #[test]
    fn test_display_name_prefers_forward_then_reverse() {
        let (_dir, map) = map_with(
            r#"{"Search": "https://example.com/search",
                "file:///pages/newtab.html": "New Tab"}"#,
        );
        assert_eq!(map.display_name("file:///pages/newtab.html"), "New Tab");
        assert_eq!(map.display_name("https://example.com/search"), "Search");
        assert_eq!(map.display_name("https://other.example"), "https://other.example");
    }

    #[rstest]
    #[case("New Tab", "file:///pages/newtab.html")]
    #[case("Search", "https://example.com/search")]
    #[case("https://other.example", "https://other.example")]
    fn test_target_for_inverts_display_name(#[case] display: &str, #[case] expected: &str) {
        let (_dir, map) = map_with(
            r#"{"Search": "https://example.com/search",
                "file:///pages/newtab.html": "New Tab"}"#,
        );
        assert_eq!(map.target_for(display), expected);
        assert_eq!(map.display_name(expected), display);
    }

    #[test]
    fn test_target_for_malformed_map_passes_through() {
        let (_dir, map) = map_with("not json");
        assert_eq!(map.target_for("New Tab"), "New Tab");
    }

    #[test]
    fn test_edits_apply_without_reopening() {
        let (dir, map) = map_with(r#"{"a": "https://a.example"}"#);
        assert_eq!(map.resolve("a"), "https://a.example");

        fs::write(dir.path().join("pages/renames.json"), r#"{"a": "https://b.example"}"#).unwrap();
        assert_eq!(map.resolve("a"), "https://b.example");
    }
}
