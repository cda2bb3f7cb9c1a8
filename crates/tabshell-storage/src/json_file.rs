//! Whole-file JSON read/write helpers

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use crate::error::StorageError;
use crate::Result;

/// Read and parse `path`. Returns `Ok(None)` when the file does not exist.
pub(crate) fn read_json<T: DeserializeOwned>(path: &Path) -> Result<Option<T>> {
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(StorageError::io(path, e)),
    };

    serde_json::from_str(&text)
        .map(Some)
        .map_err(|source| StorageError::DataCorruption {
            path: path.to_path_buf(),
            source,
        })
}

/// Serialize `value` and replace `path` with it.
///
/// Writes to a sibling `.tmp` file first and renames it over the target, so a
/// crash mid-write leaves the previous contents intact.
pub(crate) fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| StorageError::io(parent, e))?;
    }

    let json = serde_json::to_string_pretty(value)?;
    let tmp_path = path.with_extension("json.tmp");

    fs::write(&tmp_path, json).map_err(|e| StorageError::io(&tmp_path, e))?;
    fs::rename(&tmp_path, path).map_err(|e| StorageError::io(path, e))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[test]
    fn test_missing_file_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let value: Option<Vec<String>> = read_json(&dir.path().join("absent.json")).unwrap();
        assert!(value.is_none());
    }

    #[test]
    fn test_malformed_file_is_corruption() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        fs::write(&path, "{ not json").unwrap();

        let err = read_json::<Vec<String>>(&path).unwrap_err();
        assert!(err.is_corruption());
    }

    #[test]
    fn test_write_creates_parent_dirs_and_leaves_no_tmp() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/deeper/map.json");

        let mut map = BTreeMap::new();
        map.insert("a".to_string(), "b".to_string());
        write_json(&path, &map).unwrap();

        let back: BTreeMap<String, String> = read_json(&path).unwrap().unwrap();
        assert_eq!(back, map);
        assert!(!path.with_extension("json.tmp").exists());
    }
}
