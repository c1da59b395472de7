//! Log file discovery.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::SawmillError;

/// Resolve an ingestion target into the list of files to parse.
///
/// A plain file is returned as-is with no extension check. A directory
/// yields every direct entry named `*.log`; subdirectories are not
/// descended into. An existing directory with no matching files is not an
/// error, just an empty list. The entries are sorted so runs and reports
/// are deterministic, which the contract permits but does not require.
pub fn scan(path: &Path) -> Result<Vec<PathBuf>, SawmillError> {
    if !path.exists() {
        return Err(SawmillError::PathNotFound(path.to_path_buf()));
    }

    if path.is_file() {
        return Ok(vec![path.to_path_buf()]);
    }

    let mut files = Vec::new();
    for entry in fs::read_dir(path).map_err(|e| SawmillError::io_at(path, e))? {
        let entry = entry.map_err(|e| SawmillError::io_at(path, e))?;
        let candidate = entry.path();
        let is_log = candidate
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|n| n.ends_with(".log"));
        if is_log && candidate.is_file() {
            files.push(candidate);
        }
    }
    files.sort();
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;

    #[test]
    fn single_file_returned_without_extension_check() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("anything.txt");
        File::create(&file).unwrap();
        assert_eq!(scan(&file).unwrap(), vec![file]);
    }

    #[test]
    fn directory_filters_on_log_suffix() {
        let dir = tempfile::tempdir().unwrap();
        File::create(dir.path().join("a.log")).unwrap();
        File::create(dir.path().join("b.log")).unwrap();
        File::create(dir.path().join("notes.txt")).unwrap();
        File::create(dir.path().join("c.log.bak")).unwrap();

        let found = scan(dir.path()).unwrap();
        let names: Vec<_> = found
            .iter()
            .map(|p| p.file_name().unwrap().to_str().unwrap().to_string())
            .collect();
        assert_eq!(names, ["a.log", "b.log"]);
    }

    #[test]
    fn empty_directory_is_not_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(scan(dir.path()).unwrap().is_empty());
    }

    #[test]
    fn missing_path_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope");
        match scan(&missing) {
            Err(SawmillError::PathNotFound(p)) => assert_eq!(p, missing),
            other => panic!("expected PathNotFound, got {other:?}"),
        }
    }
}
