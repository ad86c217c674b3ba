// Directory layout of a product instance
//
//   <product instance>/seam_seriesNNNN/metadata.json
//   <product instance>/seam_seriesNNNN/seamMMMM/metadata.json
//   <product instance>/seam_seriesNNNN/seamMMMM/<resultType>.result

use crate::core::constants::{RESULT_EXTENSION, SEAM_PREFIX, SEAM_SERIES_PREFIX};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

pub fn seam_series_dir_name(series: u32) -> String {
    format!("{}{:04}", SEAM_SERIES_PREFIX, series)
}

pub fn seam_dir_name(seam: u32) -> String {
    format!("{}{:04}", SEAM_PREFIX, seam)
}

pub fn seam_series_dir(root: &Path, series: u32) -> PathBuf {
    root.join(seam_series_dir_name(series))
}

pub fn seam_dir(root: &Path, series: u32, seam: u32) -> PathBuf {
    seam_series_dir(root, series).join(seam_dir_name(seam))
}

pub fn result_file_name(result_type: i32) -> String {
    format!("{}.{}", result_type, RESULT_EXTENSION)
}

/// `prefix` followed by decimal digits only, e.g. `seam0003` -> 3.
pub fn parse_numbered(name: &str, prefix: &str) -> Option<u32> {
    let digits = name.strip_prefix(prefix)?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

fn entries(dir: &Path) -> Vec<fs::DirEntry> {
    match fs::read_dir(dir) {
        Ok(iter) => iter.filter_map(|e| e.ok()).collect(),
        Err(e) => {
            debug!("Cannot list {}: {}", dir.display(), e);
            Vec::new()
        }
    }
}

fn numbered_dirs(dir: &Path, prefix: &str) -> Vec<(u32, PathBuf)> {
    let mut found: Vec<(u32, PathBuf)> = entries(dir)
        .into_iter()
        .filter(|e| e.file_type().map(|t| t.is_dir()).unwrap_or(false))
        .filter_map(|e| {
            let number = parse_numbered(e.file_name().to_str()?, prefix)?;
            Some((number, e.path()))
        })
        .collect();
    found.sort();
    found
}

pub fn list_seam_series_dirs(root: &Path) -> Vec<(u32, PathBuf)> {
    numbered_dirs(root, SEAM_SERIES_PREFIX)
}

pub fn list_seam_dirs(series_dir: &Path) -> Vec<(u32, PathBuf)> {
    numbered_dirs(series_dir, SEAM_PREFIX)
}

/// Regular files in `dir` whose extension is `extension`, sorted by name.
pub fn list_result_files(dir: &Path, extension: &str) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = entries(dir)
        .into_iter()
        .filter(|e| e.file_type().map(|t| t.is_file()).unwrap_or(false))
        .map(|e| e.path())
        .filter(|p| p.extension().and_then(|x| x.to_str()) == Some(extension))
        .collect();
    files.sort();
    files
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names() {
        let root = Path::new("/data/instance");
        assert_eq!(
            seam_dir(root, 1, 23),
            PathBuf::from("/data/instance/seam_series0001/seam0023")
        );
        assert_eq!(result_file_name(507), "507.result");
    }

    #[test]
    fn test_parse_numbered() {
        assert_eq!(parse_numbered("seam0003", SEAM_PREFIX), Some(3));
        assert_eq!(parse_numbered("seam_series0012", SEAM_SERIES_PREFIX), Some(12));
        assert_eq!(parse_numbered("seam_series0012", SEAM_PREFIX), None);
        assert_eq!(parse_numbered("seam", SEAM_PREFIX), None);
        assert_eq!(parse_numbered("seam00x1", SEAM_PREFIX), None);
        assert_eq!(parse_numbered("video0001", SEAM_PREFIX), None);
    }

    #[test]
    fn test_listing() {
        let dir = tempfile::tempdir().unwrap();
        let series = dir.path().join("seam_series0000");
        fs::create_dir_all(series.join("seam0002")).unwrap();
        fs::create_dir_all(series.join("seam0001")).unwrap();
        fs::create_dir_all(series.join("seamless")).unwrap();
        fs::write(series.join("seam0003"), b"not a dir").unwrap();

        let seams = list_seam_dirs(&series);
        assert_eq!(
            seams.iter().map(|(n, _)| *n).collect::<Vec<_>>(),
            vec![1, 2]
        );

        let seam = series.join("seam0001");
        fs::write(seam.join("5.result"), b"").unwrap();
        fs::write(seam.join("12.result"), b"").unwrap();
        fs::write(seam.join("metadata.json"), b"{}").unwrap();
        fs::create_dir(seam.join("9.result")).unwrap();
        let files = list_result_files(&seam, RESULT_EXTENSION);
        assert_eq!(files.len(), 2);

        assert_eq!(list_seam_series_dirs(dir.path()).len(), 1);
        assert!(list_result_files(&dir.path().join("missing"), RESULT_EXTENSION).is_empty());
    }
}
