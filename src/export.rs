//! CSV export and reload of the generated tables.

use std::fs::{self, File};
use std::path::{Path, PathBuf};

use anyhow::Context;
use polars::prelude::*;

/// Write a DataFrame to `<dir>/<file_name>` as CSV with a header row,
/// creating the directory if needed. Returns the written path.
pub fn write_csv(df: &mut DataFrame, dir: &Path, file_name: &str) -> crate::Result<PathBuf> {
    fs::create_dir_all(dir)
        .with_context(|| format!("failed to create output directory {}", dir.display()))?;

    let path = dir.join(file_name);
    let mut file =
        File::create(&path).with_context(|| format!("failed to create {}", path.display()))?;
    CsvWriter::new(&mut file)
        .include_header(true)
        .finish(df)
        .with_context(|| format!("failed to write {}", path.display()))?;
    Ok(path)
}

/// Load a CSV with a header row into a DataFrame.
pub fn read_csv(path: &Path) -> crate::Result<DataFrame> {
    CsvReader::from_path(path)
        .with_context(|| format!("failed to open {}", path.display()))?
        .has_header(true)
        .finish()
        .with_context(|| format!("failed to parse {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_write_and_read_roundtrip() {
        let dir = tempdir().unwrap();
        let mut df = DataFrame::new(vec![
            Series::new("id", vec!["a", "b"]),
            Series::new("value", vec![1i64, 2]),
        ])
        .unwrap();

        let path = write_csv(&mut df, dir.path(), "test.csv").unwrap();
        assert!(path.exists());

        let loaded = read_csv(&path).unwrap();
        assert_eq!(loaded.height(), 2);
        assert_eq!(loaded.width(), 2);
    }

    #[test]
    fn test_write_creates_nested_directory() {
        let dir = tempdir().unwrap();
        let nested = dir.path().join("a/b");
        let mut df = DataFrame::new(vec![Series::new("x", vec![1i64])]).unwrap();
        let path = write_csv(&mut df, &nested, "out.csv").unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_read_missing_file_errors() {
        let err = read_csv(Path::new("/nonexistent/nope.csv")).unwrap_err();
        assert!(err.to_string().contains("nope.csv"));
    }
}
