//! Utility functions for error handling
//!
//! This module provides utility functions to make error handling more convenient.

use std::fs;
use std::io;
use std::path::Path;

use crate::error::Result;

/// Safely open a file with rich error information
///
/// The returned error keeps the original [`io::ErrorKind`] and adds the path
/// and the reason the file was needed to its message.
///
/// # Arguments
/// * `path` - The path to the file to open
/// * `purpose` - Why the file is being opened (for error context)
pub fn safe_open_file(path: &Path, purpose: &str) -> Result<fs::File> {
    if path.is_dir() {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("Expected a file for {purpose}, found directory: {}", path.display()),
        )
        .into());
    }

    fs::File::open(path).map_err(|e| {
        let context = match e.kind() {
            io::ErrorKind::PermissionDenied => "Permission denied - check file permissions",
            io::ErrorKind::NotFound => "File not found",
            _ => "Failed to open file",
        };
        io::Error::new(
            e.kind(),
            format!("{context} for {purpose}: {} ({e})", path.display()),
        )
        .into()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ParquetDataError;

    #[test]
    fn test_safe_open_missing_file() {
        let err = safe_open_file(Path::new("/definitely/not/here.parquet"), "reading")
            .unwrap_err();
        match err {
            ParquetDataError::Io(e) => {
                assert_eq!(e.kind(), io::ErrorKind::NotFound);
                assert!(e.to_string().contains("here.parquet"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_safe_open_directory() {
        let dir = std::env::temp_dir();
        assert!(safe_open_file(&dir, "reading").is_err());
    }
}
