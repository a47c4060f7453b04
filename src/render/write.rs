//! Output files for compiled themes.

use std::fs;
use std::path::Path;

use serde::Serialize;

use crate::error::{Result, TokenError};

/// Write CSS text to a file.
pub fn write_css(css: &str, path: &Path) -> Result<()> {
    fs::write(path, css).map_err(|e| TokenError::Io {
        path: path.to_path_buf(),
        message: format!("Failed to write CSS: {}", e),
    })
}

/// Write any serializable value as pretty-printed JSON.
pub fn write_json<T: Serialize + ?Sized>(value: &T, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(value).map_err(|e| TokenError::Build {
        message: format!("Failed to serialize {}: {}", path.display(), e),
        help: None,
    })?;
    fs::write(path, json).map_err(|e| TokenError::Io {
        path: path.to_path_buf(),
        message: format!("Failed to write JSON: {}", e),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_write_css() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("theme.css");
        write_css(":root{}", &path).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), ":root{}");
    }

    #[test]
    fn test_write_json() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("map.json");
        write_json(&serde_json::json!({"--a0": "--x"}), &path).unwrap();

        let parsed: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(parsed["--a0"], "--x");
    }

    #[test]
    fn test_write_to_missing_dir_fails() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("missing").join("theme.css");
        assert!(matches!(write_css("", &path), Err(TokenError::Io { .. })));
    }
}
