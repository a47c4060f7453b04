//! Project discovery: manifest lookup and token loading.
//!
//! # Example
//!
//! ```ignore
//! use dstokens::discovery::discover;
//!
//! let project = discover("./design")?;
//! for theme in project.load_themes()? {
//!     println!("{}: {} tokens", theme.config.name, theme.tokens.len());
//! }
//! ```

mod loader;
mod manifest;

use std::path::{Path, PathBuf};

use crate::error::{Result, TokenError};
use crate::types::Tokens;

pub use loader::{load_tokens, TokenFormat};
pub use manifest::{Manifest, ThemeConfig};

/// The name of the manifest file.
pub const MANIFEST_FILENAME: &str = "dstokens.yaml";

/// A project rooted at the directory holding its manifest.
#[derive(Debug)]
pub struct Project {
    pub root: PathBuf,
    pub manifest: Manifest,
}

/// A theme with its token tree loaded.
#[derive(Debug)]
pub struct LoadedTheme {
    pub config: ThemeConfig,
    pub tokens: Tokens,
}

impl Project {
    /// Output directory, resolved against the project root.
    pub fn output_dir(&self) -> PathBuf {
        self.root.join(&self.manifest.output)
    }

    /// Token file of a theme, resolved against the project root.
    pub fn source_path(&self, theme: &ThemeConfig) -> PathBuf {
        self.root.join(&theme.source)
    }

    /// Load the token files of every theme, in manifest order.
    pub fn load_themes(&self) -> Result<Vec<LoadedTheme>> {
        self.manifest
            .themes
            .iter()
            .map(|config| -> Result<LoadedTheme> {
                Ok(LoadedTheme {
                    config: config.clone(),
                    tokens: load_tokens(&self.source_path(config))?,
                })
            })
            .collect()
    }
}

/// Find and load the manifest in `root`.
///
/// `root` may also be the manifest file itself.
pub fn discover(root: impl AsRef<Path>) -> Result<Project> {
    let root = root.as_ref();
    let (root, manifest_path) = if root.is_file() {
        let dir = root
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        (dir, root.to_path_buf())
    } else {
        (root.to_path_buf(), root.join(MANIFEST_FILENAME))
    };

    if !manifest_path.exists() {
        return Err(TokenError::Io {
            path: manifest_path,
            message: "No manifest found".to_string(),
        });
    }

    let manifest = Manifest::load(&manifest_path)?;
    tracing::debug!(
        manifest = %manifest_path.display(),
        themes = manifest.themes.len(),
        "loaded manifest"
    );

    Ok(Project { root, manifest })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_discover_without_manifest() {
        let dir = tempdir().unwrap();
        assert!(matches!(discover(dir.path()), Err(TokenError::Io { .. })));
    }

    #[test]
    fn test_discover_with_manifest() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join(MANIFEST_FILENAME),
            "output: build\nthemes:\n  - name: light\n    source: tokens/light.yaml\n",
        )
        .unwrap();
        fs::create_dir_all(dir.path().join("tokens")).unwrap();
        fs::write(dir.path().join("tokens/light.yaml"), "bg: white\n").unwrap();

        let project = discover(dir.path()).unwrap();
        assert_eq!(project.output_dir(), dir.path().join("build"));

        let themes = project.load_themes().unwrap();
        assert_eq!(themes.len(), 1);
        assert_eq!(themes[0].config.name, "light");
        assert_eq!(themes[0].tokens.len(), 1);
    }

    #[test]
    fn test_discover_from_manifest_path() {
        let dir = tempdir().unwrap();
        let manifest = dir.path().join(MANIFEST_FILENAME);
        fs::write(&manifest, "").unwrap();

        let project = discover(&manifest).unwrap();
        assert_eq!(project.root, dir.path());
        assert_eq!(project.output_dir(), dir.path().join("dist"));
    }

    #[test]
    fn test_missing_theme_source() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join(MANIFEST_FILENAME),
            "themes:\n  - name: light\n    source: light.yaml\n",
        )
        .unwrap();

        let project = discover(dir.path()).unwrap();
        assert!(matches!(project.load_themes(), Err(TokenError::Io { .. })));
    }
}
