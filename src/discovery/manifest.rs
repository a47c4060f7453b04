//! Project manifest (dstokens.yaml) parsing.
//!
//! The manifest defines the output directory, a shared media registry and
//! the list of themes to compile.

use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::compiler::CompileOptions;
use crate::error::{Result, TokenError};

/// Project manifest loaded from dstokens.yaml.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Manifest {
    /// Output directory for compiled themes.
    #[serde(default = "default_output")]
    pub output: PathBuf,

    /// Media registry shared by all themes: name -> condition.
    #[serde(default)]
    pub medias: IndexMap<String, String>,

    #[serde(default)]
    pub themes: Vec<ThemeConfig>,
}

fn default_output() -> PathBuf {
    PathBuf::from("dist")
}

impl Default for Manifest {
    fn default() -> Self {
        Self {
            output: default_output(),
            medias: IndexMap::new(),
            themes: vec![],
        }
    }
}

/// One theme entry of the manifest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThemeConfig {
    /// Output file stem.
    pub name: String,

    /// Token file, relative to the manifest.
    pub source: PathBuf,

    #[serde(default)]
    pub prefix: Option<String>,

    #[serde(default)]
    pub scope: Option<String>,

    /// Additions to (or overrides of) the shared media registry.
    #[serde(default)]
    pub medias: IndexMap<String, String>,
}

impl ThemeConfig {
    /// Compile options for this theme: its own prefix and scope, and the
    /// shared medias overlaid with the theme's.
    pub fn compile_options(&self, manifest: &Manifest) -> CompileOptions {
        let mut medias = manifest.medias.clone();
        for (name, query) in &self.medias {
            medias.insert(name.clone(), query.clone());
        }

        CompileOptions {
            prefix: self.prefix.clone(),
            scope: self.scope.clone(),
            medias,
        }
    }
}

impl Manifest {
    /// Load manifest from a dstokens.yaml file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| TokenError::Io {
            path: path.to_path_buf(),
            message: format!("Failed to read manifest: {}", e),
        })?;

        Self::parse(&content)
    }

    /// Parse manifest from YAML string.
    pub fn parse(content: &str) -> Result<Self> {
        // An empty document is null, not a mapping.
        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        serde_yaml::from_str(content).map_err(|e| TokenError::Parse {
            message: format!("Invalid manifest: {}", e),
            help: Some("Check dstokens.yaml syntax".to_string()),
        })
    }

    pub fn theme(&self, name: &str) -> Option<&ThemeConfig> {
        self.themes.iter().find(|t| t.name == name)
    }
}
