//! Token file loading.

use std::fs;
use std::path::Path;

use crate::error::{Result, TokenError};
use crate::types::Tokens;

/// Supported token file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenFormat {
    Yaml,
    Json,
}

impl TokenFormat {
    /// Detect the format from a file extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension()?.to_str()? {
            "yaml" | "yml" => Some(TokenFormat::Yaml),
            "json" => Some(TokenFormat::Json),
            _ => None,
        }
    }
}

/// Read and parse a token file, choosing YAML or JSON by extension.
pub fn load_tokens(path: &Path) -> Result<Tokens> {
    let format = TokenFormat::from_path(path).ok_or_else(|| TokenError::Parse {
        message: format!("Unsupported token file: {}", path.display()),
        help: Some("Token files must end in .yaml, .yml or .json".to_string()),
    })?;

    let content = fs::read_to_string(path).map_err(|e| TokenError::Io {
        path: path.to_path_buf(),
        message: format!("Failed to read tokens: {}", e),
    })?;

    tracing::debug!(path = %path.display(), ?format, "loading tokens");

    let parsed = match format {
        TokenFormat::Yaml => Tokens::from_yaml(&content),
        TokenFormat::Json => Tokens::from_json(&content),
    };

    parsed.map_err(|e| match e {
        TokenError::Parse { message, help } => TokenError::Parse {
            message: format!("{}: {}", path.display(), message),
            help,
        },
        other => other,
    })
}
