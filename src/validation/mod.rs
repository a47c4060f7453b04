//! Validation for token trees and compile options.
//!
//! The compiler itself only fails on the first problem it meets. These
//! checks collect everything at once, and add warnings for things the
//! compiler accepts but that are likely mistakes. Used by `dstokens validate`
//! and before every `dstokens build`.

mod checks;
mod warning;

pub use checks::{
    check_identifiers, check_media_refs, check_name_collisions, check_path_collisions,
    is_valid_identifier, MAX_IDENTIFIER_LEN,
};
pub use warning::{Diagnostic, Severity, ValidationResult};

use crate::compiler::CompileOptions;
use crate::error::{Result, TokenError};
use crate::types::Tokens;

/// Run all per-theme checks.
pub fn validate_theme(tokens: &Tokens, options: &CompileOptions) -> ValidationResult {
    let mut result = ValidationResult::new();

    result.merge(check_identifiers(options));
    result.merge(check_media_refs(tokens, options));
    result.merge(check_path_collisions(tokens));

    result
}

/// Reject a value that is not a usable CSS identifier.
pub fn validate_identifier(value: &str) -> Result<()> {
    if is_valid_identifier(value) {
        Ok(())
    } else {
        Err(TokenError::Validation {
            message: format!("Invalid CSS identifier: '{}'", value),
            help: Some("Use letters, digits, '_' or '-' (at most 255 characters)".to_string()),
        })
    }
}
