//! Diagnostic types for validation results.

use std::fmt;

use crate::error::TokenError;

/// Severity level for a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Warning => write!(f, "warning"),
            Severity::Error => write!(f, "error"),
        }
    }
}

/// A single validation diagnostic.
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    pub severity: Severity,
    /// Machine-readable code, e.g. `dstokens::validate::unknown-media`.
    pub code: String,
    pub message: String,
    /// Theme or token path the diagnostic is about.
    pub subject: Option<String>,
    pub help: Option<String>,
}

impl Diagnostic {
    pub fn error(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(Severity::Error, code, message)
    }

    pub fn warning(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(Severity::Warning, code, message)
    }

    fn new(severity: Severity, code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            severity,
            code: code.into(),
            message: message.into(),
            subject: None,
            help: None,
        }
    }

    pub fn with_subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = Some(subject.into());
        self
    }

    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}]: ", self.severity, self.code)?;
        if let Some(subject) = &self.subject {
            write!(f, "{}: ", subject)?;
        }
        f.write_str(&self.message)
    }
}

impl From<Diagnostic> for TokenError {
    fn from(d: Diagnostic) -> Self {
        TokenError::Validation {
            message: match d.subject {
                Some(subject) => format!("{}: {}", subject, d.message),
                None => d.message,
            },
            help: d.help,
        }
    }
}

/// Collects diagnostics from validation checks.
#[derive(Debug, Clone, Default)]
pub struct ValidationResult {
    diagnostics: Vec<Diagnostic>,
}

impl ValidationResult {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(|d| d.severity == Severity::Error)
    }

    pub fn has_warnings(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|d| d.severity == Severity::Warning)
    }

    pub fn error_count(&self) -> usize {
        self.count(Severity::Error)
    }

    pub fn warning_count(&self) -> usize {
        self.count(Severity::Warning)
    }

    fn count(&self, severity: Severity) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == severity)
            .count()
    }

    /// True when there are no diagnostics at all.
    pub fn is_ok(&self) -> bool {
        self.diagnostics.is_empty()
    }

    pub fn merge(&mut self, other: ValidationResult) {
        self.diagnostics.extend(other.diagnostics);
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter()
    }

    /// Turn the first error into a `TokenError`, if any.
    pub fn into_result(self) -> crate::error::Result<Vec<Diagnostic>> {
        match self
            .diagnostics
            .iter()
            .position(|d| d.severity == Severity::Error)
        {
            Some(index) => Err(self.diagnostics[index].clone().into()),
            None => Ok(self.diagnostics),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_result() {
        let result = ValidationResult::new();
        assert!(result.is_ok());
        assert!(!result.has_errors());
        assert!(!result.has_warnings());
        assert_eq!(result.error_count(), 0);
    }

    #[test]
    fn test_counts_and_merge() {
        let mut a = ValidationResult::new();
        a.push(Diagnostic::error("dstokens::a", "bad prefix"));

        let mut b = ValidationResult::new();
        b.push(Diagnostic::warning("dstokens::b", "unused media"));

        a.merge(b);
        assert_eq!(a.error_count(), 1);
        assert_eq!(a.warning_count(), 1);
    }

    #[test]
    fn test_display() {
        let d = Diagnostic::warning("dstokens::validate::unused-media", "'print' is never used")
            .with_subject("light");
        assert_eq!(
            d.to_string(),
            "warning[dstokens::validate::unused-media]: light: 'print' is never used"
        );
    }

    #[test]
    fn test_into_result() {
        let mut result = ValidationResult::new();
        result.push(Diagnostic::warning("dstokens::w", "minor"));
        assert_eq!(result.clone().into_result().unwrap().len(), 1);

        result.push(
            Diagnostic::error("dstokens::e", "broken")
                .with_subject("dark")
                .with_help("fix it"),
        );
        let err = result.into_result().unwrap_err();
        assert!(
            matches!(&err, TokenError::Validation { message, help } if message == "dark: broken" && help.as_deref() == Some("fix it"))
        );
    }
}
