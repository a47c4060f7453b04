//! Validate command: run every check and a trial compilation, write nothing.

use std::path::PathBuf;

use clap::Args;
use miette::Diagnostic as _;

use crate::compiler::{atomize, Compiled};
use crate::discovery::discover;
use crate::error::{Result, TokenError};
use crate::output::{display_path, plural, Printer};
use crate::validation::{check_name_collisions, validate_theme, Diagnostic, ValidationResult};

/// Check themes without writing output
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Project directory or manifest file
    #[arg(default_value = ".")]
    pub path: PathBuf,

    /// Treat warnings as errors
    #[arg(long)]
    pub strict: bool,
}

/// Collect diagnostics for every theme in the project.
pub fn check_project(args: &ValidateArgs) -> Result<ValidationResult> {
    let project = discover(&args.path)?;
    let mut result = ValidationResult::new();
    let mut compiled: Vec<(String, Compiled)> = Vec::new();

    for theme in project.load_themes()? {
        let name = theme.config.name.clone();
        let options = theme.config.compile_options(&project.manifest);

        let checks = validate_theme(&theme.tokens, &options);
        let clean = !checks.has_errors();
        for diagnostic in checks.iter() {
            let subject = match &diagnostic.subject {
                Some(path) => format!("{}: {}", name, path),
                None => name.clone(),
            };
            result.push(diagnostic.clone().with_subject(subject));
        }

        // Compile errors (bad ranges, unknown units, ...) only show up here.
        if clean {
            match atomize(&theme.tokens, &options) {
                Ok(c) => compiled.push((name, c)),
                Err(e) => result.push(compile_diagnostic(&name, &e)),
            }
        }
    }

    let themes: Vec<(&str, &Compiled)> = compiled.iter().map(|(n, c)| (n.as_str(), c)).collect();
    result.merge(check_name_collisions(&themes));

    Ok(result)
}

fn compile_diagnostic(theme: &str, error: &TokenError) -> Diagnostic {
    let code = error
        .code()
        .map(|c| c.to_string())
        .unwrap_or_else(|| "dstokens::compile".to_string());
    let diagnostic = Diagnostic::error(code, error.to_string()).with_subject(theme);
    match error.help() {
        Some(help) => diagnostic.with_help(help.to_string()),
        None => diagnostic,
    }
}

pub fn run(args: ValidateArgs, printer: &Printer) -> Result<()> {
    printer.status("Validating", &display_path(&args.path));

    let result = check_project(&args)?;
    for diagnostic in result.iter() {
        printer.diagnostic(diagnostic);
    }

    let errors = result.error_count();
    let warnings = result.warning_count();
    let failed = errors > 0 || (args.strict && warnings > 0);

    let summary = format!(
        "{}, {}",
        plural(errors, "error", "errors"),
        plural(warnings, "warning", "warnings")
    );

    if failed {
        printer.error("Failed", &summary);
        return Err(TokenError::Validation {
            message: format!("Validation failed with {}", summary),
            help: None,
        });
    }

    printer.success("Finished", &summary);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::discovery::MANIFEST_FILENAME;
    use std::fs;
    use tempfile::tempdir;

    fn project(manifest: &str, files: &[(&str, &str)]) -> tempfile::TempDir {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join(MANIFEST_FILENAME), manifest).unwrap();
        for (name, content) in files {
            fs::write(dir.path().join(name), content).unwrap();
        }
        dir
    }

    fn args(dir: &tempfile::TempDir, strict: bool) -> ValidateArgs {
        ValidateArgs {
            path: dir.path().to_path_buf(),
            strict,
        }
    }

    #[test]
    fn test_valid_project() {
        let dir = project(
            "themes:\n  - name: light\n    source: light.yaml\n",
            &[("light.yaml", "bg: white\n")],
        );
        assert!(check_project(&args(&dir, false)).unwrap().is_ok());
        run(args(&dir, true), &Printer::new()).unwrap();
    }

    #[test]
    fn test_compile_errors_are_reported() {
        let dir = project(
            "themes:\n  - name: light\n    source: light.yaml\n",
            &[("light.yaml", "units:\n  pt: [0, 1, 2]\n")],
        );

        let result = check_project(&args(&dir, false)).unwrap();
        let diagnostic = result.iter().next().unwrap();
        assert_eq!(diagnostic.code, "dstokens::unknown_unit");
        assert_eq!(diagnostic.subject.as_deref(), Some("light"));
        assert!(run(args(&dir, false), &Printer::new()).is_err());
    }

    #[test]
    fn test_collisions_are_warnings() {
        let dir = project(
            "themes:\n  - name: light\n    source: light.yaml\n  - name: dark\n    source: dark.yaml\n",
            &[("light.yaml", "bg: white\n"), ("dark.yaml", "fg: black\n")],
        );

        let result = check_project(&args(&dir, false)).unwrap();
        assert_eq!(result.error_count(), 0);
        assert_eq!(result.warning_count(), 1);

        run(args(&dir, false), &Printer::new()).unwrap();
        assert!(run(args(&dir, true), &Printer::new()).is_err());
    }

    #[test]
    fn test_unknown_media_subject_names_theme() {
        let dir = project(
            "themes:\n  - name: light\n    source: light.yaml\n",
            &[("light.yaml", "md: [{tablet: 20px}, 16px]\n")],
        );

        let result = check_project(&args(&dir, false)).unwrap();
        assert_eq!(result.error_count(), 1);
        let diagnostic = result.iter().next().unwrap();
        assert_eq!(diagnostic.subject.as_deref(), Some("light: md"));
    }
}
