//! Compile command: one token file, CSS to stdout.

use std::path::PathBuf;

use clap::{Args, ValueEnum};

use crate::compiler::{atomize, CompileOptions};
use crate::discovery::load_tokens;
use crate::error::Result;
use crate::output::{display_path, plural, Printer};
use crate::validation::validate_identifier;

/// Compile a single token file and print its CSS
#[derive(Args, Debug)]
pub struct CompileArgs {
    /// Token file (.yaml, .yml or .json)
    pub file: PathBuf,

    /// Prefix for original property paths
    #[arg(long)]
    pub prefix: Option<String>,

    /// Prefix for minified property names
    #[arg(long)]
    pub scope: Option<String>,

    /// Media declaration, e.g. --media 'desktop=(min-width: 1024px)'
    #[arg(long = "media", value_name = "NAME=QUERY", value_parser = parse_media)]
    pub medias: Vec<(String, String)>,

    /// Output format
    #[arg(long, value_enum, default_value_t = Format::Css)]
    pub format: Format,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Format {
    /// CSS text
    Css,
    /// Structured stylesheet object
    Jss,
    /// Reference tree
    Refs,
}

fn parse_media(s: &str) -> std::result::Result<(String, String), String> {
    let (name, query) = s
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=QUERY, got '{}'", s))?;
    let (name, query) = (name.trim(), query.trim());
    if name.is_empty() || query.is_empty() {
        return Err(format!("expected NAME=QUERY, got '{}'", s));
    }
    Ok((name.to_string(), query.to_string()))
}

impl CompileArgs {
    fn options(&self) -> Result<CompileOptions> {
        let mut options = CompileOptions::new();
        if let Some(prefix) = &self.prefix {
            validate_identifier(prefix)?;
            options = options.with_prefix(prefix.as_str());
        }
        if let Some(scope) = &self.scope {
            validate_identifier(scope)?;
            options = options.with_scope(scope.as_str());
        }
        for (name, query) in &self.medias {
            options = options.with_media(name.as_str(), query.as_str());
        }
        Ok(options)
    }
}

/// Compile the file and return the rendered output.
pub fn compile_file(args: &CompileArgs, printer: &Printer) -> Result<String> {
    printer.status("Compiling", &display_path(&args.file));

    let tokens = load_tokens(&args.file)?;
    let compiled = atomize(&tokens, &args.options()?)?;

    let count = compiled.variable_map.as_ref().map_or(0, |map| map.len());
    printer.success("Finished", &plural(count, "property", "properties"));

    let output = match args.format {
        Format::Css => compiled.css(),
        Format::Jss => pretty(&compiled.jss())?,
        Format::Refs => pretty(&compiled.refs)?,
    };
    Ok(output)
}

fn pretty<T: serde::Serialize>(value: &T) -> Result<String> {
    serde_json::to_string_pretty(value).map_err(|e| crate::error::TokenError::Build {
        message: format!("Failed to serialize output: {}", e),
        help: None,
    })
}

pub fn run(args: CompileArgs, printer: &Printer) -> Result<()> {
    let output = compile_file(&args, printer)?;
    println!("{}", output);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TokenError;
    use std::fs;
    use tempfile::tempdir;

    fn args(file: PathBuf) -> CompileArgs {
        CompileArgs {
            file,
            prefix: None,
            scope: None,
            medias: vec![],
            format: Format::Css,
        }
    }

    #[test]
    fn test_parse_media() {
        assert_eq!(
            parse_media("desktop=(min-width: 1024px)").unwrap(),
            ("desktop".to_string(), "(min-width: 1024px)".to_string())
        );
        assert!(parse_media("desktop").is_err());
        assert!(parse_media("=print").is_err());
    }

    #[test]
    fn test_compile_css() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("tokens.yaml");
        fs::write(&file, "spacing:\n  md: [{desktop: 24px}, 16px]\n").unwrap();

        let mut args = args(file);
        args.medias = vec![("desktop".to_string(), "(min-width: 1024px)".to_string())];

        let css = compile_file(&args, &Printer::new()).unwrap();
        assert_eq!(
            css,
            ":root{--a0:16px;}@media (min-width: 1024px){:root{--a0:24px;}}"
        );
    }

    #[test]
    fn test_compile_refs() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("tokens.json");
        fs::write(&file, r#"{"bg": "white"}"#).unwrap();

        let mut args = args(file);
        args.scope = Some("t".to_string());
        args.format = Format::Refs;

        let refs: serde_json::Value =
            serde_json::from_str(&compile_file(&args, &Printer::new()).unwrap()).unwrap();
        assert_eq!(refs, serde_json::json!({"bg": "var(--t0, white)"}));
    }

    #[test]
    fn test_invalid_prefix_is_rejected() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("tokens.yaml");
        fs::write(&file, "bg: white\n").unwrap();

        let mut args = args(file);
        args.prefix = Some("not valid".to_string());
        assert!(matches!(
            compile_file(&args, &Printer::new()),
            Err(TokenError::Validation { .. })
        ));
    }
}
