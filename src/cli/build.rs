//! Build command implementation.
//!
//! Compiles every theme in the manifest and writes, per theme:
//! `<name>.css`, `<name>.jss.json`, `<name>.refs.json` and `<name>.map.json`.

use std::fs;
use std::path::PathBuf;

use clap::Args;

use crate::compiler::{atomize, Compiled};
use crate::discovery::discover;
use crate::error::{Result, TokenError};
use crate::output::{display_path, plural, Printer};
use crate::render::{write_css, write_json};
use crate::validation::{check_name_collisions, validate_theme};

/// Compile every theme listed in dstokens.yaml
#[derive(Args, Debug)]
pub struct BuildArgs {
    /// Project directory or manifest file
    #[arg(default_value = ".")]
    pub path: PathBuf,

    /// Output directory (overrides the manifest)
    #[arg(long, short)]
    pub output: Option<PathBuf>,
}

pub fn run(args: BuildArgs, printer: &Printer) -> Result<Vec<PathBuf>> {
    let project = discover(&args.path)?;
    let output = args.output.clone().unwrap_or_else(|| project.output_dir());

    if project.manifest.themes.is_empty() {
        printer.warning("Warning", "manifest lists no themes");
        return Ok(vec![]);
    }

    if !output.exists() {
        fs::create_dir_all(&output).map_err(|e| TokenError::Io {
            path: output.clone(),
            message: format!("Failed to create output directory: {}", e),
        })?;
    }

    let mut compiled: Vec<(String, Compiled)> = Vec::new();
    let mut written = Vec::new();

    for theme in project.load_themes()? {
        let name = theme.config.name.clone();
        printer.status(
            "Compiling",
            &format!(
                "{} {}",
                name,
                printer.dim(&format!("({})", display_path(&theme.config.source)))
            ),
        );

        let options = theme.config.compile_options(&project.manifest);
        let diagnostics = validate_theme(&theme.tokens, &options);
        for diagnostic in diagnostics.iter() {
            printer.diagnostic(&diagnostic.clone().with_subject(subject(&name, diagnostic)));
        }
        diagnostics.into_result()?;

        let result = atomize(&theme.tokens, &options)?;
        written.extend(write_theme(&name, &result, &output)?);
        compiled.push((name, result));
    }

    let themes: Vec<(&str, &Compiled)> = compiled.iter().map(|(n, c)| (n.as_str(), c)).collect();
    for diagnostic in check_name_collisions(&themes).iter() {
        printer.diagnostic(diagnostic);
    }

    printer.success(
        "Finished",
        &format!(
            "{} to {}",
            plural(compiled.len(), "theme", "themes"),
            display_path(&output)
        ),
    );

    Ok(written)
}

/// `theme` or `theme: token.path`.
fn subject(theme: &str, diagnostic: &crate::validation::Diagnostic) -> String {
    match &diagnostic.subject {
        Some(path) => format!("{}: {}", theme, path),
        None => theme.to_string(),
    }
}

fn write_theme(name: &str, compiled: &Compiled, output: &std::path::Path) -> Result<Vec<PathBuf>> {
    let css = output.join(format!("{}.css", name));
    write_css(&compiled.css(), &css)?;

    let jss = output.join(format!("{}.jss.json", name));
    write_json(&compiled.jss(), &jss)?;

    let refs = output.join(format!("{}.refs.json", name));
    write_json(&compiled.refs, &refs)?;

    let map = output.join(format!("{}.map.json", name));
    match &compiled.variable_map {
        Some(variable_map) => write_json(variable_map, &map)?,
        None => write_json(&serde_json::json!({}), &map)?,
    }

    Ok(vec![css, jss, refs, map])
}
