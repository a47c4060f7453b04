//! Status lines and diagnostics printed by the `dstokens` commands.
//!
//! Everything here writes to stderr so that `dstokens compile` can stream
//! CSS or JSON on stdout.

use std::io::{self, IsTerminal, Write};
use std::path::Path;

use crate::validation::{Diagnostic, Severity};

const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const DIM: &str = "\x1b[2m";
const RED: &str = "\x1b[31m";
const GREEN: &str = "\x1b[32m";
const YELLOW: &str = "\x1b[33m";
const CYAN: &str = "\x1b[36m";

/// Verbs are right-aligned to this column, e.g. `   Compiling light`.
const VERB_WIDTH: usize = 12;

/// Writes command progress and validation diagnostics.
///
/// ANSI colour is used only when stderr is a terminal.
pub struct Printer {
    colour: bool,
}

impl Default for Printer {
    fn default() -> Self {
        Self::new()
    }
}

impl Printer {
    pub fn new() -> Self {
        Self {
            colour: io::stderr().is_terminal(),
        }
    }

    /// Work in progress: `Compiling`, `Building`, `Validating`.
    pub fn status(&self, verb: &str, message: &str) {
        self.line(GREEN, verb, message);
    }

    /// A command finished: `Finished`, `Wrote`.
    pub fn success(&self, verb: &str, message: &str) {
        self.line(GREEN, verb, message);
    }

    pub fn warning(&self, verb: &str, message: &str) {
        self.line(YELLOW, verb, message);
    }

    pub fn error(&self, verb: &str, message: &str) {
        self.line(RED, verb, message);
    }

    /// De-emphasized text, such as the source path after a theme name.
    pub fn dim(&self, text: &str) -> String {
        self.paint(&[DIM], text)
    }

    /// One diagnostic, followed by its help text when present:
    ///
    /// ```text
    /// warning[dstokens::validate::unused-media]: light: Media 'print' is declared but never used
    ///   help: ...
    /// ```
    pub fn diagnostic(&self, diagnostic: &Diagnostic) {
        let label = format!("{}[{}]", diagnostic.severity, diagnostic.code);
        let label = match diagnostic.severity {
            Severity::Error => self.paint(&[BOLD, RED], &label),
            Severity::Warning => self.paint(&[BOLD, YELLOW], &label),
        };
        let subject = match diagnostic.subject.as_deref() {
            Some(subject) => format!("{}: ", self.paint(&[CYAN], subject)),
            None => String::new(),
        };

        let mut stderr = io::stderr().lock();
        let _ = writeln!(stderr, "{}: {}{}", label, subject, diagnostic.message);
        if let Some(help) = &diagnostic.help {
            let _ = writeln!(stderr, "  {} {}", self.dim("help:"), help);
        }
    }

    fn paint(&self, codes: &[&str], text: &str) -> String {
        if self.colour {
            format!("{}{}{}", codes.concat(), text, RESET)
        } else {
            text.to_string()
        }
    }

    fn line(&self, colour: &str, verb: &str, message: &str) {
        let verb = self.paint(&[BOLD, colour], &format!("{:>VERB_WIDTH$}", verb));
        let _ = writeln!(io::stderr().lock(), "{} {}", verb, message);
    }
}

/// `plural(1, "theme", "themes")` is "1 theme"; any other count takes the
/// plural form.
pub fn plural(n: usize, singular: &str, plural: &str) -> String {
    format!("{} {}", n, if n == 1 { singular } else { plural })
}

/// `path` relative to the working directory when it lies below it.
pub fn display_path(path: &Path) -> String {
    let relative = std::env::current_dir()
        .ok()
        .and_then(|cwd| path.strip_prefix(cwd).ok().map(Path::to_path_buf));

    match relative {
        Some(relative) if relative.as_os_str().is_empty() => ".".to_string(),
        Some(relative) => relative.display().to_string(),
        None => path.display().to_string(),
    }
}
