use miette::Diagnostic;
use thiserror::Error;

/// Main error type for dstokens operations
#[derive(Error, Diagnostic, Debug)]
pub enum TokenError {
    #[error("IO error with {path}: {message}")]
    #[diagnostic(code(dstokens::io))]
    Io {
        path: std::path::PathBuf,
        message: String,
    },

    #[error("Parse error: {message}")]
    #[diagnostic(code(dstokens::parse))]
    Parse {
        message: String,
        #[help]
        help: Option<String>,
    },

    #[error("Invalid OKLCH colour: {input}")]
    #[diagnostic(
        code(dstokens::format),
        help("Use oklch(<L>[%] <C> <H>), e.g. oklch(62.8% 0.2577 29.23)")
    )]
    Format { input: String },

    #[error("Cannot derive shades from {input}: lightness {lightness}% is outside 1%..=99%")]
    #[diagnostic(
        code(dstokens::shade_base),
        help("Palette base colours need room for lighter and darker shades on both sides")
    )]
    ShadeBase { input: String, lightness: f64 },

    #[error("Invalid unit range [{from}, {step}, {to}]: {reason}")]
    #[diagnostic(code(dstokens::range))]
    Range {
        from: f64,
        step: f64,
        to: f64,
        reason: &'static str,
    },

    #[error("Unknown unit type: {key}")]
    #[diagnostic(
        code(dstokens::unknown_unit),
        help("Supported units: rem, em, px, percentage, vh, vw, vmin, vmax, ch, ex")
    )]
    UnknownUnit { key: String },

    #[error("No value or fallback available for {name}")]
    #[diagnostic(code(dstokens::missing_default))]
    MissingDefault { name: String },

    #[error("Unknown media '{name}' referenced by {path}")]
    #[diagnostic(
        code(dstokens::unknown_media),
        help("Declare the media name in the media registry before using it")
    )]
    UnknownMedia { name: String, path: String },

    #[error("Build error: {message}")]
    #[diagnostic(code(dstokens::build))]
    Build {
        message: String,
        #[help]
        help: Option<String>,
    },

    #[error("Validation error: {message}")]
    #[diagnostic(code(dstokens::validate))]
    Validation {
        message: String,
        #[help]
        help: Option<String>,
    },
}

pub type Result<T> = std::result::Result<T, TokenError>;
