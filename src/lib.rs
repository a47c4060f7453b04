//! dstokens - Design token to CSS custom property compiler
//!
//! Turns a nested tree of design tokens into minified CSS custom properties,
//! media-partitioned overrides, `@property` registrations and a reference
//! tree of `var()` expressions that mirrors the input.

pub mod cli;
pub mod compiler;
pub mod discovery;
pub mod error;
pub mod output;
pub mod render;
pub mod types;
pub mod validation;

pub use compiler::{
    atomize, index_to_letters, minify_variable_name, resolve_reference, CompileOptions, Compiled,
    Metadata, NameMap, RefTree, Reference, VarExpr, Variables,
};
pub use discovery::{discover, load_tokens, Manifest, Project, ThemeConfig};
pub use error::{Result, TokenError};
pub use render::{get_css, get_jss, write_css, write_json};
pub use types::{
    create_property_metadata, expand_color, expand_unit_tuple, expand_units, format_oklch,
    infer_syntax, is_computationally_independent, oklch_to_rgb, parse_oklch, rgb_to_oklch, Atom,
    Oklch, PropertyMetadata, Rgb, ShadeScale, Syntax, Token, Tokens, UnitRange, UnitType,
};
pub use validation::{validate_identifier, validate_theme, Diagnostic, Severity, ValidationResult};
