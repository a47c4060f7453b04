//! Serializers for compiled variables.
//!
//! Turns a compilation's variables and metadata into CSS text or an
//! equivalent structured stylesheet object, and writes them to disk.

mod css;
mod jss;
mod write;

pub use css::get_css;
pub use jss::get_jss;
pub use write::{write_css, write_json};
