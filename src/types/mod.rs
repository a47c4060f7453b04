//! Core value types: token trees, colours, unit scales and property syntax.

mod colour;
mod shades;
mod syntax;
mod token;
mod units;

pub use colour::{format_oklch, normalize_hue, oklch_to_rgb, parse_oklch, rgb_to_oklch, Oklch, Rgb};
pub use shades::{expand_color, ShadeScale, SHADE_NAMES};
pub use syntax::{
    create_property_metadata, infer_syntax, is_computationally_independent, PropertyMetadata,
    Syntax,
};
pub use token::{Atom, Token, Tokens};
pub use units::{expand_unit_tuple, expand_units, UnitRange, UnitType};
