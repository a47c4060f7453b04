//! `@property` syntax inference for literal CSS values.

use std::collections::HashSet;
use std::fmt;

use once_cell::sync::Lazy;
use serde::Serialize;

/// A CSS Properties and Values API syntax string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(into = "&'static str")]
pub enum Syntax {
    Color,
    Length,
    Percentage,
    Time,
    Angle,
    Integer,
    Number,
    Universal,
}

impl Syntax {
    pub fn as_str(self) -> &'static str {
        match self {
            Syntax::Color => "<color>",
            Syntax::Length => "<length>",
            Syntax::Percentage => "<percentage>",
            Syntax::Time => "<time>",
            Syntax::Angle => "<angle>",
            Syntax::Integer => "<integer>",
            Syntax::Number => "<number>",
            Syntax::Universal => "*",
        }
    }
}

impl From<Syntax> for &'static str {
    fn from(syntax: Syntax) -> Self {
        syntax.as_str()
    }
}

impl fmt::Display for Syntax {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Registration data for one `@property` rule.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyMetadata {
    pub syntax: Syntax,
    pub inherits: bool,
    pub initial_value: String,
}

const COLOR_FUNCTIONS: [&str; 11] = [
    "oklab(",
    "oklch(",
    "lab(",
    "lch(",
    "rgb(",
    "rgba(",
    "hsl(",
    "hsla(",
    "hwb(",
    "color(",
    "color-mix(",
];

const LENGTH_UNITS: [&str; 28] = [
    "px", "em", "rem", "ex", "rex", "ch", "rch", "cap", "ic", "lh", "rlh", "vw", "vh", "vi", "vb",
    "vmin", "vmax", "svw", "svh", "lvw", "lvh", "dvw", "dvh", "cm", "mm", "q", "in", "pt",
];

const TIME_UNITS: [&str; 2] = ["s", "ms"];

const ANGLE_UNITS: [&str; 4] = ["deg", "rad", "grad", "turn"];

const DYNAMIC_FUNCTIONS: [&str; 3] = ["var(", "env(", "attr("];

static NAMED_COLORS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "aliceblue", "antiquewhite", "aqua", "aquamarine", "azure", "beige", "bisque", "black",
        "blanchedalmond", "blue", "blueviolet", "brown", "burlywood", "cadetblue", "chartreuse",
        "chocolate", "coral", "cornflowerblue", "cornsilk", "crimson", "cyan", "darkblue",
        "darkcyan", "darkgoldenrod", "darkgray", "darkgreen", "darkgrey", "darkkhaki",
        "darkmagenta", "darkolivegreen", "darkorange", "darkorchid", "darkred", "darksalmon",
        "darkseagreen", "darkslateblue", "darkslategray", "darkslategrey", "darkturquoise",
        "darkviolet", "deeppink", "deepskyblue", "dimgray", "dimgrey", "dodgerblue", "firebrick",
        "floralwhite", "forestgreen", "fuchsia", "gainsboro", "ghostwhite", "gold", "goldenrod",
        "gray", "green", "greenyellow", "grey", "honeydew", "hotpink", "indianred", "indigo",
        "ivory", "khaki", "lavender", "lavenderblush", "lawngreen", "lemonchiffon", "lightblue",
        "lightcoral", "lightcyan", "lightgoldenrodyellow", "lightgray", "lightgreen", "lightgrey",
        "lightpink", "lightsalmon", "lightseagreen", "lightskyblue", "lightslategray",
        "lightslategrey", "lightsteelblue", "lightyellow", "lime", "limegreen", "linen",
        "magenta", "maroon", "mediumaquamarine", "mediumblue", "mediumorchid", "mediumpurple",
        "mediumseagreen", "mediumslateblue", "mediumspringgreen", "mediumturquoise",
        "mediumvioletred", "midnightblue", "mintcream", "mistyrose", "moccasin", "navajowhite",
        "navy", "oldlace", "olive", "olivedrab", "orange", "orangered", "orchid", "palegoldenrod",
        "palegreen", "paleturquoise", "palevioletred", "papayawhip", "peachpuff", "peru", "pink",
        "plum", "powderblue", "purple", "rebeccapurple", "red", "rosybrown", "royalblue",
        "saddlebrown", "salmon", "sandybrown", "seagreen", "seashell", "sienna", "silver",
        "skyblue", "slateblue", "slategray", "slategrey", "snow", "springgreen", "steelblue",
        "tan", "teal", "thistle", "tomato", "turquoise", "violet", "wheat", "white", "whitesmoke",
        "yellow", "yellowgreen", "transparent", "currentcolor",
    ]
    .into_iter()
    .collect()
});

/// Classify a literal value: color, length, percentage, time, angle,
/// integer, number, then `*`.
pub fn infer_syntax(value: &str) -> Syntax {
    let value = value.trim();

    if is_color(value) {
        Syntax::Color
    } else if has_unit(value, &LENGTH_UNITS) {
        Syntax::Length
    } else if has_unit(value, &["%"]) {
        Syntax::Percentage
    } else if has_unit(value, &TIME_UNITS) {
        Syntax::Time
    } else if has_unit(value, &ANGLE_UNITS) {
        Syntax::Angle
    } else if is_integer(value) {
        Syntax::Integer
    } else if is_number(value) {
        Syntax::Number
    } else {
        Syntax::Universal
    }
}

/// Values that reference `var()`, `env()` or `attr()` depend on context and
/// cannot be used as an `@property` initial value.
pub fn is_computationally_independent(value: &str) -> bool {
    let lower = value.to_ascii_lowercase();
    !DYNAMIC_FUNCTIONS.iter().any(|f| lower.contains(f))
}

/// Build `@property` metadata, or `None` for context-dependent values.
pub fn create_property_metadata(value: &str) -> Option<PropertyMetadata> {
    if !is_computationally_independent(value) {
        return None;
    }
    Some(PropertyMetadata {
        syntax: infer_syntax(value),
        inherits: false,
        initial_value: value.to_string(),
    })
}

fn is_color(value: &str) -> bool {
    let lower = value.to_ascii_lowercase();

    if let Some(hex) = lower.strip_prefix('#') {
        return matches!(hex.len(), 3 | 4 | 6 | 8) && hex.chars().all(|c| c.is_ascii_hexdigit());
    }

    if lower.ends_with(')') && COLOR_FUNCTIONS.iter().any(|f| lower.starts_with(f)) {
        return true;
    }

    NAMED_COLORS.contains(lower.as_str())
}

/// A number immediately followed by one of `units`.
fn has_unit(value: &str, units: &[&str]) -> bool {
    let split = value
        .find(|c: char| !(c.is_ascii_digit() || c == '.' || c == '-' || c == '+'))
        .unwrap_or(value.len());
    let (number, unit) = value.split_at(split);

    is_number(number) && units.iter().any(|u| unit.eq_ignore_ascii_case(u))
}

fn is_integer(value: &str) -> bool {
    let digits = value
        .strip_prefix('-')
        .or_else(|| value.strip_prefix('+'))
        .unwrap_or(value);
    !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit())
}

fn is_number(value: &str) -> bool {
    let body = value
        .strip_prefix('-')
        .or_else(|| value.strip_prefix('+'))
        .unwrap_or(value);
    body.chars().any(|c| c.is_ascii_digit())
        && body.chars().all(|c| c.is_ascii_digit() || c == '.')
        && body.matches('.').count() <= 1
}
