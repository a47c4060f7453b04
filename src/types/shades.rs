//! Seven-step shade scale derived from a single OKLCH base colour.

use indexmap::IndexMap;

use crate::error::{Result, TokenError};

use super::colour::{format_oklch, normalize_hue, parse_oklch, round_lightness, Oklch};

/// Shade names, lightest first.
pub const SHADE_NAMES: [&str; 7] = [
    "lightest", "lighter", "light", "base", "dark", "darker", "darkest",
];

// Pinned extremes.
const LIGHTEST_L: f64 = 97.0;
const LIGHTEST_C: f64 = 0.015;
const DARKEST_L: f64 = 15.0;
const DARKEST_C: f64 = 0.02;

// Fixed lightness with scaled chroma.
const LIGHTER_L: f64 = 88.0;
const LIGHTER_C_FACTOR: f64 = 0.6;
const DARKER_L: f64 = 28.0;
const DARKER_C_FACTOR: f64 = 0.8;

// Offsets from the base lightness.
const LIGHT_OFFSET: f64 = 10.0;
const DARK_OFFSET: f64 = 10.0;

// Hue shifts in degrees, lightest to darkest (base excluded).
const HUE_SHIFTS: [f64; 6] = [-5.0, -3.0, -1.0, 1.0, 3.0, 5.0];

/// An expanded shade scale. `base` is the input text, untouched.
#[derive(Debug, Clone, PartialEq)]
pub struct ShadeScale {
    pub lightest: String,
    pub lighter: String,
    pub light: String,
    pub base: String,
    pub dark: String,
    pub darker: String,
    pub darkest: String,
}

impl ShadeScale {
    /// Shades in order, lightest first, keyed by name.
    pub fn entries(&self) -> [(&'static str, &str); 7] {
        [
            (SHADE_NAMES[0], self.lightest.as_str()),
            (SHADE_NAMES[1], self.lighter.as_str()),
            (SHADE_NAMES[2], self.light.as_str()),
            (SHADE_NAMES[3], self.base.as_str()),
            (SHADE_NAMES[4], self.dark.as_str()),
            (SHADE_NAMES[5], self.darker.as_str()),
            (SHADE_NAMES[6], self.darkest.as_str()),
        ]
    }

    pub fn to_map(&self) -> IndexMap<String, String> {
        self.entries()
            .into_iter()
            .map(|(name, value)| (name.to_string(), value.to_string()))
            .collect()
    }
}

/// Lowest and highest base lightness a scale can be derived from.
pub const MIN_BASE_L: f64 = 1.0;
pub const MAX_BASE_L: f64 = 99.0;

/// Expand a base `oklch(...)` colour into a seven-step shade scale.
///
/// Lightness strictly decreases from `lightest` to `darkest`, compared at the
/// one-decimal precision shades are written with. When the pinned constants
/// would break that ordering for a very light or very dark base, the affected
/// half of the scale is spread evenly between the base and the end of the
/// range instead. Bases outside `MIN_BASE_L..=MAX_BASE_L` leave no room for
/// distinct shades and are rejected.
pub fn expand_color(oklch: &str) -> Result<ShadeScale> {
    let base = parse_oklch(oklch)?;
    let (l, c, h) = (base.l, base.c, base.h);

    if !(MIN_BASE_L..=MAX_BASE_L).contains(&l) {
        return Err(TokenError::ShadeBase {
            input: oklch.to_string(),
            lightness: l,
        });
    }

    let mut upper = [LIGHTEST_L, LIGHTER_L, round_lightness(l + LIGHT_OFFSET)];
    if !(upper[0] > upper[1] && upper[1] > upper[2] && upper[2] < 100.0) {
        let room = 100.0 - l;
        upper = [0.75, 0.5, 0.25].map(|f| round_lightness(l + room * f));
    }

    let mut lower = [round_lightness(l - DARK_OFFSET), DARKER_L, DARKEST_L];
    if !(lower[0] > lower[1] && lower[1] > lower[2] && lower[0] > 0.0) {
        lower = [0.75, 0.5, 0.25].map(|f| round_lightness(l * f));
    }

    let shade = |lightness: f64, chroma: f64, shift: f64| {
        let hue = normalize_hue(h + shift);
        Oklch::new(lightness, chroma, hue)
    };

    let shades = [
        shade(upper[0], LIGHTEST_C, HUE_SHIFTS[0]),
        shade(upper[1], c * LIGHTER_C_FACTOR, HUE_SHIFTS[1]),
        shade(upper[2], c, HUE_SHIFTS[2]),
        shade(lower[0], c, HUE_SHIFTS[3]),
        shade(lower[1], c * DARKER_C_FACTOR, HUE_SHIFTS[4]),
        shade(lower[2], DARKEST_C, HUE_SHIFTS[5]),
    ];
    let [lightest, lighter, light, dark, darker, darkest] =
        shades.map(|s| format_oklch(s.l, s.c, s.h));

    Ok(ShadeScale {
        lightest,
        lighter,
        light,
        base: oklch.to_string(),
        dark,
        darker,
        darkest,
    })
}
