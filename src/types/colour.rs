//! OKLCH colour type, parsing and sRGB conversion.

use std::fmt;
use std::str::FromStr;

use palette::convert::FromColorUnclamped;
use palette::{Oklab, Oklch as PaletteOklch, Srgb};

use crate::error::{Result, TokenError};

/// An OKLCH colour with lightness in percent (`0..=100`).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Oklch {
    pub l: f64,
    pub c: f64,
    pub h: f64,
}

/// An opaque 8-bit sRGB colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Oklch {
    pub const fn new(l: f64, c: f64, h: f64) -> Self {
        Self { l, c, h }
    }

    /// Convert to 8-bit sRGB, clamping out-of-gamut channels.
    pub fn to_rgb(self) -> Rgb {
        oklch_to_rgb(self.l, self.c, self.h)
    }
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub fn to_oklch(self) -> Oklch {
        rgb_to_oklch(self.r, self.g, self.b)
    }
}

impl FromStr for Oklch {
    type Err = TokenError;

    fn from_str(s: &str) -> Result<Self> {
        parse_oklch(s)
    }
}

impl fmt::Display for Oklch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_oklch(self.l, self.c, self.h))
    }
}

/// Parse `oklch(<L>[%] <C> <H>)`.
///
/// Lightness without a `%` in the `0..=1` range is scaled to percent.
pub fn parse_oklch(text: &str) -> Result<Oklch> {
    let invalid = || TokenError::Format {
        input: text.to_string(),
    };

    let trimmed = text.trim();
    let body = trimmed
        .strip_prefix("oklch(")
        .and_then(|rest| rest.strip_suffix(')'))
        .ok_or_else(invalid)?;

    let parts: Vec<&str> = body.split_whitespace().collect();
    let [l, c, h] = parts.as_slice() else {
        return Err(invalid());
    };

    let l = match l.strip_suffix('%') {
        Some(percent) => parse_number(percent).ok_or_else(invalid)?,
        None => {
            let raw = parse_number(l).ok_or_else(invalid)?;
            if raw <= 1.0 {
                raw * 100.0
            } else {
                raw
            }
        }
    };
    let c = parse_number(c).ok_or_else(invalid)?;
    let h = parse_number(h).ok_or_else(invalid)?;

    Ok(Oklch { l, c, h })
}

/// Unsigned decimal with optional fraction; no exponents or signs.
fn parse_number(s: &str) -> Option<f64> {
    let valid = !s.is_empty()
        && s.chars().any(|c| c.is_ascii_digit())
        && s.chars().all(|c| c.is_ascii_digit() || c == '.')
        && s.matches('.').count() <= 1;
    if valid {
        s.parse().ok()
    } else {
        None
    }
}

/// Serialize an OKLCH colour with value-dependent precision.
pub fn format_oklch(l: f64, c: f64, h: f64) -> String {
    format!(
        "oklch({}% {} {})",
        format_lightness(l),
        format_chroma(c),
        format_hue(h)
    )
}

/// Round a lightness to the one decimal place it is serialized with.
pub(crate) fn round_lightness(l: f64) -> f64 {
    (l * 10.0).round() / 10.0
}

fn format_lightness(l: f64) -> String {
    let rounded = round_lightness(l);
    if rounded.fract() == 0.0 {
        format!("{}", rounded as i64)
    } else {
        format!("{:.1}", rounded)
    }
}

fn format_chroma(c: f64) -> String {
    if c == 0.0 {
        "0".to_string()
    } else if c < 0.1 {
        format!("{:.4}", c)
    } else {
        format!("{:.3}", c)
    }
}

fn format_hue(h: f64) -> String {
    let rounded = h.round();
    if (h - rounded).abs() < 0.001 {
        format!("{}", rounded as i64)
    } else {
        trim_decimal(format!("{:.3}", h))
    }
}

/// Drop trailing zeros (and a dangling point) from a fixed-precision number.
fn trim_decimal(s: String) -> String {
    if !s.contains('.') {
        return s;
    }
    s.trim_end_matches('0').trim_end_matches('.').to_string()
}

/// Normalize a hue in degrees to `[0, 360)`.
pub fn normalize_hue(h: f64) -> f64 {
    let h = h.rem_euclid(360.0);
    if h >= 360.0 {
        0.0
    } else {
        h
    }
}

/// Convert OKLCH (lightness in percent) to 8-bit sRGB.
pub fn oklch_to_rgb(l: f64, c: f64, h: f64) -> Rgb {
    let lch: PaletteOklch<f64> = PaletteOklch::new(l / 100.0, c, h);
    let lab: Oklab<f64> = Oklab::from_color_unclamped(lch);
    let rgb: Srgb<f64> = Srgb::from_color_unclamped(lab);

    Rgb::new(
        to_channel(rgb.red),
        to_channel(rgb.green),
        to_channel(rgb.blue),
    )
}

/// Convert 8-bit sRGB to OKLCH (lightness in percent, hue in `[0, 360)`).
pub fn rgb_to_oklch(r: u8, g: u8, b: u8) -> Oklch {
    let rgb: Srgb<f64> = Srgb::new(r as f64 / 255.0, g as f64 / 255.0, b as f64 / 255.0);
    let lab: Oklab<f64> = Oklab::from_color_unclamped(rgb);
    let lch: PaletteOklch<f64> = PaletteOklch::from_color_unclamped(lab);

    Oklch {
        l: lch.l * 100.0,
        c: lch.chroma,
        h: normalize_hue(lch.hue.into_positive_degrees()),
    }
}

fn to_channel(value: f64) -> u8 {
    (value * 255.0).round().clamp(0.0, 255.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_percent() {
        let c = parse_oklch("oklch(62.8% 0.2577 29.23)").unwrap();
        assert_eq!(c, Oklch::new(62.8, 0.2577, 29.23));
    }

    #[test]
    fn test_parse_unit_lightness() {
        let c = parse_oklch("oklch(0.5 0.1 200)").unwrap();
        assert!((c.l - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_parse_whitespace() {
        let c = parse_oklch("  oklch(  70%   0.1  120 ) ").unwrap();
        assert_eq!(c, Oklch::new(70.0, 0.1, 120.0));
    }

    #[test]
    fn test_parse_invalid() {
        for input in [
            "",
            "rgb(1, 2, 3)",
            "oklch(50% 0.1)",
            "oklch(50% 0.1 20 1)",
            "oklch(a b c)",
            "oklch(50% 0.1 20",
        ] {
            let err = parse_oklch(input).unwrap_err();
            assert!(err.to_string().contains(input), "{}", err);
        }
    }

    #[test]
    fn test_format_precision() {
        assert_eq!(format_oklch(62.8, 0.2577, 29.23), "oklch(62.8% 0.258 29.23)");
        assert_eq!(format_oklch(60.0, 0.05, 120.0), "oklch(60% 0.0500 120)");
        assert_eq!(format_oklch(97.0, 0.0, 359.9996), "oklch(97% 0 360)");
        assert_eq!(format_oklch(45.126, 0.12345, 10.12345), "oklch(45.1% 0.123 10.123)");
    }

    #[test]
    fn test_lightness_keeps_one_decimal() {
        assert_eq!(format_oklch(45.14, 0.1, 10.0), "oklch(45.1% 0.100 10)");
        assert_eq!(format_oklch(45.17, 0.1, 10.0), "oklch(45.2% 0.100 10)");
        assert_eq!(format_oklch(59.97, 0.1, 10.0), "oklch(60% 0.100 10)");
        assert_eq!(format_oklch(99.04, 0.1, 10.0), "oklch(99% 0.100 10)");
        assert_eq!(format_oklch(0.26, 0.1, 10.0), "oklch(0.3% 0.100 10)");
    }

    #[test]
    fn test_format_parse_round_trip() {
        let text = format_oklch(71.5, 0.0834, 245.5);
        let parsed = parse_oklch(&text).unwrap();
        assert_eq!(parsed, Oklch::new(71.5, 0.0834, 245.5));
        assert_eq!(parsed.to_string(), text);
    }

    #[test]
    fn test_rgb_round_trip() {
        let original = Rgb::new(255, 160, 0);
        let back = original.to_oklch().to_rgb();
        assert!((back.r as i32 - 255).abs() <= 2);
        assert!((back.g as i32 - 160).abs() <= 2);
        assert!((back.b as i32).abs() <= 2);
    }

    #[test]
    fn test_oklch_round_trip() {
        let original = Oklch::new(70.0, 0.1, 150.0);
        let back = original.to_rgb().to_oklch();
        assert!((back.l - original.l).abs() < 1.0);
        assert!((back.c - original.c).abs() < 1.0);
        assert!((back.h - original.h).abs() < 10.0);
    }

    #[test]
    fn test_known_colours() {
        let white = rgb_to_oklch(255, 255, 255);
        assert!((white.l - 100.0).abs() < 0.5);
        assert!(white.c < 0.001);

        let black = rgb_to_oklch(0, 0, 0);
        assert!(black.l.abs() < 0.5);

        assert_eq!(oklch_to_rgb(100.0, 0.0, 0.0), Rgb::new(255, 255, 255));
        assert_eq!(oklch_to_rgb(0.0, 0.0, 0.0), Rgb::new(0, 0, 0));
    }

    #[test]
    fn test_out_of_gamut_clamps() {
        let green = oklch_to_rgb(60.0, 0.5, 140.0);
        assert_eq!(green.r, 0);
        assert_eq!(green.b, 0);

        let red = oklch_to_rgb(100.0, 0.3, 0.0);
        assert_eq!(red.r, 255);
    }

    #[test]
    fn test_hue_normalized() {
        for (r, g, b) in [(255, 0, 0), (0, 0, 255), (255, 0, 255), (10, 200, 30)] {
            let c = rgb_to_oklch(r, g, b);
            assert!((0.0..360.0).contains(&c.h), "{:?}", c);
        }
        assert_eq!(normalize_hue(-30.0), 330.0);
        assert_eq!(normalize_hue(720.0), 0.0);
    }
}
