//! Unit-sequence expansion for the `units` shorthand.
//!
//! A units shorthand maps a unit type to a `[from, step, to]` range:
//!
//! ```yaml
//! units:
//!   rem: [0, 0.25, 1]
//! ```
//!
//! expands to `{rem: {"0": "0rem", "0.25": "0.25rem", "0.5": "0.5rem", ...}}`.

use std::fmt;
use std::str::FromStr;

use indexmap::IndexMap;

use crate::error::{Result, TokenError};

/// Supported unit types for the units shorthand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnitType {
    Rem,
    Em,
    Px,
    Percentage,
    Vh,
    Vw,
    Vmin,
    Vmax,
    Ch,
    Ex,
}

impl UnitType {
    pub const ALL: [UnitType; 10] = [
        UnitType::Rem,
        UnitType::Em,
        UnitType::Px,
        UnitType::Percentage,
        UnitType::Vh,
        UnitType::Vw,
        UnitType::Vmin,
        UnitType::Vmax,
        UnitType::Ch,
        UnitType::Ex,
    ];

    /// The shorthand key for this unit type.
    pub fn key(self) -> &'static str {
        match self {
            UnitType::Rem => "rem",
            UnitType::Em => "em",
            UnitType::Px => "px",
            UnitType::Percentage => "percentage",
            UnitType::Vh => "vh",
            UnitType::Vw => "vw",
            UnitType::Vmin => "vmin",
            UnitType::Vmax => "vmax",
            UnitType::Ch => "ch",
            UnitType::Ex => "ex",
        }
    }

    /// The CSS suffix appended to generated values.
    pub fn suffix(self) -> &'static str {
        match self {
            UnitType::Percentage => "%",
            other => other.key(),
        }
    }
}

impl FromStr for UnitType {
    type Err = TokenError;

    fn from_str(s: &str) -> Result<Self> {
        UnitType::ALL
            .into_iter()
            .find(|unit| unit.key() == s)
            .ok_or_else(|| TokenError::UnknownUnit { key: s.to_string() })
    }
}

impl fmt::Display for UnitType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// A `[from, step, to]` range descriptor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UnitRange {
    pub from: f64,
    pub step: f64,
    pub to: f64,
}

/// Most keys a single range may expand to.
pub const MAX_UNIT_STEPS: usize = 10_000;

/// Smallest step that survives key rounding.
pub const MIN_UNIT_STEP: f64 = 1e-10;

impl UnitRange {
    pub const fn new(from: f64, step: f64, to: f64) -> Self {
        Self { from, step, to }
    }

    fn error(&self, reason: &'static str) -> TokenError {
        TokenError::Range {
            from: self.from,
            step: self.step,
            to: self.to,
            reason,
        }
    }

    /// Validate the range and return its step count.
    fn steps(&self) -> Result<usize> {
        if !(self.from.is_finite() && self.step.is_finite() && self.to.is_finite()) {
            return Err(self.error("values must be finite"));
        }
        if self.step <= 0.0 {
            return Err(self.error("step must be positive"));
        }
        if self.step < MIN_UNIT_STEP {
            return Err(self.error("step must be at least 1e-10"));
        }
        if self.from > self.to {
            return Err(self.error("from must not exceed to"));
        }

        let steps = ((self.to - self.from) / self.step).round();
        if steps > MAX_UNIT_STEPS as f64 {
            return Err(self.error("range expands to more than 10000 keys"));
        }
        Ok(steps as usize)
    }

    /// The numeric keys covered by this range, `from` and `to` included.
    ///
    /// Values are `from + i * step` for integer `i`; when `to` is not reached
    /// exactly the last step is replaced by `to`. Keys are strictly
    /// increasing; a step too small to register at the magnitude of `from`
    /// is an error.
    pub fn values(&self) -> Result<Vec<f64>> {
        let count = self.steps()?;
        let to = round_key(self.to);
        let mut values: Vec<f64> = Vec::with_capacity(count + 1);

        for i in 0..count {
            let value = round_key(self.from + i as f64 * self.step);
            if value >= to {
                break;
            }
            if values.last().is_some_and(|&last| value <= last) {
                return Err(self.error("step is too small for the magnitude of from"));
            }
            values.push(value);
        }
        values.push(to);

        Ok(values)
    }
}

/// Round to 10 decimal digits to hide binary floating-point drift.
fn round_key(value: f64) -> f64 {
    let rounded = (value * 1e10).round() / 1e10;
    // Avoid "-0" keys.
    if rounded == 0.0 {
        0.0
    } else {
        rounded
    }
}

/// Expand one range into `key -> key + suffix`.
pub fn expand_unit_tuple(range: UnitRange, suffix: &str) -> Result<IndexMap<String, String>> {
    Ok(range
        .values()?
        .into_iter()
        .map(|value| {
            let key = value.to_string();
            let css = format!("{}{}", key, suffix);
            (key, css)
        })
        .collect())
}

/// Expand every declared unit type of a units shorthand.
pub fn expand_units<'a, I>(config: I) -> Result<IndexMap<String, IndexMap<String, String>>>
where
    I: IntoIterator<Item = (&'a str, UnitRange)>,
{
    let mut expanded = IndexMap::new();
    for (key, range) in config {
        let unit: UnitType = key.parse()?;
        expanded.insert(key.to_string(), expand_unit_tuple(range, unit.suffix())?);
    }
    Ok(expanded)
}
