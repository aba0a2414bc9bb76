//! Unit classification and conversion (spec §4.1).
//!
//! Units are grouped into families (length, angle, time, frequency,
//! resolution). Conversion factors are defined only within a family;
//! conversion across families fails with `IncompatibleUnits`.

use std::fmt;

use codemap::Span;

use crate::error::{SassError, SassErrorKind, SassResult};

/// Numeric equality/ordering epsilon on the scaled value (spec §4.1).
pub const EPSILON: f64 = 1e-12;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnitFamily {
    Length,
    Angle,
    Time,
    Frequency,
    Resolution,
    /// Units `grass`/Sass doesn't assign a conversion for (e.g. `%`, `fr`,
    /// or unrecognized custom units): comparable only to themselves.
    Other,
}

/// A single Sass unit, e.g. `px`, `deg`, `%`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Unit(String);

impl Unit {
    pub fn new(s: impl Into<String>) -> Self {
        Unit(s.into().to_ascii_lowercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn family(&self) -> UnitFamily {
        match self.0.as_str() {
            "px" | "cm" | "mm" | "q" | "in" | "pt" | "pc" => UnitFamily::Length,
            "deg" | "grad" | "rad" | "turn" => UnitFamily::Angle,
            "s" | "ms" => UnitFamily::Time,
            "hz" | "khz" => UnitFamily::Frequency,
            "dpi" | "dpcm" | "dppx" => UnitFamily::Resolution,
            _ => UnitFamily::Other,
        }
    }

    /// Factor to multiply a value in `self` by to get a value in the
    /// family's canonical base unit (px, deg, s, hz, dppx respectively).
    fn factor_to_base(&self) -> Option<f64> {
        Some(match self.0.as_str() {
            "px" => 1.0,
            "cm" => 96.0 / 2.54,
            "mm" => 96.0 / 25.4,
            "q" => 96.0 / 101.6,
            "in" => 96.0,
            "pt" => 96.0 / 72.0,
            "pc" => 16.0,
            "deg" => 1.0,
            "grad" => 0.9,
            "rad" => 180.0 / std::f64::consts::PI,
            "turn" => 360.0,
            "s" => 1.0,
            "ms" => 0.001,
            "hz" => 1.0,
            "khz" => 1000.0,
            "dppx" => 1.0,
            "dpi" => 1.0 / 96.0,
            "dpcm" => 2.54 / 96.0,
            _ => return None,
        })
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Convert a value expressed in `from` to the equivalent value in `to`.
/// Fails with `IncompatibleUnits` if the two units are not in the same
/// family (spec §4.1).
pub fn convert(value: f64, from: &Unit, to: &Unit, span: Span) -> SassResult<f64> {
    if from == to {
        return Ok(value);
    }
    if from.family() != to.family() || from.family() == UnitFamily::Other {
        return Err(SassError::new(
            SassErrorKind::IncompatibleUnits(format!(
                "Incompatible units {from} and {to}."
            )),
            span,
        ));
    }
    let from_factor = from.factor_to_base().expect("checked same known family");
    let to_factor = to.factor_to_base().expect("checked same known family");
    Ok(value * from_factor / to_factor)
}

/// Whether two units can ever be compared/converted (used by the
/// `comparable()` built-in, spec §4.5 introspection).
pub fn comparable(a: &Unit, b: &Unit) -> bool {
    a == b || (a.family() == b.family() && a.family() != UnitFamily::Other)
}

/// Epsilon-based numeric equality on already-scaled values (spec §4.1).
pub fn nearly_equal(a: f64, b: f64) -> bool {
    (a - b).abs() < EPSILON
}

/// Epsilon-aware total ordering on already-scaled values. Returns `None`
/// only for NaN, which Sass numbers never carry.
pub fn nearly_cmp(a: f64, b: f64) -> std::cmp::Ordering {
    if nearly_equal(a, b) {
        std::cmp::Ordering::Equal
    } else {
        a.partial_cmp(&b).unwrap_or(std::cmp::Ordering::Equal)
    }
}
