//! `Value::Number` — a finite rational carried as `f64`, plus a unit
//! expressed as two multisets of [`Unit`] (spec §3.2, §4.1).

use std::cmp::Ordering;
use std::fmt;

use codemap::Span;

use crate::error::{SassError, SassErrorKind, SassResult};
use crate::unit::{self, Unit};

#[derive(Debug, Clone)]
pub struct SassNumber {
    pub value: f64,
    pub numer_units: Vec<Unit>,
    pub denom_units: Vec<Unit>,
    /// Whether the source literal had a leading zero, so `-0.5` and `-.5`
    /// can be told apart on re-serialization (spec §3.2 Number).
    pub has_leading_zero: bool,
}

impl SassNumber {
    pub fn new_unitless(value: f64) -> Self {
        SassNumber {
            value,
            numer_units: Vec::new(),
            denom_units: Vec::new(),
            has_leading_zero: true,
        }
    }

    pub fn with_unit(value: f64, unit: Unit) -> Self {
        SassNumber {
            value,
            numer_units: vec![unit],
            denom_units: Vec::new(),
            has_leading_zero: true,
        }
    }

    pub fn is_unitless(&self) -> bool {
        self.numer_units.is_empty() && self.denom_units.is_empty()
    }

    /// A single-unit number's unit, if it has exactly one numerator unit
    /// and no denominator units (the common case; used by `unit()`).
    pub fn single_unit(&self) -> Option<&Unit> {
        if self.numer_units.len() == 1 && self.denom_units.is_empty() {
            self.numer_units.first()
        } else {
            None
        }
    }

    /// Human-readable unit string, e.g. `px`, `px*deg`, `px/s` (spec §4.5
    /// `unit()` built-in).
    pub fn unit_string(&self) -> String {
        if self.numer_units.is_empty() && self.denom_units.is_empty() {
            return String::new();
        }
        let numer = if self.numer_units.is_empty() {
            "1".to_string()
        } else {
            self.numer_units
                .iter()
                .map(Unit::as_str)
                .collect::<Vec<_>>()
                .join("*")
        };
        if self.denom_units.is_empty() {
            numer
        } else {
            format!(
                "{}/{}",
                numer,
                self.denom_units
                    .iter()
                    .map(Unit::as_str)
                    .collect::<Vec<_>>()
                    .join("*")
            )
        }
    }

    /// Collapse `num / den`, cancelling identical units and converting
    /// across convertible units within the same family (spec §4.1
    /// `reduce`). Returns a normalized number whose remaining units share
    /// no convertible pair.
    #[must_use]
    pub fn reduce(mut self, span: Span) -> SassResult<Self> {
        let mut numer = Vec::new();
        let mut denom = self.denom_units;
        'outer: for n in self.numer_units.drain(..) {
            for (i, d) in denom.iter().enumerate() {
                if n.family() == d.family() && n.family() != crate::unit::UnitFamily::Other {
                    self.value *= unit::convert(1.0, &n, d, span)?;
                    denom.remove(i);
                    continue 'outer;
                }
            }
            numer.push(n);
        }
        Ok(SassNumber {
            value: self.value,
            numer_units: numer,
            denom_units: denom,
            has_leading_zero: self.has_leading_zero,
        })
    }

    fn assert_comparable_family(&self, other: &SassNumber, span: Span) -> SassResult<()> {
        if self.is_unitless() || other.is_unitless() {
            return Ok(());
        }
        let compatible = self
            .numer_units
            .iter()
            .zip(other.numer_units.iter())
            .all(|(a, b)| unit::comparable(a, b));
        if compatible && self.numer_units.len() == other.numer_units.len() {
            Ok(())
        } else {
            Err(SassError::new(
                SassErrorKind::IncompatibleUnits(format!(
                    "Incompatible units {} and {}.",
                    self.unit_string(),
                    other.unit_string()
                )),
                span,
            ))
        }
    }

    /// Convert `self`'s value into the units of `other`, assuming they are
    /// in the same family (used by `cmp`/`eq`/arithmetic).
    fn value_in(&self, other: &SassNumber, span: Span) -> SassResult<f64> {
        if self.is_unitless() || other.is_unitless() || self.single_unit().is_none() {
            return Ok(self.value);
        }
        match (self.single_unit(), other.single_unit()) {
            (Some(a), Some(b)) => unit::convert(self.value, a, b, span),
            _ => Ok(self.value),
        }
    }

    pub fn eq(&self, other: &SassNumber, span: Span) -> SassResult<bool> {
        let a = self.clone().reduce(span)?;
        let b = other.clone().reduce(span)?;
        a.assert_comparable_family(&b, span)?;
        let av = a.value_in(&b, span)?;
        Ok(unit::nearly_equal(av, b.value))
    }

    pub fn cmp(&self, other: &SassNumber, span: Span) -> SassResult<Ordering> {
        let a = self.clone().reduce(span)?;
        let b = other.clone().reduce(span)?;
        a.assert_comparable_family(&b, span)?;
        let av = a.value_in(&b, span)?;
        Ok(unit::nearly_cmp(av, b.value))
    }

    pub fn add(&self, other: &SassNumber, span: Span) -> SassResult<SassNumber> {
        self.assert_comparable_family(other, span)?;
        let rhs = other.value_in(self, span)?;
        Ok(SassNumber {
            value: self.value + rhs,
            numer_units: self.numer_units.clone(),
            denom_units: self.denom_units.clone(),
            has_leading_zero: true,
        })
    }

    pub fn sub(&self, other: &SassNumber, span: Span) -> SassResult<SassNumber> {
        self.assert_comparable_family(other, span)?;
        let rhs = other.value_in(self, span)?;
        Ok(SassNumber {
            value: self.value - rhs,
            numer_units: self.numer_units.clone(),
            denom_units: self.denom_units.clone(),
            has_leading_zero: true,
        })
    }

    pub fn rem(&self, other: &SassNumber, span: Span) -> SassResult<SassNumber> {
        self.assert_comparable_family(other, span)?;
        let rhs = other.value_in(self, span)?;
        Ok(SassNumber {
            value: self.value % rhs,
            numer_units: self.numer_units.clone(),
            denom_units: self.denom_units.clone(),
            has_leading_zero: true,
        })
    }

    /// `MUL` concatenates unit numerators/denominators (spec §4.4.1).
    pub fn mul(&self, other: &SassNumber, span: Span) -> SassResult<SassNumber> {
        let mut numer = self.numer_units.clone();
        numer.extend(other.numer_units.iter().cloned());
        let mut denom = self.denom_units.clone();
        denom.extend(other.denom_units.iter().cloned());
        SassNumber {
            value: self.value * other.value,
            numer_units: numer,
            denom_units: denom,
            has_leading_zero: true,
        }
        .reduce(span)
    }

    /// `DIV` takes numerator of left with denominator of left union
    /// numerator of right, then reduces (spec §4.4.1).
    pub fn div(&self, other: &SassNumber, span: Span) -> SassResult<SassNumber> {
        if other.value == 0.0 {
            return Err(SassError::new(
                SassErrorKind::DivisionByZero("Division by zero.".to_string()),
                span,
            ));
        }
        let mut numer = self.numer_units.clone();
        numer.extend(other.denom_units.iter().cloned());
        let mut denom = self.denom_units.clone();
        denom.extend(other.numer_units.iter().cloned());
        SassNumber {
            value: self.value / other.value,
            numer_units: numer,
            denom_units: denom,
            has_leading_zero: true,
        }
        .reduce(span)
    }

    pub fn neg(&self) -> SassNumber {
        SassNumber {
            value: -self.value,
            numer_units: self.numer_units.clone(),
            denom_units: self.denom_units.clone(),
            has_leading_zero: self.has_leading_zero,
        }
    }

    /// Render with up to `precision` decimal digits, trimming trailing
    /// zeros, reproducing a leading `-.5` when `has_leading_zero` is false.
    pub fn to_css_string(&self, precision: usize) -> String {
        let mut s = format!("{:.*}", precision, self.value.abs());
        if s.contains('.') {
            while s.ends_with('0') {
                s.pop();
            }
            if s.ends_with('.') {
                s.pop();
            }
        }
        if !self.has_leading_zero && s.starts_with('0') && s.len() > 1 {
            s.remove(0);
        }
        let sign = if self.value.is_sign_negative() && self.value != 0.0 {
            "-"
        } else {
            ""
        };
        format!("{sign}{s}{}", self.unit_string())
    }
}

impl fmt::Display for SassNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_css_string(10))
    }
}
