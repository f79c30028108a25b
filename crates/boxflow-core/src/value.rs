//! Dimension values and the optional float used for computed quantities.

use serde::{Deserialize, Serialize};
use std::ops::{Add, Div, Mul, Neg, Sub};

/// Absolute tolerance used for every float comparison in the engine.
pub const EPSILON: f32 = 0.0001;

/// Compare two floats with [`EPSILON`] tolerance.
///
/// Two NaNs compare equal so that "undefined" inputs memoize like any other.
#[must_use]
pub fn floats_equal(a: f32, b: f32) -> bool {
    if a.is_nan() || b.is_nan() {
        return a.is_nan() && b.is_nan();
    }
    (a - b).abs() < EPSILON
}

/// A float that may be unset.
///
/// Arithmetic with an undefined operand produces an undefined result. Use
/// [`OptionalFloat::unwrap_or`] at the points where a concrete number is required.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OptionalFloat(Option<f32>);

impl OptionalFloat {
    /// The unset value.
    pub const UNDEFINED: Self = Self(None);

    /// Zero.
    pub const ZERO: Self = Self(Some(0.0));

    /// Wrap a float; NaN becomes undefined.
    #[must_use]
    pub fn new(value: f32) -> Self {
        if value.is_nan() {
            Self::UNDEFINED
        } else {
            Self(Some(value))
        }
    }

    /// The wrapped value, if any.
    #[must_use]
    pub const fn get(self) -> Option<f32> {
        self.0
    }

    /// Whether a value is present.
    #[must_use]
    pub const fn is_defined(self) -> bool {
        self.0.is_some()
    }

    /// Whether the value is unset.
    #[must_use]
    pub const fn is_undefined(self) -> bool {
        self.0.is_none()
    }

    /// The value, or `default` when unset.
    #[must_use]
    pub fn unwrap_or(self, default: f32) -> f32 {
        self.0.unwrap_or(default)
    }

    /// Apply `f` to a defined value.
    #[must_use]
    pub fn map(self, f: impl FnOnce(f32) -> f32) -> Self {
        self.0.map_or(Self::UNDEFINED, |v| Self::new(f(v)))
    }

    /// Larger of the two; an undefined side is ignored.
    #[must_use]
    pub fn max(self, other: Self) -> Self {
        match (self.0, other.0) {
            (Some(a), Some(b)) => Self(Some(a.max(b))),
            (Some(_), None) => self,
            (None, _) => other,
        }
    }

    /// Smaller of the two; an undefined side is ignored.
    #[must_use]
    pub fn min(self, other: Self) -> Self {
        match (self.0, other.0) {
            (Some(a), Some(b)) => Self(Some(a.min(b))),
            (Some(_), None) => self,
            (None, _) => other,
        }
    }

    /// `true` if both are undefined or both are defined and within [`EPSILON`].
    #[must_use]
    pub fn approx_eq(self, other: Self) -> bool {
        match (self.0, other.0) {
            (Some(a), Some(b)) => floats_equal(a, b),
            (None, None) => true,
            _ => false,
        }
    }

    /// `true` if the value is defined and strictly greater than `rhs`.
    #[must_use]
    pub fn gt(self, rhs: f32) -> bool {
        self.0.is_some_and(|v| v > rhs)
    }

    /// `true` if the value is defined and strictly less than `rhs`.
    #[must_use]
    pub fn lt(self, rhs: f32) -> bool {
        self.0.is_some_and(|v| v < rhs)
    }
}

impl From<f32> for OptionalFloat {
    fn from(value: f32) -> Self {
        Self::new(value)
    }
}

impl From<Option<f32>> for OptionalFloat {
    fn from(value: Option<f32>) -> Self {
        value.map_or(Self::UNDEFINED, Self::new)
    }
}

impl Add for OptionalFloat {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        match (self.0, rhs.0) {
            (Some(a), Some(b)) => Self::new(a + b),
            _ => Self::UNDEFINED,
        }
    }
}

impl Add<f32> for OptionalFloat {
    type Output = Self;

    fn add(self, rhs: f32) -> Self::Output {
        self.map(|v| v + rhs)
    }
}

impl Sub for OptionalFloat {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        match (self.0, rhs.0) {
            (Some(a), Some(b)) => Self::new(a - b),
            _ => Self::UNDEFINED,
        }
    }
}

impl Sub<f32> for OptionalFloat {
    type Output = Self;

    fn sub(self, rhs: f32) -> Self::Output {
        self.map(|v| v - rhs)
    }
}

impl Mul<f32> for OptionalFloat {
    type Output = Self;

    fn mul(self, rhs: f32) -> Self::Output {
        self.map(|v| v * rhs)
    }
}

impl Div<f32> for OptionalFloat {
    type Output = Self;

    fn div(self, rhs: f32) -> Self::Output {
        self.map(|v| v / rhs)
    }
}

impl Neg for OptionalFloat {
    type Output = Self;

    fn neg(self) -> Self::Output {
        self.map(|v| -v)
    }
}

/// A style dimension.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub enum Value {
    /// Not set
    #[default]
    Undefined,
    /// Sized by the algorithm
    Auto,
    /// Absolute points
    Point(f32),
    /// Percentage of the owner's size
    Percent(f32),
}

impl Value {
    /// Absolute points. Non-finite input yields [`Value::Undefined`].
    #[must_use]
    pub fn point(value: f32) -> Self {
        if value.is_finite() {
            Self::Point(value)
        } else {
            Self::Undefined
        }
    }

    /// Percentage of the owner size. Non-finite input yields [`Value::Undefined`].
    #[must_use]
    pub fn percent(value: f32) -> Self {
        if value.is_finite() {
            Self::Percent(value)
        } else {
            Self::Undefined
        }
    }

    /// Whether the value is `auto`.
    #[must_use]
    pub const fn is_auto(self) -> bool {
        matches!(self, Self::Auto)
    }

    /// Whether the value is unset.
    #[must_use]
    pub const fn is_undefined(self) -> bool {
        matches!(self, Self::Undefined)
    }

    /// Resolve against the owner size.
    ///
    /// Percentages of an undefined owner size are undefined, and so are
    /// non-finite payloads written into the variants directly.
    #[must_use]
    pub fn resolve(self, owner_size: OptionalFloat) -> OptionalFloat {
        match self {
            Self::Point(v) if v.is_finite() => OptionalFloat::new(v),
            Self::Percent(v) if v.is_finite() => owner_size.map(|owner| v * owner * 0.01),
            Self::Point(_) | Self::Percent(_) | Self::Auto | Self::Undefined => {
                OptionalFloat::UNDEFINED
            }
        }
    }

    /// Resolve a margin; `auto` margins resolve to zero.
    #[must_use]
    pub fn resolve_margin(self, owner_size: OptionalFloat) -> OptionalFloat {
        if self.is_auto() {
            OptionalFloat::ZERO
        } else {
            self.resolve(owner_size)
        }
    }

    /// Same unit and payloads within [`EPSILON`].
    #[must_use]
    pub fn approx_eq(self, other: Self) -> bool {
        match (self, other) {
            (Self::Point(a), Self::Point(b)) | (Self::Percent(a), Self::Percent(b)) => {
                floats_equal(a, b)
            }
            (Self::Auto, Self::Auto) | (Self::Undefined, Self::Undefined) => true,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_floats_equal_tolerance() {
        assert!(floats_equal(1.0, 1.00005));
        assert!(!floats_equal(1.0, 1.001));
        assert!(floats_equal(f32::NAN, f32::NAN));
        assert!(!floats_equal(f32::NAN, 0.0));
    }

    #[test]
    fn test_optional_float_nan_is_undefined() {
        assert!(OptionalFloat::new(f32::NAN).is_undefined());
        assert_eq!(OptionalFloat::from(Some(2.0)).get(), Some(2.0));
    }

    #[test]
    fn test_optional_float_arithmetic_propagates_undefined() {
        let a = OptionalFloat::new(3.0);
        assert!((a + OptionalFloat::UNDEFINED).is_undefined());
        assert!((OptionalFloat::UNDEFINED - 1.0).is_undefined());
        assert_eq!((a * 2.0).get(), Some(6.0));
        assert_eq!((-a).get(), Some(-3.0));
    }

    #[test]
    fn test_optional_float_max_min_ignore_undefined() {
        let a = OptionalFloat::new(3.0);
        assert_eq!(a.max(OptionalFloat::UNDEFINED), a);
        assert_eq!(OptionalFloat::UNDEFINED.min(a), a);
        assert_eq!(a.max(OptionalFloat::new(5.0)).get(), Some(5.0));
    }

    #[test]
    fn test_value_resolve() {
        let owner = OptionalFloat::new(200.0);
        assert_eq!(Value::Point(10.0).resolve(owner).get(), Some(10.0));
        assert_eq!(Value::Percent(50.0).resolve(owner).get(), Some(100.0));
        assert!(Value::Auto.resolve(owner).is_undefined());
        assert!(Value::Undefined.resolve(owner).is_undefined());
    }

    #[test]
    fn test_value_percent_of_undefined_owner() {
        assert!(Value::Percent(50.0)
            .resolve(OptionalFloat::UNDEFINED)
            .is_undefined());
    }

    #[test]
    fn test_margin_auto_resolves_to_zero() {
        assert_eq!(
            Value::Auto.resolve_margin(OptionalFloat::new(10.0)).get(),
            Some(0.0)
        );
    }

    #[test]
    fn test_non_finite_constructors() {
        assert_eq!(Value::point(f32::INFINITY), Value::Undefined);
        assert_eq!(Value::percent(f32::NAN), Value::Undefined);
    }

    #[test]
    fn test_raw_non_finite_payload_resolves_undefined() {
        let owner = OptionalFloat::new(200.0);
        assert!(Value::Point(f32::INFINITY).resolve(owner).is_undefined());
        assert!(Value::Point(f32::NAN).resolve(owner).is_undefined());
        assert!(Value::Percent(f32::NEG_INFINITY).resolve(owner).is_undefined());
    }

    #[test]
    fn test_value_serde() {
        let json = serde_json::to_string(&Value::Percent(25.0)).unwrap();
        let back: Value = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Value::Percent(25.0));
    }

    proptest! {
        #[test]
        fn prop_percent_is_linear(p in 0.0f32..100.0, owner in 0.0f32..10_000.0) {
            let resolved = Value::Percent(p).resolve(OptionalFloat::new(owner)).unwrap_or(f32::NAN);
            prop_assert!((resolved - p * owner / 100.0).abs() < 0.01);
        }

        #[test]
        fn prop_approx_eq_is_reflexive(v in -1e6f32..1e6) {
            prop_assert!(Value::Point(v).approx_eq(Value::Point(v)));
            prop_assert!(OptionalFloat::new(v).approx_eq(OptionalFloat::new(v)));
        }
    }
}
