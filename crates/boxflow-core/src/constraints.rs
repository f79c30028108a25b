//! Measure modes and per-axis sizing constraints.

use crate::value::OptionalFloat;
use serde::{Deserialize, Serialize};

/// How an available dimension constrains a box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MeasureMode {
    /// No constraint; use the natural size
    #[default]
    Undefined,
    /// Must be exactly the given size
    Exactly,
    /// May be smaller than the given size, never larger
    AtMost,
}

/// Available size along one axis paired with its measure mode.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct AxisConstraint {
    /// Available size, undefined when unconstrained
    pub size: OptionalFloat,
    /// Constraint kind
    pub mode: MeasureMode,
}

impl AxisConstraint {
    /// Unconstrained.
    pub const UNDEFINED: Self = Self {
        size: OptionalFloat::UNDEFINED,
        mode: MeasureMode::Undefined,
    };

    /// Create a constraint.
    #[must_use]
    pub const fn new(size: OptionalFloat, mode: MeasureMode) -> Self {
        Self { size, mode }
    }

    /// Exactly `size` when defined, unconstrained otherwise.
    #[must_use]
    pub fn exact_or_undefined(size: OptionalFloat) -> Self {
        if size.is_defined() {
            Self::new(size, MeasureMode::Exactly)
        } else {
            Self::UNDEFINED
        }
    }

    /// Normalize degenerate input.
    ///
    /// An undefined size forces [`MeasureMode::Undefined`]; a negative size is
    /// treated as zero; an `Undefined` mode drops the size.
    #[must_use]
    pub fn sanitized(self) -> Self {
        match (self.size.get(), self.mode) {
            (None, _) | (_, MeasureMode::Undefined) => Self::UNDEFINED,
            (Some(v), mode) if v < 0.0 => Self::new(OptionalFloat::ZERO, mode),
            _ => self,
        }
    }

    /// Tighten against a maximum size.
    ///
    /// `Exactly` and `AtMost` sizes are capped at `max` (an undefined size
    /// takes `max`); an `Undefined`
    /// constraint becomes `AtMost(max)` when `max` is defined.
    #[must_use]
    pub fn constrain_max(self, max: OptionalFloat) -> Self {
        let Some(max_value) = max.get() else {
            return self;
        };
        match self.mode {
            MeasureMode::Exactly | MeasureMode::AtMost => {
                if self.size.lt(max_value) {
                    self
                } else {
                    Self::new(max, self.mode)
                }
            }
            MeasureMode::Undefined => Self::new(max, MeasureMode::AtMost),
        }
    }

    /// Whether the constraint fixes the size.
    #[must_use]
    pub const fn is_exact(&self) -> bool {
        matches!(self.mode, MeasureMode::Exactly)
    }
}
