//! Geometric primitives: `Size`, `Edges`.

use serde::{Deserialize, Serialize};

/// A 2D size with width and height.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Size {
    /// Width
    pub width: f32,
    /// Height
    pub height: f32,
}

impl Size {
    /// Zero size
    pub const ZERO: Self = Self {
        width: 0.0,
        height: 0.0,
    };

    /// Create a new size.
    #[must_use]
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

impl Default for Size {
    fn default() -> Self {
        Self::ZERO
    }
}

/// One value per physical edge.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Edges<T> {
    /// Left edge
    pub left: T,
    /// Top edge
    pub top: T,
    /// Right edge
    pub right: T,
    /// Bottom edge
    pub bottom: T,
}

impl<T: Copy> Edges<T> {
    /// Same value on every edge.
    #[must_use]
    pub const fn uniform(value: T) -> Self {
        Self {
            left: value,
            top: value,
            right: value,
            bottom: value,
        }
    }
}

impl Edges<f32> {
    /// Zero on every edge.
    pub const ZERO: Self = Self::uniform(0.0);
}
