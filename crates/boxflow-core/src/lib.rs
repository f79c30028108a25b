//! Core types for the boxflow layout engine.
//!
//! This crate provides the data model shared by the layout algorithm:
//! - Style dimensions: [`Value`] and the computed [`OptionalFloat`]
//! - Geometric primitives: [`Size`], [`Edges`]
//! - Sizing constraints: [`MeasureMode`], [`AxisConstraint`]
//! - Per-node style: [`Style`] and its enums

mod constraints;
mod geometry;
mod style;
mod value;

pub use constraints::{AxisConstraint, MeasureMode};
pub use geometry::{Edges, Size};
pub use style::{
    Align, Dimension, Direction, Display, Edge, EdgeValues, FlexDirection, FlexWrap, Justify,
    Overflow, PositionType, Style,
};
pub use value::{floats_equal, OptionalFloat, Value, EPSILON};
