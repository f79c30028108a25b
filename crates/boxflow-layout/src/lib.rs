#![allow(clippy::missing_const_for_fn)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::too_many_arguments)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::needless_range_loop)]
#![allow(clippy::suboptimal_flops)]
#![allow(clippy::float_cmp_const)]
#![allow(clippy::doc_markdown)]
//! Flexbox layout engine for boxflow.
//!
//! A [`LayoutTree`] owns styled nodes and computes, for each one, a border-box
//! size and an offset within its owner. The algorithm follows CSS flexbox:
//!
//! - **Flex lines**: children are sized from their flex basis, broken into
//!   lines when wrapping, and grown or shrunk to fill each line
//! - **Alignment**: `justify-content`, `align-items`/`align-self`,
//!   `align-content` and baseline alignment
//! - **Box model**: margins (including `auto`), padding, borders, min/max
//!   clamps and percentages
//! - **Absolute positioning** against the owner's padding box
//!
//! Results are memoized per node. After a pass only nodes marked dirty, and
//! their ancestors, are recomputed; everything else is served from cache.
//! Leaves with content (text, images) supply a measure function.

mod axis;
mod cache;
mod config;
mod engine;
mod error;
mod flex;
mod node;
mod rounding;
mod tree;

pub use boxflow_core::{
    floats_equal, Align, AxisConstraint, Dimension, Direction, Display, Edge, EdgeValues, Edges,
    FlexDirection, FlexWrap, Justify, MeasureMode, OptionalFloat, Overflow, PositionType, Size,
    Style, Value, EPSILON,
};
pub use cache::CacheStats;
pub use config::LayoutConfig;
pub use error::{LayoutError, LayoutResult};
pub use node::{BaselineFunc, Layout, MeasureFunc, NodeId};
pub use tree::LayoutTree;
