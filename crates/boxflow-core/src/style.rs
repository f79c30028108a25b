//! Per-node style properties.

use crate::value::{OptionalFloat, Value};
use serde::{Deserialize, Serialize};

/// Inline direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Direction {
    /// Use the owner's direction
    #[default]
    Inherit,
    /// Left to right
    Ltr,
    /// Right to left
    Rtl,
}

impl Direction {
    /// Resolve `Inherit` against the owner; a root without direction is LTR.
    #[must_use]
    pub const fn resolve(self, owner: Self) -> Self {
        match (self, owner) {
            (Self::Inherit, Self::Inherit) => Self::Ltr,
            (Self::Inherit, owner) => owner,
            (own, _) => own,
        }
    }
}

/// Direction of the main axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FlexDirection {
    /// Top to bottom
    #[default]
    Column,
    /// Bottom to top
    ColumnReverse,
    /// Inline start to inline end
    Row,
    /// Inline end to inline start
    RowReverse,
}

impl FlexDirection {
    /// Horizontal axis.
    #[must_use]
    pub const fn is_row(self) -> bool {
        matches!(self, Self::Row | Self::RowReverse)
    }

    /// Vertical axis.
    #[must_use]
    pub const fn is_column(self) -> bool {
        matches!(self, Self::Column | Self::ColumnReverse)
    }

    /// Reversed axis.
    #[must_use]
    pub const fn is_reverse(self) -> bool {
        matches!(self, Self::RowReverse | Self::ColumnReverse)
    }

    /// Apply RTL to row directions.
    #[must_use]
    pub const fn resolve(self, direction: Direction) -> Self {
        match (self, direction) {
            (Self::Row, Direction::Rtl) => Self::RowReverse,
            (Self::RowReverse, Direction::Rtl) => Self::Row,
            (flex, _) => flex,
        }
    }

    /// The perpendicular axis under `direction`.
    #[must_use]
    pub const fn cross(self, direction: Direction) -> Self {
        if self.is_column() {
            Self::Row.resolve(direction)
        } else {
            Self::Column
        }
    }
}

/// Main-axis distribution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Justify {
    /// Pack at the start
    #[default]
    FlexStart,
    /// Center
    Center,
    /// Pack at the end
    FlexEnd,
    /// `n - 1` equal gaps between items
    SpaceBetween,
    /// Half gap on each side of every item
    SpaceAround,
    /// `n + 1` equal gaps
    SpaceEvenly,
}

/// Cross-axis alignment for items, self and lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Align {
    /// Defer to the owner (`align-self` only)
    #[default]
    Auto,
    /// Cross start
    FlexStart,
    /// Centered
    Center,
    /// Cross end
    FlexEnd,
    /// Fill the line
    Stretch,
    /// Align first baselines
    Baseline,
    /// Lines only
    SpaceBetween,
    /// Lines only
    SpaceAround,
}

/// Positioning scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PositionType {
    /// In flow, offset by `position` insets
    #[default]
    Relative,
    /// Out of flow, placed against the owner
    Absolute,
}

/// Line wrapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FlexWrap {
    /// Single line
    #[default]
    NoWrap,
    /// Multi-line
    Wrap,
    /// Multi-line, lines stacked from the cross end
    WrapReverse,
}

/// Overflow behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Overflow {
    /// Content may overflow
    #[default]
    Visible,
    /// Overflow is clipped
    Hidden,
    /// Overflow scrolls
    Scroll,
}

/// Box generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Display {
    /// Flex container
    #[default]
    Flex,
    /// No box; the subtree is zero-sized
    None,
}

/// Horizontal or vertical extent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Dimension {
    /// Horizontal
    Width,
    /// Vertical
    Height,
}

/// Style edge. Physical, logical and shorthand edges share one table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Edge {
    /// Physical left
    Left,
    /// Physical top
    Top,
    /// Physical right
    Right,
    /// Physical bottom
    Bottom,
    /// Left in LTR, right in RTL
    Start,
    /// Right in LTR, left in RTL
    End,
    /// Left and right
    Horizontal,
    /// Top and bottom
    Vertical,
    /// Every edge
    All,
}

impl Edge {
    const COUNT: usize = 9;

    const fn index(self) -> usize {
        self as usize
    }
}

/// Values for each [`Edge`] of a four-sided property.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EdgeValues([Value; Edge::COUNT]);

impl EdgeValues {
    /// Every edge undefined.
    pub const UNDEFINED: Self = Self([Value::Undefined; Edge::COUNT]);

    /// The raw value stored for `edge`.
    #[must_use]
    pub const fn get(&self, edge: Edge) -> Value {
        self.0[edge.index()]
    }

    /// Store a value for `edge`.
    pub fn set(&mut self, edge: Edge, value: Value) {
        self.0[edge.index()] = value;
    }

    /// Builder form of [`EdgeValues::set`].
    #[must_use]
    pub fn with(mut self, edge: Edge, value: Value) -> Self {
        self.set(edge, value);
        self
    }

    /// Resolve the value that applies to a physical edge.
    ///
    /// Order: the logical edge mapped onto it by `direction`, the physical
    /// edge, the axis shorthand, then `All`. Returns `Undefined` when none is
    /// set.
    #[must_use]
    pub fn computed(&self, edge: Edge, direction: Direction) -> Value {
        let rtl = matches!(direction, Direction::Rtl);
        let (logical, axis) = match edge {
            Edge::Left => (Some(if rtl { Edge::End } else { Edge::Start }), Edge::Horizontal),
            Edge::Right => (Some(if rtl { Edge::Start } else { Edge::End }), Edge::Horizontal),
            Edge::Top | Edge::Bottom => (None, Edge::Vertical),
            Edge::Start | Edge::End | Edge::Horizontal => (None, Edge::Horizontal),
            Edge::Vertical => (None, Edge::Vertical),
            Edge::All => (None, Edge::All),
        };
        [logical, Some(edge), Some(axis), Some(Edge::All)]
            .into_iter()
            .flatten()
            .map(|e| self.get(e))
            .find(|v| !v.is_undefined())
            .unwrap_or(Value::Undefined)
    }

    fn approx_eq(&self, other: &Self) -> bool {
        self.0.iter().zip(other.0.iter()).all(|(a, b)| a.approx_eq(*b))
    }
}

/// Layout-affecting style of one node.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Style {
    /// Inline direction
    pub direction: Direction,
    /// Main axis
    pub flex_direction: FlexDirection,
    /// Main-axis distribution
    pub justify_content: Justify,
    /// Cross-axis alignment of lines
    pub align_content: Align,
    /// Default cross-axis alignment of children
    pub align_items: Align,
    /// Override of the owner's `align_items`
    pub align_self: Align,
    /// Positioning scheme
    pub position_type: PositionType,
    /// Line wrapping
    pub flex_wrap: FlexWrap,
    /// Overflow behavior
    pub overflow: Overflow,
    /// Box generation
    pub display: Display,
    /// `flex` shorthand
    pub flex: OptionalFloat,
    /// Grow factor
    pub flex_grow: OptionalFloat,
    /// Shrink factor
    pub flex_shrink: OptionalFloat,
    /// Main size before grow/shrink
    pub flex_basis: Value,
    /// Outer spacing
    pub margin: EdgeValues,
    /// Insets for relative or absolute positioning
    pub position: EdgeValues,
    /// Inner spacing
    pub padding: EdgeValues,
    /// Border widths
    pub border: EdgeValues,
    /// Preferred width
    pub width: Value,
    /// Preferred height
    pub height: Value,
    /// Minimum width
    pub min_width: Value,
    /// Minimum height
    pub min_height: Value,
    /// Maximum width
    pub max_width: Value,
    /// Maximum height
    pub max_height: Value,
    /// Width / height
    pub aspect_ratio: OptionalFloat,
    /// Gap between columns
    pub column_gap: Value,
    /// Gap between rows
    pub row_gap: Value,
}

impl Default for Style {
    fn default() -> Self {
        Self {
            direction: Direction::Inherit,
            flex_direction: FlexDirection::Column,
            justify_content: Justify::FlexStart,
            align_content: Align::FlexStart,
            align_items: Align::Stretch,
            align_self: Align::Auto,
            position_type: PositionType::Relative,
            flex_wrap: FlexWrap::NoWrap,
            overflow: Overflow::Visible,
            display: Display::Flex,
            flex: OptionalFloat::UNDEFINED,
            flex_grow: OptionalFloat::UNDEFINED,
            flex_shrink: OptionalFloat::UNDEFINED,
            flex_basis: Value::Auto,
            margin: EdgeValues::UNDEFINED,
            position: EdgeValues::UNDEFINED,
            padding: EdgeValues::UNDEFINED,
            border: EdgeValues::UNDEFINED,
            width: Value::Auto,
            height: Value::Auto,
            min_width: Value::Undefined,
            min_height: Value::Undefined,
            max_width: Value::Undefined,
            max_height: Value::Undefined,
            aspect_ratio: OptionalFloat::UNDEFINED,
            column_gap: Value::Undefined,
            row_gap: Value::Undefined,
        }
    }
}

impl Style {
    /// Create a style with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Defaults matching CSS rather than the native defaults.
    #[must_use]
    pub fn web() -> Self {
        Self {
            flex_direction: FlexDirection::Row,
            align_content: Align::Stretch,
            flex_shrink: OptionalFloat::new(1.0),
            ..Self::default()
        }
    }

    /// Preferred size along `dim`.
    #[must_use]
    pub const fn dimension(&self, dim: Dimension) -> Value {
        match dim {
            Dimension::Width => self.width,
            Dimension::Height => self.height,
        }
    }

    /// Minimum size along `dim`.
    #[must_use]
    pub const fn min_dimension(&self, dim: Dimension) -> Value {
        match dim {
            Dimension::Width => self.min_width,
            Dimension::Height => self.min_height,
        }
    }

    /// Maximum size along `dim`.
    #[must_use]
    pub const fn max_dimension(&self, dim: Dimension) -> Value {
        match dim {
            Dimension::Width => self.max_width,
            Dimension::Height => self.max_height,
        }
    }

    /// Aspect ratio usable for sizing: positive and finite.
    ///
    /// The field is public, so a ratio written without the builder is checked
    /// here rather than at assignment.
    #[must_use]
    pub fn resolved_aspect_ratio(&self) -> Option<f32> {
        self.aspect_ratio
            .get()
            .filter(|ratio| *ratio > 0.0 && ratio.is_finite())
    }

    /// Preferred size with `min == max` collapsed onto it.
    #[must_use]
    pub fn resolved_dimension(&self, dim: Dimension) -> Value {
        let max = self.max_dimension(dim);
        if !max.is_undefined() && max.approx_eq(self.min_dimension(dim)) {
            max
        } else {
            self.dimension(dim)
        }
    }

    /// Effective grow factor, honoring the `flex` shorthand.
    #[must_use]
    pub fn resolved_flex_grow(&self) -> f32 {
        if let Some(grow) = self.flex_grow.get() {
            return grow;
        }
        match self.flex.get() {
            Some(flex) if flex > 0.0 => flex,
            _ => 0.0,
        }
    }

    /// Effective shrink factor, honoring the `flex` shorthand.
    #[must_use]
    pub fn resolved_flex_shrink(&self, use_web_defaults: bool) -> f32 {
        if let Some(shrink) = self.flex_shrink.get() {
            return shrink;
        }
        match self.flex.get() {
            Some(flex) if !use_web_defaults && flex < 0.0 => -flex,
            _ if use_web_defaults => 1.0,
            _ => 0.0,
        }
    }

    /// Effective basis, honoring the `flex` shorthand.
    #[must_use]
    pub fn resolved_flex_basis(&self, use_web_defaults: bool) -> Value {
        if !self.flex_basis.is_auto() && !self.flex_basis.is_undefined() {
            return self.flex_basis;
        }
        match self.flex.get() {
            Some(flex) if flex > 0.0 => {
                if use_web_defaults {
                    Value::Auto
                } else {
                    Value::Point(0.0)
                }
            }
            _ => Value::Auto,
        }
    }

    /// Whether the item participates in grow or shrink.
    #[must_use]
    pub fn is_flexible(&self, use_web_defaults: bool) -> bool {
        self.position_type == PositionType::Relative
            && (self.resolved_flex_grow() != 0.0 || self.resolved_flex_shrink(use_web_defaults) != 0.0)
    }

    /// Equality with float fields compared by tolerance.
    #[must_use]
    pub fn layout_eq(&self, other: &Self) -> bool {
        self.direction == other.direction
            && self.flex_direction == other.flex_direction
            && self.justify_content == other.justify_content
            && self.align_content == other.align_content
            && self.align_items == other.align_items
            && self.align_self == other.align_self
            && self.position_type == other.position_type
            && self.flex_wrap == other.flex_wrap
            && self.overflow == other.overflow
            && self.display == other.display
            && self.flex.approx_eq(other.flex)
            && self.flex_grow.approx_eq(other.flex_grow)
            && self.flex_shrink.approx_eq(other.flex_shrink)
            && self.flex_basis.approx_eq(other.flex_basis)
            && self.margin.approx_eq(&other.margin)
            && self.position.approx_eq(&other.position)
            && self.padding.approx_eq(&other.padding)
            && self.border.approx_eq(&other.border)
            && self.width.approx_eq(other.width)
            && self.height.approx_eq(other.height)
            && self.min_width.approx_eq(other.min_width)
            && self.min_height.approx_eq(other.min_height)
            && self.max_width.approx_eq(other.max_width)
            && self.max_height.approx_eq(other.max_height)
            && self.aspect_ratio.approx_eq(other.aspect_ratio)
            && self.column_gap.approx_eq(other.column_gap)
            && self.row_gap.approx_eq(other.row_gap)
    }

    // Builders

    /// Set the inline direction.
    #[must_use]
    pub const fn direction(mut self, direction: Direction) -> Self {
        self.direction = direction;
        self
    }

    /// Set the main axis.
    #[must_use]
    pub const fn flex_direction(mut self, flex_direction: FlexDirection) -> Self {
        self.flex_direction = flex_direction;
        self
    }

    /// Set main-axis distribution.
    #[must_use]
    pub const fn justify_content(mut self, justify: Justify) -> Self {
        self.justify_content = justify;
        self
    }

    /// Set line alignment.
    #[must_use]
    pub const fn align_content(mut self, align: Align) -> Self {
        self.align_content = align;
        self
    }

    /// Set child alignment.
    #[must_use]
    pub const fn align_items(mut self, align: Align) -> Self {
        self.align_items = align;
        self
    }

    /// Set self alignment.
    #[must_use]
    pub const fn align_self(mut self, align: Align) -> Self {
        self.align_self = align;
        self
    }

    /// Set the positioning scheme.
    #[must_use]
    pub const fn position_type(mut self, position_type: PositionType) -> Self {
        self.position_type = position_type;
        self
    }

    /// Set wrapping.
    #[must_use]
    pub const fn flex_wrap(mut self, wrap: FlexWrap) -> Self {
        self.flex_wrap = wrap;
        self
    }

    /// Set overflow.
    #[must_use]
    pub const fn overflow(mut self, overflow: Overflow) -> Self {
        self.overflow = overflow;
        self
    }

    /// Set display.
    #[must_use]
    pub const fn display(mut self, display: Display) -> Self {
        self.display = display;
        self
    }

    /// Set the `flex` shorthand.
    #[must_use]
    pub fn flex(mut self, flex: f32) -> Self {
        self.flex = OptionalFloat::new(flex);
        self
    }

    /// Set the grow factor.
    #[must_use]
    pub fn flex_grow(mut self, grow: f32) -> Self {
        self.flex_grow = OptionalFloat::new(grow);
        self
    }

    /// Set the shrink factor.
    #[must_use]
    pub fn flex_shrink(mut self, shrink: f32) -> Self {
        self.flex_shrink = OptionalFloat::new(shrink);
        self
    }

    /// Set the basis.
    #[must_use]
    pub const fn flex_basis(mut self, basis: Value) -> Self {
        self.flex_basis = basis;
        self
    }

    /// Set one margin edge.
    #[must_use]
    pub fn margin(mut self, edge: Edge, value: Value) -> Self {
        self.margin.set(edge, value);
        self
    }

    /// Set one position inset.
    #[must_use]
    pub fn position(mut self, edge: Edge, value: Value) -> Self {
        self.position.set(edge, value);
        self
    }

    /// Set one padding edge.
    #[must_use]
    pub fn padding(mut self, edge: Edge, value: Value) -> Self {
        self.padding.set(edge, value);
        self
    }

    /// Set one border edge.
    #[must_use]
    pub fn border(mut self, edge: Edge, width: f32) -> Self {
        self.border.set(edge, Value::point(width));
        self
    }

    /// Set the preferred width.
    #[must_use]
    pub const fn width(mut self, width: Value) -> Self {
        self.width = width;
        self
    }

    /// Set the preferred height.
    #[must_use]
    pub const fn height(mut self, height: Value) -> Self {
        self.height = height;
        self
    }

    /// Set width and height in points.
    #[must_use]
    pub fn size(self, width: f32, height: f32) -> Self {
        self.width(Value::point(width)).height(Value::point(height))
    }

    /// Set the minimum width.
    #[must_use]
    pub const fn min_width(mut self, value: Value) -> Self {
        self.min_width = value;
        self
    }

    /// Set the minimum height.
    #[must_use]
    pub const fn min_height(mut self, value: Value) -> Self {
        self.min_height = value;
        self
    }

    /// Set the maximum width.
    #[must_use]
    pub const fn max_width(mut self, value: Value) -> Self {
        self.max_width = value;
        self
    }

    /// Set the maximum height.
    #[must_use]
    pub const fn max_height(mut self, value: Value) -> Self {
        self.max_height = value;
        self
    }

    /// Set the aspect ratio (width / height). Non-positive ratios are ignored.
    #[must_use]
    pub fn aspect_ratio(mut self, ratio: f32) -> Self {
        self.aspect_ratio = if ratio > 0.0 && ratio.is_finite() {
            OptionalFloat::new(ratio)
        } else {
            OptionalFloat::UNDEFINED
        };
        self
    }

    /// Set both gaps.
    #[must_use]
    pub const fn gap(mut self, gap: Value) -> Self {
        self.column_gap = gap;
        self.row_gap = gap;
        self
    }

    /// Set the gap between columns.
    #[must_use]
    pub const fn column_gap(mut self, gap: Value) -> Self {
        self.column_gap = gap;
        self
    }

    /// Set the gap between rows.
    #[must_use]
    pub const fn row_gap(mut self, gap: Value) -> Self {
        self.row_gap = gap;
        self
    }
}
