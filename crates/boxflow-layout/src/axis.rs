//! Axis-relative views of a node's box model.
//!
//! The algorithm is written once in terms of main and cross axes. These helpers
//! translate an axis into physical edges and dimensions and resolve margins,
//! padding, borders and position insets along it.

use boxflow_core::{Dimension, Direction, Edge, Edges, FlexDirection, OptionalFloat, Size, Style, Value};

/// Edge where an axis starts.
pub(crate) const fn leading_edge(axis: FlexDirection) -> Edge {
    match axis {
        FlexDirection::Column => Edge::Top,
        FlexDirection::ColumnReverse => Edge::Bottom,
        FlexDirection::Row => Edge::Left,
        FlexDirection::RowReverse => Edge::Right,
    }
}

/// Edge where an axis ends.
pub(crate) const fn trailing_edge(axis: FlexDirection) -> Edge {
    match axis {
        FlexDirection::Column => Edge::Bottom,
        FlexDirection::ColumnReverse => Edge::Top,
        FlexDirection::Row => Edge::Right,
        FlexDirection::RowReverse => Edge::Left,
    }
}

/// Dimension measured along an axis.
pub(crate) const fn dimension(axis: FlexDirection) -> Dimension {
    if axis.is_row() {
        Dimension::Width
    } else {
        Dimension::Height
    }
}

/// Component of `size` along `axis`.
pub(crate) const fn along(size: Size, axis: FlexDirection) -> f32 {
    if axis.is_row() {
        size.width
    } else {
        size.height
    }
}

/// Set the component of `size` along `axis`.
pub(crate) fn set_along(size: &mut Size, axis: FlexDirection, value: f32) {
    if axis.is_row() {
        size.width = value;
    } else {
        size.height = value;
    }
}

/// A definite preferred size along `axis`.
pub(crate) fn is_style_dim_defined(style: &Style, axis: FlexDirection, owner_size: OptionalFloat) -> bool {
    match style.resolved_dimension(dimension(axis)) {
        Value::Point(v) => v >= 0.0 && v.is_finite(),
        Value::Percent(p) => p >= 0.0 && p.is_finite() && owner_size.is_defined(),
        Value::Auto | Value::Undefined => false,
    }
}

/// Clamp `value` into the node's min/max along `axis`. Max applies first, so
/// min wins when they conflict.
pub(crate) fn bound_axis_within_min_max(
    style: &Style,
    axis: FlexDirection,
    value: OptionalFloat,
    axis_size: OptionalFloat,
) -> OptionalFloat {
    let dim = dimension(axis);
    let min = style.min_dimension(dim).resolve(axis_size);
    let max = style.max_dimension(dim).resolve(axis_size);
    let mut bounded = value;
    if let Some(max_value) = max.get() {
        if max_value >= 0.0 && bounded.gt(max_value) {
            bounded = max;
        }
    }
    if let Some(min_value) = min.get() {
        if min_value >= 0.0 && bounded.lt(min_value) {
            bounded = min;
        }
    }
    bounded
}

/// Style plus resolved direction: everything needed to turn edge values into
/// numbers along an axis.
#[derive(Debug, Clone, Copy)]
pub(crate) struct BoxModel<'a> {
    pub(crate) style: &'a Style,
    direction: Direction,
}

impl<'a> BoxModel<'a> {
    pub(crate) const fn new(style: &'a Style, direction: Direction) -> Self {
        Self { style, direction }
    }

    fn margin_value(&self, edge: Edge) -> Value {
        self.style.margin.computed(edge, self.direction)
    }

    fn position_value(&self, edge: Edge) -> Value {
        self.style.position.computed(edge, self.direction)
    }

    fn non_negative(value: OptionalFloat) -> f32 {
        value.get().filter(|v| *v >= 0.0).unwrap_or(0.0)
    }

    fn padding(&self, edge: Edge, width: OptionalFloat) -> f32 {
        Self::non_negative(self.style.padding.computed(edge, self.direction).resolve(width))
    }

    fn border(&self, edge: Edge) -> f32 {
        Self::non_negative(
            self.style
                .border
                .computed(edge, self.direction)
                .resolve(OptionalFloat::UNDEFINED),
        )
    }

    fn margin(&self, edge: Edge, width: OptionalFloat) -> f32 {
        self.margin_value(edge).resolve_margin(width).unwrap_or(0.0)
    }

    pub(crate) fn leading_margin(&self, axis: FlexDirection, width: OptionalFloat) -> f32 {
        self.margin(leading_edge(axis), width)
    }

    pub(crate) fn trailing_margin(&self, axis: FlexDirection, width: OptionalFloat) -> f32 {
        self.margin(trailing_edge(axis), width)
    }

    pub(crate) fn margin_for_axis(&self, axis: FlexDirection, width: OptionalFloat) -> f32 {
        self.leading_margin(axis, width) + self.trailing_margin(axis, width)
    }

    pub(crate) fn is_leading_margin_auto(&self, axis: FlexDirection) -> bool {
        self.margin_value(leading_edge(axis)).is_auto()
    }

    pub(crate) fn is_trailing_margin_auto(&self, axis: FlexDirection) -> bool {
        self.margin_value(trailing_edge(axis)).is_auto()
    }

    pub(crate) fn leading_border(&self, axis: FlexDirection) -> f32 {
        self.border(leading_edge(axis))
    }

    pub(crate) fn trailing_border(&self, axis: FlexDirection) -> f32 {
        self.border(trailing_edge(axis))
    }

    pub(crate) fn leading_padding_and_border(&self, axis: FlexDirection, width: OptionalFloat) -> f32 {
        self.padding(leading_edge(axis), width) + self.leading_border(axis)
    }

    pub(crate) fn trailing_padding_and_border(&self, axis: FlexDirection, width: OptionalFloat) -> f32 {
        self.padding(trailing_edge(axis), width) + self.trailing_border(axis)
    }

    pub(crate) fn padding_and_border_for_axis(&self, axis: FlexDirection, width: OptionalFloat) -> f32 {
        self.leading_padding_and_border(axis, width) + self.trailing_padding_and_border(axis, width)
    }

    pub(crate) fn is_leading_position_defined(&self, axis: FlexDirection) -> bool {
        matches!(
            self.position_value(leading_edge(axis)),
            Value::Point(_) | Value::Percent(_)
        )
    }

    pub(crate) fn is_trailing_position_defined(&self, axis: FlexDirection) -> bool {
        matches!(
            self.position_value(trailing_edge(axis)),
            Value::Point(_) | Value::Percent(_)
        )
    }

    pub(crate) fn leading_position(&self, axis: FlexDirection, axis_size: OptionalFloat) -> f32 {
        self.position_value(leading_edge(axis))
            .resolve(axis_size)
            .unwrap_or(0.0)
    }

    pub(crate) fn trailing_position(&self, axis: FlexDirection, axis_size: OptionalFloat) -> f32 {
        self.position_value(trailing_edge(axis))
            .resolve(axis_size)
            .unwrap_or(0.0)
    }

    /// Offset applied to a relatively positioned node: the leading inset, or
    /// the negated trailing inset when only that one is set.
    pub(crate) fn relative_position(&self, axis: FlexDirection, axis_size: OptionalFloat) -> f32 {
        if self.is_leading_position_defined(axis) {
            self.leading_position(axis, axis_size)
        } else {
            -self.trailing_position(axis, axis_size)
        }
    }

    pub(crate) fn margin_edges(&self, width: OptionalFloat) -> Edges<f32> {
        Edges {
            left: self.margin(Edge::Left, width),
            top: self.margin(Edge::Top, width),
            right: self.margin(Edge::Right, width),
            bottom: self.margin(Edge::Bottom, width),
        }
    }

    pub(crate) fn padding_edges(&self, width: OptionalFloat) -> Edges<f32> {
        Edges {
            left: self.padding(Edge::Left, width),
            top: self.padding(Edge::Top, width),
            right: self.padding(Edge::Right, width),
            bottom: self.padding(Edge::Bottom, width),
        }
    }

    pub(crate) fn border_edges(&self) -> Edges<f32> {
        Edges {
            left: self.border(Edge::Left),
            top: self.border(Edge::Top),
            right: self.border(Edge::Right),
            bottom: self.border(Edge::Bottom),
        }
    }

    /// Clamp into min/max, then never below padding plus border.
    pub(crate) fn bound_axis(
        &self,
        axis: FlexDirection,
        value: OptionalFloat,
        axis_size: OptionalFloat,
        width: OptionalFloat,
    ) -> f32 {
        let floor = self.padding_and_border_for_axis(axis, width);
        bound_axis_within_min_max(self.style, axis, value, axis_size)
            .max(OptionalFloat::new(floor))
            .unwrap_or(floor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const W: OptionalFloat = OptionalFloat::UNDEFINED;

    #[test]
    fn test_edges_per_axis() {
        assert_eq!(leading_edge(FlexDirection::Row), Edge::Left);
        assert_eq!(trailing_edge(FlexDirection::RowReverse), Edge::Left);
        assert_eq!(leading_edge(FlexDirection::ColumnReverse), Edge::Bottom);
        assert_eq!(dimension(FlexDirection::ColumnReverse), Dimension::Height);
    }

    #[test]
    fn test_along() {
        let mut s = Size::new(3.0, 4.0);
        assert_eq!(along(s, FlexDirection::Row), 3.0);
        set_along(&mut s, FlexDirection::Column, 9.0);
        assert_eq!(s.height, 9.0);
    }

    #[test]
    fn test_margin_percent_resolves_against_width() {
        let style = Style::new().margin(Edge::All, Value::Percent(10.0));
        let bm = BoxModel::new(&style, Direction::Ltr);
        let width = OptionalFloat::new(200.0);
        assert_eq!(bm.leading_margin(FlexDirection::Column, width), 20.0);
        assert_eq!(bm.margin_for_axis(FlexDirection::Row, width), 40.0);
    }

    #[test]
    fn test_start_margin_follows_direction() {
        let style = Style::new().margin(Edge::Start, Value::Point(5.0));
        let ltr = BoxModel::new(&style, Direction::Ltr);
        let rtl = BoxModel::new(&style, Direction::Rtl);
        assert_eq!(ltr.leading_margin(FlexDirection::Row, W), 5.0);
        assert_eq!(rtl.leading_margin(FlexDirection::Row, W), 0.0);
        assert_eq!(rtl.leading_margin(FlexDirection::RowReverse, W), 5.0);
    }

    #[test]
    fn test_negative_padding_and_border_ignored() {
        let style = Style::new()
            .padding(Edge::Left, Value::Point(-4.0))
            .border(Edge::Right, -2.0)
            .padding(Edge::Top, Value::Point(3.0))
            .border(Edge::Bottom, 1.0);
        let bm = BoxModel::new(&style, Direction::Ltr);
        assert_eq!(bm.padding_and_border_for_axis(FlexDirection::Row, W), 0.0);
        assert_eq!(bm.padding_and_border_for_axis(FlexDirection::Column, W), 4.0);
    }

    #[test]
    fn test_relative_position() {
        let trailing_only = Style::new().position(Edge::Right, Value::Point(7.0));
        let bm = BoxModel::new(&trailing_only, Direction::Ltr);
        assert_eq!(bm.relative_position(FlexDirection::Row, W), -7.0);

        let both = trailing_only.position(Edge::Left, Value::Point(3.0));
        let bm = BoxModel::new(&both, Direction::Ltr);
        assert_eq!(bm.relative_position(FlexDirection::Row, W), 3.0);
    }

    #[test]
    fn test_auto_margin_detection() {
        let style = Style::new().margin(Edge::Left, Value::Auto);
        let bm = BoxModel::new(&style, Direction::Ltr);
        assert!(bm.is_leading_margin_auto(FlexDirection::Row));
        assert!(!bm.is_trailing_margin_auto(FlexDirection::Row));
        assert_eq!(bm.leading_margin(FlexDirection::Row, W), 0.0);
    }

    #[test]
    fn test_bound_axis_min_beats_max() {
        let style = Style::new()
            .min_width(Value::Point(50.0))
            .max_width(Value::Point(30.0));
        let bounded =
            bound_axis_within_min_max(&style, FlexDirection::Row, OptionalFloat::new(40.0), W);
        assert_eq!(bounded.get(), Some(50.0));
    }

    #[test]
    fn test_bound_axis_floors_at_padding_and_border() {
        let style = Style::new().padding(Edge::Horizontal, Value::Point(10.0));
        let bm = BoxModel::new(&style, Direction::Ltr);
        assert_eq!(bm.bound_axis(FlexDirection::Row, OptionalFloat::new(5.0), W, W), 20.0);
        assert_eq!(bm.bound_axis(FlexDirection::Row, OptionalFloat::UNDEFINED, W, W), 20.0);
    }

    #[test]
    fn test_style_dim_defined() {
        let style = Style::new().width(Value::Percent(50.0)).height(Value::Point(10.0));
        assert!(!is_style_dim_defined(&style, FlexDirection::Row, W));
        assert!(is_style_dim_defined(&style, FlexDirection::Row, OptionalFloat::new(100.0)));
        assert!(is_style_dim_defined(&style, FlexDirection::Column, W));

        let mut raw = Style::new();
        raw.width = Value::Point(f32::INFINITY);
        assert!(!is_style_dim_defined(&raw, FlexDirection::Row, OptionalFloat::new(100.0)));
    }
}
