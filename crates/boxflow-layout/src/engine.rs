//! The flexbox algorithm.
//!
//! `layout_node` is the memoizing entry point for every node visit: it decides
//! whether the node's cached result still applies and otherwise runs
//! `layout_impl`. A visit either measures (size only) or performs layout
//! (size plus final positions of every descendant).
//!
//! A container visit runs these steps:
//! 1. resolve the flex basis of every child
//! 2. break children into lines
//! 3. distribute free space per line and size each item
//! 4. justify along the main axis
//! 5. align items on the cross axis
//! 6. place lines (`align-content`, baselines)
//! 7. size the container itself
//! 8. reverse lines for `wrap-reverse`
//! 9. lay out absolute children
//! 10. derive trailing offsets

use boxflow_core::{
    floats_equal, Align, AxisConstraint, Dimension, Direction, Display, FlexDirection, FlexWrap,
    Justify, MeasureMode, OptionalFloat, Overflow, PositionType, Size, Style, Value,
};
use tracing::trace;

use crate::axis::{
    along, bound_axis_within_min_max, dimension, is_style_dim_defined, leading_edge, set_along,
    trailing_edge, BoxModel,
};
use crate::flex::{self, FlexItem, FlexLine, LineCandidate, Spacing};
use crate::node::{Layout, NodeId};
use crate::tree::LayoutTree;

/// Values shared by the steps of one container visit.
#[derive(Debug, Clone, Copy)]
struct Container {
    direction: Direction,
    main: FlexDirection,
    cross: FlexDirection,
    is_main_row: bool,
    wrap: FlexWrap,
    inner_width: OptionalFloat,
    inner_height: OptionalFloat,
    width_mode: MeasureMode,
    height_mode: MeasureMode,
    main_mode: MeasureMode,
    cross_mode: MeasureMode,
    main_gap: f32,
    cross_gap: f32,
    flex_basis_overflows: bool,
    baseline_layout: bool,
    web: bool,
}

impl Container {
    const fn inner_main(&self) -> OptionalFloat {
        if self.is_main_row {
            self.inner_width
        } else {
            self.inner_height
        }
    }

    const fn inner_cross(&self) -> OptionalFloat {
        if self.is_main_row {
            self.inner_height
        } else {
            self.inner_width
        }
    }

    fn is_wrap(&self) -> bool {
        self.wrap != FlexWrap::NoWrap
    }
}

/// Effective cross alignment of `child` inside `owner`.
fn align_item(owner: &Style, child: &Style) -> Align {
    let align = if child.align_self == Align::Auto {
        owner.align_items
    } else {
        child.align_self
    };
    if align == Align::Baseline && owner.flex_direction.is_column() {
        Align::FlexStart
    } else {
        align
    }
}

fn child_box(style: &Style, owner_direction: Direction) -> BoxModel<'_> {
    BoxModel::new(style, style.direction.resolve(owner_direction))
}

fn non_negative(value: OptionalFloat) -> f32 {
    value.get().filter(|v| *v > 0.0).unwrap_or(0.0)
}

/// NaN, infinite and negative host results collapse to zero.
fn sanitize_measured(value: f32) -> f32 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}

/// Space inside padding and border along `axis`, clamped to min/max.
fn available_inner(
    bm: &BoxModel<'_>,
    axis: FlexDirection,
    available: OptionalFloat,
    owner_size: OptionalFloat,
    owner_width: OptionalFloat,
) -> OptionalFloat {
    let margin = bm.margin_for_axis(axis, owner_width);
    let padding_border = bm.padding_and_border_for_axis(axis, owner_width);
    let dim = dimension(axis);
    (available - margin - padding_border).map(|inner| {
        let min = (bm.style.min_dimension(dim).resolve(owner_size) - padding_border).unwrap_or(0.0);
        let max = (bm.style.max_dimension(dim).resolve(owner_size) - padding_border).unwrap_or(f32::MAX);
        inner.min(max).max(min)
    })
}

/// Write the trailing offset along `axis` so both offsets describe the box
/// inside an owner of `owner_extent`.
fn settle_trailing(layout: &mut Layout, axis: FlexDirection, owner_extent: f32) {
    let extent = if axis.is_row() {
        layout.width
    } else {
        layout.height
    };
    let leading = layout.position(leading_edge(axis));
    layout.set_position(trailing_edge(axis), owner_extent - extent - leading);
}

impl LayoutTree {
    /// Run one full pass from `root`.
    pub(crate) fn compute_root(
        &mut self,
        root: NodeId,
        owner_width: OptionalFloat,
        owner_height: OptionalFloat,
        owner_direction: Direction,
    ) {
        self.pass = self.pass.wrapping_add(1);
        let style = self.node(root).style;
        let direction = style.direction.resolve(owner_direction);
        let bm = BoxModel::new(&style, direction);
        let width = Self::root_constraint(&bm, FlexDirection::Row, owner_width, owner_width);
        let height = Self::root_constraint(&bm, FlexDirection::Column, owner_height, owner_width);

        self.layout_node(
            root,
            width,
            height,
            owner_direction,
            owner_width,
            owner_height,
            true,
            "initial",
        );
        self.place_node(root, direction, owner_width, owner_height);

        let layout = &mut self.node_mut(root).layout;
        if let Some(w) = owner_width.get() {
            settle_trailing(layout, FlexDirection::Row.resolve(direction), w);
        }
        if let Some(h) = owner_height.get() {
            settle_trailing(layout, FlexDirection::Column, h);
        }

        let scale = self.config.point_scale_factor;
        if scale > 0.0 {
            self.round_to_pixel_grid(root, scale, 0.0, 0.0);
        }
    }

    fn root_constraint(
        bm: &BoxModel<'_>,
        axis: FlexDirection,
        owner_size: OptionalFloat,
        owner_width: OptionalFloat,
    ) -> AxisConstraint {
        let style = bm.style;
        let dim = dimension(axis);
        if is_style_dim_defined(style, axis, owner_size) {
            let size = style.resolved_dimension(dim).resolve(owner_size)
                + bm.margin_for_axis(axis, owner_width);
            return AxisConstraint::new(size, MeasureMode::Exactly);
        }
        let max = style.max_dimension(dim).resolve(owner_size);
        if max.get().is_some_and(|m| m >= 0.0) {
            AxisConstraint::new(max, MeasureMode::AtMost)
        } else {
            AxisConstraint::exact_or_undefined(owner_size)
        }
    }

    /// Memoized visit. Returns `true` when the node was actually computed.
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn layout_node(
        &mut self,
        id: NodeId,
        width: AxisConstraint,
        height: AxisConstraint,
        owner_direction: Direction,
        owner_width: OptionalFloat,
        owner_height: OptionalFloat,
        perform_layout: bool,
        reason: &'static str,
    ) -> bool {
        let width = width.sanitized();
        let height = height.sanitized();
        let pass = self.pass;

        let node = self.node_mut(id);
        let need_visit = (node.dirty && node.state.generation != pass)
            || node.state.last_owner_direction != Some(owner_direction);
        if need_visit {
            node.state.cache.clear();
        }
        let cached = node.state.cache.get(width, height, perform_layout);

        if let Some(size) = cached {
            node.state.measured = size;
            self.stats.record_hit();
            trace!(node = %id, reason, perform_layout, "layout cache hit");
        } else {
            let cold = node.state.cache.is_empty();
            self.stats.record_miss();
            trace!(
                node = %id,
                reason,
                perform_layout,
                cold,
                ?width,
                ?height,
                "layout node"
            );
            self.layout_impl(
                id,
                width,
                height,
                owner_direction,
                owner_width,
                owner_height,
                perform_layout,
            );
            let node = self.node_mut(id);
            node.state.last_owner_direction = Some(owner_direction);
            let measured = node.state.measured;
            node.state.cache.insert(width, height, perform_layout, measured);
        }

        let node = self.node_mut(id);
        if perform_layout {
            node.layout.width = node.state.measured.width;
            node.layout.height = node.state.measured.height;
            node.layout.mark_computed();
            if cached.is_none() {
                node.layout.generation = pass;
            }
            node.has_new_layout = true;
            node.dirty = false;
        }
        node.state.generation = pass;
        cached.is_none()
    }

    #[allow(clippy::too_many_arguments)]
    fn layout_impl(
        &mut self,
        id: NodeId,
        width: AxisConstraint,
        height: AxisConstraint,
        owner_direction: Direction,
        owner_width: OptionalFloat,
        owner_height: OptionalFloat,
        perform_layout: bool,
    ) {
        let style = self.node(id).style;
        let direction = style.direction.resolve(owner_direction);
        let bm = BoxModel::new(&style, direction);

        let node = self.node_mut(id);
        node.layout.direction = direction;
        node.layout.margin = bm.margin_edges(owner_width);
        node.layout.padding = bm.padding_edges(owner_width);
        node.layout.border = bm.border_edges();
        let has_measure = node.measure.is_some();
        let child_count = node.children.len();

        if has_measure {
            self.measure_leaf(id, &bm, width, height, owner_width, owner_height);
            return;
        }
        if child_count == 0 {
            self.size_empty_container(id, &bm, width, height, owner_width, owner_height);
            return;
        }
        if !perform_layout && self.size_fixed(id, &bm, width, height, owner_width, owner_height) {
            return;
        }

        self.node_mut(id).layout.had_overflow = false;
        self.layout_container(
            id,
            &bm,
            direction,
            width,
            height,
            owner_width,
            owner_height,
            perform_layout,
        );
    }

    fn measure_leaf(
        &mut self,
        id: NodeId,
        bm: &BoxModel<'_>,
        width: AxisConstraint,
        height: AxisConstraint,
        owner_width: OptionalFloat,
        owner_height: OptionalFloat,
    ) {
        let row = FlexDirection::Row;
        let column = FlexDirection::Column;
        let pb_row = bm.padding_and_border_for_axis(row, owner_width);
        let pb_column = bm.padding_and_border_for_axis(column, owner_width);
        let margin_row = bm.margin_for_axis(row, owner_width);
        let margin_column = bm.margin_for_axis(column, owner_width);

        let measured = if width.is_exact() && height.is_exact() {
            Size::new(
                bm.bound_axis(row, width.size - margin_row, owner_width, owner_width),
                bm.bound_axis(column, height.size - margin_column, owner_height, owner_width),
            )
        } else {
            let inner_width = (width.size - margin_row - pb_row).map(|v| v.max(0.0));
            let inner_height = (height.size - margin_column - pb_column).map(|v| v.max(0.0));
            let content = self.call_measure(id, inner_width, width.mode, inner_height, height.mode);
            let outer_width = if width.is_exact() {
                width.size - margin_row
            } else {
                OptionalFloat::new(content.width + pb_row)
            };
            let outer_height = if height.is_exact() {
                height.size - margin_column
            } else {
                OptionalFloat::new(content.height + pb_column)
            };
            Size::new(
                bm.bound_axis(row, outer_width, owner_width, owner_width),
                bm.bound_axis(column, outer_height, owner_height, owner_width),
            )
        };
        self.node_mut(id).state.measured = measured;
    }

    fn call_measure(
        &mut self,
        id: NodeId,
        width: OptionalFloat,
        width_mode: MeasureMode,
        height: OptionalFloat,
        height_mode: MeasureMode,
    ) -> Size {
        self.stats.record_measure();
        let node = self.node_mut(id);
        let content = node
            .measure
            .as_mut()
            .map_or(Size::ZERO, |measure| measure(id, width, width_mode, height, height_mode));
        trace!(
            node = %id,
            ?width_mode,
            ?height_mode,
            content_width = content.width,
            content_height = content.height,
            "measure"
        );
        Size::new(
            sanitize_measured(content.width),
            sanitize_measured(content.height),
        )
    }

    fn size_empty_container(
        &mut self,
        id: NodeId,
        bm: &BoxModel<'_>,
        width: AxisConstraint,
        height: AxisConstraint,
        owner_width: OptionalFloat,
        owner_height: OptionalFloat,
    ) {
        let row = FlexDirection::Row;
        let column = FlexDirection::Column;
        let outer_width = if width.is_exact() {
            width.size - bm.margin_for_axis(row, owner_width)
        } else {
            OptionalFloat::new(bm.padding_and_border_for_axis(row, owner_width))
        };
        let outer_height = if height.is_exact() {
            height.size - bm.margin_for_axis(column, owner_width)
        } else {
            OptionalFloat::new(bm.padding_and_border_for_axis(column, owner_width))
        };
        self.node_mut(id).state.measured = Size::new(
            bm.bound_axis(row, outer_width, owner_width, owner_width),
            bm.bound_axis(column, outer_height, owner_height, owner_width),
        );
    }

    /// Measure-only shortcut when the constraints already fix the size.
    fn size_fixed(
        &mut self,
        id: NodeId,
        bm: &BoxModel<'_>,
        width: AxisConstraint,
        height: AxisConstraint,
        owner_width: OptionalFloat,
        owner_height: OptionalFloat,
    ) -> bool {
        let collapsed = |c: AxisConstraint| {
            c.mode == MeasureMode::AtMost && c.size.get().is_some_and(|v| v <= 0.0)
        };
        if !(collapsed(width) || collapsed(height) || (width.is_exact() && height.is_exact())) {
            return false;
        }
        let row = FlexDirection::Row;
        let column = FlexDirection::Column;
        let outer = |c: AxisConstraint, margin: f32| {
            if c.size.is_undefined() {
                OptionalFloat::ZERO
            } else {
                c.size - margin
            }
        };
        let outer_width = outer(width, bm.margin_for_axis(row, owner_width));
        let outer_height = outer(height, bm.margin_for_axis(column, owner_width));
        self.node_mut(id).state.measured = Size::new(
            bm.bound_axis(row, outer_width, owner_width, owner_width),
            bm.bound_axis(column, outer_height, owner_height, owner_width),
        );
        true
    }

    #[allow(clippy::too_many_arguments, clippy::too_many_lines)]
    fn layout_container(
        &mut self,
        id: NodeId,
        bm: &BoxModel<'_>,
        direction: Direction,
        width: AxisConstraint,
        height: AxisConstraint,
        owner_width: OptionalFloat,
        owner_height: OptionalFloat,
        perform_layout: bool,
    ) {
        let style = bm.style;
        let main = style.flex_direction.resolve(direction);
        let cross = main.cross(direction);
        let is_main_row = main.is_row();
        let (main_owner_size, cross_owner_size) = if is_main_row {
            (owner_width, owner_height)
        } else {
            (owner_height, owner_width)
        };
        let (main_mode, cross_mode) = if is_main_row {
            (width.mode, height.mode)
        } else {
            (height.mode, width.mode)
        };

        let pb_main = bm.padding_and_border_for_axis(main, owner_width);
        let pb_cross = bm.padding_and_border_for_axis(cross, owner_width);
        let leading_pb_cross = bm.leading_padding_and_border(cross, owner_width);

        let inner_width =
            available_inner(bm, FlexDirection::Row, width.size, owner_width, owner_width);
        let inner_height =
            available_inner(bm, FlexDirection::Column, height.size, owner_height, owner_width);

        let (main_gap, cross_gap) = if is_main_row {
            (style.column_gap, style.row_gap)
        } else {
            (style.row_gap, style.column_gap)
        };
        let (inner_main, inner_cross) = if is_main_row {
            (inner_width, inner_height)
        } else {
            (inner_height, inner_width)
        };

        let mut c = Container {
            direction,
            main,
            cross,
            is_main_row,
            wrap: style.flex_wrap,
            inner_width,
            inner_height,
            width_mode: width.mode,
            height_mode: height.mode,
            main_mode,
            cross_mode,
            main_gap: non_negative(main_gap.resolve(inner_main)),
            cross_gap: non_negative(cross_gap.resolve(inner_cross)),
            flex_basis_overflows: false,
            baseline_layout: self.is_baseline_layout(id),
            web: self.config.use_web_defaults,
        };

        // Flex basis of every child.
        let total_outer_basis = self.compute_flex_bases(id, style, &c, perform_layout);
        c.flex_basis_overflows = main_mode != MeasureMode::Undefined && inner_main.lt(total_outer_basis);
        if c.is_wrap() && c.flex_basis_overflows && main_mode == MeasureMode::AtMost {
            c.main_mode = MeasureMode::Exactly;
        }

        let main_dim = dimension(main);
        let min_inner_main = style.min_dimension(main_dim).resolve(main_owner_size) - pb_main;
        let max_inner_main = style.max_dimension(main_dim).resolve(main_owner_size) - pb_main;

        let candidates = self.line_candidates(id, &c);
        let child_count = candidates.len();
        let mut lines: Vec<(usize, usize)> = Vec::new();
        let mut start = 0;
        let mut total_line_cross = 0.0f32;
        let mut max_line_main = 0.0f32;
        let mut had_overflow = false;

        while start < child_count {
            let mut line = flex::collect_line(&candidates, start, inner_main, c.is_wrap(), c.main_gap);
            let line_index = lines.len();
            for i in line.start..line.end {
                let child = self.child_at(id, i);
                self.node_mut(child).state.line_index = line_index;
            }

            // Size the line against the container's main size.
            let mut line_main = inner_main;
            let mut size_based_on_content = false;
            if c.main_mode != MeasureMode::Exactly {
                if min_inner_main.gt(line.size_consumed) {
                    line_main = min_inner_main;
                } else if max_inner_main.lt(line.size_consumed) {
                    line_main = max_inner_main;
                } else if !(c.main_mode == MeasureMode::AtMost && inner_main.lt(line.size_consumed)) {
                    size_based_on_content = true;
                }
            }
            let free_space = match line_main.get() {
                Some(available) if !size_based_on_content => available - line.size_consumed,
                _ if line.size_consumed < 0.0 => -line.size_consumed,
                _ => 0.0,
            };
            line.remaining_free_space = free_space;

            let can_skip_flex = !perform_layout && c.cross_mode == MeasureMode::Exactly;
            if !can_skip_flex {
                line.remaining_free_space = self.resolve_flexible_lengths(
                    id,
                    style,
                    &c,
                    &line,
                    free_space,
                    line_main,
                    perform_layout,
                    &mut had_overflow,
                );
            }
            if line.remaining_free_space < 0.0 && !floats_equal(line.remaining_free_space, 0.0) {
                had_overflow = true;
            }

            self.justify_main_axis(
                id,
                bm,
                &c,
                &mut line,
                line_main,
                main_owner_size,
                owner_width,
                perform_layout,
            );

            let container_cross = if c.cross_mode == MeasureMode::Exactly {
                inner_cross.unwrap_or(0.0)
            } else {
                bm.bound_axis(
                    cross,
                    OptionalFloat::new(line.cross_dim + pb_cross),
                    cross_owner_size,
                    owner_width,
                ) - pb_cross
            };
            let mut cross_dim = line.cross_dim;
            if !c.is_wrap() && c.cross_mode == MeasureMode::Exactly {
                cross_dim = inner_cross.unwrap_or(cross_dim);
            }
            cross_dim = bm.bound_axis(
                cross,
                OptionalFloat::new(cross_dim + pb_cross),
                cross_owner_size,
                owner_width,
            ) - pb_cross;

            if line_index > 0 {
                total_line_cross += c.cross_gap;
            }
            if perform_layout {
                self.align_items_on_line(
                    id,
                    bm,
                    &c,
                    &line,
                    line_main,
                    leading_pb_cross + total_line_cross,
                    container_cross,
                    cross_dim,
                );
            }

            total_line_cross += cross_dim;
            max_line_main = max_line_main.max(line.main_dim);
            lines.push((line.start, line.end));
            start = line.end;
        }

        if perform_layout && (lines.len() > 1 || c.baseline_layout) {
            let free_cross = (inner_cross - total_line_cross).unwrap_or(0.0);
            self.align_lines(id, style, &c, &lines, leading_pb_cross, free_cross);
        }

        // Size of the container itself.
        let margin_row = bm.margin_for_axis(FlexDirection::Row, owner_width);
        let margin_column = bm.margin_for_axis(FlexDirection::Column, owner_width);
        let mut measured = Size::new(
            bm.bound_axis(FlexDirection::Row, width.size - margin_row, owner_width, owner_width),
            bm.bound_axis(
                FlexDirection::Column,
                height.size - margin_column,
                owner_height,
                owner_width,
            ),
        );
        let content_main = match c.main_mode {
            MeasureMode::Exactly => None,
            MeasureMode::Undefined => Some(OptionalFloat::new(max_line_main)),
            MeasureMode::AtMost => Some(OptionalFloat::new(max_line_main).min(inner_main + pb_main)),
        };
        if let Some(content) = content_main {
            set_along(
                &mut measured,
                main,
                bm.bound_axis(main, content, main_owner_size, owner_width),
            );
        }
        let content_cross = match c.cross_mode {
            MeasureMode::Exactly => None,
            MeasureMode::Undefined => Some(OptionalFloat::new(total_line_cross + pb_cross)),
            MeasureMode::AtMost => {
                Some(OptionalFloat::new(total_line_cross + pb_cross).min(inner_cross + pb_cross))
            }
        };
        if let Some(content) = content_cross {
            set_along(
                &mut measured,
                cross,
                bm.bound_axis(cross, content, cross_owner_size, owner_width),
            );
        }

        let node = self.node_mut(id);
        node.state.measured = measured;
        node.layout.had_overflow = had_overflow;

        if !perform_layout {
            return;
        }

        if style.flex_wrap == FlexWrap::WrapReverse {
            let own_cross = along(measured, cross);
            let edge = leading_edge(cross);
            for i in 0..child_count {
                let child = self.child_at(id, i);
                let node = self.node_mut(child);
                if node.style.display == Display::None
                    || node.style.position_type != PositionType::Relative
                {
                    continue;
                }
                let extent = along(node.state.measured, cross);
                let leading = node.layout.position(edge);
                node.layout.set_position(edge, own_cross - leading - extent);
            }
        }

        let width_mode = if is_main_row { c.main_mode } else { c.cross_mode };
        for i in 0..child_count {
            let child = self.child_at(id, i);
            let child_style = &self.node(child).style;
            if child_style.display == Display::None
                || child_style.position_type != PositionType::Absolute
            {
                continue;
            }
            self.layout_absolute_child(id, bm, &c, child, width_mode);
        }

        for i in 0..child_count {
            let child = self.child_at(id, i);
            let node = self.node_mut(child);
            if node.style.display == Display::None {
                continue;
            }
            settle_trailing(&mut node.layout, main, along(measured, main));
            settle_trailing(&mut node.layout, cross, along(measured, cross));
        }
    }

    /// Flex basis of every in-flow child; returns the sum of outer bases and gaps.
    fn compute_flex_bases(
        &mut self,
        id: NodeId,
        style: &Style,
        c: &Container,
        perform_layout: bool,
    ) -> f32 {
        let child_count = self.node(id).children.len();
        let main_mode = if c.is_main_row {
            c.width_mode
        } else {
            c.height_mode
        };
        let single_flex_child = if main_mode == MeasureMode::Exactly {
            self.single_flex_child(id, c.web)
        } else {
            None
        };

        let mut total = 0.0;
        let mut in_flow = 0usize;
        for i in 0..child_count {
            let child = self.child_at(id, i);
            let (display, position_type, child_direction) = {
                let s = &self.node(child).style;
                (s.display, s.position_type, s.direction.resolve(c.direction))
            };
            if display == Display::None {
                self.zero_out_subtree(child);
                continue;
            }
            if perform_layout {
                self.place_node(child, child_direction, c.inner_width, c.inner_height);
            }
            if position_type == PositionType::Absolute {
                continue;
            }
            if single_flex_child == Some(child) {
                self.node_mut(child).state.computed_flex_basis = 0.0;
            } else {
                self.compute_flex_basis_for_child(style, child, c);
            }

            let node = self.node(child);
            let cbm = child_box(&node.style, c.direction);
            if in_flow > 0 {
                total += c.main_gap;
            }
            total += node.state.computed_flex_basis + cbm.margin_for_axis(c.main, c.inner_width);
            in_flow += 1;
        }
        total
    }

    /// The only flexible child of an exactly sized container takes all the
    /// free space, so its basis need not be measured.
    fn single_flex_child(&self, id: NodeId, web: bool) -> Option<NodeId> {
        let mut found = None;
        for &child in &self.node(id).children {
            let s = &self.node(child).style;
            if s.display == Display::None || !s.is_flexible(web) {
                continue;
            }
            if found.is_some()
                || floats_equal(s.resolved_flex_grow(), 0.0)
                || floats_equal(s.resolved_flex_shrink(web), 0.0)
            {
                return None;
            }
            found = Some(child);
        }
        found
    }

    fn compute_flex_basis_for_child(&mut self, owner_style: &Style, child: NodeId, c: &Container) {
        let width = c.inner_width;
        let height = c.inner_height;
        let child_style = self.node(child).style;
        let cbm = child_box(&child_style, c.direction);
        let main_size = c.inner_main();

        let resolved_basis = child_style.resolved_flex_basis(c.web).resolve(main_size);
        let row_defined = is_style_dim_defined(&child_style, FlexDirection::Row, width);
        let column_defined = is_style_dim_defined(&child_style, FlexDirection::Column, height);

        let basis = if let Some(basis) = resolved_basis.get() {
            basis.max(cbm.padding_and_border_for_axis(c.main, width))
        } else if c.is_main_row && row_defined {
            child_style
                .resolved_dimension(Dimension::Width)
                .resolve(width)
                .unwrap_or(0.0)
                .max(cbm.padding_and_border_for_axis(FlexDirection::Row, width))
        } else if !c.is_main_row && column_defined {
            child_style
                .resolved_dimension(Dimension::Height)
                .resolve(height)
                .unwrap_or(0.0)
                .max(cbm.padding_and_border_for_axis(FlexDirection::Column, width))
        } else {
            self.measure_flex_basis(owner_style, child, &child_style, c, row_defined, column_defined)
        };
        self.node_mut(child).state.computed_flex_basis = basis;
    }

    /// Basis from the child's content size.
    fn measure_flex_basis(
        &mut self,
        owner_style: &Style,
        child: NodeId,
        child_style: &Style,
        c: &Container,
        row_defined: bool,
        column_defined: bool,
    ) -> f32 {
        let width = c.inner_width;
        let height = c.inner_height;
        let cbm = child_box(child_style, c.direction);
        let margin_row = cbm.margin_for_axis(FlexDirection::Row, width);
        let margin_column = cbm.margin_for_axis(FlexDirection::Column, width);

        let mut child_width = OptionalFloat::UNDEFINED;
        let mut child_height = OptionalFloat::UNDEFINED;
        let mut width_mode = MeasureMode::Undefined;
        let mut height_mode = MeasureMode::Undefined;

        if row_defined {
            child_width = child_style.resolved_dimension(Dimension::Width).resolve(width) + margin_row;
            width_mode = MeasureMode::Exactly;
        }
        if column_defined {
            child_height =
                child_style.resolved_dimension(Dimension::Height).resolve(height) + margin_column;
            height_mode = MeasureMode::Exactly;
        }

        // A scroll container does not bound its content along the main axis.
        let scroll = owner_style.overflow == Overflow::Scroll;
        if (!scroll || !c.is_main_row) && child_width.is_undefined() && width.is_defined() {
            child_width = width;
            width_mode = MeasureMode::AtMost;
        }
        if (!scroll || c.is_main_row) && child_height.is_undefined() && height.is_defined() {
            child_height = height;
            height_mode = MeasureMode::AtMost;
        }

        let ratio = child_style.resolved_aspect_ratio();
        if let Some(ratio) = ratio {
            if !c.is_main_row && width_mode == MeasureMode::Exactly {
                child_height = (child_width - margin_row) / ratio + margin_column;
                height_mode = MeasureMode::Exactly;
            } else if c.is_main_row && height_mode == MeasureMode::Exactly {
                child_width = (child_height - margin_column) * ratio + margin_row;
                width_mode = MeasureMode::Exactly;
            }
        }

        let stretch = align_item(owner_style, child_style) == Align::Stretch;
        let exact_width = width.is_defined() && c.width_mode == MeasureMode::Exactly;
        if !c.is_main_row && !row_defined && exact_width && stretch && width_mode != MeasureMode::Exactly {
            child_width = width;
            width_mode = MeasureMode::Exactly;
            if let Some(ratio) = ratio {
                child_height = (child_width - margin_row) / ratio;
                height_mode = MeasureMode::Exactly;
            }
        }
        let exact_height = height.is_defined() && c.height_mode == MeasureMode::Exactly;
        if c.is_main_row && !column_defined && exact_height && stretch && height_mode != MeasureMode::Exactly {
            child_height = height;
            height_mode = MeasureMode::Exactly;
            if let Some(ratio) = ratio {
                child_width = (child_height - margin_column) * ratio;
                width_mode = MeasureMode::Exactly;
            }
        }

        let w = AxisConstraint::new(child_width, width_mode)
            .constrain_max(child_style.max_width.resolve(width) + margin_row);
        let h = AxisConstraint::new(child_height, height_mode)
            .constrain_max(child_style.max_height.resolve(height) + margin_column);
        self.layout_node(child, w, h, c.direction, width, height, false, "measure");

        let measured = self.node(child).state.measured;
        along(measured, c.main).max(cbm.padding_and_border_for_axis(c.main, width))
    }

    fn line_candidates(&self, id: NodeId, c: &Container) -> Vec<LineCandidate> {
        self.node(id)
            .children
            .iter()
            .map(|&child| {
                let node = self.node(child);
                let s = &node.style;
                if s.display == Display::None || s.position_type == PositionType::Absolute {
                    return LineCandidate {
                        in_flow: false,
                        outer_main: 0.0,
                        grow: 0.0,
                        shrink_scaled: 0.0,
                    };
                }
                let basis = node.state.computed_flex_basis;
                let clamped =
                    bound_axis_within_min_max(s, c.main, OptionalFloat::new(basis), c.inner_main())
                        .unwrap_or(basis);
                let margin = child_box(s, c.direction).margin_for_axis(c.main, c.inner_width);
                let flexible = s.is_flexible(c.web);
                LineCandidate {
                    in_flow: true,
                    outer_main: clamped + margin,
                    grow: if flexible { s.resolved_flex_grow() } else { 0.0 },
                    shrink_scaled: if flexible {
                        s.resolved_flex_shrink(c.web) * clamped
                    } else {
                        0.0
                    },
                }
            })
            .collect()
    }

    /// Flex the items of `line`, then lay each one out at its final main size.
    /// Returns the free space left over.
    #[allow(clippy::too_many_arguments)]
    fn resolve_flexible_lengths(
        &mut self,
        id: NodeId,
        style: &Style,
        c: &Container,
        line: &FlexLine,
        free_space: f32,
        line_main: OptionalFloat,
        perform_layout: bool,
        had_overflow: &mut bool,
    ) -> f32 {
        let main_dim = dimension(c.main);
        let cross_dim = dimension(c.cross);
        let items: Vec<FlexItem> = line
            .items
            .iter()
            .map(|&i| {
                let node = self.node(self.child_at(id, i));
                let s = &node.style;
                let basis = node.state.computed_flex_basis;
                // Same clamp as line breaking, so the line's totals match the items.
                let clamped =
                    bound_axis_within_min_max(s, c.main, OptionalFloat::new(basis), c.inner_main())
                        .unwrap_or(basis);
                let flexible = s.is_flexible(c.web);
                let item = FlexItem::new(clamped)
                    .bounds(
                        s.min_dimension(main_dim).resolve(line_main),
                        s.max_dimension(main_dim).resolve(line_main),
                    )
                    .floor(
                        child_box(s, c.direction).padding_and_border_for_axis(c.main, c.inner_width),
                    );
                if flexible {
                    item.grow(s.resolved_flex_grow())
                        .shrink(s.resolved_flex_shrink(c.web))
                } else {
                    item
                }
            })
            .collect();

        let resolution = flex::resolve_flexible_lengths(&items, line, free_space);
        let inner_cross = c.inner_cross();

        for (k, &i) in line.items.iter().enumerate() {
            let child = self.child_at(id, i);
            let child_style = self.node(child).style;
            let cbm = child_box(&child_style, c.direction);
            let main_size = resolution.sizes[k];
            let margin_main = cbm.margin_for_axis(c.main, c.inner_width);
            let margin_cross = cbm.margin_for_axis(c.cross, c.inner_width);
            let align = align_item(style, &child_style);
            let cross_auto = cbm.is_leading_margin_auto(c.cross) || cbm.is_trailing_margin_auto(c.cross);
            let cross_defined = is_style_dim_defined(&child_style, c.cross, inner_cross);

            let (child_cross, cross_mode) = if let Some(ratio) = child_style.resolved_aspect_ratio() {
                let size = if c.is_main_row {
                    main_size / ratio
                } else {
                    main_size * ratio
                };
                (OptionalFloat::new(size + margin_cross), MeasureMode::Exactly)
            } else if inner_cross.is_defined()
                && !cross_defined
                && c.cross_mode == MeasureMode::Exactly
                && !(c.is_wrap() && c.flex_basis_overflows)
                && align == Align::Stretch
                && !cross_auto
            {
                (inner_cross, MeasureMode::Exactly)
            } else if !cross_defined {
                let mode = if inner_cross.is_defined() {
                    MeasureMode::AtMost
                } else {
                    MeasureMode::Undefined
                };
                (inner_cross, mode)
            } else {
                let preferred = child_style.resolved_dimension(cross_dim);
                let size = preferred.resolve(inner_cross) + margin_cross;
                let loose_percent = matches!(preferred, Value::Percent(_))
                    && c.cross_mode != MeasureMode::Exactly;
                let mode = if size.is_undefined() || loose_percent {
                    MeasureMode::Undefined
                } else {
                    MeasureMode::Exactly
                };
                (size, mode)
            };

            let main_constraint =
                AxisConstraint::new(OptionalFloat::new(main_size + margin_main), MeasureMode::Exactly)
                    .constrain_max(child_style.max_dimension(main_dim).resolve(line_main) + margin_main);
            let cross_constraint = AxisConstraint::new(child_cross, cross_mode)
                .constrain_max(child_style.max_dimension(cross_dim).resolve(inner_cross) + margin_cross);
            let (w, h) = if c.is_main_row {
                (main_constraint, cross_constraint)
            } else {
                (cross_constraint, main_constraint)
            };

            // Stretched items get their final layout once the line's cross size is known.
            let requires_stretch = !cross_defined && align == Align::Stretch && !cross_auto;
            self.layout_node(
                child,
                w,
                h,
                c.direction,
                c.inner_width,
                c.inner_height,
                perform_layout && !requires_stretch,
                "flex",
            );
            *had_overflow |= self.node(child).layout.had_overflow;
        }

        resolution.remaining_free_space
    }

    /// Place items along the main axis and measure the line.
    #[allow(clippy::too_many_arguments)]
    fn justify_main_axis(
        &mut self,
        id: NodeId,
        bm: &BoxModel<'_>,
        c: &Container,
        line: &mut FlexLine,
        line_main: OptionalFloat,
        main_owner_size: OptionalFloat,
        owner_width: OptionalFloat,
        perform_layout: bool,
    ) {
        let style = bm.style;
        let leading_pb_main = bm.leading_padding_and_border(c.main, owner_width);
        let trailing_pb_main = bm.trailing_padding_and_border(c.main, owner_width);

        let mut free = line.remaining_free_space;
        if c.main_mode == MeasureMode::AtMost && free > 0.0 {
            free = match style.min_dimension(dimension(c.main)).resolve(main_owner_size).get() {
                Some(min) => {
                    let min_available = min - leading_pb_main - trailing_pb_main;
                    let occupied = line_main.unwrap_or(0.0) - free;
                    (min_available - occupied).max(0.0)
                }
                None => 0.0,
            };
        }

        let auto_margins: usize = line
            .items
            .iter()
            .map(|&i| {
                let s = &self.node(self.child_at(id, i)).style;
                let cbm = child_box(s, c.direction);
                usize::from(cbm.is_leading_margin_auto(c.main))
                    + usize::from(cbm.is_trailing_margin_auto(c.main))
            })
            .sum();
        let (spacing, auto_margin_share) = if auto_margins == 0 {
            (flex::justify_spacing(style.justify_content, free, line.len()), 0.0)
        } else {
            (Spacing::default(), free.max(0.0) / auto_margins as f32)
        };

        line.main_dim = leading_pb_main + spacing.leading;
        line.cross_dim = 0.0;
        let mut max_ascent = 0.0f32;
        let mut max_descent = 0.0f32;
        let mut placed = 0usize;
        let can_skip_flex = !perform_layout && c.cross_mode == MeasureMode::Exactly;
        let main_edge = leading_edge(c.main);

        for i in line.start..line.end {
            let child = self.child_at(id, i);
            let child_style = self.node(child).style;
            if child_style.display == Display::None {
                continue;
            }
            let cbm = child_box(&child_style, c.direction);

            if child_style.position_type == PositionType::Absolute {
                if perform_layout {
                    let offset = if cbm.is_leading_position_defined(c.main) {
                        cbm.leading_position(c.main, line_main)
                            + bm.leading_border(c.main)
                            + cbm.leading_margin(c.main, c.inner_width)
                    } else {
                        self.node(child).layout.position(main_edge)
                            + bm.leading_border(c.main)
                            + spacing.leading
                    };
                    self.node_mut(child).layout.set_position(main_edge, offset);
                }
                continue;
            }

            if placed > 0 {
                line.main_dim += spacing.between + c.main_gap;
            }
            placed += 1;

            if cbm.is_leading_margin_auto(c.main) {
                line.main_dim += auto_margin_share;
            }
            if perform_layout {
                let layout = &mut self.node_mut(child).layout;
                layout.set_position(main_edge, layout.position(main_edge) + line.main_dim);
            }
            if cbm.is_trailing_margin_auto(c.main) {
                line.main_dim += auto_margin_share;
            }

            let margin_main = cbm.margin_for_axis(c.main, c.inner_width);
            if can_skip_flex {
                line.main_dim += margin_main + self.node(child).state.computed_flex_basis;
                line.cross_dim = c.inner_cross().unwrap_or(0.0);
            } else {
                let measured = self.node(child).state.measured;
                line.main_dim += along(measured, c.main) + margin_main;
                if c.baseline_layout {
                    let ascent = self.baseline(child)
                        + cbm.leading_margin(FlexDirection::Column, c.inner_width);
                    let descent = measured.height
                        + cbm.margin_for_axis(FlexDirection::Column, c.inner_width)
                        - ascent;
                    max_ascent = max_ascent.max(ascent);
                    max_descent = max_descent.max(descent);
                } else {
                    line.cross_dim = line.cross_dim.max(
                        along(measured, c.cross) + cbm.margin_for_axis(c.cross, c.inner_width),
                    );
                }
            }
        }

        line.main_dim += trailing_pb_main;
        if c.baseline_layout {
            line.cross_dim = max_ascent + max_descent;
        }
    }

    /// Cross-axis placement within one line, stretching where requested.
    #[allow(clippy::too_many_arguments)]
    fn align_items_on_line(
        &mut self,
        id: NodeId,
        bm: &BoxModel<'_>,
        c: &Container,
        line: &FlexLine,
        line_main: OptionalFloat,
        line_offset: f32,
        container_cross: f32,
        cross_dim: f32,
    ) {
        let style = bm.style;
        let cross_edge = leading_edge(c.cross);
        let inner_cross = c.inner_cross();

        for i in line.start..line.end {
            let child = self.child_at(id, i);
            let child_style = self.node(child).style;
            if child_style.display == Display::None {
                continue;
            }
            let cbm = child_box(&child_style, c.direction);

            if child_style.position_type == PositionType::Absolute {
                let mut offset = bm.leading_border(c.cross) + cbm.leading_margin(c.cross, c.inner_width);
                if cbm.is_leading_position_defined(c.cross) {
                    offset += cbm.leading_position(c.cross, inner_cross);
                }
                self.node_mut(child).layout.set_position(cross_edge, offset);
                continue;
            }

            let mut leading_cross = 0.0;
            let align = align_item(style, &child_style);
            let leading_auto = cbm.is_leading_margin_auto(c.cross);
            let trailing_auto = cbm.is_trailing_margin_auto(c.cross);

            if align == Align::Stretch && !leading_auto && !trailing_auto {
                if !is_style_dim_defined(&child_style, c.cross, inner_cross) {
                    let measured = self.node(child).state.measured;
                    let child_main = along(measured, c.main);
                    let margin_main = cbm.margin_for_axis(c.main, c.inner_width);
                    let margin_cross = cbm.margin_for_axis(c.cross, c.inner_width);
                    let child_cross = match child_style.resolved_aspect_ratio() {
                        Some(ratio) if c.is_main_row => margin_cross + child_main / ratio,
                        Some(ratio) => margin_cross + child_main * ratio,
                        None => cross_dim,
                    };
                    let main_constraint = AxisConstraint::new(
                        OptionalFloat::new(child_main + margin_main),
                        MeasureMode::Exactly,
                    )
                    .constrain_max(
                        child_style.max_dimension(dimension(c.main)).resolve(line_main) + margin_main,
                    );
                    let cross_constraint =
                        AxisConstraint::new(OptionalFloat::new(child_cross), MeasureMode::Exactly)
                            .constrain_max(
                                child_style.max_dimension(dimension(c.cross)).resolve(inner_cross)
                                    + margin_cross,
                            );
                    let (w, h) = if c.is_main_row {
                        (main_constraint, cross_constraint)
                    } else {
                        (cross_constraint, main_constraint)
                    };
                    self.layout_node(
                        child,
                        AxisConstraint::exact_or_undefined(w.size),
                        AxisConstraint::exact_or_undefined(h.size),
                        c.direction,
                        c.inner_width,
                        c.inner_height,
                        true,
                        "stretch",
                    );
                }
            } else {
                let outer_cross = along(self.node(child).state.measured, c.cross)
                    + cbm.margin_for_axis(c.cross, c.inner_width);
                let remaining = container_cross - outer_cross;
                if leading_auto && trailing_auto {
                    leading_cross += (remaining / 2.0).max(0.0);
                } else if leading_auto && !trailing_auto {
                    leading_cross += remaining.max(0.0);
                } else if !trailing_auto {
                    match align {
                        Align::Center => leading_cross += remaining / 2.0,
                        Align::FlexEnd => leading_cross += remaining,
                        _ => {}
                    }
                }
            }

            let layout = &mut self.node_mut(child).layout;
            layout.set_position(cross_edge, layout.position(cross_edge) + line_offset + leading_cross);
        }
    }

    /// Distribute lines over the cross axis and align items within each line.
    fn align_lines(
        &mut self,
        id: NodeId,
        style: &Style,
        c: &Container,
        lines: &[(usize, usize)],
        leading_pb_cross: f32,
        free_cross: f32,
    ) {
        let spacing = flex::align_content_spacing(style.align_content, free_cross, lines.len());
        let cross_edge = leading_edge(c.cross);
        let inner_cross = c.inner_cross();
        let mut current_lead = leading_pb_cross + spacing.leading;

        for (index, &(start, end)) in lines.iter().enumerate() {
            if index > 0 {
                current_lead += c.cross_gap + spacing.between;
            }

            let mut line_height = 0.0f32;
            let mut max_ascent = 0.0f32;
            let mut max_descent = 0.0f32;
            for i in start..end {
                let child = self.child_at(id, i);
                let child_style = self.node(child).style;
                if child_style.display == Display::None
                    || child_style.position_type != PositionType::Relative
                {
                    continue;
                }
                let cbm = child_box(&child_style, c.direction);
                let measured = self.node(child).state.measured;
                if align_item(style, &child_style) == Align::Baseline {
                    let ascent = self.baseline(child)
                        + cbm.leading_margin(FlexDirection::Column, c.inner_width);
                    let descent = measured.height
                        + cbm.margin_for_axis(FlexDirection::Column, c.inner_width)
                        - ascent;
                    max_ascent = max_ascent.max(ascent);
                    max_descent = max_descent.max(descent);
                } else {
                    line_height = line_height.max(
                        along(measured, c.cross) + cbm.margin_for_axis(c.cross, c.inner_width),
                    );
                }
            }
            line_height = line_height.max(max_ascent + max_descent) + spacing.extra;

            for i in start..end {
                let child = self.child_at(id, i);
                let child_style = self.node(child).style;
                if child_style.display == Display::None
                    || child_style.position_type != PositionType::Relative
                {
                    continue;
                }
                let cbm = child_box(&child_style, c.direction);
                let measured = self.node(child).state.measured;
                let leading_margin = cbm.leading_margin(c.cross, c.inner_width);
                let margin_cross = cbm.margin_for_axis(c.cross, c.inner_width);
                let relative = cbm.relative_position(c.cross, inner_cross);
                let extent = along(measured, c.cross);

                let offset = match align_item(style, &child_style) {
                    Align::FlexEnd => {
                        current_lead + line_height - cbm.trailing_margin(c.cross, c.inner_width) - extent
                    }
                    Align::Center => {
                        current_lead + leading_margin + (line_height - extent - margin_cross) / 2.0
                    }
                    Align::Baseline => current_lead + max_ascent - self.baseline(child),
                    Align::Stretch => {
                        if !is_style_dim_defined(&child_style, c.cross, inner_cross) {
                            let margin_row = cbm.margin_for_axis(FlexDirection::Row, c.inner_width);
                            let margin_column =
                                cbm.margin_for_axis(FlexDirection::Column, c.inner_width);
                            let current = Size::new(measured.width + margin_row, measured.height + margin_column);
                            let target = if c.is_main_row {
                                Size::new(current.width, line_height)
                            } else {
                                Size::new(line_height, current.height)
                            };
                            if !(floats_equal(target.width, current.width)
                                && floats_equal(target.height, current.height))
                            {
                                self.layout_node(
                                    child,
                                    AxisConstraint::new(OptionalFloat::new(target.width), MeasureMode::Exactly),
                                    AxisConstraint::new(OptionalFloat::new(target.height), MeasureMode::Exactly),
                                    c.direction,
                                    c.inner_width,
                                    c.inner_height,
                                    true,
                                    "line-stretch",
                                );
                            }
                        }
                        current_lead + leading_margin
                    }
                    Align::Auto | Align::FlexStart | Align::SpaceBetween | Align::SpaceAround => {
                        current_lead + leading_margin
                    }
                };
                self.node_mut(child)
                    .layout
                    .set_position(cross_edge, offset + relative);
            }

            current_lead += line_height;
        }
    }

    #[allow(clippy::too_many_lines)]
    fn layout_absolute_child(
        &mut self,
        id: NodeId,
        bm: &BoxModel<'_>,
        c: &Container,
        child: NodeId,
        width_mode: MeasureMode,
    ) {
        let style = bm.style;
        let width = c.inner_width;
        let height = c.inner_height;
        let row = FlexDirection::Row;
        let column = FlexDirection::Column;
        let own = self.node(id).state.measured;
        let child_style = self.node(child).style;
        let cbm = child_box(&child_style, c.direction);
        let margin_row = cbm.margin_for_axis(row, width);
        let margin_column = cbm.margin_for_axis(column, width);

        // Definite size, or both insets stretching the box.
        let inset_size = |axis: FlexDirection, dim: Dimension, own_extent: f32, size: OptionalFloat, margin: f32| {
            if is_style_dim_defined(&child_style, axis, size) {
                child_style.resolved_dimension(dim).resolve(size) + margin
            } else if cbm.is_leading_position_defined(axis) && cbm.is_trailing_position_defined(axis) {
                let stretched = own_extent
                    - bm.leading_border(axis)
                    - bm.trailing_border(axis)
                    - cbm.leading_position(axis, size)
                    - cbm.trailing_position(axis, size);
                OptionalFloat::new(cbm.bound_axis(axis, OptionalFloat::new(stretched), size, width))
            } else {
                OptionalFloat::UNDEFINED
            }
        };
        let mut child_width = inset_size(row, Dimension::Width, own.width, width, margin_row);
        let mut child_height = inset_size(column, Dimension::Height, own.height, height, margin_column);

        if child_width.is_undefined() != child_height.is_undefined() {
            if let Some(ratio) = child_style.resolved_aspect_ratio() {
                if child_width.is_undefined() {
                    child_width = (child_height - margin_column) * ratio + margin_row;
                } else {
                    child_height = (child_width - margin_row) / ratio + margin_column;
                }
            }
        }

        if child_width.is_undefined() || child_height.is_undefined() {
            let mut w = AxisConstraint::exact_or_undefined(child_width);
            let h = AxisConstraint::exact_or_undefined(child_height);
            if !c.is_main_row
                && child_width.is_undefined()
                && width_mode != MeasureMode::Undefined
                && width.gt(0.0)
            {
                w = AxisConstraint::new(width, MeasureMode::AtMost);
            }
            self.layout_node(child, w, h, c.direction, width, height, false, "absolute-measure");
            let measured = self.node(child).state.measured;
            child_width = OptionalFloat::new(measured.width + margin_row);
            child_height = OptionalFloat::new(measured.height + margin_column);
        }

        self.layout_node(
            child,
            AxisConstraint::new(child_width, MeasureMode::Exactly),
            AxisConstraint::new(child_height, MeasureMode::Exactly),
            c.direction,
            width,
            height,
            true,
            "absolute-layout",
        );

        let child_measured = self.node(child).state.measured;
        let main_extent = along(own, c.main) - along(child_measured, c.main);
        let cross_extent = along(own, c.cross) - along(child_measured, c.cross);
        let main_size = c.inner_main();
        let cross_size = c.inner_cross();

        let main_offset = if cbm.is_trailing_position_defined(c.main) && !cbm.is_leading_position_defined(c.main) {
            Some(
                main_extent
                    - bm.trailing_border(c.main)
                    - cbm.trailing_margin(c.main, width)
                    - cbm.trailing_position(c.main, main_size),
            )
        } else if !cbm.is_leading_position_defined(c.main) {
            match style.justify_content {
                Justify::Center => Some(main_extent / 2.0),
                Justify::FlexEnd => Some(main_extent),
                _ => None,
            }
        } else {
            None
        };

        let align = align_item(style, &child_style);
        let reversed = style.flex_wrap == FlexWrap::WrapReverse;
        let cross_offset = if cbm.is_trailing_position_defined(c.cross) && !cbm.is_leading_position_defined(c.cross) {
            Some(
                cross_extent
                    - bm.trailing_border(c.cross)
                    - cbm.trailing_margin(c.cross, width)
                    - cbm.trailing_position(c.cross, cross_size),
            )
        } else if !cbm.is_leading_position_defined(c.cross) {
            if align == Align::Center {
                Some(cross_extent / 2.0)
            } else if (align == Align::FlexEnd) != reversed {
                Some(cross_extent)
            } else {
                None
            }
        } else {
            None
        };

        let layout = &mut self.node_mut(child).layout;
        if let Some(offset) = main_offset {
            layout.set_position(leading_edge(c.main), offset);
        }
        if let Some(offset) = cross_offset {
            layout.set_position(leading_edge(c.cross), offset);
        }
    }

    /// Margins plus relative offsets, before the owner adds flow positions.
    fn place_node(
        &mut self,
        id: NodeId,
        direction: Direction,
        owner_width: OptionalFloat,
        owner_height: OptionalFloat,
    ) {
        let node = self.node_mut(id);
        let bm = BoxModel::new(&node.style, direction);
        let row = FlexDirection::Row.resolve(direction);
        let column = FlexDirection::Column;
        let relative_row = bm.relative_position(row, owner_width);
        let relative_column = bm.relative_position(column, owner_height);
        let offsets = [
            (leading_edge(row), bm.leading_margin(row, owner_width) + relative_row),
            (trailing_edge(row), bm.trailing_margin(row, owner_width) + relative_row),
            (leading_edge(column), bm.leading_margin(column, owner_width) + relative_column),
            (trailing_edge(column), bm.trailing_margin(column, owner_width) + relative_column),
        ];
        for (edge, value) in offsets {
            node.layout.set_position(edge, value);
        }
    }

    fn is_baseline_layout(&self, id: NodeId) -> bool {
        let node = self.node(id);
        if node.style.flex_direction.is_column() {
            return false;
        }
        if node.style.align_items == Align::Baseline {
            return true;
        }
        node.children.iter().any(|&child| {
            let s = &self.node(child).style;
            s.position_type == PositionType::Relative && s.align_self == Align::Baseline
        })
    }

    /// Distance from the node's top edge to its first baseline.
    pub(crate) fn baseline(&mut self, id: NodeId) -> f32 {
        let node = self.node_mut(id);
        let measured = node.state.measured;
        if let Some(baseline) = node.baseline.as_mut() {
            let value = baseline(id, measured.width, measured.height);
            trace!(node = %id, value, "baseline");
            return if value.is_finite() { value } else { measured.height };
        }

        let node = self.node(id);
        let mut chosen = None;
        for &child in &node.children {
            let child_node = self.node(child);
            if child_node.state.line_index > 0 {
                break;
            }
            let s = &child_node.style;
            if s.display == Display::None || s.position_type == PositionType::Absolute {
                continue;
            }
            if align_item(&node.style, s) == Align::Baseline {
                chosen = Some(child);
                break;
            }
            if chosen.is_none() {
                chosen = Some(child);
            }
        }

        match chosen {
            Some(child) => {
                let top = self.node(child).layout.top;
                self.baseline(child) + top
            }
            None => measured.height,
        }
    }

    /// `display: none` subtrees occupy no space.
    fn zero_out_subtree(&mut self, id: NodeId) {
        let pass = self.pass;
        let node = self.node_mut(id);
        node.zero_layout(pass);
        let count = node.children.len();
        for i in 0..count {
            let child = self.child_at(id, i);
            self.zero_out_subtree(child);
        }
    }
}
