//! Snapping computed layouts to the device pixel grid.
//!
//! Edges are rounded in absolute coordinates and sizes derived from the
//! rounded edges, so adjacent boxes never open a gap or overlap.

use boxflow_core::EPSILON;

use crate::node::NodeId;
use crate::tree::LayoutTree;

fn near(a: f64, b: f64) -> bool {
    (a - b).abs() < f64::from(EPSILON)
}

/// Round `value` to the nearest multiple of `1 / scale`.
///
/// `force_ceil` and `force_floor` override round-half-up for fractional values.
pub(crate) fn round_value(value: f32, scale: f32, force_ceil: bool, force_floor: bool) -> f32 {
    if !value.is_finite() || scale <= 0.0 {
        return value;
    }
    let scale = f64::from(scale);
    let scaled = f64::from(value) * scale;
    let fraction = scaled.rem_euclid(1.0);
    let whole = scaled - fraction;

    let snapped = if near(fraction, 0.0) {
        whole
    } else if near(fraction, 1.0) || force_ceil {
        whole + 1.0
    } else if force_floor {
        whole
    } else if fraction > 0.5 || near(fraction, 0.5) {
        whole + 1.0
    } else {
        whole
    };
    (snapped / scale) as f32
}

/// `true` when `size * scale` does not land on a pixel boundary.
fn has_fraction(size: f32, scale: f32) -> bool {
    let fraction = (f64::from(size) * f64::from(scale)).rem_euclid(1.0);
    !near(fraction, 0.0) && !near(fraction, 1.0)
}

impl LayoutTree {
    /// Round `id` and its subtree. `abs_left`/`abs_top` locate the owner's
    /// unrounded border box in root coordinates.
    pub(crate) fn round_to_pixel_grid(&mut self, id: NodeId, scale: f32, abs_left: f32, abs_top: f32) {
        let node = self.node_mut(id);
        // Measured content keeps its pixels; never round it below what it asked for.
        let text = node.measure.is_some();
        let layout = &mut node.layout;

        let left = layout.left;
        let top = layout.top;
        let width = layout.width;
        let height = layout.height;
        let node_abs_left = abs_left + left;
        let node_abs_top = abs_top + top;
        let node_abs_right = node_abs_left + width;
        let node_abs_bottom = node_abs_top + height;

        layout.left = round_value(left, scale, false, text);
        layout.top = round_value(top, scale, false, text);

        let fractional_width = has_fraction(width, scale);
        let fractional_height = has_fraction(height, scale);
        layout.width = round_value(
            node_abs_right,
            scale,
            text && fractional_width,
            text && !fractional_width,
        ) - round_value(node_abs_left, scale, false, text);
        layout.height = round_value(
            node_abs_bottom,
            scale,
            text && fractional_height,
            text && !fractional_height,
        ) - round_value(node_abs_top, scale, false, text);

        let (own_width, own_height) = (layout.width, layout.height);
        let count = node.children.len();
        for i in 0..count {
            let child = self.child_at(id, i);
            self.round_to_pixel_grid(child, scale, node_abs_left, node_abs_top);
            let child_layout = &mut self.node_mut(child).layout;
            child_layout.right = own_width - child_layout.width - child_layout.left;
            child_layout.bottom = own_height - child_layout.height - child_layout.top;
        }
    }
}
