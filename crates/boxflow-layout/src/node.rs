//! Node handles, layout records and per-node state.

use boxflow_core::{Direction, Edge, Edges, MeasureMode, OptionalFloat, Size, Style};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::cache::NodeCache;

/// Stable handle to a node in a [`LayoutTree`](crate::LayoutTree).
///
/// Handles carry a generation so a handle to a removed node is rejected even
/// after its slot is reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId {
    index: u32,
    generation: u32,
}

impl NodeId {
    pub(crate) const fn new(index: u32, generation: u32) -> Self {
        Self { index, generation }
    }

    /// Arena slot of this node.
    #[must_use]
    pub const fn index(self) -> usize {
        self.index as usize
    }

    /// Slot generation this handle was issued for.
    #[must_use]
    pub const fn generation(self) -> u32 {
        self.generation
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}v{}", self.index, self.generation)
    }
}

/// Measurement hook for leaf content such as text.
///
/// Called with the node, the available inner width and its mode, and the
/// available inner height and its mode. Must not depend on call count.
pub type MeasureFunc = Box<dyn FnMut(NodeId, OptionalFloat, MeasureMode, OptionalFloat, MeasureMode) -> Size>;

/// Baseline hook: `(node, width, height) -> distance from the top`.
pub type BaselineFunc = Box<dyn FnMut(NodeId, f32, f32) -> f32>;

/// Result of the most recent completed layout pass for one node.
///
/// Positions are relative to the owner's border box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Layout {
    /// Offset of the left edge from the owner's left edge
    pub left: f32,
    /// Offset of the top edge from the owner's top edge
    pub top: f32,
    /// Offset of the right edge from the owner's right edge
    pub right: f32,
    /// Offset of the bottom edge from the owner's bottom edge
    pub bottom: f32,
    /// Border-box width
    pub width: f32,
    /// Border-box height
    pub height: f32,
    /// Resolved direction
    pub direction: Direction,
    /// Resolved margins
    pub margin: Edges<f32>,
    /// Resolved padding
    pub padding: Edges<f32>,
    /// Resolved borders
    pub border: Edges<f32>,
    /// Content overflowed the main axis
    pub had_overflow: bool,
    /// Layout pass that last computed this record, `0` before the first.
    ///
    /// Nodes served from cache keep the pass that produced their values, so
    /// comparing against a sibling's or the root's generation shows which
    /// records a pass actually rewrote.
    pub generation: u32,
    computed: bool,
}

impl Default for Layout {
    fn default() -> Self {
        Self {
            left: 0.0,
            top: 0.0,
            right: 0.0,
            bottom: 0.0,
            width: 0.0,
            height: 0.0,
            direction: Direction::Inherit,
            margin: Edges::ZERO,
            padding: Edges::ZERO,
            border: Edges::ZERO,
            had_overflow: false,
            generation: 0,
            computed: false,
        }
    }
}

impl Layout {
    /// `false` until the node has been through a full layout pass.
    #[must_use]
    pub const fn is_computed(&self) -> bool {
        self.computed
    }

    /// Border-box size.
    #[must_use]
    pub const fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// Resolved margin on `edge`; `Start`/`End` follow the resolved direction.
    #[must_use]
    pub fn margin(&self, edge: Edge) -> f32 {
        self.edge_of(&self.margin, edge)
    }

    /// Resolved padding on `edge`.
    #[must_use]
    pub fn padding(&self, edge: Edge) -> f32 {
        self.edge_of(&self.padding, edge)
    }

    /// Resolved border on `edge`.
    #[must_use]
    pub fn border(&self, edge: Edge) -> f32 {
        self.edge_of(&self.border, edge)
    }

    fn edge_of(&self, edges: &Edges<f32>, edge: Edge) -> f32 {
        let rtl = self.direction == Direction::Rtl;
        match edge {
            Edge::Left => edges.left,
            Edge::Top | Edge::Vertical | Edge::All => edges.top,
            Edge::Right => edges.right,
            Edge::Bottom => edges.bottom,
            Edge::Start if rtl => edges.right,
            Edge::End if rtl => edges.left,
            Edge::Start | Edge::Horizontal => edges.left,
            Edge::End => edges.right,
        }
    }

    pub(crate) fn position(&self, edge: Edge) -> f32 {
        match edge {
            Edge::Left => self.left,
            Edge::Right => self.right,
            Edge::Bottom => self.bottom,
            _ => self.top,
        }
    }

    pub(crate) fn set_position(&mut self, edge: Edge, value: f32) {
        match edge {
            Edge::Left => self.left = value,
            Edge::Right => self.right = value,
            Edge::Bottom => self.bottom = value,
            _ => self.top = value,
        }
    }

    pub(crate) fn mark_computed(&mut self) {
        self.computed = true;
    }
}

/// Scratch data the algorithm keeps between and within passes.
#[derive(Debug, Clone, Default)]
pub(crate) struct LayoutState {
    /// Size produced by the latest measure or layout call
    pub(crate) measured: Size,
    pub(crate) computed_flex_basis: f32,
    pub(crate) line_index: usize,
    /// Pass in which the node was last visited
    pub(crate) generation: u32,
    pub(crate) last_owner_direction: Option<Direction>,
    pub(crate) cache: NodeCache,
}

pub(crate) struct Node {
    pub(crate) style: Style,
    pub(crate) children: Vec<NodeId>,
    pub(crate) owner: Option<NodeId>,
    pub(crate) layout: Layout,
    pub(crate) state: LayoutState,
    pub(crate) dirty: bool,
    pub(crate) has_new_layout: bool,
    pub(crate) measure: Option<MeasureFunc>,
    pub(crate) baseline: Option<BaselineFunc>,
}

impl Node {
    pub(crate) fn new(style: Style) -> Self {
        Self {
            style,
            children: Vec::new(),
            owner: None,
            layout: Layout::default(),
            state: LayoutState::default(),
            dirty: true,
            has_new_layout: true,
            measure: None,
            baseline: None,
        }
    }

    /// Reset to an empty, clean layout (used for `display: none` subtrees).
    pub(crate) fn zero_layout(&mut self, pass: u32) {
        self.layout = Layout::default();
        self.layout.generation = pass;
        self.layout.mark_computed();
        self.state = LayoutState::default();
        self.has_new_layout = true;
        self.dirty = false;
    }
}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("style", &self.style)
            .field("children", &self.children)
            .field("owner", &self.owner)
            .field("layout", &self.layout)
            .field("dirty", &self.dirty)
            .field("has_measure", &self.measure.is_some())
            .field("has_baseline", &self.baseline.is_some())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_id_display() {
        assert_eq!(NodeId::new(7, 2).to_string(), "#7v2");
        assert_eq!(NodeId::new(7, 2).index(), 7);
    }

    #[test]
    fn test_layout_default_not_computed() {
        let l = Layout::default();
        assert!(!l.is_computed());
        assert_eq!(l.size(), Size::ZERO);
    }

    #[test]
    fn test_layout_logical_edges_follow_direction() {
        let mut l = Layout {
            margin: Edges {
                left: 1.0,
                top: 2.0,
                right: 3.0,
                bottom: 4.0,
            },
            direction: Direction::Ltr,
            ..Layout::default()
        };
        assert_eq!(l.margin(Edge::Start), 1.0);
        assert_eq!(l.margin(Edge::End), 3.0);
        l.direction = Direction::Rtl;
        assert_eq!(l.margin(Edge::Start), 3.0);
        assert_eq!(l.margin(Edge::End), 1.0);
    }

    #[test]
    fn test_layout_position_by_edge() {
        let mut l = Layout::default();
        l.set_position(Edge::Right, 5.0);
        l.set_position(Edge::Top, 6.0);
        assert_eq!(l.position(Edge::Right), 5.0);
        assert_eq!(l.top, 6.0);
    }

    #[test]
    fn test_zero_layout_is_clean() {
        let mut n = Node::new(Style::default());
        n.layout.width = 10.0;
        n.zero_layout(3);
        assert!(!n.dirty);
        assert!(n.layout.is_computed());
        assert_eq!(n.layout.generation, 3);
        assert_eq!(n.layout.width, 0.0);
    }
}
