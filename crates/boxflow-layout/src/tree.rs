//! The node arena and its public API.

use boxflow_core::{
    Align, Direction, Display, Edge, FlexDirection, FlexWrap, Justify, MeasureMode, OptionalFloat,
    Overflow, PositionType, Size, Style, Value,
};
use tracing::{debug_span, warn};

use crate::cache::CacheStats;
use crate::config::LayoutConfig;
use crate::error::{LayoutError, LayoutResult};
use crate::node::{Layout, Node, NodeId};

#[derive(Debug)]
pub(crate) struct Slot {
    generation: u32,
    node: Option<Node>,
}

/// A forest of styled boxes and their computed layouts.
///
/// Nodes are created in the tree and addressed by [`NodeId`]. Any node can be
/// used as the root of a layout pass; nodes without an owner are roots.
///
/// ```
/// use boxflow_layout::{Direction, LayoutTree, OptionalFloat, Style};
///
/// let mut tree = LayoutTree::new();
/// let root = tree.new_node_with_style(Style::new().size(200.0, 100.0));
/// let child = tree.new_node_with_style(Style::new().flex_grow(1.0));
/// tree.add_child(root, child).unwrap();
///
/// let unbounded = OptionalFloat::UNDEFINED;
/// tree.calculate_layout(root, unbounded, unbounded, Direction::Ltr).unwrap();
/// assert_eq!(tree.layout(child).unwrap().height, 100.0);
/// ```
#[derive(Debug, Default)]
pub struct LayoutTree {
    pub(crate) slots: Vec<Slot>,
    pub(crate) free_slots: Vec<u32>,
    pub(crate) config: LayoutConfig,
    /// Counter bumped once per `calculate_layout`
    pub(crate) pass: u32,
    pub(crate) stats: CacheStats,
}

/// NaN and infinite owner sizes are unbounded; negative ones are empty.
fn available_owner_size(size: OptionalFloat) -> OptionalFloat {
    match size.get() {
        Some(value) if value.is_finite() => OptionalFloat::new(value.max(0.0)),
        _ => OptionalFloat::UNDEFINED,
    }
}

fn reject<T>(err: LayoutError) -> LayoutResult<T> {
    warn!(error = %err, "rejected tree operation");
    Err(err)
}

impl LayoutTree {
    /// Create an empty tree with the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty tree with `config`.
    #[must_use]
    pub fn with_config(config: LayoutConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Tree configuration.
    #[must_use]
    pub const fn config(&self) -> &LayoutConfig {
        &self.config
    }

    /// Replace the configuration. Every node is dirtied since web defaults
    /// change how flex factors resolve.
    pub fn set_config(&mut self, config: LayoutConfig) {
        if self.config == config {
            return;
        }
        self.config = config;
        for node in self.slots.iter_mut().filter_map(|slot| slot.node.as_mut()) {
            node.dirty = true;
        }
    }

    // ------------------------------------------------------------------
    // Node lifecycle
    // ------------------------------------------------------------------

    /// Create a node with the configuration's default style.
    pub fn new_node(&mut self) -> NodeId {
        let style = self.config.default_style();
        self.new_node_with_style(style)
    }

    /// Create a node with `style`.
    pub fn new_node_with_style(&mut self, style: Style) -> NodeId {
        let node = Node::new(style);
        if let Some(index) = self.free_slots.pop() {
            let slot = &mut self.slots[index as usize];
            slot.node = Some(node);
            return NodeId::new(index, slot.generation);
        }
        let index = u32::try_from(self.slots.len()).expect("node arena exceeds u32::MAX slots");
        self.slots.push(Slot {
            generation: 0,
            node: Some(node),
        });
        NodeId::new(index, 0)
    }

    /// Create a leaf whose content size comes from `measure`.
    pub fn new_leaf_with_measure<F>(&mut self, style: Style, measure: F) -> NodeId
    where
        F: FnMut(NodeId, OptionalFloat, MeasureMode, OptionalFloat, MeasureMode) -> Size + 'static,
    {
        let id = self.new_node_with_style(style);
        self.node_mut(id).measure = Some(Box::new(measure));
        id
    }

    /// Create a node and append `children` to it.
    ///
    /// # Errors
    ///
    /// Fails like [`add_child`](Self::add_child) for any child; the new node is
    /// removed again in that case.
    pub fn new_node_with_children(&mut self, style: Style, children: &[NodeId]) -> LayoutResult<NodeId> {
        let id = self.new_node_with_style(style);
        for &child in children {
            if let Err(err) = self.add_child(id, child) {
                self.remove_all_children(id)?;
                self.remove_node(id)?;
                return Err(err);
            }
        }
        Ok(id)
    }

    /// Remove a node from the tree.
    ///
    /// The node is detached from its owner and its children become roots.
    /// The handle, and any copy of it, is invalid afterwards.
    ///
    /// # Errors
    ///
    /// [`LayoutError::InvalidNode`] if `id` is not live.
    pub fn remove_node(&mut self, id: NodeId) -> LayoutResult<()> {
        let owner = self.try_node(id)?.owner;
        if let Some(owner) = owner {
            self.node_mut(owner).children.retain(|&c| c != id);
            self.mark_dirty_upwards(owner);
        }
        let children = std::mem::take(&mut self.node_mut(id).children);
        for child in children {
            self.node_mut(child).owner = None;
        }

        let slot = &mut self.slots[id.index()];
        slot.node = None;
        slot.generation = slot.generation.wrapping_add(1);
        self.free_slots.push(id.index() as u32);
        Ok(())
    }

    /// Number of live nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len() - self.free_slots.len()
    }

    /// `true` if the tree holds no nodes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// `true` if `id` refers to a live node.
    #[must_use]
    pub fn contains(&self, id: NodeId) -> bool {
        self.slots
            .get(id.index())
            .is_some_and(|slot| slot.generation == id.generation() && slot.node.is_some())
    }

    // ------------------------------------------------------------------
    // Children
    // ------------------------------------------------------------------

    /// Insert `child` into `owner`'s child list at `index`.
    ///
    /// # Errors
    ///
    /// - [`LayoutError::InvalidNode`] for a stale handle
    /// - [`LayoutError::ChildOfMeasuredNode`] if `owner` has a measure function
    /// - [`LayoutError::AlreadyOwned`] if `child` already has an owner
    /// - [`LayoutError::ChildIndexOutOfBounds`] if `index > child_count`
    /// - [`LayoutError::Cycle`] if `child` is `owner` or one of its ancestors
    pub fn insert_child(&mut self, owner: NodeId, child: NodeId, index: usize) -> LayoutResult<()> {
        let owner_node = self.try_node(owner)?;
        let child_node = self.try_node(child)?;
        if owner_node.measure.is_some() {
            return reject(LayoutError::ChildOfMeasuredNode(owner));
        }
        if let Some(current) = child_node.owner {
            return reject(LayoutError::AlreadyOwned {
                child,
                owner: current,
            });
        }
        let len = owner_node.children.len();
        if index > len {
            return reject(LayoutError::ChildIndexOutOfBounds { owner, index, len });
        }
        if self.is_ancestor_or_self(child, owner) {
            return reject(LayoutError::Cycle { child, owner });
        }

        self.node_mut(owner).children.insert(index, child);
        self.node_mut(child).owner = Some(owner);
        self.mark_dirty_upwards(owner);
        Ok(())
    }

    /// Append `child` to `owner`.
    ///
    /// # Errors
    ///
    /// See [`insert_child`](Self::insert_child).
    pub fn add_child(&mut self, owner: NodeId, child: NodeId) -> LayoutResult<()> {
        let index = self.try_node(owner)?.children.len();
        self.insert_child(owner, child, index)
    }

    /// Detach `child` from `owner`. Returns `false` if it was not a child.
    ///
    /// # Errors
    ///
    /// [`LayoutError::InvalidNode`] for a stale handle.
    pub fn remove_child(&mut self, owner: NodeId, child: NodeId) -> LayoutResult<bool> {
        self.try_node(child)?;
        let owner_node = self.try_node_mut(owner)?;
        let Some(position) = owner_node.children.iter().position(|&c| c == child) else {
            return Ok(false);
        };
        owner_node.children.remove(position);
        self.node_mut(child).owner = None;
        self.mark_dirty_upwards(owner);
        Ok(true)
    }

    /// Detach every child of `owner`.
    ///
    /// # Errors
    ///
    /// [`LayoutError::InvalidNode`] for a stale handle.
    pub fn remove_all_children(&mut self, owner: NodeId) -> LayoutResult<()> {
        let children = std::mem::take(&mut self.try_node_mut(owner)?.children);
        if children.is_empty() {
            return Ok(());
        }
        for child in children {
            self.node_mut(child).owner = None;
        }
        self.mark_dirty_upwards(owner);
        Ok(())
    }

    /// Children of `id`, in order.
    ///
    /// # Errors
    ///
    /// [`LayoutError::InvalidNode`] for a stale handle.
    pub fn children(&self, id: NodeId) -> LayoutResult<&[NodeId]> {
        Ok(&self.try_node(id)?.children)
    }

    /// Number of children of `id`.
    ///
    /// # Errors
    ///
    /// [`LayoutError::InvalidNode`] for a stale handle.
    pub fn child_count(&self, id: NodeId) -> LayoutResult<usize> {
        Ok(self.try_node(id)?.children.len())
    }

    /// Child of `id` at `index`.
    ///
    /// # Errors
    ///
    /// [`LayoutError::InvalidNode`] or [`LayoutError::ChildIndexOutOfBounds`].
    pub fn child(&self, id: NodeId, index: usize) -> LayoutResult<NodeId> {
        let children = &self.try_node(id)?.children;
        match children.get(index) {
            Some(&child) => Ok(child),
            None => reject(LayoutError::ChildIndexOutOfBounds {
                owner: id,
                index,
                len: children.len(),
            }),
        }
    }

    /// Owner of `id`, `None` for a root.
    ///
    /// # Errors
    ///
    /// [`LayoutError::InvalidNode`] for a stale handle.
    pub fn owner(&self, id: NodeId) -> LayoutResult<Option<NodeId>> {
        Ok(self.try_node(id)?.owner)
    }

    // ------------------------------------------------------------------
    // Style
    // ------------------------------------------------------------------

    /// Style of `id`.
    ///
    /// # Errors
    ///
    /// [`LayoutError::InvalidNode`] for a stale handle.
    pub fn style(&self, id: NodeId) -> LayoutResult<&Style> {
        Ok(&self.try_node(id)?.style)
    }

    /// Replace the style of `id`. The node is dirtied unless the new style is
    /// layout-equal to the old one.
    ///
    /// # Errors
    ///
    /// [`LayoutError::InvalidNode`] for a stale handle.
    pub fn set_style(&mut self, id: NodeId, style: Style) -> LayoutResult<()> {
        let node = self.try_node_mut(id)?;
        let changed = !node.style.layout_eq(&style);
        node.style = style;
        if changed {
            self.mark_dirty_upwards(id);
        }
        Ok(())
    }

    /// Edit the style of `id` in place.
    ///
    /// # Errors
    ///
    /// [`LayoutError::InvalidNode`] for a stale handle.
    pub fn update_style(&mut self, id: NodeId, edit: impl FnOnce(&mut Style)) -> LayoutResult<()> {
        let mut style = self.try_node(id)?.style;
        edit(&mut style);
        self.set_style(id, style)
    }

    /// Set the margin on `edge`.
    ///
    /// # Errors
    ///
    /// [`LayoutError::InvalidNode`] for a stale handle.
    pub fn set_margin(&mut self, id: NodeId, edge: Edge, value: Value) -> LayoutResult<()> {
        self.update_style(id, |s| s.margin.set(edge, value))
    }

    /// Set the padding on `edge`.
    ///
    /// # Errors
    ///
    /// [`LayoutError::InvalidNode`] for a stale handle.
    pub fn set_padding(&mut self, id: NodeId, edge: Edge, value: Value) -> LayoutResult<()> {
        self.update_style(id, |s| s.padding.set(edge, value))
    }

    /// Set the border width on `edge`.
    ///
    /// # Errors
    ///
    /// [`LayoutError::InvalidNode`] for a stale handle.
    pub fn set_border(&mut self, id: NodeId, edge: Edge, width: f32) -> LayoutResult<()> {
        self.update_style(id, |s| *s = s.border(edge, width))
    }

    /// Set the position inset on `edge`.
    ///
    /// # Errors
    ///
    /// [`LayoutError::InvalidNode`] for a stale handle.
    pub fn set_position(&mut self, id: NodeId, edge: Edge, value: Value) -> LayoutResult<()> {
        self.update_style(id, |s| s.position.set(edge, value))
    }

    // ------------------------------------------------------------------
    // Hooks
    // ------------------------------------------------------------------

    /// Give `id` a measure function, making it a content leaf.
    ///
    /// # Errors
    ///
    /// [`LayoutError::MeasuredNodeWithChildren`] if `id` has children.
    pub fn set_measure_func<F>(&mut self, id: NodeId, measure: F) -> LayoutResult<()>
    where
        F: FnMut(NodeId, OptionalFloat, MeasureMode, OptionalFloat, MeasureMode) -> Size + 'static,
    {
        let node = self.try_node_mut(id)?;
        if !node.children.is_empty() {
            return reject(LayoutError::MeasuredNodeWithChildren(id));
        }
        node.measure = Some(Box::new(measure));
        self.mark_dirty_upwards(id);
        Ok(())
    }

    /// Remove the measure function of `id`.
    ///
    /// # Errors
    ///
    /// [`LayoutError::InvalidNode`] for a stale handle.
    pub fn clear_measure_func(&mut self, id: NodeId) -> LayoutResult<()> {
        if self.try_node_mut(id)?.measure.take().is_some() {
            self.mark_dirty_upwards(id);
        }
        Ok(())
    }

    /// `true` if `id` has a measure function.
    ///
    /// # Errors
    ///
    /// [`LayoutError::InvalidNode`] for a stale handle.
    pub fn has_measure_func(&self, id: NodeId) -> LayoutResult<bool> {
        Ok(self.try_node(id)?.measure.is_some())
    }

    /// Give `id` a baseline function.
    ///
    /// # Errors
    ///
    /// [`LayoutError::InvalidNode`] for a stale handle.
    pub fn set_baseline_func<F>(&mut self, id: NodeId, baseline: F) -> LayoutResult<()>
    where
        F: FnMut(NodeId, f32, f32) -> f32 + 'static,
    {
        self.try_node_mut(id)?.baseline = Some(Box::new(baseline));
        self.mark_dirty_upwards(id);
        Ok(())
    }

    /// Remove the baseline function of `id`.
    ///
    /// # Errors
    ///
    /// [`LayoutError::InvalidNode`] for a stale handle.
    pub fn clear_baseline_func(&mut self, id: NodeId) -> LayoutResult<()> {
        if self.try_node_mut(id)?.baseline.take().is_some() {
            self.mark_dirty_upwards(id);
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // Dirty tracking
    // ------------------------------------------------------------------

    /// Mark `id` and its ancestors as needing layout. Use this when content
    /// behind a measure function changed.
    ///
    /// # Errors
    ///
    /// [`LayoutError::InvalidNode`] for a stale handle.
    pub fn mark_dirty(&mut self, id: NodeId) -> LayoutResult<()> {
        self.try_node(id)?;
        self.mark_dirty_upwards(id);
        Ok(())
    }

    /// `true` if `id` needs layout.
    ///
    /// # Errors
    ///
    /// [`LayoutError::InvalidNode`] for a stale handle.
    pub fn is_dirty(&self, id: NodeId) -> LayoutResult<bool> {
        Ok(self.try_node(id)?.dirty)
    }

    /// Propagation stops at the first node that is already dirty; its
    /// ancestors are dirty too.
    fn mark_dirty_upwards(&mut self, id: NodeId) {
        let mut current = Some(id);
        while let Some(cur) = current {
            let node = self.node_mut(cur);
            if node.dirty {
                break;
            }
            node.dirty = true;
            current = node.owner;
        }
    }

    // ------------------------------------------------------------------
    // Layout
    // ------------------------------------------------------------------

    /// Lay out the subtree at `root` inside an owner of the given size.
    ///
    /// An undefined owner dimension leaves that axis to content.
    ///
    /// # Errors
    ///
    /// [`LayoutError::InvalidNode`] if `root` is not live.
    pub fn calculate_layout(
        &mut self,
        root: NodeId,
        owner_width: impl Into<OptionalFloat>,
        owner_height: impl Into<OptionalFloat>,
        direction: Direction,
    ) -> LayoutResult<()> {
        self.try_node(root)?;
        let owner_width = available_owner_size(owner_width.into());
        let owner_height = available_owner_size(owner_height.into());
        let _span = debug_span!(
            "calculate_layout",
            root = %root,
            width = ?owner_width.get(),
            height = ?owner_height.get(),
            ?direction
        )
        .entered();
        self.compute_root(root, owner_width, owner_height, direction);
        Ok(())
    }

    /// Computed layout of `id`.
    ///
    /// # Errors
    ///
    /// [`LayoutError::InvalidNode`] for a stale handle.
    pub fn layout(&self, id: NodeId) -> LayoutResult<&Layout> {
        Ok(&self.try_node(id)?.layout)
    }

    /// `true` if the layout of `id` was written since the last
    /// [`mark_layout_seen`](Self::mark_layout_seen).
    ///
    /// # Errors
    ///
    /// [`LayoutError::InvalidNode`] for a stale handle.
    pub fn has_new_layout(&self, id: NodeId) -> LayoutResult<bool> {
        Ok(self.try_node(id)?.has_new_layout)
    }

    /// Acknowledge the current layout of `id`.
    ///
    /// # Errors
    ///
    /// [`LayoutError::InvalidNode`] for a stale handle.
    pub fn mark_layout_seen(&mut self, id: NodeId) -> LayoutResult<()> {
        self.try_node_mut(id)?.has_new_layout = false;
        Ok(())
    }

    /// Cache counters accumulated since creation or the last reset.
    #[must_use]
    pub const fn cache_stats(&self) -> CacheStats {
        self.stats
    }

    /// Zero the cache counters.
    pub fn reset_cache_stats(&mut self) {
        self.stats = CacheStats::default();
    }

    // ------------------------------------------------------------------
    // Internal access
    // ------------------------------------------------------------------

    fn try_node(&self, id: NodeId) -> LayoutResult<&Node> {
        match self.slots.get(id.index()) {
            Some(Slot {
                generation,
                node: Some(node),
            }) if *generation == id.generation() => Ok(node),
            _ => reject(LayoutError::InvalidNode(id)),
        }
    }

    fn try_node_mut(&mut self, id: NodeId) -> LayoutResult<&mut Node> {
        match self.slots.get_mut(id.index()) {
            Some(Slot {
                generation,
                node: Some(node),
            }) if *generation == id.generation() => Ok(node),
            _ => reject(LayoutError::InvalidNode(id)),
        }
    }

    pub(crate) fn node(&self, id: NodeId) -> &Node {
        self.slots[id.index()].node.as_ref().expect("live handle")
    }

    pub(crate) fn node_mut(&mut self, id: NodeId) -> &mut Node {
        self.slots[id.index()].node.as_mut().expect("live handle")
    }

    pub(crate) fn child_at(&self, id: NodeId, index: usize) -> NodeId {
        self.node(id).children[index]
    }

    fn is_ancestor_or_self(&self, candidate: NodeId, id: NodeId) -> bool {
        let mut current = Some(id);
        while let Some(cur) = current {
            if cur == candidate {
                return true;
            }
            current = self.node(cur).owner;
        }
        false
    }
}

/// Typed setters, one per scalar style property.
macro_rules! style_setters {
    ($($(#[$doc:meta])* $setter:ident => $builder:ident($ty:ty);)*) => {
        impl LayoutTree {
            $(
                $(#[$doc])*
                ///
                /// # Errors
                ///
                /// [`LayoutError::InvalidNode`] for a stale handle.
                pub fn $setter(&mut self, id: NodeId, value: $ty) -> LayoutResult<()> {
                    self.update_style(id, |s| *s = s.$builder(value))
                }
            )*
        }
    };
}

style_setters! {
    /// Set the inline direction.
    set_direction => direction(Direction);
    /// Set the main axis.
    set_flex_direction => flex_direction(FlexDirection);
    /// Set main-axis distribution.
    set_justify_content => justify_content(Justify);
    /// Set line distribution.
    set_align_content => align_content(Align);
    /// Set default cross alignment of children.
    set_align_items => align_items(Align);
    /// Set own cross alignment.
    set_align_self => align_self(Align);
    /// Set relative or absolute positioning.
    set_position_type => position_type(PositionType);
    /// Set wrapping.
    set_flex_wrap => flex_wrap(FlexWrap);
    /// Set overflow.
    set_overflow => overflow(Overflow);
    /// Set display.
    set_display => display(Display);
    /// Set the `flex` shorthand.
    set_flex => flex(f32);
    /// Set the grow factor.
    set_flex_grow => flex_grow(f32);
    /// Set the shrink factor.
    set_flex_shrink => flex_shrink(f32);
    /// Set the flex basis.
    set_flex_basis => flex_basis(Value);
    /// Set the preferred width.
    set_width => width(Value);
    /// Set the preferred height.
    set_height => height(Value);
    /// Set the minimum width.
    set_min_width => min_width(Value);
    /// Set the minimum height.
    set_min_height => min_height(Value);
    /// Set the maximum width.
    set_max_width => max_width(Value);
    /// Set the maximum height.
    set_max_height => max_height(Value);
    /// Set width / height.
    set_aspect_ratio => aspect_ratio(f32);
    /// Set both gaps.
    set_gap => gap(Value);
    /// Set the gap between columns.
    set_column_gap => column_gap(Value);
    /// Set the gap between rows.
    set_row_gap => row_gap(Value);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaf_measure(
        _: NodeId,
        _: OptionalFloat,
        _: MeasureMode,
        _: OptionalFloat,
        _: MeasureMode,
    ) -> Size {
        Size::new(10.0, 10.0)
    }

    #[test]
    fn test_tree_new_is_empty() {
        let tree = LayoutTree::new();
        assert!(tree.is_empty());
        assert_eq!(tree.cache_stats(), CacheStats::default());
    }

    #[test]
    fn test_new_nodes_start_dirty() {
        let mut tree = LayoutTree::new();
        let id = tree.new_node();
        assert!(tree.contains(id));
        assert_eq!(tree.len(), 1);
        assert!(tree.is_dirty(id).unwrap());
        assert!(!tree.layout(id).unwrap().is_computed());
    }

    #[test]
    fn test_removed_handle_is_rejected_after_reuse() {
        let mut tree = LayoutTree::new();
        let a = tree.new_node();
        tree.remove_node(a).unwrap();
        let b = tree.new_node();
        assert_eq!(a.index(), b.index());
        assert_ne!(a, b);
        assert!(!tree.contains(a));
        assert_eq!(tree.layout(a).unwrap_err(), LayoutError::InvalidNode(a));
    }

    #[test]
    fn test_insert_child_positions() {
        let mut tree = LayoutTree::new();
        let root = tree.new_node();
        let a = tree.new_node();
        let b = tree.new_node();
        let c = tree.new_node();
        tree.add_child(root, a).unwrap();
        tree.add_child(root, c).unwrap();
        tree.insert_child(root, b, 1).unwrap();
        assert_eq!(tree.children(root).unwrap(), &[a, b, c]);
        assert_eq!(tree.owner(b).unwrap(), Some(root));
        assert_eq!(tree.child(root, 2).unwrap(), c);
    }

    #[test]
    fn test_insert_out_of_bounds() {
        let mut tree = LayoutTree::new();
        let root = tree.new_node();
        let a = tree.new_node();
        let err = tree.insert_child(root, a, 1).unwrap_err();
        assert_eq!(
            err,
            LayoutError::ChildIndexOutOfBounds {
                owner: root,
                index: 1,
                len: 0
            }
        );
        assert_eq!(tree.owner(a).unwrap(), None);
    }

    #[test]
    fn test_insert_already_owned() {
        let mut tree = LayoutTree::new();
        let p1 = tree.new_node();
        let p2 = tree.new_node();
        let c = tree.new_node();
        tree.add_child(p1, c).unwrap();
        assert_eq!(
            tree.add_child(p2, c).unwrap_err(),
            LayoutError::AlreadyOwned { child: c, owner: p1 }
        );
    }

    #[test]
    fn test_insert_cycle_rejected() {
        let mut tree = LayoutTree::new();
        let root = tree.new_node();
        let mid = tree.new_node();
        tree.add_child(root, mid).unwrap();
        assert_eq!(
            tree.add_child(mid, root).unwrap_err(),
            LayoutError::Cycle { child: root, owner: mid }
        );
        assert_eq!(
            tree.add_child(root, root).unwrap_err(),
            LayoutError::Cycle { child: root, owner: root }
        );
    }

    #[test]
    fn test_measured_node_rejects_children() {
        let mut tree = LayoutTree::new();
        let text = tree.new_leaf_with_measure(Style::new(), leaf_measure);
        let child = tree.new_node();
        assert_eq!(
            tree.add_child(text, child).unwrap_err(),
            LayoutError::ChildOfMeasuredNode(text)
        );
    }

    #[test]
    fn test_node_with_children_rejects_measure() {
        let mut tree = LayoutTree::new();
        let root = tree.new_node();
        let child = tree.new_node();
        tree.add_child(root, child).unwrap();
        assert_eq!(
            tree.set_measure_func(root, leaf_measure).unwrap_err(),
            LayoutError::MeasuredNodeWithChildren(root)
        );
        assert!(!tree.has_measure_func(root).unwrap());
    }

    #[test]
    fn test_remove_child() {
        let mut tree = LayoutTree::new();
        let root = tree.new_node();
        let a = tree.new_node();
        let stranger = tree.new_node();
        tree.add_child(root, a).unwrap();
        assert!(!tree.remove_child(root, stranger).unwrap());
        assert!(tree.remove_child(root, a).unwrap());
        assert_eq!(tree.child_count(root).unwrap(), 0);
        assert_eq!(tree.owner(a).unwrap(), None);
    }

    #[test]
    fn test_remove_node_orphans_children() {
        let mut tree = LayoutTree::new();
        let root = tree.new_node();
        let mid = tree.new_node();
        let leaf = tree.new_node();
        tree.add_child(root, mid).unwrap();
        tree.add_child(mid, leaf).unwrap();
        tree.remove_node(mid).unwrap();
        assert_eq!(tree.child_count(root).unwrap(), 0);
        assert_eq!(tree.owner(leaf).unwrap(), None);
        assert_eq!(tree.len(), 2);
    }

    #[test]
    fn test_new_node_with_children_rolls_back() {
        let mut tree = LayoutTree::new();
        let other = tree.new_node();
        let owned = tree.new_node();
        let free = tree.new_node();
        tree.add_child(other, owned).unwrap();
        let before = tree.len();
        assert!(tree.new_node_with_children(Style::new(), &[free, owned]).is_err());
        assert_eq!(tree.len(), before);
        assert_eq!(tree.owner(free).unwrap(), None);
    }

    #[test]
    fn test_layout_equal_style_keeps_node_clean() {
        let mut tree = LayoutTree::new();
        let id = tree.new_node_with_style(Style::new().size(10.0, 10.0));
        tree.calculate_layout(id, OptionalFloat::UNDEFINED, OptionalFloat::UNDEFINED, Direction::Ltr)
            .unwrap();
        assert!(!tree.is_dirty(id).unwrap());

        tree.set_width(id, Value::Point(10.000_01)).unwrap();
        assert!(!tree.is_dirty(id).unwrap());

        tree.set_width(id, Value::Point(20.0)).unwrap();
        assert!(tree.is_dirty(id).unwrap());
    }

    #[test]
    fn test_typed_setters_write_style() {
        let mut tree = LayoutTree::new();
        let id = tree.new_node();
        tree.set_flex_grow(id, 2.0).unwrap();
        tree.set_flex_direction(id, FlexDirection::Row).unwrap();
        tree.set_margin(id, Edge::Left, Value::Point(4.0)).unwrap();
        let style = tree.style(id).unwrap();
        assert_eq!(style.flex_grow.get(), Some(2.0));
        assert_eq!(style.flex_direction, FlexDirection::Row);
        assert_eq!(style.margin.get(Edge::Left), Value::Point(4.0));
    }

    #[test]
    fn test_web_defaults_apply_to_new_nodes() {
        let mut tree = LayoutTree::with_config(LayoutConfig::new().with_web_defaults(true));
        let id = tree.new_node();
        assert_eq!(tree.style(id).unwrap().flex_direction, FlexDirection::Row);
    }

    #[test]
    fn test_mark_layout_seen() {
        let mut tree = LayoutTree::new();
        let id = tree.new_node();
        tree.calculate_layout(id, 10.0, 10.0, Direction::Ltr).unwrap();
        assert!(tree.has_new_layout(id).unwrap());
        tree.mark_layout_seen(id).unwrap();
        assert!(!tree.has_new_layout(id).unwrap());
    }

    #[test]
    fn test_set_config_dirties_nodes() {
        let mut tree = LayoutTree::new();
        let id = tree.new_node();
        tree.calculate_layout(id, 10.0, 10.0, Direction::Ltr).unwrap();
        tree.set_config(LayoutConfig::new().with_web_defaults(true));
        assert!(tree.is_dirty(id).unwrap());
    }
}
