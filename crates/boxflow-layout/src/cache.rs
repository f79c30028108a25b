//! Per-node memoization of measure and layout results.

use boxflow_core::{AxisConstraint, Size};

/// Constraint pair and the size it produced.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct CacheEntry {
    /// Available width and mode
    pub width: AxisConstraint,
    /// Available height and mode
    pub height: AxisConstraint,
    /// Computed border-box size
    pub size: Size,
}

impl CacheEntry {
    fn matches(&self, width: AxisConstraint, height: AxisConstraint) -> bool {
        self.width.mode == width.mode
            && self.height.mode == height.mode
            && self.width.size.approx_eq(width.size)
            && self.height.size.approx_eq(height.size)
    }
}

/// Two-slot cache: one entry for the last full layout, one for the last
/// measure-only request.
///
/// A measure-only request may be answered from either slot; a full-layout
/// request only from the layout slot, since a measure-only pass leaves
/// descendant positions unset.
#[derive(Debug, Clone, Default)]
pub(crate) struct NodeCache {
    layout: Option<CacheEntry>,
    measurement: Option<CacheEntry>,
}

impl NodeCache {
    /// Look up a size for the given constraints.
    pub(crate) fn get(
        &self,
        width: AxisConstraint,
        height: AxisConstraint,
        perform_layout: bool,
    ) -> Option<Size> {
        let hit = |slot: Option<CacheEntry>| {
            slot.filter(|entry| entry.matches(width, height))
                .map(|entry| entry.size)
        };
        if perform_layout {
            hit(self.layout)
        } else {
            hit(self.layout).or_else(|| hit(self.measurement))
        }
    }

    /// Record a result in the slot matching `perform_layout`.
    pub(crate) fn insert(
        &mut self,
        width: AxisConstraint,
        height: AxisConstraint,
        perform_layout: bool,
        size: Size,
    ) {
        let entry = Some(CacheEntry {
            width,
            height,
            size,
        });
        if perform_layout {
            self.layout = entry;
        } else {
            self.measurement = entry;
        }
    }

    /// Drop both slots.
    pub(crate) fn clear(&mut self) {
        self.layout = None;
        self.measurement = None;
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.layout.is_none() && self.measurement.is_none()
    }
}

/// Hit and miss counters for one [`LayoutTree`](crate::LayoutTree).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    hits: usize,
    misses: usize,
    measure_calls: usize,
}

impl CacheStats {
    /// Get the number of cache hits.
    #[must_use]
    pub const fn hits(&self) -> usize {
        self.hits
    }

    /// Get the number of cache misses.
    #[must_use]
    pub const fn misses(&self) -> usize {
        self.misses
    }

    /// Get the number of measure function invocations.
    #[must_use]
    pub const fn measure_calls(&self) -> usize {
        self.measure_calls
    }

    pub(crate) fn record_hit(&mut self) {
        self.hits += 1;
    }

    pub(crate) fn record_miss(&mut self) {
        self.misses += 1;
    }

    pub(crate) fn record_measure(&mut self) {
        self.measure_calls += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use boxflow_core::{MeasureMode, OptionalFloat};

    fn exactly(v: f32) -> AxisConstraint {
        AxisConstraint::new(OptionalFloat::new(v), MeasureMode::Exactly)
    }

    fn at_most(v: f32) -> AxisConstraint {
        AxisConstraint::new(OptionalFloat::new(v), MeasureMode::AtMost)
    }

    #[test]
    fn test_cache_new() {
        let cache = NodeCache::default();
        assert!(cache.is_empty());
        assert_eq!(cache.get(exactly(1.0), exactly(1.0), false), None);
    }

    #[test]
    fn test_cache_insert_get() {
        let mut cache = NodeCache::default();
        let size = Size::new(50.0, 20.0);
        cache.insert(exactly(50.0), at_most(100.0), true, size);
        assert_eq!(cache.get(exactly(50.0), at_most(100.0), true), Some(size));
        assert!(!cache.is_empty());
    }

    #[test]
    fn test_cache_tolerates_tiny_differences() {
        let mut cache = NodeCache::default();
        cache.insert(exactly(50.0), exactly(20.0), true, Size::new(50.0, 20.0));
        assert!(cache.get(exactly(50.00001), exactly(20.0), true).is_some());
        assert!(cache.get(exactly(51.0), exactly(20.0), true).is_none());
    }

    #[test]
    fn test_cache_mode_must_match() {
        let mut cache = NodeCache::default();
        cache.insert(exactly(50.0), exactly(20.0), false, Size::new(50.0, 20.0));
        assert!(cache.get(at_most(50.0), exactly(20.0), false).is_none());
    }

    #[test]
    fn test_cache_undefined_constraints_match() {
        let mut cache = NodeCache::default();
        let size = Size::new(12.0, 8.0);
        cache.insert(AxisConstraint::UNDEFINED, AxisConstraint::UNDEFINED, false, size);
        assert_eq!(
            cache.get(AxisConstraint::UNDEFINED, AxisConstraint::UNDEFINED, false),
            Some(size)
        );
    }

    #[test]
    fn test_measure_slot_does_not_answer_layout() {
        let mut cache = NodeCache::default();
        cache.insert(exactly(10.0), exactly(10.0), false, Size::new(10.0, 10.0));
        assert!(cache.get(exactly(10.0), exactly(10.0), true).is_none());
        assert!(cache.get(exactly(10.0), exactly(10.0), false).is_some());
    }

    #[test]
    fn test_layout_slot_answers_measure() {
        let mut cache = NodeCache::default();
        cache.insert(exactly(10.0), exactly(10.0), true, Size::new(10.0, 10.0));
        assert!(cache.get(exactly(10.0), exactly(10.0), false).is_some());
    }

    #[test]
    fn test_newer_entry_replaces_same_kind_only() {
        let mut cache = NodeCache::default();
        cache.insert(exactly(10.0), exactly(10.0), true, Size::new(10.0, 10.0));
        cache.insert(at_most(40.0), exactly(10.0), false, Size::new(30.0, 10.0));
        cache.insert(exactly(20.0), exactly(10.0), true, Size::new(20.0, 10.0));

        assert!(cache.get(exactly(10.0), exactly(10.0), true).is_none());
        assert_eq!(
            cache.get(exactly(20.0), exactly(10.0), true),
            Some(Size::new(20.0, 10.0))
        );
        assert_eq!(
            cache.get(at_most(40.0), exactly(10.0), false),
            Some(Size::new(30.0, 10.0))
        );
    }

    #[test]
    fn test_cache_clear() {
        let mut cache = NodeCache::default();
        cache.insert(exactly(10.0), exactly(10.0), true, Size::new(10.0, 10.0));
        cache.insert(at_most(10.0), exactly(10.0), false, Size::new(5.0, 10.0));
        cache.clear();
        assert!(cache.is_empty());
    }

    #[test]
    fn test_stats_counters() {
        let mut stats = CacheStats::default();
        assert_eq!(stats.hits(), 0);
        stats.record_hit();
        stats.record_miss();
        stats.record_miss();
        stats.record_measure();
        assert_eq!(stats.hits(), 1);
        assert_eq!(stats.misses(), 2);
        assert_eq!(stats.measure_calls(), 1);
    }
}
