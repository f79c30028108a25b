//! Pure flex arithmetic: line breaking, free-space distribution and spacing.
//!
//! Nothing here touches the tree. The engine gathers numbers from nodes,
//! calls into this module, and writes the results back.

use boxflow_core::{floats_equal, Align, Justify, OptionalFloat};

/// A child as seen by line breaking.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct LineCandidate {
    /// Takes part in flex layout (not absolute, not `display: none`)
    pub in_flow: bool,
    /// Flex basis clamped to min/max, plus main-axis margins
    pub outer_main: f32,
    /// Grow factor, zero when the item is not flexible
    pub grow: f32,
    /// `shrink * basis`, zero when the item is not flexible
    pub shrink_scaled: f32,
}

/// One line of a flex container.
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct FlexLine {
    /// First child index covered by the line
    pub start: usize,
    /// One past the last child index covered by the line
    pub end: usize,
    /// Child indices of the in-flow items on the line
    pub items: Vec<usize>,
    /// Sum of outer flex bases and main-axis gaps
    pub size_consumed: f32,
    /// Grow factors of the line's items, floored to 1 when fractional
    pub total_flex_grow: f32,
    /// `shrink * basis` of the line's items, floored to 1 when fractional
    pub total_flex_shrink_scaled: f32,
    /// Free space left after flexing
    pub remaining_free_space: f32,
    /// Main extent of the line including the container's padding and border
    pub main_dim: f32,
    /// Largest outer cross size on the line
    pub cross_dim: f32,
}

impl FlexLine {
    /// Number of in-flow items on the line.
    pub(crate) fn len(&self) -> usize {
        self.items.len()
    }
}

/// Gather the next line starting at `start`.
///
/// An item that would push a wrapping line past `available_main` starts a new
/// line, except that every line takes at least one item. Out-of-flow children
/// are covered by the line's index range but add nothing to it.
pub(crate) fn collect_line(
    candidates: &[LineCandidate],
    start: usize,
    available_main: OptionalFloat,
    wrap: bool,
    gap: f32,
) -> FlexLine {
    let mut line = FlexLine {
        start,
        end: candidates.len(),
        ..FlexLine::default()
    };

    for (index, candidate) in candidates.iter().enumerate().skip(start) {
        if !candidate.in_flow {
            continue;
        }
        let gap_before = if line.items.is_empty() { 0.0 } else { gap };
        let next = line.size_consumed + gap_before + candidate.outer_main;
        if wrap && !line.items.is_empty() && available_main.lt(next) {
            line.end = index;
            break;
        }
        line.size_consumed = next;
        line.total_flex_grow += candidate.grow;
        line.total_flex_shrink_scaled += candidate.shrink_scaled;
        line.items.push(index);
    }

    line.total_flex_grow = floor_fractional_total(line.total_flex_grow);
    line.total_flex_shrink_scaled = floor_fractional_total(line.total_flex_shrink_scaled);
    line
}

/// Totals in (0, 1) distribute all free space rather than a fraction of it.
fn floor_fractional_total(total: f32) -> f32 {
    if total > 0.0 && total < 1.0 {
        1.0
    } else {
        total
    }
}

/// Main-axis sizing inputs of one item.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct FlexItem {
    /// Flex basis, already clamped to min/max
    pub basis: f32,
    pub grow: f32,
    pub shrink: f32,
    pub min: OptionalFloat,
    pub max: OptionalFloat,
    /// Padding plus border; no item shrinks below it
    pub floor: f32,
}

impl FlexItem {
    pub(crate) fn new(basis: f32) -> Self {
        Self {
            basis,
            grow: 0.0,
            shrink: 0.0,
            min: OptionalFloat::UNDEFINED,
            max: OptionalFloat::UNDEFINED,
            floor: 0.0,
        }
    }

    /// Set the grow factor.
    #[must_use]
    pub(crate) const fn grow(mut self, grow: f32) -> Self {
        self.grow = grow;
        self
    }

    /// Set the shrink factor.
    #[must_use]
    pub(crate) const fn shrink(mut self, shrink: f32) -> Self {
        self.shrink = shrink;
        self
    }

    /// Set min and max.
    #[must_use]
    pub(crate) const fn bounds(mut self, min: OptionalFloat, max: OptionalFloat) -> Self {
        self.min = min;
        self.max = max;
        self
    }

    /// Set the padding-and-border floor.
    #[must_use]
    pub(crate) const fn floor(mut self, floor: f32) -> Self {
        self.floor = floor;
        self
    }

    fn clamp(&self, size: f32) -> f32 {
        let mut bounded = size;
        if let Some(max) = self.max.get() {
            if max >= 0.0 && bounded > max {
                bounded = max;
            }
        }
        if let Some(min) = self.min.get() {
            if min >= 0.0 && bounded < min {
                bounded = min;
            }
        }
        bounded.max(self.floor)
    }

    fn shrink_scaled(&self) -> f32 {
        self.shrink * self.basis
    }
}

/// Outcome of distributing free space over one line.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct FlexResolution {
    /// Final main size per item, in input order
    pub sizes: Vec<f32>,
    /// Free space the items could not absorb
    pub remaining_free_space: f32,
}

/// Distribute `free_space` over the `items` of `line`.
///
/// Positive space is shared by grow factor, negative space by
/// `shrink * basis`, against the totals `collect_line` recorded. An item whose
/// share would violate its bounds is frozen at the bound and the rest is
/// redistributed among the others. Each round freezes at least one item or
/// ends the loop, so there are at most `items.len()` rounds.
pub(crate) fn resolve_flexible_lengths(
    items: &[FlexItem],
    line: &FlexLine,
    free_space: f32,
) -> FlexResolution {
    let mut sizes: Vec<f32> = items.iter().map(|item| item.basis).collect();
    let growing = free_space > 0.0;
    let factor = |item: &FlexItem| {
        if growing {
            item.grow
        } else {
            item.shrink_scaled()
        }
    };

    let mut frozen = vec![false; items.len()];
    let mut total = if growing {
        line.total_flex_grow
    } else {
        line.total_flex_shrink_scaled
    };
    if floats_equal(free_space, 0.0) || total <= 0.0 {
        return FlexResolution {
            sizes,
            remaining_free_space: free_space,
        };
    }

    let mut remaining = free_space;
    for _ in 0..items.len() {
        if total <= 0.0 {
            break;
        }
        let per_unit = remaining / total;
        let mut delta = 0.0;
        let mut frozen_share = 0.0;
        for (index, item) in items.iter().enumerate() {
            let share = factor(item);
            if frozen[index] || share == 0.0 {
                continue;
            }
            let target = item.basis + per_unit * share;
            let bounded = item.clamp(target);
            if !floats_equal(target, bounded) {
                frozen[index] = true;
                sizes[index] = bounded;
                delta += bounded - item.basis;
                frozen_share += share;
            }
        }
        if frozen_share == 0.0 {
            break;
        }
        remaining -= delta;
        total -= frozen_share;
    }

    for (index, item) in items.iter().enumerate() {
        let share = factor(item);
        if frozen[index] || share == 0.0 || total <= 0.0 {
            continue;
        }
        sizes[index] = item.clamp(item.basis + remaining / total * share);
    }

    let distributed: f32 = sizes
        .iter()
        .zip(items)
        .map(|(size, item)| size - item.basis)
        .sum();
    FlexResolution {
        sizes,
        remaining_free_space: free_space - distributed,
    }
}

/// Space before the first item and between consecutive items.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub(crate) struct Spacing {
    pub leading: f32,
    pub between: f32,
}

/// Main-axis spacing for `justify`.
///
/// Distributing modes fall back to packing when there is no positive space:
/// `SpaceBetween` to the start, `SpaceAround` and `SpaceEvenly` to the center.
pub(crate) fn justify_spacing(justify: Justify, free_space: f32, item_count: usize) -> Spacing {
    if item_count == 0 {
        return Spacing::default();
    }
    let n = item_count as f32;
    let positive = free_space > 0.0;
    match justify {
        Justify::FlexStart => Spacing::default(),
        Justify::Center => Spacing {
            leading: free_space / 2.0,
            between: 0.0,
        },
        Justify::FlexEnd => Spacing {
            leading: free_space,
            between: 0.0,
        },
        Justify::SpaceBetween if positive && item_count > 1 => Spacing {
            leading: 0.0,
            between: free_space / (n - 1.0),
        },
        Justify::SpaceBetween => Spacing::default(),
        Justify::SpaceAround if positive => Spacing {
            leading: free_space / (2.0 * n),
            between: free_space / n,
        },
        Justify::SpaceEvenly if positive => Spacing {
            leading: free_space / (n + 1.0),
            between: free_space / (n + 1.0),
        },
        Justify::SpaceAround | Justify::SpaceEvenly => Spacing {
            leading: free_space / 2.0,
            between: 0.0,
        },
    }
}

/// Cross-axis placement of lines.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub(crate) struct LineSpacing {
    pub leading: f32,
    pub between: f32,
    /// Added to every line's cross size (`Stretch`)
    pub extra: f32,
}

/// Line spacing for `align-content`.
pub(crate) fn align_content_spacing(align: Align, free_space: f32, line_count: usize) -> LineSpacing {
    if line_count == 0 {
        return LineSpacing::default();
    }
    let n = line_count as f32;
    let positive = free_space > 0.0;
    match align {
        Align::FlexEnd => LineSpacing {
            leading: free_space,
            ..LineSpacing::default()
        },
        Align::Center => LineSpacing {
            leading: free_space / 2.0,
            ..LineSpacing::default()
        },
        Align::Stretch if positive => LineSpacing {
            extra: free_space / n,
            ..LineSpacing::default()
        },
        Align::SpaceBetween if positive && line_count > 1 => LineSpacing {
            between: free_space / (n - 1.0),
            ..LineSpacing::default()
        },
        Align::SpaceAround if positive => LineSpacing {
            leading: free_space / (2.0 * n),
            between: free_space / n,
            extra: 0.0,
        },
        Align::SpaceAround => LineSpacing {
            leading: free_space / 2.0,
            ..LineSpacing::default()
        },
        Align::Auto
        | Align::FlexStart
        | Align::Baseline
        | Align::Stretch
        | Align::SpaceBetween => LineSpacing::default(),
    }
}
