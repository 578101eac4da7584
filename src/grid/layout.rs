use crate::foundation::core::{Breakpoint, Rect, rect};
use crate::spec::model::GridSpec;

/// Fallback column cap when a grid spec defines none for any breakpoint.
const DEFAULT_MAX_COLUMNS: u32 = 4;

/// Compute the item rectangles for a uniform grid inside `container`.
///
/// Columns are capped by the spec's per-breakpoint maximum (falling back to
/// the nearest configured breakpoint below, then above, then a default of 4)
/// and by the item count. Every tile shares the same width and height; the
/// last row may be partially filled. Disabled grids and empty item sets
/// yield an empty vector.
pub fn grid_rects(
    spec: &GridSpec,
    item_count: usize,
    container: Rect,
    breakpoint: Breakpoint,
) -> Vec<Rect> {
    if !spec.enabled || item_count == 0 {
        return Vec::new();
    }

    let max_cols = max_columns_for(spec, breakpoint);
    let cols = (max_cols as usize).min(item_count).max(1);
    let gap = spec.gap.px.max(0.0);
    let aspect = if spec.tile.aspect.is_finite() && spec.tile.aspect > 0.0 {
        spec.tile.aspect
    } else {
        1.0
    };

    let usable = (container.width() - gap * (cols as f64 - 1.0)).max(0.0);
    let tile_w = usable / cols as f64;
    let tile_h = tile_w / aspect;

    let mut out = Vec::with_capacity(item_count);
    for i in 0..item_count {
        let col = i % cols;
        let row = i / cols;
        out.push(rect(
            container.x0 + col as f64 * (tile_w + gap),
            container.y0 + row as f64 * (tile_h + gap),
            tile_w,
            tile_h,
        ));
    }
    out
}

fn max_columns_for(spec: &GridSpec, breakpoint: Breakpoint) -> u32 {
    if let Some(col) = spec.columns.get(&breakpoint) {
        return col.max.max(1);
    }
    // Breakpoint ordering is Mobile < Tablet < Desktop < Wide, so range
    // queries on the BTreeMap walk neighbors in width order.
    if let Some((_, col)) = spec.columns.range(..breakpoint).next_back() {
        return col.max.max(1);
    }
    if let Some((_, col)) = spec.columns.range(breakpoint..).next() {
        return col.max.max(1);
    }
    DEFAULT_MAX_COLUMNS
}

#[cfg(test)]
#[path = "../../tests/unit/grid/layout.rs"]
mod tests;
