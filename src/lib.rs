//! Tessella is a responsive spatial layout engine.
//!
//! Tessella turns a declarative layout specification (region ratios,
//! breakpoints, splitting strategies) plus live viewport geometry into
//! concrete rectangles, scale factors, and named style tokens for the
//! rendering layer to apply.
//!
//! # Pipeline overview
//!
//! 1. **Measure**: `Measurements -> ViewportDescriptor` (breakpoint,
//!    orientation, mode, derived scalars)
//! 2. **Derive**: `LayoutSpec + ViewportDescriptor -> StyleTokens` (region
//!    heights, split widths, gutter/measure/columns)
//! 3. **Subdivide**: [`PartitionTree`] and [`grid_rects`] compute item
//!    rectangles; [`ScaleResolver`] computes per-container scale tokens,
//!    memoized through [`ResultCache`]
//! 4. **Observe**: the [`ChangeObserver`] debounces host geometry events and
//!    drives recomputation through [`LayoutEngine::pump`]
//!
//! The key design constraints:
//!
//! - **No unsafe**: `unsafe` is forbidden in this crate.
//! - **Deterministic-by-default**: every computation is a pure function of
//!   its inputs; time enters only as explicit millisecond timestamps.
//! - **No host I/O**: the engine never touches the network or the render
//!   tree; callers inject measurements and apply returned tokens.
//! - **Never fatal**: malformed configuration falls back to documented
//!   defaults; missing targets are skipped with a warning.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod cache;
mod engine;
mod foundation;
mod grid;
mod observer;
mod partition;
mod position;
mod scale;
mod spec;
mod viewport;

pub use cache::lru::{CacheConfig, ResultCache, cache_key};
pub use engine::orchestrator::{
    EngineConfig, EngineEvent, EngineEventKind, EventListener, FluidFontConfig, LayoutEngine,
    LayoutUpdate, TimingMetrics,
};
pub use foundation::core::{
    Breakpoint, LayoutMode, Orientation, Point, Rect, Role, Size, StyleTokens, Vec2, px, rect,
};
pub use foundation::error::{TessellaError, TessellaResult};
pub use foundation::math::{
    PHI, SCALE_MAX, SCALE_MIN, clamp, fibonacci_split, golden_split, round_to_increment,
    scale_factor,
};
pub use grid::layout::grid_rects;
pub use observer::change::{
    ChangeCallback, ChangeNotice, ChangeObserver, ChangeTrigger, GeometryEvent, ObserveOptions,
    ObserverConfig,
};
pub use partition::tree::{NodeId, PartitionNode, PartitionTree, SplitStrategy};
pub use position::resolver::place;
pub use scale::resolver::{DensityHints, ScaleConfig, ScaleResolution, ScaleResolver};
pub use spec::model::{
    Anchor, ColumnSpec, CoordValue, GapSpec, GridSpec, LayoutSection, LayoutSpec, PositionSpec,
    RegionSpec, SplitSpec, TileSpec,
};
pub use viewport::state::{Measurements, ViewportCalculator, ViewportConfig, ViewportDescriptor};
