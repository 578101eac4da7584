use std::collections::BTreeMap;

pub use kurbo::{Point, Rect, Size, Vec2};

/// Named viewport-width bucket driving base sizes and ratio overrides.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Breakpoint {
    /// Narrow phones.
    Mobile,
    /// Mid-size touch devices.
    Tablet,
    /// Standard desktop widths.
    Desktop,
    /// Very wide desktop/TV widths.
    Wide,
}

impl Breakpoint {
    /// Stable lowercase name, used in cache keys and spec lookups.
    pub fn as_str(self) -> &'static str {
        match self {
            Breakpoint::Mobile => "mobile",
            Breakpoint::Tablet => "tablet",
            Breakpoint::Desktop => "desktop",
            Breakpoint::Wide => "wide",
        }
    }
}

/// Viewport orientation. Exactly-square viewports report `Landscape`,
/// matching the width-wins tie-break used by the partition tree.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    /// Height exceeds width.
    Portrait,
    /// Width is greater than or equal to height.
    Landscape,
}

impl Orientation {
    /// Stable lowercase name, used in cache keys.
    pub fn as_str(self) -> &'static str {
        match self {
            Orientation::Portrait => "portrait",
            Orientation::Landscape => "landscape",
        }
    }
}

/// Top-level layout mode derived from viewport geometry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayoutMode {
    /// Regions stacked vertically (narrow or tall viewports).
    Stack,
    /// Side-by-side main split (wide viewports).
    Split,
    /// Neither threshold met; the caller picks.
    Auto,
}

/// Classification tag assigned to a container, driving scale heuristics.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    serde::Serialize,
    serde::Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Large showcase container; scale is boosted.
    Hero,
    /// Compact repeated container; scale is compressed.
    Card,
    /// Body text container; scale is compressed.
    Text,
    /// Image/video container; falls back to the header base size.
    Media,
    /// Navigation chrome; scale is subdued.
    Navigation,
    /// Primary content region of a partition.
    Primary,
    /// Interactive controls region of a partition.
    Controls,
    /// Secondary content region of a partition.
    Content,
    /// Unclassified container; falls back to the content base size.
    #[default]
    Generic,
}

/// Named style tokens produced by the engine, applied verbatim by the caller.
///
/// A `BTreeMap` keeps emission order deterministic.
pub type StyleTokens = BTreeMap<String, String>;

/// Build a [`Rect`] from an origin and extents, clamping extents to be
/// non-negative.
pub fn rect(x: f64, y: f64, width: f64, height: f64) -> Rect {
    let w = if width.is_finite() { width.max(0.0) } else { 0.0 };
    let h = if height.is_finite() { height.max(0.0) } else { 0.0 };
    Rect::new(x, y, x + w, y + h)
}

/// Format a numeric value as a CSS-style pixel token, rounded to 2 decimals.
pub fn px(value: f64) -> String {
    let v = if value.is_finite() { value } else { 0.0 };
    let rounded = (v * 100.0).round() / 100.0;
    if rounded.fract() == 0.0 {
        format!("{}px", rounded as i64)
    } else {
        format!("{rounded}px")
    }
}
