use crate::foundation::core::{Breakpoint, LayoutMode, Orientation};
use crate::foundation::math::{self, PHI};

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
/// Raw viewport measurements supplied by the host adapter.
pub struct Measurements {
    /// Viewport width in CSS pixels.
    pub width: f64,
    /// Viewport height in CSS pixels.
    pub height: f64,
    /// Device pixel ratio.
    #[serde(default = "default_dpr")]
    pub dpr: f64,
    /// Host-supplied timestamp in milliseconds.
    #[serde(default)]
    pub timestamp: u64,
}

fn default_dpr() -> f64 {
    1.0
}

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
/// Derived snapshot of viewport state.
///
/// Produced fresh on every measurement and never mutated in place.
pub struct ViewportDescriptor {
    /// Sanitized viewport width.
    pub width: f64,
    /// Sanitized viewport height.
    pub height: f64,
    /// Sanitized device pixel ratio.
    pub dpr: f64,
    /// Width over height.
    pub aspect: f64,
    /// Orientation bucket.
    pub orientation: Orientation,
    /// Width bucket.
    pub breakpoint: Breakpoint,
    /// Whether the aspect ratio is within tolerance of φ.
    pub is_golden_aspect: bool,
    /// Top-level layout mode.
    pub mode: LayoutMode,
    /// Comfortable reading measure in pixels.
    pub measure: f64,
    /// Gutter width in pixels.
    pub gutter: f64,
    /// Column count for grid-ish layouts.
    pub columns: u32,
    /// Header region height in pixels.
    pub header_height: f64,
    /// Timestamp copied from the measurement.
    pub timestamp: u64,
}

#[derive(Clone, Copy, Debug, serde::Serialize, serde::Deserialize)]
/// Thresholds and formulas for [`ViewportCalculator`].
///
/// Every field has a documented default; deserializing `{}` yields a usable
/// config.
#[serde(default)]
pub struct ViewportConfig {
    /// Widths below this force stack mode.
    pub stack_max_width: f64,
    /// Aspects below this force stack mode.
    pub stack_max_aspect: f64,
    /// Minimum width for split mode.
    pub split_min_width: f64,
    /// Minimum aspect for split mode.
    pub split_min_aspect: f64,
    /// `|aspect − φ|` tolerance for the golden flag.
    pub golden_tolerance: f64,
    /// Tablet breakpoint lower bound.
    pub tablet_min_width: f64,
    /// Desktop breakpoint lower bound.
    pub desktop_min_width: f64,
    /// Wide breakpoint lower bound.
    pub wide_min_width: f64,
    /// Nominal column width used to derive the column count.
    pub column_width: f64,
    /// Column count floor.
    pub min_columns: u32,
    /// Column count ceiling.
    pub max_columns: u32,
    /// Fraction of width used for the reading measure.
    pub measure_ratio: f64,
    /// Reading measure floor in pixels.
    pub measure_min: f64,
    /// Reading measure ceiling in pixels.
    pub measure_max: f64,
    /// Fraction of width used for the gutter.
    pub gutter_ratio: f64,
    /// Gutter floor in pixels.
    pub gutter_min: f64,
    /// Gutter ceiling in pixels.
    pub gutter_max: f64,
    /// Fraction of height used for the header.
    pub header_ratio: f64,
    /// Header floor in pixels.
    pub header_min: f64,
    /// Header ceiling in pixels.
    pub header_max: f64,
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            stack_max_width: 568.0,
            stack_max_aspect: 0.9,
            split_min_width: 1024.0,
            split_min_aspect: 1.1,
            golden_tolerance: 0.04,
            tablet_min_width: 768.0,
            desktop_min_width: 1280.0,
            wide_min_width: 1920.0,
            column_width: 320.0,
            min_columns: 1,
            max_columns: 6,
            measure_ratio: 0.42,
            measure_min: 320.0,
            measure_max: 720.0,
            gutter_ratio: 0.02,
            gutter_min: 8.0,
            gutter_max: 48.0,
            header_ratio: 0.08,
            header_min: 48.0,
            header_max: 120.0,
        }
    }
}

/// Pure calculator from raw measurements to a [`ViewportDescriptor`].
#[derive(Clone, Debug, Default)]
pub struct ViewportCalculator {
    config: ViewportConfig,
}

impl ViewportCalculator {
    /// Build a calculator over an explicit configuration.
    pub fn new(config: ViewportConfig) -> Self {
        Self { config }
    }

    /// Derive the full viewport descriptor for one measurement.
    ///
    /// Pure: identical inputs yield bit-identical descriptors. Degenerate
    /// measurements (zero, negative, non-finite) are clamped to 1.0 before
    /// any derivation, so every derived scalar stays positive.
    pub fn calculate(&self, m: Measurements) -> ViewportDescriptor {
        let cfg = &self.config;
        let width = sanitize_dim(m.width);
        let height = sanitize_dim(m.height);
        let dpr = math::clamp(if m.dpr.is_finite() { m.dpr } else { 1.0 }, 0.5, 4.0);
        let aspect = width / height;

        let orientation = if height > width {
            Orientation::Portrait
        } else {
            Orientation::Landscape
        };

        let breakpoint = if width < cfg.tablet_min_width {
            Breakpoint::Mobile
        } else if width < cfg.desktop_min_width {
            Breakpoint::Tablet
        } else if width < cfg.wide_min_width {
            Breakpoint::Desktop
        } else {
            Breakpoint::Wide
        };

        // Fixed precedence: stack beats split beats auto.
        let mode = if width < cfg.stack_max_width || aspect < cfg.stack_max_aspect {
            LayoutMode::Stack
        } else if width >= cfg.split_min_width && aspect >= cfg.split_min_aspect {
            LayoutMode::Split
        } else {
            LayoutMode::Auto
        };

        let is_golden_aspect = (aspect - PHI).abs() < cfg.golden_tolerance;

        let columns = math::clamp(
            (width / cfg.column_width.max(1.0)).floor(),
            f64::from(cfg.min_columns.max(1)),
            f64::from(cfg.max_columns.max(cfg.min_columns.max(1))),
        ) as u32;

        let measure = math::clamp(width * cfg.measure_ratio, cfg.measure_min, cfg.measure_max);
        let gutter = math::clamp(
            math::round_to_increment(width * cfg.gutter_ratio, 2.0),
            cfg.gutter_min,
            cfg.gutter_max,
        );
        let header_height = math::clamp(height * cfg.header_ratio, cfg.header_min, cfg.header_max);

        ViewportDescriptor {
            width,
            height,
            dpr,
            aspect,
            orientation,
            breakpoint,
            is_golden_aspect,
            mode,
            measure,
            gutter,
            columns,
            header_height,
            timestamp: m.timestamp,
        }
    }
}

fn sanitize_dim(v: f64) -> f64 {
    if v.is_finite() && v >= 1.0 { v } else { 1.0 }
}

#[cfg(test)]
#[path = "../../tests/unit/viewport/state.rs"]
mod tests;
