use std::collections::BTreeMap;

use crate::foundation::core::Breakpoint;
use crate::foundation::error::{TessellaError, TessellaResult};

#[derive(Clone, Debug, Default, serde::Serialize, serde::Deserialize)]
/// A complete declarative layout specification for one page.
///
/// A spec is a pure data model, deserialized from JSON and read-only to the
/// engine. Driving a layout from it is performed by
/// [`crate::LayoutEngine`].
pub struct LayoutSpec {
    /// Region ratios and the main split.
    #[serde(default)]
    pub layout: LayoutSection,
    /// Per-element position specs, keyed by element id.
    #[serde(default)]
    pub positions: BTreeMap<String, PositionSpec>,
    /// Grid sub-layout configs, keyed by grid id.
    #[serde(default, rename = "quadTree")]
    pub quad_tree: BTreeMap<String, GridSpec>,
}

#[derive(Clone, Debug, Default, serde::Serialize, serde::Deserialize)]
/// Page-level region and split configuration.
pub struct LayoutSection {
    /// Named regions (header/main/controls) with ratio bounds.
    #[serde(default)]
    pub regions: BTreeMap<String, RegionSpec>,
    /// Main horizontal split (left/right) with pixel floors.
    #[serde(default, rename = "mainSplit")]
    pub main_split: BTreeMap<String, SplitSpec>,
}

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
/// One named region's share of the viewport height.
pub struct RegionSpec {
    /// Fraction of viewport height given to the region.
    #[serde(default = "default_region_ratio")]
    pub ratio: f64,
    /// Optional `[lo, hi]` bounds the ratio is clamped into.
    #[serde(default, rename = "ratioRange", skip_serializing_if = "Option::is_none")]
    pub ratio_range: Option<[f64; 2]>,
    /// Optional pixel floor applied after the ratio.
    #[serde(default, rename = "minHeight", skip_serializing_if = "Option::is_none")]
    pub min_height: Option<f64>,
    /// Optional pixel ceiling applied after the ratio.
    #[serde(default, rename = "maxHeight", skip_serializing_if = "Option::is_none")]
    pub max_height: Option<f64>,
}

fn default_region_ratio() -> f64 {
    0.1
}

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
/// One side of the main split.
pub struct SplitSpec {
    /// Fraction of the main region width given to this side.
    #[serde(default = "default_split_ratio")]
    pub ratio: f64,
    /// Optional pixel floor for this side.
    #[serde(default, rename = "minPx", skip_serializing_if = "Option::is_none")]
    pub min_px: Option<f64>,
}

fn default_split_ratio() -> f64 {
    0.5
}

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
/// Declarative placement of a single element inside a container.
pub struct PositionSpec {
    /// Positioning system identifier (informational; units are per-value).
    #[serde(default = "default_position_system")]
    pub system: String,
    /// Vertical coordinate (fraction, `"Npx"`, `"Nvw"`, or `"Nvh"`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top: Option<CoordValue>,
    /// Horizontal coordinate (fraction, `"Npx"`, `"Nvw"`, or `"Nvh"`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub left: Option<CoordValue>,
    /// Pixel offset added to the resolved horizontal coordinate.
    #[serde(default)]
    pub dx: f64,
    /// Pixel offset added to the resolved vertical coordinate.
    #[serde(default)]
    pub dy: f64,
    /// Anchor keyword shifting the point by the element's own extent.
    #[serde(default)]
    pub anchor: Anchor,
    /// Constrain the final point to the container bounds.
    #[serde(default)]
    pub clamp: bool,
}

fn default_position_system() -> String {
    "ratio".to_string()
}

impl Default for PositionSpec {
    fn default() -> Self {
        Self {
            system: default_position_system(),
            top: None,
            left: None,
            dx: 0.0,
            dy: 0.0,
            anchor: Anchor::default(),
            clamp: false,
        }
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(untagged)]
/// A coordinate that is either a bare fraction or a suffixed string.
pub enum CoordValue {
    /// Fraction of the container dimension (`0.5` = midpoint).
    Fraction(f64),
    /// Suffixed value: `"120px"`, `"30vw"`, `"40vh"`.
    Text(String),
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
/// Which point of the element the resolved coordinate names.
pub enum Anchor {
    /// Coordinate names the element's top-left corner (no correction).
    #[default]
    TopLeft,
    /// Coordinate names the element's center; half the extent is subtracted.
    Center,
    /// Coordinate names the element's bottom-right corner; the full extent is
    /// subtracted.
    BottomRight,
}

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
/// Grid sub-layout configuration for one grid container.
pub struct GridSpec {
    /// Disabled grids are skipped entirely.
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Per-breakpoint column caps.
    #[serde(default)]
    pub columns: BTreeMap<Breakpoint, ColumnSpec>,
    /// Gap between tiles.
    #[serde(default)]
    pub gap: GapSpec,
    /// Tile shape.
    #[serde(default)]
    pub tile: TileSpec,
}

fn default_true() -> bool {
    true
}

#[derive(Clone, Copy, Debug, serde::Serialize, serde::Deserialize)]
/// Column cap at one breakpoint.
pub struct ColumnSpec {
    /// Maximum column count.
    pub max: u32,
}

#[derive(Clone, Copy, Debug, serde::Serialize, serde::Deserialize)]
/// Gap between grid tiles.
pub struct GapSpec {
    /// Gap in pixels.
    #[serde(default = "default_gap_px")]
    pub px: f64,
}

impl Default for GapSpec {
    fn default() -> Self {
        Self {
            px: default_gap_px(),
        }
    }
}

fn default_gap_px() -> f64 {
    16.0
}

#[derive(Clone, Copy, Debug, serde::Serialize, serde::Deserialize)]
/// Grid tile shape.
pub struct TileSpec {
    /// Width/height aspect ratio of each tile.
    #[serde(default = "default_tile_aspect")]
    pub aspect: f64,
}

impl Default for TileSpec {
    fn default() -> Self {
        Self {
            aspect: default_tile_aspect(),
        }
    }
}

fn default_tile_aspect() -> f64 {
    1.0
}

impl LayoutSpec {
    /// Deserialize a spec from JSON and validate it.
    pub fn from_json(json: &str) -> TessellaResult<Self> {
        let spec: LayoutSpec =
            serde_json::from_str(json).map_err(|e| TessellaError::serde(e.to_string()))?;
        spec.validate()?;
        Ok(spec)
    }

    /// Validate spec invariants field by field.
    pub fn validate(&self) -> TessellaResult<()> {
        for (name, region) in &self.layout.regions {
            if !region.ratio.is_finite() || !(0.0..=1.0).contains(&region.ratio) {
                return Err(TessellaError::validation(format!(
                    "region '{name}' ratio must be finite and in [0, 1]"
                )));
            }
            if let Some([lo, hi]) = region.ratio_range {
                if !lo.is_finite() || !hi.is_finite() || lo > hi || lo < 0.0 || hi > 1.0 {
                    return Err(TessellaError::validation(format!(
                        "region '{name}' ratioRange must be finite with lo <= hi in [0, 1]"
                    )));
                }
            }
            for (field, value) in [
                ("minHeight", region.min_height),
                ("maxHeight", region.max_height),
            ] {
                if let Some(v) = value
                    && (!v.is_finite() || v < 0.0)
                {
                    return Err(TessellaError::validation(format!(
                        "region '{name}' {field} must be finite and >= 0"
                    )));
                }
            }
            if let (Some(lo), Some(hi)) = (region.min_height, region.max_height)
                && lo > hi
            {
                return Err(TessellaError::validation(format!(
                    "region '{name}' minHeight must be <= maxHeight"
                )));
            }
        }

        for (side, split) in &self.layout.main_split {
            if !split.ratio.is_finite() || !(0.0..=1.0).contains(&split.ratio) {
                return Err(TessellaError::validation(format!(
                    "mainSplit '{side}' ratio must be finite and in [0, 1]"
                )));
            }
            if let Some(min_px) = split.min_px
                && (!min_px.is_finite() || min_px < 0.0)
            {
                return Err(TessellaError::validation(format!(
                    "mainSplit '{side}' minPx must be finite and >= 0"
                )));
            }
        }

        for (id, pos) in &self.positions {
            if id.trim().is_empty() {
                return Err(TessellaError::validation("position element id must be non-empty"));
            }
            if pos.system.trim().is_empty() {
                return Err(TessellaError::validation(format!(
                    "position '{id}' system must be non-empty"
                )));
            }
            for (field, value) in [("dx", pos.dx), ("dy", pos.dy)] {
                if !value.is_finite() {
                    return Err(TessellaError::validation(format!(
                        "position '{id}' {field} must be finite"
                    )));
                }
            }
        }

        for (id, grid) in &self.quad_tree {
            if id.trim().is_empty() {
                return Err(TessellaError::validation("grid id must be non-empty"));
            }
            for (bp, col) in &grid.columns {
                if col.max == 0 {
                    return Err(TessellaError::validation(format!(
                        "grid '{id}' columns.{} max must be > 0",
                        bp.as_str()
                    )));
                }
            }
            if !grid.gap.px.is_finite() || grid.gap.px < 0.0 {
                return Err(TessellaError::validation(format!(
                    "grid '{id}' gap.px must be finite and >= 0"
                )));
            }
            if !grid.tile.aspect.is_finite() || grid.tile.aspect <= 0.0 {
                return Err(TessellaError::validation(format!(
                    "grid '{id}' tile.aspect must be finite and > 0"
                )));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/spec/model.rs"]
mod tests;
