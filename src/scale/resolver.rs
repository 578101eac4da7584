use std::collections::BTreeMap;

use crate::foundation::core::{Breakpoint, Rect, Role, StyleTokens, px};
use crate::foundation::math::{self, PHI};

#[derive(Clone, Copy, Debug, serde::Serialize, serde::Deserialize)]
/// Density inputs observed by the caller for one container.
pub struct DensityHints {
    /// Number of immediate children in the container.
    pub child_count: usize,
    /// Fraction of the container currently within the viewport, in `[0, 1]`.
    pub visible_fraction: f64,
}

impl Default for DensityHints {
    fn default() -> Self {
        Self {
            child_count: 0,
            visible_fraction: 1.0,
        }
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
/// Resolved scale plus its derived style token bundle.
pub struct ScaleResolution {
    /// Final clamped scale factor.
    pub scale: f64,
    /// Flat token map derived from the scale with fixed ratios.
    pub tokens: StyleTokens,
}

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
/// Base sizes, adjustment multipliers, and bounds for [`ScaleResolver`].
#[serde(default)]
pub struct ScaleConfig {
    /// Final scale floor.
    pub min_scale: f64,
    /// Final scale ceiling.
    pub max_scale: f64,
    /// Target aspect used when deriving the base scale.
    pub target_aspect: f64,
    /// Reference container extent for header-like content.
    pub header_base: f64,
    /// Reference container extent for body content.
    pub content_base: f64,
    /// Last-resort reference extent.
    pub default_base: f64,
    /// Per-role reference extents.
    pub role_bases: BTreeMap<Role, f64>,
    /// Per-breakpoint overrides of the per-role reference extents.
    pub breakpoint_bases: BTreeMap<Breakpoint, BTreeMap<Role, f64>>,
    /// Multiplier applied to hero containers.
    pub hero_boost: f64,
    /// Multiplier applied to navigation chrome.
    pub navigation_subdue: f64,
    /// Multiplier applied to card and text containers.
    pub compact_compress: f64,
    /// Multiplier applied at the mobile breakpoint.
    pub mobile_shrink: f64,
    /// Multiplier applied at the tablet breakpoint.
    pub tablet_shrink: f64,
    /// Multiplier applied when a container has more than 5 children.
    pub dense_shrink: f64,
    /// Multiplier applied when a container has exactly 1 child.
    pub solo_grow: f64,
    /// Multiplier applied when less than half the container is visible.
    pub partial_shrink: f64,
    /// Base font size in pixels mapped to scale 1.0.
    pub font_base_px: f64,
    /// Base spacing unit in pixels mapped to scale 1.0.
    pub spacing_base_px: f64,
    /// Base corner radius in pixels mapped to scale 1.0.
    pub radius_base_px: f64,
    /// Base gap in pixels mapped to scale 1.0.
    pub gap_base_px: f64,
}

impl Default for ScaleConfig {
    fn default() -> Self {
        let mut role_bases = BTreeMap::new();
        role_bases.insert(Role::Hero, 960.0);
        role_bases.insert(Role::Navigation, 480.0);
        role_bases.insert(Role::Card, 280.0);
        role_bases.insert(Role::Text, 560.0);
        Self {
            min_scale: 0.5,
            max_scale: 2.0,
            target_aspect: PHI,
            header_base: 720.0,
            content_base: 560.0,
            default_base: 560.0,
            role_bases,
            breakpoint_bases: BTreeMap::new(),
            hero_boost: 1.15,
            navigation_subdue: 0.9,
            compact_compress: 0.95,
            mobile_shrink: 0.85,
            tablet_shrink: 0.93,
            dense_shrink: 0.92,
            solo_grow: 1.08,
            partial_shrink: 0.9,
            font_base_px: 16.0,
            spacing_base_px: 8.0,
            radius_base_px: 4.0,
            gap_base_px: 12.0,
        }
    }
}

/// Pure resolver from container geometry and classification to a scale
/// factor plus style tokens.
#[derive(Clone, Debug, Default)]
pub struct ScaleResolver {
    config: ScaleConfig,
}

impl ScaleResolver {
    /// Build a resolver over an explicit configuration.
    pub fn new(config: ScaleConfig) -> Self {
        Self { config }
    }

    /// Resolve the scale and token bundle for one container.
    ///
    /// Referentially transparent: a given `(role, rect, breakpoint, hints)`
    /// always yields the same resolution, and the token bundle is a fixed
    /// function of the scale alone.
    pub fn resolve(
        &self,
        role: Role,
        rect: Rect,
        breakpoint: Breakpoint,
        hints: DensityHints,
    ) -> ScaleResolution {
        let cfg = &self.config;
        let base = self.base_size(role, breakpoint);
        let mut scale = math::scale_factor(rect.width(), rect.height(), base, cfg.target_aspect);

        scale *= match role {
            Role::Hero => cfg.hero_boost,
            Role::Navigation => cfg.navigation_subdue,
            Role::Card | Role::Text => cfg.compact_compress,
            _ => 1.0,
        };
        scale *= match breakpoint {
            Breakpoint::Mobile => cfg.mobile_shrink,
            Breakpoint::Tablet => cfg.tablet_shrink,
            _ => 1.0,
        };
        if hints.child_count > 5 {
            scale *= cfg.dense_shrink;
        } else if hints.child_count == 1 {
            scale *= cfg.solo_grow;
        }
        let visible = math::clamp(hints.visible_fraction, 0.0, 1.0);
        if visible < 0.5 {
            scale *= cfg.partial_shrink;
        }

        let scale = math::clamp(scale, cfg.min_scale, cfg.max_scale);
        ScaleResolution {
            scale,
            tokens: self.tokens_for(scale),
        }
    }

    /// Role/breakpoint base size with the documented fallback chain:
    /// breakpoint override, then role table, then media -> header size and
    /// generic content -> content size, then the global default.
    fn base_size(&self, role: Role, breakpoint: Breakpoint) -> f64 {
        let cfg = &self.config;
        if let Some(overrides) = cfg.breakpoint_bases.get(&breakpoint)
            && let Some(&base) = overrides.get(&role)
        {
            return base;
        }
        if let Some(&base) = cfg.role_bases.get(&role) {
            return base;
        }
        match role {
            Role::Media => cfg.header_base,
            Role::Generic | Role::Content | Role::Primary | Role::Controls => cfg.content_base,
            _ => cfg.default_base,
        }
    }

    fn tokens_for(&self, scale: f64) -> StyleTokens {
        let cfg = &self.config;
        let mut tokens = StyleTokens::new();
        tokens.insert("--scale".to_string(), format_scale(scale));
        tokens.insert("--font-size".to_string(), px(cfg.font_base_px * scale));
        tokens.insert("--spacing".to_string(), px(cfg.spacing_base_px * scale));
        tokens.insert("--radius".to_string(), px(cfg.radius_base_px * scale));
        tokens.insert("--gap".to_string(), px(cfg.gap_base_px * scale));
        tokens.insert(
            "--spacing-2x".to_string(),
            px(cfg.spacing_base_px * scale * 2.0),
        );
        tokens
    }
}

fn format_scale(scale: f64) -> String {
    let rounded = (scale * 1000.0).round() / 1000.0;
    format!("{rounded}")
}

#[cfg(test)]
#[path = "../../tests/unit/scale/resolver.rs"]
mod tests;
