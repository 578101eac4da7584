use crate::foundation::core::{Point, Rect, Size};
use crate::foundation::math;
use crate::spec::model::{Anchor, CoordValue, PositionSpec};
use crate::viewport::state::ViewportDescriptor;

/// Resolve an element's placement inside `container` from a declarative
/// position spec.
///
/// Each coordinate is resolved independently: bare numbers are fractions of
/// the container dimension, `"Npx"` is absolute pixels, `"Nvw"`/`"Nvh"` are
/// viewport-relative percentages. The anchor correction then shifts the
/// point by half or all of `element_size` so the coordinate names the
/// element's center or bottom-right corner instead of its top-left one.
/// With `clamp` set, the final point is constrained to the container bounds.
///
/// Stateless and pure; malformed coordinate strings fall back to the
/// container origin with a logged warning.
pub fn place(
    spec: &PositionSpec,
    container: Rect,
    viewport: &ViewportDescriptor,
    element_size: Size,
) -> Point {
    let mut x = container.x0
        + resolve_axis(spec.left.as_ref(), container.width(), viewport, AxisKind::Horizontal)
        + sanitize(spec.dx);
    let mut y = container.y0
        + resolve_axis(spec.top.as_ref(), container.height(), viewport, AxisKind::Vertical)
        + sanitize(spec.dy);

    match spec.anchor {
        Anchor::TopLeft => {}
        Anchor::Center => {
            x -= element_size.width / 2.0;
            y -= element_size.height / 2.0;
        }
        Anchor::BottomRight => {
            x -= element_size.width;
            y -= element_size.height;
        }
    }

    if spec.clamp {
        x = math::clamp(x, container.x0, container.x1);
        y = math::clamp(y, container.y0, container.y1);
    }

    Point::new(x, y)
}

#[derive(Clone, Copy, Debug)]
enum AxisKind {
    Horizontal,
    Vertical,
}

fn resolve_axis(
    value: Option<&CoordValue>,
    container_extent: f64,
    viewport: &ViewportDescriptor,
    axis: AxisKind,
) -> f64 {
    match value {
        None => 0.0,
        Some(CoordValue::Fraction(f)) => sanitize(*f) * container_extent,
        Some(CoordValue::Text(s)) => parse_suffixed(s, viewport, axis),
    }
}

fn parse_suffixed(s: &str, viewport: &ViewportDescriptor, axis: AxisKind) -> f64 {
    let trimmed = s.trim();
    let parsed = if let Some(n) = trimmed.strip_suffix("px") {
        n.trim().parse::<f64>().ok()
    } else if let Some(n) = trimmed.strip_suffix("vw") {
        n.trim().parse::<f64>().ok().map(|p| p / 100.0 * viewport.width)
    } else if let Some(n) = trimmed.strip_suffix("vh") {
        n.trim()
            .parse::<f64>()
            .ok()
            .map(|p| p / 100.0 * viewport.height)
    } else {
        // A bare numeric string is treated like a bare number: a fraction of
        // the viewport along this axis is not implied, so it means pixels
        // only when suffixed. Reject instead of guessing.
        None
    };

    match parsed {
        Some(v) => sanitize(v),
        None => {
            tracing::warn!(value = %s, ?axis, "unparseable position coordinate; using 0");
            0.0
        }
    }
}

fn sanitize(v: f64) -> f64 {
    if v.is_finite() { v } else { 0.0 }
}

#[cfg(test)]
#[path = "../../tests/unit/position/resolver.rs"]
mod tests;
