use super::*;
use crate::foundation::core::rect;
use crate::foundation::math::{SCALE_MAX, SCALE_MIN};

fn resolver() -> ScaleResolver {
    ScaleResolver::new(ScaleConfig::default())
}

#[test]
fn resolve_is_referentially_transparent() {
    let r = resolver();
    let a = r.resolve(
        Role::Card,
        rect(0.0, 0.0, 280.0, 200.0),
        Breakpoint::Tablet,
        DensityHints::default(),
    );
    let b = r.resolve(
        Role::Card,
        rect(0.0, 0.0, 280.0, 200.0),
        Breakpoint::Tablet,
        DensityHints::default(),
    );
    assert_eq!(a, b);
}

#[test]
fn scale_is_always_within_configured_bounds() {
    let r = resolver();
    let cfg = ScaleConfig::default();
    let roles = [
        Role::Hero,
        Role::Card,
        Role::Text,
        Role::Media,
        Role::Navigation,
        Role::Generic,
    ];
    let breakpoints = [
        Breakpoint::Mobile,
        Breakpoint::Tablet,
        Breakpoint::Desktop,
        Breakpoint::Wide,
    ];
    let sizes = [(1.0, 1.0), (320.0, 480.0), (1920.0, 1080.0), (50_000.0, 10.0)];
    for role in roles {
        for bp in breakpoints {
            for (w, h) in sizes {
                let res = r.resolve(role, rect(0.0, 0.0, w, h), bp, DensityHints::default());
                assert!(
                    res.scale >= cfg.min_scale && res.scale <= cfg.max_scale,
                    "{role:?} {bp:?} {w}x{h} -> {}",
                    res.scale
                );
            }
        }
    }
    // Config bounds are themselves inside the global primitives bounds.
    assert!(cfg.min_scale >= SCALE_MIN && cfg.max_scale <= SCALE_MAX);
}

#[test]
fn role_multipliers_boost_hero_and_subdue_navigation() {
    // Flatten every base to the same extent so only the role multipliers
    // differ between resolutions.
    let mut cfg = ScaleConfig::default();
    cfg.role_bases.clear();
    cfg.header_base = 560.0;
    cfg.content_base = 560.0;
    cfg.default_base = 560.0;
    let r = ScaleResolver::new(cfg);

    let container = rect(0.0, 0.0, 560.0, 900.0);
    let hints = DensityHints::default();
    let hero = r.resolve(Role::Hero, container, Breakpoint::Desktop, hints);
    let nav = r.resolve(Role::Navigation, container, Breakpoint::Desktop, hints);
    let card = r.resolve(Role::Card, container, Breakpoint::Desktop, hints);
    let generic = r.resolve(Role::Generic, container, Breakpoint::Desktop, hints);

    assert!((generic.scale - 1.0).abs() < 1e-9);
    assert!((hero.scale - 1.15).abs() < 1e-9);
    assert!((nav.scale - 0.9).abs() < 1e-9);
    assert!((card.scale - 0.95).abs() < 1e-9);
}

#[test]
fn mobile_shrinks_relative_to_desktop() {
    let r = resolver();
    let container = rect(0.0, 0.0, 560.0, 400.0);
    let hints = DensityHints::default();
    let desktop = r.resolve(Role::Text, container, Breakpoint::Desktop, hints);
    let mobile = r.resolve(Role::Text, container, Breakpoint::Mobile, hints);
    assert!(mobile.scale < desktop.scale);
}

#[test]
fn density_hints_adjust_scale() {
    let r = resolver();
    let container = rect(0.0, 0.0, 560.0, 400.0);
    let base = r.resolve(
        Role::Generic,
        container,
        Breakpoint::Desktop,
        DensityHints {
            child_count: 3,
            visible_fraction: 1.0,
        },
    );
    let dense = r.resolve(
        Role::Generic,
        container,
        Breakpoint::Desktop,
        DensityHints {
            child_count: 9,
            visible_fraction: 1.0,
        },
    );
    let solo = r.resolve(
        Role::Generic,
        container,
        Breakpoint::Desktop,
        DensityHints {
            child_count: 1,
            visible_fraction: 1.0,
        },
    );
    let hidden = r.resolve(
        Role::Generic,
        container,
        Breakpoint::Desktop,
        DensityHints {
            child_count: 3,
            visible_fraction: 0.3,
        },
    );
    assert!(dense.scale < base.scale);
    assert!(solo.scale > base.scale);
    assert!(hidden.scale < base.scale);
}

#[test]
fn tokens_are_a_fixed_function_of_scale() {
    let r = resolver();
    let res = r.resolve(
        Role::Text,
        rect(0.0, 0.0, 560.0, 350.0),
        Breakpoint::Desktop,
        DensityHints::default(),
    );
    assert!(res.tokens.contains_key("--font-size"));
    assert!(res.tokens.contains_key("--spacing"));
    assert!(res.tokens.contains_key("--radius"));
    assert!(res.tokens.contains_key("--gap"));
    assert_eq!(res.tokens["--scale"], {
        let rounded = (res.scale * 1000.0).round() / 1000.0;
        format!("{rounded}")
    });
    // Two containers that land on the same scale share the same tokens.
    let other = r.resolve(
        Role::Text,
        rect(100.0, 200.0, 560.0, 350.0),
        Breakpoint::Desktop,
        DensityHints::default(),
    );
    assert_eq!(res.tokens, other.tokens);
}

#[test]
fn media_falls_back_to_header_base_and_generic_to_content_base() {
    let cfg = ScaleConfig::default();
    let r = ScaleResolver::new(cfg.clone());
    let container = rect(0.0, 0.0, cfg.header_base, cfg.header_base * 2.0);
    // Width-bound container exactly at the header base: raw scale 1.0.
    let media = r.resolve(Role::Media, container, Breakpoint::Desktop, DensityHints::default());
    assert!((media.scale - 1.0).abs() < 1e-9);

    let container = rect(0.0, 0.0, cfg.content_base, cfg.content_base * 2.0);
    let generic = r.resolve(Role::Generic, container, Breakpoint::Desktop, DensityHints::default());
    assert!((generic.scale - 1.0).abs() < 1e-9);
}

#[test]
fn breakpoint_overrides_beat_role_table() {
    let mut cfg = ScaleConfig::default();
    cfg.breakpoint_bases
        .entry(Breakpoint::Mobile)
        .or_default()
        .insert(Role::Card, 140.0);
    let r = ScaleResolver::new(cfg);
    let container = rect(0.0, 0.0, 140.0, 280.0);
    let res = r.resolve(Role::Card, container, Breakpoint::Mobile, DensityHints::default());
    // base 140 -> raw 1.0, then card compress and mobile shrink.
    assert!((res.scale - 0.95 * 0.85).abs() < 1e-9);
}
