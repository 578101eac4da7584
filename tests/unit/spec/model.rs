use super::*;

fn spec_json() -> &'static str {
    r#"{
        "layout": {
            "regions": {
                "header": {"ratio": 0.12, "ratioRange": [0.08, 0.2], "minHeight": 48, "maxHeight": 160},
                "main": {"ratio": 0.7},
                "controls": {"ratio": 0.18, "minHeight": 64}
            },
            "mainSplit": {
                "left": {"ratio": 0.62, "minPx": 320},
                "right": {"ratio": 0.38, "minPx": 240}
            }
        },
        "positions": {
            "badge": {"system": "ratio", "top": 0.5, "left": "120px", "dx": 4, "dy": -2, "anchor": "center", "clamp": true}
        },
        "quadTree": {
            "gallery": {
                "enabled": true,
                "columns": {"desktop": {"max": 4}, "mobile": {"max": 2}},
                "gap": {"px": 16},
                "tile": {"aspect": 1.0}
            }
        }
    }"#
}

#[test]
fn full_spec_round_trips() {
    let spec = LayoutSpec::from_json(spec_json()).unwrap();
    assert_eq!(spec.layout.regions.len(), 3);
    assert_eq!(spec.layout.regions["header"].ratio_range, Some([0.08, 0.2]));
    assert_eq!(spec.layout.main_split["left"].min_px, Some(320.0));
    assert_eq!(spec.positions["badge"].anchor, Anchor::Center);
    assert!(spec.positions["badge"].clamp);
    assert_eq!(spec.quad_tree["gallery"].columns[&Breakpoint::Desktop].max, 4);

    let json = serde_json::to_string(&spec).unwrap();
    let again: LayoutSpec = serde_json::from_str(&json).unwrap();
    assert_eq!(again.layout.regions["main"].ratio, 0.7);
}

#[test]
fn empty_object_is_a_valid_spec() {
    let spec = LayoutSpec::from_json("{}").unwrap();
    assert!(spec.layout.regions.is_empty());
    assert!(spec.positions.is_empty());
    assert!(spec.quad_tree.is_empty());
}

#[test]
fn defaults_fill_missing_fields() {
    let spec =
        LayoutSpec::from_json(r#"{"layout": {"regions": {"header": {}}}, "quadTree": {"g": {}}}"#)
            .unwrap();
    assert_eq!(spec.layout.regions["header"].ratio, 0.1);
    assert!(spec.quad_tree["g"].enabled);
    assert_eq!(spec.quad_tree["g"].gap.px, 16.0);
    assert_eq!(spec.quad_tree["g"].tile.aspect, 1.0);
}

#[test]
fn out_of_range_ratio_is_rejected() {
    let err = LayoutSpec::from_json(r#"{"layout": {"regions": {"header": {"ratio": 1.5}}}}"#)
        .unwrap_err();
    assert!(err.to_string().contains("ratio"));
}

#[test]
fn inverted_height_bounds_are_rejected() {
    let json = r#"{"layout": {"regions": {"header": {"minHeight": 200, "maxHeight": 100}}}}"#;
    assert!(LayoutSpec::from_json(json).is_err());
}

#[test]
fn zero_column_grid_is_rejected() {
    let json = r#"{"quadTree": {"g": {"columns": {"desktop": {"max": 0}}}}}"#;
    assert!(LayoutSpec::from_json(json).is_err());
}

#[test]
fn malformed_json_reports_serde_error() {
    let err = LayoutSpec::from_json("{not json").unwrap_err();
    assert!(matches!(err, TessellaError::Serde(_)));
}

#[test]
fn coord_values_accept_numbers_and_strings() {
    let spec = LayoutSpec::from_json(
        r#"{"positions": {"a": {"top": 0.25, "left": "30vw"}}}"#,
    )
    .unwrap();
    assert_eq!(spec.positions["a"].top, Some(CoordValue::Fraction(0.25)));
    assert_eq!(
        spec.positions["a"].left,
        Some(CoordValue::Text("30vw".to_string()))
    );
}
