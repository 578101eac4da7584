use super::*;

use crate::foundation::core::rect;
use crate::viewport::state::{Measurements, ViewportCalculator, ViewportConfig};

fn viewport() -> ViewportDescriptor {
    ViewportCalculator::new(ViewportConfig::default()).calculate(Measurements {
        width: 1000.0,
        height: 800.0,
        dpr: 1.0,
        timestamp: 0,
    })
}

fn spec(left: Option<CoordValue>, top: Option<CoordValue>) -> PositionSpec {
    PositionSpec {
        left,
        top,
        ..PositionSpec::default()
    }
}

#[test]
fn bare_numbers_are_fractions_of_the_container() {
    let container = rect(100.0, 50.0, 500.0, 250.0);
    let p = place(
        &spec(
            Some(CoordValue::Fraction(0.5)),
            Some(CoordValue::Fraction(0.25)),
        ),
        container,
        &viewport(),
        Size::ZERO,
    );
    // 0.5 of the 500px width, 0.25 of the 250px height, from the origin.
    assert_eq!(p, Point::new(100.0 + 250.0, 50.0 + 62.5));
}

#[test]
fn missing_coordinates_resolve_to_the_container_origin() {
    let container = rect(40.0, 60.0, 300.0, 300.0);
    let p = place(&spec(None, None), container, &viewport(), Size::ZERO);
    assert_eq!(p, Point::new(40.0, 60.0));
}

#[test]
fn px_vw_and_vh_units_resolve_absolutely() {
    let container = rect(0.0, 0.0, 400.0, 400.0);
    let vp = viewport();

    let px = place(
        &spec(Some(CoordValue::Text("32px".into())), None),
        container,
        &vp,
        Size::ZERO,
    );
    assert_eq!(px.x, 32.0);

    // 10vw of the 1000px viewport, 25vh of the 800px viewport.
    let relative = place(
        &spec(
            Some(CoordValue::Text("10vw".into())),
            Some(CoordValue::Text("25vh".into())),
        ),
        container,
        &vp,
        Size::ZERO,
    );
    assert_eq!(relative, Point::new(100.0, 200.0));
}

#[test]
fn offsets_apply_after_coordinate_resolution() {
    let container = rect(0.0, 0.0, 400.0, 400.0);
    let p = place(
        &PositionSpec {
            left: Some(CoordValue::Fraction(0.5)),
            top: Some(CoordValue::Fraction(0.5)),
            dx: -12.0,
            dy: 8.0,
            ..PositionSpec::default()
        },
        container,
        &viewport(),
        Size::ZERO,
    );
    assert_eq!(p, Point::new(188.0, 208.0));
}

#[test]
fn center_anchor_shifts_by_half_the_element() {
    let container = rect(0.0, 0.0, 400.0, 400.0);
    let p = place(
        &PositionSpec {
            left: Some(CoordValue::Fraction(0.5)),
            top: Some(CoordValue::Fraction(0.5)),
            anchor: Anchor::Center,
            ..PositionSpec::default()
        },
        container,
        &viewport(),
        Size::new(100.0, 60.0),
    );
    assert_eq!(p, Point::new(150.0, 170.0));
}

#[test]
fn bottom_right_anchor_shifts_by_the_whole_element() {
    let container = rect(0.0, 0.0, 400.0, 400.0);
    let p = place(
        &PositionSpec {
            left: Some(CoordValue::Fraction(1.0)),
            top: Some(CoordValue::Fraction(1.0)),
            anchor: Anchor::BottomRight,
            ..PositionSpec::default()
        },
        container,
        &viewport(),
        Size::new(100.0, 60.0),
    );
    assert_eq!(p, Point::new(300.0, 340.0));
}

#[test]
fn clamp_constrains_the_point_to_the_container() {
    let container = rect(0.0, 0.0, 400.0, 400.0);
    let overshoot = PositionSpec {
        left: Some(CoordValue::Fraction(1.5)),
        top: Some(CoordValue::Fraction(-0.5)),
        clamp: true,
        ..PositionSpec::default()
    };
    let p = place(&overshoot, container, &viewport(), Size::ZERO);
    assert_eq!(p, Point::new(400.0, 0.0));

    let unclamped = PositionSpec {
        clamp: false,
        ..overshoot
    };
    let q = place(&unclamped, container, &viewport(), Size::ZERO);
    assert_eq!(q, Point::new(600.0, -200.0));
}

#[test]
fn malformed_strings_fall_back_to_the_origin() {
    let container = rect(10.0, 20.0, 400.0, 400.0);
    for bad in ["banana", "12em", "px", "12"] {
        let p = place(
            &spec(Some(CoordValue::Text(bad.into())), None),
            container,
            &viewport(),
            Size::ZERO,
        );
        assert_eq!(p.x, 10.0, "coordinate {bad:?} should resolve to 0");
    }
}

#[test]
fn non_finite_inputs_are_neutralized() {
    let container = rect(0.0, 0.0, 400.0, 400.0);
    let p = place(
        &PositionSpec {
            left: Some(CoordValue::Fraction(f64::NAN)),
            dx: f64::INFINITY,
            ..PositionSpec::default()
        },
        container,
        &viewport(),
        Size::ZERO,
    );
    assert_eq!(p, Point::new(0.0, 0.0));
}
