use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        TessellaError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(TessellaError::target("x").to_string().contains("target error:"));
    assert!(
        TessellaError::observer("x")
            .to_string()
            .contains("observer error:")
    );
    assert!(
        TessellaError::serde("x")
            .to_string()
            .contains("serialization error:")
    );
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = TessellaError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}
