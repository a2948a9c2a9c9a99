use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        DreamError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(DreamError::render("x").to_string().contains("render error:"));
    assert!(DreamError::asset("x").to_string().contains("asset error:"));
    assert!(
        DreamError::archive("x")
            .to_string()
            .contains("archive error:")
    );
    assert!(
        DreamError::serde("x")
            .to_string()
            .contains("serialization error:")
    );
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = DreamError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}

#[test]
fn json_errors_map_to_serde_variant() {
    let err: DreamError = serde_json::from_str::<u32>("nope").unwrap_err().into();
    assert!(matches!(err, DreamError::Serde(_)));
}
