use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        StoryError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(StoryError::render("x").to_string().contains("render error:"));
    assert!(
        StoryError::provider("x")
            .to_string()
            .contains("provider error:")
    );
    assert!(
        StoryError::persistence("x")
            .to_string()
            .contains("persistence error:")
    );
    assert!(
        StoryError::serde("x")
            .to_string()
            .contains("serialization error:")
    );
}

#[test]
fn decode_error_names_the_failing_asset() {
    let err = StoryError::decode(
        DecodeTarget::Background {
            asset_id: "a1".to_owned(),
            slide_index: 2,
        },
        "truncated png",
    );
    let msg = err.to_string();
    assert!(msg.contains("decode error:"));
    assert!(msg.contains("'a1'"));
    assert!(msg.contains("slide 2"));
    assert!(msg.contains("truncated png"));

    let logo = StoryError::decode(DecodeTarget::Logo, "bad svg");
    assert_eq!(logo.decode_target(), Some(&DecodeTarget::Logo));
    assert!(logo.to_string().contains("brand logo"));
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = StoryError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
    assert!(err.decode_target().is_none());
}
