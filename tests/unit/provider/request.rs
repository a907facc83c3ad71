use super::*;

#[test]
fn slide_count_follows_script_lines() {
    let r = GenerationRequest {
        script: "one\n\n  \ntwo\nthree\n".into(),
        ..GenerationRequest::default()
    };
    assert_eq!(r.slide_count(), 3);
    assert_eq!(r.script_lines(), vec!["one", "two", "three"]);

    let r = GenerationRequest {
        theme: "ocean".into(),
        ..GenerationRequest::default()
    };
    assert_eq!(r.slide_count(), 1);
}

#[test]
fn blank_theme_defaults() {
    let r = GenerationRequest {
        script: "hello".into(),
        theme: "   ".into(),
        ..GenerationRequest::default()
    };
    assert_eq!(r.effective_theme(), "abstract background");
    assert!(r.validate().is_ok());
}

#[test]
fn empty_request_is_invalid() {
    let err = GenerationRequest::default().validate().unwrap_err();
    assert!(matches!(err, StoryError::Validation(_)));
}

#[test]
fn prompt_mentions_slide_content_and_style() {
    let r = GenerationRequest {
        script: "first line\nsecond line".into(),
        theme: "cafe".into(),
        goal: StoryGoal::Sales,
        atmosphere: Atmosphere::Luxury,
        brand_color: Some(Color::INDIGO),
        sub_color: None,
    };
    let p = r.prompt_for(2);
    assert!(p.contains("second line"), "{p}");
    assert!(p.contains("luxurious"), "{p}");
    assert!(p.contains("call-to-action"), "{p}");
    assert!(p.contains("#6366f1"), "{p}");

    // Past the script, the theme stands in for the content.
    assert!(r.prompt_for(5).contains("content for slide 5: \"cafe\""));
}

#[test]
fn enums_use_snake_case() {
    let r: GenerationRequest =
        serde_json::from_str(r#"{"theme": "x", "goal": "education", "atmosphere": "futuristic"}"#)
            .unwrap();
    assert_eq!(r.goal, StoryGoal::Education);
    assert_eq!(r.atmosphere, Atmosphere::Futuristic);
}
