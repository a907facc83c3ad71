use super::*;

fn logo_patch(p: LogoOverlayPatch) -> OverlaySettingsPatch {
    OverlaySettingsPatch {
        logo_overlay: Some(p),
        ..OverlaySettingsPatch::default()
    }
}

#[test]
fn updating_scale_keeps_position_and_visibility() {
    let mut s = OverlaySettings::default();
    s.apply(&logo_patch(LogoOverlayPatch {
        visible: Some(true),
        x: Some(20.0),
        y: Some(30.0),
        ..LogoOverlayPatch::default()
    }))
    .unwrap();
    s.apply(&logo_patch(LogoOverlayPatch {
        scale: Some(1.7),
        ..LogoOverlayPatch::default()
    }))
    .unwrap();

    let l = s.logo_overlay.unwrap();
    assert!(l.visible);
    assert_eq!((l.x, l.y, l.scale), (20.0, 30.0, 1.7));
}

#[test]
fn first_logo_patch_starts_from_defaults() {
    let mut s = OverlaySettings::default();
    s.apply(&logo_patch(LogoOverlayPatch {
        visible: Some(true),
        ..LogoOverlayPatch::default()
    }))
    .unwrap();
    let l = s.logo_overlay.unwrap();
    assert_eq!((l.visible, l.x, l.y, l.scale), (true, 50.0, 85.0, 1.0));

    s.remove_logo();
    assert!(s.logo_overlay.is_none());
}

#[test]
fn out_of_range_values_are_clamped_and_rounded() {
    let mut s = OverlaySettings::default();
    s.apply(&OverlaySettingsPatch {
        blur_radius: Some(35.0),
        brightness: Some(12.6),
        text_overlay: Some(TextOverlayPatch {
            font_size_base: Some(30.6),
            ..TextOverlayPatch::default()
        }),
        logo_overlay: Some(LogoOverlayPatch {
            x: Some(140.0),
            y: Some(-3.0),
            scale: Some(0.01),
            ..LogoOverlayPatch::default()
        }),
        ..OverlaySettingsPatch::default()
    })
    .unwrap();
    assert_eq!(s.blur_radius, 20);
    assert_eq!(s.brightness, 50);
    assert_eq!(s.text_overlay.font_size_base, 31);
    let l = s.logo_overlay.unwrap();
    assert_eq!((l.x, l.y, l.scale), (100.0, 0.0, 0.1));
}

#[test]
fn non_finite_values_reject_the_whole_patch() {
    let mut s = OverlaySettings::default();
    let before = s.clone();
    let err = s
        .apply(&OverlaySettingsPatch {
            blur_radius: Some(5.0),
            logo_overlay: Some(LogoOverlayPatch {
                scale: Some(f64::NAN),
                ..LogoOverlayPatch::default()
            }),
            ..OverlaySettingsPatch::default()
        })
        .unwrap_err();
    assert!(matches!(err, StoryError::Validation(_)));
    assert_eq!(s, before);

    assert!(
        s.apply(&OverlaySettingsPatch {
            brightness: Some(f64::INFINITY),
            ..OverlaySettingsPatch::default()
        })
        .is_err()
    );
}

#[test]
fn text_patch_only_touches_supplied_fields() {
    let mut s = OverlaySettings::default();
    s.apply(&OverlaySettingsPatch {
        text_overlay: Some(TextOverlayPatch {
            content: Some("Hello\nWorld".into()),
            layout: Some(LayoutPreset::TopHeavy),
            ..TextOverlayPatch::default()
        }),
        ..OverlaySettingsPatch::default()
    })
    .unwrap();
    assert_eq!(s.text_overlay.content, "Hello\nWorld");
    assert_eq!(s.text_overlay.layout, LayoutPreset::TopHeavy);
    assert_eq!(s.text_overlay.font_size_base, 24);
    assert!(s.text_overlay.visible);
    assert_eq!(s.blur_radius, 0);
}

#[test]
fn asset_update_error_names_the_slide() {
    let mut a = GeneratedAsset::new("asset-1", crate::assets::store::ImageRef::new("x.png"), "", 2);
    let err = a
        .update_settings(&OverlaySettingsPatch {
            blur_radius: Some(f64::NAN),
            ..OverlaySettingsPatch::default()
        })
        .unwrap_err();
    let msg = err.to_string();
    assert!(msg.contains("asset-1"), "{msg}");
    assert!(msg.contains("slide 2"), "{msg}");
}

#[test]
fn patch_deserializes_from_partial_json() {
    let p: OverlaySettingsPatch =
        serde_json::from_str(r#"{"logo_overlay": {"scale": 1.5}}"#).unwrap();
    assert_eq!(p.logo_overlay.unwrap().scale, Some(1.5));
    assert!(p.blur_radius.is_none());
}
