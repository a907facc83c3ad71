use super::*;
use crate::scene::model::LogoOverlay;

fn asset() -> GeneratedAsset {
    GeneratedAsset::new("p-1", ImageRef::new("bg.png"), "prompt", 1)
}

fn brand_with_logo() -> BrandConfig {
    BrandConfig {
        logo_image: Some(ImageRef::new("logo.png")),
        ..BrandConfig::default()
    }
}

#[test]
fn bare_asset_has_only_background() {
    let s = build_preview(&asset(), &BrandConfig::default(), PreviewOptions::default());
    assert_eq!(s.layers.len(), 1);
    let PreviewLayer::Background { css_filter, .. } = &s.layers[0] else {
        panic!("expected background");
    };
    assert_eq!(css_filter, "blur(0px) brightness(100%)");
}

#[test]
fn filter_stays_on_background_for_every_setting() {
    let brand = brand_with_logo();
    for blur in 0..=20u8 {
        for brightness in (50..=150u16).step_by(5) {
            let mut a = asset();
            a.settings.blur_radius = blur;
            a.settings.brightness = brightness;
            a.settings.brand_overlay_enabled = true;
            a.settings.text_overlay.content = "Hi".into();
            a.settings.logo_overlay = Some(LogoOverlay {
                visible: true,
                ..LogoOverlay::default()
            });
            let s = build_preview(&a, &brand, PreviewOptions::default());
            assert_eq!(s.layers.len(), 4);
            let filtered: Vec<_> = s.layers.iter().filter(|l| l.filter().is_some()).collect();
            assert_eq!(filtered.len(), 1);
            assert!(matches!(filtered[0], PreviewLayer::Background { .. }));
            assert_eq!(
                s.layers[0].filter(),
                Some(&FilterSpec {
                    blur_px: blur,
                    brightness_percent: brightness
                })
            );
        }
    }
}

#[test]
fn text_band_follows_layout() {
    let mut a = asset();
    a.settings.text_overlay.content = "One\nTwo".into();
    a.settings.text_overlay.layout = crate::layout::presets::LayoutPreset::FrameStyle;
    let s = build_preview(&a, &BrandConfig::default(), PreviewOptions::default());
    let PreviewLayer::Text {
        band,
        align,
        lines,
        font_size_px,
        padding_px,
        shadows,
        css_text_shadow,
        ..
    } = &s.layers[1]
    else {
        panic!("expected text");
    };
    assert_eq!(lines, &vec!["One".to_owned(), "Two".to_owned()]);
    assert_eq!(*align, VerticalAlign::Center);
    assert_eq!(*font_size_px, 24);
    assert_eq!(*padding_px, 16.0);
    assert!((band.top - 20.0).abs() < 1e-9);
    assert!((band.bottom - 20.0).abs() < 1e-9);
    assert!((band.left - 15.0).abs() < 1e-9);
    assert_eq!(
        shadows,
        &vec![ShadowSpec::TEXT_PREVIEW, ShadowSpec::TEXT_PREVIEW_EDGE]
    );
    assert_eq!(
        css_text_shadow,
        "0px 2px 8px rgba(0, 0, 0, 0.8), 0px 0px 2px rgba(0, 0, 0, 0.9)"
    );
}

#[test]
fn empty_text_matches_hidden_text() {
    let mut shown = asset();
    shown.settings.text_overlay.visible = true;
    let mut hidden = asset();
    hidden.settings.text_overlay.visible = false;
    hidden.settings.text_overlay.content = "x".into();
    let a = build_preview(&shown, &BrandConfig::default(), PreviewOptions::default());
    let b = build_preview(&hidden, &BrandConfig::default(), PreviewOptions::default());
    assert_eq!(a.layers, b.layers);
}

#[test]
fn logo_uses_preview_sizing_and_needs_a_brand_logo() {
    let mut a = asset();
    a.settings.logo_overlay = Some(LogoOverlay {
        visible: true,
        scale: 0.2,
        ..LogoOverlay::default()
    });
    let without = build_preview(&a, &BrandConfig::default(), PreviewOptions::default());
    assert_eq!(without.layers.len(), 1);

    let opts = PreviewOptions {
        logo_interactive: true,
        show_guide: true,
    };
    let with = build_preview(&a, &brand_with_logo(), opts);
    let PreviewLayer::Logo {
        width_percent,
        center_y,
        draggable,
        ..
    } = &with.layers[1]
    else {
        panic!("expected logo");
    };
    assert_eq!(*width_percent, 8.0);
    assert_eq!(*center_y, 85.0);
    assert!(*draggable);
    assert!(matches!(
        with.layers.last(),
        Some(PreviewLayer::SafeAreaGuide { .. })
    ));
}

#[test]
fn building_does_not_mutate_settings() {
    let mut a = asset();
    a.settings.blur_radius = 200;
    let before = a.clone();
    let s = build_preview(&a, &BrandConfig::default(), PreviewOptions::default());
    assert_eq!(a, before);
    assert_eq!(s.layers[0].filter().map(|f| f.blur_px), Some(20));
}
