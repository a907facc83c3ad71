use std::sync::Arc;

use super::*;

const SYSTEM_FONT: &str = "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf";

fn system_face() -> Option<FontFace> {
    let bytes = std::fs::read(SYSTEM_FONT).ok()?;
    Some(FontFace {
        family: "DejaVu Sans".into(),
        weight: 400,
        bytes: Arc::new(bytes),
    })
}

fn white() -> TextBrushRgba8 {
    TextBrushRgba8 {
        r: 255,
        g: 255,
        b: 255,
        a: 255,
    }
}

fn line(advance: f32, ascent: f32, descent: f32) -> ShapedLine {
    ShapedLine {
        layout: parley::Layout::new(),
        advance,
        ascent,
        descent,
        baseline: ascent,
    }
}

#[test]
fn baseline_centers_the_em_box() {
    let l = line(100.0, 30.0, 10.0);
    assert_eq!(l.baseline_for_middle(500.0), 510.0);
    // Top of the em box sits as far above the center as its bottom sits below.
    let baseline = l.baseline_for_middle(200.0);
    assert_eq!(200.0 - (baseline - l.ascent), (baseline + l.descent) - 200.0);
}

#[test]
fn zero_advance_counts_as_empty() {
    assert!(line(0.0, 10.0, 2.0).is_empty());
    assert!(!line(0.5, 10.0, 2.0).is_empty());
}

#[test]
fn rejects_bad_sizes_before_touching_the_font() {
    let face = FontFace {
        family: "none".into(),
        weight: 400,
        bytes: Arc::new(Vec::new()),
    };
    let mut engine = TextLayoutEngine::new();
    for size in [0.0, -4.0, f32::NAN, f32::INFINITY] {
        let err = engine.shape_line("x", &face, size, white()).err().unwrap();
        assert!(matches!(err, StoryError::Validation(_)), "{size}: {err}");
    }
}

#[test]
fn unparseable_font_is_a_render_error() {
    let face = FontFace {
        family: "junk".into(),
        weight: 400,
        bytes: Arc::new(vec![1, 2, 3, 4]),
    };
    let err = TextLayoutEngine::new()
        .shape_line("x", &face, 12.0, white())
        .err()
        .unwrap();
    assert!(matches!(err, StoryError::Render(_)), "{err}");
}

#[test]
fn shapes_a_line_and_reuses_the_family() {
    let Some(face) = system_face() else {
        return;
    };
    let mut engine = TextLayoutEngine::new();
    let wide = engine.shape_line("Hello world", &face, 40.0, white()).unwrap();
    let narrow = engine.shape_line("Hi", &face, 40.0, white()).unwrap();
    assert!(wide.advance > narrow.advance);
    assert!(narrow.advance > 0.0);
    assert!(wide.ascent > 0.0 && wide.descent > 0.0);
    assert_eq!(engine.families.len(), 1);
}

#[test]
fn empty_text_has_usable_metrics() {
    let Some(face) = system_face() else {
        return;
    };
    let empty = TextLayoutEngine::new()
        .shape_line("", &face, 20.0, white())
        .unwrap();
    assert!(empty.is_empty());
    assert!(empty.ascent > 0.0);
    assert!(empty.baseline_for_middle(100.0).is_finite());
}
