use std::sync::Arc;

use crate::assets::store::PreparedImage;
use crate::foundation::core::Canvas;
use crate::foundation::error::{StoryError, StoryResult};
use crate::layout::text::ShapedLine;

/// Rasterize one layer into a fresh transparent canvas-sized buffer (premultiplied RGBA8).
pub(crate) fn render_layer(
    canvas: Canvas,
    draw: impl FnOnce(&mut vello_cpu::RenderContext) -> StoryResult<()>,
) -> StoryResult<Vec<u8>> {
    let (w, h) = canvas.dims_u16()?;
    let mut ctx = vello_cpu::RenderContext::new(w, h);
    draw(&mut ctx)?;
    ctx.flush();
    let mut pixmap = vello_cpu::Pixmap::new(w, h);
    ctx.render_to_pixmap(&mut pixmap);
    Ok(pixmap.data_as_u8_slice().to_vec())
}

/// Wrap premultiplied bytes as a `vello_cpu` image paint.
pub(crate) fn image_paint(
    bytes_premul: &[u8],
    width: u32,
    height: u32,
) -> StoryResult<vello_cpu::Image> {
    let w: u16 = width
        .try_into()
        .map_err(|_| StoryError::render("image width exceeds u16"))?;
    let h: u16 = height
        .try_into()
        .map_err(|_| StoryError::render("image height exceeds u16"))?;
    if bytes_premul.len() != (width as usize) * (height as usize) * 4 {
        return Err(StoryError::render("image byte len mismatch"));
    }
    let pixels: Vec<vello_cpu::peniko::color::PremulRgba8> = bytes_premul
        .chunks_exact(4)
        .map(|px| vello_cpu::peniko::color::PremulRgba8 {
            r: px[0],
            g: px[1],
            b: px[2],
            a: px[3],
        })
        .collect();
    let may_have_opacities = pixels.iter().any(|p| p.a != 255);
    let pixmap = vello_cpu::Pixmap::from_parts_with_opacity(pixels, w, h, may_have_opacities);
    Ok(vello_cpu::Image {
        image: vello_cpu::ImageSource::Pixmap(Arc::new(pixmap)),
        sampler: vello_cpu::peniko::ImageSampler::default(),
    })
}

/// Draw `bytes_premul` (`width`×`height`) stretched into `dest` (x0, y0, x1, y1) on `ctx`.
pub(crate) fn draw_image(
    ctx: &mut vello_cpu::RenderContext,
    bytes_premul: &[u8],
    width: u32,
    height: u32,
    dest: (f64, f64, f64, f64),
) -> StoryResult<()> {
    let (x0, y0, x1, y1) = dest;
    let paint = image_paint(bytes_premul, width, height)?;
    let sx = (x1 - x0) / f64::from(width);
    let sy = (y1 - y0) / f64::from(height);
    ctx.set_transform(
        vello_cpu::kurbo::Affine::translate((x0, y0))
            * vello_cpu::kurbo::Affine::scale_non_uniform(sx, sy),
    );
    ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
    ctx.set_paint(paint);
    ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
        0.0,
        0.0,
        f64::from(width),
        f64::from(height),
    ));
    Ok(())
}

/// Stretch a decoded image to exactly fill `canvas`.
///
/// Same-size images are copied as-is so a no-op export reproduces the source pixels.
pub(crate) fn stretch_to_canvas(img: &PreparedImage, canvas: Canvas) -> StoryResult<Vec<u8>> {
    if img.width == canvas.width && img.height == canvas.height {
        return Ok(img.rgba8_premul.as_ref().clone());
    }
    render_layer(canvas, |ctx| {
        draw_image(
            ctx,
            &img.rgba8_premul,
            img.width,
            img.height,
            (0.0, 0.0, canvas.w(), canvas.h()),
        )
    })
}

/// Fill one shaped line: centered on `center_x`, em-box middle on `center_y`, condensed
/// horizontally when wider than `max_width`.
pub(crate) fn fill_line(
    ctx: &mut vello_cpu::RenderContext,
    line: &ShapedLine,
    font: &vello_cpu::peniko::FontData,
    center_x: f64,
    center_y: f64,
    max_width: f64,
) {
    let advance = f64::from(line.advance);
    let sx = if advance > max_width && advance > 0.0 {
        max_width / advance
    } else {
        1.0
    };
    let left = center_x - advance * sx / 2.0;
    let baseline_y = f64::from(line.baseline_for_middle(center_y as f32));
    ctx.set_transform(
        vello_cpu::kurbo::Affine::translate((left, baseline_y - f64::from(line.baseline)))
            * vello_cpu::kurbo::Affine::scale_non_uniform(sx, 1.0),
    );

    for layout_line in line.layout.lines() {
        for item in layout_line.items() {
            let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                continue;
            };
            let brush = run.style().brush;
            ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
                brush.r, brush.g, brush.b, brush.a,
            ));
            let glyphs = run.positioned_glyphs().map(|g| vello_cpu::Glyph {
                id: g.id,
                x: g.x,
                y: g.y,
            });
            ctx.glyph_run(font)
                .font_size(run.run().font_size())
                .fill_glyphs(glyphs);
        }
    }
}
