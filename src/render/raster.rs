use std::sync::Arc;

use crate::assets::decode::PreparedImage;
use crate::foundation::core::Canvas;
use crate::foundation::error::{TuneframeError, TuneframeResult};
use crate::render::frame::FrameRGBA;

/// Run `draw` against a fresh `vello_cpu` context sized to `canvas` and read back the pixels.
pub(crate) fn render_with_ctx(
    ctx_slot: &mut Option<vello_cpu::RenderContext>,
    canvas: Canvas,
    draw: impl FnOnce(&mut vello_cpu::RenderContext) -> TuneframeResult<()>,
) -> TuneframeResult<FrameRGBA> {
    let (w, h) = canvas_u16(canvas)?;
    let mut ctx = match ctx_slot.take() {
        Some(ctx) if ctx.width() == w && ctx.height() == h => ctx,
        _ => vello_cpu::RenderContext::new(w, h),
    };
    ctx.reset();
    draw(&mut ctx)?;
    ctx.flush();

    let mut pixmap = vello_cpu::Pixmap::new(w, h);
    ctx.render_to_pixmap(&mut pixmap);
    *ctx_slot = Some(ctx);

    Ok(FrameRGBA {
        width: canvas.width,
        height: canvas.height,
        data: pixmap.data_as_u8_slice().to_vec(),
        premultiplied: true,
    })
}

fn canvas_u16(canvas: Canvas) -> TuneframeResult<(u16, u16)> {
    let w: u16 = canvas
        .width
        .try_into()
        .map_err(|_| TuneframeError::render("canvas width exceeds 65535"))?;
    let h: u16 = canvas
        .height
        .try_into()
        .map_err(|_| TuneframeError::render("canvas height exceeds 65535"))?;
    if w == 0 || h == 0 {
        return Err(TuneframeError::render("canvas must be non-empty"));
    }
    Ok((w, h))
}

pub(crate) fn image_paint(img: &PreparedImage) -> TuneframeResult<vello_cpu::Image> {
    let pixmap = pixmap_from_premul_bytes(&img.rgba8_premul, img.width, img.height)?;
    Ok(vello_cpu::Image {
        image: vello_cpu::ImageSource::Pixmap(Arc::new(pixmap)),
        sampler: vello_cpu::peniko::ImageSampler::default(),
    })
}

fn pixmap_from_premul_bytes(
    bytes: &[u8],
    width: u32,
    height: u32,
) -> TuneframeResult<vello_cpu::Pixmap> {
    let w: u16 = width
        .try_into()
        .map_err(|_| TuneframeError::render("image width exceeds 65535"))?;
    let h: u16 = height
        .try_into()
        .map_err(|_| TuneframeError::render("image height exceeds 65535"))?;
    if bytes.len()
        != (width as usize)
            .saturating_mul(height as usize)
            .saturating_mul(4)
    {
        return Err(TuneframeError::render("image byte length mismatch"));
    }
    // Pixmap stores PremulRgba8; our bytes are already premultiplied.
    let pixels = bytes
        .chunks_exact(4)
        .map(|px| vello_cpu::peniko::color::PremulRgba8::from_u8_array([px[0], px[1], px[2], px[3]]))
        .collect::<Vec<_>>();
    Ok(vello_cpu::Pixmap::from_parts_with_opacity(pixels, w, h, true))
}

pub(crate) fn affine_to_cpu(a: kurbo::Affine) -> vello_cpu::kurbo::Affine {
    vello_cpu::kurbo::Affine::new(a.as_coeffs())
}

pub(crate) fn bezpath_to_cpu(path: &kurbo::BezPath) -> vello_cpu::kurbo::BezPath {
    use kurbo::PathEl;

    let mut out = vello_cpu::kurbo::BezPath::new();
    for &el in path.elements() {
        match el {
            PathEl::MoveTo(p) => out.move_to(vello_cpu::kurbo::Point::new(p.x, p.y)),
            PathEl::LineTo(p) => out.line_to(vello_cpu::kurbo::Point::new(p.x, p.y)),
            PathEl::QuadTo(p1, p2) => out.quad_to(
                vello_cpu::kurbo::Point::new(p1.x, p1.y),
                vello_cpu::kurbo::Point::new(p2.x, p2.y),
            ),
            PathEl::CurveTo(p1, p2, p3) => out.curve_to(
                vello_cpu::kurbo::Point::new(p1.x, p1.y),
                vello_cpu::kurbo::Point::new(p2.x, p2.y),
                vello_cpu::kurbo::Point::new(p3.x, p3.y),
            ),
            PathEl::ClosePath => out.close_path(),
        }
    }
    out
}

pub(crate) fn solid(rgba: [u8; 4]) -> vello_cpu::peniko::Color {
    vello_cpu::peniko::Color::from_rgba8(rgba[0], rgba[1], rgba[2], rgba[3])
}
