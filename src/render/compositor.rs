use kurbo::Affine;

use crate::assets::text::{TextBrushRgba8, TextLayoutEngine};
use crate::foundation::error::{TuneframeError, TuneframeResult};
use crate::render::frame::FrameRGBA;
use crate::render::layer::{CaptionLayer, ImageLayer, LayerStack, VisualLayer};
use crate::render::raster::{affine_to_cpu, image_paint, render_with_ctx, solid};

/// CPU compositor: flattens a [`LayerStack`] into one premultiplied frame with `vello_cpu`.
///
/// The render context and text layout contexts are reused across calls.
#[derive(Default)]
pub struct CpuCompositor {
    ctx: Option<vello_cpu::RenderContext>,
    text: TextLayoutEngine,
}

impl CpuCompositor {
    /// Create a compositor with fresh contexts.
    pub fn new() -> Self {
        Self::default()
    }

    /// Draw every layer, bottom to top, and read back the frame.
    #[tracing::instrument(
        skip_all,
        fields(layers = ?stack.layers().iter().map(VisualLayer::kind).collect::<Vec<_>>())
    )]
    pub fn render(&mut self, stack: &LayerStack) -> TuneframeResult<FrameRGBA> {
        if stack.is_empty() {
            return Err(TuneframeError::render("layer stack has no layers"));
        }
        let canvas = stack.canvas();
        let text = &mut self.text;
        render_with_ctx(&mut self.ctx, canvas, |ctx| {
            for layer in stack.layers() {
                ctx.set_blend_mode(vello_cpu::peniko::BlendMode::default());
                ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
                match layer {
                    VisualLayer::Image(l) => draw_image(ctx, l)?,
                    VisualLayer::Caption(c) => {
                        draw_caption(ctx, text, c, canvas.width, canvas.height)?
                    }
                }
            }
            Ok(())
        })
    }
}

fn draw_image(ctx: &mut vello_cpu::RenderContext, layer: &ImageLayer) -> TuneframeResult<()> {
    let img = &layer.image;
    let sx = layer.dest.width() / f64::from(img.width);
    let sy = layer.dest.height() / f64::from(img.height);
    let tr = Affine::translate((layer.dest.x0, layer.dest.y0)) * Affine::scale_non_uniform(sx, sy);

    ctx.set_transform(affine_to_cpu(tr));
    ctx.set_paint(image_paint(img)?);
    ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
        0.0,
        0.0,
        f64::from(img.width),
        f64::from(img.height),
    ));
    Ok(())
}

fn draw_caption(
    ctx: &mut vello_cpu::RenderContext,
    engine: &mut TextLayoutEngine,
    layer: &CaptionLayer,
    canvas_w: u32,
    canvas_h: u32,
) -> TuneframeResult<()> {
    let layout = engine.layout_plain(
        &layer.text,
        &layer.font,
        layer.size_px,
        TextBrushRgba8::from(layer.color),
    )?;

    let w = f64::from(layout.width());
    let h = f64::from(layout.height());
    if !(w > 0.0 && h > 0.0) {
        return Err(TuneframeError::render(format!(
            "caption '{}' produced an empty text layout",
            layer.text
        )));
    }
    let x = ((f64::from(canvas_w) - w) / 2.0).round();
    let y = ((f64::from(canvas_h) - h) / 2.0).round();

    let font = vello_cpu::peniko::FontData::new(
        vello_cpu::peniko::Blob::from(layer.font.bytes.to_vec()),
        layer.font.index,
    );

    ctx.set_transform(affine_to_cpu(Affine::translate((x, y))));
    for line in layout.lines() {
        for item in line.items() {
            let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                continue;
            };
            let brush = run.style().brush;
            ctx.set_paint(solid([brush.r, brush.g, brush.b, brush.a]));
            let glyphs = run.positioned_glyphs().map(|g| vello_cpu::Glyph {
                id: g.id,
                x: g.x,
                y: g.y,
            });
            ctx.glyph_run(&font)
                .font_size(run.run().font_size())
                .fill_glyphs(glyphs);
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/render/compositor.rs"]
mod tests;
