use std::sync::Arc;

use super::*;
use crate::assets::decode::PreparedImage;
use crate::foundation::core::Canvas;

fn solid_image(w: u32, h: u32, rgba: [u8; 4]) -> PreparedImage {
    PreparedImage {
        width: w,
        height: h,
        rgba8_premul: Arc::new(rgba.repeat((w * h) as usize)),
    }
}

fn px(frame: &FrameRGBA, x: u32, y: u32) -> [u8; 4] {
    let i = ((y * frame.width + x) * 4) as usize;
    [
        frame.data[i],
        frame.data[i + 1],
        frame.data[i + 2],
        frame.data[i + 3],
    ]
}

#[test]
fn empty_stack_is_a_render_error() {
    let stack = LayerStack::new(Canvas {
        width: 4,
        height: 4,
    })
    .unwrap();
    let err = CpuCompositor::new().render(&stack).unwrap_err();
    assert!(matches!(err, TuneframeError::Render(_)));
}

#[test]
fn background_is_stretched_over_whole_canvas() {
    let canvas = Canvas {
        width: 8,
        height: 8,
    };
    let mut stack = LayerStack::new(canvas).unwrap();
    stack
        .push(VisualLayer::Image(ImageLayer::fill(
            solid_image(2, 2, [255, 0, 0, 255]),
            canvas,
        )))
        .unwrap();

    let frame = CpuCompositor::new().render(&stack).unwrap();
    assert_eq!((frame.width, frame.height), (8, 8));
    assert!(frame.premultiplied);
    for (x, y) in [(0, 0), (7, 0), (0, 7), (7, 7), (4, 4)] {
        assert_eq!(px(&frame, x, y), [255, 0, 0, 255], "pixel ({x},{y})");
    }
}

#[test]
fn later_layers_draw_on_top() {
    let canvas = Canvas {
        width: 8,
        height: 8,
    };
    let mut stack = LayerStack::new(canvas).unwrap();
    stack
        .push(VisualLayer::Image(ImageLayer::fill(
            solid_image(1, 1, [255, 0, 0, 255]),
            canvas,
        )))
        .unwrap();
    stack
        .push(VisualLayer::Image(
            ImageLayer::bottom_strip(solid_image(1, 1, [0, 0, 255, 255]), canvas, 0.5).unwrap(),
        ))
        .unwrap();

    let frame = CpuCompositor::new().render(&stack).unwrap();
    assert_eq!(px(&frame, 3, 1), [255, 0, 0, 255]);
    assert_eq!(px(&frame, 3, 6), [0, 0, 255, 255]);
}

#[test]
fn rendering_is_repeatable() {
    let canvas = Canvas {
        width: 6,
        height: 4,
    };
    let mut stack = LayerStack::new(canvas).unwrap();
    stack
        .push(VisualLayer::Image(ImageLayer::fill(
            solid_image(3, 2, [10, 200, 30, 255]),
            canvas,
        )))
        .unwrap();
    let mut comp = CpuCompositor::new();
    let a = comp.render(&stack).unwrap();
    let b = comp.render(&stack).unwrap();
    assert_eq!(a, b);
}

#[test]
fn caption_is_drawn_near_center() {
    let Ok(font) = crate::assets::font::resolve_system_font("Arial", true) else {
        // No fonts on this machine; caption rendering is covered where fonts exist.
        return;
    };
    let canvas = Canvas {
        width: 320,
        height: 160,
    };
    let mut stack = LayerStack::new(canvas).unwrap();
    stack
        .push(VisualLayer::Image(ImageLayer::fill(
            solid_image(1, 1, [0, 0, 0, 255]),
            canvas,
        )))
        .unwrap();
    stack
        .push(VisualLayer::Caption(CaptionLayer {
            text: "Test".to_string(),
            font,
            size_px: 50.0,
            color: [255, 255, 255, 255],
        }))
        .unwrap();

    let frame = CpuCompositor::new().render(&stack).unwrap();
    let mut lit = Vec::new();
    for y in 0..frame.height {
        for x in 0..frame.width {
            if px(&frame, x, y)[0] > 128 {
                lit.push((x, y));
            }
        }
    }
    assert!(!lit.is_empty(), "caption drew no pixels");
    let (sx, sy) = lit
        .iter()
        .fold((0u64, 0u64), |(ax, ay), (x, y)| (ax + *x as u64, ay + *y as u64));
    let cx = sx as f64 / lit.len() as f64;
    let cy = sy as f64 / lit.len() as f64;
    assert!((cx - 160.0).abs() < 40.0, "caption centroid x = {cx}");
    assert!((cy - 80.0).abs() < 40.0, "caption centroid y = {cy}");
    // Corners stay background.
    assert_eq!(px(&frame, 0, 0), [0, 0, 0, 255]);
}

#[test]
fn empty_caption_is_rejected_by_the_stack() {
    let mut stack = LayerStack::new(Canvas {
        width: 4,
        height: 4,
    })
    .unwrap();
    let err = stack
        .push(VisualLayer::Caption(CaptionLayer {
            text: "   ".to_string(),
            font: crate::assets::font::FontSource {
                bytes: Arc::new(Vec::new()),
                index: 0,
                family: None,
            },
            size_px: 50.0,
            color: [255; 4],
        }))
        .unwrap_err();
    assert!(matches!(err, TuneframeError::Validation(_)));
}

#[test]
fn layer_kinds_follow_stack_order() {
    let canvas = Canvas {
        width: 4,
        height: 4,
    };
    let mut stack = LayerStack::new(canvas).unwrap();
    stack
        .push(VisualLayer::Image(ImageLayer::fill(
            solid_image(2, 2, [0, 0, 0, 255]),
            canvas,
        )))
        .unwrap();
    stack
        .push(VisualLayer::Caption(CaptionLayer {
            text: "hi".to_owned(),
            font: crate::assets::font::FontSource {
                bytes: Arc::new(Vec::new()),
                index: 0,
                family: None,
            },
            size_px: 10.0,
            color: [255; 4],
        }))
        .unwrap();
    let kinds: Vec<_> = stack.layers().iter().map(VisualLayer::kind).collect();
    assert_eq!(kinds, ["image", "caption"]);
}
