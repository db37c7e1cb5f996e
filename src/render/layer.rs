use kurbo::Rect;

use crate::assets::decode::PreparedImage;
use crate::assets::font::FontSource;
use crate::foundation::core::Canvas;
use crate::foundation::error::{TuneframeError, TuneframeResult};

/// A still image stretched into a destination rectangle on the canvas.
#[derive(Clone, Debug)]
pub struct ImageLayer {
    /// Decoded image.
    pub image: PreparedImage,
    /// Destination in canvas pixels.
    pub dest: Rect,
}

impl ImageLayer {
    /// Stretch `image` over the whole canvas.
    pub fn fill(image: PreparedImage, canvas: Canvas) -> Self {
        Self {
            image,
            dest: Rect::new(0.0, 0.0, f64::from(canvas.width), f64::from(canvas.height)),
        }
    }

    /// Stretch `image` into a full-width strip along the bottom edge.
    ///
    /// `height_ratio` is the strip height as a fraction of the canvas height.
    pub fn bottom_strip(
        image: PreparedImage,
        canvas: Canvas,
        height_ratio: f64,
    ) -> TuneframeResult<Self> {
        if !(height_ratio > 0.0 && height_ratio <= 1.0) {
            return Err(TuneframeError::validation(
                "overlay height ratio must be in (0, 1]",
            ));
        }
        let w = f64::from(canvas.width);
        let h = f64::from(canvas.height);
        let strip_h = (h * height_ratio).round().max(1.0);
        Ok(Self {
            image,
            dest: Rect::new(0.0, h - strip_h, w, h),
        })
    }
}

/// Text drawn centered on the canvas.
#[derive(Clone, Debug)]
pub struct CaptionLayer {
    /// Caption text; never empty.
    pub text: String,
    /// Font used to shape the text.
    pub font: FontSource,
    /// Font size in pixels.
    pub size_px: f32,
    /// Straight-alpha RGBA8 fill color.
    pub color: [u8; 4],
}

/// One static element of the composited frame.
#[derive(Clone, Debug)]
pub enum VisualLayer {
    /// A background, waveform, or overlay image.
    Image(ImageLayer),
    /// A centered text caption.
    Caption(CaptionLayer),
}

impl VisualLayer {
    /// Short label for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Image(_) => "image",
            Self::Caption(_) => "caption",
        }
    }
}

/// Layers ordered bottom-to-top over a fixed canvas.
#[derive(Clone, Debug)]
pub struct LayerStack {
    canvas: Canvas,
    layers: Vec<VisualLayer>,
}

impl LayerStack {
    /// Create an empty stack for `canvas`.
    pub fn new(canvas: Canvas) -> TuneframeResult<Self> {
        canvas.validate()?;
        Ok(Self {
            canvas,
            layers: Vec::new(),
        })
    }

    /// Push a layer on top of the stack.
    pub fn push(&mut self, layer: VisualLayer) -> TuneframeResult<()> {
        match &layer {
            VisualLayer::Image(l) => {
                if l.image.width == 0 || l.image.height == 0 {
                    return Err(TuneframeError::render("image layer has zero size"));
                }
                if l.dest.width() <= 0.0 || l.dest.height() <= 0.0 {
                    return Err(TuneframeError::render(
                        "image layer destination is empty",
                    ));
                }
            }
            VisualLayer::Caption(c) => {
                if c.text.trim().is_empty() {
                    return Err(TuneframeError::validation("caption text is empty"));
                }
            }
        }
        self.layers.push(layer);
        Ok(())
    }

    /// Output canvas.
    pub fn canvas(&self) -> Canvas {
        self.canvas
    }

    /// Layers, bottom first.
    pub fn layers(&self) -> &[VisualLayer] {
        &self.layers
    }

    /// Number of layers.
    pub fn len(&self) -> usize {
        self.layers.len()
    }

    /// Return `true` when no layer has been pushed.
    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }
}
