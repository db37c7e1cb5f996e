//! Static waveform plots.
//!
//! A waveform is an amplitude-over-time area plot of the first audio channel: one column per
//! output pixel, filled between the zero line and the column's sample extremes, with no axes or
//! borders. The vertical range autoscales to the data (always including zero) with a 5% margin.

use std::path::Path;

use kurbo::{BezPath, Rect};
use rayon::prelude::*;

use crate::audio::track::AudioTrack;
use crate::foundation::core::Canvas;
use crate::foundation::error::{TuneframeError, TuneframeResult};
use crate::render::frame::FrameRGBA;
use crate::render::raster::{bezpath_to_cpu, render_with_ctx, solid};

const MAX_DIM: u32 = 16_384;
const Y_MARGIN: f32 = 0.05;

/// Waveform image options.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WaveformOpts {
    /// Image width in pixels (one sample column per pixel).
    pub width: u32,
    /// Image height in pixels.
    pub height: u32,
    /// Straight-alpha RGBA8 color of the filled area.
    pub fill_rgba: [u8; 4],
    /// Straight-alpha RGBA8 background color.
    pub background_rgba: [u8; 4],
}

impl Default for WaveformOpts {
    fn default() -> Self {
        Self {
            width: 1000,
            height: 200,
            fill_rgba: [0, 255, 255, 128],
            background_rgba: [255, 255, 255, 255],
        }
    }
}

impl WaveformOpts {
    /// Reject empty or oversized images.
    pub fn validate(&self) -> TuneframeResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(TuneframeError::validation(
                "waveform width/height must be non-zero",
            ));
        }
        if self.width > MAX_DIM || self.height > MAX_DIM {
            return Err(TuneframeError::validation(format!(
                "waveform size {}x{} exceeds {MAX_DIM}x{MAX_DIM}",
                self.width, self.height
            )));
        }
        Ok(())
    }
}

/// Sample extremes of one output column.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ColumnExtent {
    /// Smallest sample in the column.
    pub min: f32,
    /// Largest sample in the column.
    pub max: f32,
}

/// Reduce `samples` into `columns` min/max buckets.
///
/// Buckets partition the samples evenly; when there are fewer samples than columns, neighbouring
/// columns share a sample. Non-finite samples are ignored.
pub fn column_extents(samples: &[f32], columns: usize) -> Vec<ColumnExtent> {
    let n = samples.len();
    if n == 0 || columns == 0 {
        return vec![ColumnExtent::default(); columns];
    }

    (0..columns)
        .into_par_iter()
        .map(|c| {
            let start = (c * n / columns).min(n - 1);
            let end = ((c + 1) * n / columns).clamp(start + 1, n);
            samples[start..end]
                .iter()
                .filter(|v| v.is_finite())
                .fold(None, |acc: Option<ColumnExtent>, &v| {
                    Some(match acc {
                        None => ColumnExtent { min: v, max: v },
                        Some(e) => ColumnExtent {
                            min: e.min.min(v),
                            max: e.max.max(v),
                        },
                    })
                })
                .unwrap_or_default()
        })
        .collect()
}

/// Build the filled-area outline for `extents` in a `width`x`height` pixel box.
///
/// Returns `None` for silent input (every extent is zero).
pub fn waveform_path(extents: &[ColumnExtent], width: f64, height: f64) -> Option<BezPath> {
    if extents.is_empty() {
        return None;
    }
    let lo = extents.iter().fold(0.0f32, |m, e| m.min(e.min));
    let hi = extents.iter().fold(0.0f32, |m, e| m.max(e.max));
    let span = hi - lo;
    if span <= f32::EPSILON {
        return None;
    }
    let lo = f64::from(lo - span * Y_MARGIN);
    let hi = f64::from(hi + span * Y_MARGIN);
    let y_of = |v: f32| (hi - f64::from(v)) / (hi - lo) * height;
    let col_w = width / extents.len() as f64;

    let mut path = BezPath::new();
    path.move_to((0.0, y_of(0.0)));
    for (c, e) in extents.iter().enumerate() {
        let top = y_of(e.max.max(0.0));
        path.line_to((c as f64 * col_w, top));
        path.line_to(((c + 1) as f64 * col_w, top));
    }
    for (c, e) in extents.iter().enumerate().rev() {
        let bottom = y_of(e.min.min(0.0));
        path.line_to(((c + 1) as f64 * col_w, bottom));
        path.line_to((c as f64 * col_w, bottom));
    }
    path.close_path();
    Some(path)
}

/// Render the waveform of `track`'s first channel into an in-memory frame.
#[tracing::instrument(skip(track), fields(duration_secs = track.duration_secs()))]
pub fn render_waveform(track: &AudioTrack, opts: &WaveformOpts) -> TuneframeResult<FrameRGBA> {
    opts.validate()?;
    let samples: Vec<f32> = track.first_channel().collect();
    let extents = column_extents(&samples, opts.width as usize);

    let w = f64::from(opts.width);
    let h = f64::from(opts.height);
    let canvas = Canvas {
        width: opts.width,
        height: opts.height,
    };

    let mut ctx = None;
    render_with_ctx(&mut ctx, canvas, |ctx| {
        ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
        ctx.set_paint(solid(opts.background_rgba));
        ctx.fill_rect(&vello_cpu::kurbo::Rect::new(0.0, 0.0, w, h));

        ctx.set_paint(solid(opts.fill_rgba));
        match waveform_path(&extents, w, h) {
            Some(path) => ctx.fill_path(&bezpath_to_cpu(&path)),
            None => {
                let mid = (h / 2.0).floor();
                let line = Rect::new(0.0, mid, w, (mid + 1.0).min(h));
                ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
                    line.x0, line.y0, line.x1, line.y1,
                ));
            }
        }
        Ok(())
    })
}

/// Render the waveform and write it as a PNG, overwriting any existing file.
pub fn write_waveform_png(
    track: &AudioTrack,
    opts: &WaveformOpts,
    out_path: &Path,
) -> TuneframeResult<FrameRGBA> {
    let frame = render_waveform(track, opts)?;
    frame.save_png(out_path)?;
    tracing::debug!(path = %out_path.display(), "wrote waveform png");
    Ok(frame)
}

#[cfg(test)]
#[path = "../../tests/unit/waveform/mod.rs"]
mod tests;
