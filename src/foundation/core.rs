use crate::foundation::error::{TuneframeError, TuneframeResult};
use crate::foundation::math::mul_div255_u8;

/// Absolute 0-based frame index in output timeline space.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct FrameIndex(pub u64);

/// Frames-per-second represented as a rational `num/den`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Fps {
    /// Numerator (frames).
    pub num: u32,
    /// Denominator (seconds), must be non-zero.
    pub den: u32,
}

impl Fps {
    /// Create a validated FPS value.
    pub fn new(num: u32, den: u32) -> TuneframeResult<Self> {
        if den == 0 {
            return Err(TuneframeError::validation("Fps den must be > 0"));
        }
        if num == 0 {
            return Err(TuneframeError::validation("Fps num must be > 0"));
        }
        Ok(Self { num, den })
    }

    /// Convert to floating-point FPS.
    pub fn as_f64(self) -> f64 {
        f64::from(self.num) / f64::from(self.den)
    }

    /// Duration of one frame in seconds.
    pub fn frame_duration_secs(self) -> f64 {
        f64::from(self.den) / f64::from(self.num)
    }

    /// Convert frame count to seconds.
    pub fn frames_to_secs(self, frames: u64) -> f64 {
        (frames as f64) * self.frame_duration_secs()
    }

    /// Number of frames needed to cover `secs` (ceil semantics).
    ///
    /// A tiny epsilon absorbs float noise so that an exact multiple of the frame duration does
    /// not round up to an extra frame.
    pub fn secs_to_frames_ceil(self, secs: f64) -> u64 {
        if !secs.is_finite() || secs <= 0.0 {
            return 0;
        }
        (secs * self.as_f64() - 1e-9).ceil().max(0.0) as u64
    }
}

/// Output canvas dimensions in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Canvas {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Canvas {
    /// Largest even-sized canvas that fits inside `width`x`height`.
    ///
    /// yuv420p output needs even dimensions; odd image sizes lose their last row/column.
    pub fn even_floor(width: u32, height: u32) -> TuneframeResult<Self> {
        let w = width & !1;
        let h = height & !1;
        if w == 0 || h == 0 {
            return Err(TuneframeError::validation(format!(
                "image {width}x{height} is too small for video output (min 2x2)"
            )));
        }
        Ok(Self {
            width: w,
            height: h,
        })
    }

    /// Reject zero or odd dimensions.
    pub fn validate(self) -> TuneframeResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(TuneframeError::validation(
                "canvas width/height must be non-zero",
            ));
        }
        if !self.width.is_multiple_of(2) || !self.height.is_multiple_of(2) {
            return Err(TuneframeError::validation(
                "canvas width/height must be even (required for yuv420p mp4 output)",
            ));
        }
        Ok(())
    }

    /// Number of bytes in a tightly packed RGBA8 buffer of this size.
    pub fn rgba8_len(self) -> usize {
        (self.width as usize) * (self.height as usize) * 4
    }
}

/// Convert a straight-alpha RGBA8 color into premultiplied RGBA8.
pub fn premul_rgba8(rgba: [u8; 4]) -> [u8; 4] {
    let [r, g, b, a] = rgba;
    let a16 = u16::from(a);
    let premul = |c: u8| mul_div255_u8(u16::from(c), a16);
    [premul(r), premul(g), premul(b), a]
}
