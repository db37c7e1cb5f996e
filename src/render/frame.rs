use std::path::Path;

use anyhow::Context as _;

use crate::foundation::error::{TuneframeError, TuneframeResult};

/// A rendered frame as RGBA8 pixels.
///
/// Frames produced by this crate are premultiplied alpha; the flag makes that explicit at API
/// boundaries.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameRGBA {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// RGBA8 bytes, tightly packed, row-major.
    pub data: Vec<u8>,
    /// Whether `data` is premultiplied alpha.
    pub premultiplied: bool,
}

impl FrameRGBA {
    /// Straight-alpha copy of the pixel data.
    pub fn to_straight_rgba8(&self) -> Vec<u8> {
        if !self.premultiplied {
            return self.data.clone();
        }
        let mut out = self.data.clone();
        for px in out.chunks_exact_mut(4) {
            let a = u16::from(px[3]);
            if a == 0 || a == 255 {
                continue;
            }
            for c in &mut px[..3] {
                *c = ((u16::from(*c) * 255 + a / 2) / a).min(255) as u8;
            }
        }
        out
    }

    /// Write the frame as a PNG (straight alpha).
    pub fn save_png(&self, path: &Path) -> TuneframeResult<()> {
        crate::media::ensure_parent_dir(path)?;
        let straight = self.to_straight_rgba8();
        image::save_buffer_with_format(
            path,
            &straight,
            self.width,
            self.height,
            image::ColorType::Rgba8,
            image::ImageFormat::Png,
        )
        .with_context(|| format!("write png '{}'", path.display()))?;
        Ok(())
    }

    /// Decode the frame back into an image usable as a layer.
    pub(crate) fn to_prepared_image(&self) -> TuneframeResult<crate::assets::decode::PreparedImage> {
        let rgba = image::RgbaImage::from_raw(self.width, self.height, self.to_straight_rgba8())
            .ok_or_else(|| TuneframeError::render("frame buffer does not match its dimensions"))?;
        Ok(crate::assets::decode::prepare_rgba(rgba))
    }
}
