use std::path::Path;
use std::sync::Arc;

use crate::foundation::error::{TuneframeError, TuneframeResult};
use crate::foundation::math::mul_div255_u8;

/// Raster image in premultiplied RGBA8 form.
#[derive(Clone, Debug)]
pub struct PreparedImage {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Pixel bytes in row-major premultiplied RGBA8.
    pub rgba8_premul: Arc<Vec<u8>>,
}

/// Decode an encoded raster image (PNG, JPEG, ...) from memory.
pub fn decode_image(bytes: &[u8]) -> TuneframeResult<PreparedImage> {
    let dyn_img = image::load_from_memory(bytes)
        .map_err(|e| TuneframeError::input_decode(format!("cannot decode image: {e}")))?;
    Ok(prepare_rgba(dyn_img.to_rgba8()))
}

/// Read and decode an image file.
#[tracing::instrument]
pub fn decode_image_file(path: &Path) -> TuneframeResult<PreparedImage> {
    let bytes = std::fs::read(path).map_err(|e| {
        TuneframeError::input_decode(format!("cannot read image '{}': {e}", path.display()))
    })?;
    decode_image(&bytes).map_err(|e| match e {
        TuneframeError::InputDecode(msg) => {
            TuneframeError::input_decode(format!("'{}': {msg}", path.display()))
        }
        other => other,
    })
}

/// Wrap straight-alpha RGBA pixels as a premultiplied [`PreparedImage`].
pub fn prepare_rgba(rgba: image::RgbaImage) -> PreparedImage {
    let (width, height) = rgba.dimensions();
    let mut rgba8_premul = rgba.into_raw();
    premultiply_rgba8_in_place(&mut rgba8_premul);
    PreparedImage {
        width,
        height,
        rgba8_premul: Arc::new(rgba8_premul),
    }
}

fn premultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = u16::from(px[3]);
        if a == 255 {
            continue;
        }
        for c in &mut px[..3] {
            *c = mul_div255_u8(u16::from(*c), a);
        }
    }
}
