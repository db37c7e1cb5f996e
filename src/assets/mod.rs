//! Input asset preparation: raster images and caption fonts/text.

/// Raster image decoding.
pub mod decode;
/// Caption font discovery.
pub mod font;
/// Caption text layout.
pub mod text;
