//! Layer model and the CPU compositor.

/// Layer stack compositing.
pub mod compositor;
/// Rendered frame type.
pub mod frame;
/// Visual layers.
pub mod layer;
pub(crate) mod raster;
