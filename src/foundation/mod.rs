/// Frame, fps, and canvas primitives.
pub mod core;
/// Error taxonomy.
pub mod error;
pub(crate) mod math;
