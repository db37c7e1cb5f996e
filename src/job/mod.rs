//! Render jobs: one linear run from input files to an encoded MP4.

/// Job construction, execution, and the byte-level entry point.
pub mod render_job;
/// Per-job scratch directories.
pub mod scratch;
/// Job lifecycle states and progress events.
pub mod state;

pub use render_job::{RenderJob, RenderOutput, VisualSource, render_bytes};
pub use scratch::ScratchDir;
pub use state::{JobEvent, JobState, NoopObserver, ProgressObserver};
