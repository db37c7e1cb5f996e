//! Tuneframe turns an audio track and a still image into a music video.
//!
//! A [`RenderJob`] decodes the audio, optionally renders its waveform, composites the background,
//! waveform strip, and caption into one static frame, and encodes that frame for the audio's full
//! duration into an MP4 through the system `ffmpeg`.
//!
//! - Build a [`PipelineConfig`] (or load one from JSON)
//! - Create a [`RenderJob`] and [`RenderJob::run`] it
//! - Or call [`render_bytes`] with in-memory inputs
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod foundation;

/// Image decoding, font discovery, and caption layout.
pub mod assets;
/// Audio decoding and the decoded track type.
pub mod audio;
/// Pipeline configuration.
pub mod config;
/// Encoding sinks.
pub mod encode;
/// Render jobs and progress reporting.
pub mod job;
/// `ffmpeg`/`ffprobe` tool helpers and output inspection.
pub mod media;
/// Layer model and CPU compositing.
pub mod render;
/// Cosmetic style catalog.
pub mod style;
/// Static waveform images.
pub mod waveform;

pub use crate::foundation::core::{Canvas, Fps, FrameIndex};
pub use crate::foundation::error::{ErrorKind, TuneframeError, TuneframeResult};

pub use crate::audio::track::AudioTrack;
pub use crate::config::{CaptionOpts, DEFAULT_CAPTION, PipelineConfig};
pub use crate::encode::ffmpeg::{FfmpegSink, FfmpegSinkOpts};
pub use crate::encode::sink::{AudioInputConfig, FrameSink, InMemorySink, SinkConfig};
pub use crate::job::{
    JobEvent, JobState, NoopObserver, ProgressObserver, RenderJob, RenderOutput, VisualSource,
    render_bytes,
};
pub use crate::media::{MediaInfo, probe_media};
pub use crate::render::frame::FrameRGBA;
pub use crate::style::{CATALOG, StyleDescriptor, find_style};
pub use crate::waveform::{WaveformOpts, render_waveform, write_waveform_png};
