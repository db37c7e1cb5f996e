//! Encoding sinks.
//!
//! Sinks consume composited frames in timeline order and produce the final media file.

/// `ffmpeg`-based sink (MP4 output via system `ffmpeg`).
pub mod ffmpeg;
/// Generic frame sink trait and the in-memory sink.
pub mod sink;
