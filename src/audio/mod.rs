//! Audio decoding and the decoded track type.

/// `ffmpeg`-backed decoding and raw PCM I/O.
pub mod decode;
/// Decoded audio track.
pub mod track;
