use std::path::Path;
use std::process::Command;

use crate::audio::track::AudioTrack;
use crate::foundation::error::{TuneframeError, TuneframeResult};

/// Sample rate audio is decoded to.
pub const DECODE_SAMPLE_RATE: u32 = 48_000;
/// Channel count audio is decoded to.
pub const DECODE_CHANNELS: u16 = 2;

/// Reject audio inputs that are missing, empty, or larger than `max_bytes`.
///
/// Returns the file size in bytes.
pub fn check_audio_input(path: &Path, max_bytes: u64) -> TuneframeResult<u64> {
    let meta = std::fs::metadata(path).map_err(|e| {
        TuneframeError::input_decode(format!(
            "cannot read audio input '{}': {e}",
            path.display()
        ))
    })?;
    if !meta.is_file() {
        return Err(TuneframeError::input_decode(format!(
            "audio input '{}' is not a file",
            path.display()
        )));
    }
    let len = meta.len();
    if len == 0 {
        return Err(TuneframeError::input_decode(format!(
            "audio input '{}' is empty",
            path.display()
        )));
    }
    if len > max_bytes {
        return Err(TuneframeError::validation(format!(
            "audio input '{}' is {len} bytes, limit is {max_bytes}",
            path.display()
        )));
    }
    Ok(len)
}

/// Decode an audio file into interleaved stereo `f32` PCM at [`DECODE_SAMPLE_RATE`].
///
/// Decoding is delegated to the system `ffmpeg`. Anything it cannot parse, and files that decode
/// to zero samples, are reported as [`TuneframeError::InputDecode`].
#[tracing::instrument]
pub fn decode_audio_file(path: &Path) -> TuneframeResult<AudioTrack> {
    let out = Command::new("ffmpeg")
        .args(["-v", "error", "-nostdin", "-i"])
        .arg(path)
        .args([
            "-vn",
            "-f",
            "f32le",
            "-acodec",
            "pcm_f32le",
            "-ac",
            &DECODE_CHANNELS.to_string(),
            "-ar",
            &DECODE_SAMPLE_RATE.to_string(),
            "pipe:1",
        ])
        .output()
        .map_err(|e| {
            TuneframeError::encode(format!(
                "failed to run ffmpeg for audio decode (is it installed and on PATH?): {e}"
            ))
        })?;

    if !out.status.success() {
        return Err(TuneframeError::input_decode(format!(
            "ffmpeg audio decode failed for '{}': {}",
            path.display(),
            String::from_utf8_lossy(&out.stderr).trim()
        )));
    }

    let interleaved_f32 = pcm_f32le_from_bytes(&out.stdout)?;
    if interleaved_f32.is_empty() {
        return Err(TuneframeError::input_decode(format!(
            "audio input '{}' decoded to zero samples",
            path.display()
        )));
    }

    let track = AudioTrack::new(DECODE_SAMPLE_RATE, DECODE_CHANNELS, interleaved_f32)?;
    tracing::debug!(
        frames = track.frame_count(),
        duration_secs = track.duration_secs(),
        "decoded audio"
    );
    Ok(track)
}

/// Parse little-endian `f32` PCM bytes.
pub fn pcm_f32le_from_bytes(bytes: &[u8]) -> TuneframeResult<Vec<f32>> {
    if !bytes.len().is_multiple_of(4) {
        return Err(TuneframeError::input_decode(
            "decoded audio byte length is not aligned to f32 samples",
        ));
    }
    Ok(bytes
        .chunks_exact(4)
        .map(|c| f32::from_le_bytes([c[0], c[1], c[2], c[3]]))
        .collect())
}

/// Write a track's samples as raw little-endian `f32` PCM (the encoder's audio input format).
pub fn write_f32le_file(track: &AudioTrack, out_path: &Path) -> TuneframeResult<()> {
    crate::media::ensure_parent_dir(out_path)?;

    let samples = track.samples();
    let mut bytes = Vec::<u8>::with_capacity(samples.len() * 4);
    for &sample in samples {
        bytes.extend_from_slice(&sample.to_le_bytes());
    }
    std::fs::write(out_path, bytes).map_err(|e| {
        TuneframeError::encode(format!(
            "failed to write pcm file '{}': {e}",
            out_path.display()
        ))
    })
}
