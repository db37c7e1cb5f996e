use std::path::Path;
use std::process::{Command, Stdio};

use crate::foundation::error::{TuneframeError, TuneframeResult};

/// Stream summary of an encoded media file, as reported by `ffprobe`.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct MediaInfo {
    /// Container duration in seconds.
    pub duration_secs: f64,
    /// Whether a video stream is present.
    pub has_video: bool,
    /// Whether an audio stream is present.
    pub has_audio: bool,
    /// Width of the first video stream, if any.
    pub width: Option<u32>,
    /// Height of the first video stream, if any.
    pub height: Option<u32>,
    /// Codec of the first video stream, if any.
    pub video_codec: Option<String>,
    /// Codec of the first audio stream, if any.
    pub audio_codec: Option<String>,
}

/// Return `true` when `ffmpeg` can be invoked from `PATH`.
pub fn is_ffmpeg_on_path() -> bool {
    tool_runs("ffmpeg")
}

/// Return `true` when `ffprobe` can be invoked from `PATH`.
pub fn is_ffprobe_on_path() -> bool {
    tool_runs("ffprobe")
}

fn tool_runs(bin: &str) -> bool {
    Command::new(bin)
        .arg("-version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}

/// Inspect a media file with `ffprobe`.
#[tracing::instrument]
pub fn probe_media(path: &Path) -> TuneframeResult<MediaInfo> {
    #[derive(serde::Deserialize)]
    struct ProbeStream {
        codec_type: Option<String>,
        codec_name: Option<String>,
        width: Option<u32>,
        height: Option<u32>,
    }
    #[derive(serde::Deserialize)]
    struct ProbeFormat {
        duration: Option<String>,
    }
    #[derive(serde::Deserialize)]
    struct ProbeOut {
        #[serde(default)]
        streams: Vec<ProbeStream>,
        format: Option<ProbeFormat>,
    }

    let out = Command::new("ffprobe")
        .args([
            "-v",
            "error",
            "-print_format",
            "json",
            "-show_streams",
            "-show_format",
        ])
        .arg(path)
        .output()
        .map_err(|e| TuneframeError::input_decode(format!("failed to run ffprobe: {e}")))?;
    if !out.status.success() {
        return Err(TuneframeError::input_decode(format!(
            "ffprobe failed for '{}': {}",
            path.display(),
            String::from_utf8_lossy(&out.stderr).trim()
        )));
    }

    let parsed: ProbeOut = serde_json::from_slice(&out.stdout)
        .map_err(|e| TuneframeError::input_decode(format!("ffprobe json parse failed: {e}")))?;

    let video = parsed
        .streams
        .iter()
        .find(|s| s.codec_type.as_deref() == Some("video"));
    let audio = parsed
        .streams
        .iter()
        .find(|s| s.codec_type.as_deref() == Some("audio"));
    let duration_secs = parsed
        .format
        .as_ref()
        .and_then(|f| f.duration.as_ref())
        .and_then(|s| s.parse::<f64>().ok())
        .unwrap_or(0.0);

    Ok(MediaInfo {
        duration_secs,
        has_video: video.is_some(),
        has_audio: audio.is_some(),
        width: video.and_then(|s| s.width),
        height: video.and_then(|s| s.height),
        video_codec: video.and_then(|s| s.codec_name.clone()),
        audio_codec: audio.and_then(|s| s.codec_name.clone()),
    })
}

/// Ensure the parent directory of `path` exists.
pub fn ensure_parent_dir(path: &Path) -> TuneframeResult<()> {
    if let Some(parent) = path.parent() {
        use anyhow::Context as _;
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create output directory '{}'", parent.display()))?;
    }
    Ok(())
}
