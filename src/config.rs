//! Pipeline configuration.
//!
//! All fields have defaults, so a config file only lists what it changes. Unknown keys are
//! rejected.

use std::path::{Path, PathBuf};

use anyhow::Context as _;

use crate::foundation::core::{Canvas, Fps};
use crate::foundation::error::{TuneframeError, TuneframeResult};
use crate::waveform::WaveformOpts;

/// Caption text the CLI uses for `--default-caption`.
pub const DEFAULT_CAPTION: &str = "Your Music Video";

/// Audio inputs larger than this are rejected before decoding.
pub const DEFAULT_MAX_AUDIO_BYTES: u64 = 20 * 1024 * 1024;

/// Caption appearance.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CaptionOpts {
    /// Font size in pixels.
    pub font_size_px: f32,
    /// Straight-alpha RGBA8 fill color.
    pub color: [u8; 4],
    /// Preferred system font family; any sans-serif face is used when it is missing.
    pub font_family: String,
    /// Explicit font file, bypassing system font lookup.
    pub font_path: Option<PathBuf>,
    /// Request a bold face from the system font database.
    pub bold: bool,
}

impl Default for CaptionOpts {
    fn default() -> Self {
        Self {
            font_size_px: 50.0,
            color: [255, 255, 255, 255],
            font_family: "Arial".to_owned(),
            font_path: None,
            bold: true,
        }
    }
}

/// Settings shared by every job a caller runs.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PipelineConfig {
    /// Output frame rate (integer frames per second).
    pub fps: u32,
    /// Output size; `None` uses the background image size rounded down to even numbers.
    pub canvas: Option<Canvas>,
    /// Cap on the output duration in seconds.
    pub max_duration_secs: Option<f64>,
    /// Caption appearance.
    pub caption: CaptionOpts,
    /// Waveform image options (background and overlay).
    pub waveform: WaveformOpts,
    /// Draw a waveform strip along the bottom edge of the video.
    pub waveform_overlay: bool,
    /// Overlay strip height as a fraction of the canvas height.
    pub overlay_height_ratio: f64,
    /// Color transparent pixels are flattened onto before encoding.
    pub bg_rgba: [u8; 4],
    /// Largest accepted audio file in bytes.
    pub max_audio_bytes: u64,
    /// Directory for `<job_id>.mp4` outputs when a job names no output path.
    pub output_dir: Option<PathBuf>,
    /// Parent of the per-job scratch directories.
    pub scratch_root: Option<PathBuf>,
    /// Leave scratch directories in place after the job ends.
    pub keep_scratch: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            fps: 24,
            canvas: None,
            max_duration_secs: None,
            caption: CaptionOpts::default(),
            waveform: WaveformOpts::default(),
            waveform_overlay: false,
            overlay_height_ratio: 0.2,
            bg_rgba: [0, 0, 0, 255],
            max_audio_bytes: DEFAULT_MAX_AUDIO_BYTES,
            output_dir: None,
            scratch_root: None,
            keep_scratch: false,
        }
    }
}

impl PipelineConfig {
    /// Parse a config from JSON text.
    pub fn from_json_str(s: &str) -> TuneframeResult<Self> {
        let cfg: Self = serde_json::from_str(s)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Read and parse a JSON config file.
    pub fn from_json_file(path: &Path) -> TuneframeResult<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read config '{}'", path.display()))?;
        Self::from_json_str(&text)
    }

    /// Check value ranges.
    pub fn validate(&self) -> TuneframeResult<()> {
        Fps::new(self.fps, 1)?;
        if let Some(canvas) = self.canvas {
            canvas.validate()?;
        }
        if let Some(cap) = self.max_duration_secs
            && !(cap.is_finite() && cap > 0.0)
        {
            return Err(TuneframeError::validation(
                "max_duration_secs must be a positive number",
            ));
        }
        if !(self.caption.font_size_px.is_finite() && self.caption.font_size_px > 0.0) {
            return Err(TuneframeError::validation(
                "caption.font_size_px must be a positive number",
            ));
        }
        self.waveform.validate()?;
        if !(self.overlay_height_ratio > 0.0 && self.overlay_height_ratio <= 1.0) {
            return Err(TuneframeError::validation(
                "overlay_height_ratio must be in (0, 1]",
            ));
        }
        if self.max_audio_bytes == 0 {
            return Err(TuneframeError::validation("max_audio_bytes must be > 0"));
        }
        Ok(())
    }

    /// Frame rate as a rational.
    pub fn fps(&self) -> TuneframeResult<Fps> {
        Fps::new(self.fps, 1)
    }

    /// Directory outputs default into.
    pub fn resolved_output_dir(&self) -> PathBuf {
        self.output_dir.clone().unwrap_or_else(std::env::temp_dir)
    }

    /// Directory scratch directories are created in.
    pub fn resolved_scratch_root(&self) -> PathBuf {
        self.scratch_root.clone().unwrap_or_else(std::env::temp_dir)
    }
}

#[cfg(test)]
#[path = "../tests/unit/config.rs"]
mod tests;
