use std::path::PathBuf;

use anyhow::Context as _;
use uuid::Uuid;

use crate::assets::decode::{PreparedImage, decode_image_file};
use crate::assets::font::{FontSource, load_font_file, resolve_system_font};
use crate::audio::decode::{check_audio_input, decode_audio_file, write_f32le_file};
use crate::audio::track::AudioTrack;
use crate::config::PipelineConfig;
use crate::encode::ffmpeg::{FfmpegSink, FfmpegSinkOpts};
use crate::encode::sink::{AudioInputConfig, FrameSink, SinkConfig};
use crate::foundation::core::{Canvas, FrameIndex};
use crate::foundation::error::{TuneframeError, TuneframeResult};
use crate::job::scratch::ScratchDir;
use crate::job::state::{JobEvent, JobState, NoopObserver, ProgressObserver};
use crate::render::compositor::CpuCompositor;
use crate::render::frame::FrameRGBA;
use crate::render::layer::{CaptionLayer, ImageLayer, LayerStack, VisualLayer};
use crate::style::{StyleDescriptor, require_style};
use crate::waveform::write_waveform_png;

/// Where the base layer of the video comes from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum VisualSource {
    /// A still image file, stretched over the canvas.
    Image(PathBuf),
    /// The waveform of the job's own audio.
    Waveform,
}

/// One MP3 + visual + optional caption to render into an MP4.
#[derive(Clone, Debug)]
pub struct RenderJob {
    id: Uuid,
    audio: PathBuf,
    visual: VisualSource,
    caption: Option<String>,
    style: Option<&'static StyleDescriptor>,
    out_path: Option<PathBuf>,
}

/// Result of a finished job.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct RenderOutput {
    /// Job id, also used for the scratch directory name.
    pub job_id: Uuid,
    /// Absolute path of the written MP4.
    pub path: PathBuf,
    /// Audio duration the video was cut to, in seconds.
    pub duration_secs: f64,
    /// Duration covered by the pushed frames, in seconds.
    pub video_duration_secs: f64,
    /// Frames handed to the encoder.
    pub frames: u64,
    /// Video width in pixels.
    pub width: u32,
    /// Video height in pixels.
    pub height: u32,
    /// Video frame rate.
    pub fps: u32,
    /// Layers in the composited frame.
    pub layer_count: usize,
    /// Selected cosmetic style, if any.
    pub style: Option<String>,
}

impl RenderOutput {
    /// Read the encoded file.
    pub fn read_bytes(&self) -> TuneframeResult<Vec<u8>> {
        let bytes = std::fs::read(&self.path)
            .with_context(|| format!("read output '{}'", self.path.display()))?;
        Ok(bytes)
    }
}

impl RenderJob {
    /// New job with a fresh id, no caption, and the default output location.
    pub fn new(audio: impl Into<PathBuf>, visual: VisualSource) -> Self {
        Self {
            id: Uuid::new_v4(),
            audio: audio.into(),
            visual,
            caption: None,
            style: None,
            out_path: None,
        }
    }

    /// Set the caption. Blank text means no caption layer.
    pub fn with_caption(mut self, caption: impl Into<String>) -> Self {
        let caption = caption.into();
        self.caption = (!caption.trim().is_empty()).then_some(caption);
        self
    }

    /// Select a catalog style by name.
    pub fn with_style(mut self, name: &str) -> TuneframeResult<Self> {
        self.style = Some(require_style(name)?);
        Ok(self)
    }

    /// Write the MP4 to `path` instead of `<output_dir>/<job_id>.mp4`.
    pub fn with_output(mut self, path: impl Into<PathBuf>) -> Self {
        self.out_path = Some(path.into());
        self
    }

    /// Job id.
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Caption text, if any.
    pub fn caption(&self) -> Option<&str> {
        self.caption.as_deref()
    }

    /// Run without progress reporting.
    pub fn run(self, cfg: &PipelineConfig) -> TuneframeResult<RenderOutput> {
        self.run_with_observer(cfg, &mut NoopObserver)
    }

    /// Run to completion on the calling thread, reporting progress to `observer`.
    ///
    /// On failure no output file is left behind and the scratch directory is removed.
    #[tracing::instrument(skip_all, fields(job_id = %self.id))]
    pub fn run_with_observer(
        self,
        cfg: &PipelineConfig,
        observer: &mut dyn ProgressObserver,
    ) -> TuneframeResult<RenderOutput> {
        let mut run = JobRun {
            id: self.id,
            state: JobState::Received,
            observer,
        };
        run.notify(JobEvent::Stage(JobState::Received));
        tracing::info!(
            audio = %self.audio.display(),
            visual = ?self.visual,
            caption = self.caption.as_deref().unwrap_or(""),
            style = self.style.map(|s| s.name).unwrap_or("none"),
            "job received"
        );

        match self.execute(cfg, &mut run) {
            Ok(out) => {
                run.enter(JobState::Done)?;
                tracing::info!(
                    path = %out.path.display(),
                    duration_secs = out.duration_secs,
                    frames = out.frames,
                    "job done"
                );
                Ok(out)
            }
            Err(e) => {
                let from = run.state;
                // Failed is reachable from every live state, so this only errs after Done.
                let _ = run.enter(JobState::Failed);
                tracing::error!(stage = ?from, error = %e, "job failed");
                Err(e)
            }
        }
    }

    fn execute(&self, cfg: &PipelineConfig, run: &mut JobRun<'_>) -> TuneframeResult<RenderOutput> {
        cfg.validate()?;
        let fps = cfg.fps()?;
        let out_path = self.resolve_out_path(cfg)?;
        let scratch = ScratchDir::create(&cfg.resolved_scratch_root(), self.id, cfg.keep_scratch)?;

        run.enter(JobState::Decoding)?;
        check_audio_input(&self.audio, cfg.max_audio_bytes)?;
        let background = match &self.visual {
            VisualSource::Image(path) => Some(decode_image_file(path)?),
            VisualSource::Waveform => None,
        };
        let track = apply_duration_cap(decode_audio_file(&self.audio)?, cfg.max_duration_secs)?;
        let duration = track.duration_secs();
        tracing::info!(duration_secs = duration, "audio decoded");

        run.enter(JobState::Compositing)?;
        let needs_waveform = background.is_none() || cfg.waveform_overlay;
        let waveform = if needs_waveform {
            let png = scratch.join("waveform.png");
            Some(write_waveform_png(&track, &cfg.waveform, &png)?.to_prepared_image()?)
        } else {
            None
        };
        let font = match &self.caption {
            Some(_) => Some(caption_font(cfg)?),
            None => None,
        };
        let stack = build_layer_stack(cfg, background, waveform, self.caption.as_deref(), font)?;
        let frame = CpuCompositor::new().render(&stack)?;
        let canvas = stack.canvas();

        run.enter(JobState::Encoding)?;
        let pcm = scratch.join("audio.f32le");
        write_f32le_file(&track, &pcm)?;
        let total = fps.secs_to_frames_ceil(duration).max(1);
        let sink_cfg = SinkConfig {
            width: canvas.width,
            height: canvas.height,
            fps,
            audio: Some(AudioInputConfig {
                path: pcm,
                sample_rate: track.sample_rate(),
                channels: track.channels(),
            }),
        };
        let mut sink = FfmpegSink::new(FfmpegSinkOpts {
            out_path: out_path.clone(),
            overwrite: true,
            bg_rgba: cfg.bg_rgba,
        });
        stream_static_frame(&mut sink, sink_cfg, &frame, total, |done| {
            run.notify(JobEvent::Frame { done, total })
        })?;

        Ok(RenderOutput {
            job_id: self.id,
            path: out_path,
            duration_secs: duration,
            video_duration_secs: fps.frames_to_secs(total),
            frames: total,
            width: canvas.width,
            height: canvas.height,
            fps: cfg.fps,
            layer_count: stack.len(),
            style: self.style.map(|s| s.name.to_owned()),
        })
    }

    fn resolve_out_path(&self, cfg: &PipelineConfig) -> TuneframeResult<PathBuf> {
        let path = match &self.out_path {
            Some(p) => p.clone(),
            None => cfg.resolved_output_dir().join(format!("{}.mp4", self.id)),
        };
        let abs = std::path::absolute(&path)
            .with_context(|| format!("resolve output path '{}'", path.display()))?;
        Ok(abs)
    }
}

struct JobRun<'a> {
    id: Uuid,
    state: JobState,
    observer: &'a mut dyn ProgressObserver,
}

impl JobRun<'_> {
    fn enter(&mut self, next: JobState) -> TuneframeResult<()> {
        self.state = self.state.advance(next)?;
        tracing::info!(state = ?next, "job stage");
        self.notify(JobEvent::Stage(next));
        Ok(())
    }

    fn notify(&mut self, event: JobEvent) {
        self.observer.on_event(self.id, event);
    }
}

/// Cap `track` to `max_secs` and reject a track left without samples.
pub(crate) fn apply_duration_cap(
    track: AudioTrack,
    max_secs: Option<f64>,
) -> TuneframeResult<AudioTrack> {
    let track = match max_secs {
        Some(cap) => track.capped(cap)?,
        None => track,
    };
    if track.is_empty() {
        return Err(TuneframeError::input_decode("audio track has no samples"));
    }
    Ok(track)
}

fn caption_font(cfg: &PipelineConfig) -> TuneframeResult<FontSource> {
    match &cfg.caption.font_path {
        Some(path) => load_font_file(path),
        None => resolve_system_font(&cfg.caption.font_family, cfg.caption.bold),
    }
}

/// Assemble base image, optional waveform strip, and optional caption, bottom to top.
pub(crate) fn build_layer_stack(
    cfg: &PipelineConfig,
    background: Option<PreparedImage>,
    waveform: Option<PreparedImage>,
    caption: Option<&str>,
    font: Option<FontSource>,
) -> TuneframeResult<LayerStack> {
    let (base, overlay) = match (background, waveform) {
        (Some(bg), wf) => (bg, if cfg.waveform_overlay { wf } else { None }),
        (None, Some(wf)) => (wf, None),
        (None, None) => {
            return Err(TuneframeError::render("job has no base image"));
        }
    };

    let canvas = match cfg.canvas {
        Some(c) => c,
        None => Canvas::even_floor(base.width, base.height)?,
    };
    let mut stack = LayerStack::new(canvas)?;
    stack.push(VisualLayer::Image(ImageLayer::fill(base, canvas)))?;
    if let Some(wf) = overlay {
        stack.push(VisualLayer::Image(ImageLayer::bottom_strip(
            wf,
            canvas,
            cfg.overlay_height_ratio,
        )?))?;
    }
    if let Some(text) = caption.filter(|t| !t.trim().is_empty()) {
        let font = font.ok_or_else(|| TuneframeError::render("caption has no font"))?;
        stack.push(VisualLayer::Caption(CaptionLayer {
            text: text.to_owned(),
            font,
            size_px: cfg.caption.font_size_px,
            color: cfg.caption.color,
        }))?;
    }
    Ok(stack)
}

/// Push `total` copies of `frame` through `sink`, aborting it on any error.
pub(crate) fn stream_static_frame(
    sink: &mut dyn FrameSink,
    cfg: SinkConfig,
    frame: &FrameRGBA,
    total: u64,
    mut on_frame: impl FnMut(u64),
) -> TuneframeResult<()> {
    sink.begin(cfg)?;
    let pushed = (0..total).try_for_each(|i| {
        sink.push_frame(FrameIndex(i), frame)?;
        on_frame(i + 1);
        Ok::<_, TuneframeError>(())
    });
    match pushed.and_then(|()| sink.end()) {
        Ok(()) => Ok(()),
        Err(e) => {
            sink.abort();
            Err(e)
        }
    }
}

/// Render from in-memory inputs and return the MP4 bytes.
///
/// Inputs and output are staged in a private scratch directory that is removed before returning.
#[tracing::instrument(skip_all, fields(audio_bytes = audio.len(), image_bytes = image.len()))]
pub fn render_bytes(
    audio: &[u8],
    image: &[u8],
    caption: Option<&str>,
    cfg: &PipelineConfig,
) -> TuneframeResult<Vec<u8>> {
    let staging = ScratchDir::create(&cfg.resolved_scratch_root(), Uuid::new_v4(), false)?;
    let audio_path = staging.join("input-audio");
    let image_path = staging.join("input-image");
    std::fs::write(&audio_path, audio)
        .with_context(|| format!("stage audio '{}'", audio_path.display()))?;
    std::fs::write(&image_path, image)
        .with_context(|| format!("stage image '{}'", image_path.display()))?;

    let mut job = RenderJob::new(&audio_path, VisualSource::Image(image_path))
        .with_output(staging.join("output.mp4"));
    if let Some(text) = caption {
        job = job.with_caption(text);
    }
    job.run(cfg)?.read_bytes()
}

#[cfg(test)]
#[path = "../../tests/unit/job/render_job.rs"]
mod tests;
