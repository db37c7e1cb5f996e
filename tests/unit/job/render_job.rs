use super::*;
use crate::assets::decode::prepare_rgba;
use crate::encode::sink::InMemorySink;
use crate::foundation::core::Fps;
use crate::foundation::error::ErrorKind;

fn image(w: u32, h: u32) -> PreparedImage {
    prepare_rgba(image::RgbaImage::from_pixel(w, h, image::Rgba([10, 20, 30, 255])))
}

fn frame(w: u32, h: u32) -> FrameRGBA {
    FrameRGBA {
        width: w,
        height: h,
        data: vec![255; (w * h * 4) as usize],
        premultiplied: true,
    }
}

fn sink_cfg(w: u32, h: u32) -> SinkConfig {
    SinkConfig {
        width: w,
        height: h,
        fps: Fps::new(24, 1).unwrap(),
        audio: None,
    }
}

#[test]
fn static_frame_is_pushed_total_times_with_progress() {
    let mut sink = InMemorySink::new();
    let mut progress = Vec::new();
    stream_static_frame(&mut sink, sink_cfg(4, 2), &frame(4, 2), 3, |d| {
        progress.push(d)
    })
    .unwrap();

    assert_eq!(progress, vec![1, 2, 3]);
    assert!(sink.ended());
    let idx = sink.frames().iter().map(|(i, _)| i.0).collect::<Vec<_>>();
    assert_eq!(idx, vec![0, 1, 2]);
    assert!(sink.frames().iter().all(|(_, f)| *f == frame(4, 2)));
}

#[derive(Default)]
struct FailingSink {
    pushed: u64,
    aborted: bool,
}

impl FrameSink for FailingSink {
    fn begin(&mut self, _cfg: SinkConfig) -> TuneframeResult<()> {
        Ok(())
    }

    fn push_frame(&mut self, _idx: FrameIndex, _frame: &FrameRGBA) -> TuneframeResult<()> {
        self.pushed += 1;
        if self.pushed == 2 {
            return Err(TuneframeError::encode("pipe closed"));
        }
        Ok(())
    }

    fn end(&mut self) -> TuneframeResult<()> {
        panic!("end must not be called after a failed push");
    }

    fn abort(&mut self) {
        self.aborted = true;
    }
}

#[test]
fn push_failure_aborts_the_sink() {
    let mut sink = FailingSink::default();
    let mut progress = Vec::new();
    let err = stream_static_frame(&mut sink, sink_cfg(2, 2), &frame(2, 2), 5, |d| {
        progress.push(d)
    })
    .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Encode);
    assert!(sink.aborted);
    assert_eq!(progress, vec![1]);
}

#[test]
fn canvas_follows_background_rounded_to_even() {
    let cfg = PipelineConfig::default();
    let stack = build_layer_stack(&cfg, Some(image(801, 601)), None, None, None).unwrap();
    assert_eq!(
        stack.canvas(),
        Canvas {
            width: 800,
            height: 600
        }
    );
    assert_eq!(stack.len(), 1);
}

#[test]
fn canvas_override_wins() {
    let cfg = PipelineConfig {
        canvas: Some(Canvas {
            width: 64,
            height: 32,
        }),
        ..PipelineConfig::default()
    };
    let stack = build_layer_stack(&cfg, Some(image(801, 601)), None, None, None).unwrap();
    assert_eq!(stack.canvas().width, 64);
    let VisualLayer::Image(base) = &stack.layers()[0] else {
        panic!("base layer must be an image");
    };
    assert_eq!(base.dest, kurbo::Rect::new(0.0, 0.0, 64.0, 32.0));
}

#[test]
fn overlay_strip_sits_on_the_bottom_edge() {
    let cfg = PipelineConfig {
        waveform_overlay: true,
        overlay_height_ratio: 0.25,
        ..PipelineConfig::default()
    };
    let stack =
        build_layer_stack(&cfg, Some(image(100, 80)), Some(image(50, 10)), None, None).unwrap();
    assert_eq!(stack.len(), 2);
    let VisualLayer::Image(strip) = &stack.layers()[1] else {
        panic!("overlay must be an image");
    };
    assert_eq!(strip.dest, kurbo::Rect::new(0.0, 60.0, 100.0, 80.0));
}

#[test]
fn waveform_without_overlay_flag_is_ignored_when_background_exists() {
    let cfg = PipelineConfig::default();
    let stack =
        build_layer_stack(&cfg, Some(image(100, 80)), Some(image(50, 10)), None, None).unwrap();
    assert_eq!(stack.len(), 1);
}

#[test]
fn waveform_alone_becomes_the_base() {
    let cfg = PipelineConfig::default();
    let stack = build_layer_stack(&cfg, None, Some(image(1000, 200)), None, None).unwrap();
    assert_eq!(
        stack.canvas(),
        Canvas {
            width: 1000,
            height: 200
        }
    );
}

#[test]
fn tiny_background_is_rejected() {
    let cfg = PipelineConfig::default();
    let err = build_layer_stack(&cfg, Some(image(1, 7)), None, None, None).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);
}

#[test]
fn caption_needs_a_font() {
    let cfg = PipelineConfig::default();
    let err = build_layer_stack(&cfg, Some(image(8, 8)), None, Some("Test"), None).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Render);
}

#[test]
fn blank_caption_is_dropped() {
    let job = RenderJob::new("a.mp3", VisualSource::Waveform).with_caption("   ");
    assert_eq!(job.caption(), None);
    let job = job.with_caption("Hi");
    assert_eq!(job.caption(), Some("Hi"));
}

#[test]
fn unknown_style_is_rejected() {
    let err = RenderJob::new("a.mp3", VisualSource::Waveform)
        .with_style("polka")
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);
}

#[test]
fn jobs_get_distinct_ids() {
    let a = RenderJob::new("a.mp3", VisualSource::Waveform);
    let b = RenderJob::new("a.mp3", VisualSource::Waveform);
    assert_ne!(a.id(), b.id());
}

#[test]
fn missing_audio_fails_in_decoding_and_cleans_up() {
    let dir = tempfile::tempdir().unwrap();
    let scratch_root = dir.path().join("scratch");
    let out = dir.path().join("out.mp4");
    let cfg = PipelineConfig {
        scratch_root: Some(scratch_root.clone()),
        ..PipelineConfig::default()
    };

    let mut events = Vec::new();
    let mut obs = |_id: Uuid, ev: JobEvent| events.push(ev);
    let err = RenderJob::new(dir.path().join("nope.mp3"), VisualSource::Waveform)
        .with_output(&out)
        .run_with_observer(&cfg, &mut obs)
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::InputDecode);
    assert_eq!(
        events,
        vec![
            JobEvent::Stage(JobState::Received),
            JobEvent::Stage(JobState::Decoding),
            JobEvent::Stage(JobState::Failed),
        ]
    );
    assert!(!out.exists());
    assert_eq!(std::fs::read_dir(&scratch_root).unwrap().count(), 0);
}

#[test]
fn oversized_audio_is_a_validation_error() {
    let dir = tempfile::tempdir().unwrap();
    let audio = dir.path().join("big.mp3");
    std::fs::write(&audio, [0u8; 64]).unwrap();
    let cfg = PipelineConfig {
        max_audio_bytes: 16,
        scratch_root: Some(dir.path().join("scratch")),
        ..PipelineConfig::default()
    };
    let err = RenderJob::new(&audio, VisualSource::Waveform)
        .with_output(dir.path().join("o.mp4"))
        .run(&cfg)
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);
}

#[test]
fn invalid_config_fails_before_any_stage() {
    let cfg = PipelineConfig {
        fps: 0,
        ..PipelineConfig::default()
    };
    let mut events = Vec::new();
    let mut obs = |_id: Uuid, ev: JobEvent| events.push(ev);
    let err = RenderJob::new("a.mp3", VisualSource::Waveform)
        .run_with_observer(&cfg, &mut obs)
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);
    assert_eq!(
        events,
        vec![
            JobEvent::Stage(JobState::Received),
            JobEvent::Stage(JobState::Failed)
        ]
    );
}

#[test]
fn duration_cap_keeps_tracks_non_empty() {
    let track = AudioTrack::new(48_000, 2, vec![0.1; 96_000]).unwrap();

    let capped = apply_duration_cap(track.clone(), Some(0.5)).unwrap();
    assert_eq!(capped.frame_count(), 24_000);
    assert_eq!(apply_duration_cap(track.clone(), None).unwrap().frame_count(), 48_000);

    let err = apply_duration_cap(track, Some(1e-5)).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);

    let empty = AudioTrack::new(48_000, 2, Vec::new()).unwrap();
    let err = apply_duration_cap(empty, None).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InputDecode);
}

#[test]
fn same_caption_composites_to_identical_frames() {
    let Ok(font) = crate::assets::font::resolve_system_font("Arial", true) else {
        return;
    };
    let cfg = PipelineConfig::default();
    let build = || {
        build_layer_stack(
            &cfg,
            Some(image(320, 160)),
            None,
            Some("Test"),
            Some(font.clone()),
        )
        .unwrap()
    };
    let (a, b) = (build(), build());
    assert_eq!(a.len(), 2);
    assert_eq!(a.len(), b.len());
    assert_eq!(a.canvas(), b.canvas());

    let mut compositor = CpuCompositor::new();
    let frame_a = compositor.render(&a).unwrap();
    let frame_b = compositor.render(&b).unwrap();
    let frame_b_again = compositor.render(&b).unwrap();
    assert_eq!(frame_a, frame_b);
    assert_eq!(frame_b, frame_b_again);
}
