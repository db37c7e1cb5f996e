use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt as _, util::SubscriberInitExt as _};
use tuneframe::{JobEvent, JobState, PipelineConfig, RenderJob, VisualSource};

#[derive(Parser, Debug)]
#[command(name = "tuneframe", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render an MP4 music video (requires `ffmpeg` on PATH).
    Render(RenderArgs),
    /// Write the waveform of an audio file as a PNG.
    Waveform(WaveformArgs),
    /// List the available video styles.
    Styles(StylesArgs),
    /// Print duration and streams of a media file (requires `ffprobe` on PATH).
    Probe(ProbeArgs),
}

#[derive(Args, Debug)]
struct RenderArgs {
    /// Input audio (MP3 or anything ffmpeg decodes).
    #[arg(long)]
    audio: PathBuf,

    /// Background image.
    #[arg(long, required_unless_present = "waveform_background")]
    image: Option<PathBuf>,

    /// Use the audio's waveform as the background instead of an image.
    #[arg(long, conflicts_with = "image")]
    waveform_background: bool,

    /// Caption drawn centered on the video.
    #[arg(long)]
    caption: Option<String>,

    /// Use the stock caption when `--caption` is not given.
    #[arg(long, conflicts_with = "caption")]
    default_caption: bool,

    /// Cosmetic style name (see `tuneframe styles`).
    #[arg(long)]
    style: Option<String>,

    /// Output MP4 path (default: `<output_dir>/<job_id>.mp4`).
    #[arg(long)]
    out: Option<PathBuf>,

    /// Pipeline config JSON; flags below override it.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Output frame rate.
    #[arg(long)]
    fps: Option<u32>,

    /// Cut the video to at most this many seconds.
    #[arg(long)]
    max_duration: Option<f64>,

    /// Draw a waveform strip along the bottom edge.
    #[arg(long)]
    waveform_overlay: bool,

    /// Keep the job's scratch directory.
    #[arg(long)]
    keep_scratch: bool,

    /// Print the render result as JSON on stdout.
    #[arg(long)]
    json: bool,
}

#[derive(Args, Debug)]
struct WaveformArgs {
    /// Input audio.
    #[arg(long)]
    audio: PathBuf,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    /// Image width in pixels.
    #[arg(long)]
    width: Option<u32>,

    /// Image height in pixels.
    #[arg(long)]
    height: Option<u32>,
}

#[derive(Args, Debug)]
struct StylesArgs {
    /// Print the catalog as JSON.
    #[arg(long)]
    json: bool,
}

#[derive(Args, Debug)]
struct ProbeArgs {
    /// Media file to inspect.
    #[arg(long = "in")]
    in_path: PathBuf,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tuneframe=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Render(args) => cmd_render(args),
        Command::Waveform(args) => cmd_waveform(args),
        Command::Styles(args) => cmd_styles(args),
        Command::Probe(args) => cmd_probe(args),
    }
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let mut cfg = match &args.config {
        Some(path) => PipelineConfig::from_json_file(path)?,
        None => PipelineConfig::default(),
    };
    if let Some(fps) = args.fps {
        cfg.fps = fps;
    }
    if let Some(cap) = args.max_duration {
        cfg.max_duration_secs = Some(cap);
    }
    cfg.waveform_overlay |= args.waveform_overlay;
    cfg.keep_scratch |= args.keep_scratch;
    cfg.validate()?;

    let visual = match args.image {
        Some(path) => VisualSource::Image(path),
        None => VisualSource::Waveform,
    };
    let mut job = RenderJob::new(args.audio, visual);
    let caption = args
        .caption
        .or_else(|| args.default_caption.then(|| tuneframe::DEFAULT_CAPTION.to_owned()));
    if let Some(text) = caption {
        job = job.with_caption(text);
    }
    if let Some(name) = &args.style {
        job = job.with_style(name)?;
    }
    if let Some(out) = args.out {
        job = job.with_output(out);
    }

    let mut last_decile = 0u64;
    let mut progress = |_id: uuid::Uuid, ev: JobEvent| match ev {
        JobEvent::Frame { done, total } => {
            let decile = done * 10 / total.max(1);
            if decile > last_decile {
                last_decile = decile;
                eprintln!("encoding {}%", decile * 10);
            }
        }
        JobEvent::Stage(JobState::Received) => {}
        JobEvent::Stage(state) => eprintln!("{state:?}"),
    };
    let out = job.run_with_observer(&cfg, &mut progress)?;

    if args.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&out).context("serialize render output")?
        );
    }
    eprintln!("wrote {}", out.path.display());
    Ok(())
}

fn cmd_waveform(args: WaveformArgs) -> anyhow::Result<()> {
    let mut opts = tuneframe::WaveformOpts::default();
    if let Some(w) = args.width {
        opts.width = w;
    }
    if let Some(h) = args.height {
        opts.height = h;
    }
    opts.validate()?;

    tuneframe::audio::decode::check_audio_input(
        &args.audio,
        tuneframe::config::DEFAULT_MAX_AUDIO_BYTES,
    )?;
    let track = tuneframe::audio::decode::decode_audio_file(&args.audio)?;
    tuneframe::write_waveform_png(&track, &opts, &args.out)?;

    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_styles(args: StylesArgs) -> anyhow::Result<()> {
    if args.json {
        println!("{}", tuneframe::style::catalog_json()?);
        return Ok(());
    }
    for s in tuneframe::CATALOG {
        println!("{:<18} {}", s.name, s.description);
    }
    Ok(())
}

fn cmd_probe(args: ProbeArgs) -> anyhow::Result<()> {
    anyhow::ensure!(
        tuneframe::media::is_ffprobe_on_path(),
        "ffprobe is required for `probe`, but was not found on PATH"
    );
    let info = tuneframe::probe_media(&args.in_path)?;
    println!("duration_secs: {:.3}", info.duration_secs);
    println!("video: {}", stream_line(info.has_video, info.video_codec.as_deref()));
    println!("audio: {}", stream_line(info.has_audio, info.audio_codec.as_deref()));
    if let (Some(w), Some(h)) = (info.width, info.height) {
        println!("size: {w}x{h}");
    }
    Ok(())
}

fn stream_line(present: bool, codec: Option<&str>) -> String {
    match (present, codec) {
        (false, _) => "none".to_owned(),
        (true, Some(c)) => c.to_owned(),
        (true, None) => "present".to_owned(),
    }
}
