use super::*;

#[test]
fn defaults_match_documented_values() {
    let cfg = PipelineConfig::default();
    assert_eq!(cfg.fps, 24);
    assert_eq!(cfg.caption.font_size_px, 50.0);
    assert_eq!(cfg.caption.color, [255, 255, 255, 255]);
    assert_eq!(cfg.waveform.width, 1000);
    assert_eq!(cfg.waveform.height, 200);
    assert_eq!(cfg.max_audio_bytes, 20 * 1024 * 1024);
    assert!(!cfg.waveform_overlay);
    assert!(!cfg.keep_scratch);
    cfg.validate().unwrap();
}

#[test]
fn partial_json_keeps_other_defaults() {
    let cfg = PipelineConfig::from_json_str(
        r#"{ "fps": 30, "caption": { "font_size_px": 32 }, "canvas": { "width": 640, "height": 360 } }"#,
    )
    .unwrap();
    assert_eq!(cfg.fps, 30);
    assert_eq!(cfg.caption.font_size_px, 32.0);
    assert_eq!(cfg.caption.font_family, "Arial");
    assert_eq!(
        cfg.canvas,
        Some(Canvas {
            width: 640,
            height: 360
        })
    );
}

#[test]
fn unknown_keys_are_serde_errors() {
    let err = PipelineConfig::from_json_str(r#"{ "fsp": 30 }"#).unwrap_err();
    assert!(err.to_string().starts_with("serialization error:"));
}

#[test]
fn validate_rejects_out_of_range_values() {
    let bad = [
        PipelineConfig {
            fps: 0,
            ..PipelineConfig::default()
        },
        PipelineConfig {
            canvas: Some(Canvas {
                width: 641,
                height: 360,
            }),
            ..PipelineConfig::default()
        },
        PipelineConfig {
            max_duration_secs: Some(0.0),
            ..PipelineConfig::default()
        },
        PipelineConfig {
            overlay_height_ratio: 1.5,
            ..PipelineConfig::default()
        },
        PipelineConfig {
            caption: CaptionOpts {
                font_size_px: -1.0,
                ..CaptionOpts::default()
            },
            ..PipelineConfig::default()
        },
    ];
    for cfg in bad {
        let err = cfg.validate().unwrap_err();
        assert!(
            err.to_string().starts_with("validation error:"),
            "{cfg:?} -> {err}"
        );
    }
}

#[test]
fn config_file_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("cfg.json");
    let cfg = PipelineConfig {
        waveform_overlay: true,
        keep_scratch: true,
        ..PipelineConfig::default()
    };
    std::fs::write(&path, serde_json::to_string(&cfg).unwrap()).unwrap();
    assert_eq!(PipelineConfig::from_json_file(&path).unwrap(), cfg);
}

#[test]
fn missing_config_file_is_an_error() {
    let err = PipelineConfig::from_json_file(Path::new("/definitely/not/here.json")).unwrap_err();
    assert!(err.to_string().contains("read config"));
}
