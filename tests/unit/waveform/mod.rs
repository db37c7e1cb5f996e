use super::*;

fn px(frame: &FrameRGBA, x: u32, y: u32) -> [u8; 4] {
    let i = ((y * frame.width + x) * 4) as usize;
    [
        frame.data[i],
        frame.data[i + 1],
        frame.data[i + 2],
        frame.data[i + 3],
    ]
}

fn mono(samples: Vec<f32>) -> AudioTrack {
    AudioTrack::new(8, 1, samples).unwrap()
}

#[test]
fn extents_partition_samples_evenly() {
    let samples = [0.1, -0.2, 0.5, -0.9, 0.3, 0.0];
    let e = column_extents(&samples, 3);
    assert_eq!(
        e,
        vec![
            ColumnExtent {
                min: -0.2,
                max: 0.1
            },
            ColumnExtent {
                min: -0.9,
                max: 0.5
            },
            ColumnExtent { min: 0.0, max: 0.3 },
        ]
    );
}

#[test]
fn extents_with_fewer_samples_than_columns_reuse_samples() {
    let e = column_extents(&[1.0, -1.0], 4);
    assert_eq!(e.len(), 4);
    assert_eq!(e[0], ColumnExtent { min: 1.0, max: 1.0 });
    assert_eq!(
        e[3],
        ColumnExtent {
            min: -1.0,
            max: -1.0
        }
    );
}

#[test]
fn extents_of_empty_input_are_zero() {
    assert_eq!(column_extents(&[], 3), vec![ColumnExtent::default(); 3]);
    assert!(column_extents(&[1.0], 0).is_empty());
}

#[test]
fn extents_ignore_non_finite_samples() {
    let e = column_extents(&[f32::NAN, 0.5, f32::INFINITY], 1);
    assert_eq!(e, vec![ColumnExtent { min: 0.5, max: 0.5 }]);
}

#[test]
fn silent_input_has_no_area() {
    let e = vec![ColumnExtent::default(); 10];
    assert!(waveform_path(&e, 10.0, 10.0).is_none());
}

#[test]
fn path_spans_full_width_and_stays_in_bounds() {
    use kurbo::Shape as _;

    let e = column_extents(&[0.0, 1.0, -1.0, 0.5, -0.25, 0.75], 6);
    let path = waveform_path(&e, 60.0, 20.0).unwrap();
    let bb = path.bounding_box();
    assert!(bb.x0.abs() < 1e-9);
    assert!((bb.x1 - 60.0).abs() < 1e-9);
    assert!(bb.y0 >= 0.0 && bb.y1 <= 20.0);
    assert!(path.area().abs() > 0.0);
}

#[test]
fn opts_validation() {
    assert!(WaveformOpts::default().validate().is_ok());
    let zero = WaveformOpts {
        width: 0,
        ..WaveformOpts::default()
    };
    assert!(zero.validate().is_err());
    let huge = WaveformOpts {
        height: 20_000,
        ..WaveformOpts::default()
    };
    assert!(huge.validate().is_err());
}

#[test]
fn render_fills_between_zero_and_peaks() {
    // Full-scale square wave: the plot covers the middle band and leaves margins as background.
    let samples: Vec<f32> = (0..400)
        .map(|i| if i % 2 == 0 { 1.0 } else { -1.0 })
        .collect();
    let opts = WaveformOpts {
        width: 40,
        height: 40,
        fill_rgba: [0, 0, 255, 255],
        background_rgba: [255, 255, 255, 255],
    };
    let frame = render_waveform(&mono(samples), &opts).unwrap();
    assert_eq!((frame.width, frame.height), (40, 40));
    assert_eq!(px(&frame, 20, 20), [0, 0, 255, 255]);
    assert_eq!(px(&frame, 20, 0), [255, 255, 255, 255]);
    assert_eq!(px(&frame, 20, 39), [255, 255, 255, 255]);
}

#[test]
fn render_uses_only_the_first_channel() {
    // Left channel is silent, right is loud: the plot must be the flat silence line.
    let mut pcm = Vec::new();
    for _ in 0..100 {
        pcm.push(0.0);
        pcm.push(1.0);
    }
    let track = AudioTrack::new(8, 2, pcm).unwrap();
    let opts = WaveformOpts {
        width: 20,
        height: 20,
        fill_rgba: [0, 0, 0, 255],
        background_rgba: [255, 255, 255, 255],
    };
    let frame = render_waveform(&track, &opts).unwrap();
    assert_eq!(px(&frame, 10, 10), [0, 0, 0, 255]);
    assert_eq!(px(&frame, 10, 2), [255, 255, 255, 255]);
    assert_eq!(px(&frame, 10, 17), [255, 255, 255, 255]);
}

#[test]
fn png_is_overwritten_in_place() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("waveform.png");
    let opts = WaveformOpts {
        width: 16,
        height: 8,
        ..WaveformOpts::default()
    };
    write_waveform_png(&mono(vec![0.5, -0.5, 0.25]), &opts, &out).unwrap();
    let first = std::fs::read(&out).unwrap();
    write_waveform_png(&mono(vec![0.0; 3]), &opts, &out).unwrap();
    let second = std::fs::read(&out).unwrap();
    assert_ne!(first, second);
    let img = image::open(&out).unwrap();
    assert_eq!((img.width(), img.height()), (16, 8));
}
