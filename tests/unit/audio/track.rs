use super::*;

fn stereo_ramp(frames: usize, sample_rate: u32) -> AudioTrack {
    let mut pcm = Vec::with_capacity(frames * 2);
    for i in 0..frames {
        pcm.push(i as f32);
        pcm.push(-(i as f32));
    }
    AudioTrack::new(sample_rate, 2, pcm).unwrap()
}

#[test]
fn duration_uses_frames_not_samples() {
    let track = stereo_ramp(48_000, 48_000);
    assert_eq!(track.frame_count(), 48_000);
    assert!((track.duration_secs() - 1.0).abs() < 1e-12);
}

#[test]
fn first_channel_skips_other_channels() {
    let track = stereo_ramp(4, 4);
    let left: Vec<f32> = track.first_channel().collect();
    assert_eq!(left, vec![0.0, 1.0, 2.0, 3.0]);
}

#[test]
fn new_rejects_ragged_buffers() {
    let err = AudioTrack::new(48_000, 2, vec![0.0; 3]).unwrap_err();
    assert!(err.to_string().contains("input decode error"));
    assert!(AudioTrack::new(0, 2, vec![]).is_err());
    assert!(AudioTrack::new(48_000, 0, vec![]).is_err());
}

#[test]
fn capped_truncates_to_whole_frames() {
    let track = stereo_ramp(10, 10);
    let capped = track.capped(0.5).unwrap();
    assert_eq!(capped.frame_count(), 5);
    assert_eq!(capped.samples().len(), 10);
    assert!((capped.duration_secs() - 0.5).abs() < 1e-12);
}

#[test]
fn capped_beyond_length_is_identity() {
    let track = stereo_ramp(10, 10);
    let capped = track.capped(60.0).unwrap();
    assert_eq!(capped.samples(), track.samples());
    assert!(track.capped(0.0).is_err());
    assert!(track.capped(f64::INFINITY).is_err());
}

#[test]
fn cap_below_one_sample_is_rejected() {
    let track = AudioTrack::new(48_000, 2, vec![0.1; 96_000]).unwrap();
    let err = track.capped(1e-5).unwrap_err();
    assert!(err.to_string().starts_with("validation error:"));
    assert_eq!(track.capped(1.0 / 48_000.0).unwrap().frame_count(), 1);
}
