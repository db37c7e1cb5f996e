use crate::foundation::error::{TuneframeError, TuneframeResult};

/// Decoded audio: interleaved `f32` PCM plus its format.
///
/// The track's duration is the timing reference for the whole job. Tracks are never mutated once
/// decoded; [`AudioTrack::capped`] produces a new, shorter track.
#[derive(Clone, Debug)]
pub struct AudioTrack {
    sample_rate: u32,
    channels: u16,
    interleaved_f32: Vec<f32>,
}

impl AudioTrack {
    /// Wrap decoded samples, validating the format and buffer shape.
    pub fn new(sample_rate: u32, channels: u16, interleaved_f32: Vec<f32>) -> TuneframeResult<Self> {
        if sample_rate == 0 {
            return Err(TuneframeError::validation("audio sample_rate must be non-zero"));
        }
        if channels == 0 {
            return Err(TuneframeError::validation("audio channels must be non-zero"));
        }
        if !interleaved_f32.len().is_multiple_of(usize::from(channels)) {
            return Err(TuneframeError::input_decode(
                "decoded audio length is not a multiple of the channel count",
            ));
        }
        Ok(Self {
            sample_rate,
            channels,
            interleaved_f32,
        })
    }

    /// Sample rate in Hz.
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Number of interleaved channels.
    pub fn channels(&self) -> u16 {
        self.channels
    }

    /// Raw interleaved samples.
    pub fn samples(&self) -> &[f32] {
        &self.interleaved_f32
    }

    /// Samples per channel.
    pub fn frame_count(&self) -> usize {
        self.interleaved_f32.len() / usize::from(self.channels)
    }

    /// Return `true` when no samples were decoded.
    pub fn is_empty(&self) -> bool {
        self.interleaved_f32.is_empty()
    }

    /// Track duration in seconds.
    pub fn duration_secs(&self) -> f64 {
        self.frame_count() as f64 / f64::from(self.sample_rate)
    }

    /// Samples of the first channel only.
    pub fn first_channel(&self) -> impl ExactSizeIterator<Item = f32> + '_ {
        self.interleaved_f32
            .chunks_exact(usize::from(self.channels))
            .map(|frame| frame[0])
    }

    /// Return a copy truncated to at most `max_secs` seconds.
    ///
    /// Caps at or beyond the track's own duration return an identical track. A cap that would
    /// leave a non-empty track with no sample frames is rejected.
    pub fn capped(&self, max_secs: f64) -> TuneframeResult<Self> {
        if !max_secs.is_finite() || max_secs <= 0.0 {
            return Err(TuneframeError::validation(
                "max duration must be finite and > 0",
            ));
        }
        let max_frames = (max_secs * f64::from(self.sample_rate)).round() as usize;
        let keep = max_frames.min(self.frame_count()) * usize::from(self.channels);
        if keep == 0 && !self.is_empty() {
            return Err(TuneframeError::validation(format!(
                "max duration {max_secs}s is shorter than one sample at {} Hz",
                self.sample_rate
            )));
        }
        Ok(Self {
            sample_rate: self.sample_rate,
            channels: self.channels,
            interleaved_f32: self.interleaved_f32[..keep].to_vec(),
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/audio/track.rs"]
mod tests;
