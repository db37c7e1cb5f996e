use uuid::Uuid;

use crate::foundation::error::{TuneframeError, TuneframeResult};

/// Lifecycle of a render job.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum JobState {
    /// Inputs accepted, nothing done yet.
    Received,
    /// Reading audio and image inputs.
    Decoding,
    /// Building and flattening the layer stack.
    Compositing,
    /// Streaming frames and audio into the encoder.
    Encoding,
    /// Output written.
    Done,
    /// Job aborted; no output left behind.
    Failed,
}

impl JobState {
    /// `true` for `Done` and `Failed`.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Done | Self::Failed)
    }

    fn successor(self) -> Option<Self> {
        match self {
            Self::Received => Some(Self::Decoding),
            Self::Decoding => Some(Self::Compositing),
            Self::Compositing => Some(Self::Encoding),
            Self::Encoding => Some(Self::Done),
            Self::Done | Self::Failed => None,
        }
    }

    /// Move to `next`, rejecting skipped stages and transitions out of terminal states.
    pub fn advance(self, next: Self) -> TuneframeResult<Self> {
        let allowed =
            (next == Self::Failed && !self.is_terminal()) || self.successor() == Some(next);
        if !allowed {
            return Err(TuneframeError::validation(format!(
                "illegal job transition {self:?} -> {next:?}"
            )));
        }
        Ok(next)
    }
}

/// Progress notification emitted while a job runs.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum JobEvent {
    /// The job entered a new state.
    Stage(JobState),
    /// `done` of `total` frames have been handed to the encoder.
    Frame {
        /// Frames written so far.
        done: u64,
        /// Frames the job will write.
        total: u64,
    },
}

/// Receives [`JobEvent`]s for a running job.
pub trait ProgressObserver {
    /// Called synchronously on the job's thread.
    fn on_event(&mut self, job_id: Uuid, event: JobEvent);
}

impl<F> ProgressObserver for F
where
    F: FnMut(Uuid, JobEvent),
{
    fn on_event(&mut self, job_id: Uuid, event: JobEvent) {
        self(job_id, event)
    }
}

/// Observer that ignores every event.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopObserver;

impl ProgressObserver for NoopObserver {
    fn on_event(&mut self, _job_id: Uuid, _event: JobEvent) {}
}
