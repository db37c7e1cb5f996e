/// Crate-wide result alias.
pub type TuneframeResult<T> = Result<T, TuneframeError>;

/// Error taxonomy for a render job.
///
/// Every variant is terminal for the job that raised it. Callers that only need a user-facing
/// message can rely on `Display`; callers that branch on the failure class use [`ErrorKind`].
#[derive(thiserror::Error, Debug)]
pub enum TuneframeError {
    /// Audio or image input could not be parsed.
    #[error("input decode error: {0}")]
    InputDecode(String),

    /// Compositing or text layout failed.
    #[error("render error: {0}")]
    Render(String),

    /// The encoder could not be started, fed, or finished.
    #[error("encode error: {0}")]
    Encode(String),

    /// Configuration or arguments are invalid.
    #[error("validation error: {0}")]
    Validation(String),

    /// Configuration or catalog (de)serialization failed.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Anything else (mostly I/O with context attached).
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Coarse classification of a [`TuneframeError`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    /// See [`TuneframeError::InputDecode`].
    InputDecode,
    /// See [`TuneframeError::Render`].
    Render,
    /// See [`TuneframeError::Encode`].
    Encode,
    /// See [`TuneframeError::Validation`].
    Validation,
    /// See [`TuneframeError::Serde`].
    Serde,
    /// See [`TuneframeError::Other`].
    Other,
}

impl TuneframeError {
    /// Build an [`TuneframeError::InputDecode`].
    pub fn input_decode(msg: impl Into<String>) -> Self {
        Self::InputDecode(msg.into())
    }

    /// Build a [`TuneframeError::Render`].
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// Build an [`TuneframeError::Encode`].
    pub fn encode(msg: impl Into<String>) -> Self {
        Self::Encode(msg.into())
    }

    /// Build a [`TuneframeError::Validation`].
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`TuneframeError::Serde`].
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }

    /// Failure class of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InputDecode(_) => ErrorKind::InputDecode,
            Self::Render(_) => ErrorKind::Render,
            Self::Encode(_) => ErrorKind::Encode,
            Self::Validation(_) => ErrorKind::Validation,
            Self::Serde(_) => ErrorKind::Serde,
            Self::Other(_) => ErrorKind::Other,
        }
    }
}

impl From<serde_json::Error> for TuneframeError {
    fn from(e: serde_json::Error) -> Self {
        Self::Serde(e.to_string())
    }
}
