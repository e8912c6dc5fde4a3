/// Convenience result type used across reelc.
pub type ReelResult<T> = Result<T, ReelError>;

/// Top-level error taxonomy used by the compiler and the execution adapter.
#[derive(thiserror::Error, Debug)]
pub enum ReelError {
    /// Invalid node or configuration data.
    #[error("validation error: {0}")]
    Validation(String),

    /// The project handed to the compiler is unusable as a whole.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// A single track failed to translate; `track` names the offending track.
    #[error("failed to translate track '{track}'")]
    TrackTranslation {
        /// Display name of the track.
        track: String,
        /// Underlying failure.
        #[source]
        source: Box<ReelError>,
    },

    /// A command was used before translation/finalization completed.
    #[error("render precondition failed: {0}")]
    RenderPrecondition(String),

    /// The external tool could not be started or exited unsuccessfully.
    #[error("execution error: {0}")]
    Execution(String),

    /// The external tool was stopped by cancellation or deadline.
    #[error("execution cancelled: {0}")]
    Cancelled(String),

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ReelError {
    /// Build a [`ReelError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`ReelError::InvalidInput`] value.
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Wrap `source` as the failure of the track named `track`.
    pub fn track(track: impl Into<String>, source: ReelError) -> Self {
        Self::TrackTranslation {
            track: track.into(),
            source: Box::new(source),
        }
    }

    /// Build a [`ReelError::RenderPrecondition`] value.
    pub fn precondition(msg: impl Into<String>) -> Self {
        Self::RenderPrecondition(msg.into())
    }

    /// Build a [`ReelError::Execution`] value.
    pub fn execution(msg: impl Into<String>) -> Self {
        Self::Execution(msg.into())
    }

    /// Build a [`ReelError::Cancelled`] value.
    pub fn cancelled(msg: impl Into<String>) -> Self {
        Self::Cancelled(msg.into())
    }

    /// Build a [`ReelError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }

    /// Return `true` for failures caused by cancellation or a deadline.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled(_))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
