//! Error types carried by mutation streams.

use thiserror::Error;

/// An error raised while an effect produces mutations.
///
/// The engine recovers from these locally: a per-action mutation stream is
/// truncated at its first `Err` item, and the output state stream keeps
/// running unchanged. Effects that want a *visible* failure state must
/// model it as a mutation instead (an explicit error field on the state).
#[derive(Error, Debug)]
pub enum EffectError {
    /// The effect failed with a message.
    #[error("effect failed: {0}")]
    Failed(String),

    /// The effect failed with an underlying error.
    #[error(transparent)]
    Other(#[from] Box<dyn std::error::Error + Send + Sync>),
}

impl EffectError {
    /// Create a [`EffectError::Failed`] from a message.
    #[must_use]
    pub fn failed(message: impl Into<String>) -> Self {
        Self::Failed(message.into())
    }

    /// Wrap an arbitrary error.
    #[must_use]
    pub fn other(error: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Other(Box::new(error))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failed_displays_message() {
        let error = EffectError::failed("request timed out");
        assert_eq!(error.to_string(), "effect failed: request timed out");
    }

    #[test]
    fn other_preserves_source_display() {
        let io = std::io::Error::new(std::io::ErrorKind::ConnectionReset, "reset");
        let error = EffectError::other(io);
        assert_eq!(error.to_string(), "reset");
    }
}
