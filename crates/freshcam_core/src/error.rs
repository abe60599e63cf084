//! Failure taxonomy for classification attempts and pipeline actions.

use thiserror::Error;

/// Why a single classification attempt did not produce a result.
///
/// The `Display` output carries the detailed cause for logs. What the user
/// sees is [`ClassifyError::reason`].
#[derive(Debug, Error)]
pub enum ClassifyError {
    /// The captured photo could not be read from disk.
    #[error("cannot read captured image {uri}: {source}")]
    Image {
        uri: String,
        #[source]
        source: std::io::Error,
    },
    /// Connectivity, timeout or protocol failure before a status arrived.
    #[error("request failed: {0}")]
    Transport(String),
    /// The service answered with a non-2xx status.
    #[error("service returned status {0}")]
    Status(u16),
    /// The body was not JSON or lacked the core result fields.
    #[error("malformed classification payload: {0}")]
    Malformed(String),
}

impl ClassifyError {
    /// Human-readable reason shown in the failed state.
    pub fn reason(&self) -> String {
        match self {
            ClassifyError::Image { .. } => "Could not read the captured photo.".to_string(),
            ClassifyError::Transport(_) => "Failed to analyze image. Please try again.".to_string(),
            ClassifyError::Status(code) => format!("Server error: {code}"),
            ClassifyError::Malformed(_) => "No predictions returned.".to_string(),
        }
    }
}

impl From<reqwest::Error> for ClassifyError {
    fn from(err: reqwest::Error) -> Self {
        ClassifyError::Transport(err.to_string())
    }
}

/// Rejected pipeline actions. The state is left untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PipelineError {
    #[error("a classification request is already in flight")]
    Busy,
    #[error("pipeline must be idle to accept a new image (currently {0})")]
    NotIdle(&'static str),
    #[error("retry is only available after a failed attempt")]
    NothingToRetry,
    #[error("failed to start classification worker: {0}")]
    Spawn(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reasons_hide_the_underlying_cause() {
        let err = ClassifyError::Transport("dns error: no such host".into());
        assert_eq!(err.reason(), "Failed to analyze image. Please try again.");
        assert!(err.to_string().contains("dns error"));
    }

    #[test]
    fn status_reason_names_the_code() {
        assert_eq!(ClassifyError::Status(502).reason(), "Server error: 502");
    }

    #[test]
    fn malformed_reason_matches_empty_result_copy() {
        let err = ClassifyError::Malformed("missing ripeness".into());
        assert_eq!(err.reason(), "No predictions returned.");
    }
}
