//! Domain error types.
//!
//! The aggregator and view selector have no error paths; everything here
//! belongs to the collaborators around them (config, remote service, session).

/// Top-level error type for tradeview.
#[derive(Debug, thiserror::Error)]
pub enum ViewerError {
    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("remote service unreachable: {reason}")]
    Remote { reason: String },

    #[error("unexpected response from remote service ({status}): {reason}")]
    RemoteResponse { status: u16, reason: String },

    #[error("session store error: {reason}")]
    Session { reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl ViewerError {
    pub(crate) fn invalid(section: &str, key: &str, reason: impl Into<String>) -> Self {
        Self::ConfigInvalid {
            section: section.to_string(),
            key: key.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn missing(section: &str, key: &str) -> Self {
        Self::ConfigMissing {
            section: section.to_string(),
            key: key.to_string(),
        }
    }
}

impl From<&ViewerError> for std::process::ExitCode {
    fn from(err: &ViewerError) -> Self {
        let code: u8 = match err {
            ViewerError::Io(_) => 1,
            ViewerError::ConfigParse { .. }
            | ViewerError::ConfigMissing { .. }
            | ViewerError::ConfigInvalid { .. } => 2,
            ViewerError::Remote { .. } | ViewerError::RemoteResponse { .. } => 3,
            ViewerError::Session { .. } => 4,
        };
        std::process::ExitCode::from(code)
    }
}
