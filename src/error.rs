//! Error types
//!
//! Only construction and I/O can fail; a running tick never does.

/// Fatal errors raised while setting up a match.
#[derive(Debug, thiserror::Error)]
pub enum GameError {
    /// Field dimensions must be finite and strictly positive.
    #[error("invalid field dimensions {width}x{height}")]
    InvalidField { width: f32, height: f32 },

    /// Settings could not be loaded or failed validation.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The loop thread panicked before handing its state back.
    #[error("game loop thread panicked")]
    LoopPanicked,
}

/// Settings loading/validation errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read settings: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse settings: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid setting `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

impl ConfigError {
    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        ConfigError::Invalid {
            field,
            reason: reason.into(),
        }
    }
}
