#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Invalid matcher on label '{name}': {reason}")]
    InvalidMatcher { name: String, reason: String },

    #[error("Invalid duration '{value}': {reason}")]
    InvalidDuration { value: String, reason: String },

    #[error("Invalid fingerprint '{0}'")]
    InvalidFingerprint(String),
}
