/// Domain-level error raised before anything touches the network.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// Input was rejected locally; the message names the offending field.
    #[error("Validation failed: {0}")]
    Validation(String),
}

impl From<validator::ValidationErrors> for CoreError {
    fn from(errors: validator::ValidationErrors) -> Self {
        CoreError::Validation(errors.to_string())
    }
}
