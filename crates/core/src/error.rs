use crate::validation::ValidationErrors;

#[derive(Debug, thiserror::Error)]
pub enum ClinicError {
    #[error("{0}")]
    InvalidInput(String),
    #[error("request failed: {0}")]
    Transport(String),
    /// Non-2xx response. `message` is the response body, or a status-text fallback.
    #[error("{message}")]
    Server { status: u16, message: String },
    #[error("failed to decode response: {0}")]
    Decode(String),
    #[error("validation failed: {0}")]
    Validation(ValidationErrors),
}

pub type ClinicResult<T> = std::result::Result<T, ClinicError>;
