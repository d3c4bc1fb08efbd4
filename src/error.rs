//! BiasLens error types

/// BiasLens error types
#[derive(Debug, thiserror::Error)]
pub enum BiasLensError {
    // Provider/network errors
    #[error("HTTP error: {0}")]
    Http(String),

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("provider disabled: no API key configured")]
    ProviderDisabled,

    /// Provider answered but the payload could not be turned into a result
    #[error("malformed provider payload: {0}")]
    MalformedPayload(String),

    // Data errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("storage error: {0}")]
    Storage(String),

    // Auth errors
    #[error("password must be at least {0} characters")]
    PasswordTooShort(usize),

    #[error("email must not be empty")]
    EmptyEmail,

    // Configuration errors
    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("invalid input: {0}")]
    InvalidInput(String),
}

impl From<reqwest::Error> for BiasLensError {
    fn from(err: reqwest::Error) -> Self {
        if let Some(status) = err.status() {
            BiasLensError::Api {
                status: status.as_u16(),
                message: err.to_string(),
            }
        } else {
            BiasLensError::Http(err.to_string())
        }
    }
}

impl From<toml::de::Error> for BiasLensError {
    fn from(err: toml::de::Error) -> Self {
        BiasLensError::Configuration(err.to_string())
    }
}

/// Result type alias for BiasLens operations
pub type Result<T> = std::result::Result<T, BiasLensError>;
