use axum::http::StatusCode;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

pub const PROVIDER_FAILURE_MESSAGE: &str = "Failed to generate a response";
pub const STORAGE_FAILURE_MESSAGE: &str = "Failed to store uploaded file";
pub const DISALLOWED_FILE_MESSAGE: &str = "Fichier non autorisé";

#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid attachment: {0}")]
    InvalidAttachment(String),

    #[error("Uploaded file is too large")]
    PayloadTooLarge,

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Provider error: {0}")]
    Provider(String),

    #[error("Provider call timed out after {seconds}s")]
    ProviderTimeout { seconds: u64 },

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Address parse error: {0}")]
    AddrParse(#[from] std::net::AddrParseError),
}

impl Error {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn invalid_attachment(msg: impl Into<String>) -> Self {
        Self::InvalidAttachment(msg.into())
    }

    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage(msg.into())
    }

    pub fn provider(msg: impl Into<String>) -> Self {
        Self::Provider(msg.into())
    }

    /// HTTP status a request handler answers with when it fails with this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation(_) | Self::InvalidAttachment(_) => StatusCode::BAD_REQUEST,
            Self::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message safe to hand back to HTTP clients. Provider and storage causes
    /// stay in the logs.
    pub fn public_message(&self) -> String {
        match self {
            Self::Validation(msg) => msg.clone(),
            Self::InvalidAttachment(_) => DISALLOWED_FILE_MESSAGE.to_string(),
            Self::PayloadTooLarge => self.to_string(),
            Self::Storage(_) => STORAGE_FAILURE_MESSAGE.to_string(),
            Self::Provider(_) | Self::ProviderTimeout { .. } | Self::Network(_) => {
                PROVIDER_FAILURE_MESSAGE.to_string()
            }
            _ => "Internal server error".to_string(),
        }
    }
}
