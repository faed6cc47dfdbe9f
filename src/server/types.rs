use serde::{Deserialize, Serialize};

#[derive(Debug, Default, Deserialize)]
pub struct AskRequest {
    #[serde(default)]
    pub prompt: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PromptResponse {
    pub response: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Image part of a multipart upload, before validation.
#[derive(Debug)]
pub struct ImageUpload {
    pub filename: String,
    pub content_type: Option<String>,
    pub data: axum::body::Bytes,
}
