use super::types::{AskRequest, ErrorResponse, ImageUpload, PromptResponse};
use crate::{Error, llm::CompletionClient, upload::UploadStager};
use axum::{
    Form, async_trait,
    extract::{
        FromRequest, Multipart, Request, State,
        multipart::{MultipartError, MultipartRejection},
    },
    http::{StatusCode, header::CONTENT_TYPE},
    response::Json,
};
use tracing::{error, info, warn};
use uuid::Uuid;

pub const PROMPT_REQUIRED: &str = "Prompt is required";
pub const IMAGE_REQUIRED: &str = "Image is required";
pub const NO_SELECTED_FILE: &str = "No selected file";
pub const INVALID_BODY: &str = "Invalid request body";
pub const INVALID_MULTIPART: &str = "Invalid multipart body";

pub type ApiError = (StatusCode, Json<ErrorResponse>);

#[derive(Clone)]
pub struct AppState {
    pub completion: CompletionClient,
    pub stager: UploadStager,
}

/// Turns a failure into the JSON error envelope, logging what the client
/// does not get to see.
pub fn error_response(request_id: Uuid, err: &Error) -> ApiError {
    let status = err.status_code();
    if status.is_server_error() {
        error!("Request {} failed: {}", request_id, err);
    } else {
        info!("Request {} rejected: {}", request_id, err);
    }

    (
        status,
        Json(ErrorResponse {
            error: err.public_message(),
        }),
    )
}

/// `prompt` from either a JSON or a urlencoded form body.
pub struct PromptInput(pub AskRequest);

#[async_trait]
impl<S> FromRequest<S> for PromptInput
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let is_form = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .is_some_and(|value| {
                value
                    .to_ascii_lowercase()
                    .starts_with("application/x-www-form-urlencoded")
            });

        let parsed = if is_form {
            Form::<AskRequest>::from_request(req, state)
                .await
                .map(|Form(body)| body)
                .map_err(|e| (e.status(), e.body_text()))
        } else {
            Json::<AskRequest>::from_request(req, state)
                .await
                .map(|Json(body)| body)
                .map_err(|e| (e.status(), e.body_text()))
        };

        parsed.map(Self).map_err(|(status, reason)| {
            warn!("Rejected prompt body: {}", reason);
            if status == StatusCode::PAYLOAD_TOO_LARGE {
                let err = Error::PayloadTooLarge;
                return (
                    err.status_code(),
                    Json(ErrorResponse {
                        error: err.public_message(),
                    }),
                );
            }
            (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse {
                    error: INVALID_BODY.to_string(),
                }),
            )
        })
    }
}

pub async fn ask(
    State(state): State<AppState>,
    PromptInput(request): PromptInput,
) -> Result<Json<PromptResponse>, ApiError> {
    let request_id = Uuid::new_v4();
    let prompt = request.prompt.unwrap_or_default();

    if prompt.trim().is_empty() {
        return Err(error_response(request_id, &Error::validation(PROMPT_REQUIRED)));
    }

    info!("Request {}: ask ({} chars)", request_id, prompt.chars().count());

    match state.completion.complete(&prompt, None).await {
        Ok(response) => {
            info!("Request {}: completed", request_id);
            Ok(Json(PromptResponse { response }))
        }
        Err(e) => Err(error_response(request_id, &e)),
    }
}

pub async fn image(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<PromptResponse>, ApiError> {
    let request_id = Uuid::new_v4();

    let mut multipart = multipart.map_err(|rejection| {
        warn!("Request {}: not a multipart body: {}", request_id, rejection);
        error_response(request_id, &Error::validation(INVALID_MULTIPART))
    })?;

    let (upload, prompt) = read_image_form(&mut multipart)
        .await
        .map_err(|e| error_response(request_id, &e))?;

    let upload = match upload {
        Some(upload) if !upload.filename.is_empty() => upload,
        Some(_) => return Err(error_response(request_id, &Error::validation(NO_SELECTED_FILE))),
        None => return Err(error_response(request_id, &Error::validation(IMAGE_REQUIRED))),
    };

    let prompt = prompt.unwrap_or_default();
    if prompt.trim().is_empty() {
        return Err(error_response(request_id, &Error::validation(PROMPT_REQUIRED)));
    }

    info!(
        "Request {}: image '{}' ({} bytes), prompt {} chars",
        request_id,
        upload.filename,
        upload.data.len(),
        prompt.chars().count()
    );

    let staged = state
        .stager
        .stage(&upload.filename, upload.content_type.as_deref(), upload.data)
        .await
        .map_err(|e| error_response(request_id, &e))?;

    match state.completion.complete(&prompt, Some(&staged)).await {
        Ok(response) => {
            info!("Request {}: completed", request_id);
            Ok(Json(PromptResponse { response }))
        }
        Err(e) => Err(error_response(request_id, &e)),
    }
}

/// Collects the `image` file part and the `prompt` text part. Other parts are
/// skipped; when a name repeats, the last one wins.
async fn read_image_form(
    multipart: &mut Multipart,
) -> crate::Result<(Option<ImageUpload>, Option<String>)> {
    let mut upload = None;
    let mut prompt = None;

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("image") => {
                let filename = field.file_name().unwrap_or_default().to_string();
                let content_type = field.content_type().map(str::to_string);
                let data = field.bytes().await.map_err(multipart_error)?;
                upload = Some(ImageUpload {
                    filename,
                    content_type,
                    data,
                });
            }
            Some("prompt") => {
                prompt = Some(field.text().await.map_err(multipart_error)?);
            }
            _ => {}
        }
    }

    Ok((upload, prompt))
}

fn multipart_error(err: MultipartError) -> Error {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        Error::PayloadTooLarge
    } else {
        warn!("Malformed multipart body: {}", err.body_text());
        Error::validation(INVALID_MULTIPART)
    }
}
