/// Request body parsing for user submissions
use crate::error::{Result, ServerError};
use axum::{
    body::Bytes,
    extract::rejection::BytesRejection,
    http::{header, HeaderMap, StatusCode},
};
use bytes::BytesMut;
use roster_core::{
    validation::{avatar_size_error, avatar_type_error, FieldError, MAX_AVATAR_BYTES},
    ImageType, UserInput, ValidationErrors,
};

/// Name of the multipart file field carrying the avatar
pub const AVATAR_FIELD: &str = "avatar";

/// An accepted avatar image, not yet written to disk
#[derive(Debug, Clone)]
pub struct AvatarUpload {
    pub image_type: ImageType,
    pub data: Bytes,
}

/// Parsed create/update body.
///
/// A rejected avatar does not fail parsing; it is reported next to the field
/// validation errors so the client sees everything at once.
#[derive(Debug, Default)]
pub struct Submission {
    pub input: UserInput,
    pub avatar: Option<AvatarUpload>,
    pub avatar_error: Option<FieldError>,
}

impl Submission {
    /// Combine field validation with the avatar check.
    ///
    /// Field errors win: when there are any, the avatar error joins that
    /// list. Otherwise an avatar error alone is an upload failure.
    pub fn checked<T>(&self, validated: std::result::Result<T, ValidationErrors>) -> Result<T> {
        match (validated, &self.avatar_error) {
            (Ok(value), None) => Ok(value),
            (Ok(_), Some(error)) => Err(ServerError::Upload(error.clone())),
            (Err(mut errors), avatar_error) => {
                if let Some(error) = avatar_error {
                    errors.push(error.clone());
                }
                Err(ServerError::Validation(errors))
            }
        }
    }
}

/// Unwrap the buffered body, mapping the size limit to 413
pub fn buffered(body: std::result::Result<Bytes, BytesRejection>) -> Result<Bytes> {
    body.map_err(|rejection| {
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            ServerError::PayloadTooLarge
        } else {
            ServerError::BadRequest(rejection.body_text())
        }
    })
}

/// Parse a multipart or JSON submission. An empty body is an empty input.
pub async fn parse_submission(headers: &HeaderMap, body: Bytes) -> Result<Submission> {
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|h| h.to_str().ok())
        .unwrap_or("");

    if content_type.starts_with("multipart/form-data") {
        return parse_multipart(content_type, body).await;
    }

    if body.is_empty() {
        return Ok(Submission::default());
    }

    if content_type.starts_with("application/json") {
        let input: UserInput = serde_json::from_slice(&body)
            .map_err(|e| ServerError::BadRequest(format!("Invalid JSON body: {e}")))?;
        return Ok(Submission {
            input,
            ..Submission::default()
        });
    }

    Err(ServerError::BadRequest(
        "Expected multipart/form-data or application/json".to_string(),
    ))
}

async fn parse_multipart(content_type: &str, body: Bytes) -> Result<Submission> {
    let boundary = multer::parse_boundary(content_type)
        .map_err(|_| ServerError::BadRequest("Missing boundary".to_string()))?;

    // Convert Bytes to a stream for multer
    let stream = futures_util::stream::once(async move { Ok::<_, std::io::Error>(body) });
    let mut multipart = multer::Multipart::new(stream, boundary);

    let mut submission = Submission::default();

    while let Some(mut field) = multipart
        .next_field()
        .await
        .map_err(|e| ServerError::BadRequest(format!("Failed to parse multipart: {e}")))?
    {
        let name = field.name().unwrap_or("").to_string();

        if let Some(file_name) = field.file_name().map(str::to_string) {
            // Browsers send an empty, unnamed part when no file was chosen
            if name != AVATAR_FIELD || file_name.is_empty() || submission.avatar.is_some() {
                continue;
            }

            let declared = field
                .content_type()
                .map(|m| m.essence_str().to_string())
                .filter(|m| m != "application/octet-stream");
            let mime = declared
                .or_else(|| mime_guess::from_path(&file_name).first_raw().map(str::to_string))
                .unwrap_or_default();

            let Some(image_type) = ImageType::from_mime(&mime) else {
                tracing::debug!(file = %file_name, mime = %mime, "Rejected avatar type");
                submission.avatar_error = Some(avatar_type_error());
                continue;
            };

            let mut data = BytesMut::new();
            let mut oversized = false;
            while let Some(chunk) = field
                .chunk()
                .await
                .map_err(|e| ServerError::BadRequest(format!("Failed to read file: {e}")))?
            {
                if data.len() + chunk.len() > MAX_AVATAR_BYTES {
                    oversized = true;
                    break;
                }
                data.extend_from_slice(&chunk);
            }

            if oversized {
                tracing::debug!(file = %file_name, "Rejected oversized avatar");
                submission.avatar_error = Some(avatar_size_error());
            } else if !data.is_empty() {
                submission.avatar = Some(AvatarUpload {
                    image_type,
                    data: data.freeze(),
                });
            }
            continue;
        }

        let value = field
            .text()
            .await
            .map_err(|e| ServerError::BadRequest(format!("Failed to read field {name}: {e}")))?;
        if !submission.input.set(&name, value) {
            tracing::debug!(field = %name, "Ignoring unknown form field");
        }
    }

    Ok(submission)
}
