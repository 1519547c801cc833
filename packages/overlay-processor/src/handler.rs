use axum::extract::{Multipart, State};
use axum::extract::multipart::MultipartError;
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use bytes::Bytes;

use crate::AppState;
use overlay_core::{CompositeError, OverlayError, TemplateError, UploadFormat};

/// 画像を受け取るマルチパートのフィールド名
const IMAGE_FIELD: &str = "image";

const CONTENT_TYPE_GIF: &str = "image/gif";

pub async fn health() -> impl IntoResponse {
    (StatusCode::OK, "ok")
}

/// アップロードされた画像をテンプレートアニメーションに合成して返す
pub async fn overlay(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Response, AppError> {
    let (filename, data) = read_image_field(&mut multipart).await?;
    let format = UploadFormat::from_filename(&filename)?;

    tracing::info!(filename = %filename, bytes = data.len(), ?format, "compositing upload");

    let output = tokio::task::spawn_blocking(move || {
        crate::transform::render(&data, format, &state)
    })
    .await
    .map_err(|e| AppError::Internal(format!("render task failed: {e}")))??;

    Ok((
        StatusCode::OK,
        [(header::CONTENT_TYPE, CONTENT_TYPE_GIF)],
        output,
    )
        .into_response())
}

/// `image` フィールドのファイル名と中身を取り出す
async fn read_image_field(multipart: &mut Multipart) -> Result<(String, Bytes), AppError> {
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(IMAGE_FIELD) {
            continue;
        }

        let filename = field.file_name().unwrap_or_default().to_string();
        let data = field.bytes().await?;
        return Ok((filename, data));
    }

    Err(AppError::BadRequest(format!(
        "missing multipart field '{IMAGE_FIELD}'"
    )))
}

#[derive(Debug)]
pub enum AppError {
    BadRequest(String),
    Upload(StatusCode, String),
    Internal(String),
}

impl From<MultipartError> for AppError {
    fn from(err: MultipartError) -> Self {
        let status = err.status();
        tracing::warn!(status = %status, error = %err.body_text(), "failed to read multipart upload");
        AppError::Upload(status, err.body_text())
    }
}

impl From<OverlayError> for AppError {
    fn from(err: OverlayError) -> Self {
        match err {
            OverlayError::Validation(msg) => {
                tracing::warn!(error = %msg, "validation error");
                AppError::BadRequest(msg)
            }
            OverlayError::UnsupportedFormat(msg) => {
                tracing::warn!(error = %msg, "unsupported upload format");
                AppError::BadRequest(msg)
            }
            OverlayError::Template(template_err) => template_err.into(),
            OverlayError::Composite(composite_err) => composite_err.into(),
        }
    }
}

impl From<TemplateError> for AppError {
    fn from(err: TemplateError) -> Self {
        tracing::error!(error = %err, "template error while serving request");
        AppError::Internal(err.to_string())
    }
}

impl From<CompositeError> for AppError {
    fn from(err: CompositeError) -> Self {
        match err {
            CompositeError::InvalidInputImage(msg) => {
                tracing::warn!(error = %msg, "invalid input image");
                AppError::BadRequest(msg)
            }
            CompositeError::InvalidParams(msg) => {
                tracing::warn!(error = %msg, "invalid overlay parameters");
                AppError::BadRequest(msg)
            }
            CompositeError::ResolutionTooLarge { width, height } => {
                tracing::warn!(width = %width, height = %height, "image resolution too large");
                AppError::BadRequest(format!("image resolution {width}x{height} is too large"))
            }
            CompositeError::CoordinateTableMismatch { frames, anchors } => {
                tracing::error!(frames, anchors, "coordinate table does not match template");
                AppError::Internal(format!(
                    "coordinate table has {anchors} anchors for {frames} frames"
                ))
            }
            CompositeError::EncodeFailed(msg) => {
                tracing::error!(error = %msg, "GIF encoding failed");
                AppError::Internal(msg)
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::Upload(status, msg) => (status, msg),
            AppError::Internal(msg) => {
                tracing::error!(error = %msg, "internal server error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal server error".to_string(),
                )
            }
        };

        let body = serde_json::json!({ "error": message });
        (status, axum::Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status_of(err: impl Into<AppError>) -> StatusCode {
        err.into().into_response().status()
    }

    #[test]
    fn test_client_errors() {
        assert_eq!(
            status_of(OverlayError::UnsupportedFormat("gif".to_string())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(CompositeError::InvalidInputImage("truncated".to_string())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(CompositeError::ResolutionTooLarge {
                width: 100_000,
                height: 100_000
            }),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn test_server_errors() {
        assert_eq!(
            status_of(CompositeError::EncodeFailed("io".to_string())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            status_of(CompositeError::CoordinateTableMismatch {
                frames: 10,
                anchors: 9
            }),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            status_of(TemplateError::InvalidTemplate("no frames".to_string())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_upload_error_keeps_status() {
        let err = AppError::Upload(StatusCode::PAYLOAD_TOO_LARGE, "too big".to_string());
        assert_eq!(err.into_response().status(), StatusCode::PAYLOAD_TOO_LARGE);
    }
}
