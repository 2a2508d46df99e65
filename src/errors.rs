use crate::models::upload::UploadResponse;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

/// Client-visible message for every masked upload failure.
pub const UPLOAD_FAILED_MESSAGE: &str = "Failed to process upload";

/// Every failure a request can end in. Each variant maps to exactly one
/// response; the `UploadFailed` and `Internal` causes are logged and never
/// sent to the client.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("method not allowed")]
    MethodNotAllowed,
    #[error("no file provided")]
    MissingFile,
    #[error("upload exceeds the configured size limit")]
    PayloadTooLarge,
    #[error("route not found")]
    NotFound,
    #[error("file not found")]
    FileNotFound,
    #[error("upload failed: {0:#}")]
    UploadFailed(anyhow::Error),
    #[error("internal error: {0:#}")]
    Internal(anyhow::Error),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            AppError::MissingFile => StatusCode::BAD_REQUEST,
            AppError::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            AppError::NotFound | AppError::FileNotFound => StatusCode::NOT_FOUND,
            AppError::UploadFailed(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        match self {
            AppError::MethodNotAllowed => (status, "Method Not Allowed").into_response(),
            AppError::MissingFile => (status, "No file provided").into_response(),
            AppError::PayloadTooLarge => {
                (status, Json(UploadResponse::failure("File too large"))).into_response()
            }
            AppError::NotFound => (status, "Not Found").into_response(),
            AppError::FileNotFound => (status, "File Not Found").into_response(),
            AppError::UploadFailed(err) => {
                tracing::error!("Upload error: {:#}", err);
                (status, Json(UploadResponse::failure(UPLOAD_FAILED_MESSAGE))).into_response()
            }
            AppError::Internal(err) => {
                tracing::error!("Internal error: {:#}", err);
                (status, "Internal Server Error").into_response()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statuses_match_taxonomy() {
        assert_eq!(AppError::MethodNotAllowed.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(AppError::MissingFile.status(), StatusCode::BAD_REQUEST);
        assert_eq!(AppError::NotFound.status(), StatusCode::NOT_FOUND);
        assert_eq!(AppError::FileNotFound.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            AppError::UploadFailed(anyhow::anyhow!("disk full")).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn internal_details_stay_out_of_the_response() {
        let response = AppError::UploadFailed(anyhow::anyhow!("secret path /var/x")).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            response.headers()[axum::http::header::CONTENT_TYPE],
            "application/json"
        );
    }
}
