//! File retrieval: `GET /<word>-<word>[.ext]`.
//! Streams object bodies to avoid buffering in memory.

use crate::{errors::AppError, state::AppState};
use axum::{
    body::Body,
    http::{HeaderValue, StatusCode, header},
    response::Response,
};

/// Look `key` up in the store and stream it back with its stored headers.
///
/// The whole body is always returned; there is no range or conditional-GET
/// handling.
pub async fn get_file(state: &AppState, key: &str) -> Result<Response, AppError> {
    let reader = state
        .store
        .get(key)
        .await
        .map_err(|err| AppError::Internal(anyhow::Error::new(err).context(format!("fetching {key}"))))?
        .ok_or(AppError::FileNotFound)?;

    tracing::debug!(
        key,
        size = reader.object.size_bytes,
        content_type = %reader.object.content_type,
        "serving file"
    );

    let mut response = Response::new(Body::empty());
    *response.status_mut() = StatusCode::OK;
    reader.write_http_metadata(response.headers_mut());
    if let Ok(etag) = HeaderValue::from_str(&reader.http_etag()) {
        response.headers_mut().insert(header::ETAG, etag);
    }
    *response.body_mut() = Body::from_stream(reader.body);

    Ok(response)
}
