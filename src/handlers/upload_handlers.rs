//! Upload lifecycle for `POST /api/upload`:
//! method check, multipart extraction, key generation, disposition, store.

use crate::{
    errors::AppError,
    models::upload::UploadResponse,
    services::{
        disposition::Disposition,
        key_generator::generate_key,
        object_store::{CustomMetadata, HttpMetadata, PutOptions, StoreError},
    },
    state::{AppState, UploadSettings},
};
use anyhow::anyhow;
use axum::{
    Json,
    extract::{FromRequest, Multipart, Request, multipart::MultipartError},
    http::{HeaderMap, Method, StatusCode, header},
    response::{IntoResponse, Response},
};
use bytes::Bytes;

/// Form field that must carry the uploaded file.
pub const FILE_FIELD: &str = "file";

const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// The `file` part of an upload form.
#[derive(Debug)]
pub struct FileUpload {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Bytes,
}

/// Handle one upload request. Writes exactly one object on success and none
/// on any failure path.
pub async fn upload(state: &AppState, req: Request) -> Result<Response, AppError> {
    if req.method() != Method::POST {
        return Err(AppError::MethodNotAllowed);
    }

    let origin = request_origin(&state.upload, &req);
    let mut multipart = Multipart::from_request(req, state)
        .await
        .map_err(|rejection| AppError::UploadFailed(anyhow!("{}", rejection.body_text())))?;

    let file = read_file_field(&mut multipart)
        .await
        .map_err(multipart_error)?
        .ok_or(AppError::MissingFile)?;

    let key = store_file(state, &file).await?;
    tracing::info!(
        key = %key,
        size = file.bytes.len(),
        content_type = %file.content_type,
        "stored upload"
    );

    Ok((
        StatusCode::OK,
        Json(UploadResponse::success(format!("{origin}/{key}"))),
    )
        .into_response())
}

/// Pull the first `file` part that carries a file name.
///
/// Other parts are skipped. A `file` part without a file name is a plain
/// text field and does not count.
pub async fn read_file_field(
    multipart: &mut Multipart,
) -> Result<Option<FileUpload>, MultipartError> {
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }
        let Some(file_name) = field.file_name().map(str::to_string) else {
            continue;
        };
        let content_type = field
            .content_type()
            .filter(|ct| !ct.is_empty())
            .unwrap_or(DEFAULT_CONTENT_TYPE)
            .to_string();
        let bytes = field.bytes().await?;

        return Ok(Some(FileUpload {
            file_name,
            content_type,
            bytes,
        }));
    }
    Ok(None)
}

/// Persist `file` under a freshly generated key, drawing a new key whenever
/// the store reports the current one as taken.
async fn store_file(state: &AppState, file: &FileUpload) -> Result<String, AppError> {
    let disposition = Disposition::classify(&file.content_type);
    let options = PutOptions {
        http_metadata: HttpMetadata {
            content_type: file.content_type.clone(),
            content_disposition: disposition.header_value(&file.file_name),
        },
        custom_metadata: CustomMetadata {
            original_name: file.file_name.clone(),
        },
    };

    let attempts = state.upload.key_attempts.max(1);
    for attempt in 1..=attempts {
        let key = generate_key(&file.file_name);
        match state
            .store
            .put(&key, file.bytes.clone(), options.clone())
            .await
        {
            Ok(receipt) => {
                tracing::debug!(key = %key, etag = %receipt.etag, attempt, "object written");
                return Ok(key);
            }
            Err(StoreError::KeyExists(taken)) => {
                tracing::warn!(key = %taken, attempt, "generated key already in use");
            }
            Err(err) => {
                return Err(AppError::UploadFailed(
                    anyhow::Error::new(err).context(format!("storing {key}")),
                ));
            }
        }
    }

    Err(AppError::UploadFailed(anyhow!(
        "no free key after {} attempts",
        attempts
    )))
}

fn multipart_error(err: MultipartError) -> AppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge
    } else {
        AppError::UploadFailed(anyhow::Error::new(err).context("parsing multipart form"))
    }
}

/// Origin used to build the returned URL.
///
/// Preference order: configured public URL, absolute request URI, `Host`
/// header, then the bind address.
pub fn request_origin(settings: &UploadSettings, req: &Request) -> String {
    if let Some(url) = &settings.public_url {
        return url.clone();
    }

    let uri = req.uri();
    if let (Some(scheme), Some(authority)) = (uri.scheme_str(), uri.authority()) {
        return format!("{scheme}://{authority}");
    }

    host_origin(req.headers()).unwrap_or_else(|| settings.fallback_origin.clone())
}

fn host_origin(headers: &HeaderMap) -> Option<String> {
    headers
        .get(header::HOST)
        .and_then(|value| value.to_str().ok())
        .filter(|host| !host.is_empty())
        .map(|host| format!("http://{host}"))
}
