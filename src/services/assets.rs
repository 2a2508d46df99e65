//! Static HTML pages served from `assets_dir`.

use axum::{
    body::Body,
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use std::{io::ErrorKind, path::PathBuf};
use tokio::fs;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Index,
    UploadForm,
}

impl Page {
    pub fn file_name(self) -> &'static str {
        match self {
            Page::Index => "index.html",
            Page::UploadForm => "upload.html",
        }
    }
}

#[derive(Debug, Clone)]
pub struct AssetServer {
    pub root: PathBuf,
}

impl AssetServer {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Resolve `page` to an HTML response, or a plain 404 when the document
    /// is missing.
    pub async fn fetch(&self, page: Page) -> Response {
        let path = self.root.join(page.file_name());
        match fs::read(&path).await {
            Ok(html) => {
                let mut response = Response::new(Body::from(html));
                response.headers_mut().insert(
                    header::CONTENT_TYPE,
                    HeaderValue::from_static("text/html; charset=utf-8"),
                );
                response
            }
            Err(err) => {
                if err.kind() == ErrorKind::NotFound {
                    tracing::warn!("asset {} missing", path.display());
                } else {
                    tracing::error!("failed to read asset {}: {}", path.display(), err);
                }
                (StatusCode::NOT_FOUND, "Not Found").into_response()
            }
        }
    }
}
