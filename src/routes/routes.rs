//! Request classification and the router built on top of it.
//!
//! ## Structure
//! - `GET  /healthz`, `GET /readyz` — probes, mounted directly
//! - everything else goes through [`dispatch`], which classifies the request
//!   with [`Route::classify`] and hands it to exactly one handler:
//!   - `GET /`            — index page
//!   - `GET /upload`      — upload form page
//!   - `*   /api/upload`  — upload (non-POST is rejected by the handler)
//!   - `GET /<word>-<word>[.ext]` — file retrieval
//!   - anything else      — 404 `Not Found`

use crate::{
    errors::AppError,
    handlers::{
        file_handlers::get_file,
        health_handlers::{healthz, readyz},
        upload_handlers::upload,
    },
    services::assets::Page,
    state::AppState,
};
use axum::{
    Router,
    extract::{Request, State},
    http::Method,
    response::{IntoResponse, Response},
    routing::get,
};

/// Where one inbound request is headed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    StaticAsset(Page),
    Upload,
    FileRetrieval(String),
    NotFound,
}

impl Route {
    /// Classify a request by method and path. Total: every pair maps to
    /// exactly one variant.
    ///
    /// `/api/upload` matches for any method so the upload handler can answer
    /// 405. Pages and files only answer GET and HEAD.
    pub fn classify(method: &Method, path: &str) -> Self {
        let readable = matches!(*method, Method::GET | Method::HEAD);
        match path {
            "/api/upload" => Route::Upload,
            "/" if readable => Route::StaticAsset(Page::Index),
            "/upload" if readable => Route::StaticAsset(Page::UploadForm),
            _ if readable => path
                .strip_prefix('/')
                .filter(|key| is_file_key(key))
                .map(|key| Route::FileRetrieval(key.to_string()))
                .unwrap_or(Route::NotFound),
            _ => Route::NotFound,
        }
    }
}

/// True when `key` has the generated shape `[a-z]+-[a-z]+(\.[a-z0-9]+)?`.
pub fn is_file_key(key: &str) -> bool {
    let (stem, ext) = match key.split_once('.') {
        Some((stem, ext)) => (stem, Some(ext)),
        None => (key, None),
    };
    let Some((first, second)) = stem.split_once('-') else {
        return false;
    };

    let is_word = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_lowercase());
    let is_ext = |s: &str| {
        !s.is_empty()
            && s
                .bytes()
                .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit())
    };

    is_word(first) && is_word(second) && ext.is_none_or(is_ext)
}

/// Build the router. Shared state is attached by the caller.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        .fallback(dispatch)
}

/// Single entry point for every non-probe request.
async fn dispatch(State(state): State<AppState>, req: Request) -> Response {
    let route = Route::classify(req.method(), req.uri().path());
    tracing::debug!(method = %req.method(), path = %req.uri().path(), ?route, "routing request");

    match route {
        Route::StaticAsset(page) => state.assets.fetch(page).await,
        Route::Upload => upload(&state, req).await.into_response(),
        Route::FileRetrieval(key) => get_file(&state, &key).await.into_response(),
        Route::NotFound => AppError::NotFound.into_response(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_paths() {
        assert_eq!(
            Route::classify(&Method::GET, "/"),
            Route::StaticAsset(Page::Index)
        );
        assert_eq!(
            Route::classify(&Method::GET, "/upload"),
            Route::StaticAsset(Page::UploadForm)
        );
        assert_eq!(
            Route::classify(&Method::HEAD, "/upload"),
            Route::StaticAsset(Page::UploadForm)
        );
    }

    #[test]
    fn upload_path_matches_every_method() {
        for method in [Method::GET, Method::POST, Method::PUT, Method::DELETE] {
            assert_eq!(Route::classify(&method, "/api/upload"), Route::Upload);
        }
    }

    #[test]
    fn key_paths_route_to_retrieval() {
        assert_eq!(
            Route::classify(&Method::GET, "/plum-koala"),
            Route::FileRetrieval("plum-koala".into())
        );
        assert_eq!(
            Route::classify(&Method::GET, "/plum-koala.mp4"),
            Route::FileRetrieval("plum-koala.mp4".into())
        );
    }

    #[test]
    fn everything_else_is_not_found() {
        for path in [
            "",
            "/plum",
            "/plum-",
            "/-koala",
            "/Plum-koala",
            "/plum-koala-bear",
            "/plum-koala.",
            "/plum-koala.PNG",
            "/plum-koala.tar.gz",
            "/plum_koala",
            "/plum-koala/",
            "/a/plum-koala",
            "/plum-k0ala",
            "/api/upload/",
            "/index.html",
        ] {
            assert_eq!(Route::classify(&Method::GET, path), Route::NotFound, "{path}");
        }
    }

    #[test]
    fn writes_to_read_paths_are_not_found() {
        assert_eq!(Route::classify(&Method::POST, "/"), Route::NotFound);
        assert_eq!(Route::classify(&Method::POST, "/upload"), Route::NotFound);
        assert_eq!(Route::classify(&Method::DELETE, "/plum-koala"), Route::NotFound);
    }

    #[test]
    fn key_shape() {
        assert!(is_file_key("a-b"));
        assert!(is_file_key("plum-koala.7z"));
        assert!(!is_file_key("plum-koala.7z.zip"));
        assert!(!is_file_key("plumkoala"));
    }
}
