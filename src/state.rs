//! Shared state carried by the router into every handler.

use crate::{
    config::AppConfig,
    services::{assets::AssetServer, object_store::SharedStore},
};

#[derive(Clone)]
pub struct AppState {
    pub store: SharedStore,
    pub assets: AssetServer,
    pub upload: UploadSettings,
}

/// Knobs used by the upload lifecycle.
#[derive(Debug, Clone)]
pub struct UploadSettings {
    /// Fixed origin for returned URLs, without a trailing slash.
    pub public_url: Option<String>,
    /// Origin used when neither `public_url` nor a `Host` header is available.
    pub fallback_origin: String,
    /// Fresh keys drawn before giving up on collisions.
    pub key_attempts: usize,
    pub max_upload_bytes: usize,
}

impl UploadSettings {
    pub fn from_config(cfg: &AppConfig) -> Self {
        Self {
            public_url: cfg.public_url.clone(),
            fallback_origin: format!("http://{}", cfg.addr()),
            key_attempts: cfg.key_attempts.max(1),
            max_upload_bytes: cfg.max_upload_bytes,
        }
    }
}

impl AppState {
    pub fn new(store: SharedStore, assets: AssetServer, upload: UploadSettings) -> Self {
        Self {
            store,
            assets,
            upload,
        }
    }
}
