//! Anonymous file sharing: uploads are stored under short word keys such as
//! `plum-koala.png` and served back from `/<key>`.

pub mod config;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;

use axum::{Router, extract::DefaultBodyLimit};
use state::AppState;

/// Build the complete application with its request body limit applied.
pub fn app(state: AppState) -> Router {
    let limit = state.upload.max_upload_bytes;
    routes::routes::routes()
        .layer(DefaultBodyLimit::max(limit))
        .with_state(state)
}
