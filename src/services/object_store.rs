//! Object store seam: the only shared mutable resource in the service.
//!
//! Handlers depend on [`ObjectStore`] and never on a concrete backend, so the
//! SQLite/disk store and the in-memory store are interchangeable.

use crate::models::object::StoredObject;
use async_trait::async_trait;
use axum::http::{HeaderMap, HeaderValue, header};
use bytes::Bytes;
use futures::stream::BoxStream;
use std::{io, sync::Arc};
use thiserror::Error;

/// Streaming payload handed back by [`ObjectStore::get`].
pub type ByteStream = BoxStream<'static, io::Result<Bytes>>;

pub type SharedStore = Arc<dyn ObjectStore>;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("object `{0}` already exists")]
    KeyExists(String),
    #[error("invalid object key")]
    InvalidObjectKey,
    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
    #[error(transparent)]
    Io(#[from] io::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Headers the store replays on every read.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpMetadata {
    pub content_type: String,
    pub content_disposition: String,
}

/// Auxiliary metadata that is stored but never turned into headers.
#[derive(Debug, Clone, PartialEq)]
pub struct CustomMetadata {
    pub original_name: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PutOptions {
    pub http_metadata: HttpMetadata,
    pub custom_metadata: CustomMetadata,
}

/// Result of a successful put.
#[derive(Debug, Clone)]
pub struct PutReceipt {
    pub etag: String,
    pub size_bytes: u64,
}

/// A stored object opened for reading.
pub struct StoredObjectReader {
    pub object: StoredObject,
    pub body: ByteStream,
}

impl StoredObjectReader {
    /// Quoted entity tag suitable for the `ETag` header.
    pub fn http_etag(&self) -> String {
        format!("\"{}\"", self.object.etag)
    }

    /// Copy stored HTTP metadata onto response headers.
    ///
    /// Values that are not valid header text are skipped; the content type
    /// then falls back to `application/octet-stream`.
    pub fn write_http_metadata(&self, headers: &mut HeaderMap) {
        headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_str(&self.object.content_type)
                .unwrap_or_else(|_| HeaderValue::from_static("application/octet-stream")),
        );

        if let Ok(value) = HeaderValue::from_str(&self.object.content_disposition) {
            headers.insert(header::CONTENT_DISPOSITION, value);
        }

        headers.insert(
            header::CONTENT_LENGTH,
            HeaderValue::from(self.object.size_bytes.max(0) as u64),
        );
    }
}

/// Durable key/value blob storage with per-object metadata.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Insert a new object. Fails with [`StoreError::KeyExists`] when `key`
    /// is already taken; existing objects are never overwritten.
    async fn put(&self, key: &str, bytes: Bytes, options: PutOptions) -> StoreResult<PutReceipt>;

    /// Open an object for reading, or `None` if no such key exists.
    async fn get(&self, key: &str) -> StoreResult<Option<StoredObjectReader>>;

    /// Readiness probe used by `/readyz`.
    async fn ready(&self) -> StoreResult<()>;

    /// Short backend name for logs and health output.
    fn name(&self) -> &'static str;
}

/// Etag used by every backend: lowercase MD5 hex of the payload.
pub fn compute_etag(bytes: &[u8]) -> String {
    format!("{:x}", md5::compute(bytes))
}
