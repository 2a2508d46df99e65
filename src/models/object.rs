//! Represents one uploaded file as held by the object store.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Metadata record for a stored file.
///
/// The payload bytes live separately; this struct only describes them.
/// `key` is the sole addressing identifier and never changes after insert.
#[derive(Serialize, Deserialize, Clone, FromRow, Debug, PartialEq)]
pub struct StoredObject {
    /// Internal UUID for DB indexing.
    pub id: Uuid,

    /// Public key, e.g. `plum-koala.png`.
    pub key: String,

    /// File name as supplied by the uploading client. Never used for lookup.
    pub original_name: String,

    /// MIME type reported by the client at upload time.
    pub content_type: String,

    /// Full `Content-Disposition` value fixed at upload time.
    pub content_disposition: String,

    /// Size in bytes.
    pub size_bytes: i64,

    /// MD5 hex digest of the payload.
    pub etag: String,

    /// When the object was written.
    pub created_at: DateTime<Utc>,
}
