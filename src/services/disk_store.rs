//! src/services/disk_store.rs
//!
//! DiskObjectStore — SQLite for object metadata and local disk for payloads,
//! sharded beneath `base_path/{shard}/{shard}/{key}`. Keys are insert-only:
//! the `objects.key` unique constraint is what turns a generated-key
//! collision into [`StoreError::KeyExists`] instead of a silent overwrite.

use super::object_store::{
    ObjectStore, PutOptions, PutReceipt, StoreError, StoreResult, StoredObjectReader,
};
use crate::models::object::StoredObject;
use async_trait::async_trait;
use bytes::Bytes;
use chrono::Utc;
use futures::StreamExt;
use md5::Context;
use sqlx::SqlitePool;
use std::{
    io::{self, ErrorKind},
    path::{Path, PathBuf},
    sync::Arc,
};
use tokio::{
    fs::{self, File},
    io::AsyncWriteExt,
};
use tokio_util::io::ReaderStream;
use tracing::debug;
use uuid::Uuid;

const MAX_OBJECT_KEY_LEN: usize = 1024;

/// Schema applied by [`DiskObjectStore::migrate`].
pub const INIT_MIGRATION: &str = include_str!("../../migrations/0001_init.sql");

#[derive(Clone)]
pub struct DiskObjectStore {
    /// Shared SQLite connection pool used for metadata operations.
    pub db: Arc<SqlitePool>,

    /// Base directory on disk where object payloads are stored.
    pub base_path: PathBuf,
}

impl DiskObjectStore {
    pub fn new(db: Arc<SqlitePool>, base_path: impl Into<PathBuf>) -> Self {
        Self {
            db,
            base_path: base_path.into(),
        }
    }

    /// Apply the embedded schema. Every statement is idempotent.
    pub async fn migrate(db: &SqlitePool) -> StoreResult<()> {
        let statements = INIT_MIGRATION
            .split(';')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>();

        tracing::info!("Running {} migration statements...", statements.len());

        for stmt in statements {
            debug!("Executing migration SQL: {}", stmt);
            sqlx::query(stmt).execute(db).await?;
        }
        Ok(())
    }

    /// Reject keys that could escape `base_path`.
    fn ensure_key_safe(key: &str) -> StoreResult<()> {
        if key.is_empty() || key.len() > MAX_OBJECT_KEY_LEN {
            return Err(StoreError::InvalidObjectKey);
        }
        if key.contains('/') || key.contains("..") || key.starts_with('.') {
            return Err(StoreError::InvalidObjectKey);
        }
        if key
            .bytes()
            .any(|b| b.is_ascii_control() || b == b'\\' || b == b'\0')
        {
            return Err(StoreError::InvalidObjectKey);
        }
        Ok(())
    }

    /// Two-level shard directories from MD5(key), as lowercase hex (00–ff).
    fn object_shards(key: &str) -> (String, String) {
        let digest = md5::compute(key);
        (format!("{:02x}", digest[0]), format!("{:02x}", digest[1]))
    }

    fn object_path(&self, key: &str) -> PathBuf {
        let (shard_a, shard_b) = Self::object_shards(key);
        let mut path = self.base_path.clone();
        path.push(shard_a);
        path.push(shard_b);
        path.push(key);
        path
    }

    async fn fetch_object(&self, key: &str) -> StoreResult<Option<StoredObject>> {
        let row = sqlx::query_as::<_, StoredObject>(
            "SELECT id, key, original_name, content_type, content_disposition,
                    size_bytes, etag, created_at
             FROM objects WHERE key = ?",
        )
        .bind(key)
        .fetch_optional(&*self.db)
        .await?;
        Ok(row)
    }

    /// Write `bytes` to a fresh temp file under `parent`, fsynced.
    async fn write_temp(parent: &Path, bytes: &[u8]) -> StoreResult<PathBuf> {
        let tmp_path = parent.join(format!(".tmp-{}", Uuid::new_v4()));
        let result = async {
            let mut file = File::create(&tmp_path).await?;
            file.write_all(bytes).await?;
            file.flush().await?;
            file.sync_all().await
        }
        .await;

        match result {
            Ok(()) => Ok(tmp_path),
            Err(err) => {
                let _ = fs::remove_file(&tmp_path).await;
                Err(StoreError::Io(err))
            }
        }
    }

    async fn delete_row(&self, id: Uuid) {
        if let Err(err) = sqlx::query("DELETE FROM objects WHERE id = ?")
            .bind(id)
            .execute(&*self.db)
            .await
        {
            debug!("failed to roll back metadata row {}: {}", id, err);
        }
    }
}

#[async_trait]
impl ObjectStore for DiskObjectStore {
    /// - Writes the payload to a temp file and fsyncs it.
    /// - Inserts the metadata row; a unique violation means the key is taken.
    /// - Renames the temp file into place, rolling the row back on failure.
    async fn put(&self, key: &str, bytes: Bytes, options: PutOptions) -> StoreResult<PutReceipt> {
        Self::ensure_key_safe(key)?;

        let file_path = self.object_path(key);
        let parent = file_path.parent().map(Path::to_path_buf).ok_or_else(|| {
            StoreError::Io(io::Error::new(
                ErrorKind::Other,
                "object path missing parent directory",
            ))
        })?;
        fs::create_dir_all(&parent).await?;

        let mut digest = Context::new();
        digest.consume(&bytes);
        let etag = format!("{:x}", digest.compute());
        let size_bytes = bytes.len() as i64;

        let tmp_path = Self::write_temp(&parent, &bytes).await?;

        let id = Uuid::new_v4();
        let insert = sqlx::query(
            "INSERT INTO objects (
                id, key, original_name, content_type, content_disposition,
                size_bytes, etag, created_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(id)
        .bind(key)
        .bind(&options.custom_metadata.original_name)
        .bind(&options.http_metadata.content_type)
        .bind(&options.http_metadata.content_disposition)
        .bind(size_bytes)
        .bind(&etag)
        .bind(Utc::now())
        .execute(&*self.db)
        .await;

        if let Err(err) = insert {
            let _ = fs::remove_file(&tmp_path).await;
            return Err(if is_unique_violation(&err) {
                StoreError::KeyExists(key.to_string())
            } else {
                StoreError::Sqlx(err)
            });
        }

        if let Err(err) = fs::rename(&tmp_path, &file_path).await {
            let _ = fs::remove_file(&tmp_path).await;
            self.delete_row(id).await;
            return Err(StoreError::Io(err));
        }

        debug!("stored {} at {}", key, file_path.display());
        Ok(PutReceipt {
            etag,
            size_bytes: size_bytes as u64,
        })
    }

    /// Returns `None` when the row is missing or the payload file is gone.
    async fn get(&self, key: &str) -> StoreResult<Option<StoredObjectReader>> {
        if Self::ensure_key_safe(key).is_err() {
            return Ok(None);
        }
        let Some(object) = self.fetch_object(key).await? else {
            return Ok(None);
        };

        let file = match File::open(self.object_path(key)).await {
            Ok(file) => file,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                debug!("metadata for {} present but payload missing", key);
                return Ok(None);
            }
            Err(err) => return Err(StoreError::Io(err)),
        };

        Ok(Some(StoredObjectReader {
            object,
            body: ReaderStream::new(file).boxed(),
        }))
    }

    /// Runs `SELECT 1` and a write/read/delete round trip under `base_path`.
    async fn ready(&self) -> StoreResult<()> {
        sqlx::query_scalar::<_, i64>("SELECT 1")
            .fetch_one(&*self.db)
            .await?;

        fs::create_dir_all(&self.base_path).await?;
        let tmp_path = self.base_path.join(format!(".readyz-{}", Uuid::new_v4()));
        fs::write(&tmp_path, b"readyz").await?;
        let read_back = fs::read(&tmp_path).await;
        let _ = fs::remove_file(&tmp_path).await;
        if read_back? != b"readyz" {
            return Err(StoreError::Io(io::Error::new(
                ErrorKind::Other,
                "file content mismatch",
            )));
        }
        Ok(())
    }

    fn name(&self) -> &'static str {
        "disk"
    }
}

/// Return true if SQLx error indicates a unique constraint violation.
fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(
        err,
        sqlx::Error::Database(db_err) if db_err.message().to_ascii_lowercase().contains("unique")
    )
}
