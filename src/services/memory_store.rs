//! In-process object store. Nothing survives a restart.

use super::object_store::{
    ObjectStore, PutOptions, PutReceipt, StoreError, StoreResult, StoredObjectReader, compute_etag,
};
use crate::models::object::StoredObject;
use async_trait::async_trait;
use bytes::Bytes;
use chrono::Utc;
use futures::{StreamExt, stream};
use std::collections::{HashMap, hash_map::Entry};
use tokio::sync::RwLock;
use uuid::Uuid;

#[derive(Default)]
pub struct MemoryObjectStore {
    objects: RwLock<HashMap<String, (StoredObject, Bytes)>>,
}

impl MemoryObjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.objects.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.objects.read().await.is_empty()
    }

    /// Metadata for `key` without opening a body stream.
    pub async fn metadata(&self, key: &str) -> Option<StoredObject> {
        self.objects.read().await.get(key).map(|(obj, _)| obj.clone())
    }
}

#[async_trait]
impl ObjectStore for MemoryObjectStore {
    async fn put(&self, key: &str, bytes: Bytes, options: PutOptions) -> StoreResult<PutReceipt> {
        if key.is_empty() {
            return Err(StoreError::InvalidObjectKey);
        }

        let etag = compute_etag(&bytes);
        let size_bytes = bytes.len() as u64;

        let mut objects = self.objects.write().await;
        match objects.entry(key.to_string()) {
            Entry::Occupied(_) => Err(StoreError::KeyExists(key.to_string())),
            Entry::Vacant(slot) => {
                let object = StoredObject {
                    id: Uuid::new_v4(),
                    key: key.to_string(),
                    original_name: options.custom_metadata.original_name,
                    content_type: options.http_metadata.content_type,
                    content_disposition: options.http_metadata.content_disposition,
                    size_bytes: size_bytes as i64,
                    etag: etag.clone(),
                    created_at: Utc::now(),
                };
                slot.insert((object, bytes));
                Ok(PutReceipt { etag, size_bytes })
            }
        }
    }

    async fn get(&self, key: &str) -> StoreResult<Option<StoredObjectReader>> {
        let objects = self.objects.read().await;
        Ok(objects.get(key).map(|(object, bytes)| StoredObjectReader {
            object: object.clone(),
            body: stream::once(futures::future::ready(Ok(bytes.clone()))).boxed(),
        }))
    }

    async fn ready(&self) -> StoreResult<()> {
        Ok(())
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::object_store::{CustomMetadata, HttpMetadata};
    use futures::TryStreamExt;

    fn options(content_type: &str) -> PutOptions {
        PutOptions {
            http_metadata: HttpMetadata {
                content_type: content_type.into(),
                content_disposition: "inline; filename=\"a.txt\"".into(),
            },
            custom_metadata: CustomMetadata {
                original_name: "a.txt".into(),
            },
        }
    }

    #[tokio::test]
    async fn put_then_get() {
        let store = MemoryObjectStore::new();
        let receipt = store
            .put("plum-koala.txt", Bytes::from_static(b"hi"), options("text/plain"))
            .await
            .unwrap();
        assert_eq!(receipt.size_bytes, 2);
        assert_eq!(receipt.etag, compute_etag(b"hi"));

        let reader = store.get("plum-koala.txt").await.unwrap().unwrap();
        assert_eq!(reader.object.content_type, "text/plain");
        assert_eq!(reader.object.original_name, "a.txt");
        let chunks: Vec<Bytes> = reader.body.try_collect().await.unwrap();
        assert_eq!(chunks.concat(), b"hi");
    }

    #[tokio::test]
    async fn missing_key_is_none() {
        let store = MemoryObjectStore::new();
        assert!(store.get("plum-koala").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn existing_key_is_not_overwritten() {
        let store = MemoryObjectStore::new();
        store
            .put("lion-tiger", Bytes::from_static(b"one"), options("text/plain"))
            .await
            .unwrap();
        let err = store
            .put("lion-tiger", Bytes::from_static(b"two"), options("text/plain"))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::KeyExists(k) if k == "lion-tiger"));

        let reader = store.get("lion-tiger").await.unwrap().unwrap();
        let chunks: Vec<Bytes> = reader.body.try_collect().await.unwrap();
        assert_eq!(chunks.concat(), b"one");
        assert_eq!(store.len().await, 1);
    }
}
