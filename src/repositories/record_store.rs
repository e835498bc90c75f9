use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::error::StoreError;

/// One document in a store collection, with its fields decoded to plain JSON.
#[derive(Debug, Clone)]
pub struct Document {
    pub id: String,
    pub fields: Map<String, Value>,
    /// Store-assigned create time, epoch milliseconds.
    pub create_time: Option<i64>,
}

impl Document {
    pub fn str_field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).and_then(|v| v.as_str())
    }
}

/// The document-style operations this system consumes from the hosted store.
/// The store enforces no uniqueness across fields; callers that need a unique
/// dimension pass a deterministic `document_id` so the insert fails with
/// `AlreadyExists` instead of racing a pre-write existence check.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RecordStore: Send + Sync {
    async fn insert_one(
        &self,
        collection: &str,
        document_id: Option<String>,
        fields: Map<String, Value>,
    ) -> Result<Document, StoreError>;

    async fn find_by_field(
        &self,
        collection: &str,
        field: &str,
        value: &str,
    ) -> Result<Vec<Document>, StoreError>;

    async fn list_all(&self, collection: &str) -> Result<Vec<Document>, StoreError>;

    async fn delete_by_id(&self, collection: &str, id: &str) -> Result<(), StoreError>;
}
