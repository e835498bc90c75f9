use std::sync::Arc;

use sha2::{Digest, Sha256};

use crate::error::StoreError;
use crate::models::waitlist_models::{NewWaitlistEntry, WaitlistEntry};

use super::record_store::RecordStore;

const COLLECTION: &str = "waitlist";

pub struct WaitlistRepository {
    store: Arc<dyn RecordStore>,
}

impl WaitlistRepository {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self { store }
    }

    pub fn normalize_email(email: &str) -> String {
        email.trim().to_lowercase()
    }

    /// Deterministic document id for the email dimension. Two concurrent
    /// signups with the same normalized email race to the same id, so the
    /// store rejects the loser instead of storing a duplicate.
    fn entry_document_id(email: &str) -> String {
        hex::encode(Sha256::digest(Self::normalize_email(email).as_bytes()))
    }

    pub async fn email_exists(&self, email: &str) -> Result<bool, StoreError> {
        let normalized = Self::normalize_email(email);
        let matches = self
            .store
            .find_by_field(COLLECTION, "email", &normalized)
            .await?;
        Ok(!matches.is_empty())
    }

    pub async fn phone_exists(&self, phone: &str) -> Result<bool, StoreError> {
        let matches = self
            .store
            .find_by_field(COLLECTION, "phone", phone.trim())
            .await?;
        Ok(!matches.is_empty())
    }

    pub async fn create_entry(
        &self,
        new_entry: NewWaitlistEntry,
    ) -> Result<WaitlistEntry, StoreError> {
        let document_id = Self::entry_document_id(&new_entry.email);
        let doc = self
            .store
            .insert_one(COLLECTION, Some(document_id), new_entry.into_fields())
            .await?;
        Ok(WaitlistEntry::from_document(&doc))
    }

    pub async fn list_all(&self) -> Result<Vec<WaitlistEntry>, StoreError> {
        let docs = self.store.list_all(COLLECTION).await?;
        Ok(docs.iter().map(WaitlistEntry::from_document).collect())
    }

    pub async fn delete_entry(&self, id: &str) -> Result<(), StoreError> {
        self.store.delete_by_id(COLLECTION, id).await
    }
}
