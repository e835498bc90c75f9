use std::cmp::Reverse;
use std::sync::Arc;

use crate::error::StoreError;
use crate::models::waitlist_models::{NewPitchSubmission, PitchSubmission};

use super::record_store::RecordStore;

const COLLECTION: &str = "pitches";

pub struct PitchRepository {
    store: Arc<dyn RecordStore>,
}

impl PitchRepository {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self { store }
    }

    pub async fn email_exists(&self, email: &str) -> Result<bool, StoreError> {
        let normalized = email.trim().to_lowercase();
        let matches = self
            .store
            .find_by_field(COLLECTION, "email", &normalized)
            .await?;
        Ok(!matches.is_empty())
    }

    pub async fn create_pitch(
        &self,
        new_pitch: NewPitchSubmission,
    ) -> Result<PitchSubmission, StoreError> {
        let doc = self
            .store
            .insert_one(COLLECTION, None, new_pitch.into_fields())
            .await?;
        Ok(PitchSubmission::from_document(&doc))
    }

    /// All pitches, newest first. Records without a create time sort last.
    pub async fn list_pitches(&self) -> Result<Vec<PitchSubmission>, StoreError> {
        let docs = self.store.list_all(COLLECTION).await?;
        let mut pitches: Vec<PitchSubmission> =
            docs.iter().map(PitchSubmission::from_document).collect();
        pitches.sort_by_key(|p| Reverse(p.created_at.unwrap_or(0)));
        Ok(pitches)
    }
}
