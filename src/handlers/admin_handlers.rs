use std::sync::Arc;

use axum::{extract::State, http::StatusCode, Json};
use serde_json::json;

use crate::utils::dedup;
use crate::AppState;

/// Scans the whole waitlist collection, deletes every record that duplicates
/// an earlier one by normalized email or phone, and reports counts. Best
/// effort: individual deletion failures are tallied, never fatal; only a
/// failure to read the collection aborts the run.
pub async fn delete_duplicates(
    State(state): State<Arc<AppState>>,
) -> Result<Json<serde_json::Value>, (StatusCode, Json<serde_json::Value>)> {
    let entries = match state.waitlist_repository.list_all().await {
        Ok(entries) => entries,
        Err(e) => {
            tracing::error!("Failed to load waitlist collection: {}", e);
            return Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "success": false, "message": e.to_string() })),
            ));
        }
    };

    let plan = dedup::plan_deletions(&entries);
    let total = plan.total;
    if total == 0 {
        return Ok(Json(json!({
            "success": true,
            "message": "No users found",
            "total": 0,
            "deleted": 0,
            "errors": 0,
            "final": 0
        })));
    }
    if plan.to_delete.is_empty() {
        return Ok(Json(json!({
            "success": true,
            "message": "No duplicates found",
            "total": total,
            "deleted": 0,
            "errors": 0,
            "final": total
        })));
    }

    let mut deleted = 0usize;
    let mut errors = 0usize;
    for id in &plan.to_delete {
        match state.waitlist_repository.delete_entry(id).await {
            Ok(()) => deleted += 1,
            Err(e) => {
                errors += 1;
                tracing::error!("Error deleting waitlist entry {}: {}", id, e);
            }
        }
    }

    tracing::info!(
        "Duplicate resolution pass: {} scanned, {} deleted, {} errors",
        total,
        deleted,
        errors
    );
    Ok(Json(json!({
        "success": true,
        "message": format!("Successfully deleted {} duplicate entries", deleted),
        "total": total,
        "deleted": deleted,
        "errors": errors,
        "final": total - deleted
    })))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StoreError;
    use crate::repositories::record_store::testing::MemStore;
    use crate::repositories::record_store::{Document, MockRecordStore, RecordStore};
    use serde_json::{Map, Value};

    fn waitlist_fields(email: &str, phone: &str) -> Map<String, Value> {
        let mut fields = Map::new();
        fields.insert("email".to_string(), Value::String(email.to_string()));
        fields.insert("phone".to_string(), Value::String(phone.to_string()));
        fields
    }

    #[tokio::test]
    async fn resolver_deletes_newer_duplicate_and_reports_counts() {
        // a@x.com at t=100 duplicates a@x.com at t=50; b@x.com is unique
        let store = Arc::new(MemStore::new());
        store.seed("waitlist", "one", waitlist_fields("a@x.com", "1"), Some(100));
        store.seed("waitlist", "two", waitlist_fields("a@x.com", "2"), Some(50));
        store.seed("waitlist", "three", waitlist_fields("b@x.com", "3"), Some(200));

        let state = crate::AppState::with_store(store.clone());
        let body = delete_duplicates(State(state)).await.unwrap().0;
        assert_eq!(body["success"], Value::Bool(true));
        assert_eq!(body["total"], json!(3));
        assert_eq!(body["deleted"], json!(1));
        assert_eq!(body["errors"], json!(0));
        assert_eq!(body["final"], json!(2));

        let remaining = store.list_all("waitlist").await.unwrap();
        let ids: Vec<&str> = remaining.iter().map(|d| d.id.as_str()).collect();
        assert!(ids.contains(&"two") && ids.contains(&"three"));
    }

    #[tokio::test]
    async fn second_run_finds_no_duplicates() {
        let store = Arc::new(MemStore::new());
        store.seed("waitlist", "one", waitlist_fields("a@x.com", "1"), Some(100));
        store.seed("waitlist", "two", waitlist_fields("a@x.com", "2"), Some(50));

        let state = crate::AppState::with_store(store.clone());
        let first = delete_duplicates(State(state.clone())).await.unwrap().0;
        assert_eq!(first["deleted"], json!(1));

        let second = delete_duplicates(State(state)).await.unwrap().0;
        assert_eq!(second["message"], Value::String("No duplicates found".into()));
        assert_eq!(second["deleted"], json!(0));
        assert_eq!(second["final"], json!(1));
    }

    #[tokio::test]
    async fn empty_collection_short_circuits() {
        let state = crate::AppState::with_store(Arc::new(MemStore::new()));
        let body = delete_duplicates(State(state)).await.unwrap().0;
        assert_eq!(body["message"], Value::String("No users found".into()));
        assert_eq!(body["total"], json!(0));
    }

    #[tokio::test]
    async fn store_failure_aborts_with_no_partial_counts() {
        let mut mock = MockRecordStore::new();
        mock.expect_list_all()
            .returning(|_| Err(StoreError::Unavailable));
        let state = crate::AppState::with_store(Arc::new(mock));
        let (status, body) = delete_duplicates(State(state))
            .await
            .expect_err("store failure must abort");
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body.0["success"], Value::Bool(false));
        assert!(body.0.get("total").is_none());
    }

    #[tokio::test]
    async fn individual_delete_failures_are_tallied_not_fatal() {
        let docs = vec![
            Document {
                id: "keep".to_string(),
                fields: waitlist_fields("a@x.com", ""),
                create_time: Some(1),
            },
            Document {
                id: "gone".to_string(),
                fields: waitlist_fields("a@x.com", ""),
                create_time: Some(2),
            },
            Document {
                id: "stuck".to_string(),
                fields: waitlist_fields("a@x.com", ""),
                create_time: Some(3),
            },
        ];
        let mut mock = MockRecordStore::new();
        mock.expect_list_all().returning(move |_| Ok(docs.clone()));
        mock.expect_delete_by_id().returning(|_, id| {
            if id == "stuck" {
                Err(StoreError::Api {
                    status: 404,
                    message: "already gone".to_string(),
                })
            } else {
                Ok(())
            }
        });
        let state = crate::AppState::with_store(Arc::new(mock));
        let body = delete_duplicates(State(state)).await.unwrap().0;
        assert_eq!(body["success"], Value::Bool(true));
        assert_eq!(body["total"], json!(3));
        assert_eq!(body["deleted"], json!(1));
        assert_eq!(body["errors"], json!(1));
        assert_eq!(body["final"], json!(2));
    }
}
