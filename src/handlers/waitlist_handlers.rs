use std::sync::Arc;

use axum::{extract::State, http::StatusCode, Json};
use serde_json::json;

use crate::error::StoreError;
use crate::handlers::waitlist_dtos::WaitlistSignupRequest;
use crate::models::waitlist_models::NewWaitlistEntry;
use crate::utils::{mailer, validation};
use crate::AppState;

const DUPLICATE_EMAIL_MESSAGE: &str =
    "This email is already registered. Please use a different email address.";
const DUPLICATE_PHONE_MESSAGE: &str =
    "This phone number is already registered. Please use a different phone number.";
const GENERIC_SAVE_FAILURE: &str = "Failed to save your details. Please try again.";

pub async fn join_waitlist(
    State(state): State<Arc<AppState>>,
    Json(signup_req): Json<WaitlistSignupRequest>,
) -> Result<Json<serde_json::Value>, (StatusCode, Json<serde_json::Value>)> {
    let errors =
        validation::validate_waitlist(&signup_req.full_name, &signup_req.email, &signup_req.phone);
    if !errors.is_empty() {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "Validation failed", "errors": errors })),
        ));
    }

    let full_name = signup_req.full_name.trim().to_string();
    let email = signup_req.email.trim().to_lowercase();
    let phone = signup_req.phone.trim().to_string();

    // Advisory pre-write checks; the conditional insert below is what closes
    // the race on the email dimension.
    match state.waitlist_repository.email_exists(&email).await {
        Ok(true) => {
            return Err((
                StatusCode::CONFLICT,
                Json(json!({ "error": DUPLICATE_EMAIL_MESSAGE })),
            ));
        }
        Ok(false) => {}
        Err(e) => {
            tracing::error!("Store error while checking email: {}", e);
            return Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": e.user_message().unwrap_or(GENERIC_SAVE_FAILURE) })),
            ));
        }
    }
    match state.waitlist_repository.phone_exists(&phone).await {
        Ok(true) => {
            return Err((
                StatusCode::CONFLICT,
                Json(json!({ "error": DUPLICATE_PHONE_MESSAGE })),
            ));
        }
        Ok(false) => {}
        Err(e) => {
            tracing::error!("Store error while checking phone: {}", e);
            return Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": e.user_message().unwrap_or(GENERIC_SAVE_FAILURE) })),
            ));
        }
    }

    let new_entry = NewWaitlistEntry {
        full_name: full_name.clone(),
        email: email.clone(),
        phone,
        user_id: None,
        user_email: None,
        sign_in_method: None,
    };
    let entry = match state.waitlist_repository.create_entry(new_entry).await {
        Ok(entry) => entry,
        Err(StoreError::AlreadyExists) => {
            // lost the race to a concurrent signup with the same email
            return Err((
                StatusCode::CONFLICT,
                Json(json!({ "error": DUPLICATE_EMAIL_MESSAGE })),
            ));
        }
        Err(e) => {
            tracing::error!("Failed to save waitlist entry: {}", e);
            return Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": e.user_message().unwrap_or(GENERIC_SAVE_FAILURE) })),
            ));
        }
    };
    tracing::info!("Saved waitlist entry {}", entry.id);

    // The write already succeeded; email failure must not surface as one.
    let email_sent = mailer::send_waitlist_confirmation(&email, &full_name).await;
    let message = if email_sent {
        "Success! Your data has been saved and a confirmation email has been sent to your inbox. We'll be in touch soon!"
    } else {
        "Success! Your data has been saved to our waitlist. We'll be in touch soon!"
    };
    Ok(Json(json!({ "success": true, "message": message })))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::record_store::testing::MemStore;
    use crate::repositories::record_store::RecordStore;
    use serde_json::{Map, Value};

    fn signup(full_name: &str, email: &str, phone: &str) -> WaitlistSignupRequest {
        WaitlistSignupRequest {
            full_name: full_name.to_string(),
            email: email.to_string(),
            phone: phone.to_string(),
        }
    }

    #[tokio::test]
    async fn signup_writes_entry_and_reports_success() {
        let store = Arc::new(MemStore::new());
        let state = crate::AppState::with_store(store.clone());
        let response = join_waitlist(
            State(state),
            Json(signup("Ada Lovelace", "  Ada@Example.com ", "+44 123456")),
        )
        .await
        .expect("signup should succeed");
        assert_eq!(response.0["success"], Value::Bool(true));

        let docs = store.list_all("waitlist").await.unwrap();
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].str_field("email"), Some("ada@example.com"));
        assert_eq!(docs[0].str_field("fullName"), Some("Ada Lovelace"));
    }

    #[tokio::test]
    async fn duplicate_email_is_rejected_without_writing() {
        let store = Arc::new(MemStore::new());
        let mut fields = Map::new();
        fields.insert("email".to_string(), Value::String("ada@example.com".into()));
        fields.insert("phone".to_string(), Value::String("+1 555".into()));
        store.seed("waitlist", "existing", fields, Some(100));

        let state = crate::AppState::with_store(store.clone());
        let (status, body) = join_waitlist(
            State(state),
            Json(signup("Ada", "ada@example.com", "+44 999999")),
        )
        .await
        .expect_err("duplicate email must be rejected");
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body.0["error"], Value::String(DUPLICATE_EMAIL_MESSAGE.into()));
        assert_eq!(store.list_all("waitlist").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn duplicate_phone_is_rejected_without_writing() {
        let store = Arc::new(MemStore::new());
        let mut fields = Map::new();
        fields.insert("email".to_string(), Value::String("other@example.com".into()));
        fields.insert("phone".to_string(), Value::String("+44 999999".into()));
        store.seed("waitlist", "existing", fields, Some(100));

        let state = crate::AppState::with_store(store.clone());
        let (status, _) = join_waitlist(
            State(state),
            Json(signup("Ada", "ada@example.com", "+44 999999")),
        )
        .await
        .expect_err("duplicate phone must be rejected");
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(store.list_all("waitlist").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn invalid_fields_are_all_reported_before_any_write() {
        let store = Arc::new(MemStore::new());
        let state = crate::AppState::with_store(store.clone());
        let (status, body) = join_waitlist(State(state), Json(signup("", "nope", "")))
            .await
            .expect_err("validation must fail");
        assert_eq!(status, StatusCode::BAD_REQUEST);
        let errors = body.0["errors"].as_object().unwrap();
        assert_eq!(errors.len(), 3);
        assert!(store.list_all("waitlist").await.unwrap().is_empty());
    }
}
