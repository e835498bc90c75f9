use std::sync::Arc;

use axum::{extract::State, http::StatusCode, Json};
use serde_json::json;

use crate::handlers::waitlist_dtos::PitchSubmissionRequest;
use crate::models::waitlist_models::{NewPitchSubmission, PitchSubmission};
use crate::utils::{mailer, validation};
use crate::AppState;

const DUPLICATE_PITCH_MESSAGE: &str =
    "A pitch has already been submitted with this email address.";
const GENERIC_SAVE_FAILURE: &str = "Failed to save your details. Please try again.";
const GENERIC_FETCH_FAILURE: &str = "Failed to fetch pitches. Please try again.";

pub async fn submit_pitch(
    State(state): State<Arc<AppState>>,
    Json(pitch_req): Json<PitchSubmissionRequest>,
) -> Result<Json<serde_json::Value>, (StatusCode, Json<serde_json::Value>)> {
    let errors = validation::validate_pitch(
        &pitch_req.name,
        &pitch_req.email,
        &pitch_req.phone,
        &pitch_req.title,
        &pitch_req.description,
        &pitch_req.url,
    );
    if !errors.is_empty() {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "Validation failed", "errors": errors })),
        ));
    }

    let name = pitch_req.name.trim().to_string();
    let email = pitch_req.email.trim().to_lowercase();
    let title = pitch_req.title.trim().to_string();

    match state.pitch_repository.email_exists(&email).await {
        Ok(true) => {
            return Err((
                StatusCode::CONFLICT,
                Json(json!({ "error": DUPLICATE_PITCH_MESSAGE })),
            ));
        }
        Ok(false) => {}
        Err(e) => {
            tracing::error!("Store error while checking pitch email: {}", e);
            return Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": e.user_message().unwrap_or(GENERIC_SAVE_FAILURE) })),
            ));
        }
    }

    let new_pitch = NewPitchSubmission {
        name: name.clone(),
        email: email.clone(),
        phone: pitch_req.phone.trim().to_string(),
        title: title.clone(),
        description: pitch_req.description.trim().to_string(),
        url: pitch_req.url.trim().to_string(),
    };
    let pitch = match state.pitch_repository.create_pitch(new_pitch).await {
        Ok(pitch) => pitch,
        Err(e) => {
            tracing::error!("Failed to save pitch: {}", e);
            return Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": e.user_message().unwrap_or(GENERIC_SAVE_FAILURE) })),
            ));
        }
    };
    tracing::info!("Saved pitch {}", pitch.id);

    // The write already succeeded; a failed confirmation email is logged
    // inside the mailer and never turns this into a failure.
    let email_sent = mailer::send_pitch_confirmation(&email, &name, &title).await;
    let message = if email_sent {
        "Pitch submitted successfully! A confirmation email is on its way."
    } else {
        "Pitch submitted successfully!"
    };
    Ok(Json(json!({ "success": true, "message": message })))
}

pub async fn list_pitches(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<PitchSubmission>>, (StatusCode, Json<serde_json::Value>)> {
    match state.pitch_repository.list_pitches().await {
        Ok(pitches) => Ok(Json(pitches)),
        Err(e) => {
            tracing::error!("Failed to fetch pitches: {}", e);
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": e.user_message().unwrap_or(GENERIC_FETCH_FAILURE) })),
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::record_store::testing::MemStore;
    use crate::repositories::record_store::RecordStore;
    use serde_json::{Map, Value};

    fn pitch_request() -> PitchSubmissionRequest {
        PitchSubmissionRequest {
            name: "Ada Lovelace".to_string(),
            email: "Ada@Example.com".to_string(),
            phone: "+44 123 4567".to_string(),
            title: "Analytical Engine: The Series".to_string(),
            description: "A ten part documentary about the first computer.".to_string(),
            url: "https://example.com/pitch-deck.pdf".to_string(),
        }
    }

    #[tokio::test]
    async fn pitch_reports_success_even_when_no_email_goes_out() {
        // no mail transport is configured in the test environment, so the
        // confirmation step cannot succeed; the submission still must
        let store = Arc::new(MemStore::new());
        let state = crate::AppState::with_store(store.clone());
        let response = submit_pitch(State(state), Json(pitch_request()))
            .await
            .expect("pitch submission should succeed");
        assert_eq!(response.0["success"], Value::Bool(true));

        let docs = store.list_all("pitches").await.unwrap();
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].str_field("email"), Some("ada@example.com"));
        assert_eq!(docs[0].str_field("type"), Some("url"));
        assert_eq!(docs[0].str_field("status"), Some("pending"));
    }

    #[tokio::test]
    async fn pitch_validation_reports_every_bad_field() {
        let store = Arc::new(MemStore::new());
        let state = crate::AppState::with_store(store.clone());
        let bad = PitchSubmissionRequest {
            name: "A".to_string(),
            email: "not-an-email".to_string(),
            phone: "".to_string(),
            title: "Hi".to_string(),
            description: "short".to_string(),
            url: "ftp://x.com".to_string(),
        };
        let (status, body) = submit_pitch(State(state), Json(bad))
            .await
            .expect_err("validation must fail");
        assert_eq!(status, StatusCode::BAD_REQUEST);
        let errors = body.0["errors"].as_object().unwrap();
        assert_eq!(errors.len(), 6);
        assert!(store.list_all("pitches").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn duplicate_pitch_email_is_rejected() {
        let store = Arc::new(MemStore::new());
        let mut fields = Map::new();
        fields.insert("email".to_string(), Value::String("ada@example.com".into()));
        store.seed("pitches", "existing", fields, Some(100));

        let state = crate::AppState::with_store(store.clone());
        let (status, _) = submit_pitch(State(state), Json(pitch_request()))
            .await
            .expect_err("duplicate pitch email must be rejected");
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(store.list_all("pitches").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn listing_returns_newest_first() {
        let store = Arc::new(MemStore::new());
        for (id, title, ts) in [("a", "First", 100), ("b", "Second", 300), ("c", "Third", 200)] {
            let mut fields = Map::new();
            fields.insert("title".to_string(), Value::String(title.into()));
            store.seed("pitches", id, fields, Some(ts));
        }
        let state = crate::AppState::with_store(store);
        let pitches = list_pitches(State(state)).await.unwrap().0;
        let titles: Vec<&str> = pitches.iter().map(|p| p.title.as_str()).collect();
        assert_eq!(titles, vec!["Second", "Third", "First"]);
    }
}
