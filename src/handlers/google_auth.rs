use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{Json, Redirect},
};
use oauth2::{
    AuthorizationCode, CsrfToken, PkceCodeChallenge, PkceCodeVerifier, Scope, TokenResponse,
};
use serde::Deserialize;
use serde_json::json;
use time::OffsetDateTime;
use tower_sessions::{
    session::{Id, Record},
    session_store::SessionStore,
};
use uuid::Uuid;

use crate::error::StoreError;
use crate::models::waitlist_models::NewWaitlistEntry;
use crate::utils::{google_profile, mailer};
use crate::AppState;

#[derive(Deserialize)]
pub struct AuthRequest {
    code: String,
    state: String,
}

/// Starts the "quick add with Google" handshake. The PKCE verifier and CSRF
/// token live in a short-lived session record; nothing else is retained.
pub async fn google_login(
    State(state): State<Arc<AppState>>,
) -> Result<Json<serde_json::Value>, (StatusCode, Json<serde_json::Value>)> {
    tracing::info!("Received request to /api/auth/google/login");

    let csrf_token = CsrfToken::new_random();
    let (pkce_challenge, pkce_verifier) = PkceCodeChallenge::new_random_sha256();

    let mut record = Record {
        id: Id(Uuid::new_v4().as_u128() as i128),
        data: Default::default(),
        expiry_date: OffsetDateTime::now_utc() + time::Duration::minutes(15),
    };
    record.data.insert(
        "pkce_verifier".to_string(),
        json!(pkce_verifier.secret().to_string()),
    );
    record.data.insert(
        "csrf_token".to_string(),
        json!(csrf_token.secret().to_string()),
    );

    if let Err(e) = state.session_store.create(&mut record).await {
        tracing::error!("Failed to store handshake record: {}", e);
        return Err((
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": format!("Failed to store handshake record: {}", e) })),
        ));
    }

    let state_token = format!("{}:{}", record.id.0, csrf_token.secret());
    let (auth_url, _) = state
        .google_oauth_client
        .authorize_url(|| CsrfToken::new(state_token.clone()))
        .add_scope(Scope::new("openid".to_string()))
        .add_scope(Scope::new("email".to_string()))
        .add_scope(Scope::new("profile".to_string()))
        .set_pkce_challenge(pkce_challenge)
        .url();

    tracing::info!("Generated auth_url with state: {}", state_token);
    Ok(Json(json!({
        "auth_url": auth_url.to_string(),
        "message": "OAuth flow initiated successfully"
    })))
}

/// Completes the handshake: exchanges the code, fetches the profile once,
/// runs the same capture flow as the form, revokes the token and redirects.
/// No authenticated session survives this handler.
pub async fn google_callback(
    State(state): State<Arc<AppState>>,
    Query(query): Query<AuthRequest>,
) -> Result<Redirect, (StatusCode, Json<serde_json::Value>)> {
    tracing::info!("Callback received with state: {}", query.state);

    let state_parts: Vec<&str> = query.state.split(':').collect();
    if state_parts.len() != 2 {
        tracing::error!("Invalid state format: {}", query.state);
        return Err((
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "Invalid state format" })),
        ));
    }
    let session_id = state_parts[0].parse::<i128>().map_err(|e| {
        tracing::error!("Invalid session ID format: {}", e);
        (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "Invalid session ID format" })),
        )
    })?;
    let session_id = Id(session_id);
    let state_csrf = state_parts[1];

    let record = state
        .session_store
        .load(&session_id)
        .await
        .map_err(|e| {
            tracing::error!("Session store error loading record: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": format!("Session store error: {}", e) })),
            )
        })?
        .ok_or_else(|| {
            tracing::error!("Handshake record missing");
            (
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": "Handshake record not found" })),
            )
        })?;

    let stored_csrf_token = record
        .data
        .get("csrf_token")
        .and_then(|v| v.as_str().map(String::from))
        .ok_or_else(|| {
            tracing::error!("CSRF token missing from handshake record");
            (
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": "CSRF token missing from handshake record" })),
            )
        })?;
    if stored_csrf_token != state_csrf {
        tracing::error!("CSRF token mismatch");
        return Err((
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "CSRF token mismatch" })),
        ));
    }

    let pkce_verifier = record
        .data
        .get("pkce_verifier")
        .and_then(|v| v.as_str().map(|s| PkceCodeVerifier::new(s.to_string())))
        .ok_or_else(|| {
            tracing::error!("PKCE verifier missing from handshake record");
            (
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": "PKCE verifier missing from handshake record" })),
            )
        })?;

    let http_client = reqwest::ClientBuilder::new()
        // Following redirects opens the client up to SSRF vulnerabilities.
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .expect("Client should build");

    tracing::info!("Exchanging code for token");
    let token_result = state
        .google_oauth_client
        .exchange_code(AuthorizationCode::new(query.code))
        .set_pkce_verifier(pkce_verifier)
        .request_async(&http_client)
        .await
        .map_err(|e| {
            tracing::error!("Token exchange failed: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": format!("Token exchange failed: {}", e) })),
            )
        })?;
    let access_token = token_result.access_token().secret().to_string();

    // handshake record is single-use
    if let Err(e) = state.session_store.delete(&session_id).await {
        tracing::error!("Failed to delete handshake record: {}", e);
    }

    let frontend_url = std::env::var("FRONTEND_URL").expect("FRONTEND_URL must be set");

    let profile = match google_profile::fetch_profile(&access_token).await {
        Ok(profile) => profile,
        Err(e) => {
            tracing::error!("Profile fetch failed: {}", e);
            google_profile::revoke_token(&access_token).await;
            return Ok(Redirect::to(&format!("{}/?waitlist=error", frontend_url)));
        }
    };

    let email = profile
        .email
        .as_deref()
        .unwrap_or_default()
        .trim()
        .to_lowercase();
    if email.is_empty() {
        tracing::error!("Provider profile carried no email, cannot capture");
        google_profile::revoke_token(&access_token).await;
        return Ok(Redirect::to(&format!("{}/?waitlist=error", frontend_url)));
    }
    let full_name = profile.name.clone().unwrap_or_default();

    match state.waitlist_repository.email_exists(&email).await {
        Ok(true) => {
            google_profile::revoke_token(&access_token).await;
            return Ok(Redirect::to(&format!("{}/?waitlist=exists", frontend_url)));
        }
        Ok(false) => {}
        Err(e) => {
            tracing::error!("Store error while checking email: {}", e);
            google_profile::revoke_token(&access_token).await;
            return Ok(Redirect::to(&format!("{}/?waitlist=error", frontend_url)));
        }
    }

    let new_entry = NewWaitlistEntry {
        full_name: full_name.clone(),
        email: email.clone(),
        phone: profile.phone_number.clone().unwrap_or_default(),
        user_id: Some(profile.sub.clone()),
        user_email: profile.email.clone(),
        sign_in_method: Some("google".to_string()),
    };
    match state.waitlist_repository.create_entry(new_entry).await {
        Ok(entry) => {
            tracing::info!("Saved waitlist entry {} via Google capture", entry.id);
        }
        Err(StoreError::AlreadyExists) => {
            google_profile::revoke_token(&access_token).await;
            return Ok(Redirect::to(&format!("{}/?waitlist=exists", frontend_url)));
        }
        Err(e) => {
            tracing::error!("Failed to save waitlist entry: {}", e);
            google_profile::revoke_token(&access_token).await;
            return Ok(Redirect::to(&format!("{}/?waitlist=error", frontend_url)));
        }
    }

    mailer::send_waitlist_confirmation(&email, &full_name).await;

    // the immediate "sign out": nothing of the grant survives this request
    google_profile::revoke_token(&access_token).await;

    Ok(Redirect::to(&format!("{}/?waitlist=success", frontend_url)))
}
