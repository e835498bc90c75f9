use dotenvy::dotenv;
use axum::{
    routing::{get, post},
    Router,
};
use oauth2::{
    basic::BasicClient,
    AuthUrl,
    ClientId,
    ClientSecret,
    RedirectUrl,
    TokenUrl,
    EndpointSet,
    EndpointNotSet,
};
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tower_sessions::MemoryStore;
use tracing::Level;
mod handlers {
    pub mod admin_handlers;
    pub mod email_handlers;
    pub mod google_auth;
    pub mod pitch_handlers;
    pub mod waitlist_dtos;
    pub mod waitlist_handlers;
}
mod utils {
    pub mod dedup;
    pub mod email_templates;
    pub mod google_profile;
    pub mod mailer;
    pub mod validation;
}
mod error;
mod models {
    pub mod waitlist_models;
}
mod repositories {
    pub mod firestore;
    pub mod pitch_repository;
    pub mod record_store;
    pub mod waitlist_repository;
}
use handlers::{
    admin_handlers, email_handlers, google_auth, pitch_handlers, waitlist_handlers,
};
use repositories::firestore::FirestoreStore;
use repositories::pitch_repository::PitchRepository;
use repositories::record_store::RecordStore;
use repositories::waitlist_repository::WaitlistRepository;

type GoogleOAuthClient = BasicClient<EndpointSet, EndpointNotSet, EndpointNotSet, EndpointNotSet, EndpointSet>;

async fn health_check() -> &'static str {
    "OK"
}

pub struct AppState {
    waitlist_repository: Arc<WaitlistRepository>,
    pitch_repository: Arc<PitchRepository>,
    google_oauth_client: GoogleOAuthClient,
    session_store: MemoryStore,
}

impl AppState {
    fn new(store: Arc<dyn RecordStore>) -> Self {
        Self {
            waitlist_repository: Arc::new(WaitlistRepository::new(store.clone())),
            pitch_repository: Arc::new(PitchRepository::new(store)),
            google_oauth_client: google_oauth_client_from_env(),
            session_store: MemoryStore::default(),
        }
    }

    #[cfg(test)]
    pub fn with_store(store: Arc<dyn RecordStore>) -> Arc<Self> {
        Arc::new(Self::new(store))
    }
}

fn google_oauth_client_from_env() -> GoogleOAuthClient {
    let server_url = std::env::var("SERVER_URL").unwrap_or_else(|_| "http://localhost:3000".to_string());
    let client_id = std::env::var("GOOGLE_CLIENT_ID").unwrap_or_else(|_| "default-client-id-for-testing".to_string());
    let client_secret = std::env::var("GOOGLE_CLIENT_SECRET").unwrap_or_else(|_| "default-secret-for-testing".to_string());
    BasicClient::new(ClientId::new(client_id))
        .set_client_secret(ClientSecret::new(client_secret))
        .set_auth_uri(AuthUrl::new("https://accounts.google.com/o/oauth2/v2/auth".to_string()).expect("Invalid auth URL"))
        .set_token_uri(TokenUrl::new("https://oauth2.googleapis.com/token".to_string()).expect("Invalid token URL"))
        .set_redirect_uri(RedirectUrl::new(format!("{}/api/auth/google/callback", server_url)).expect("Invalid redirect URL"))
}

pub fn validate_env() {
    let required_vars = ["FIRESTORE_PROJECT_ID", "FRONTEND_URL"];
    for var in required_vars.iter() {
        std::env::var(var).expect(&format!("{} must be set", var));
    }
}

#[tokio::main]
async fn main() {
    dotenv().ok();
    use tracing_subscriber::{fmt, EnvFilter};
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,playitloud_backend=debug"));
    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();
    validate_env();

    let store: Arc<dyn RecordStore> = Arc::new(FirestoreStore::from_env());
    let state = Arc::new(AppState::new(store));

    // Public capture routes. The pitches listing is internal but intentionally
    // unauthenticated, same as the page it feeds.
    let capture_routes = Router::new()
        .route("/api/health", get(health_check))
        .route("/api/waitlist", post(waitlist_handlers::join_waitlist))
        .route("/api/pitch", post(pitch_handlers::submit_pitch))
        .route("/api/pitches", get(pitch_handlers::list_pitches));
    let email_routes = Router::new()
        .route("/api/send-confirmation", post(email_handlers::send_confirmation))
        .route("/api/send-pitch-confirmation", post(email_handlers::send_pitch_confirmation));
    let admin_routes = Router::new()
        .route("/api/delete-duplicates", post(admin_handlers::delete_duplicates));
    let auth_routes = Router::new()
        .route("/api/auth/google/login", get(google_auth::google_login))
        .route("/api/auth/google/callback", get(google_auth::google_callback));

    let app = Router::new()
        .merge(capture_routes)
        .merge(email_routes)
        .merge(admin_routes)
        .merge(auth_routes)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO))
        )
        .layer(
            CorsLayer::new()
                .allow_methods([axum::http::Method::GET, axum::http::Method::POST, axum::http::Method::OPTIONS])
                .allow_origin(AllowOrigin::exact(std::env::var("FRONTEND_URL").unwrap_or_else(|_| "http://localhost:8080".to_string()).parse().expect("Invalid FRONTEND_URL")))
                .allow_headers([
                    axum::http::header::CONTENT_TYPE,
                    axum::http::header::ACCEPT,
                    axum::http::header::ORIGIN,
                ])
        )
        .with_state(state);

    use tokio::net::TcpListener;
    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(3000);
    tracing::info!("Starting server on port {}", port);
    let listener = TcpListener::bind(format!("0.0.0.0:{}", port)).await.unwrap();
    axum::serve(listener, app.into_make_service()).await.unwrap();
}
