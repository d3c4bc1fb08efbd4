//! HTTP API for BiasLens
//!
//! Endpoints:
//! - GET /health - Health check
//! - POST /analyze - Analyze text (optionally saved to a user's history)
//! - GET /history/{user_id} - List history, newest first
//! - DELETE /history/{user_id}/{id} - Delete one entry
//! - PUT /history/{user_id}/{id}/notes - Attach notes to an entry
//! - GET /analytics/{user_id} - Aggregate statistics
//! - POST /auth/login, /auth/signup, /auth/logout - Mock auth

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{delete, get, post, put},
    Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;

use crate::core::analytics::summarize_history;
use crate::core::auth::{AuthService, Subscription};
use crate::core::history::HistoryService;
use crate::core::store::KeyValueStore;
use crate::core::Analyzer;
use crate::types::{AnalysisResult, HistoryItem, User, UserAnalytics};
use crate::BiasLensError;

/// App state
pub struct AppState {
    pub analyzer: Analyzer,
    pub history: HistoryService,
    pub auth: AuthService,
    /// Logs auth changes for as long as the server lives
    _auth_log: Subscription,
}

impl AppState {
    /// History and auth share `store`
    pub fn new(analyzer: Analyzer, store: Arc<dyn KeyValueStore>) -> Self {
        let auth = AuthService::new(store.clone());
        let auth_log = auth.on_auth_state_change(|user| match user {
            Some(user) => info!(user_id = %user.id, "auth state changed: signed in"),
            None => info!("auth state changed: signed out"),
        });
        Self {
            analyzer,
            history: HistoryService::new(store),
            auth,
            _auth_log: auth_log,
        }
    }
}

/// Analyze request
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeRequest {
    pub text: String,
    #[serde(default)]
    pub user_id: Option<String>,
}

/// Notes request
#[derive(Debug, Deserialize)]
pub struct NotesRequest {
    pub notes: String,
}

/// Login / signup request
#[derive(Debug, Deserialize)]
pub struct CredentialsRequest {
    pub email: String,
    pub password: String,
}

/// Health response
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub provider_enabled: bool,
}

/// Error body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl IntoResponse for BiasLensError {
    fn into_response(self) -> Response {
        let status = match &self {
            BiasLensError::InvalidInput(_)
            | BiasLensError::PasswordTooShort(_)
            | BiasLensError::EmptyEmail => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(ErrorResponse { error: self.to_string() })).into_response()
    }
}

/// Create the API router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/analyze", post(analyze))
        .route("/history/:user_id", get(list_history))
        .route("/analytics/:user_id", get(history_analytics))
        .route("/history/:user_id/:id", delete(delete_history_item))
        .route("/history/:user_id/:id/notes", put(update_notes))
        .route("/auth/login", post(login))
        .route("/auth/signup", post(signup))
        .route("/auth/logout", post(logout))
        .with_state(Arc::new(state))
}

/// Run a store-backed call off the async workers; `FileStore` does blocking IO
async fn blocking<T, F>(state: &Arc<AppState>, f: F) -> Result<T, BiasLensError>
where
    F: FnOnce(&AppState) -> crate::Result<T> + Send + 'static,
    T: Send + 'static,
{
    let state = Arc::clone(state);
    tokio::task::spawn_blocking(move || f(&*state))
        .await
        .map_err(|e| BiasLensError::Storage(format!("storage task failed: {}", e)))?
}

/// Health check endpoint
async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: crate::VERSION.to_string(),
        provider_enabled: state.analyzer.provider_enabled(),
    })
}

/// Analyze text, saving to history when a user id is given
async fn analyze(
    State(state): State<Arc<AppState>>,
    Json(req): Json<AnalyzeRequest>,
) -> Result<Json<AnalysisResult>, BiasLensError> {
    if req.text.trim().is_empty() {
        return Err(BiasLensError::InvalidInput("text must not be empty".to_string()));
    }

    let result = state.analyzer.analyze(&req.text).await;

    if let Some(user_id) = req.user_id {
        let item = HistoryItem::new(result.clone(), req.text);
        blocking(&state, move |s| s.history.save(&user_id, item)).await?;
    }

    Ok(Json(result))
}

/// List a user's history
async fn list_history(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
) -> Result<Json<Vec<HistoryItem>>, BiasLensError> {
    let items = blocking(&state, move |s| s.history.list(&user_id)).await?;
    Ok(Json(items))
}

/// Aggregate a user's history
async fn history_analytics(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
) -> Result<Json<UserAnalytics>, BiasLensError> {
    let items = blocking(&state, move |s| s.history.list(&user_id)).await?;
    Ok(Json(summarize_history(&items)))
}

/// Delete one history entry
async fn delete_history_item(
    State(state): State<Arc<AppState>>,
    Path((user_id, id)): Path<(String, String)>,
) -> Result<StatusCode, BiasLensError> {
    blocking(&state, move |s| s.history.delete(&user_id, &id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Attach notes to a history entry
async fn update_notes(
    State(state): State<Arc<AppState>>,
    Path((user_id, id)): Path<(String, String)>,
    Json(req): Json<NotesRequest>,
) -> Result<StatusCode, BiasLensError> {
    let updated = blocking(&state, move |s| s.history.update_notes(&user_id, &id, &req.notes)).await?;
    if updated {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Ok(StatusCode::NOT_FOUND)
    }
}

async fn login(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CredentialsRequest>,
) -> Result<Json<User>, BiasLensError> {
    let user = blocking(&state, move |s| s.auth.login(&req.email, &req.password)).await?;
    Ok(Json(user))
}

async fn signup(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CredentialsRequest>,
) -> Result<Json<User>, BiasLensError> {
    let user = blocking(&state, move |s| s.auth.signup(&req.email, &req.password)).await?;
    Ok(Json(user))
}

async fn logout(State(state): State<Arc<AppState>>) -> Result<StatusCode, BiasLensError> {
    blocking(&state, |s| s.auth.logout()).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Run the API server
pub async fn run_server(addr: &str, state: AppState) -> crate::Result<()> {
    let router = create_router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "BiasLens API running");
    info!("  POST   /analyze                      - Analyze text");
    info!("  GET    /history/:user_id             - List history");
    info!("  DELETE /history/:user_id/:id         - Delete entry");
    info!("  PUT    /history/:user_id/:id/notes   - Attach notes");
    info!("  GET    /analytics/:user_id           - Analytics");
    info!("  POST   /auth/login|signup|logout     - Mock auth");
    info!("  GET    /health                       - Health check");
    axum::serve(listener, router).await?;
    Ok(())
}
