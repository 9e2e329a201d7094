//! HTTP endpoint for the voice platform.
//!
//! Each skill has its own POST route taking the platform's request envelope and
//! returning its response envelope.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use exhibit_core::catalog::ExhibitCatalog;
use exhibit_core::clock::Clock;
use exhibit_core::voice::{SkillRequest, SkillResponse};
use exhibit_core::Config;
use serde::Serialize;
use tokio::sync::Mutex;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

use crate::feed::MetFeed;
use crate::schedule::LightingSchedule;
use crate::skills::{color, exhibits, SkillError};

/// Shared state for HTTP handlers.
#[derive(Debug)]
pub struct AppState {
    pub config: Config,
    pub clock: Arc<dyn Clock>,
    /// Held across the first fetch so concurrent requests share one download.
    pub catalog: Mutex<ExhibitCatalog<MetFeed>>,
    pub schedule: Option<Arc<dyn LightingSchedule>>,
}

impl AppState {
    pub fn new(
        config: Config,
        clock: Arc<dyn Clock>,
        schedule: Option<Arc<dyn LightingSchedule>>,
    ) -> Self {
        let catalog = ExhibitCatalog::new(MetFeed::new(&config.feed_url), Arc::clone(&clock));
        Self {
            config,
            clock,
            catalog: Mutex::new(catalog),
            schedule,
        }
    }
}

/// Create the HTTP router with all endpoints.
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/skills/exhibits", post(exhibits_skill))
        .route("/skills/color", post(color_skill))
        .route("/health", get(health_check))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the HTTP server.
pub async fn start_server(state: Arc<AppState>) -> Result<(), std::io::Error> {
    let addr = SocketAddr::from(([127, 0, 0, 1], state.config.port));
    let router = create_router(state);

    info!("HTTP server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router).await
}

// --- Response types ---

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
}

type HandlerResult = Result<Json<SkillResponse>, (StatusCode, Json<ErrorResponse>)>;

// --- Handlers ---

async fn exhibits_skill(
    State(state): State<Arc<AppState>>,
    Json(request): Json<SkillRequest>,
) -> HandlerResult {
    let result = exhibits::handle(&state, &request).await;
    respond(exhibits::TITLE, &request, result)
}

async fn color_skill(
    State(state): State<Arc<AppState>>,
    Json(request): Json<SkillRequest>,
) -> HandlerResult {
    let result = color::handle(&state, &request);
    respond(color::TITLE, &request, result)
}

async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

/// Render a skill result. Application ID mismatches are refused outright; every
/// other failure is spoken back to the user.
fn respond(
    title: &str,
    request: &SkillRequest,
    result: Result<SkillResponse, SkillError>,
) -> HandlerResult {
    match result {
        Ok(response) => Ok(Json(response)),
        Err(e @ SkillError::InvalidApplicationId(_)) => {
            warn!(skill = title, error = %e, "rejected request");
            Err((
                StatusCode::FORBIDDEN,
                Json(ErrorResponse {
                    error: e.to_string(),
                }),
            ))
        }
        Err(e) => {
            error!(
                skill = title,
                kind = e.kind(),
                request_id = request.request.request_id.as_deref().unwrap_or("-"),
                error = %e,
                "skill request failed"
            );
            Ok(Json(SkillResponse::simple(title, &e.speech())))
        }
    }
}
