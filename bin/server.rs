// Squad Balancer - Web Server
// REST API over the matching + balancing core, for UI and chat collaborators

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::{get, post},
    Router,
};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing::info;
use squad_balancer::logging::init_tracing;
use squad_balancer::{
    load_roster_csv, parse_name_list, BalancedTeams, IdentityResolver, RosterRecord, Settings,
    TeamBalancer,
};

/// Roster path when SQUAD_ROSTER is not set
const DEFAULT_ROSTER_PATH: &str = "roster.csv";

/// Bind address when SQUAD_ADDR is not set
const DEFAULT_ADDR: &str = "0.0.0.0:3000";

/// Shared application state (roster is a read-only snapshot)
#[derive(Clone)]
struct AppState {
    roster: Arc<Vec<RosterRecord>>,
    resolver: Arc<IdentityResolver>,
    balancer: Arc<TeamBalancer>,
}

/// API Response wrapper
#[derive(Serialize)]
struct ApiResponse<T> {
    success: bool,
    data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl<T> ApiResponse<T> {
    fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    fn err(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

#[derive(Deserialize)]
struct ResolveParams {
    q: String,
    #[serde(default = "default_limit")]
    limit: usize,
}

fn default_limit() -> usize {
    5
}

/// Resolve response (owned copies so the handler can return them)
#[derive(Serialize)]
struct ResolveResponse {
    query: String,
    matched: Option<RosterRecord>,
    strategy: Option<&'static str>,
    candidates: Vec<CandidateResponse>,
}

#[derive(Serialize)]
struct CandidateResponse {
    name: String,
    distance: f64,
}

/// Either a names array or free text to split
#[derive(Deserialize)]
struct BalanceRequest {
    #[serde(default)]
    names: Vec<String>,
    #[serde(default)]
    text: Option<String>,
}

#[derive(Serialize)]
struct BalanceResponse {
    teams: BalancedTeams,
    unmatched: Vec<String>,
    summary: String,
}

// ============================================================================
// API Handlers
// ============================================================================

/// GET /api/health - Health check
async fn health_check() -> impl IntoResponse {
    Json(ApiResponse::ok("OK"))
}

/// GET /api/roster - Current roster snapshot
async fn get_roster(State(state): State<AppState>) -> impl IntoResponse {
    Json(ApiResponse::ok(state.roster.as_ref().clone()))
}

/// GET /api/resolve?q=NAME&limit=N - Best match plus ranked candidates
async fn resolve_name(
    State(state): State<AppState>,
    Query(params): Query<ResolveParams>,
) -> impl IntoResponse {
    let best = state.resolver.match_query(&params.q, &state.roster);
    let candidates = state
        .resolver
        .find_all_matches(&params.q, &state.roster, params.limit)
        .into_iter()
        .map(|c| CandidateResponse {
            name: c.record.name.clone(),
            distance: c.distance,
        })
        .collect();

    let response = ResolveResponse {
        query: params.q.clone(),
        matched: best.map(|m| m.record.clone()),
        strategy: best.map(|m| m.strategy.as_str()),
        candidates,
    };

    Json(ApiResponse::ok(response))
}

/// POST /api/balance - Split names into two squads
async fn balance(
    State(state): State<AppState>,
    Json(request): Json<BalanceRequest>,
) -> impl IntoResponse {
    let mut names = request.names;
    if let Some(text) = request.text.as_deref() {
        names.extend(parse_name_list(text));
    }

    if names.is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::<BalanceResponse>::err("No player names given")),
        )
            .into_response();
    }

    let teams = state
        .balancer
        .balance_with_roster(&names, &state.resolver, &state.roster);
    let unmatched = teams.unmatched().into_iter().map(str::to_string).collect();
    let summary = teams.summary();

    (
        StatusCode::OK,
        Json(ApiResponse::ok(BalanceResponse {
            teams,
            unmatched,
            summary,
        })),
    )
        .into_response()
}

// ============================================================================
// Main Server
// ============================================================================

fn app(state: AppState) -> Router {
    let api_routes = Router::new()
        .route("/health", get(health_check))
        .route("/roster", get(get_roster))
        .route("/resolve", get(resolve_name))
        .route("/balance", post(balance))
        .with_state(state);

    Router::new()
        .nest("/api", api_routes)
        .layer(CorsLayer::permissive())
}

#[tokio::main]
async fn main() -> Result<()> {
    let settings = match std::env::var("SQUAD_CONFIG") {
        Ok(path) => Settings::from_file(&path)
            .with_context(|| format!("Failed to load settings: {}", path))?,
        Err(_) => Settings::from_env().context("Invalid settings from environment")?,
    };
    init_tracing(settings.log_filter())?;

    let roster_path = PathBuf::from(
        std::env::var("SQUAD_ROSTER").unwrap_or_else(|_| DEFAULT_ROSTER_PATH.to_string()),
    );
    let roster = load_roster_csv(&roster_path)
        .with_context(|| format!("Failed to load roster: {:?}", roster_path))?;
    info!(players = roster.len(), path = ?roster_path, "Roster loaded");

    let state = AppState {
        roster: Arc::new(roster),
        resolver: Arc::new(IdentityResolver::with_config(settings.resolver.clone())),
        balancer: Arc::new(TeamBalancer::with_config(settings.balancer.clone())),
    };

    let addr = std::env::var("SQUAD_ADDR").unwrap_or_else(|_| DEFAULT_ADDR.to_string());
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    info!(%addr, "Server running");

    axum::serve(listener, app(state))
        .await
        .context("Server error")?;

    Ok(())
}
