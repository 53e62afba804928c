//! Dashboard API route handlers.
//!
//! State is shared via `Arc<DashboardState>`. Failures from the store
//! come back as 500 with the error text.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::error;

use crate::data::MarketDataSource;
use crate::engine::builder::today;
use crate::engine::cycle::run_generation;
use crate::engine::ParlayEngine;
use crate::history::{format_history, format_parlays};
use crate::storage::ParlayStore;
use crate::types::ParlayRecord;

/// Largest `limit` accepted by the history endpoints.
const MAX_HISTORY_LIMIT: u32 = 500;

// ---------------------------------------------------------------------------
// Shared state
// ---------------------------------------------------------------------------

/// Shared state accessible by all route handlers.
pub struct DashboardState {
    pub store: ParlayStore,
    pub engine: Arc<ParlayEngine>,
    pub source: Arc<dyn MarketDataSource>,
    pub sports: Vec<String>,
    pub bookmakers: Vec<String>,
    pub history_limit: u32,
}

impl DashboardState {
    pub fn new(
        store: ParlayStore,
        engine: Arc<ParlayEngine>,
        source: Arc<dyn MarketDataSource>,
        sports: Vec<String>,
        bookmakers: Vec<String>,
        history_limit: u32,
    ) -> Self {
        Self {
            store,
            engine,
            source,
            sports,
            bookmakers,
            history_limit,
        }
    }
}

pub type AppState = Arc<DashboardState>;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    pub limit: Option<u32>,
}

#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

type ApiError = (StatusCode, String);

fn internal(e: anyhow::Error) -> ApiError {
    error!(error = %e, "Dashboard request failed");
    (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
}

fn resolve_limit(state: &DashboardState, query: &HistoryQuery) -> u32 {
    query
        .limit
        .unwrap_or(state.history_limit)
        .clamp(1, MAX_HISTORY_LIMIT)
}

// ---------------------------------------------------------------------------
// Route handlers
// ---------------------------------------------------------------------------

/// GET /health
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

/// GET /api/history
pub async fn get_history(
    State(state): State<AppState>,
    Query(query): Query<HistoryQuery>,
) -> Result<Json<Vec<ParlayRecord>>, ApiError> {
    let limit = resolve_limit(&state, &query);
    let records = state.store.recent(limit).await.map_err(internal)?;
    Ok(Json(records))
}

/// GET /history
pub async fn get_history_text(
    State(state): State<AppState>,
    Query(query): Query<HistoryQuery>,
) -> Result<String, ApiError> {
    let limit = resolve_limit(&state, &query);
    let records = state.store.recent(limit).await.map_err(internal)?;
    Ok(format_history(&records))
}

/// POST /api/generate
pub async fn post_generate(State(state): State<AppState>) -> Result<String, ApiError> {
    let report = run_generation(
        state.source.as_ref(),
        &state.engine,
        Some(&state.store),
        &state.sports,
        &state.bookmakers,
        today(),
    )
    .await
    .map_err(internal)?;

    Ok(format_parlays(report.records().into_iter().map(|r| &r.result)))
}
