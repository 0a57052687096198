//! Web form API route handlers.
//!
//! All endpoints return JSON. State is shared via `Arc<DashboardState>`.
//! Empty-ledger reads answer `{"no_data": true, "message": ...}` rather
//! than zero-valued figures.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::error;

use crate::config::FormConfig;
use crate::ledger::Ledger;
use crate::report::{NO_CHART, NO_HISTORY, NO_STATS};
use crate::types::{BetType, LedgerError, Outcome, Sport, StoredWager, WagerForm};

// ---------------------------------------------------------------------------
// Shared state
// ---------------------------------------------------------------------------

/// Shared state accessible by all route handlers.
pub struct DashboardState {
    pub ledger: Ledger,
    pub options: FormOptions,
}

impl DashboardState {
    pub fn new(ledger: Ledger, form: &FormConfig) -> Self {
        Self {
            ledger,
            options: FormOptions::from_config(form),
        }
    }
}

pub type AppState = Arc<DashboardState>;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Choices and defaults for the entry form.
#[derive(Debug, Clone, Serialize)]
pub struct FormOptions {
    pub sports: Vec<String>,
    pub bet_types: Vec<String>,
    pub outcomes: Vec<String>,
    pub default_sport: String,
    pub default_bet_type: String,
    pub currency_symbol: String,
}

impl FormOptions {
    pub fn from_config(form: &FormConfig) -> Self {
        Self {
            sports: Sport::KNOWN.iter().map(|s| s.to_string()).collect(),
            bet_types: BetType::KNOWN.iter().map(|s| s.to_string()).collect(),
            outcomes: Outcome::ALL.iter().map(|o| o.to_string()).collect(),
            default_sport: form.default_sport.trim().to_string(),
            default_bet_type: form.default_bet_type.trim().to_string(),
            currency_symbol: form.currency_symbol.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AddedResponse {
    pub message: String,
    pub wager: StoredWager,
}

#[derive(Debug, Clone, Serialize)]
pub struct ClearedResponse {
    pub message: String,
    pub removed: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct NoData {
    pub no_data: bool,
    pub message: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ClearParams {
    #[serde(default)]
    pub confirm: bool,
}

/// Either a report or the no-data marker.
fn report_or_no_data<T: Serialize>(report: Option<T>, message: &'static str) -> Response {
    match report {
        Some(report) => Json(report).into_response(),
        None => Json(NoData { no_data: true, message }).into_response(),
    }
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Handler failure mapped onto an HTTP status.
#[derive(Debug)]
pub enum ApiError {
    Ledger(LedgerError),
    ConfirmationRequired,
}

impl From<LedgerError> for ApiError {
    fn from(err: LedgerError) -> Self {
        ApiError::Ledger(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::Ledger(err) if err.is_validation() => {
                (StatusCode::UNPROCESSABLE_ENTITY, err.to_string())
            }
            ApiError::Ledger(err) => {
                error!(error = %err, "Ledger request failed");
                (StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
            }
            ApiError::ConfirmationRequired => (
                StatusCode::BAD_REQUEST,
                "Clearing all bet data requires confirm=true".to_string(),
            ),
        };
        (status, Json(ErrorBody { error: message })).into_response()
    }
}

// ---------------------------------------------------------------------------
// Route handlers
// ---------------------------------------------------------------------------

/// GET /api/options
pub async fn get_options(State(state): State<AppState>) -> Json<FormOptions> {
    Json(state.options.clone())
}

/// GET /api/wagers
pub async fn list_wagers(State(state): State<AppState>) -> Result<Response, ApiError> {
    let history = state.ledger.history().await?;
    Ok(report_or_no_data(history, NO_HISTORY))
}

/// POST /api/wagers
pub async fn add_wager(
    State(state): State<AppState>,
    Json(form): Json<WagerForm>,
) -> Result<(StatusCode, Json<AddedResponse>), ApiError> {
    let wager = state.ledger.add(&form).await?;
    let message = format!("Added {} bet on {}", wager.record.bet_type, wager.record.sport);
    Ok((StatusCode::CREATED, Json(AddedResponse { message, wager })))
}

/// DELETE /api/wagers?confirm=true
pub async fn clear_wagers(
    State(state): State<AppState>,
    Query(params): Query<ClearParams>,
) -> Result<Json<ClearedResponse>, ApiError> {
    if !params.confirm {
        return Err(ApiError::ConfirmationRequired);
    }
    let removed = state.ledger.clear().await?;
    Ok(Json(ClearedResponse {
        message: "All bet data has been cleared.".to_string(),
        removed,
    }))
}

/// GET /api/stats
pub async fn get_stats(State(state): State<AppState>) -> Result<Response, ApiError> {
    let summary = state.ledger.summary().await?;
    Ok(report_or_no_data(summary, NO_STATS))
}

/// GET /api/chart
pub async fn get_chart(State(state): State<AppState>) -> Result<Response, ApiError> {
    let totals = state.ledger.totals_by_bet_type().await?;
    Ok(report_or_no_data(totals, NO_CHART))
}

/// GET /health
pub async fn health() -> StatusCode {
    StatusCode::OK
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
