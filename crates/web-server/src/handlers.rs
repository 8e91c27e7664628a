use crate::{error::AppError, AppState};
use axum::{
    extract::{Query, State},
    Json,
};
use core_types::HorizonKey;
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Instant;

#[derive(Debug, Deserialize)]
pub struct FocusPackParams {
    #[serde(default = "default_symbol")]
    symbol: String,
    #[serde(default = "default_focus")]
    focus: String,
}

#[derive(Debug, Deserialize)]
pub struct SymbolParams {
    #[serde(default = "default_symbol")]
    symbol: String,
}

fn default_symbol() -> String {
    "BTC".to_string()
}
fn default_focus() -> String {
    "30d".to_string()
}

/// # GET /api/health
pub async fn health() -> Json<Value> {
    Json(json!({ "service": "fractal-focus", "status": "ok" }))
}

/// # GET /api/focus-pack?symbol&focus
/// Builds the focus pack for one horizon.
pub async fn get_focus_pack(
    State(state): State<Arc<AppState>>,
    Query(params): Query<FocusPackParams>,
) -> Result<Json<Value>, AppError> {
    let focus: HorizonKey = params
        .focus
        .parse()
        .map_err(|_| AppError::InvalidHorizon(params.focus.clone()))?;

    let started = Instant::now();
    let pack = state.builder.build(&params.symbol, focus).await?;
    Ok(Json(json!({
        "ok": true,
        "durationMs": started.elapsed().as_millis() as u64,
        "focusPack": pack,
    })))
}

/// # GET /api/focus-pack/all?symbol
/// Builds every horizon concurrently. `ok` is true only when no horizon
/// failed; the successful packs are returned either way.
pub async fn get_focus_pack_all(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SymbolParams>,
) -> Result<Json<Value>, AppError> {
    let started = Instant::now();
    let all = state.builder.build_all(&params.symbol).await?;
    Ok(Json(json!({
        "ok": all.ok,
        "durationMs": started.elapsed().as_millis() as u64,
        "horizons": all.horizons,
        "packs": all.packs,
        "errors": all.errors,
    })))
}

/// # GET /api/focus-pack/validate?symbol
/// Per-horizon check of the distribution length contract.
pub async fn validate_focus_packs(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SymbolParams>,
) -> Result<Json<Value>, AppError> {
    let report = state.builder.validate(&params.symbol).await?;
    Ok(Json(json!({
        "ok": report.ok,
        "message": report.message,
        "validations": report.validations,
    })))
}
