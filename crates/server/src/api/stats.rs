use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use perfwatch_monitor::{OperationStats, Summary};
use serde::Deserialize;
use std::collections::BTreeMap;

use super::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct WindowQuery {
    pub window_ms: Option<i64>,
}

pub async fn all_stats(
    State(state): State<AppState>,
    Query(q): Query<WindowQuery>,
) -> Json<BTreeMap<String, OperationStats>> {
    Json(state.monitor.all_stats(q.window_ms))
}

pub async fn operation_stats(
    State(state): State<AppState>,
    Path(operation): Path<String>,
    Query(q): Query<WindowQuery>,
) -> Result<Json<OperationStats>, StatusCode> {
    state
        .monitor
        .stats(&operation, q.window_ms)
        .map(Json)
        .ok_or(StatusCode::NOT_FOUND)
}

pub async fn summary(State(state): State<AppState>, Query(q): Query<WindowQuery>) -> Json<Summary> {
    Json(state.monitor.summary(q.window_ms))
}
