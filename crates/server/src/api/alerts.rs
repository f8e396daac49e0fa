use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::Json;
use perfwatch_monitor::Alert;
use serde::Deserialize;

use super::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct AlertQuery {
    pub operation: Option<String>,
}

pub async fn list_alerts(
    State(state): State<AppState>,
    Query(q): Query<AlertQuery>,
) -> Json<Vec<Alert>> {
    Json(state.monitor.alerts(q.operation.as_deref()))
}

pub async fn clear_alerts(State(state): State<AppState>, Query(q): Query<AlertQuery>) -> StatusCode {
    state.monitor.clear_alerts(q.operation.as_deref());
    StatusCode::NO_CONTENT
}
