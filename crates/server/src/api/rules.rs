use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use perfwatch_monitor::{AlertRule, RuleError};
use serde::Serialize;

use super::AppState;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

pub async fn list_rules(State(state): State<AppState>) -> Json<Vec<AlertRule>> {
    Json(state.monitor.alert_rules())
}

pub async fn create_rule(
    State(state): State<AppState>,
    Json(rule): Json<AlertRule>,
) -> Result<(StatusCode, Json<AlertRule>), (StatusCode, Json<ErrorResponse>)> {
    match state.monitor.add_alert_rule(rule.clone()) {
        Ok(()) => Ok((StatusCode::CREATED, Json(rule))),
        Err(e) => {
            let code = match e {
                RuleError::DuplicateId(_) => StatusCode::CONFLICT,
                _ => StatusCode::BAD_REQUEST,
            };
            Err((code, Json(ErrorResponse { error: e.to_string() })))
        }
    }
}

pub async fn delete_rule(State(state): State<AppState>, Path(rule_id): Path<String>) -> StatusCode {
    if state.monitor.remove_alert_rule(&rule_id) {
        StatusCode::NO_CONTENT
    } else {
        StatusCode::NOT_FOUND
    }
}
