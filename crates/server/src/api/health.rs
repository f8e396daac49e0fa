use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use perfwatch_monitor::HealthStatus;
use serde::Serialize;

use super::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
}

pub async fn healthz() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".into(),
    })
}

pub async fn ready() -> StatusCode {
    StatusCode::OK
}

/// Global health policy; 503 while any issue is open.
pub async fn health(State(state): State<AppState>) -> (StatusCode, Json<HealthStatus>) {
    let status = state.monitor.health_status();
    let code = if status.healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    (code, Json(status))
}

#[cfg(test)]
mod tests {
    use super::*;
    use perfwatch_monitor::probe::NoopProbe;
    use perfwatch_monitor::{MonitorConfig, PerformanceMonitor, Sample};
    use std::sync::Arc;

    fn state() -> AppState {
        let monitor = PerformanceMonitor::builder(MonitorConfig {
            install_default_rules: false,
            ..MonitorConfig::default()
        })
        .probe(Arc::new(NoopProbe))
        .build()
        .unwrap();
        AppState::new(monitor)
    }

    #[tokio::test]
    async fn healthz_ok() {
        let resp = healthz().await;
        assert_eq!(resp.0.status, "ok");
    }

    #[tokio::test]
    async fn healthy_engine_is_200() {
        let (code, body) = health(State(state())).await;
        assert_eq!(code, StatusCode::OK);
        assert!(body.0.healthy);
    }

    #[tokio::test]
    async fn slow_engine_is_503() {
        let state = state();
        let now = state.monitor.now_ms();
        state.monitor.record_metric(Sample::new("report", 9000.0, true, now));
        let (code, body) = health(State(state)).await;
        assert_eq!(code, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body.0.issues.len(), 1);
    }
}
