use axum::extract::{Query, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use perfwatch_monitor::{ExportError, ExportFormat};
use serde::Deserialize;

use super::AppState;

pub async fn metrics(State(state): State<AppState>) -> Response {
    render(&state, ExportFormat::Prometheus)
}

#[derive(Debug, Deserialize)]
pub struct ExportQuery {
    pub format: Option<String>,
}

pub async fn export(State(state): State<AppState>, Query(q): Query<ExportQuery>) -> Response {
    match q.format.as_deref().unwrap_or("json").parse::<ExportFormat>() {
        Ok(format) => render(&state, format),
        Err(e) => (StatusCode::BAD_REQUEST, e.to_string()).into_response(),
    }
}

fn render(state: &AppState, format: ExportFormat) -> Response {
    match state.monitor.export_metrics(format) {
        Ok(body) => ([(header::CONTENT_TYPE, format.content_type())], body).into_response(),
        Err(e @ ExportError::UnknownFormat(_)) => {
            (StatusCode::BAD_REQUEST, e.to_string()).into_response()
        }
        Err(e) => {
            tracing::warn!("export failed: {e}");
            (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use perfwatch_monitor::probe::NoopProbe;
    use perfwatch_monitor::{MonitorConfig, PerformanceMonitor, Sample};
    use std::sync::Arc;

    fn state() -> AppState {
        let monitor = PerformanceMonitor::builder(MonitorConfig::default())
            .probe(Arc::new(NoopProbe))
            .build()
            .unwrap();
        let now = monitor.now_ms();
        monitor.record_metric(Sample::new("db.query", 40.0, true, now));
        AppState::new(monitor)
    }

    async fn body_text(resp: Response) -> String {
        let body = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(body.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn handler_returns_prometheus() {
        let resp = metrics(State(state())).await;
        assert_eq!(
            resp.headers()[header::CONTENT_TYPE],
            "text/plain; version=0.0.4"
        );
        let text = body_text(resp).await;
        assert!(text.contains("db_query_duration_seconds_count 1"));
    }

    #[tokio::test]
    async fn export_defaults_to_json() {
        let resp = export(State(state()), Query(ExportQuery { format: None })).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let v: serde_json::Value = serde_json::from_str(&body_text(resp).await).unwrap();
        assert_eq!(v["operations"]["db.query"]["count"], 1);
    }

    #[tokio::test]
    async fn unknown_format_is_bad_request() {
        let resp = export(
            State(state()),
            Query(ExportQuery {
                format: Some("xml".into()),
            }),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }
}
