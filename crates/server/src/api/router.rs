use axum::middleware;
use axum::routing::{delete, get};
use axum::Router;
use perfwatch_monitor::PerformanceMonitor;
use std::future::Future;
use tokio::net::TcpListener;

use super::{alerts, health, metrics, rules, stats, timing};

#[derive(Clone)]
pub struct AppState {
    pub monitor: PerformanceMonitor,
}

impl AppState {
    pub fn new(monitor: PerformanceMonitor) -> Self {
        Self { monitor }
    }
}

pub fn router(state: AppState) -> Router {
    let tracked = Router::new()
        .route("/stats", get(stats::all_stats))
        .route("/stats/{operation}", get(stats::operation_stats))
        .route("/summary", get(stats::summary))
        .route("/alerts", get(alerts::list_alerts).delete(alerts::clear_alerts))
        .route("/rules", get(rules::list_rules).post(rules::create_rule))
        .route("/rules/{rule_id}", delete(rules::delete_rule))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            timing::track_requests,
        ));

    // liveness and scrape routes are not timed; /health must not observe itself
    Router::new()
        .route("/healthz", get(health::healthz))
        .route("/ready", get(health::ready))
        .route("/health", get(health::health))
        .route("/metrics", get(metrics::metrics))
        .route("/export", get(metrics::export))
        .merge(tracked)
        .with_state(state)
}

pub async fn serve<S>(listener: TcpListener, state: AppState, shutdown: S) -> std::io::Result<()>
where
    S: Future<Output = ()> + Send + 'static,
{
    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown)
        .await
}
