use axum::extract::{MatchedPath, Request, State};
use axum::middleware::Next;
use axum::response::Response;

use super::AppState;

/// Records every routed request as `http.<METHOD> <route>`; 5xx responses
/// count as failures.
pub async fn track_requests(State(state): State<AppState>, req: Request, next: Next) -> Response {
    let route = req
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_owned())
        .unwrap_or_else(|| req.uri().path().to_owned());
    let operation = format!("http.{} {}", req.method(), route);

    let timing = state.monitor.start_timing(&operation);
    let resp = next.run(req).await;

    let status = resp.status();
    let timing = timing.with_metadata("status", status.as_u16());
    if status.is_server_error() {
        timing.fail("HttpStatus", status.to_string());
    } else {
        timing.finish(true);
    }
    resp
}
