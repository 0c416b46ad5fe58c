//! Lab control routes proxied to the orchestrator

use std::convert::Infallible;

use ixp_artifact::validate;
use ixp_orchestrator::{LabMonitor, LabSnapshot, OrchestratorError};
use ixp_store::StoreError;
use serde_json::{json, Map, Value};
use warp::filters::BoxedFilter;
use warp::http::StatusCode;
use warp::reply::Response;
use warp::{Filter, Reply};

use super::{object_body, store_error, text, with_state};
use crate::state::AppState;

pub(super) fn routes(state: AppState) -> BoxedFilter<(Response,)> {
    let limit = state.body_limit;
    let state = with_state(state);

    let status_route = warp::path!("lab" / "status")
        .and(warp::get())
        .and(state.clone())
        .and_then(status);

    let start_route = warp::path!("lab" / "start")
        .and(warp::post())
        .and(object_body(limit))
        .and(state.clone())
        .and_then(start);

    let stop_route = warp::path!("lab" / "stop")
        .and(warp::post())
        .and(state)
        .and_then(stop);

    status_route
        .or(start_route)
        .unify()
        .or(stop_route)
        .unify()
        .boxed()
}

fn orchestrator_error(action: &str, err: &OrchestratorError) -> Response {
    tracing::warn!(action, error = %err, "orchestrator request failed");
    text(StatusCode::BAD_GATEWAY, format!("failed to {action} lab: {err}"))
}

async fn status(state: AppState) -> Result<Response, Infallible> {
    if let Some(snapshots) = &state.snapshots {
        let snapshot = snapshots.borrow().clone();
        return Ok(warp::reply::json(&snapshot).into_response());
    }
    let snapshot = LabMonitor::refresh(&state.orchestrator, &LabSnapshot::default()).await;
    Ok(warp::reply::json(&snapshot).into_response())
}

async fn start(body: Map<String, Value>, state: AppState) -> Result<Response, Infallible> {
    let Some(filename) = body.get("filename").and_then(Value::as_str).filter(|f| !f.is_empty())
    else {
        return Ok(text(StatusCode::BAD_REQUEST, "filename is required"));
    };

    let config = match state.store.configs().get(filename).await {
        Ok(doc) => doc,
        Err(err) => return Ok(store_error(&err)),
    };

    match missing_resources(&state, &config.content).await {
        Ok(missing) if !missing.is_empty() => {
            return Ok(text(
                StatusCode::BAD_REQUEST,
                format!("missing resources: {}", missing.join(", ")),
            ));
        }
        Ok(_) => {}
        Err(err) => return Ok(store_error(&err)),
    }

    Ok(match state.orchestrator.start(filename).await {
        Ok(lab_hash) => warp::reply::json(&json!({ "lab_hash": lab_hash })).into_response(),
        Err(err) => orchestrator_error("start", &err),
    })
}

/// Resource files the scenario reads that the resources store lacks
async fn missing_resources(state: &AppState, content: &str) -> Result<Vec<String>, StoreError> {
    let typed = match validate(content).map(|parsed| parsed.to_typed()) {
        Ok(Ok(typed)) => typed,
        _ => {
            tracing::debug!("config has no typed view, skipping resource check");
            return Ok(Vec::new());
        }
    };
    state
        .store
        .resources()
        .missing(&typed.referenced_resources())
        .await
}

async fn stop(state: AppState) -> Result<Response, Infallible> {
    Ok(match state.orchestrator.wipe().await {
        Ok(()) => text(StatusCode::OK, "lab stopped"),
        Err(err) => orchestrator_error("stop", &err),
    })
}
