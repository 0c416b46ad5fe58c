//! HTTP routes
//!
//! | Method | Path | Success |
//! |---|---|---|
//! | GET | `/configs`, `/resources` | 200 JSON `[{name, content, type}]` |
//! | PUT | `/configs`, `/resources` | 201 text |
//! | GET | `/configs/:name`, `/resources/:name` | 200 raw text + `ETag` |
//! | POST | `/configs/:name`, `/resources/:name` | 200 text |
//! | DELETE | `/configs/:name`, `/resources/:name` | 200 text |
//! | GET | `/lab/status` | 200 JSON snapshot |
//! | POST | `/lab/start`, `/lab/stop` | 200 |
//!
//! Error bodies are plain text.

mod artifacts;
mod lab;

use std::convert::Infallible;

use ixp_artifact::Namespace;
use ixp_store::StoreError;
use serde_json::{Map, Value};
use warp::http::StatusCode;
use warp::hyper::body::Bytes;
use warp::reply::Response;
use warp::{Filter, Rejection, Reply};

use crate::state::AppState;

/// Body larger than the configured limit
#[derive(Debug)]
struct PayloadTooLarge;

impl warp::reject::Reject for PayloadTooLarge {}

/// Item name that does not percent-decode to UTF-8
#[derive(Debug)]
struct InvalidNameEncoding;

impl warp::reject::Reject for InvalidNameEncoding {}

/// Complete API with CORS and request tracing
pub fn routes(state: AppState) -> impl Filter<Extract = (impl Reply,), Error = Rejection> + Clone {
    let api = artifacts::routes(Namespace::Configs, state.clone())
        .or(artifacts::routes(Namespace::Resources, state.clone()))
        .unify()
        .or(lab::routes(state))
        .unify();

    api.recover(handle_rejection)
        .with(cors())
        .with(warp::trace::request())
}

fn cors() -> warp::cors::Builder {
    warp::cors()
        .allow_any_origin()
        .allow_methods(vec!["GET", "PUT", "POST", "DELETE", "OPTIONS"])
        .allow_header("content-type")
}

fn with_state(state: AppState) -> impl Filter<Extract = (AppState,), Error = Infallible> + Clone {
    warp::any().map(move || state.clone())
}

/// Request body as a JSON object; anything else reads as `{}`
fn object_body(limit: u64) -> impl Filter<Extract = (Map<String, Value>,), Error = Rejection> + Clone {
    warp::header::optional::<u64>("content-length")
        .and_then(move |declared: Option<u64>| async move {
            match declared {
                Some(len) if len > limit => Err(warp::reject::custom(PayloadTooLarge)),
                _ => Ok(()),
            }
        })
        .untuple_one()
        .and(warp::body::bytes())
        .and_then(move |bytes: Bytes| async move {
            if u64::try_from(bytes.len()).unwrap_or(u64::MAX) > limit {
                return Err(warp::reject::custom(PayloadTooLarge));
            }
            Ok::<_, Rejection>(parse_object(&bytes))
        })
}

fn parse_object(bytes: &[u8]) -> Map<String, Value> {
    match serde_json::from_slice::<Value>(bytes) {
        Ok(Value::Object(map)) => map,
        _ => Map::new(),
    }
}

/// Reply for a failed store operation
fn store_error(err: &StoreError) -> Response {
    if err.is_client_error() {
        tracing::debug!(error = %err, "request rejected");
    }
    let status =
        StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    text(status, err.public_message())
}

/// Plain-text reply with status
fn text(status: StatusCode, body: impl Into<String>) -> Response {
    warp::reply::with_status(body.into(), status).into_response()
}

async fn handle_rejection(err: Rejection) -> Result<Response, Infallible> {
    let (status, message) = if err.is_not_found() {
        (StatusCode::NOT_FOUND, "not found")
    } else if err.find::<PayloadTooLarge>().is_some()
        || err.find::<warp::reject::PayloadTooLarge>().is_some()
    {
        (StatusCode::PAYLOAD_TOO_LARGE, "request body too large")
    } else if err.find::<InvalidNameEncoding>().is_some() {
        (StatusCode::BAD_REQUEST, "invalid file name encoding")
    } else if err.find::<warp::reject::MethodNotAllowed>().is_some() {
        (StatusCode::METHOD_NOT_ALLOWED, "method not allowed")
    } else if err.find::<warp::reject::InvalidHeader>().is_some() {
        (StatusCode::BAD_REQUEST, "invalid request header")
    } else {
        tracing::warn!(rejection = ?err, "unhandled rejection");
        (StatusCode::INTERNAL_SERVER_ERROR, "internal server error")
    };
    Ok(text(status, message))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_object_bodies_read_as_empty() {
        assert!(parse_object(b"").is_empty());
        assert!(parse_object(b"[1,2]").is_empty());
        assert!(parse_object(b"\"name\"").is_empty());
        assert!(parse_object(b"{broken").is_empty());
        assert_eq!(parse_object(br#"{"name":"a.conf"}"#)["name"], "a.conf");
    }
}
