//! CRUD routes for one namespace

use std::borrow::Cow;
use std::convert::Infallible;

use ixp_artifact::Namespace;
use ixp_store::ContentInput;
use serde_json::{Map, Value};
use warp::filters::BoxedFilter;
use warp::http::header::{CONTENT_TYPE, ETAG};
use warp::http::{HeaderValue, StatusCode};
use warp::reply::Response;
use warp::{Filter, Rejection, Reply};

use super::{object_body, store_error, text, with_state, InvalidNameEncoding};
use crate::state::AppState;

pub(super) fn routes(namespace: Namespace, state: AppState) -> BoxedFilter<(Response,)> {
    let limit = state.body_limit;
    let collection = move || warp::path(namespace.route()).and(warp::path::end());
    let item = move || {
        warp::path(namespace.route())
            .and(warp::path::param::<String>())
            .and(warp::path::end())
    };
    let ns = warp::any().map(move || namespace);
    let state = with_state(state);

    let list_route = collection()
        .and(warp::get())
        .and(ns.clone())
        .and(state.clone())
        .and_then(list);

    let create_route = collection()
        .and(warp::put())
        .and(ns.clone())
        .and(object_body(limit))
        .and(state.clone())
        .and_then(create);

    let read_route = item()
        .and(warp::get())
        .and_then(decode_name)
        .and(ns.clone())
        .and(state.clone())
        .and_then(read);

    let update_route = item()
        .and(warp::post())
        .and_then(decode_name)
        .and(ns.clone())
        .and(object_body(limit))
        .and(state.clone())
        .and_then(update);

    let delete_route = item()
        .and(warp::delete())
        .and_then(decode_name)
        .and(ns)
        .and(state)
        .and_then(delete);

    list_route
        .or(create_route)
        .unify()
        .or(read_route)
        .unify()
        .or(update_route)
        .unify()
        .or(delete_route)
        .unify()
        .boxed()
}

/// Item path segment, percent-decoded
async fn decode_name(raw: String) -> Result<String, Rejection> {
    urlencoding::decode(&raw)
        .map(Cow::into_owned)
        .map_err(|_| warp::reject::custom(InvalidNameEncoding))
}

/// `content` as the store takes it
///
/// Strings pass verbatim and scalars as their JSON text. Resources also take
/// objects and arrays as JSON text; configs must arrive as text.
fn content_field(namespace: Namespace, body: &Map<String, Value>) -> ContentInput {
    match body.get("content") {
        None | Some(Value::Null) => ContentInput::Missing,
        Some(Value::String(s)) => ContentInput::Text(s.clone()),
        Some(Value::Object(_) | Value::Array(_)) if namespace.is_validated() => {
            ContentInput::Structured
        }
        Some(other) => ContentInput::Text(other.to_string()),
    }
}

async fn list(namespace: Namespace, state: AppState) -> Result<Response, Infallible> {
    Ok(match state.store.namespace(namespace).list().await {
        Ok(entries) => warp::reply::json(&entries).into_response(),
        Err(err) => store_error(&err),
    })
}

async fn create(
    namespace: Namespace,
    body: Map<String, Value>,
    state: AppState,
) -> Result<Response, Infallible> {
    let name = body.get("name").and_then(Value::as_str);
    let content = content_field(namespace, &body);
    let store = state.store.namespace(namespace);
    Ok(match store.create(name, content).await {
        Ok(_) => text(StatusCode::CREATED, format!("{} created successfully", namespace.noun())),
        Err(err) => store_error(&err),
    })
}

async fn read(name: String, namespace: Namespace, state: AppState) -> Result<Response, Infallible> {
    Ok(match state.store.namespace(namespace).get(&name).await {
        Ok(doc) => {
            let mut response = Response::new(doc.content.into());
            let headers = response.headers_mut();
            headers.insert(CONTENT_TYPE, HeaderValue::from_static("text/plain; charset=utf-8"));
            if let Ok(etag) = HeaderValue::from_str(&doc.hash.etag()) {
                headers.insert(ETAG, etag);
            }
            response
        }
        Err(err) => store_error(&err),
    })
}

async fn update(
    name: String,
    namespace: Namespace,
    body: Map<String, Value>,
    state: AppState,
) -> Result<Response, Infallible> {
    let content = content_field(namespace, &body);
    let store = state.store.namespace(namespace);
    Ok(match store.update(&name, content).await {
        Ok(_) => text(StatusCode::OK, format!("{} updated successfully", namespace.noun())),
        Err(err) => store_error(&err),
    })
}

async fn delete(name: String, namespace: Namespace, state: AppState) -> Result<Response, Infallible> {
    Ok(match state.store.namespace(namespace).delete(&name).await {
        Ok(()) => text(StatusCode::OK, format!("{} deleted successfully", namespace.noun())),
        Err(err) => store_error(&err),
    })
}
