// API module entry
// JSON endpoints for the vocabulary and marked-word collections

mod handlers;
mod response;
mod types;

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Method, Response};
use serde_json::Value;

use crate::storage::VocabStore;

pub use response::{bad_request, payload_too_large};

pub const API_PREFIX: &str = "/api";
pub const VOCABS_PATH: &str = "/api/vocabs";
pub const MARKED_PATH: &str = "/api/marked";
pub const MARKED_CLEAR_PATH: &str = "/api/marked/clear";

/// Whether a request path belongs to the JSON API
pub fn is_api_path(path: &str) -> bool {
    path.strip_prefix(API_PREFIX)
        .is_some_and(|rest| rest.is_empty() || rest.starts_with('/'))
}

/// API route handler
///
/// Dispatches to handler functions based on request path and method.
/// `body` is the already-parsed JSON request body (`{}` when absent).
pub async fn dispatch(
    method: &Method,
    path: &str,
    body: Value,
    store: &VocabStore,
) -> Response<Full<Bytes>> {
    match (method, path) {
        (&Method::GET | &Method::HEAD, VOCABS_PATH) => handlers::get_vocabs(store).await,
        (&Method::POST, VOCABS_PATH) => handlers::replace_vocabs(store, body).await,
        (&Method::GET | &Method::HEAD, MARKED_PATH) => handlers::get_marked(store).await,
        (&Method::POST, MARKED_PATH) => handlers::add_marked(store, body).await,
        (&Method::POST, MARKED_CLEAR_PATH) => handlers::clear_marked(store).await,
        (_, VOCABS_PATH | MARKED_PATH) => response::method_not_allowed("GET, HEAD, POST"),
        (_, MARKED_CLEAR_PATH) => response::method_not_allowed("POST"),
        _ => {
            crate::logger::log_api_request(method.as_str(), path, 404);
            response::not_found()
        }
    }
}
