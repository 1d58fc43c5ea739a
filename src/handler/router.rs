//! Request routing dispatch module
//!
//! Entry point for HTTP request processing: CORS preflight, API dispatch,
//! static files, and access logging.

use crate::api;
use crate::config::AppState;
use crate::handler::body::{self, BodyError};
use crate::handler::static_files;
use crate::http;
use crate::logger::{self, AccessLogEntry};
use http_body_util::Full;
use hyper::body::{Body, Bytes};
use hyper::header::{ACCESS_CONTROL_REQUEST_HEADERS, IF_NONE_MATCH, USER_AGENT};
use hyper::{Method, Request, Response, Version};
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

/// Request context for static file serving
pub struct RequestContext<'a> {
    pub path: &'a str,
    pub is_head: bool,
    pub if_none_match: Option<String>,
}

/// Main entry point for HTTP request handling
pub async fn handle_request<B>(
    req: Request<B>,
    state: Arc<AppState>,
    peer_addr: SocketAddr,
) -> Result<Response<Full<Bytes>>, Infallible>
where
    B: Body,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    let started = Instant::now();
    let access_log = state.config.logging.access_log;

    let entry = access_log.then(|| {
        let mut entry = AccessLogEntry::new(
            peer_addr.ip().to_string(),
            req.method().to_string(),
            req.uri().path().to_string(),
        );
        entry.query = req.uri().query().map(ToString::to_string);
        entry.http_version = version_label(req.version()).to_string();
        entry.user_agent = req
            .headers()
            .get(USER_AGENT)
            .and_then(|v| v.to_str().ok())
            .map(ToString::to_string);
        entry
    });

    let mut response = route_request(req, &state).await;
    http::apply_common_headers(
        &mut response,
        &state.config.http.server_name,
        state.config.http.enable_cors,
    );

    if let Some(mut entry) = entry {
        entry.status = response.status().as_u16();
        entry.body_bytes = response
            .body()
            .size_hint()
            .exact()
            .and_then(|n| usize::try_from(n).ok())
            .unwrap_or_default();
        entry.request_time_us = u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX);
        logger::log_access(&entry, &state.config.logging.access_log_format);
    }

    Ok(response)
}

/// Route request to the API or the static directory
async fn route_request<B>(req: Request<B>, state: &AppState) -> Response<Full<Bytes>>
where
    B: Body,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    let method = req.method().clone();
    let path = req.uri().path().to_string();

    // 1. CORS preflight
    if method == Method::OPTIONS && state.config.http.enable_cors {
        return http::build_preflight_response(req.headers().get(ACCESS_CONTROL_REQUEST_HEADERS));
    }

    // 2. JSON API
    if api::is_api_path(&path) {
        let body = match body::read_json_body(req, state.config.http.max_body_size).await {
            Ok(value) => value,
            Err(e) => return body_error_response(&method, &path, &e),
        };
        return api::dispatch(&method, &path, body, &state.store).await;
    }

    // 3. Static files
    match method {
        Method::GET | Method::HEAD => {
            let ctx = RequestContext {
                path: &path,
                is_head: method == Method::HEAD,
                if_none_match: req
                    .headers()
                    .get(IF_NONE_MATCH)
                    .and_then(|v| v.to_str().ok())
                    .map(ToString::to_string),
            };
            static_files::serve(&ctx, &state.config.static_files).await
        }
        _ => http::build_404_response(),
    }
}

fn body_error_response(method: &Method, path: &str, err: &BodyError) -> Response<Full<Bytes>> {
    logger::log_warning(&format!("{method} {path}: {err}"));
    match err {
        BodyError::TooLarge { .. } => {
            logger::log_api_request(method.as_str(), path, 413);
            api::payload_too_large()
        }
        BodyError::InvalidJson(_) => {
            logger::log_api_request(method.as_str(), path, 400);
            api::bad_request("invalid JSON body")
        }
        BodyError::Unreadable(_) => {
            logger::log_api_request(method.as_str(), path, 400);
            api::bad_request("failed to read request body")
        }
    }
}

const fn version_label(version: Version) -> &'static str {
    match version {
        Version::HTTP_09 => "0.9",
        Version::HTTP_10 => "1.0",
        Version::HTTP_2 => "2",
        Version::HTTP_3 => "3",
        _ => "1.1",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::storage::VocabStore;
    use http_body_util::BodyExt;
    use hyper::header::{ACCESS_CONTROL_ALLOW_ORIGIN, CONTENT_TYPE, LOCATION};
    use hyper::StatusCode;
    use serde_json::{json, Value};

    struct TestServer {
        _tmp: tempfile::TempDir,
        state: Arc<AppState>,
    }

    async fn test_server(configure: impl FnOnce(&mut Config)) -> TestServer {
        let tmp = tempfile::tempdir().unwrap();
        let public = tmp.path().join("public");
        std::fs::create_dir(&public).unwrap();
        std::fs::write(public.join("index.html"), "<h1>vocab</h1>").unwrap();
        std::fs::create_dir(public.join("lessons")).unwrap();

        let mut config = Config::default();
        config.storage.data_dir = tmp.path().join("data").to_string_lossy().into_owned();
        config.static_files.root = public.to_string_lossy().into_owned();
        config.logging.access_log = false;
        configure(&mut config);

        let store = VocabStore::new(&config.storage);
        store.bootstrap().await.unwrap();
        TestServer {
            _tmp: tmp,
            state: Arc::new(AppState::with_store(config, store)),
        }
    }

    fn json_request(method: Method, uri: &str, body: &str) -> Request<Full<Bytes>> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header(CONTENT_TYPE, "application/json")
            .body(Full::new(Bytes::from(body.to_string())))
            .unwrap()
    }

    fn empty_request(method: Method, uri: &str) -> Request<Full<Bytes>> {
        Request::builder()
            .method(method)
            .uri(uri)
            .body(Full::new(Bytes::new()))
            .unwrap()
    }

    async fn send(server: &TestServer, req: Request<Full<Bytes>>) -> Response<Full<Bytes>> {
        let peer: SocketAddr = "127.0.0.1:50000".parse().unwrap();
        handle_request(req, Arc::clone(&server.state), peer)
            .await
            .unwrap()
    }

    async fn body_json(response: Response<Full<Bytes>>) -> Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_post_then_get_vocabs() {
        let server = test_server(|_| {}).await;

        let response = send(
            &server,
            json_request(
                Method::POST,
                "/api/vocabs",
                r#"{"vocabs":[{"eng":"cat","vnm":"con meo"}]}"#,
            ),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[ACCESS_CONTROL_ALLOW_ORIGIN], "*");
        assert_eq!(
            response.headers()[CONTENT_TYPE],
            "application/json; charset=utf-8"
        );

        let response = send(&server, empty_request(Method::GET, "/api/vocabs")).await;
        assert_eq!(
            body_json(response).await,
            json!({"vocabs": [{"eng": "cat", "vnm": "con meo"}]})
        );
    }

    #[tokio::test]
    async fn test_non_json_content_type_is_ignored() {
        let server = test_server(|_| {}).await;

        let req = Request::builder()
            .method(Method::POST)
            .uri("/api/vocabs")
            .header(CONTENT_TYPE, "text/plain")
            .body(Full::new(Bytes::from_static(br#"{"vocabs":[]}"#)))
            .unwrap();
        let response = send(&server, req).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            body_json(response).await,
            json!({"error": "vocabs must be an array"})
        );
    }

    #[tokio::test]
    async fn test_marked_clear_without_body() {
        let server = test_server(|_| {}).await;
        send(
            &server,
            json_request(Method::POST, "/api/marked", r#"{"word":{"eng":"dog"}}"#),
        )
        .await;

        let response = send(&server, empty_request(Method::POST, "/api/marked/clear")).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await, json!({"ok": true, "marked": []}));
    }

    #[tokio::test]
    async fn test_malformed_json_body() {
        let server = test_server(|_| {}).await;

        let response = send(&server, json_request(Method::POST, "/api/marked", "{word:")).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await, json!({"error": "invalid JSON body"}));
    }

    #[tokio::test]
    async fn test_body_limit() {
        let server = test_server(|c| c.http.max_body_size = 16).await;

        let response = send(
            &server,
            json_request(Method::POST, "/api/vocabs", r#"{"vocabs":["a","b","c","d"]}"#),
        )
        .await;
        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(server.state.store.read_vocabs().await.unwrap(), json!([]));
    }

    #[tokio::test]
    async fn test_cors_preflight() {
        let server = test_server(|_| {}).await;

        let req = Request::builder()
            .method(Method::OPTIONS)
            .uri("/api/marked")
            .header(ACCESS_CONTROL_REQUEST_HEADERS, "content-type")
            .body(Full::new(Bytes::new()))
            .unwrap();
        let response = send(&server, req).await;
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        assert_eq!(response.headers()[ACCESS_CONTROL_ALLOW_ORIGIN], "*");
        assert_eq!(
            response.headers()["access-control-allow-headers"],
            "content-type"
        );
    }

    #[tokio::test]
    async fn test_cors_disabled() {
        let server = test_server(|c| c.http.enable_cors = false).await;

        let response = send(&server, empty_request(Method::GET, "/api/marked")).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().get(ACCESS_CONTROL_ALLOW_ORIGIN).is_none());

        let response = send(&server, empty_request(Method::OPTIONS, "/api/marked")).await;
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    }

    #[tokio::test]
    async fn test_static_files() {
        let server = test_server(|_| {}).await;

        let response = send(&server, empty_request(Method::GET, "/")).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[CONTENT_TYPE], "text/html; charset=utf-8");
        let etag = response.headers()["etag"].to_str().unwrap().to_string();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(&bytes[..], b"<h1>vocab</h1>");

        let req = Request::builder()
            .uri("/index.html")
            .header(IF_NONE_MATCH, etag)
            .body(Full::new(Bytes::new()))
            .unwrap();
        let response = send(&server, req).await;
        assert_eq!(response.status(), StatusCode::NOT_MODIFIED);

        let response = send(&server, empty_request(Method::GET, "/lessons")).await;
        assert_eq!(response.status(), StatusCode::MOVED_PERMANENTLY);
        assert_eq!(response.headers()[LOCATION], "/lessons/");

        let response = send(&server, empty_request(Method::GET, "/missing.css")).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response = send(&server, empty_request(Method::DELETE, "/index.html")).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_head_static_file() {
        let server = test_server(|_| {}).await;

        let response = send(&server, empty_request(Method::HEAD, "/index.html")).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()["content-length"], "14");
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        assert!(bytes.is_empty());
    }
}
