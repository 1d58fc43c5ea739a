//! HTTP response building module
//!
//! Builders for the non-JSON responses: static files, redirects,
//! conditional requests and CORS.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::header::{
    HeaderValue, ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS,
    ACCESS_CONTROL_ALLOW_ORIGIN, CACHE_CONTROL, CONTENT_LENGTH, CONTENT_TYPE, ETAG, LOCATION,
    SERVER, VARY,
};
use hyper::{Response, StatusCode};

/// Methods advertised to CORS preflight requests
pub const CORS_ALLOWED_METHODS: &str = "GET,HEAD,PUT,PATCH,POST,DELETE";

/// Build 304 Not Modified response
pub fn build_304_response(etag: &str) -> Response<Full<Bytes>> {
    Response::builder()
        .status(StatusCode::NOT_MODIFIED)
        .header(ETAG, etag)
        .header(CACHE_CONTROL, "public, max-age=0")
        .body(Full::new(Bytes::new()))
        .unwrap_or_else(|e| {
            log_build_error("304", &e);
            Response::new(Full::new(Bytes::new()))
        })
}

/// Build 404 Not Found response
pub fn build_404_response() -> Response<Full<Bytes>> {
    Response::builder()
        .status(StatusCode::NOT_FOUND)
        .header(CONTENT_TYPE, "text/plain; charset=utf-8")
        .body(Full::new(Bytes::from_static(b"404 Not Found")))
        .unwrap_or_else(|e| {
            log_build_error("404", &e);
            Response::new(Full::new(Bytes::from_static(b"404 Not Found")))
        })
}

/// Build 301 redirect, used to add the trailing slash to directory paths
pub fn build_redirect_response(target: &str) -> Response<Full<Bytes>> {
    Response::builder()
        .status(StatusCode::MOVED_PERMANENTLY)
        .header(LOCATION, target)
        .header(CONTENT_TYPE, "text/plain; charset=utf-8")
        .body(Full::new(Bytes::from(format!("Redirecting to {target}"))))
        .unwrap_or_else(|e| {
            log_build_error("301", &e);
            Response::new(Full::new(Bytes::new()))
        })
}

/// Build CORS preflight response
///
/// `request_headers` is the client's `Access-Control-Request-Headers`,
/// echoed back so any header it asks for is allowed.
pub fn build_preflight_response(request_headers: Option<&HeaderValue>) -> Response<Full<Bytes>> {
    let allow_headers = request_headers
        .cloned()
        .unwrap_or_else(|| HeaderValue::from_static("Content-Type"));

    Response::builder()
        .status(StatusCode::NO_CONTENT)
        .header(ACCESS_CONTROL_ALLOW_METHODS, CORS_ALLOWED_METHODS)
        .header(ACCESS_CONTROL_ALLOW_HEADERS, allow_headers)
        .header(VARY, "Access-Control-Request-Headers")
        .header(CONTENT_LENGTH, 0)
        .body(Full::new(Bytes::new()))
        .unwrap_or_else(|e| {
            log_build_error("OPTIONS", &e);
            Response::new(Full::new(Bytes::new()))
        })
}

/// Build static file response with `ETag`
pub fn build_file_response(
    data: Bytes,
    content_type: &str,
    etag: &str,
    is_head: bool,
) -> Response<Full<Bytes>> {
    let content_length = data.len();
    let body = if is_head { Bytes::new() } else { data };

    Response::builder()
        .status(StatusCode::OK)
        .header(CONTENT_TYPE, content_type)
        .header(CONTENT_LENGTH, content_length)
        .header(ETAG, etag)
        .header(CACHE_CONTROL, "public, max-age=0")
        .body(Full::new(body))
        .unwrap_or_else(|e| {
            log_build_error("200", &e);
            Response::new(Full::new(Bytes::new()))
        })
}

/// Headers added to every response on the way out
pub fn apply_common_headers<B>(response: &mut Response<B>, server_name: &str, enable_cors: bool) {
    let headers = response.headers_mut();
    if let Ok(value) = HeaderValue::from_str(server_name) {
        headers.insert(SERVER, value);
    }
    if enable_cors {
        headers.insert(ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static("*"));
    }
}

/// Log response build error
fn log_build_error(status: &str, error: &hyper::http::Error) {
    crate::logger::log_error(&format!("Failed to build {status} response: {error}"));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preflight_echoes_requested_headers() {
        let requested = HeaderValue::from_static("content-type, x-custom");
        let response = build_preflight_response(Some(&requested));
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        assert_eq!(
            response.headers()[ACCESS_CONTROL_ALLOW_HEADERS],
            "content-type, x-custom"
        );
        assert_eq!(
            response.headers()[ACCESS_CONTROL_ALLOW_METHODS],
            CORS_ALLOWED_METHODS
        );

        let response = build_preflight_response(None);
        assert_eq!(response.headers()[ACCESS_CONTROL_ALLOW_HEADERS], "Content-Type");
    }

    #[test]
    fn test_apply_common_headers() {
        let mut response = build_404_response();
        apply_common_headers(&mut response, "vocab-server", true);
        assert_eq!(response.headers()[ACCESS_CONTROL_ALLOW_ORIGIN], "*");
        assert_eq!(response.headers()[SERVER], "vocab-server");

        let mut response = build_404_response();
        apply_common_headers(&mut response, "vocab-server", false);
        assert!(response.headers().get(ACCESS_CONTROL_ALLOW_ORIGIN).is_none());
    }

    #[test]
    fn test_head_file_response_has_no_body() {
        let response = build_file_response(Bytes::from_static(b"hello"), "text/plain", "\"1\"", true);
        assert_eq!(response.headers()[CONTENT_LENGTH], "5");
    }
}
