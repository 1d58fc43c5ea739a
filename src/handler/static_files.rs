//! Static file serving module
//!
//! Serves the client application from a local directory for every path
//! the API does not claim.

use crate::config::StaticFilesConfig;
use crate::handler::router::RequestContext;
use crate::http::{self, cache, mime};
use crate::logger;
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::Response;
use percent_encoding::percent_decode_str;
use std::path::{Path, PathBuf};
use tokio::fs;

/// Outcome of resolving a request path against the static root
#[derive(Debug, PartialEq, Eq)]
pub enum Lookup {
    File(PathBuf),
    /// A directory requested without its trailing slash
    Redirect(String),
    NotFound,
}

/// Serve a static asset for the request
pub async fn serve(ctx: &RequestContext<'_>, config: &StaticFilesConfig) -> Response<Full<Bytes>> {
    let file_path = match resolve(&config.root, ctx.path, &config.index_files).await {
        Lookup::File(p) => p,
        Lookup::Redirect(target) => return http::build_redirect_response(&target),
        Lookup::NotFound => return http::build_404_response(),
    };

    let content = match fs::read(&file_path).await {
        Ok(c) => c,
        Err(e) => {
            logger::log_error(&format!(
                "Failed to read file '{}': {e}",
                file_path.display()
            ));
            return http::build_404_response();
        }
    };

    let etag = cache::generate_etag(&content);
    if cache::check_etag_match(ctx.if_none_match.as_deref(), &etag) {
        return http::build_304_response(&etag);
    }

    let content_type = mime::get_content_type(file_path.extension().and_then(|e| e.to_str()));
    http::build_file_response(Bytes::from(content), content_type, &etag, ctx.is_head)
}

/// Map a URL path onto a file below `root`
///
/// `path` is the raw, percent-encoded URL path. Directories resolve to
/// their first existing index file. Anything that escapes `root` after
/// canonicalization is reported as not found.
pub async fn resolve(root: &str, path: &str, index_files: &[String]) -> Lookup {
    let Ok(decoded) = percent_decode_str(path).decode_utf8() else {
        logger::log_debug(&format!("Undecodable static path: {path}"));
        return Lookup::NotFound;
    };
    if decoded.contains('\0') {
        return Lookup::NotFound;
    }

    let relative = decoded.trim_start_matches('/');
    if relative.split(['/', '\\']).any(|segment| segment == "..") {
        logger::log_warning(&format!("Path traversal attempt blocked: {path}"));
        return Lookup::NotFound;
    }

    let Ok(root_canonical) = fs::canonicalize(root).await else {
        logger::log_debug(&format!("Static directory not found: {root}"));
        return Lookup::NotFound;
    };

    let mut file_path = Path::new(root).join(relative);
    if fs::metadata(&file_path).await.is_ok_and(|m| m.is_dir()) {
        if !relative.is_empty() && !path.ends_with('/') {
            return Lookup::Redirect(format!("{path}/"));
        }
        let mut index = None;
        for name in index_files {
            let candidate = file_path.join(name);
            if fs::metadata(&candidate).await.is_ok_and(|m| m.is_file()) {
                index = Some(candidate);
                break;
            }
        }
        match index {
            Some(p) => file_path = p,
            None => return Lookup::NotFound,
        }
    }

    // File not found is common (404), no need to log at warning level
    let Ok(canonical) = fs::canonicalize(&file_path).await else {
        return Lookup::NotFound;
    };
    if !canonical.starts_with(&root_canonical) {
        logger::log_warning(&format!(
            "Path traversal attempt blocked: {path} -> {}",
            canonical.display()
        ));
        return Lookup::NotFound;
    }

    Lookup::File(file_path)
}
