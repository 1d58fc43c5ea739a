// Vocabulary and marked-word handlers

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Response, StatusCode};
use serde_json::Value;

use super::response::{bad_request, json_response, server_error};
use super::types::{
    AddMarkedRequest, MarkedResponse, MarkedUpdatedResponse, ReplaceVocabsRequest, Resource,
    VocabsResponse, VocabsUpdatedResponse,
};
use super::{MARKED_CLEAR_PATH, MARKED_PATH, VOCABS_PATH};
use crate::logger;
use crate::storage::{StorageError, VocabStore};

/// Log and build the 500 response for a storage failure
fn storage_failure(
    method: &str,
    path: &str,
    err: &StorageError,
    message: &str,
) -> Response<Full<Bytes>> {
    logger::log_error(&format!("{method} {path}: {err}"));
    logger::log_api_request(method, path, 500);
    server_error(message)
}

fn rejected(method: &str, path: &str, message: &str) -> Response<Full<Bytes>> {
    logger::log_api_request(method, path, 400);
    bad_request(message)
}

/// GET /api/vocabs
pub async fn get_vocabs(store: &VocabStore) -> Response<Full<Bytes>> {
    match store.read_vocabs().await {
        Ok(vocabs) => {
            logger::log_api_request("GET", VOCABS_PATH, 200);
            json_response(StatusCode::OK, &VocabsResponse { vocabs })
        }
        Err(e) => storage_failure("GET", VOCABS_PATH, &e, Resource::Vocabs.error_message(&e)),
    }
}

/// POST /api/vocabs
pub async fn replace_vocabs(store: &VocabStore, body: Value) -> Response<Full<Bytes>> {
    let request = match ReplaceVocabsRequest::from_body(body) {
        Ok(r) => r,
        Err(e) => return rejected("POST", VOCABS_PATH, &e.to_string()),
    };

    match store.replace_vocabs(request.vocabs).await {
        Ok(vocabs) => {
            logger::log_api_request("POST", VOCABS_PATH, 200);
            json_response(
                StatusCode::OK,
                &VocabsUpdatedResponse { ok: true, vocabs },
            )
        }
        Err(e) => storage_failure("POST", VOCABS_PATH, &e, Resource::Vocabs.error_message(&e)),
    }
}

/// GET /api/marked
pub async fn get_marked(store: &VocabStore) -> Response<Full<Bytes>> {
    match store.read_marked().await {
        Ok(marked) => {
            logger::log_api_request("GET", MARKED_PATH, 200);
            json_response(StatusCode::OK, &MarkedResponse { marked })
        }
        Err(e) => storage_failure("GET", MARKED_PATH, &e, Resource::Marked.error_message(&e)),
    }
}

/// POST /api/marked
pub async fn add_marked(store: &VocabStore, body: Value) -> Response<Full<Bytes>> {
    let request = match AddMarkedRequest::from_body(body) {
        Ok(r) => r,
        Err(e) => return rejected("POST", MARKED_PATH, &e.to_string()),
    };

    match store.add_marked(request.word).await {
        Ok(marked) => {
            logger::log_api_request("POST", MARKED_PATH, 200);
            json_response(
                StatusCode::OK,
                &MarkedUpdatedResponse { ok: true, marked },
            )
        }
        Err(e) => storage_failure("POST", MARKED_PATH, &e, Resource::Marked.error_message(&e)),
    }
}

/// POST /api/marked/clear
pub async fn clear_marked(store: &VocabStore) -> Response<Full<Bytes>> {
    match store.clear_marked().await {
        Ok(marked) => {
            logger::log_api_request("POST", MARKED_CLEAR_PATH, 200);
            json_response(
                StatusCode::OK,
                &MarkedUpdatedResponse { ok: true, marked },
            )
        }
        Err(e) => storage_failure(
            "POST",
            MARKED_CLEAR_PATH,
            &e,
            "failed to clear marked storage",
        ),
    }
}
