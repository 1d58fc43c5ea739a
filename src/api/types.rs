// API request/response types
// One record per endpoint body; validation happens before storage is touched

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::storage::{MarkedWord, StorageError};

/// Client input rejected at the boundary (400)
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("vocabs must be an array")]
    VocabsNotArray,
    #[error("word missing or invalid")]
    WordInvalid,
}

/// Pull a top-level field out of a request body
///
/// Bodies that are not JSON objects have no fields.
fn take_field(body: Value, name: &str) -> Option<Value> {
    match body {
        Value::Object(mut fields) => fields.remove(name),
        _ => None,
    }
}

/// `POST /api/vocabs` body: `{ "vocabs": [...] }`
#[derive(Debug)]
pub struct ReplaceVocabsRequest {
    pub vocabs: Vec<Value>,
}

impl ReplaceVocabsRequest {
    pub fn from_body(body: Value) -> Result<Self, ValidationError> {
        match take_field(body, "vocabs") {
            Some(Value::Array(vocabs)) => Ok(Self { vocabs }),
            _ => Err(ValidationError::VocabsNotArray),
        }
    }
}

/// `POST /api/marked` body: `{ "word": { "eng": "...", "vnm": ... } }`
#[derive(Debug)]
pub struct AddMarkedRequest {
    pub word: MarkedWord,
}

impl AddMarkedRequest {
    pub fn from_body(body: Value) -> Result<Self, ValidationError> {
        take_field(body, "word")
            .and_then(MarkedWord::from_value)
            .map(|word| Self { word })
            .ok_or(ValidationError::WordInvalid)
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct VocabsResponse {
    /// Stored document, passed through unchanged
    pub vocabs: Value,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct VocabsUpdatedResponse {
    pub ok: bool,
    pub vocabs: Vec<Value>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MarkedResponse {
    pub marked: Value,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MarkedUpdatedResponse {
    pub ok: bool,
    pub marked: Vec<Value>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// The two stored collections, for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    Vocabs,
    Marked,
}

impl Resource {
    /// Client-facing message for a storage failure on this resource
    pub const fn error_message(self, err: &StorageError) -> &'static str {
        match (self, err) {
            (Self::Vocabs, StorageError::Read { .. }) => "failed to read storage",
            (Self::Vocabs, StorageError::Format { .. }) => "invalid storage format",
            (Self::Vocabs, StorageError::Write { .. }) => "failed to write storage",
            (Self::Marked, StorageError::Read { .. }) => "failed to read marked storage",
            (Self::Marked, StorageError::Format { .. }) => "invalid marked storage format",
            (Self::Marked, StorageError::Write { .. }) => "failed to write marked storage",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_replace_vocabs_request() {
        let req = ReplaceVocabsRequest::from_body(json!({"vocabs": [1, {"eng": "cat"}]})).unwrap();
        assert_eq!(req.vocabs, vec![json!(1), json!({"eng": "cat"})]);

        for bad in [
            json!({"vocabs": "not-a-list"}),
            json!({"vocabs": {"0": "cat"}}),
            json!({"vocabs": null}),
            json!({}),
            json!([["cat"]]),
        ] {
            assert_eq!(
                ReplaceVocabsRequest::from_body(bad).unwrap_err(),
                ValidationError::VocabsNotArray
            );
        }
    }

    #[test]
    fn test_add_marked_request() {
        let req = AddMarkedRequest::from_body(json!({"word": {"eng": "dog", "vnm": "con chó"}}))
            .unwrap();
        assert_eq!(req.word.eng(), "dog");

        for bad in [
            json!({"word": {}}),
            json!({"word": {"vnm": "con chó"}}),
            json!({"word": "dog"}),
            json!({}),
            json!(null),
        ] {
            assert_eq!(
                AddMarkedRequest::from_body(bad).unwrap_err(),
                ValidationError::WordInvalid
            );
        }
    }

    #[test]
    fn test_validation_messages() {
        assert_eq!(
            ValidationError::VocabsNotArray.to_string(),
            "vocabs must be an array"
        );
        assert_eq!(
            ValidationError::WordInvalid.to_string(),
            "word missing or invalid"
        );
    }
}
