//! Single JSON document on disk
//!
//! A document is one file normally holding a top-level JSON array, written
//! with two-space indentation so it stays readable by hand.

use serde_json::Value;
use std::io;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::sync::{Mutex, MutexGuard};

use super::error::StorageError;

/// File-backed JSON array
pub struct JsonDocument {
    path: PathBuf,
    /// Serializes writers of this document within the process
    lock: Mutex<()>,
}

impl JsonDocument {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Acquire the per-document lock
    ///
    /// Hold the guard across a read-modify-write sequence.
    pub async fn lock(&self) -> MutexGuard<'_, ()> {
        self.lock.lock().await
    }

    /// Write an empty array if the file does not exist yet
    ///
    /// Returns `true` when the file was created.
    pub async fn ensure_exists(&self) -> Result<bool, StorageError> {
        match fs::try_exists(&self.path).await {
            Ok(true) => Ok(false),
            Ok(false) => {
                self.write_list(&[]).await?;
                Ok(true)
            }
            Err(source) => Err(StorageError::Read {
                path: self.path.clone(),
                source,
            }),
        }
    }

    /// Read the raw file content
    pub async fn read_raw(&self) -> Result<String, StorageError> {
        fs::read_to_string(&self.path)
            .await
            .map_err(|source| StorageError::Read {
                path: self.path.clone(),
                source,
            })
    }

    /// Read and parse the document, whatever JSON value it holds
    pub async fn read_value(&self) -> Result<Value, StorageError> {
        let content = self.read_raw().await?;
        serde_json::from_str(&content).map_err(|e| StorageError::Format {
            path: self.path.clone(),
            reason: e.to_string(),
        })
    }

    /// Parse document content, requiring a top-level array
    ///
    /// Only the marked-word append path needs a list; plain reads go
    /// through `read_value`.
    pub fn parse_list(&self, content: &str) -> Result<Vec<Value>, StorageError> {
        match serde_json::from_str::<Value>(content) {
            Ok(Value::Array(items)) => Ok(items),
            Ok(other) => Err(StorageError::Format {
                path: self.path.clone(),
                reason: format!("expected an array, found {}", json_kind(&other)),
            }),
            Err(e) => Err(StorageError::Format {
                path: self.path.clone(),
                reason: e.to_string(),
            }),
        }
    }

    /// Overwrite the document with the given items
    pub async fn write_list(&self, items: &[Value]) -> Result<(), StorageError> {
        let content = serde_json::to_string_pretty(items).map_err(|e| StorageError::Write {
            path: self.path.clone(),
            source: io::Error::new(io::ErrorKind::InvalidData, e),
        })?;

        fs::write(&self.path, content)
            .await
            .map_err(|source| StorageError::Write {
                path: self.path.clone(),
                source,
            })
    }
}

const fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_ensure_exists_creates_empty_array() {
        let tmp = tempfile::tempdir().unwrap();
        let doc = JsonDocument::new(tmp.path().join("list.json"));

        assert!(doc.ensure_exists().await.unwrap());
        assert_eq!(doc.read_raw().await.unwrap(), "[]");
        assert_eq!(doc.read_value().await.unwrap(), json!([]));
    }

    #[tokio::test]
    async fn test_ensure_exists_keeps_existing_content() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("list.json");
        std::fs::write(&path, r#"[{"eng":"cat"}]"#).unwrap();

        let doc = JsonDocument::new(&path);
        assert!(!doc.ensure_exists().await.unwrap());
        assert_eq!(doc.read_value().await.unwrap(), json!([{"eng": "cat"}]));
    }

    #[tokio::test]
    async fn test_write_list_is_indented() {
        let tmp = tempfile::tempdir().unwrap();
        let doc = JsonDocument::new(tmp.path().join("list.json"));

        doc.write_list(&[json!({"eng": "cat"})]).await.unwrap();
        let raw = doc.read_raw().await.unwrap();
        assert_eq!(raw, "[\n  {\n    \"eng\": \"cat\"\n  }\n]");
    }

    #[tokio::test]
    async fn test_read_missing_file() {
        let tmp = tempfile::tempdir().unwrap();
        let doc = JsonDocument::new(tmp.path().join("missing.json"));

        let err = doc.read_value().await.unwrap_err();
        assert!(err.is_read());
    }

    #[test]
    fn test_parse_list_rejects_non_arrays() {
        let doc = JsonDocument::new("unused.json");
        assert!(doc.parse_list("{not json").unwrap_err().is_format());
        assert!(doc.parse_list(r#"{"eng":"cat"}"#).unwrap_err().is_format());
        assert!(doc.parse_list("null").unwrap_err().is_format());
        assert_eq!(doc.parse_list("[1, 2]").unwrap(), vec![json!(1), json!(2)]);
    }

    #[tokio::test]
    async fn test_read_value_accepts_any_json() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("list.json");
        let doc = JsonDocument::new(&path);

        std::fs::write(&path, r#"{"legacy":true}"#).unwrap();
        assert_eq!(doc.read_value().await.unwrap(), json!({"legacy": true}));

        std::fs::write(&path, "{oops").unwrap();
        assert!(doc.read_value().await.unwrap_err().is_format());
    }

    #[tokio::test]
    async fn test_write_into_missing_directory_fails() {
        let tmp = tempfile::tempdir().unwrap();
        let doc = JsonDocument::new(tmp.path().join("nope").join("list.json"));

        let err = doc.write_list(&[]).await.unwrap_err();
        assert!(err.is_write());
    }
}
