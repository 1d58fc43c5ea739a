//! Vocabulary store
//!
//! Owns the vocabulary and marked-word documents and exposes the
//! operations the HTTP layer needs. Every call goes back to disk.

use serde_json::Value;
use std::path::{Path, PathBuf};
use tokio::fs;

use super::document::JsonDocument;
use super::error::StorageError;
use super::marked::MarkedWord;
use crate::config::StorageConfig;
use crate::logger;

/// Storage service for both resources
pub struct VocabStore {
    data_dir: PathBuf,
    vocabs: JsonDocument,
    marked: JsonDocument,
}

impl VocabStore {
    pub fn new(config: &StorageConfig) -> Self {
        let data_dir = PathBuf::from(&config.data_dir);
        Self {
            vocabs: JsonDocument::new(data_dir.join(&config.vocabs_file)),
            marked: JsonDocument::new(data_dir.join(&config.marked_file)),
            data_dir,
        }
    }

    /// Store rooted at `data_dir` with the default file names
    #[cfg(test)]
    pub fn in_dir(data_dir: impl AsRef<Path>) -> Self {
        let config = StorageConfig {
            data_dir: data_dir.as_ref().to_string_lossy().into_owned(),
            ..StorageConfig::default()
        };
        Self::new(&config)
    }

    pub fn vocabs_path(&self) -> &Path {
        self.vocabs.path()
    }

    pub fn marked_path(&self) -> &Path {
        self.marked.path()
    }

    /// Make sure the data directory and both documents exist
    ///
    /// Run once before serving. Existing documents are left untouched.
    pub async fn bootstrap(&self) -> Result<(), StorageError> {
        fs::create_dir_all(&self.data_dir)
            .await
            .map_err(|source| StorageError::Write {
                path: self.data_dir.clone(),
                source,
            })?;

        for doc in [&self.vocabs, &self.marked] {
            if doc.ensure_exists().await? {
                logger::log_info(&format!(
                    "[STORAGE] Created empty document {}",
                    doc.path().display()
                ));
            }
        }
        Ok(())
    }

    /// Current vocabulary document, returned as stored
    pub async fn read_vocabs(&self) -> Result<Value, StorageError> {
        self.vocabs.read_value().await
    }

    /// Replace the whole vocabulary list, returning what was written
    pub async fn replace_vocabs(&self, vocabs: Vec<Value>) -> Result<Vec<Value>, StorageError> {
        let _guard = self.vocabs.lock().await;
        self.vocabs.write_list(&vocabs).await?;
        Ok(vocabs)
    }

    pub async fn read_marked(&self) -> Result<Value, StorageError> {
        self.marked.read_value().await
    }

    /// Append a marked word unless an entry with the same key exists
    ///
    /// Returns the full list after the write.
    pub async fn add_marked(&self, word: MarkedWord) -> Result<Vec<Value>, StorageError> {
        let _guard = self.marked.lock().await;

        let mut marked = self.load_marked_lenient().await?;
        if marked.iter().any(|entry| word.same_key(entry)) {
            logger::log_debug(&format!("[STORAGE] '{}' already marked", word.eng()));
        } else {
            marked.push(word.into_value());
        }

        self.marked.write_list(&marked).await?;
        Ok(marked)
    }

    /// Load the marked list for `add_marked`
    ///
    /// An unreadable file is an error, but content that is not a JSON array
    /// is treated as an empty list so adding still works.
    async fn load_marked_lenient(&self) -> Result<Vec<Value>, StorageError> {
        let content = self.marked.read_raw().await?;
        match self.marked.parse_list(&content) {
            Ok(list) => Ok(list),
            Err(e) => {
                logger::log_warning(&format!("{e}; starting from an empty marked list"));
                Ok(Vec::new())
            }
        }
    }

    /// Drop every marked word
    pub async fn clear_marked(&self) -> Result<Vec<Value>, StorageError> {
        let _guard = self.marked.lock().await;
        self.marked.write_list(&[]).await?;
        Ok(Vec::new())
    }
}
