// Storage error types

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Failure while touching a storage document
#[derive(Debug, Error)]
pub enum StorageError {
    /// The document could not be read (missing, permissions, ...)
    #[error("failed to read {}: {source}", .path.display())]
    Read { path: PathBuf, source: io::Error },

    /// The document was read but does not hold a JSON array
    #[error("invalid storage format in {}: {reason}", .path.display())]
    Format { path: PathBuf, reason: String },

    /// The document could not be written; its content is undefined afterwards
    #[error("failed to write {}: {source}", .path.display())]
    Write { path: PathBuf, source: io::Error },
}

#[cfg(test)]
impl StorageError {
    pub const fn is_read(&self) -> bool {
        matches!(self, Self::Read { .. })
    }

    pub const fn is_format(&self) -> bool {
        matches!(self, Self::Format { .. })
    }

    pub const fn is_write(&self) -> bool {
        matches!(self, Self::Write { .. })
    }
}
