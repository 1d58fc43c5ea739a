//! JSON-document storage module
//!
//! Each resource lives in one pretty-printed JSON file holding a top-level
//! array. Files are re-read on every request; nothing is cached in memory.

mod document;
mod error;
mod marked;
mod store;

pub use error::StorageError;
pub use marked::MarkedWord;
pub use store::VocabStore;
