//! Request handler module
//!
//! Routes each request to the JSON API or the static file directory.

mod body;
pub mod router;
pub mod static_files;

pub use router::handle_request;
