//! HTTP protocol layer module
//!
//! Protocol helpers shared by the router and static file serving,
//! independent of the vocabulary API.

pub mod cache;
pub mod mime;
pub mod response;

// Re-export commonly used builders
pub use response::{
    apply_common_headers, build_304_response, build_404_response, build_file_response,
    build_preflight_response, build_redirect_response,
};
