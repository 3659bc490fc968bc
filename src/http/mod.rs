//! HTTP protocol layer module
//!
//! Protocol-level building blocks shared by the request handlers.

pub mod date;
pub mod headers;
pub mod listing;
pub mod mime;
pub mod response;

// Re-export commonly used items
pub use headers::{inject_security_headers, SecurityHeaders, SECURITY_HEADERS};
pub use response::{
    build_304_response, build_404_response, build_501_response, build_error_response,
    build_file_response, build_html_response, build_redirect_response,
};
