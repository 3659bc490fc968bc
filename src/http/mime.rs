//! MIME type detection module
//!
//! Best-effort Content-Type from the file extension.

use std::path::Path;

pub const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// Get MIME Content-Type for a file path
///
/// # Examples
/// ```
/// use std::path::Path;
/// use www_server::http::mime::get_content_type;
/// assert_eq!(get_content_type(Path::new("app.wasm")), "application/wasm");
/// assert_eq!(get_content_type(Path::new("README")), "application/octet-stream");
/// ```
pub fn get_content_type(path: &Path) -> &'static str {
    match path.extension().and_then(|e| e.to_str()) {
        // Module scripts and wasm must be exact or browsers refuse them
        Some("js" | "mjs") => "text/javascript",
        Some("wasm") => "application/wasm",
        _ => mime_guess::from_path(path)
            .first_raw()
            .unwrap_or(DEFAULT_CONTENT_TYPE),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_common_types() {
        assert_eq!(get_content_type(Path::new("index.html")), "text/html");
        assert_eq!(get_content_type(Path::new("css/site.css")), "text/css");
        assert_eq!(get_content_type(Path::new("js/main.js")), "text/javascript");
        assert_eq!(get_content_type(Path::new("js/worker.mjs")), "text/javascript");
        assert_eq!(get_content_type(Path::new("img/logo.png")), "image/png");
        assert_eq!(get_content_type(Path::new("data.json")), "application/json");
    }

    #[test]
    fn test_unknown_extension() {
        assert_eq!(get_content_type(Path::new("blob.xyzzy")), DEFAULT_CONTENT_TYPE);
        assert_eq!(get_content_type(Path::new("Makefile")), DEFAULT_CONTENT_TYPE);
    }
}
