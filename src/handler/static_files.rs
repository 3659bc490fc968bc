//! Static file serving module
//!
//! Maps request paths onto the content root and builds file, index,
//! listing, redirect and error responses.

use std::io;
use std::path::{Path, PathBuf};

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Response, StatusCode};
use tokio::fs;

use crate::config::AppState;
use crate::handler::router::RequestContext;
use crate::http::{self, date, listing, mime};
use crate::logger;

/// Translate a URL path into a filesystem path below `root`.
///
/// The path is percent-decoded, then split into segments; empty, `.` and
/// `..` segments are dropped, as are segments that could smuggle in a
/// separator or NUL. Nothing produced here can climb above `root`.
pub fn translate_path(root: &Path, url_path: &str) -> PathBuf {
    let decoded = decode_path(url_path);
    let mut path = root.to_path_buf();
    for segment in decoded.split('/') {
        if segment.is_empty()
            || segment == "."
            || segment == ".."
            || segment.contains('\\')
            || segment.contains('\0')
        {
            continue;
        }
        path.push(segment);
    }
    path
}

/// Percent-decode a URL path; invalid UTF-8 is replaced, not rejected
pub fn decode_path(url_path: &str) -> String {
    String::from_utf8_lossy(&urlencoding::decode_binary(url_path.as_bytes())).into_owned()
}

/// Serve whatever the request path names under the content root
pub async fn serve(ctx: &RequestContext<'_>, state: &AppState) -> Response<Full<Bytes>> {
    let target = translate_path(&state.root, ctx.path);

    let metadata = match fs::metadata(&target).await {
        Ok(m) => m,
        Err(e) => return io_error_response(&e, &target, ctx.is_head),
    };

    if !is_confined(&state.root, &target).await {
        logger::log_warning(&format!(
            "Path traversal attempt blocked: {} -> {}",
            ctx.path,
            target.display()
        ));
        return http::build_404_response(ctx.is_head);
    }

    if metadata.is_dir() {
        return serve_directory(ctx, state, &target).await;
    }

    // A trailing slash on a file name
    if ctx.path.ends_with('/') {
        return http::build_404_response(ctx.is_head);
    }

    serve_file(ctx, &target, &metadata).await
}

async fn serve_directory(
    ctx: &RequestContext<'_>,
    state: &AppState,
    dir: &Path,
) -> Response<Full<Bytes>> {
    if !ctx.path.ends_with('/') {
        let location = match ctx.query {
            Some(q) => format!("{}/?{q}", ctx.path),
            None => format!("{}/", ctx.path),
        };
        return http::build_redirect_response(&location);
    }

    for index_file in &state.config.http.index_files {
        let index_path = dir.join(index_file);
        let Ok(metadata) = fs::metadata(&index_path).await else {
            continue;
        };
        if metadata.is_file() && is_confined(&state.root, &index_path).await {
            return serve_file(ctx, &index_path, &metadata).await;
        }
    }

    if !state.config.http.directory_listing {
        return http::build_error_response(
            StatusCode::FORBIDDEN,
            "Directory listing is disabled",
            ctx.is_head,
        );
    }

    match listing::read_entries(dir).await {
        Ok(entries) => {
            let html = listing::render_listing(&decode_path(ctx.path), &entries);
            http::build_html_response(html, ctx.is_head)
        }
        Err(e) => {
            logger::log_warning(&format!(
                "Failed to list directory '{}': {e}",
                dir.display()
            ));
            http::build_error_response(
                StatusCode::NOT_FOUND,
                "No permission to list directory",
                ctx.is_head,
            )
        }
    }
}

async fn serve_file(
    ctx: &RequestContext<'_>,
    path: &Path,
    metadata: &std::fs::Metadata,
) -> Response<Full<Bytes>> {
    let modified = metadata.modified().ok();
    let last_modified = modified.map(date::format_http_date);

    // If-None-Match takes precedence, and no ETag is ever issued
    if !ctx.has_if_none_match {
        if let (Some(modified), Some(since), Some(last_modified)) = (
            modified,
            ctx.if_modified_since.as_deref(),
            last_modified.as_deref(),
        ) {
            if date::not_modified_since(modified, since) {
                return http::build_304_response(last_modified);
            }
        }
    }

    let content = match fs::read(path).await {
        Ok(c) => c,
        Err(e) => return io_error_response(&e, path, ctx.is_head),
    };

    http::build_file_response(
        Bytes::from(content),
        mime::get_content_type(path),
        last_modified.as_deref(),
        ctx.is_head,
    )
}

/// The canonical form of `path` must stay below the (canonical) root
async fn is_confined(root: &Path, path: &Path) -> bool {
    fs::canonicalize(path)
        .await
        .is_ok_and(|canonical| canonical.starts_with(root))
}

fn io_error_response(err: &io::Error, path: &Path, is_head: bool) -> Response<Full<Bytes>> {
    match err.kind() {
        // File not found is common (404), no need to log
        io::ErrorKind::NotFound | io::ErrorKind::NotADirectory => {
            http::build_404_response(is_head)
        }
        io::ErrorKind::PermissionDenied => {
            logger::log_warning(&format!("Permission denied: {}", path.display()));
            http::build_error_response(StatusCode::FORBIDDEN, "Permission denied", is_head)
        }
        _ => {
            logger::log_error(&format!("Failed to read '{}': {err}", path.display()));
            http::build_error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to read file",
                is_head,
            )
        }
    }
}
