//! Request dispatch module
//!
//! Entry point for HTTP request processing: method validation, context
//! extraction, dispatch to the static responder, and access logging.

use crate::config::AppState;
use crate::handler::static_files;
use crate::http;
use crate::logger::{self, AccessLogEntry};
use http_body_util::Full;
use hyper::body::{Body, Bytes};
use hyper::header::{
    HeaderMap, HeaderName, HeaderValue, DATE, IF_MODIFIED_SINCE, IF_NONE_MATCH, REFERER, SERVER,
    USER_AGENT,
};
use hyper::{Method, Request, Response, Version};
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Instant, SystemTime};

/// Request context encapsulating information needed for request processing
pub struct RequestContext<'a> {
    /// Raw (still percent-encoded) URI path
    pub path: &'a str,
    pub query: Option<&'a str>,
    pub is_head: bool,
    pub if_modified_since: Option<String>,
    pub has_if_none_match: bool,
}

/// Main entry point for HTTP request handling
///
/// The request body is never read, so it is dropped up front.
pub async fn handle_request<B>(
    req: Request<B>,
    state: Arc<AppState>,
    remote_addr: SocketAddr,
) -> Result<Response<Full<Bytes>>, Infallible> {
    let started = Instant::now();
    let (parts, _) = req.into_parts();
    let method = &parts.method;
    let uri = &parts.uri;

    let mut response = match method {
        &Method::GET | &Method::HEAD => {
            let ctx = RequestContext {
                path: uri.path(),
                query: uri.query(),
                is_head: *method == Method::HEAD,
                if_modified_since: header_string(&parts.headers, IF_MODIFIED_SINCE),
                has_if_none_match: parts.headers.contains_key(IF_NONE_MATCH),
            };
            static_files::serve(&ctx, &state).await
        }
        _ => {
            logger::log_warning(&format!("Method not implemented: {method}"));
            http::build_501_response(method.as_str())
        }
    };

    // Set here so `Date` precedes the security headers on the wire
    let headers = response.headers_mut();
    if let Ok(server_name) = HeaderValue::from_str(&state.config.http.server_name) {
        headers.insert(SERVER, server_name);
    }
    if let Ok(date) = HeaderValue::from_str(&http::date::format_http_date(SystemTime::now())) {
        headers.insert(DATE, date);
    }

    if state.config.logging.access_log {
        let mut entry = AccessLogEntry::new(
            remote_addr.ip().to_string(),
            method.to_string(),
            uri.path().to_string(),
        );
        entry.query = uri.query().map(ToString::to_string);
        entry.http_version = version_label(parts.version).to_string();
        entry.status = response.status().as_u16();
        entry.body_bytes = usize::try_from(response.body().size_hint().lower()).unwrap_or(0);
        entry.referer = header_string(&parts.headers, REFERER);
        entry.user_agent = header_string(&parts.headers, USER_AGENT);
        entry.request_time_us = u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX);
        logger::log_access(&entry, &state.config.logging.access_log_format);
    }

    Ok(response)
}

fn header_string(headers: &HeaderMap, name: HeaderName) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(ToString::to_string)
}

const fn version_label(version: Version) -> &'static str {
    match version {
        Version::HTTP_09 => "0.9",
        Version::HTTP_10 => "1.0",
        Version::HTTP_2 => "2",
        Version::HTTP_3 => "3",
        _ => "1.1",
    }
}
