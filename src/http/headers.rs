//! Security header injection
//!
//! Every response leaving the server carries the same five headers, which
//! put served pages into a cross-origin isolated context (needed for
//! `SharedArrayBuffer`) and forbid framing by other origins.

use std::future::Future;
use std::pin::Pin;

use hyper::header::{HeaderMap, HeaderName, HeaderValue};
use hyper::service::Service;
use hyper::Response;

/// The injected headers, in emission order
pub static SECURITY_HEADERS: [(HeaderName, HeaderValue); 5] = [
    (
        HeaderName::from_static("cross-origin-opener-policy"),
        HeaderValue::from_static("same-origin"),
    ),
    (
        HeaderName::from_static("cross-origin-embedder-policy"),
        HeaderValue::from_static("require-corp"),
    ),
    (
        HeaderName::from_static("referrer-policy"),
        HeaderValue::from_static("no-referrer-when-downgrade"),
    ),
    (
        HeaderName::from_static("x-content-type-options"),
        HeaderValue::from_static("nosniff"),
    ),
    (
        HeaderName::from_static("content-security-policy"),
        HeaderValue::from_static("frame-ancestors 'self'"),
    ),
];

/// Add the security headers after whatever the responder already set.
///
/// Existing values under the same names are replaced, so each header ends
/// up present exactly once no matter how often this runs.
pub fn inject_security_headers(headers: &mut HeaderMap) {
    for (name, value) in &SECURITY_HEADERS {
        headers.insert(name.clone(), value.clone());
    }
}

/// Service decorator that finalizes every response with the security headers
#[derive(Debug, Clone)]
pub struct SecurityHeaders<S> {
    inner: S,
}

impl<S> SecurityHeaders<S> {
    pub const fn new(inner: S) -> Self {
        Self { inner }
    }
}

impl<S, R, B> Service<R> for SecurityHeaders<S>
where
    S: Service<R, Response = Response<B>>,
    S::Future: Send + 'static,
    S::Error: Send + 'static,
    B: Send + 'static,
{
    type Response = Response<B>;
    type Error = S::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn call(&self, req: R) -> Self::Future {
        let future = self.inner.call(req);
        Box::pin(async move {
            let mut response = future.await?;
            inject_security_headers(response.headers_mut());
            Ok(response)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::{Empty, Full};
    use hyper::body::Bytes;
    use hyper::service::service_fn;
    use hyper::{Request, StatusCode};
    use std::convert::Infallible;

    fn expected() -> Vec<(&'static str, &'static str)> {
        vec![
            ("cross-origin-opener-policy", "same-origin"),
            ("cross-origin-embedder-policy", "require-corp"),
            ("referrer-policy", "no-referrer-when-downgrade"),
            ("x-content-type-options", "nosniff"),
            ("content-security-policy", "frame-ancestors 'self'"),
        ]
    }

    #[test]
    fn test_injects_all_headers_once() {
        let mut headers = HeaderMap::new();
        inject_security_headers(&mut headers);
        inject_security_headers(&mut headers);

        assert_eq!(headers.len(), 5);
        for (name, value) in expected() {
            let values: Vec<_> = headers.get_all(name).iter().collect();
            assert_eq!(values, vec![value], "header {name}");
        }
    }

    #[test]
    fn test_appended_after_existing_headers() {
        let mut headers = HeaderMap::new();
        headers.insert("content-type", HeaderValue::from_static("text/html"));
        headers.insert("content-length", HeaderValue::from_static("11"));
        inject_security_headers(&mut headers);

        let names: Vec<&str> = headers.keys().map(HeaderName::as_str).collect();
        let mut wanted = vec!["content-type", "content-length"];
        wanted.extend(expected().iter().map(|(n, _)| *n));
        assert_eq!(names, wanted);
    }

    #[test]
    fn test_replaces_conflicting_value() {
        let mut headers = HeaderMap::new();
        headers.append("x-content-type-options", HeaderValue::from_static("none"));
        headers.append("x-content-type-options", HeaderValue::from_static("other"));
        inject_security_headers(&mut headers);

        let values: Vec<_> = headers.get_all("x-content-type-options").iter().collect();
        assert_eq!(values, vec!["nosniff"]);
    }

    #[tokio::test]
    async fn test_decorator_finalizes_response() {
        let service = SecurityHeaders::new(service_fn(|_req: Request<Empty<Bytes>>| async {
            let response = Response::builder()
                .status(StatusCode::NOT_FOUND)
                .body(Full::new(Bytes::from("missing")))
                .unwrap();
            Ok::<_, Infallible>(response)
        }));

        let response = service.call(Request::new(Empty::new())).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            response.headers()["content-security-policy"],
            "frame-ancestors 'self'"
        );
        assert_eq!(response.headers()["cross-origin-embedder-policy"], "require-corp");
    }
}
