//! HTTP response types.
//!
//! This module provides [`HttpResponse`], a buffered text response carrying
//! a status, headers, and a rendered body. Redirects and the error statuses
//! the dispatcher produces all have dedicated constructors.

use axum::response::IntoResponse;
use http::{HeaderMap, HeaderValue, StatusCode};

use sprung_core::SprungError;

/// An HTTP response produced by the dispatcher.
///
/// Supports setting status codes, headers, content type, and charset. All
/// responses convert to an Axum response via [`IntoResponse`].
///
/// # Examples
///
/// ```
/// use sprung_http::HttpResponse;
///
/// let response = HttpResponse::ok("<html><body>Hello</body></html>");
/// assert_eq!(response.status(), http::StatusCode::OK);
/// ```
#[derive(Debug)]
pub struct HttpResponse {
    status: StatusCode,
    headers: HeaderMap,
    body: String,
    content_type: String,
    charset: String,
}

impl HttpResponse {
    /// Creates a new `HttpResponse` with the given status code and body.
    pub fn new(status: StatusCode, body: impl Into<String>) -> Self {
        Self {
            status,
            headers: HeaderMap::new(),
            body: body.into(),
            content_type: "text/html".to_string(),
            charset: "utf-8".to_string(),
        }
    }

    /// Creates a 200 OK response with the given body.
    pub fn ok(body: impl Into<String>) -> Self {
        Self::new(StatusCode::OK, body)
    }

    /// Creates a 400 Bad Request response.
    pub fn bad_request(body: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, body)
    }

    /// Creates a 404 Not Found response.
    pub fn not_found(body: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, body)
    }

    /// Creates a 500 Internal Server Error response.
    pub fn server_error(body: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, body)
    }

    /// Creates a 405 Method Not Allowed response listing the permitted
    /// methods in the `Allow` header.
    pub fn not_allowed(permitted_methods: &[&str]) -> Self {
        let body = format!(
            "Method Not Allowed. Permitted: {}",
            permitted_methods.join(", ")
        );
        let mut response = Self::new(StatusCode::METHOD_NOT_ALLOWED, body);
        if let Ok(value) = HeaderValue::from_str(&permitted_methods.join(", ")) {
            response.headers.insert(http::header::ALLOW, value);
        }
        response
    }

    /// Creates a 302 Found redirect to the given location.
    pub fn redirect(location: &str) -> Self {
        let mut response = Self::new(StatusCode::FOUND, "");
        if let Ok(value) = HeaderValue::from_str(location) {
            response.headers.insert(http::header::LOCATION, value);
        }
        response
    }

    /// Creates the response for a framework error, using
    /// [`SprungError::status_code`] for the status.
    ///
    /// `MethodNotAllowed` errors get their `Allow` header populated from
    /// the error's allowed-method list.
    pub fn from_error(err: &SprungError) -> Self {
        match err {
            SprungError::MethodNotAllowed { allowed, .. } => Self::not_allowed(allowed),
            _ => {
                let status = StatusCode::from_u16(err.status_code())
                    .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
                Self::new(status, err.to_string())
            }
        }
    }

    /// Returns the status code.
    pub const fn status(&self) -> StatusCode {
        self.status
    }

    /// Returns a reference to the headers.
    pub const fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Returns a mutable reference to the headers.
    pub fn headers_mut(&mut self) -> &mut HeaderMap {
        &mut self.headers
    }

    /// Adds a header to the response.
    #[must_use]
    pub fn set_header(mut self, name: http::header::HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    /// Returns the content type.
    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    /// Sets the content type.
    pub fn set_content_type(&mut self, content_type: impl Into<String>) {
        self.content_type = content_type.into();
    }

    /// Returns the charset.
    pub fn charset(&self) -> &str {
        &self.charset
    }

    /// Returns the response body.
    pub fn body(&self) -> &str {
        &self.body
    }

    /// Returns the full content type header value including charset.
    fn full_content_type(&self) -> String {
        if self.content_type.starts_with("text/") {
            format!("{}; charset={}", self.content_type, self.charset)
        } else {
            self.content_type.clone()
        }
    }
}

impl IntoResponse for HttpResponse {
    fn into_response(self) -> axum::response::Response {
        let mut builder = axum::response::Response::builder().status(self.status);

        if let Ok(ct) = HeaderValue::from_str(&self.full_content_type()) {
            builder = builder.header(http::header::CONTENT_TYPE, ct);
        }

        let response = builder
            .body(axum::body::Body::from(self.body))
            .unwrap_or_else(|_| {
                axum::response::Response::builder()
                    .status(StatusCode::INTERNAL_SERVER_ERROR)
                    .body(axum::body::Body::from("Internal Server Error"))
                    .expect("fallback response should always be valid")
            });

        let (mut parts, body) = response.into_parts();
        for (key, value) in &self.headers {
            parts.headers.insert(key, value.clone());
        }
        axum::response::Response::from_parts(parts, body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ok() {
        let resp = HttpResponse::ok("Hello");
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(resp.content_type(), "text/html");
        assert_eq!(resp.charset(), "utf-8");
        assert_eq!(resp.body(), "Hello");
    }

    #[test]
    fn test_bad_request() {
        let resp = HttpResponse::bad_request("Bad");
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_not_found() {
        let resp = HttpResponse::not_found("Not Found");
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_server_error() {
        let resp = HttpResponse::server_error("Error");
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_not_allowed_sets_allow_header() {
        let resp = HttpResponse::not_allowed(&["GET", "POST"]);
        assert_eq!(resp.status(), StatusCode::METHOD_NOT_ALLOWED);
        let allow = resp
            .headers()
            .get(http::header::ALLOW)
            .unwrap()
            .to_str()
            .unwrap();
        assert!(allow.contains("GET"));
        assert!(allow.contains("POST"));
    }

    #[test]
    fn test_redirect() {
        let resp = HttpResponse::redirect("/");
        assert_eq!(resp.status(), StatusCode::FOUND);
        assert_eq!(
            resp.headers()
                .get(http::header::LOCATION)
                .unwrap()
                .to_str()
                .unwrap(),
            "/"
        );
        assert!(resp.body().is_empty());
    }

    // ── from_error ──────────────────────────────────────────────────

    #[test]
    fn test_from_error_route_not_found() {
        let err = SprungError::RouteNotFound {
            method: "GET".into(),
            path: "/nowhere".into(),
        };
        let resp = HttpResponse::from_error(&err);
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        assert!(resp.body().contains("/nowhere"));
    }

    #[test]
    fn test_from_error_method_not_allowed_sets_allow() {
        let err = SprungError::MethodNotAllowed {
            method: "GET".into(),
            path: "/basePost".into(),
            allowed: vec!["POST"],
        };
        let resp = HttpResponse::from_error(&err);
        assert_eq!(resp.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(
            resp.headers()
                .get(http::header::ALLOW)
                .unwrap()
                .to_str()
                .unwrap(),
            "POST"
        );
    }

    #[test]
    fn test_from_error_binding() {
        let err = SprungError::Binding {
            field: "id".into(),
            reason: "invalid digit found in string".into(),
        };
        let resp = HttpResponse::from_error(&err);
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert!(resp.body().contains("id"));
    }

    #[test]
    fn test_from_error_view_not_found() {
        let err = SprungError::ViewNotFound { view: "vo01".into() };
        let resp = HttpResponse::from_error(&err);
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_from_error_malformed_upload() {
        let err = SprungError::MalformedUpload("no terminator".into());
        let resp = HttpResponse::from_error(&err);
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    // ── Axum conversion ─────────────────────────────────────────────

    #[test]
    fn test_into_response() {
        let resp = HttpResponse::ok("Hello, World!");
        let axum_resp = resp.into_response();
        assert_eq!(axum_resp.status(), StatusCode::OK);
        let ct = axum_resp
            .headers()
            .get(http::header::CONTENT_TYPE)
            .unwrap()
            .to_str()
            .unwrap();
        assert!(ct.contains("text/html"));
        assert!(ct.contains("utf-8"));
    }

    #[test]
    fn test_into_response_with_custom_header() {
        let resp = HttpResponse::ok("test").set_header(
            http::header::HeaderName::from_static("x-custom"),
            HeaderValue::from_static("custom-value"),
        );
        let axum_resp = resp.into_response();
        assert_eq!(
            axum_resp.headers().get("x-custom").unwrap().to_str().unwrap(),
            "custom-value"
        );
    }

    #[test]
    fn test_into_response_redirect_keeps_location() {
        let resp = HttpResponse::redirect("/exUpload");
        let axum_resp = resp.into_response();
        assert_eq!(axum_resp.status(), StatusCode::FOUND);
        assert_eq!(
            axum_resp
                .headers()
                .get(http::header::LOCATION)
                .unwrap()
                .to_str()
                .unwrap(),
            "/exUpload"
        );
    }

    #[test]
    fn test_set_content_type() {
        let mut resp = HttpResponse::ok("plain");
        resp.set_content_type("text/plain");
        assert_eq!(resp.content_type(), "text/plain");
    }

    #[test]
    fn test_headers_mut() {
        let mut resp = HttpResponse::ok("test");
        resp.headers_mut()
            .insert(http::header::ETAG, HeaderValue::from_static("\"abc\""));
        assert!(resp.headers().get(http::header::ETAG).is_some());
    }
}
