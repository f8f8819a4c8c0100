//! HTTP request type.
//!
//! [`HttpRequest`] mirrors Spring MVC's view of `HttpServletRequest`: the
//! method, the path, decoded query and form parameters, and any uploaded
//! files, all materialized up front so handlers stay synchronous.

use http::{HeaderMap, Method};

use sprung_core::{SprungError, SprungResult};

use crate::multipart::{self, UploadedFile, DEFAULT_MAX_MEMORY_SIZE};
use crate::params::Params;

/// An HTTP request as seen by route handlers.
///
/// Instances are created from an incoming Axum request via
/// [`HttpRequest::from_parts`], or through [`HttpRequest::builder`] in tests.
/// Construction parses urlencoded form bodies into [`form`](Self::form) and
/// multipart bodies into [`form`](Self::form) plus [`files`](Self::files);
/// a malformed multipart body fails construction, before any handler runs.
///
/// # Examples
///
/// ```
/// use sprung_http::HttpRequest;
///
/// let request = HttpRequest::builder()
///     .method(http::Method::GET)
///     .path("/vo")
///     .query_string("name=widget&id=42")
///     .build()
///     .unwrap();
///
/// assert_eq!(request.method(), &http::Method::GET);
/// assert_eq!(request.param("name"), Some("widget"));
/// ```
#[derive(Debug)]
pub struct HttpRequest {
    method: Method,
    path: String,
    query_string: String,
    content_type: Option<String>,
    query: Params,
    form: Params,
    headers: HeaderMap,
    body: Vec<u8>,
    files: Vec<(String, UploadedFile)>,
}

impl HttpRequest {
    /// Creates a new [`HttpRequestBuilder`] for constructing an `HttpRequest`.
    pub fn builder() -> HttpRequestBuilder {
        HttpRequestBuilder::default()
    }

    /// Creates an `HttpRequest` from an Axum request's parts and body bytes.
    ///
    /// `max_upload_bytes` caps the in-memory size of a single uploaded file.
    ///
    /// # Errors
    ///
    /// Returns [`SprungError::MalformedUpload`] if the body declares
    /// `multipart/form-data` but violates multipart framing, lacks a
    /// boundary, or carries a file over the cap.
    pub fn from_parts(
        parts: http::request::Parts,
        body: Vec<u8>,
        max_upload_bytes: usize,
    ) -> SprungResult<Self> {
        let method = parts.method;
        let uri = parts.uri;
        let headers = parts.headers;

        let path = uri.path().to_string();
        let query_string = uri.query().unwrap_or("").to_string();
        let query = Params::parse(&query_string);

        let content_type = headers
            .get(http::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(String::from);

        let (form, files) = parse_body(content_type.as_deref(), &body, max_upload_bytes)?;

        Ok(Self {
            method,
            path,
            query_string,
            content_type,
            query,
            form,
            headers,
            body,
            files,
        })
    }

    /// Returns the HTTP method.
    pub const fn method(&self) -> &Method {
        &self.method
    }

    /// Returns the request path (without query string).
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Returns the raw query string (without the leading `?`).
    pub fn query_string(&self) -> &str {
        &self.query_string
    }

    /// Returns the content type of the request body, if set.
    pub fn content_type(&self) -> Option<&str> {
        self.content_type.as_deref()
    }

    /// Returns the decoded query string parameters.
    pub const fn query(&self) -> &Params {
        &self.query
    }

    /// Returns the decoded form body parameters.
    ///
    /// Populated from urlencoded bodies and from the text fields of
    /// multipart bodies.
    pub const fn form(&self) -> &Params {
        &self.form
    }

    /// Looks up a parameter by name, checking query parameters first and
    /// form fields second.
    ///
    /// This is the lookup order parameter binding uses.
    pub fn param(&self, name: &str) -> Option<&str> {
        self.query.get(name).or_else(|| self.form.get(name))
    }

    /// Returns the request headers.
    pub const fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Returns the raw request body bytes.
    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Returns all uploaded files in submission order, as
    /// `(field name, file)` pairs.
    pub fn files(&self) -> &[(String, UploadedFile)] {
        &self.files
    }

    /// Returns the files submitted under the given field name, in order.
    pub fn files_for(&self, field: &str) -> Vec<&UploadedFile> {
        self.files
            .iter()
            .filter(|(name, _)| name == field)
            .map(|(_, file)| file)
            .collect()
    }
}

/// Parses the request body according to its content type.
fn parse_body(
    content_type: Option<&str>,
    body: &[u8],
    max_upload_bytes: usize,
) -> SprungResult<(Params, Vec<(String, UploadedFile)>)> {
    match content_type {
        Some(ct) if ct.starts_with("application/x-www-form-urlencoded") => {
            let body_str = String::from_utf8_lossy(body);
            Ok((Params::parse(&body_str), Vec::new()))
        }
        Some(ct) if ct.starts_with("multipart/form-data") => {
            let boundary = multipart::extract_boundary(ct).ok_or_else(|| {
                SprungError::MalformedUpload(
                    "missing boundary parameter in content type".to_string(),
                )
            })?;
            let form = multipart::parse_multipart(body, boundary, max_upload_bytes)?;
            Ok((Params::from_pairs(form.fields), form.files))
        }
        _ => Ok((Params::new(), Vec::new())),
    }
}

/// Builder for constructing [`HttpRequest`] instances in tests.
///
/// Provides a fluent API for building requests without a full Axum request.
/// [`build`](HttpRequestBuilder::build) parses the body the same way
/// [`HttpRequest::from_parts`] does, so malformed multipart bodies fail
/// here too.
#[derive(Debug)]
pub struct HttpRequestBuilder {
    method: Method,
    path: String,
    query_string: String,
    content_type: Option<String>,
    headers: HeaderMap,
    body: Vec<u8>,
    max_upload_bytes: usize,
}

impl Default for HttpRequestBuilder {
    fn default() -> Self {
        Self {
            method: Method::GET,
            path: "/".to_string(),
            query_string: String::new(),
            content_type: None,
            headers: HeaderMap::new(),
            body: Vec::new(),
            max_upload_bytes: DEFAULT_MAX_MEMORY_SIZE,
        }
    }
}

impl HttpRequestBuilder {
    /// Sets the HTTP method.
    #[must_use]
    pub fn method(mut self, method: Method) -> Self {
        self.method = method;
        self
    }

    /// Sets the request path.
    #[must_use]
    pub fn path(mut self, path: &str) -> Self {
        self.path = path.to_string();
        self
    }

    /// Sets the query string (without leading `?`).
    #[must_use]
    pub fn query_string(mut self, qs: &str) -> Self {
        self.query_string = qs.to_string();
        self
    }

    /// Sets the content type.
    #[must_use]
    pub fn content_type(mut self, ct: &str) -> Self {
        self.content_type = Some(ct.to_string());
        self
    }

    /// Adds a header.
    #[must_use]
    pub fn header(mut self, name: &str, value: &str) -> Self {
        if let (Ok(name), Ok(value)) = (
            http::header::HeaderName::from_bytes(name.as_bytes()),
            http::header::HeaderValue::from_str(value),
        ) {
            self.headers.insert(name, value);
        }
        self
    }

    /// Sets the request body.
    #[must_use]
    pub fn body(mut self, body: Vec<u8>) -> Self {
        self.body = body;
        self
    }

    /// Sets the in-memory cap for a single uploaded file.
    #[must_use]
    pub const fn max_upload_bytes(mut self, bytes: usize) -> Self {
        self.max_upload_bytes = bytes;
        self
    }

    /// Builds the [`HttpRequest`].
    ///
    /// # Errors
    ///
    /// Returns [`SprungError::MalformedUpload`] if a multipart body cannot
    /// be parsed.
    pub fn build(self) -> SprungResult<HttpRequest> {
        let query = Params::parse(&self.query_string);
        let (form, files) =
            parse_body(self.content_type.as_deref(), &self.body, self.max_upload_bytes)?;

        Ok(HttpRequest {
            method: self.method,
            path: self.path,
            query_string: self.query_string,
            content_type: self.content_type,
            query,
            form,
            headers: self.headers,
            body: self.body,
            files,
        })
    }
}
