//! # sprung-http
//!
//! HTTP layer for the sprung framework. Provides Request and Response types,
//! ordered parameter dictionaries, and multipart form-data parsing.
//!
//! ## Modules
//!
//! - [`params`] - Ordered request parameter dictionary
//! - [`request`] - The [`HttpRequest`] type and its test builder
//! - [`response`] - The [`HttpResponse`] type and error-to-response mapping
//! - [`multipart`] - Multipart form-data parsing and uploaded files

pub mod multipart;
pub mod params;
pub mod request;
pub mod response;

// Re-export the most commonly used types at the crate root.
pub use multipart::{MultipartForm, UploadedFile, DEFAULT_MAX_MEMORY_SIZE};
pub use params::Params;
pub use request::{HttpRequest, HttpRequestBuilder};
pub use response::HttpResponse;
