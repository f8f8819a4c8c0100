//! Multipart form-data parsing for file uploads.
//!
//! Provides [`parse_multipart`] to extract form fields and uploaded files
//! from `multipart/form-data` request bodies, mirroring Spring MVC's
//! `MultipartResolver`. Uploads are buffered in memory and scoped to the
//! request; nothing is written to disk.

use sprung_core::{SprungError, SprungResult};

/// Default maximum memory size for a single uploaded file (2.5 MB).
pub const DEFAULT_MAX_MEMORY_SIZE: usize = 2_621_440;

/// An uploaded file from a multipart form submission.
///
/// Mirrors Spring MVC's `MultipartFile`: the original filename, the declared
/// content type, and the raw bytes.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    /// The original filename as provided by the client.
    pub name: String,
    /// The MIME content type of the file.
    pub content_type: String,
    /// The size of the file content in bytes.
    pub size: usize,
    /// The raw file content.
    pub content: Vec<u8>,
}

/// The result of parsing a multipart form-data body.
///
/// Fields and files are both kept in submission order; a file's position in
/// [`files`](MultipartForm::files) is its position in the request body.
#[derive(Debug, Clone, Default)]
pub struct MultipartForm {
    /// Regular form fields as `(name, value)` pairs.
    pub fields: Vec<(String, String)>,
    /// Uploaded files as `(field name, file)` pairs.
    pub files: Vec<(String, UploadedFile)>,
}

impl MultipartForm {
    /// Returns the files submitted under the given field name, in order.
    pub fn files_for(&self, field: &str) -> Vec<&UploadedFile> {
        self.files
            .iter()
            .filter(|(name, _)| name == field)
            .map(|(_, file)| file)
            .collect()
    }

    /// Returns the total number of uploaded files.
    pub fn file_count(&self) -> usize {
        self.files.len()
    }
}

/// Extracts the boundary string from a `Content-Type: multipart/form-data`
/// header.
///
/// The boundary is specified as `boundary=<value>` in the Content-Type
/// header. Returns `None` if the boundary cannot be found.
pub fn extract_boundary(content_type: &str) -> Option<&str> {
    for part in content_type.split(';') {
        let trimmed = part.trim();
        if let Some(boundary) = trimmed.strip_prefix("boundary=") {
            let boundary = boundary.trim_matches('"');
            if boundary.is_empty() {
                return None;
            }
            return Some(boundary);
        }
    }
    None
}

/// Parses a multipart/form-data request body.
///
/// Splits the body on the boundary delimiter, then parses each part's
/// headers (particularly `Content-Disposition`) to decide whether the part
/// is a regular form field or a file upload. An empty body yields an empty
/// form; a form with no file parts is valid.
///
/// Framing runs over raw bytes; only each part's header block is decoded
/// as text, so binary file content passes through untouched. Both CRLF and
/// bare-LF line endings are accepted.
///
/// # Errors
///
/// Returns [`SprungError::MalformedUpload`] when the body violates multipart
/// framing: a non-empty body that does not open with the boundary delimiter,
/// a part without the blank line separating headers from content, a missing
/// terminating delimiter, or a file larger than `max_memory` bytes.
pub fn parse_multipart(
    body: &[u8],
    boundary: &str,
    max_memory: usize,
) -> SprungResult<MultipartForm> {
    if body.is_empty() {
        return Ok(MultipartForm::default());
    }

    let delimiter = format!("--{boundary}").into_bytes();

    let mut start = 0;
    while start < body.len() && (body[start] == b'\r' || body[start] == b'\n') {
        start += 1;
    }
    let trimmed = &body[start..];
    if !trimmed.starts_with(&delimiter) {
        return Err(SprungError::MalformedUpload(
            "body does not open with the boundary delimiter".to_string(),
        ));
    }

    let mut form = MultipartForm::default();
    let mut terminated = false;
    let mut rest = &trimmed[delimiter.len()..];

    loop {
        // The bytes after the final delimiter start with the closing "--".
        if rest.starts_with(b"--") {
            terminated = true;
            break;
        }

        let Some(pos) = find_subsequence(rest, &delimiter) else {
            break;
        };
        let chunk = &rest[..pos];
        rest = &rest[pos + delimiter.len()..];

        let part = strip_leading_newline(chunk);
        if part.iter().all(u8::is_ascii_whitespace) {
            continue;
        }

        let Some((header_bytes, content)) = split_headers(part) else {
            return Err(SprungError::MalformedUpload(
                "part is missing the blank line after its headers".to_string(),
            ));
        };

        let disposition = parse_part_headers(&String::from_utf8_lossy(header_bytes));

        // Parts without a Content-Disposition name carry nothing bindable.
        let Some(name) = disposition.field_name else {
            continue;
        };

        // Drop the CRLF that precedes the next delimiter.
        let content = strip_trailing_newline(content);

        if let Some(filename) = disposition.filename {
            // An empty file input submits an empty filename and no content.
            if filename.is_empty() && content.is_empty() {
                continue;
            }

            if content.len() > max_memory {
                return Err(SprungError::MalformedUpload(format!(
                    "file '{filename}' exceeds the in-memory upload cap of {max_memory} bytes"
                )));
            }

            form.files.push((
                name,
                UploadedFile {
                    name: filename,
                    content_type: disposition.content_type,
                    size: content.len(),
                    content: content.to_vec(),
                },
            ));
        } else {
            form.fields
                .push((name, String::from_utf8_lossy(content).into_owned()));
        }
    }

    if !terminated {
        return Err(SprungError::MalformedUpload(
            "missing terminating boundary delimiter".to_string(),
        ));
    }

    Ok(form)
}

/// Finds the first occurrence of `needle` in `haystack`.
fn find_subsequence(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).position(|w| w == needle)
}

fn strip_leading_newline(part: &[u8]) -> &[u8] {
    part.strip_prefix(b"\r\n")
        .or_else(|| part.strip_prefix(b"\n"))
        .unwrap_or(part)
}

fn strip_trailing_newline(content: &[u8]) -> &[u8] {
    content
        .strip_suffix(b"\r\n")
        .or_else(|| content.strip_suffix(b"\n"))
        .unwrap_or(content)
}

/// Splits a part into its header block and content at the first blank line.
fn split_headers(part: &[u8]) -> Option<(&[u8], &[u8])> {
    if let Some(pos) = find_subsequence(part, b"\r\n\r\n") {
        Some((&part[..pos], &part[pos + 4..]))
    } else {
        find_subsequence(part, b"\n\n").map(|pos| (&part[..pos], &part[pos + 2..]))
    }
}

/// The interesting headers of one multipart part.
struct PartHeaders {
    field_name: Option<String>,
    filename: Option<String>,
    content_type: String,
}

/// Parses a part's header block for Content-Disposition and Content-Type.
fn parse_part_headers(headers_str: &str) -> PartHeaders {
    let mut headers = PartHeaders {
        field_name: None,
        filename: None,
        content_type: "text/plain".to_string(),
    };

    for line in headers_str.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let lower = line.to_lowercase();
        if lower.starts_with("content-disposition:") {
            if let Some(value) = line.split_once(':').map(|(_, v)| v.trim()) {
                if let Some(name) = header_param(value, "name") {
                    headers.field_name = Some(name);
                }
                if let Some(filename) = header_param(value, "filename") {
                    headers.filename = Some(filename);
                }
            }
        } else if lower.starts_with("content-type:") {
            if let Some(value) = line.split_once(':').map(|(_, v)| v.trim()) {
                headers.content_type = value.to_string();
            }
        }
    }

    headers
}

/// Extracts a parameter value from a header value string.
///
/// For example, from `form-data; name="field1"; filename="file.txt"`,
/// `header_param(value, "name")` returns `Some("field1")`.
fn header_param(header_value: &str, param_name: &str) -> Option<String> {
    let quoted = format!("{param_name}=\"");
    if let Some(start) = header_value.find(&quoted) {
        let value_start = start + quoted.len();
        if let Some(end) = header_value[value_start..].find('"') {
            return Some(header_value[value_start..value_start + end].to_string());
        }
    }

    // Unquoted form
    let bare = format!("{param_name}=");
    if let Some(start) = header_value.find(&bare) {
        let value_start = start + bare.len();
        let rest = &header_value[value_start..];
        let end = rest.find(';').unwrap_or(rest.len());
        let value = rest[..end].trim().trim_matches('"');
        if !value.is_empty() {
            return Some(value.to_string());
        }
    }

    None
}
