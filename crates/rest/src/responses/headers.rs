//! Response header generation.

use axum::http::{HeaderMap, HeaderValue, header};

/// Builder for entity response headers.
///
/// Covers the headers the API sets beyond the body's own content type:
/// - Location (for create operations)
/// - Content-Type (for file downloads)
/// - Content-Disposition (for file downloads)
#[derive(Debug, Default)]
pub struct ResponseHeaders {
    /// Location URL (for created entities).
    location: Option<String>,
    /// Content-Type override.
    content_type: Option<String>,
    /// Content-Disposition value.
    content_disposition: Option<String>,
}

impl ResponseHeaders {
    /// Creates an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the Location URL.
    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    /// Sets the Content-Type.
    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    /// Marks the body as a download named `file_name`.
    pub fn with_attachment(mut self, file_name: &str) -> Self {
        self.content_disposition = Some(content_disposition(file_name));
        self
    }

    /// Converts to an Axum HeaderMap.
    pub fn to_header_map(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();

        if let Some(content_type) = &self.content_type {
            if let Ok(value) = HeaderValue::from_str(content_type) {
                headers.insert(header::CONTENT_TYPE, value);
            }
        }

        if let Some(disposition) = &self.content_disposition {
            if let Ok(value) = HeaderValue::from_str(disposition) {
                headers.insert(header::CONTENT_DISPOSITION, value);
            }
        }

        if let Some(location) = &self.location {
            if let Ok(value) = HeaderValue::from_str(location) {
                headers.insert(header::LOCATION, value);
            }
        }

        headers
    }

    /// Returns the Location value.
    pub fn location(&self) -> Option<&str> {
        self.location.as_deref()
    }
}

/// Builds `attachment; filename="..."; filename*=UTF-8''...`.
///
/// The quoted form carries an ASCII fallback; the extended form carries the
/// exact name percent-encoded (RFC 6266).
fn content_disposition(file_name: &str) -> String {
    let fallback: String = file_name
        .chars()
        .map(|c| {
            if c.is_ascii_graphic() && c != '"' && c != '\\' || c == ' ' {
                c
            } else {
                '_'
            }
        })
        .collect();

    let mut encoded = String::with_capacity(file_name.len());
    for byte in file_name.bytes() {
        if byte.is_ascii_alphanumeric() || b"!#$&+-.^_`|~".contains(&byte) {
            encoded.push(byte as char);
        } else {
            encoded.push_str(&format!("%{:02X}", byte));
        }
    }

    format!(
        "attachment; filename=\"{}\"; filename*=UTF-8''{}",
        fallback, encoded
    )
}
