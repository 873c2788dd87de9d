//! Response building for the MedSys REST API.
//!
//! - [`headers`] - Response header generation (Location, Content-Disposition)
//! - [`created`] - `201 Created` with a `Location` header and JSON body
//! - [`attachment`] - binary file download

pub mod headers;

pub use headers::ResponseHeaders;

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

/// Builds a `201 Created` response pointing at `location`.
pub fn created<T: Serialize>(location: impl Into<String>, body: T) -> Response {
    let headers = ResponseHeaders::new().with_location(location);
    (StatusCode::CREATED, headers.to_header_map(), Json(body)).into_response()
}

/// Builds a `200 OK` download response for `bytes` named `file_name`.
pub fn attachment(file_name: &str, bytes: Vec<u8>) -> Response {
    let headers = ResponseHeaders::new()
        .with_content_type(mime::APPLICATION_OCTET_STREAM.as_ref())
        .with_attachment(file_name);
    (StatusCode::OK, headers.to_header_map(), bytes).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::header;
    use serde_json::json;

    #[test]
    fn test_created_sets_location() {
        let response = created("http://localhost:8080/api/patients/7", json!({"id": 7}));

        assert_eq!(response.status(), StatusCode::CREATED);
        assert_eq!(
            response.headers()[header::LOCATION],
            "http://localhost:8080/api/patients/7"
        );
        assert_eq!(response.headers()[header::CONTENT_TYPE], "application/json");
    }

    #[test]
    fn test_attachment_headers() {
        let response = attachment("xray.png", vec![0x89, 0x50]);

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "application/octet-stream"
        );
        let disposition = response.headers()[header::CONTENT_DISPOSITION]
            .to_str()
            .unwrap();
        assert!(disposition.starts_with("attachment; filename=\"xray.png\""));
    }
}
