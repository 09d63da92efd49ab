//! Body and path extractors whose rejections use the [`ApiError`] shape.
//!
//! The plain axum extractors answer malformed input with a text body;
//! these wrappers keep every failure a `{ "error", "code" }` JSON body.

use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{FromRequest, FromRequestParts};

use crate::backend::io::rest::error::ApiError;

/// JSON request body
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);

/// Path parameters
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(ApiError))]
pub struct ApiPath<T>(pub T);

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::new(rejection.status(), "INVALID_BODY", rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        Self::new(rejection.status(), "INVALID_PATH", rejection.body_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use axum::routing::post;
    use axum::Router;
    use serde::Deserialize;
    use serde_json::Value;
    use tower::util::ServiceExt;

    #[derive(Deserialize)]
    struct Note {
        text: String,
    }

    async fn echo(ApiPath(id): ApiPath<u32>, ApiJson(note): ApiJson<Note>) -> String {
        format!("{}:{}", id, note.text)
    }

    async fn call(uri: &str, content_type: &str, body: &str) -> (StatusCode, Vec<u8>) {
        let app = Router::new().route("/notes/:id", post(echo));
        let request = Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", content_type)
            .body(Body::from(body.to_string()))
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, bytes.to_vec())
    }

    fn code(bytes: &[u8]) -> String {
        let body: Value = serde_json::from_slice(bytes).unwrap();
        assert!(body["error"].is_string());
        body["code"].as_str().unwrap().to_string()
    }

    #[tokio::test]
    async fn test_well_formed_request_passes_through() {
        let (status, bytes) = call("/notes/7", "application/json", r#"{"text":"hi"}"#).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(bytes, b"7:hi");
    }

    #[tokio::test]
    async fn test_malformed_body_is_an_api_error() {
        let (status, bytes) = call("/notes/7", "application/json", "{not json").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(code(&bytes), "INVALID_BODY");

        let (status, bytes) = call("/notes/7", "application/json", r#"{"words":"hi"}"#).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(code(&bytes), "INVALID_BODY");

        let (status, bytes) = call("/notes/7", "text/plain", r#"{"text":"hi"}"#).await;
        assert_eq!(status, StatusCode::UNSUPPORTED_MEDIA_TYPE);
        assert_eq!(code(&bytes), "INVALID_BODY");
    }

    #[tokio::test]
    async fn test_bad_path_parameter_is_an_api_error() {
        let (status, bytes) = call("/notes/seven", "application/json", r#"{"text":"hi"}"#).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(code(&bytes), "INVALID_PATH");
    }
}
