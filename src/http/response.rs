//! HTTP response building module
//!
//! Provides builders for the responses the dispatcher synthesizes itself.
//! Proxied responses are passed through untouched and never built here.

use http_body_util::{BodyExt, Full};
use hyper::body::Bytes;
use hyper::{Response, StatusCode};
use std::path::Path;

use super::ResponseBody;

/// Wrap in-memory bytes as a response body
pub fn full_body(data: impl Into<Bytes>) -> ResponseBody {
    Full::new(data.into())
        .map_err(|never| match never {})
        .boxed_unsync()
}

/// Build 200 response for a file read from disk
pub fn build_file_response(
    path: &Path,
    content: Vec<u8>,
    content_type: &str,
) -> Response<ResponseBody> {
    Response::builder()
        .status(StatusCode::OK)
        .header("Content-Type", content_type)
        .body(full_body(content))
        .unwrap_or_else(|e| {
            log_build_error(&format!("200 ({})", path.display()), &e);
            Response::new(full_body(Bytes::new()))
        })
}

/// Build 404 Not Found response
pub fn build_404_response() -> Response<ResponseBody> {
    build_plain_text_response(StatusCode::NOT_FOUND, "File not found".to_string())
}

/// Build 500 Internal Server Error response carrying a human-readable message
pub fn build_server_error_response(message: String) -> Response<ResponseBody> {
    build_plain_text_response(StatusCode::INTERNAL_SERVER_ERROR, message)
}

fn build_plain_text_response(status: StatusCode, message: String) -> Response<ResponseBody> {
    Response::builder()
        .status(status)
        .header("Content-Type", "text/plain")
        .body(full_body(message))
        .unwrap_or_else(|e| {
            log_build_error(status.as_str(), &e);
            let mut resp = Response::new(full_body(Bytes::new()));
            *resp.status_mut() = status;
            resp
        })
}

/// Log response build error
fn log_build_error(status: &str, error: &hyper::http::Error) {
    crate::logger::log_error(&format!("Failed to build {status} response: {error}"));
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn body_bytes(resp: Response<ResponseBody>) -> Bytes {
        resp.into_body().collect().await.unwrap().to_bytes()
    }

    #[tokio::test]
    async fn test_file_response() {
        let resp =
            build_file_response(Path::new("./main.css"), b"body { }".to_vec(), "text/css");
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(resp.headers()["content-type"], "text/css");
        assert_eq!(body_bytes(resp).await, Bytes::from_static(b"body { }"));
    }

    #[tokio::test]
    async fn test_404_response() {
        let resp = build_404_response();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        assert_eq!(resp.headers()["content-type"], "text/plain");
        assert_eq!(body_bytes(resp).await, Bytes::from_static(b"File not found"));
    }

    #[tokio::test]
    async fn test_server_error_response() {
        let resp = build_server_error_response("Server Error: PermissionDenied".to_string());
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(resp.headers()["content-type"], "text/plain");
        assert_eq!(
            body_bytes(resp).await,
            Bytes::from_static(b"Server Error: PermissionDenied")
        );
    }
}
