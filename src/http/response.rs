//! HTTP response building module
//!
//! Provides the boxed response body type and builders for the fixed
//! status responses the server produces.

use hyper::body::Bytes;
use http_body_util::combinators::BoxBody;
use http_body_util::{BodyExt, Empty, Full};
use hyper::header::{ALLOW, CACHE_CONTROL, CONTENT_LENGTH, CONTENT_TYPE};
use hyper::http::response::Builder;
use hyper::{Response, StatusCode};

/// Body of every response: fixed bytes or a streamed file
pub type ResponseBody = BoxBody<Bytes, std::io::Error>;

/// Body holding `data`
pub fn full(data: impl Into<Bytes>) -> ResponseBody {
    Full::new(data.into()).map_err(|never| match never {}).boxed()
}

/// Body with no bytes
pub fn empty() -> ResponseBody {
    Empty::<Bytes>::new().map_err(|never| match never {}).boxed()
}

/// Finish `builder` with `body`, falling back to an empty 500 if the headers were invalid
pub fn finish(builder: Builder, body: ResponseBody, label: &str) -> Response<ResponseBody> {
    builder.body(body).unwrap_or_else(|e| {
        log_build_error(label, &e);
        let mut response = Response::new(empty());
        *response.status_mut() = StatusCode::INTERNAL_SERVER_ERROR;
        response
    })
}

/// Build 304 Not Modified response, keeping the headers already on `builder`
pub fn build_304_response(builder: Builder) -> Response<ResponseBody> {
    finish(builder.status(StatusCode::NOT_MODIFIED), empty(), "304")
}

/// Build 404 Not Found response
pub fn build_404_response() -> Response<ResponseBody> {
    build_text_response(StatusCode::NOT_FOUND, "Not found\n".to_string())
}

/// Build 405 Method Not Allowed response
pub fn build_405_response() -> Response<ResponseBody> {
    let builder = Response::builder()
        .status(StatusCode::METHOD_NOT_ALLOWED)
        .header(ALLOW, "GET");
    finish(builder, empty(), "405")
}

/// Build 500 Internal Server Error response carrying the error text
pub fn build_500_response(message: &str) -> Response<ResponseBody> {
    build_text_response(StatusCode::INTERNAL_SERVER_ERROR, format!("{message}\n"))
}

/// Build plain-text response
pub fn build_text_response(status: StatusCode, text: String) -> Response<ResponseBody> {
    let builder = Response::builder()
        .status(status)
        .header(CONTENT_TYPE, "text/plain; charset=utf-8")
        .header(CONTENT_LENGTH, text.len());
    finish(builder, full(text), status.as_str())
}

/// Build generated HTML response (directory listings)
pub fn build_html_response(html: String) -> Response<ResponseBody> {
    let builder = Response::builder()
        .status(StatusCode::OK)
        .header(CONTENT_TYPE, "text/html; charset=utf-8")
        .header(CONTENT_LENGTH, html.len())
        .header(CACHE_CONTROL, "no-cache");
    finish(builder, full(html), "HTML")
}

/// Log response build error
fn log_build_error(label: &str, error: &hyper::http::Error) {
    crate::logger::log_error(&format!("Failed to build {label} response: {error}"));
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn body_bytes(response: Response<ResponseBody>) -> Bytes {
        response.into_body().collect().await.unwrap().to_bytes()
    }

    #[tokio::test]
    async fn test_404() {
        let response = build_404_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_bytes(response).await, "Not found\n");
    }

    #[tokio::test]
    async fn test_405_has_empty_body() {
        let response = build_405_response();
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(response.headers()[ALLOW], "GET");
        assert!(body_bytes(response).await.is_empty());
    }

    #[tokio::test]
    async fn test_500_carries_message() {
        let response = build_500_response("permission denied");
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body_bytes(response).await, "permission denied\n");
    }

    #[tokio::test]
    async fn test_304_keeps_headers() {
        let builder = Response::builder().header("Last-Modified", "Sun, 06 Nov 1994 08:49:37 GMT");
        let response = build_304_response(builder);
        assert_eq!(response.status(), StatusCode::NOT_MODIFIED);
        assert!(response.headers().contains_key("last-modified"));
        assert!(body_bytes(response).await.is_empty());
    }

    #[test]
    fn test_invalid_header_falls_back() {
        let builder = Response::builder().header("bad header", "x");
        let response = finish(builder, empty(), "test");
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
