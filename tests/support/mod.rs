// shared test helpers
#![allow(dead_code)] // helpers are shared across multiple integration test crates

use axum::body::Body;
use axum::http::{header, Method, Request};
use axum::response::Response;
use std::path::Path;
use upsink::{
    config::{AppConfig, ServerConfig, UploadConfig},
    server::app::create_test_app,
};

pub const BOUNDARY: &str = "----upsink-boundary";

pub fn base_config(upload_dir: &Path) -> AppConfig {
    AppConfig {
        server: ServerConfig {
            upload_dir: upload_dir.to_path_buf(),
            ..Default::default()
        },
        upload: UploadConfig::default(),
    }
}

pub fn app(config: AppConfig) -> axum::Router {
    create_test_app(config)
}

/// one part of a hand-assembled multipart body
pub struct Part<'a> {
    pub name: &'a str,
    pub filename: Option<&'a str>,
    pub content: &'a [u8],
}

pub fn multipart_body_parts(boundary: &str, parts: &[Part]) -> Vec<u8> {
    let mut body = Vec::new();
    for part in parts {
        body.extend_from_slice(format!("--{boundary}\r\n").as_bytes());
        let disposition = match part.filename {
            Some(filename) => format!(
                "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n",
                part.name, filename
            ),
            None => format!("Content-Disposition: form-data; name=\"{}\"\r\n", part.name),
        };
        body.extend_from_slice(disposition.as_bytes());
        body.extend_from_slice(b"Content-Type: application/octet-stream\r\n\r\n");
        body.extend_from_slice(part.content);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{boundary}--\r\n").as_bytes());
    body
}

pub fn multipart_body(boundary: &str, filename: &str, content: &[u8]) -> Vec<u8> {
    multipart_body_parts(
        boundary,
        &[Part {
            name: "file",
            filename: Some(filename),
            content,
        }],
    )
}

pub fn multipart_request(uri: &str, boundary: &str, body: Vec<u8>) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={boundary}"),
        )
        .body(Body::from(body))
        .unwrap()
}

pub fn post_with_content_type(uri: &str, content_type: &str, body: Vec<u8>) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::CONTENT_TYPE, content_type)
        .body(Body::from(body))
        .unwrap()
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

pub async fn body_string(response: Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}
