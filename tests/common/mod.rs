#![allow(dead_code)]

use std::io::Cursor;
use std::path::Path;
use std::sync::Arc;

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Request, Response, header};
use bgremove::api::create_router;
use bgremove::config::Config;
use bgremove::remover::BackgroundRemover;
use bgremove::utils::state::AppState;
use image::{DynamicImage, ImageFormat, Rgb, RgbImage, Rgba, RgbaImage};
use tower::ServiceExt;

pub const BOUNDARY: &str = "bgremove-test-boundary";

pub struct TestApp {
    pub dir: tempfile::TempDir,
    pub router: Router,
}

impl TestApp {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let state = AppState::new(Config::with_root(dir.path()));
        Self::build(dir, state)
    }

    pub fn with_config(configure: impl FnOnce(&mut Config)) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::with_root(dir.path());
        configure(&mut config);
        Self::build(dir, AppState::new(config))
    }

    pub fn with_remover(remover: Arc<dyn BackgroundRemover>) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let state = AppState::with_remover(Config::with_root(dir.path()), remover);
        Self::build(dir, state)
    }

    fn build(dir: tempfile::TempDir, state: AppState) -> Self {
        std::fs::create_dir_all(&state.config.upload_root).unwrap();
        std::fs::create_dir_all(&state.config.output_root).unwrap();
        TestApp {
            dir,
            router: create_router(Arc::new(state)),
        }
    }

    pub fn uploads(&self) -> std::path::PathBuf {
        self.dir.path().join("uploads")
    }

    pub fn outputs(&self) -> std::path::PathBuf {
        self.dir.path().join("outputs")
    }

    pub async fn upload(&self, files: &[(&str, Vec<u8>)]) -> Response<Body> {
        self.post_multipart(multipart_body("files", files)).await
    }

    pub async fn post_multipart(&self, body: Vec<u8>) -> Response<Body> {
        let request = Request::post("/upload")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .unwrap();
        self.router.clone().oneshot(request).await.unwrap()
    }

    pub async fn get(&self, uri: &str) -> Response<Body> {
        let request = Request::get(uri).body(Body::empty()).unwrap();
        self.router.clone().oneshot(request).await.unwrap()
    }
}

pub fn multipart_body(field: &str, files: &[(&str, Vec<u8>)]) -> Vec<u8> {
    let mut body = Vec::new();
    for (name, bytes) in files {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        body.extend_from_slice(
            format!(
                "Content-Disposition: form-data; name=\"{field}\"; filename=\"{name}\"\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(b"Content-Type: application/octet-stream\r\n\r\n");
        body.extend_from_slice(bytes);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

/// A form with a single plain text part, no `filename` parameter.
pub fn text_field_body(field: &str, value: &str) -> Vec<u8> {
    format!(
        "--{BOUNDARY}\r\n\
         Content-Disposition: form-data; name=\"{field}\"\r\n\r\n\
         {value}\r\n--{BOUNDARY}--\r\n"
    )
    .into_bytes()
}

pub async fn json(response: Response<Body>) -> serde_json::Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    to_bytes(response.into_body(), usize::MAX).await.unwrap().to_vec()
}

/// White 16x16 PNG with a dark square in the middle.
pub fn png_fixture() -> Vec<u8> {
    let mut img = RgbaImage::from_pixel(16, 16, Rgba([255, 255, 255, 255]));
    for y in 6..10 {
        for x in 6..10 {
            img.put_pixel(x, y, Rgba([20, 20, 20, 255]));
        }
    }
    encode(DynamicImage::ImageRgba8(img), ImageFormat::Png)
}

pub fn jpeg_fixture() -> Vec<u8> {
    let img = RgbImage::from_pixel(16, 16, Rgb([250, 250, 250]));
    encode(DynamicImage::ImageRgb8(img), ImageFormat::Jpeg)
}

fn encode(img: DynamicImage, format: ImageFormat) -> Vec<u8> {
    let mut bytes = Vec::new();
    img.write_to(&mut Cursor::new(&mut bytes), format).unwrap();
    bytes
}

pub fn entries(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}
