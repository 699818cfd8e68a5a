use std::io::Cursor;
use std::net::SocketAddr;
use std::sync::Arc;

use common::storage::{MemoryObjectStore, ObjectStore};
use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
use reqwest::{Client, Response};

use resizer::config::AppConfig;
use resizer::imaging::{ImageTransformer, RustTransformer};
use resizer::state::AppState;

/// A running test server backed by in-memory stores.
pub struct TestApp {
    pub addr: SocketAddr,
    pub client: Client,
    pub state: AppState,
    pub originals: Arc<MemoryObjectStore>,
    pub thumbnails: Arc<MemoryObjectStore>,
}

impl TestApp {
    pub async fn spawn() -> Self {
        Self::spawn_with(AppConfig::default()).await
    }

    pub async fn spawn_with(config: AppConfig) -> Self {
        let originals = Arc::new(MemoryObjectStore::new());
        let thumbnails = Arc::new(MemoryObjectStore::new());
        let transformer = Arc::new(RustTransformer::new(config.thumbnails.jpeg_quality));

        let state = AppState::new(
            config,
            originals.clone() as Arc<dyn ObjectStore>,
            thumbnails.clone() as Arc<dyn ObjectStore>,
            transformer as Arc<dyn ImageTransformer>,
        );

        let app = resizer::build_router(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind to random port");
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            addr,
            client: Client::new(),
            state,
            originals,
            thumbnails,
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    pub async fn upload(&self, path: &str, body: Vec<u8>) -> Response {
        self.client
            .post(self.url(path))
            .body(body)
            .send()
            .await
            .expect("Failed to send POST request")
    }

    pub async fn upload_multipart(&self, path: &str, field: &str, body: Vec<u8>) -> Response {
        let part = reqwest::multipart::Part::bytes(body).file_name("upload.png");
        let form = reqwest::multipart::Form::new().part(field.to_string(), part);
        self.client
            .post(self.url(path))
            .multipart(form)
            .send()
            .await
            .expect("Failed to send multipart POST request")
    }

    pub async fn get(&self, path: &str) -> Response {
        self.client
            .get(self.url(path))
            .send()
            .await
            .expect("Failed to send GET request")
    }

    pub async fn get_if_none_match(&self, path: &str, etag: &str) -> Response {
        self.client
            .get(self.url(path))
            .header("If-None-Match", etag)
            .send()
            .await
            .expect("Failed to send GET request")
    }

    pub async fn delete(&self, path: &str) -> Response {
        self.client
            .delete(self.url(path))
            .send()
            .await
            .expect("Failed to send DELETE request")
    }
}

/// Encode a synthetic gradient image.
pub fn sample_image(width: u32, height: u32, format: ImageFormat) -> Vec<u8> {
    let img = RgbImage::from_fn(width, height, |x, y| {
        Rgb([(x % 256) as u8, (y % 256) as u8, 128])
    });
    let mut out = Vec::new();
    DynamicImage::ImageRgb8(img)
        .write_to(&mut Cursor::new(&mut out), format)
        .expect("Failed to encode sample image");
    out
}

pub fn etag_of(res: &Response) -> String {
    res.headers()
        .get("etag")
        .expect("response carries an ETag")
        .to_str()
        .unwrap()
        .to_string()
}
