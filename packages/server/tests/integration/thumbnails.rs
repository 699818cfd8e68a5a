use common::storage::ObjectStore;
use image::{GenericImageView, ImageFormat};

use crate::common::{TestApp, etag_of, sample_image};

#[tokio::test]
async fn first_request_renders_and_persists() {
    let app = TestApp::spawn().await;
    app.upload("/photo.png", sample_image(64, 32, ImageFormat::Png))
        .await;

    let res = app.get("/20x10/center/photo.png").await;
    assert_eq!(res.status().as_u16(), 200);
    assert_eq!(
        res.headers().get("content-type").unwrap().to_str().unwrap(),
        "image/png"
    );
    assert!(etag_of(&res).starts_with("W/\""));
    assert!(res.headers().get("cache-control").is_some());

    let body = res.bytes().await.unwrap();
    let decoded = image::load_from_memory(&body).unwrap();
    assert_eq!(decoded.dimensions(), (20, 10));

    assert!(app.thumbnails.contains("20x10/center/photo.png"));
    assert!(app.state.tiers.contains("20x10/center/"));
}

#[tokio::test]
async fn repeated_request_is_byte_identical() {
    let app = TestApp::spawn().await;
    app.upload("/photo.jpg", sample_image(80, 60, ImageFormat::Jpeg))
        .await;

    let first = app.get("/30x30/north/photo.jpg").await;
    assert_eq!(first.status().as_u16(), 200);
    let first_tag = etag_of(&first);
    let first_body = first.bytes().await.unwrap();

    let second = app.get("/30x30/north/photo.jpg").await;
    assert_eq!(second.status().as_u16(), 200);
    assert_eq!(etag_of(&second), first_tag);
    assert_eq!(second.bytes().await.unwrap(), first_body);
}

#[tokio::test]
async fn head_returns_headers_without_body() {
    let app = TestApp::spawn().await;
    app.upload("/photo.png", sample_image(16, 16, ImageFormat::Png))
        .await;

    let res = app
        .client
        .head(app.url("/8x8/center/photo.png"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status().as_u16(), 200);
    assert!(res.headers().get("etag").is_some());
    assert!(res.bytes().await.unwrap().is_empty());
}

#[tokio::test]
async fn non_numeric_width_is_bad_request() {
    let app = TestApp::spawn().await;
    app.upload("/photo.png", sample_image(16, 16, ImageFormat::Png))
        .await;

    let res = app.get("/abcx100/center/photo.png").await;
    assert_eq!(res.status().as_u16(), 400);
    assert!(app.thumbnails.is_empty());
}

#[tokio::test]
async fn unknown_gravity_is_bad_request() {
    let app = TestApp::spawn().await;
    app.upload("/photo.png", sample_image(16, 16, ImageFormat::Png))
        .await;

    let res = app.get("/100x100/sideways/photo.png").await;
    assert_eq!(res.status().as_u16(), 400);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn oversized_tier_is_bad_request() {
    let app = TestApp::spawn().await;
    app.upload("/photo.png", sample_image(1, 1, ImageFormat::Png))
        .await;

    let res = app.get("/1x4000000000/center/photo.png").await;
    assert_eq!(res.status().as_u16(), 400);
    assert!(app.thumbnails.is_empty());

    // The server is still up.
    let res = app.get("/1x1/center/photo.png").await;
    assert_eq!(res.status().as_u16(), 200);
}

#[tokio::test]
async fn missing_original_is_not_found() {
    let app = TestApp::spawn().await;
    let res = app.get("/10x10/center/absent.png").await;
    assert_eq!(res.status().as_u16(), 404);
    assert!(app.thumbnails.is_empty());
}

#[tokio::test]
async fn undecodable_original_is_internal_error() {
    let app = TestApp::spawn().await;
    app.upload("/notes.png", b"not really an image".to_vec())
        .await;

    let res = app.get("/10x10/center/notes.png").await;
    assert_eq!(res.status().as_u16(), 500);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["code"], "INTERNAL_ERROR");
}

#[tokio::test]
async fn concurrent_first_requests_both_succeed() {
    let app = TestApp::spawn().await;
    app.upload("/photo.png", sample_image(120, 90, ImageFormat::Png))
        .await;

    let (a, b) = tokio::join!(
        app.get("/40x40/center/photo.png"),
        app.get("/40x40/center/photo.png")
    );
    assert_eq!(a.status().as_u16(), 200);
    assert_eq!(b.status().as_u16(), 200);
    let (a, b) = (a.bytes().await.unwrap(), b.bytes().await.unwrap());
    assert_eq!(a, b);

    let stored = app.thumbnails.get("40x40/center/photo.png").await.unwrap();
    assert_eq!(stored, a.as_ref());
}

#[tokio::test]
async fn delete_cascades_to_every_tier() {
    let app = TestApp::spawn().await;
    app.upload("/foo.png", sample_image(50, 50, ImageFormat::Png))
        .await;
    app.upload("/bar.png", sample_image(50, 50, ImageFormat::Png))
        .await;

    assert_eq!(app.get("/100x100/center/foo.png").await.status().as_u16(), 200);
    assert_eq!(app.get("/50x50/north/foo.png").await.status().as_u16(), 200);
    assert_eq!(app.get("/100x100/center/bar.png").await.status().as_u16(), 200);

    let res = app.delete("/foo.png").await;
    assert_eq!(res.status().as_u16(), 204);

    assert!(!app.thumbnails.contains("100x100/center/foo.png"));
    assert!(!app.thumbnails.contains("50x50/north/foo.png"));
    assert!(app.thumbnails.contains("100x100/center/bar.png"));

    assert_eq!(app.get("/100x100/center/foo.png").await.status().as_u16(), 404);
    assert_eq!(app.get("/50x50/north/foo.png").await.status().as_u16(), 404);
}

#[tokio::test]
async fn dedupe_mode_serves_concurrent_requests() {
    let mut config = resizer::config::AppConfig::default();
    config.thumbnails.dedupe_inflight = true;
    let app = TestApp::spawn_with(config).await;
    app.upload("/photo.png", sample_image(200, 100, ImageFormat::Png))
        .await;

    let responses = futures::future::join_all(
        (0..4).map(|_| app.get("/25x25/southeast/photo.png")),
    )
    .await;
    for res in responses {
        assert_eq!(res.status().as_u16(), 200);
    }
    assert!(app.thumbnails.contains("25x25/southeast/photo.png"));
    assert!(app.state.inflight.as_ref().unwrap().is_empty());
}
