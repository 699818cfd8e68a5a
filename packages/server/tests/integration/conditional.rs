use image::ImageFormat;
use resizer::registry::EtagRegistry;

use crate::common::{TestApp, etag_of, sample_image};

#[tokio::test]
async fn matching_tag_is_not_modified() {
    let app = TestApp::spawn().await;
    app.upload("/photo.png", sample_image(32, 32, ImageFormat::Png))
        .await;

    let first = app.get("/16x16/center/photo.png").await;
    let tag = etag_of(&first);

    let res = app.get_if_none_match("/16x16/center/photo.png", &tag).await;
    assert_eq!(res.status().as_u16(), 304);
    assert_eq!(etag_of(&res), tag);
    assert!(res.bytes().await.unwrap().is_empty());
}

#[tokio::test]
async fn unknown_tag_gets_full_response() {
    let app = TestApp::spawn().await;
    app.upload("/photo.png", sample_image(8, 8, ImageFormat::Png))
        .await;

    let res = app.get_if_none_match("/photo.png", "W/\"0-nope\"").await;
    assert_eq!(res.status().as_u16(), 200);
}

#[tokio::test]
async fn tag_from_another_resource_is_not_modified() {
    let app = TestApp::spawn().await;
    app.upload("/a.png", sample_image(8, 8, ImageFormat::Png))
        .await;
    app.upload("/b.png", sample_image(9, 9, ImageFormat::Png))
        .await;

    let tag_a = etag_of(&app.get("/a.png").await);

    let res = app.get_if_none_match("/b.png", &tag_a).await;
    assert_eq!(res.status().as_u16(), 304);

    let res = app.get_if_none_match("/5x5/center/b.png", &tag_a).await;
    assert_eq!(res.status().as_u16(), 304);
    // Short-circuited before the pipeline ran.
    assert!(!app.state.tiers.contains("5x5/center/"));
}

#[tokio::test]
async fn handler_matches_tag_issued_within_the_same_request() {
    let app = TestApp::spawn().await;
    let png = sample_image(10, 10, ImageFormat::Png);
    app.upload("/fresh.png", png.clone()).await;

    // Never served yet, so the registry pre-check cannot know this tag.
    let predicted = EtagRegistry::generate(&png, true);
    assert!(!app.state.etags.contains(&predicted));

    let res = app.get_if_none_match("/fresh.png", &predicted).await;
    assert_eq!(res.status().as_u16(), 304);
    assert!(app.state.etags.contains(&predicted));
}

#[tokio::test]
async fn deleted_resource_tag_still_short_circuits() {
    let app = TestApp::spawn().await;
    app.upload("/temp.png", sample_image(8, 8, ImageFormat::Png))
        .await;
    let tag = etag_of(&app.get("/temp.png").await);

    assert_eq!(app.delete("/temp.png").await.status().as_u16(), 204);

    let res = app.get_if_none_match("/temp.png", &tag).await;
    assert_eq!(res.status().as_u16(), 304);
    assert_eq!(app.get("/temp.png").await.status().as_u16(), 404);
}
