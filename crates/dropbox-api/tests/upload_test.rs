//! File upload, subtitle attach and static serving integration tests.
//!
//! Run with: `cargo test -p dropbox-api --test upload_test`

mod helpers;

use dropbox_processing::FixedDurationProbe;
use helpers::{
    bearer, create_url_entry, file_form, setup_test_app, setup_test_app_with, SAMPLE_SRT,
};
use serde_json::Value;

const AUDIO: &[u8] = b"ID3\x03\x00fake audio payload";

fn incoming_is_empty(app: &helpers::TestApp) -> bool {
    std::fs::read_dir(app.media_path(".incoming"))
        .map(|mut dir| dir.next().is_none())
        .unwrap_or(true)
}

async fn upload_audio(app: &helpers::TestApp) -> Value {
    let form = file_form("file", "Song Title.MP3", AUDIO.to_vec());
    let response = app
        .client()
        .post("/dropbox")
        .add_header("Authorization", bearer())
        .multipart(form)
        .await;
    assert_eq!(response.status_code(), 200, "{}", response.text());
    response.json()
}

#[tokio::test]
async fn test_upload_file_probes_and_stores() {
    let app = setup_test_app().await;
    let entry = upload_audio(&app).await;

    let id = entry["mediaId"].as_str().unwrap();
    assert_eq!(entry["title"], "Song Title");
    assert_eq!(entry["duration"], 12500);
    assert_eq!(entry["url"], format!("/media/{}.mp3", id));
    assert_eq!(entry["src"], entry["url"]);

    let stored = std::fs::read(app.media_path(&format!("{}.mp3", id))).unwrap();
    assert_eq!(stored, AUDIO);
    assert!(incoming_is_empty(&app));

    let served = app.client().get(&format!("/media/{}.mp3", id)).await;
    assert_eq!(served.status_code(), 200);
    assert_eq!(served.as_bytes().as_ref(), AUDIO);
}

#[tokio::test]
async fn test_upload_uses_explicit_title() {
    let app = setup_test_app().await;
    let form = file_form("file", "raw.wav", AUDIO.to_vec()).add_text("title", "Field Recording");
    let response = app
        .client()
        .post("/dropbox")
        .add_header("Authorization", bearer())
        .multipart(form)
        .await;
    assert_eq!(response.status_code(), 200);
    let entry: Value = response.json();
    assert_eq!(entry["title"], "Field Recording");
}

#[tokio::test]
async fn test_upload_without_file_part_is_400() {
    let app = setup_test_app().await;
    let form = axum_test::multipart::MultipartForm::new().add_text("title", "No file");
    let response = app
        .client()
        .post("/dropbox")
        .add_header("Authorization", bearer())
        .multipart(form)
        .await;
    assert_eq!(response.status_code(), 400);
    assert_eq!(app.state.library.len().await, 0);
}

#[tokio::test]
async fn test_probe_failure_leaves_nothing_behind() {
    let app = setup_test_app_with(FixedDurationProbe::failing(), helpers::DEFAULT_MAX_UPLOAD).await;
    let form = file_form("file", "broken.mp4", AUDIO.to_vec());
    let response = app
        .client()
        .post("/dropbox")
        .add_header("Authorization", bearer())
        .multipart(form)
        .await;

    assert_eq!(response.status_code(), 500);
    let body: Value = response.json();
    assert_eq!(body["code"], "MEDIA_PIPELINE_ERROR");

    assert_eq!(app.state.library.len().await, 0);
    let leftovers: Vec<_> = std::fs::read_dir(app.media_path(""))
        .unwrap()
        .filter_map(Result::ok)
        .filter(|e| e.file_name() != ".incoming")
        .collect();
    assert!(leftovers.is_empty(), "{:?}", leftovers);
    assert!(incoming_is_empty(&app));
}

#[tokio::test]
async fn test_unknown_duration_is_zero() {
    let app = setup_test_app_with(FixedDurationProbe::new(None), helpers::DEFAULT_MAX_UPLOAD).await;
    let entry = upload_audio(&app).await;
    assert_eq!(entry["duration"], 0);
}

#[tokio::test]
async fn test_srt_subtitle_is_converted_and_served() {
    let app = setup_test_app().await;
    let entry = upload_audio(&app).await;
    let id = entry["mediaId"].as_str().unwrap();

    let response = app
        .client()
        .put(&format!("/dropbox/{}/subtitles", id))
        .add_header("Authorization", bearer())
        .multipart(file_form("subtitles", "lyrics.srt", SAMPLE_SRT.as_bytes().to_vec()))
        .await;
    assert_eq!(response.status_code(), 200, "{}", response.text());
    let updated: Value = response.json();
    assert_eq!(updated["subtitle"], format!("{}.vtt", id));

    let vtt = app.client().get(&format!("/media/{}.vtt", id)).await.text();
    assert!(vtt.starts_with("WEBVTT"));
    assert!(vtt.contains("00:00:01.000 --> 00:00:03.500"));
    assert!(vtt.contains("Hello, world"));
    assert!(!vtt.contains('\r'));

    let fetched: Value = app.client().get(&format!("/dropbox/{}", id)).await.json();
    assert_eq!(fetched["subtitle"], format!("{}.vtt", id));
}

#[tokio::test]
async fn test_vtt_subtitle_is_stored_as_is() {
    let app = setup_test_app().await;
    let entry = create_url_entry(app.client(), "Remote", "http://x/remote.mp4").await;
    let id = entry["mediaId"].as_str().unwrap();
    let vtt = "WEBVTT\n\n00:00:01.000 --> 00:00:02.000\nHi\n";

    let response = app
        .client()
        .put(&format!("/dropbox/{}/subtitles", id))
        .add_header("Authorization", bearer())
        .multipart(file_form("file", "track.vtt", vtt.as_bytes().to_vec()))
        .await;
    assert_eq!(response.status_code(), 200);

    let stored = std::fs::read_to_string(app.media_path(&format!("{}.vtt", id))).unwrap();
    assert_eq!(stored, vtt);
}

#[tokio::test]
async fn test_subtitle_for_unknown_media_is_404() {
    let app = setup_test_app().await;
    let response = app
        .client()
        .put("/dropbox/missing/subtitles")
        .add_header("Authorization", bearer())
        .multipart(file_form("subtitles", "a.srt", SAMPLE_SRT.as_bytes().to_vec()))
        .await;
    assert_eq!(response.status_code(), 404);
    assert!(!app.media_path("missing.vtt").exists());
    assert!(incoming_is_empty(&app));
}

#[tokio::test]
async fn test_invalid_subtitle_is_reported() {
    let app = setup_test_app().await;
    let entry = upload_audio(&app).await;
    let id = entry["mediaId"].as_str().unwrap();

    let response = app
        .client()
        .put(&format!("/dropbox/{}/subtitles", id))
        .add_header("Authorization", bearer())
        .multipart(file_form("subtitles", "junk.srt", b"no cues in here".to_vec()))
        .await;
    assert_eq!(response.status_code(), 500);
    let body: Value = response.json();
    assert_eq!(body["code"], "MEDIA_PIPELINE_ERROR");

    assert!(!app.media_path(&format!("{}.vtt", id)).exists());
    let fetched: Value = app.client().get(&format!("/dropbox/{}", id)).await.json();
    assert!(fetched.get("subtitle").is_none());
}

#[tokio::test]
async fn test_delete_removes_media_artifacts() {
    let app = setup_test_app().await;
    let entry = upload_audio(&app).await;
    let id = entry["mediaId"].as_str().unwrap();

    app.client()
        .put(&format!("/dropbox/{}/subtitles", id))
        .add_header("Authorization", bearer())
        .multipart(file_form("subtitles", "a.srt", SAMPLE_SRT.as_bytes().to_vec()))
        .await;

    let response = app
        .client()
        .delete(&format!("/dropbox/{}", id))
        .add_header("Authorization", bearer())
        .await;
    assert_eq!(response.status_code(), 200);

    assert!(!app.media_path(&format!("{}.mp3", id)).exists());
    assert!(!app.media_path(&format!("{}.vtt", id)).exists());
    assert_eq!(
        app.client().get(&format!("/media/{}.mp3", id)).await.status_code(),
        404
    );
}

#[tokio::test]
async fn test_oversized_upload_is_413() {
    let app = setup_test_app_with(FixedDurationProbe::new(Some(1.0)), 1024).await;
    let form = file_form("file", "big.mp3", vec![0u8; 4096]);
    let response = app
        .client()
        .post("/dropbox")
        .add_header("Authorization", bearer())
        .multipart(form)
        .await;
    assert_eq!(response.status_code(), 413);
    assert_eq!(app.state.library.len().await, 0);
    assert!(incoming_is_empty(&app));

    let limit: Value = app.client().get("/dropbox-limit").await.json();
    assert_eq!(limit["limit"], 1024);
}
