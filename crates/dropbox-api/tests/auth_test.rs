//! Password gate integration tests.
//!
//! Run with: `cargo test -p dropbox-api --test auth_test`

mod helpers;

use axum_test::multipart::{MultipartForm, Part};
use helpers::{bearer, create_url_entry, setup_test_app, TEST_PASSWORD};

#[tokio::test]
async fn test_every_protected_route_rejects_missing_credentials() {
    let app = setup_test_app().await;
    let client = app.client();
    let entry = create_url_entry(client, "Demo", "http://x/demo.mp4").await;
    let id = entry["mediaId"].as_str().unwrap();

    let responses = vec![
        client.post("/dropbox/auth").await,
        client
            .post("/dropbox")
            .json(&serde_json::json!({ "url": "http://x/other.mp4" }))
            .await,
        client
            .patch(&format!("/dropbox/{}", id))
            .json(&serde_json::json!({ "setTitle": "Hijacked" }))
            .await,
        client.delete(&format!("/dropbox/{}", id)).await,
        client
            .put(&format!("/dropbox/{}/subtitles", id))
            .multipart(helpers::file_form("subtitles", "a.srt", helpers::SAMPLE_SRT.into()))
            .await,
    ];

    for response in responses {
        assert_eq!(response.status_code(), 401);
        let body: serde_json::Value = response.json();
        assert_eq!(body["title"], "Invalid password.");
        assert_eq!(body["code"], "UNAUTHORIZED");
    }

    // Nothing changed
    let current: serde_json::Value = client.get(&format!("/dropbox/{}", id)).await.json();
    assert_eq!(current["title"], "Demo");
    assert!(current.get("subtitle").is_none());
    assert_eq!(app.state.library.len().await, 1);
}

#[tokio::test]
async fn test_wrong_bearer_is_rejected() {
    let app = setup_test_app().await;
    let response = app
        .client()
        .post("/dropbox/auth")
        .add_header("Authorization", "Bearer not-the-password")
        .await;
    assert_eq!(response.status_code(), 401);

    let response = app
        .client()
        .post("/dropbox/auth")
        .add_header("Authorization", TEST_PASSWORD)
        .await;
    assert_eq!(response.status_code(), 401);
}

#[tokio::test]
async fn test_exact_bearer_is_accepted() {
    let app = setup_test_app().await;
    let response = app
        .client()
        .post("/dropbox/auth")
        .add_header("Authorization", bearer())
        .await;
    assert_eq!(response.status_code(), 200);
    let body: serde_json::Value = response.json();
    assert_eq!(body, serde_json::json!({ "authorized": true }));
}

/// Bearer tokens only need to end with the password. Any prefix passes.
#[tokio::test]
async fn test_bearer_suffix_match_is_accepted() {
    let app = setup_test_app().await;
    let response = app
        .client()
        .post("/dropbox/auth")
        .add_header("Authorization", format!("Bearer attacker-chosen-prefix{}", TEST_PASSWORD))
        .await;
    assert_eq!(response.status_code(), 200);
}

#[tokio::test]
async fn test_json_body_password() {
    let app = setup_test_app().await;
    let client = app.client();

    let ok = client
        .post("/dropbox")
        .json(&serde_json::json!({
            "password": TEST_PASSWORD,
            "title": "Demo",
            "url": "http://x/demo.mp4"
        }))
        .await;
    assert_eq!(ok.status_code(), 200);

    // Body passwords are compared exactly, not by suffix
    let suffix = client
        .post("/dropbox/auth")
        .json(&serde_json::json!({ "password": format!("x{}", TEST_PASSWORD) }))
        .await;
    assert_eq!(suffix.status_code(), 401);
}

#[tokio::test]
async fn test_form_body_password() {
    let app = setup_test_app().await;
    let response = app
        .client()
        .post("/dropbox/auth")
        .form(&[("password", TEST_PASSWORD)])
        .await;
    assert_eq!(response.status_code(), 200);

    let response = app
        .client()
        .post("/dropbox/auth")
        .form(&[("password", "wrong")])
        .await;
    assert_eq!(response.status_code(), 401);
}

#[tokio::test]
async fn test_multipart_body_password_and_upload() {
    let app = setup_test_app().await;
    let form = MultipartForm::new()
        .add_text("password", TEST_PASSWORD)
        .add_text("title", "Clip")
        .add_part(
            "file",
            Part::bytes(b"not really video".to_vec()).file_name("clip.mp4"),
        );

    let response = app.client().post("/dropbox").multipart(form).await;
    assert_eq!(response.status_code(), 200, "{}", response.text());
    let body: serde_json::Value = response.json();
    assert_eq!(body["title"], "Clip");

    let bad = MultipartForm::new().add_text("password", "nope");
    let response = app.client().post("/dropbox/auth").multipart(bad).await;
    assert_eq!(response.status_code(), 401);
}

#[tokio::test]
async fn test_multipart_password_after_file_is_rejected() {
    let app = setup_test_app().await;
    let form = helpers::file_form("file", "clip.mp4", b"not really video".to_vec())
        .add_text("password", TEST_PASSWORD);

    let response = app.client().post("/dropbox").multipart(form).await;
    assert_eq!(response.status_code(), 401);
    assert_eq!(app.state.library.len().await, 0);
}

#[tokio::test]
async fn test_large_upload_with_leading_password_is_accepted() {
    let app = setup_test_app().await;
    let form = MultipartForm::new()
        .add_text("password", TEST_PASSWORD)
        .add_part(
            "file",
            Part::bytes(vec![7u8; 512 * 1024]).file_name("big.mp4"),
        );

    let response = app.client().post("/dropbox").multipart(form).await;
    assert_eq!(response.status_code(), 200, "{}", response.text());
    let body: serde_json::Value = response.json();
    assert_eq!(body["title"], "big");
}

#[tokio::test]
async fn test_public_routes_need_no_credentials() {
    let app = setup_test_app().await;
    let client = app.client();
    let entry = create_url_entry(client, "Demo", "http://x/demo.mp4").await;
    let id = entry["mediaId"].as_str().unwrap();

    assert_eq!(client.get("/dropbox").await.status_code(), 200);
    assert_eq!(client.get(&format!("/dropbox/{}", id)).await.status_code(), 200);
    assert_eq!(client.get("/dropbox-limit").await.status_code(), 200);
    assert_eq!(
        client.post(&format!("/dropbox/{}/request", id)).await.status_code(),
        202
    );
}
