// tests/canva_upload.rs
//! Upload and poll workflow against a mock Canva Connect API.

use mockito::{Matcher, Server};
use podsnips::canva::{
    check_tokens, upload_video, CanvaHttpClient, TokenFile, UploadOutcome, UploadSettings,
};
use podsnips::{AccessToken, ErrorKind};
use std::path::PathBuf;
use std::time::Duration;

const JOB: &str = "e08861ae-3b29-45db-8dc1-1fe0bf7f1cc8";

fn scratch(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("podsnips-canva-{}-{}", name, uuid::Uuid::new_v4()));
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

fn fast_settings(folder: Option<&str>) -> UploadSettings {
    UploadSettings {
        poll_interval: Duration::from_millis(5),
        max_attempts: 3,
        folder_id: folder.map(str::to_string),
    }
}

#[tokio::test]
async fn uploads_polls_and_moves_the_asset() {
    let mut server = Server::new_async().await;
    let create = server
        .mock("POST", "/asset-uploads")
        .match_header("authorization", "Bearer canva-token")
        .match_header("content-type", "application/octet-stream")
        .match_header(
            "asset-upload-metadata",
            r#"{"name_base64":"S2V5IGluc2lnaHQubXA0"}"#,
        )
        .match_body("fake video bytes")
        .with_status(200)
        .with_body(include_str!("fixtures/api_responses/canva_upload_in_progress.json"))
        .create_async()
        .await;
    let poll = server
        .mock("GET", format!("/asset-uploads/{}", JOB).as_str())
        .with_status(200)
        .with_body(include_str!("fixtures/api_responses/canva_upload_success.json"))
        .create_async()
        .await;
    let moved = server
        .mock("POST", "/folders/move")
        .match_body(Matcher::Json(serde_json::json!({
            "item_id": "Msd59349ff",
            "to_folder_id": "FAF2lZtloor"
        })))
        .with_status(204)
        .create_async()
        .await;

    let dir = scratch("upload");
    let video = dir.join("Key insight.mp4");
    std::fs::write(&video, b"fake video bytes").unwrap();

    let api = CanvaHttpClient::with_base_url(&server.url()).unwrap();
    let token = AccessToken::new("canva-token").unwrap();
    let outcome = upload_video(&api, &token, &video, &fast_settings(Some("FAF2lZtloor"))).await;

    assert_eq!(
        outcome,
        UploadOutcome::Success {
            asset_id: "Msd59349ff".to_string(),
            asset_name: "Key insight.mp4".to_string(),
            moved: true,
        }
    );
    create.assert_async().await;
    poll.assert_async().await;
    moved.assert_async().await;
    std::fs::remove_dir_all(&dir).unwrap();
}

#[tokio::test]
async fn rejected_upload_request_fails_without_polling() {
    let mut server = Server::new_async().await;
    let _create = server
        .mock("POST", "/asset-uploads")
        .with_status(403)
        .with_body(r#"{"code": "permission_denied", "message": "Missing scope asset:write"}"#)
        .create_async()
        .await;
    let poll = server
        .mock("GET", Matcher::Regex(r"^/asset-uploads/".to_string()))
        .expect(0)
        .create_async()
        .await;

    let dir = scratch("rejected");
    let video = dir.join("clip.mp4");
    std::fs::write(&video, b"x").unwrap();

    let api = CanvaHttpClient::with_base_url(&server.url()).unwrap();
    let token = AccessToken::new("canva-token").unwrap();
    let outcome = upload_video(&api, &token, &video, &fast_settings(None)).await;

    match outcome {
        UploadOutcome::Failed { reason } => assert!(reason.contains("permission_denied")),
        other => panic!("expected failure, got {:?}", other),
    }
    poll.assert_async().await;
    std::fs::remove_dir_all(&dir).unwrap();
}

#[tokio::test]
async fn token_check_reads_the_file_and_asks_canva() {
    let mut server = Server::new_async().await;
    let _me = server
        .mock("GET", "/users/me")
        .match_header("authorization", "Bearer stored-token")
        .with_status(200)
        .with_body(include_str!("fixtures/api_responses/canva_user.json"))
        .create_async()
        .await;

    let dir = scratch("tokens");
    let path = dir.join(".tokens");
    std::fs::write(&path, "ACCESS_TOKEN=stored-token\nREFRESH_TOKEN=None\n").unwrap();

    let api = CanvaHttpClient::with_base_url(&server.url()).unwrap();
    let user = check_tokens(&api, &TokenFile::new(&path)).await.unwrap();
    assert_eq!(user, "auDAbliZ2rQNNOsUl5OLu");

    let missing = check_tokens(&api, &TokenFile::new(dir.join("absent")))
        .await
        .unwrap_err();
    assert_eq!(missing.kind(), ErrorKind::Authentication);
    std::fs::remove_dir_all(&dir).unwrap();
}

#[tokio::test]
async fn rejected_token_is_an_authentication_error() {
    let mut server = Server::new_async().await;
    let _me = server
        .mock("GET", "/users/me")
        .with_status(401)
        .with_body(r#"{"code": "invalid_access_token", "message": "Access token is invalid"}"#)
        .create_async()
        .await;

    let dir = scratch("expired");
    let path = dir.join(".tokens");
    std::fs::write(&path, "ACCESS_TOKEN=expired\n").unwrap();

    let api = CanvaHttpClient::with_base_url(&server.url()).unwrap();
    let err = check_tokens(&api, &TokenFile::new(&path)).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Authentication);
    std::fs::remove_dir_all(&dir).unwrap();
}
