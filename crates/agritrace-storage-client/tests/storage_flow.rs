//! Integration tests for the upload / signed-URL / deletion flow against a
//! mock backend. Mock hit counts (`expect(n)`) prove the zero-network and
//! request-deduplication properties.

use agritrace_api_client::{ApiClient, Auth};
use agritrace_storage_client::{FileUploader, StorageClient, StorageError, UploadConstraints};
use chrono::{Duration, Utc};
use mockito::{Matcher, Server, ServerGuard};
use serde_json::json;

const SIGN_PATH: &str = "/api/sas";

fn clients(server: &ServerGuard) -> (ApiClient, StorageClient) {
    let api = ApiClient::new(server.url(), Auth::None).expect("client");
    let storage = StorageClient::new(
        api.clone(),
        format!("{}{}", server.url(), SIGN_PATH),
        format!("{}/admin-uploads", server.url()),
    );
    (api, storage)
}

fn signed_body(url: &str, expires_in_secs: i64) -> String {
    json!({
        "url": url,
        "expiresOn": (Utc::now() + Duration::seconds(expires_in_secs)).to_rfc3339(),
        "permissions": "r",
    })
    .to_string()
}

#[tokio::test]
async fn concurrent_requests_share_one_signing_call() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", SIGN_PATH)
        .match_body(Matcher::PartialJson(json!({
            "path": "products/abc123.jpg",
            "mode": "read",
            "ttlMinutes": 5,
        })))
        .with_body(signed_body("https://cdn.example.com/abc123.jpg?sig=1", 300))
        .expect(1)
        .create_async()
        .await;

    let (_, storage) = clients(&server);

    let (first, second) = tokio::join!(
        storage.file_url("products/abc123.jpg"),
        storage.file_url("products/abc123.jpg"),
    );

    let first = first.expect("first caller");
    let second = second.expect("second caller");
    assert_eq!(first, second);
    assert_eq!(first, "https://cdn.example.com/abc123.jpg?sig=1");
    mock.assert_async().await;
}

#[tokio::test]
async fn fresh_entry_is_served_without_network() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", SIGN_PATH)
        .with_body(signed_body("https://cdn.example.com/p.jpg?sig=1", 300))
        .expect(1)
        .create_async()
        .await;

    let (_, storage) = clients(&server);

    let first = storage.file_url("products/p.jpg").await.expect("first");
    let second = storage.file_url("products/p.jpg").await.expect("second");
    assert_eq!(first, second);
    mock.assert_async().await;
}

#[tokio::test]
async fn entry_expiring_within_margin_is_refreshed() {
    let mut server = Server::new_async().await;
    // First response expires in 30 seconds, inside the 60-second margin.
    let stale = server
        .mock("POST", SIGN_PATH)
        .with_body(signed_body("https://cdn.example.com/p.jpg?sig=stale", 30))
        .expect(1)
        .create_async()
        .await;

    let (_, storage) = clients(&server);
    let first = storage.file_url("products/p.jpg").await.expect("first");
    assert_eq!(first, "https://cdn.example.com/p.jpg?sig=stale");
    stale.assert_async().await;
    stale.remove_async().await;

    let fresh = server
        .mock("POST", SIGN_PATH)
        .with_body(signed_body("https://cdn.example.com/p.jpg?sig=fresh", 300))
        .expect(1)
        .create_async()
        .await;

    let second = storage.file_url("products/p.jpg").await.expect("second");
    assert_eq!(second, "https://cdn.example.com/p.jpg?sig=fresh");
    fresh.assert_async().await;
}

#[tokio::test]
async fn failed_signing_clears_pending_entry_for_retry() {
    let mut server = Server::new_async().await;
    let failing = server
        .mock("POST", SIGN_PATH)
        .with_status(500)
        .with_body("signer unavailable")
        .expect(1)
        .create_async()
        .await;

    let (_, storage) = clients(&server);
    let result = storage.file_url("products/p.jpg").await;
    assert!(matches!(result, Err(StorageError::SignFailed(_))));
    assert!(!storage.is_cached("products/p.jpg"));
    failing.assert_async().await;
    failing.remove_async().await;

    let recovering = server
        .mock("POST", SIGN_PATH)
        .with_body(signed_body("https://cdn.example.com/p.jpg?sig=2", 300))
        .expect(1)
        .create_async()
        .await;

    let url = storage.file_url("products/p.jpg").await.expect("retry");
    assert_eq!(url, "https://cdn.example.com/p.jpg?sig=2");
    recovering.assert_async().await;
}

#[tokio::test]
async fn deletion_evicts_cache_entries() {
    let mut server = Server::new_async().await;
    let sign = server
        .mock("POST", SIGN_PATH)
        .with_body(signed_body("https://cdn.example.com/p.jpg?sig=1", 300))
        .expect(1)
        .create_async()
        .await;

    let (_, storage) = clients(&server);
    storage.file_url("products/p.jpg").await.expect("sign");
    assert!(storage.is_cached("products/p.jpg"));
    sign.assert_async().await;
    sign.remove_async().await;

    let delete = server
        .mock("POST", "/api/v1/storage/delete")
        .match_body(Matcher::Json(json!([format!(
            "{}/admin-uploads/products/p.jpg",
            server.url()
        )])))
        .expect(1)
        .create_async()
        .await;

    storage
        .delete_files(&["products/p.jpg".to_string()])
        .await
        .expect("delete");
    assert!(!storage.is_cached("products/p.jpg"));
    delete.assert_async().await;

    // A later lookup must go back to the signer.
    let resign = server
        .mock("POST", SIGN_PATH)
        .with_body(signed_body("https://cdn.example.com/p.jpg?sig=2", 300))
        .expect(1)
        .create_async()
        .await;

    let url = storage.file_url("products/p.jpg").await.expect("resign");
    assert_eq!(url, "https://cdn.example.com/p.jpg?sig=2");
    resign.assert_async().await;
}

#[tokio::test]
async fn manual_invalidation_forces_new_resolution() {
    let mut server = Server::new_async().await;
    let sign = server
        .mock("POST", SIGN_PATH)
        .with_body(signed_body("https://cdn.example.com/p.jpg?sig=1", 300))
        .expect(3)
        .create_async()
        .await;

    let (_, storage) = clients(&server);

    storage.file_url("products/p.jpg").await.expect("first");
    assert!(storage.is_cached("products/p.jpg"));

    storage.invalidate("products/p.jpg");
    assert!(!storage.is_cached("products/p.jpg"));
    storage.file_url("products/p.jpg").await.expect("second");

    storage.clear_cache();
    assert!(!storage.is_cached("products/p.jpg"));
    storage.file_url("products/p.jpg").await.expect("third");

    sign.assert_async().await;
}

#[tokio::test]
async fn empty_deletion_is_a_noop() {
    let mut server = Server::new_async().await;
    let delete = server
        .mock("POST", "/api/v1/storage/delete")
        .expect(0)
        .create_async()
        .await;

    let (_, storage) = clients(&server);
    storage.delete_files(&[]).await.expect("noop");
    delete.assert_async().await;
}

#[tokio::test]
async fn oversized_upload_is_rejected_before_any_network_call() {
    let mut server = Server::new_async().await;
    let upload = server
        .mock("POST", "/api/v1/storage/upload")
        .expect(0)
        .create_async()
        .await;

    let (api, _) = clients(&server);
    let uploader = FileUploader::new(api);
    let result = uploader
        .upload(
            "huge.png",
            "image/png",
            vec![0u8; 6 * 1024 * 1024],
            "products",
            &UploadConstraints::images(),
        )
        .await;

    assert!(matches!(result, Err(StorageError::FileTooLarge { .. })));
    upload.assert_async().await;
}

#[tokio::test]
async fn signed_put_carries_no_backend_credentials() {
    let mut server = Server::new_async().await;
    let put = server
        .mock("PUT", "/admin-uploads/company-1/ruc.pdf")
        .match_query(Matcher::UrlEncoded("sig".into(), "abc".into()))
        .match_header("content-type", "application/pdf")
        .match_header("authorization", Matcher::Missing)
        .with_status(201)
        .expect(1)
        .create_async()
        .await;

    let api = ApiClient::new(server.url(), Auth::Bearer("secret".to_string())).expect("client");
    let storage = StorageClient::new(
        api,
        format!("{}{}", server.url(), SIGN_PATH),
        format!("{}/admin-uploads", server.url()),
    );

    storage
        .put_to_signed_url(
            &format!("{}/admin-uploads/company-1/ruc.pdf?sig=abc", server.url()),
            "application/pdf",
            b"pdf-bytes".to_vec(),
        )
        .await
        .expect("signed put");
    put.assert_async().await;
}

#[tokio::test]
async fn upload_sign_delete_round_trip() {
    let mut server = Server::new_async().await;
    let stored_url = format!(
        "{}/admin-uploads/products%2F1700000000000-a1b2c3d4.png",
        server.url()
    );
    let upload = server
        .mock("POST", "/api/v1/storage/upload")
        .match_query(Matcher::UrlEncoded("path".into(), "products".into()))
        .with_body(json!({ "url": stored_url }).to_string())
        .expect(1)
        .create_async()
        .await;

    let (api, storage) = clients(&server);
    let uploader = FileUploader::new(api);

    let result = uploader
        .upload(
            "photo.png",
            "image/png",
            vec![0u8; 2 * 1024 * 1024],
            "products",
            &UploadConstraints::images(),
        )
        .await
        .expect("upload");

    assert_eq!(result.relative_path, "products/1700000000000-a1b2c3d4.png");
    assert!(result.file_name.ends_with(".png"));
    assert_eq!(result.size, 2 * 1024 * 1024);
    upload.assert_async().await;

    // One signing call serves both lookups within the validity window.
    let sign = server
        .mock("POST", SIGN_PATH)
        .with_body(signed_body("https://cdn.example.com/photo.png?sig=1", 300))
        .expect(1)
        .create_async()
        .await;

    let first = storage.file_url(&result.relative_path).await.expect("sign");
    let second = storage
        .file_url(&result.relative_path)
        .await
        .expect("cached");
    assert_eq!(first, second);
    sign.assert_async().await;
    sign.remove_async().await;

    let delete = server
        .mock("POST", "/api/v1/storage/delete")
        .expect(1)
        .create_async()
        .await;

    storage
        .delete_files(std::slice::from_ref(&result.relative_path))
        .await
        .expect("delete");
    assert!(!storage.is_cached(&result.relative_path));
    delete.assert_async().await;

    let resign = server
        .mock("POST", SIGN_PATH)
        .with_body(signed_body("https://cdn.example.com/photo.png?sig=2", 300))
        .expect(1)
        .create_async()
        .await;

    storage
        .file_url(&result.relative_path)
        .await
        .expect("resign");
    resign.assert_async().await;
}
