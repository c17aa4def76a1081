//! Integration tests against a local mock endpoint.
//!
//! Every test spins up its own `mockito` server, so they run in parallel
//! without network access.

use docsubmit::{
    DocumentSet, EncodeError, PickedFile, UploadConfig, UploadError, UploadProgressCallback,
    Uploader,
};
use mockito::{Matcher, Server};
use std::io::Write;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

// ── Test helpers ─────────────────────────────────────────────────────────────

fn uploader(endpoint: String) -> Uploader {
    let config = UploadConfig::builder()
        .endpoint(endpoint)
        .build()
        .expect("valid config");
    Uploader::new(config).expect("client")
}

fn two_documents() -> DocumentSet {
    DocumentSet::new()
        .with("id", Some(PickedFile::from_bytes("id.jpg", &b"id"[..])))
        .with(
            "proofOfAddress",
            Some(PickedFile::from_bytes("résumé (final)!.pdf", &b"bill"[..])),
        )
}

const TWO_DOCUMENTS_JSON: &str = concat!(
    r#"{"userId":"u1","userName":"Ann Lee","documents":["#,
    r#"{"documentType":"id","fileName":"id.jpg","fileData":"aWQ="},"#,
    r#"{"documentType":"proofOfAddress","fileName":"r_sum___final__.pdf","fileData":"YmlsbA=="}"#,
    r#"]}"#
);

// ── Success paths ────────────────────────────────────────────────────────────

#[tokio::test]
async fn json_response_is_returned_unchanged() {
    let mut server = Server::new_async().await;
    let body = r#"{"success":true,"folderId":"F1","uploads":[{"documentType":"id","fileName":"id.jpg","fileId":"a1","fileUrl":"https://files.example.com/a1"},{"documentType":"proofOfAddress","fileName":"r_sum___final__.pdf","fileId":"b2","fileUrl":"https://files.example.com/b2"}],"message":"stored"}"#;
    let mock = server
        .mock("POST", "/exec")
        .match_header("content-type", "application/x-www-form-urlencoded")
        .match_body(Matcher::UrlEncoded(
            "data".into(),
            TWO_DOCUMENTS_JSON.into(),
        ))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(body)
        .create_async()
        .await;

    let result = uploader(format!("{}/exec", server.url()))
        .upload_documents(&two_documents(), Some("u1"), Some("Ann Lee"))
        .await
        .expect("upload should succeed");

    mock.assert_async().await;
    assert!(result.success);
    assert!(!result.synthesized);
    assert_eq!(result.folder_id.as_deref(), Some("F1"));
    assert_eq!(
        serde_json::to_value(&result).unwrap(),
        serde_json::from_str::<serde_json::Value>(body).unwrap()
    );
}

#[tokio::test]
async fn empty_body_yields_synthesized_receipt() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/exec")
        .with_status(200)
        .with_body("")
        .create_async()
        .await;

    let result = uploader(format!("{}/exec", server.url()))
        .upload_documents(&two_documents(), Some("u1"), Some("Ann Lee"))
        .await
        .expect("fallback receipt");

    mock.assert_async().await;
    assert!(result.success);
    assert!(result.synthesized);
    assert!(result.folder_id.is_some());

    let uploads = result.uploads.expect("uploads");
    assert_eq!(uploads.len(), 2);
    assert_eq!(uploads[0].document_type, "id");
    assert_eq!(uploads[0].file_name, "id.jpg");
    assert_eq!(uploads[1].document_type, "proofOfAddress");
    assert_eq!(uploads[1].file_name, "r_sum___final__.pdf");
    assert!(uploads.iter().all(|u| u.file_id.is_some() && u.file_url.is_some()));
}

#[tokio::test]
async fn html_redirect_page_yields_synthesized_receipt() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", "/exec")
        .with_status(200)
        .with_header("content-type", "text/html")
        .with_body("<html><body>Moved Temporarily</body></html>")
        .create_async()
        .await;

    let result = uploader(format!("{}/exec", server.url()))
        .upload_documents(&two_documents(), None, None)
        .await
        .unwrap();
    assert!(result.synthesized);
    assert_eq!(result.upload_count(), 2);
}

#[tokio::test]
async fn missing_identity_sends_placeholders() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/exec")
        .match_body(Matcher::Regex("userId%22%3A%22anonymous%22".into()))
        .with_status(200)
        .with_body(r#"{"success":true}"#)
        .create_async()
        .await;

    let documents = DocumentSet::new().with("id", Some(PickedFile::from_bytes("id.jpg", &b"x"[..])));
    uploader(format!("{}/exec", server.url()))
        .upload_documents(&documents, None, None)
        .await
        .unwrap();
    mock.assert_async().await;
}

#[tokio::test]
async fn reads_local_and_remote_locators() {
    let mut server = Server::new_async().await;
    let download = server
        .mock("GET", "/files/bill.pdf")
        .with_status(200)
        .with_body("bill")
        .create_async()
        .await;
    let upload = server
        .mock("POST", "/exec")
        .match_body(Matcher::Regex("YmlsbA%3D%3D".into()))
        .with_status(200)
        .with_body(r#"{"success":true,"folderId":"F2"}"#)
        .create_async()
        .await;

    let mut local = tempfile::Builder::new().suffix(".jpg").tempfile().unwrap();
    local.write_all(b"id").unwrap();

    let documents = DocumentSet::new()
        .with("id", Some(PickedFile::from_path(local.path())))
        .with(
            "proofOfAddress",
            Some(PickedFile::from_uri(
                "bill.pdf",
                &format!("{}/files/bill.pdf", server.url()),
            )),
        );

    let result = uploader(format!("{}/exec", server.url()))
        .upload_documents(&documents, Some("u1"), Some("Ann"))
        .await
        .unwrap();

    download.assert_async().await;
    upload.assert_async().await;
    assert_eq!(result.folder_id.as_deref(), Some("F2"));
}

// ── Failures before the request ─────────────────────────────────────────────

#[tokio::test]
async fn all_absent_fails_without_network_call() {
    let mut server = Server::new_async().await;
    let mock = server.mock("POST", Matcher::Any).expect(0).create_async().await;

    let documents = DocumentSet::new().with("id", None).with("proofOfAddress", None);
    let err = uploader(format!("{}/exec", server.url()))
        .upload_documents(&documents, Some("u1"), Some("Ann"))
        .await
        .unwrap_err();

    assert!(matches!(err, UploadError::NoDocuments), "got: {err:?}");
    mock.assert_async().await;
}

#[tokio::test]
async fn oversized_declared_file_fails_without_network_call() {
    let mut server = Server::new_async().await;
    let mock = server.mock("POST", Matcher::Any).expect(0).create_async().await;

    let big = PickedFile::from_bytes("scan.pdf", &b"tiny"[..]).with_size(10 * 1024 * 1024 + 1);
    let documents = DocumentSet::new().with("id", Some(big));
    let err = uploader(format!("{}/exec", server.url()))
        .upload_documents(&documents, None, None)
        .await
        .unwrap_err();

    match err {
        UploadError::DocumentProcessingFailed { file_name, source } => {
            assert_eq!(file_name, "scan.pdf");
            assert!(matches!(source, EncodeError::FileTooLarge { .. }));
        }
        other => panic!("unexpected: {other:?}"),
    }
    mock.assert_async().await;
}

#[tokio::test]
async fn failed_download_aborts_the_batch() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/files/gone.pdf")
        .with_status(404)
        .create_async()
        .await;
    let upload = server.mock("POST", "/exec").expect(0).create_async().await;

    let documents = DocumentSet::new()
        .with("id", Some(PickedFile::from_bytes("id.jpg", &b"id"[..])))
        .with(
            "proofOfAddress",
            Some(PickedFile::from_uri(
                "gone.pdf",
                &format!("{}/files/gone.pdf", server.url()),
            )),
        );
    let err = uploader(format!("{}/exec", server.url()))
        .upload_documents(&documents, None, None)
        .await
        .unwrap_err();

    assert!(err.to_string().contains("gone.pdf"), "got: {err}");
    upload.assert_async().await;
}

// ── Transport failures ──────────────────────────────────────────────────────

#[tokio::test]
async fn server_error_is_rejected_not_synthesized() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", "/exec")
        .with_status(500)
        .with_body("")
        .create_async()
        .await;

    let err = uploader(format!("{}/exec", server.url()))
        .upload_documents(&two_documents(), None, None)
        .await
        .unwrap_err();

    assert!(matches!(err, UploadError::UploadRejected { status: 500 }), "got: {err:?}");
    assert!(err.to_string().contains("500"));
}

#[tokio::test]
async fn json_of_wrong_shape_is_malformed() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", "/exec")
        .with_status(200)
        .with_body(r#"{"status":"ok"}"#)
        .create_async()
        .await;

    let err = uploader(format!("{}/exec", server.url()))
        .upload_documents(&two_documents(), None, None)
        .await
        .unwrap_err();
    assert!(matches!(err, UploadError::MalformedResponse { .. }), "got: {err:?}");
}

#[tokio::test]
async fn remote_failure_surfaces_through_into_result() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", "/exec")
        .with_status(200)
        .with_body(r#"{"success":false,"error":"Drive quota exceeded"}"#)
        .create_async()
        .await;

    let result = uploader(format!("{}/exec", server.url()))
        .upload_documents(&two_documents(), None, None)
        .await
        .expect("response is well-formed");
    assert!(!result.success);

    let err = result.into_result().unwrap_err();
    assert!(err.to_string().contains("Drive quota exceeded"));
}

#[tokio::test]
async fn unreachable_endpoint_is_transport_failure() {
    // Nothing listens on port 1.
    let err = uploader("http://127.0.0.1:1/exec".to_string())
        .upload_documents(&two_documents(), None, None)
        .await
        .unwrap_err();
    assert!(matches!(err, UploadError::TransportFailed(_)), "got: {err:?}");
}

// ── Progress events ─────────────────────────────────────────────────────────

#[derive(Default)]
struct Counting {
    encoded: AtomicUsize,
    sent: AtomicUsize,
    completed: AtomicUsize,
}

impl UploadProgressCallback for Counting {
    fn on_document_encoded(&self, _index: usize, _total: usize, _file_name: &str, _len: usize) {
        self.encoded.fetch_add(1, Ordering::SeqCst);
    }

    fn on_request_sent(&self, body_len: usize) {
        assert!(body_len > "data=".len());
        self.sent.fetch_add(1, Ordering::SeqCst);
    }

    fn on_upload_complete(&self, success: bool, _synthesized: bool) {
        assert!(success);
        self.completed.fetch_add(1, Ordering::SeqCst);
    }
}

#[tokio::test]
async fn progress_callback_sees_every_stage() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", "/exec")
        .with_status(200)
        .with_body(r#"{"success":true}"#)
        .create_async()
        .await;

    let counting = Arc::new(Counting::default());
    let config = UploadConfig::builder()
        .endpoint(format!("{}/exec", server.url()))
        .read_concurrency(2)
        .progress_callback(counting.clone())
        .build()
        .unwrap();

    docsubmit::upload_documents(&two_documents(), Some("u1"), Some("Ann"), &config)
        .await
        .unwrap();

    assert_eq!(counting.encoded.load(Ordering::SeqCst), 2);
    assert_eq!(counting.sent.load(Ordering::SeqCst), 1);
    assert_eq!(counting.completed.load(Ordering::SeqCst), 1);
}
