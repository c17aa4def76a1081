//! Transport: one form POST to the endpoint, then response interpretation.
//!
//! The batch travels as a single form field, `data=<urlencoded JSON>`. There
//! is exactly one attempt; no retry and no backoff.
//!
//! ## Response handling
//!
//! | Response                         | Outcome                                |
//! |----------------------------------|----------------------------------------|
//! | non-2xx                          | [`UploadError::UploadRejected`]        |
//! | 2xx, JSON matching the schema    | returned as-is                         |
//! | 2xx, JSON of another shape       | [`UploadError::MalformedResponse`]     |
//! | 2xx, empty or non-JSON body      | synthesized receipt (see below)        |
//!
//! Script endpoints commonly answer a successful POST with a redirect page
//! or an empty body. Such responses are treated as success and a receipt is
//! synthesized from the submitted batch, unless
//! `fallback_on_unparseable` is off.

use crate::config::UploadConfig;
use crate::error::UploadError;
use crate::output::{StoredFile, UploadResult};
use crate::pipeline::payload::UploadBatch;
use rand::distributions::Alphanumeric;
use rand::Rng;
use serde_json::{Map, Value};
use tracing::{debug, info, warn};

/// POST `batch` to the configured endpoint and interpret the response.
pub async fn send_batch(
    client: &reqwest::Client,
    batch: &UploadBatch,
    config: &UploadConfig,
) -> Result<UploadResult, UploadError> {
    let json = serde_json::to_string(batch)
        .map_err(|e| UploadError::Internal(format!("Failed to serialise batch: {}", e)))?;

    let request = client
        .post(&config.endpoint)
        .form(&[("data", json.as_str())])
        .build()?;
    let body_len = request
        .body()
        .and_then(|b| b.as_bytes())
        .map_or(0, <[u8]>::len);

    info!(
        "Uploading {} documents ({} bytes) to {}",
        batch.documents.len(),
        body_len,
        config.endpoint
    );
    if let Some(ref cb) = config.progress_callback {
        cb.on_request_sent(body_len);
    }

    let response = client.execute(request).await?;
    let status = response.status();
    if !status.is_success() {
        warn!("Upload rejected: HTTP {}", status);
        return Err(UploadError::UploadRejected {
            status: status.as_u16(),
        });
    }

    let text = response.text().await?;
    debug!("Upload response: HTTP {}, {} bytes", status, text.len());
    interpret_body(&text, batch, config.fallback_on_unparseable)
}

/// Map a 2xx response body to an [`UploadResult`].
pub fn interpret_body(
    body: &str,
    batch: &UploadBatch,
    fallback: bool,
) -> Result<UploadResult, UploadError> {
    match serde_json::from_str::<Value>(body) {
        Ok(value) => serde_json::from_value(value).map_err(|e| UploadError::MalformedResponse {
            reason: e.to_string(),
        }),
        Err(_) if fallback => {
            warn!(
                "Upload response was not JSON ({} bytes); assuming success",
                body.len()
            );
            Ok(synthesize_receipt(batch))
        }
        Err(e) => Err(UploadError::MalformedResponse {
            reason: format!("body is not JSON: {}", e),
        }),
    }
}

/// Build a success result echoing every document of `batch`.
///
/// Ids are `<unix millis>_<6 random alphanumerics>`; URLs use the
/// `pending://` scheme since nothing on the server can be linked to.
pub fn synthesize_receipt(batch: &UploadBatch) -> UploadResult {
    let millis = chrono::Utc::now().timestamp_millis();
    let folder_id = format!("folder_{}_{}", millis, random_suffix());

    let uploads = batch
        .documents
        .iter()
        .map(|doc| {
            let file_id = format!("{}_{}", millis, random_suffix());
            StoredFile {
                document_type: doc.document_type.clone(),
                file_name: doc.file_name.clone(),
                file_url: Some(format!("pending://files/{}", file_id)),
                file_id: Some(file_id),
                extra: Map::new(),
            }
        })
        .collect();

    UploadResult {
        success: true,
        folder_url: Some(format!("pending://folders/{}", folder_id)),
        folder_id: Some(folder_id),
        uploads: Some(uploads),
        message: Some("Documents submitted; the server returned no receipt".to_string()),
        error: None,
        synthesized: true,
        extra: Map::new(),
        raw: None,
    }
}

fn random_suffix() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(6)
        .map(char::from)
        .collect()
}
