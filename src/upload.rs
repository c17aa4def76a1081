//! Upload entry points.
//!
//! [`Uploader`] owns the configuration and one HTTP client and can be
//! reused across calls. The free functions [`upload_documents`] and
//! [`upload_documents_sync`] build a throwaway `Uploader` for one-off use.
//!
//! Each call is independent: read and encode every present file, build one
//! batch, send it once. A failure at any step ends the call; nothing is
//! sent unless every file encoded.

use crate::config::UploadConfig;
use crate::document::DocumentSet;
use crate::error::UploadError;
use crate::output::UploadResult;
use crate::pipeline::{payload, transport};
use std::time::Instant;
use tracing::{debug, info};

/// Reusable uploader bound to one endpoint.
#[derive(Debug, Clone)]
pub struct Uploader {
    config: UploadConfig,
    client: reqwest::Client,
}

impl Uploader {
    /// Create an uploader with a fresh HTTP client.
    pub fn new(config: UploadConfig) -> Result<Self, UploadError> {
        let client = reqwest::Client::builder()
            .build()
            .map_err(|e| UploadError::Internal(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self::with_client(config, client))
    }

    /// Create an uploader sharing an existing client (connection pool, proxy
    /// settings, etc.).
    pub fn with_client(config: UploadConfig, client: reqwest::Client) -> Self {
        Self { config, client }
    }

    pub fn config(&self) -> &UploadConfig {
        &self.config
    }

    /// Upload every present file of `documents` in one request.
    ///
    /// # Arguments
    /// * `documents`: category → optional file, in submission order
    /// * `user_id`  : submitter id; blank or `None` uses the placeholder
    /// * `user_name`: submitter display name; blank or `None` uses the placeholder
    ///
    /// # Errors
    /// - [`UploadError::NoDocuments`] when every category is empty (no
    ///   network call is made)
    /// - [`UploadError::DocumentProcessingFailed`] for the first file that
    ///   is too large or unreadable (no network call is made)
    /// - [`UploadError::UploadRejected`], [`UploadError::TransportFailed`],
    ///   [`UploadError::MalformedResponse`] from the request itself
    ///
    /// A 2xx response whose body is not JSON yields `Ok` with
    /// [`UploadResult::synthesized`] set.
    pub async fn upload_documents(
        &self,
        documents: &DocumentSet,
        user_id: Option<&str>,
        user_name: Option<&str>,
    ) -> Result<UploadResult, UploadError> {
        let start = Instant::now();
        info!("Starting upload of {} document slots", documents.len());

        // ── Step 1: Read + encode ────────────────────────────────────────
        let batch =
            payload::build_batch(documents, user_id, user_name, &self.client, &self.config).await?;
        debug!(
            "Built batch for '{}' with {} documents in {}ms",
            batch.user_id,
            batch.documents.len(),
            start.elapsed().as_millis()
        );

        // ── Step 2: Send ─────────────────────────────────────────────────
        let result = transport::send_batch(&self.client, &batch, &self.config).await?;

        info!(
            "Upload complete: success={}, {} files, {}ms total{}",
            result.success,
            result.upload_count(),
            start.elapsed().as_millis(),
            if result.synthesized { " (synthesized receipt)" } else { "" }
        );
        if let Some(ref cb) = self.config.progress_callback {
            cb.on_upload_complete(result.success, result.synthesized);
        }

        Ok(result)
    }
}

/// Upload `documents` with a one-off [`Uploader`].
pub async fn upload_documents(
    documents: &DocumentSet,
    user_id: Option<&str>,
    user_name: Option<&str>,
    config: &UploadConfig,
) -> Result<UploadResult, UploadError> {
    Uploader::new(config.clone())?
        .upload_documents(documents, user_id, user_name)
        .await
}

/// Synchronous wrapper around [`upload_documents`].
///
/// Creates a temporary tokio runtime internally; do not call from inside an
/// async context.
pub fn upload_documents_sync(
    documents: &DocumentSet,
    user_id: Option<&str>,
    user_name: Option<&str>,
    config: &UploadConfig,
) -> Result<UploadResult, UploadError> {
    tokio::runtime::Runtime::new()
        .map_err(|e| UploadError::Internal(format!("Failed to create tokio runtime: {}", e)))?
        .block_on(upload_documents(documents, user_id, user_name, config))
}
