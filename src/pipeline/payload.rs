//! Batch assembly: document set + submitter identity → [`UploadBatch`].
//!
//! Files are read one at a time by default. With `read_concurrency > 1`
//! reads overlap, but `buffered` still yields results in input order, so
//! the error reported is always the first failing file of the set rather
//! than whichever read happened to fail first.

use crate::config::UploadConfig;
use crate::document::{DocumentSet, PickedFile};
use crate::error::UploadError;
use crate::pipeline::encode::{self, EncodedDocument};
use futures::stream::{self, StreamExt, TryStreamExt};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// The request body, before form encoding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadBatch {
    pub user_id: String,
    pub user_name: String,
    pub documents: Vec<EncodedDocument>,
}

/// Encode every present file in `documents` and attach the identity.
///
/// Fails with [`UploadError::NoDocuments`] before reading anything if every
/// category is empty. The first encoder failure aborts the batch.
pub async fn build_batch(
    documents: &DocumentSet,
    user_id: Option<&str>,
    user_name: Option<&str>,
    client: &reqwest::Client,
    config: &UploadConfig,
) -> Result<UploadBatch, UploadError> {
    let present: Vec<(&str, &PickedFile)> = documents.present().collect();
    if present.is_empty() {
        return Err(UploadError::NoDocuments);
    }

    let total = present.len();
    debug!(
        "Encoding {} of {} document slots ({} at a time)",
        total,
        documents.len(),
        config.read_concurrency
    );
    if let Some(ref cb) = config.progress_callback {
        cb.on_upload_start(total);
    }

    let encoded: Vec<EncodedDocument> = stream::iter(present.into_iter().enumerate())
        .map(|(index, (category, file))| encode_one(index, total, category, file, client, config))
        .buffered(config.read_concurrency.max(1))
        .try_collect()
        .await?;

    Ok(UploadBatch {
        user_id: resolve_identity(user_id, &config.default_user_id),
        user_name: resolve_identity(user_name, &config.default_user_name),
        documents: encoded,
    })
}

async fn encode_one(
    index: usize,
    total: usize,
    category: &str,
    file: &PickedFile,
    client: &reqwest::Client,
    config: &UploadConfig,
) -> Result<EncodedDocument, UploadError> {
    if let Some(ref cb) = config.progress_callback {
        cb.on_document_start(index, total, &file.name);
    }

    match encode::encode_document(category, file, client, config).await {
        Ok(doc) => {
            if let Some(ref cb) = config.progress_callback {
                cb.on_document_encoded(index, total, &doc.file_name, doc.file_data.len());
            }
            Ok(doc)
        }
        Err(e) => {
            warn!("Document {}/{} ('{}') failed: {}", index + 1, total, category, e);
            if let Some(ref cb) = config.progress_callback {
                cb.on_document_error(index, total, &e.to_string());
            }
            Err(UploadError::processing(e))
        }
    }
}

/// Blank or missing identity fields fall back to the configured placeholder.
fn resolve_identity(value: Option<&str>, fallback: &str) -> String {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => v.to_string(),
        _ => fallback.to_string(),
    }
}
