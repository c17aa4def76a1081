//! Document encoding: picked file → sanitized name + base64 payload.
//!
//! The endpoint receives each file as a bare base64 string (standard
//! alphabet, padded) inside the JSON batch. Inline `data:` URIs are decoded
//! and re-encoded, so their `data:…;base64,` header never reaches the wire.

use crate::config::UploadConfig;
use crate::document::PickedFile;
use crate::error::EncodeError;
use crate::pipeline::read;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// One file ready for transmission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EncodedDocument {
    pub document_type: String,
    pub file_name: String,
    pub file_data: String,
}

static DISALLOWED: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^A-Za-z0-9._-]").unwrap());

/// Replace every character outside `[A-Za-z0-9._-]` with `_`.
///
/// One underscore per Unicode scalar value, so `é` becomes a single `_`.
pub fn sanitize_file_name(name: &str) -> String {
    DISALLOWED.replace_all(name, "_").into_owned()
}

/// Read and encode one file under `document_type`.
///
/// The declared size is checked first; a file with no declared size passes
/// that check as 0 bytes. When `enforce_actual_size` is set, the bytes read
/// are checked against the same ceiling.
pub async fn encode_document(
    document_type: &str,
    file: &PickedFile,
    client: &reqwest::Client,
    config: &UploadConfig,
) -> Result<EncodedDocument, EncodeError> {
    let limit = config.max_file_bytes;
    let declared = file.size.unwrap_or(0);
    if declared > limit {
        return Err(EncodeError::FileTooLarge {
            file_name: file.name.clone(),
            size: declared,
            limit,
        });
    }

    let cap = config.enforce_actual_size.then_some(limit);
    let bytes = read::read_bytes(file, client, cap, config.download_timeout_secs).await?;
    if let Some(limit) = cap {
        if bytes.len() as u64 > limit {
            return Err(EncodeError::FileTooLarge {
                file_name: file.name.clone(),
                size: bytes.len() as u64,
                limit,
            });
        }
    }

    let file_data = STANDARD.encode(&bytes);
    let file_name = sanitize_file_name(&file.name);
    debug!(
        "Encoded '{}' as '{}' → {} bytes base64",
        file.name,
        file_name,
        file_data.len()
    );

    Ok(EncodedDocument {
        document_type: document_type.to_string(),
        file_name,
        file_data,
    })
}
