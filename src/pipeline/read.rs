//! Locator resolution: fetch the raw bytes behind a [`PickedFile`].
//!
//! Local paths are checked with `metadata` before reading so an oversized
//! file is rejected without loading it. Remote URLs are streamed and the
//! read stops as soon as the ceiling is crossed.

use crate::document::{Locator, PickedFile};
use crate::error::EncodeError;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use bytes::{Bytes, BytesMut};
use futures::StreamExt;
use std::io::ErrorKind;
use std::path::Path;
use std::time::Duration;
use tracing::debug;

/// Read every byte of `file`.
///
/// `cap` is the largest acceptable length; `None` reads without a limit.
pub async fn read_bytes(
    file: &PickedFile,
    client: &reqwest::Client,
    cap: Option<u64>,
    timeout_secs: u64,
) -> Result<Bytes, EncodeError> {
    let bytes = match &file.locator {
        Locator::Path(path) => read_local(file, path, cap).await?,
        Locator::Url(url) => download(file, url, client, cap, timeout_secs).await?,
        Locator::DataUri(uri) => decode_data_uri(uri)
            .map(Bytes::from)
            .map_err(|reason| read_failed(file, reason))?,
        Locator::Inline(bytes) => bytes.clone(),
    };
    debug!("Read '{}': {} bytes", file.name, bytes.len());
    Ok(bytes)
}

async fn read_local(file: &PickedFile, path: &Path, cap: Option<u64>) -> Result<Bytes, EncodeError> {
    let meta = tokio::fs::metadata(path)
        .await
        .map_err(|e| read_failed(file, describe_io(path, &e)))?;
    if !meta.is_file() {
        return Err(read_failed(file, format!("'{}' is not a regular file", path.display())));
    }
    if let Some(limit) = cap {
        if meta.len() > limit {
            return Err(too_large(file, meta.len(), limit));
        }
    }

    tokio::fs::read(path)
        .await
        .map(Bytes::from)
        .map_err(|e| read_failed(file, describe_io(path, &e)))
}

async fn download(
    file: &PickedFile,
    url: &str,
    client: &reqwest::Client,
    cap: Option<u64>,
    timeout_secs: u64,
) -> Result<Bytes, EncodeError> {
    debug!("Downloading '{}' from {}", file.name, url);

    let response = client
        .get(url)
        .timeout(Duration::from_secs(timeout_secs))
        .send()
        .await
        .map_err(|e| read_failed(file, describe_reqwest(&e, timeout_secs)))?;

    if !response.status().is_success() {
        return Err(read_failed(file, format!("HTTP {} from {}", response.status(), url)));
    }

    if let (Some(limit), Some(len)) = (cap, response.content_length()) {
        if len > limit {
            return Err(too_large(file, len, limit));
        }
    }

    let mut buf = BytesMut::new();
    let mut stream = response.bytes_stream();
    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(|e| read_failed(file, describe_reqwest(&e, timeout_secs)))?;
        buf.extend_from_slice(&chunk);
        if let Some(limit) = cap {
            if buf.len() as u64 > limit {
                return Err(too_large(file, buf.len() as u64, limit));
            }
        }
    }
    Ok(buf.freeze())
}

/// Decode an RFC 2397 `data:` URI whose payload is base64.
pub fn decode_data_uri(uri: &str) -> Result<Vec<u8>, String> {
    let rest = uri
        .strip_prefix("data:")
        .ok_or_else(|| "not a data: URI".to_string())?;
    let (header, payload) = rest
        .split_once(',')
        .ok_or_else(|| "data: URI has no ',' separator".to_string())?;
    if !header.ends_with(";base64") {
        return Err("data: URI is not base64-encoded".to_string());
    }
    let compact: String = payload.chars().filter(|c| !c.is_ascii_whitespace()).collect();
    STANDARD
        .decode(compact.as_bytes())
        .map_err(|e| format!("invalid base64 payload: {}", e))
}

fn describe_io(path: &Path, e: &std::io::Error) -> String {
    match e.kind() {
        ErrorKind::NotFound => format!("file not found: '{}'", path.display()),
        ErrorKind::PermissionDenied => format!("permission denied reading '{}'", path.display()),
        _ => format!("'{}': {}", path.display(), e),
    }
}

fn describe_reqwest(e: &reqwest::Error, timeout_secs: u64) -> String {
    if e.is_timeout() {
        format!("download timed out after {}s", timeout_secs)
    } else {
        e.to_string()
    }
}

fn read_failed(file: &PickedFile, reason: impl Into<String>) -> EncodeError {
    EncodeError::FileReadFailed {
        file_name: file.name.clone(),
        reason: reason.into(),
    }
}

fn too_large(file: &PickedFile, size: u64, limit: u64) -> EncodeError {
    EncodeError::FileTooLarge {
        file_name: file.name.clone(),
        size,
        limit,
    }
}
