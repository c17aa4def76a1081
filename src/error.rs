//! Error types for the docsubmit library.
//!
//! Two error types mirror the two layers of the pipeline:
//!
//! * [`EncodeError`]: a single picked file could not be turned into a
//!   base64 payload (too large, unreadable locator, bad inline data).
//!
//! * [`UploadError`]: the whole upload call failed. Encoder failures are
//!   wrapped in [`UploadError::DocumentProcessingFailed`] together with the
//!   offending file name, so the caller sees one message while the inner
//!   kind stays reachable through [`std::error::Error::source`].
//!
//! Every failure is terminal for the current call. Nothing is retried.

use thiserror::Error;

/// Failure to read or encode a single picked file.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum EncodeError {
    /// Declared or actual size exceeds the configured ceiling.
    #[error("File '{file_name}' is too large: {size} bytes (limit {limit} bytes)")]
    FileTooLarge {
        file_name: String,
        size: u64,
        limit: u64,
    },

    /// The locator could not be read, or inline data failed to decode.
    #[error("Failed to read file '{file_name}': {reason}")]
    FileReadFailed { file_name: String, reason: String },
}

impl EncodeError {
    /// Name of the file the error refers to, as supplied by the caller.
    pub fn file_name(&self) -> &str {
        match self {
            EncodeError::FileTooLarge { file_name, .. } => file_name,
            EncodeError::FileReadFailed { file_name, .. } => file_name,
        }
    }
}

/// All fatal errors returned by [`crate::upload_documents`].
#[derive(Debug, Error)]
pub enum UploadError {
    // ── Batch errors ──────────────────────────────────────────────────────
    /// Every category was empty; nothing to send.
    #[error("No documents to upload")]
    NoDocuments,

    /// A document failed to encode; the batch was not sent.
    #[error("Failed to process document '{file_name}': {source}")]
    DocumentProcessingFailed {
        file_name: String,
        #[source]
        source: EncodeError,
    },

    // ── Transport errors ──────────────────────────────────────────────────
    /// The endpoint answered with a non-2xx status.
    #[error("Upload rejected with HTTP status {status}")]
    UploadRejected { status: u16 },

    /// The endpoint could not be reached or the exchange broke off.
    #[error("Upload request failed: {0}")]
    TransportFailed(#[from] reqwest::Error),

    /// The endpoint answered with JSON that does not match the result schema.
    #[error("Malformed upload response: {reason}")]
    MalformedResponse { reason: String },

    /// The endpoint reported `success: false`.
    ///
    /// Only produced by [`crate::output::UploadResult::into_result`].
    #[error("Upload failed on the server: {message}")]
    RemoteFailure { message: String },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl UploadError {
    /// Wrap an encoder failure, attributing it to its file.
    pub fn processing(source: EncodeError) -> Self {
        UploadError::DocumentProcessingFailed {
            file_name: source.file_name().to_string(),
            source,
        }
    }

    /// HTTP status carried by the error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            UploadError::UploadRejected { status } => Some(*status),
            UploadError::TransportFailed(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}
