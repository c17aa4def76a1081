//! Progress-callback trait for per-document upload events.
//!
//! Inject an [`Arc<dyn UploadProgressCallback>`] via
//! [`crate::config::UploadConfigBuilder::progress_callback`] to observe the
//! pipeline as it reads each file and sends the batch. The CLI uses this to
//! drive its progress bar; a UI layer can forward the events to its own
//! widgets.
//!
//! # Example
//!
//! ```rust
//! use docsubmit::{UploadConfig, UploadProgressCallback};
//! use std::sync::{Arc, atomic::{AtomicUsize, Ordering}};
//!
//! struct CountingCallback {
//!     encoded: AtomicUsize,
//! }
//!
//! impl UploadProgressCallback for CountingCallback {
//!     fn on_document_encoded(&self, index: usize, total: usize, file_name: &str, _len: usize) {
//!         self.encoded.fetch_add(1, Ordering::SeqCst);
//!         eprintln!("{}/{} {}", index + 1, total, file_name);
//!     }
//! }
//!
//! let config = UploadConfig::builder()
//!     .endpoint("https://example.com/exec")
//!     .progress_callback(Arc::new(CountingCallback { encoded: AtomicUsize::new(0) }))
//!     .build()
//!     .unwrap();
//! ```

use std::sync::Arc;

/// Called by the upload pipeline at each stage.
///
/// All methods have default no-op implementations. With
/// `read_concurrency > 1` the per-document methods may be called from
/// several tasks at once, so implementations must be `Send + Sync`.
pub trait UploadProgressCallback: Send + Sync {
    /// Called once, after empty categories have been filtered out.
    ///
    /// # Arguments
    /// * `total_documents`: number of files that will be read
    fn on_upload_start(&self, total_documents: usize) {
        let _ = total_documents;
    }

    /// Called just before a file is read.
    ///
    /// # Arguments
    /// * `index`    : 0-based position in the document set
    /// * `total`    : number of files in the batch
    /// * `file_name`: the caller-supplied (unsanitized) name
    fn on_document_start(&self, index: usize, total: usize, file_name: &str) {
        let _ = (index, total, file_name);
    }

    /// Called when a file has been encoded.
    ///
    /// # Arguments
    /// * `index`      : 0-based position in the document set
    /// * `total`      : number of files in the batch
    /// * `file_name`  : the sanitized name that will be transmitted
    /// * `encoded_len`: length of the base64 payload
    fn on_document_encoded(&self, index: usize, total: usize, file_name: &str, encoded_len: usize) {
        let _ = (index, total, file_name, encoded_len);
    }

    /// Called when a file fails to encode. The upload aborts afterwards.
    fn on_document_error(&self, index: usize, total: usize, error: &str) {
        let _ = (index, total, error);
    }

    /// Called just before the POST is sent.
    ///
    /// # Arguments
    /// * `body_len`: byte length of the form-encoded request body
    fn on_request_sent(&self, body_len: usize) {
        let _ = body_len;
    }

    /// Called once the response has been interpreted.
    ///
    /// # Arguments
    /// * `success`    : the `success` flag of the result
    /// * `synthesized`: true when the result is the fallback receipt
    fn on_upload_complete(&self, success: bool, synthesized: bool) {
        let _ = (success, synthesized);
    }
}

/// A no-op implementation for callers that don't need progress events.
pub struct NoopProgressCallback;

impl UploadProgressCallback for NoopProgressCallback {}

/// Convenience alias matching the type stored in [`crate::config::UploadConfig`].
pub type ProgressCallback = Arc<dyn UploadProgressCallback>;
