//! # docsubmit
//!
//! Upload user-picked documents to a remote script endpoint as base64
//! payloads in a single HTTP form submission.
//!
//! ## Pipeline Overview
//!
//! ```text
//! DocumentSet (category → Option<PickedFile>)
//!  │
//!  ├─ 1. Read     path / file:// / http(s):// / data: → bytes
//!  ├─ 2. Encode   size ceiling, name sanitisation, base64
//!  ├─ 3. Payload  { userId, userName, documents: [...] }
//!  └─ 4. Send     POST data=<urlencoded JSON>, one attempt
//!                 → UploadResult (server JSON, or synthesized receipt)
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use docsubmit::{DocumentSet, PickedFile, UploadConfig, Uploader};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = UploadConfig::builder()
//!         .endpoint("https://script.example.com/macros/s/abc/exec")
//!         .build()?;
//!     let documents = DocumentSet::new()
//!         .with("id", Some(PickedFile::from_path("passport.jpg")))
//!         .with("proofOfAddress", None);
//!
//!     let result = Uploader::new(config)?
//!         .upload_documents(&documents, Some("user-42"), Some("Ann Lee"))
//!         .await?
//!         .into_result()?;
//!     println!("stored in folder {:?}", result.folder_id);
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `docsubmit` binary (clap + anyhow + tracing-subscriber + indicatif) |

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod document;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod progress;
pub mod upload;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{UploadConfig, UploadConfigBuilder, DEFAULT_MAX_FILE_BYTES};
pub use document::{DocumentSet, Locator, PickedFile};
pub use error::{EncodeError, UploadError};
pub use output::{StoredFile, UploadResult};
pub use pipeline::encode::{sanitize_file_name, EncodedDocument};
pub use pipeline::payload::UploadBatch;
pub use progress::{NoopProgressCallback, ProgressCallback, UploadProgressCallback};
pub use upload::{upload_documents, upload_documents_sync, Uploader};
