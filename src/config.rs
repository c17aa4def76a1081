//! Configuration for the upload pipeline.
//!
//! All behaviour is controlled through [`UploadConfig`], built via its
//! [`UploadConfigBuilder`]. The destination endpoint is part of the config
//! rather than a compiled-in constant, so an [`crate::Uploader`] carries no
//! global state and can be pointed at a mock server in tests.

use crate::error::UploadError;
use crate::progress::ProgressCallback;
use std::fmt;

/// Default per-file ceiling: 10 MiB.
pub const DEFAULT_MAX_FILE_BYTES: u64 = 10 * 1024 * 1024;

/// Substituted when the caller supplies no user id.
pub const DEFAULT_USER_ID: &str = "anonymous";

/// Substituted when the caller supplies no user name.
pub const DEFAULT_USER_NAME: &str = "Anonymous User";

/// Configuration for an upload.
///
/// # Example
/// ```rust
/// use docsubmit::UploadConfig;
///
/// let config = UploadConfig::builder()
///     .endpoint("https://script.example.com/macros/s/abc/exec")
///     .max_file_bytes(5 * 1024 * 1024)
///     .build()
///     .unwrap();
/// assert_eq!(config.read_concurrency, 1);
/// ```
#[derive(Clone)]
pub struct UploadConfig {
    /// Destination URL for the form POST. Required; must be http(s).
    pub endpoint: String,

    /// Per-file size ceiling in bytes. Default: 10 MiB.
    pub max_file_bytes: u64,

    /// Also check the number of bytes actually read against
    /// `max_file_bytes`. Default: true.
    ///
    /// Picked files frequently arrive without a declared size. With this off
    /// such files are treated as size 0 and never rejected.
    pub enforce_actual_size: bool,

    /// Number of files read at once. Default: 1 (sequential).
    ///
    /// Results are always gathered in input order, so the failure reported
    /// is the first failing file in the document set regardless of which
    /// read finished first.
    pub read_concurrency: usize,

    /// Synthesize a success result when a 2xx response body is not JSON.
    /// Default: true.
    ///
    /// Script endpoints often answer a successful POST with a redirect page
    /// or an empty body. When disabled such bodies surface as
    /// [`UploadError::MalformedResponse`].
    pub fallback_on_unparseable: bool,

    /// Timeout for fetching `http(s)://` locators, in seconds. Default: 120.
    ///
    /// Applies to reading picked files only; the upload POST itself uses the
    /// HTTP client's defaults.
    pub download_timeout_secs: u64,

    /// Placeholder id when the caller passes none. Default: [`DEFAULT_USER_ID`].
    pub default_user_id: String,

    /// Placeholder name when the caller passes none. Default: [`DEFAULT_USER_NAME`].
    pub default_user_name: String,

    /// Optional observer for per-document events.
    pub progress_callback: Option<ProgressCallback>,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            endpoint: String::new(),
            max_file_bytes: DEFAULT_MAX_FILE_BYTES,
            enforce_actual_size: true,
            read_concurrency: 1,
            fallback_on_unparseable: true,
            download_timeout_secs: 120,
            default_user_id: DEFAULT_USER_ID.to_string(),
            default_user_name: DEFAULT_USER_NAME.to_string(),
            progress_callback: None,
        }
    }
}

impl fmt::Debug for UploadConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UploadConfig")
            .field("endpoint", &self.endpoint)
            .field("max_file_bytes", &self.max_file_bytes)
            .field("enforce_actual_size", &self.enforce_actual_size)
            .field("read_concurrency", &self.read_concurrency)
            .field("fallback_on_unparseable", &self.fallback_on_unparseable)
            .field("download_timeout_secs", &self.download_timeout_secs)
            .field("default_user_id", &self.default_user_id)
            .field("default_user_name", &self.default_user_name)
            .field(
                "progress_callback",
                &self.progress_callback.as_ref().map(|_| "<dyn UploadProgressCallback>"),
            )
            .finish()
    }
}

impl UploadConfig {
    /// Create a new builder for `UploadConfig`.
    pub fn builder() -> UploadConfigBuilder {
        UploadConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`UploadConfig`].
#[derive(Debug)]
pub struct UploadConfigBuilder {
    config: UploadConfig,
}

impl UploadConfigBuilder {
    pub fn endpoint(mut self, url: impl Into<String>) -> Self {
        self.config.endpoint = url.into();
        self
    }

    pub fn max_file_bytes(mut self, bytes: u64) -> Self {
        self.config.max_file_bytes = bytes;
        self
    }

    pub fn enforce_actual_size(mut self, v: bool) -> Self {
        self.config.enforce_actual_size = v;
        self
    }

    pub fn read_concurrency(mut self, n: usize) -> Self {
        self.config.read_concurrency = n;
        self
    }

    pub fn fallback_on_unparseable(mut self, v: bool) -> Self {
        self.config.fallback_on_unparseable = v;
        self
    }

    pub fn download_timeout_secs(mut self, secs: u64) -> Self {
        self.config.download_timeout_secs = secs;
        self
    }

    pub fn default_user_id(mut self, id: impl Into<String>) -> Self {
        self.config.default_user_id = id.into();
        self
    }

    pub fn default_user_name(mut self, name: impl Into<String>) -> Self {
        self.config.default_user_name = name.into();
        self
    }

    pub fn progress_callback(mut self, cb: ProgressCallback) -> Self {
        self.config.progress_callback = Some(cb);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<UploadConfig, UploadError> {
        let c = &self.config;
        let url = reqwest::Url::parse(&c.endpoint).map_err(|e| {
            UploadError::InvalidConfig(format!("Endpoint '{}' is not a valid URL: {}", c.endpoint, e))
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(UploadError::InvalidConfig(format!(
                "Endpoint must be http or https, got '{}'",
                url.scheme()
            )));
        }
        if c.max_file_bytes == 0 {
            return Err(UploadError::InvalidConfig(
                "Maximum file size must be ≥ 1 byte".into(),
            ));
        }
        if c.read_concurrency == 0 {
            return Err(UploadError::InvalidConfig(
                "Read concurrency must be ≥ 1".into(),
            ));
        }
        if c.download_timeout_secs == 0 {
            return Err(UploadError::InvalidConfig(
                "Download timeout must be ≥ 1 second".into(),
            ));
        }
        Ok(self.config)
    }
}
