//! CLI binary for docsubmit.
//!
//! A thin shim over the library crate that maps CLI flags
//! to `UploadConfig` and prints the upload result.

use anyhow::{Context, Result};
use clap::Parser;
use docsubmit::document::is_url;
use docsubmit::{
    DocumentSet, PickedFile, ProgressCallback, UploadConfig, UploadProgressCallback, Uploader,
};
use indicatif::{ProgressBar, ProgressStyle};
use std::io;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}
fn cyan(s: &str) -> String {
    format!("\x1b[36m{s}\x1b[0m")
}

// ── CLI progress callback using indicatif ────────────────────────────────────

/// Terminal progress callback: one bar over the documents, then a spinner
/// while the request is in flight.
struct CliProgressCallback {
    bar: ProgressBar,
}

impl CliProgressCallback {
    fn new() -> Arc<Self> {
        let bar = ProgressBar::new(0);
        let spinner_style = ProgressStyle::with_template("{spinner:.cyan} {prefix:.bold}  {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]);

        bar.set_style(spinner_style);
        bar.set_prefix("Preparing");
        bar.set_message("Collecting documents…");
        bar.enable_steady_tick(Duration::from_millis(80));

        Arc::new(Self { bar })
    }
}

impl UploadProgressCallback for CliProgressCallback {
    fn on_upload_start(&self, total_documents: usize) {
        let style = ProgressStyle::with_template(
            "{spinner:.cyan} {prefix:.bold}  [{bar:42.green/238}] {pos:>2}/{len} documents  {msg}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏  ")
        .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]);

        self.bar.set_length(total_documents as u64);
        self.bar.set_style(style);
        self.bar.set_prefix("Encoding");
    }

    fn on_document_start(&self, _index: usize, _total: usize, file_name: &str) {
        self.bar.set_message(file_name.to_string());
    }

    fn on_document_encoded(&self, index: usize, total: usize, file_name: &str, encoded_len: usize) {
        self.bar.println(format!(
            "  {} {:>2}/{:<2}  {:<32}  {}",
            green("✓"),
            index + 1,
            total,
            file_name,
            dim(&format!("{} KiB base64", encoded_len / 1024)),
        ));
        self.bar.inc(1);
    }

    fn on_document_error(&self, index: usize, total: usize, error: &str) {
        self.bar.println(format!(
            "  {} {:>2}/{:<2}  {}",
            red("✗"),
            index + 1,
            total,
            red(error)
        ));
        self.bar.abandon();
    }

    fn on_request_sent(&self, body_len: usize) {
        self.bar.set_prefix("Uploading");
        self.bar.set_message(format!("{} KiB", body_len / 1024));
    }

    fn on_upload_complete(&self, _success: bool, _synthesized: bool) {
        self.bar.finish_and_clear();
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Upload two documents
  docsubmit --endpoint https://script.example.com/exec \
            --user-id 42 --user-name "Ann Lee" \
            --doc id=passport.jpg --doc proofOfAddress=bill.pdf

  # A remote file and an explicitly empty slot
  docsubmit --doc id=https://example.com/id.png --doc selfie=

  # Machine-readable result
  docsubmit --json --doc id=passport.jpg > receipt.json

ENVIRONMENT VARIABLES:
  DOCSUBMIT_ENDPOINT      Destination URL
  DOCSUBMIT_USER_ID       Submitter id
  DOCSUBMIT_USER_NAME     Submitter display name
  RUST_LOG                Overrides the log filter (e.g. docsubmit=debug)
"#;

/// Upload documents to a remote script endpoint as base64 payloads.
#[derive(Parser, Debug)]
#[command(
    name = "docsubmit",
    version,
    about = "Upload documents to a remote script endpoint as base64 payloads",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Destination URL for the form POST.
    #[arg(long, env = "DOCSUBMIT_ENDPOINT")]
    endpoint: String,

    /// Document as CATEGORY=PATH_OR_URI (repeatable). An empty value marks
    /// the slot as absent.
    #[arg(short, long = "doc", value_name = "CATEGORY=PATH_OR_URI", required = true)]
    docs: Vec<String>,

    /// Submitter id.
    #[arg(long, env = "DOCSUBMIT_USER_ID")]
    user_id: Option<String>,

    /// Submitter display name.
    #[arg(long, env = "DOCSUBMIT_USER_NAME")]
    user_name: Option<String>,

    /// Per-file size limit in MiB.
    #[arg(long, env = "DOCSUBMIT_MAX_SIZE_MB", default_value_t = 10)]
    max_size_mb: u64,

    /// Number of files read at once.
    #[arg(long, env = "DOCSUBMIT_READ_CONCURRENCY", default_value_t = 1)]
    read_concurrency: usize,

    /// Treat a non-JSON success response as an error instead of synthesizing
    /// a receipt.
    #[arg(long, env = "DOCSUBMIT_NO_FALLBACK")]
    no_fallback: bool,

    /// HTTP download timeout in seconds for URL documents.
    #[arg(long, env = "DOCSUBMIT_DOWNLOAD_TIMEOUT", default_value_t = 120)]
    download_timeout: u64,

    /// Print the result as JSON.
    #[arg(long, env = "DOCSUBMIT_JSON")]
    json: bool,

    /// Disable progress bar.
    #[arg(long, env = "DOCSUBMIT_NO_PROGRESS")]
    no_progress: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "DOCSUBMIT_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, env = "DOCSUBMIT_QUIET")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    let show_progress = !cli.quiet && !cli.no_progress && !cli.json;
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet || show_progress {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    // ── Build config ─────────────────────────────────────────────────────
    let progress_cb: Option<ProgressCallback> = if show_progress {
        Some(CliProgressCallback::new() as Arc<dyn UploadProgressCallback>)
    } else {
        None
    };
    let config = build_config(&cli, progress_cb)?;

    let documents = cli
        .docs
        .iter()
        .map(String::as_str)
        .map(parse_doc)
        .collect::<Result<DocumentSet>>()?;

    // ── Upload ───────────────────────────────────────────────────────────
    let uploader = Uploader::new(config).context("Failed to initialise uploader")?;
    let result = uploader
        .upload_documents(&documents, cli.user_id.as_deref(), cli.user_name.as_deref())
        .await
        .context("Upload failed")?;

    if cli.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&result).context("Failed to serialise result")?
        );
    } else if !cli.quiet {
        let mark = if !result.success {
            red("✘")
        } else if result.synthesized {
            cyan("⚠")
        } else {
            green("✔")
        };
        eprintln!(
            "{} {} documents uploaded{}",
            mark,
            bold(&result.upload_count().to_string()),
            if result.synthesized { "  (no receipt from server)" } else { "" }
        );
        if let Some(folder) = result.folder_url.as_ref().or(result.folder_id.as_ref()) {
            eprintln!("   folder  {}", dim(folder));
        }
        for up in result.uploads.iter().flatten() {
            eprintln!(
                "   {:<16} {}  {}",
                up.document_type,
                up.file_name,
                dim(up.file_url.as_deref().unwrap_or("")),
            );
        }
        if let Some(ref msg) = result.message {
            eprintln!("   {}", dim(msg));
        }
    }

    result.into_result().context("Upload failed")?;
    Ok(())
}

/// Map CLI args to `UploadConfig`.
fn build_config(cli: &Cli, progress: Option<ProgressCallback>) -> Result<UploadConfig> {
    let mut builder = UploadConfig::builder()
        .endpoint(cli.endpoint.clone())
        .max_file_bytes(cli.max_size_mb.saturating_mul(1024 * 1024))
        .read_concurrency(cli.read_concurrency)
        .fallback_on_unparseable(!cli.no_fallback)
        .download_timeout_secs(cli.download_timeout);

    if let Some(cb) = progress {
        builder = builder.progress_callback(cb);
    }

    builder.build().context("Invalid configuration")
}

/// Parse `--doc CATEGORY=PATH_OR_URI`.
fn parse_doc(arg: &str) -> Result<(String, Option<PickedFile>)> {
    let (category, location) = arg
        .split_once('=')
        .with_context(|| format!("Expected CATEGORY=PATH_OR_URI, got '{}'", arg))?;
    let category = category.trim();
    if category.is_empty() {
        anyhow::bail!("Empty category in '{}'", arg);
    }

    let location = location.trim();
    if location.is_empty() {
        return Ok((category.to_string(), None));
    }

    let file = if location.starts_with("data:") {
        PickedFile::from_uri(category, location)
    } else if is_url(location) {
        let name = location
            .split(['?', '#'])
            .next()
            .and_then(|p| p.rsplit('/').next())
            .filter(|n| !n.is_empty())
            .unwrap_or(category);
        PickedFile::from_uri(name, location)
    } else {
        let path = location.strip_prefix("file://").unwrap_or(location);
        PickedFile::from_path(path)
    };
    Ok((category.to_string(), Some(file)))
}
