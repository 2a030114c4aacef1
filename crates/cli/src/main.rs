//! VisionRow CLI entry point.
//!
//! This binary is the composition root for the whole system:
//!
//! 1. **Load configuration** — clap arguments, with the service endpoint and
//!    subscription key also accepted from the environment (a `.env` file is
//!    loaded best-effort first).
//! 2. **Wire observability** — `tracing-subscriber` with an `EnvFilter`
//!    (`RUST_LOG`, default `info`). All structured events emitted by every
//!    crate in the workspace flow through this layer.
//! 3. **Construct infrastructure** — CSV source and sink, the Azure vision
//!    client — and inject them into [`runner::RowPipeline`].
//! 4. **Report the outcome** — the run summary on success; a fatal error
//!    propagates through `anyhow` and exits non-zero.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use records::{CsvRecordSink, CsvRecordSource};
use runner::RowPipeline;
use vision::AzureVisionClient;

/// Caption and tag a CSV of image URLs via a remote image-analysis service.
#[derive(Parser)]
#[command(name = "visionrow", version)]
struct Args {
    /// Input CSV; must have a header row with a URL column.
    #[arg(long, default_value = "sample.csv")]
    input: PathBuf,

    /// Output CSV, opened in append mode.
    #[arg(long, default_value = "file.csv")]
    output: PathBuf,

    /// Per-record analysis timeout in milliseconds.
    #[arg(long, default_value_t = 5000)]
    timeout_ms: u64,

    /// Base URL of the image-analysis service.
    #[arg(long, env = "VISION_ENDPOINT")]
    endpoint: String,

    /// Subscription key for the image-analysis service.
    #[arg(long, env = "VISION_KEY", hide_env_values = true)]
    key: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Credentials may live in a .env file next to the binary; absence is fine.
    let _ = dotenvy::dotenv();

    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let analyzer = Arc::new(AzureVisionClient::new(&args.endpoint, &args.key)?);
    let source = CsvRecordSource::open(&args.input)
        .with_context(|| format!("failed to open input {}", args.input.display()))?;
    let sink = CsvRecordSink::open_append(&args.output)
        .with_context(|| format!("failed to open output {}", args.output.display()))?;

    let pipeline = RowPipeline::new(source, sink, analyzer)
        .with_record_timeout(Duration::from_millis(args.timeout_ms));

    let summary = pipeline.run().await?;
    info!(
        run_id = %summary.run_id,
        rows_processed = summary.rows_processed,
        rows_succeeded = summary.rows_succeeded,
        rows_failed = summary.rows_failed,
        "run complete"
    );
    Ok(())
}
