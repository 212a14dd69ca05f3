//! Sync commands.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;

use ludex::Source;
use ludex::http::reqwest_transport::ReqwestTransport;
use ludex::sync::{ProgressCallback, SyncError, SyncService, SyncSummary};

use crate::SyncMode;
use crate::config::Config;
use crate::progress::LoggingReporter;
use crate::shutdown;

/// Bounded timeout for every outbound call.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

async fn build_service(config: &Config) -> anyhow::Result<SyncService> {
    let url = config.database_url();
    let db = ludex::connect_and_migrate(&url)
        .await
        .with_context(|| format!("connecting to {url}"))?;

    let transport =
        ReqwestTransport::with_timeout(REQUEST_TIMEOUT).context("building HTTP client")?;

    let reporter = LoggingReporter::new();
    let callback: ProgressCallback = Box::new(move |event| reporter.handle(event));

    Ok(SyncService::new(db, Arc::new(transport), config.credentials())
        .with_shutdown_flag(shutdown::setup_shutdown_handler())
        .with_progress(callback))
}

async fn run_mode(
    service: &SyncService,
    source: Source,
    mode: SyncMode,
) -> Result<SyncSummary, SyncError> {
    match mode {
        SyncMode::Full => service.full_sync(source).await,
        SyncMode::Incremental => service.incremental_sync(source).await,
        SyncMode::Hot => service.hot_update_sync(source).await,
    }
}

fn print_summary(summary: &SyncSummary) {
    let state = if summary.stopped { "stopped" } else { "done" };
    println!(
        "{} {} sync {}: {} processed, {} added, {} pages, {} record errors in {:.1?}",
        summary.source,
        summary.sync_type,
        state,
        summary.items_processed,
        summary.items_added,
        summary.pages,
        summary.record_errors,
        summary.duration,
    );
}

/// Sync one source.
pub async fn run_one(config: &Config, source: Source, mode: SyncMode) -> anyhow::Result<()> {
    let service = build_service(config).await?;
    let summary = run_mode(&service, source, mode)
        .await
        .with_context(|| format!("syncing {source}"))?;
    print_summary(&summary);
    Ok(())
}

/// Sync every source that supports the given mode, continuing past
/// per-source failures.
pub async fn run_all(config: &Config, mode: SyncMode) -> anyhow::Result<()> {
    let service = build_service(config).await?;

    let mut failures = 0usize;
    for source in Source::ALL {
        match run_mode(&service, source, mode).await {
            Ok(summary) => {
                print_summary(&summary);
                if summary.stopped {
                    println!("stop requested, not starting further sources");
                    break;
                }
            }
            Err(SyncError::Unsupported { .. }) => {
                tracing::debug!(%source, ?mode, "mode not supported, skipping");
            }
            Err(SyncError::MissingCredentials { .. }) => {
                println!("{source}: skipped (no credentials configured)");
            }
            Err(err) => {
                failures += 1;
                eprintln!("{source}: sync failed: {err}");
            }
        }
    }

    if failures > 0 {
        anyhow::bail!("{failures} source(s) failed");
    }
    Ok(())
}
