//! The sync orchestrator.
//!
//! One logical worker per attempt: pages are fetched and processed
//! strictly sequentially, and the checkpoint cursor is advanced only
//! after a page is fully processed, so the persisted cursor never skips
//! ahead of unprocessed data. The loop checks the external stop flag
//! between pages; a graceful shutdown leaves the checkpoint at the last
//! fully advanced page.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use sea_orm::DatabaseConnection;
use thiserror::Error;

use crate::checkpoint::{self, CheckpointError};
use crate::entity::source::Source;
use crate::entity::sync_type::SyncType;
use crate::source::{DriverError, PageOutcome, RunCounters, SourceDriver};

use super::progress::{ProgressCallback, SyncProgress, emit};

/// Errors surfaced by the orchestrator.
#[derive(Debug, Error)]
pub enum SyncError {
    #[error("checkpoint error: {0}")]
    Checkpoint(#[from] CheckpointError),

    /// The attempt was marked failed; the message matches the one
    /// recorded on the attempt row.
    #[error("sync attempt failed: {0}")]
    AttemptFailed(String),

    #[error("{src} does not support {sync_type} sync")]
    Unsupported { src: Source, sync_type: SyncType },

    #[error("missing credentials for {src}")]
    MissingCredentials { src: Source },

    #[error("storage error: {0}")]
    Repository(#[from] crate::repository::RepositoryError),
}

/// Summary of one finished attempt.
#[derive(Debug, Clone)]
pub struct SyncSummary {
    pub source: Source,
    pub sync_type: SyncType,
    pub items_processed: u64,
    pub items_added: u64,
    pub record_errors: u64,
    pub pages: u64,
    pub calls_used: u64,
    pub duration: Duration,
    /// True when the run ended early on the external stop signal.
    pub stopped: bool,
}

/// Run a driver's historical/full pass to completion or budget
/// exhaustion.
pub async fn run_historical<D: SourceDriver>(
    db: &DatabaseConnection,
    driver: D,
    shutdown: &Arc<AtomicBool>,
    on_progress: Option<&ProgressCallback>,
) -> Result<SyncSummary, SyncError> {
    run_attempt(db, driver, shutdown, on_progress).await
}

/// Run a driver's window-bounded incremental pass to exhaustion.
pub async fn run_incremental<D: SourceDriver>(
    db: &DatabaseConnection,
    driver: D,
    shutdown: &Arc<AtomicBool>,
    on_progress: Option<&ProgressCallback>,
) -> Result<SyncSummary, SyncError> {
    run_attempt(db, driver, shutdown, on_progress).await
}

/// Run a driver's fixed hot-update profiles once each.
pub async fn run_hot_update<D: SourceDriver>(
    db: &DatabaseConnection,
    driver: D,
    shutdown: &Arc<AtomicBool>,
    on_progress: Option<&ProgressCallback>,
) -> Result<SyncSummary, SyncError> {
    run_attempt(db, driver, shutdown, on_progress).await
}

/// The shared attempt state machine: Idle -> Running -> Completed|Failed.
async fn run_attempt<D: SourceDriver>(
    db: &DatabaseConnection,
    mut driver: D,
    shutdown: &Arc<AtomicBool>,
    on_progress: Option<&ProgressCallback>,
) -> Result<SyncSummary, SyncError> {
    let source = driver.source();
    let sync_type = driver.sync_type();
    let limits = driver.limits().clone();

    let start_cursor = if driver.resume_from_checkpoint() {
        checkpoint::latest_cursor(db, source, sync_type).await?
    } else {
        0
    };

    let attempt = checkpoint::begin_attempt(db, source, sync_type, start_cursor).await?;
    let started = std::time::Instant::now();

    emit(
        on_progress,
        SyncProgress::AttemptStarted {
            source,
            sync_type,
            start_cursor,
        },
    );
    tracing::info!(%source, %sync_type, start_cursor, attempt = %attempt.id, "sync attempt starting");

    let mut counters = RunCounters::default();

    if let Err(err) = driver.prepare().await {
        return abort(db, attempt.id, source, sync_type, started, &counters, on_progress, format!("prepare failed: {err}")).await;
    }

    let mut cursor = start_cursor;
    let mut consecutive_errors = 0u32;
    let mut stopped = false;

    loop {
        if shutdown.load(Ordering::Acquire) {
            tracing::info!(%source, cursor, "stop requested, halting at last advanced page");
            stopped = true;
            break;
        }

        if let Some(max_calls) = limits.max_calls {
            if counters.calls_used >= max_calls {
                tracing::info!(%source, calls = counters.calls_used, "call budget exhausted");
                break;
            }
        }
        if let Some(max_pages) = limits.max_pages {
            if counters.pages >= max_pages {
                tracing::warn!(%source, pages = counters.pages, "page safety cap reached");
                break;
            }
        }

        counters.calls_used += 1;

        match driver.fetch_page(cursor).await {
            Ok(PageOutcome::Page(stats)) => {
                consecutive_errors = 0;
                counters.pages += 1;
                counters.processed += stats.processed;
                counters.added += stats.added;
                counters.record_errors += stats.record_errors;
                cursor = stats.next_cursor;

                // The unit of resumability: the cursor only moves after
                // the page's records are written.
                checkpoint::advance(
                    db,
                    attempt.id,
                    cursor,
                    counters.processed as i64,
                    counters.added as i64,
                )
                .await?;

                emit(
                    on_progress,
                    SyncProgress::PageComplete {
                        source,
                        cursor,
                        processed: stats.processed,
                        added: stats.added,
                        record_errors: stats.record_errors,
                        total_processed: counters.processed,
                    },
                );
            }
            Ok(PageOutcome::Skip { next_cursor }) => {
                cursor = next_cursor;
                checkpoint::advance(
                    db,
                    attempt.id,
                    cursor,
                    counters.processed as i64,
                    counters.added as i64,
                )
                .await?;
                emit(on_progress, SyncProgress::PageSkipped { source, cursor });
            }
            Ok(PageOutcome::Exhausted) => {
                tracing::info!(%source, cursor, "source exhausted");
                break;
            }
            Err(DriverError::Transient(message)) => {
                consecutive_errors += 1;
                emit(
                    on_progress,
                    SyncProgress::PageError {
                        source,
                        cursor,
                        error: message.clone(),
                        consecutive: consecutive_errors,
                    },
                );
                tracing::warn!(%source, cursor, consecutive_errors, error = %message, "page fetch failed");

                if consecutive_errors >= limits.max_consecutive_errors {
                    let reason = format!(
                        "{consecutive_errors} consecutive errors, last: {message}"
                    );
                    return abort(db, attempt.id, source, sync_type, started, &counters, on_progress, reason).await;
                }

                // Back off a little longer with each consecutive failure.
                tokio::time::sleep(Duration::from_secs(u64::from(consecutive_errors.min(5)))).await;
            }
            Err(err @ (DriverError::Fatal(_) | DriverError::Auth(_))) => {
                return abort(db, attempt.id, source, sync_type, started, &counters, on_progress, err.to_string()).await;
            }
        }
    }

    if stopped {
        let reason = "stop requested before completion".to_string();
        checkpoint::fail(db, attempt.id, reason).await?;
        emit(
            on_progress,
            SyncProgress::AttemptFinished {
                source,
                sync_type,
                completed: false,
                items_processed: counters.processed,
                items_added: counters.added,
                duration_ms: started.elapsed().as_millis() as u64,
            },
        );
        return Ok(summary(source, sync_type, &counters, started, true));
    }

    emit(on_progress, SyncProgress::Finalizing { source });
    if let Err(err) = driver.finalize(&mut counters).await {
        return abort(db, attempt.id, source, sync_type, started, &counters, on_progress, format!("finalize failed: {err}")).await;
    }

    let metadata = serde_json::json!({
        "pages": counters.pages,
        "calls_used": counters.calls_used,
        "record_errors": counters.record_errors,
        "driver": driver.metadata(),
    });
    checkpoint::complete(
        db,
        attempt.id,
        counters.processed as i64,
        counters.added as i64,
        metadata,
    )
    .await?;

    let duration = started.elapsed();
    tracing::info!(
        %source,
        %sync_type,
        processed = counters.processed,
        added = counters.added,
        pages = counters.pages,
        duration_ms = duration.as_millis() as u64,
        "sync attempt completed"
    );
    emit(
        on_progress,
        SyncProgress::AttemptFinished {
            source,
            sync_type,
            completed: true,
            items_processed: counters.processed,
            items_added: counters.added,
            duration_ms: duration.as_millis() as u64,
        },
    );

    Ok(summary(source, sync_type, &counters, started, false))
}

fn summary(
    source: Source,
    sync_type: SyncType,
    counters: &RunCounters,
    started: std::time::Instant,
    stopped: bool,
) -> SyncSummary {
    SyncSummary {
        source,
        sync_type,
        items_processed: counters.processed,
        items_added: counters.added,
        record_errors: counters.record_errors,
        pages: counters.pages,
        calls_used: counters.calls_used,
        duration: started.elapsed(),
        stopped,
    }
}

/// Terminal failure path: record the message, emit, surface the error.
#[allow(clippy::too_many_arguments)]
async fn abort(
    db: &DatabaseConnection,
    attempt_id: uuid::Uuid,
    source: Source,
    sync_type: SyncType,
    started: std::time::Instant,
    counters: &RunCounters,
    on_progress: Option<&ProgressCallback>,
    reason: String,
) -> Result<SyncSummary, SyncError> {
    tracing::error!(%source, %sync_type, error = %reason, "sync attempt failed");
    checkpoint::fail(db, attempt_id, reason.clone()).await?;
    emit(
        on_progress,
        SyncProgress::AttemptFinished {
            source,
            sync_type,
            completed: false,
            items_processed: counters.processed,
            items_added: counters.added,
            duration_ms: started.elapsed().as_millis() as u64,
        },
    );
    Err(SyncError::AttemptFailed(reason))
}
