//! Progress reporting for sync attempts.
//!
//! A unified event stream consumed by the CLI reporter; drivers stay
//! silent and the orchestrator emits on their behalf.

use crate::entity::source::Source;
use crate::entity::sync_type::SyncType;

/// Progress events emitted during a sync attempt.
#[derive(Debug, Clone)]
#[non_exhaustive]
pub enum SyncProgress {
    /// A sync attempt began.
    AttemptStarted {
        source: Source,
        sync_type: SyncType,
        /// Cursor the attempt resumes from.
        start_cursor: i64,
    },

    /// One page was fetched, written and checkpointed.
    PageComplete {
        source: Source,
        /// Cursor after this page.
        cursor: i64,
        /// Records on this page.
        processed: u64,
        /// Records written from this page.
        added: u64,
        /// Per-record failures on this page.
        record_errors: u64,
        /// Attempt-wide processed total.
        total_processed: u64,
    },

    /// A page was skipped (source-specific gap) and the cursor advanced.
    PageSkipped { source: Source, cursor: i64 },

    /// A page-level error was counted against the error budget.
    PageError {
        source: Source,
        cursor: i64,
        error: String,
        /// Consecutive errors so far.
        consecutive: u32,
    },

    /// The page loop ended; driver finalization (backfills, recomputes)
    /// is running.
    Finalizing { source: Source },

    /// The attempt reached a terminal state.
    AttemptFinished {
        source: Source,
        sync_type: SyncType,
        completed: bool,
        items_processed: u64,
        items_added: u64,
        duration_ms: u64,
    },
}

/// Callback type for receiving progress events.
pub type ProgressCallback = Box<dyn Fn(SyncProgress) + Send + Sync>;

/// Emit an event if a callback is present.
#[inline]
pub fn emit(on_progress: Option<&ProgressCallback>, event: SyncProgress) {
    if let Some(callback) = on_progress {
        callback(event);
    }
}
