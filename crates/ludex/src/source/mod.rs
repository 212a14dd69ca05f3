//! Per-source sync drivers.
//!
//! A driver knows one source's pagination contract, field mapping and
//! completion condition. Drivers own no persistent state: given a cursor
//! they fetch one page, write its records through the repository, and
//! report how far the cursor should advance. The orchestrator in
//! [`crate::sync::engine`] owns the loop, the budgets and the checkpoint.

use async_trait::async_trait;
use thiserror::Error;

pub use crate::entity::source::Source;
pub use crate::entity::sync_type::SyncType;

use crate::fetch::FetchError;

pub mod cheapshark;
pub(crate) mod de;
pub mod igdb;
pub mod rawg;
pub mod steam;
pub mod twitch;

/// Centralized per-source budgets and pacing.
///
/// These used to be scattered constants in each driver; they are named
/// configuration now so every cap is visible and overridable in one place.
#[derive(Debug, Clone)]
pub struct SourceLimits {
    /// Maximum API calls the main page loop may spend in one session.
    pub max_calls: Option<u64>,
    /// Hard page-count safety cap against endlessly-paginating endpoints.
    pub max_pages: Option<u64>,
    /// Consecutive page-level errors before the attempt is failed.
    pub max_consecutive_errors: u32,
    /// Minimum spacing between requests to this source.
    pub request_spacing_ms: u64,
    /// Records requested per page.
    pub page_size: u32,
}

impl SourceLimits {
    /// Documented defaults for a source's historical/full sync.
    #[must_use]
    pub fn historical_defaults(source: Source) -> Self {
        match source {
            // RAWG allows 40 per page; one session burns up to 18,000 of
            // the daily call allowance.
            Source::Rawg => Self {
                max_calls: Some(18_000),
                max_pages: None,
                max_consecutive_errors: 5,
                request_spacing_ms: 200,
                page_size: 40,
            },
            // IGDB serves 500 per request at ~4 req/s.
            Source::Igdb => Self {
                max_calls: Some(4_000),
                max_pages: None,
                max_consecutive_errors: 5,
                request_spacing_ms: 250,
                page_size: 500,
            },
            // CheapShark pages deals at 60; the page cap is a runaway
            // guard, not an expected bound.
            Source::CheapShark => Self {
                max_calls: None,
                max_pages: Some(2_000),
                max_consecutive_errors: 5,
                request_spacing_ms: 100,
                page_size: 60,
            },
            // Steam has no listing pagination; page_size is the batch of
            // app ids processed between checkpoint advances.
            Source::Steam => Self {
                max_calls: None,
                max_pages: None,
                max_consecutive_errors: 5,
                request_spacing_ms: 200,
                page_size: 50,
            },
            // Twitch caps helix pages at 100 entries.
            Source::Twitch => Self {
                max_calls: None,
                max_pages: None,
                max_consecutive_errors: 5,
                request_spacing_ms: 100,
                page_size: 100,
            },
        }
    }

    /// Defaults for a source's incremental pass: same pacing, small caps.
    #[must_use]
    pub fn incremental_defaults(source: Source) -> Self {
        let mut limits = Self::historical_defaults(source);
        limits.max_calls = None;
        limits.max_pages = Some(match source {
            Source::Rawg => 10,
            // 2,000 records at 500 per call.
            Source::Igdb => 4,
            _ => 10,
        });
        limits
    }
}

/// Driver-level error classification.
///
/// Rate limiting never reaches this type: it is absorbed inside the
/// fetcher. `Transient` counts against the orchestrator's consecutive
/// error budget; `Fatal` and `Auth` abort the attempt immediately.
#[derive(Debug, Error)]
pub enum DriverError {
    #[error("{0}")]
    Transient(String),

    #[error("authentication failure: {0}")]
    Auth(String),

    #[error("{0}")]
    Fatal(String),
}

impl DriverError {
    /// Default mapping for fetch errors where a 404 has no special
    /// source-specific meaning.
    #[must_use]
    pub fn from_fetch(err: FetchError) -> Self {
        match err {
            FetchError::NotFound => DriverError::Fatal("unexpected 404".to_string()),
            FetchError::Auth(message) => DriverError::Auth(message),
            FetchError::Transient(message) => DriverError::Transient(message),
            FetchError::Fatal { status, message } => {
                DriverError::Fatal(format!("status {status}: {message}"))
            }
        }
    }
}

impl From<crate::repository::RepositoryError> for DriverError {
    fn from(err: crate::repository::RepositoryError) -> Self {
        DriverError::Fatal(format!("storage error: {err}"))
    }
}

impl From<crate::checkpoint::CheckpointError> for DriverError {
    fn from(err: crate::checkpoint::CheckpointError) -> Self {
        DriverError::Fatal(format!("checkpoint error: {err}"))
    }
}

/// Counters a page contributes to the attempt.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PageStats {
    /// Records seen on this page.
    pub processed: u64,
    /// Records successfully written.
    pub added: u64,
    /// Per-record save failures (caught and skipped, never fatal).
    pub record_errors: u64,
    /// Cursor value to persist once this page counts as done.
    pub next_cursor: i64,
}

/// What a single `fetch_page` call produced.
#[derive(Debug)]
pub enum PageOutcome {
    /// A page of records was processed and written.
    Page(PageStats),
    /// The page could not be served but the cursor should advance past it
    /// (e.g. RAWG's possibly-transient 404 gaps).
    Skip { next_cursor: i64 },
    /// The source signaled end of data; the loop stops cleanly.
    Exhausted,
}

/// Running totals the orchestrator aggregates across pages.
#[derive(Debug, Clone, Copy, Default)]
pub struct RunCounters {
    pub processed: u64,
    pub added: u64,
    pub record_errors: u64,
    pub pages: u64,
    pub calls_used: u64,
}

/// One source's sync driver.
///
/// A driver instance is created per attempt and dropped afterwards; any
/// in-run state (CheapShark's accumulated game-id set, Steam's remaining
/// app list) lives inside the instance and is rebuilt on restart.
#[async_trait]
pub trait SourceDriver: Send {
    /// The source this driver talks to.
    fn source(&self) -> Source;

    /// The kind of pass this driver instance runs.
    fn sync_type(&self) -> SyncType;

    /// Budgets and pacing for this pass.
    fn limits(&self) -> &SourceLimits;

    /// Whether the orchestrator should start from the persisted cursor.
    ///
    /// Steam's full sync derives its work list from storage (every
    /// unfetched app id) and always starts at 0; everyone else resumes.
    fn resume_from_checkpoint(&self) -> bool {
        true
    }

    /// One-time setup before the page loop (store sweeps, list fetches).
    async fn prepare(&mut self) -> Result<(), DriverError> {
        Ok(())
    }

    /// Fetch and process the page at `cursor`.
    async fn fetch_page(&mut self, cursor: i64) -> Result<PageOutcome, DriverError>;

    /// Work that runs after the page loop completes without failing
    /// (backfills, trailing recomputes). Counters accumulate into the
    /// attempt totals.
    async fn finalize(&mut self, _counters: &mut RunCounters) -> Result<(), DriverError> {
        Ok(())
    }

    /// Driver-specific metadata recorded on the completed attempt row.
    fn metadata(&self) -> serde_json::Value {
        serde_json::json!({})
    }
}
