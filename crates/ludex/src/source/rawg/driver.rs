//! RAWG sync driver.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use sea_orm::DatabaseConnection;

use crate::fetch::{FetchError, Fetcher};
use crate::http::{HttpRequest, HttpTransport, url_with_params};
use crate::repository;
use crate::source::{
    DriverError, PageOutcome, PageStats, Source, SourceDriver, SourceLimits, SyncType,
};

use super::RAWG_BASE_URL;
use super::convert;
use super::types::GamesPage;

#[derive(Debug, Clone, Copy)]
enum Mode {
    /// Unfiltered full catalog sweep.
    Historical,
    /// Release-date window, newest first.
    NewReleases { from: NaiveDate, to: NaiveDate },
}

/// Driver for the RAWG `/games` listing.
///
/// The cursor is the last fully processed page number; a fresh attempt
/// starts at the page after the highest ever recorded. A 404 is treated
/// as a possibly-transient gap: the page index advances and the sweep
/// continues rather than stopping.
pub struct RawgDriver {
    db: DatabaseConnection,
    fetcher: Fetcher,
    api_key: String,
    base_url: String,
    limits: SourceLimits,
    mode: Mode,
}

impl RawgDriver {
    /// Full historical sweep.
    pub fn historical(
        db: DatabaseConnection,
        transport: Arc<dyn HttpTransport>,
        api_key: impl Into<String>,
    ) -> Self {
        let limits = SourceLimits::historical_defaults(Source::Rawg);
        Self {
            db,
            fetcher: Fetcher::new(transport, limits.request_spacing_ms),
            api_key: api_key.into(),
            base_url: RAWG_BASE_URL.to_string(),
            limits,
            mode: Mode::Historical,
        }
    }

    /// New releases within `[from, to]`, newest first.
    pub fn new_releases(
        db: DatabaseConnection,
        transport: Arc<dyn HttpTransport>,
        api_key: impl Into<String>,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Self {
        let limits = SourceLimits::incremental_defaults(Source::Rawg);
        Self {
            db,
            fetcher: Fetcher::new(transport, limits.request_spacing_ms),
            api_key: api_key.into(),
            base_url: RAWG_BASE_URL.to_string(),
            limits,
            mode: Mode::NewReleases { from, to },
        }
    }

    /// Point the driver at a different API host (tests).
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn page_url(&self, page: i64) -> String {
        let mut params = vec![
            ("key", self.api_key.clone()),
            ("page", page.to_string()),
            ("page_size", self.limits.page_size.to_string()),
        ];
        if let Mode::NewReleases { from, to } = &self.mode {
            params.push(("dates", format!("{from},{to}")));
            params.push(("ordering", "-released".to_string()));
        }
        url_with_params(&format!("{}/games", self.base_url), &params)
    }
}

#[async_trait]
impl SourceDriver for RawgDriver {
    fn source(&self) -> Source {
        Source::Rawg
    }

    fn sync_type(&self) -> SyncType {
        match self.mode {
            Mode::Historical => SyncType::Historical,
            Mode::NewReleases { .. } => SyncType::Incremental,
        }
    }

    fn limits(&self) -> &SourceLimits {
        &self.limits
    }

    async fn fetch_page(&mut self, cursor: i64) -> Result<PageOutcome, DriverError> {
        let page = cursor + 1;
        let request = HttpRequest::get(self.page_url(page));

        let listing: GamesPage = match self.fetcher.execute_json(request, None).await {
            Ok(listing) => listing,
            Err(FetchError::NotFound) => {
                // Might be the end of the catalog, might be a hole; keep
                // sweeping and let the empty-page signal end the run.
                tracing::info!(page, "RAWG page returned 404, skipping past it");
                return Ok(PageOutcome::Skip { next_cursor: page });
            }
            Err(err) => return Err(DriverError::from_fetch(err)),
        };

        let results = listing.results.unwrap_or_default();
        if results.is_empty() {
            return Ok(PageOutcome::Exhausted);
        }

        let mut stats = PageStats {
            next_cursor: page,
            ..Default::default()
        };

        for raw in results {
            stats.processed += 1;
            let game_id = raw.id;
            match repository::rawg::upsert_game(&self.db, convert::to_active_model(raw)).await {
                Ok(_) => stats.added += 1,
                Err(err) => {
                    stats.record_errors += 1;
                    tracing::warn!(game_id, error = %err, "failed to save RAWG game");
                }
            }
        }

        Ok(PageOutcome::Page(stats))
    }
}
