//! Public sync surface: one service owning the database handle, the
//! per-source credentials and the shutdown flag.
//!
//! Clients are explicit per-source objects constructed per attempt and
//! passed by reference into the orchestrator; no source shares transport
//! pacing, token state or cursors with another.

use std::sync::Arc;
use std::sync::atomic::AtomicBool;

use chrono::{DateTime, FixedOffset, NaiveDate, Utc};
use sea_orm::DatabaseConnection;

use crate::checkpoint;
use crate::entity::source::Source;
use crate::entity::sync_type::SyncType;
use crate::http::HttpTransport;
use crate::repository;
use crate::source::cheapshark::CheapSharkDriver;
use crate::source::igdb::IgdbDriver;
use crate::source::rawg::RawgDriver;
use crate::source::steam::SteamDriver;
use crate::source::twitch::TwitchDriver;

use super::engine::{self, SyncError, SyncSummary};
use super::progress::ProgressCallback;

/// Estimated catalog sizes, used for completion percentages.
const RAWG_TOTAL_ESTIMATE: u64 = 850_000;
const IGDB_TOTAL_ESTIMATE: u64 = 250_000;

/// Fallback start of the RAWG new-release window when no incremental
/// pass has completed yet.
const RAWG_WINDOW_FALLBACK: (i32, u32, u32) = (2024, 1, 1);

/// Lookback of the IGDB new-release window.
const IGDB_WINDOW_DAYS: i64 = 30;

/// API credentials per source. Sources without an entry here need none.
#[derive(Debug, Clone, Default)]
pub struct SourceCredentials {
    pub rawg_api_key: Option<String>,
    pub igdb_client_id: Option<String>,
    pub igdb_client_secret: Option<String>,
    pub twitch_client_id: Option<String>,
    pub twitch_client_secret: Option<String>,
}

/// Base URLs for every external endpoint.
///
/// Defaults point at the production APIs; tests (and proxies) swap them.
#[derive(Debug, Clone)]
pub struct Endpoints {
    pub rawg: String,
    pub igdb: String,
    pub oauth_token: String,
    pub cheapshark: String,
    pub steam_api: String,
    pub steam_store: String,
    pub twitch: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            rawg: crate::source::rawg::RAWG_BASE_URL.to_string(),
            igdb: crate::source::igdb::IGDB_BASE_URL.to_string(),
            oauth_token: crate::auth::TWITCH_TOKEN_URL.to_string(),
            cheapshark: crate::source::cheapshark::CHEAPSHARK_BASE_URL.to_string(),
            steam_api: crate::source::steam::STEAM_API_BASE_URL.to_string(),
            steam_store: crate::source::steam::STEAM_STORE_BASE_URL.to_string(),
            twitch: crate::source::twitch::TWITCH_API_BASE_URL.to_string(),
        }
    }
}

/// Sync status for one source, served from local state only.
#[derive(Debug, Clone)]
pub struct SyncStats {
    pub source: Source,
    /// Furthest historical cursor ever recorded.
    pub cursor: i64,
    /// Records stored in this source's primary collection.
    pub stored_records: u64,
    /// Configured catalog size estimate, when one exists.
    pub total_estimate: Option<u64>,
    /// stored_records / total_estimate, as a percentage.
    pub percent_complete: Option<f64>,
    pub last_historical: Option<DateTime<FixedOffset>>,
    pub last_incremental: Option<DateTime<FixedOffset>>,
    pub last_hot_update: Option<DateTime<FixedOffset>>,
    /// Per-collection record counts.
    pub collections: serde_json::Value,
}

/// The sync engine's application-facing facade.
pub struct SyncService {
    db: DatabaseConnection,
    transport: Arc<dyn HttpTransport>,
    credentials: SourceCredentials,
    endpoints: Endpoints,
    shutdown: Arc<AtomicBool>,
    on_progress: Option<ProgressCallback>,
}

impl SyncService {
    pub fn new(
        db: DatabaseConnection,
        transport: Arc<dyn HttpTransport>,
        credentials: SourceCredentials,
    ) -> Self {
        Self {
            db,
            transport,
            credentials,
            endpoints: Endpoints::default(),
            shutdown: Arc::new(AtomicBool::new(false)),
            on_progress: None,
        }
    }

    /// Use non-default endpoint base URLs.
    #[must_use]
    pub fn with_endpoints(mut self, endpoints: Endpoints) -> Self {
        self.endpoints = endpoints;
        self
    }

    /// Share an externally-owned stop flag (set by the ctrl-c handler).
    #[must_use]
    pub fn with_shutdown_flag(mut self, shutdown: Arc<AtomicBool>) -> Self {
        self.shutdown = shutdown;
        self
    }

    /// Receive progress events.
    #[must_use]
    pub fn with_progress(mut self, on_progress: ProgressCallback) -> Self {
        self.on_progress = Some(on_progress);
        self
    }

    /// The service's stop flag.
    #[must_use]
    pub fn shutdown_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.shutdown)
    }

    /// Run a source's historical/full sync.
    pub async fn full_sync(&self, source: Source) -> Result<SyncSummary, SyncError> {
        match source {
            Source::Rawg => {
                let driver = RawgDriver::historical(
                    self.db.clone(),
                    Arc::clone(&self.transport),
                    self.rawg_key(source)?,
                )
                .with_base_url(&self.endpoints.rawg);
                self.run_historical(driver).await
            }
            Source::Igdb => {
                let (id, secret) = self.igdb_credentials(source)?;
                let driver = IgdbDriver::historical(
                    self.db.clone(),
                    Arc::clone(&self.transport),
                    id.clone(),
                    secret.clone(),
                )
                .with_base_url(&self.endpoints.igdb)
                .with_token_url(&self.endpoints.oauth_token, id, secret);
                self.run_historical(driver).await
            }
            Source::CheapShark => {
                let driver = CheapSharkDriver::full(self.db.clone(), Arc::clone(&self.transport))
                    .with_base_url(&self.endpoints.cheapshark);
                self.run_historical(driver).await
            }
            Source::Steam => {
                let driver = SteamDriver::full(self.db.clone(), Arc::clone(&self.transport))
                    .with_base_urls(&self.endpoints.steam_api, &self.endpoints.steam_store);
                self.run_historical(driver).await
            }
            Source::Twitch => {
                let (id, secret) = self.twitch_credentials(source)?;
                let driver = TwitchDriver::full(
                    self.db.clone(),
                    Arc::clone(&self.transport),
                    id.clone(),
                    secret.clone(),
                )
                .with_base_url(&self.endpoints.twitch)
                .with_token_url(&self.endpoints.oauth_token, id, secret);
                self.run_historical(driver).await
            }
        }
    }

    /// Run a source's incremental (new release / recent) sync.
    ///
    /// The window is derived from the last successful incremental run.
    pub async fn incremental_sync(&self, source: Source) -> Result<SyncSummary, SyncError> {
        match source {
            Source::Rawg => {
                let from = self.rawg_window_start().await?;
                let to = Utc::now().date_naive();
                let driver = RawgDriver::new_releases(
                    self.db.clone(),
                    Arc::clone(&self.transport),
                    self.rawg_key(source)?,
                    from,
                    to,
                )
                .with_base_url(&self.endpoints.rawg);
                engine::run_incremental(&self.db, driver, &self.shutdown, self.on_progress.as_ref())
                    .await
            }
            Source::Igdb => {
                let (id, secret) = self.igdb_credentials(source)?;
                let to = Utc::now().timestamp();
                let from = to - IGDB_WINDOW_DAYS * 24 * 60 * 60;
                let driver = IgdbDriver::new_releases(
                    self.db.clone(),
                    Arc::clone(&self.transport),
                    id.clone(),
                    secret.clone(),
                    from,
                    to,
                )
                .with_base_url(&self.endpoints.igdb)
                .with_token_url(&self.endpoints.oauth_token, id, secret);
                engine::run_incremental(&self.db, driver, &self.shutdown, self.on_progress.as_ref())
                    .await
            }
            Source::CheapShark => {
                let driver = CheapSharkDriver::recent(self.db.clone(), Arc::clone(&self.transport))
                    .with_base_url(&self.endpoints.cheapshark);
                engine::run_incremental(&self.db, driver, &self.shutdown, self.on_progress.as_ref())
                    .await
            }
            // The Steam app list and Twitch top games carry no date
            // filters; their refresh story is the hot update.
            Source::Steam | Source::Twitch => Err(SyncError::Unsupported {
                src: source,
                sync_type: SyncType::Incremental,
            }),
        }
    }

    /// Run a source's hot-update profiles.
    pub async fn hot_update_sync(&self, source: Source) -> Result<SyncSummary, SyncError> {
        match source {
            Source::CheapShark => {
                let driver =
                    CheapSharkDriver::hot_update(self.db.clone(), Arc::clone(&self.transport))
                        .with_base_url(&self.endpoints.cheapshark);
                engine::run_hot_update(&self.db, driver, &self.shutdown, self.on_progress.as_ref())
                    .await
            }
            Source::Steam => {
                let driver =
                    SteamDriver::player_refresh(self.db.clone(), Arc::clone(&self.transport))
                        .with_base_urls(&self.endpoints.steam_api, &self.endpoints.steam_store);
                engine::run_hot_update(&self.db, driver, &self.shutdown, self.on_progress.as_ref())
                    .await
            }
            Source::Twitch => {
                let (id, secret) = self.twitch_credentials(source)?;
                let driver = TwitchDriver::hot_update(
                    self.db.clone(),
                    Arc::clone(&self.transport),
                    id.clone(),
                    secret.clone(),
                )
                .with_base_url(&self.endpoints.twitch)
                .with_token_url(&self.endpoints.oauth_token, id, secret);
                engine::run_hot_update(&self.db, driver, &self.shutdown, self.on_progress.as_ref())
                    .await
            }
            Source::Rawg | Source::Igdb => Err(SyncError::Unsupported {
                src: source,
                sync_type: SyncType::HotUpdate,
            }),
        }
    }

    /// Cursor position, completion estimate and last-success timestamps
    /// for one source.
    pub async fn sync_stats(&self, source: Source) -> Result<SyncStats, SyncError> {
        let cursor = checkpoint::latest_cursor(&self.db, source, SyncType::Historical).await?;

        let last = |sync_type| checkpoint::last_completed(&self.db, source, sync_type);
        let last_historical = last(SyncType::Historical).await?.and_then(|a| a.ended_at);
        let last_incremental = last(SyncType::Incremental).await?.and_then(|a| a.ended_at);
        let last_hot_update = last(SyncType::HotUpdate).await?.and_then(|a| a.ended_at);

        let (stored_records, collections) = match source {
            Source::Rawg => {
                let games = repository::rawg::count_games(&self.db).await?;
                (games, serde_json::json!({ "games": games }))
            }
            Source::Igdb => {
                let games = repository::igdb::count_games(&self.db).await?;
                (games, serde_json::json!({ "games": games }))
            }
            Source::CheapShark => {
                let deals = repository::shark::count_deals(&self.db).await?;
                let active = repository::shark::count_active_deals(&self.db).await?;
                let games = repository::shark::count_games(&self.db).await?;
                let stores = repository::shark::count_stores(&self.db).await?;
                (
                    deals,
                    serde_json::json!({
                        "deals": deals,
                        "active_deals": active,
                        "games": games,
                        "stores": stores,
                    }),
                )
            }
            Source::Steam => {
                let apps = repository::steam::count_apps(&self.db).await?;
                let games = repository::steam::count_games(&self.db).await?;
                (apps, serde_json::json!({ "apps": apps, "games": games }))
            }
            Source::Twitch => {
                let games = repository::twitch::count_games(&self.db).await?;
                let streams = repository::twitch::count_streams(&self.db).await?;
                let clips = repository::twitch::count_clips(&self.db).await?;
                (
                    games,
                    serde_json::json!({
                        "games": games,
                        "streams": streams,
                        "clips": clips,
                    }),
                )
            }
        };

        let total_estimate = match source {
            Source::Rawg => Some(RAWG_TOTAL_ESTIMATE),
            Source::Igdb => Some(IGDB_TOTAL_ESTIMATE),
            _ => None,
        };
        let percent_complete = total_estimate
            .map(|total| ((stored_records as f64 / total as f64) * 100.0 * 100.0).round() / 100.0);

        Ok(SyncStats {
            source,
            cursor,
            stored_records,
            total_estimate,
            percent_complete,
            last_historical,
            last_incremental,
            last_hot_update,
            collections,
        })
    }

    /// Recent attempts for a source, newest first (the audit trail).
    pub async fn attempt_history(
        &self,
        source: Source,
        limit: u64,
    ) -> Result<Vec<crate::entity::sync_attempt::Model>, SyncError> {
        checkpoint::history(&self.db, source, limit)
            .await
            .map_err(Into::into)
    }

    async fn run_historical<D: crate::source::SourceDriver>(
        &self,
        driver: D,
    ) -> Result<SyncSummary, SyncError> {
        engine::run_historical(&self.db, driver, &self.shutdown, self.on_progress.as_ref()).await
    }

    /// Start of the RAWG new-release window: the start date of the last
    /// completed incremental pass, or the configured fallback.
    async fn rawg_window_start(&self) -> Result<NaiveDate, SyncError> {
        let last =
            checkpoint::last_completed(&self.db, Source::Rawg, SyncType::Incremental).await?;
        Ok(last
            .map(|attempt| attempt.started_at.date_naive())
            .unwrap_or_else(|| {
                let (y, m, d) = RAWG_WINDOW_FALLBACK;
                NaiveDate::from_ymd_opt(y, m, d).expect("fallback date is valid")
            }))
    }

    fn rawg_key(&self, source: Source) -> Result<String, SyncError> {
        self.credentials
            .rawg_api_key
            .clone()
            .ok_or(SyncError::MissingCredentials { src: source })
    }

    fn igdb_credentials(&self, source: Source) -> Result<(String, String), SyncError> {
        match (
            self.credentials.igdb_client_id.clone(),
            self.credentials.igdb_client_secret.clone(),
        ) {
            (Some(id), Some(secret)) => Ok((id, secret)),
            _ => Err(SyncError::MissingCredentials { src: source }),
        }
    }

    fn twitch_credentials(&self, source: Source) -> Result<(String, String), SyncError> {
        match (
            self.credentials.twitch_client_id.clone(),
            self.credentials.twitch_client_secret.clone(),
        ) {
            (Some(id), Some(secret)) => Ok((id, secret)),
            _ => Err(SyncError::MissingCredentials { src: source }),
        }
    }
}
