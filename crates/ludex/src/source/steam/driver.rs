//! Steam sync driver.

use std::sync::Arc;

use async_trait::async_trait;
use sea_orm::DatabaseConnection;

use crate::fetch::Fetcher;
use crate::http::{HttpRequest, HttpTransport, url_with_params};
use crate::repository;
use crate::source::{
    DriverError, PageOutcome, PageStats, Source, SourceDriver, SourceLimits, SyncType,
};

use super::convert;
use super::types::{
    AppDetailsEnvelope, AppDetailsRaw, AppEntry, PlayerCountResponse, QuerySummary,
    ReviewsResponse,
};
use super::{STEAM_API_BASE_URL, STEAM_STORE_BASE_URL};

/// Games refreshed per hot-update pass, stalest first.
const QUICK_REFRESH_LIMIT: u64 = 500;

enum Mode {
    /// Store detail for every app id not yet in storage.
    Full { pending: Vec<AppEntry> },
    /// Player-count refresh over the stalest stored games.
    PlayerRefresh { pending: Vec<i64> },
}

/// Driver for the Steam Web + storefront APIs.
///
/// Resumption is storage-derived, not cursor-derived: `prepare` subtracts
/// the app ids already stored from the fresh app list, so an interrupted
/// run picks up exactly the ids it has not written yet. The checkpoint
/// cursor still advances per batch for the audit trail.
pub struct SteamDriver {
    db: DatabaseConnection,
    fetcher: Fetcher,
    api_base: String,
    store_base: String,
    limits: SourceLimits,
    mode: Mode,
    skipped_existing: u64,
}

impl SteamDriver {
    /// Full catalog sync.
    pub fn full(db: DatabaseConnection, transport: Arc<dyn HttpTransport>) -> Self {
        Self::build(db, transport, Mode::Full { pending: Vec::new() })
    }

    /// Player-count refresh for the stalest stored games.
    pub fn player_refresh(db: DatabaseConnection, transport: Arc<dyn HttpTransport>) -> Self {
        Self::build(db, transport, Mode::PlayerRefresh { pending: Vec::new() })
    }

    fn build(db: DatabaseConnection, transport: Arc<dyn HttpTransport>, mode: Mode) -> Self {
        let limits = SourceLimits::historical_defaults(Source::Steam);
        Self {
            db,
            fetcher: Fetcher::new(transport, limits.request_spacing_ms),
            api_base: STEAM_API_BASE_URL.to_string(),
            store_base: STEAM_STORE_BASE_URL.to_string(),
            limits,
            mode,
            skipped_existing: 0,
        }
    }

    /// Point the driver at different API hosts (tests).
    #[must_use]
    pub fn with_base_urls(
        mut self,
        api_base: impl Into<String>,
        store_base: impl Into<String>,
    ) -> Self {
        self.api_base = api_base.into();
        self.store_base = store_base.into();
        self
    }

    /// Fetch store detail for one app. `None` means the store has no
    /// sellable entry for this id (success=false), which is common and
    /// not an error.
    async fn fetch_details(&self, app_id: i64) -> Result<Option<AppDetailsRaw>, DriverError> {
        let url = url_with_params(
            &format!("{}/appdetails", self.store_base),
            &[("appids", app_id.to_string())],
        );
        let envelope: AppDetailsEnvelope = self
            .fetcher
            .execute_json(HttpRequest::get(url), None)
            .await
            .map_err(DriverError::from_fetch)?;

        Ok(envelope
            .get(&app_id.to_string())
            .filter(|entry| entry.success)
            .and_then(|entry| entry.data.clone()))
    }

    /// Current player count; failures degrade to `None`.
    async fn fetch_player_count(&self, app_id: i64) -> Option<i32> {
        let url = url_with_params(
            &format!(
                "{}/ISteamUserStats/GetNumberOfCurrentPlayers/v1/",
                self.api_base
            ),
            &[("appid", app_id.to_string())],
        );
        match self
            .fetcher
            .execute_json::<PlayerCountResponse>(HttpRequest::get(url), None)
            .await
        {
            Ok(resp) => resp.response.player_count.map(|c| c as i32),
            Err(err) => {
                tracing::debug!(app_id, error = %err, "player count unavailable");
                None
            }
        }
    }

    /// Review summary; failures degrade to `None`.
    async fn fetch_review_summary(&self, app_id: i64) -> Option<QuerySummary> {
        let url = url_with_params(
            &format!("{}/appreviews/{app_id}", self.store_base),
            &[
                ("json", "1".to_string()),
                ("language", "all".to_string()),
                ("purchase_type", "all".to_string()),
                ("num_per_page", "0".to_string()),
            ],
        );
        match self
            .fetcher
            .execute_json::<ReviewsResponse>(HttpRequest::get(url), None)
            .await
        {
            Ok(resp) => resp.query_summary,
            Err(err) => {
                tracing::debug!(app_id, error = %err, "review summary unavailable");
                None
            }
        }
    }

    /// Process one app end to end. Returns true if a row was written.
    async fn process_app(&self, app_id: i64) -> Result<bool, DriverError> {
        let Some(details) = self.fetch_details(app_id).await? else {
            return Ok(false);
        };

        let is_game = details.app_type.as_deref() == Some("game");

        // The two supplementary calls are independent of each other; issue
        // them together and let the pacer space them. Either failing
        // degrades to a null column, never to a failed app.
        let (player_count, reviews) = if is_game {
            tokio::join!(
                self.fetch_player_count(app_id),
                self.fetch_review_summary(app_id)
            )
        } else {
            (None, None)
        };

        repository::steam::upsert_app(
            &self.db,
            convert::details_to_model(app_id, details, player_count, reviews.as_ref()),
        )
        .await?;

        if let Some(count) = player_count {
            if count > 0 {
                repository::steam::record_player_snapshot(&self.db, app_id, count).await?;
            }
        }

        Ok(true)
    }
}

#[async_trait]
impl SourceDriver for SteamDriver {
    fn source(&self) -> Source {
        Source::Steam
    }

    fn sync_type(&self) -> SyncType {
        match self.mode {
            Mode::Full { .. } => SyncType::Historical,
            Mode::PlayerRefresh { .. } => SyncType::HotUpdate,
        }
    }

    fn limits(&self) -> &SourceLimits {
        &self.limits
    }

    fn resume_from_checkpoint(&self) -> bool {
        false
    }

    async fn prepare(&mut self) -> Result<(), DriverError> {
        match &mut self.mode {
            Mode::Full { pending } => {
                let url = format!("{}/ISteamApps/GetAppList/v2/", self.api_base);
                let listing: super::types::AppListResponse = self
                    .fetcher
                    .execute_json(HttpRequest::get(url), None)
                    .await
                    .map_err(DriverError::from_fetch)?;

                let existing = repository::steam::existing_app_ids(&self.db).await?;
                let total = listing.applist.apps.len();

                *pending = listing
                    .applist
                    .apps
                    .into_iter()
                    .filter(|app| !existing.contains(&app.appid))
                    .collect();
                self.skipped_existing = (total - pending.len()) as u64;

                tracing::info!(
                    total,
                    already_stored = existing.len(),
                    remaining = pending.len(),
                    "steam app list fetched"
                );
            }
            Mode::PlayerRefresh { pending } => {
                *pending =
                    repository::steam::stalest_game_ids(&self.db, QUICK_REFRESH_LIMIT).await?;
                tracing::info!(games = pending.len(), "refreshing steam player counts");
            }
        }
        Ok(())
    }

    async fn fetch_page(&mut self, cursor: i64) -> Result<PageOutcome, DriverError> {
        let batch_size = self.limits.page_size as usize;
        let start = cursor as usize * batch_size;

        match &self.mode {
            Mode::Full { pending } => {
                if start >= pending.len() {
                    return Ok(PageOutcome::Exhausted);
                }
                let batch: Vec<AppEntry> =
                    pending[start..(start + batch_size).min(pending.len())].to_vec();

                let mut stats = PageStats {
                    next_cursor: cursor + 1,
                    ..Default::default()
                };
                for app in batch {
                    stats.processed += 1;
                    // Per-app failures never abort the batch.
                    match self.process_app(app.appid).await {
                        Ok(true) => stats.added += 1,
                        Ok(false) => {}
                        Err(err) => {
                            stats.record_errors += 1;
                            tracing::warn!(app_id = app.appid, error = %err, "failed to process steam app");
                        }
                    }
                }
                Ok(PageOutcome::Page(stats))
            }
            Mode::PlayerRefresh { pending } => {
                if start >= pending.len() {
                    return Ok(PageOutcome::Exhausted);
                }
                let batch: Vec<i64> =
                    pending[start..(start + batch_size).min(pending.len())].to_vec();

                let mut stats = PageStats {
                    next_cursor: cursor + 1,
                    ..Default::default()
                };
                for app_id in batch {
                    stats.processed += 1;
                    let Some(count) = self.fetch_player_count(app_id).await else {
                        continue;
                    };
                    if count <= 0 {
                        continue;
                    }

                    let write = async {
                        repository::steam::upsert_app(
                            &self.db,
                            convert::quick_refresh_model(app_id, count),
                        )
                        .await?;
                        repository::steam::record_player_snapshot(&self.db, app_id, count).await
                    };
                    match write.await {
                        Ok(()) => stats.added += 1,
                        Err(err) => {
                            stats.record_errors += 1;
                            tracing::warn!(app_id, error = %err, "failed to record player count");
                        }
                    }
                }
                Ok(PageOutcome::Page(stats))
            }
        }
    }

    fn metadata(&self) -> serde_json::Value {
        serde_json::json!({
            "skipped_existing": self.skipped_existing,
        })
    }
}

#[cfg(all(test, feature = "migrate"))]
mod tests {
    use super::*;
    use crate::db::connect_and_migrate;
    use crate::entity::prelude::SteamApp;
    use crate::http::{HttpMethod, MockTransport};
    use sea_orm::EntityTrait;

    const API: &str = "https://steamapi.test";
    const STORE: &str = "https://steamstore.test/api";

    fn applist_url() -> String {
        format!("{API}/ISteamApps/GetAppList/v2/")
    }

    fn details_url(app_id: i64) -> String {
        format!("{STORE}/appdetails?appids={app_id}")
    }

    fn players_url(app_id: i64) -> String {
        format!("{API}/ISteamUserStats/GetNumberOfCurrentPlayers/v1/?appid={app_id}")
    }

    fn reviews_url(app_id: i64) -> String {
        format!("{STORE}/appreviews/{app_id}?json=1&language=all&purchase_type=all&num_per_page=0")
    }

    async fn full_driver(transport: &MockTransport) -> (SteamDriver, DatabaseConnection) {
        let db = connect_and_migrate("sqlite::memory:").await.unwrap();
        let driver = SteamDriver::full(db.clone(), Arc::new(transport.clone()))
            .with_base_urls(API, STORE);
        (driver, db)
    }

    #[tokio::test]
    async fn prepare_filters_out_already_stored_apps() {
        let transport = MockTransport::new();
        let (mut driver, db) = full_driver(&transport).await;

        // Pre-store app 10.
        repository::steam::upsert_app(
            &db,
            convert::details_to_model(
                10,
                serde_json::from_value(serde_json::json!({"name":"Old","type":"demo"})).unwrap(),
                None,
                None,
            ),
        )
        .await
        .unwrap();

        transport.push_json(
            HttpMethod::Get,
            applist_url(),
            r#"{"applist":{"apps":[{"appid":10,"name":"Old"},{"appid":20,"name":"New"}]}}"#,
        );

        driver.prepare().await.unwrap();
        match &driver.mode {
            Mode::Full { pending } => {
                assert_eq!(pending.len(), 1);
                assert_eq!(pending[0].appid, 20);
            }
            _ => unreachable!(),
        }
        assert_eq!(driver.metadata()["skipped_existing"], 1);
    }

    #[tokio::test]
    async fn games_get_supplementary_data_and_snapshots() {
        let transport = MockTransport::new();
        let (mut driver, db) = full_driver(&transport).await;

        transport.push_json(
            HttpMethod::Get,
            applist_url(),
            r#"{"applist":{"apps":[{"appid":570,"name":"Dota 2"},{"appid":571,"name":"Artbook"}]}}"#,
        );
        transport.push_json(
            HttpMethod::Get,
            details_url(570),
            r#"{"570":{"success":true,"data":{"name":"Dota 2","type":"game","is_free":true}}}"#,
        );
        transport.push_json(
            HttpMethod::Get,
            players_url(570),
            r#"{"response":{"player_count":401234,"result":1}}"#,
        );
        transport.push_json(
            HttpMethod::Get,
            reviews_url(570),
            r#"{"query_summary":{"total_positive":100,"total_negative":10,"total_reviews":110,"review_score":8,"review_score_desc":"Very Positive"}}"#,
        );
        transport.push_json(
            HttpMethod::Get,
            details_url(571),
            r#"{"571":{"success":true,"data":{"name":"Artbook","type":"dlc"}}}"#,
        );

        driver.prepare().await.unwrap();
        match driver.fetch_page(0).await.unwrap() {
            PageOutcome::Page(stats) => {
                assert_eq!(stats.processed, 2);
                assert_eq!(stats.added, 2);
            }
            other => panic!("unexpected outcome: {other:?}"),
        }

        let game = SteamApp::find_by_id(570).one(&db).await.unwrap().unwrap();
        assert_eq!(game.current_players, Some(401_234));
        assert_eq!(game.review_score_desc.as_deref(), Some("Very Positive"));

        // The DLC got no supplementary calls and null supplementary data.
        let dlc = SteamApp::find_by_id(571).one(&db).await.unwrap().unwrap();
        assert_eq!(dlc.current_players, None);
        assert_eq!(dlc.review_score, None);
        assert_eq!(transport.request_count_with_prefix(&players_url(571)), 0);

        // Second page: exhausted.
        assert!(matches!(
            driver.fetch_page(1).await.unwrap(),
            PageOutcome::Exhausted
        ));
    }

    #[tokio::test]
    async fn per_app_failures_do_not_abort_the_batch() {
        let transport = MockTransport::new();
        let (mut driver, db) = full_driver(&transport).await;

        transport.push_json(
            HttpMethod::Get,
            applist_url(),
            r#"{"applist":{"apps":[{"appid":1,"name":"Broken"},{"appid":2,"name":"Fine"}]}}"#,
        );
        transport.push_status(HttpMethod::Get, details_url(1), 500);
        transport.push_json(
            HttpMethod::Get,
            details_url(2),
            r#"{"2":{"success":true,"data":{"name":"Fine","type":"demo"}}}"#,
        );

        driver.prepare().await.unwrap();
        match driver.fetch_page(0).await.unwrap() {
            PageOutcome::Page(stats) => {
                assert_eq!(stats.processed, 2);
                assert_eq!(stats.added, 1);
                assert_eq!(stats.record_errors, 1);
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
        assert_eq!(repository::steam::count_apps(&db).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn unsuccessful_store_entries_are_skipped_quietly() {
        let transport = MockTransport::new();
        let (mut driver, db) = full_driver(&transport).await;

        transport.push_json(
            HttpMethod::Get,
            applist_url(),
            r#"{"applist":{"apps":[{"appid":9,"name":"Delisted"}]}}"#,
        );
        transport.push_json(
            HttpMethod::Get,
            details_url(9),
            r#"{"9":{"success":false}}"#,
        );

        driver.prepare().await.unwrap();
        match driver.fetch_page(0).await.unwrap() {
            PageOutcome::Page(stats) => {
                assert_eq!(stats.processed, 1);
                assert_eq!(stats.added, 0);
                assert_eq!(stats.record_errors, 0);
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
        assert_eq!(repository::steam::count_apps(&db).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn player_refresh_updates_only_player_columns() {
        let transport = MockTransport::new();
        let db = connect_and_migrate("sqlite::memory:").await.unwrap();

        repository::steam::upsert_app(
            &db,
            convert::details_to_model(
                440,
                serde_json::from_value(
                    serde_json::json!({"name":"Team Fortress 2","type":"game"}),
                )
                .unwrap(),
                Some(100),
                None,
            ),
        )
        .await
        .unwrap();

        let mut driver = SteamDriver::player_refresh(db.clone(), Arc::new(transport.clone()))
            .with_base_urls(API, STORE);
        assert_eq!(driver.sync_type(), SyncType::HotUpdate);

        transport.push_json(
            HttpMethod::Get,
            players_url(440),
            r#"{"response":{"player_count":55000}}"#,
        );

        driver.prepare().await.unwrap();
        match driver.fetch_page(0).await.unwrap() {
            PageOutcome::Page(stats) => assert_eq!(stats.added, 1),
            other => panic!("unexpected outcome: {other:?}"),
        }

        let app = SteamApp::find_by_id(440).one(&db).await.unwrap().unwrap();
        assert_eq!(app.current_players, Some(55_000));
        assert_eq!(app.name, "Team Fortress 2");
        assert!(app.last_quick_update.is_some());
    }
}
