//! CheapShark sync driver.

use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use sea_orm::DatabaseConnection;

use crate::fetch::Fetcher;
use crate::http::{HttpRequest, HttpTransport, url_with_params};
use crate::repository;
use crate::source::{
    DriverError, PageOutcome, PageStats, RunCounters, Source, SourceDriver, SourceLimits, SyncType,
};

use super::CHEAPSHARK_BASE_URL;
use super::convert;
use super::types::{DealRaw, GameDetailRaw, StoreRaw};

/// Pages of the savings-sorted trailing sweep in a full sync.
const SAVINGS_SWEEP_MAX_PAGES: u64 = 50;

/// The fixed hot-update query profiles, refreshed once each per pass.
fn hot_profiles() -> Vec<(&'static str, Vec<(&'static str, String)>)> {
    vec![
        (
            "on-sale-aaa-savings",
            vec![
                ("sortBy", "Savings".to_string()),
                ("desc", "1".to_string()),
                ("onSale", "1".to_string()),
                ("AAA", "1".to_string()),
            ],
        ),
        (
            "top-rated-deals",
            vec![
                ("sortBy", "Deal Rating".to_string()),
                ("desc", "1".to_string()),
                ("metacritic", "70".to_string()),
            ],
        ),
        (
            "recent-well-reviewed",
            vec![
                ("sortBy", "Recent".to_string()),
                ("steamRating", "75".to_string()),
            ],
        ),
        (
            "under-five",
            vec![
                ("sortBy", "Price".to_string()),
                ("upperPrice", "5".to_string()),
            ],
        ),
        (
            "metacritic-on-sale",
            vec![
                ("sortBy", "Metacritic".to_string()),
                ("lowerPrice", "0".to_string()),
                ("onSale", "1".to_string()),
            ],
        ),
    ]
}

enum Mode {
    /// Deals sweep + game-detail backfill + savings sweep.
    Full,
    /// Recent deals only, bounded to a few pages.
    Recent,
    /// The fixed hot profiles, one call each.
    HotProfiles,
}

/// Driver for the CheapShark deals and games endpoints.
pub struct CheapSharkDriver {
    db: DatabaseConnection,
    fetcher: Fetcher,
    base_url: String,
    limits: SourceLimits,
    mode: Mode,
    /// Unique game ids derived from the deals swept in this run.
    game_ids: HashSet<String>,
    games_saved: u64,
    detail_errors: u64,
    savings_pages: u64,
}

impl CheapSharkDriver {
    /// Full two-phase sync.
    pub fn full(db: DatabaseConnection, transport: Arc<dyn HttpTransport>) -> Self {
        Self::build(
            db,
            transport,
            SourceLimits::historical_defaults(Source::CheapShark),
            Mode::Full,
        )
    }

    /// Recent deals catch-up.
    pub fn recent(db: DatabaseConnection, transport: Arc<dyn HttpTransport>) -> Self {
        Self::build(
            db,
            transport,
            SourceLimits::incremental_defaults(Source::CheapShark),
            Mode::Recent,
        )
    }

    /// Hot-deal profile refresh.
    pub fn hot_update(db: DatabaseConnection, transport: Arc<dyn HttpTransport>) -> Self {
        let mut limits = SourceLimits::historical_defaults(Source::CheapShark);
        limits.max_pages = None;
        Self::build(db, transport, limits, Mode::HotProfiles)
    }

    fn build(
        db: DatabaseConnection,
        transport: Arc<dyn HttpTransport>,
        limits: SourceLimits,
        mode: Mode,
    ) -> Self {
        Self {
            db,
            fetcher: Fetcher::new(transport, limits.request_spacing_ms),
            base_url: CHEAPSHARK_BASE_URL.to_string(),
            limits,
            mode,
            game_ids: HashSet::new(),
            games_saved: 0,
            detail_errors: 0,
            savings_pages: 0,
        }
    }

    /// Point the driver at a different API host (tests).
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn deals_url(&self, params: &[(&str, String)]) -> String {
        url_with_params(&format!("{}/deals", self.base_url), params)
    }

    /// Fetch one deals listing page and upsert every deal on it.
    async fn sweep_deals_page(
        &mut self,
        params: &[(&str, String)],
        collect_game_ids: bool,
    ) -> Result<Option<PageStats>, DriverError> {
        let request = HttpRequest::get(self.deals_url(params));
        let deals: Vec<DealRaw> = self
            .fetcher
            .execute_json(request, None)
            .await
            .map_err(DriverError::from_fetch)?;

        if deals.is_empty() {
            return Ok(None);
        }

        let mut stats = PageStats::default();
        for deal in deals {
            stats.processed += 1;
            if collect_game_ids {
                if let Some(game_id) = &deal.game_id {
                    self.game_ids.insert(game_id.clone());
                }
            }

            match convert::deal_to_model(deal, None, None) {
                Some(model) => match repository::shark::upsert_deal(&self.db, model).await {
                    Ok(_) => stats.added += 1,
                    Err(err) => {
                        stats.record_errors += 1;
                        tracing::warn!(error = %err, "failed to save deal");
                    }
                },
                None => {
                    stats.record_errors += 1;
                    tracing::warn!("deal had no derivable key, skipped");
                }
            }
        }

        Ok(Some(stats))
    }

    /// Phase two: fetch complete per-game detail for every unique id seen
    /// during the deals sweep.
    async fn backfill_game_details(&mut self, counters: &mut RunCounters) -> Result<(), DriverError> {
        let mut ids: Vec<String> = self.game_ids.iter().cloned().collect();
        ids.sort();

        tracing::info!(games = ids.len(), "backfilling per-game detail");

        for game_id in ids {
            let url = url_with_params(
                &format!("{}/games", self.base_url),
                &[("id", game_id.clone())],
            );
            counters.calls_used += 1;

            let detail: GameDetailRaw =
                match self.fetcher.execute_json(HttpRequest::get(url), None).await {
                    Ok(detail) => detail,
                    Err(err) => {
                        // Per-game failures never abort the backfill.
                        self.detail_errors += 1;
                        counters.record_errors += 1;
                        tracing::warn!(game_id = %game_id, error = %err, "failed to fetch game detail");
                        continue;
                    }
                };

            counters.processed += 1;
            match repository::shark::upsert_game(
                &self.db,
                convert::game_detail_to_model(&game_id, &detail),
            )
            .await
            {
                Ok(_) => {
                    counters.added += 1;
                    self.games_saved += 1;
                }
                Err(err) => {
                    self.detail_errors += 1;
                    counters.record_errors += 1;
                    tracing::warn!(game_id = %game_id, error = %err, "failed to save game detail");
                    continue;
                }
            }

            let title = detail.info.as_ref().and_then(|i| i.title.clone());
            for deal in detail.deals.into_iter().flatten() {
                counters.processed += 1;
                let Some(model) = convert::deal_to_model(deal, Some(&game_id), title.as_deref())
                else {
                    counters.record_errors += 1;
                    continue;
                };
                match repository::shark::upsert_deal(&self.db, model).await {
                    Ok(_) => counters.added += 1,
                    Err(err) => {
                        counters.record_errors += 1;
                        tracing::warn!(game_id = %game_id, error = %err, "failed to save embedded deal");
                    }
                }
            }
        }

        Ok(())
    }

    /// Trailing bounded sweep sorted by savings, capturing historical
    /// best deals the rating-sorted sweep may have ordered out of reach.
    async fn savings_sweep(&mut self, counters: &mut RunCounters) {
        for page in 0..SAVINGS_SWEEP_MAX_PAGES {
            let params = [
                ("pageNumber", page.to_string()),
                ("pageSize", self.limits.page_size.to_string()),
                ("sortBy", "Savings".to_string()),
                ("desc", "1".to_string()),
            ];
            counters.calls_used += 1;
            match self.sweep_deals_page(&params, false).await {
                Ok(Some(stats)) => {
                    self.savings_pages += 1;
                    counters.processed += stats.processed;
                    counters.added += stats.added;
                    counters.record_errors += stats.record_errors;
                }
                Ok(None) => break,
                Err(err) => {
                    tracing::warn!(page, error = %err, "savings sweep stopped early");
                    break;
                }
            }
        }
    }
}

#[async_trait]
impl SourceDriver for CheapSharkDriver {
    fn source(&self) -> Source {
        Source::CheapShark
    }

    fn sync_type(&self) -> SyncType {
        match self.mode {
            Mode::Full => SyncType::Historical,
            Mode::Recent => SyncType::Incremental,
            Mode::HotProfiles => SyncType::HotUpdate,
        }
    }

    fn limits(&self) -> &SourceLimits {
        &self.limits
    }

    fn resume_from_checkpoint(&self) -> bool {
        matches!(self.mode, Mode::Full)
    }

    async fn prepare(&mut self) -> Result<(), DriverError> {
        if !matches!(self.mode, Mode::Full) {
            return Ok(());
        }

        // Refresh the storefront catalog once per full sync. A failure
        // here degrades to stale store rows, not a failed attempt.
        let url = format!("{}/stores", self.base_url);
        match self
            .fetcher
            .execute_json::<Vec<StoreRaw>>(HttpRequest::get(url), None)
            .await
        {
            Ok(stores) => {
                tracing::info!(stores = stores.len(), "refreshing storefronts");
                for store in stores {
                    let store_id = store.store_id.clone();
                    if let Err(err) =
                        repository::shark::upsert_store(&self.db, convert::store_to_model(store))
                            .await
                    {
                        tracing::warn!(store_id = %store_id, error = %err, "failed to save store");
                    }
                }
            }
            Err(err) => {
                tracing::warn!(error = %err, "storefront refresh failed, continuing with stale stores");
            }
        }

        Ok(())
    }

    async fn fetch_page(&mut self, cursor: i64) -> Result<PageOutcome, DriverError> {
        match self.mode {
            Mode::Full | Mode::Recent => {
                let sort = match self.mode {
                    Mode::Full => "Deal Rating",
                    _ => "Recent",
                };
                let params = [
                    ("pageNumber", cursor.to_string()),
                    ("pageSize", self.limits.page_size.to_string()),
                    ("sortBy", sort.to_string()),
                ];
                let collect = matches!(self.mode, Mode::Full);
                match self.sweep_deals_page(&params, collect).await? {
                    Some(mut stats) => {
                        stats.next_cursor = cursor + 1;
                        Ok(PageOutcome::Page(stats))
                    }
                    None => Ok(PageOutcome::Exhausted),
                }
            }
            Mode::HotProfiles => {
                let profiles = hot_profiles();
                let Some((name, profile_params)) = profiles.into_iter().nth(cursor as usize)
                else {
                    return Ok(PageOutcome::Exhausted);
                };

                let mut params = profile_params;
                params.push(("pageSize", self.limits.page_size.to_string()));
                params.push(("pageNumber", "0".to_string()));

                tracing::debug!(profile = name, "refreshing hot profile");
                match self.sweep_deals_page(&params, false).await? {
                    Some(mut stats) => {
                        stats.next_cursor = cursor + 1;
                        Ok(PageOutcome::Page(stats))
                    }
                    None => Ok(PageOutcome::Page(PageStats {
                        next_cursor: cursor + 1,
                        ..Default::default()
                    })),
                }
            }
        }
    }

    async fn finalize(&mut self, counters: &mut RunCounters) -> Result<(), DriverError> {
        if !matches!(self.mode, Mode::Full) {
            return Ok(());
        }

        self.backfill_game_details(counters).await?;
        self.savings_sweep(counters).await;
        Ok(())
    }

    fn metadata(&self) -> serde_json::Value {
        serde_json::json!({
            "unique_games": self.game_ids.len(),
            "games_saved": self.games_saved,
            "detail_errors": self.detail_errors,
            "savings_pages": self.savings_pages,
        })
    }
}

#[cfg(all(test, feature = "migrate"))]
mod tests {
    use super::*;
    use crate::db::connect_and_migrate;
    use crate::http::{HttpMethod, MockTransport};
    use sea_orm::EntityTrait;

    const BASE: &str = "https://shark.test/api/1.0";

    fn deals_url(page: i64, sort: &str) -> String {
        let sort = sort.replace(' ', "%20");
        format!("{BASE}/deals?pageNumber={page}&pageSize=60&sortBy={sort}")
    }

    fn savings_url(page: u64) -> String {
        format!("{BASE}/deals?pageNumber={page}&pageSize=60&sortBy=Savings&desc=1")
    }

    fn game_url(id: &str) -> String {
        format!("{BASE}/games?id={id}")
    }

    async fn full_driver(transport: &MockTransport) -> (CheapSharkDriver, DatabaseConnection) {
        let db = connect_and_migrate("sqlite::memory:").await.unwrap();
        let driver =
            CheapSharkDriver::full(db.clone(), Arc::new(transport.clone())).with_base_url(BASE);
        (driver, db)
    }

    #[tokio::test]
    async fn prepare_refreshes_storefronts() {
        let transport = MockTransport::new();
        transport.push_json(
            HttpMethod::Get,
            format!("{BASE}/stores"),
            r#"[
                {"storeID":"1","storeName":"Steam","isActive":1,"images":{"banner":"/b.png","logo":"/l.png","icon":"/i.png"}},
                {"storeID":"2","storeName":"GOG","isActive":"0"}
            ]"#,
        );

        let (mut driver, db) = full_driver(&transport).await;
        driver.prepare().await.unwrap();

        assert_eq!(repository::shark::count_stores(&db).await.unwrap(), 2);
        let steam = crate::entity::prelude::SharkStore::find_by_id("1")
            .one(&db)
            .await
            .unwrap()
            .unwrap();
        assert!(steam.is_active);
        let gog = crate::entity::prelude::SharkStore::find_by_id("2")
            .one(&db)
            .await
            .unwrap()
            .unwrap();
        assert!(!gog.is_active);
    }

    #[tokio::test]
    async fn prepare_survives_store_endpoint_failure() {
        let transport = MockTransport::new();
        transport.push_status(HttpMethod::Get, format!("{BASE}/stores"), 500);

        let (mut driver, _db) = full_driver(&transport).await;
        driver.prepare().await.unwrap();
    }

    // The end-to-end full sync scenario: two pages of deals (page size
    // 60, 2 deals each) referencing three distinct games, then an empty
    // page. The sweep must make exactly 3 deal-list calls, derive a
    // 3-element game-id set, make exactly 3 detail calls, and produce 3
    // game rows and at most 4 deal rows with no duplicates across the
    // two phases.
    #[tokio::test]
    async fn full_sync_two_phase_scenario() {
        let transport = MockTransport::new();
        let (mut driver, db) = full_driver(&transport).await;

        transport.push_json(
            HttpMethod::Get,
            deals_url(0, "Deal Rating"),
            r#"[
                {"dealID":"d1","gameID":"100","storeID":"1","title":"Alpha","salePrice":"4.99","normalPrice":"9.99","isOnSale":"1"},
                {"dealID":"d2","gameID":"200","storeID":"2","title":"Beta","salePrice":"9.99","normalPrice":"19.99","isOnSale":"0"}
            ]"#,
        );
        transport.push_json(
            HttpMethod::Get,
            deals_url(1, "Deal Rating"),
            r#"[
                {"dealID":"d3","gameID":"300","storeID":"1","title":"Gamma","salePrice":"14.99","normalPrice":"29.99","isOnSale":"1"},
                {"dealID":"d1","gameID":"100","storeID":"1","title":"Alpha","salePrice":"4.99","normalPrice":"9.99","isOnSale":"1"}
            ]"#,
        );
        transport.push_json(HttpMethod::Get, deals_url(2, "Deal Rating"), "[]");

        // Detail payloads: game 100's detail re-sends the d1 deal in
        // embedded form, carrying its dealID as the live API does.
        transport.push_json(
            HttpMethod::Get,
            game_url("100"),
            r#"{
                "info": {"title": "Alpha", "steamAppID": "111"},
                "cheapestPriceEver": {"price": "2.49", "date": 1600000000, "dealID": "d1"},
                "deals": [{"dealID": "d1", "storeID": "1", "price": "4.99", "retailPrice": "9.99"}]
            }"#,
        );
        transport.push_json(
            HttpMethod::Get,
            game_url("200"),
            r#"{"info": {"title": "Beta"}, "cheapestPriceEver": {"price": "7.99"}, "deals": []}"#,
        );
        transport.push_json(
            HttpMethod::Get,
            game_url("300"),
            r#"{"info": {"title": "Gamma"}, "deals": [{"storeID": "1", "price": "14.99"}]}"#,
        );

        // Savings sweep finds nothing new.
        transport.push_json(HttpMethod::Get, savings_url(0), "[]");

        // Drive the page loop the way the orchestrator would.
        let mut cursor = 0;
        let mut pages = 0;
        loop {
            match driver.fetch_page(cursor).await.unwrap() {
                PageOutcome::Page(stats) => {
                    cursor = stats.next_cursor;
                    pages += 1;
                }
                PageOutcome::Exhausted => break,
                other => panic!("unexpected outcome: {other:?}"),
            }
        }
        assert_eq!(pages, 2);
        assert_eq!(driver.game_ids.len(), 3);

        let mut counters = RunCounters::default();
        driver.finalize(&mut counters).await.unwrap();

        // Exactly 3 deal-list calls in the rating-sorted sweep.
        let list_calls = transport
            .requests()
            .iter()
            .filter(|r| r.url.contains("sortBy=Deal%20Rating"))
            .count();
        assert_eq!(list_calls, 3);

        // Exactly 3 per-game detail calls.
        let detail_calls = transport.request_count_with_prefix(&format!("{BASE}/games?id="));
        assert_eq!(detail_calls, 3);

        assert_eq!(repository::shark::count_games(&db).await.unwrap(), 3);

        // d1/d2/d3 from the listing plus one fallback-keyed embedded
        // deal for game 300. Re-delivery of d1 across both phases lands
        // on the existing row.
        assert_eq!(repository::shark::count_deals(&db).await.unwrap(), 4);

        let meta = driver.metadata();
        assert_eq!(meta["unique_games"], 3);
        assert_eq!(meta["games_saved"], 3);
    }

    #[tokio::test]
    async fn redelivered_deal_is_not_duplicated() {
        let transport = MockTransport::new();
        let (mut driver, db) = full_driver(&transport).await;

        let body = r#"[{"dealID":"d1","gameID":"100","storeID":"1","title":"Alpha","salePrice":"4.99","normalPrice":"9.99"}]"#;
        transport.push_json(HttpMethod::Get, deals_url(0, "Deal Rating"), body);
        transport.push_json(HttpMethod::Get, deals_url(0, "Deal Rating"), body);

        driver.fetch_page(0).await.unwrap();
        driver.fetch_page(0).await.unwrap();

        assert_eq!(repository::shark::count_deals(&db).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn hot_update_runs_each_profile_once_then_exhausts() {
        let transport = MockTransport::new();
        let db = connect_and_migrate("sqlite::memory:").await.unwrap();
        let mut driver = CheapSharkDriver::hot_update(db.clone(), Arc::new(transport.clone()))
            .with_base_url(BASE);
        assert!(!driver.resume_from_checkpoint());
        assert_eq!(driver.sync_type(), SyncType::HotUpdate);

        let urls = [
            format!("{BASE}/deals?sortBy=Savings&desc=1&onSale=1&AAA=1&pageSize=60&pageNumber=0"),
            format!("{BASE}/deals?sortBy=Deal%20Rating&desc=1&metacritic=70&pageSize=60&pageNumber=0"),
            format!("{BASE}/deals?sortBy=Recent&steamRating=75&pageSize=60&pageNumber=0"),
            format!("{BASE}/deals?sortBy=Price&upperPrice=5&pageSize=60&pageNumber=0"),
            format!("{BASE}/deals?sortBy=Metacritic&lowerPrice=0&onSale=1&pageSize=60&pageNumber=0"),
        ];
        transport.push_json(
            HttpMethod::Get,
            urls[0].clone(),
            r#"[{"dealID":"h1","gameID":"1","storeID":"1","title":"X","salePrice":"1","normalPrice":"10","isOnSale":1}]"#,
        );
        for url in &urls[1..] {
            transport.push_json(HttpMethod::Get, url.clone(), "[]");
        }

        let mut cursor = 0;
        let mut pages = 0;
        loop {
            match driver.fetch_page(cursor).await.unwrap() {
                PageOutcome::Page(stats) => {
                    cursor = stats.next_cursor;
                    pages += 1;
                }
                PageOutcome::Exhausted => break,
                other => panic!("unexpected outcome: {other:?}"),
            }
        }

        assert_eq!(pages, 5);
        assert_eq!(repository::shark::count_deals(&db).await.unwrap(), 1);
        assert_eq!(transport.requests().len(), 5);
    }
}
