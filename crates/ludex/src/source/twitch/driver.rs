//! Twitch sync driver.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{SecondsFormat, Utc};
use sea_orm::DatabaseConnection;

use crate::auth::TokenProvider;
use crate::fetch::Fetcher;
use crate::http::{HttpRequest, HttpTransport, url_with_params};
use crate::repository::{self, twitch::ViewerStats};
use crate::source::{
    DriverError, PageOutcome, PageStats, RunCounters, Source, SourceDriver, SourceLimits, SyncType,
};

use super::TWITCH_API_BASE_URL;
use super::convert;
use super::types::{ClipRaw, Paginated, StreamRaw, TwitchGameRaw};

/// Pagination depth caps, per the Helix API's practical limits.
const FULL_TOP_GAME_PAGES: u32 = 100;
const FULL_STREAM_PAGES: u32 = 10;
const MAX_STREAMS_PER_GAME: usize = 1_000;
const MAX_CLIPS_PER_GAME: usize = 1_000;
const TOP_VIDEOS_PER_GAME: u32 = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    /// Deep pass: every reachable top game, full stream/clip/video fan-in.
    Full,
    /// Frequent refresh: top 100 games, one stream page, 1-day clips.
    Hot,
}

/// Driver for the Twitch Helix API.
///
/// The cursor is the index into the top-games list enumerated by
/// `prepare`. The list is re-derived on every attempt (top games shift
/// constantly), so resuming an interrupted full pass re-enumerates and
/// starts from index 0 rather than trusting a stale cursor.
pub struct TwitchDriver {
    db: DatabaseConnection,
    transport: Arc<dyn HttpTransport>,
    fetcher: Fetcher,
    auth: TokenProvider,
    base_url: String,
    limits: SourceLimits,
    mode: Mode,
    games: Vec<TwitchGameRaw>,
    streams_captured: u64,
    clips_captured: u64,
    videos_seen: u64,
}

impl TwitchDriver {
    /// Full viewership sync.
    pub fn full(
        db: DatabaseConnection,
        transport: Arc<dyn HttpTransport>,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
    ) -> Self {
        Self::build(db, transport, client_id.into(), client_secret.into(), Mode::Full)
    }

    /// Frequent top-games refresh.
    pub fn hot_update(
        db: DatabaseConnection,
        transport: Arc<dyn HttpTransport>,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
    ) -> Self {
        Self::build(db, transport, client_id.into(), client_secret.into(), Mode::Hot)
    }

    fn build(
        db: DatabaseConnection,
        transport: Arc<dyn HttpTransport>,
        client_id: String,
        client_secret: String,
        mode: Mode,
    ) -> Self {
        let limits = SourceLimits::historical_defaults(Source::Twitch);
        let auth = TokenProvider::new(Arc::clone(&transport), client_id, client_secret);
        Self {
            db,
            fetcher: Fetcher::new(Arc::clone(&transport), limits.request_spacing_ms),
            transport,
            auth,
            base_url: TWITCH_API_BASE_URL.to_string(),
            limits,
            mode,
            games: Vec::new(),
            streams_captured: 0,
            clips_captured: 0,
            videos_seen: 0,
        }
    }

    /// Point the driver at a different API host (tests).
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Use a different token endpoint (tests).
    #[must_use]
    pub fn with_token_url(
        mut self,
        token_url: impl Into<String>,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
    ) -> Self {
        self.auth = TokenProvider::with_token_url(
            Arc::clone(&self.transport),
            token_url,
            client_id,
            client_secret,
        );
        self
    }

    fn page_size(&self) -> String {
        self.limits.page_size.to_string()
    }

    /// Enumerate top games by cursor pagination.
    async fn fetch_top_games(&self) -> Result<Vec<TwitchGameRaw>, DriverError> {
        let max_pages = match self.mode {
            Mode::Full => FULL_TOP_GAME_PAGES,
            Mode::Hot => 1,
        };

        let mut games = Vec::new();
        let mut cursor: Option<String> = None;

        for page in 0..max_pages {
            let mut params = vec![("first", self.page_size())];
            if let Some(after) = &cursor {
                params.push(("after", after.clone()));
            }
            let url = url_with_params(&format!("{}/games/top", self.base_url), &params);

            let listing: Paginated<TwitchGameRaw> = self
                .fetcher
                .execute_json(HttpRequest::get(url), Some(&self.auth))
                .await
                .map_err(DriverError::from_fetch)?;

            let batch = listing.data.clone().unwrap_or_default();
            if batch.is_empty() {
                break;
            }
            games.extend(batch);

            tracing::debug!(page = page + 1, total = games.len(), "fetched top games page");

            match listing.cursor() {
                Some(next) => cursor = Some(next.to_string()),
                None => break,
            }
        }

        Ok(games)
    }

    /// Capture up to the cap of live streams for one game. Failures
    /// degrade to whatever was already captured.
    async fn fetch_streams(&self, game_id: &str) -> Vec<StreamRaw> {
        let (max_pages, cap) = match self.mode {
            Mode::Full => (FULL_STREAM_PAGES, MAX_STREAMS_PER_GAME),
            Mode::Hot => (1, self.limits.page_size as usize),
        };

        let mut streams: Vec<StreamRaw> = Vec::new();
        let mut cursor: Option<String> = None;

        for _ in 0..max_pages {
            if streams.len() >= cap {
                break;
            }
            let mut params = vec![("game_id", game_id.to_string()), ("first", self.page_size())];
            if let Some(after) = &cursor {
                params.push(("after", after.clone()));
            }
            let url = url_with_params(&format!("{}/streams", self.base_url), &params);

            let listing: Paginated<StreamRaw> = match self
                .fetcher
                .execute_json(HttpRequest::get(url), Some(&self.auth))
                .await
            {
                Ok(listing) => listing,
                Err(err) => {
                    tracing::warn!(game_id, error = %err, "stream fetch degraded");
                    break;
                }
            };

            let batch = listing.data.clone().unwrap_or_default();
            if batch.is_empty() {
                break;
            }
            streams.extend(batch);

            match listing.cursor() {
                Some(next) => cursor = Some(next.to_string()),
                None => break,
            }
        }

        streams.truncate(cap);
        streams
    }

    /// Capture recent clips for one game within the mode's lookback
    /// window. Failures degrade to whatever was already captured.
    async fn fetch_clips(&self, game_id: &str) -> Vec<ClipRaw> {
        let days = match self.mode {
            Mode::Full => 7,
            Mode::Hot => 1,
        };
        let ended = Utc::now();
        let started = ended - chrono::Duration::days(days);

        let mut clips: Vec<ClipRaw> = Vec::new();
        let mut cursor: Option<String> = None;

        while clips.len() < MAX_CLIPS_PER_GAME {
            let mut params = vec![
                ("game_id", game_id.to_string()),
                ("first", self.page_size()),
                ("started_at", started.to_rfc3339_opts(SecondsFormat::Secs, true)),
                ("ended_at", ended.to_rfc3339_opts(SecondsFormat::Secs, true)),
            ];
            if let Some(after) = &cursor {
                params.push(("after", after.clone()));
            }
            let url = url_with_params(&format!("{}/clips", self.base_url), &params);

            let listing: Paginated<ClipRaw> = match self
                .fetcher
                .execute_json(HttpRequest::get(url), Some(&self.auth))
                .await
            {
                Ok(listing) => listing,
                Err(err) => {
                    tracing::warn!(game_id, error = %err, "clip fetch degraded");
                    break;
                }
            };

            let batch = listing.data.clone().unwrap_or_default();
            if batch.is_empty() {
                break;
            }
            clips.extend(batch);

            match listing.cursor() {
                Some(next) => cursor = Some(next.to_string()),
                None => break,
            }
        }

        clips.truncate(MAX_CLIPS_PER_GAME);
        clips
    }

    /// Top videos by views; only counted, recorded in attempt metadata.
    async fn fetch_videos(&self, game_id: &str) -> usize {
        let url = url_with_params(
            &format!("{}/videos", self.base_url),
            &[
                ("game_id", game_id.to_string()),
                ("first", TOP_VIDEOS_PER_GAME.to_string()),
                ("sort", "views".to_string()),
                ("type", "all".to_string()),
            ],
        );
        match self
            .fetcher
            .execute_json::<Paginated<serde_json::Value>>(HttpRequest::get(url), Some(&self.auth))
            .await
        {
            Ok(listing) => listing.data.map(|d| d.len()).unwrap_or(0),
            Err(err) => {
                tracing::debug!(game_id, error = %err, "video fetch degraded");
                0
            }
        }
    }

    /// Recompute rolling peak/average statistics from snapshot history.
    async fn recompute_viewer_stats(&self, game_id: &str) -> Result<(), DriverError> {
        let now = Utc::now().fixed_offset();
        let day = repository::twitch::viewer_counts_since(
            &self.db,
            game_id,
            now - chrono::Duration::days(1),
        )
        .await?;
        let week = repository::twitch::viewer_counts_since(
            &self.db,
            game_id,
            now - chrono::Duration::weeks(1),
        )
        .await?;
        let month = repository::twitch::viewer_counts_since(
            &self.db,
            game_id,
            now - chrono::Duration::days(30),
        )
        .await?;
        let all_time = repository::twitch::peak_viewers_all_time(&self.db, game_id).await?;

        let peak = |counts: &[i64]| counts.iter().copied().max().unwrap_or(0);
        let avg = |counts: &[i64]| {
            if counts.is_empty() {
                0
            } else {
                (counts.iter().copied().sum::<i64>() as f64 / counts.len() as f64).round() as i64
            }
        };

        repository::twitch::update_viewer_stats(
            &self.db,
            game_id,
            ViewerStats {
                peak_today: peak(&day),
                peak_week: peak(&week),
                peak_month: peak(&month),
                peak_all_time: all_time,
                avg_day: avg(&day),
                avg_week: avg(&week),
                avg_month: avg(&month),
            },
        )
        .await?;
        Ok(())
    }
}

#[async_trait]
impl SourceDriver for TwitchDriver {
    fn source(&self) -> Source {
        Source::Twitch
    }

    fn sync_type(&self) -> SyncType {
        match self.mode {
            Mode::Full => SyncType::Historical,
            Mode::Hot => SyncType::HotUpdate,
        }
    }

    fn limits(&self) -> &SourceLimits {
        &self.limits
    }

    fn resume_from_checkpoint(&self) -> bool {
        false
    }

    async fn prepare(&mut self) -> Result<(), DriverError> {
        self.games = self.fetch_top_games().await?;
        tracing::info!(games = self.games.len(), "twitch top games enumerated");
        Ok(())
    }

    async fn fetch_page(&mut self, cursor: i64) -> Result<PageOutcome, DriverError> {
        let Some(game) = self.games.get(cursor as usize).cloned() else {
            return Ok(PageOutcome::Exhausted);
        };

        let streams = self.fetch_streams(&game.id).await;
        let clips = self.fetch_clips(&game.id).await;
        let videos = match self.mode {
            Mode::Full => self.fetch_videos(&game.id).await,
            Mode::Hot => 0,
        };
        self.videos_seen += videos as u64;

        let mut stats = PageStats {
            next_cursor: cursor + 1,
            ..Default::default()
        };

        let agg = convert::aggregate_streams(&streams);
        stats.processed += 1;
        match repository::twitch::upsert_game(&self.db, convert::game_to_model(&game, &agg)).await
        {
            Ok(_) => stats.added += 1,
            Err(err) => {
                // Without the game row nothing downstream makes sense;
                // count it and move to the next game.
                stats.record_errors += 1;
                tracing::warn!(game_id = %game.id, error = %err, "failed to save twitch game");
                return Ok(PageOutcome::Page(stats));
            }
        }

        if agg.total_viewers > 0 {
            if let Err(err) = repository::twitch::record_viewer_snapshot(
                &self.db,
                &game.id,
                agg.total_viewers,
                agg.total_channels,
            )
            .await
            {
                stats.record_errors += 1;
                tracing::warn!(game_id = %game.id, error = %err, "failed to record viewer snapshot");
            }
        }

        for stream in streams {
            stats.processed += 1;
            self.streams_captured += 1;
            let stream_id = stream.id.clone();
            match repository::twitch::upsert_stream(
                &self.db,
                convert::stream_to_model(stream, &game.id),
            )
            .await
            {
                Ok(_) => stats.added += 1,
                Err(err) => {
                    stats.record_errors += 1;
                    tracing::warn!(stream_id = %stream_id, error = %err, "failed to save stream");
                }
            }
        }

        for clip in clips {
            stats.processed += 1;
            self.clips_captured += 1;
            let clip_id = clip.id.clone();
            match repository::twitch::upsert_clip(&self.db, convert::clip_to_model(clip, &game.id))
                .await
            {
                Ok(_) => stats.added += 1,
                Err(err) => {
                    stats.record_errors += 1;
                    tracing::warn!(clip_id = %clip_id, error = %err, "failed to save clip");
                }
            }
        }

        // The hot pass refreshes statistics as it goes; the full pass
        // defers to the trailing recompute in finalize.
        if self.mode == Mode::Hot {
            if let Err(err) = self.recompute_viewer_stats(&game.id).await {
                stats.record_errors += 1;
                tracing::warn!(game_id = %game.id, error = %err, "failed to recompute viewer stats");
            }
        }

        Ok(PageOutcome::Page(stats))
    }

    async fn finalize(&mut self, counters: &mut RunCounters) -> Result<(), DriverError> {
        if self.mode != Mode::Full {
            return Ok(());
        }

        tracing::info!(games = self.games.len(), "recomputing rolling viewer statistics");
        for game in &self.games {
            if let Err(err) = self.recompute_viewer_stats(&game.id).await {
                counters.record_errors += 1;
                tracing::warn!(game_id = %game.id, error = %err, "failed to recompute viewer stats");
            }
        }
        Ok(())
    }

    fn metadata(&self) -> serde_json::Value {
        serde_json::json!({
            "games_enumerated": self.games.len(),
            "streams_captured": self.streams_captured,
            "clips_captured": self.clips_captured,
            "videos_seen": self.videos_seen,
        })
    }
}

#[cfg(all(test, feature = "migrate"))]
mod tests {
    use super::*;
    use crate::db::connect_and_migrate;
    use crate::entity::prelude::TwitchGame;
    use crate::http::{HttpMethod, MockTransport, url_with_params};
    use sea_orm::EntityTrait;

    const BASE: &str = "https://helix.test";
    const TOKEN_URL: &str = "https://id.test/oauth2/token";

    fn token_url() -> String {
        url_with_params(
            TOKEN_URL,
            &[
                ("client_id", "cid".to_string()),
                ("client_secret", "cs".to_string()),
                ("grant_type", "client_credentials".to_string()),
            ],
        )
    }

    fn push_token(transport: &MockTransport) {
        transport.push_json(
            HttpMethod::Post,
            token_url(),
            r#"{"access_token":"tok","expires_in":3600}"#,
        );
    }

    async fn full_driver(transport: &MockTransport) -> (TwitchDriver, DatabaseConnection) {
        let db = connect_and_migrate("sqlite::memory:").await.unwrap();
        push_token(transport);
        let driver = TwitchDriver::full(db.clone(), Arc::new(transport.clone()), "cid", "cs")
            .with_base_url(BASE)
            .with_token_url(TOKEN_URL, "cid", "cs");
        (driver, db)
    }

    #[tokio::test]
    async fn prepare_paginates_top_games_until_cursor_runs_out() {
        let transport = MockTransport::new();
        let (mut driver, _db) = full_driver(&transport).await;

        transport.push_json(
            HttpMethod::Get,
            format!("{BASE}/games/top?first=100"),
            r#"{"data":[{"id":"1","name":"A"}],"pagination":{"cursor":"c1"}}"#,
        );
        transport.push_json(
            HttpMethod::Get,
            format!("{BASE}/games/top?first=100&after=c1"),
            r#"{"data":[{"id":"2","name":"B"}],"pagination":{}}"#,
        );

        driver.prepare().await.unwrap();
        assert_eq!(driver.games.len(), 2);
    }

    #[tokio::test]
    async fn full_page_aggregates_streams_and_saves_everything() {
        let transport = MockTransport::new();
        let (mut driver, db) = full_driver(&transport).await;

        driver.games = vec![serde_json::from_value(serde_json::json!({
            "id": "33214", "name": "Fortnite",
            "box_art_url": "https://cdn.test/33214-{width}x{height}.jpg"
        }))
        .unwrap()];

        transport.push_json(
            HttpMethod::Get,
            format!("{BASE}/streams?game_id=33214&first=100"),
            r#"{"data":[
                {"id":"s1","user_id":"u1","user_login":"alpha","user_name":"Alpha","viewer_count":1200,"language":"en","tags":["BR"]},
                {"id":"s2","user_id":"u2","user_login":"beta","user_name":"Beta","viewer_count":300,"language":"fr"}
            ],"pagination":{}}"#,
        );
        transport.push_json_prefix(
            HttpMethod::Get,
            format!("{BASE}/clips?game_id=33214&first=100&started_at="),
            r#"{"data":[
                {"id":"c1","broadcaster_id":"u1","broadcaster_name":"Alpha","view_count":99,"created_at":"2025-06-01T00:00:00Z","duration":28.5}
            ],"pagination":{}}"#,
        );
        transport.push_json(
            HttpMethod::Get,
            format!("{BASE}/videos?game_id=33214&first=20&sort=views&type=all"),
            r#"{"data":[{"id":"v1","title":"Finals","view_count":100000}]}"#,
        );

        match driver.fetch_page(0).await.unwrap() {
            PageOutcome::Page(stats) => {
                // 1 game + 2 streams + 1 clip.
                assert_eq!(stats.processed, 4);
                assert_eq!(stats.added, 4);
                assert_eq!(stats.record_errors, 0);
            }
            other => panic!("unexpected outcome: {other:?}"),
        }

        let game = TwitchGame::find_by_id("33214").one(&db).await.unwrap().unwrap();
        assert_eq!(game.current_viewers, 1500);
        assert_eq!(game.current_channels, 2);
        assert_eq!(
            game.box_art_url.as_deref(),
            Some("https://cdn.test/33214-285x380.jpg")
        );

        assert_eq!(repository::twitch::count_streams(&db).await.unwrap(), 2);
        assert_eq!(repository::twitch::count_clips(&db).await.unwrap(), 1);

        // A snapshot was recorded for the non-zero viewer total.
        assert_eq!(
            repository::twitch::peak_viewers_all_time(&db, "33214").await.unwrap(),
            1500
        );

        assert!(matches!(
            driver.fetch_page(1).await.unwrap(),
            PageOutcome::Exhausted
        ));
        assert_eq!(driver.metadata()["streams_captured"], 2);
        assert_eq!(driver.metadata()["clips_captured"], 1);
        assert_eq!(driver.metadata()["videos_seen"], 1);
    }

    #[tokio::test]
    async fn finalize_recomputes_rolling_stats_from_snapshots() {
        let transport = MockTransport::new();
        let (mut driver, db) = full_driver(&transport).await;

        driver.games = vec![
            serde_json::from_value(serde_json::json!({"id": "7", "name": "Chess"})).unwrap(),
        ];

        repository::twitch::upsert_game(
            &db,
            convert::game_to_model(
                &driver.games[0],
                &convert::StreamAggregates::default(),
            ),
        )
        .await
        .unwrap();
        repository::twitch::record_viewer_snapshot(&db, "7", 400, 10).await.unwrap();
        repository::twitch::record_viewer_snapshot(&db, "7", 1000, 25).await.unwrap();
        repository::twitch::record_viewer_snapshot(&db, "7", 700, 18).await.unwrap();

        let mut counters = RunCounters::default();
        driver.finalize(&mut counters).await.unwrap();

        let game = TwitchGame::find_by_id("7").one(&db).await.unwrap().unwrap();
        assert_eq!(game.peak_viewers_today, 1000);
        assert_eq!(game.peak_viewers_all_time, 1000);
        assert_eq!(game.avg_viewers_day, 700);
    }

    #[tokio::test]
    async fn degraded_sub_fetches_never_fail_the_page() {
        let transport = MockTransport::new();
        let (mut driver, db) = full_driver(&transport).await;

        driver.games =
            vec![serde_json::from_value(serde_json::json!({"id": "9", "name": "Tetris"})).unwrap()];

        // Streams endpoint errors; clips and videos unregistered (also
        // errors). The game must still be written.
        transport.push_status(
            HttpMethod::Get,
            format!("{BASE}/streams?game_id=9&first=100"),
            500,
        );

        match driver.fetch_page(0).await.unwrap() {
            PageOutcome::Page(stats) => {
                assert_eq!(stats.processed, 1);
                assert_eq!(stats.added, 1);
            }
            other => panic!("unexpected outcome: {other:?}"),
        }

        let game = TwitchGame::find_by_id("9").one(&db).await.unwrap().unwrap();
        assert_eq!(game.current_viewers, 0);
    }
}
