//! IGDB sync driver.

use std::sync::Arc;

use async_trait::async_trait;
use sea_orm::DatabaseConnection;

use crate::auth::TokenProvider;
use crate::fetch::{FetchError, Fetcher};
use crate::http::{HttpRequest, HttpTransport};
use crate::repository;
use crate::source::{
    DriverError, PageOutcome, PageStats, Source, SourceDriver, SourceLimits, SyncType,
};

use super::IGDB_BASE_URL;
use super::convert;
use super::types::IgdbGameRaw;

#[derive(Debug, Clone, Copy)]
enum Mode {
    /// Unfiltered offset sweep over the whole dataset.
    Historical,
    /// Window over `first_release_date`, newest first. Bounds are unix
    /// timestamps (seconds).
    NewReleases { from: i64, to: i64 },
}

/// Driver for IGDB's Apicalypse `/games` endpoint.
///
/// The cursor is the row offset. IGDB responds 400 to an offset past the
/// end of the dataset; the driver treats that as exhaustion, not as an
/// error to retry.
pub struct IgdbDriver {
    db: DatabaseConnection,
    transport: Arc<dyn HttpTransport>,
    fetcher: Fetcher,
    auth: TokenProvider,
    base_url: String,
    limits: SourceLimits,
    mode: Mode,
}

impl IgdbDriver {
    /// Full historical sweep.
    pub fn historical(
        db: DatabaseConnection,
        transport: Arc<dyn HttpTransport>,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
    ) -> Self {
        Self::build(
            db,
            transport,
            client_id.into(),
            client_secret.into(),
            SourceLimits::historical_defaults(Source::Igdb),
            Mode::Historical,
        )
    }

    /// Releases within `[from, to]` (unix seconds), newest first.
    pub fn new_releases(
        db: DatabaseConnection,
        transport: Arc<dyn HttpTransport>,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        from: i64,
        to: i64,
    ) -> Self {
        Self::build(
            db,
            transport,
            client_id.into(),
            client_secret.into(),
            SourceLimits::incremental_defaults(Source::Igdb),
            Mode::NewReleases { from, to },
        )
    }

    fn build(
        db: DatabaseConnection,
        transport: Arc<dyn HttpTransport>,
        client_id: String,
        client_secret: String,
        limits: SourceLimits,
        mode: Mode,
    ) -> Self {
        let auth = TokenProvider::new(Arc::clone(&transport), client_id, client_secret);
        Self {
            db,
            fetcher: Fetcher::new(Arc::clone(&transport), limits.request_spacing_ms),
            transport,
            auth,
            base_url: IGDB_BASE_URL.to_string(),
            limits,
            mode,
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

    /// Build the Apicalypse query body for one page.
    fn build_query(&self, offset: i64) -> String {
        let mut query = String::from(
            "fields id, name, slug, summary, storyline, first_release_date, cover.url, \
             genres.name, platforms.name, involved_companies.company.name, \
             involved_companies.developer, involved_companies.publisher, \
             aggregated_rating, aggregated_rating_count, rating, rating_count, \
             total_rating, total_rating_count, category, status, screenshots.url;\n",
        );
        if let Mode::NewReleases { from, to } = self.mode {
            query.push_str(&format!(
                "where first_release_date > {from} & first_release_date < {to};\n\
                 sort first_release_date desc;\n"
            ));
        }
        query.push_str(&format!(
            "limit {};\noffset {};",
            self.limits.page_size, offset
        ));
        query
    }
}

#[async_trait]
impl SourceDriver for IgdbDriver {
    fn source(&self) -> Source {
        Source::Igdb
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
        let request = HttpRequest::post(
            format!("{}/games", self.base_url),
            self.build_query(cursor).into_bytes(),
        )
        .header("Content-Type", "text/plain");

        let games: Vec<IgdbGameRaw> = match self
            .fetcher
            .execute_json(request, Some(&self.auth))
            .await
        {
            Ok(games) => games,
            Err(FetchError::Fatal { status: 400, .. }) => {
                // An offset past the end of the dataset comes back as 400.
                tracing::info!(offset = cursor, "IGDB returned 400, treating as end of data");
                return Ok(PageOutcome::Exhausted);
            }
            Err(err) => return Err(DriverError::from_fetch(err)),
        };

        if games.is_empty() {
            return Ok(PageOutcome::Exhausted);
        }

        let mut stats = PageStats {
            next_cursor: cursor + games.len() as i64,
            ..Default::default()
        };

        for raw in games {
            stats.processed += 1;
            let game_id = raw.id;
            match repository::igdb::upsert_game(&self.db, convert::to_active_model(raw)).await {
                Ok(_) => stats.added += 1,
                Err(err) => {
                    stats.record_errors += 1;
                    tracing::warn!(game_id, error = %err, "failed to save IGDB game");
                }
            }
        }

        Ok(PageOutcome::Page(stats))
    }
}

#[cfg(all(test, feature = "migrate"))]
mod tests {
    use super::*;
    use crate::db::connect_and_migrate;
    use crate::http::{HttpMethod, MockTransport, url_with_params};

    const BASE: &str = "https://igdb.test/v4";
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

    async fn driver(transport: &MockTransport) -> (IgdbDriver, DatabaseConnection) {
        let db = connect_and_migrate("sqlite::memory:").await.unwrap();
        transport.push_json(
            HttpMethod::Post,
            token_url(),
            r#"{"access_token":"tok","expires_in":3600}"#,
        );
        let driver = IgdbDriver::historical(db.clone(), Arc::new(transport.clone()), "cid", "cs")
            .with_base_url(BASE)
            .with_token_url(TOKEN_URL, "cid", "cs");
        (driver, db)
    }

    #[tokio::test]
    async fn fetch_page_saves_games_and_advances_by_count() {
        let transport = MockTransport::new();
        let (mut driver, db) = driver(&transport).await;
        transport.push_json(
            HttpMethod::Post,
            format!("{BASE}/games"),
            r#"[{"id":1,"name":"Ori"},{"id":2,"name":"Fez"},{"id":3,"name":"Braid"}]"#,
        );

        match driver.fetch_page(500).await.unwrap() {
            PageOutcome::Page(stats) => {
                assert_eq!(stats.processed, 3);
                assert_eq!(stats.added, 3);
                assert_eq!(stats.next_cursor, 503);
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
        assert_eq!(repository::igdb::count_games(&db).await.unwrap(), 3);

        // The API call carried the bearer token and client id.
        let api_call = transport
            .requests()
            .into_iter()
            .find(|r| r.url.ends_with("/games"))
            .expect("games call recorded");
        assert!(
            api_call
                .headers
                .iter()
                .any(|(k, v)| k == "Authorization" && v == "Bearer tok")
        );
        assert!(api_call.headers.iter().any(|(k, _)| k == "Client-ID"));
        let body = String::from_utf8(api_call.body).unwrap();
        assert!(body.contains("limit 500;"));
        assert!(body.contains("offset 500;"));
    }

    #[tokio::test]
    async fn bad_request_means_end_of_data() {
        let transport = MockTransport::new();
        let (mut driver, _db) = driver(&transport).await;
        transport.push_status(HttpMethod::Post, format!("{BASE}/games"), 400);

        assert!(matches!(
            driver.fetch_page(250_000).await.unwrap(),
            PageOutcome::Exhausted
        ));
    }

    #[tokio::test]
    async fn empty_response_means_end_of_data() {
        let transport = MockTransport::new();
        let (mut driver, _db) = driver(&transport).await;
        transport.push_json(HttpMethod::Post, format!("{BASE}/games"), "[]");

        assert!(matches!(
            driver.fetch_page(0).await.unwrap(),
            PageOutcome::Exhausted
        ));
    }

    #[tokio::test]
    async fn new_releases_query_carries_window_and_sort() {
        let transport = MockTransport::new();
        let db = connect_and_migrate("sqlite::memory:").await.unwrap();
        transport.push_json(
            HttpMethod::Post,
            token_url(),
            r#"{"access_token":"tok","expires_in":3600}"#,
        );
        let mut driver = IgdbDriver::new_releases(
            db,
            Arc::new(transport.clone()),
            "cid",
            "cs",
            1_000,
            2_000,
        )
        .with_base_url(BASE)
        .with_token_url(TOKEN_URL, "cid", "cs");

        transport.push_json(HttpMethod::Post, format!("{BASE}/games"), "[]");
        driver.fetch_page(0).await.unwrap();

        let api_call = transport
            .requests()
            .into_iter()
            .find(|r| r.url.ends_with("/games"))
            .unwrap();
        let body = String::from_utf8(api_call.body).unwrap();
        assert!(body.contains("where first_release_date > 1000 & first_release_date < 2000;"));
        assert!(body.contains("sort first_release_date desc;"));
        assert_eq!(driver.sync_type(), SyncType::Incremental);
    }
}
