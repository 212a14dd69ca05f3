//! End-to-end sync tests against an in-memory database and a scripted
//! HTTP transport, driving the public `SyncService` surface only.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use ludex::Source;
use ludex::connect_and_migrate;
use ludex::http::{HttpError, HttpRequest, HttpResponse, HttpTransport};
use ludex::sync::{Endpoints, SourceCredentials, SyncError, SyncService};

const SHARK: &str = "https://shark.local/api/1.0";

/// Scripted transport: serves canned JSON per exact URL, FIFO per URL.
#[derive(Clone, Default)]
struct ScriptedTransport {
    inner: Arc<Mutex<ScriptedInner>>,
}

#[derive(Default)]
struct ScriptedInner {
    routes: HashMap<String, VecDeque<HttpResponse>>,
    requests: Vec<String>,
}

impl ScriptedTransport {
    fn new() -> Self {
        Self::default()
    }

    fn push_json(&self, url: impl Into<String>, body: &str) {
        let mut inner = self.inner.lock().unwrap();
        inner
            .routes
            .entry(url.into())
            .or_default()
            .push_back(HttpResponse {
                status: 200,
                headers: vec![("Content-Type".to_string(), "application/json".to_string())],
                body: body.as_bytes().to_vec(),
            });
    }

    fn requests(&self) -> Vec<String> {
        self.inner.lock().unwrap().requests.clone()
    }
}

#[async_trait]
impl HttpTransport for ScriptedTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, HttpError> {
        let mut inner = self.inner.lock().unwrap();
        inner.requests.push(request.url.clone());
        inner
            .routes
            .get_mut(&request.url)
            .and_then(|queue| queue.pop_front())
            .ok_or(HttpError::Transport(format!(
                "no scripted response for {}",
                request.url
            )))
    }
}

fn shark_endpoints() -> Endpoints {
    Endpoints {
        cheapshark: SHARK.to_string(),
        ..Endpoints::default()
    }
}

fn deals_url(page: i64) -> String {
    format!("{SHARK}/deals?pageNumber={page}&pageSize=60&sortBy=Deal%20Rating")
}

fn savings_url(page: i64) -> String {
    format!("{SHARK}/deals?pageNumber={page}&pageSize=60&sortBy=Savings&desc=1")
}

/// Script one complete CheapShark full sync: two deal pages referencing
/// three games, then the empty page, the three detail fetches, and an
/// empty savings sweep.
fn script_full_sync(transport: &ScriptedTransport) {
    transport.push_json(format!("{SHARK}/stores"), r#"[{"storeID":"1","storeName":"Steam","isActive":1}]"#);
    transport.push_json(
        deals_url(0),
        r#"[
            {"dealID":"d1","gameID":"100","storeID":"1","title":"Alpha","salePrice":"40.00","normalPrice":"50.00","isOnSale":"1"},
            {"dealID":"d2","gameID":"200","storeID":"1","title":"Beta","salePrice":"9.99","normalPrice":"19.99","isOnSale":"0"}
        ]"#,
    );
    transport.push_json(
        deals_url(1),
        r#"[
            {"dealID":"d3","gameID":"300","storeID":"1","title":"Gamma","salePrice":"14.99","normalPrice":"29.99","isOnSale":1}
        ]"#,
    );
    transport.push_json(deals_url(2), "[]");
    transport.push_json(
        format!("{SHARK}/games?id=100"),
        r#"{"info":{"title":"Alpha"},"cheapestPriceEver":{"price":"19.99","date":1600000000,"dealID":"d1"},"deals":[{"dealID":"d1","storeID":"1","price":"40.00","retailPrice":"50.00"}]}"#,
    );
    transport.push_json(
        format!("{SHARK}/games?id=200"),
        r#"{"info":{"title":"Beta"},"cheapestPriceEver":{"price":"4.99"},"deals":[]}"#,
    );
    transport.push_json(
        format!("{SHARK}/games?id=300"),
        r#"{"info":{"title":"Gamma"},"deals":[]}"#,
    );
    transport.push_json(savings_url(0), "[]");
}

#[tokio::test]
async fn cheapshark_full_sync_end_to_end() {
    let db = connect_and_migrate("sqlite::memory:").await.unwrap();
    let transport = ScriptedTransport::new();
    script_full_sync(&transport);

    let service = SyncService::new(
        db,
        Arc::new(transport.clone()),
        SourceCredentials::default(),
    )
    .with_endpoints(shark_endpoints());

    let summary = service.full_sync(Source::CheapShark).await.unwrap();
    assert!(!summary.stopped);
    assert_eq!(summary.pages, 2);
    assert!(summary.items_added >= 6, "3 deals + 3 games at minimum");

    // Exactly three rating-sorted listing calls and three detail calls.
    let requests = transport.requests();
    assert_eq!(
        requests.iter().filter(|u| u.contains("Deal%20Rating")).count(),
        3
    );
    assert_eq!(
        requests
            .iter()
            .filter(|u| u.starts_with(&format!("{SHARK}/games?id=")))
            .count(),
        3
    );

    let stats = service.sync_stats(Source::CheapShark).await.unwrap();
    assert_eq!(stats.cursor, 2);
    assert_eq!(stats.collections["games"], 3);
    assert_eq!(stats.collections["deals"], 3);
    assert_eq!(stats.collections["stores"], 1);
    // d1 was re-delivered by the game-detail backfill, whose embedded
    // shape carries no saleness flag; the full-resend policy for that
    // column leaves only d3 flagged on sale.
    assert_eq!(stats.collections["active_deals"], 1);
    assert!(stats.last_historical.is_some());
    assert!(stats.last_incremental.is_none());
}

#[tokio::test]
async fn second_full_sync_resumes_past_swept_pages() {
    let db = connect_and_migrate("sqlite::memory:").await.unwrap();
    let transport = ScriptedTransport::new();
    script_full_sync(&transport);

    let service = SyncService::new(
        db,
        Arc::new(transport.clone()),
        SourceCredentials::default(),
    )
    .with_endpoints(shark_endpoints());

    service.full_sync(Source::CheapShark).await.unwrap();

    // The next run starts from the max-ever cursor: page 2, not page 0.
    transport.push_json(format!("{SHARK}/stores"), "[]");
    transport.push_json(deals_url(2), "[]");
    transport.push_json(savings_url(0), "[]");

    let summary = service.full_sync(Source::CheapShark).await.unwrap();
    assert_eq!(summary.pages, 0);

    let page_zero_calls = transport
        .requests()
        .iter()
        .filter(|u| **u == deals_url(0))
        .count();
    assert_eq!(page_zero_calls, 1, "page 0 must not be re-fetched");

    // Records were not duplicated by the second pass.
    let stats = service.sync_stats(Source::CheapShark).await.unwrap();
    assert_eq!(stats.collections["deals"], 3);
    assert_eq!(stats.cursor, 2);
}

#[tokio::test]
async fn unsupported_combinations_are_rejected() {
    let db = connect_and_migrate("sqlite::memory:").await.unwrap();
    let service = SyncService::new(
        db,
        Arc::new(ScriptedTransport::new()),
        SourceCredentials::default(),
    );

    let err = service.incremental_sync(Source::Steam).await.unwrap_err();
    assert!(matches!(err, SyncError::Unsupported { .. }));

    let err = service.hot_update_sync(Source::Rawg).await.unwrap_err();
    assert!(matches!(err, SyncError::Unsupported { .. }));
}

#[tokio::test]
async fn missing_credentials_are_reported_before_any_request() {
    let db = connect_and_migrate("sqlite::memory:").await.unwrap();
    let transport = ScriptedTransport::new();
    let service = SyncService::new(
        db,
        Arc::new(transport.clone()),
        SourceCredentials::default(),
    );

    let err = service.full_sync(Source::Rawg).await.unwrap_err();
    assert!(matches!(err, SyncError::MissingCredentials { .. }));
    assert!(transport.requests().is_empty());
}

#[tokio::test]
async fn failed_attempt_is_resumable_by_rerunning() {
    let db = connect_and_migrate("sqlite::memory:").await.unwrap();
    let transport = ScriptedTransport::new();

    // First run: stores ok, page 0 ok, then the transport has nothing
    // left - every further page fetch is a transient failure until the
    // error budget trips.
    transport.push_json(format!("{SHARK}/stores"), "[]");
    transport.push_json(
        deals_url(0),
        r#"[{"dealID":"d1","gameID":"100","storeID":"1","title":"Alpha","salePrice":"5","normalPrice":"10"}]"#,
    );

    let service = SyncService::new(
        db,
        Arc::new(transport.clone()),
        SourceCredentials::default(),
    )
    .with_endpoints(shark_endpoints());

    let err = service.full_sync(Source::CheapShark).await.unwrap_err();
    assert!(matches!(err, SyncError::AttemptFailed(_)));

    // Re-running the same sync type resumes at page 1.
    transport.push_json(format!("{SHARK}/stores"), "[]");
    transport.push_json(deals_url(1), "[]");
    transport.push_json(savings_url(0), "[]");

    let summary = service.full_sync(Source::CheapShark).await.unwrap();
    assert!(!summary.stopped);

    let stats = service.sync_stats(Source::CheapShark).await.unwrap();
    assert_eq!(stats.collections["deals"], 1);
    assert!(stats.last_historical.is_some());
}
