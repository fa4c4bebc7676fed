mod common;

use common::{FakeUpstream, Reply};
use drama_browser::http_client::QueryParams;
use drama_browser::{ApiClient, ApiConfig, ApiError, Catalog, DramaBoxService, Endpoint, SearchParams};
use serde_json::{Value, json};
use std::time::{Duration, Instant};

#[tokio::test]
async fn test_unwraps_data_envelope() {
    let upstream = FakeUpstream::start().await;
    upstream.on(
        "trending",
        Reply::Json(json!({"success": true, "data": [{"bookId": "1"}, {"bookId": "2"}]})),
    );

    let client = ApiClient::new(upstream.config()).unwrap();
    let items: Vec<Value> = client
        .get(Endpoint::Trending, &QueryParams::new())
        .await
        .unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(upstream.hits("trending"), vec![None]);
}

#[tokio::test]
async fn test_status_error_is_retried_then_surfaced() {
    let upstream = FakeUpstream::start().await;
    upstream.on("trending", Reply::Status(502, "bad gateway"));

    let client = ApiClient::new(upstream.config()).unwrap();
    let started = Instant::now();
    let err = client
        .get::<Value>(Endpoint::Trending, &QueryParams::new())
        .await
        .unwrap_err();

    match err {
        ApiError::Status { status, body } => {
            assert_eq!(status, 502);
            assert_eq!(body, "bad gateway");
        }
        other => panic!("unexpected error: {other:?}"),
    }
    // one attempt plus three retries, sleeping 10 + 20 + 30 ms in between
    assert_eq!(upstream.hits("trending").len(), 4);
    assert!(started.elapsed() >= Duration::from_millis(60));
}

#[tokio::test]
async fn test_retry_budget_is_configurable() {
    let upstream = FakeUpstream::start().await;
    upstream.on("foryou", Reply::Status(500, "oops"));

    let client = ApiClient::new(upstream.config().with_retries(0)).unwrap();
    let err = client
        .get::<Value>(Endpoint::ForYou, &QueryParams::new())
        .await
        .unwrap_err();
    assert_eq!(err.status(), Some(500));
    assert_eq!(upstream.hits("foryou").len(), 1);
}

#[tokio::test]
async fn test_timeout_is_not_retried() {
    let upstream = FakeUpstream::start().await;
    upstream.on("latest", Reply::Slow(Duration::from_secs(2), json!([])));

    let config = upstream.config().with_timeout(Duration::from_millis(100));
    let client = ApiClient::new(config).unwrap();
    let err = client
        .get::<Value>(Endpoint::Latest, &QueryParams::new())
        .await
        .unwrap_err();

    assert!(matches!(err, ApiError::Timeout(_)), "got {err:?}");
    assert_eq!(upstream.hits("latest").len(), 1);
}

#[tokio::test]
async fn test_network_failure_exhausts_retries() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let config = ApiConfig::new(format!("http://{addr}/api"))
        .with_backoff_step(Duration::from_millis(5));
    let client = ApiClient::new(config).unwrap();
    let started = Instant::now();
    let err = client
        .get::<Value>(Endpoint::Trending, &QueryParams::new())
        .await
        .unwrap_err();

    assert!(matches!(err, ApiError::Network(_)), "got {err:?}");
    assert!(started.elapsed() >= Duration::from_millis(30));
}

#[tokio::test]
async fn test_declared_failure_is_an_error() {
    let upstream = FakeUpstream::start().await;
    upstream.on(
        "detail",
        Reply::Json(json!({"success": false, "message": "book not found"})),
    );

    let service = DramaBoxService::new(upstream.config()).unwrap();
    let err = service.detail("404").await.unwrap_err();
    match err {
        ApiError::Upstream { message, status } => {
            assert_eq!(message, "book not found");
            assert_eq!(status, 200);
        }
        other => panic!("unexpected error: {other:?}"),
    }
    // declared failures are not retried
    assert_eq!(upstream.hits("detail").len(), 1);
}

#[tokio::test]
async fn test_malformed_body_is_parse_error() {
    let upstream = FakeUpstream::start().await;
    upstream.on("trending", Reply::Raw("<html>maintenance</html>"));

    let service = DramaBoxService::new(upstream.config()).unwrap();
    let err = service.trending().await.unwrap_err();
    assert!(matches!(err, ApiError::Parse(_)), "got {err:?}");
}

#[tokio::test]
async fn test_service_sends_only_given_parameters() {
    let upstream = FakeUpstream::start().await;
    upstream.on("search", Reply::Json(json!([])));
    upstream.on("dubindo", Reply::Json(json!([])));
    upstream.on("allepisode", Reply::Json(json!([])));

    let service = DramaBoxService::new(upstream.config()).unwrap();
    service.search(&SearchParams::new("ceo")).await.unwrap();
    service
        .search(&SearchParams {
            query: "ceo".to_string(),
            page: Some(2),
            limit: Some(10),
        })
        .await
        .unwrap();
    service.dubbed(None, Some(3)).await.unwrap();
    service.all_episodes("41000").await.unwrap();

    assert_eq!(
        upstream.hits("search"),
        vec![
            Some("query=ceo".to_string()),
            Some("query=ceo&page=2&limit=10".to_string())
        ]
    );
    assert_eq!(upstream.hits("dubindo"), vec![Some("page=3".to_string())]);
    assert_eq!(
        upstream.hits("allepisode"),
        vec![Some("bookId=41000".to_string())]
    );
}

#[tokio::test]
async fn test_post_unwraps_payload() {
    let upstream = FakeUpstream::start().await;
    upstream.on("search", Reply::Json(json!({"data": ["ok"]})));

    let client = ApiClient::new(upstream.config()).unwrap();
    let reply: Vec<String> = client
        .post(Endpoint::Search, Some(&json!({"query": "ceo"})))
        .await
        .unwrap();
    assert_eq!(reply, vec!["ok"]);

    let reply: Vec<String> = client
        .post::<_, Value>(Endpoint::Search, None)
        .await
        .unwrap();
    assert_eq!(reply, vec!["ok"]);
    assert_eq!(upstream.hits("search").len(), 2);
}

#[tokio::test]
async fn test_service_skips_undecodable_records() {
    let upstream = FakeUpstream::start().await;
    upstream.on(
        "trending",
        Reply::Json(json!({"data": [
            {"bookId": "1"},
            null,
            "not a drama",
            {"bookId": "2", "corner": "hot", "tags": [null, "Romance"]}
        ]})),
    );

    let service = DramaBoxService::new(upstream.config()).unwrap();
    let dramas = service.trending().await.unwrap();
    let ids: Vec<&str> = dramas.iter().map(|d| d.book_id.as_str()).collect();
    assert_eq!(ids, vec!["1", "2"]);
    assert_eq!(dramas[1].tags, Some(vec!["Romance".to_string()]));
}
