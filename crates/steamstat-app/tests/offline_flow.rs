//! Cross-crate 오프라인 흐름 테스트.
//!
//! 게이트웨이 클라이언트(mockito) → 파일 캐시 → 장애 감지 경로를 검증한다.

use std::sync::Arc;
use std::time::Duration;
use steamstat_core::models::status::ServiceState;
use steamstat_core::outage;
use steamstat_core::ports::status_source::StatusSource;
use steamstat_storage::cache_store::CacheStore;
use steamstat_storage::slot::FileSlotStorage;
use steamstat_network::gateway_client::GatewayClient;
use tempfile::TempDir;

const STATUS_WITH_OUTAGE: &str = r#"{
    "services": {
        "store": {"status": "online"},
        "community": {"status": "online"},
        "matchmaking": {"status": "online"}
    },
    "history": [
        {"timestamp": "2026-10-19T09:50:00Z", "online": 27100000, "all_services_up": true},
        {"timestamp": "2026-10-19T09:55:00Z", "online": 26400000, "all_services_up": false},
        {"timestamp": "2026-10-19T10:00:00Z", "online": 27900000, "all_services_up": true}
    ],
    "trending_games": [
        {"appid": 730, "name": "Counter-Strike 2", "current_players": 1200000, "gain_24h": 50000}
    ]
}"#;

fn gateway() -> GatewayClient {
    GatewayClient::new(Duration::from_secs(5)).unwrap()
}

#[tokio::test]
async fn fetched_snapshot_survives_gateway_loss() {
    let temp_dir = TempDir::new().unwrap();
    let cache = CacheStore::new(Arc::new(FileSlotStorage::new(temp_dir.path())));

    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/api/v1/status")
        .match_header("x-api-key", "secret")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(STATUS_WITH_OUTAGE)
        .create_async()
        .await;

    let fresh = gateway().fetch_status(&server.url(), "secret").await.unwrap();
    cache.save(&fresh);
    mock.assert_async().await;

    // 게이트웨이 소실 후 같은 디렉토리에서 다시 연 캐시
    drop(server);
    let reopened = CacheStore::new(Arc::new(FileSlotStorage::new(temp_dir.path())));
    let cached = reopened.load().unwrap();
    assert_eq!(cached, fresh);
    assert_eq!(cached.trending_games[0].appid, 730);

    let info = outage::detect(&cached);
    assert!(!info.has_current_outage);
    assert!(info.had_recent_outage);
    assert_eq!(info.outage_count, 1);
    assert_eq!(
        info.last_outage_time.as_deref(),
        Some("2026-10-19T09:55:00Z")
    );
}

#[tokio::test]
async fn auth_failure_does_not_touch_cache() {
    let temp_dir = TempDir::new().unwrap();
    let cache = CacheStore::new(Arc::new(FileSlotStorage::new(temp_dir.path())));

    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("GET", "/api/v1/status")
        .with_status(403)
        .create_async()
        .await;

    let err = gateway().fetch_status(&server.url(), "wrong").await.unwrap_err();
    assert_eq!(err.to_string(), "Invalid API key");
    assert!(!err.is_retryable());
    assert!(cache.load().is_none());
    assert!(cache.age().is_none());
}

#[tokio::test]
async fn degraded_service_is_current_outage() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("GET", "/api/v1/status")
        .with_status(200)
        .with_body(
            r#"{"services": {"store": {"status": "online"}, "cdn": {"status": "degraded"}}, "history": null}"#,
        )
        .create_async()
        .await;

    let snapshot = gateway().fetch_status(&server.url(), "k").await.unwrap();
    assert_eq!(snapshot.services["cdn"].status, ServiceState::Degraded);

    let info = outage::detect(&snapshot);
    assert!(info.has_current_outage);
    assert!(!info.had_recent_outage);
    assert_eq!(info.last_outage_time, None);
}
