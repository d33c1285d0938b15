//! URL监控端到端测试
//!
//! 使用本地mock服务器验证手动检测、最近URL记录和自动刷新的完整流程

use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;
use url_vitals::health::{
    CheckTrigger, HttpProber, ProbeStatus, ResponseTime, Scheduler, TaskScheduler,
};
use url_vitals::recent::{JsonRecencyStore, RecencyStore};

/// 不会有服务监听的地址
const UNREACHABLE_URL: &str = "http://127.0.0.1:1";

fn build_scheduler(dir: &TempDir) -> (TaskScheduler, JsonRecencyStore) {
    let store = JsonRecencyStore::new(dir.path().join("recent_urls.json"), 5);
    let prober = HttpProber::new(Duration::from_secs(5)).unwrap();
    let scheduler = TaskScheduler::new(Arc::new(prober), Arc::new(store.clone()));
    (scheduler, store)
}

#[tokio::test]
async fn test_check_all_then_auto_refresh() {
    let mut server = mockito::Server::new_async().await;
    let _ok = server
        .mock("GET", "/health")
        .with_status(200)
        .create_async()
        .await;
    let _missing = server
        .mock("GET", "/missing")
        .with_status(404)
        .create_async()
        .await;

    let dir = tempfile::tempdir().unwrap();
    let (scheduler, store) = build_scheduler(&dir);

    let ok_url = format!("{}/health", server.url());
    let missing_url = format!("{}/missing", server.url());

    let batch = scheduler
        .check_all(vec![
            ok_url.clone(),
            "   ".to_string(),
            missing_url.clone(),
            UNREACHABLE_URL.to_string(),
        ])
        .await;

    assert_eq!(batch.trigger, CheckTrigger::Manual);
    assert_eq!(batch.len(), 3);
    let numbers: Vec<u32> = batch.results.iter().map(|r| r.sequence_number).collect();
    assert_eq!(numbers, vec![1, 2, 3]);

    assert_eq!(batch.results[0].status, ProbeStatus::Healthy);
    assert!(matches!(
        batch.results[0].response_time,
        ResponseTime::Measured(_)
    ));
    assert_eq!(batch.results[1].status.to_string(), "Status: 404");
    assert_eq!(batch.results[2].status.to_string(), "Not Healthy");
    assert_eq!(batch.results[2].response_time.to_string(), "∞");
    assert!(batch.results[2].error_message.is_some());

    // 批次内的URL按输入顺序记入最近URL
    let recent = store.load().await;
    assert_eq!(
        recent,
        vec![ok_url.clone(), missing_url.clone(), UNREACHABLE_URL.to_string()]
    );

    let refreshed = scheduler.auto_refresh_recent().await;
    assert_eq!(refreshed.trigger, CheckTrigger::AutoRefresh);
    assert_eq!(refreshed.urls(), recent);
    assert_eq!(refreshed.results[0].status, ProbeStatus::Healthy);
    assert_eq!(refreshed.results[2].status.to_string(), "Not reachable");

    // 自动刷新不修改最近URL
    assert_eq!(store.load().await, recent);
}

#[tokio::test]
async fn test_recent_urls_move_to_front_and_cap() {
    let mut server = mockito::Server::new_async().await;
    let _any = server
        .mock("GET", mockito::Matcher::Any)
        .with_status(200)
        .create_async()
        .await;

    let dir = tempfile::tempdir().unwrap();
    let (scheduler, store) = build_scheduler(&dir);
    let url = |path: &str| format!("{}/{}", server.url(), path);

    scheduler.check_all(vec![url("a"), url("b")]).await;
    scheduler.check_all(vec![url("c"), url("a")]).await;
    assert_eq!(store.load().await, vec![url("c"), url("a"), url("b")]);

    scheduler
        .check_all(vec![url("d"), url("e"), url("f"), url("g")])
        .await;
    assert_eq!(
        store.load().await,
        vec![url("d"), url("e"), url("f"), url("g"), url("c")]
    );
}

#[tokio::test]
async fn test_auto_refresh_with_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let (scheduler, store) = build_scheduler(&dir);

    let batch = scheduler.auto_refresh_recent().await;

    assert!(batch.is_empty());
    assert!(store.load().await.is_empty());
    assert!(!store.path().exists());
}
