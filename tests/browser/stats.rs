//! Aggregate statistics stay decoupled from the paginated view.

use std::time::Duration;

use resource_browser::{ApiError, BrowserConfig, Operation};
use tokio::time::timeout;

use crate::support::{browser, browser_with, endpoint, stats_calls, GatedEndpoint};

#[tokio::test]
async fn mount_loads_stats_once_from_a_large_unfiltered_page() {
    let endpoint = endpoint(47);
    let browser = browser(endpoint.clone());
    browser.mount().await.unwrap();

    assert_eq!(stats_calls(&endpoint), 1);
    let params = endpoint.list_calls_with_page_size(1000).remove(0);
    assert_eq!(params.page, 1);
    assert!(params.filters.is_empty());

    let stats = browser.stats().unwrap();
    assert_eq!(stats.total, 47);
    assert_eq!(stats.rows, 47);
    assert_eq!(stats.count("status", "active"), 32);
    assert_eq!(stats.count("status", "inactive"), 15);
    assert!(!stats.is_truncated());
}

#[tokio::test]
async fn filter_sort_and_page_changes_never_touch_stats() {
    let endpoint = endpoint(47);
    let browser = browser(endpoint.clone());
    browser.mount().await.unwrap();
    let before = browser.stats();

    browser.set_filter("status", "inactive").await.unwrap();
    browser.set_sort("price").await.unwrap();
    browser.set_page(2).await.unwrap();
    browser.set_page_size(25).await.unwrap();

    assert_eq!(stats_calls(&endpoint), 1);
    assert_eq!(browser.stats(), before);
    assert_eq!(browser.stats().unwrap().count("status", "active"), 32);
    assert_eq!(browser.pagination().total, 15);
}

#[tokio::test]
async fn load_stats_serves_the_cache_until_invalidated() {
    let endpoint = endpoint(10);
    let config = BrowserConfig {
        reload_stats_on_invalidate: false,
        ..BrowserConfig::default()
    };
    let browser = browser_with(endpoint.clone(), config);
    browser.mount().await.unwrap();

    browser.load_stats().await.unwrap();
    browser.load_stats().await.unwrap();
    assert_eq!(stats_calls(&endpoint), 1);

    browser.invalidate_stats().await.unwrap();
    assert!(browser.view().stats_dirty);
    assert_eq!(stats_calls(&endpoint), 1);
    assert!(browser.stats().is_some());

    browser.load_stats().await.unwrap();
    assert_eq!(stats_calls(&endpoint), 2);
    assert!(!browser.view().stats_dirty);
}

#[tokio::test]
async fn refresh_stats_always_refetches() {
    let endpoint = endpoint(10);
    let browser = browser(endpoint.clone());
    browser.mount().await.unwrap();

    endpoint.insert(crate::support::catalog(11).pop().unwrap());
    let stats = browser.refresh_stats().await.unwrap().unwrap();
    assert_eq!(stats_calls(&endpoint), 2);
    assert_eq!(stats.total, 11);
}

#[tokio::test]
async fn failed_reload_keeps_previous_stats() {
    let endpoint = endpoint(10);
    let browser = browser(endpoint.clone());
    browser.mount().await.unwrap();
    let before = browser.stats();

    endpoint.fail_next(Operation::List, ApiError::Transport("timeout".into()));
    assert!(browser.refresh_stats().await.is_err());

    let view = browser.view();
    assert_eq!(view.stats, before);
    assert!(view.stats_dirty);
    assert!(view.stats_error.is_some());
    assert!(view.error.is_none());
}

#[tokio::test]
async fn truncated_collection_is_flagged() {
    let endpoint = endpoint(30);
    let config = BrowserConfig {
        stats_page_size: 20,
        ..BrowserConfig::default()
    };
    let browser = browser_with(endpoint.clone(), config);
    browser.mount().await.unwrap();

    let stats = browser.stats().unwrap();
    assert_eq!(stats.rows, 20);
    assert_eq!(stats.total, 30);
    assert!(stats.is_truncated());
}

#[tokio::test(start_paused = true)]
async fn abandoned_load_does_not_block_the_next_one() {
    let endpoint = GatedEndpoint::new(endpoint(12));
    let browser = browser(endpoint.clone());
    browser.mount().await.unwrap();
    endpoint.inner().clear_calls();
    endpoint.hold();

    let attempt = timeout(Duration::from_millis(20), browser.refresh_stats()).await;
    assert!(attempt.is_err());
    let view = browser.view();
    assert!(view.stats_dirty);
    assert!(!view.stats_loading);

    endpoint.open();
    let stats = browser.load_stats().await.unwrap().unwrap();
    assert_eq!(stats.total, 12);
    assert_eq!(stats_calls(endpoint.inner()), 1);
    assert!(!browser.view().stats_dirty);
}
