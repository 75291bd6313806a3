//! Debounced free-text search.

use std::time::Duration;

use resource_browser::{BrowserConfig, BrowserError};

use crate::support::{browser, browser_with, endpoint, page_calls};

#[tokio::test(start_paused = true)]
async fn keystrokes_coalesce_into_one_request() {
    let endpoint = endpoint(20);
    let browser = browser(endpoint.clone());
    browser.mount().await.unwrap();
    endpoint.clear_calls();

    let search = browser.search_box("search").unwrap();
    for text in ["P", "Pro", "Product 1"] {
        search.observe(text.to_string());
        tokio::time::advance(Duration::from_millis(100)).await;
    }
    assert!(endpoint.list_calls().is_empty());

    tokio::time::sleep(Duration::from_millis(600)).await;

    let calls = page_calls(&endpoint);
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].filter("search"), Some("Product 1"));
    assert_eq!(calls[0].page, 1);

    let view = browser.view();
    assert_eq!(view.pagination.total, 10);
    assert!(view.rows.iter().all(|p| p.name.starts_with("Product 1")));
}

#[tokio::test(start_paused = true)]
async fn retyping_within_the_window_commits_once() {
    let endpoint = endpoint(20);
    let browser = browser(endpoint.clone());
    browser.mount().await.unwrap();
    endpoint.clear_calls();

    let search = browser.search_box("search").unwrap();
    for text in ["s", "so", "soc", "sock", "socks", "sock", "socks"] {
        search.observe(text.to_string());
        tokio::time::advance(Duration::from_millis(40)).await;
    }
    tokio::time::sleep(Duration::from_secs(2)).await;

    let calls = page_calls(&endpoint);
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].filter("search"), Some("socks"));
    assert!(browser.rows().is_empty());
}

#[tokio::test(start_paused = true)]
async fn quiet_interval_comes_from_config() {
    let endpoint = endpoint(20);
    let config = BrowserConfig {
        debounce_ms: 50,
        ..BrowserConfig::default()
    };
    let browser = browser_with(endpoint.clone(), config);
    browser.mount().await.unwrap();
    endpoint.clear_calls();

    let search = browser.search_box("search").unwrap();
    search.observe("Product 0".to_string());
    tokio::time::sleep(Duration::from_millis(60)).await;
    assert_eq!(page_calls(&endpoint).len(), 1);

    search.observe("Product 05".to_string());
    tokio::time::sleep(Duration::from_millis(60)).await;
    assert_eq!(page_calls(&endpoint).len(), 2);
    assert_eq!(browser.rows().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn dropping_the_box_commits_the_last_value() {
    let endpoint = endpoint(20);
    let browser = browser(endpoint.clone());
    browser.mount().await.unwrap();
    endpoint.clear_calls();

    let search = browser.search_box("search").unwrap();
    search.observe("Product 2".to_string());
    search.flush().await;

    let calls = page_calls(&endpoint);
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].filter("search"), Some("Product 2"));
}

#[tokio::test(start_paused = true)]
async fn clearing_the_box_shows_everything_again() {
    let endpoint = endpoint(20);
    let browser = browser(endpoint.clone());
    browser.mount().await.unwrap();

    let search = browser.search_box("search").unwrap();
    search.observe("Product 1".to_string());
    tokio::time::sleep(Duration::from_millis(600)).await;
    assert_eq!(browser.pagination().total, 10);

    search.observe("   ".to_string());
    tokio::time::sleep(Duration::from_millis(600)).await;
    assert_eq!(browser.pagination().total, 20);
    assert_eq!(page_calls(&endpoint).last().unwrap().filter("search"), None);
}

#[tokio::test]
async fn only_text_facets_get_a_search_box() {
    let browser = browser(endpoint(5));
    assert!(matches!(browser.search_box("status"), Err(BrowserError::Config(_))));
    assert!(matches!(
        browser.search_box("colour"),
        Err(BrowserError::UnknownFacet(_))
    ));
}
