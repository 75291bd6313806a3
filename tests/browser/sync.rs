//! Last-sequence-wins synchronization under out-of-order responses.

use resource_browser::{ApiError, Operation, SortDirection, SyncOutcome};

use crate::support::{browser, endpoint, eventually, ids, settle, GatedEndpoint};

// Price-descending puts product 22 (price 30) first; name-descending puts 30 first.
const TOP_BY_PRICE: u64 = 22;
const TOP_BY_NAME: u64 = 30;

#[tokio::test]
async fn newer_response_wins_when_it_arrives_first() {
    let endpoint = GatedEndpoint::new(endpoint(30));
    let browser = browser(endpoint.clone());
    browser.mount().await.unwrap();
    endpoint.hold();

    let driver = async {
        eventually(|| endpoint.parked() == 2).await;
        endpoint.release(1);
        eventually(|| browser.rows().first().map(|p| p.id) == Some(TOP_BY_PRICE)).await;
        endpoint.release(0);
    };
    let (by_name, by_price, _) =
        tokio::join!(browser.set_sort("name"), browser.set_sort("price"), driver);

    assert_eq!(by_name.unwrap(), SyncOutcome::Superseded);
    assert_eq!(by_price.unwrap(), SyncOutcome::Applied);

    let view = browser.view();
    assert_eq!(view.rows[0].id, TOP_BY_PRICE);
    assert_eq!(view.query.sort.field, "price");
    assert_eq!(view.query.sort.direction, SortDirection::Desc);
    assert!(!view.is_loading);
}

#[tokio::test]
async fn older_response_arriving_last_is_discarded() {
    let endpoint = GatedEndpoint::new(endpoint(30));
    let browser = browser(endpoint.clone());
    browser.mount().await.unwrap();
    endpoint.hold();

    let driver = async {
        eventually(|| endpoint.parked() == 2).await;
        endpoint.release(0);
        endpoint.release(1);
    };
    let (by_name, by_price, _) =
        tokio::join!(browser.set_sort("name"), browser.set_sort("price"), driver);

    assert_eq!(by_name.unwrap(), SyncOutcome::Superseded);
    assert_eq!(by_price.unwrap(), SyncOutcome::Applied);
    assert_eq!(browser.rows()[0].id, TOP_BY_PRICE);
    assert_ne!(browser.rows()[0].id, TOP_BY_NAME);
}

#[tokio::test]
async fn stale_failure_is_not_surfaced() {
    let endpoint = GatedEndpoint::new(endpoint(30));
    let browser = browser(endpoint.clone());
    browser.mount().await.unwrap();
    endpoint.hold();

    let driver = async {
        eventually(|| endpoint.parked() == 2).await;
        endpoint.release(1);
        eventually(|| !browser.is_loading()).await;
        endpoint
            .inner()
            .fail_next(Operation::List, ApiError::Transport("connection reset".into()));
        endpoint.release(0);
    };
    let (by_name, by_price, _) =
        tokio::join!(browser.set_sort("name"), browser.set_sort("price"), driver);

    assert_eq!(by_name.unwrap(), SyncOutcome::Superseded);
    assert_eq!(by_price.unwrap(), SyncOutcome::Applied);
    assert!(browser.error().is_none());
    assert_eq!(browser.rows()[0].id, TOP_BY_PRICE);
}

#[tokio::test]
async fn current_failure_keeps_previous_rows() {
    let endpoint = endpoint(30);
    let browser = browser(endpoint.clone());
    browser.mount().await.unwrap();
    let before = browser.rows();

    endpoint.fail_next(Operation::List, ApiError::Transport("timeout".into()));
    let err = browser.set_page(2).await.unwrap_err();
    assert!(matches!(err, resource_browser::BrowserError::Api(ApiError::Transport(_))));

    let view = browser.view();
    assert_eq!(view.rows, before);
    assert_eq!(view.error, Some(err));
    assert_eq!(view.query.page.number, 2);

    // No automatic retry; the next successful sync clears the error
    browser.refresh().await.unwrap();
    assert!(browser.error().is_none());
    assert_eq!(browser.pagination().current_page, 2);
}

#[tokio::test]
async fn unchanged_request_key_does_not_fetch() {
    let endpoint = endpoint(30);
    let browser = browser(endpoint.clone());
    browser.mount().await.unwrap();
    endpoint.clear_calls();

    assert_eq!(browser.set_filter("status", "all").await.unwrap(), SyncOutcome::Unchanged);
    assert_eq!(browser.set_page(1).await.unwrap(), SyncOutcome::Unchanged);
    assert_eq!(browser.clear_filters().await.unwrap(), SyncOutcome::Unchanged);
    assert!(endpoint.list_calls().is_empty());
}

#[tokio::test]
async fn abandoned_sync_does_not_leave_the_screen_loading() {
    let endpoint = GatedEndpoint::new(endpoint(30));
    let browser = browser(endpoint.clone());
    browser.mount().await.unwrap();
    endpoint.hold();

    tokio::select! {
        biased;
        _ = browser.set_page(2) => panic!("sync resolved while held"),
        _ = eventually(|| endpoint.parked() == 1) => {}
    }
    assert!(!browser.is_loading());
    assert_eq!(browser.query().page.number, 2);

    endpoint.open();
    settle().await;
    assert!(!browser.is_loading());
    assert_eq!(ids(&browser.rows()), (21..=30).rev().collect::<Vec<_>>());

    assert_eq!(browser.refresh().await.unwrap(), SyncOutcome::Applied);
    assert_eq!(browser.pagination().current_page, 2);
    assert_eq!(ids(&browser.rows()), (11..=20).rev().collect::<Vec<_>>());
}
