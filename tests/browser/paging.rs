//! Server pagination and the page-reset rule.

use resource_browser::{BrowserError, SortDirection, SyncOutcome};

use crate::support::{browser, endpoint, ids, page_calls};

#[tokio::test]
async fn last_page_of_47_rows_shows_7() {
    let endpoint = endpoint(47);
    let browser = browser(endpoint.clone());
    browser.mount().await.unwrap();

    let first = browser.pagination();
    assert_eq!(first.total, 47);
    assert_eq!(first.last_page, 5);
    assert_eq!((first.from, first.to), (Some(1), Some(10)));
    assert_eq!(ids(&browser.rows())[..3], [47, 46, 45]);

    browser.set_page(5).await.unwrap();
    let view = browser.view();
    assert_eq!(view.rows.len(), 7);
    assert_eq!(view.pagination.current_page, 5);
    assert_eq!((view.pagination.from, view.pagination.to), (Some(41), Some(47)));
    assert!(!view.pagination.has_next());
    assert!(view.pagination.has_previous());
}

#[tokio::test]
async fn filter_change_resets_to_first_page() {
    let endpoint = endpoint(47);
    let browser = browser(endpoint.clone());
    browser.mount().await.unwrap();
    browser.set_page(4).await.unwrap();

    browser.set_filter("status", "active").await.unwrap();

    let view = browser.view();
    assert_eq!(view.query.page.number, 1);
    assert_eq!(view.pagination.current_page, 1);
    assert_eq!(view.pagination.total, 32);
    assert_eq!(view.pagination.last_page, 4);
    assert!(view.rows.iter().all(|p| p.status == "active"));

    let last = page_calls(&endpoint).pop().unwrap();
    assert_eq!(last.page, 1);
    assert_eq!(last.filter("status"), Some("active"));
}

#[tokio::test]
async fn sort_and_page_size_changes_reset_to_first_page() {
    let endpoint = endpoint(47);
    let browser = browser(endpoint.clone());
    browser.mount().await.unwrap();

    browser.set_page(3).await.unwrap();
    browser.sort_by("name", SortDirection::Asc).await.unwrap();
    assert_eq!(browser.query().page.number, 1);
    assert_eq!(browser.rows()[0].name, "Product 01");

    browser.set_page(2).await.unwrap();
    browser.set_page_size(25).await.unwrap();
    let view = browser.view();
    assert_eq!(view.query.page.number, 1);
    assert_eq!(view.pagination.per_page, 25);
    assert_eq!(view.rows.len(), 25);
    assert_eq!(view.pagination.last_page, 2);
}

#[tokio::test]
async fn header_click_toggles_direction() {
    let endpoint = endpoint(20);
    let browser = browser(endpoint.clone());
    browser.mount().await.unwrap();

    browser.set_sort("name").await.unwrap();
    assert_eq!(browser.query().sort.direction, SortDirection::Desc);
    assert_eq!(browser.rows()[0].name, "Product 20");

    browser.set_sort("name").await.unwrap();
    assert_eq!(browser.query().sort.direction, SortDirection::Asc);
    assert_eq!(browser.rows()[0].name, "Product 01");

    let last = page_calls(&endpoint).pop().unwrap();
    assert_eq!(last.sort_field, "name");
    assert_eq!(last.sort_order, SortDirection::Asc);
}

#[tokio::test]
async fn invalid_inputs_are_rejected_without_fetching() {
    let endpoint = endpoint(20);
    let browser = browser(endpoint.clone());
    browser.mount().await.unwrap();
    endpoint.clear_calls();

    assert_eq!(
        browser.set_filter("colour", "red").await.unwrap_err(),
        BrowserError::UnknownFacet("colour".into())
    );
    assert!(matches!(
        browser.set_filter("status", "archived").await.unwrap_err(),
        BrowserError::InvalidFacetValue { .. }
    ));
    assert_eq!(
        browser.set_sort("status").await.unwrap_err(),
        BrowserError::UnsortableField("status".into())
    );
    assert_eq!(browser.set_page(0).await.unwrap_err(), BrowserError::InvalidPage(0));
    assert_eq!(
        browser.set_page_size(30).await.unwrap_err(),
        BrowserError::InvalidPageSize(30)
    );

    assert!(endpoint.list_calls().is_empty());
    assert_eq!(browser.query().page.number, 1);
}

#[tokio::test]
async fn page_beyond_the_end_is_server_authoritative() {
    let endpoint = endpoint(12);
    let browser = browser(endpoint.clone());
    browser.mount().await.unwrap();

    assert_eq!(browser.set_page(9).await.unwrap(), SyncOutcome::Applied);
    let view = browser.view();
    assert!(view.rows.is_empty());
    assert_eq!(view.pagination.last_page, 2);
    assert_eq!(view.pagination.from, None);
}

#[tokio::test]
async fn deleting_on_the_last_page_keeps_the_page() {
    let endpoint = endpoint(47);
    let browser = browser(endpoint.clone());
    browser.mount().await.unwrap();
    browser.set_page(5).await.unwrap();
    let doomed = browser.rows()[0].id;

    browser
        .remove(browser.request_delete(doomed).confirm())
        .await
        .unwrap();

    let view = browser.view();
    assert_eq!(view.pagination.total, 46);
    assert_eq!(view.pagination.last_page, 5);
    assert_eq!(view.pagination.current_page, 5);
    assert_eq!(view.rows.len(), 6);
    assert!(!ids(&view.rows).contains(&doomed));
}
