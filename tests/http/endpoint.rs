//! HttpEndpoint against a live server.

use resource_browser::{
    ApiError, HttpEndpoint, ListParams, ResourceEndpoint, ResourceId, ResourceSchema,
    SortDirection,
};
use serde_json::json;

use crate::server::{start_server, store, Product};

fn schema() -> ResourceSchema {
    ResourceSchema::for_resource::<Product>()
        .text_facet("search")
        .choice_facet("status", ["active", "inactive"])
        .sortable("name")
}

#[tokio::test]
async fn lists_with_query_parameters() {
    let base = start_server(store(25)).await;
    let endpoint: HttpEndpoint<Product> = HttpEndpoint::new(base);

    let mut params = ListParams::unfiltered(&schema(), 10);
    params.page = 3;
    params.sort_order = SortDirection::Asc;
    params.filters.insert("status".into(), "active".into());

    let page = endpoint.list(&params).await.unwrap();
    assert_eq!(page.pagination.total, 17);
    assert_eq!(page.pagination.last_page, 2);
    assert!(page.rows.is_empty());

    params.page = 2;
    let page = endpoint.list(&params).await.unwrap();
    assert_eq!(page.rows.len(), 7);
    assert!(page.rows.iter().all(|p| p.status == "active"));
}

#[tokio::test]
async fn created_rows_are_unwrapped_from_data() {
    let base = start_server(store(2)).await;
    let endpoint: HttpEndpoint<Product> = HttpEndpoint::new(base);

    let row = endpoint
        .create(&json!({ "id": 3, "name": "Scarf", "status": "active", "price": 12.5 }))
        .await
        .unwrap();
    assert_eq!(row.id, 3);
    assert_eq!(row.name, "Scarf");
}

#[tokio::test]
async fn validation_bodies_are_normalized() {
    let base = start_server(store(2)).await;
    let endpoint: HttpEndpoint<Product> = HttpEndpoint::new(base);

    let err = endpoint
        .update(&ResourceId::from(1u64), &json!({ "name": "" }))
        .await
        .unwrap_err();
    let ApiError::Validation(errors) = err else {
        panic!("expected a validation error, got {err:?}");
    };
    assert_eq!(errors.message.as_deref(), Some("The given data was invalid."));
    assert_eq!(errors.field("name"), ["The name field is required."]);
}

#[tokio::test]
async fn missing_rows_are_not_found() {
    let base = start_server(store(2)).await;
    let endpoint: HttpEndpoint<Product> = HttpEndpoint::new(base);

    let err = endpoint.delete(&ResourceId::from(99u64)).await.unwrap_err();
    assert!(matches!(err, ApiError::NotFound(_)));
}

#[tokio::test]
async fn server_errors_are_transport_failures() {
    let base = start_server(store(1)).await;
    let endpoint: HttpEndpoint<Product> = HttpEndpoint::new(base).path("/broken/");

    let err = endpoint
        .list(&ListParams::unfiltered(&schema(), 10))
        .await
        .unwrap_err();
    assert_eq!(err, ApiError::Transport("status 500: upstream exploded".into()));
}

#[tokio::test]
async fn unreachable_server_is_a_transport_failure() {
    let endpoint: HttpEndpoint<Product> = HttpEndpoint::new("http://127.0.0.1:1");
    let err = endpoint
        .list(&ListParams::unfiltered(&schema(), 10))
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Transport(_)));
}
