//! Integration tests for the HTTP catalog client against a local mock
//! service.

#![allow(clippy::unwrap_used)]

use std::time::Duration;

use serde_json::json;
use shopmall_core::ProductId;
use shopmall_integration_tests::MockCatalogServer;
use shopmall_store::{CatalogCoordinator, CatalogError, HttpCatalogClient, Store, selectors};

fn products_json() -> serde_json::Value {
    json!([
        {
            "id": 1,
            "title": "Fjallraven Backpack",
            "price": 109.95,
            "description": "Your perfect pack for everyday use",
            "category": "men's clothing",
            "image": "https://fakestoreapi.com/img/81fPKd-2AYL._AC_SL1500_.jpg",
            "rating": { "rate": 3.9, "count": 120 }
        },
        {
            "id": 5,
            "title": "Dragon Station Chain Bracelet",
            "price": 695,
            "description": "From our Legends Collection",
            "category": "jewelery",
            "image": "https://fakestoreapi.com/img/71pWzhdJNwL._AC_UL640_QL65_ML3_.jpg",
            "rating": { "rate": 4.6, "count": 400 }
        }
    ])
}

#[tokio::test]
async fn test_coordinator_loads_from_service() {
    let server = MockCatalogServer::start().await.unwrap();
    server.respond_json("/products", &products_json());
    server.respond_json("/products/categories", &json!(["jewelery", "men's clothing"]));

    let client = HttpCatalogClient::new(&server.config(Duration::ZERO)).unwrap();
    let catalog = CatalogCoordinator::new(Store::new(), client);
    catalog.load_all().await;

    let state = catalog.store().state();
    assert_eq!(state.catalog.products().len(), 2);
    assert_eq!(state.catalog.categories(), ["jewelery", "men's clothing"]);
    assert_eq!(selectors::catalog_error(&state), None);

    catalog.select_category("jewelery");
    let visible = catalog.visible_products();
    assert_eq!(visible.len(), 1);
    assert_eq!(visible[0].price.display(), "$695.00");
}

#[tokio::test]
async fn test_non_success_status_is_failure() {
    let server = MockCatalogServer::start().await.unwrap();
    server.respond("/products", 500, "upstream exploded");

    let client = HttpCatalogClient::new(&server.config(Duration::ZERO)).unwrap();
    let err = client.get_products().await.unwrap_err();
    assert!(matches!(err, CatalogError::Status { status: 500, .. }));

    let catalog = CatalogCoordinator::new(Store::new(), client);
    let before = catalog.visible_products();
    catalog.load_catalog().await;
    assert_eq!(catalog.visible_products(), before);
    assert!(
        catalog
            .store()
            .state()
            .catalog
            .products_status()
            .error()
            .unwrap()
            .contains("500")
    );
}

#[tokio::test]
async fn test_malformed_body_is_parse_failure() {
    let server = MockCatalogServer::start().await.unwrap();
    server.respond("/products", 200, r#"{"not":"a list"}"#);

    let client = HttpCatalogClient::new(&server.config(Duration::ZERO)).unwrap();
    assert!(matches!(
        client.get_products().await,
        Err(CatalogError::Parse(_))
    ));
}

#[tokio::test]
async fn test_successes_are_cached_failures_are_not() {
    let server = MockCatalogServer::start().await.unwrap();
    server.respond("/products/categories", 503, "");

    let client = HttpCatalogClient::new(&server.config(Duration::from_secs(60))).unwrap();
    assert!(client.get_categories().await.is_err());
    assert!(client.get_categories().await.is_err());
    assert_eq!(server.hits("/products/categories"), 2);

    server.respond_json("/products/categories", &json!(["electronics"]));
    assert_eq!(client.get_categories().await.unwrap(), ["electronics"]);
    assert_eq!(client.get_categories().await.unwrap(), ["electronics"]);
    assert_eq!(server.hits("/products/categories"), 3);

    client.invalidate_all();
    client.get_categories().await.unwrap();
    assert_eq!(server.hits("/products/categories"), 4);
}

#[tokio::test]
async fn test_product_detail_and_not_found() {
    let server = MockCatalogServer::start().await.unwrap();
    server.respond_json("/products/5", &products_json()[1]);
    // The public service answers unknown ids with an empty 200.
    server.respond("/products/99", 200, "");

    let client = HttpCatalogClient::new(&server.config(Duration::ZERO)).unwrap();
    let product = client.get_product(ProductId::new(5)).await.unwrap();
    assert_eq!(product.title, "Dragon Station Chain Bracelet");
    assert_eq!(product.rating.count, 400);

    assert!(matches!(
        client.get_product(ProductId::new(99)).await,
        Err(CatalogError::NotFound(id)) if id == ProductId::new(99)
    ));
    // Unrouted paths answer 404.
    assert!(matches!(
        client.get_product(ProductId::new(404)).await,
        Err(CatalogError::NotFound(_))
    ));
}
