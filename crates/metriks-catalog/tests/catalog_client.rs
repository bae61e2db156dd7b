//! Integration tests for `CatalogClient`.
//!
//! Uses `wiremock` to stand up a local HTTP server for each test so no
//! real network traffic is made.

use metriks_catalog::{CatalogClient, CatalogError, CatalogService};
use metriks_core::{Coordinates, ErrorKind, SearchMode, SearchQuery};
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Builds a `CatalogClient` against the mock server: 5-second timeout, descriptive UA.
fn test_client(server: &MockServer) -> CatalogClient {
    CatalogClient::new(&server.uri(), "pharma", 5, "metriks-test/0.1")
        .expect("failed to build test CatalogClient")
}

fn product_json(id: &str) -> serde_json::Value {
    json!({
        "id": id,
        "name": format!("Product {id}"),
        "retailerLabel": "Super-Pharm",
        "unitPrice": "19.90",
        "imageRef": format!("https://cdn.example.com/{id}.png")
    })
}

// ---------------------------------------------------------------------------
// Happy paths
// ---------------------------------------------------------------------------

#[tokio::test]
async fn fetch_page_sends_query_parameters_and_parses_wrapped_body() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search/pharma"))
        .and(query_param("q", "advil"))
        .and(query_param("page", "1"))
        .and(query_param("limit", "2"))
        .and(query_param("searchType", "catalog"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "products": [product_json("a"), product_json("b")]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let query = SearchQuery::first_page("advil", 2, SearchMode::Catalog);
    let page = test_client(&server).fetch_page(&query).await.unwrap();

    assert_eq!(page.page, 1);
    assert_eq!(page.items.len(), 2);
    assert_eq!(page.items[0].id, "a");
    assert_eq!(page.items[0].retailer_label, "Super-Pharm");
    assert!(!page.is_final_page, "a full page should not be final");
}

#[tokio::test]
async fn fetch_page_accepts_bare_array_and_marks_short_page_final() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search/pharma"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([product_json("a")])))
        .mount(&server)
        .await;

    let query = SearchQuery::first_page("advil", 20, SearchMode::Catalog);
    let page = test_client(&server).fetch_page(&query).await.unwrap();

    assert_eq!(page.items.len(), 1);
    assert!(page.is_final_page);
}

#[tokio::test]
async fn fetch_page_counts_dropped_entries_toward_page_size() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search/pharma"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "products": [product_json("a"), {"name": "no identifier"}]
        })))
        .mount(&server)
        .await;

    let query = SearchQuery::first_page("advil", 2, SearchMode::Catalog);
    let page = test_client(&server).fetch_page(&query).await.unwrap();

    assert_eq!(page.items.len(), 1);
    assert!(
        !page.is_final_page,
        "server sent a full page even though one entry was unusable"
    );
}

#[tokio::test]
async fn fetch_page_normalizes_legacy_fields() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search/pharma"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "products": [{
                "masterproductid": 4021,
                "productname": "Acamol",
                "storename": "Be Pharm",
                "price": 12.5,
                "image_url": "/relative.png"
            }]
        })))
        .mount(&server)
        .await;

    let query = SearchQuery::first_page("acamol", 20, SearchMode::Catalog);
    let page = test_client(&server).fetch_page(&query).await.unwrap();
    let item = &page.items[0];

    assert_eq!(item.id, "4021");
    assert_eq!(item.name, "Acamol");
    assert_eq!(item.retailer_label, "Be Pharm");
    assert!(item.is_priced());
    assert!(item.has_placeholder_image());
}

#[tokio::test]
async fn fetch_page_nearby_sends_coordinates() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search/pharma"))
        .and(query_param("searchType", "nearby"))
        .and(query_param("latitude", "32.08"))
        .and(query_param("longitude", "34.78"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "products": [{"id": "n1", "name": "Nearby", "distance_km": 0.8}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let coords = Coordinates::new(32.08, 34.78).unwrap();
    let query = SearchQuery::first_page("advil", 20, SearchMode::Nearby(coords));
    let page = test_client(&server).fetch_page(&query).await.unwrap();

    assert_eq!(page.items[0].distance_km, Some(0.8));
}

// ---------------------------------------------------------------------------
// Error paths
// ---------------------------------------------------------------------------

#[tokio::test]
async fn fetch_page_server_error_with_message() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search/pharma"))
        .respond_with(
            ResponseTemplate::new(500).set_body_json(json!({"error": "search index offline"})),
        )
        .mount(&server)
        .await;

    let query = SearchQuery::first_page("advil", 20, SearchMode::Catalog);
    let err = test_client(&server).fetch_page(&query).await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::NetworkFailure);
    match err {
        CatalogError::Server { status, message } => {
            assert_eq!(status, 500);
            assert_eq!(message, "search index offline");
        }
        other => panic!("expected Server, got: {other:?}"),
    }
}

#[tokio::test]
async fn fetch_page_error_status_without_message() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search/pharma"))
        .respond_with(ResponseTemplate::new(502).set_body_string("<html>Bad Gateway</html>"))
        .mount(&server)
        .await;

    let query = SearchQuery::first_page("advil", 20, SearchMode::Catalog);
    let err = test_client(&server).fetch_page(&query).await.unwrap_err();

    assert!(
        matches!(err, CatalogError::UnexpectedStatus { status: 502, .. }),
        "expected UnexpectedStatus, got: {err:?}"
    );
    assert_eq!(err.kind(), ErrorKind::MalformedResponse);
}

#[tokio::test]
async fn fetch_page_invalid_json_is_malformed() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search/pharma"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let query = SearchQuery::first_page("advil", 20, SearchMode::Catalog);
    let err = test_client(&server).fetch_page(&query).await.unwrap_err();

    assert!(matches!(err, CatalogError::Deserialize { .. }));
    assert_eq!(err.kind(), ErrorKind::MalformedResponse);
}

#[tokio::test]
async fn fetch_page_unexpected_shape_is_malformed() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search/pharma"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"results": []})))
        .mount(&server)
        .await;

    let query = SearchQuery::first_page("advil", 20, SearchMode::Catalog);
    let err = test_client(&server).fetch_page(&query).await.unwrap_err();

    assert!(matches!(err, CatalogError::UnexpectedShape { .. }));
    assert_eq!(err.kind(), ErrorKind::MalformedResponse);
}

#[tokio::test]
async fn fetch_page_slow_server_times_out() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search/pharma"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"products": []}))
                .set_delay(std::time::Duration::from_secs(3)),
        )
        .mount(&server)
        .await;

    let client = CatalogClient::new(&server.uri(), "pharma", 1, "metriks-test/0.1").unwrap();
    let query = SearchQuery::first_page("advil", 20, SearchMode::Catalog);
    let err = client.fetch_page(&query).await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Timeout, "got: {err:?}");
}
