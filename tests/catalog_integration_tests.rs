use folio::catalog::lookup::{load_book, search_books};
use folio::catalog::{Catalog, CatalogError, Covers, OpenLibraryCatalog, SearchQuery};
use serde_json::json;
use tokio_test::{assert_err, assert_ok};
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path, query_param},
};

// ============================================================================
// Helper Functions
// ============================================================================

fn covers() -> Covers {
    Covers {
        base_url: "https://covers.test".to_string(),
        placeholder_url: "https://covers.test/placeholder.png".to_string(),
    }
}

async fn mount_json(server: &MockServer, route: &str, body: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

async fn mount_status(server: &MockServer, route: &str, status: u16) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(status).set_body_string("upstream says no"))
        .mount(server)
        .await;
}

fn catalog(server: &MockServer) -> OpenLibraryCatalog {
    OpenLibraryCatalog::new(Some(server.uri()))
}

// ============================================================================
// Search
// ============================================================================

#[tokio::test]
async fn test_search_sends_title_limit_and_offset() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search.json"))
        .and(query_param("title", "dune"))
        .and(query_param("limit", "6"))
        .and(query_param("offset", "6"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "numFound": 13,
            "docs": [
                {"key": "/works/OL893415W", "title": "Dune", "author_name": ["Frank Herbert"], "cover_i": 11481354},
                {"key": "/works/OL2W", "title": "Dune Messiah", "cover_i": 7},
                {"key": "/works/OL3W", "title": "Coverless Dune"}
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let page = assert_ok!(search_books(&catalog(&server), "dune", 2, 6, &covers()).await);

    assert_eq!(page.num_found, 13);
    assert_eq!(page.total_pages, 3);
    assert_eq!(page.hidden_without_cover, 1);
    assert_eq!(page.books.len(), 2);

    let dune = &page.books[0];
    assert_eq!(dune.id, "OL893415W");
    assert_eq!(dune.author, "Frank Herbert");
    assert_eq!(
        dune.cover_url.as_deref(),
        Some("https://covers.test/b/id/11481354-M.jpg")
    );
    assert_eq!(page.books[1].author, "Unknown Author");
}

#[tokio::test]
async fn test_empty_term_makes_no_request() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search.json"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let page = assert_ok!(search_books(&catalog(&server), "", 1, 6, &covers()).await);
    assert!(page.books.is_empty());
    assert_eq!(page.total_pages, 0);
}

#[tokio::test]
async fn test_search_server_error_is_api_error() {
    let server = MockServer::start().await;
    mount_status(&server, "/search.json", 500).await;

    let err = assert_err!(search_books(&catalog(&server), "dune", 1, 6, &covers()).await);
    match err {
        CatalogError::Api { status, message } => {
            assert_eq!(status, 500);
            assert_eq!(message, "upstream says no");
        }
        other => panic!("expected Api error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_search_malformed_body_is_parse_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search.json"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let query = SearchQuery {
        title: "dune",
        limit: 6,
        offset: 0,
    };
    let err = assert_err!(catalog(&server).search(query).await);
    assert!(matches!(err, CatalogError::Parse(_)));
}

#[tokio::test]
async fn test_unreachable_catalog_is_network_error() {
    // Nothing listens on port 9 of localhost
    let catalog = OpenLibraryCatalog::new(Some("http://127.0.0.1:9".to_string()));
    let err = assert_err!(catalog.work("OL1W").await);
    assert!(matches!(err, CatalogError::Network(_)));
}

// ============================================================================
// Work and author lookups
// ============================================================================

#[tokio::test]
async fn test_load_book_with_author() {
    let server = MockServer::start().await;
    mount_json(
        &server,
        "/works/OL893415W.json",
        json!({
            "title": "Dune",
            "authors": [{"author": {"key": "/authors/OL79034A"}}],
            "covers": [11481354],
            "first_publish_date": "1965",
            "subjects": ["Science fiction", "Deserts"],
            "number_of_pages_median": 604
        }),
    )
    .await;
    mount_json(
        &server,
        "/authors/OL79034A.json",
        json!({
            "name": "Frank Herbert",
            "birth_date": "8 October 1920",
            "death_date": "11 February 1986",
            "bio": "American science fiction author."
        }),
    )
    .await;

    let detail = assert_ok!(load_book(&catalog(&server), "/works/OL893415W").await);

    assert_eq!(detail.id, "OL893415W");
    assert_eq!(detail.author_name(), Some("Frank Herbert"));
    assert_eq!(
        detail.cover_url(&covers()),
        "https://covers.test/b/id/11481354-L.jpg"
    );
    assert_eq!(detail.work.number_of_pages_median, Some(604));
    let author = detail.author.as_ref().unwrap();
    assert_eq!(author.biography(), "American science fiction author.");

    let summary = detail.summary(&covers());
    assert_eq!(summary.author, "Frank Herbert");
}

#[tokio::test]
async fn test_author_failure_is_swallowed() {
    let server = MockServer::start().await;
    mount_json(
        &server,
        "/works/OL1W.json",
        json!({
            "title": "Orphan",
            "authors": [{"author": {"key": "/authors/OL1A", "name": "Embedded Name"}}]
        }),
    )
    .await;
    mount_status(&server, "/authors/OL1A.json", 500).await;

    let detail = assert_ok!(load_book(&catalog(&server), "OL1W").await);
    assert!(detail.author.is_none());
    assert_eq!(detail.author_name(), Some("Embedded Name"));
}

#[tokio::test]
async fn test_missing_work_is_not_found() {
    let server = MockServer::start().await;
    mount_status(&server, "/works/OL0W.json", 404).await;

    let err = assert_err!(load_book(&catalog(&server), "OL0W").await);
    assert!(err.is_not_found());
}

#[tokio::test]
async fn test_typed_description_renders_value() {
    let server = MockServer::start().await;
    mount_json(
        &server,
        "/works/OL5W.json",
        json!({
            "title": "Typed",
            "description": {"type": "/type/text", "value": "A desert planet."}
        }),
    )
    .await;

    let detail = assert_ok!(load_book(&catalog(&server), "OL5W").await);
    assert_eq!(detail.description(), "A desert planet.");
}

#[tokio::test]
async fn test_work_without_covers_uses_placeholder() {
    let server = MockServer::start().await;
    mount_json(&server, "/works/OL123W.json", json!({"title": "Bare"})).await;

    let detail = assert_ok!(load_book(&catalog(&server), "OL123W").await);
    assert_eq!(
        detail.cover_url(&covers()),
        "https://covers.test/placeholder.png"
    );
    assert_eq!(detail.author_name(), None);
    assert_eq!(detail.summary(&covers()).author, "Unknown Author");
}
