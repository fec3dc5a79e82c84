//! Tests for the catalog client against a mock listing endpoint.
//!
//! The mock server speaks just enough `ListObjectsV2` to exercise
//! pagination, filtering and failure handling.

use bucket_catalog::{
    CatalogClient, CatalogConfig, CatalogError, CatalogView, ErrorKind, RefetchPolicy,
};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Match, Mock, MockServer, Request, ResponseTemplate};

// =============================================================================
// Helpers
// =============================================================================

/// Matches first-page requests (no continuation token).
struct FirstPage;

impl Match for FirstPage {
    fn matches(&self, request: &Request) -> bool {
        !request
            .url
            .query_pairs()
            .any(|(name, _)| name == "continuation-token")
    }
}

fn listing(keys: &[&str], next_token: Option<&str>, truncated: bool) -> String {
    let mut xml = String::from(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<ListBucketResult xmlns="http://s3.amazonaws.com/doc/2006-03-01/"><Name>music</Name>"#,
    );
    if let Some(token) = next_token {
        xml.push_str(&format!("<NextContinuationToken>{}</NextContinuationToken>", token));
    }
    xml.push_str(&format!("<IsTruncated>{}</IsTruncated>", truncated));
    for key in keys {
        xml.push_str(&format!(
            "<Contents><Key>{}</Key><LastModified>2024-05-01T10:00:00.000Z</LastModified><Size>2048</Size></Contents>",
            key
        ));
    }
    xml.push_str("</ListBucketResult>");
    xml
}

fn xml_response(body: String) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(body, "application/xml")
}

fn client_for(server: &MockServer) -> CatalogClient {
    CatalogClient::new(CatalogConfig::new(server.uri())).unwrap()
}

// =============================================================================
// Pagination Tests
// =============================================================================

mod pagination {
    use super::*;

    #[tokio::test]
    async fn test_two_pages_concatenate_in_order() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/"))
            .and(query_param("list-type", "2"))
            .and(query_param("max-keys", "1000"))
            .and(FirstPage)
            .respond_with(xml_response(listing(
                &["p1/one.mp3", "p1/two.mp3"],
                Some("T1"),
                true,
            )))
            .expect(1)
            .mount(&mock_server)
            .await;

        Mock::given(method("GET"))
            .and(path("/"))
            .and(query_param("continuation-token", "T1"))
            .respond_with(xml_response(listing(
                &["p2/three.mp3", "p2/readme.txt"],
                None,
                false,
            )))
            .expect(1)
            .mount(&mock_server)
            .await;

        let catalog = client_for(&mock_server).fetch_catalog().await.unwrap();

        let keys: Vec<&str> = catalog.iter().map(|f| f.key.as_str()).collect();
        assert_eq!(keys, vec!["p1/one.mp3", "p1/two.mp3", "p2/three.mp3"]);

        let first = catalog.get(0).unwrap();
        assert_eq!(first.file_name, "one.mp3");
        assert_eq!(first.size, Some(2048));
        assert_eq!(first.file_uri, format!("{}/p1%2Fone.mp3", mock_server.uri()));
    }

    #[tokio::test]
    async fn test_single_page_stops_immediately() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(FirstPage)
            .respond_with(xml_response(listing(&["a.mp3"], None, false)))
            .expect(1)
            .mount(&mock_server)
            .await;

        let catalog = client_for(&mock_server).fetch_catalog().await.unwrap();
        assert_eq!(catalog.len(), 1);
    }

    #[tokio::test]
    async fn test_token_is_url_encoded() {
        let mock_server = MockServer::start().await;
        let token = "1ueGcx+LPRx1Tr/XYEx=";

        Mock::given(method("GET"))
            .and(FirstPage)
            .respond_with(xml_response(listing(&[], Some(token), true)))
            .mount(&mock_server)
            .await;

        Mock::given(method("GET"))
            .and(query_param("continuation-token", token))
            .respond_with(xml_response(listing(&["late.mp3"], None, false)))
            .expect(1)
            .mount(&mock_server)
            .await;

        let catalog = client_for(&mock_server).fetch_catalog().await.unwrap();
        assert_eq!(catalog.get(0).unwrap().key, "late.mp3");
    }

    #[tokio::test]
    async fn test_custom_page_size() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(query_param("max-keys", "2"))
            .respond_with(xml_response(listing(&["a.mp3"], None, false)))
            .expect(1)
            .mount(&mock_server)
            .await;

        let mut config = CatalogConfig::new(mock_server.uri());
        config.max_keys = 2;
        let client = CatalogClient::new(config).unwrap();

        assert_eq!(client.fetch_catalog().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_page_cap_aborts_runaway_listing() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(xml_response(listing(&["loop.mp3"], Some("again"), true)))
            .expect(2)
            .mount(&mock_server)
            .await;

        let client =
            CatalogClient::new(CatalogConfig::new(mock_server.uri()).with_max_pages(2)).unwrap();

        match client.fetch_catalog().await {
            Err(CatalogError::PageLimitExceeded { pages }) => assert_eq!(pages, 2),
            other => panic!("Expected PageLimitExceeded, got: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_truncated_without_token_is_rejected() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(xml_response(listing(&["a.mp3"], None, true)))
            .expect(1)
            .mount(&mock_server)
            .await;

        let result = client_for(&mock_server).fetch_catalog().await;
        assert!(matches!(result, Err(CatalogError::Parse(_))));
    }
}

// =============================================================================
// Failure Tests
// =============================================================================

mod failures {
    use super::*;

    #[tokio::test]
    async fn test_http_error_status() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(403).set_body_string("<Error/>"))
            .mount(&mock_server)
            .await;

        let err = client_for(&mock_server).fetch_catalog().await.unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Network);
        match err {
            CatalogError::Status { status, message } => {
                assert_eq!(status, 403);
                assert_eq!(message, "Forbidden");
            }
            e => panic!("Expected Status error, got: {:?}", e),
        }
    }

    #[tokio::test]
    async fn test_failure_on_second_page_discards_first() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(FirstPage)
            .respond_with(xml_response(listing(&["a.mp3", "b.mp3"], Some("T1"), true)))
            .mount(&mock_server)
            .await;

        Mock::given(method("GET"))
            .and(query_param("continuation-token", "T1"))
            .respond_with(ResponseTemplate::new(500))
            .expect(1)
            .mount(&mock_server)
            .await;

        let result = client_for(&mock_server).fetch_catalog().await;

        match result {
            Err(CatalogError::Status { status, .. }) => assert_eq!(status, 500),
            other => panic!("Expected Status error, got: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_malformed_document() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(xml_response("<ListBucketResult><Contents>".to_string()))
            .mount(&mock_server)
            .await;

        let err = client_for(&mock_server).fetch_catalog().await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Parse);
    }

    #[tokio::test]
    async fn test_unreachable_endpoint() {
        let client = CatalogClient::new(CatalogConfig::new("http://127.0.0.1:1")).unwrap();

        let err = client.fetch_catalog().await.unwrap_err();
        assert!(matches!(err, CatalogError::Network(_)));
        assert_eq!(err.kind(), ErrorKind::Network);
    }
}

// =============================================================================
// List View Tests
// =============================================================================

mod view {
    use super::*;

    #[tokio::test]
    async fn test_search_then_clear_refetches() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(xml_response(listing(
                &["Morning Raga.mp3", "Night Blues.mp3", "cover.jpg"],
                None,
                false,
            )))
            .expect(2)
            .mount(&mock_server)
            .await;

        let mut view = CatalogView::new(client_for(&mock_server));

        view.set_query("").await;
        assert_eq!(view.files().len(), 2);

        view.set_query("blues").await;
        assert_eq!(view.files().len(), 1);
        assert_eq!(view.files().get(0).unwrap().file_name, "Night Blues.mp3");

        view.set_query("").await;
        assert_eq!(view.files().len(), 2);
    }

    #[tokio::test]
    async fn test_cached_policy_fetches_once() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(xml_response(listing(&["a.mp3", "b.mp3"], None, false)))
            .expect(1)
            .mount(&mock_server)
            .await;

        let mut view = CatalogView::with_policy(client_for(&mock_server), RefetchPolicy::Cached);

        view.set_query("").await;
        view.set_query("a").await;
        view.set_query("").await;

        assert_eq!(view.files().len(), 2);
    }

    #[tokio::test]
    async fn test_error_is_surfaced_once() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&mock_server)
            .await;

        let mut view = CatalogView::new(client_for(&mock_server));
        view.set_query("").await;

        assert!(view.files().is_empty());
        assert!(!view.is_loading());
        assert!(view.error().unwrap().contains("Not Found"));
    }
}
