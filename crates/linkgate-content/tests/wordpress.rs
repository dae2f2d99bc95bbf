//! WordPress source tests against a mock server.

use linkgate_content::{ContentConfig, ContentError, ContentSource, WordPressSource};
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn source_for(server: &MockServer) -> WordPressSource {
    WordPressSource::new(&ContentConfig {
        base_url: format!("{}/wp-json/wp/v2/", server.uri()),
        per_page: 15,
        timeout_secs: 5,
    })
    .unwrap()
}

#[tokio::test]
async fn test_search_maps_posts_to_cleaned_items() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/wp-json/wp/v2/posts"))
        .and(query_param("search", "fast & furious"))
        .and(query_param("per_page", "15"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "id": 7, "title": { "rendered": "Download Fast &amp; Furious Full Movie" } },
            { "id": 8 }
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let items = source_for(&server).search("fast & furious").await.unwrap();

    assert_eq!(items.len(), 2);
    assert_eq!(items[0].id, "7");
    assert_eq!(items[0].title, "Fast & Furious");
    assert_eq!(items[1].title, "Untitled Asset");
}

#[tokio::test]
async fn test_search_server_error_returns_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/wp-json/wp/v2/posts"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let result = source_for(&server).search("anything").await;

    assert!(matches!(result, Err(ContentError::Status(503))));
}

#[tokio::test]
async fn test_search_malformed_body_is_request_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/wp-json/wp/v2/posts"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let result = source_for(&server).search("anything").await;

    assert!(matches!(result, Err(ContentError::Request(_))));
}

#[tokio::test]
async fn test_fetch_returns_title_and_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/wp-json/wp/v2/posts/42"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 42,
            "title": { "rendered": "Heat (1995) Download" },
            "content": { "rendered": "<a href=\"https://fastdl.lol/x\">x</a>" }
        })))
        .mount(&server)
        .await;

    let item = source_for(&server).fetch("42").await.unwrap().unwrap();

    assert_eq!(item.id, "42");
    assert_eq!(item.title, "Heat (1995)");
    assert!(item.body.contains("https://fastdl.lol/x"));
}

#[tokio::test]
async fn test_fetch_missing_post_returns_none() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/wp-json/wp/v2/posts/404"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    assert!(source_for(&server).fetch("404").await.unwrap().is_none());
}

#[tokio::test]
async fn test_fetch_post_without_content_has_empty_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/wp-json/wp/v2/posts/5"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": 5 })))
        .mount(&server)
        .await;

    let item = source_for(&server).fetch("5").await.unwrap().unwrap();

    assert_eq!(item.title, "Untitled Asset");
    assert!(item.body.is_empty());
}

#[tokio::test]
async fn test_fetch_unreachable_source_is_request_error() {
    let source = WordPressSource::new(&ContentConfig {
        base_url: "http://127.0.0.1:9".into(),
        per_page: 15,
        timeout_secs: 1,
    })
    .unwrap();

    assert!(matches!(source.fetch("1").await, Err(ContentError::Request(_))));
}
