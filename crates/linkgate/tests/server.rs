//! HTTP boundary tests, driven through the router with `oneshot`.

use std::sync::Arc;

use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode, header};
use axum::response::Response;
use linkgate::prelude::*;
use serde_json::{Value, json};
use tower::ServiceExt;

const ACCESS_KEY: &str = "letmein";

/// Serves post `"7"` with one trusted link. Search echoes the query.
#[derive(Clone)]
struct StubContent;

impl ContentSource for StubContent {
    async fn search(&self, query: &str) -> Result<Vec<ContentItem>, ContentError> {
        Ok(vec![ContentItem {
            id: "7".into(),
            title: query.to_string(),
        }])
    }

    async fn fetch(&self, id: &str) -> Result<Option<RawContent>, ContentError> {
        Ok((id == "7").then(|| RawContent {
            id: "7".into(),
            title: "Heat (1995)".into(),
            body: r#"<a href="https://fastdl.lol/dl/heat">dl</a>"#.into(),
        }))
    }
}

type TestGateway = Arc<Gateway<StaticKeyAuthenticator, StubContent>>;

fn gateway() -> TestGateway {
    let gateway = Gateway::<StaticKeyAuthenticator, StubContent>::builder()
        .build(
            MemoryStore::new(),
            StaticKeyAuthenticator::new([ACCESS_KEY]),
            StubContent,
        )
        .expect("gateway should build");
    Arc::new(gateway)
}

async fn send(gateway: &TestGateway, request: Request<Body>) -> Response {
    router(Arc::clone(gateway)).oneshot(request).await.unwrap()
}

async fn json_body(response: Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn post_json(uri: &str, token: Option<&str>, body: Value) -> Request<Body> {
    let mut builder = Request::post(uri).header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, token);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

async fn init_token(gateway: &TestGateway) -> String {
    let response = send(gateway, Request::get("/api/init").body(Body::empty()).unwrap()).await;
    json_body(response).await["token"].as_str().unwrap().to_string()
}

async fn first_link(gateway: &TestGateway, token: &str) -> String {
    let request = Request::get("/api/post?id=7")
        .header(header::AUTHORIZATION, token)
        .body(Body::empty())
        .unwrap();
    let body = json_body(send(gateway, request).await).await;
    body["data"]["links"][0]["id"].as_str().unwrap().to_string()
}

// =========================================================================
// Sessions
// =========================================================================

#[tokio::test]
async fn test_init_returns_token_and_expiry() {
    let gateway = gateway();
    let request = Request::get("/api/init")
        .header(header::USER_AGENT, "test-browser")
        .body(Body::empty())
        .unwrap();

    let response = send(&gateway, request).await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["success"], true);
    assert!(!body["token"].as_str().unwrap().is_empty());
    assert!(body["expiresAt"].as_u64().unwrap() > 0);
}

#[tokio::test]
async fn test_auth_valid_key_returns_session() {
    let gateway = gateway();

    let response = send(&gateway, post_json("/api/auth", None, json!({ "key": ACCESS_KEY }))).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await["success"], true);
}

#[tokio::test]
async fn test_auth_wrong_key_is_401_with_error_body() {
    let gateway = gateway();

    let response = send(&gateway, post_json("/api/auth", None, json!({ "key": "nope" }))).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(
        json_body(response).await,
        json!({ "success": false, "error": "access denied" })
    );
}

#[tokio::test]
async fn test_auth_malformed_body_is_400() {
    let gateway = gateway();
    let request = Request::post("/api/auth")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();

    let response = send(&gateway, request).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json_body(response).await["success"], false);
}

// =========================================================================
// Search and detail
// =========================================================================

#[tokio::test]
async fn test_search_without_authorization_is_401() {
    let gateway = gateway();

    let response = send(&gateway, post_json("/api/search", None, json!({ "payload": "x" }))).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_search_with_bearer_token_returns_results() {
    let gateway = gateway();
    let token = init_token(&gateway).await;
    let payload = gateway
        .cipher()
        .encrypt(&SessionToken::new(token.clone()), "heat")
        .unwrap();

    let response = send(
        &gateway,
        post_json("/api/search", Some(&format!("Bearer {token}")), json!({ "payload": payload })),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["results"], json!([{ "id": "7", "title": "heat" }]));
}

#[tokio::test]
async fn test_post_missing_id_is_400() {
    let gateway = gateway();
    let token = init_token(&gateway).await;
    let request = Request::get("/api/post")
        .header(header::AUTHORIZATION, token)
        .body(Body::empty())
        .unwrap();

    let response = send(&gateway, request).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_post_returns_opaque_links() {
    let gateway = gateway();
    let token = init_token(&gateway).await;
    let request = Request::get("/api/post?id=7")
        .header(header::AUTHORIZATION, &token)
        .body(Body::empty())
        .unwrap();

    let response = send(&gateway, request).await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["data"]["title"], "Heat (1995)");
    assert_eq!(body["data"]["postId"], "7");
    assert_eq!(body["data"]["links"][0]["label"], "Fast DL");
    assert!(!body.to_string().contains("fastdl.lol"));
}

#[tokio::test]
async fn test_post_unknown_id_is_404() {
    let gateway = gateway();
    let token = init_token(&gateway).await;
    let request = Request::get("/api/post?id=404")
        .header(header::AUTHORIZATION, token)
        .body(Body::empty())
        .unwrap();

    let response = send(&gateway, request).await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// =========================================================================
// Resolve
// =========================================================================

#[tokio::test]
async fn test_resolve_post_returns_delivery_url_once() {
    let gateway = gateway();
    let token = init_token(&gateway).await;
    let id = first_link(&gateway, &token).await;

    let response = send(&gateway, post_json("/api/resolve", Some(&token), json!({ "id": id }))).await;
    assert_eq!(response.status(), StatusCode::OK);
    let url = json_body(response).await["url"].as_str().unwrap().to_string();
    assert!(url.ends_with("?url=https%3A%2F%2Ffastdl.lol%2Fdl%2Fheat"));

    let response = send(&gateway, post_json("/api/resolve", Some(&token), json!({ "id": id }))).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_resolve_get_redirects_then_404() {
    let gateway = gateway();
    let token = init_token(&gateway).await;
    let id = first_link(&gateway, &token).await;
    let uri = format!("/api/resolve/{id}?token={token}");

    let response = send(&gateway, Request::get(&uri).body(Body::empty()).unwrap()).await;
    assert_eq!(response.status(), StatusCode::FOUND);
    let location = response.headers()[header::LOCATION].to_str().unwrap();
    assert!(location.starts_with("https://vclzipfast."));

    let response = send(&gateway, Request::get(&uri).body(Body::empty()).unwrap()).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert_eq!(&bytes[..], b"link not found or already used");
}

#[tokio::test]
async fn test_resolve_get_without_token_is_plain_401() {
    let gateway = gateway();

    let response = send(&gateway, Request::get("/api/resolve/abc").body(Body::empty()).unwrap()).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert_eq!(&bytes[..], b"access denied");
}
