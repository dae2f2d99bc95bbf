//! HTTP boundary: the axum router in front of a [`Gateway`].
//!
//! ```text
//! GET  /api/init                 → new public session
//! POST /api/auth      {key}      → new privileged session
//! POST /api/search    {payload}  → search results          (Authorization)
//! GET  /api/post?id=             → detail with opaque links (Authorization)
//! POST /api/resolve   {id}       → {url}                    (Authorization)
//! GET  /api/resolve/{id}?token=  → 302 to the delivery URL
//! ```
//!
//! JSON errors are `{ "success": false, "error": "..." }`. The redirect
//! route answers in plain text because browsers navigate to it directly.

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::header::{AUTHORIZATION, LOCATION, USER_AGENT};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use linkgate_content::ContentSource;
use linkgate_protocol::{
    AuthRequest, DetailResponse, EncryptedRequest, ErrorResponse, OpaqueId, ResolveRequest,
    ResolveResponse, SearchResponse, SessionResponse, SessionToken,
};
use linkgate_session::Authenticator;
use serde::Deserialize;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::gateway::{Gateway, IssuedSession};
use crate::GatewayError;

type SharedGateway<A, C> = Arc<Gateway<A, C>>;

/// Builds the router. Layers: request tracing, then permissive CORS for
/// the browser client.
pub fn router<A, C>(gateway: SharedGateway<A, C>) -> Router
where
    A: Authenticator,
    C: ContentSource,
{
    Router::new()
        .route("/api/init", get(init::<A, C>))
        .route("/api/auth", post(authenticate::<A, C>))
        .route("/api/search", post(search::<A, C>))
        .route("/api/post", get(post_detail::<A, C>))
        .route("/api/resolve", post(resolve::<A, C>))
        .route("/api/resolve/{id}", get(resolve_redirect::<A, C>))
        .with_state(gateway)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

/// Serves the router on `listener` until Ctrl-C.
pub async fn serve<A, C>(listener: TcpListener, gateway: SharedGateway<A, C>) -> std::io::Result<()>
where
    A: Authenticator,
    C: ContentSource,
{
    let addr = listener.local_addr()?;
    tracing::info!(%addr, "linkgate listening");

    axum::serve(listener, router(gateway))
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown signal received");
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

/// The session token from the `Authorization` header. A `Bearer ` prefix
/// is accepted.
fn header_token(headers: &HeaderMap) -> Option<SessionToken> {
    let raw = headers.get(AUTHORIZATION)?.to_str().ok()?.trim();
    let raw = raw.strip_prefix("Bearer ").unwrap_or(raw).trim();
    (!raw.is_empty()).then(|| SessionToken::new(raw))
}

fn require_token(headers: &HeaderMap) -> Result<SessionToken, GatewayError> {
    header_token(headers).ok_or(GatewayError::SessionInvalid)
}

fn fingerprint(headers: &HeaderMap) -> &str {
    headers
        .get(USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())
        .unwrap_or("unknown")
}

fn json_body<T>(body: Result<Json<T>, JsonRejection>) -> Result<T, GatewayError> {
    body.map(|Json(value)| value)
        .map_err(|rejection| GatewayError::MalformedRequest(rejection.body_text()))
}

fn session_response(session: IssuedSession) -> Json<SessionResponse> {
    Json(SessionResponse {
        success: true,
        token: session.token,
        expires_at: session.expires_at,
    })
}

#[derive(Debug, Deserialize)]
struct PostQuery {
    id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TokenQuery {
    token: Option<String>,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

async fn init<A: Authenticator, C: ContentSource>(
    State(gateway): State<SharedGateway<A, C>>,
    headers: HeaderMap,
) -> Result<Json<SessionResponse>, GatewayError> {
    let session = gateway.init(fingerprint(&headers)).await?;
    Ok(session_response(session))
}

async fn authenticate<A: Authenticator, C: ContentSource>(
    State(gateway): State<SharedGateway<A, C>>,
    body: Result<Json<AuthRequest>, JsonRejection>,
) -> Result<Json<SessionResponse>, GatewayError> {
    let request = json_body(body)?;
    let session = gateway.authenticate(&request.key).await?;
    Ok(session_response(session))
}

async fn search<A: Authenticator, C: ContentSource>(
    State(gateway): State<SharedGateway<A, C>>,
    headers: HeaderMap,
    body: Result<Json<EncryptedRequest>, JsonRejection>,
) -> Result<Json<SearchResponse>, GatewayError> {
    let token = require_token(&headers)?;
    let request = json_body(body)?;
    let results = gateway.search(&token, &request.payload).await?;
    Ok(Json(SearchResponse {
        success: true,
        results,
    }))
}

async fn post_detail<A: Authenticator, C: ContentSource>(
    State(gateway): State<SharedGateway<A, C>>,
    headers: HeaderMap,
    Query(query): Query<PostQuery>,
) -> Result<Json<DetailResponse>, GatewayError> {
    let id = query
        .id
        .filter(|id| !id.trim().is_empty())
        .ok_or_else(|| GatewayError::MalformedRequest("missing id".into()))?;
    let token = require_token(&headers)?;
    let data = gateway.fetch_detail(&token, id.trim()).await?;
    Ok(Json(DetailResponse { success: true, data }))
}

async fn resolve<A: Authenticator, C: ContentSource>(
    State(gateway): State<SharedGateway<A, C>>,
    headers: HeaderMap,
    body: Result<Json<ResolveRequest>, JsonRejection>,
) -> Result<Json<ResolveResponse>, GatewayError> {
    let token = require_token(&headers)?;
    let request = json_body(body)?;
    let resolution = gateway.resolve(&token, &OpaqueId::new(request.id)).await?;
    Ok(Json(ResolveResponse {
        success: true,
        url: resolution.delivery_url,
    }))
}

async fn resolve_redirect<A: Authenticator, C: ContentSource>(
    State(gateway): State<SharedGateway<A, C>>,
    Path(id): Path<String>,
    Query(query): Query<TokenQuery>,
    headers: HeaderMap,
) -> Response {
    let token = query
        .token
        .filter(|t| !t.trim().is_empty())
        .map(|t| SessionToken::new(t.trim()))
        .or_else(|| header_token(&headers));
    let Some(token) = token else {
        return plain_error(&GatewayError::SessionInvalid);
    };

    match gateway.resolve(&token, &OpaqueId::new(id)).await {
        Ok(resolution) => (StatusCode::FOUND, [(LOCATION, resolution.delivery_url)]).into_response(),
        Err(e) => plain_error(&e),
    }
}

// ---------------------------------------------------------------------------
// Error responses
// ---------------------------------------------------------------------------

fn status_of(err: &GatewayError) -> StatusCode {
    match err {
        e if e.is_access_denied() => StatusCode::UNAUTHORIZED,
        GatewayError::LinkNotFoundOrUsed | GatewayError::ContentNotFound => StatusCode::NOT_FOUND,
        GatewayError::MalformedRequest(_) => StatusCode::BAD_REQUEST,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// What the client is told. Internal failures are logged and masked.
fn client_message(err: &GatewayError, status: StatusCode) -> String {
    if status == StatusCode::INTERNAL_SERVER_ERROR {
        tracing::error!(error = %err, "request failed");
        "internal error".to_string()
    } else if err.is_access_denied() {
        GatewayError::SessionInvalid.to_string()
    } else {
        err.to_string()
    }
}

fn plain_error(err: &GatewayError) -> Response {
    let status = status_of(err);
    (status, client_message(err, status)).into_response()
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let status = status_of(&self);
        let body = ErrorResponse::new(client_message(&self, status));
        (status, Json(body)).into_response()
    }
}
