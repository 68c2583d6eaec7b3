//! HTTP surface of the proxy.
//!
//! `/proxy` relays a remote resource with permissive CORS headers so the map
//! viewer can load tiles and documents from servers that do not send them.
//! `/resolve` expands shortened links to their final destination.

use crate::config::ProxyConfig;
use crate::error::ProxyError;
use crate::redirect::{is_http, RedirectResolver, Resolution, ResolvedCache};
use axum::{
    extract::{Query, State},
    http::{header, HeaderValue, StatusCode},
    middleware,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use reqwest::{redirect::Policy, Client, ClientBuilder, Url};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;

/// Shared state backing HTTP handlers.
#[derive(Clone)]
pub struct AppState {
    client: Client,
    resolver: Arc<RedirectResolver>,
}

impl AppState {
    pub fn new(config: &ProxyConfig) -> Result<Self, ProxyError> {
        let client = client_builder(config)
            .redirect(Policy::limited(config.max_redirects))
            .build()?;
        let resolver = RedirectResolver::new(
            client_builder(config).redirect(Policy::none()).build()?,
            config.max_redirects,
            ResolvedCache::new(config.cache_size),
        );
        Ok(Self {
            client,
            resolver: Arc::new(resolver),
        })
    }
}

fn client_builder(config: &ProxyConfig) -> ClientBuilder {
    Client::builder()
        .user_agent(config.user_agent.as_str())
        .timeout(config.timeout)
}

#[derive(Debug, Deserialize)]
struct TargetQuery {
    url: Option<String>,
}

impl TargetQuery {
    /// The requested target, validated as an absolute http(s) URL.
    fn target(&self) -> Result<Url, ProxyError> {
        let raw = self
            .url
            .as_deref()
            .map(str::trim)
            .filter(|raw| !raw.is_empty())
            .ok_or(ProxyError::MissingUrl)?;
        let url = Url::parse(raw).map_err(|_| ProxyError::InvalidUrl(raw.to_string()))?;
        if !is_http(&url) {
            return Err(ProxyError::UnsupportedScheme(url.scheme().to_string()));
        }
        Ok(url)
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/proxy", get(proxy_handler).options(preflight_handler))
        .route("/resolve", get(resolve_handler).options(preflight_handler))
        .layer(middleware::map_response(add_cors_headers))
        .with_state(state)
}

async fn add_cors_headers(mut response: Response) -> Response {
    let headers = response.headers_mut();
    headers.insert(header::ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static("*"));
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static("GET, OPTIONS"),
    );
    headers.insert(header::ACCESS_CONTROL_ALLOW_HEADERS, HeaderValue::from_static("*"));
    response
}

async fn health_handler() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

async fn preflight_handler() -> StatusCode {
    StatusCode::NO_CONTENT
}

/// Relay the target's status, content type and body.
async fn proxy_handler(
    State(state): State<AppState>,
    Query(query): Query<TargetQuery>,
) -> Result<Response, ProxyError> {
    let url = query.target()?;
    log::debug!("relaying {}", url);

    let upstream = state.client.get(url).send().await?;
    let status = StatusCode::from_u16(upstream.status().as_u16()).unwrap_or(StatusCode::BAD_GATEWAY);
    let content_type = upstream
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|value| HeaderValue::from_bytes(value.as_bytes()).ok());
    let body = upstream.bytes().await?;

    let mut response = (status, body).into_response();
    if let Some(content_type) = content_type {
        response.headers_mut().insert(header::CONTENT_TYPE, content_type);
    }
    Ok(response)
}

async fn resolve_handler(
    State(state): State<AppState>,
    Query(query): Query<TargetQuery>,
) -> Result<Json<Resolution>, ProxyError> {
    let url = query.target()?;
    let resolution = state.resolver.resolve(&url).await?;
    Ok(Json(resolution))
}
