use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

/// Errors surfaced to proxy clients
#[derive(Debug, thiserror::Error)]
pub enum ProxyError {
    #[error("missing 'url' query parameter")]
    MissingUrl,

    #[error("invalid url '{0}'")]
    InvalidUrl(String),

    #[error("unsupported scheme '{0}', only http and https are relayed")]
    UnsupportedScheme(String),

    #[error("upstream request failed: {0}")]
    Upstream(#[from] reqwest::Error),

    #[error("gave up after {0} redirects")]
    TooManyRedirects(usize),

    #[error("configuration error: {0}")]
    Config(String),
}

impl ProxyError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::MissingUrl | Self::InvalidUrl(_) | Self::UnsupportedScheme(_) => {
                StatusCode::BAD_REQUEST
            }
            Self::Upstream(_) => StatusCode::BAD_GATEWAY,
            Self::TooManyRedirects(_) => StatusCode::LOOP_DETECTED,
            Self::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            log::warn!("{}", self);
        }
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}
