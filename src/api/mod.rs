//! HTTP surface: the relay page and a health check.

pub mod page;

use crate::core::relay::RelayEngine;
use crate::core::upstream::HttpUpstream;
use crate::core::{ConfigProvider, RawQuery, Upstream};
use crate::utils::error::{RelayError, Result};
use axum::{
    extract::{rejection::QueryRejection, Query, State},
    http::{StatusCode, Uri},
    response::{Html, IntoResponse, Response},
    routing::get,
    Router,
};
use page::{render_page, PageContent};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

pub fn create_router<U: Upstream + 'static>(engine: RelayEngine<U>) -> Router {
    Router::new()
        .route("/", get(relay_page::<U>))
        .route("/health", get(health))
        .layer(TraceLayer::new_for_http())
        .with_state(Arc::new(engine))
}

/// Binds the configured address and serves until the process stops.
pub async fn serve<C: ConfigProvider>(config: &C) -> Result<()> {
    let upstream = HttpUpstream::new(config)?;
    tracing::info!("Relaying to {}", upstream.api_base());

    let engine = RelayEngine::with_limit_policy(upstream, config.limit_policy());
    let app = create_router(engine);

    let listener = tokio::net::TcpListener::bind(config.bind_address()).await?;
    tracing::info!("Listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;
    Ok(())
}

/// GET / - form, plus the relayed result once the form was submitted
pub async fn relay_page<U: Upstream + 'static>(
    State(engine): State<Arc<RelayEngine<U>>>,
    uri: Uri,
    query: std::result::Result<Query<RawQuery>, QueryRejection>,
) -> std::result::Result<Html<String>, AppError> {
    let raw = match query {
        Ok(Query(raw)) => raw,
        Err(rejection) => {
            return Err(AppError {
                error: RelayError::InvalidParameter {
                    name: "query string".to_string(),
                    value: uri.query().unwrap_or_default().to_string(),
                    reason: rejection.body_text(),
                },
                raw: RawQuery::default(),
            })
        }
    };

    if raw.is_empty() {
        return Ok(Html(render_page(&raw, PageContent::FormOnly)));
    }

    match engine.relay_raw(&raw).await {
        Ok((_, output)) => Ok(Html(render_page(&raw, PageContent::Output(&output)))),
        Err(error) => Err(AppError { error, raw }),
    }
}

/// GET /health
pub async fn health() -> &'static str {
    "ok"
}

/// Failed page load, rendered as the page with an error notice.
pub struct AppError {
    error: RelayError,
    raw: RawQuery,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        tracing::warn!(
            category = ?self.error.category(),
            "Relay failed: {}",
            self.error
        );

        let status =
            StatusCode::from_u16(self.error.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let html = render_page(&self.raw, PageContent::Error(&self.error));

        (status, Html(html)).into_response()
    }
}
