//! HTTP routing.
//!
//! Every category path is a GET route serving that category's listing;
//! `/story/{id}` serves one article. A story the publisher does not have
//! sends the reader back where they came from (or home).

use crate::error::{LiteError, Result};
use crate::pages::{ArticleOutcome, Lite};
use axum::Router;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, HeaderValue, StatusCode, Uri, header};
use axum::response::{Html, IntoResponse, Response};
use axum::routing::get;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::{error, info, instrument, warn};

/// Route prefix for story pages.
pub const STORY_ROUTE: &str = "/story/{id}";

pub fn router(lite: Arc<Lite>) -> Router {
    let mut router: Router<Arc<Lite>> = Router::new().route(STORY_ROUTE, get(story_page));
    for category in lite.registry().iter() {
        router = router.route(&category.path, get(category_page));
    }
    router.layer(TraceLayer::new_for_http()).with_state(lite)
}

/// Bind and serve until the process is stopped.
pub async fn serve(lite: Arc<Lite>, listen: SocketAddr) -> Result<()> {
    let listener = TcpListener::bind(listen).await?;
    info!(%listen, "Listening");
    axum::serve(listener, router(lite)).await?;
    Ok(())
}

#[instrument(level = "info", skip_all, fields(path = %uri.path()))]
async fn category_page(State(lite): State<Arc<Lite>>, uri: Uri) -> Response {
    let Some(category) = lite.registry().find_by_path(uri.path()) else {
        return StatusCode::NOT_FOUND.into_response();
    };
    match lite
        .render_category_page(&category.feed_id, &category.label)
        .await
    {
        Ok(html) => Html(html).into_response(),
        Err(e) => error_response(&e),
    }
}

#[instrument(level = "info", skip_all, fields(%id))]
async fn story_page(
    State(lite): State<Arc<Lite>>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Response {
    match lite.render_article_page(&id).await {
        Ok(ArticleOutcome::Page(html)) => Html(html).into_response(),
        Ok(ArticleOutcome::NotFound) => referrer_or_home(&headers),
        Err(e) => error_response(&e),
    }
}

fn referrer_or_home(headers: &HeaderMap) -> Response {
    let location = headers
        .get(header::REFERER)
        .filter(|v| !v.is_empty())
        .cloned()
        .unwrap_or_else(|| HeaderValue::from_static("/"));
    info!(location = ?location, "Story not found upstream; redirecting");
    (StatusCode::MOVED_PERMANENTLY, [(header::LOCATION, location)]).into_response()
}

fn error_response(e: &LiteError) -> Response {
    let status = if e.is_client_error() {
        warn!(error = %e, "Rejected request");
        StatusCode::BAD_REQUEST
    } else {
        error!(error = %e, "Could not build page");
        StatusCode::INTERNAL_SERVER_ERROR
    };
    (status, e.to_string()).into_response()
}
