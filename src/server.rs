//! HTTP server exposing page documents and the listing endpoint
//!
//! All handlers sit on top of the fail-soft [`Library`], so upstream outages
//! show up as empty lists or `404`s, never as upstream error text.

use crate::library::Library;
use crate::model::Drama;
use crate::pagination::DEFAULT_CLASSIFY;
use crate::pages::{Category, CategoryPage, DetailPage, EpisodePage, HomePage, SearchPage};
use crate::upstream::Catalog;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::json;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

/// Query of the `/api/dramas` listing endpoint.
#[derive(Debug, Default, Deserialize)]
pub struct DramasQuery {
    pub classify: Option<String>,
    pub page: Option<String>,
}

impl DramasQuery {
    fn classify(&self) -> &str {
        self.classify
            .as_deref()
            .filter(|c| !c.is_empty())
            .unwrap_or(DEFAULT_CLASSIFY)
    }

    fn page(&self) -> u32 {
        parse_page(self.page.as_deref())
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct SearchQuery {
    pub q: Option<String>,
}

/// Builds the router over a shared library.
pub fn router<C>(library: Arc<Library<C>>) -> Router
where
    C: Catalog + 'static,
{
    Router::new()
        .route("/health", get(health_handler))
        .route("/api/dramas", get(dramas_handler::<C>))
        .route("/api/home", get(home_handler::<C>))
        .route("/api/category/{slug}", get(category_handler::<C>))
        .route("/api/details/{id}", get(detail_handler::<C>))
        .route(
            "/api/details/{id}/episode/{episode_id}",
            get(episode_handler::<C>),
        )
        .route("/api/search", get(search_handler::<C>))
        .with_state(library)
}

/// Binds `addr` and serves until the process is stopped.
pub async fn serve<C>(library: Arc<Library<C>>, addr: SocketAddr) -> std::io::Result<()>
where
    C: Catalog + 'static,
{
    let listener = TcpListener::bind(addr).await?;
    info!(addr = %listener.local_addr()?, "serving drama browser");
    axum::serve(listener, router(library)).await
}

async fn health_handler() -> &'static str {
    "ok"
}

/// GET /api/dramas - one page of the dubbed listing, as used by "load more"
async fn dramas_handler<C: Catalog>(
    State(library): State<Arc<Library<C>>>,
    Query(query): Query<DramasQuery>,
) -> Json<Vec<Drama>> {
    Json(library.dubbed(Some(query.classify()), Some(query.page())).await)
}

async fn home_handler<C: Catalog>(State(library): State<Arc<Library<C>>>) -> Json<HomePage> {
    Json(library.home_page().await)
}

async fn category_handler<C: Catalog>(
    State(library): State<Arc<Library<C>>>,
    Path(slug): Path<String>,
    Query(query): Query<PageQuery>,
) -> Result<Json<CategoryPage>, Response> {
    let category: Category = slug.parse().map_err(|_| not_found())?;
    let page = parse_page(query.page.as_deref());
    Ok(Json(library.category_page(category, page).await))
}

async fn detail_handler<C: Catalog>(
    State(library): State<Arc<Library<C>>>,
    Path(id): Path<String>,
) -> Result<Json<DetailPage>, Response> {
    library.detail_page(&id).await.map(Json).ok_or_else(not_found)
}

async fn episode_handler<C: Catalog>(
    State(library): State<Arc<Library<C>>>,
    Path((id, episode_id)): Path<(String, String)>,
) -> Result<Json<EpisodePage>, Response> {
    library
        .episode_page(&id, &episode_id)
        .await
        .map(Json)
        .ok_or_else(not_found)
}

async fn search_handler<C: Catalog>(
    State(library): State<Arc<Library<C>>>,
    Query(query): Query<SearchQuery>,
) -> Json<SearchPage> {
    Json(library.search_page(query.q.as_deref().unwrap_or_default()).await)
}

fn not_found() -> Response {
    (StatusCode::NOT_FOUND, Json(json!({ "error": "not found" }))).into_response()
}

/// Page numbers start at 1; anything unparsable means the first page.
fn parse_page(raw: Option<&str>) -> u32 {
    raw.and_then(|p| p.trim().parse::<u32>().ok())
        .filter(|p| *p > 0)
        .unwrap_or(1)
}
