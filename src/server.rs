//! HTTP front-end.
//!
//! Routes incoming requests to page handlers, each of which declares the
//! resources it needs; the declared kinds are initialised through the
//! [`Resources`] registry before the handler body runs.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `GET`  | `/` | Site list page |
//! | `GET`  | `/search` | Global search results |
//! | `GET`  | `/{site_key}`, `/{site_key}/` | Per-site index page |
//! | `GET`  | `/{site_key}/search` | Site-scoped search results |
//! | `GET`  | `/media/logos/{site_key}.png` | Site logo with fallback |
//! | `GET`  | `/media/{path}` | Static media files |
//!
//! # Route precedence
//!
//! The logo route overlaps the `/media` static service, and `/{site_key}`
//! overlaps `/search`; axum resolves overlaps by specificity (static
//! segments beat captures, captures beat wildcards), so the logo handler
//! always wins over the catch-all file server. A test pins this down.
//!
//! # Error contract
//!
//! Errors are plain text. An unknown site key responds
//! `404` with body `No site exists with the key {key}.`; malformed `p`/`r`
//! query parameters respond `400`; search service failures respond `502`;
//! database and template faults respond `500` with a generic body and a
//! logged cause.

use anyhow::Result;
use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse, Redirect, Response},
    routing::get,
    Router,
};
use serde::Deserialize;
use std::sync::Arc;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::models::Site;
use crate::render::RenderError;
use crate::resources::{ResourceError, ResourceKind, Resources};
use crate::store;

/// Rows per page when the `r` query parameter is absent.
const DEFAULT_ROWS: u32 = 10;

/// Shared state passed to every handler via axum's `State` extractor.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub resources: Arc<Resources>,
}

/// Starts the HTTP server on the configured bind address and serves until
/// the process is terminated.
pub async fn run_server(config: &Config) -> Result<()> {
    let bind_addr = config.server.bind.clone();
    let config = Arc::new(config.clone());

    let state = AppState {
        resources: Arc::new(Resources::new(config.clone())),
        config,
    };

    tracing::info!(media_root = %state.config.media.root.display(), "serving media");

    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!("listening on http://{}", bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}

/// Builds the full route table. Separate from [`run_server`] so tests can
/// drive the router in-process.
pub fn build_router(state: AppState) -> Router {
    let media_root = state.config.media.root.clone();

    Router::new()
        .route("/", get(index))
        .route("/search", get(search))
        // Must take precedence over the /media static service so missing
        // logos fall back instead of 404ing.
        .route("/media/logos/{filename}", get(site_logo))
        .nest_service("/media", ServeDir::new(media_root))
        .route("/{site_key}", get(site_index))
        .route("/{site_key}/", get(site_index))
        .route("/{site_key}/search", get(site_search))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// ============ Error type ============

/// Error carrying an HTTP status and a plain-text body.
pub struct AppError {
    status: StatusCode,
    message: String,
}

impl AppError {
    fn not_found(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: message.into(),
        }
    }

    fn bad_gateway(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_GATEWAY,
            message: message.into(),
        }
    }

    fn internal() -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: "Internal server error".to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        (self.status, self.message).into_response()
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        tracing::error!("request failed: {:#}", err);
        AppError::internal()
    }
}

impl From<ResourceError> for AppError {
    fn from(err: ResourceError) -> Self {
        tracing::error!("resource registry misuse: {}", err);
        AppError::internal()
    }
}

impl From<RenderError> for AppError {
    fn from(err: RenderError) -> Self {
        match err {
            RenderError::TemplateNotFound(name) => {
                tracing::warn!(template = %name, "template not found");
                AppError::not_found("Not found")
            }
            RenderError::Render(e) => {
                tracing::error!("template rendering failed: {:#}", anyhow::Error::from(e));
                AppError::internal()
            }
        }
    }
}

// ============ Query parameters ============

/// Search query string parameters. `p` and `r` deserialize as unsigned
/// integers; non-numeric or negative values are rejected with 400 by the
/// extractor before the handler runs.
#[derive(Debug, Deserialize)]
struct SearchParams {
    q: Option<String>,
    p: Option<u32>,
    r: Option<u32>,
}

impl SearchParams {
    fn query(&self) -> Option<&str> {
        let q = self.q.as_deref()?.trim();
        if q.is_empty() {
            None
        } else {
            Some(q)
        }
    }

    fn rows(&self) -> u32 {
        self.r.unwrap_or(DEFAULT_ROWS)
    }

    /// Offset of the first document: page number times rows per page, both
    /// zero-indexed. Widened to u64 so the product cannot overflow.
    fn start(&self) -> u64 {
        u64::from(self.p.unwrap_or(0)) * u64::from(self.rows())
    }
}

// ============ GET / ============

const INDEX_RESOURCES: &[ResourceKind] = &[ResourceKind::Templates, ResourceKind::Database];

async fn index(State(state): State<AppState>) -> Result<Html<String>, AppError> {
    state.resources.ensure(INDEX_RESOURCES).await?;

    let sites = store::all_sites(state.resources.database()?).await?;

    let mut context = tera::Context::new();
    context.insert("site_root_path", "");
    context.insert("sites", &sites);

    let html = state
        .resources
        .templates()?
        .render("index.html", &mut context)?;
    Ok(Html(html))
}

// ============ GET /{site_key} ============

const SITE_INDEX_RESOURCES: &[ResourceKind] = &[ResourceKind::Templates, ResourceKind::Database];

async fn site_index(
    State(state): State<AppState>,
    Path(site_key): Path<String>,
) -> Result<Html<String>, AppError> {
    state.resources.ensure(SITE_INDEX_RESOURCES).await?;

    let site = resolve_site(&state, &site_key).await?;

    let mut context = tera::Context::new();
    context.insert("site_root_path", &format!("{}/", site_key));
    context.insert("site", &site);

    let html = state
        .resources
        .templates()?
        .render("site_index.html", &mut context)?;
    Ok(Html(html))
}

// ============ GET /search ============

const SEARCH_RESOURCES: &[ResourceKind] = &[ResourceKind::Templates, ResourceKind::Search];

async fn search(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Response, AppError> {
    state.resources.ensure(SEARCH_RESOURCES).await?;

    let query = match params.query() {
        Some(q) => q.to_string(),
        None => return Ok(Redirect::to(&state.config.app_url_root).into_response()),
    };

    let results = run_query(&state, &query, &params).await?;

    let mut context = tera::Context::new();
    context.insert("site_root_path", "");
    context.insert("query", &query);
    context.insert("results", &results);

    let html = state
        .resources
        .templates()?
        .render("results.html", &mut context)?;
    Ok(Html(html).into_response())
}

// ============ GET /{site_key}/search ============

const SITE_SEARCH_RESOURCES: &[ResourceKind] = &[
    ResourceKind::Templates,
    ResourceKind::Database,
    ResourceKind::Search,
];

async fn site_search(
    State(state): State<AppState>,
    Path(site_key): Path<String>,
    Query(params): Query<SearchParams>,
) -> Result<Response, AppError> {
    state.resources.ensure(SITE_SEARCH_RESOURCES).await?;

    // The site is resolved before the query is validated: an unknown site
    // is a 404 even when the query is missing.
    let site = resolve_site(&state, &site_key).await?;

    let query = match params.query() {
        Some(q) => q.to_string(),
        None => return Ok(Redirect::to(&state.config.app_url_root).into_response()),
    };

    let results = run_query(&state, &query, &params).await?;

    let mut context = tera::Context::new();
    context.insert("site_root_path", &format!("{}/", site_key));
    context.insert("site", &site);
    context.insert("query", &query);
    context.insert("results", &results);

    let html = state
        .resources
        .templates()?
        .render("site_results.html", &mut context)?;
    Ok(Html(html).into_response())
}

// ============ GET /media/logos/{site_key}.png ============

async fn site_logo(
    State(state): State<AppState>,
    Path(filename): Path<String>,
) -> Result<Response, AppError> {
    let site_key = filename
        .strip_suffix(".png")
        .filter(|key| valid_site_key(key))
        .ok_or_else(|| AppError::not_found("Not found"))?;

    let logos_dir = state.config.media.root.join("images/logos");
    let logo_path = logos_dir.join(format!("{}.png", site_key));

    let path = if logo_path.is_file() {
        logo_path
    } else {
        state.config.media.root.join("images/unknown_site_logo.png")
    };

    let bytes = tokio::fs::read(&path).await.map_err(|e| {
        tracing::error!(path = %path.display(), "failed to read logo: {}", e);
        AppError::internal()
    })?;

    Ok(([(header::CONTENT_TYPE, "image/png")], bytes).into_response())
}

// ============ Shared helpers ============

/// Looks up a site by key, mapping an unknown or malformed key to the 404
/// contract. Site keys are restricted to word characters and dots.
async fn resolve_site(state: &AppState, site_key: &str) -> Result<Site, AppError> {
    if !valid_site_key(site_key) {
        return Err(AppError::not_found("Not found"));
    }

    store::site_by_key(state.resources.database()?, site_key)
        .await?
        .ok_or_else(|| AppError::not_found(format!("No site exists with the key {}.", site_key)))
}

/// Runs the query against the search backend with the offset/limit derived
/// from the page parameters. Backend failures surface as 502.
async fn run_query(
    state: &AppState,
    query: &str,
    params: &SearchParams,
) -> Result<crate::models::SearchResults, AppError> {
    state
        .resources
        .search()?
        .search(query, params.start(), params.rows())
        .await
        .map_err(|e| {
            tracing::error!("search request failed: {:#}", e);
            AppError::bad_gateway("Search service unavailable")
        })
}

fn valid_site_key(key: &str) -> bool {
    !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '.')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_site_key() {
        assert!(valid_site_key("android.stackexchange.com"));
        assert!(valid_site_key("meta_site"));
        assert!(valid_site_key("a1"));
        assert!(!valid_site_key(""));
        assert!(!valid_site_key("bad-key"));
        assert!(!valid_site_key("bad/key"));
        assert!(!valid_site_key("spaced key"));
    }

    #[test]
    fn test_search_params_defaults() {
        let params = SearchParams {
            q: Some("crash".to_string()),
            p: None,
            r: None,
        };
        assert_eq!(params.query(), Some("crash"));
        assert_eq!(params.rows(), 10);
        assert_eq!(params.start(), 0);
    }

    #[test]
    fn test_search_params_offset_is_page_times_rows() {
        let params = SearchParams {
            q: Some("crash".to_string()),
            p: Some(3),
            r: Some(25),
        };
        assert_eq!(params.start(), 75);
        assert_eq!(params.rows(), 25);
    }

    #[test]
    fn test_search_params_offset_does_not_overflow() {
        let params = SearchParams {
            q: Some("crash".to_string()),
            p: Some(u32::MAX),
            r: Some(u32::MAX),
        };
        assert_eq!(
            params.start(),
            u64::from(u32::MAX) * u64::from(u32::MAX)
        );
    }

    #[test]
    fn test_blank_query_is_treated_as_missing() {
        let params = SearchParams {
            q: Some("   ".to_string()),
            p: None,
            r: None,
        };
        assert_eq!(params.query(), None);

        let params = SearchParams {
            q: None,
            p: None,
            r: None,
        };
        assert_eq!(params.query(), None);
    }
}
