//! HTTP routers for the two kinds of responder.
//!
//! - `hello`: one fallback handler for every request
//! - `site`: the static index page at `/`, 404 with an empty body elsewhere
//!
//! Both routers run every request inside a span carrying a unique request ID.

pub mod hello;
pub mod site;

use std::path::Path;

use axum::{middleware, Router};
use axum::http::header::{HeaderValue, CACHE_CONTROL};
use tower_http::services::ServeFile;
use tower_http::set_header::SetResponseHeaderLayer;

use crate::config::CACHE_CONTROL_SITE;
use crate::middleware::request_id_layer;

/// Router that answers every method and path with the fixed page.
pub fn create_hello_router() -> Router {
    Router::new()
        .fallback(hello::hello)
        .layer(middleware::from_fn(request_id_layer))
}

/// Router that serves `index_path` at `/` and 404 everywhere else.
///
/// The file is read on each request, so a rebuilt page is picked up without
/// a restart.
pub fn create_site_router(index_path: &Path) -> Router {
    let index_routes = Router::new()
        .route_service("/", ServeFile::new(index_path))
        .layer(SetResponseHeaderLayer::if_not_present(
            CACHE_CONTROL,
            HeaderValue::from_static(CACHE_CONTROL_SITE),
        ));

    Router::new()
        .merge(index_routes)
        .fallback(site::not_found)
        .layer(middleware::from_fn(request_id_layer))
}
