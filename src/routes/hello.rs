//! Fixed-page responder.
//!
//! Answers every request, whatever its method or path, with the same small
//! HTML page.

use axum::http::header::{CONTENT_TYPE, HOST};
use axum::http::{HeaderMap, Uri};
use axum::response::IntoResponse;

use crate::config::{HELLO_BODY, HELLO_CONTENT_TYPE};

/// Log the requested URL and return the fixed page.
pub async fn hello(headers: HeaderMap, uri: Uri) -> impl IntoResponse {
    tracing::info!(url = %request_url(&uri, &headers), "Request received");

    ([(CONTENT_TYPE, HELLO_CONTENT_TYPE)], HELLO_BODY)
}

/// Reconstruct the URL the client asked for.
///
/// HTTP/2 requests carry the authority in the URI; HTTP/1.1 requests only
/// have a path, so the Host header fills in the rest.
fn request_url(uri: &Uri, headers: &HeaderMap) -> String {
    if uri.authority().is_some() {
        return uri.to_string();
    }

    let path = uri.path_and_query().map(|pq| pq.as_str()).unwrap_or("/");

    match headers.get(HOST).and_then(|host| host.to_str().ok()) {
        Some(host) => format!("https://{}{}", host, path),
        None => path.to_string(),
    }
}
