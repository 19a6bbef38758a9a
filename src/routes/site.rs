use axum::http::StatusCode;

/// Anything other than the index page.
pub async fn not_found() -> StatusCode {
    StatusCode::NOT_FOUND
}
