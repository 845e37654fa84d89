use axum::http::Uri;

use crate::error::AppError;

/// Reached only by authenticated requests; anonymous ones are stopped by the access middleware.
pub async fn route_not_found(uri: Uri) -> AppError {
    AppError::not_found(format!("no route for {}", uri.path()))
}
