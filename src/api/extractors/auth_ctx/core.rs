use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use crate::error::{AppError, ErrorCode};
use crate::state::AppState;

use super::AuthCtx;

/// Extractor for the AuthCtx the access middleware inserted.
/// Missing means the route is not behind the middleware: answer 401.
pub struct AuthCtxExtractor(pub AuthCtx);

impl FromRequestParts<AppState> for AuthCtxExtractor {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthCtx>()
            .copied()
            .map(AuthCtxExtractor)
            .ok_or_else(|| AppError::new(ErrorCode::UnauthorizedAccess))
    }
}
