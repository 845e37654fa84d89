use axum::{Json, extract::State, http::StatusCode};

use crate::api::dto::tokens::{ReissueRequest, TokenResponse};
use crate::api::extractors::AppJson;
use crate::error::AppError;
use crate::state::AppState;

/// POST /api/tokens/reissue
///
/// Answers 201: a new pair is created and the presented refresh token is retired.
pub async fn reissue(
    State(state): State<AppState>,
    AppJson(req): AppJson<ReissueRequest>,
) -> Result<(StatusCode, Json<TokenResponse>), AppError> {
    req.validate().map_err(AppError::invalid_input)?;

    let pair = state.tokens.reissue(&req.refresh_token).await?;

    Ok((StatusCode::CREATED, Json(pair.into())))
}
