/*
 * Responsibility
 * - POST /api/users/sign-up, POST /api/users/login (public)
 * - GET /api/users/me (requires an access token)
 * - DTO validation, then the UserService call
 */
use axum::{Json, extract::State, http::StatusCode};

use crate::{
    api::dto::{
        tokens::TokenResponse,
        users::{LoginRequest, SignUpRequest, UserResponse},
    },
    api::extractors::{AppJson, AuthCtxExtractor},
    error::AppError,
    state::AppState,
};

pub async fn sign_up(
    State(state): State<AppState>,
    AppJson(req): AppJson<SignUpRequest>,
) -> Result<(StatusCode, Json<UserResponse>), AppError> {
    req.validate().map_err(AppError::invalid_input)?;

    let user = state.users.sign_up(&req.account, &req.password).await?;

    Ok((StatusCode::CREATED, Json(user.into())))
}

pub async fn login(
    State(state): State<AppState>,
    AppJson(req): AppJson<LoginRequest>,
) -> Result<Json<TokenResponse>, AppError> {
    req.validate().map_err(AppError::invalid_input)?;

    let pair = state.users.login(&req.account, &req.password).await?;

    Ok(Json(pair.into()))
}

pub async fn me(
    State(state): State<AppState>,
    AuthCtxExtractor(ctx): AuthCtxExtractor,
) -> Result<Json<UserResponse>, AppError> {
    let user = state.users.me(ctx.user_id).await?;
    Ok(Json(user.into()))
}
