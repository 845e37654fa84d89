/*
 * Responsibility
 * - URL structure of the API
 * - Which paths skip authentication is decided by the access middleware
 */
use axum::{
    Router,
    routing::{get, post},
};

use crate::api::handlers::{
    fallback::route_not_found,
    health::health,
    tokens::reissue,
    users::{login, me, sign_up},
};
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/api/users/sign-up", post(sign_up))
        .route("/api/users/login", post(login))
        .route("/api/users/me", get(me))
        .route("/api/tokens/reissue", post(reissue))
        .fallback(route_not_found)
}
