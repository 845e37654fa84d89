/*
 * Responsibility
 * - Business rules for sign-up, login and token reissue
 * - auth: JWT and password primitives the services are built on
 */
pub mod auth;
pub mod token_service;
pub mod user_service;
