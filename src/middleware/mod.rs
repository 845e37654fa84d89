/*
 * Responsibility
 * - Router-level middleware (apply functions called from app.rs)
 *   - auth: bearer access token check
 *   - cors / security_headers / http: cross-cutting HTTP concerns
 */
pub mod auth;
pub mod cors;
pub mod http;
pub mod security_headers;
