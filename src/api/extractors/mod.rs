/*
 * Responsibility
 * - Extractors shared by handlers
 *   - AppJson: JSON body whose rejections render as AppError
 *   - AuthCtx / AuthCtxExtractor: the principal set by the access middleware
 */
mod auth_ctx;
mod json;

pub use auth_ctx::{AuthCtx, AuthCtxExtractor};
pub use json::AppJson;
