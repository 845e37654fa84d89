/*!
 * Authentication context extractor
 *
 * Responsibility:
 * - Give handlers the authenticated principal (AuthCtx)
 * - axum-specific code lives in core, the type in types
 */

mod core;
mod types;

pub use self::core::AuthCtxExtractor;
pub use types::AuthCtx;
