/*
 * Responsibility
 * - HTTP surface: routes, handlers, DTOs and extractors
 */
pub mod dto;
pub mod extractors;
pub mod handlers;
mod routes;

pub use routes::routes;
