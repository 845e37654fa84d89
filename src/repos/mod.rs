/*
 * Responsibility
 * - Store traits (UserStore / TokenStore) and their PostgreSQL implementations
 * - In-memory stores for tests
 */
pub mod error;
pub mod token_repo;
pub mod user_repo;

#[cfg(test)]
pub mod memory;
