pub mod factory;
pub mod jwt;
pub mod password;

pub use factory::{build_password_encoder, build_token_provider};
pub use jwt::{TokenError, TokenProvider};
pub use password::PasswordEncoder;
