/*
 * Responsibility
 * - Load settings from the environment (DATABASE_URL, JWT, bcrypt, CORS, timeouts)
 * - Validate them (missing or invalid values fail startup)
 */
use std::net::SocketAddr;
use std::str::FromStr;
use std::{env, fmt};

use thiserror::Error;

use crate::services::auth::jwt::MIN_SECRET_BYTES;

const MIN_BCRYPT_COST: u32 = 4;
const MAX_BCRYPT_COST: u32 = 31;
// Keeps `iat + ttl` far from i64 overflow.
const MAX_TOKEN_TTL_SECONDS: u64 = i64::MAX as u64 / 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnv {
    Development,
    Production,
}

impl AppEnv {
    fn parse(value: Option<String>) -> Self {
        match value
            .unwrap_or_else(|| "development".to_string())
            .to_ascii_lowercase()
            .as_str()
        {
            "production" | "prod" => Self::Production,
            _ => Self::Development,
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing configuration: {0}")]
    Missing(&'static str),
    #[error("invalid configuration: {0}")]
    Invalid(&'static str),
}

#[derive(Clone)]
pub struct Config {
    pub addr: SocketAddr,
    pub app_env: AppEnv,

    pub database_url: String,
    pub database_max_connections: u32,

    // HS512 signing secret, shared by access and refresh tokens
    pub jwt_secret_key: String,
    // Token lifetimes (seconds)
    pub access_token_ttl_seconds: u64,
    pub refresh_token_ttl_seconds: u64,
    pub jwt_leeway_seconds: u64,

    pub bcrypt_cost: u32,

    pub cors_allowed_origins: Vec<String>,
    pub request_timeout_seconds: u64,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Never print the database URL (credentials) or the JWT secret
        f.debug_struct("Config")
            .field("addr", &self.addr)
            .field("app_env", &self.app_env)
            .field("database_max_connections", &self.database_max_connections)
            .field("access_token_ttl_seconds", &self.access_token_ttl_seconds)
            .field("refresh_token_ttl_seconds", &self.refresh_token_ttl_seconds)
            .field("jwt_leeway_seconds", &self.jwt_leeway_seconds)
            .field("bcrypt_cost", &self.bcrypt_cost)
            .field("cors_allowed_origins", &self.cors_allowed_origins)
            .field("request_timeout_seconds", &self.request_timeout_seconds)
            .finish_non_exhaustive()
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from any key lookup; `from_env` passes the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let port: u16 = parse_or(&lookup, "PORT", 8080)?;
        let addr: SocketAddr = SocketAddr::from_str(&format!("0.0.0.0:{}", port))
            .map_err(|_| ConfigError::Invalid("PORT"))?;

        let app_env = AppEnv::parse(lookup("APP_ENV"));

        let database_url = lookup("DATABASE_URL").ok_or(ConfigError::Missing("DATABASE_URL"))?;
        let database_max_connections = parse_or(&lookup, "DATABASE_MAX_CONNECTIONS", 10)?;

        let jwt_secret_key =
            lookup("JWT_SECRET_KEY").ok_or(ConfigError::Missing("JWT_SECRET_KEY"))?;
        if jwt_secret_key.len() < MIN_SECRET_BYTES {
            return Err(ConfigError::Invalid("JWT_SECRET_KEY"));
        }

        let access_token_ttl_seconds =
            parse_ttl(&lookup, "JWT_ACCESS_TOKEN_TTL_SECONDS", 1_800)?; // 30 min
        let refresh_token_ttl_seconds =
            parse_ttl(&lookup, "JWT_REFRESH_TOKEN_TTL_SECONDS", 1_209_600)?; // 14 days
        let jwt_leeway_seconds = parse_or(&lookup, "JWT_LEEWAY_SECONDS", 0)?;

        let bcrypt_cost: u32 = parse_or(&lookup, "BCRYPT_COST", 10)?;
        if !(MIN_BCRYPT_COST..=MAX_BCRYPT_COST).contains(&bcrypt_cost) {
            return Err(ConfigError::Invalid("BCRYPT_COST"));
        }

        let cors_allowed_origins = lookup("CORS_ALLOWED_ORIGINS")
            .unwrap_or_default()
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>();

        let request_timeout_seconds = parse_or(&lookup, "REQUEST_TIMEOUT_SECONDS", 30)?;

        Ok(Self {
            addr,
            app_env,
            database_url,
            database_max_connections,
            jwt_secret_key,
            access_token_ttl_seconds,
            refresh_token_ttl_seconds,
            jwt_leeway_seconds,
            bcrypt_cost,
            cors_allowed_origins,
            request_timeout_seconds,
        })
    }
}

/// Unset means `default`; set but unparseable is an error.
fn parse_or<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        Some(raw) => raw.trim().parse().map_err(|_| ConfigError::Invalid(key)),
        None => Ok(default),
    }
}

/// A lifetime of 0 or one too large to add to a timestamp would make every token invalid.
fn parse_ttl<F>(lookup: &F, key: &'static str, default: u64) -> Result<u64, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let ttl = parse_or(lookup, key, default)?;
    if !(1..=MAX_TOKEN_TTL_SECONDS).contains(&ttl) {
        return Err(ConfigError::Invalid(key));
    }
    Ok(ttl)
}
