use std::str::FromStr;

use anyhow::Context;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub issuer: String,
    pub audience: String,
    pub ttl_minutes: i64,
}

/// Argon2id parameters for password hashing.
#[derive(Debug, Clone, Deserialize)]
pub struct HashConfig {
    pub m_cost: u32,
    pub t_cost: u32,
    pub p_cost: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RateLimitConfig {
    pub window_secs: u64,
    pub max_requests: u32,
    pub auth_max_requests: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub cors_origin: Option<String>,
    pub jwt: JwtConfig,
    pub hash: HashConfig,
    pub rate_limit: RateLimitConfig,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url =
            std::env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite:bitskill.db".into());
        let jwt = JwtConfig {
            secret: std::env::var("JWT_SECRET").context("JWT_SECRET must be set")?,
            issuer: std::env::var("JWT_ISSUER").unwrap_or_else(|_| "bitskill".into()),
            audience: std::env::var("JWT_AUDIENCE").unwrap_or_else(|_| "bitskill-clients".into()),
            ttl_minutes: env_or("TOKEN_EXPIRY_MINUTES", 24 * 60),
        };
        let hash = HashConfig {
            m_cost: env_or("ARGON2_M_COST", 19_456),
            t_cost: env_or("ARGON2_T_COST", 2),
            p_cost: env_or("ARGON2_P_COST", 1),
        };
        let rate_limit = RateLimitConfig {
            window_secs: env_or("RATE_LIMIT_WINDOW_SECS", 15 * 60),
            max_requests: env_or("RATE_LIMIT_MAX", 100),
            auth_max_requests: env_or("AUTH_RATE_LIMIT_MAX", 10),
        };
        Ok(Self {
            database_url,
            cors_origin: std::env::var("FRONTEND_URL").ok(),
            jwt,
            hash,
            rate_limit,
        })
    }

    /// In-memory configuration for the test suites; touches no env vars.
    pub fn for_tests() -> Self {
        Self {
            database_url: "sqlite::memory:".into(),
            cors_origin: None,
            jwt: JwtConfig {
                secret: "test-secret".into(),
                issuer: "test-issuer".into(),
                audience: "test-aud".into(),
                ttl_minutes: 60,
            },
            // Minimal cost so hashing does not dominate test time.
            hash: HashConfig {
                m_cost: 1024,
                t_cost: 1,
                p_cost: 1,
            },
            rate_limit: RateLimitConfig {
                window_secs: 15 * 60,
                max_requests: 100_000,
                auth_max_requests: 100_000,
            },
        }
    }
}

fn env_or<T: FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse::<T>().ok())
        .unwrap_or(default)
}
