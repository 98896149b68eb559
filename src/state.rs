use std::{
    net::IpAddr,
    num::NonZeroU32,
    str::FromStr,
    sync::Arc,
    time::{Duration, Instant},
};

use anyhow::Context;
use governor::{clock::DefaultClock, state::keyed::DefaultKeyedStateStore, Quota, RateLimiter};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};

use crate::config::AppConfig;

pub type IpLimiter = RateLimiter<IpAddr, DefaultKeyedStateStore<IpAddr>, DefaultClock>;

#[derive(Clone)]
pub struct AppState {
    pub db: SqlitePool,
    pub config: Arc<AppConfig>,
    pub limiter: Arc<IpLimiter>,
    pub auth_limiter: Arc<IpLimiter>,
    pub started: Instant,
}

impl AppState {
    pub async fn init() -> anyhow::Result<Self> {
        Self::from_config(AppConfig::from_env()?).await
    }

    pub async fn from_config(config: AppConfig) -> anyhow::Result<Self> {
        let options = SqliteConnectOptions::from_str(&config.database_url)
            .context("parse DATABASE_URL")?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .foreign_keys(true);

        // An in-memory database lives and dies with its connection.
        let max_connections = if config.database_url.contains(":memory:") {
            1
        } else {
            10
        };
        let db = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect_with(options)
            .await
            .context("connect to database")?;

        let limiter = Arc::new(keyed_limiter(
            config.rate_limit.window_secs,
            config.rate_limit.max_requests,
        )?);
        let auth_limiter = Arc::new(keyed_limiter(
            config.rate_limit.window_secs,
            config.rate_limit.auth_max_requests,
        )?);

        Ok(Self {
            db,
            config: Arc::new(config),
            limiter,
            auth_limiter,
            started: Instant::now(),
        })
    }

    pub async fn for_tests() -> Self {
        Self::from_config(AppConfig::for_tests())
            .await
            .expect("test state should construct")
    }
}

fn keyed_limiter(window_secs: u64, max_requests: u32) -> anyhow::Result<IpLimiter> {
    let burst = NonZeroU32::new(max_requests.max(1)).context("rate limit burst")?;
    let period = Duration::from_secs(window_secs.max(1)) / burst.get();
    let quota = Quota::with_period(period)
        .context("rate limit period")?
        .allow_burst(burst);
    Ok(RateLimiter::keyed(quota))
}
