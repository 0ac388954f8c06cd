use std::{env, fmt::Display, str::FromStr, time::Duration};

use tracing::{info, warn};

pub struct Config {
    pub port: u16,
    pub board_api_url: String,
    pub board_api_timeout: Duration,
    pub cors_max_age: Duration,
    pub like_fetch_concurrency: usize,
}

impl Config {
    pub fn load() -> Self {
        Self {
            port: try_load("RUST_PORT", "3001"),
            board_api_url: try_load("BOARD_API_URL", "http://localhost:3000"),
            board_api_timeout: Duration::from_millis(try_load("BOARD_API_TIMEOUT_MS", "5000")),
            cors_max_age: Duration::from_secs(try_load("CORS_MAX_AGE_SECS", "3600")),
            like_fetch_concurrency: try_load::<usize>("LIKE_FETCH_CONCURRENCY", "8").max(1),
        }
    }
}

fn var(key: &str) -> Result<String, ()> {
    env::var(key).map_err(|_| {
        warn!("Environment variable {key} not found, using default");
    })
}

fn try_load<T: FromStr>(key: &str, default: &str) -> T
where
    T::Err: Display,
{
    let raw = var(key).unwrap_or_else(|_| {
        info!("{key} not set, using default: {default}");
        default.to_string()
    });

    parse(key, &raw).expect("Environment misconfigured!")
}

fn parse<T: FromStr>(key: &str, raw: &str) -> Result<T, String>
where
    T::Err: Display,
{
    raw.trim().parse().map_err(|e| {
        warn!("Invalid {key} value: {e}");
        format!("{key}: {e}")
    })
}
