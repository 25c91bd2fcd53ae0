use anyhow::{ensure, Context, Result};

/// Upper bound for `SESSION_TTL_SECS`: ten years.
pub const MAX_SESSION_TTL_SECS: i64 = 10 * 365 * 24 * 60 * 60;

/// What cancelling a booking does to the class's enrollment counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeatPolicy {
    /// Enrollment counts every booking ever made.
    KeepOnCancel,
    /// The first cancellation of a booking gives its seat back.
    ReleaseOnCancel,
}

/// Application configuration loaded from environment variables.
/// Fails at startup if required variables are missing or malformed.
#[derive(Debug, Clone)]
pub struct Config {
    /// Absent means the service runs without persistence and every data call
    /// fails with an internal error.
    pub database_url: Option<String>,
    pub database_max_connections: u32,
    pub run_migrations: bool,
    pub session_secret: String,
    pub session_ttl_secs: i64,
    pub cookie_secure: bool,
    pub identity_callback_secret: Option<String>,
    pub owner_open_id: Option<String>,
    pub seat_policy: SeatPolicy,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let seat_policy = if parse_env("CANCEL_RELEASES_SEAT", false)? {
            SeatPolicy::ReleaseOnCancel
        } else {
            SeatPolicy::KeepOnCancel
        };

        Ok(Config {
            database_url: optional_env("DATABASE_URL"),
            database_max_connections: parse_env("DATABASE_MAX_CONNECTIONS", 10)?,
            run_migrations: parse_env("RUN_MIGRATIONS", true)?,
            session_secret: require_env("SESSION_SECRET")?,
            session_ttl_secs: session_ttl(parse_env("SESSION_TTL_SECS", 365 * 24 * 60 * 60)?)?,
            cookie_secure: parse_env("COOKIE_SECURE", true)?,
            identity_callback_secret: optional_env("IDENTITY_CALLBACK_SECRET"),
            owner_open_id: optional_env("OWNER_OPEN_ID"),
            seat_policy,
            port: parse_env("PORT", 8080)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

fn session_ttl(secs: i64) -> Result<i64> {
    ensure!(
        (1..=MAX_SESSION_TTL_SECS).contains(&secs),
        "SESSION_TTL_SECS must be between 1 and {MAX_SESSION_TTL_SECS}, got {secs}"
    );
    Ok(secs)
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match optional_env(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("Environment variable '{key}' has an invalid value '{raw}'")),
        None => Ok(default),
    }
}

#[cfg(test)]
impl Config {
    pub fn for_tests() -> Self {
        Config {
            database_url: None,
            database_max_connections: 1,
            run_migrations: false,
            session_secret: "test-session-secret".to_string(),
            session_ttl_secs: 3600,
            cookie_secure: false,
            identity_callback_secret: Some("test-identity-secret".to_string()),
            owner_open_id: Some("owner-open-id".to_string()),
            seat_policy: SeatPolicy::KeepOnCancel,
            port: 0,
            rust_log: "debug".to_string(),
        }
    }
}
