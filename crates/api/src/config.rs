use crate::auth::jwt::JwtConfig;

/// Server configuration loaded from environment variables.
///
/// Defaults suit local development; production overrides through the
/// environment (or a `.env` file loaded by `dotenvy`).
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Parsed from comma-separated `CORS_ORIGINS`.
    pub cors_origins: Vec<String>,
    pub request_timeout_secs: u64,
    /// Upper bound on waiting for background tasks after the listener stops.
    pub shutdown_timeout_secs: u64,
    pub jwt: JwtConfig,
    /// Public site used to build invite and share links.
    pub public_site_url: String,
    pub database_url: String,
    pub db_max_connections: u32,
    pub email_poll_interval_secs: u64,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                    | Default                       |
    /// |----------------------------|-------------------------------|
    /// | `HOST`                     | `0.0.0.0`                     |
    /// | `PORT`                     | `3000`                        |
    /// | `CORS_ORIGINS`             | `http://localhost:5173`       |
    /// | `REQUEST_TIMEOUT_SECS`     | `30`                          |
    /// | `SHUTDOWN_TIMEOUT_SECS`    | `30`                          |
    /// | `PUBLIC_SITE_URL`          | `https://masterclass-onm.fr`  |
    /// | `DATABASE_URL`             | required                      |
    /// | `DB_MAX_CONNECTIONS`       | `20`                          |
    /// | `EMAIL_POLL_INTERVAL_SECS` | `60`                          |
    ///
    /// JWT variables are documented on [`JwtConfig::from_env`]; SMTP
    /// variables on `masterclass_events::EmailConfig::from_env`.
    ///
    /// # Panics
    ///
    /// Panics on a missing `DATABASE_URL` or an unparsable number.
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = env_or("PORT", "3000")
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = env_or("CORS_ORIGINS", "http://localhost:5173")
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = env_or("REQUEST_TIMEOUT_SECS", "30")
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let shutdown_timeout_secs: u64 = env_or("SHUTDOWN_TIMEOUT_SECS", "30")
            .parse()
            .expect("SHUTDOWN_TIMEOUT_SECS must be a valid u64");

        let public_site_url = env_or("PUBLIC_SITE_URL", "https://masterclass-onm.fr");

        let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");

        let db_max_connections: u32 = env_or("DB_MAX_CONNECTIONS", "20")
            .parse()
            .expect("DB_MAX_CONNECTIONS must be a valid u32");

        let email_poll_interval_secs: u64 = env_or("EMAIL_POLL_INTERVAL_SECS", "60")
            .parse()
            .expect("EMAIL_POLL_INTERVAL_SECS must be a valid u64");

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            shutdown_timeout_secs,
            jwt: JwtConfig::from_env(),
            public_site_url,
            database_url,
            db_max_connections,
            email_poll_interval_secs,
        }
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
