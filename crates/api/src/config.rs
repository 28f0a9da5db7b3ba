use crate::auth::jwt::JwtConfig;

/// Deployment environment, controlling how much error detail reaches clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnv {
    Development,
    Production,
}

impl AppEnv {
    fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "production" | "prod" => AppEnv::Production,
            _ => AppEnv::Development,
        }
    }
}

/// Output format of the process log.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable lines.
    Text,
    /// One JSON object per event, for log shippers.
    Json,
}

impl LogFormat {
    fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "json" => LogFormat::Json,
            _ => LogFormat::Text,
        }
    }
}

/// Server configuration loaded from environment variables.
///
/// All fields except the JWT secret have defaults suitable for local
/// development. In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3001`).
    pub port: u16,
    /// SQLite connection URL.
    pub database_url: String,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Interval between expired-session sweeps in seconds (default: `3600`).
    pub session_sweep_interval_secs: u64,
    pub environment: AppEnv,
    /// Take the client address from `X-Forwarded-For` (default: `false`).
    /// Only enable behind a reverse proxy that sets the header.
    pub trust_proxy: bool,
    pub log_format: LogFormat,
    /// Token signing secret and lifetimes.
    pub jwt: JwtConfig,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                       | Default                            |
    /// |-------------------------------|------------------------------------|
    /// | `HOST`                        | `0.0.0.0`                          |
    /// | `PORT`                        | `3001`                             |
    /// | `DATABASE_URL`                | `sqlite://skinledger.db?mode=rwc`  |
    /// | `CORS_ORIGINS`                | `http://localhost:5173`            |
    /// | `REQUEST_TIMEOUT_SECS`        | `30`                               |
    /// | `SESSION_SWEEP_INTERVAL_SECS` | `3600`                             |
    /// | `APP_ENV`                     | `development`                      |
    /// | `TRUST_PROXY`                 | `false`                            |
    /// | `LOG_FORMAT`                  | `text` (`json` for structured)     |
    ///
    /// See [`JwtConfig::from_env`] for the token settings.
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3001".into())
            .parse()
            .expect("PORT must be a valid u16");

        let database_url = std::env::var("DATABASE_URL")
            .unwrap_or_else(|_| "sqlite://skinledger.db?mode=rwc".into());

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let session_sweep_interval_secs: u64 = std::env::var("SESSION_SWEEP_INTERVAL_SECS")
            .unwrap_or_else(|_| "3600".into())
            .parse()
            .expect("SESSION_SWEEP_INTERVAL_SECS must be a valid u64");
        assert!(
            session_sweep_interval_secs > 0,
            "SESSION_SWEEP_INTERVAL_SECS must be positive"
        );

        let environment = AppEnv::parse(
            &std::env::var("APP_ENV").unwrap_or_else(|_| "development".into()),
        );

        let trust_proxy = parse_flag(&std::env::var("TRUST_PROXY").unwrap_or_default());

        let log_format =
            LogFormat::parse(&std::env::var("LOG_FORMAT").unwrap_or_else(|_| "text".into()));

        let jwt = JwtConfig::from_env();

        Self {
            host,
            port,
            database_url,
            cors_origins,
            request_timeout_secs,
            session_sweep_interval_secs,
            environment,
            trust_proxy,
            log_format,
            jwt,
        }
    }

    /// Whether 500 responses may carry the underlying error text.
    pub fn expose_error_details(&self) -> bool {
        self.environment != AppEnv::Production
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}
