use std::fmt::Display;
use std::str::FromStr;

use ivv_workflow::engine::DEFAULT_GENERATED_PASSWORD_LENGTH;

use crate::auth::jwt::JwtConfig;

/// Output format of the tracing subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable lines (default).
    Pretty,
    /// One JSON object per event.
    Json,
}

impl LogFormat {
    fn from_env_value(value: Option<String>) -> Self {
        match value.as_deref().map(str::trim) {
            Some(v) if v.eq_ignore_ascii_case("json") => LogFormat::Json,
            _ => LogFormat::Pretty,
        }
    }
}

/// Credentials for the ETS account created at startup when none exists yet.
#[derive(Debug, Clone)]
pub struct BootstrapAdmin {
    pub email: String,
    pub password: String,
}

/// Process configuration, read once at startup.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Browser origins allowed by CORS.
    pub cors_origins: Vec<String>,
    pub request_timeout_secs: u64,
    /// Drain window for in-flight requests after SIGINT/SIGTERM.
    pub shutdown_timeout_secs: u64,
    pub db_max_connections: u32,
    /// Length of generated one-time passwords.
    pub generated_password_length: usize,
    pub log_format: LogFormat,
    pub bootstrap_admin: Option<BootstrapAdmin>,
    pub jwt: JwtConfig,
}

/// Parse `key` from the environment, falling back to `default` when unset.
///
/// Panics when the variable is set but does not parse.
fn env_or<T>(key: &str, default: T) -> T
where
    T: FromStr,
    T::Err: Display,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .unwrap_or_else(|e| panic!("{key} has an invalid value '{raw}': {e}")),
        Err(_) => default,
    }
}

fn split_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .map(String::from)
        .collect()
}

impl ServerConfig {
    /// Build the configuration from environment variables.
    ///
    /// | Env Var                     | Default                    |
    /// |-----------------------------|----------------------------|
    /// | `HOST`                      | `0.0.0.0`                  |
    /// | `PORT`                      | `3000`                     |
    /// | `CORS_ORIGINS`              | `http://localhost:5173`    |
    /// | `REQUEST_TIMEOUT_SECS`      | `30`                       |
    /// | `SHUTDOWN_TIMEOUT_SECS`     | `30`                       |
    /// | `DB_MAX_CONNECTIONS`        | `20`                       |
    /// | `GENERATED_PASSWORD_LENGTH` | `16`                       |
    /// | `LOG_FORMAT`                | pretty (`json` for JSON)   |
    /// | `BOOTSTRAP_ADMIN_EMAIL`     | unset                      |
    /// | `BOOTSTRAP_ADMIN_PASSWORD`  | unset                      |
    ///
    /// JWT settings come from [`JwtConfig::from_env`].
    ///
    /// # Panics
    ///
    /// On any malformed value and on a missing `JWT_SECRET`, so a
    /// misconfigured server never starts.
    pub fn from_env() -> Self {
        let cors_origins = split_origins(
            &std::env::var("CORS_ORIGINS").unwrap_or_else(|_| "http://localhost:5173".into()),
        );

        let bootstrap_admin = match (
            std::env::var("BOOTSTRAP_ADMIN_EMAIL"),
            std::env::var("BOOTSTRAP_ADMIN_PASSWORD"),
        ) {
            (Ok(email), Ok(password)) if !email.trim().is_empty() => {
                Some(BootstrapAdmin { email, password })
            }
            _ => None,
        };

        Self {
            host: env_or("HOST", "0.0.0.0".to_string()),
            port: env_or("PORT", 3000),
            cors_origins,
            request_timeout_secs: env_or("REQUEST_TIMEOUT_SECS", 30),
            shutdown_timeout_secs: env_or("SHUTDOWN_TIMEOUT_SECS", 30),
            db_max_connections: env_or("DB_MAX_CONNECTIONS", 20),
            generated_password_length: env_or(
                "GENERATED_PASSWORD_LENGTH",
                DEFAULT_GENERATED_PASSWORD_LENGTH,
            ),
            log_format: LogFormat::from_env_value(std::env::var("LOG_FORMAT").ok()),
            bootstrap_admin,
            jwt: JwtConfig::from_env(),
        }
    }
}
