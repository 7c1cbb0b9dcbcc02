//! Server configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All variables are optional.
//!
//! - `ROLLCALL_DATABASE_URL` - `PostgreSQL` connection string (falls back to
//!   `DATABASE_URL`; when neither is set users are kept in memory)
//! - `ROLLCALL_HOST` - Bind address (default: 127.0.0.1)
//! - `ROLLCALL_PORT` - Listen port (default: 3000)
//! - `ROLLCALL_CORS_ORIGINS` - Comma separated frontend origins (default: <http://localhost:3001>)
//! - `ROLLCALL_PASSWORD_HASHER` - `bcrypt` or `argon2` (default: bcrypt)
//! - `ROLLCALL_BCRYPT_COST` - bcrypt work factor, 4..=31 (default: 10)
//! - `ROLLCALL_LOG_FORMAT` - `text` or `json` (default: text)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `SENTRY_TRACES_SAMPLE_RATE` - Fraction of requests traced, 0.0..=1.0 (default: 0.0)

use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;

use secrecy::SecretString;
use thiserror::Error;

use crate::services::password::{DEFAULT_BCRYPT_COST, HasherKind};

const DEFAULT_CORS_ORIGIN: &str = "http://localhost:3001";
const BCRYPT_COST_RANGE: std::ops::RangeInclusive<u32> = 4..=31;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "text" | "pretty" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            other => Err(format!("unknown log format '{other}' (expected text or json)")),
        }
    }
}

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// `PostgreSQL` database connection URL (contains password)
    pub database_url: Option<SecretString>,
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Origins allowed to call the API from a browser
    pub cors_origins: Vec<String>,
    /// Password hashing algorithm
    pub password_hasher: HasherKind,
    /// bcrypt work factor
    pub bcrypt_cost: u32,
    /// Log output format
    pub log_format: LogFormat,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name
    pub sentry_environment: Option<String>,
    /// Sentry performance sampling rate
    pub sentry_traces_sample_rate: f32,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            database_url: None,
            host: IpAddr::from([127, 0, 0, 1]),
            port: 3000,
            cors_origins: vec![DEFAULT_CORS_ORIGIN.to_owned()],
            password_hasher: HasherKind::default(),
            bcrypt_cost: DEFAULT_BCRYPT_COST,
            log_format: LogFormat::default(),
            sentry_dsn: None,
            sentry_environment: None,
            sentry_traces_sample_rate: 0.0,
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an invalid value.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an invalid value.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let env = Env(lookup);

        let database_url = env
            .optional("ROLLCALL_DATABASE_URL")
            .or_else(|| env.optional("DATABASE_URL"))
            .map(SecretString::from);
        let host = env.parsed_or("ROLLCALL_HOST", "127.0.0.1")?;
        let port = env.parsed_or("ROLLCALL_PORT", "3000")?;
        let cors_origins = parse_origins(&env.or_default("ROLLCALL_CORS_ORIGINS", DEFAULT_CORS_ORIGIN));
        let password_hasher = env.parsed_or("ROLLCALL_PASSWORD_HASHER", "bcrypt")?;
        let bcrypt_cost: u32 = env.parsed_or("ROLLCALL_BCRYPT_COST", "10")?;
        if !BCRYPT_COST_RANGE.contains(&bcrypt_cost) {
            return Err(ConfigError::InvalidEnvVar(
                "ROLLCALL_BCRYPT_COST".to_string(),
                format!("must be between 4 and 31 (got {bcrypt_cost})"),
            ));
        }
        let log_format = env.parsed_or("ROLLCALL_LOG_FORMAT", "text")?;

        let sentry_traces_sample_rate: f32 = env.parsed_or("SENTRY_TRACES_SAMPLE_RATE", "0.0")?;
        if !(0.0..=1.0).contains(&sentry_traces_sample_rate) {
            return Err(ConfigError::InvalidEnvVar(
                "SENTRY_TRACES_SAMPLE_RATE".to_string(),
                format!("must be between 0.0 and 1.0 (got {sentry_traces_sample_rate})"),
            ));
        }

        Ok(Self {
            database_url,
            host,
            port,
            cors_origins,
            password_hasher,
            bcrypt_cost,
            log_format,
            sentry_dsn: env.optional("SENTRY_DSN"),
            sentry_environment: env.optional("SENTRY_ENVIRONMENT"),
            sentry_traces_sample_rate,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Variable lookup with the usual accessors.
struct Env<F>(F);

impl<F> Env<F>
where
    F: Fn(&str) -> Option<String>,
{
    /// Get an optional variable. Empty values count as unset.
    fn optional(&self, key: &str) -> Option<String> {
        (self.0)(key).filter(|v| !v.trim().is_empty())
    }

    /// Get a variable with a default value.
    fn or_default(&self, key: &str, default: &str) -> String {
        self.optional(key).unwrap_or_else(|| default.to_string())
    }

    /// Get a variable with a default value and parse it.
    fn parsed_or<T>(&self, key: &str, default: &str) -> Result<T, ConfigError>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        self.or_default(key, default)
            .trim()
            .parse::<T>()
            .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
    }
}

/// Split a comma separated origin list, dropping blanks and trailing slashes.
fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|o| o.trim().trim_end_matches('/'))
        .filter(|o| !o.is_empty())
        .map(ToOwned::to_owned)
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;

    use rstest::rstest;
    use secrecy::ExposeSecret;

    use super::*;

    fn load(vars: &[(&str, &str)]) -> Result<ServerConfig, ConfigError> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect();
        ServerConfig::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = load(&[]).unwrap();

        assert!(config.database_url.is_none());
        assert_eq!(config.socket_addr().to_string(), "127.0.0.1:3000");
        assert_eq!(config.cors_origins, vec!["http://localhost:3001"]);
        assert_eq!(config.password_hasher, HasherKind::Bcrypt);
        assert_eq!(config.bcrypt_cost, 10);
        assert_eq!(config.log_format, LogFormat::Text);
        assert!(config.sentry_dsn.is_none());
    }

    #[test]
    fn test_database_url_fallback() {
        let config = load(&[("DATABASE_URL", "postgres://fallback/db")]).unwrap();
        assert_eq!(
            config.database_url.unwrap().expose_secret(),
            "postgres://fallback/db"
        );

        let config = load(&[
            ("DATABASE_URL", "postgres://fallback/db"),
            ("ROLLCALL_DATABASE_URL", "postgres://primary/db"),
        ])
        .unwrap();
        assert_eq!(
            config.database_url.unwrap().expose_secret(),
            "postgres://primary/db"
        );
    }

    #[test]
    fn test_overrides() {
        let config = load(&[
            ("ROLLCALL_HOST", "0.0.0.0"),
            ("ROLLCALL_PORT", "8080"),
            ("ROLLCALL_PASSWORD_HASHER", "argon2"),
            ("ROLLCALL_BCRYPT_COST", "12"),
            ("ROLLCALL_LOG_FORMAT", "json"),
            ("SENTRY_TRACES_SAMPLE_RATE", "0.25"),
        ])
        .unwrap();

        assert_eq!(config.socket_addr().to_string(), "0.0.0.0:8080");
        assert_eq!(config.password_hasher, HasherKind::Argon2);
        assert_eq!(config.bcrypt_cost, 12);
        assert_eq!(config.log_format, LogFormat::Json);
        assert!((config.sentry_traces_sample_rate - 0.25).abs() < f32::EPSILON);
    }

    #[test]
    fn test_invalid_port() {
        let err = load(&[("ROLLCALL_PORT", "not-a-port")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(ref k, _) if k == "ROLLCALL_PORT"));
    }

    #[rstest]
    #[case("3", false)]
    #[case("4", true)]
    #[case("31", true)]
    #[case("32", false)]
    #[case("ten", false)]
    fn test_bcrypt_cost_range(#[case] cost: &str, #[case] accepted: bool) {
        assert_eq!(load(&[("ROLLCALL_BCRYPT_COST", cost)]).is_ok(), accepted);
    }

    #[test]
    fn test_unknown_hasher() {
        let err = load(&[("ROLLCALL_PASSWORD_HASHER", "md5")]).unwrap_err();
        assert!(err.to_string().contains("ROLLCALL_PASSWORD_HASHER"));
    }

    #[test]
    fn test_sample_rate_out_of_range() {
        assert!(load(&[("SENTRY_TRACES_SAMPLE_RATE", "1.5")]).is_err());
    }

    #[test]
    fn test_parse_origins() {
        assert_eq!(
            parse_origins(" https://a.example/ , ,http://b.example:3001"),
            vec!["https://a.example", "http://b.example:3001"]
        );
    }

    #[test]
    fn test_debug_redacts_database_url() {
        let config = load(&[("ROLLCALL_DATABASE_URL", "postgres://user:hunter2@db/app")]).unwrap();
        assert!(!format!("{config:?}").contains("hunter2"));
    }
}
