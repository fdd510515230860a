//! Application configuration loaded from environment variables.

use std::env;
use std::str::FromStr;

use chrono::Utc;
use social_infra::JwtConfig;
use social_infra::auth::DEFAULT_SECRET;

#[cfg(feature = "postgres")]
use social_infra::DatabaseConfig;

use crate::telemetry::TelemetryConfig;

/// Configuration errors. Any of these aborts startup.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{key} must be a number, got '{value}'")]
    InvalidNumber { key: &'static str, value: String },

    #[error("ALGORITHM '{0}' is not supported, expected HS256, HS384 or HS512")]
    UnsupportedAlgorithm(String),

    #[error("{key} is out of range, got '{value}'")]
    OutOfRange { key: &'static str, value: i64 },
}

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    #[cfg(feature = "postgres")]
    pub database: Option<DatabaseConfig>,
    pub jwt: JwtConfig,
    pub telemetry: TelemetryConfig,
    pub production: bool,
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        #[cfg(feature = "postgres")]
        let database = match lookup("DATABASE_URL") {
            Some(url) => Some(DatabaseConfig {
                url,
                max_connections: parse_or(&lookup, "DB_MAX_CONNECTIONS", 100)?,
                min_connections: parse_or(&lookup, "DB_MIN_CONNECTIONS", 10)?,
            }),
            None => None,
        };

        let algorithm = match lookup("ALGORITHM") {
            Some(name) => {
                JwtConfig::parse_algorithm(&name).ok_or(ConfigError::UnsupportedAlgorithm(name))?
            }
            None => JwtConfig::default().algorithm,
        };

        let jwt = JwtConfig {
            secret: lookup("SECRET_KEY").unwrap_or_else(|| DEFAULT_SECRET.to_string()),
            algorithm,
            expire_minutes: parse_or(&lookup, "ACCESS_TOKEN_EXPIRE_MINUTES", 30)?,
        };
        check_token_lifetime(&jwt)?;

        Ok(Self {
            host: lookup("HOST").unwrap_or_else(|| "127.0.0.1".to_string()),
            port: parse_or(&lookup, "PORT", 8080)?,
            #[cfg(feature = "postgres")]
            database,
            jwt,
            telemetry: TelemetryConfig {
                json_logs: lookup("LOG_FORMAT")
                    .map(|v| v.eq_ignore_ascii_case("json"))
                    .unwrap_or(false),
            },
            production: lookup("RUST_ENV")
                .map(|v| v == "production" || v == "prod")
                .unwrap_or(false),
        })
    }

    /// Log a warning when the signing secret was never configured.
    pub fn warn_on_default_secret(&self) {
        if self.jwt.secret != DEFAULT_SECRET {
            return;
        }

        if self.production {
            tracing::error!(
                "SECURITY: Using default token secret in production! Set SECRET_KEY environment variable."
            );
        } else {
            tracing::warn!("Using default token secret. Set SECRET_KEY for production use.");
        }
    }
}

/// A lifetime must be positive and yield an expiry the clock can represent.
fn check_token_lifetime(jwt: &JwtConfig) -> Result<(), ConfigError> {
    let expiry = jwt
        .lifetime()
        .ok()
        .filter(|_| jwt.expire_minutes > 0)
        .and_then(|lifetime| Utc::now().checked_add_signed(lifetime));

    match expiry {
        Some(_) => Ok(()),
        None => Err(ConfigError::OutOfRange {
            key: "ACCESS_TOKEN_EXPIRE_MINUTES",
            value: jwt.expire_minutes,
        }),
    }
}

fn parse_or<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidNumber { key, value }),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn load(vars: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = load(&[]).unwrap();

        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 8080);
        assert_eq!(config.jwt.expire_minutes, 30);
        assert_eq!(config.jwt.secret, DEFAULT_SECRET);
        assert!(!config.telemetry.json_logs);
        #[cfg(feature = "postgres")]
        assert!(config.database.is_none());
    }

    #[test]
    fn test_overrides() {
        let config = load(&[
            ("PORT", "9000"),
            ("SECRET_KEY", "s3cret"),
            ("ALGORITHM", "HS512"),
            ("ACCESS_TOKEN_EXPIRE_MINUTES", "5"),
            ("LOG_FORMAT", "JSON"),
            ("DATABASE_URL", "postgres://localhost/social"),
        ])
        .unwrap();

        assert_eq!(config.port, 9000);
        assert_eq!(config.jwt.secret, "s3cret");
        assert_eq!(config.jwt.expire_minutes, 5);
        assert!(config.telemetry.json_logs);
        #[cfg(feature = "postgres")]
        {
            let database = config.database.unwrap();
            assert_eq!(database.url, "postgres://localhost/social");
            assert_eq!(database.max_connections, 100);
        }
    }

    #[test]
    fn test_rejects_bad_values() {
        assert!(matches!(
            load(&[("ALGORITHM", "RS256")]),
            Err(ConfigError::UnsupportedAlgorithm(_))
        ));
        assert!(matches!(
            load(&[("ACCESS_TOKEN_EXPIRE_MINUTES", "soon")]),
            Err(ConfigError::InvalidNumber { .. })
        ));
    }

    #[test]
    fn test_rejects_token_lifetime_out_of_range() {
        let max = i64::MAX.to_string();
        let past_calendar_end = (i64::MAX / 60_000).to_string();

        for minutes in ["0", "-5", max.as_str(), past_calendar_end.as_str()] {
            assert!(
                matches!(
                    load(&[("ACCESS_TOKEN_EXPIRE_MINUTES", minutes)]),
                    Err(ConfigError::OutOfRange {
                        key: "ACCESS_TOKEN_EXPIRE_MINUTES",
                        ..
                    })
                ),
                "{minutes} minutes should be rejected"
            );
        }

        let config = load(&[("ACCESS_TOKEN_EXPIRE_MINUTES", "1440")]).unwrap();
        assert_eq!(config.jwt.expire_minutes, 1440);
    }
}
