//! Configuration loaded from environment variables.
//!
//! Every key has a default; a `.env` file is honoured when the binary
//! starts.

use std::str::FromStr;

use planner_auth::AuthConfig;
use planner_db::DbConfig;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value {value:?} for {key}")]
    InvalidValue { key: &'static str, value: String },
}

/// HTTP listener settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Seconds between sweeps of expired sessions.
    pub session_sweep_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".into(),
            port: 8080,
            session_sweep_secs: 3600,
        }
    }
}

impl ServerConfig {
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[derive(Debug, Clone)]
pub struct PlannerConfig {
    pub server: ServerConfig,
    pub database: DbConfig,
    pub auth: AuthConfig,
}

impl PlannerConfig {
    /// Load from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load using `lookup` to resolve keys.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let server_defaults = ServerConfig::default();
        let db_defaults = DbConfig::default();
        let auth_defaults = AuthConfig::default();

        let text = |key: &str, default: String| lookup(key).unwrap_or(default);

        Ok(Self {
            server: ServerConfig {
                host: text("PLANNER_HOST", server_defaults.host),
                port: parsed(&lookup, "PLANNER_PORT", server_defaults.port)?,
                session_sweep_secs: parsed(
                    &lookup,
                    "PLANNER_SESSION_SWEEP_SECS",
                    server_defaults.session_sweep_secs,
                )?,
            },
            database: DbConfig {
                url: text("PLANNER_DB_URL", db_defaults.url),
                namespace: text("PLANNER_DB_NAMESPACE", db_defaults.namespace),
                database: text("PLANNER_DB_DATABASE", db_defaults.database),
                username: text("PLANNER_DB_USERNAME", db_defaults.username),
                password: text("PLANNER_DB_PASSWORD", db_defaults.password),
            },
            auth: AuthConfig {
                session_lifetime_secs: bounded(
                    &lookup,
                    "PLANNER_SESSION_LIFETIME_SECS",
                    auth_defaults.session_lifetime_secs,
                    AuthConfig::MAX_SESSION_LIFETIME_SECS,
                )?,
                pepper: lookup("PLANNER_PASSWORD_PEPPER").filter(|p| !p.is_empty()),
                min_password_length: parsed(
                    &lookup,
                    "PLANNER_MIN_PASSWORD_LENGTH",
                    auth_defaults.min_password_length,
                )?,
            },
        })
    }
}

fn parsed<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        None => Ok(default),
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue { key, value }),
    }
}

/// Like [`parsed`], but values above `max` are rejected.
fn bounded<F>(lookup: &F, key: &'static str, default: u64, max: u64) -> Result<u64, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let value = parsed(lookup, key, default)?;
    if value > max {
        return Err(ConfigError::InvalidValue {
            key,
            value: value.to_string(),
        });
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn load(pairs: &[(&str, &str)]) -> Result<PlannerConfig, ConfigError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        PlannerConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_when_unset() {
        let config = load(&[]).unwrap();

        assert_eq!(config.server, ServerConfig::default());
        assert_eq!(config.server.bind_addr(), "127.0.0.1:8080");
        assert_eq!(config.database.url, "ws://127.0.0.1:8000");
        assert_eq!(config.auth.session_lifetime_secs, 604_800);
        assert_eq!(config.auth.min_password_length, 8);
        assert!(config.auth.pepper.is_none());
    }

    #[test]
    fn overrides_are_applied() {
        let config = load(&[
            ("PLANNER_PORT", "9000"),
            ("PLANNER_DB_URL", "mem://"),
            ("PLANNER_PASSWORD_PEPPER", "pep"),
            ("PLANNER_SESSION_LIFETIME_SECS", " 60 "),
        ])
        .unwrap();

        assert_eq!(config.server.port, 9000);
        assert_eq!(config.database.url, "mem://");
        assert_eq!(config.auth.pepper.as_deref(), Some("pep"));
        assert_eq!(config.auth.session_lifetime_secs, 60);
    }

    #[test]
    fn empty_pepper_means_none() {
        let config = load(&[("PLANNER_PASSWORD_PEPPER", "")]).unwrap();
        assert!(config.auth.pepper.is_none());
    }

    #[test]
    fn invalid_number_is_an_error() {
        let err = load(&[("PLANNER_PORT", "eighty")]).unwrap_err();
        assert_eq!(
            err,
            ConfigError::InvalidValue {
                key: "PLANNER_PORT",
                value: "eighty".into(),
            }
        );
    }

    #[test]
    fn session_lifetime_is_bounded() {
        let max = AuthConfig::MAX_SESSION_LIFETIME_SECS.to_string();
        let config = load(&[("PLANNER_SESSION_LIFETIME_SECS", max.as_str())]).unwrap();
        assert_eq!(
            config.auth.session_lifetime_secs,
            AuthConfig::MAX_SESSION_LIFETIME_SECS
        );

        let err = load(&[("PLANNER_SESSION_LIFETIME_SECS", "10000000000000")]).unwrap_err();
        assert_eq!(
            err,
            ConfigError::InvalidValue {
                key: "PLANNER_SESSION_LIFETIME_SECS",
                value: "10000000000000".into(),
            }
        );
    }
}
