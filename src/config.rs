use std::env;
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_DATABASE_URL: &str = "sqlite://data/app.db";
pub const DEFAULT_SERVER_ADDRESS: &str = "0.0.0.0:3000";
const PORT_ONLY_HOST: &str = "0.0.0.0";
pub const DEFAULT_PUBLIC_DIR: &str = "public";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminSeed {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub server_address: String,
    pub public_dir: PathBuf,
    // None disables the background sweeper
    pub sweep_interval: Option<Duration>,
    pub admin_seed: Option<AdminSeed>,
}

#[derive(Debug, PartialEq, Eq)]
pub enum ConfigError {
    InvalidNumber { key: &'static str, value: String },
    MissingPair { present: &'static str, missing: &'static str },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidNumber { key, value } => {
                write!(f, "{} is not a valid number: {:?}", key, value)
            }
            ConfigError::MissingPair { present, missing } => {
                write!(f, "{} is set but {} is not", present, missing)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

impl AppConfig {
    /// Reads the process environment (after `.env` has been loaded).
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let sweep_interval = match non_empty("SESSION_SWEEP_INTERVAL_SECS") {
            None => None,
            Some(raw) => match raw.trim().parse::<u64>() {
                Ok(0) => None,
                Ok(secs) => Some(Duration::from_secs(secs)),
                Err(_) => {
                    return Err(ConfigError::InvalidNumber {
                        key: "SESSION_SWEEP_INTERVAL_SECS",
                        value: raw,
                    })
                }
            },
        };

        let admin_seed = match (non_empty("ADMIN_USERNAME"), non_empty("ADMIN_PASSWORD")) {
            (Some(username), Some(password)) => Some(AdminSeed { username, password }),
            (None, None) => None,
            (Some(_), None) => {
                return Err(ConfigError::MissingPair {
                    present: "ADMIN_USERNAME",
                    missing: "ADMIN_PASSWORD",
                })
            }
            (None, Some(_)) => {
                return Err(ConfigError::MissingPair {
                    present: "ADMIN_PASSWORD",
                    missing: "ADMIN_USERNAME",
                })
            }
        };

        // SERVER_ADDRESS wins; a bare PORT listens on every interface
        let server_address = match (non_empty("SERVER_ADDRESS"), non_empty("PORT")) {
            (Some(address), _) => address,
            (None, Some(raw)) => match raw.trim().parse::<u16>() {
                Ok(port) => format!("{}:{}", PORT_ONLY_HOST, port),
                Err(_) => return Err(ConfigError::InvalidNumber { key: "PORT", value: raw }),
            },
            (None, None) => DEFAULT_SERVER_ADDRESS.to_string(),
        };

        Ok(AppConfig {
            database_url: non_empty("DATABASE_URL").unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string()),
            server_address,
            public_dir: non_empty("PUBLIC_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_PUBLIC_DIR)),
            sweep_interval,
            admin_seed,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_when_unset() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.database_url, DEFAULT_DATABASE_URL);
        assert_eq!(config.server_address, DEFAULT_SERVER_ADDRESS);
        assert_eq!(config.public_dir, PathBuf::from("public"));
        assert_eq!(config.sweep_interval, None);
        assert_eq!(config.admin_seed, None);
    }

    #[test]
    fn reads_overrides() {
        let config = config_from(&[
            ("DATABASE_URL", "sqlite::memory:"),
            ("SERVER_ADDRESS", "127.0.0.1:8080"),
            ("PUBLIC_DIR", "/srv/www"),
            ("SESSION_SWEEP_INTERVAL_SECS", "300"),
            ("ADMIN_USERNAME", "admin"),
            ("ADMIN_PASSWORD", "changeme"),
        ])
        .unwrap();
        assert_eq!(config.database_url, "sqlite::memory:");
        assert_eq!(config.server_address, "127.0.0.1:8080");
        assert_eq!(config.public_dir, PathBuf::from("/srv/www"));
        assert_eq!(config.sweep_interval, Some(Duration::from_secs(300)));
        assert_eq!(
            config.admin_seed,
            Some(AdminSeed { username: "admin".into(), password: "changeme".into() })
        );
    }

    #[test]
    fn port_alone_sets_listen_address() {
        let config = config_from(&[("PORT", "8088")]).unwrap();
        assert_eq!(config.server_address, "0.0.0.0:8088");

        let config = config_from(&[("PORT", "8088"), ("SERVER_ADDRESS", "127.0.0.1:9000")]).unwrap();
        assert_eq!(config.server_address, "127.0.0.1:9000");

        let err = config_from(&[("PORT", "eighty")]).unwrap_err();
        assert_eq!(err, ConfigError::InvalidNumber { key: "PORT", value: "eighty".into() });
        assert!(config_from(&[("PORT", "70000")]).is_err());
    }

    #[test]
    fn zero_interval_disables_sweeper() {
        let config = config_from(&[("SESSION_SWEEP_INTERVAL_SECS", "0")]).unwrap();
        assert_eq!(config.sweep_interval, None);
    }

    #[test]
    fn rejects_bad_interval() {
        let err = config_from(&[("SESSION_SWEEP_INTERVAL_SECS", "soon")]).unwrap_err();
        assert_eq!(
            err,
            ConfigError::InvalidNumber { key: "SESSION_SWEEP_INTERVAL_SECS", value: "soon".into() }
        );
    }

    #[test]
    fn admin_seed_needs_both_halves() {
        let err = config_from(&[("ADMIN_USERNAME", "admin")]).unwrap_err();
        assert_eq!(
            err,
            ConfigError::MissingPair { present: "ADMIN_USERNAME", missing: "ADMIN_PASSWORD" }
        );
        assert!(config_from(&[("ADMIN_PASSWORD", "x")]).is_err());
    }
}
