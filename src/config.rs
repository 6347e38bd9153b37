// src/config.rs
use std::net::{IpAddr, Ipv4Addr};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("{name} has an invalid value: {value}")]
    Invalid { name: &'static str, value: String },
}

/// Bootstrap superuser created on startup when it does not exist yet.
#[derive(Debug, Clone)]
pub struct AdminAccount {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub host: IpAddr,
    pub port: u16,
    pub jwt_secret: String,
    pub session_hours: i64,
    pub bcrypt_cost: u32,
    pub admin: Option<AdminAccount>,
}

impl AppConfig {
    /// Reads the configuration from the process environment.
    /// Call `dotenvy::dotenv()` first to pick up a `.env` file.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = lookup("DATABASE_URL")
            .unwrap_or_else(|| "sqlite://inventory.db".to_string());

        let host = parse_or("HOST", &lookup, IpAddr::V4(Ipv4Addr::LOCALHOST))?;
        let port = parse_or("PORT", &lookup, 3000u16)?;
        let session_hours = parse_or("SESSION_HOURS", &lookup, 8i64)?;
        let bcrypt_cost = parse_or("BCRYPT_COST", &lookup, bcrypt::DEFAULT_COST)?;

        let jwt_secret = lookup("JWT_SECRET")
            .filter(|s| !s.is_empty())
            .ok_or(ConfigError::Missing("JWT_SECRET"))?;

        let admin = match (lookup("ADMIN_USERNAME"), lookup("ADMIN_PASSWORD")) {
            (Some(username), Some(password)) if !username.trim().is_empty() => Some(AdminAccount {
                username: username.trim().to_string(),
                password,
            }),
            _ => None,
        };

        Ok(Self {
            database_url,
            host,
            port,
            jwt_secret,
            session_hours,
            bcrypt_cost,
            admin,
        })
    }
}

fn parse_or<T, F>(name: &'static str, lookup: &F, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    F: Fn(&str) -> Option<String>,
{
    match lookup(name) {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { name, value }),
        None => Ok(default),
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
    fn defaults_apply_when_only_secret_is_set() {
        let config = config_from(&[("JWT_SECRET", "s3cret")]).unwrap();
        assert_eq!(config.database_url, "sqlite://inventory.db");
        assert_eq!(config.port, 3000);
        assert_eq!(config.session_hours, 8);
        assert!(config.admin.is_none());
    }

    #[test]
    fn missing_secret_is_rejected() {
        let err = config_from(&[]).unwrap_err();
        assert!(matches!(err, ConfigError::Missing("JWT_SECRET")));
    }

    #[test]
    fn invalid_port_is_reported() {
        let err = config_from(&[("JWT_SECRET", "x"), ("PORT", "eighty")]).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { name: "PORT", .. }));
    }

    #[test]
    fn admin_requires_both_variables() {
        let config = config_from(&[("JWT_SECRET", "x"), ("ADMIN_USERNAME", "root")]).unwrap();
        assert!(config.admin.is_none());

        let config = config_from(&[
            ("JWT_SECRET", "x"),
            ("ADMIN_USERNAME", "root"),
            ("ADMIN_PASSWORD", "pw"),
        ])
        .unwrap();
        assert_eq!(config.admin.unwrap().username, "root");
    }
}
