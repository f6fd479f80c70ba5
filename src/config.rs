use std::{env, path::PathBuf};

use anyhow::{Context, bail};

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub max_connections: u32,
    pub jwt_secret: String,
    pub token_ttl_hours: i64,
    pub invoice_dir: Option<PathBuf>,
}

/// Connection settings alone, for the binaries that never serve requests.
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub database_url: String,
    pub max_connections: u32,
}

impl DatabaseConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let database_url = lookup("DATABASE_URL").context("DATABASE_URL is not set")?;
        let max_connections = lookup("DB_MAX_CONNECTIONS")
            .and_then(|n| n.parse::<u32>().ok())
            .filter(|n| *n > 0)
            .unwrap_or(10);
        Ok(Self {
            database_url,
            max_connections,
        })
    }
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from an arbitrary key lookup so it can be exercised without
    /// touching the process environment.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let DatabaseConfig {
            database_url,
            max_connections,
        } = DatabaseConfig::from_lookup(&lookup)?;
        let jwt_secret = lookup("JWT_SECRET").context("JWT_SECRET is not set")?;
        if jwt_secret.trim().is_empty() {
            bail!("JWT_SECRET must not be empty");
        }

        let host = lookup("APP_HOST").unwrap_or_else(|| "127.0.0.1".to_string());
        let port = lookup("APP_PORT")
            .and_then(|p| p.parse::<u16>().ok())
            .unwrap_or(3000);
        let token_ttl_hours = lookup("TOKEN_TTL_HOURS")
            .and_then(|h| h.parse::<i64>().ok())
            .filter(|h| *h > 0)
            .unwrap_or(24);
        let invoice_dir = lookup("INVOICE_DIR")
            .filter(|dir| !dir.trim().is_empty())
            .map(PathBuf::from);

        Ok(Self {
            database_url,
            host,
            port,
            max_connections,
            jwt_secret,
            token_ttl_hours,
            invoice_dir,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn applies_defaults() {
        let config = AppConfig::from_lookup(lookup_from(&[
            ("DATABASE_URL", "postgres://localhost/market"),
            ("JWT_SECRET", "s3cret"),
        ]))
        .unwrap();

        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 3000);
        assert_eq!(config.max_connections, 10);
        assert_eq!(config.token_ttl_hours, 24);
        assert!(config.invoice_dir.is_none());
    }

    #[test]
    fn requires_signing_secret() {
        let missing = AppConfig::from_lookup(lookup_from(&[(
            "DATABASE_URL",
            "postgres://localhost/market",
        )]));
        assert!(missing.is_err());

        let blank = AppConfig::from_lookup(lookup_from(&[
            ("DATABASE_URL", "postgres://localhost/market"),
            ("JWT_SECRET", "   "),
        ]));
        assert!(blank.is_err());
    }

    #[test]
    fn ignores_unparseable_numbers() {
        let config = AppConfig::from_lookup(lookup_from(&[
            ("DATABASE_URL", "postgres://localhost/market"),
            ("JWT_SECRET", "s3cret"),
            ("APP_PORT", "not-a-port"),
            ("TOKEN_TTL_HOURS", "-4"),
            ("INVOICE_DIR", "/var/invoices"),
        ]))
        .unwrap();

        assert_eq!(config.port, 3000);
        assert_eq!(config.token_ttl_hours, 24);
        assert_eq!(config.invoice_dir, Some(PathBuf::from("/var/invoices")));
    }

    #[test]
    fn database_settings_do_not_need_a_secret() {
        let db = DatabaseConfig::from_lookup(lookup_from(&[
            ("DATABASE_URL", "postgres://localhost/market"),
            ("DB_MAX_CONNECTIONS", "4"),
        ]))
        .unwrap();
        assert_eq!(db.database_url, "postgres://localhost/market");
        assert_eq!(db.max_connections, 4);

        assert!(DatabaseConfig::from_lookup(lookup_from(&[])).is_err());
    }
}
