use std::env;
use std::str::FromStr;

use dotenvy::dotenv;

/// `DATABASE_URL` value that selects the in-process store.
pub const MEMORY_DATABASE: &str = "memory";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("{key} has invalid value {value:?}")]
    Invalid { key: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub server_addr: String,
    pub database_url: String,
    pub jwt_secret: String,
    pub access_token_ttl: usize,

    // Built-in administrator
    pub admin_username: String,
    pub admin_password_hash: String,

    // Rate limiting
    pub rate_login_per_min: u32,
    pub rate_protected_per_min: u32,

    pub api_prefix: String,
    pub log_level: String,
    pub run_migrations: bool,
}

fn required(key: &'static str) -> Result<String, ConfigError> {
    env::var(key).map_err(|_| ConfigError::Missing(key))
}

fn or_default(key: &'static str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn parsed<T: FromStr>(key: &'static str, default: &str) -> Result<T, ConfigError> {
    let value = or_default(key, default);
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::Invalid { key, value })
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv().ok();

        Ok(Self {
            server_addr: or_default("SERVER_ADDR", "127.0.0.1:8080"),
            database_url: required("DATABASE_URL")?,
            jwt_secret: required("JWT_SECRET")?,
            access_token_ttl: parsed("ACCESS_TOKEN_TTL", "86400")?, // 1 day

            admin_username: or_default("ADMIN_USERNAME", "admin"),
            admin_password_hash: required("ADMIN_PASSWORD_HASH")?,

            rate_login_per_min: parsed("RATE_LOGIN_PER_MIN", "60")?,
            rate_protected_per_min: parsed("RATE_PROTECTED_PER_MIN", "1000")?,

            api_prefix: or_default("API_PREFIX", "/api"),
            log_level: or_default("LOG_LEVEL", "info"),
            run_migrations: parsed("RUN_MIGRATIONS", "true")?,
        })
    }

    pub fn uses_memory_store(&self) -> bool {
        self.database_url == MEMORY_DATABASE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn malformed_numbers_are_rejected() {
        // SAFETY: the key is unique to this test.
        unsafe { env::set_var("LT_TEST_TTL", "one day") };
        match parsed::<usize>("LT_TEST_TTL", "86400") {
            Err(ConfigError::Invalid { key, value }) => {
                assert_eq!(key, "LT_TEST_TTL");
                assert_eq!(value, "one day");
            }
            other => panic!("expected invalid value, got {other:?}"),
        }
    }

    #[test]
    fn defaults_apply_when_unset() {
        assert_eq!(parsed::<u32>("LT_TEST_UNSET_RATE", "60").unwrap(), 60);
        assert!(parsed::<bool>("LT_TEST_UNSET_FLAG", "true").unwrap());
        assert!(matches!(
            required("LT_TEST_UNSET_SECRET"),
            Err(ConfigError::Missing("LT_TEST_UNSET_SECRET"))
        ));
    }
}
