use std::{env, sync::Arc};

use crate::config::Config;

pub trait ConfigService: Send + Sync {
    fn port(&self) -> u16;
    fn values(&self) -> &Config;
}

pub struct ConfigServiceImpl {
    config: Arc<Config>,
}

impl ConfigServiceImpl {
    fn strip_wrapping_quotes(value: &str) -> &str {
        if value.len() >= 2 {
            let bytes = value.as_bytes();
            let first = bytes[0];
            let last = bytes[value.len() - 1];
            if (first == b'"' && last == b'"') || (first == b'\'' && last == b'\'') {
                return &value[1..value.len() - 1];
            }
        }
        value
    }

    fn normalize(value: &str) -> Option<String> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return None;
        }
        let normalized = Self::strip_wrapping_quotes(trimmed).trim();
        if normalized.is_empty() {
            None
        } else {
            Some(normalized.to_string())
        }
    }

    fn env_nonempty(key: &str) -> Option<String> {
        env::var(key).ok().and_then(|value| Self::normalize(&value))
    }

    fn env_u16(key: &str) -> Option<u16> {
        Self::env_nonempty(key).and_then(|value| value.parse::<u16>().ok())
    }

    pub fn new() -> Self {
        let defaults = Config::default();
        let port = Self::env_u16("PORT").unwrap_or(defaults.port);
        let database_url = Self::env_nonempty("DATABASE_URL");
        let log_filter = Self::env_nonempty("RUST_LOG").unwrap_or(defaults.log_filter);
        let default_time_zone =
            Self::env_nonempty("DEFAULT_TIME_ZONE").unwrap_or(defaults.default_time_zone);

        let superuser_username = Self::env_nonempty("SUPERUSER_USERNAME");
        let superuser_email = Self::env_nonempty("SUPERUSER_EMAIL");
        let superuser_phone = Self::env_nonempty("SUPERUSER_PHONE");
        let superuser_password = Self::env_nonempty("SUPERUSER_PASSWORD");

        Self::from_config(Config {
            port,
            database_url,
            log_filter,
            default_time_zone,
            superuser_username,
            superuser_email,
            superuser_phone,
            superuser_password,
        })
    }

    pub fn from_config(config: Config) -> Self {
        Self {
            config: Arc::new(config),
        }
    }
}

impl ConfigService for ConfigServiceImpl {
    fn port(&self) -> u16 {
        self.config.port
    }

    fn values(&self) -> &Config {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quotes_and_blanks_are_stripped() {
        assert_eq!(
            ConfigServiceImpl::normalize("  \"postgres://db\" "),
            Some("postgres://db".to_string())
        );
        assert_eq!(
            ConfigServiceImpl::normalize("'Africa/Nairobi'"),
            Some("Africa/Nairobi".to_string())
        );
        assert_eq!(ConfigServiceImpl::normalize("\"\""), None);
        assert_eq!(ConfigServiceImpl::normalize("   "), None);
    }

    #[test]
    fn from_config_exposes_values() {
        let service = ConfigServiceImpl::from_config(Config {
            port: 8080,
            ..Config::default()
        });
        assert_eq!(service.port(), 8080);
        assert_eq!(service.values().default_time_zone, "UTC");
    }
}
