use std::env;

use crate::error::ConfigError;

pub const STORE_URL_VAR: &str = "KEYDRILL_STORE_URL";
pub const STORE_KEY_VAR: &str = "KEYDRILL_STORE_KEY";
pub const ACCESS_PASSWORD_VAR: &str = "KEYDRILL_ACCESS_PASSWORD";

/// Process configuration, read once at startup.
///
/// The store endpoint and credential belong to the remote score store; the
/// access password is the shared secret players log in with. None of these
/// have defaults and none may be blank.
#[derive(Clone, Debug)]
pub struct AppConfig {
    pub store_url: String,
    pub store_key: String,
    pub access_password: String,
}

impl AppConfig {
    /// Reads configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Missing` naming the first absent or blank
    /// variable. The caller is expected to treat this as fatal.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Reads configuration through an injectable lookup, for tests.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Missing` naming the first absent or blank key.
    pub fn from_lookup(
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let require = |key: &'static str| match lookup(key) {
            Some(value) if !value.trim().is_empty() => Ok(value),
            _ => Err(ConfigError::Missing(key)),
        };

        Ok(Self {
            store_url: require(STORE_URL_VAR)?,
            store_key: require(STORE_KEY_VAR)?,
            access_password: require(ACCESS_PASSWORD_VAR)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_env(key: &str) -> Option<String> {
        match key {
            STORE_URL_VAR => Some("https://store.example".to_string()),
            STORE_KEY_VAR => Some("anon-key".to_string()),
            ACCESS_PASSWORD_VAR => Some("open sesame".to_string()),
            _ => None,
        }
    }

    #[test]
    fn loads_all_three_values() {
        let config = AppConfig::from_lookup(full_env).unwrap();
        assert_eq!(config.store_url, "https://store.example");
        assert_eq!(config.store_key, "anon-key");
        assert_eq!(config.access_password, "open sesame");
    }

    #[test]
    fn missing_value_is_an_error() {
        let err = AppConfig::from_lookup(|key| {
            if key == STORE_KEY_VAR {
                None
            } else {
                full_env(key)
            }
        })
        .unwrap_err();
        assert!(matches!(err, ConfigError::Missing(STORE_KEY_VAR)));
    }

    #[test]
    fn blank_value_is_an_error() {
        let err = AppConfig::from_lookup(|key| {
            if key == ACCESS_PASSWORD_VAR {
                Some("   ".to_string())
            } else {
                full_env(key)
            }
        })
        .unwrap_err();
        assert!(matches!(err, ConfigError::Missing(ACCESS_PASSWORD_VAR)));
    }
}
