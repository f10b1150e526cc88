use std::collections::HashMap;

use thiserror::Error;

use crate::database::connection::get_database_url;

const DATABASE_URL: &str = "TASKHUB_DATABASE_URL";
const BCRYPT_COST: &str = "TASKHUB_BCRYPT_COST";
const PASSWORD_MIN_LENGTH: &str = "TASKHUB_PASSWORD_MIN_LENGTH";
const PASSWORD_REQUIRE_DIGIT: &str = "TASKHUB_PASSWORD_REQUIRE_DIGIT";
const PASSWORD_REQUIRE_LOWERCASE: &str = "TASKHUB_PASSWORD_REQUIRE_LOWERCASE";
const PASSWORD_REQUIRE_UPPERCASE: &str = "TASKHUB_PASSWORD_REQUIRE_UPPERCASE";
const PASSWORD_REQUIRE_NON_ALPHANUMERIC: &str = "TASKHUB_PASSWORD_REQUIRE_NON_ALPHANUMERIC";
const PASSWORD_REQUIRED_UNIQUE_CHARS: &str = "TASKHUB_PASSWORD_REQUIRED_UNIQUE_CHARS";

// Range accepted by bcrypt.
const MIN_BCRYPT_COST: u32 = 4;
const MAX_BCRYPT_COST: u32 = 31;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{key} must be an integer, got '{value}'")]
    InvalidInteger { key: &'static str, value: String },

    #[error("{key} must be a boolean, got '{value}'")]
    InvalidBoolean { key: &'static str, value: String },

    #[error("{key} is out of range: {reason}")]
    OutOfRange { key: &'static str, reason: String },
}

/// Password rules enforced by the default password validator.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PasswordPolicyConfig {
    pub required_length: usize,
    pub require_digit: bool,
    pub require_lowercase: bool,
    pub require_uppercase: bool,
    pub require_non_alphanumeric: bool,
    pub required_unique_chars: usize,
}

impl Default for PasswordPolicyConfig {
    fn default() -> Self {
        Self {
            required_length: 6,
            require_digit: true,
            require_lowercase: true,
            require_uppercase: true,
            require_non_alphanumeric: true,
            required_unique_chars: 1,
        }
    }
}

/// Runtime configuration loaded from environment variables.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AppConfig {
    pub database_url: String,
    pub bcrypt_cost: u32,
    pub password_policy: PasswordPolicyConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database_url: get_database_url(None),
            bcrypt_cost: bcrypt::DEFAULT_COST,
            password_policy: PasswordPolicyConfig::default(),
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let values = Self::tracked_keys()
            .iter()
            .filter_map(|key| std::env::var(key).ok().map(|value| (key.to_string(), value)))
            .collect::<HashMap<_, _>>();
        Self::from_map(&values)
    }

    pub fn from_map(values: &HashMap<String, String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let policy = PasswordPolicyConfig::default();

        let database_url = read(values, DATABASE_URL).unwrap_or(defaults.database_url);

        let bcrypt_cost = read_integer(values, BCRYPT_COST)?.unwrap_or(defaults.bcrypt_cost);
        if !(MIN_BCRYPT_COST..=MAX_BCRYPT_COST).contains(&bcrypt_cost) {
            return Err(ConfigError::OutOfRange {
                key: BCRYPT_COST,
                reason: format!(
                    "expected {}..={}, got {}",
                    MIN_BCRYPT_COST, MAX_BCRYPT_COST,
                    bcrypt_cost
                ),
            });
        }

        let password_policy = PasswordPolicyConfig {
            required_length: read_integer(values, PASSWORD_MIN_LENGTH)?
                .unwrap_or(policy.required_length),
            require_digit: read_bool(values, PASSWORD_REQUIRE_DIGIT)?
                .unwrap_or(policy.require_digit),
            require_lowercase: read_bool(values, PASSWORD_REQUIRE_LOWERCASE)?
                .unwrap_or(policy.require_lowercase),
            require_uppercase: read_bool(values, PASSWORD_REQUIRE_UPPERCASE)?
                .unwrap_or(policy.require_uppercase),
            require_non_alphanumeric: read_bool(values, PASSWORD_REQUIRE_NON_ALPHANUMERIC)?
                .unwrap_or(policy.require_non_alphanumeric),
            required_unique_chars: read_integer(values, PASSWORD_REQUIRED_UNIQUE_CHARS)?
                .unwrap_or(policy.required_unique_chars),
        };

        Ok(Self {
            database_url,
            bcrypt_cost,
            password_policy,
        })
    }

    /// Override the database location, typically from a CLI flag.
    pub fn with_database_path(mut self, path: Option<&str>) -> Self {
        if let Some(path) = path {
            self.database_url = get_database_url(Some(path));
        }
        self
    }

    fn tracked_keys() -> &'static [&'static str] {
        &[
            DATABASE_URL,
            BCRYPT_COST,
            PASSWORD_MIN_LENGTH,
            PASSWORD_REQUIRE_DIGIT,
            PASSWORD_REQUIRE_LOWERCASE,
            PASSWORD_REQUIRE_UPPERCASE,
            PASSWORD_REQUIRE_NON_ALPHANUMERIC,
            PASSWORD_REQUIRED_UNIQUE_CHARS,
        ]
    }
}

fn read(values: &HashMap<String, String>, key: &str) -> Option<String> {
    values
        .get(key)
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn read_integer<T: std::str::FromStr>(
    values: &HashMap<String, String>,
    key: &'static str,
) -> Result<Option<T>, ConfigError> {
    match read(values, key) {
        Some(value) => value
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::InvalidInteger { key, value }),
        None => Ok(None),
    }
}

fn read_bool(
    values: &HashMap<String, String>,
    key: &'static str,
) -> Result<Option<bool>, ConfigError> {
    match read(values, key) {
        Some(value) => match value.to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Ok(Some(true)),
            "0" | "false" | "no" | "off" => Ok(Some(false)),
            _ => Err(ConfigError::InvalidBoolean { key, value }),
        },
        None => Ok(None),
    }
}
