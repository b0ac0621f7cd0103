//! Process configuration.
//!
//! Read once from the environment at startup, then passed by reference into
//! each component's constructor. Never global, never mutated.

use std::env;
use std::fmt;
use std::time::Duration;

use crate::types::ConfigError;

pub const DEFAULT_API_URL: &str = "http://localhost:3000";
pub const DEFAULT_REFRESH_INTERVAL_SECS: u64 = 300;

const ENV_API_URL: &str = "VITRINE_API_URL";
const ENV_EMAIL: &str = "VITRINE_EMAIL";
const ENV_PASSWORD: &str = "VITRINE_PASSWORD";
const ENV_REFRESH_INTERVAL: &str = "VITRINE_REFRESH_INTERVAL";

#[derive(Clone, PartialEq, Eq)]
pub struct Config {
    pub api_base_url: String,
    pub email: String,
    pub password: String,
    pub refresh_interval: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds the configuration from any name-to-value lookup.
    ///
    /// Credentials are required; the portal address and the refresh
    /// interval have defaults. Empty values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |name: &'static str| lookup(name).filter(|value| !value.is_empty());

        let api_base_url = get(ENV_API_URL).unwrap_or_else(|| DEFAULT_API_URL.to_owned());
        let email = get(ENV_EMAIL).ok_or(ConfigError::Missing(ENV_EMAIL))?;
        let password = get(ENV_PASSWORD).ok_or(ConfigError::Missing(ENV_PASSWORD))?;

        let refresh_interval = match get(ENV_REFRESH_INTERVAL) {
            Some(raw) => {
                let secs: u64 = raw.trim().parse().map_err(|_| ConfigError::Invalid {
                    name: ENV_REFRESH_INTERVAL,
                    value: raw.clone(),
                })?;
                Duration::from_secs(secs)
            }
            None => Duration::from_secs(DEFAULT_REFRESH_INTERVAL_SECS),
        };

        Ok(Self {
            api_base_url,
            email,
            password,
            refresh_interval,
        })
    }
}

// Keeps the secret out of the startup log line.
impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("api_base_url", &self.api_base_url)
            .field("email", &self.email)
            .field("password", &"***")
            .field("refresh_interval", &self.refresh_interval)
            .finish()
    }
}
