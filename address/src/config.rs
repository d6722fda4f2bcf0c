//! Configuration for the address lookup and widget.

use crate::constants::{
    DEFAULT_CLOSE_DELAY, DEFAULT_LOOKUP_TIMEOUT, DEFAULT_PROVIDER_URL, PLACEHOLDER_LABEL, env_vars,
};
use crate::error::ConfigError;
use std::time::Duration;

/// Lookup client configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupConfig {
    /// Provider base URL, without the `/{cep}/json/` suffix
    pub base_url: String,

    /// Upper bound on a single request
    pub timeout: Duration,
}

impl Default for LookupConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_PROVIDER_URL.to_string(),
            timeout: DEFAULT_LOOKUP_TIMEOUT,
        }
    }
}

impl LookupConfig {
    /// Set the provider base URL.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Set the request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Defaults overridden by `VITRINE_CEP_PROVIDER_URL` and
    /// `VITRINE_CEP_TIMEOUT_MS`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] if a variable is set but unusable.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_source(|key| std::env::var(key).ok())
    }

    /// Same as [`Self::from_env`] over an arbitrary variable source.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] if a variable is set but unusable.
    pub fn from_source(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(url) = lookup(env_vars::PROVIDER_URL) {
            let url = url.trim();
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(ConfigError::InvalidValue {
                    key: env_vars::PROVIDER_URL,
                    message: format!("expected an http(s) URL, got {url:?}"),
                });
            }
            config.base_url = url.to_string();
        }

        if let Some(raw) = lookup(env_vars::TIMEOUT_MS) {
            let millis: u64 = raw.trim().parse().map_err(|e| ConfigError::InvalidValue {
                key: env_vars::TIMEOUT_MS,
                message: format!("{e}"),
            })?;
            if millis == 0 {
                return Err(ConfigError::InvalidValue {
                    key: env_vars::TIMEOUT_MS,
                    message: "timeout must be positive".to_string(),
                });
            }
            config.timeout = Duration::from_millis(millis);
        }

        Ok(config)
    }
}

/// Widget presentation settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WidgetConfig {
    /// Grace period between the pointer leaving and the popup closing
    pub close_delay: Duration,

    /// Trigger label shown until an address is known
    pub placeholder: String,
}

impl Default for WidgetConfig {
    fn default() -> Self {
        Self {
            close_delay: DEFAULT_CLOSE_DELAY,
            placeholder: PLACEHOLDER_LABEL.to_string(),
        }
    }
}

impl WidgetConfig {
    /// Set the close delay.
    #[must_use]
    pub const fn with_close_delay(mut self, close_delay: Duration) -> Self {
        self.close_delay = close_delay;
        self
    }

    /// Set the placeholder label.
    #[must_use]
    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = placeholder.into();
        self
    }
}
