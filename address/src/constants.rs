//! Address lookup constants.
//!
//! Fixed values shared by the client, the store and the widget.

use std::time::Duration;

/// Number of digits in a normalized CEP.
pub const CEP_DIGITS: usize = 8;

/// Digits before the hyphen in the display form (`NNNNN-NNN`).
pub const CEP_PREFIX_DIGITS: usize = 5;

/// Session storage key holding the persisted lookup state.
pub const STORAGE_KEY: &str = "cep-storage";

/// Version written alongside the persisted lookup state.
pub const STORAGE_VERSION: u32 = 0;

/// Default provider base URL. Requests go to `{base}/{cep}/json/`.
pub const DEFAULT_PROVIDER_URL: &str = "https://viacep.com.br/ws";

/// Default bound on a single provider request.
pub const DEFAULT_LOOKUP_TIMEOUT: Duration = Duration::from_secs(10);

/// Default delay between the pointer leaving the widget and the popup closing.
pub const DEFAULT_CLOSE_DELAY: Duration = Duration::from_millis(500);

/// Trigger label shown until an address has been resolved.
pub const PLACEHOLDER_LABEL: &str = "Informe seu CEP";

/// Environment variables read by [`crate::config::LookupConfig::from_env`].
pub mod env_vars {
    /// Overrides the provider base URL.
    pub const PROVIDER_URL: &str = "VITRINE_CEP_PROVIDER_URL";

    /// Overrides the request timeout, in milliseconds.
    pub const TIMEOUT_MS: &str = "VITRINE_CEP_TIMEOUT_MS";
}
