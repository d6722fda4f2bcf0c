//! Lookup state and its persisted form.

use crate::constants::STORAGE_VERSION;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Address resolved from a CEP.
///
/// Only produced by a successful lookup.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddressRecord {
    /// CEP in display form (`NNNNN-NNN`)
    pub postal_code: String,
    /// Street (logradouro)
    pub street: String,
    /// Neighborhood (bairro)
    pub neighborhood: String,
    /// City (localidade)
    pub city: String,
    /// State name (estado)
    pub state: String,
    /// Two-letter state code (UF)
    pub state_code: String,
    /// Region (regiao)
    pub region: String,
    /// Telephone area code (DDD)
    pub area_code: String,
    /// Always true for records coming out of a lookup
    pub is_valid: bool,
}

impl AddressRecord {
    /// Short label used on the widget trigger, e.g. `São Paulo, SP`.
    #[must_use]
    pub fn short_label(&self) -> String {
        format!("{}, {}", self.city, self.state_code)
    }
}

/// State of the CEP lookup store.
///
/// After any settled lookup either `record` is present and `error` is `None`,
/// or `record` is `None`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LookupState {
    /// Last code submitted, in display form
    pub current_code: String,
    /// Result of the last successful lookup
    pub record: Option<AddressRecord>,
    /// A request is in flight
    pub is_loading: bool,
    /// Message describing the latest failure
    pub error: Option<String>,
    /// When `record` was resolved
    pub last_updated: Option<DateTime<Utc>>,
}

impl LookupState {
    /// Whether a usable address is available.
    #[must_use]
    pub fn has_valid_record(&self) -> bool {
        self.record.as_ref().is_some_and(|r| r.is_valid)
    }
}

/// Field layout of the persisted state.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedFields {
    /// Current code
    pub cep: String,
    /// Resolved address
    pub data: Option<AddressRecord>,
    /// Loading flag at write time
    pub is_loading: bool,
    /// Latest failure message
    pub error: Option<String>,
    /// Epoch milliseconds of the last successful lookup
    #[serde(default, with = "chrono::serde::ts_milliseconds_option")]
    pub last_updated: Option<DateTime<Utc>>,
}

/// Envelope written under [`crate::constants::STORAGE_KEY`]:
/// `{ "state": { cep, data, isLoading, error, lastUpdated }, "version": 0 }`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistedLookup {
    /// Persisted fields
    pub state: PersistedFields,
    /// Layout version
    #[serde(default)]
    pub version: u32,
}

impl From<&LookupState> for PersistedLookup {
    fn from(state: &LookupState) -> Self {
        Self {
            state: PersistedFields {
                cep: state.current_code.clone(),
                data: state.record.clone(),
                is_loading: state.is_loading,
                error: state.error.clone(),
                last_updated: state.last_updated,
            },
            version: STORAGE_VERSION,
        }
    }
}

impl From<PersistedLookup> for LookupState {
    /// Rehydrate; no request survives a reload, so loading is always cleared.
    fn from(persisted: PersistedLookup) -> Self {
        let fields = persisted.state;
        Self {
            current_code: fields.cep,
            record: fields.data,
            is_loading: false,
            error: fields.error,
            last_updated: fields.last_updated,
        }
    }
}
