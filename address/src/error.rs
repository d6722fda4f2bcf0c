//! Address lookup errors.

use thiserror::Error;

/// Failures of a single CEP lookup.
///
/// The `Display` output is the message shown to the shopper; the store keeps
/// only that string.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LookupError {
    /// Fewer or more than 8 digits after stripping non-digits.
    #[error("CEP deve conter 8 dígitos")]
    InvalidFormat,

    /// The provider reported that the CEP does not exist.
    #[error("CEP não encontrado")]
    NotFound,

    /// No response within the configured bound.
    #[error("Tempo esgotado ao consultar o CEP. Tente novamente.")]
    Timeout,

    /// Transport-level failure (connection, TLS, non-success status).
    #[error("Erro de conexão ao consultar o CEP")]
    Network {
        /// Underlying cause, for logs.
        detail: String,
    },

    /// The provider answered with a payload we could not use.
    #[error("Erro inesperado ao consultar o CEP")]
    Unknown {
        /// Underlying cause, for logs.
        detail: String,
    },
}

impl LookupError {
    /// Technical detail behind the user-facing message, if any.
    #[must_use]
    pub fn detail(&self) -> Option<&str> {
        match self {
            Self::Network { detail } | Self::Unknown { detail } => Some(detail),
            _ => None,
        }
    }
}

/// Failures of the HTTP transport underneath the lookup client.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The request was aborted through its cancellation token.
    #[error("request aborted")]
    Aborted,

    /// The provider answered with a non-success status.
    #[error("provider returned HTTP {0}")]
    Status(u16),

    /// Connection or I/O failure.
    #[error("request failed: {0}")]
    Request(String),

    /// The body was not the expected JSON.
    #[error("invalid provider payload: {0}")]
    Decode(String),
}

impl From<TransportError> for LookupError {
    fn from(error: TransportError) -> Self {
        match error {
            // Only the timeout race aborts a request.
            TransportError::Aborted => Self::Timeout,
            TransportError::Status(_) | TransportError::Request(_) => Self::Network {
                detail: error.to_string(),
            },
            TransportError::Decode(_) => Self::Unknown {
                detail: error.to_string(),
            },
        }
    }
}

/// Failures of the session storage backends.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Filesystem failure.
    #[error("storage I/O failed: {0}")]
    Io(#[from] std::io::Error),

    /// The stored value is not valid persisted state.
    #[error("storage serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The backend is in an unusable state (e.g. a poisoned lock).
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

/// Invalid configuration values.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// An environment variable could not be parsed.
    #[error("invalid value for {key}: {message}")]
    InvalidValue {
        /// Variable name.
        key: &'static str,
        /// Parse failure.
        message: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_facing_messages() {
        assert_eq!(LookupError::NotFound.to_string(), "CEP não encontrado");
        assert_eq!(LookupError::InvalidFormat.to_string(), "CEP deve conter 8 dígitos");
    }

    #[test]
    fn test_transport_errors_map_onto_lookup_taxonomy() {
        assert_eq!(LookupError::from(TransportError::Aborted), LookupError::Timeout);
        assert!(matches!(
            LookupError::from(TransportError::Status(503)),
            LookupError::Network { ref detail } if detail.contains("503")
        ));
        assert!(matches!(
            LookupError::from(TransportError::Decode("eof".to_string())),
            LookupError::Unknown { .. }
        ));
    }

    #[test]
    fn test_detail_hidden_from_display() {
        let error = LookupError::Network {
            detail: "connection refused".to_string(),
        };
        assert!(!error.to_string().contains("refused"));
        assert_eq!(error.detail(), Some("connection refused"));
    }
}
