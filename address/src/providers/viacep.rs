//! Lookup client for ViaCEP-style providers.
//!
//! `GET {base}/{cep}/json/` returning
//! `{ cep, logradouro, bairro, localidade, uf, estado, regiao, ddd }`, or
//! `{ "erro": true }` for unknown codes.

use crate::config::LookupConfig;
use crate::error::LookupError;
use crate::postal_code::PostalCode;
use crate::providers::{AddressProvider, HttpTransport};
use crate::state::AddressRecord;
use futures::FutureExt;
use futures::future::AbortHandle;
use serde::{Deserialize, Deserializer};
use std::future::Future;

/// Provider response body.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProviderPayload {
    /// CEP as formatted by the provider
    #[serde(default)]
    pub cep: Option<String>,
    /// Street
    #[serde(default)]
    pub logradouro: Option<String>,
    /// Neighborhood
    #[serde(default)]
    pub bairro: Option<String>,
    /// City
    #[serde(default)]
    pub localidade: Option<String>,
    /// State code
    #[serde(default)]
    pub uf: Option<String>,
    /// State name
    #[serde(default)]
    pub estado: Option<String>,
    /// Region
    #[serde(default)]
    pub regiao: Option<String>,
    /// Area code; some providers send it as a number
    #[serde(default, deserialize_with = "lenient_string")]
    pub ddd: Option<String>,
    /// Set when the code does not exist
    #[serde(default, deserialize_with = "lenient_flag")]
    pub erro: bool,
}

fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(s) => Some(s),
        serde_json::Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}

fn lenient_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::Bool(flag) => flag,
        serde_json::Value::String(s) => s.eq_ignore_ascii_case("true"),
        _ => false,
    })
}

impl ProviderPayload {
    /// Map onto an [`AddressRecord`] for `requested`.
    ///
    /// # Errors
    ///
    /// Returns [`LookupError::NotFound`] when the provider flagged the code.
    pub fn into_record(self, requested: &PostalCode) -> Result<AddressRecord, LookupError> {
        if self.erro {
            return Err(LookupError::NotFound);
        }

        Ok(AddressRecord {
            postal_code: self
                .cep
                .filter(|cep| !cep.is_empty())
                .unwrap_or_else(|| requested.to_string()),
            street: self.logradouro.unwrap_or_default(),
            neighborhood: self.bairro.unwrap_or_default(),
            city: self.localidade.unwrap_or_default(),
            state: self.estado.unwrap_or_default(),
            state_code: self.uf.unwrap_or_default(),
            region: self.regiao.unwrap_or_default(),
            area_code: self.ddd.unwrap_or_default(),
            is_valid: true,
        })
    }
}

/// Address lookup client.
///
/// Validates locally, then issues one request raced against the configured
/// timeout. On timeout the request's cancellation token is triggered and the
/// request is dropped, so the limit holds even for a transport that ignores
/// the token.
#[derive(Debug, Clone)]
pub struct LookupClient<T> {
    transport: T,
    config: LookupConfig,
}

impl<T: HttpTransport> LookupClient<T> {
    /// Create a client over `transport`.
    #[must_use]
    pub const fn new(transport: T, config: LookupConfig) -> Self {
        Self { transport, config }
    }

    /// Client configuration.
    #[must_use]
    pub const fn config(&self) -> &LookupConfig {
        &self.config
    }

    /// Request URL for `code`.
    #[must_use]
    pub fn endpoint(&self, code: &PostalCode) -> String {
        format!(
            "{}/{}/json/",
            self.config.base_url.trim_end_matches('/'),
            code.digits()
        )
    }

    /// Resolve `raw_code` to an address.
    ///
    /// # Errors
    ///
    /// - [`LookupError::InvalidFormat`] before any request if the code is not 8 digits
    /// - [`LookupError::Timeout`] if no response arrives within the timeout
    /// - [`LookupError::NotFound`] if the provider flags the code
    /// - [`LookupError::Network`] / [`LookupError::Unknown`] for transport or payload failures
    pub async fn lookup(&self, raw_code: &str) -> Result<AddressRecord, LookupError> {
        let code = PostalCode::parse(raw_code)?;
        let url = self.endpoint(&code);

        tracing::debug!(cep = %code, url = %url, "Requesting address");

        let (abort, registration) = AbortHandle::new_pair();
        let request = self.transport.get_json(&url, registration);
        tokio::pin!(request);

        let body = tokio::select! {
            result = &mut request => result.map_err(|error| {
                tracing::warn!(cep = %code, error = %error, "Address request failed");
                LookupError::from(error)
            })?,
            () = tokio::time::sleep(self.config.timeout) => {
                abort.abort();
                // One more poll lets a cooperating transport observe the abort;
                // whatever is still pending after it is dropped here.
                let _ = request.as_mut().now_or_never();
                tracing::warn!(
                    cep = %code,
                    timeout_ms = self.config.timeout.as_millis(),
                    "Address request timed out"
                );
                return Err(LookupError::Timeout);
            }
        };

        let payload: ProviderPayload =
            serde_json::from_value(body).map_err(|error| LookupError::Unknown {
                detail: error.to_string(),
            })?;

        let record = payload.into_record(&code)?;
        tracing::debug!(cep = %code, city = %record.city, "Address resolved");
        Ok(record)
    }
}

impl<T: HttpTransport> AddressProvider for LookupClient<T> {
    fn fetch_address(
        &self,
        raw_code: &str,
    ) -> impl Future<Output = Result<AddressRecord, LookupError>> + Send {
        self.lookup(raw_code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TransportError;
    use crate::mocks::{fixtures, MockResponse, MockTransport};
    use futures::future::AbortRegistration;
    use std::time::Duration;

    fn client(transport: MockTransport) -> LookupClient<MockTransport> {
        LookupClient::new(transport, LookupConfig::default())
    }

    #[test]
    fn test_endpoint_uses_digits_and_trims_slash() {
        let client = LookupClient::new(
            MockTransport::new(),
            LookupConfig::default().with_base_url("https://cep.example/ws/"),
        );
        let code = PostalCode::parse("01310-100");
        assert_eq!(
            code.map(|c| client.endpoint(&c)).ok(),
            Some("https://cep.example/ws/01310100/json/".to_string())
        );
    }

    #[tokio::test]
    async fn test_lookup_maps_provider_fields() {
        let transport = MockTransport::new().with_address("01310100", fixtures::paulista_payload());

        let record = client(transport.clone()).lookup("01310-100").await;

        let Ok(record) = record else {
            unreachable!("lookup should succeed: {record:?}");
        };
        assert_eq!(record.city, "São Paulo");
        assert_eq!(record.state_code, "SP");
        assert_eq!(record.street, "Avenida Paulista");
        assert_eq!(record.area_code, "11");
        assert!(record.is_valid);
        assert_eq!(transport.call_count(), 1);
    }

    #[tokio::test]
    async fn test_invalid_format_makes_no_request() {
        let transport = MockTransport::new();

        let result = client(transport.clone()).lookup("123").await;

        assert_eq!(result, Err(LookupError::InvalidFormat));
        assert_eq!(transport.call_count(), 0);
    }

    #[tokio::test]
    async fn test_erro_flag_is_not_found() {
        let transport = MockTransport::new()
            .with_response("99999999", MockResponse::Json(serde_json::json!({ "erro": true })))
            .with_response("88888888", MockResponse::Json(serde_json::json!({ "erro": "true" })));
        let client = client(transport);

        assert_eq!(client.lookup("99999999").await, Err(LookupError::NotFound));
        assert_eq!(client.lookup("88888888").await, Err(LookupError::NotFound));
    }

    #[tokio::test]
    async fn test_missing_fields_default_to_empty() {
        let transport = MockTransport::new().with_response(
            "70040010",
            MockResponse::Json(serde_json::json!({ "localidade": "Brasília", "uf": "DF", "ddd": 61 })),
        );

        let record = client(transport).lookup("70040-010").await;

        assert_eq!(
            record,
            Ok(AddressRecord {
                postal_code: "70040-010".to_string(),
                city: "Brasília".to_string(),
                state_code: "DF".to_string(),
                area_code: "61".to_string(),
                is_valid: true,
                ..AddressRecord::default()
            })
        );
    }

    #[tokio::test]
    async fn test_unexpected_payload_is_unknown_error() {
        let transport = MockTransport::new()
            .with_response("01310100", MockResponse::Json(serde_json::json!(["not", "an", "object"])));

        let result = client(transport).lookup("01310100").await;

        assert!(matches!(result, Err(LookupError::Unknown { .. })));
    }

    #[tokio::test]
    async fn test_transport_failures_are_network_errors() {
        let transport = MockTransport::new()
            .with_response("01310100", MockResponse::Status(502))
            .with_response("20040002", MockResponse::Unreachable("connection refused".to_string()));
        let client = client(transport);

        assert!(matches!(client.lookup("01310100").await, Err(LookupError::Network { .. })));
        assert!(matches!(client.lookup("20040002").await, Err(LookupError::Network { .. })));
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_aborts_transport() {
        let transport = MockTransport::new()
            .with_address("01310100", fixtures::paulista_payload())
            .with_delay(Duration::from_secs(30));

        let result = client(transport.clone()).lookup("01310100").await;

        assert_eq!(result, Err(LookupError::Timeout));
        assert_eq!(transport.call_count(), 1);
        assert_eq!(transport.abort_count(), 1);
    }

    /// Transport that never looks at its cancellation token.
    #[derive(Clone)]
    struct StalledTransport;

    impl HttpTransport for StalledTransport {
        fn get_json(
            &self,
            _url: &str,
            _cancel: AbortRegistration,
        ) -> impl Future<Output = Result<serde_json::Value, TransportError>> + Send {
            async {
                tokio::time::sleep(Duration::from_secs(3600)).await;
                Ok(fixtures::paulista_payload())
            }
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_holds_when_transport_ignores_token() {
        let client = LookupClient::new(StalledTransport, LookupConfig::default());
        let started = tokio::time::Instant::now();

        let result = client.lookup("01310100").await;

        assert_eq!(result, Err(LookupError::Timeout));
        assert!(started.elapsed() >= Duration::from_secs(10));
        assert!(started.elapsed() < Duration::from_secs(11));
    }

    #[tokio::test(start_paused = true)]
    async fn test_response_within_timeout_is_not_aborted() {
        let transport = MockTransport::new()
            .with_address("01310100", fixtures::paulista_payload())
            .with_delay(Duration::from_secs(9));

        let result = client(transport.clone()).lookup("01310100").await;

        assert!(result.is_ok());
        assert_eq!(transport.abort_count(), 0);
    }
}
