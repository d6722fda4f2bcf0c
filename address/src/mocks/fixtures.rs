//! Canned provider payloads and records.

use crate::state::AddressRecord;
use serde_json::{Value, json};

/// Provider body for `01310-100` (Avenida Paulista, São Paulo).
#[must_use]
pub fn paulista_payload() -> Value {
    json!({
        "cep": "01310-100",
        "logradouro": "Avenida Paulista",
        "complemento": "de 612 a 1510 - lado par",
        "bairro": "Bela Vista",
        "localidade": "São Paulo",
        "uf": "SP",
        "estado": "São Paulo",
        "regiao": "Sudeste",
        "ibge": "3550308",
        "ddd": "11"
    })
}

/// Record the lookup produces from [`paulista_payload`].
#[must_use]
pub fn paulista_record() -> AddressRecord {
    AddressRecord {
        postal_code: "01310-100".to_string(),
        street: "Avenida Paulista".to_string(),
        neighborhood: "Bela Vista".to_string(),
        city: "São Paulo".to_string(),
        state: "São Paulo".to_string(),
        state_code: "SP".to_string(),
        region: "Sudeste".to_string(),
        area_code: "11".to_string(),
        is_valid: true,
    }
}

/// Record for `20040-002` (Rio de Janeiro).
#[must_use]
pub fn rio_record() -> AddressRecord {
    AddressRecord {
        postal_code: "20040-002".to_string(),
        street: "Avenida Rio Branco".to_string(),
        neighborhood: "Centro".to_string(),
        city: "Rio de Janeiro".to_string(),
        state: "Rio de Janeiro".to_string(),
        state_code: "RJ".to_string(),
        region: "Sudeste".to_string(),
        area_code: "21".to_string(),
        is_valid: true,
    }
}

/// Body the provider returns for unknown codes.
#[must_use]
pub fn not_found_payload() -> Value {
    json!({ "erro": true })
}
