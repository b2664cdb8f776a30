//! Opaque provider parameter bags.
//!
//! Assignments store parameters as a JSON object so the manager can carry
//! them without knowing any provider's schema. Providers pull typed fields
//! out through the accessors here, which produce field-specific
//! `MissingParams`/`InvalidParams` errors.

use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::str::FromStr;

use crate::errors::{Result, ValuationError};

/// Opaque parameter bag attached to a provider assignment.
///
/// Always a JSON object; the schema is owned by the provider named in the
/// assignment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProviderParams(Value);

impl Default for ProviderParams {
    fn default() -> Self {
        Self(Value::Object(serde_json::Map::new()))
    }
}

impl ProviderParams {
    /// An empty parameter bag.
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap a JSON value. Fails unless the value is an object.
    pub fn from_value(provider: &str, value: Value) -> Result<Self> {
        if !value.is_object() {
            return Err(ValuationError::InvalidParams {
                provider: provider.to_string(),
                message: "parameters must be a JSON object".to_string(),
            });
        }
        Ok(Self(value))
    }

    /// Serialize a typed parameter struct into a bag.
    pub fn from_serialize<T: Serialize>(provider: &str, params: &T) -> Result<Self> {
        let value = serde_json::to_value(params).map_err(|e| ValuationError::InvalidParams {
            provider: provider.to_string(),
            message: e.to_string(),
        })?;
        Self::from_value(provider, value)
    }

    /// The raw JSON object.
    pub fn as_value(&self) -> &Value {
        &self.0
    }

    fn field(&self, field: &str) -> Option<&Value> {
        self.0.get(field).filter(|v| !v.is_null())
    }

    /// Deserialize a required field, with field-specific errors.
    pub fn required<T: DeserializeOwned>(&self, provider: &str, field: &str) -> Result<T> {
        let value = self.field(field).ok_or_else(|| ValuationError::MissingParams {
            provider: provider.to_string(),
            field: field.to_string(),
        })?;
        serde_json::from_value(value.clone()).map_err(|e| ValuationError::InvalidParams {
            provider: provider.to_string(),
            message: format!("field '{}': {}", field, e),
        })
    }

    /// Deserialize an optional field; absent or null yields `None`.
    pub fn optional<T: DeserializeOwned>(&self, provider: &str, field: &str) -> Result<Option<T>> {
        match self.field(field) {
            None => Ok(None),
            Some(value) => serde_json::from_value(value.clone()).map(Some).map_err(|e| {
                ValuationError::InvalidParams {
                    provider: provider.to_string(),
                    message: format!("field '{}': {}", field, e),
                }
            }),
        }
    }

    /// A required string field.
    pub fn required_str(&self, provider: &str, field: &str) -> Result<String> {
        self.required(provider, field)
    }

    /// A required decimal field. Accepts a decimal string (the canonical
    /// wire form) or a bare JSON number.
    pub fn required_decimal(&self, provider: &str, field: &str) -> Result<Decimal> {
        let value = self.field(field).ok_or_else(|| ValuationError::MissingParams {
            provider: provider.to_string(),
            field: field.to_string(),
        })?;
        let parsed = match value {
            Value::String(s) => Decimal::from_str(s).ok(),
            Value::Number(n) => Decimal::from_str(&n.to_string()).ok(),
            _ => None,
        };
        parsed.ok_or_else(|| ValuationError::InvalidParams {
            provider: provider.to_string(),
            message: format!("field '{}': expected a decimal value", field),
        })
    }
}
