//! The transaction record as returned by the store, and the body sent to create one.
//!
//! Records come from an external store, so deserialization is lenient: the
//! amount is kept as whatever JSON value the store sent and is only coerced to
//! a number when it is displayed or aggregated.

use std::fmt::Display;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use time::{
    OffsetDateTime, PrimitiveDateTime,
    format_description::well_known::{Iso8601, Rfc3339},
};

/// The store-assigned identifier of a transaction.
///
/// The identifier is opaque. Stores that use integer keys are accepted and
/// the key is kept as its decimal string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct TransactionId(String);

impl TransactionId {
    /// Wrap a raw identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The identifier as it appears in URLs.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for TransactionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for TransactionId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawId {
            Text(String),
            Number(serde_json::Number),
        }

        Ok(match RawId::deserialize(deserializer)? {
            RawId::Text(text) => Self(text),
            RawId::Number(number) => Self(number.to_string()),
        })
    }
}

/// The amount of a transaction exactly as the store sent it.
///
/// Negative amounts are expenses and positive amounts are income.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Amount {
    /// A JSON number.
    Number(f64),
    /// A JSON string, e.g. a decimal serialized as `"12.50"`.
    Text(String),
    /// Any other JSON value, including `null`.
    Other(Value),
}

impl Default for Amount {
    fn default() -> Self {
        Amount::Other(Value::Null)
    }
}

impl From<f64> for Amount {
    fn from(value: f64) -> Self {
        Amount::Number(value)
    }
}

impl Amount {
    /// Interpret the amount as a finite number.
    ///
    /// Strings are trimmed and parsed, with the empty string read as zero.
    /// Booleans read as one and zero. Returns `None` for anything that does
    /// not yield a finite number.
    pub fn to_finite(&self) -> Option<f64> {
        let number = match self {
            Amount::Number(number) => *number,
            Amount::Text(text) => {
                let text = text.trim();

                if text.is_empty() {
                    0.0
                } else {
                    text.parse::<f64>().ok()?
                }
            }
            Amount::Other(Value::Bool(true)) => 1.0,
            Amount::Other(Value::Bool(false)) => 0.0,
            Amount::Other(_) => return None,
        };

        number.is_finite().then_some(number)
    }

    /// The amount as a number, or zero if it cannot be read as one.
    pub fn value_or_zero(&self) -> f64 {
        self.to_finite().unwrap_or(0.0)
    }
}

/// Read a text field that the store may send as `null` or as another JSON type.
///
/// `null` becomes the empty string and other values become their JSON text.
fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Null => String::new(),
        Value::String(text) => text,
        other => other.to_string(),
    })
}

/// A financial transaction owned by the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// The ID assigned by the store.
    pub id: TransactionId,
    /// Text describing the transaction.
    #[serde(
        rename = "text",
        alias = "description",
        default,
        deserialize_with = "lenient_string"
    )]
    pub description: String,
    /// The signed amount of the transaction.
    #[serde(default)]
    pub amount: Amount,
    /// When the store created the transaction, as sent by the store.
    #[serde(default, deserialize_with = "lenient_string")]
    pub created_at: String,
}

impl Transaction {
    /// Parse [Transaction::created_at].
    ///
    /// Accepts RFC 3339 timestamps, and ISO 8601 date-times without an offset,
    /// which are read as UTC.
    pub fn created_at_utc(&self) -> Option<OffsetDateTime> {
        let text = self.created_at.trim();

        OffsetDateTime::parse(text, &Rfc3339)
            .or_else(|_| OffsetDateTime::parse(text, &Iso8601::DEFAULT))
            .ok()
            .or_else(|| {
                PrimitiveDateTime::parse(text, &Iso8601::DEFAULT)
                    .ok()
                    .map(PrimitiveDateTime::assume_utc)
            })
    }
}

/// The data needed to create a transaction in the store.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewTransaction {
    /// Text describing the transaction, must not be empty.
    #[serde(rename = "text")]
    pub description: String,
    /// The signed amount, must be finite.
    pub amount: f64,
}
