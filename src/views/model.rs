//! Client record as seen through the gateway.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// A client record. The backend assigns `id` and `created_at`; this side
/// never holds an authoritative copy.
///
/// Decoding is lenient so one odd record never costs the rest of a page:
/// a missing id becomes empty, `null` names become empty, and scalar
/// contact fields are kept as text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Client {
    #[serde(default, deserialize_with = "opaque_id")]
    pub id: String,
    /// Family name.
    #[serde(default, deserialize_with = "text_or_empty")]
    pub nom: String,
    /// Given name.
    #[serde(default, deserialize_with = "text_or_empty")]
    pub prenom: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub telephone: Option<String>,
    /// Kept exactly as the backend formatted it.
    #[serde(default)]
    pub created_at: Option<Timestamp>,
}

/// Creation timestamp in whatever form the backend chose.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Timestamp {
    /// ISO text, e.g. `2025-02-01T10:00:00`.
    Text(String),
    /// Date-time parts `[year, month, day, hour, minute, second, nanos]`.
    Parts(Vec<i64>),
    Other(serde_json::Value),
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Timestamp::Text(text) => f.write_str(text),
            Timestamp::Parts(parts) => match parts.as_slice() {
                [y, mo, d] => write!(f, "{y:04}-{mo:02}-{d:02}"),
                [y, mo, d, h, mi] => write!(f, "{y:04}-{mo:02}-{d:02}T{h:02}:{mi:02}"),
                [y, mo, d, h, mi, s, ..] => {
                    write!(f, "{y:04}-{mo:02}-{d:02}T{h:02}:{mi:02}:{s:02}")
                }
                _ => write!(f, "{parts:?}"),
            },
            Timestamp::Other(value) => write!(f, "{value}"),
        }
    }
}

impl Client {
    /// First letter of the given name and of the family name, uppercased.
    pub fn initials(&self) -> String {
        let first = self.prenom.trim().chars().next();
        let last = self.nom.trim().chars().next();
        let initials: String = first
            .into_iter()
            .chain(last)
            .flat_map(char::to_uppercase)
            .collect();
        if initials.is_empty() {
            "?".to_string()
        } else {
            initials
        }
    }

    /// `prenom nom`, trimmed.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.prenom, self.nom).trim().to_string()
    }
}

/// Body of a create (POST) or full replacement (PUT).
///
/// Identifier and timestamp are never sent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientPayload {
    pub nom: String,
    pub prenom: String,
    pub email: Option<String>,
    pub telephone: Option<String>,
}

/// Identifiers may come back as JSON strings or numbers; anything else
/// leaves the record without one.
fn opaque_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => s,
        Value::Number(n) => n.to_string(),
        _ => String::new(),
    })
}

fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    })
}

fn text_or_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    lenient_text(deserializer).map(Option::unwrap_or_default)
}
