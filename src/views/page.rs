//! Page descriptor and the normalization of list responses.
//!
//! The backend answers a list query either with a bare array of records or
//! with a paged envelope. The outer shape is decoded first into
//! [`ListResponse`], records stay raw JSON, and each record is decoded on
//! its own while folding into a [`PageDescriptor`]. A single odd record can
//! therefore never change which shape was recognized.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::views::model::Client;
use crate::views::query::ListQuery;

/// Paged envelope as produced by the backend. Every field may be missing.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PagedEnvelope {
    #[serde(default, deserialize_with = "nullable_list")]
    pub content: Vec<Value>,
    #[serde(default)]
    pub total_elements: Option<u64>,
    #[serde(default)]
    pub total_pages: Option<u32>,
    #[serde(default)]
    pub number: Option<u32>,
    #[serde(default)]
    pub size: Option<u32>,
}

/// The two shapes a list response may take, plus anything else.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum ListResponse {
    Items(Vec<Value>),
    Paged(PagedEnvelope),
    /// Neither shape; rendered as an empty page.
    Unrecognized(Value),
}

/// Normalized view of one page of results.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageDescriptor {
    pub items: Vec<Client>,
    pub total_elements: u64,
    /// Always at least 1.
    pub total_pages: u32,
    /// Zero-based.
    pub page: u32,
    pub size: u32,
}

impl Default for PageDescriptor {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            total_elements: 0,
            total_pages: 1,
            page: 0,
            size: 0,
        }
    }
}

impl PageDescriptor {
    /// Fold a decoded response into a descriptor.
    ///
    /// `requested` fills in whatever the envelope leaves out.
    pub fn normalize(response: ListResponse, requested: &ListQuery) -> Self {
        match response {
            ListResponse::Items(raw) => {
                let len = raw.len();
                Self {
                    items: decode_records(raw),
                    total_elements: len as u64,
                    total_pages: 1,
                    page: 0,
                    size: u32::try_from(len).unwrap_or(u32::MAX),
                }
            }
            ListResponse::Paged(envelope) => {
                let total_elements = envelope
                    .total_elements
                    .unwrap_or(envelope.content.len() as u64);
                let size = envelope.size.unwrap_or(requested.size);
                let total_pages = envelope
                    .total_pages
                    .unwrap_or_else(|| derive_total_pages(envelope.total_elements, size));

                Self {
                    items: decode_records(envelope.content),
                    total_elements,
                    total_pages: total_pages.max(1),
                    page: envelope.number.unwrap_or(requested.page),
                    size,
                }
            }
            ListResponse::Unrecognized(value) => {
                tracing::warn!(kind = json_kind(&value), "Unexpected list response shape");
                Self {
                    page: requested.page,
                    size: requested.size,
                    ..Self::default()
                }
            }
        }
    }

    /// Highest valid page index.
    pub fn last_page(&self) -> u32 {
        self.total_pages.max(1) - 1
    }

    pub fn has_previous(&self) -> bool {
        self.page > 0
    }

    pub fn has_next(&self) -> bool {
        self.page < self.last_page()
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Decode each record on its own. Records are lenient, so only entries
/// that are not objects at all are skipped.
fn decode_records(raw: Vec<Value>) -> Vec<Client> {
    raw.into_iter()
        .filter_map(|value| {
            let kind = json_kind(&value);
            serde_json::from_value(value)
                .map_err(|e| tracing::warn!(kind, error = %e, "Skipping undecodable record"))
                .ok()
        })
        .collect()
}

fn nullable_list<'de, D>(deserializer: D) -> Result<Vec<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<Value>>::deserialize(deserializer)?.unwrap_or_default())
}

/// Page count when the envelope omits it: trust `totalElements` and `size`
/// if both are usable, otherwise a single page.
fn derive_total_pages(total_elements: Option<u64>, size: u32) -> u32 {
    match total_elements {
        Some(total) if size > 0 => {
            u32::try_from(total.div_ceil(u64::from(size))).unwrap_or(u32::MAX)
        }
        _ => 1,
    }
}
