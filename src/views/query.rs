//! List query parameters and their wire encoding.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use url::form_urlencoded;

/// Page sizes offered by the list view.
pub const PAGE_SIZES: [u32; 4] = [6, 8, 12, 16];

/// Page size used until the user picks another.
pub const DEFAULT_PAGE_SIZE: u32 = 8;

/// The enumerated sort specifiers, encoded as `field,direction`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SortOrder {
    /// `createdAt,desc`
    #[default]
    CreatedAtDesc,
    /// `nom,asc`
    NomAsc,
    /// `prenom,asc`
    PrenomAsc,
}

impl SortOrder {
    pub const ALL: [SortOrder; 3] = [Self::CreatedAtDesc, Self::NomAsc, Self::PrenomAsc];

    pub fn as_param(self) -> &'static str {
        match self {
            Self::CreatedAtDesc => "createdAt,desc",
            Self::NomAsc => "nom,asc",
            Self::PrenomAsc => "prenom,asc",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::CreatedAtDesc => "Most recent",
            Self::NomAsc => "Family name (A-Z)",
            Self::PrenomAsc => "Given name (A-Z)",
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_param())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown sort `{0}`, expected one of createdAt,desc | nom,asc | prenom,asc")]
pub struct UnknownSort(pub String);

impl FromStr for SortOrder {
    type Err = UnknownSort;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|sort| sort.as_param() == s.trim())
            .ok_or_else(|| UnknownSort(s.to_string()))
    }
}

/// One snapshot of the list parameters.
///
/// Two snapshots compare equal exactly when they would produce the same
/// upstream query.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ListQuery {
    /// Free text, forwarded but never interpreted here.
    pub search: String,
    /// Zero-based page index.
    pub page: u32,
    pub size: u32,
    pub sort: SortOrder,
}

impl Default for ListQuery {
    fn default() -> Self {
        Self {
            search: String::new(),
            page: 0,
            size: DEFAULT_PAGE_SIZE,
            sort: SortOrder::default(),
        }
    }
}

impl ListQuery {
    /// `search` (only when non-blank, trimmed), then `page`, `size`, `sort`.
    pub fn to_query_string(&self) -> String {
        let mut serializer = form_urlencoded::Serializer::new(String::new());
        let search = self.search.trim();
        if !search.is_empty() {
            serializer.append_pair("search", search);
        }
        serializer
            .append_pair("page", &self.page.to_string())
            .append_pair("size", &self.size.to_string())
            .append_pair("sort", self.sort.as_param());
        serializer.finish()
    }
}
