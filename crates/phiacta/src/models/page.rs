//! Paginated and search response envelopes.

use serde::{Deserialize, Serialize};

use super::Claim;

/// One page of a list endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaginatedResponse<T> {
    #[serde(default = "Vec::new")]
    pub items: Vec<T>,
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub limit: u64,
    #[serde(default)]
    pub offset: u64,
}

impl<T> Default for PaginatedResponse<T> {
    fn default() -> Self {
        Self { items: Vec::new(), total: 0, limit: 0, offset: 0 }
    }
}

impl<T> PaginatedResponse<T> {
    /// 1-based page number of this response.
    #[must_use]
    pub fn page(&self) -> u64 {
        if self.limit == 0 { 1 } else { self.offset / self.limit + 1 }
    }

    /// Total number of pages (at least 1).
    #[must_use]
    pub fn total_pages(&self) -> u64 {
        if self.limit == 0 { 1 } else { self.total.div_ceil(self.limit).max(1) }
    }

    #[must_use]
    pub fn has_next(&self) -> bool {
        self.page() < self.total_pages()
    }

    #[must_use]
    pub fn has_previous(&self) -> bool {
        self.page() > 1
    }
}

/// Offset of a 1-based `page` for a given page size.
#[must_use]
pub fn page_offset(page: u64, limit: u64) -> u64 {
    page.saturating_sub(1).saturating_mul(limit)
}

/// One full-text search hit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResultItem {
    pub claim: Claim,
    #[serde(default)]
    pub rank: f64,
}

/// Response of the search endpoint.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub results: Vec<SearchResultItem>,
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub query: String,
}
