//! Search and pagination shape shared by the list queries.
//!
//! A list read is parameterized by a free-text query and a 1-based page
//! number; the page size comes from configuration at repository construction.
//! Reads are pure and idempotent.

/// A normalized list request: free-text filter plus a 1-based page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    pub query: String,
    pub page: u32,
}

impl PageRequest {
    /// Build a request from raw query-string parameters.
    ///
    /// A missing query matches all rows. Any page value that does not parse
    /// to a positive integer falls back to page 1.
    #[must_use]
    pub fn from_raw(query: Option<&str>, page: Option<&str>) -> Self {
        Self {
            query: query.unwrap_or_default().to_string(),
            page: parse_page(page),
        }
    }

    /// Row offset for this page: `(page - 1) * page_size`. Page 0 is not a
    /// valid request value but clamps to the first page rather than
    /// underflowing, since the field is freely constructible.
    #[must_use]
    pub const fn offset(&self, page_size: u32) -> i64 {
        (self.page.saturating_sub(1) as i64) * (page_size as i64)
    }

    /// The `ILIKE` pattern for a case-insensitive substring match.
    #[must_use]
    pub fn like_pattern(&self) -> String {
        format!("%{}%", self.query)
    }
}

/// Parse a raw page parameter, flooring invalid, zero, or negative input
/// to page 1.
#[must_use]
pub fn parse_page(raw: Option<&str>) -> u32 {
    raw.and_then(|s| s.trim().parse::<u32>().ok())
        .filter(|page| *page >= 1)
        .unwrap_or(1)
}

/// Total page count for a filtered row count: `ceil(count / page_size)`.
/// Zero matching rows yield zero pages.
#[must_use]
pub fn total_pages(count: i64, page_size: u32) -> u32 {
    if count <= 0 || page_size == 0 {
        return 0;
    }
    #[allow(clippy::cast_possible_truncation)]
    let pages = count.unsigned_abs().div_ceil(u64::from(page_size)) as u32;
    pages
}
