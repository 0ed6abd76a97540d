//! Pagination metadata returned alongside list responses.

use serde::{Deserialize, Serialize};

/// The `{total, page, limit, pages}` block of a list response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    /// Number of records matching the filter, across all pages.
    pub total: u64,
    /// 1-based page number that was served.
    pub page: u32,
    /// Page size that was applied.
    pub limit: u32,
    /// `ceil(total / limit)`.
    pub pages: u64,
}

impl Pagination {
    pub fn new(total: u64, page: u32, limit: u32) -> Self {
        let pages = if limit == 0 {
            0
        } else {
            total.div_ceil(u64::from(limit))
        };
        Self {
            total,
            page,
            limit,
            pages,
        }
    }
}
