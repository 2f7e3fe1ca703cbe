//! Limit/offset pagination
//!
//! Query parameters and the paginated response envelope shared by every
//! list endpoint. Clients page with `?limit=` and `?offset=`; responses
//! carry the total count plus relative `next`/`previous` URLs.

use serde::{Deserialize, Serialize};

/// Default page size when the client does not pass `limit`.
pub const DEFAULT_LIMIT: i64 = 10;

/// Hard cap on page size.
pub const MAX_LIMIT: i64 = 100;

/// Limit/offset query parameters.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct PageParams {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl PageParams {
    /// Effective page size: defaulted, floored at 1, capped at [`MAX_LIMIT`].
    pub fn limit(&self) -> i64 {
        self.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT)
    }

    /// Effective offset, never negative.
    pub fn offset(&self) -> i64 {
        self.offset.unwrap_or(0).max(0)
    }
}

/// Paginated response envelope.
#[derive(Debug, Serialize)]
pub struct Page<T> {
    pub count: i64,
    pub next: Option<String>,
    pub previous: Option<String>,
    pub results: Vec<T>,
}

impl<T> Page<T> {
    /// Build a page for `path`, computing `next`/`previous` links from the
    /// effective limit/offset and the total row count.
    pub fn new(path: &str, params: &PageParams, count: i64, results: Vec<T>) -> Self {
        let limit = params.limit();
        let offset = params.offset();

        let next = if offset + limit < count {
            Some(page_url(path, limit, offset + limit))
        } else {
            None
        };

        let previous = if offset > 0 {
            Some(page_url(path, limit, (offset - limit).max(0)))
        } else {
            None
        };

        Self {
            count,
            next,
            previous,
            results,
        }
    }
}

fn page_url(path: &str, limit: i64, offset: i64) -> String {
    if offset > 0 {
        format!("{}?limit={}&offset={}", path, limit, offset)
    } else {
        format!("{}?limit={}", path, limit)
    }
}
