//! Pagination parameters for list endpoints.
//!
//! # Invariants
//! - `page >= 1` and `1 <= per_page <= MAX_PER_PAGE` for every constructed `Page`.
//! - Raw query values are parsed here, so a malformed value always surfaces as
//!   `InvalidPaginationParameter` instead of a framework rejection.

use crate::error::{BlackBookError, BlackBookResult};
use serde::Serialize;

pub const DEFAULT_PER_PAGE: u32 = 25;
pub const MAX_PER_PAGE: u32 = 100;
const MAX_PAGE: u32 = u32::MAX;

/// Validated page window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub page: u32,
    pub per_page: u32,
}

impl Default for Page {
    fn default() -> Self {
        Self {
            page: 1,
            per_page: DEFAULT_PER_PAGE,
        }
    }
}

impl Page {
    /// Parses raw `page` / `per_page` query values.
    ///
    /// # Errors
    /// - `InvalidPaginationParameter` for non-integers, zero or negative
    ///   values, and `per_page` above [`MAX_PER_PAGE`].
    pub fn parse(page: Option<&str>, per_page: Option<&str>) -> BlackBookResult<Self> {
        let page = match page {
            Some(raw) => parse_bounded("page", raw, MAX_PAGE)?,
            None => 1,
        };
        let per_page = match per_page {
            Some(raw) => parse_bounded("per_page", raw, MAX_PER_PAGE)?,
            None => DEFAULT_PER_PAGE,
        };
        Ok(Self { page, per_page })
    }

    pub fn limit(&self) -> i64 {
        i64::from(self.per_page)
    }

    pub fn offset(&self) -> i64 {
        i64::from(self.page - 1) * i64::from(self.per_page)
    }
}

fn parse_bounded(param: &'static str, raw: &str, max: u32) -> BlackBookResult<u32> {
    let invalid = |reason: String| BlackBookError::InvalidPaginationParameter {
        param,
        value: raw.to_string(),
        reason,
    };
    let value: i64 = raw
        .trim()
        .parse()
        .map_err(|_| invalid("must be an integer".to_string()))?;
    if value < 1 {
        return Err(invalid("must be greater than 0".to_string()));
    }
    if value > i64::from(max) {
        return Err(invalid(format!("must be at most {max}")));
    }
    u32::try_from(value).map_err(|_| invalid(format!("must be at most {max}")))
}

/// One page of rows plus the unpaginated row count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Paginated<T> {
    pub items: Vec<T>,
    pub page: Page,
    pub total: u64,
}

/// Wire shape of pagination metadata.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PaginationMeta {
    pub page: u32,
    pub per_page: u32,
    pub total: u64,
}

impl<T> Paginated<T> {
    pub fn meta(&self) -> PaginationMeta {
        PaginationMeta {
            page: self.page.page,
            per_page: self.page.per_page,
            total: self.total,
        }
    }
}
