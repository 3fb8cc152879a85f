//! Paginated, searchable record listing.

use crate::calendar;
use crate::config::{EngineConfig, DEFAULT_PAGE};
use crate::error::Result;
use crate::filter::RecordFilter;
use crate::models::{Page, Record};
use crate::store::RecordStore;

// ---------------------------------------------------------------------------
// ListingParams
// ---------------------------------------------------------------------------

/// Parameters for [`ListingQuery::list`].
///
/// All fields are optional. `page` and `per_page` fall back to their
/// defaults when absent or not positive.
#[derive(Debug, Clone, Default)]
pub struct ListingParams {
    pub month: Option<String>,
    pub search: Option<String>,
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

impl ListingParams {
    /// Build parameters from raw query-string values.
    ///
    /// Numbers are parsed leniently: leading whitespace and a sign are
    /// accepted, parsing stops at the first non-digit (`"3abc"` is 3), and
    /// text without leading digits is treated as absent.
    pub fn from_query(
        month: Option<&str>,
        search: Option<&str>,
        page: Option<&str>,
        per_page: Option<&str>,
    ) -> Self {
        Self {
            month: month.map(str::to_string),
            search: search.map(str::to_string),
            page: page.and_then(parse_leading_int),
            per_page: per_page.and_then(parse_leading_int),
        }
    }
}

fn parse_leading_int(raw: &str) -> Option<i64> {
    let s = raw.trim_start();
    let (sign, rest) = match s.as_bytes().first() {
        Some(b'-') => (-1, &s[1..]),
        Some(b'+') => (1, &s[1..]),
        _ => (1, s),
    };
    let digits = rest.len() - rest.trim_start_matches(|c: char| c.is_ascii_digit()).len();
    if digits == 0 {
        return None;
    }
    rest[..digits].parse::<i64>().ok().map(|n| sign * n)
}

fn positive_or(value: Option<i64>, default: usize) -> usize {
    match value {
        Some(n) if n > 0 => usize::try_from(n).unwrap_or(default),
        _ => default,
    }
}

/// Number of pages needed for `total_items` at `per_page` items each.
pub fn total_pages(total_items: u64, per_page: usize) -> u64 {
    total_items.div_ceil(per_page.max(1) as u64)
}

// ---------------------------------------------------------------------------
// ListingQuery
// ---------------------------------------------------------------------------

pub struct ListingQuery<'a> {
    store: &'a dyn RecordStore,
    config: &'a EngineConfig,
}

impl<'a> ListingQuery<'a> {
    pub fn new(store: &'a dyn RecordStore, config: &'a EngineConfig) -> Self {
        Self { store, config }
    }

    /// Return one page of records matching the month window and search term.
    ///
    /// An unrecognized month fails before the store is queried.
    pub fn list(&self, params: &ListingParams) -> Result<Page<Record>> {
        let window =
            calendar::resolve_optional(params.month.as_deref(), self.config.reference_year)?;
        let filter = RecordFilter::new()
            .window(window)
            .search(params.search.as_deref());

        let page = positive_or(params.page, DEFAULT_PAGE);
        let per_page = positive_or(params.per_page, self.config.default_per_page.max(1));
        let skip = (page - 1).saturating_mul(per_page);

        let total_items = self.store.count(&filter)?;
        let items = if (skip as u64) < total_items {
            self.store.find(&filter, skip, per_page)?
        } else {
            Vec::new()
        };

        Ok(Page {
            total_items,
            total_pages: total_pages(total_items, per_page),
            current_page: page,
            per_page,
            items,
        })
    }
}
