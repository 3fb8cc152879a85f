//! Record predicates shared by every store implementation.
//!
//! A [`RecordFilter`] is plain data: [`MemoryStore`](crate::store::MemoryStore)
//! evaluates it with [`RecordFilter::matches`], and
//! [`DuckDbStore`](crate::store::DuckDbStore) renders the same criteria as SQL.

use crate::calendar::TimeWindow;
use crate::models::{PriceRange, Record};

/// Conjunction of optional criteria over [`Record`]s.
///
/// An empty filter matches every record.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordFilter {
    pub window: Option<TimeWindow>,
    /// Lower-cased search term; never empty when present.
    pub search: Option<String>,
    pub sold: Option<bool>,
    pub price: Option<PriceRange>,
}

impl RecordFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Restrict to `dateOfSale` within the window.
    pub fn window(mut self, window: Option<TimeWindow>) -> Self {
        self.window = window;
        self
    }

    /// Case-insensitive substring match on title, description or price text.
    ///
    /// An empty term clears the text criterion.
    pub fn search(mut self, term: Option<&str>) -> Self {
        self.search = term
            .filter(|t| !t.is_empty())
            .map(|t| t.to_lowercase());
        self
    }

    pub fn sold(mut self, sold: bool) -> Self {
        self.sold = Some(sold);
        self
    }

    pub fn price(mut self, range: PriceRange) -> Self {
        self.price = Some(range);
        self
    }

    /// Evaluate the filter against a single record.
    pub fn matches(&self, record: &Record) -> bool {
        if let Some(window) = &self.window {
            if !window.contains(&record.date_of_sale) {
                return false;
            }
        }
        if let Some(sold) = self.sold {
            if record.sold != sold {
                return false;
            }
        }
        if let Some(range) = &self.price {
            if !range.contains(record.price) {
                return false;
            }
        }
        match &self.search {
            Some(term) => {
                record.title.to_lowercase().contains(term.as_str())
                    || record.description.to_lowercase().contains(term.as_str())
                    || record.price_text().to_lowercase().contains(term.as_str())
            }
            None => true,
        }
    }
}
