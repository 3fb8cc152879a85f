use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Record: One product sale
// ---------------------------------------------------------------------------

/// A single product-sale entry as held by a [`RecordStore`](crate::store::RecordStore).
///
/// Field names serialize in camelCase (`dateOfSale`) to match the seed
/// dataset. Timestamps with any UTC offset are accepted and normalized to UTC.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Record {
    pub id: i64,
    pub title: String,
    pub price: f64,
    #[serde(default)]
    pub description: String,
    pub category: String,
    #[serde(default)]
    pub image: String,
    pub sold: bool,
    pub date_of_sale: DateTime<Utc>,
}

impl Record {
    /// The price as free-text search sees it.
    ///
    /// Uses the shortest decimal rendering, so `50.0` reads as `"50"` and
    /// `15.99` as `"15.99"`.
    pub fn price_text(&self) -> String {
        format_price(self.price)
    }
}

pub(crate) fn format_price(price: f64) -> String {
    format!("{}", price)
}
