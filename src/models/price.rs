use serde::Serialize;

// ---------------------------------------------------------------------------
// PriceBucket: One histogram bar
// ---------------------------------------------------------------------------

/// A labelled price range used by the histogram.
///
/// `min` and `max` are both inclusive; `max = None` means unbounded.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PriceBucket {
    pub label: &'static str,
    pub min: f64,
    pub max: Option<f64>,
}

impl PriceBucket {
    pub const fn new(label: &'static str, min: f64, max: Option<f64>) -> Self {
        Self { label, min, max }
    }

    pub fn contains(&self, price: f64) -> bool {
        self.range().contains(price)
    }

    pub fn range(&self) -> PriceRange {
        PriceRange {
            min: self.min,
            max: self.max,
        }
    }
}

// ---------------------------------------------------------------------------
// PriceRange: Inclusive price filter
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PriceRange {
    pub min: f64,
    pub max: Option<f64>,
}

impl PriceRange {
    pub fn contains(&self, price: f64) -> bool {
        price >= self.min && self.max.map_or(true, |max| price <= max)
    }
}
