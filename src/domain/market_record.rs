//! Market record representation.

use chrono::NaiveDate;
use serde::Serialize;

/// One observed price point at a mandi.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarketRecord {
    pub region: String,
    pub commodity: String,
    pub market: String,
    pub date: NaiveDate,
    pub min_price: f64,
    pub max_price: f64,
    pub modal_price: f64,
    /// Arrival quantity; `None` when the dataset has no arrivals column.
    pub arrivals: Option<f64>,
}

impl MarketRecord {
    /// min <= modal <= max, all finite and non-negative.
    pub fn is_consistent(&self) -> bool {
        let prices = [self.min_price, self.modal_price, self.max_price];
        prices.iter().all(|p| p.is_finite() && *p >= 0.0)
            && self.min_price <= self.modal_price
            && self.modal_price <= self.max_price
            && !self.commodity.trim().is_empty()
    }

    pub fn matches_commodity(&self, commodity: &str) -> bool {
        self.commodity.trim().eq_ignore_ascii_case(commodity.trim())
    }

    /// max - min
    pub fn spread(&self) -> f64 {
        self.max_price - self.min_price
    }
}

/// Raw records for a region/commodity plus the most recent one.
#[derive(Debug, Clone, Default, Serialize)]
pub struct MarketData {
    pub region: String,
    pub commodity: String,
    /// Chronological, ties kept in dataset order.
    pub records: Vec<MarketRecord>,
    pub latest: Option<MarketRecord>,
}

impl MarketData {
    pub fn from_records(region: &str, commodity: &str, mut records: Vec<MarketRecord>) -> Self {
        records.sort_by_key(|r| r.date);
        let latest = records.last().cloned();
        Self {
            region: region.to_string(),
            commodity: commodity.to_string(),
            records,
            latest,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
