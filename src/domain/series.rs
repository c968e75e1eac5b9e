//! Daily modal-price series for one region and commodity.
//!
//! Records are grouped by date, the last record seen for a date wins, and
//! the trailing `days` dates are kept in ascending order. Missing dates are
//! never synthesised.

use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeMap;

use crate::domain::error::MandiError;
use crate::domain::market_record::MarketRecord;
use crate::ports::data_port::MarketDataPort;

pub const MIN_DAYS: usize = 1;
pub const MAX_DAYS: usize = 30;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PricePoint {
    pub date: NaiveDate,
    pub modal_price: f64,
    /// Arrivals of the record that produced this point.
    pub arrivals: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PriceSeries {
    pub region: String,
    pub commodity: String,
    /// Strictly ascending by date.
    pub points: Vec<PricePoint>,
}

impl PriceSeries {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn first(&self) -> Option<&PricePoint> {
        self.points.first()
    }

    pub fn last(&self) -> Option<&PricePoint> {
        self.points.last()
    }

    /// The last two points, oldest first.
    pub fn last_pair(&self) -> Option<(&PricePoint, &PricePoint)> {
        match self.points.as_slice() {
            [.., prev, last] => Some((prev, last)),
            _ => None,
        }
    }

    pub fn modal_prices(&self) -> impl Iterator<Item = f64> + '_ {
        self.points.iter().map(|p| p.modal_price)
    }
}

/// A point on a price chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartPoint {
    pub date: String,
    pub price: f64,
}

/// Bound a requested window to `MIN_DAYS..=MAX_DAYS`.
pub fn clamp_days(days: usize) -> usize {
    days.clamp(MIN_DAYS, MAX_DAYS)
}

pub fn validate_days(days: usize) -> Result<usize, MandiError> {
    if (MIN_DAYS..=MAX_DAYS).contains(&days) {
        Ok(days)
    } else {
        Err(MandiError::invalid_request(format!(
            "days must be between {} and {}, got {}",
            MIN_DAYS, MAX_DAYS, days
        )))
    }
}

/// Build a series from already-matched records.
pub fn build_price_series(
    region: &str,
    commodity: &str,
    records: &[MarketRecord],
    days: usize,
) -> PriceSeries {
    let days = clamp_days(days);
    let mut by_date: BTreeMap<NaiveDate, PricePoint> = BTreeMap::new();

    for rec in records.iter().filter(|r| r.matches_commodity(commodity)) {
        by_date.insert(
            rec.date,
            PricePoint {
                date: rec.date,
                modal_price: rec.modal_price,
                arrivals: rec.arrivals,
            },
        );
    }

    let skip = by_date.len().saturating_sub(days);
    let points = by_date.into_values().skip(skip).collect();

    PriceSeries {
        region: region.to_string(),
        commodity: commodity.to_string(),
        points,
    }
}

/// Fetch matching records and derive the trailing `days` series.
pub fn get_price_trend_series(
    port: &dyn MarketDataPort,
    region: &str,
    commodity: &str,
    days: usize,
) -> Result<PriceSeries, MandiError> {
    let records = port.fetch_records(region, commodity)?;
    let series = build_price_series(region, commodity, &records, days);
    tracing::debug!(
        region,
        commodity,
        days,
        points = series.len(),
        "built price series"
    );
    Ok(series)
}

/// Flatten a series into chart points, keeping order and count.
pub fn to_chart_series(series: &PriceSeries) -> Vec<ChartPoint> {
    series
        .points
        .iter()
        .map(|p| ChartPoint {
            date: p.date.format("%Y-%m-%d").to_string(),
            price: p.modal_price,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn rec(day: u32, modal: f64) -> MarketRecord {
        MarketRecord {
            region: "Kerala_Kottayam".into(),
            commodity: "Banana".into(),
            market: "Kottayam".into(),
            date: NaiveDate::from_ymd_opt(2024, 1, day).unwrap(),
            min_price: modal,
            max_price: modal,
            modal_price: modal,
            arrivals: None,
        }
    }

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, day).unwrap()
    }

    #[test]
    fn keeps_trailing_days() {
        let records: Vec<_> = (1..=10).map(|d| rec(d, 100.0 + d as f64)).collect();
        let series = build_price_series("Kerala_Kottayam", "Banana", &records, 3);

        assert_eq!(series.len(), 3);
        assert_eq!(series.points[0].date, date(8));
        assert_eq!(series.points[2].date, date(10));
        assert_eq!(series.points[2].modal_price, 110.0);
    }

    #[test]
    fn later_duplicate_overwrites_earlier() {
        let records = vec![rec(1, 100.0), rec(2, 105.0), rec(2, 107.0)];
        let series = build_price_series("Kerala_Kottayam", "Banana", &records, 14);

        assert_eq!(series.len(), 2);
        assert_eq!(series.points[1].modal_price, 107.0);
    }

    #[test]
    fn unsorted_input_comes_out_ascending() {
        let records = vec![rec(5, 50.0), rec(1, 10.0), rec(3, 30.0)];
        let series = build_price_series("Kerala_Kottayam", "Banana", &records, 14);

        let dates: Vec<_> = series.points.iter().map(|p| p.date).collect();
        assert_eq!(dates, vec![date(1), date(3), date(5)]);
    }

    #[test]
    fn fewer_dates_than_window_is_not_padded() {
        let records = vec![rec(1, 100.0), rec(2, 101.0)];
        let series = build_price_series("Kerala_Kottayam", "Banana", &records, 30);
        assert_eq!(series.len(), 2);
    }

    #[test]
    fn no_records_gives_empty_series() {
        let series = build_price_series("Kerala_Kottayam", "Banana", &[], 14);
        assert!(series.is_empty());
        assert!(series.last_pair().is_none());
    }

    #[test]
    fn other_commodities_are_ignored() {
        let mut tapioca = rec(3, 900.0);
        tapioca.commodity = "Tapioca".into();
        let records = vec![rec(1, 100.0), tapioca];
        let series = build_price_series("Kerala_Kottayam", "banana", &records, 14);

        assert_eq!(series.len(), 1);
        assert_eq!(series.points[0].modal_price, 100.0);
    }

    #[test]
    fn window_is_clamped() {
        let records: Vec<_> = (1..=31).map(|d| rec(d, d as f64)).collect();
        assert_eq!(build_price_series("R", "Banana", &records, 0).len(), MIN_DAYS);
        assert_eq!(build_price_series("R", "Banana", &records, 90).len(), MAX_DAYS);
    }

    #[test]
    fn validate_days_bounds() {
        assert!(validate_days(1).is_ok());
        assert!(validate_days(30).is_ok());
        assert!(validate_days(0).is_err());
        assert!(validate_days(31).is_err());
    }

    #[test]
    fn last_pair_is_oldest_first() {
        let records = vec![rec(1, 100.0), rec(2, 105.0), rec(3, 112.0)];
        let series = build_price_series("R", "Banana", &records, 14);
        let (prev, last) = series.last_pair().unwrap();
        assert_eq!(prev.modal_price, 105.0);
        assert_eq!(last.modal_price, 112.0);
    }

    #[test]
    fn chart_series_preserves_order_and_count() {
        let records = vec![rec(3, 112.0), rec(1, 100.0), rec(2, 105.0)];
        let series = build_price_series("R", "Banana", &records, 14);
        let chart = to_chart_series(&series);

        assert_eq!(chart.len(), series.len());
        for (point, chart_point) in series.points.iter().zip(&chart) {
            assert_eq!(chart_point.date, point.date.format("%Y-%m-%d").to_string());
            assert_eq!(chart_point.price, point.modal_price);
        }
        assert_eq!(chart[0].date, "2024-01-01");
    }

    proptest! {
        #[test]
        fn series_is_bounded_and_strictly_ascending(
            days in 1usize..=30,
            entries in proptest::collection::vec((1u32..=28, 1.0f64..10_000.0), 0..80),
        ) {
            let records: Vec<_> = entries.iter().map(|&(d, p)| rec(d, p)).collect();
            let series = build_price_series("R", "Banana", &records, days);

            prop_assert!(series.len() <= days);
            for pair in series.points.windows(2) {
                prop_assert!(pair[0].date < pair[1].date);
            }
        }
    }
}
