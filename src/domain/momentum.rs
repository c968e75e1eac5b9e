//! Short-window price momentum.
//!
//! delta = (last - first) / first over the series window.
//! delta >= T: bullish, delta <= -T: bearish, otherwise neutral.
//! Fewer than two points, or a zero first price: neutral with delta 0.

use serde::Serialize;
use std::fmt;

use crate::domain::series::PriceSeries;
use crate::domain::signal_config::SignalConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Momentum {
    Bullish,
    Neutral,
    Bearish,
}

impl Momentum {
    pub const ALL: [Momentum; 3] = [Momentum::Bullish, Momentum::Neutral, Momentum::Bearish];
}

impl fmt::Display for Momentum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Momentum::Bullish => "bullish",
            Momentum::Neutral => "neutral",
            Momentum::Bearish => "bearish",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MomentumResult {
    pub momentum: Momentum,
    /// Fractional change from first to last modal price.
    pub delta: f64,
}

impl MomentumResult {
    pub fn neutral() -> Self {
        Self {
            momentum: Momentum::Neutral,
            delta: 0.0,
        }
    }

    pub fn change_pct(&self) -> f64 {
        self.delta * 100.0
    }
}

pub fn classify_delta(delta: f64, threshold: f64) -> Momentum {
    if delta >= threshold {
        Momentum::Bullish
    } else if delta <= -threshold {
        Momentum::Bearish
    } else {
        Momentum::Neutral
    }
}

pub fn compute_price_momentum(series: &PriceSeries, config: &SignalConfig) -> MomentumResult {
    let (first, last) = match (series.first(), series.last()) {
        (Some(first), Some(last)) if series.len() >= 2 => (first.modal_price, last.modal_price),
        _ => return MomentumResult::neutral(),
    };

    if first == 0.0 {
        return MomentumResult::neutral();
    }

    let delta = (last - first) / first;
    MomentumResult {
        momentum: classify_delta(delta, config.momentum_threshold),
        delta,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::series::PricePoint;
    use approx::assert_relative_eq;
    use chrono::NaiveDate;

    fn series(prices: &[f64]) -> PriceSeries {
        PriceSeries {
            region: "Kerala_Kottayam".into(),
            commodity: "Banana".into(),
            points: prices
                .iter()
                .enumerate()
                .map(|(i, &modal_price)| PricePoint {
                    date: NaiveDate::from_ymd_opt(2024, 1, (i + 1) as u32).unwrap(),
                    modal_price,
                    arrivals: None,
                })
                .collect(),
        }
    }

    fn config() -> SignalConfig {
        SignalConfig::default()
    }

    #[test]
    fn rising_window_is_bullish() {
        let result = compute_price_momentum(&series(&[100.0, 105.0, 112.0]), &config());
        assert_eq!(result.momentum, Momentum::Bullish);
        assert_relative_eq!(result.delta, 0.12, epsilon = 1e-12);
    }

    #[test]
    fn three_percent_drop_is_bearish() {
        let result = compute_price_momentum(&series(&[100.0, 98.0, 97.0]), &config());
        assert_eq!(result.momentum, Momentum::Bearish);
        assert_relative_eq!(result.delta, -0.03, epsilon = 1e-12);
    }

    #[test]
    fn just_inside_lower_threshold_is_neutral() {
        let result = compute_price_momentum(&series(&[100.0, 98.0, 97.1]), &config());
        assert_eq!(result.momentum, Momentum::Neutral);
    }

    #[test]
    fn upper_threshold_both_sides() {
        let at = compute_price_momentum(&series(&[100.0, 103.0]), &config());
        assert_eq!(at.momentum, Momentum::Bullish);

        let below = compute_price_momentum(&series(&[100.0, 102.9]), &config());
        assert_eq!(below.momentum, Momentum::Neutral);
    }

    #[test]
    fn only_endpoints_matter() {
        let result = compute_price_momentum(&series(&[100.0, 150.0, 40.0, 101.0]), &config());
        assert_eq!(result.momentum, Momentum::Neutral);
        assert_relative_eq!(result.delta, 0.01, epsilon = 1e-12);
    }

    #[test]
    fn single_point_is_neutral() {
        let result = compute_price_momentum(&series(&[100.0]), &config());
        assert_eq!(result, MomentumResult::neutral());
    }

    #[test]
    fn empty_series_is_neutral() {
        let result = compute_price_momentum(&series(&[]), &config());
        assert_eq!(result.momentum, Momentum::Neutral);
        assert_eq!(result.delta, 0.0);
    }

    #[test]
    fn zero_first_price_is_neutral() {
        let result = compute_price_momentum(&series(&[0.0, 50.0]), &config());
        assert_eq!(result, MomentumResult::neutral());
    }

    #[test]
    fn custom_threshold() {
        let wide = SignalConfig {
            momentum_threshold: 0.2,
            ..SignalConfig::default()
        };
        let result = compute_price_momentum(&series(&[100.0, 105.0, 112.0]), &wide);
        assert_eq!(result.momentum, Momentum::Neutral);
    }

    #[test]
    fn change_pct() {
        let result = compute_price_momentum(&series(&[200.0, 210.0]), &config());
        assert_relative_eq!(result.change_pct(), 5.0, epsilon = 1e-9);
    }

    #[test]
    fn display() {
        assert_eq!(Momentum::Bullish.to_string(), "bullish");
        assert_eq!(Momentum::Bearish.to_string(), "bearish");
    }
}
