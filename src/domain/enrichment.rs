//! Trend, buyer signal and risk level derived from the latest record and
//! the price series.
//!
//! An empty or single-point series degrades to stable / Stable / Moderate.

use serde::Serialize;
use std::cmp::Ordering;
use std::fmt;

use crate::domain::market_record::{MarketData, MarketRecord};
use crate::domain::momentum::MomentumResult;
use crate::domain::series::PriceSeries;
use crate::domain::signal_config::SignalConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Rising,
    Falling,
    Stable,
}

impl Trend {
    pub const ALL: [Trend; 3] = [Trend::Rising, Trend::Falling, Trend::Stable];
}

impl fmt::Display for Trend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Trend::Rising => "rising",
            Trend::Falling => "falling",
            Trend::Stable => "stable",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum BuyerSignal {
    Strong,
    Stable,
    Weak,
}

impl BuyerSignal {
    pub const ALL: [BuyerSignal; 3] = [BuyerSignal::Strong, BuyerSignal::Stable, BuyerSignal::Weak];
}

impl fmt::Display for BuyerSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            BuyerSignal::Strong => "Strong",
            BuyerSignal::Stable => "Stable",
            BuyerSignal::Weak => "Weak",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum RiskLevel {
    Low,
    Moderate,
    High,
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RiskLevel::Low => "Low",
            RiskLevel::Moderate => "Moderate",
            RiskLevel::High => "High",
        };
        f.write_str(s)
    }
}

/// Direction of arrivals between the last two series dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ArrivalTrend {
    Rising,
    Falling,
    Flat,
}

#[derive(Debug, Clone, Serialize)]
pub struct EnrichedSnapshot {
    pub region: String,
    pub commodity: String,
    pub latest: Option<MarketRecord>,
    pub trend: Trend,
    pub buyer_signal: BuyerSignal,
    pub risk_level: RiskLevel,
    /// Coefficient of variation of modal price over the window.
    pub volatility: Option<f64>,
    pub momentum: Option<MomentumResult>,
}

impl EnrichedSnapshot {
    pub fn with_momentum(mut self, momentum: MomentumResult) -> Self {
        self.momentum = Some(momentum);
        self
    }
}

pub fn enrich_market_data(
    raw: &MarketData,
    series: &PriceSeries,
    config: &SignalConfig,
) -> EnrichedSnapshot {
    let trend = price_trend(series);
    let volatility = coefficient_of_variation(series);

    EnrichedSnapshot {
        region: raw.region.clone(),
        commodity: raw.commodity.clone(),
        latest: raw.latest.clone(),
        trend,
        buyer_signal: buyer_signal(trend, arrival_trend(series)),
        risk_level: risk_level(volatility, config),
        volatility,
        momentum: None,
    }
}

pub fn price_trend(series: &PriceSeries) -> Trend {
    match series.last_pair() {
        Some((prev, last)) => match last.modal_price.partial_cmp(&prev.modal_price) {
            Some(Ordering::Greater) => Trend::Rising,
            Some(Ordering::Less) => Trend::Falling,
            _ => Trend::Stable,
        },
        None => Trend::Stable,
    }
}

fn arrival_trend(series: &PriceSeries) -> Option<ArrivalTrend> {
    let (prev, last) = series.last_pair()?;
    let (prev, last) = (prev.arrivals?, last.arrivals?);
    Some(match last.partial_cmp(&prev)? {
        Ordering::Greater => ArrivalTrend::Rising,
        Ordering::Less => ArrivalTrend::Falling,
        Ordering::Equal => ArrivalTrend::Flat,
    })
}

fn buyer_signal(trend: Trend, arrivals: Option<ArrivalTrend>) -> BuyerSignal {
    match (trend, arrivals) {
        (Trend::Rising, Some(ArrivalTrend::Falling | ArrivalTrend::Flat)) => BuyerSignal::Strong,
        (Trend::Falling, Some(ArrivalTrend::Rising)) => BuyerSignal::Weak,
        _ => BuyerSignal::Stable,
    }
}

/// Population standard deviation over mean. `None` below two points or
/// when the mean is not positive.
pub fn coefficient_of_variation(series: &PriceSeries) -> Option<f64> {
    if series.len() < 2 {
        return None;
    }
    let n = series.len() as f64;
    let mean = series.modal_prices().sum::<f64>() / n;
    if mean <= 0.0 || !mean.is_finite() {
        return None;
    }
    let variance = series
        .modal_prices()
        .map(|p| {
            let diff = p - mean;
            diff * diff
        })
        .sum::<f64>()
        / n;
    Some(variance.sqrt() / mean)
}

fn risk_level(volatility: Option<f64>, config: &SignalConfig) -> RiskLevel {
    match volatility {
        Some(cv) if cv < config.volatility_low => RiskLevel::Low,
        Some(cv) if cv >= config.volatility_high => RiskLevel::High,
        _ => RiskLevel::Moderate,
    }
}
