//! Flat presentation view of a snapshot and its recommendation.

use serde::Serialize;

use crate::domain::enrichment::EnrichedSnapshot;
use crate::domain::momentum::MomentumResult;
use crate::domain::recommendation::Recommendation;
use crate::domain::series::ChartPoint;

#[derive(Debug, Clone, Serialize)]
pub struct MarketSummary {
    pub region: String,
    pub commodity: String,
    pub market: Option<String>,
    pub date: Option<String>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    pub modal_price: Option<f64>,
    pub arrivals: Option<f64>,
    pub trend: String,
    pub buyer_signal: String,
    pub risk_level: String,
    pub momentum: String,
    pub price_change_pct: f64,
    pub volatility: Option<f64>,
    pub recommendation: String,
    pub confidence: u8,
    pub reason: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chart: Option<Vec<ChartPoint>>,
}

impl MarketSummary {
    pub fn with_chart(mut self, chart: Vec<ChartPoint>) -> Self {
        self.chart = Some(chart);
        self
    }
}

pub fn to_market_summary(
    snapshot: &EnrichedSnapshot,
    recommendation: &Recommendation,
) -> MarketSummary {
    let latest = snapshot.latest.as_ref();
    let momentum = snapshot.momentum.unwrap_or_else(MomentumResult::neutral);

    MarketSummary {
        region: snapshot.region.clone(),
        commodity: snapshot.commodity.clone(),
        market: latest.map(|r| r.market.clone()),
        date: latest.map(|r| r.date.format("%Y-%m-%d").to_string()),
        min_price: latest.map(|r| r.min_price),
        max_price: latest.map(|r| r.max_price),
        modal_price: latest.map(|r| r.modal_price),
        arrivals: latest.and_then(|r| r.arrivals),
        trend: snapshot.trend.to_string(),
        buyer_signal: snapshot.buyer_signal.to_string(),
        risk_level: snapshot.risk_level.to_string(),
        momentum: momentum.momentum.to_string(),
        price_change_pct: (momentum.change_pct() * 100.0).round() / 100.0,
        volatility: snapshot.volatility,
        recommendation: recommendation.action.to_string(),
        confidence: recommendation.confidence,
        reason: recommendation.reason.clone(),
        chart: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::enrichment::{BuyerSignal, RiskLevel, Trend};
    use crate::domain::market_record::MarketRecord;
    use crate::domain::momentum::Momentum;
    use crate::domain::recommendation::compute_trade_recommendation;
    use chrono::NaiveDate;

    fn snapshot(latest: Option<MarketRecord>) -> EnrichedSnapshot {
        EnrichedSnapshot {
            region: "Kerala_Kottayam".into(),
            commodity: "Banana".into(),
            latest,
            trend: Trend::Rising,
            buyer_signal: BuyerSignal::Strong,
            risk_level: RiskLevel::Low,
            volatility: Some(0.02),
            momentum: Some(MomentumResult {
                momentum: Momentum::Bullish,
                delta: 0.123456,
            }),
        }
    }

    #[test]
    fn flattens_latest_record_and_signals() {
        let record = MarketRecord {
            region: "Kerala_Kottayam".into(),
            commodity: "Banana".into(),
            market: "Pala".into(),
            date: NaiveDate::from_ymd_opt(2024, 3, 9).unwrap(),
            min_price: 3000.0,
            max_price: 3600.0,
            modal_price: 3400.0,
            arrivals: Some(4.0),
        };
        let snap = snapshot(Some(record));
        let rec = compute_trade_recommendation(snap.trend, snap.buyer_signal, Momentum::Bullish);
        let summary = to_market_summary(&snap, &rec);

        assert_eq!(summary.market.as_deref(), Some("Pala"));
        assert_eq!(summary.date.as_deref(), Some("2024-03-09"));
        assert_eq!(summary.modal_price, Some(3400.0));
        assert_eq!(summary.trend, "rising");
        assert_eq!(summary.buyer_signal, "Strong");
        assert_eq!(summary.risk_level, "Low");
        assert_eq!(summary.momentum, "bullish");
        assert_eq!(summary.price_change_pct, 12.35);
        assert_eq!(summary.recommendation, "SELL");
        assert_eq!(summary.confidence, rec.confidence);
        assert!(summary.chart.is_none());
    }

    #[test]
    fn missing_latest_leaves_price_fields_empty() {
        let mut snap = snapshot(None);
        snap.momentum = None;
        let rec = compute_trade_recommendation(Trend::Stable, BuyerSignal::Stable, Momentum::Neutral);
        let summary = to_market_summary(&snap, &rec);

        assert!(summary.market.is_none());
        assert!(summary.modal_price.is_none());
        assert_eq!(summary.momentum, "neutral");
        assert_eq!(summary.price_change_pct, 0.0);
    }

    #[test]
    fn serializes_chart_only_when_attached() {
        let snap = snapshot(None);
        let rec = compute_trade_recommendation(Trend::Stable, BuyerSignal::Stable, Momentum::Neutral);
        let plain = serde_json::to_value(to_market_summary(&snap, &rec)).unwrap();
        assert!(plain.get("chart").is_none());

        let charted = to_market_summary(&snap, &rec).with_chart(vec![ChartPoint {
            date: "2024-03-09".into(),
            price: 3400.0,
        }]);
        let value = serde_json::to_value(charted).unwrap();
        assert_eq!(value["chart"][0]["price"], 3400.0);
    }
}
