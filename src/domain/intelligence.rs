//! Market intelligence pipeline.
//!
//! Raw records and the trend series are read concurrently on the blocking
//! pool and joined before the synchronous enrich -> momentum -> recommend
//! steps run.

use serde::Serialize;
use std::sync::Arc;

use crate::domain::enrichment::{EnrichedSnapshot, RiskLevel, enrich_market_data};
use crate::domain::error::MandiError;
use crate::domain::market_data::get_market_data;
use crate::domain::market_record::MarketData;
use crate::domain::momentum::{MomentumResult, compute_price_momentum};
use crate::domain::recommendation::{Recommendation, compute_trade_recommendation};
use crate::domain::series::{PriceSeries, get_price_trend_series, to_chart_series};
use crate::domain::settings::{DEFAULT_COMMODITY, DEFAULT_DAYS, DEFAULT_REGION};
use crate::domain::signal_config::SignalConfig;
use crate::domain::summary::{MarketSummary, to_market_summary};
use crate::ports::data_port::MarketDataPort;

pub type SharedDataPort = Arc<dyn MarketDataPort + Send + Sync>;

/// Everything derived for one region/commodity request.
#[derive(Debug, Clone)]
pub struct MarketIntelligence {
    pub raw: MarketData,
    pub series: PriceSeries,
    pub snapshot: EnrichedSnapshot,
    pub momentum: MomentumResult,
    pub recommendation: Recommendation,
}

impl MarketIntelligence {
    /// Summary with the chart series attached.
    pub fn summary(&self) -> MarketSummary {
        to_market_summary(&self.snapshot, &self.recommendation)
            .with_chart(to_chart_series(&self.series))
    }
}

/// Run a synchronous dataset read on the blocking pool.
pub async fn run_blocking<T, F>(task: F) -> Result<T, MandiError>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T, MandiError> + Send + 'static,
{
    tokio::task::spawn_blocking(task)
        .await
        .map_err(|e| MandiError::dataset(format!("dataset read task failed: {}", e)))?
}

/// Fetch raw data and the series concurrently; both must finish.
pub async fn fetch_market_inputs(
    port: SharedDataPort,
    region: &str,
    commodity: &str,
    days: usize,
) -> Result<(MarketData, PriceSeries), MandiError> {
    let raw_task = {
        let port = Arc::clone(&port);
        let (region, commodity) = (region.to_string(), commodity.to_string());
        run_blocking(move || get_market_data(port.as_ref(), &region, &commodity))
    };
    let series_task = {
        let (region, commodity) = (region.to_string(), commodity.to_string());
        run_blocking(move || get_price_trend_series(port.as_ref(), &region, &commodity, days))
    };

    tokio::try_join!(raw_task, series_task)
}

/// The synchronous half of the pipeline.
pub fn analyze(raw: MarketData, series: PriceSeries, config: &SignalConfig) -> MarketIntelligence {
    let momentum = compute_price_momentum(&series, config);
    let snapshot = enrich_market_data(&raw, &series, config).with_momentum(momentum);
    let recommendation =
        compute_trade_recommendation(snapshot.trend, snapshot.buyer_signal, momentum.momentum);

    tracing::info!(
        region = %raw.region,
        commodity = %raw.commodity,
        points = series.len(),
        trend = %snapshot.trend,
        momentum = %momentum.momentum,
        action = %recommendation.action,
        confidence = recommendation.confidence,
        "market intelligence computed"
    );

    MarketIntelligence {
        raw,
        series,
        snapshot,
        momentum,
        recommendation,
    }
}

pub async fn market_intelligence(
    port: SharedDataPort,
    region: &str,
    commodity: &str,
    days: usize,
    config: &SignalConfig,
) -> Result<MarketIntelligence, MandiError> {
    let (raw, series) = fetch_market_inputs(port, region, commodity, days).await?;
    Ok(analyze(raw, series, config))
}

/// Saved preferences from a farmer's onboarding; either may be unset.
#[derive(Debug, Clone, Default)]
pub struct FarmerPreferences {
    pub primary_region: Option<String>,
    pub primary_commodity: Option<String>,
}

impl FarmerPreferences {
    pub fn region(&self) -> &str {
        non_blank(self.primary_region.as_deref()).unwrap_or(DEFAULT_REGION)
    }

    pub fn commodity(&self) -> &str {
        non_blank(self.primary_commodity.as_deref()).unwrap_or(DEFAULT_COMMODITY)
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

#[derive(Debug, Clone, Serialize)]
pub struct Dashboard {
    pub primary_region: String,
    pub primary_commodity: String,
    pub market: MarketSummary,
    pub ai_recommendation: String,
    pub recommendation_reason: String,
    pub consensus_score: u8,
    pub risk_level: RiskLevel,
}

/// Dashboard for a farmer's preferred market over a fixed 14-day window.
pub async fn farmer_dashboard(
    port: SharedDataPort,
    preferences: &FarmerPreferences,
    config: &SignalConfig,
) -> Result<Dashboard, MandiError> {
    let region = preferences.region();
    let commodity = preferences.commodity();
    let intel = market_intelligence(port, region, commodity, DEFAULT_DAYS, config).await?;

    Ok(Dashboard {
        primary_region: region.to_string(),
        primary_commodity: commodity.to_string(),
        market: to_market_summary(&intel.snapshot, &intel.recommendation),
        ai_recommendation: intel.recommendation.action.to_string(),
        recommendation_reason: intel.recommendation.reason.clone(),
        consensus_score: intel.recommendation.confidence,
        risk_level: intel.snapshot.risk_level,
    })
}
