//! Raw market data lookup over the dataset port.

use crate::domain::error::MandiError;
use crate::domain::market_record::MarketData;
use crate::ports::data_port::MarketDataPort;

/// Matching records for `region`/`commodity` plus the most recent one.
/// An unknown region or commodity gives empty data, not an error.
pub fn get_market_data(
    port: &dyn MarketDataPort,
    region: &str,
    commodity: &str,
) -> Result<MarketData, MandiError> {
    let records = port.fetch_records(region, commodity)?;
    let data = MarketData::from_records(region, commodity, records);
    if data.is_empty() {
        tracing::info!(region, commodity, "no market records found");
    }
    Ok(data)
}
