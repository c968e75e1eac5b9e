//! Dataset access port trait.

use crate::domain::error::MandiError;
use crate::domain::market_record::MarketRecord;

/// Read-only access to the regional price datasets.
///
/// An unknown region is "no data" and yields empty results; only an
/// unreadable catalog or dataset file is an error.
pub trait MarketDataPort {
    /// Records for `region` whose commodity matches case-insensitively,
    /// in chronological order.
    fn fetch_records(&self, region: &str, commodity: &str)
    -> Result<Vec<MarketRecord>, MandiError>;

    /// Identifiers of every dataset in the catalog, e.g. `Kerala_Kottayam`.
    fn list_regions(&self) -> Result<Vec<String>, MandiError>;

    /// Commodity names present in one dataset.
    fn list_commodities(&self, region: &str) -> Result<Vec<String>, MandiError>;
}
