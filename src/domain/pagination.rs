//! Paged record listing for tabular display, most recent first.

use serde::Serialize;

use crate::domain::error::MandiError;
use crate::domain::market_record::MarketRecord;
use crate::ports::data_port::MarketDataPort;

pub const MIN_PAGE_SIZE: usize = 10;
pub const MAX_PAGE_SIZE: usize = 200;
pub const DEFAULT_PAGE_SIZE: usize = 50;

#[derive(Debug, Clone, Serialize)]
pub struct RecordPage {
    pub records: Vec<MarketRecord>,
    pub total: usize,
    pub page: usize,
    pub page_size: usize,
    pub total_pages: usize,
}

pub fn validate_page(page: usize, page_size: usize) -> Result<(usize, usize), MandiError> {
    if page < 1 {
        return Err(MandiError::invalid_request("page must be at least 1"));
    }
    if !(MIN_PAGE_SIZE..=MAX_PAGE_SIZE).contains(&page_size) {
        return Err(MandiError::invalid_request(format!(
            "page_size must be between {} and {}, got {}",
            MIN_PAGE_SIZE, MAX_PAGE_SIZE, page_size
        )));
    }
    Ok((page, page_size))
}

/// Slice `records` into one page. Input order does not matter; output is
/// sorted by date descending, ties in input order. A page past the end is
/// empty with the correct total.
pub fn paginate(mut records: Vec<MarketRecord>, page: usize, page_size: usize) -> RecordPage {
    let page = page.max(1);
    let page_size = page_size.clamp(MIN_PAGE_SIZE, MAX_PAGE_SIZE);
    let total = records.len();

    records.sort_by(|a, b| b.date.cmp(&a.date));

    let start = (page - 1).saturating_mul(page_size);
    let records: Vec<_> = records.into_iter().skip(start).take(page_size).collect();

    RecordPage {
        records,
        total,
        page,
        page_size,
        total_pages: total.div_ceil(page_size),
    }
}

pub fn get_market_records(
    port: &dyn MarketDataPort,
    region: &str,
    commodity: &str,
    page: usize,
    page_size: usize,
) -> Result<RecordPage, MandiError> {
    let records = port.fetch_records(region, commodity)?;
    Ok(paginate(records, page, page_size))
}
