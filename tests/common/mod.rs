#![allow(dead_code)]

use chrono::{Duration, NaiveDate};
use mandisignal::domain::error::MandiError;
pub use mandisignal::domain::market_record::MarketRecord;
use mandisignal::ports::data_port::MarketDataPort;
use std::collections::HashMap;
use std::path::Path;

pub struct MockDataPort {
    pub data: HashMap<String, Vec<MarketRecord>>,
    pub errors: HashMap<String, String>,
    pub catalog_error: Option<String>,
}

impl MockDataPort {
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
            errors: HashMap::new(),
            catalog_error: None,
        }
    }

    pub fn with_records(mut self, region: &str, records: Vec<MarketRecord>) -> Self {
        self.data
            .entry(region.to_string())
            .or_default()
            .extend(records);
        self
    }

    pub fn with_error(mut self, region: &str, reason: &str) -> Self {
        self.errors.insert(region.to_string(), reason.to_string());
        self
    }

    pub fn with_catalog_error(mut self, reason: &str) -> Self {
        self.catalog_error = Some(reason.to_string());
        self
    }

    fn check(&self, region: &str) -> Result<(), MandiError> {
        match self.errors.get(region) {
            Some(reason) => Err(MandiError::dataset(reason.clone())),
            None => Ok(()),
        }
    }
}

impl MarketDataPort for MockDataPort {
    fn fetch_records(
        &self,
        region: &str,
        commodity: &str,
    ) -> Result<Vec<MarketRecord>, MandiError> {
        self.check(region)?;
        let mut records: Vec<MarketRecord> = self
            .data
            .get(region)
            .map(|rs| {
                rs.iter()
                    .filter(|r| r.matches_commodity(commodity))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();
        records.sort_by_key(|r| r.date);
        Ok(records)
    }

    fn list_regions(&self) -> Result<Vec<String>, MandiError> {
        if let Some(reason) = &self.catalog_error {
            return Err(MandiError::dataset(reason.clone()));
        }
        let mut regions: Vec<String> = self.data.keys().cloned().collect();
        regions.extend(self.errors.keys().cloned());
        regions.sort();
        regions.dedup();
        Ok(regions)
    }

    fn list_commodities(&self, region: &str) -> Result<Vec<String>, MandiError> {
        self.check(region)?;
        let mut names: Vec<String> = self
            .data
            .get(region)
            .map(|rs| rs.iter().map(|r| r.commodity.clone()).collect())
            .unwrap_or_default();
        names.sort();
        names.dedup();
        Ok(names)
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn make_record(
    region: &str,
    commodity: &str,
    date_str: &str,
    modal: f64,
    arrivals: Option<f64>,
) -> MarketRecord {
    MarketRecord {
        region: region.to_string(),
        commodity: commodity.to_string(),
        market: region.rsplit('_').next().unwrap_or(region).to_string(),
        date: NaiveDate::parse_from_str(date_str, "%Y-%m-%d").unwrap(),
        min_price: modal * 0.9,
        max_price: modal * 1.1,
        modal_price: modal,
        arrivals,
    }
}

/// One record per day starting at `start`, modal prices from `prices`.
pub fn daily_records(
    region: &str,
    commodity: &str,
    start: &str,
    prices: &[f64],
    arrivals: &[f64],
) -> Vec<MarketRecord> {
    let start = NaiveDate::parse_from_str(start, "%Y-%m-%d").unwrap();
    prices
        .iter()
        .enumerate()
        .map(|(i, &modal)| {
            let day = start + Duration::days(i as i64);
            make_record(
                region,
                commodity,
                &day.format("%Y-%m-%d").to_string(),
                modal,
                arrivals.get(i).copied(),
            )
        })
        .collect()
}

/// A flat series of `n` records, one per day.
pub fn flat_records(region: &str, commodity: &str, n: usize, modal: f64) -> Vec<MarketRecord> {
    daily_records(region, commodity, "2024-01-01", &vec![modal; n], &[])
}

pub const KOTTAYAM_CSV: &str = "State,District Name,Market Name,Commodity,Variety,Grade,Min Price,Max Price,Modal Price,Price Date,Arrivals (Tonnes)\n\
Kerala,Kottayam,Kottayam,Banana,Nendra,FAQ,3000,3600,3300,2024-03-01,20\n\
Kerala,Kottayam,Kottayam,Banana,Nendra,FAQ,3000,3600,3350,2024-03-02,19\n\
Kerala,Kottayam,Pala,Banana,Nendra,FAQ,3050,3650,3400,2024-03-03,18\n\
Kerala,Kottayam,Kottayam,Banana,Nendra,FAQ,3100,3700,3450,2024-03-04,17\n\
Kerala,Kottayam,Kottayam,Banana,Nendra,FAQ,3100,3800,3500,2024-03-05,16\n\
Kerala,Kottayam,Kottayam,Banana,Nendra,FAQ,3200,3900,3600,2024-03-06,15\n\
Kerala,Kottayam,Kottayam,Tapioca,Local,FAQ,1800,2200,2000,2024-03-06,30\n";

pub const THRISSUR_CSV: &str = "Commodity,Market,Date,Min Price,Max Price,Modal Price\n\
Pepper,Thrissur,2024-03-01,50000,52000,51000\n\
Pepper,Thrissur,2024-03-02,49000,51000,50000\n";

pub const LUDHIANA_CSV: &str = "Date,Wheat,Paddy\n2024-03-01,2275,2183\n";

/// Writes a small dataset directory with three regions.
pub fn write_dataset_dir(dir: &Path) {
    std::fs::write(dir.join("Kerala_Kottayam.csv"), KOTTAYAM_CSV).unwrap();
    std::fs::write(dir.join("Kerala_Thrissur.csv"), THRISSUR_CSV).unwrap();
    std::fs::write(dir.join("Punjab_Ludhiana.csv"), LUDHIANA_CSV).unwrap();
}
