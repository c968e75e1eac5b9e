//! CSV dataset adapter.
//!
//! One file per region, `<base>/<State>_<District>.csv`. A dataset is parsed
//! the first time it is asked for and kept for the process lifetime; the
//! files are assumed not to change while the process runs.

use chrono::NaiveDate;
use std::collections::{BTreeSet, HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

use crate::domain::error::MandiError;
use crate::domain::market_record::MarketRecord;
use crate::ports::data_port::MarketDataPort;

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%d-%m-%Y", "%d/%m/%Y", "%d %b %Y", "%d-%b-%Y"];

/// Header aliases after normalisation (lowercase, runs of non-alphanumerics
/// collapsed to `_`).
const COMMODITY_HEADERS: &[&str] = &["commodity", "commodity_name"];
const MARKET_HEADERS: &[&str] = &["market", "market_name", "mandi", "mandi_name"];
const DATE_HEADERS: &[&str] = &["price_date", "arrival_date", "date", "reported_date"];
const MIN_HEADERS: &[&str] = &["min_price", "min_x0020_price", "minimum_price", "min"];
const MAX_HEADERS: &[&str] = &["max_price", "max_x0020_price", "maximum_price", "max"];
const MODAL_HEADERS: &[&str] = &["modal_price", "modal_x0020_price", "modal"];
const ARRIVAL_HEADERS: &[&str] = &["arrivals", "arrivals_tonnes", "arrival_quantity", "arrival"];

/// Columns that describe a row rather than name a commodity.
const RESERVED_HEADERS: &[&str] = &[
    "state", "district", "district_name", "variety", "grade", "sl_no", "unit",
];

type Dataset = Arc<Vec<MarketRecord>>;

#[derive(Debug, Clone, Copy)]
struct ColumnMap {
    commodity: Option<usize>,
    market: Option<usize>,
    date: Option<usize>,
    min: Option<usize>,
    max: Option<usize>,
    modal: Option<usize>,
    arrivals: Option<usize>,
}

impl ColumnMap {
    fn from_headers(headers: &[String]) -> Self {
        let find = |aliases: &[&str]| headers.iter().position(|h| aliases.contains(&h.as_str()));
        Self {
            commodity: find(COMMODITY_HEADERS),
            market: find(MARKET_HEADERS),
            date: find(DATE_HEADERS),
            min: find(MIN_HEADERS),
            max: find(MAX_HEADERS),
            modal: find(MODAL_HEADERS),
            arrivals: find(ARRIVAL_HEADERS),
        }
    }

    fn is_record_table(&self) -> bool {
        self.commodity.is_some()
            && self.date.is_some()
            && self.min.is_some()
            && self.max.is_some()
            && self.modal.is_some()
    }
}

pub struct CsvAdapter {
    base_path: PathBuf,
    cache: RwLock<HashMap<String, Dataset>>,
}

impl CsvAdapter {
    pub fn new(base_path: PathBuf) -> Self {
        Self {
            base_path,
            cache: RwLock::new(HashMap::new()),
        }
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    fn csv_path(&self, region: &str) -> PathBuf {
        self.base_path.join(format!("{}.csv", region))
    }

    /// Region identifiers are file stems; anything that could escape the
    /// dataset directory is treated as unknown.
    fn is_safe_region(region: &str) -> bool {
        !region.is_empty()
            && !region.contains(['/', '\\'])
            && !region.contains("..")
    }

    fn cached(&self, region: &str) -> Option<Dataset> {
        match self.cache.read() {
            Ok(cache) => cache.get(region).cloned(),
            Err(poisoned) => poisoned.into_inner().get(region).cloned(),
        }
    }

    fn dataset(&self, region: &str) -> Result<Dataset, MandiError> {
        if let Some(dataset) = self.cached(region) {
            return Ok(dataset);
        }

        let path = self.csv_path(region);
        if !Self::is_safe_region(region) || !path.is_file() {
            tracing::debug!(region, "no dataset for region");
            return Ok(Arc::new(Vec::new()));
        }

        let content = fs::read(&path).map_err(|e| {
            MandiError::dataset(format!("failed to read {}: {}", path.display(), e))
        })?;
        let records = parse_dataset(region, &content);
        tracing::info!(region, records = records.len(), "loaded dataset");

        let dataset = Arc::new(records);
        let mut cache = match self.cache.write() {
            Ok(cache) => cache,
            Err(poisoned) => poisoned.into_inner(),
        };
        Ok(Arc::clone(
            cache.entry(region.to_string()).or_insert(dataset),
        ))
    }
}

impl MarketDataPort for CsvAdapter {
    fn fetch_records(
        &self,
        region: &str,
        commodity: &str,
    ) -> Result<Vec<MarketRecord>, MandiError> {
        let dataset = self.dataset(region)?;
        let mut records: Vec<MarketRecord> = dataset
            .iter()
            .filter(|r| r.matches_commodity(commodity))
            .cloned()
            .collect();
        records.sort_by_key(|r| r.date);
        Ok(records)
    }

    fn list_regions(&self) -> Result<Vec<String>, MandiError> {
        let entries = fs::read_dir(&self.base_path).map_err(|e| {
            MandiError::dataset(format!(
                "failed to read directory {}: {}",
                self.base_path.display(),
                e
            ))
        })?;

        let mut regions = Vec::new();
        for entry in entries {
            let entry = entry
                .map_err(|e| MandiError::dataset(format!("directory entry error: {}", e)))?;
            let path = entry.path();
            let is_csv = path
                .extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));
            if !is_csv {
                continue;
            }
            if let Some(stem) = path.file_stem() {
                regions.push(stem.to_string_lossy().into_owned());
            }
        }

        regions.sort();
        Ok(regions)
    }

    fn list_commodities(&self, region: &str) -> Result<Vec<String>, MandiError> {
        let path = self.csv_path(region);
        if !Self::is_safe_region(region) || !path.is_file() {
            return Ok(Vec::new());
        }

        let mut rdr = csv::ReaderBuilder::new()
            .flexible(true)
            .from_path(&path)
            .map_err(|e| MandiError::dataset(format!("failed to open {}: {}", path.display(), e)))?;
        let headers = read_headers(&mut rdr);
        let columns = ColumnMap::from_headers(&headers);

        let mut commodities = BTreeSet::new();
        let mut seen = HashSet::new();
        let mut insert = |name: &str| {
            if seen.insert(name.to_lowercase()) {
                commodities.insert(name.to_string());
            }
        };
        match columns.commodity {
            Some(_) => {
                drop(rdr);
                for record in self.dataset(region)?.iter() {
                    insert(record.commodity.trim());
                }
            }
            None => {
                // Wide layout: one price column per commodity.
                let raw_headers = rdr
                    .headers()
                    .map(|h| h.iter().map(|s| s.trim().to_string()).collect::<Vec<_>>())
                    .unwrap_or_default();
                for (raw, normalized) in raw_headers.iter().zip(&headers) {
                    if !is_reserved_header(normalized) && !raw.is_empty() {
                        insert(raw.as_str());
                    }
                }
            }
        }

        Ok(commodities.into_iter().collect())
    }
}

fn is_reserved_header(header: &str) -> bool {
    [
        COMMODITY_HEADERS,
        MARKET_HEADERS,
        DATE_HEADERS,
        MIN_HEADERS,
        MAX_HEADERS,
        MODAL_HEADERS,
        ARRIVAL_HEADERS,
        RESERVED_HEADERS,
    ]
    .iter()
    .any(|aliases| aliases.contains(&header))
}

pub fn normalize_header(header: &str) -> String {
    let mut out = String::with_capacity(header.len());
    for c in header.trim().chars() {
        if c.is_ascii_alphanumeric() {
            out.push(c.to_ascii_lowercase());
        } else if !out.ends_with('_') {
            out.push('_');
        }
    }
    out.trim_matches('_').to_string()
}

fn read_headers<R: std::io::Read>(rdr: &mut csv::Reader<R>) -> Vec<String> {
    rdr.headers()
        .map(|h| h.iter().map(normalize_header).collect())
        .unwrap_or_default()
}

pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(value, fmt).ok())
}

/// Accepts thousands separators and surrounding whitespace.
pub fn parse_number(value: &str) -> Option<f64> {
    let cleaned: String = value.trim().chars().filter(|c| *c != ',').collect();
    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Parse a whole dataset. Rows that fail to parse, are not valid UTF-8, or
/// violate min <= modal <= max are logged and dropped.
pub fn parse_dataset(region: &str, content: impl AsRef<[u8]>) -> Vec<MarketRecord> {
    let mut rdr = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(content.as_ref());
    let headers = read_headers(&mut rdr);
    let columns = ColumnMap::from_headers(&headers);

    if !columns.is_record_table() {
        tracing::warn!(region, "dataset is missing required price columns");
        return Vec::new();
    }

    let mut records = Vec::new();
    let mut skipped = 0usize;

    for (index, result) in rdr.records().enumerate() {
        let row = index + 2;
        let record = match result {
            Ok(r) => r,
            Err(e) => {
                tracing::debug!(region, row, error = %e, "skipping unreadable row");
                skipped += 1;
                continue;
            }
        };

        match parse_row(region, &record, &columns) {
            Some(rec) if rec.is_consistent() => records.push(rec),
            Some(_) => {
                tracing::debug!(region, row, "skipping row with inconsistent prices");
                skipped += 1;
            }
            None => {
                tracing::debug!(region, row, "skipping malformed row");
                skipped += 1;
            }
        }
    }

    if skipped > 0 {
        tracing::warn!(region, skipped, kept = records.len(), "dropped malformed rows");
    }
    records
}

fn parse_row(region: &str, row: &csv::StringRecord, columns: &ColumnMap) -> Option<MarketRecord> {
    let field = |idx: Option<usize>| idx.and_then(|i| row.get(i)).map(str::trim);

    let commodity = field(columns.commodity).filter(|c| !c.is_empty())?;
    let date = parse_date(field(columns.date)?)?;
    let min_price = parse_number(field(columns.min)?)?;
    let max_price = parse_number(field(columns.max)?)?;
    let modal_price = parse_number(field(columns.modal)?)?;
    let arrivals = field(columns.arrivals).and_then(parse_number);
    let market = field(columns.market).unwrap_or_default();

    Some(MarketRecord {
        region: region.to_string(),
        commodity: commodity.to_string(),
        market: market.to_string(),
        date,
        min_price,
        max_price,
        modal_price,
        arrivals,
    })
}
