//! Filter discovery: state -> district topology and known commodities.

use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

use crate::domain::error::MandiError;
use crate::ports::data_port::MarketDataPort;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DatasetId {
    pub state: String,
    pub district: Option<String>,
}

/// `Kerala_Kottayam` -> (Kerala, Kottayam). Text before the first `_` is
/// the state; underscores in the remainder become spaces.
pub fn parse_dataset_id(id: &str) -> Option<DatasetId> {
    let id = id.trim();
    if id.is_empty() {
        return None;
    }
    match id.split_once('_') {
        Some((state, district)) => {
            let state = state.trim();
            if state.is_empty() {
                return None;
            }
            let district = district.replace('_', " ").trim().to_string();
            Some(DatasetId {
                state: state.to_string(),
                district: (!district.is_empty()).then_some(district),
            })
        }
        None => Some(DatasetId {
            state: id.to_string(),
            district: None,
        }),
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FilterCatalog {
    pub states: BTreeMap<String, BTreeSet<String>>,
    pub commodities: BTreeSet<String>,
}

impl FilterCatalog {
    pub fn is_empty(&self) -> bool {
        self.states.is_empty() && self.commodities.is_empty()
    }

    pub fn districts(&self, state: &str) -> Option<&BTreeSet<String>> {
        self.states.get(state)
    }
}

/// Scan the dataset catalog. An empty catalog gives an empty result; a
/// dataset whose commodities cannot be read is logged and skipped.
/// Commodity names differing only in case are listed once.
pub fn get_available_filters(port: &dyn MarketDataPort) -> Result<FilterCatalog, MandiError> {
    let mut catalog = FilterCatalog::default();

    for region in port.list_regions()? {
        let Some(id) = parse_dataset_id(&region) else {
            tracing::warn!(region = %region, "unparseable dataset identifier");
            continue;
        };

        let districts = catalog.states.entry(id.state).or_default();
        if let Some(district) = id.district {
            districts.insert(district);
        }

        match port.list_commodities(&region) {
            Ok(commodities) => {
                for name in commodities.iter().map(|c| c.trim()).filter(|c| !c.is_empty()) {
                    let known = catalog
                        .commodities
                        .iter()
                        .any(|c| c.eq_ignore_ascii_case(name));
                    if !known {
                        catalog.commodities.insert(name.to_string());
                    }
                }
            }
            Err(e) => tracing::warn!(region = %region, error = %e, "skipping commodity scan"),
        }
    }

    tracing::debug!(
        states = catalog.states.len(),
        commodities = catalog.commodities.len(),
        "filter discovery complete"
    );
    Ok(catalog)
}
