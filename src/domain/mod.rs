//! Core domain types and logic.

pub mod error;
pub mod market_record;
pub mod market_data;
pub mod series;
pub mod signal_config;
pub mod momentum;
pub mod enrichment;
pub mod recommendation;
pub mod summary;
pub mod filters;
pub mod pagination;
pub mod coords;
pub mod settings;
pub mod config_validation;
pub mod intelligence;
