//! Resolved runtime settings.

use std::path::PathBuf;

use crate::domain::pagination::DEFAULT_PAGE_SIZE;
use crate::domain::signal_config::SignalConfig;

pub const DEFAULT_REGION: &str = "Kerala_Kottayam";
pub const DEFAULT_COMMODITY: &str = "Banana";
pub const DEFAULT_DAYS: usize = 14;
pub const DEFAULT_LISTEN: &str = "127.0.0.1:8000";

/// Query defaults applied when a caller leaves a parameter out.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestDefaults {
    pub region: String,
    pub commodity: String,
    pub days: usize,
    pub page_size: usize,
}

impl Default for RequestDefaults {
    fn default() -> Self {
        Self {
            region: DEFAULT_REGION.to_string(),
            commodity: DEFAULT_COMMODITY.to_string(),
            days: DEFAULT_DAYS,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub data_dir: PathBuf,
    /// Parse every dataset before serving.
    pub preload: bool,
    pub signals: SignalConfig,
    pub defaults: RequestDefaults,
    pub listen: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            preload: false,
            signals: SignalConfig::default(),
            defaults: RequestDefaults::default(),
            listen: DEFAULT_LISTEN.to_string(),
        }
    }
}
