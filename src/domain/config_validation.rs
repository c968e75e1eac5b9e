//! Configuration validation.
//!
//! Validates every config field before settings are built.

use crate::domain::error::MandiError;
use crate::domain::pagination::{DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE, MIN_PAGE_SIZE};
use crate::domain::series::{MAX_DAYS, MIN_DAYS};
use crate::domain::settings::DEFAULT_DAYS;
use crate::domain::signal_config::SignalConfig;
use crate::ports::config_port::ConfigPort;

const FLOAT_KEYS: &[(&str, &str)] = &[
    ("signals", "momentum_threshold"),
    ("signals", "volatility_low"),
    ("signals", "volatility_high"),
];
const INT_KEYS: &[(&str, &str)] = &[("defaults", "days"), ("defaults", "page_size")];
const BOOL_KEYS: &[(&str, &str)] = &[("data", "preload")];

pub fn validate_config(config: &dyn ConfigPort) -> Result<(), MandiError> {
    validate_value_types(config)?;
    validate_signal_config(config)?;
    validate_defaults(config)?;
    validate_listen(config)?;
    Ok(())
}

pub fn validate_signal_config(config: &dyn ConfigPort) -> Result<(), MandiError> {
    let defaults = SignalConfig::default();
    let momentum = config.get_double("signals", "momentum_threshold", defaults.momentum_threshold);
    let low = config.get_double("signals", "volatility_low", defaults.volatility_low);
    let high = config.get_double("signals", "volatility_high", defaults.volatility_high);

    validate_fraction("momentum_threshold", momentum)?;
    validate_fraction("volatility_low", low)?;
    validate_positive("volatility_high", high)?;

    if low >= high {
        return Err(MandiError::ConfigInvalid {
            section: "signals".to_string(),
            key: "volatility_low".to_string(),
            reason: "volatility_low must be below volatility_high".to_string(),
        });
    }
    Ok(())
}

/// Every numeric or boolean key that is present must parse as its type.
pub fn validate_value_types(config: &dyn ConfigPort) -> Result<(), MandiError> {
    let invalid = |section: &str, key: &str, value: &str, kind: &str| MandiError::ConfigInvalid {
        section: section.to_string(),
        key: key.to_string(),
        reason: format!("'{}' is not {}", value, kind),
    };

    for &(section, key) in FLOAT_KEYS {
        if let Some(value) = config.get_string(section, key) {
            if !value.parse::<f64>().is_ok_and(f64::is_finite) {
                return Err(invalid(section, key, &value, "a finite number"));
            }
        }
    }
    for &(section, key) in INT_KEYS {
        if let Some(value) = config.get_string(section, key) {
            if value.parse::<i64>().is_err() {
                return Err(invalid(section, key, &value, "an integer"));
            }
        }
    }
    for &(section, key) in BOOL_KEYS {
        if let Some(value) = config.get_string(section, key) {
            let known = ["true", "false", "yes", "no", "on", "off", "1", "0"];
            if !known.contains(&value.to_ascii_lowercase().as_str()) {
                return Err(invalid(section, key, &value, "a boolean"));
            }
        }
    }
    Ok(())
}

fn validate_positive(key: &str, value: f64) -> Result<(), MandiError> {
    if !value.is_finite() || value <= 0.0 {
        return Err(MandiError::ConfigInvalid {
            section: "signals".to_string(),
            key: key.to_string(),
            reason: format!("{} must be a positive number", key),
        });
    }
    Ok(())
}

fn validate_fraction(key: &str, value: f64) -> Result<(), MandiError> {
    validate_positive(key, value)?;
    if value >= 1.0 {
        return Err(MandiError::ConfigInvalid {
            section: "signals".to_string(),
            key: key.to_string(),
            reason: format!("{} must be a fraction below 1 (e.g. 0.03 for 3%)", key),
        });
    }
    Ok(())
}

fn validate_defaults(config: &dyn ConfigPort) -> Result<(), MandiError> {
    let days = config.get_int("defaults", "days", DEFAULT_DAYS as i64);
    if days < MIN_DAYS as i64 || days > MAX_DAYS as i64 {
        return Err(MandiError::ConfigInvalid {
            section: "defaults".to_string(),
            key: "days".to_string(),
            reason: format!("days must be between {} and {}", MIN_DAYS, MAX_DAYS),
        });
    }

    let page_size = config.get_int("defaults", "page_size", DEFAULT_PAGE_SIZE as i64);
    if page_size < MIN_PAGE_SIZE as i64 || page_size > MAX_PAGE_SIZE as i64 {
        return Err(MandiError::ConfigInvalid {
            section: "defaults".to_string(),
            key: "page_size".to_string(),
            reason: format!(
                "page_size must be between {} and {}",
                MIN_PAGE_SIZE, MAX_PAGE_SIZE
            ),
        });
    }

    for key in ["region", "commodity"] {
        if let Some(value) = config.get_string("defaults", key) {
            if value.trim().is_empty() {
                return Err(MandiError::ConfigInvalid {
                    section: "defaults".to_string(),
                    key: key.to_string(),
                    reason: format!("{} must not be blank", key),
                });
            }
        }
    }
    Ok(())
}

fn validate_listen(config: &dyn ConfigPort) -> Result<(), MandiError> {
    match config.get_string("web", "listen") {
        Some(addr) if addr.parse::<std::net::SocketAddr>().is_err() => {
            Err(MandiError::ConfigInvalid {
                section: "web".to_string(),
                key: "listen".to_string(),
                reason: format!("'{}' is not a socket address", addr),
            })
        }
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::file_config_adapter::FileConfigAdapter;

    fn config(content: &str) -> FileConfigAdapter {
        FileConfigAdapter::from_string(content).unwrap()
    }

    #[test]
    fn empty_config_uses_valid_defaults() {
        assert!(validate_config(&config("")).is_ok());
    }

    #[test]
    fn full_valid_config() {
        let c = config(
            "[signals]\nmomentum_threshold = 0.05\nvolatility_low = 0.04\nvolatility_high = 0.2\n\
             [defaults]\nregion = Kerala_Thrissur\ndays = 30\npage_size = 200\n\
             [web]\nlisten = 0.0.0.0:8080\n",
        );
        assert!(validate_config(&c).is_ok());
    }

    #[test]
    fn momentum_threshold_must_be_positive() {
        let c = config("[signals]\nmomentum_threshold = 0\n");
        let err = validate_config(&c).unwrap_err();
        assert!(matches!(err, MandiError::ConfigInvalid { ref key, .. } if key == "momentum_threshold"));
    }

    #[test]
    fn momentum_threshold_given_as_percent_is_rejected() {
        let c = config("[signals]\nmomentum_threshold = 3\n");
        assert!(validate_config(&c).is_err());
    }

    #[test]
    fn volatility_bounds_must_be_ordered() {
        let c = config("[signals]\nvolatility_low = 0.2\nvolatility_high = 0.1\n");
        let err = validate_config(&c).unwrap_err();
        assert!(matches!(err, MandiError::ConfigInvalid { ref key, .. } if key == "volatility_low"));
    }

    #[test]
    fn days_out_of_range() {
        assert!(validate_config(&config("[defaults]\ndays = 0\n")).is_err());
        assert!(validate_config(&config("[defaults]\ndays = 31\n")).is_err());
    }

    #[test]
    fn page_size_out_of_range() {
        assert!(validate_config(&config("[defaults]\npage_size = 5\n")).is_err());
        assert!(validate_config(&config("[defaults]\npage_size = 500\n")).is_err());
    }

    #[test]
    fn non_numeric_values_are_rejected() {
        let err = validate_config(&config("[defaults]\ndays = lots\n")).unwrap_err();
        assert!(matches!(err, MandiError::ConfigInvalid { ref key, .. } if key == "days"));

        let err = validate_config(&config("[signals]\nmomentum_threshold = abc\n")).unwrap_err();
        assert!(matches!(err, MandiError::ConfigInvalid { ref key, .. } if key == "momentum_threshold"));

        let err = validate_config(&config("[data]\npreload = maybe\n")).unwrap_err();
        assert!(matches!(err, MandiError::ConfigInvalid { ref key, .. } if key == "preload"));
    }

    #[test]
    fn bad_listen_address() {
        let err = validate_config(&config("[web]\nlisten = localhost\n")).unwrap_err();
        assert!(matches!(err, MandiError::ConfigInvalid { ref section, .. } if section == "web"));
    }
}
