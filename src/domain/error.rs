//! Domain error types.
//!
//! Only dataset access, configuration and request validation can fail.
//! Everything downstream of a successful dataset read is total.

/// Top-level error type for mandisignal.
#[derive(Debug, thiserror::Error)]
pub enum MandiError {
    #[error("dataset access error: {reason}")]
    DatasetAccess { reason: String },

    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("invalid request: {reason}")]
    InvalidRequest { reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl MandiError {
    pub fn dataset(reason: impl Into<String>) -> Self {
        MandiError::DatasetAccess {
            reason: reason.into(),
        }
    }

    pub fn invalid_request(reason: impl Into<String>) -> Self {
        MandiError::InvalidRequest {
            reason: reason.into(),
        }
    }
}

impl From<&MandiError> for std::process::ExitCode {
    fn from(err: &MandiError) -> Self {
        let code: u8 = match err {
            MandiError::Io(_) => 1,
            MandiError::ConfigParse { .. }
            | MandiError::ConfigInvalid { .. } => 2,
            MandiError::DatasetAccess { .. } => 3,
            MandiError::InvalidRequest { .. } => 4,
        };
        std::process::ExitCode::from(code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_context() {
        let err = MandiError::ConfigInvalid {
            section: "signals".into(),
            key: "volatility_low".into(),
            reason: "must be positive".into(),
        };
        assert_eq!(
            err.to_string(),
            "invalid config value [signals] volatility_low: must be positive"
        );
    }

    #[test]
    fn helper_constructors() {
        let dataset = MandiError::dataset("catalog unreadable");
        assert!(matches!(dataset, MandiError::DatasetAccess { ref reason } if reason == "catalog unreadable"));

        let request = MandiError::invalid_request("days out of range");
        assert_eq!(request.to_string(), "invalid request: days out of range");
    }
}
