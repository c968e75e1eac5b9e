//! Tunable thresholds for momentum and risk classification.

/// Fractional thresholds. `momentum_threshold = 0.03` means a 3% move.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SignalConfig {
    /// |delta| at or beyond this is bullish/bearish.
    pub momentum_threshold: f64,
    /// Coefficient of variation below this is Low risk.
    pub volatility_low: f64,
    /// Coefficient of variation at or above this is High risk.
    pub volatility_high: f64,
}

impl Default for SignalConfig {
    fn default() -> Self {
        Self {
            momentum_threshold: 0.03,
            volatility_low: 0.05,
            volatility_high: 0.15,
        }
    }
}
