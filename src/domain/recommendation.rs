//! Trade recommendation decision table.
//!
//! | trend   | buyer  | momentum        | action | base |
//! |---------|--------|-----------------|--------|------|
//! | rising  | Strong | bullish         | SELL   | 85   |
//! | rising  | Stable | bullish/neutral | HOLD   | 65   |
//! | falling | Weak   | bearish         | BUY    | 80   |
//! | falling | any    | neutral         | HOLD   | 60   |
//! | stable  | any    | any             | HOLD   | 70   |
//! | anything else                      | HOLD   | 55   |
//!
//! The base is raised by 10 when momentum agrees with the trend direction,
//! lowered by 10 when it conflicts, then clamped to 0..=100.

use serde::Serialize;
use std::fmt;

use crate::domain::enrichment::{BuyerSignal, Trend};
use crate::domain::momentum::Momentum;

pub const MOMENTUM_ADJUSTMENT: i32 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Action {
    Buy,
    Sell,
    Hold,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Action::Buy => "BUY",
            Action::Sell => "SELL",
            Action::Hold => "HOLD",
        };
        f.write_str(s)
    }
}

/// Which row of the decision table produced a recommendation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DecisionRule {
    StrongRally,
    SteadyRise,
    DemandCollapse,
    SofteningPrices,
    FlatMarket,
    Unmatched,
}

impl DecisionRule {
    pub fn select(trend: Trend, buyer: BuyerSignal, momentum: Momentum) -> Self {
        use BuyerSignal as B;
        use Momentum as M;

        match (trend, buyer, momentum) {
            (Trend::Rising, B::Strong, M::Bullish) => DecisionRule::StrongRally,
            (Trend::Rising, B::Stable, M::Bullish | M::Neutral) => DecisionRule::SteadyRise,
            (Trend::Falling, B::Weak, M::Bearish) => DecisionRule::DemandCollapse,
            (Trend::Falling, _, M::Neutral) => DecisionRule::SofteningPrices,
            (Trend::Stable, _, _) => DecisionRule::FlatMarket,
            _ => DecisionRule::Unmatched,
        }
    }

    pub fn action(self) -> Action {
        match self {
            DecisionRule::StrongRally => Action::Sell,
            DecisionRule::DemandCollapse => Action::Buy,
            DecisionRule::SteadyRise
            | DecisionRule::SofteningPrices
            | DecisionRule::FlatMarket
            | DecisionRule::Unmatched => Action::Hold,
        }
    }

    pub fn base_confidence(self) -> i32 {
        match self {
            DecisionRule::StrongRally => 85,
            DecisionRule::SteadyRise => 65,
            DecisionRule::DemandCollapse => 80,
            DecisionRule::SofteningPrices => 60,
            DecisionRule::FlatMarket => 70,
            DecisionRule::Unmatched => 55,
        }
    }

    fn reason(self, trend: Trend, buyer: BuyerSignal, momentum: Momentum) -> String {
        match self {
            DecisionRule::StrongRally => {
                "Rising prices with strong demand and bullish momentum. Consider selling now."
                    .to_string()
            }
            DecisionRule::SteadyRise => format!(
                "Prices are rising with stable demand and {} momentum. Hold for further gains.",
                momentum
            ),
            DecisionRule::DemandCollapse => {
                "Falling prices with weak demand and bearish momentum. Good time to buy stock."
                    .to_string()
            }
            DecisionRule::SofteningPrices => format!(
                "Prices are easing with {} demand but momentum is neutral. Hold and watch.",
                buyer.to_string().to_lowercase()
            ),
            DecisionRule::FlatMarket => format!(
                "Prices are stable with {} demand. Hold until a clear trend forms.",
                buyer.to_string().to_lowercase()
            ),
            DecisionRule::Unmatched => format!(
                "Mixed signals ({} prices, {} demand, {} momentum). Hold.",
                trend,
                buyer.to_string().to_lowercase(),
                momentum
            ),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Recommendation {
    pub action: Action,
    /// Percentage in 0..=100.
    pub confidence: u8,
    pub reason: String,
    pub rule: DecisionRule,
}

/// +10 when momentum points the same way as the trend, -10 when opposite.
pub fn momentum_adjustment(trend: Trend, momentum: Momentum) -> i32 {
    match (trend, momentum) {
        (Trend::Rising, Momentum::Bullish) | (Trend::Falling, Momentum::Bearish) => {
            MOMENTUM_ADJUSTMENT
        }
        (Trend::Rising, Momentum::Bearish) | (Trend::Falling, Momentum::Bullish) => {
            -MOMENTUM_ADJUSTMENT
        }
        _ => 0,
    }
}

pub fn compute_trade_recommendation(
    trend: Trend,
    buyer_signal: BuyerSignal,
    momentum: Momentum,
) -> Recommendation {
    let rule = DecisionRule::select(trend, buyer_signal, momentum);
    let score = rule.base_confidence() + momentum_adjustment(trend, momentum);

    Recommendation {
        action: rule.action(),
        confidence: score.clamp(0, 100) as u8,
        reason: rule.reason(trend, buyer_signal, momentum),
        rule,
    }
}
