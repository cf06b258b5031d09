//! When to sell a bought position

use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Sell strategy
#[derive(Debug, Clone, PartialEq)]
pub enum SellPolicy {
    /// Sell right after the buy confirms, following a short settle delay
    Immediate { delay: Duration },
    /// Hold until the quoted price is `target` (fraction) above the buy price
    ProfitTarget { target: f64 },
}

impl Default for SellPolicy {
    fn default() -> Self {
        SellPolicy::Immediate {
            delay: Duration::from_millis(2000),
        }
    }
}

impl SellPolicy {
    /// Whether a position quoted at `profit` should be sold now
    pub fn should_sell(&self, profit: f64) -> bool {
        match self {
            SellPolicy::Immediate { .. } => true,
            SellPolicy::ProfitTarget { target } => profit >= *target,
        }
    }

    pub fn describe(&self) -> String {
        match self {
            SellPolicy::Immediate { .. } => "Buy new tokens and sell immediately".to_string(),
            SellPolicy::ProfitTarget { target } => {
                format!("Buy new tokens and sell at {:.0}% profit target", target * 100.0)
            }
        }
    }
}

/// Policy name as written in config files and on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SellPolicyKind {
    Immediate,
    ProfitTarget,
}

impl FromStr for SellPolicyKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "immediate" => Ok(SellPolicyKind::Immediate),
            "profit_target" | "profit-target" | "target" => Ok(SellPolicyKind::ProfitTarget),
            _ => Err(format!("Unknown sell policy: {}", s)),
        }
    }
}
