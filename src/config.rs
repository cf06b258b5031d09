use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::{fs, time::Duration};

use crate::application::TradeSettings;
use crate::domain::execution::RetryPolicy;
use crate::domain::trading::{SellPolicy, SellPolicyKind};
use crate::shared::errors::ConfigError;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RpcCfg {
    pub url: String,
    pub confirm_timeout_ms: u64,
    pub confirm_poll_interval_ms: u64,
}

impl Default for RpcCfg {
    fn default() -> Self {
        Self {
            url: "https://api.mainnet-beta.solana.com".to_string(),
            confirm_timeout_ms: 60_000,
            confirm_poll_interval_ms: 500,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct JupiterCfg {
    pub api_url: String,
    pub token_list_url: String,
    pub timeout_ms: u64,
}

impl Default for JupiterCfg {
    fn default() -> Self {
        Self {
            api_url: "https://quote-api.jup.ag/v6".to_string(),
            token_list_url: "https://token.jup.ag/strict".to_string(),
            timeout_ms: 30_000,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FeedCfg {
    pub url: String,
    pub polling_interval_ms: u64,
    pub timeout_ms: u64,
}

impl Default for FeedCfg {
    fn default() -> Self {
        Self {
            url: "https://4db5-14-139-162-2.ngrok-free.app/".to_string(),
            polling_interval_ms: 10_000,
            timeout_ms: 10_000,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TradeCfg {
    pub trade_amount_sol: f64,
    pub min_wallet_balance_sol: f64,
    pub slippage_bps: u16,
    pub sol_mint: String,
    pub sell_policy: SellPolicyKind,
    pub sell_delay_ms: u64,
    pub profit_target: f64,
    pub monitor_interval_ms: u64,
    pub settle_delay_ms: u64,
    pub balance_interval_ms: u64,
}

impl Default for TradeCfg {
    fn default() -> Self {
        Self {
            trade_amount_sol: 0.01,
            min_wallet_balance_sol: 0.02,
            slippage_bps: 100,
            sol_mint: spl_token::native_mint::ID.to_string(),
            sell_policy: SellPolicyKind::Immediate,
            sell_delay_ms: 2_000,
            profit_target: 0.2,
            monitor_interval_ms: 15_000,
            settle_delay_ms: 1_000,
            balance_interval_ms: 60_000,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ExecutionCfg {
    pub max_attempts: u32,
    pub base_backoff_ms: u64,
    /// Retry causes classified as permanent too
    pub retry_permanent: bool,
}

impl Default for ExecutionCfg {
    fn default() -> Self {
        let policy = RetryPolicy::default();
        Self {
            max_attempts: policy.max_attempts,
            base_backoff_ms: policy.base_backoff.as_millis() as u64,
            retry_permanent: policy.retry_permanent,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LedgerCfg {
    pub path: PathBuf,
}

impl Default for LedgerCfg {
    fn default() -> Self {
        Self {
            path: PathBuf::from("./trading_log.json"),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LoggingCfg {
    pub debug: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub rpc: RpcCfg,
    pub jupiter: JupiterCfg,
    pub feed: FeedCfg,
    pub trade: TradeCfg,
    pub execution: ExecutionCfg,
    pub ledger: LedgerCfg,
    pub logging: LoggingCfg,
}

impl Config {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let s = fs::read_to_string(path.as_ref())?;
        let cfg: Self = toml::from_str(&s)?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.trade.trade_amount_sol > 0.0) {
            return Err(invalid("trade.trade_amount_sol must be positive"));
        }
        if self.trade.min_wallet_balance_sol < 0.0 {
            return Err(invalid("trade.min_wallet_balance_sol must not be negative"));
        }
        if !(self.trade.profit_target > 0.0) {
            return Err(invalid("trade.profit_target must be positive"));
        }
        if self.execution.max_attempts == 0 {
            return Err(invalid("execution.max_attempts must be at least 1"));
        }

        let intervals = [
            ("feed.polling_interval_ms", self.feed.polling_interval_ms),
            ("trade.monitor_interval_ms", self.trade.monitor_interval_ms),
            ("trade.balance_interval_ms", self.trade.balance_interval_ms),
            ("rpc.confirm_timeout_ms", self.rpc.confirm_timeout_ms),
            ("rpc.confirm_poll_interval_ms", self.rpc.confirm_poll_interval_ms),
        ];
        for (name, value) in intervals {
            if value == 0 {
                return Err(invalid(&format!("{} must be positive", name)));
            }
        }
        Ok(())
    }

    pub fn sell_policy(&self) -> SellPolicy {
        match self.trade.sell_policy {
            SellPolicyKind::Immediate => SellPolicy::Immediate {
                delay: Duration::from_millis(self.trade.sell_delay_ms),
            },
            SellPolicyKind::ProfitTarget => SellPolicy::ProfitTarget {
                target: self.trade.profit_target,
            },
        }
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_attempts: self.execution.max_attempts,
            base_backoff: Duration::from_millis(self.execution.base_backoff_ms),
            retry_permanent: self.execution.retry_permanent,
        }
    }

    pub fn trade_settings(&self) -> TradeSettings {
        TradeSettings {
            trade_amount_sol: self.trade.trade_amount_sol,
            min_wallet_balance_sol: self.trade.min_wallet_balance_sol,
            slippage_bps: self.trade.slippage_bps,
            sol_mint: self.trade.sol_mint.clone(),
            sell_policy: self.sell_policy(),
            settle_delay: Duration::from_millis(self.trade.settle_delay_ms),
        }
    }
}

fn invalid(message: &str) -> ConfigError {
    ConfigError::Invalid(message.to_string())
}
