use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing::error;

use listing_trader::app::{self, AppCfg};
use listing_trader::config::Config;
use listing_trader::domain::trading::SellPolicyKind;
use listing_trader::shared::logging::init_tracing;

#[derive(Parser, Debug)]
#[command(version, about = "Solana new-listing trading bot: buys fresh tokens through Jupiter and sells them back")]
struct Args {
    /// Path to config file (optional)
    #[arg(long)]
    config: Option<String>,

    /// RPC endpoint URL (overrides config)
    #[arg(long)]
    rpc_url: Option<String>,

    /// SOL spent on each buy
    #[arg(long)]
    trade_amount_sol: Option<f64>,

    /// Slippage tolerance in basis points
    #[arg(long)]
    slippage_bps: Option<u16>,

    /// When to sell: immediate or profit_target
    #[arg(long)]
    sell_policy: Option<SellPolicyKind>,

    /// Trade ledger file
    #[arg(long)]
    ledger_path: Option<PathBuf>,

    /// Verbose logging
    #[arg(long)]
    debug: bool,
}

impl Args {
    /// CLI args > config file > defaults
    fn into_config(self) -> Result<Config> {
        let mut cfg = match &self.config {
            Some(path) => Config::from_file(path).with_context(|| format!("Failed to load config from {}", path))?,
            None => Config::default(),
        };

        if let Some(rpc_url) = self.rpc_url {
            cfg.rpc.url = rpc_url;
        }
        if let Some(amount) = self.trade_amount_sol {
            cfg.trade.trade_amount_sol = amount;
        }
        if let Some(slippage_bps) = self.slippage_bps {
            cfg.trade.slippage_bps = slippage_bps;
        }
        if let Some(sell_policy) = self.sell_policy {
            cfg.trade.sell_policy = sell_policy;
        }
        if let Some(ledger_path) = self.ledger_path {
            cfg.ledger.path = ledger_path;
        }
        if self.debug {
            cfg.logging.debug = true;
        }
        Ok(cfg)
    }
}

async fn start(cfg: Config) -> Result<()> {
    let app_cfg = AppCfg::from_config(cfg)?;
    app::run(app_cfg).await
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cfg = match Args::parse().into_config() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("{:#}", e);
            std::process::exit(1);
        }
    };
    init_tracing(cfg.logging.debug);

    if let Err(e) = start(cfg).await {
        error!("Fatal error starting bot: {:#}", e);
        std::process::exit(1);
    }
}
