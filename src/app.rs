// src/app.rs
use anyhow::{Context, Result};
use solana_sdk::signature::Signer;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

use crate::application::{Scheduler, TradeOrchestrator, TradeSettings};
use crate::config::Config;
use crate::domain::execution::{RetryPolicy, SubmissionEngine};
use crate::domain::trading::TradingContext;
use crate::infrastructure::blockchain::{wallet, ChainGateway, SolanaRpcClient, TokenRegistry};
use crate::infrastructure::feed::HttpListingFeed;
use crate::infrastructure::jupiter::JupiterClient;
use crate::infrastructure::persistence::TradeLedger;
use crate::shared::errors::ConfigError;

/// Validated runtime settings
#[derive(Debug, Clone)]
pub struct AppCfg {
    pub rpc_url: String,
    pub confirm_timeout: Duration,
    pub confirm_poll_interval: Duration,
    pub jupiter_url: String,
    pub token_list_url: String,
    pub http_timeout: Duration,
    pub feed_url: String,
    pub feed_timeout: Duration,
    pub polling_interval: Duration,
    pub balance_interval: Duration,
    pub monitor_interval: Duration,
    pub ledger_path: PathBuf,
    pub retry_policy: RetryPolicy,
    pub trade: TradeSettings,
}

impl AppCfg {
    pub fn from_config(cfg: Config) -> Result<Self, ConfigError> {
        cfg.validate()?;

        Ok(Self {
            retry_policy: cfg.retry_policy(),
            trade: cfg.trade_settings(),
            confirm_timeout: Duration::from_millis(cfg.rpc.confirm_timeout_ms),
            confirm_poll_interval: Duration::from_millis(cfg.rpc.confirm_poll_interval_ms),
            rpc_url: cfg.rpc.url,
            jupiter_url: cfg.jupiter.api_url,
            token_list_url: cfg.jupiter.token_list_url,
            http_timeout: Duration::from_millis(cfg.jupiter.timeout_ms),
            feed_url: cfg.feed.url,
            feed_timeout: Duration::from_millis(cfg.feed.timeout_ms),
            polling_interval: Duration::from_millis(cfg.feed.polling_interval_ms),
            balance_interval: Duration::from_millis(cfg.trade.balance_interval_ms),
            monitor_interval: Duration::from_millis(cfg.trade.monitor_interval_ms),
            ledger_path: cfg.ledger.path,
        })
    }
}

pub async fn run(app_cfg: AppCfg) -> Result<()> {
    info!("📣 Starting Solana Trading Bot");
    info!("📣 Strategy: {}", app_cfg.trade.sell_policy.describe());

    let keypair = Arc::new(wallet::keypair_from_env().context("Failed to load wallet")?);
    let wallet = keypair.pubkey();
    info!("📣 Bot started with wallet: {}", wallet);

    let context = Arc::new(TradingContext::load(TradeLedger::new(&app_cfg.ledger_path)));

    let registry = TokenRegistry::load(&app_cfg.token_list_url, app_cfg.http_timeout)
        .await
        .context("Failed to initialize token list")?;

    let gateway: Arc<dyn ChainGateway> = Arc::new(SolanaRpcClient::new(
        app_cfg.rpc_url.clone(),
        app_cfg.confirm_timeout,
        app_cfg.confirm_poll_interval,
    ));
    let aggregator = Arc::new(JupiterClient::new(app_cfg.jupiter_url.clone(), app_cfg.http_timeout)?);
    let feed = Arc::new(HttpListingFeed::new(app_cfg.feed_url.clone(), app_cfg.feed_timeout)?);
    let engine = SubmissionEngine::new(gateway.clone(), keypair, app_cfg.retry_policy.clone());

    let trader = Arc::new(TradeOrchestrator::new(
        gateway,
        aggregator,
        feed,
        Arc::new(registry),
        engine,
        context,
        wallet,
        app_cfg.trade.clone(),
    ));

    trader.refresh_wallet_balance().await;

    // Positions left open by a previous session
    trader.sweep_active_trades().await;

    let mut scheduler = Scheduler::new();
    info!(
        "📣 Monitoring for new pairs every {} seconds...",
        app_cfg.polling_interval.as_secs_f64()
    );

    let listing_trader = trader.clone();
    scheduler.spawn_interval("listing poll", app_cfg.polling_interval, move || {
        let trader = listing_trader.clone();
        async move { trader.check_for_new_listings().await }
    });

    let balance_trader = trader.clone();
    scheduler.spawn_interval("balance refresh", app_cfg.balance_interval, move || {
        let trader = balance_trader.clone();
        async move {
            trader.refresh_wallet_balance().await;
        }
    });

    let monitor_trader = trader.clone();
    scheduler.spawn_interval("active trade sweep", app_cfg.monitor_interval, move || {
        let trader = monitor_trader.clone();
        async move { trader.sweep_active_trades().await }
    });

    tokio::signal::ctrl_c()
        .await
        .context("Failed to listen for shutdown signal")?;

    info!("📣 Shutting down");
    scheduler.shutdown().await;
    Ok(())
}
