//! Listing pipeline: detect, buy through Jupiter, sell per policy

use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use solana_sdk::pubkey::Pubkey;
use tracing::{debug, error, info, warn};

use crate::domain::execution::SubmissionEngine;
use crate::domain::trading::{
    buy_price, sell_price, BuyResult, SellPolicy, SellResult, TradeHistoryItem, TradeInfo, TradingContext,
};
use crate::infrastructure::blockchain::{ChainGateway, TokenRegistry};
use crate::infrastructure::feed::ListingFeed;
use crate::infrastructure::jupiter::{Quote, QuoteRequest, SwapAggregator, SwapMode};
use crate::shared::errors::TradeError;
use crate::shared::types::{Amount, PairInfo, DEFAULT_TOKEN_DECIMALS};
use crate::shared::utils::{format_amount, generate_id, now_millis, profit_fraction};

/// Trading knobs resolved from configuration
#[derive(Debug, Clone)]
pub struct TradeSettings {
    pub trade_amount_sol: f64,
    pub min_wallet_balance_sol: f64,
    pub slippage_bps: u16,
    /// Wrapped SOL mint, the quote currency of every swap
    pub sol_mint: String,
    pub sell_policy: SellPolicy,
    /// Wait between buy confirmation and the token balance read
    pub settle_delay: Duration,
}

impl Default for TradeSettings {
    fn default() -> Self {
        Self {
            trade_amount_sol: 0.01,
            min_wallet_balance_sol: 0.02,
            slippage_bps: 100,
            sol_mint: spl_token::native_mint::ID.to_string(),
            sell_policy: SellPolicy::default(),
            settle_delay: Duration::from_millis(1000),
        }
    }
}

/// Runs the buy/sell pipeline against injected collaborators
pub struct TradeOrchestrator {
    gateway: Arc<dyn ChainGateway>,
    aggregator: Arc<dyn SwapAggregator>,
    feed: Arc<dyn ListingFeed>,
    registry: Arc<TokenRegistry>,
    engine: SubmissionEngine,
    context: Arc<TradingContext>,
    wallet: Pubkey,
    settings: TradeSettings,
}

impl TradeOrchestrator {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        gateway: Arc<dyn ChainGateway>,
        aggregator: Arc<dyn SwapAggregator>,
        feed: Arc<dyn ListingFeed>,
        registry: Arc<TokenRegistry>,
        engine: SubmissionEngine,
        context: Arc<TradingContext>,
        wallet: Pubkey,
        settings: TradeSettings,
    ) -> Self {
        Self {
            gateway,
            aggregator,
            feed,
            registry,
            engine,
            context,
            wallet,
            settings,
        }
    }

    /// One polling tick. A tick that finds the pipeline busy does nothing.
    pub async fn check_for_new_listings(&self) {
        let Some(_guard) = self.context.try_begin_processing() else {
            debug!("Already processing a trade, skipping check");
            return;
        };

        let token_address = match self.feed.latest_listing().await {
            Ok(Some(address)) => address,
            Ok(None) => {
                debug!("Listing feed has nothing new");
                return;
            }
            Err(e) => {
                error!("Error checking for new pairs: {}", e);
                return;
            }
        };

        if self.context.has_traded(&token_address).await {
            debug!("Already traded token: {}, skipping", token_address);
            return;
        }
        info!("📣 New token detected: {}", token_address);

        let token = match self.registry.resolve(self.gateway.as_ref(), &token_address).await {
            Ok(Some(token)) => token,
            Ok(None) => {
                error!("Token details not found for address: {}", token_address);
                return;
            }
            Err(e) => {
                error!("Error fetching token info for {}: {}", token_address, e);
                return;
            }
        };

        debug!("Resolved {} as {} ({} decimals)", token.address, token.name, token.decimals);
        let pair = PairInfo::from_token(token);
        if let Err(e) = self.process_listing(&pair).await {
            error!("Error processing pair {}: {}", pair.label(), e);
        }
    }

    /// Buy `pair`, then sell it or queue it according to the sell policy
    pub async fn process_listing(&self, pair: &PairInfo) -> Result<(), TradeError> {
        info!("📣 Processing new token: {}", pair.label());

        self.refresh_wallet_balance().await;
        let balance = self.context.wallet_balance_sol();
        if balance < self.settings.min_wallet_balance_sol {
            info!("📣 Wallet balance too low ({:.4} SOL). Skipping trade.", balance);
            return Ok(());
        }

        debug!(
            "Getting quote for {} SOL -> {}",
            self.settings.trade_amount_sol,
            pair.label()
        );
        let request = self.quote_request(
            &self.settings.sol_mint,
            &pair.token_address,
            Amount::from_sol(self.settings.trade_amount_sol).value,
        );
        let Some(quote) = self.aggregator.get_quote(&request).await? else {
            error!("No routes found for {}. Skipping trade.", pair.label());
            return Ok(());
        };

        info!("📣 Buying {}...", pair.label());
        let bought = match self.execute_buy(pair, &quote).await {
            Ok(bought) => bought,
            Err(e) => {
                error!("Failed to buy {}: {}", pair.label(), e);
                return Ok(());
            }
        };
        info!("✅ Bought {} at {:.8} SOL/token", pair.label(), bought.price);

        let trade = TradeInfo {
            id: generate_id(),
            token_address: pair.token_address.clone(),
            symbol: pair.label().to_string(),
            buy_price: bought.price,
            buy_amount: bought.amount,
            buy_timestamp: now_millis(),
            buy_tx_id: bought.tx_id,
        };

        match &self.settings.sell_policy {
            SellPolicy::Immediate { delay } => {
                info!("📣 Preparing to sell {} immediately...", trade.symbol);
                tokio::time::sleep(*delay).await;
                self.sell_or_queue(trade).await;
            }
            SellPolicy::ProfitTarget { target } => {
                info!("📣 Holding {} until {:.0}% profit", trade.symbol, target * 100.0);
                self.context.queue_active(trade).await;
            }
        }

        self.refresh_wallet_balance().await;
        Ok(())
    }

    /// Swap SOL for the token using `quote`
    pub async fn execute_buy(&self, pair: &PairInfo, quote: &Quote) -> Result<BuyResult, TradeError> {
        debug!("Preparing buy transaction for {}", pair.label());
        let mint = parse_mint(&pair.token_address)?;
        // Reject an unpriceable quote before anything is broadcast
        let decimals = pair.decimals.unwrap_or(DEFAULT_TOKEN_DECIMALS);
        let price = buy_price(quote.in_amount_raw()?, quote.out_amount_raw()?, decimals)
            .ok_or_else(|| TradeError::InvalidQuote(quote.out_amount.clone()))?;

        let payload = self.aggregator.build_swap_transaction(quote, &self.wallet).await?;
        let signature = self.engine.submit(&payload).await.into_result()?;
        info!("Buy transaction confirmed: {}", signature);

        tokio::time::sleep(self.settings.settle_delay).await;
        let amount = match self.gateway.get_token_balance(&self.wallet, &mint).await {
            Ok(balance) => balance.map(|b| b.ui_amount).unwrap_or(0.0),
            Err(e) => {
                warn!("⚠️ Error getting token balance for {}: {}", pair.label(), e);
                0.0
            }
        };
        debug!("Token balance after purchase: {}", amount);

        Ok(BuyResult {
            price,
            amount,
            tx_id: signature.to_string(),
        })
    }

    /// Swap the wallet's whole balance of the traded token back to SOL
    pub async fn execute_sell(&self, trade: &TradeInfo) -> Result<SellResult, TradeError> {
        debug!("Preparing to sell {}", trade.symbol);
        let (quote, price) = self.quote_sell(trade).await?;
        self.submit_sell(&quote, price).await
    }

    /// Retry or evaluate every queued position.
    ///
    /// Guarded by the same flag as the listing poll, so the two never
    /// interleave on one wallet.
    pub async fn sweep_active_trades(&self) {
        let Some(_guard) = self.context.try_begin_processing() else {
            debug!("Already processing a trade, skipping active trade sweep");
            return;
        };

        let trades = self.context.active_trades().await;
        if trades.is_empty() {
            return;
        }
        info!("📣 Checking {} active trades", trades.len());

        for trade in trades {
            match self.settings.sell_policy {
                SellPolicy::Immediate { .. } => {
                    debug!("Attempting to sell {}", trade.symbol);
                    match self.execute_sell(&trade).await {
                        Ok(sale) => self.record_sale(trade, &sale).await,
                        Err(e) => error!("Failed to sell {}: {}", trade.symbol, e),
                    }
                }
                SellPolicy::ProfitTarget { .. } => self.sell_at_target(trade).await,
            }
        }
    }

    /// Store the current SOL balance in the context; errors count as an empty wallet
    pub async fn refresh_wallet_balance(&self) {
        match self.gateway.get_balance(&self.wallet).await {
            Ok(lamports) => {
                self.context.set_wallet_balance(lamports);
                info!("Wallet balance: {:.4} SOL", Amount::from_lamports(lamports).to_ui());
            }
            Err(e) => {
                error!("Error fetching wallet balance: {}", e);
                self.context.set_wallet_balance(0);
            }
        }
    }

    async fn sell_or_queue(&self, trade: TradeInfo) {
        match self.execute_sell(&trade).await {
            Ok(sale) => self.record_sale(trade, &sale).await,
            Err(e) => {
                error!("Failed to sell {}: {}", trade.symbol, e);
                self.context.queue_active(trade).await;
            }
        }
    }

    async fn sell_at_target(&self, trade: TradeInfo) {
        let (quote, price) = match self.quote_sell(&trade).await {
            Ok(quoted) => quoted,
            Err(e) => {
                warn!("⚠️ Cannot price {}: {}", trade.symbol, e);
                return;
            }
        };

        let profit = profit_fraction(trade.buy_price, price);
        if !self.settings.sell_policy.should_sell(profit) {
            debug!("Holding {} at {:.2}% profit", trade.symbol, profit * 100.0);
            return;
        }

        info!("📣 Profit target reached for {} ({:.2}%)", trade.symbol, profit * 100.0);
        match self.submit_sell(&quote, price).await {
            Ok(sale) => self.record_sale(trade, &sale).await,
            Err(e) => error!("Failed to sell {}: {}", trade.symbol, e),
        }
    }

    /// Fresh token -> SOL quote for the full balance and the price it implies
    async fn quote_sell(&self, trade: &TradeInfo) -> Result<(Quote, f64), TradeError> {
        let mint = parse_mint(&trade.token_address)?;
        let balance = self
            .gateway
            .get_token_balance(&self.wallet, &mint)
            .await?
            .filter(|b| b.amount > 0)
            .ok_or_else(|| TradeError::NoBalance(trade.symbol.clone()))?;
        debug!(
            "Current balance of {}: {}",
            trade.symbol,
            format_amount(balance.amount, balance.decimals)
        );

        let request = self.quote_request(&trade.token_address, &self.settings.sol_mint, balance.amount);
        let quote = self
            .aggregator
            .get_quote(&request)
            .await?
            .ok_or_else(|| TradeError::NoRoute(trade.symbol.clone()))?;

        let price = sell_price(quote.in_amount_raw()?, balance.decimals, quote.out_amount_raw()?)
            .ok_or_else(|| TradeError::InvalidQuote(quote.in_amount.clone()))?;
        debug!("Current sell price: {:.8} SOL per token", price);

        Ok((quote, price))
    }

    async fn submit_sell(&self, quote: &Quote, price: f64) -> Result<SellResult, TradeError> {
        let payload = self.aggregator.build_swap_transaction(quote, &self.wallet).await?;
        let signature = self.engine.submit(&payload).await.into_result()?;
        info!("Sell transaction confirmed: {}", signature);

        Ok(SellResult {
            price,
            tx_id: signature.to_string(),
        })
    }

    async fn record_sale(&self, trade: TradeInfo, sale: &SellResult) {
        let item = TradeHistoryItem::close(trade, sale, now_millis());
        info!(
            "✅ Sold {} at {:.8} SOL/token ({:.2}% profit)",
            item.trade.symbol,
            item.sell_price,
            item.profit * 100.0
        );
        self.context.record_completed(item).await;
    }

    fn quote_request(&self, input_mint: &str, output_mint: &str, amount: u64) -> QuoteRequest {
        QuoteRequest {
            input_mint: input_mint.to_string(),
            output_mint: output_mint.to_string(),
            amount,
            slippage_bps: self.settings.slippage_bps,
            swap_mode: SwapMode::ExactIn,
            only_direct_routes: false,
        }
    }
}

fn parse_mint(address: &str) -> Result<Pubkey, TradeError> {
    Pubkey::from_str(address).map_err(|_| TradeError::InvalidToken(address.to_string()))
}
