//! Trade records kept in the ledger

use serde::{Deserialize, Serialize};

/// A position that has been bought
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TradeInfo {
    pub id: String,
    pub token_address: String,
    pub symbol: String,
    /// SOL per token
    pub buy_price: f64,
    /// Token balance after the buy, in UI units
    pub buy_amount: f64,
    /// Unix milliseconds
    pub buy_timestamp: i64,
    pub buy_tx_id: String,
}

/// A completed round trip
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TradeHistoryItem {
    #[serde(flatten)]
    pub trade: TradeInfo,
    pub sell_price: f64,
    pub sell_timestamp: i64,
    /// Realized profit as a fraction of the buy price
    pub profit: f64,
    pub sell_tx_id: String,
}

impl TradeHistoryItem {
    pub fn close(trade: TradeInfo, sale: &SellResult, sell_timestamp: i64) -> Self {
        Self {
            profit: crate::shared::utils::profit_fraction(trade.buy_price, sale.price),
            trade,
            sell_price: sale.price,
            sell_timestamp,
            sell_tx_id: sale.tx_id.clone(),
        }
    }
}

/// Everything the ledger persists
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TradeBook {
    #[serde(default)]
    pub trade_history: Vec<TradeHistoryItem>,
    #[serde(default)]
    pub active_trades: Vec<TradeInfo>,
}

impl TradeBook {
    pub fn has_traded(&self, token_address: &str) -> bool {
        self.trade_history.iter().any(|t| t.trade.token_address == token_address)
            || self.active_trades.iter().any(|t| t.token_address == token_address)
    }
}

/// Result of a confirmed buy
#[derive(Debug, Clone, PartialEq)]
pub struct BuyResult {
    pub price: f64,
    pub amount: f64,
    pub tx_id: String,
}

/// Result of a confirmed sell
#[derive(Debug, Clone, PartialEq)]
pub struct SellResult {
    pub price: f64,
    pub tx_id: String,
}
