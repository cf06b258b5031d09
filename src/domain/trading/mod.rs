//! Trading domain - trade records, pricing, sell policy and shared state

mod policy;
mod pricing;
mod state;
mod trade;

pub use policy::{SellPolicy, SellPolicyKind};
pub use pricing::{buy_price, sell_price};
pub use state::{ProcessingGuard, TradingContext};
pub use trade::{BuyResult, SellResult, TradeBook, TradeHistoryItem, TradeInfo};

#[cfg(test)]
pub(crate) use trade::fixtures;
