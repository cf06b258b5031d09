pub mod client;
pub mod types;

use async_trait::async_trait;
use solana_sdk::pubkey::Pubkey;

use crate::domain::execution::SwapTransactionPayload;
use crate::shared::errors::AggregatorError;

pub use client::JupiterClient;
pub use types::{Quote, QuoteRequest, SwapMode};

/// Quote and swap-transaction building, as offered by Jupiter
#[async_trait]
pub trait SwapAggregator: Send + Sync {
    /// `Ok(None)` when no route exists
    async fn get_quote(&self, request: &QuoteRequest) -> Result<Option<Quote>, AggregatorError>;

    /// Unsigned transaction executing `quote` for `user_public_key`
    async fn build_swap_transaction(
        &self,
        quote: &Quote,
        user_public_key: &Pubkey,
    ) -> Result<SwapTransactionPayload, AggregatorError>;
}
