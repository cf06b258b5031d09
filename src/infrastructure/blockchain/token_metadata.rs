//! Token metadata: strict token list with an on-chain mint fallback

use std::collections::HashMap;
use std::str::FromStr;
use std::time::Duration;

use reqwest::Client;
use solana_sdk::pubkey::Pubkey;
use spl_token::solana_program::program_pack::Pack;
use tracing::{info, warn};

use super::gateway::ChainGateway;
use crate::shared::errors::TokenError;
use crate::shared::types::TokenInfo;

/// `decimals` byte in the SPL mint layout (after authority option + supply)
pub const MINT_DECIMALS_OFFSET: usize = 44;

/// Symbol and name cannot be read from the mint account
pub const UNKNOWN_TOKEN: &str = "Unknown";

/// Read mint precision straight from the account bytes
pub fn decode_mint_decimals(data: &[u8]) -> Option<u8> {
    if data.len() < spl_token::state::Mint::LEN {
        return None;
    }
    data.get(MINT_DECIMALS_OFFSET).copied()
}

/// Known tokens, keyed by mint address
#[derive(Debug, Default)]
pub struct TokenRegistry {
    tokens: HashMap<String, TokenInfo>,
}

impl TokenRegistry {
    pub fn from_tokens(tokens: Vec<TokenInfo>) -> Self {
        Self {
            tokens: tokens.into_iter().map(|t| (t.address.clone(), t)).collect(),
        }
    }

    /// Download the strict token list
    pub async fn load(url: &str, timeout: Duration) -> Result<Self, TokenError> {
        info!("Loading token list...");
        let http_client = Client::builder().timeout(timeout).build()?;
        let tokens: Vec<TokenInfo> = http_client.get(url).send().await?.error_for_status()?.json().await?;

        let registry = Self::from_tokens(tokens);
        info!("Token list loaded with {} tokens", registry.len());
        Ok(registry)
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn find(&self, address: &str) -> Option<&TokenInfo> {
        self.tokens.get(address)
    }

    /// Token list first, then the mint account. `None` if the mint does not exist.
    pub async fn resolve(&self, gateway: &dyn ChainGateway, address: &str) -> Result<Option<TokenInfo>, TokenError> {
        if let Some(token) = self.find(address) {
            return Ok(Some(token.clone()));
        }

        info!("Token details not found in token list. Fetching on-chain metadata...");
        let mint = Pubkey::from_str(address).map_err(|_| TokenError::InvalidAddress(address.to_string()))?;

        let Some(data) = gateway.get_account_data(&mint).await? else {
            warn!("Token account not found for address: {}", address);
            return Ok(None);
        };

        let decimals = decode_mint_decimals(&data).ok_or_else(|| TokenError::InvalidMint(address.to_string()))?;
        Ok(Some(TokenInfo {
            address: address.to_string(),
            symbol: UNKNOWN_TOKEN.to_string(),
            name: UNKNOWN_TOKEN.to_string(),
            decimals,
        }))
    }
}
