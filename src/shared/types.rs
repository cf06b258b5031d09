//! Common types used across the application

use serde::{Deserialize, Serialize};

pub const LAMPORTS_PER_SOL: f64 = 1_000_000_000.0;

/// Decimals assumed when a token's precision cannot be resolved
pub const DEFAULT_TOKEN_DECIMALS: u8 = 6;

/// Token representation as published by the strict token list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenInfo {
    pub address: String,
    pub symbol: String,
    pub name: String,
    pub decimals: u8,
}

/// A freshly listed token picked up from the feed
#[derive(Debug, Clone, PartialEq)]
pub struct PairInfo {
    pub token_address: String,
    pub symbol: Option<String>,
    pub decimals: Option<u8>,
}

impl PairInfo {
    pub fn from_token(token: TokenInfo) -> Self {
        Self {
            token_address: token.address,
            symbol: Some(token.symbol),
            decimals: Some(token.decimals),
        }
    }

    /// Symbol when known, mint address otherwise
    pub fn label(&self) -> &str {
        self.symbol.as_deref().unwrap_or(&self.token_address)
    }
}

/// Token account balance of the wallet for one mint
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TokenBalance {
    pub amount: u64,
    pub decimals: u8,
    pub ui_amount: f64,
}

/// Amount representation with precision
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct Amount {
    pub value: u64,
    pub decimals: u8,
}

impl Amount {
    pub fn new(value: u64, decimals: u8) -> Self {
        Self { value, decimals }
    }

    pub fn from_lamports(value: u64) -> Self {
        Self { value, decimals: 9 }
    }

    pub fn from_sol(value: f64) -> Self {
        Self {
            value: (value * LAMPORTS_PER_SOL).floor() as u64,
            decimals: 9,
        }
    }

    /// Human-readable value
    pub fn to_ui(&self) -> f64 {
        self.value as f64 / 10_f64.powi(self.decimals as i32)
    }
}
