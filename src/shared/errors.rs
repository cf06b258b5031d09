//! Error handling for the application

use thiserror::Error;

/// Whether a failure is worth another attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureClass {
    /// Network blips, rate limits, confirmation timeouts
    Transient,
    /// Malformed payloads, on-chain execution errors
    Permanent,
}

/// Chain gateway errors
#[derive(Error, Debug, Clone)]
pub enum GatewayError {
    #[error("RPC request failed: {0}")]
    Rpc(String),

    #[error("Transaction {signature} failed on-chain: {reason}")]
    TransactionFailed { signature: String, reason: String },

    #[error("Transaction {0} not confirmed before timeout")]
    ConfirmationTimeout(String),

    #[error("Unexpected RPC response: {0}")]
    InvalidResponse(String),
}

/// Errors raised while signing, broadcasting or confirming a swap transaction
#[derive(Error, Debug, Clone)]
pub enum SubmissionError {
    #[error("Failed to decode swap transaction: {0}")]
    Decode(String),

    #[error("Failed to sign transaction: {0}")]
    Signing(String),

    #[error("Broadcast failed: {0}")]
    Broadcast(GatewayError),

    #[error("Confirmation failed: {0}")]
    Confirmation(GatewayError),
}

impl SubmissionError {
    pub fn class(&self) -> FailureClass {
        match self {
            SubmissionError::Decode(_) | SubmissionError::Signing(_) => FailureClass::Permanent,
            SubmissionError::Broadcast(e) | SubmissionError::Confirmation(e) => match e {
                GatewayError::TransactionFailed { .. } => FailureClass::Permanent,
                _ => FailureClass::Transient,
            },
        }
    }
}

/// Swap aggregator errors
#[derive(Error, Debug)]
pub enum AggregatorError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Aggregator returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Invalid aggregator response: {0}")]
    InvalidResponse(String),
}

/// Listing feed errors
#[derive(Error, Debug)]
pub enum FeedError {
    #[error("Feed request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Feed returned status {0}")]
    Status(u16),
}

/// Token metadata errors
#[derive(Error, Debug)]
pub enum TokenError {
    #[error("Token list request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid token address {0}")]
    InvalidAddress(String),

    #[error("Invalid mint account data for {0}")]
    InvalidMint(String),

    #[error(transparent)]
    Gateway(#[from] GatewayError),
}

/// Ledger persistence errors
#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("Ledger I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Ledger document is malformed: {0}")]
    Format(#[from] serde_json::Error),
}

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Read(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("PRIVATE_KEY environment variable is required")]
    MissingPrivateKey,

    #[error("Failed to load wallet: invalid private key format ({0})")]
    InvalidPrivateKey(String),
}

/// Trade pipeline errors
#[derive(Error, Debug)]
pub enum TradeError {
    #[error("No routes found for {0}")]
    NoRoute(String),

    #[error("No token balance for {0}")]
    NoBalance(String),

    #[error("Invalid token address {0}")]
    InvalidToken(String),

    #[error("Failed to get swap transaction: {0}")]
    SwapBuild(#[from] AggregatorError),

    #[error("Transaction failed after {attempts} attempts: {cause}")]
    Submission { attempts: u32, cause: SubmissionError },

    #[error(transparent)]
    Gateway(#[from] GatewayError),

    #[error("Invalid amount in quote: {0}")]
    InvalidQuote(String),
}
