//! Listing Trader - Solana new-listing trading bot
//! Built with Domain-Driven Design principles

pub mod app;
pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod shared;

// Re-export main types for convenience
pub use application::{Scheduler, TradeOrchestrator};
pub use domain::execution::{RetryPolicy, SubmissionEngine, SubmissionOutcome};
pub use domain::trading::TradingContext;
