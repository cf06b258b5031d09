//! Flat-file persistence

pub mod ledger;

pub use ledger::TradeLedger;
