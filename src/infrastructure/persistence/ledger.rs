//! JSON file holding trade history and unsold positions

use std::fs;
use std::path::{Path, PathBuf};

use crate::domain::trading::TradeBook;
use crate::shared::errors::LedgerError;

/// Whole-document ledger: read once at startup, rewritten on every change
#[derive(Debug, Clone)]
pub struct TradeLedger {
    path: PathBuf,
}

impl TradeLedger {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// A missing file is an empty book
    pub fn load(&self) -> Result<TradeBook, LedgerError> {
        if !self.path.exists() {
            return Ok(TradeBook::default());
        }
        let data = fs::read_to_string(&self.path)?;
        Ok(serde_json::from_str(&data)?)
    }

    pub fn save(&self, book: &TradeBook) -> Result<(), LedgerError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let data = serde_json::to_string_pretty(book)?;

        // Write atomically by writing to temp file then renaming
        let temp_path = self.path.with_extension("tmp");
        fs::write(&temp_path, data)?;
        fs::rename(&temp_path, &self.path)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::trading::fixtures::sample_trade;
    use crate::domain::trading::{SellResult, TradeHistoryItem};
    use std::collections::HashSet;

    #[test]
    fn test_missing_file_loads_empty_book() {
        let dir = tempfile::tempdir().unwrap();
        let ledger = TradeLedger::new(dir.path().join("absent.json"));
        assert_eq!(ledger.load().unwrap(), TradeBook::default());
    }

    #[test]
    fn test_round_trip_preserves_records() {
        let dir = tempfile::tempdir().unwrap();
        let ledger = TradeLedger::new(dir.path().join("nested").join("trading_log.json"));

        let sale = SellResult { price: 0.00003, tx_id: "sell".to_string() };
        let book = TradeBook {
            trade_history: vec![
                TradeHistoryItem::close(sample_trade("3", "MintC"), &sale, 30),
                TradeHistoryItem::close(sample_trade("1", "MintA"), &sale, 10),
                TradeHistoryItem::close(sample_trade("2", "MintB"), &sale, 20),
            ],
            active_trades: vec![sample_trade("4", "MintD"), sample_trade("5", "MintE")],
        };

        ledger.save(&book).unwrap();
        let reloaded = ledger.load().unwrap();

        assert_eq!(reloaded.trade_history, book.trade_history);
        let ids = |trades: &[crate::domain::trading::TradeInfo]| {
            trades.iter().map(|t| t.id.clone()).collect::<HashSet<_>>()
        };
        assert_eq!(ids(&reloaded.active_trades), ids(&book.active_trades));
    }

    #[test]
    fn test_document_uses_original_field_names() {
        let dir = tempfile::tempdir().unwrap();
        let ledger = TradeLedger::new(dir.path().join("trading_log.json"));
        ledger
            .save(&TradeBook {
                trade_history: vec![],
                active_trades: vec![sample_trade("1", "MintA")],
            })
            .unwrap();

        let raw: serde_json::Value = serde_json::from_str(&fs::read_to_string(ledger.path()).unwrap()).unwrap();
        assert!(raw["tradeHistory"].as_array().unwrap().is_empty());
        assert_eq!(raw["activeTrades"][0]["tokenAddress"], "MintA");
    }

    #[test]
    fn test_malformed_document_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("trading_log.json");
        fs::write(&path, "{ not json").unwrap();
        assert!(matches!(TradeLedger::new(path).load(), Err(LedgerError::Format(_))));
    }
}
