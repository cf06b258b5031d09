//! Shared trading state, owned by one context object

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use tokio::sync::RwLock;
use tracing::{debug, error, info};

use super::trade::{TradeBook, TradeHistoryItem, TradeInfo};
use crate::infrastructure::persistence::TradeLedger;
use crate::shared::types::LAMPORTS_PER_SOL;

/// Clears the processing flag when dropped
#[derive(Debug)]
pub struct ProcessingGuard<'a> {
    flag: &'a AtomicBool,
}

impl Drop for ProcessingGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

/// Trade book, wallet balance and the pipeline flag.
///
/// Every mutation of the book is written through to the ledger while the
/// write lock is held, so the file never lags more than one update behind.
pub struct TradingContext {
    book: RwLock<TradeBook>,
    ledger: TradeLedger,
    wallet_lamports: AtomicU64,
    processing: AtomicBool,
}

impl TradingContext {
    pub fn new(ledger: TradeLedger, book: TradeBook) -> Self {
        Self {
            book: RwLock::new(book),
            ledger,
            wallet_lamports: AtomicU64::new(0),
            processing: AtomicBool::new(false),
        }
    }

    /// Resume from the ledger file; an unreadable ledger starts empty
    pub fn load(ledger: TradeLedger) -> Self {
        let book = match ledger.load() {
            Ok(book) => {
                info!(
                    "Loaded {} historical trades and {} active trades",
                    book.trade_history.len(),
                    book.active_trades.len()
                );
                book
            }
            Err(e) => {
                error!("Error loading trade history: {}", e);
                TradeBook::default()
            }
        };
        Self::new(ledger, book)
    }

    /// `None` while another pipeline holds the flag
    pub fn try_begin_processing(&self) -> Option<ProcessingGuard<'_>> {
        self.processing
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| ProcessingGuard { flag: &self.processing })
    }

    pub fn is_processing(&self) -> bool {
        self.processing.load(Ordering::Acquire)
    }

    pub async fn has_traded(&self, token_address: &str) -> bool {
        self.book.read().await.has_traded(token_address)
    }

    pub async fn snapshot(&self) -> TradeBook {
        self.book.read().await.clone()
    }

    pub async fn active_trades(&self) -> Vec<TradeInfo> {
        self.book.read().await.active_trades.clone()
    }

    /// Move a sold position into history
    pub async fn record_completed(&self, item: TradeHistoryItem) {
        let mut book = self.book.write().await;
        book.active_trades.retain(|t| t.id != item.trade.id);
        book.trade_history.push(item);
        self.persist(&book);
    }

    /// Keep a bought position for a later sell
    pub async fn queue_active(&self, trade: TradeInfo) {
        let mut book = self.book.write().await;
        if !book.active_trades.iter().any(|t| t.id == trade.id) {
            book.active_trades.push(trade);
        }
        self.persist(&book);
    }

    pub fn set_wallet_balance(&self, lamports: u64) {
        self.wallet_lamports.store(lamports, Ordering::Relaxed);
    }

    pub fn wallet_balance_sol(&self) -> f64 {
        self.wallet_lamports.load(Ordering::Relaxed) as f64 / LAMPORTS_PER_SOL
    }

    fn persist(&self, book: &TradeBook) {
        match self.ledger.save(book) {
            Ok(()) => debug!("Trade history saved to {}", self.ledger.path().display()),
            Err(e) => error!("Error saving trade history: {}", e),
        }
    }
}
