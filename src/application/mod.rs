//! Application layer: the trading pipeline and its timers

pub mod scheduler;
pub mod trader;

pub use scheduler::Scheduler;
pub use trader::{TradeOrchestrator, TradeSettings};
