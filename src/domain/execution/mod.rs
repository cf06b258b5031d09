//! Execution domain - swap transaction submission

mod payload;
mod retry;
mod transaction_executor;

pub use payload::{SwapTransaction, SwapTransactionPayload};
pub use retry::{RetryDecision, RetryPolicy};
pub use transaction_executor::{SubmissionEngine, SubmissionOutcome};

#[cfg(test)]
pub(crate) use payload::fixtures;
