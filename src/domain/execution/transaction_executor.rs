//! Transaction submission: sign, broadcast and confirm with bounded retries

use std::sync::Arc;

use solana_sdk::signature::{Signature, Signer};
use tracing::{debug, error, info};

use super::payload::{SwapTransaction, SwapTransactionPayload};
use super::retry::{RetryDecision, RetryPolicy};
use crate::infrastructure::blockchain::ChainGateway;
use crate::shared::errors::{SubmissionError, TradeError};

/// Terminal result of the retry loop
#[derive(Debug, Clone)]
pub enum SubmissionOutcome {
    Confirmed { signature: Signature, attempts: u32 },
    Failed { attempts: u32, cause: SubmissionError },
}

impl SubmissionOutcome {
    pub fn attempts(&self) -> u32 {
        match self {
            SubmissionOutcome::Confirmed { attempts, .. } | SubmissionOutcome::Failed { attempts, .. } => *attempts,
        }
    }

    pub fn into_result(self) -> Result<Signature, TradeError> {
        match self {
            SubmissionOutcome::Confirmed { signature, .. } => Ok(signature),
            SubmissionOutcome::Failed { attempts, cause } => Err(TradeError::Submission { attempts, cause }),
        }
    }
}

/// Submits aggregator-built swap transactions.
///
/// Owns no state besides shared handles; every `submit` call is independent.
/// The same payload is re-signed and re-broadcast on each attempt, duplicate
/// submissions are left to the cluster's signature de-duplication.
#[derive(Clone)]
pub struct SubmissionEngine {
    gateway: Arc<dyn ChainGateway>,
    signer: Arc<dyn Signer + Send + Sync>,
    policy: RetryPolicy,
}

impl SubmissionEngine {
    pub fn new(gateway: Arc<dyn ChainGateway>, signer: Arc<dyn Signer + Send + Sync>, policy: RetryPolicy) -> Self {
        Self { gateway, signer, policy }
    }

    pub async fn submit(&self, payload: &SwapTransactionPayload) -> SubmissionOutcome {
        let mut attempt = 0;

        loop {
            attempt += 1;

            match self.attempt(payload).await {
                Ok(signature) => {
                    info!("Transaction confirmed: {}", signature);
                    return SubmissionOutcome::Confirmed { signature, attempts: attempt };
                }
                Err(cause) => {
                    error!("Transaction attempt {} failed: {}", attempt, cause);

                    match self.policy.decide(attempt, &cause) {
                        RetryDecision::RetryAfter(delay) => {
                            debug!("Retrying in {:?}", delay);
                            tokio::time::sleep(delay).await;
                        }
                        RetryDecision::GiveUp => {
                            error!("Failed after {} attempts: {}", attempt, cause);
                            return SubmissionOutcome::Failed { attempts: attempt, cause };
                        }
                    }
                }
            }
        }
    }

    async fn attempt(&self, payload: &SwapTransactionPayload) -> Result<Signature, SubmissionError> {
        let mut transaction = payload.decode()?;
        transaction.sign(self.signer.as_ref())?;

        let signature = match &transaction {
            SwapTransaction::Versioned(tx) => self
                .gateway
                .send_versioned_transaction(tx)
                .await
                .map_err(SubmissionError::Broadcast)?,
            SwapTransaction::Legacy(tx) => {
                let wire = bincode::serialize(tx)
                    .map_err(|e| SubmissionError::Decode(format!("failed to serialize signed transaction: {}", e)))?;
                self.gateway
                    .send_raw_transaction(&wire)
                    .await
                    .map_err(SubmissionError::Broadcast)?
            }
        };
        info!("Transaction sent with txid: {}", signature);

        self.gateway
            .confirm_transaction(&signature)
            .await
            .map_err(SubmissionError::Confirmation)?;
        Ok(signature)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::execution::payload::fixtures::{legacy_payload, versioned_payload};
    use crate::infrastructure::blockchain::gateway::testing::{GatewayCall, StubGateway};
    use crate::shared::errors::GatewayError;
    use solana_sdk::signature::Keypair;
    use solana_sdk::transaction::Transaction;
    use std::time::Duration;

    fn engine(gateway: Arc<StubGateway>, signer: Arc<Keypair>, base_ms: u64) -> SubmissionEngine {
        SubmissionEngine::new(
            gateway,
            signer,
            RetryPolicy {
                max_attempts: 3,
                base_backoff: Duration::from_millis(base_ms),
                retry_permanent: true,
            },
        )
    }

    #[tokio::test(start_paused = true)]
    async fn test_versioned_payload_uses_versioned_path() {
        let gateway = Arc::new(StubGateway::new());
        let signer = Arc::new(Keypair::new());
        let payload = versioned_payload(&signer.pubkey());

        let outcome = engine(gateway.clone(), signer.clone(), 10).submit(&payload).await;

        assert!(matches!(outcome, SubmissionOutcome::Confirmed { attempts: 1, .. }));
        let calls = gateway.calls();
        assert!(calls.contains(&GatewayCall::SendVersioned));
        assert!(!calls.contains(&GatewayCall::SendRaw));

        let sent = gateway.sent_versioned();
        assert!(sent[0].verify_with_results().into_iter().all(|ok| ok));
    }

    #[tokio::test(start_paused = true)]
    async fn test_legacy_payload_uses_raw_path() {
        let gateway = Arc::new(StubGateway::new());
        let signer = Arc::new(Keypair::new());
        let payload = legacy_payload(&signer.pubkey());

        let outcome = engine(gateway.clone(), signer.clone(), 10).submit(&payload).await;

        assert!(matches!(outcome, SubmissionOutcome::Confirmed { attempts: 1, .. }));
        let calls = gateway.calls();
        assert!(calls.contains(&GatewayCall::SendRaw));
        assert!(!calls.contains(&GatewayCall::SendVersioned));

        let wire = &gateway.sent_raw()[0];
        let sent: Transaction = bincode::deserialize(wire).unwrap();
        assert!(sent.verify().is_ok());
    }

    #[tokio::test(start_paused = true)]
    async fn test_succeeds_on_last_attempt_with_exponential_delays() {
        let gateway = Arc::new(StubGateway::new());
        gateway.fail_confirmations(2);
        let signer = Arc::new(Keypair::new());
        let payload = legacy_payload(&signer.pubkey());

        let outcome = engine(gateway.clone(), signer, 100).submit(&payload).await;

        match outcome {
            SubmissionOutcome::Confirmed { attempts, .. } => assert_eq!(attempts, 3),
            other => panic!("unexpected outcome {:?}", other),
        }

        let times = gateway.send_times();
        assert_eq!(times.len(), 3);
        assert_eq!(times[1] - times[0], Duration::from_millis(200));
        assert_eq!(times[2] - times[1], Duration::from_millis(400));
    }

    #[tokio::test(start_paused = true)]
    async fn test_always_failing_gateway_exhausts_attempts() {
        let gateway = Arc::new(StubGateway::new());
        gateway.fail_always();
        let signer = Arc::new(Keypair::new());
        let payload = versioned_payload(&signer.pubkey());

        let outcome = engine(gateway.clone(), signer, 100).submit(&payload).await;

        match outcome {
            SubmissionOutcome::Failed { attempts, cause } => {
                assert_eq!(attempts, 3);
                assert!(matches!(cause, SubmissionError::Confirmation(GatewayError::ConfirmationTimeout(_))));
            }
            other => panic!("unexpected outcome {:?}", other),
        }
        assert_eq!(gateway.send_times().len(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_malformed_payload_is_retried_by_default() {
        let gateway = Arc::new(StubGateway::new());
        let signer = Arc::new(Keypair::new());
        let payload = SwapTransactionPayload::new("%%%");

        let outcome = engine(gateway.clone(), signer, 10).submit(&payload).await;

        assert_eq!(outcome.attempts(), 3);
        assert!(matches!(outcome, SubmissionOutcome::Failed { cause: SubmissionError::Decode(_), .. }));
        assert!(gateway.calls().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_strict_policy_gives_up_on_permanent_cause() {
        let gateway = Arc::new(StubGateway::new());
        let signer = Arc::new(Keypair::new());
        let strict = SubmissionEngine::new(
            gateway,
            signer,
            RetryPolicy {
                retry_permanent: false,
                ..RetryPolicy::default()
            },
        );

        let outcome = strict.submit(&SwapTransactionPayload::new("%%%")).await;
        assert_eq!(outcome.attempts(), 1);
    }
}
