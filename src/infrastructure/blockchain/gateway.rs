//! Chain gateway interface used by the trading pipeline

use async_trait::async_trait;
use solana_sdk::{pubkey::Pubkey, signature::Signature, transaction::VersionedTransaction};

use crate::shared::errors::GatewayError;
use crate::shared::types::TokenBalance;

/// Everything the bot needs from a Solana RPC node
#[async_trait]
pub trait ChainGateway: Send + Sync {
    /// Native SOL balance in lamports
    async fn get_balance(&self, owner: &Pubkey) -> Result<u64, GatewayError>;

    /// Balance of the first token account `owner` holds for `mint`, if any
    async fn get_token_balance(&self, owner: &Pubkey, mint: &Pubkey) -> Result<Option<TokenBalance>, GatewayError>;

    /// Raw account data, `None` if the account does not exist
    async fn get_account_data(&self, address: &Pubkey) -> Result<Option<Vec<u8>>, GatewayError>;

    /// Broadcast already serialized legacy transaction bytes, skipping preflight
    async fn send_raw_transaction(&self, wire_transaction: &[u8]) -> Result<Signature, GatewayError>;

    /// Broadcast a signed versioned transaction
    async fn send_versioned_transaction(&self, transaction: &VersionedTransaction) -> Result<Signature, GatewayError>;

    /// Wait until the signature reaches `confirmed` commitment or the gateway timeout elapses
    async fn confirm_transaction(&self, signature: &Signature) -> Result<(), GatewayError>;
}

#[cfg(test)]
pub(crate) mod testing {
    //! In-memory gateway for unit tests

    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;
    use tokio::time::Instant;

    #[derive(Debug, Clone, PartialEq)]
    pub enum GatewayCall {
        GetBalance,
        GetTokenBalance(Pubkey),
        GetAccountData(Pubkey),
        SendRaw,
        SendVersioned,
        Confirm(Signature),
    }

    #[derive(Default)]
    struct Inner {
        lamports: u64,
        token_balances: HashMap<Pubkey, TokenBalance>,
        accounts: HashMap<Pubkey, Vec<u8>>,
        failing_confirmations: u32,
        always_fail: bool,
        calls: Vec<GatewayCall>,
        send_times: Vec<Instant>,
        sent_raw: Vec<Vec<u8>>,
        sent_versioned: Vec<VersionedTransaction>,
    }

    #[derive(Default)]
    pub struct StubGateway {
        inner: Mutex<Inner>,
    }

    impl StubGateway {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with_lamports(self, lamports: u64) -> Self {
            self.inner.lock().unwrap().lamports = lamports;
            self
        }

        pub fn set_token_balance(&self, mint: Pubkey, balance: TokenBalance) {
            self.inner.lock().unwrap().token_balances.insert(mint, balance);
        }

        pub fn set_account_data(&self, address: Pubkey, data: Vec<u8>) {
            self.inner.lock().unwrap().accounts.insert(address, data);
        }

        /// The next `count` confirmations time out
        pub fn fail_confirmations(&self, count: u32) {
            self.inner.lock().unwrap().failing_confirmations = count;
        }

        pub fn fail_always(&self) {
            self.inner.lock().unwrap().always_fail = true;
        }

        pub fn calls(&self) -> Vec<GatewayCall> {
            self.inner.lock().unwrap().calls.clone()
        }

        pub fn send_times(&self) -> Vec<Instant> {
            self.inner.lock().unwrap().send_times.clone()
        }

        pub fn sent_raw(&self) -> Vec<Vec<u8>> {
            self.inner.lock().unwrap().sent_raw.clone()
        }

        pub fn sent_versioned(&self) -> Vec<VersionedTransaction> {
            self.inner.lock().unwrap().sent_versioned.clone()
        }
    }

    #[async_trait]
    impl ChainGateway for StubGateway {
        async fn get_balance(&self, _owner: &Pubkey) -> Result<u64, GatewayError> {
            let mut inner = self.inner.lock().unwrap();
            inner.calls.push(GatewayCall::GetBalance);
            Ok(inner.lamports)
        }

        async fn get_token_balance(&self, _owner: &Pubkey, mint: &Pubkey) -> Result<Option<TokenBalance>, GatewayError> {
            let mut inner = self.inner.lock().unwrap();
            inner.calls.push(GatewayCall::GetTokenBalance(*mint));
            Ok(inner.token_balances.get(mint).copied())
        }

        async fn get_account_data(&self, address: &Pubkey) -> Result<Option<Vec<u8>>, GatewayError> {
            let mut inner = self.inner.lock().unwrap();
            inner.calls.push(GatewayCall::GetAccountData(*address));
            Ok(inner.accounts.get(address).cloned())
        }

        async fn send_raw_transaction(&self, wire_transaction: &[u8]) -> Result<Signature, GatewayError> {
            let mut inner = self.inner.lock().unwrap();
            inner.calls.push(GatewayCall::SendRaw);
            inner.send_times.push(Instant::now());
            inner.sent_raw.push(wire_transaction.to_vec());
            Ok(Signature::new_unique())
        }

        async fn send_versioned_transaction(&self, transaction: &VersionedTransaction) -> Result<Signature, GatewayError> {
            let mut inner = self.inner.lock().unwrap();
            inner.calls.push(GatewayCall::SendVersioned);
            inner.send_times.push(Instant::now());
            inner.sent_versioned.push(transaction.clone());
            Ok(transaction.signatures.first().copied().unwrap_or_else(Signature::new_unique))
        }

        async fn confirm_transaction(&self, signature: &Signature) -> Result<(), GatewayError> {
            let mut inner = self.inner.lock().unwrap();
            inner.calls.push(GatewayCall::Confirm(*signature));
            if inner.always_fail {
                return Err(GatewayError::ConfirmationTimeout(signature.to_string()));
            }
            if inner.failing_confirmations > 0 {
                inner.failing_confirmations -= 1;
                return Err(GatewayError::ConfirmationTimeout(signature.to_string()));
            }
            Ok(())
        }
    }
}
