//! Solana RPC implementation of the chain gateway

use std::str::FromStr;
use std::time::Duration;

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD as BASE64_STANDARD, Engine};
use serde::Deserialize;
use serde_json::json;
use solana_account_decoder::UiAccountData;
use solana_client::nonblocking::rpc_client::RpcClient;
use solana_client::rpc_config::RpcSendTransactionConfig;
use solana_client::rpc_request::{RpcRequest, TokenAccountsFilter};
use solana_sdk::{
    commitment_config::{CommitmentConfig, CommitmentLevel},
    pubkey::Pubkey,
    signature::Signature,
    transaction::VersionedTransaction,
};
use tracing::debug;

use super::gateway::ChainGateway;
use crate::shared::errors::GatewayError;
use crate::shared::types::TokenBalance;

/// `tokenAmount` object of a jsonParsed SPL token account
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ParsedTokenAmount {
    amount: String,
    decimals: u8,
    ui_amount: Option<f64>,
}

/// Solana RPC client wrapper
pub struct SolanaRpcClient {
    client: RpcClient,
    confirm_timeout: Duration,
    confirm_poll_interval: Duration,
}

impl SolanaRpcClient {
    /// Create new RPC client at `confirmed` commitment
    pub fn new(rpc_url: String, confirm_timeout: Duration, confirm_poll_interval: Duration) -> Self {
        Self::with_client(
            RpcClient::new_with_commitment(rpc_url, CommitmentConfig::confirmed()),
            confirm_timeout,
            confirm_poll_interval,
        )
    }

    /// Wrap an already configured client
    pub fn with_client(client: RpcClient, confirm_timeout: Duration, confirm_poll_interval: Duration) -> Self {
        Self {
            client,
            confirm_timeout,
            confirm_poll_interval,
        }
    }

    fn parse_token_amount(data: &UiAccountData) -> Result<TokenBalance, GatewayError> {
        let parsed = match data {
            UiAccountData::Json(parsed) => &parsed.parsed,
            _ => return Err(GatewayError::InvalidResponse("token account is not jsonParsed".to_string())),
        };

        let token_amount: ParsedTokenAmount = serde_json::from_value(parsed["info"]["tokenAmount"].clone())
            .map_err(|e| GatewayError::InvalidResponse(format!("tokenAmount: {}", e)))?;
        let amount = token_amount
            .amount
            .parse::<u64>()
            .map_err(|e| GatewayError::InvalidResponse(format!("token amount {}: {}", token_amount.amount, e)))?;

        Ok(TokenBalance {
            amount,
            decimals: token_amount.decimals,
            ui_amount: token_amount
                .ui_amount
                .unwrap_or_else(|| amount as f64 / 10_f64.powi(token_amount.decimals as i32)),
        })
    }
}

#[async_trait]
impl ChainGateway for SolanaRpcClient {
    async fn get_balance(&self, owner: &Pubkey) -> Result<u64, GatewayError> {
        self.client
            .get_balance(owner)
            .await
            .map_err(|e| GatewayError::Rpc(format!("Failed to get balance: {}", e)))
    }

    async fn get_token_balance(&self, owner: &Pubkey, mint: &Pubkey) -> Result<Option<TokenBalance>, GatewayError> {
        let accounts = self
            .client
            .get_token_accounts_by_owner(owner, TokenAccountsFilter::Mint(*mint))
            .await
            .map_err(|e| GatewayError::Rpc(format!("Failed to get token accounts: {}", e)))?;

        match accounts.first() {
            Some(keyed) => Self::parse_token_amount(&keyed.account.data).map(Some),
            None => Ok(None),
        }
    }

    async fn get_account_data(&self, address: &Pubkey) -> Result<Option<Vec<u8>>, GatewayError> {
        let response = self
            .client
            .get_account_with_commitment(address, self.client.commitment())
            .await
            .map_err(|e| GatewayError::Rpc(format!("Failed to get account: {}", e)))?;

        Ok(response.value.map(|account| account.data))
    }

    async fn send_raw_transaction(&self, wire_transaction: &[u8]) -> Result<Signature, GatewayError> {
        let encoded = BASE64_STANDARD.encode(wire_transaction);
        let params = json!([
            encoded,
            {
                "encoding": "base64",
                "skipPreflight": true,
                "preflightCommitment": CommitmentLevel::Confirmed,
            }
        ]);

        let signature: String = self
            .client
            .send(RpcRequest::SendTransaction, params)
            .await
            .map_err(|e| GatewayError::Rpc(format!("sendTransaction failed: {}", e)))?;

        Signature::from_str(&signature)
            .map_err(|e| GatewayError::InvalidResponse(format!("signature {}: {}", signature, e)))
    }

    async fn send_versioned_transaction(&self, transaction: &VersionedTransaction) -> Result<Signature, GatewayError> {
        let config = RpcSendTransactionConfig {
            preflight_commitment: Some(CommitmentLevel::Confirmed),
            ..RpcSendTransactionConfig::default()
        };

        self.client
            .send_transaction_with_config(transaction, config)
            .await
            .map_err(|e| GatewayError::Rpc(format!("sendTransaction failed: {}", e)))
    }

    async fn confirm_transaction(&self, signature: &Signature) -> Result<(), GatewayError> {
        let deadline = tokio::time::Instant::now() + self.confirm_timeout;

        loop {
            let status = self
                .client
                .get_signature_status_with_commitment(signature, CommitmentConfig::confirmed())
                .await
                .map_err(|e| GatewayError::Rpc(format!("Failed to get signature status: {}", e)))?;

            match status {
                Some(Ok(())) => return Ok(()),
                Some(Err(err)) => {
                    return Err(GatewayError::TransactionFailed {
                        signature: signature.to_string(),
                        reason: err.to_string(),
                    })
                }
                None => debug!("{} not yet confirmed", signature),
            }

            if tokio::time::Instant::now() + self.confirm_poll_interval > deadline {
                return Err(GatewayError::ConfirmationTimeout(signature.to_string()));
            }
            tokio::time::sleep(self.confirm_poll_interval).await;
        }
    }
}
