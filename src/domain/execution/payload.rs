//! Swap transaction payloads returned by the aggregator

use base64::{engine::general_purpose::STANDARD as BASE64_STANDARD, Engine};
use solana_sdk::{
    message::VersionedMessage,
    pubkey::Pubkey,
    signature::{Signature, Signer},
    transaction::{Transaction, VersionedTransaction},
};

use crate::shared::errors::SubmissionError;

/// Base64-encoded unsigned transaction as produced by `POST /swap`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwapTransactionPayload(String);

impl SwapTransactionPayload {
    pub fn new(encoded: impl Into<String>) -> Self {
        Self(encoded.into())
    }

    /// Decode the wire bytes and classify them by message version
    pub fn decode(&self) -> Result<SwapTransaction, SubmissionError> {
        let bytes = BASE64_STANDARD
            .decode(self.0.trim())
            .map_err(|e| SubmissionError::Decode(format!("invalid base64: {}", e)))?;
        SwapTransaction::from_wire(&bytes)
    }
}

/// The two wire formats a swap transaction can arrive in
#[derive(Debug, Clone)]
pub enum SwapTransaction {
    Legacy(Transaction),
    Versioned(VersionedTransaction),
}

impl SwapTransaction {
    /// A message whose first byte has the high bit set is versioned (v0);
    /// `VersionedMessage` deserialization performs exactly that check.
    pub fn from_wire(bytes: &[u8]) -> Result<Self, SubmissionError> {
        let VersionedTransaction { signatures, message } = bincode::deserialize(bytes)
            .map_err(|e| SubmissionError::Decode(format!("invalid transaction bytes: {}", e)))?;

        match message {
            VersionedMessage::Legacy(message) => Ok(SwapTransaction::Legacy(Transaction { signatures, message })),
            message @ VersionedMessage::V0(_) => Ok(SwapTransaction::Versioned(VersionedTransaction { signatures, message })),
        }
    }

    /// Add the signer's signature, keeping the blockhash the aggregator embedded
    pub fn sign(&mut self, signer: &dyn Signer) -> Result<(), SubmissionError> {
        match self {
            SwapTransaction::Legacy(tx) => {
                let message_bytes = tx.message.serialize();
                let required = tx.message.header.num_required_signatures as usize;
                place_signature(signer, &message_bytes, &tx.message.account_keys, required, &mut tx.signatures)
            }
            SwapTransaction::Versioned(tx) => {
                let message_bytes = tx.message.serialize();
                let required = tx.message.header().num_required_signatures as usize;
                place_signature(signer, &message_bytes, tx.message.static_account_keys(), required, &mut tx.signatures)
            }
        }
    }
}

fn place_signature(
    signer: &dyn Signer,
    message_bytes: &[u8],
    account_keys: &[Pubkey],
    required: usize,
    signatures: &mut Vec<Signature>,
) -> Result<(), SubmissionError> {
    let signer_key = signer.try_pubkey().map_err(|e| SubmissionError::Signing(e.to_string()))?;
    let index = account_keys
        .iter()
        .take(required)
        .position(|key| *key == signer_key)
        .ok_or_else(|| SubmissionError::Signing(format!("{} is not a required signer", signer_key)))?;

    if signatures.len() < required {
        signatures.resize(required, Signature::default());
    }

    signatures[index] = signer
        .try_sign_message(message_bytes)
        .map_err(|e| SubmissionError::Signing(e.to_string()))?;
    Ok(())
}
