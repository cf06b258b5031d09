use async_trait::async_trait;
use reqwest::{Client, Response};
use solana_sdk::pubkey::Pubkey;
use std::time::Duration;
use tracing::{debug, info, warn};

use super::types::{Quote, QuoteRequest, SwapRequest, SwapResponse};
use super::SwapAggregator;
use crate::domain::execution::SwapTransactionPayload;
use crate::shared::errors::AggregatorError;

const UNREADABLE_BODY: &str = "<unreadable body>";

/// Jupiter v6 HTTP client
pub struct JupiterClient {
    http_client: Client,
    base_url: String,
}

impl JupiterClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, AggregatorError> {
        let http_client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http_client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }
}

/// Body of a failed response, for logs and errors
async fn error_body(response: Response) -> String {
    response.text().await.ok().unwrap_or_else(|| UNREADABLE_BODY.to_string())
}

#[async_trait]
impl SwapAggregator for JupiterClient {
    async fn get_quote(&self, request: &QuoteRequest) -> Result<Option<Quote>, AggregatorError> {
        let url = format!("{}/quote", self.base_url);
        debug!("🔍 Requesting quote {} -> {} for {}", request.input_mint, request.output_mint, request.amount);

        let response = self.http_client.get(&url).query(&request.query_params()).send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = error_body(response).await;
            warn!("⚠️ Jupiter quote returned status {}: {}", status, body);
            return Ok(None);
        }

        let quote: Quote = response
            .json()
            .await
            .map_err(|e| AggregatorError::InvalidResponse(format!("quote: {}", e)))?;

        if quote.out_amount_raw().unwrap_or(0) == 0 || quote.route_len() == Some(0) {
            info!("Jupiter returned an empty route for {}", request.output_mint);
            return Ok(None);
        }

        Ok(Some(quote))
    }

    async fn build_swap_transaction(
        &self,
        quote: &Quote,
        user_public_key: &Pubkey,
    ) -> Result<SwapTransactionPayload, AggregatorError> {
        let url = format!("{}/swap", self.base_url);
        let body = SwapRequest {
            quote_response: quote,
            user_public_key: user_public_key.to_string(),
            wrap_and_unwrap_sol: true,
        };

        let response = self.http_client.post(&url).json(&body).send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = error_body(response).await;
            return Err(AggregatorError::Status { status: status.as_u16(), body });
        }

        let swap: SwapResponse = response
            .json()
            .await
            .map_err(|e| AggregatorError::InvalidResponse(format!("swap: {}", e)))?;

        if let Some(height) = swap.last_valid_block_height {
            debug!("Swap transaction valid until block height {}", height);
        }
        Ok(SwapTransactionPayload::new(swap.swap_transaction))
    }
}
