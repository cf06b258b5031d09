//! Jupiter v6 request and response documents

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::shared::errors::TradeError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SwapMode {
    ExactIn,
    ExactOut,
}

impl SwapMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            SwapMode::ExactIn => "ExactIn",
            SwapMode::ExactOut => "ExactOut",
        }
    }
}

/// Parameters of `GET /quote`
#[derive(Debug, Clone, PartialEq)]
pub struct QuoteRequest {
    pub input_mint: String,
    pub output_mint: String,
    /// Smallest units of the input mint
    pub amount: u64,
    pub slippage_bps: u16,
    pub swap_mode: SwapMode,
    pub only_direct_routes: bool,
}

impl QuoteRequest {
    pub fn query_params(&self) -> Vec<(&'static str, String)> {
        vec![
            ("inputMint", self.input_mint.clone()),
            ("outputMint", self.output_mint.clone()),
            ("amount", self.amount.to_string()),
            ("slippageBps", self.slippage_bps.to_string()),
            ("swapMode", self.swap_mode.as_str().to_string()),
            ("onlyDirectRoutes", self.only_direct_routes.to_string()),
        ]
    }
}

/// Quote document. Fields the bot does not read are kept in `extra` so the
/// quote can be posted back to `/swap` unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quote {
    pub input_mint: String,
    pub output_mint: String,
    #[serde(alias = "inputAmount")]
    pub in_amount: String,
    #[serde(alias = "outputAmount")]
    pub out_amount: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub other_amount_threshold: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub swap_mode: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slippage_bps: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price_impact_pct: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Quote {
    pub fn in_amount_raw(&self) -> Result<u64, TradeError> {
        parse_amount(&self.in_amount)
    }

    pub fn out_amount_raw(&self) -> Result<u64, TradeError> {
        parse_amount(&self.out_amount)
    }

    /// Number of hops, when the aggregator reports a route plan
    pub fn route_len(&self) -> Option<usize> {
        self.extra.get("routePlan").and_then(Value::as_array).map(Vec::len)
    }
}

fn parse_amount(value: &str) -> Result<u64, TradeError> {
    value.parse::<u64>().map_err(|_| TradeError::InvalidQuote(value.to_string()))
}

/// Body of `POST /swap`
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SwapRequest<'a> {
    pub quote_response: &'a Quote,
    pub user_public_key: String,
    pub wrap_and_unwrap_sol: bool,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SwapResponse {
    pub swap_transaction: String,
    #[serde(default)]
    pub last_valid_block_height: Option<u64>,
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    pub fn quote(input_mint: &str, output_mint: &str, in_amount: u64, out_amount: u64) -> Quote {
        Quote {
            input_mint: input_mint.to_string(),
            output_mint: output_mint.to_string(),
            in_amount: in_amount.to_string(),
            out_amount: out_amount.to_string(),
            other_amount_threshold: None,
            swap_mode: Some("ExactIn".to_string()),
            slippage_bps: Some(100),
            price_impact_pct: None,
            extra: Map::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_quote_keeps_unknown_fields_for_swap() {
        let body = json!({
            "inputMint": "So11111111111111111111111111111111111111112",
            "inAmount": "10000000",
            "outputMint": "MintB",
            "outAmount": "500000000",
            "otherAmountThreshold": "495000000",
            "swapMode": "ExactIn",
            "slippageBps": 100,
            "priceImpactPct": "0.01",
            "routePlan": [{ "percent": 100, "swapInfo": { "ammKey": "pool" } }],
            "contextSlot": 123,
            "timeTaken": 0.02
        });

        let quote: Quote = serde_json::from_value(body.clone()).unwrap();
        assert_eq!(quote.in_amount_raw().unwrap(), 10_000_000);
        assert_eq!(quote.out_amount_raw().unwrap(), 500_000_000);
        assert_eq!(quote.route_len(), Some(1));

        let request = SwapRequest {
            quote_response: &quote,
            user_public_key: "Wallet".to_string(),
            wrap_and_unwrap_sol: true,
        };
        let posted = serde_json::to_value(&request).unwrap();
        assert_eq!(posted["quoteResponse"], body);
        assert_eq!(posted["wrapAndUnwrapSol"], true);
        assert_eq!(posted["userPublicKey"], "Wallet");
    }

    #[test]
    fn test_quote_accepts_legacy_amount_names() {
        let quote: Quote = serde_json::from_value(json!({
            "inputMint": "A",
            "outputMint": "B",
            "inputAmount": "1",
            "outputAmount": "2"
        }))
        .unwrap();
        assert_eq!(quote.out_amount, "2");
    }

    #[test]
    fn test_invalid_amount() {
        let mut quote = fixtures::quote("A", "B", 1, 2);
        quote.out_amount = "lots".to_string();
        assert!(matches!(quote.out_amount_raw(), Err(TradeError::InvalidQuote(_))));
    }

    #[test]
    fn test_query_params() {
        let request = QuoteRequest {
            input_mint: "A".to_string(),
            output_mint: "B".to_string(),
            amount: 10_000_000,
            slippage_bps: 100,
            swap_mode: SwapMode::ExactIn,
            only_direct_routes: false,
        };
        let params = request.query_params();
        assert!(params.contains(&("amount", "10000000".to_string())));
        assert!(params.contains(&("onlyDirectRoutes", "false".to_string())));
        assert!(params.contains(&("swapMode", "ExactIn".to_string())));
    }
}
