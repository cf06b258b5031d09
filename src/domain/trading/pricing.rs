//! SOL-per-token prices derived from aggregator quotes

use crate::shared::types::LAMPORTS_PER_SOL;

fn to_ui(raw: u64, decimals: u8) -> f64 {
    raw as f64 / 10_f64.powi(decimals as i32)
}

/// Price paid when swapping `lamports_in` SOL for `tokens_out` raw token units
pub fn buy_price(lamports_in: u64, tokens_out: u64, decimals: u8) -> Option<f64> {
    let tokens = to_ui(tokens_out, decimals);
    if tokens <= 0.0 {
        return None;
    }
    Some((lamports_in as f64 / LAMPORTS_PER_SOL) / tokens)
}

/// Price received when swapping `tokens_in` raw token units for `lamports_out` SOL
pub fn sell_price(tokens_in: u64, decimals: u8, lamports_out: u64) -> Option<f64> {
    let tokens = to_ui(tokens_in, decimals);
    if tokens <= 0.0 {
        return None;
    }
    Some((lamports_out as f64 / LAMPORTS_PER_SOL) / tokens)
}
