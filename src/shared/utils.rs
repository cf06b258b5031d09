//! Utility functions and helpers

/// Format amount with proper decimals
pub fn format_amount(amount: u64, decimals: u8) -> String {
    let value = amount as f64 / 10_f64.powi(decimals as i32);
    format!("{:.6}", value)
}

/// Relative change between two prices as a fraction (0.2 = +20%)
pub fn profit_fraction(buy_price: f64, sell_price: f64) -> f64 {
    if buy_price > 0.0 {
        (sell_price - buy_price) / buy_price
    } else {
        0.0
    }
}

/// Generate unique ID
pub fn generate_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Current wall-clock time in milliseconds since the Unix epoch
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profit_fraction() {
        assert!((profit_fraction(1.0, 1.2) - 0.2).abs() < 1e-12);
        assert!((profit_fraction(2.0, 1.0) + 0.5).abs() < 1e-12);
        assert_eq!(profit_fraction(0.0, 1.0), 0.0);
    }

    #[test]
    fn test_format_amount() {
        assert_eq!(format_amount(1_500_000, 6), "1.500000");
    }
}
