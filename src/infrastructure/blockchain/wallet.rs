//! Trading wallet loading

use solana_sdk::signature::Keypair;

use crate::shared::errors::ConfigError;

pub const PRIVATE_KEY_ENV: &str = "PRIVATE_KEY";

/// Decode a base58 secret key (64 bytes: secret followed by public key)
pub fn load_keypair(private_key: &str) -> Result<Keypair, ConfigError> {
    let keypair_bytes = bs58::decode(private_key.trim())
        .into_vec()
        .map_err(|e| ConfigError::InvalidPrivateKey(e.to_string()))?;

    Keypair::from_bytes(&keypair_bytes).map_err(|e| ConfigError::InvalidPrivateKey(e.to_string()))
}

/// Read `PRIVATE_KEY` from the environment, loading `.env` first
pub fn keypair_from_env() -> Result<Keypair, ConfigError> {
    dotenv::dotenv().ok();
    let private_key = std::env::var(PRIVATE_KEY_ENV).map_err(|_| ConfigError::MissingPrivateKey)?;
    if private_key.trim().is_empty() {
        return Err(ConfigError::MissingPrivateKey);
    }
    load_keypair(&private_key)
}

#[cfg(test)]
mod tests {
    use super::*;
    use solana_sdk::signer::Signer;

    #[test]
    fn test_load_keypair_round_trip() {
        let keypair = Keypair::new();
        let encoded = format!(" {}\n", bs58::encode(keypair.to_bytes()).into_string());

        let loaded = load_keypair(&encoded).unwrap();
        assert_eq!(loaded.pubkey(), keypair.pubkey());
    }

    #[test]
    fn test_load_keypair_rejects_garbage() {
        assert!(matches!(load_keypair("0OIl"), Err(ConfigError::InvalidPrivateKey(_))));
        let short = bs58::encode([7u8; 16]).into_string();
        assert!(matches!(load_keypair(&short), Err(ConfigError::InvalidPrivateKey(_))));
    }
}
