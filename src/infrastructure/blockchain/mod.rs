//! Solana RPC access, wallet and token metadata

pub mod gateway;
pub mod rpc_client;
pub mod token_metadata;
pub mod wallet;

pub use gateway::ChainGateway;
pub use rpc_client::SolanaRpcClient;
pub use token_metadata::TokenRegistry;
