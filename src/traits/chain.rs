use crate::types::{Address, Amount};
use async_trait::async_trait;
use thiserror::Error;

/// Errors from the chain data provider. The feature collector never
/// propagates these; each failed read is replaced by a safe default.
#[derive(Debug, Clone, Error)]
pub enum ChainError {
    #[error("chain provider unreachable: {0}")]
    Unreachable(String),
    #[error("chain provider returned an invalid response: {0}")]
    InvalidResponse(String),
}

/// Trait for read-only chain queries
/// This allows the feature collector to be independent of the specific
/// node/provider implementation.
#[async_trait]
pub trait ChainDataProvider: Send + Sync {
    /// Account balance in native units
    async fn balance(&self, address: Address) -> Result<Amount, ChainError>;

    /// Number of transactions sent from the address
    async fn transaction_count(&self, address: Address) -> Result<u64, ChainError>;

    /// Bytecode at the address; empty for externally-owned accounts
    async fn code_at(&self, address: Address) -> Result<Vec<u8>, ChainError>;

    /// Current network gas price in gwei
    async fn gas_price(&self) -> Result<Amount, ChainError>;
}
