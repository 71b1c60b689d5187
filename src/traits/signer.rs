use crate::types::{Address, Amount};
use async_trait::async_trait;
use thiserror::Error;

/// Transaction hash returned by the signing collaborator
pub type TxHash = String;

#[derive(Debug, Clone, Error)]
pub enum SignerError {
    /// The user declined the signature prompt
    #[error("user rejected signing")]
    Rejected,
    #[error("signer failed: {0}")]
    Other(String),
}

/// Trait for the signing/broadcast collaborator.
/// Invoked only from the Approved gate state.
#[async_trait]
pub trait TransactionSigner: Send + Sync {
    async fn send_transfer(&self, to: Address, value: Amount) -> Result<TxHash, SignerError>;
}
