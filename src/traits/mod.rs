pub mod chain;
pub mod signer;
pub mod store;

pub use chain::{ChainDataProvider, ChainError};
pub use signer::{SignerError, TransactionSigner, TxHash};
pub use store::{KvStore, StoreError};
