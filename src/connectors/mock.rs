use crate::traits::{ChainDataProvider, ChainError, SignerError, TransactionSigner, TxHash};
use crate::types::{Address, Amount};
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};

/// Mock implementation of ChainDataProvider for testing
#[derive(Debug, Default)]
pub struct MockChainProvider {
    balances: Arc<RwLock<HashMap<Address, Amount>>>,
    tx_counts: Arc<RwLock<HashMap<Address, u64>>>,
    contracts: Arc<RwLock<HashSet<Address>>>,
    gas_price: Arc<RwLock<Option<Amount>>>,
    fail_all: Arc<RwLock<bool>>,
}

impl MockChainProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn set_balance(&self, address: Address, balance: Amount) {
        self.balances.write().await.insert(address, balance);
    }

    pub async fn set_transaction_count(&self, address: Address, count: u64) {
        self.tx_counts.write().await.insert(address, count);
    }

    pub async fn mark_contract(&self, address: Address) {
        self.contracts.write().await.insert(address);
    }

    pub async fn set_gas_price(&self, gas_price: Amount) {
        *self.gas_price.write().await = Some(gas_price);
    }

    /// Make every read fail, simulating a provider outage
    pub async fn set_fail_all(&self, fail: bool) {
        *self.fail_all.write().await = fail;
    }

    async fn check_up(&self) -> Result<(), ChainError> {
        if *self.fail_all.read().await {
            Err(ChainError::Unreachable("mock provider down".to_string()))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl ChainDataProvider for MockChainProvider {
    async fn balance(&self, address: Address) -> Result<Amount, ChainError> {
        self.check_up().await?;
        Ok(self
            .balances
            .read()
            .await
            .get(&address)
            .copied()
            .unwrap_or(Amount::ZERO))
    }

    async fn transaction_count(&self, address: Address) -> Result<u64, ChainError> {
        self.check_up().await?;
        Ok(self.tx_counts.read().await.get(&address).copied().unwrap_or(0))
    }

    async fn code_at(&self, address: Address) -> Result<Vec<u8>, ChainError> {
        self.check_up().await?;
        if self.contracts.read().await.contains(&address) {
            Ok(vec![0x60, 0x80, 0x60, 0x40])
        } else {
            Ok(Vec::new())
        }
    }

    async fn gas_price(&self) -> Result<Amount, ChainError> {
        self.check_up().await?;
        (*self.gas_price.read().await)
            .ok_or_else(|| ChainError::InvalidResponse("gas price not set".to_string()))
    }
}

/// Mock implementation of TransactionSigner for testing
#[derive(Debug)]
pub struct MockSigner {
    reject: bool,
    sent: Arc<Mutex<Vec<(Address, Amount)>>>,
    counter: Arc<Mutex<u64>>,
}

impl MockSigner {
    /// Signer that approves every prompt
    pub fn accepting() -> Self {
        Self {
            reject: false,
            sent: Arc::new(Mutex::new(Vec::new())),
            counter: Arc::new(Mutex::new(1)),
        }
    }

    /// Signer whose user rejects every prompt
    pub fn rejecting() -> Self {
        Self {
            reject: true,
            sent: Arc::new(Mutex::new(Vec::new())),
            counter: Arc::new(Mutex::new(1)),
        }
    }

    /// Transfers actually broadcast, for assertions
    pub async fn sent(&self) -> Vec<(Address, Amount)> {
        self.sent.lock().await.clone()
    }
}

#[async_trait]
impl TransactionSigner for MockSigner {
    async fn send_transfer(&self, to: Address, value: Amount) -> Result<TxHash, SignerError> {
        if self.reject {
            return Err(SignerError::Rejected);
        }
        let mut counter = self.counter.lock().await;
        let tx_hash = format!("0xtx{:064x}", *counter);
        *counter += 1;
        self.sent.lock().await.push((to, value));
        Ok(tx_hash)
    }
}
