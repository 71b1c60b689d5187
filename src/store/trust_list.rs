use crate::traits::{KvStore, StoreError};
use crate::types::Address;
use log::info;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

const TRUST_LIST_KEY: &str = "trust_list";

/// One explicitly trusted address. Entries never auto-expire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrustListEntry {
    pub address: Address,
    pub added_at: u64,
}

/// Small persisted set of addresses the user has explicitly trusted.
///
/// Trust does not suppress scoring; it only softens how a blocking
/// outcome is presented (hard block vs. confirmable notice).
#[derive(Clone)]
pub struct TrustListStore {
    store: Arc<dyn KvStore>,
}

impl TrustListStore {
    pub fn new(store: Arc<dyn KvStore>) -> Self {
        Self { store }
    }

    fn load(&self) -> Result<Vec<TrustListEntry>, StoreError> {
        match self.store.get(TRUST_LIST_KEY)? {
            None => Ok(Vec::new()),
            Some(raw) => serde_json::from_str(&raw).map_err(|source| StoreError::Corrupt {
                key: TRUST_LIST_KEY.to_string(),
                source,
            }),
        }
    }

    fn save(&self, entries: &[TrustListEntry]) -> Result<(), StoreError> {
        let raw = serde_json::to_string(entries).expect("trust entries always serialize");
        self.store.set(TRUST_LIST_KEY, raw)
    }

    /// Add an address. Idempotent: re-adding keeps the original added_at.
    pub fn add(&self, address: Address) -> Result<(), StoreError> {
        let mut entries = self.load()?;
        if entries.iter().any(|e| e.address == address) {
            return Ok(());
        }
        entries.push(TrustListEntry {
            address,
            added_at: chrono::Utc::now().timestamp_millis() as u64,
        });
        self.save(&entries)?;
        info!("address {} added to trust list", address);
        Ok(())
    }

    /// Remove an address. Idempotent.
    pub fn remove(&self, address: Address) -> Result<(), StoreError> {
        let mut entries = self.load()?;
        let before = entries.len();
        entries.retain(|e| e.address != address);
        if entries.len() != before {
            self.save(&entries)?;
            info!("address {} removed from trust list", address);
        }
        Ok(())
    }

    pub fn is_trusted(&self, address: Address) -> Result<bool, StoreError> {
        Ok(self.load()?.iter().any(|e| e.address == address))
    }

    pub fn entries(&self) -> Result<Vec<TrustListEntry>, StoreError> {
        self.load()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryKvStore;
    use std::str::FromStr;

    fn addr(s: &str) -> Address {
        Address::from_str(s).unwrap()
    }

    const A: &str = "0x742d35cc6634c0532925a3b844bc454e4438f44e";
    const B: &str = "0x8c89a6bf53346a146192c0be2f32b8c5f4f269c0";

    #[test]
    fn test_add_and_query() {
        let trust = TrustListStore::new(Arc::new(MemoryKvStore::new()));
        assert!(!trust.is_trusted(addr(A)).unwrap());

        trust.add(addr(A)).unwrap();
        assert!(trust.is_trusted(addr(A)).unwrap());
        assert!(!trust.is_trusted(addr(B)).unwrap());
    }

    #[test]
    fn test_add_is_idempotent() {
        let trust = TrustListStore::new(Arc::new(MemoryKvStore::new()));
        trust.add(addr(A)).unwrap();
        let first = trust.entries().unwrap()[0].added_at;

        trust.add(addr(A)).unwrap();
        let entries = trust.entries().unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].added_at, first);
    }

    #[test]
    fn test_remove_is_idempotent() {
        let trust = TrustListStore::new(Arc::new(MemoryKvStore::new()));
        trust.add(addr(A)).unwrap();
        trust.remove(addr(A)).unwrap();
        trust.remove(addr(A)).unwrap();
        assert!(!trust.is_trusted(addr(A)).unwrap());
        assert!(trust.entries().unwrap().is_empty());
    }
}
