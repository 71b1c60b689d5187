use crate::core::events::DecisionRecord;
use crate::traits::{KvStore, StoreError};
use log::debug;
use std::sync::Arc;

const AUDIT_LOG_KEY: &str = "audit_log";

/// Default record cap; oldest records are evicted first
pub const DEFAULT_CAPACITY: usize = 100;

/// Bounded, append-only record of assessed transfers and their terminal
/// decisions. Ring-buffer semantics: fixed capacity, FIFO eviction.
/// Readers receive clones and cannot mutate stored entries.
#[derive(Clone)]
pub struct AuditLog {
    store: Arc<dyn KvStore>,
    capacity: usize,
}

impl AuditLog {
    pub fn new(store: Arc<dyn KvStore>) -> Self {
        Self::with_capacity(store, DEFAULT_CAPACITY)
    }

    pub fn with_capacity(store: Arc<dyn KvStore>, capacity: usize) -> Self {
        Self { store, capacity }
    }

    fn load(&self) -> Result<Vec<DecisionRecord>, StoreError> {
        match self.store.get(AUDIT_LOG_KEY)? {
            None => Ok(Vec::new()),
            Some(raw) => serde_json::from_str(&raw).map_err(|source| StoreError::Corrupt {
                key: AUDIT_LOG_KEY.to_string(),
                source,
            }),
        }
    }

    /// Append one record, evicting the oldest past capacity
    pub fn record(&self, record: DecisionRecord) -> Result<(), StoreError> {
        let mut records = self.load()?;
        debug!(
            "audit: intent {} -> {:?} (overrode={})",
            record.intent.id, record.final_state, record.user_overrode
        );
        records.push(record);
        if records.len() > self.capacity {
            let excess = records.len() - self.capacity;
            records.drain(..excess);
        }
        let raw = serde_json::to_string(&records).expect("decision records always serialize");
        self.store.set(AUDIT_LOG_KEY, raw)
    }

    /// Up to `n` records, most recent first
    pub fn recent(&self, n: usize) -> Result<Vec<DecisionRecord>, StoreError> {
        let records = self.load()?;
        Ok(records.into_iter().rev().take(n).collect())
    }

    pub fn len(&self) -> Result<usize, StoreError> {
        Ok(self.load()?.len())
    }

    pub fn is_empty(&self) -> Result<bool, StoreError> {
        Ok(self.len()? == 0)
    }
}
