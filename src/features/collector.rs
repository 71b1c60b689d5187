use crate::core::events::TransferIntent;
use crate::traits::ChainDataProvider;
use chrono::{Datelike, TimeZone, Timelike, Utc};
use log::warn;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Number of slots the scoring service expects
pub const FEATURE_COUNT: usize = 18;

/// Slot indices into the feature vector. The order is part of the wire
/// contract with the scoring service and must not be reshuffled.
pub mod slot {
    pub const SENDER_BALANCE: usize = 0;
    pub const SENDER_TX_COUNT: usize = 1;
    pub const RECIPIENT_IS_CONTRACT: usize = 2;
    pub const NETWORK_GAS_PRICE: usize = 3;
    pub const VALUE_NATIVE: usize = 4;
    pub const INTENT_GAS_PRICE: usize = 5;
    pub const VALUE_TO_BALANCE_RATIO: usize = 6;
    pub const GAS_PRICE_RATIO: usize = 7;
    pub const HOUR_OF_DAY: usize = 8;
    pub const DAY_OF_WEEK: usize = 9;
    pub const IS_NEW_SENDER: usize = 10;
    pub const IS_EXPERIENCED_SENDER: usize = 11;
    pub const IS_WEEKEND: usize = 12;
    pub const IS_NIGHT: usize = 13;
    pub const LOW_BALANCE_TIER: usize = 14;
    pub const MID_BALANCE_TIER: usize = 15;
    pub const HIGH_BALANCE_TIER: usize = 16;
    pub const HIGH_VALUE_FLAG: usize = 17;
}

// Safe defaults substituted when a chain read fails. The balance default
// is deliberately high so a provider outage never manufactures a
// high value-to-balance ratio, and the tx-count default sits between the
// new-sender and experienced-sender thresholds.
const DEFAULT_BALANCE: f64 = 1000.0;
const DEFAULT_TX_COUNT: u64 = 100;

const NEW_SENDER_MAX_TX: u64 = 10;
const EXPERIENCED_SENDER_MIN_TX: u64 = 100;
const LOW_BALANCE_MAX: f64 = 0.1;
const HIGH_BALANCE_MIN: f64 = 10.0;
const HIGH_VALUE_MIN: f64 = 1.0;

/// Fixed-shape input consumed by the scoring service.
/// Invariant: always fully populated; a missing chain read is replaced
/// by a safe default, never left null.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector([f64; FEATURE_COUNT]);

impl FeatureVector {
    pub fn get(&self, slot: usize) -> f64 {
        self.0[slot]
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    pub fn len(&self) -> usize {
        FEATURE_COUNT
    }

    pub fn is_empty(&self) -> bool {
        false
    }
}

/// Gathers the chain-observable facts needed for scoring.
/// `collect` never fails outward: every underlying read is attempted
/// independently and degraded reads fall back to documented defaults.
pub struct FeatureCollector {
    chain: Arc<dyn ChainDataProvider>,
}

impl FeatureCollector {
    pub fn new(chain: Arc<dyn ChainDataProvider>) -> Self {
        Self { chain }
    }

    pub async fn collect(&self, intent: &TransferIntent) -> FeatureVector {
        // All four reads run concurrently; the scoring request is not
        // issued until every one has completed or fallen back.
        let (balance, tx_count, code, network_gas) = tokio::join!(
            self.chain.balance(intent.from),
            self.chain.transaction_count(intent.from),
            self.chain.code_at(intent.to),
            self.chain.gas_price(),
        );

        let balance = match balance {
            Ok(b) => b.to_f64(),
            Err(e) => {
                warn!("balance read failed for {}: {} (using default)", intent.from, e);
                DEFAULT_BALANCE
            }
        };
        let tx_count = match tx_count {
            Ok(c) => c,
            Err(e) => {
                warn!(
                    "transaction count read failed for {}: {} (using default)",
                    intent.from, e
                );
                DEFAULT_TX_COUNT
            }
        };
        let recipient_is_contract = match code {
            Ok(code) => !code.is_empty(),
            Err(e) => {
                warn!("code read failed for {}: {} (assuming not a contract)", intent.to, e);
                false
            }
        };
        let intent_gas = intent.gas_price_gwei.to_f64();
        let network_gas = match network_gas {
            Ok(g) => g.to_f64(),
            Err(e) => {
                warn!("gas price read failed: {} (using intent gas price)", e);
                intent_gas
            }
        };

        let value = intent.value_native.to_f64();
        let value_to_balance = if balance > 0.0 { value / balance } else { 1.0 };
        let gas_ratio = if network_gas > 0.0 {
            intent_gas / network_gas
        } else {
            1.0
        };

        let submitted = Utc
            .timestamp_millis_opt(intent.submitted_at as i64)
            .single()
            .unwrap_or_else(Utc::now);
        let hour = submitted.hour() as f64;
        let day_of_week = submitted.weekday().num_days_from_monday() as f64;
        let is_weekend = day_of_week >= 5.0;
        let is_night = hour < 6.0 || hour >= 22.0;

        let mut v = [0.0f64; FEATURE_COUNT];
        v[slot::SENDER_BALANCE] = balance;
        v[slot::SENDER_TX_COUNT] = tx_count as f64;
        v[slot::RECIPIENT_IS_CONTRACT] = flag(recipient_is_contract);
        v[slot::NETWORK_GAS_PRICE] = network_gas;
        v[slot::VALUE_NATIVE] = value;
        v[slot::INTENT_GAS_PRICE] = intent_gas;
        v[slot::VALUE_TO_BALANCE_RATIO] = value_to_balance;
        v[slot::GAS_PRICE_RATIO] = gas_ratio;
        v[slot::HOUR_OF_DAY] = hour;
        v[slot::DAY_OF_WEEK] = day_of_week;
        v[slot::IS_NEW_SENDER] = flag(tx_count < NEW_SENDER_MAX_TX);
        v[slot::IS_EXPERIENCED_SENDER] = flag(tx_count > EXPERIENCED_SENDER_MIN_TX);
        v[slot::IS_WEEKEND] = flag(is_weekend);
        v[slot::IS_NIGHT] = flag(is_night);
        v[slot::LOW_BALANCE_TIER] = flag(balance < LOW_BALANCE_MAX);
        v[slot::MID_BALANCE_TIER] = flag((LOW_BALANCE_MAX..=HIGH_BALANCE_MIN).contains(&balance));
        v[slot::HIGH_BALANCE_TIER] = flag(balance > HIGH_BALANCE_MIN);
        v[slot::HIGH_VALUE_FLAG] = flag(value > HIGH_VALUE_MIN);

        FeatureVector(v)
    }
}

fn flag(b: bool) -> f64 {
    if b {
        1.0
    } else {
        0.0
    }
}
