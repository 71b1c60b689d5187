use crate::types::{Address, Amount};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Timestamp in milliseconds
pub type Timestamp = u64;

/// Fixed score assigned to a service "Fraud" verdict
pub const SCORE_FRAUD: u8 = 90;
/// Fixed score assigned to a service "Suspicious" verdict
pub const SCORE_SUSPICIOUS: u8 = 60;
/// Fixed score assigned to a service safe verdict
pub const SCORE_SAFE: u8 = 10;
/// Blocking-leaning score when the scoring call failed outright
pub const SCORE_FALLBACK: u8 = 75;
/// Blocking-leaning score when the master deadline fired first
pub const SCORE_TIMEOUT: u8 = 85;

/// A user-declared request to transfer value from one account to another.
/// Immutable; one per submission; discarded after the terminal decision.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransferIntent {
    pub id: Uuid,
    pub from: Address,
    pub to: Address,
    pub value_native: Amount,
    pub gas_price_gwei: Amount,
    pub submitted_at: Timestamp,
}

impl TransferIntent {
    pub fn new(from: Address, to: Address, value_native: Amount, gas_price_gwei: Amount) -> Self {
        Self {
            id: Uuid::new_v4(),
            from,
            to,
            value_native,
            gas_price_gwei,
            submitted_at: chrono::Utc::now().timestamp_millis() as u64,
        }
    }
}

/// Normalized risk verdict. Upstream vocabulary ("Fraud"/"Non-Fraud",
/// casing variants) is folded into these four at the scoring boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskLabel {
    Safe,
    Suspicious,
    Fraud,
    Unknown,
}

/// Where the verdict came from. A record keeps this even when the
/// decision was softened by the trust list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskSource {
    ScoringService,
    FallbackHeuristic,
    Timeout,
}

/// The normalized result of one assessment, independent of whether it
/// came from the scoring service, a fallback, or a timeout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskOutcome {
    pub label: RiskLabel,
    pub score: u8,
    pub source: RiskSource,
    pub explanation: String,
}

impl RiskOutcome {
    /// Outcome for a verdict the scoring service actually returned
    pub fn from_service(label: RiskLabel, explanation: impl Into<String>) -> Self {
        let score = match label {
            RiskLabel::Fraud => SCORE_FRAUD,
            RiskLabel::Suspicious => SCORE_SUSPICIOUS,
            RiskLabel::Safe => SCORE_SAFE,
            RiskLabel::Unknown => SCORE_FALLBACK,
        };
        Self {
            label,
            score,
            source: RiskSource::ScoringService,
            explanation: explanation.into(),
        }
    }

    /// Risk-leaning outcome when the scoring call itself failed.
    /// Failure is a risk signal, never auto-safe.
    pub fn fallback(explanation: impl Into<String>) -> Self {
        Self {
            label: RiskLabel::Unknown,
            score: SCORE_FALLBACK,
            source: RiskSource::FallbackHeuristic,
            explanation: explanation.into(),
        }
    }

    /// Forced outcome when the master deadline fired before the scoring
    /// call resolved. An assessment that cannot complete in bounded time
    /// must never be treated as safe.
    pub fn timed_out(deadline_ms: u64) -> Self {
        Self {
            label: RiskLabel::Unknown,
            score: SCORE_TIMEOUT,
            source: RiskSource::Timeout,
            explanation: format!("risk assessment timed out after {}ms", deadline_ms),
        }
    }

    /// Whether this outcome hard-blocks an untrusted recipient.
    /// Fraud blocks; Unknown (timeout or fallback) blocks fail-closed.
    pub fn is_blocking(&self) -> bool {
        matches!(self.label, RiskLabel::Fraud | RiskLabel::Unknown)
    }
}

/// Decision gate states, one submission at a time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GateState {
    Idle,
    Assessing,
    Blocked,
    NeedsConfirmation,
    Approved,
    Cancelled,
}

/// Append-only record of one assessed transfer and its terminal decision
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionRecord {
    pub id: Uuid,
    pub intent: TransferIntent,
    pub outcome: RiskOutcome,
    pub final_state: GateState,
    pub user_overrode: bool,
    pub timestamp: Timestamp,
}

impl DecisionRecord {
    pub fn new(
        intent: TransferIntent,
        outcome: RiskOutcome,
        final_state: GateState,
        user_overrode: bool,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            intent,
            outcome,
            final_state,
            user_overrode,
            timestamp: chrono::Utc::now().timestamp_millis() as u64,
        }
    }
}
