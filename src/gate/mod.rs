use crate::core::events::{GateState, RiskOutcome};
use log::info;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GateError {
    /// Re-entrancy guard: a second submit while a prior assessment is
    /// still in flight for this gate
    #[error("an assessment is already in progress")]
    AlreadyAssessing,
    #[error("transition not allowed from {0:?}")]
    InvalidTransition(GateState),
}

/// Finite-state machine turning a risk outcome plus user input into a
/// go/no-go. One gate per form/session; `Approved` is the only state from
/// which the signing collaborator may be invoked.
#[derive(Debug)]
pub struct DecisionGate {
    state: GateState,
    user_overrode: bool,
}

impl DecisionGate {
    pub fn new() -> Self {
        Self {
            state: GateState::Idle,
            user_overrode: false,
        }
    }

    pub fn state(&self) -> GateState {
        self.state
    }

    /// Whether the user reached Approved by overriding a hard block
    pub fn user_overrode(&self) -> bool {
        self.user_overrode
    }

    /// `Idle --submit--> Assessing`. Rejects re-entrant submits.
    pub fn begin(&mut self) -> Result<(), GateError> {
        match self.state {
            GateState::Assessing => Err(GateError::AlreadyAssessing),
            GateState::Idle => {
                self.state = GateState::Assessing;
                self.user_overrode = false;
                Ok(())
            }
            s => Err(GateError::InvalidTransition(s)),
        }
    }

    /// `Assessing --outcome--> Blocked | NeedsConfirmation`.
    ///
    /// A blocking outcome (Fraud, or Unknown from timeout/fallback) hard-
    /// blocks unless the recipient is explicitly trusted, in which case the
    /// decision is softened to a confirmable notice. Non-blocking outcomes
    /// always require one explicit confirmation before signing.
    pub fn resolve(
        &mut self,
        outcome: &RiskOutcome,
        recipient_trusted: bool,
    ) -> Result<GateState, GateError> {
        if self.state != GateState::Assessing {
            return Err(GateError::InvalidTransition(self.state));
        }

        self.state = if outcome.is_blocking() && !recipient_trusted {
            GateState::Blocked
        } else {
            GateState::NeedsConfirmation
        };

        info!(
            "assessment resolved: {:?}/{:?} (score {}) trusted={} -> {:?}",
            outcome.label, outcome.source, outcome.score, recipient_trusted, self.state
        );
        Ok(self.state)
    }

    /// `NeedsConfirmation --user proceeds--> Approved`
    pub fn proceed(&mut self) -> Result<GateState, GateError> {
        match self.state {
            GateState::NeedsConfirmation => {
                self.state = GateState::Approved;
                Ok(self.state)
            }
            s => Err(GateError::InvalidTransition(s)),
        }
    }

    /// `Blocked --user explicitly overrides--> Approved`, always recorded
    pub fn override_block(&mut self) -> Result<GateState, GateError> {
        match self.state {
            GateState::Blocked => {
                self.state = GateState::Approved;
                self.user_overrode = true;
                info!("user overrode a hard block");
                Ok(self.state)
            }
            s => Err(GateError::InvalidTransition(s)),
        }
    }

    /// `NeedsConfirmation | Blocked --user cancels--> Cancelled`. Also used
    /// when the signer reports a user rejection after approval.
    pub fn cancel(&mut self) -> Result<GateState, GateError> {
        match self.state {
            GateState::NeedsConfirmation | GateState::Blocked | GateState::Approved => {
                self.state = GateState::Cancelled;
                Ok(self.state)
            }
            s => Err(GateError::InvalidTransition(s)),
        }
    }

    /// Return a terminal gate to Idle for a new intent
    pub fn reset(&mut self) -> Result<(), GateError> {
        match self.state {
            GateState::Idle | GateState::Approved | GateState::Cancelled => {
                self.state = GateState::Idle;
                self.user_overrode = false;
                Ok(())
            }
            s => Err(GateError::InvalidTransition(s)),
        }
    }
}

impl Default for DecisionGate {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::events::RiskLabel;

    fn fraud() -> RiskOutcome {
        RiskOutcome::from_service(RiskLabel::Fraud, "fraud detected")
    }

    fn safe() -> RiskOutcome {
        RiskOutcome::from_service(RiskLabel::Safe, "ok")
    }

    #[test]
    fn test_reentrancy_guard() {
        let mut gate = DecisionGate::new();
        gate.begin().unwrap();
        assert_eq!(gate.begin(), Err(GateError::AlreadyAssessing));
    }

    #[test]
    fn test_fraud_untrusted_blocks() {
        let mut gate = DecisionGate::new();
        gate.begin().unwrap();
        assert_eq!(gate.resolve(&fraud(), false).unwrap(), GateState::Blocked);
    }

    #[test]
    fn test_fraud_trusted_softens_to_confirmation() {
        let mut gate = DecisionGate::new();
        gate.begin().unwrap();
        assert_eq!(
            gate.resolve(&fraud(), true).unwrap(),
            GateState::NeedsConfirmation
        );
    }

    #[test]
    fn test_timeout_untrusted_blocks() {
        let mut gate = DecisionGate::new();
        gate.begin().unwrap();
        assert_eq!(
            gate.resolve(&RiskOutcome::timed_out(8000), false).unwrap(),
            GateState::Blocked
        );
    }

    #[test]
    fn test_safe_needs_confirmation_then_approval() {
        let mut gate = DecisionGate::new();
        gate.begin().unwrap();
        gate.resolve(&safe(), false).unwrap();
        assert_eq!(gate.proceed().unwrap(), GateState::Approved);
        assert!(!gate.user_overrode());
    }

    #[test]
    fn test_override_from_block_is_recorded() {
        let mut gate = DecisionGate::new();
        gate.begin().unwrap();
        gate.resolve(&fraud(), false).unwrap();
        assert_eq!(gate.override_block().unwrap(), GateState::Approved);
        assert!(gate.user_overrode());
    }

    #[test]
    fn test_cannot_proceed_from_blocked() {
        let mut gate = DecisionGate::new();
        gate.begin().unwrap();
        gate.resolve(&fraud(), false).unwrap();
        assert_eq!(
            gate.proceed(),
            Err(GateError::InvalidTransition(GateState::Blocked))
        );
    }

    #[test]
    fn test_cancel_paths() {
        let mut gate = DecisionGate::new();
        gate.begin().unwrap();
        gate.resolve(&fraud(), false).unwrap();
        assert_eq!(gate.cancel().unwrap(), GateState::Cancelled);

        let mut gate = DecisionGate::new();
        gate.begin().unwrap();
        gate.resolve(&safe(), false).unwrap();
        assert_eq!(gate.cancel().unwrap(), GateState::Cancelled);
    }

    #[test]
    fn test_reset_only_from_terminal() {
        let mut gate = DecisionGate::new();
        gate.begin().unwrap();
        assert!(gate.reset().is_err());

        gate.resolve(&safe(), false).unwrap();
        gate.proceed().unwrap();
        gate.reset().unwrap();
        assert_eq!(gate.state(), GateState::Idle);

        // Reusable for the next intent
        gate.begin().unwrap();
        assert_eq!(gate.state(), GateState::Assessing);
    }
}
