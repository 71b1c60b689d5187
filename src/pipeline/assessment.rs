use crate::core::events::{DecisionRecord, GateState, RiskOutcome, TransferIntent};
use crate::core::validation::{validate_intent, ValidationError};
use crate::features::FeatureCollector;
use crate::gate::{DecisionGate, GateError};
use crate::pipeline::deadline::{cancel_pair, DeadlineRacer};
use crate::scoring::RiskScoringClient;
use crate::store::{AuditLog, TrustListStore};
use crate::traits::{ChainDataProvider, SignerError, StoreError, TransactionSigner, TxHash};
use log::{info, warn};
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Gate(#[from] GateError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Signer(#[from] SignerError),
}

/// One assessed transfer: the intent, its gate, and the outcome the race
/// resolved to. Owned exclusively by the submission that created it.
#[derive(Debug)]
pub struct Submission {
    intent: TransferIntent,
    gate: DecisionGate,
    outcome: RiskOutcome,
    recipient_trusted: bool,
    recorded: bool,
}

impl Submission {
    pub fn intent(&self) -> &TransferIntent {
        &self.intent
    }

    pub fn outcome(&self) -> &RiskOutcome {
        &self.outcome
    }

    pub fn state(&self) -> GateState {
        self.gate.state()
    }

    pub fn recipient_trusted(&self) -> bool {
        self.recipient_trusted
    }

    pub fn user_overrode(&self) -> bool {
        self.gate.user_overrode()
    }
}

/// Orchestrates one submission end to end: validation, feature
/// collection, the scoring/deadline race, gate resolution, signing, and
/// the audit record. The pipeline holds no intent-scoped state; concurrent
/// submissions are fully independent.
pub struct TransferPipeline {
    collector: FeatureCollector,
    client: Arc<RiskScoringClient>,
    racer: DeadlineRacer,
    trust: TrustListStore,
    audit: AuditLog,
}

impl TransferPipeline {
    pub fn new(
        chain: Arc<dyn ChainDataProvider>,
        client: RiskScoringClient,
        racer: DeadlineRacer,
        trust: TrustListStore,
        audit: AuditLog,
    ) -> Self {
        Self {
            collector: FeatureCollector::new(chain),
            client: Arc::new(client),
            racer,
            trust,
            audit,
        }
    }

    /// Run the assessment for one intent.
    ///
    /// Validation happens before anything else; invalid input returns
    /// immediately and issues no chain read or scoring call. Every
    /// post-validation failure folds into the outcome, so this method
    /// always resolves to Blocked or NeedsConfirmation for valid input.
    pub async fn submit(&self, intent: TransferIntent) -> Result<Submission, PipelineError> {
        validate_intent(&intent)?;

        let mut gate = DecisionGate::new();
        gate.begin()?;
        info!(
            "assessing intent {}: {} -> {} ({} native)",
            intent.id, intent.from, intent.to, intent.value_native
        );

        let features = self.collector.collect(&intent).await;

        let (signal, listener) = cancel_pair();
        let client = Arc::clone(&self.client);
        let scoring_intent = intent.clone();
        let scoring_features = features.clone();
        let scoring =
            async move { client.score(&scoring_intent, &scoring_features, listener).await };
        let outcome = self.racer.race(scoring, signal).await;

        // Trust softens the presentation but never suppresses assessment.
        // A failed trust read stays fail-closed.
        let recipient_trusted = self.trust.is_trusted(intent.to).unwrap_or_else(|e| {
            warn!("trust list read failed: {} (treating recipient as untrusted)", e);
            false
        });

        gate.resolve(&outcome, recipient_trusted)?;

        Ok(Submission {
            intent,
            gate,
            outcome,
            recipient_trusted,
            recorded: false,
        })
    }

    /// User confirms a NeedsConfirmation notice
    pub fn confirm(&self, submission: &mut Submission) -> Result<GateState, PipelineError> {
        Ok(submission.gate.proceed()?)
    }

    /// User explicitly overrides a hard block ("sign anyway")
    pub fn override_block(&self, submission: &mut Submission) -> Result<GateState, PipelineError> {
        Ok(submission.gate.override_block()?)
    }

    /// User cancels from Blocked or NeedsConfirmation; terminal, recorded
    pub fn cancel(&self, submission: &mut Submission) -> Result<GateState, PipelineError> {
        let state = submission.gate.cancel()?;
        self.record_terminal(submission)?;
        Ok(state)
    }

    /// Invoke the signing collaborator. Only legal from Approved; a user
    /// rejection at the signer transitions to Cancelled. Either way the
    /// terminal decision is recorded exactly once.
    pub async fn sign_and_record<S>(
        &self,
        submission: &mut Submission,
        signer: &S,
    ) -> Result<TxHash, PipelineError>
    where
        S: TransactionSigner + ?Sized,
    {
        if submission.state() != GateState::Approved {
            return Err(GateError::InvalidTransition(submission.state()).into());
        }

        match signer
            .send_transfer(submission.intent.to, submission.intent.value_native)
            .await
        {
            Ok(tx_hash) => {
                info!(
                    "intent {} signed and broadcast: {} (overrode={})",
                    submission.intent.id,
                    tx_hash,
                    submission.user_overrode()
                );
                self.record_terminal(submission)?;
                Ok(tx_hash)
            }
            Err(SignerError::Rejected) => {
                info!("intent {} rejected at the signer", submission.intent.id);
                submission.gate.cancel()?;
                self.record_terminal(submission)?;
                Err(SignerError::Rejected.into())
            }
            // Broadcast infrastructure failures leave the gate Approved so
            // the caller can retry; nothing terminal to record yet.
            Err(other) => Err(other.into()),
        }
    }

    pub fn audit(&self) -> &AuditLog {
        &self.audit
    }

    pub fn trust_list(&self) -> &TrustListStore {
        &self.trust
    }

    fn record_terminal(&self, submission: &mut Submission) -> Result<(), StoreError> {
        if submission.recorded {
            return Ok(());
        }
        let record = DecisionRecord::new(
            submission.intent.clone(),
            submission.outcome.clone(),
            submission.gate.state(),
            submission.gate.user_overrode(),
        );
        self.audit.record(record)?;
        submission.recorded = true;
        Ok(())
    }
}
