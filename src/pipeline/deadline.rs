use crate::core::events::RiskOutcome;
use crate::scoring::ScoringError;
use log::{error, warn};
use std::future::Future;
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::sleep;

/// Create a linked cancellation pair. The racer keeps the signal; the
/// scoring task takes the listener.
pub fn cancel_pair() -> (CancelSignal, CancelListener) {
    let (tx, rx) = watch::channel(false);
    (CancelSignal { tx }, CancelListener { rx })
}

/// Sender half of the cancellation signal
#[derive(Debug)]
pub struct CancelSignal {
    tx: watch::Sender<bool>,
}

impl CancelSignal {
    /// Fire the signal. Best-effort: does not wait for the scoring task
    /// to acknowledge.
    pub fn cancel(&self) {
        let _ = self.tx.send(true);
    }
}

/// Receiver half, observed inside the scoring task
#[derive(Debug, Clone)]
pub struct CancelListener {
    rx: watch::Receiver<bool>,
}

impl CancelListener {
    pub fn is_cancelled(&self) -> bool {
        *self.rx.borrow()
    }

    /// Resolves once the signal fires. If the signal side is dropped
    /// without firing, stays pending so the scoring call resolves on its
    /// own merits.
    pub async fn cancelled(&mut self) {
        loop {
            if *self.rx.borrow_and_update() {
                return;
            }
            if self.rx.changed().await.is_err() {
                std::future::pending::<()>().await;
            }
        }
    }
}

/// Races one scoring call against a hard wall-clock deadline.
///
/// Two named tasks joined first-to-complete: the spawned scoring call and
/// the deadline timer. Whichever finishes first decides the outcome; on a
/// deadline win the in-flight call is signalled for cancellation and its
/// eventual late result is discarded.
#[derive(Debug, Clone, Copy)]
pub struct DeadlineRacer {
    deadline: Duration,
}

impl DeadlineRacer {
    pub fn new(deadline: Duration) -> Self {
        Self { deadline }
    }

    pub fn deadline(&self) -> Duration {
        self.deadline
    }

    /// Resolve the race to a terminal `RiskOutcome`. Never errors: a
    /// failed scoring call folds into a risk-leaning fallback outcome and
    /// a deadline win forces the blocking timeout outcome.
    pub async fn race<F>(&self, scoring: F, cancel: CancelSignal) -> RiskOutcome
    where
        F: Future<Output = Result<RiskOutcome, ScoringError>> + Send + 'static,
    {
        let scoring_task = tokio::spawn(scoring);

        tokio::select! {
            joined = scoring_task => match joined {
                Ok(Ok(outcome)) => outcome,
                Ok(Err(err)) => {
                    warn!("scoring call failed before deadline: {}", err);
                    RiskOutcome::fallback(format!("scoring unavailable: {}", err))
                }
                Err(join_err) => {
                    error!("scoring task aborted: {}", join_err);
                    RiskOutcome::fallback("scoring task aborted")
                }
            },
            _ = sleep(self.deadline) => {
                cancel.cancel();
                warn!(
                    "master deadline fired after {:?}; forcing blocking outcome",
                    self.deadline
                );
                RiskOutcome::timed_out(self.deadline.as_millis() as u64)
            }
        }
    }
}
