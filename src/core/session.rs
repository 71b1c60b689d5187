use crate::types::Address;
use tokio::sync::broadcast;

/// Wallet-session lifecycle events. Components that care about the
/// connected account subscribe here instead of listening to ambient
/// global signals.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    Connected { account: Address },
    AccountChanged { account: Address },
    Disconnected,
}

/// Typed event bus owned by the wallet-session context.
///
/// Subscribers get an independent `broadcast::Receiver`; dropping the
/// receiver unsubscribes. Events published with no live subscribers are
/// discarded.
#[derive(Debug, Clone)]
pub struct SessionEvents {
    tx: broadcast::Sender<SessionEvent>,
}

impl SessionEvents {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.tx.subscribe()
    }

    /// Publish an event to all current subscribers. Returns the number
    /// of subscribers that received it.
    pub fn emit(&self, event: SessionEvent) -> usize {
        match self.tx.send(event) {
            Ok(n) => n,
            Err(_) => 0,
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for SessionEvents {
    fn default() -> Self {
        Self::new(16)
    }
}
