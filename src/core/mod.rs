pub mod events;
pub mod session;
pub mod validation;

pub use events::{
    DecisionRecord, GateState, RiskLabel, RiskOutcome, RiskSource, TransferIntent,
};
pub use session::{SessionEvent, SessionEvents};
pub use validation::{parse_recipient, validate_intent, ValidationError};
