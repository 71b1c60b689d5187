pub mod config;
pub mod connectors;
pub mod core;
pub mod features;
pub mod gate;
pub mod pipeline;
pub mod scoring;
pub mod store;
pub mod traits;
pub mod types;

pub use crate::config::Config;
pub use crate::connectors::{MockChainProvider, MockSigner};
pub use crate::core::{
    DecisionRecord, GateState, RiskLabel, RiskOutcome, RiskSource, SessionEvent, SessionEvents,
    TransferIntent, ValidationError,
};
pub use crate::features::{FeatureCollector, FeatureVector, FEATURE_COUNT};
pub use crate::gate::{DecisionGate, GateError};
pub use crate::pipeline::{
    CancelListener, CancelSignal, DeadlineRacer, PipelineError, Submission, TransferPipeline,
};
pub use crate::scoring::{RiskScoringClient, ScoringError};
pub use crate::store::{AuditLog, FileKvStore, MemoryKvStore, TrustListStore};
pub use crate::traits::{
    ChainDataProvider, ChainError, KvStore, SignerError, StoreError, TransactionSigner, TxHash,
};
pub use crate::types::{Address, Amount};

/// Initialize logging for binaries and examples
pub fn init_logging(level: log::LevelFilter) -> Result<(), fern::InitError> {
    fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "[{} {} {}] {}",
                chrono::Utc::now().format("%Y-%m-%d %H:%M:%S"),
                record.level(),
                record.target(),
                message
            ))
        })
        .level(level)
        .chain(std::io::stdout())
        .apply()?;
    Ok(())
}
