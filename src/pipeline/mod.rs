pub mod assessment;
pub mod deadline;

pub use assessment::{PipelineError, Submission, TransferPipeline};
pub use deadline::{cancel_pair, CancelListener, CancelSignal, DeadlineRacer};
