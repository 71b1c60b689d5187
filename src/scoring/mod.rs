pub mod client;
pub mod label;

pub use client::{RiskScoringClient, ScoreRequest, ScoreResponse, ScoringError};
pub use label::normalize_label;
