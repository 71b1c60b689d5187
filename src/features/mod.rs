pub mod collector;

pub use collector::{FeatureCollector, FeatureVector, FEATURE_COUNT};
