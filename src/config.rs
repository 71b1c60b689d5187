use std::time::Duration;

/// Default scoring endpoint (the hosted fraud-detection model)
pub const DEFAULT_SCORING_URL: &str =
    "https://ml-fraud-transaction-detection.onrender.com/predict";

/// Default master deadline for one assessment
pub const DEFAULT_DEADLINE_MS: u64 = 8_000;

/// Runtime configuration, loaded from environment variables with
/// sensible defaults so a bare checkout runs against the hosted service.
#[derive(Debug, Clone)]
pub struct Config {
    pub scoring_url: String,
    pub scoring_deadline: Duration,
    pub audit_capacity: usize,
    pub environment: String,
}

impl Config {
    /// Read configuration from the environment.
    ///
    /// - `SCORING_URL` — scoring service endpoint
    /// - `SCORING_DEADLINE_MS` — master deadline in milliseconds
    /// - `AUDIT_CAPACITY` — decision record cap
    /// - `ENVIRONMENT` — deployment tag, informational
    pub fn from_env() -> Self {
        let scoring_url =
            std::env::var("SCORING_URL").unwrap_or_else(|_| DEFAULT_SCORING_URL.to_string());
        let deadline_ms = std::env::var("SCORING_DEADLINE_MS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(DEFAULT_DEADLINE_MS);
        let audit_capacity = std::env::var("AUDIT_CAPACITY")
            .ok()
            .and_then(|v| v.parse::<usize>().ok())
            .unwrap_or(crate::store::audit_log::DEFAULT_CAPACITY);
        let environment =
            std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string());

        Self {
            scoring_url,
            scoring_deadline: Duration::from_millis(deadline_ms),
            audit_capacity,
            environment,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            scoring_url: DEFAULT_SCORING_URL.to_string(),
            scoring_deadline: Duration::from_millis(DEFAULT_DEADLINE_MS),
            audit_capacity: crate::store::audit_log::DEFAULT_CAPACITY,
            environment: "development".to_string(),
        }
    }
}
