use crate::core::events::{RiskLabel, RiskOutcome, TransferIntent};
use crate::features::collector::slot;
use crate::features::FeatureVector;
use crate::pipeline::deadline::CancelListener;
use crate::scoring::label::normalize_label;
use log::debug;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Failures of the scoring call itself. Timeout is not represented here;
/// the deadline racer owns it.
#[derive(Debug, Error)]
pub enum ScoringError {
    #[error("scoring transport failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("scoring service returned status {0}")]
    Status(reqwest::StatusCode),
    #[error("scoring response malformed: {0}")]
    Malformed(String),
    #[error("scoring call cancelled by deadline")]
    Cancelled,
}

/// Request body the scoring service expects
#[derive(Debug, Clone, Serialize)]
pub struct ScoreRequest {
    pub from_address: String,
    pub to_address: String,
    pub transaction_value: f64,
    pub gas_price: f64,
    pub is_contract_interaction: bool,
    pub acc_holder: String,
    pub features: Vec<f64>,
}

/// Response body: a coarse string verdict plus a free-form type tag
#[derive(Debug, Clone, Deserialize)]
pub struct ScoreResponse {
    pub prediction: String,
    #[serde(rename = "Type", default)]
    pub kind: String,
}

/// Issues exactly one scoring request per invocation. No internal retry
/// loop; retrying against the deadline is the racer's concern, and it
/// chooses not to.
pub struct RiskScoringClient {
    http: reqwest::Client,
    url: String,
}

impl RiskScoringClient {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            url: url.into(),
        }
    }

    pub fn with_client(http: reqwest::Client, url: impl Into<String>) -> Self {
        Self {
            http,
            url: url.into(),
        }
    }

    /// Build the wire payload from an intent and its collected features
    pub fn request_for(intent: &TransferIntent, features: &FeatureVector) -> ScoreRequest {
        ScoreRequest {
            from_address: intent.from.to_string(),
            to_address: intent.to.to_string(),
            transaction_value: intent.value_native.to_f64(),
            gas_price: intent.gas_price_gwei.to_f64(),
            is_contract_interaction: features.get(slot::RECIPIENT_IS_CONTRACT) != 0.0,
            acc_holder: intent.from.to_string(),
            features: features.as_slice().to_vec(),
        }
    }

    /// Send the request and normalize the verdict into a `RiskOutcome`.
    /// Resolves early with `ScoringError::Cancelled` if the deadline racer
    /// fires the cancel signal while the request is in flight.
    pub async fn score(
        &self,
        intent: &TransferIntent,
        features: &FeatureVector,
        mut cancel: CancelListener,
    ) -> Result<RiskOutcome, ScoringError> {
        let request = Self::request_for(intent, features);
        debug!(
            "scoring request for intent {}: {} -> {} ({} native)",
            intent.id, request.from_address, request.to_address, request.transaction_value
        );

        let send = async {
            let response = self.http.post(&self.url).json(&request).send().await?;

            let status = response.status();
            if !status.is_success() {
                return Err(ScoringError::Status(status));
            }

            let body: ScoreResponse = response
                .json()
                .await
                .map_err(|e| ScoringError::Malformed(e.to_string()))?;

            let label = normalize_label(&body.prediction);
            debug!(
                "scoring verdict for intent {}: {:?} (raw: {:?}, type: {:?})",
                intent.id, label, body.prediction, body.kind
            );
            Ok(RiskOutcome::from_service(label, explanation_for(label, &body)))
        };

        tokio::select! {
            result = send => result,
            _ = cancel.cancelled() => Err(ScoringError::Cancelled),
        }
    }
}

fn explanation_for(label: RiskLabel, body: &ScoreResponse) -> String {
    match label {
        RiskLabel::Fraud => {
            if body.kind.is_empty() {
                "scoring service flagged this transfer as fraud".to_string()
            } else {
                format!("scoring service flagged this transfer as fraud ({})", body.kind)
            }
        }
        RiskLabel::Suspicious => "scoring service marked this transfer suspicious".to_string(),
        RiskLabel::Safe => "no significant risk factors detected".to_string(),
        RiskLabel::Unknown => format!(
            "scoring service returned an unrecognized verdict {:?}",
            body.prediction
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::events::RiskSource;
    use crate::features::FeatureCollector;
    use crate::pipeline::deadline::cancel_pair;
    use crate::traits::{ChainDataProvider, ChainError};
    use crate::types::{Address, Amount};
    use async_trait::async_trait;
    use serde_json::json;
    use std::str::FromStr;
    use std::sync::Arc;
    use std::time::Duration;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    struct StubChain;

    #[async_trait]
    impl ChainDataProvider for StubChain {
        async fn balance(&self, _address: Address) -> Result<Amount, ChainError> {
            Ok(Amount::from_str("10.0").unwrap())
        }
        async fn transaction_count(&self, _address: Address) -> Result<u64, ChainError> {
            Ok(42)
        }
        async fn code_at(&self, _address: Address) -> Result<Vec<u8>, ChainError> {
            Ok(Vec::new())
        }
        async fn gas_price(&self) -> Result<Amount, ChainError> {
            Ok(Amount::from_str("20").unwrap())
        }
    }

    fn intent() -> TransferIntent {
        TransferIntent::new(
            Address::from_str("0x742d35cc6634c0532925a3b844bc454e4438f44e").unwrap(),
            Address::from_str("0x8c89a6bf53346a146192c0be2f32b8c5f4f269c0").unwrap(),
            Amount::from_str("5.0").unwrap(),
            Amount::from_str("20").unwrap(),
        )
    }

    async fn features() -> FeatureVector {
        FeatureCollector::new(Arc::new(StubChain))
            .collect(&intent())
            .await
    }

    #[tokio::test]
    async fn test_fraud_verdict() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/predict"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "prediction": "Fraud",
                "Type": "phishing"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = RiskScoringClient::new(format!("{}/predict", server.uri()));
        let (_, listener) = cancel_pair();
        let outcome = client.score(&intent(), &features().await, listener).await.unwrap();

        assert_eq!(outcome.label, RiskLabel::Fraud);
        assert_eq!(outcome.source, RiskSource::ScoringService);
        assert!(outcome.explanation.contains("phishing"));
    }

    #[tokio::test]
    async fn test_non_fraud_verdict() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/predict"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "prediction": "Non-Fraud",
                "Type": "transfer"
            })))
            .mount(&server)
            .await;

        let client = RiskScoringClient::new(format!("{}/predict", server.uri()));
        let (_, listener) = cancel_pair();
        let outcome = client.score(&intent(), &features().await, listener).await.unwrap();

        assert_eq!(outcome.label, RiskLabel::Safe);
        assert!(!outcome.is_blocking());
    }

    #[tokio::test]
    async fn test_non_success_status_is_scoring_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/predict"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let client = RiskScoringClient::new(format!("{}/predict", server.uri()));
        let (_, listener) = cancel_pair();
        let err = client
            .score(&intent(), &features().await, listener)
            .await
            .unwrap_err();

        assert!(matches!(err, ScoringError::Status(s) if s.as_u16() == 503));
    }

    #[tokio::test]
    async fn test_malformed_body_is_scoring_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/predict"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let client = RiskScoringClient::new(format!("{}/predict", server.uri()));
        let (_, listener) = cancel_pair();
        let err = client
            .score(&intent(), &features().await, listener)
            .await
            .unwrap_err();

        assert!(matches!(err, ScoringError::Malformed(_)));
    }

    #[tokio::test]
    async fn test_cancel_signal_interrupts_in_flight_call() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/predict"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"prediction": "Non-Fraud", "Type": ""}))
                    .set_delay(Duration::from_secs(30)),
            )
            .mount(&server)
            .await;

        let client = RiskScoringClient::new(format!("{}/predict", server.uri()));
        let (signal, listener) = cancel_pair();

        let i = intent();
        let f = features().await;
        let call = client.score(&i, &f, listener);
        tokio::pin!(call);

        // Let the request get in flight, then cancel
        tokio::select! {
            _ = &mut call => panic!("call should not resolve yet"),
            _ = tokio::time::sleep(Duration::from_millis(100)) => signal.cancel(),
        }

        let err = call.await.unwrap_err();
        assert!(matches!(err, ScoringError::Cancelled));
    }

    #[tokio::test]
    async fn test_request_payload_shape() {
        let i = intent();
        let f = features().await;
        let request = RiskScoringClient::request_for(&i, &f);

        assert_eq!(request.features.len(), crate::features::FEATURE_COUNT);
        assert_eq!(request.acc_holder, request.from_address);
        assert_eq!(request.transaction_value, 5.0);
        assert!(!request.is_contract_interaction);

        // Field names are the service's wire contract
        let value = serde_json::to_value(&request).unwrap();
        for key in [
            "from_address",
            "to_address",
            "transaction_value",
            "gas_price",
            "is_contract_interaction",
            "acc_holder",
            "features",
        ] {
            assert!(value.get(key).is_some(), "missing key {}", key);
        }
    }
}
