use crate::core::events::RiskLabel;

/// Single normalization point for the scoring service's string verdicts.
///
/// The upstream vocabulary has drifted over time ("Fraud", "Non-Fraud",
/// "non_fraud", mixed casing); everything it has ever emitted is mapped
/// here and nowhere else. Anything unrecognized becomes `Unknown`, which
/// downstream treats as risk-leaning.
pub fn normalize_label(raw: &str) -> RiskLabel {
    let canon: String = raw
        .trim()
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .collect::<String>()
        .to_ascii_lowercase();

    match canon.as_str() {
        "fraud" | "fraudulent" => RiskLabel::Fraud,
        "suspicious" | "medium" | "mediumrisk" => RiskLabel::Suspicious,
        "nonfraud" | "notfraud" | "safe" | "legit" | "legitimate" | "low" | "lowrisk" => {
            RiskLabel::Safe
        }
        _ => RiskLabel::Unknown,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_labels() {
        assert_eq!(normalize_label("Fraud"), RiskLabel::Fraud);
        assert_eq!(normalize_label("Non-Fraud"), RiskLabel::Safe);
        assert_eq!(normalize_label("Suspicious"), RiskLabel::Suspicious);
    }

    #[test]
    fn test_vocabulary_drift() {
        assert_eq!(normalize_label("FRAUD"), RiskLabel::Fraud);
        assert_eq!(normalize_label(" non_fraud "), RiskLabel::Safe);
        assert_eq!(normalize_label("NOT FRAUD"), RiskLabel::Safe);
        assert_eq!(normalize_label("Legitimate"), RiskLabel::Safe);
    }

    #[test]
    fn test_unrecognized_maps_to_unknown() {
        assert_eq!(normalize_label(""), RiskLabel::Unknown);
        assert_eq!(normalize_label("banana"), RiskLabel::Unknown);
        assert_eq!(normalize_label("error"), RiskLabel::Unknown);
    }
}
