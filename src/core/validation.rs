use crate::core::events::TransferIntent;
use crate::types::{Address, AddressParseError};
use thiserror::Error;

/// Rejections raised before any network call. These are surfaced inline
/// and never reach the decision gate.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("malformed address: {0}")]
    MalformedAddress(#[from] AddressParseError),
    #[error("recipient is the zero address")]
    ZeroAddress,
    #[error("recipient equals sender")]
    SelfTransfer,
    #[error("transfer amount must be positive")]
    NonPositiveAmount,
}

/// Parse a recipient address as entered in a form field. The entry point
/// for string input; an intent built from the result still goes through
/// `validate_intent` for the cross-field checks.
pub fn parse_recipient(raw: &str) -> Result<Address, ValidationError> {
    let address: Address = raw.trim().parse()?;
    if address.is_zero() {
        return Err(ValidationError::ZeroAddress);
    }
    Ok(address)
}

/// Validate an intent before the pipeline touches the network.
/// Invalid input never issues a chain read or a scoring call.
pub fn validate_intent(intent: &TransferIntent) -> Result<(), ValidationError> {
    if intent.to.is_zero() {
        return Err(ValidationError::ZeroAddress);
    }
    if intent.to == intent.from {
        return Err(ValidationError::SelfTransfer);
    }
    if !intent.value_native.is_positive() {
        return Err(ValidationError::NonPositiveAmount);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Address, Amount};
    use std::str::FromStr;

    fn addr(s: &str) -> Address {
        Address::from_str(s).unwrap()
    }

    fn intent(from: &str, to: &str, value: &str) -> TransferIntent {
        TransferIntent::new(
            addr(from),
            addr(to),
            Amount::from_str(value).unwrap(),
            Amount::from_str("20").unwrap(),
        )
    }

    const SENDER: &str = "0x742d35cc6634c0532925a3b844bc454e4438f44e";
    const RECIPIENT: &str = "0x8c89a6bf53346a146192c0be2f32b8c5f4f269c0";

    #[test]
    fn test_zero_address_rejected() {
        let i = intent(
            SENDER,
            "0x0000000000000000000000000000000000000000",
            "1.0",
        );
        assert_eq!(validate_intent(&i), Err(ValidationError::ZeroAddress));
    }

    #[test]
    fn test_self_transfer_rejected() {
        let i = intent(SENDER, SENDER, "1.0");
        assert_eq!(validate_intent(&i), Err(ValidationError::SelfTransfer));
    }

    #[test]
    fn test_non_positive_amount_rejected() {
        assert_eq!(
            validate_intent(&intent(SENDER, RECIPIENT, "0")),
            Err(ValidationError::NonPositiveAmount)
        );
        assert_eq!(
            validate_intent(&intent(SENDER, RECIPIENT, "-0.5")),
            Err(ValidationError::NonPositiveAmount)
        );
    }

    #[test]
    fn test_valid_intent_passes() {
        assert!(validate_intent(&intent(SENDER, RECIPIENT, "0.25")).is_ok());
    }

    #[test]
    fn test_parse_recipient_accepts_padded_input() {
        assert_eq!(parse_recipient(&format!("  {} ", RECIPIENT)), Ok(addr(RECIPIENT)));
    }

    #[test]
    fn test_parse_recipient_rejects_malformed_input() {
        assert!(matches!(
            parse_recipient("742d35cc6634c0532925a3b844bc454e4438f44e"),
            Err(ValidationError::MalformedAddress(
                AddressParseError::MissingPrefix(_)
            ))
        ));
        assert!(matches!(
            parse_recipient("0x742d35"),
            Err(ValidationError::MalformedAddress(
                AddressParseError::WrongLength(6)
            ))
        ));
        assert_eq!(
            parse_recipient("0x0000000000000000000000000000000000000000"),
            Err(ValidationError::ZeroAddress)
        );
    }
}
