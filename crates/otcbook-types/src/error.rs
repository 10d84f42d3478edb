//! Error types for the OTCBook markets.
//!
//! All errors use the `OB_ERR_` prefix convention for easy grepping in logs.
//! Error codes are grouped by subsystem:
//! - 1xx: Order lifecycle errors
//! - 2xx: Value, ledger and custody errors
//! - 3xx: Signature errors
//! - 4xx: Access-gate errors
//! - 9xx: General / internal errors
//!
//! Every error aborts the operation that raised it with no state change.

use thiserror::Error;

use crate::{Address, Amount, AssetId, OrderId, Timestamp};

/// Central error enum for all OTCBook operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OtcbookError {
    // =================================================================
    // Order Errors (1xx)
    // =================================================================
    /// No order with this id has been created.
    #[error("OB_ERR_100: Order not found: {0}")]
    OrderNotFound(OrderId),

    /// The give and take assets are unusable together.
    #[error("OB_ERR_101: Invalid asset: {reason}")]
    InvalidAsset { reason: String },

    /// A zero quantity was supplied where a positive one is required.
    #[error("OB_ERR_102: Invalid amounts: {reason}")]
    InvalidAmounts { reason: String },

    /// The proportional take amount of a fill floors below the minimum.
    #[error("OB_ERR_103: Amount too low: fill computes {computed}, minimum is {minimum}")]
    AmountTooLow { computed: Amount, minimum: Amount },

    /// The fill request exceeds what remains open on the order.
    #[error("OB_ERR_104: Amount too high or closed order: requested {requested}, remaining {remaining}")]
    AmountTooHighOrClosed { requested: Amount, remaining: Amount },

    /// The order's validity window has passed.
    #[error("OB_ERR_105: Order expired at {expire_time} (now {now})")]
    OrderExpired { expire_time: Timestamp, now: Timestamp },

    /// The order is already fully filled, cancelled, or consumed.
    #[error("OB_ERR_106: Closed order")]
    ClosedOrder,

    /// Only the order's maker may cancel it.
    #[error("OB_ERR_107: Caller {caller} is not the maker")]
    NotMaker { caller: Address },

    /// A signed order offers nothing.
    #[error("OB_ERR_108: Can't swap zero amount")]
    ZeroAmount,

    // =================================================================
    // Value / Ledger Errors (2xx)
    // =================================================================
    /// Attached native value doesn't match what the operation requires.
    #[error("OB_ERR_200: Invalid native value: expected {expected}, supplied {supplied}")]
    InvalidNativeValue { expected: Amount, supplied: Amount },

    /// A holder can't cover a transfer.
    #[error("OB_ERR_201: Insufficient {asset} balance for {holder}: need {needed}, have {available}")]
    InsufficientBalance {
        asset: AssetId,
        holder: Address,
        needed: Amount,
        available: Amount,
    },

    /// The engine was not approved for enough of a token.
    #[error("OB_ERR_202: Insufficient allowance on {token} from {owner}: need {needed}, have {available}")]
    InsufficientAllowance {
        token: Address,
        owner: Address,
        needed: Amount,
        available: Amount,
    },

    /// An amount computation left the representable range.
    #[error("OB_ERR_203: Arithmetic overflow")]
    ArithmeticOverflow,

    /// Supply conservation invariant violated. Critical.
    #[error("OB_ERR_205: Supply invariant violation: {reason}")]
    SupplyInvariantViolation { reason: String },

    // =================================================================
    // Signature Errors (3xx)
    // =================================================================
    /// The signature does not verify against the maker over this exact order.
    #[error("OB_ERR_300: Bad signature")]
    BadSignature,

    // =================================================================
    // Access Errors (4xx)
    // =================================================================
    /// Create and fill are disabled while the market is paused.
    #[error("OB_ERR_400: Market is paused")]
    Paused,

    /// Administrative call from someone other than the owner.
    #[error("OB_ERR_401: Caller {caller} is not the owner")]
    NotOwner { caller: Address },

    /// Fee rate outside `0..=10000` bps.
    #[error("OB_ERR_402: Invalid fee: {bps} bps exceeds maximum")]
    InvalidFee { bps: u16 },

    // =================================================================
    // General (9xx)
    // =================================================================
    /// Serialization / deserialization error.
    #[error("OB_ERR_901: Serialization error: {0}")]
    Serialization(String),

    /// Configuration error (invalid config file, missing fields, etc.).
    #[error("OB_ERR_902: Configuration error: {0}")]
    Configuration(String),
}

impl OtcbookError {
    /// The `OB_ERR_` code of this error, for structured log fields.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::OrderNotFound(_) => "OB_ERR_100",
            Self::InvalidAsset { .. } => "OB_ERR_101",
            Self::InvalidAmounts { .. } => "OB_ERR_102",
            Self::AmountTooLow { .. } => "OB_ERR_103",
            Self::AmountTooHighOrClosed { .. } => "OB_ERR_104",
            Self::OrderExpired { .. } => "OB_ERR_105",
            Self::ClosedOrder => "OB_ERR_106",
            Self::NotMaker { .. } => "OB_ERR_107",
            Self::ZeroAmount => "OB_ERR_108",
            Self::InvalidNativeValue { .. } => "OB_ERR_200",
            Self::InsufficientBalance { .. } => "OB_ERR_201",
            Self::InsufficientAllowance { .. } => "OB_ERR_202",
            Self::ArithmeticOverflow => "OB_ERR_203",
            Self::SupplyInvariantViolation { .. } => "OB_ERR_205",
            Self::BadSignature => "OB_ERR_300",
            Self::Paused => "OB_ERR_400",
            Self::NotOwner { .. } => "OB_ERR_401",
            Self::InvalidFee { .. } => "OB_ERR_402",
            Self::Serialization(_) => "OB_ERR_901",
            Self::Configuration(_) => "OB_ERR_902",
        }
    }
}

/// Crate-wide `Result` alias.
pub type Result<T> = std::result::Result<T, OtcbookError>;

impl From<serde_json::Error> for OtcbookError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_contains_prefix() {
        let err = OtcbookError::OrderNotFound(OrderId(7));
        let msg = format!("{err}");
        assert!(msg.starts_with("OB_ERR_100"), "Got: {msg}");
        assert!(msg.contains("order:7"));
    }

    #[test]
    fn native_value_display() {
        let err = OtcbookError::InvalidNativeValue {
            expected: 1_000_000,
            supplied: 1,
        };
        let msg = format!("{err}");
        assert!(msg.contains("OB_ERR_200"));
        assert!(msg.contains("1000000"));
    }

    #[test]
    fn code_matches_display() {
        let errors = vec![
            OtcbookError::ClosedOrder,
            OtcbookError::Paused,
            OtcbookError::BadSignature,
            OtcbookError::ZeroAmount,
            OtcbookError::ArithmeticOverflow,
            OtcbookError::NotOwner {
                caller: Address::ZERO,
            },
            OtcbookError::AmountTooLow {
                computed: 0,
                minimum: 1,
            },
            OtcbookError::Configuration("missing instance".into()),
        ];
        for err in errors {
            let msg = format!("{err}");
            assert!(
                msg.starts_with(err.code()),
                "code {} missing from: {msg}",
                err.code()
            );
        }
    }

    #[test]
    fn serde_json_error_maps_to_serialization() {
        let err: OtcbookError = serde_json::from_str::<u64>("not json").unwrap_err().into();
        assert!(matches!(err, OtcbookError::Serialization(_)));
    }
}
