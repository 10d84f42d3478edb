//! Configuration for an OTCBook engine instance.
//!
//! One [`EngineConfig`] describes one deployed instance: who administers it,
//! the address its custody account lives at, the fee schedule it starts
//! with, and the signing domain its signed orders are bound to.

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_DOMAIN_NAME, DEFAULT_DOMAIN_VERSION, DEFAULT_MAKER_FEE_BPS, DEFAULT_TAKER_FEE_BPS,
};
use crate::{Address, FeeConfig, OtcbookError, Result, SigningDomain};

fn default_domain_name() -> String {
    DEFAULT_DOMAIN_NAME.to_string()
}

fn default_domain_version() -> String {
    DEFAULT_DOMAIN_VERSION.to_string()
}

fn default_maker_fee_bps() -> u16 {
    DEFAULT_MAKER_FEE_BPS
}

fn default_taker_fee_bps() -> u16 {
    DEFAULT_TAKER_FEE_BPS
}

/// Configuration for a single engine instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Administrator allowed to pause and change fees.
    pub owner: Address,
    /// Custody account of this instance; also the signing domain's
    /// verifying contract.
    pub instance: Address,
    /// Network identifier bound into signed orders.
    pub chain_id: u64,
    #[serde(default = "default_domain_name")]
    pub domain_name: String,
    #[serde(default = "default_domain_version")]
    pub domain_version: String,
    #[serde(default = "default_maker_fee_bps")]
    pub maker_fee_bps: u16,
    #[serde(default = "default_taker_fee_bps")]
    pub taker_fee_bps: u16,
    pub fee_recipient: Address,
}

impl EngineConfig {
    /// Config with default fees and domain.
    #[must_use]
    pub fn new(owner: Address, instance: Address, chain_id: u64, fee_recipient: Address) -> Self {
        Self {
            owner,
            instance,
            chain_id,
            domain_name: default_domain_name(),
            domain_version: default_domain_version(),
            maker_fee_bps: DEFAULT_MAKER_FEE_BPS,
            taker_fee_bps: DEFAULT_TAKER_FEE_BPS,
            fee_recipient,
        }
    }

    /// Parse and validate a JSON config document.
    ///
    /// # Errors
    /// `Serialization` on malformed JSON, `Configuration` on invalid values.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// # Errors
    /// Returns `Configuration` describing the first invalid field.
    pub fn validate(&self) -> Result<()> {
        if self.owner.is_zero() {
            return Err(OtcbookError::Configuration("owner must not be zero".into()));
        }
        if self.instance.is_zero() {
            return Err(OtcbookError::Configuration(
                "instance address must not be zero".into(),
            ));
        }
        if self.instance == self.fee_recipient {
            return Err(OtcbookError::Configuration(
                "fee recipient must differ from the custody account".into(),
            ));
        }
        self.fee_config()
            .map_err(|e| OtcbookError::Configuration(e.to_string()))?;
        Ok(())
    }

    /// Initial fee schedule.
    ///
    /// # Errors
    /// Returns `InvalidFee` if either rate exceeds 10 000 bps.
    pub fn fee_config(&self) -> Result<FeeConfig> {
        FeeConfig::new(self.maker_fee_bps, self.taker_fee_bps, self.fee_recipient)
    }

    #[must_use]
    pub fn signing_domain(&self) -> SigningDomain {
        SigningDomain {
            name: self.domain_name.clone(),
            version: self.domain_version.clone(),
            chain_id: self.chain_id,
            verifying_contract: self.instance,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> EngineConfig {
        EngineConfig::new(
            Address([1u8; 32]),
            Address([2u8; 32]),
            31_337,
            Address([3u8; 32]),
        )
    }

    #[test]
    fn defaults() {
        let cfg = sample();
        assert_eq!(cfg.maker_fee_bps, 100);
        assert_eq!(cfg.taker_fee_bps, 100);
        assert_eq!(cfg.domain_name, DEFAULT_DOMAIN_NAME);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn from_json_applies_defaults() {
        let json = format!(
            r#"{{"owner":"{}","instance":"{}","chain_id":1,"fee_recipient":"{}"}}"#,
            Address([1u8; 32]),
            Address([2u8; 32]),
            Address([3u8; 32]),
        );
        let cfg = EngineConfig::from_json_str(&json).unwrap();
        assert_eq!(cfg.chain_id, 1);
        assert_eq!(cfg.maker_fee_bps, DEFAULT_MAKER_FEE_BPS);
        assert_eq!(cfg.domain_version, DEFAULT_DOMAIN_VERSION);
    }

    #[test]
    fn rejects_excessive_fee() {
        let mut cfg = sample();
        cfg.taker_fee_bps = 20_000;
        let err = cfg.validate().unwrap_err();
        assert!(matches!(err, OtcbookError::Configuration(_)));
    }

    #[test]
    fn rejects_zero_owner() {
        let mut cfg = sample();
        cfg.owner = Address::ZERO;
        assert!(matches!(
            cfg.validate(),
            Err(OtcbookError::Configuration(_))
        ));
    }

    #[test]
    fn rejects_recipient_equal_to_custody() {
        let mut cfg = sample();
        cfg.fee_recipient = cfg.instance;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn malformed_json_is_serialization_error() {
        let err = EngineConfig::from_json_str("{").unwrap_err();
        assert!(matches!(err, OtcbookError::Serialization(_)));
    }

    #[test]
    fn signing_domain_binds_instance() {
        let cfg = sample();
        let domain = cfg.signing_domain();
        assert_eq!(domain.verifying_contract, cfg.instance);
        assert_eq!(domain.chain_id, 31_337);
    }

    #[test]
    fn serde_roundtrip() {
        let cfg = sample();
        let json = serde_json::to_string(&cfg).unwrap();
        let back: EngineConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(cfg, back);
    }
}
