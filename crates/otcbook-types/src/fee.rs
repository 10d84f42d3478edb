//! Fee policy: basis-point rates, fee splits, and the per-market fee config.
//!
//! Fees are floor-divided, so rounding always favours the payer and
//! `net + fee == amount` holds for every split.

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::constants::{BPS_DENOMINATOR, MAX_FEE_BPS};
use crate::{Address, Amount, OtcbookError, Result};

/// A fee rate in basis points (1 bps = 0.01%).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "u16", into = "u16")]
pub struct BasisPoints(u16);

impl BasisPoints {
    pub const ZERO: Self = Self(0);

    /// Validated constructor.
    ///
    /// # Errors
    /// Returns `InvalidFee` above 10 000 bps.
    pub fn new(bps: u16) -> Result<Self> {
        if bps > MAX_FEE_BPS {
            return Err(OtcbookError::InvalidFee { bps });
        }
        Ok(Self(bps))
    }

    #[must_use]
    pub fn get(self) -> u16 {
        self.0
    }

    /// The rate as a percentage, e.g. 125 bps → `1.25`.
    #[must_use]
    pub fn as_percent(self) -> Decimal {
        Decimal::new(i64::from(self.0), 2)
    }

    /// Split `amount` into what the counterparty receives and the fee.
    ///
    /// Computes `floor(amount * bps / 10000)` without forming the full
    /// product, so no amount can overflow.
    #[must_use]
    pub fn split(self, amount: Amount) -> FeeSplit {
        let denom = Amount::from(BPS_DENOMINATOR);
        let bps = Amount::from(self.0);
        let fee = (amount / denom) * bps + (amount % denom) * bps / denom;
        FeeSplit {
            net: amount - fee,
            fee,
        }
    }
}

impl TryFrom<u16> for BasisPoints {
    type Error = OtcbookError;

    fn try_from(bps: u16) -> Result<Self> {
        Self::new(bps)
    }
}

impl From<BasisPoints> for u16 {
    fn from(bps: BasisPoints) -> Self {
        bps.0
    }
}

impl fmt::Display for BasisPoints {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}bps", self.0)
    }
}

/// Result of applying a fee rate to one amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeSplit {
    /// Delivered to the counterparty.
    pub net: Amount,
    /// Delivered to the fee recipient.
    pub fee: Amount,
}

impl FeeSplit {
    #[must_use]
    pub fn gross(&self) -> Amount {
        self.net + self.fee
    }
}

/// Both fee legs of one fill.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FillFees {
    /// Maker fee, charged on the take side (taker → maker payment).
    pub maker: FeeSplit,
    /// Taker fee, charged on the give side (collateral → taker).
    pub taker: FeeSplit,
}

/// Fee rates and recipient of one market instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeConfig {
    pub maker_fee: BasisPoints,
    pub taker_fee: BasisPoints,
    pub recipient: Address,
}

impl FeeConfig {
    /// # Errors
    /// Returns `InvalidFee` if either rate exceeds 10 000 bps.
    pub fn new(maker_fee_bps: u16, taker_fee_bps: u16, recipient: Address) -> Result<Self> {
        Ok(Self {
            maker_fee: BasisPoints::new(maker_fee_bps)?,
            taker_fee: BasisPoints::new(taker_fee_bps)?,
            recipient,
        })
    }

    /// Fees for a fill delivering `give` of collateral against `take` of
    /// payment.
    #[must_use]
    pub fn quote(&self, give: Amount, take: Amount) -> FillFees {
        FillFees {
            maker: self.maker_fee.split(take),
            taker: self.taker_fee.split(give),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_percent_of_round_amounts() {
        let bps = BasisPoints::new(100).unwrap();
        assert_eq!(bps.split(1_000), FeeSplit { net: 990, fee: 10 });
        assert_eq!(
            bps.split(1_000_000),
            FeeSplit {
                net: 990_000,
                fee: 10_000
            }
        );
    }

    #[test]
    fn floor_goes_to_payer() {
        let bps = BasisPoints::new(100).unwrap();
        // 99 * 100 / 10000 = 0.99 → 0
        assert_eq!(bps.split(99), FeeSplit { net: 99, fee: 0 });
        // 199 * 100 / 10000 = 1.99 → 1
        assert_eq!(bps.split(199), FeeSplit { net: 198, fee: 1 });
    }

    #[test]
    fn zero_and_full_rates() {
        assert_eq!(BasisPoints::ZERO.split(12_345).fee, 0);
        let full = BasisPoints::new(MAX_FEE_BPS).unwrap();
        assert_eq!(full.split(12_345), FeeSplit { net: 0, fee: 12_345 });
    }

    #[test]
    fn rate_above_max_rejected() {
        let err = BasisPoints::new(10_001).unwrap_err();
        assert_eq!(err, OtcbookError::InvalidFee { bps: 10_001 });
    }

    #[test]
    fn split_never_overflows() {
        let bps = BasisPoints::new(9_999).unwrap();
        let split = bps.split(Amount::MAX);
        assert_eq!(split.gross(), Amount::MAX);
        assert!(split.fee < Amount::MAX);
    }

    #[test]
    fn split_conserves_random_amounts() {
        for _ in 0..1_000 {
            let amount = Amount::from(rand::random::<u64>());
            let bps = BasisPoints::new(rand::random::<u16>() % (MAX_FEE_BPS + 1)).unwrap();
            let split = bps.split(amount);
            assert_eq!(split.net + split.fee, amount);
            assert_eq!(split.fee, amount * Amount::from(bps.get()) / 10_000);
        }
    }

    #[test]
    fn serde_rejects_out_of_range_rate() {
        let bps: BasisPoints = serde_json::from_str("250").unwrap();
        assert_eq!(bps.get(), 250);
        assert!(serde_json::from_str::<BasisPoints>("10001").is_err());
    }

    #[test]
    fn as_percent() {
        assert_eq!(
            BasisPoints::new(125).unwrap().as_percent(),
            Decimal::new(125, 2)
        );
        assert_eq!(format!("{}", BasisPoints::new(30).unwrap()), "30bps");
    }

    #[test]
    fn quote_applies_each_side() {
        let cfg = FeeConfig::new(100, 200, Address::ZERO).unwrap();
        let fees = cfg.quote(1_000_000, 1_000);
        assert_eq!(fees.maker, FeeSplit { net: 990, fee: 10 });
        assert_eq!(
            fees.taker,
            FeeSplit {
                net: 980_000,
                fee: 20_000
            }
        );
    }
}
