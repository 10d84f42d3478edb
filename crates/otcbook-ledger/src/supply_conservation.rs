//! Supply conservation invariant checker.
//!
//! Mathematical invariant enforced by the reference ledger:
//! ```text
//! ∀ asset: Σ balances == Σ minted
//! ```
//!
//! Settlement only ever moves value between holders (maker, taker, fee
//! recipient, engine custody). If the sum drifts, value was created or
//! destroyed somewhere, and that is a critical bug.

use std::collections::HashMap;

use otcbook_types::{Amount, AssetId, OtcbookError, Result};

/// Tracks per-asset issuance and validates conservation against actual
/// holdings.
#[derive(Debug, Clone, Default)]
pub struct SupplyConservation {
    /// Total minted per asset since genesis.
    minted: HashMap<AssetId, Amount>,
}

impl SupplyConservation {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record newly issued supply.
    ///
    /// # Errors
    /// Returns `ArithmeticOverflow` if total issuance would exceed `u128`.
    pub fn record_mint(&mut self, asset: AssetId, amount: Amount) -> Result<()> {
        let total = self.minted.entry(asset).or_insert(0);
        *total = total
            .checked_add(amount)
            .ok_or(OtcbookError::ArithmeticOverflow)?;
        Ok(())
    }

    /// Expected total supply for an asset.
    #[must_use]
    pub fn expected_supply(&self, asset: &AssetId) -> Amount {
        self.minted.get(asset).copied().unwrap_or(0)
    }

    /// Verify that the sum of all holdings matches issuance.
    ///
    /// # Errors
    /// Returns [`OtcbookError::SupplyInvariantViolation`] if actual ≠ expected.
    pub fn verify(&self, asset: &AssetId, actual_supply: Amount) -> Result<()> {
        let expected = self.expected_supply(asset);
        if actual_supply != expected {
            return Err(OtcbookError::SupplyInvariantViolation {
                reason: format!(
                    "Asset {asset}: actual supply {actual_supply} != minted {expected}"
                ),
            });
        }
        Ok(())
    }

    /// All assets with recorded issuance.
    #[must_use]
    pub fn tracked_assets(&self) -> Vec<AssetId> {
        self.minted.keys().copied().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use otcbook_types::Address;

    #[test]
    fn empty_supply_is_zero() {
        let sc = SupplyConservation::new();
        assert_eq!(sc.expected_supply(&AssetId::Native), 0);
        assert!(sc.verify(&AssetId::Native, 0).is_ok());
    }

    #[test]
    fn mints_accumulate() {
        let mut sc = SupplyConservation::new();
        sc.record_mint(AssetId::Native, 1_000).unwrap();
        sc.record_mint(AssetId::Native, 500).unwrap();
        assert_eq!(sc.expected_supply(&AssetId::Native), 1_500);
    }

    #[test]
    fn verify_fails_when_imbalanced() {
        let mut sc = SupplyConservation::new();
        sc.record_mint(AssetId::Native, 10).unwrap();
        let err = sc.verify(&AssetId::Native, 11).unwrap_err();
        assert!(matches!(
            err,
            OtcbookError::SupplyInvariantViolation { .. }
        ));
    }

    #[test]
    fn assets_independent() {
        let mut sc = SupplyConservation::new();
        let token = AssetId::Token(Address::random());
        sc.record_mint(AssetId::Native, 5).unwrap();
        sc.record_mint(token, 50_000).unwrap();
        assert!(sc.verify(&AssetId::Native, 5).is_ok());
        assert!(sc.verify(&token, 50_000).is_ok());
        assert_eq!(sc.tracked_assets().len(), 2);
    }

    #[test]
    fn mint_overflow_rejected() {
        let mut sc = SupplyConservation::new();
        sc.record_mint(AssetId::Native, Amount::MAX).unwrap();
        assert_eq!(
            sc.record_mint(AssetId::Native, 1).unwrap_err(),
            OtcbookError::ArithmeticOverflow
        );
    }
}
