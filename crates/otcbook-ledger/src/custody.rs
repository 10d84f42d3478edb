//! Custody adapter: native-vs-token movement through the engine account.
//!
//! The engine holds escrowed value in a single custody account. Native
//! value arrives attached to a call and is pushed out with plain transfers;
//! tokens are pulled with the engine as spender, so a payer must have
//! approved the custody account beforehand.
//!
//! Zero-amount movements are skipped so fee legs at 0 bps never touch the
//! ledger.

use otcbook_types::{Address, Amount, AssetId, OtcbookError, Result};

use crate::ledger::AssetLedger;

/// The engine's custody account and the rules for moving value through it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Custody {
    account: Address,
}

impl Custody {
    #[must_use]
    pub fn new(account: Address) -> Self {
        Self { account }
    }

    #[must_use]
    pub fn account(&self) -> Address {
        self.account
    }

    /// Check the native value attached to a call.
    ///
    /// An operation paying `required` of `asset` must attach exactly that
    /// much native value when `asset` is native, and none otherwise.
    ///
    /// # Errors
    /// Returns `InvalidNativeValue` on mismatch.
    pub fn check_attached_value(asset: &AssetId, required: Amount, attached: Amount) -> Result<()> {
        let expected = if asset.is_native() { required } else { 0 };
        if attached != expected {
            return Err(OtcbookError::InvalidNativeValue {
                expected,
                supplied: attached,
            });
        }
        Ok(())
    }

    /// Move native value attached by `payer` into custody.
    ///
    /// # Errors
    /// Propagates the ledger's error if `payer` can't cover `value`.
    pub fn accept_value<L>(&self, ledger: &mut L, payer: Address, value: Amount) -> Result<()>
    where
        L: AssetLedger + ?Sized,
    {
        if value == 0 {
            return Ok(());
        }
        tracing::trace!(payer = %payer.short(), value, "Accepting native value");
        ledger.transfer(&AssetId::Native, payer, self.account, value)
    }

    /// Pull `amount` of `asset` from `payer` into custody.
    ///
    /// Native deposits are the attached call value.
    ///
    /// # Errors
    /// Propagates balance or allowance failures.
    pub fn deposit<L>(
        &self,
        ledger: &mut L,
        asset: &AssetId,
        payer: Address,
        amount: Amount,
    ) -> Result<()>
    where
        L: AssetLedger + ?Sized,
    {
        match asset {
            AssetId::Native => self.accept_value(ledger, payer, amount),
            AssetId::Token(token) => {
                if amount == 0 {
                    return Ok(());
                }
                tracing::trace!(payer = %payer.short(), %asset, amount, "Pulling deposit");
                ledger.transfer_from(token, self.account, payer, self.account, amount)
            }
        }
    }

    /// Move `amount` of `asset` paid by `payer` on to `to`.
    ///
    /// Native value must already sit in custody (see [`Self::accept_value`]);
    /// tokens are pulled straight from `payer` to `to`.
    ///
    /// # Errors
    /// Propagates balance or allowance failures.
    pub fn forward<L>(
        &self,
        ledger: &mut L,
        asset: &AssetId,
        payer: Address,
        to: Address,
        amount: Amount,
    ) -> Result<()>
    where
        L: AssetLedger + ?Sized,
    {
        if amount == 0 {
            return Ok(());
        }
        match asset {
            AssetId::Native => ledger.transfer(asset, self.account, to, amount),
            AssetId::Token(token) => {
                tracing::trace!(
                    payer = %payer.short(),
                    to = %to.short(),
                    %asset,
                    amount,
                    "Forwarding"
                );
                ledger.transfer_from(token, self.account, payer, to, amount)
            }
        }
    }

    /// Push `amount` of `asset` out of custody to `to`.
    ///
    /// # Errors
    /// Returns `InsufficientBalance` if custody can't cover it.
    pub fn release<L>(
        &self,
        ledger: &mut L,
        asset: &AssetId,
        to: Address,
        amount: Amount,
    ) -> Result<()>
    where
        L: AssetLedger + ?Sized,
    {
        if amount == 0 {
            return Ok(());
        }
        tracing::trace!(to = %to.short(), %asset, amount, "Releasing from custody");
        ledger.transfer(asset, self.account, to, amount)
    }

    /// Current custody holdings of `asset`.
    #[must_use]
    pub fn holdings<L>(&self, ledger: &L, asset: &AssetId) -> Amount
    where
        L: AssetLedger + ?Sized,
    {
        ledger.balance_of(asset, &self.account)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::InMemoryLedger;

    struct Fixture {
        ledger: InMemoryLedger,
        custody: Custody,
        token: Address,
        payer: Address,
    }

    fn fixture() -> Fixture {
        let mut ledger = InMemoryLedger::new();
        let custody = Custody::new(Address::random());
        let token = Address::random();
        let payer = Address::random();
        ledger.mint(AssetId::Native, payer, 1_000).unwrap();
        ledger.mint(AssetId::Token(token), payer, 1_000).unwrap();
        Fixture {
            ledger,
            custody,
            token,
            payer,
        }
    }

    #[test]
    fn attached_value_rules() {
        assert!(Custody::check_attached_value(&AssetId::Native, 5, 5).is_ok());
        assert!(Custody::check_attached_value(&AssetId::Native, 5, 4).is_err());
        let tok = AssetId::Token(Address::random());
        assert!(Custody::check_attached_value(&tok, 5, 0).is_ok());
        let err = Custody::check_attached_value(&tok, 5, 5).unwrap_err();
        assert_eq!(
            err,
            OtcbookError::InvalidNativeValue {
                expected: 0,
                supplied: 5
            }
        );
    }

    #[test]
    fn native_deposit_and_release() {
        let mut f = fixture();
        let other = Address::random();
        f.custody
            .deposit(&mut f.ledger, &AssetId::Native, f.payer, 300)
            .unwrap();
        assert_eq!(f.custody.holdings(&f.ledger, &AssetId::Native), 300);
        f.custody
            .release(&mut f.ledger, &AssetId::Native, other, 100)
            .unwrap();
        assert_eq!(f.ledger.balance_of(&AssetId::Native, &other), 100);
        assert_eq!(f.custody.holdings(&f.ledger, &AssetId::Native), 200);
    }

    #[test]
    fn token_deposit_needs_allowance() {
        let mut f = fixture();
        let asset = AssetId::Token(f.token);
        let err = f
            .custody
            .deposit(&mut f.ledger, &asset, f.payer, 10)
            .unwrap_err();
        assert!(matches!(err, OtcbookError::InsufficientAllowance { .. }));

        f.ledger
            .approve(&f.token, f.payer, f.custody.account(), 10);
        f.custody
            .deposit(&mut f.ledger, &asset, f.payer, 10)
            .unwrap();
        assert_eq!(f.custody.holdings(&f.ledger, &asset), 10);
    }

    #[test]
    fn token_forward_bypasses_custody() {
        let mut f = fixture();
        let asset = AssetId::Token(f.token);
        let to = Address::random();
        f.ledger
            .approve(&f.token, f.payer, f.custody.account(), 50);
        f.custody
            .forward(&mut f.ledger, &asset, f.payer, to, 50)
            .unwrap();
        assert_eq!(f.ledger.balance_of(&asset, &to), 50);
        assert_eq!(f.custody.holdings(&f.ledger, &asset), 0);
    }

    #[test]
    fn native_forward_draws_on_custody() {
        let mut f = fixture();
        let to = Address::random();
        f.custody.accept_value(&mut f.ledger, f.payer, 40).unwrap();
        f.custody
            .forward(&mut f.ledger, &AssetId::Native, f.payer, to, 40)
            .unwrap();
        assert_eq!(f.ledger.balance_of(&AssetId::Native, &to), 40);
        assert_eq!(f.custody.holdings(&f.ledger, &AssetId::Native), 0);
    }

    #[test]
    fn zero_amounts_are_noops() {
        let mut f = fixture();
        let asset = AssetId::Token(f.token);
        // No allowance, but zero never reaches the ledger.
        f.custody.deposit(&mut f.ledger, &asset, f.payer, 0).unwrap();
        f.custody
            .forward(&mut f.ledger, &asset, f.payer, Address::random(), 0)
            .unwrap();
        f.custody
            .release(&mut f.ledger, &asset, Address::random(), 0)
            .unwrap();
        assert_eq!(f.ledger.balance_of(&asset, &f.payer), 1_000);
    }
}
