//! In-memory reference ledger.
//!
//! Tracks per-(asset, holder) balances and per-(token, owner, spender)
//! allowances. All mutations are atomic: either the full operation succeeds
//! or the ledger is unchanged. Checkpoints snapshot the whole state, which
//! is fine at the sizes this ledger is meant for (tests, simulations, and a
//! reference for real adapters).

use std::collections::HashMap;

use otcbook_types::{Address, Amount, AssetId, OtcbookError, Result};

use crate::ledger::{AssetLedger, Checkpoint};
use crate::supply_conservation::SupplyConservation;

#[derive(Debug, Clone)]
struct Snapshot {
    balances: HashMap<(AssetId, Address), Amount>,
    allowances: HashMap<(Address, Address, Address), Amount>,
    supply: SupplyConservation,
}

/// Reference implementation of [`AssetLedger`].
///
/// An allowance of `Amount::MAX` is treated as unlimited and never
/// decremented.
#[derive(Debug, Default)]
pub struct InMemoryLedger {
    balances: HashMap<(AssetId, Address), Amount>,
    /// Keyed by (token, owner, spender).
    allowances: HashMap<(Address, Address, Address), Amount>,
    supply: SupplyConservation,
    journal: Vec<Snapshot>,
}

impl InMemoryLedger {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue new supply of `asset` to `to`.
    ///
    /// # Errors
    /// Returns `ArithmeticOverflow` if the holder's balance or the total
    /// issuance would exceed `u128`.
    pub fn mint(&mut self, asset: AssetId, to: Address, amount: Amount) -> Result<()> {
        let current = self.balance_of(&asset, &to);
        let updated = current
            .checked_add(amount)
            .ok_or(OtcbookError::ArithmeticOverflow)?;
        self.supply.record_mint(asset, amount)?;
        self.balances.insert((asset, to), updated);
        Ok(())
    }

    /// Sum of all holdings of `asset`.
    #[must_use]
    pub fn total_supply(&self, asset: &AssetId) -> Amount {
        self.balances
            .iter()
            .filter(|((a, _), _)| a == asset)
            .map(|(_, amount)| *amount)
            .sum()
    }

    /// Check that holdings of `asset` still equal its issuance.
    ///
    /// # Errors
    /// Returns `SupplyInvariantViolation` if they differ.
    pub fn verify_supply(&self, asset: &AssetId) -> Result<()> {
        self.supply.verify(asset, self.total_supply(asset))
    }

    /// Check every asset ever minted.
    ///
    /// # Errors
    /// Returns the first `SupplyInvariantViolation` found.
    pub fn verify_all_supplies(&self) -> Result<()> {
        for asset in self.supply.tracked_assets() {
            self.verify_supply(&asset)?;
        }
        Ok(())
    }

    /// Open journal frames. Zero outside of a settlement.
    #[must_use]
    pub fn journal_depth(&self) -> usize {
        self.journal.len()
    }

    fn debit(&mut self, asset: AssetId, holder: Address, amount: Amount) -> Result<()> {
        let available = self.balance_of(&asset, &holder);
        if available < amount {
            return Err(OtcbookError::InsufficientBalance {
                asset,
                holder,
                needed: amount,
                available,
            });
        }
        self.balances.insert((asset, holder), available - amount);
        Ok(())
    }

    fn credit(&mut self, asset: AssetId, holder: Address, amount: Amount) -> Result<()> {
        let entry = self.balances.entry((asset, holder)).or_insert(0);
        *entry = entry
            .checked_add(amount)
            .ok_or(OtcbookError::ArithmeticOverflow)?;
        Ok(())
    }

    fn move_balance(
        &mut self,
        asset: AssetId,
        from: Address,
        to: Address,
        amount: Amount,
    ) -> Result<()> {
        if from == to {
            // Still has to be covered, but nothing moves.
            let available = self.balance_of(&asset, &from);
            if available < amount {
                return Err(OtcbookError::InsufficientBalance {
                    asset,
                    holder: from,
                    needed: amount,
                    available,
                });
            }
            return Ok(());
        }
        self.debit(asset, from, amount)?;
        // A credit can only overflow if supply already exceeds u128, which
        // mint prevents.
        self.credit(asset, to, amount)
    }
}

impl AssetLedger for InMemoryLedger {
    fn balance_of(&self, asset: &AssetId, holder: &Address) -> Amount {
        self.balances.get(&(*asset, *holder)).copied().unwrap_or(0)
    }

    fn allowance(&self, token: &Address, owner: &Address, spender: &Address) -> Amount {
        self.allowances
            .get(&(*token, *owner, *spender))
            .copied()
            .unwrap_or(0)
    }

    fn approve(&mut self, token: &Address, owner: Address, spender: Address, amount: Amount) {
        self.allowances.insert((*token, owner, spender), amount);
    }

    fn transfer(
        &mut self,
        asset: &AssetId,
        from: Address,
        to: Address,
        amount: Amount,
    ) -> Result<()> {
        self.move_balance(*asset, from, to, amount)
    }

    fn transfer_from(
        &mut self,
        token: &Address,
        spender: Address,
        from: Address,
        to: Address,
        amount: Amount,
    ) -> Result<()> {
        let allowed = self.allowance(token, &from, &spender);
        if allowed < amount {
            return Err(OtcbookError::InsufficientAllowance {
                token: *token,
                owner: from,
                needed: amount,
                available: allowed,
            });
        }
        self.move_balance(AssetId::Token(*token), from, to, amount)?;
        if allowed != Amount::MAX {
            self.allowances
                .insert((*token, from, spender), allowed - amount);
        }
        Ok(())
    }

    fn checkpoint(&mut self) -> Checkpoint {
        self.journal.push(Snapshot {
            balances: self.balances.clone(),
            allowances: self.allowances.clone(),
            supply: self.supply.clone(),
        });
        Checkpoint(self.journal.len() - 1)
    }

    fn commit(&mut self, checkpoint: Checkpoint) {
        self.journal.truncate(checkpoint.0);
    }

    fn revert(&mut self, checkpoint: Checkpoint) {
        self.journal.truncate(checkpoint.0 + 1);
        if let Some(snapshot) = self.journal.pop() {
            self.balances = snapshot.balances;
            self.allowances = snapshot.allowances;
            self.supply = snapshot.supply;
        }
    }
}
