//! The fungible-asset interface the engine settles against.
//!
//! [`AssetLedger`] is the boundary to the external asset collaborator:
//! balances, allowances, push transfers, and allowance-gated pulls, for
//! both the native asset and tokens. Implementations also expose a
//! checkpoint journal so a multi-leg settlement can be undone as a whole
//! when any leg fails.

use otcbook_types::{Address, Amount, AssetId, Result};

/// Handle to a ledger journal position returned by [`AssetLedger::checkpoint`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Checkpoint(pub usize);

/// Asset interface consumed by the markets.
///
/// Every method that moves value is fallible; a failure is a hard error that
/// aborts the whole engine operation.
pub trait AssetLedger {
    /// Balance of `holder` in `asset`.
    fn balance_of(&self, asset: &AssetId, holder: &Address) -> Amount;

    /// How much of `token` `spender` may still pull from `owner`.
    fn allowance(&self, token: &Address, owner: &Address, spender: &Address) -> Amount;

    /// `owner` lets `spender` pull up to `amount` of `token`.
    fn approve(&mut self, token: &Address, owner: Address, spender: Address, amount: Amount);

    /// Push `amount` of `asset` from `from` to `to`, authorised by `from`.
    fn transfer(&mut self, asset: &AssetId, from: Address, to: Address, amount: Amount)
    -> Result<()>;

    /// `spender` pulls `amount` of `token` from `from` to `to`, consuming
    /// allowance.
    fn transfer_from(
        &mut self,
        token: &Address,
        spender: Address,
        from: Address,
        to: Address,
        amount: Amount,
    ) -> Result<()>;

    /// Open a journal frame.
    fn checkpoint(&mut self) -> Checkpoint;

    /// Keep everything done since `checkpoint`.
    fn commit(&mut self, checkpoint: Checkpoint);

    /// Undo everything done since `checkpoint`.
    fn revert(&mut self, checkpoint: Checkpoint);
}

/// Run `f` inside a checkpoint: commit on success, revert on any error.
pub fn atomically<L, T, F>(ledger: &mut L, f: F) -> Result<T>
where
    L: AssetLedger + ?Sized,
    F: FnOnce(&mut L) -> Result<T>,
{
    let checkpoint = ledger.checkpoint();
    match f(ledger) {
        Ok(value) => {
            ledger.commit(checkpoint);
            Ok(value)
        }
        Err(err) => {
            tracing::warn!(
                code = err.code(),
                error = %err,
                "Ledger leg failed, reverting checkpoint"
            );
            ledger.revert(checkpoint);
            Err(err)
        }
    }
}
