//! Commitment registry for signed orders.
//!
//! A signed order is never stored; only its commitment hash is. Each
//! `(maker, hash)` pair moves from unused to filled or cancelled exactly
//! once, so a signature can't be replayed and a cancelled order can't be
//! revived. Entries are never evicted: forgetting one would reopen the
//! order it closed.

use std::collections::HashMap;

use otcbook_types::{Address, OrderHash, OtcbookError, Result};
use serde::{Deserialize, Serialize};

/// Terminal state of a used commitment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CommitmentState {
    Filled,
    Cancelled,
}

/// Used commitments keyed by `(maker, hash)`.
#[derive(Debug, Clone, Default)]
pub struct CommitmentRegistry {
    used: HashMap<(Address, OrderHash), CommitmentState>,
}

impl CommitmentRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Consume a commitment.
    ///
    /// # Errors
    /// Returns [`OtcbookError::ClosedOrder`] if it was already filled or
    /// cancelled.
    pub fn mark(&mut self, maker: Address, hash: OrderHash, state: CommitmentState) -> Result<()> {
        if self.used.contains_key(&(maker, hash)) {
            return Err(OtcbookError::ClosedOrder);
        }
        self.used.insert((maker, hash), state);
        Ok(())
    }

    /// Undo a mark whose settlement failed.
    pub(crate) fn unmark(&mut self, maker: &Address, hash: &OrderHash) {
        self.used.remove(&(*maker, *hash));
    }

    /// `None` while the commitment is unused.
    #[must_use]
    pub fn state(&self, maker: &Address, hash: &OrderHash) -> Option<CommitmentState> {
        self.used.get(&(*maker, *hash)).copied()
    }

    #[must_use]
    pub fn is_used(&self, maker: &Address, hash: &OrderHash) -> bool {
        self.used.contains_key(&(*maker, *hash))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.used.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.used.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_mark_succeeds() {
        let mut reg = CommitmentRegistry::new();
        let maker = Address::random();
        let hash = OrderHash([1; 32]);
        assert!(reg.mark(maker, hash, CommitmentState::Filled).is_ok());
        assert_eq!(reg.state(&maker, &hash), Some(CommitmentState::Filled));
        assert_eq!(reg.len(), 1);
    }

    #[test]
    fn second_mark_is_closed_order() {
        let mut reg = CommitmentRegistry::new();
        let maker = Address::random();
        let hash = OrderHash([2; 32]);
        reg.mark(maker, hash, CommitmentState::Cancelled).unwrap();
        assert_eq!(
            reg.mark(maker, hash, CommitmentState::Filled),
            Err(OtcbookError::ClosedOrder)
        );
        assert_eq!(reg.state(&maker, &hash), Some(CommitmentState::Cancelled));
    }

    #[test]
    fn keyed_per_maker() {
        let mut reg = CommitmentRegistry::new();
        let hash = OrderHash([3; 32]);
        let (a, b) = (Address::random(), Address::random());
        reg.mark(a, hash, CommitmentState::Cancelled).unwrap();
        assert!(!reg.is_used(&b, &hash));
        assert!(reg.mark(b, hash, CommitmentState::Filled).is_ok());
    }

    #[test]
    fn unmark_reopens() {
        let mut reg = CommitmentRegistry::new();
        let maker = Address::random();
        let hash = OrderHash([4; 32]);
        reg.mark(maker, hash, CommitmentState::Filled).unwrap();
        reg.unmark(&maker, &hash);
        assert!(reg.is_empty());
        assert_eq!(reg.state(&maker, &hash), None);
    }

    #[test]
    fn many_entries_retained() {
        let mut reg = CommitmentRegistry::new();
        let maker = Address::random();
        for i in 0..1_000u32 {
            let mut bytes = [0u8; 32];
            bytes[..4].copy_from_slice(&i.to_be_bytes());
            reg.mark(maker, OrderHash(bytes), CommitmentState::Filled)
                .unwrap();
        }
        assert_eq!(reg.len(), 1_000);
        assert!(reg.is_used(&maker, &OrderHash([0; 32])));
    }
}
