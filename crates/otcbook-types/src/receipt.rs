//! Settlement receipts returned by successful fills and cancellations.
//!
//! Receipts restate exactly what moved, so callers can audit conservation
//! without re-reading the ledger.

use serde::{Deserialize, Serialize};

use crate::{Address, Amount, AssetId, FillFees, OrderHash, OrderId, Timestamp};

/// Which order a receipt refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OrderRef {
    /// A standing escrow book order.
    Book(OrderId),
    /// A signed order commitment.
    Signed(OrderHash),
}

impl std::fmt::Display for OrderRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Book(id) => write!(f, "{id}"),
            Self::Signed(hash) => write!(f, "signed:{}", hash.short()),
        }
    }
}

/// What one fill moved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FillReceipt {
    pub order: OrderRef,
    pub maker: Address,
    pub taker: Address,
    /// Asset delivered to the taker.
    pub give_asset: AssetId,
    /// Asset paid by the taker.
    pub take_asset: AssetId,
    /// Gross give-side amount leaving the maker's collateral.
    pub give_amount: Amount,
    /// Gross take-side amount paid by the taker.
    pub take_amount: Amount,
    pub fees: FillFees,
    pub fee_recipient: Address,
    pub executed_at: Timestamp,
}

impl FillReceipt {
    /// Amount the maker actually received.
    #[must_use]
    pub fn maker_proceeds(&self) -> Amount {
        self.fees.maker.net
    }

    /// Amount the taker actually received.
    #[must_use]
    pub fn taker_proceeds(&self) -> Amount {
        self.fees.taker.net
    }
}

/// What one cancellation returned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CancelReceipt {
    pub order: OrderRef,
    pub maker: Address,
    pub asset: AssetId,
    /// Collateral returned to the maker; zero for signed orders.
    pub refunded: Amount,
    pub cancelled_at: Timestamp,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::FeeConfig;

    #[test]
    fn order_ref_display() {
        assert_eq!(format!("{}", OrderRef::Book(OrderId(4))), "order:4");
        let hash = OrderHash([0xAB; 32]);
        assert_eq!(format!("{}", OrderRef::Signed(hash)), "signed:abababab");
    }

    #[test]
    fn proceeds_are_net_of_fees() {
        let fees = FeeConfig::new(100, 100, Address::ZERO)
            .unwrap()
            .quote(1_000_000, 1_000);
        let receipt = FillReceipt {
            order: OrderRef::Book(OrderId(0)),
            maker: Address::random(),
            taker: Address::random(),
            give_asset: AssetId::Native,
            take_asset: AssetId::Token(Address::random()),
            give_amount: 1_000_000,
            take_amount: 1_000,
            fees,
            fee_recipient: Address::ZERO,
            executed_at: Timestamp(1),
        };
        assert_eq!(receipt.maker_proceeds(), 990);
        assert_eq!(receipt.taker_proceeds(), 990_000);

        let json = serde_json::to_string(&receipt).unwrap();
        let back: FillReceipt = serde_json::from_str(&json).unwrap();
        assert_eq!(receipt, back);
    }
}
