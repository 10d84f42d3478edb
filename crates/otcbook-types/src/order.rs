//! Escrow book order record.
//!
//! An [`EscrowOrder`] is created with its full give-side collateral already
//! in custody. Fills consume it in give-side units; cancellation closes it by
//! jumping `filled` straight to `amount_to_give`. Records are never removed.

use std::fmt;

use primitive_types::U256;
use serde::{Deserialize, Serialize};

use crate::constants::MIN_FILL_TAKE_AMOUNT;
use crate::{Address, Amount, AssetId, OrderId, OtcbookError, Result, Timestamp};

/// Where an order sits in its lifecycle at a given instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OrderStatus {
    /// Fillable.
    Open,
    /// Collateral remains but the validity window has passed. Cancellable.
    Expired,
    /// Fully filled or cancelled. Terminal.
    Closed,
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Open => write!(f, "OPEN"),
            Self::Expired => write!(f, "EXPIRED"),
            Self::Closed => write!(f, "CLOSED"),
        }
    }
}

/// A standing order held by the escrow book.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EscrowOrder {
    pub id: OrderId,
    /// Creator of the order; receives proceeds and refunds.
    pub maker: Address,
    pub asset_to_give: AssetId,
    pub asset_to_take: AssetId,
    pub amount_to_give: Amount,
    pub amount_to_take: Amount,
    /// Give-side units already delivered (or written off by cancellation).
    pub filled: Amount,
    pub listing_time: Timestamp,
    pub expire_time: Timestamp,
}

impl EscrowOrder {
    /// Give-side collateral still in custody for this order.
    #[must_use]
    pub fn remaining(&self) -> Amount {
        self.amount_to_give - self.filled
    }

    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.filled >= self.amount_to_give
    }

    /// Expiry is exclusive: at `now == expire_time` the order is expired.
    #[must_use]
    pub fn is_expired_at(&self, now: Timestamp) -> bool {
        now >= self.expire_time
    }

    #[must_use]
    pub fn status_at(&self, now: Timestamp) -> OrderStatus {
        if self.is_closed() {
            OrderStatus::Closed
        } else if self.is_expired_at(now) {
            OrderStatus::Expired
        } else {
            OrderStatus::Open
        }
    }

    /// Take-side amount owed for delivering `give` units of collateral:
    /// `floor(amount_to_take * give / amount_to_give)`.
    ///
    /// The product is formed in 256 bits, so only a result that itself
    /// exceeds `Amount` can fail.
    ///
    /// # Errors
    /// - `ArithmeticOverflow` if the result doesn't fit in `Amount`
    /// - `AmountTooLow` if the result is below [`MIN_FILL_TAKE_AMOUNT`]
    pub fn proportional_take(&self, give: Amount) -> Result<Amount> {
        let wide = U256::from(self.amount_to_take) * U256::from(give)
            / U256::from(self.amount_to_give);
        if wide > U256::from(Amount::MAX) {
            return Err(OtcbookError::ArithmeticOverflow);
        }
        let take = wide.low_u128();
        if take < MIN_FILL_TAKE_AMOUNT {
            return Err(OtcbookError::AmountTooLow {
                computed: take,
                minimum: MIN_FILL_TAKE_AMOUNT,
            });
        }
        Ok(take)
    }
}

/// Test helpers.
#[cfg(any(test, feature = "test-helpers"))]
impl EscrowOrder {
    pub fn dummy(amount_to_give: Amount, amount_to_take: Amount) -> Self {
        Self {
            id: OrderId(0),
            maker: Address::random(),
            asset_to_give: AssetId::Token(Address::random()),
            asset_to_take: AssetId::Token(Address::random()),
            amount_to_give,
            amount_to_take,
            filled: 0,
            listing_time: Timestamp(1_000),
            expire_time: Timestamp(2_000),
        }
    }
}
