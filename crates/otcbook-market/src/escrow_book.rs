//! Escrow order book.
//!
//! Makers lock their full give-side collateral in custody when they list.
//! Takers fill any part of the remainder by paying the proportional
//! take-side amount; both sides are charged the current fee schedule.
//! Makers can cancel at any time, paused or not, and get back whatever is
//! still unfilled.
//!
//! Fee schedule and pause state are not stored here: every mutating call
//! borrows the [`Governance`] shared with the signed-order market.
//!
//! # Settlement order
//!
//! 1. All checks run first; a rejected call changes nothing.
//! 2. The order record (`filled`) is updated.
//! 3. Ledger legs run inside one checkpoint. If any leg fails, the ledger
//!    is reverted and the record is restored.

use otcbook_ledger::{AssetLedger, Custody, atomically};
use otcbook_types::{
    Address, Amount, AssetId, CancelReceipt, EscrowOrder, FillReceipt, OrderId, OrderRef,
    OrderStatus, OtcbookError, Result, Timestamp,
};
use serde::{Deserialize, Serialize};

use crate::context::CallContext;
use crate::governance::Governance;

/// Terms of a new listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewOrder {
    pub asset_to_give: AssetId,
    pub asset_to_take: AssetId,
    pub amount_to_give: Amount,
    pub amount_to_take: Amount,
    pub expire_time: Timestamp,
}

/// Persistent order book holding maker collateral in custody.
#[derive(Debug, Clone)]
pub struct EscrowMarket {
    custody: Custody,
    /// Indexed by `OrderId`. Records are never removed.
    orders: Vec<EscrowOrder>,
    next_id: OrderId,
}

impl EscrowMarket {
    /// Empty book whose collateral is held by `custody_account`.
    #[must_use]
    pub fn new(custody_account: Address) -> Self {
        Self {
            custody: Custody::new(custody_account),
            orders: Vec::new(),
            next_id: OrderId(0),
        }
    }

    // ----- Order lifecycle -----

    /// List a new order, pulling `amount_to_give` into custody.
    ///
    /// Native collateral is the value attached to `ctx`; token collateral
    /// is pulled through the maker's allowance to the custody account.
    ///
    /// # Errors
    /// `Paused`, `InvalidAsset`, `InvalidAmounts`, `InvalidNativeValue`, or
    /// the ledger's error if the deposit fails.
    pub fn create_order<L>(
        &mut self,
        gov: &Governance,
        ledger: &mut L,
        ctx: &CallContext,
        new: NewOrder,
    ) -> Result<OrderId>
    where
        L: AssetLedger + ?Sized,
    {
        self.try_create(gov, ledger, ctx, new).inspect_err(|err| {
            tracing::debug!(
                code = err.code(),
                error = %err,
                caller = %ctx.caller.short(),
                "Create rejected"
            );
        })
    }

    fn try_create<L>(
        &mut self,
        gov: &Governance,
        ledger: &mut L,
        ctx: &CallContext,
        new: NewOrder,
    ) -> Result<OrderId>
    where
        L: AssetLedger + ?Sized,
    {
        gov.ensure_open()?;
        if new.asset_to_give == new.asset_to_take {
            return Err(OtcbookError::InvalidAsset {
                reason: format!("give and take are both {}", new.asset_to_give),
            });
        }
        if new.amount_to_give == 0 || new.amount_to_take == 0 {
            return Err(OtcbookError::InvalidAmounts {
                reason: "both amounts must be positive".into(),
            });
        }
        Custody::check_attached_value(&new.asset_to_give, new.amount_to_give, ctx.value)?;

        let id = self.next_id;
        self.orders.push(EscrowOrder {
            id,
            maker: ctx.caller,
            asset_to_give: new.asset_to_give,
            asset_to_take: new.asset_to_take,
            amount_to_give: new.amount_to_give,
            amount_to_take: new.amount_to_take,
            filled: 0,
            listing_time: ctx.now,
            expire_time: new.expire_time,
        });

        let custody = self.custody;
        let deposited = atomically(ledger, |l| {
            custody.deposit(l, &new.asset_to_give, ctx.caller, new.amount_to_give)
        });
        if let Err(err) = deposited {
            self.orders.pop();
            return Err(err);
        }

        self.next_id = id.next();
        tracing::info!(
            order = %id,
            maker = %ctx.caller.short(),
            give = %new.asset_to_give,
            take = %new.asset_to_take,
            amount_to_give = new.amount_to_give,
            amount_to_take = new.amount_to_take,
            "Order listed"
        );
        Ok(id)
    }

    /// Fill `amount` give-side units of order `id`.
    ///
    /// The taker pays `floor(amount_to_take * amount / amount_to_give)` of
    /// the take asset: attached as value when native, pulled through the
    /// taker's allowance otherwise.
    ///
    /// # Errors
    /// In check order: `Paused`, `InvalidAmounts`, `OrderNotFound`,
    /// `AmountTooHighOrClosed`, `OrderExpired`, `AmountTooLow`,
    /// `InvalidNativeValue`; then any ledger error from the settlement legs.
    pub fn fill_order<L>(
        &mut self,
        gov: &Governance,
        ledger: &mut L,
        ctx: &CallContext,
        id: OrderId,
        amount: Amount,
    ) -> Result<FillReceipt>
    where
        L: AssetLedger + ?Sized,
    {
        self.try_fill(gov, ledger, ctx, id, amount).inspect_err(|err| {
            tracing::debug!(code = err.code(), error = %err, order = %id, "Fill rejected");
        })
    }

    fn try_fill<L>(
        &mut self,
        gov: &Governance,
        ledger: &mut L,
        ctx: &CallContext,
        id: OrderId,
        amount: Amount,
    ) -> Result<FillReceipt>
    where
        L: AssetLedger + ?Sized,
    {
        gov.ensure_open()?;
        if amount == 0 {
            return Err(OtcbookError::InvalidAmounts {
                reason: "fill amount must be positive".into(),
            });
        }
        let index = self.index_of(id)?;
        let order = &self.orders[index];
        let remaining = order.remaining();
        if amount > remaining {
            return Err(OtcbookError::AmountTooHighOrClosed {
                requested: amount,
                remaining,
            });
        }
        if order.is_expired_at(ctx.now) {
            return Err(OtcbookError::OrderExpired {
                expire_time: order.expire_time,
                now: ctx.now,
            });
        }
        let take = order.proportional_take(amount)?;
        Custody::check_attached_value(&order.asset_to_take, take, ctx.value)?;

        let fees = gov.quote(amount, take);
        let recipient = gov.fee_recipient();
        let maker = order.maker;
        let give_asset = order.asset_to_give;
        let take_asset = order.asset_to_take;
        let filled_before = order.filled;

        self.orders[index].filled = filled_before + amount;

        let custody = self.custody;
        let taker = ctx.caller;
        let settled = atomically(ledger, |l| {
            custody.accept_value(l, taker, ctx.value)?;
            custody.forward(l, &take_asset, taker, maker, fees.maker.net)?;
            custody.forward(l, &take_asset, taker, recipient, fees.maker.fee)?;
            custody.release(l, &give_asset, taker, fees.taker.net)?;
            custody.release(l, &give_asset, recipient, fees.taker.fee)
        });
        if let Err(err) = settled {
            self.orders[index].filled = filled_before;
            return Err(err);
        }

        tracing::info!(
            order = %id,
            taker = %taker.short(),
            give = amount,
            take,
            maker_fee = fees.maker.fee,
            taker_fee = fees.taker.fee,
            remaining = remaining - amount,
            "Order filled"
        );
        Ok(FillReceipt {
            order: OrderRef::Book(id),
            maker,
            taker,
            give_asset,
            take_asset,
            give_amount: amount,
            take_amount: take,
            fees,
            fee_recipient: recipient,
            executed_at: ctx.now,
        })
    }

    /// Close order `id` and refund its unfilled collateral to the maker.
    ///
    /// Works while paused and after expiry.
    ///
    /// # Errors
    /// `OrderNotFound`, `NotMaker`, `ClosedOrder`, or a ledger error if
    /// custody can't cover the refund.
    pub fn cancel_order<L>(
        &mut self,
        ledger: &mut L,
        ctx: &CallContext,
        id: OrderId,
    ) -> Result<CancelReceipt>
    where
        L: AssetLedger + ?Sized,
    {
        self.try_cancel(ledger, ctx, id).inspect_err(|err| {
            tracing::debug!(code = err.code(), error = %err, order = %id, "Cancel rejected");
        })
    }

    fn try_cancel<L>(
        &mut self,
        ledger: &mut L,
        ctx: &CallContext,
        id: OrderId,
    ) -> Result<CancelReceipt>
    where
        L: AssetLedger + ?Sized,
    {
        let index = self.index_of(id)?;
        let order = &mut self.orders[index];
        if ctx.caller != order.maker {
            return Err(OtcbookError::NotMaker { caller: ctx.caller });
        }
        if order.is_closed() {
            return Err(OtcbookError::ClosedOrder);
        }
        let refund = order.remaining();
        let filled_before = order.filled;
        let asset = order.asset_to_give;
        let maker = order.maker;
        order.filled = order.amount_to_give;

        let custody = self.custody;
        if let Err(err) = atomically(ledger, |l| custody.release(l, &asset, maker, refund)) {
            self.orders[index].filled = filled_before;
            return Err(err);
        }

        tracing::info!(order = %id, maker = %maker.short(), refund, "Order cancelled");
        Ok(CancelReceipt {
            order: OrderRef::Book(id),
            maker,
            asset,
            refunded: refund,
            cancelled_at: ctx.now,
        })
    }

    // ----- Reads -----

    fn index_of(&self, id: OrderId) -> Result<usize> {
        usize::try_from(id.0)
            .ok()
            .filter(|index| *index < self.orders.len())
            .ok_or(OtcbookError::OrderNotFound(id))
    }

    /// Order record, available forever once created.
    #[must_use]
    pub fn order(&self, id: OrderId) -> Option<&EscrowOrder> {
        self.index_of(id).ok().map(|index| &self.orders[index])
    }

    /// Lifecycle state of order `id` at `now`.
    ///
    /// # Errors
    /// Returns `OrderNotFound` for an unknown id.
    pub fn order_status(&self, id: OrderId, now: Timestamp) -> Result<OrderStatus> {
        let index = self.index_of(id)?;
        Ok(self.orders[index].status_at(now))
    }

    /// Id the next successful `create_order` will assign.
    #[must_use]
    pub fn next_order_id(&self) -> OrderId {
        self.next_id
    }

    #[must_use]
    pub fn orders(&self) -> &[EscrowOrder] {
        &self.orders
    }

    pub fn orders_by_maker<'a>(
        &'a self,
        maker: &'a Address,
    ) -> impl Iterator<Item = &'a EscrowOrder> + 'a {
        self.orders.iter().filter(move |order| order.maker == *maker)
    }

    /// Unfilled collateral of `asset` across all orders. Always equals the
    /// custody account's ledger balance when custody is used by this book
    /// alone.
    #[must_use]
    pub fn custodied(&self, asset: &AssetId) -> Amount {
        self.orders
            .iter()
            .filter(|order| order.asset_to_give == *asset)
            .map(EscrowOrder::remaining)
            .sum()
    }

    #[must_use]
    pub fn custody(&self) -> &Custody {
        &self.custody
    }
}
