//! Signature-authorized matcher.
//!
//! No orders are stored. A maker signs a [`SignedOrder`] off-ledger and
//! approves the custody account for the maker asset; any taker can then
//! present the order with its signature and take it whole. The commitment
//! hash of the order is recorded as filled before any value moves, and
//! each commitment can be used once.
//!
//! Fees and the pause flag come from the [`Governance`] the caller passes
//! in, the same one the escrow book is driven with.

use otcbook_ledger::{AssetLedger, Custody, atomically};
use otcbook_types::{
    Address, CancelReceipt, FillReceipt, OrderHash, OrderRef, OrderSignature, OtcbookError,
    Result, SignedOrder, SigningDomain,
};

use crate::commitments::{CommitmentRegistry, CommitmentState};
use crate::context::CallContext;
use crate::governance::Governance;

#[derive(Debug, Clone)]
pub struct FixedMarket {
    domain: SigningDomain,
    custody: Custody,
    commitments: CommitmentRegistry,
}

impl FixedMarket {
    #[must_use]
    pub fn new(domain: SigningDomain, custody_account: Address) -> Self {
        Self {
            domain,
            custody: Custody::new(custody_account),
            commitments: CommitmentRegistry::new(),
        }
    }

    /// Commitment hash of `order` under this market's signing domain.
    #[must_use]
    pub fn hash_order(&self, order: &SignedOrder) -> OrderHash {
        order.hash(&self.domain)
    }

    #[must_use]
    pub fn domain(&self) -> &SigningDomain {
        &self.domain
    }

    /// Take `order` in full.
    ///
    /// The taker pays `taking_amount` of the taker asset (attached as value
    /// when native) and receives `making_amount` of the maker asset, pulled
    /// from the maker through their allowance to the custody account. Both
    /// legs are charged the current fee schedule.
    ///
    /// # Errors
    /// In check order: `Paused`, `ZeroAmount`, `OrderExpired`,
    /// `ClosedOrder`, `BadSignature`, `InvalidAsset`, `InvalidNativeValue`;
    /// then any ledger error from the settlement legs.
    pub fn fill_order<L>(
        &mut self,
        gov: &Governance,
        ledger: &mut L,
        ctx: &CallContext,
        order: &SignedOrder,
        signature: &OrderSignature,
    ) -> Result<FillReceipt>
    where
        L: AssetLedger + ?Sized,
    {
        self.try_fill(gov, ledger, ctx, order, signature).inspect_err(|err| {
            tracing::debug!(
                code = err.code(),
                error = %err,
                maker = %order.maker.short(),
                "Signed fill rejected"
            );
        })
    }

    fn try_fill<L>(
        &mut self,
        gov: &Governance,
        ledger: &mut L,
        ctx: &CallContext,
        order: &SignedOrder,
        signature: &OrderSignature,
    ) -> Result<FillReceipt>
    where
        L: AssetLedger + ?Sized,
    {
        gov.ensure_open()?;
        if order.making_amount == 0 {
            return Err(OtcbookError::ZeroAmount);
        }
        if ctx.now >= order.expire_time {
            return Err(OtcbookError::OrderExpired {
                expire_time: order.expire_time,
                now: ctx.now,
            });
        }
        let hash = self.hash_order(order);
        if self.commitments.is_used(&order.maker, &hash) {
            return Err(OtcbookError::ClosedOrder);
        }
        order.verify(&self.domain, signature)?;
        if order.maker_asset == order.taker_asset {
            return Err(OtcbookError::InvalidAsset {
                reason: format!("maker and taker assets are both {}", order.maker_asset),
            });
        }
        if order.maker_asset.is_native() {
            return Err(OtcbookError::InvalidAsset {
                reason: "maker asset can't be native".into(),
            });
        }
        Custody::check_attached_value(&order.taker_asset, order.taking_amount, ctx.value)?;

        let fees = gov.quote(order.making_amount, order.taking_amount);
        let recipient = gov.fee_recipient();

        self.commitments.mark(order.maker, hash, CommitmentState::Filled)?;

        let custody = self.custody;
        let taker = ctx.caller;
        let maker = order.maker;
        let settled = atomically(ledger, |l| {
            custody.accept_value(l, taker, ctx.value)?;
            custody.forward(l, &order.taker_asset, taker, maker, fees.maker.net)?;
            custody.forward(l, &order.taker_asset, taker, recipient, fees.maker.fee)?;
            custody.forward(l, &order.maker_asset, maker, taker, fees.taker.net)?;
            custody.forward(l, &order.maker_asset, maker, recipient, fees.taker.fee)
        });
        if let Err(err) = settled {
            self.commitments.unmark(&maker, &hash);
            return Err(err);
        }

        tracing::info!(
            hash = %hash.short(),
            maker = %maker.short(),
            taker = %taker.short(),
            making = order.making_amount,
            taking = order.taking_amount,
            "Signed order filled"
        );
        Ok(FillReceipt {
            order: OrderRef::Signed(hash),
            maker,
            taker,
            give_asset: order.maker_asset,
            take_asset: order.taker_asset,
            give_amount: order.making_amount,
            take_amount: order.taking_amount,
            fees,
            fee_recipient: recipient,
            executed_at: ctx.now,
        })
    }

    /// Void `order` so it can never be filled. Nothing is transferred.
    ///
    /// # Errors
    /// `NotMaker` unless the caller signed it, `ClosedOrder` if its
    /// commitment is already used.
    pub fn cancel_order(
        &mut self,
        ctx: &CallContext,
        order: &SignedOrder,
    ) -> Result<CancelReceipt> {
        if ctx.caller != order.maker {
            return Err(OtcbookError::NotMaker { caller: ctx.caller });
        }
        let hash = self.hash_order(order);
        self.commitments.mark(order.maker, hash, CommitmentState::Cancelled)?;
        tracing::info!(
            hash = %hash.short(),
            maker = %order.maker.short(),
            "Signed order cancelled"
        );
        Ok(CancelReceipt {
            order: OrderRef::Signed(hash),
            maker: order.maker,
            asset: order.maker_asset,
            refunded: 0,
            cancelled_at: ctx.now,
        })
    }

    /// Void a commitment by hash alone, under the caller's own address.
    ///
    /// Fills look commitments up under the order's maker, so this can only
    /// ever block orders the caller signed.
    ///
    /// # Errors
    /// Returns `ClosedOrder` if the caller already used this commitment.
    pub fn cancel_order_hash(&mut self, ctx: &CallContext, hash: OrderHash) -> Result<()> {
        self.commitments.mark(ctx.caller, hash, CommitmentState::Cancelled)?;
        tracing::info!(hash = %hash.short(), maker = %ctx.caller.short(), "Commitment cancelled");
        Ok(())
    }

    // ----- Reads -----

    /// `None` while `(maker, hash)` is unused.
    #[must_use]
    pub fn order_status(&self, maker: &Address, hash: &OrderHash) -> Option<CommitmentState> {
        self.commitments.state(maker, hash)
    }

    #[must_use]
    pub fn commitments(&self) -> &CommitmentRegistry {
        &self.commitments
    }

    #[must_use]
    pub fn custody(&self) -> &Custody {
        &self.custody
    }
}
