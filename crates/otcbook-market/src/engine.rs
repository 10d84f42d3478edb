//! One deployed OTCBook instance.
//!
//! [`OtcEngine`] owns the single [`Governance`] and both markets. Every
//! mutating market call is routed through here with that governance
//! borrowed, so one pause stops creates and fills on both markets, and
//! one fee change applies to every later fill wherever it executes.
//!
//! Both markets hold value under the instance address. The signed-order
//! market only passes native value through custody within a call, so the
//! instance balance of any asset always equals the escrow book's
//! unfilled collateral between calls.

use otcbook_ledger::AssetLedger;
use otcbook_types::{
    Address, Amount, AssetId, BasisPoints, CancelReceipt, EngineConfig, EscrowOrder, FillReceipt,
    OrderHash, OrderId, OrderSignature, OrderStatus, Result, SignedOrder, Timestamp,
};

use crate::commitments::CommitmentState;
use crate::context::CallContext;
use crate::escrow_book::{EscrowMarket, NewOrder};
use crate::fixed_market::FixedMarket;
use crate::governance::Governance;

#[derive(Debug, Clone)]
pub struct OtcEngine {
    governance: Governance,
    book: EscrowMarket,
    fixed: FixedMarket,
}

impl OtcEngine {
    /// # Errors
    /// Returns `Configuration` if `config` doesn't validate or names the
    /// instance itself as fee recipient.
    pub fn new(config: &EngineConfig) -> Result<Self> {
        config.validate()?;
        let governance = Governance::new(config.owner, config.fee_config()?, config.instance)?;
        tracing::info!(
            instance = %config.instance,
            owner = %config.owner,
            chain_id = config.chain_id,
            "Engine initialized"
        );
        Ok(Self {
            governance,
            book: EscrowMarket::new(config.instance),
            fixed: FixedMarket::new(config.signing_domain(), config.instance),
        })
    }

    // ----- Escrow book -----

    /// See [`EscrowMarket::create_order`].
    ///
    /// # Errors
    /// As [`EscrowMarket::create_order`].
    pub fn create_order<L>(
        &mut self,
        ledger: &mut L,
        ctx: &CallContext,
        new: NewOrder,
    ) -> Result<OrderId>
    where
        L: AssetLedger + ?Sized,
    {
        self.book.create_order(&self.governance, ledger, ctx, new)
    }

    /// See [`EscrowMarket::fill_order`].
    ///
    /// # Errors
    /// As [`EscrowMarket::fill_order`].
    pub fn fill_order<L>(
        &mut self,
        ledger: &mut L,
        ctx: &CallContext,
        id: OrderId,
        amount: Amount,
    ) -> Result<FillReceipt>
    where
        L: AssetLedger + ?Sized,
    {
        self.book.fill_order(&self.governance, ledger, ctx, id, amount)
    }

    /// See [`EscrowMarket::cancel_order`].
    ///
    /// # Errors
    /// As [`EscrowMarket::cancel_order`].
    pub fn cancel_order<L>(
        &mut self,
        ledger: &mut L,
        ctx: &CallContext,
        id: OrderId,
    ) -> Result<CancelReceipt>
    where
        L: AssetLedger + ?Sized,
    {
        self.book.cancel_order(ledger, ctx, id)
    }

    // ----- Signed orders -----

    /// See [`FixedMarket::fill_order`].
    ///
    /// # Errors
    /// As [`FixedMarket::fill_order`].
    pub fn fill_signed_order<L>(
        &mut self,
        ledger: &mut L,
        ctx: &CallContext,
        order: &SignedOrder,
        signature: &OrderSignature,
    ) -> Result<FillReceipt>
    where
        L: AssetLedger + ?Sized,
    {
        self.fixed
            .fill_order(&self.governance, ledger, ctx, order, signature)
    }

    /// # Errors
    /// As [`FixedMarket::cancel_order`].
    pub fn cancel_signed_order(
        &mut self,
        ctx: &CallContext,
        order: &SignedOrder,
    ) -> Result<CancelReceipt> {
        self.fixed.cancel_order(ctx, order)
    }

    /// # Errors
    /// As [`FixedMarket::cancel_order_hash`].
    pub fn cancel_order_hash(&mut self, ctx: &CallContext, hash: OrderHash) -> Result<()> {
        self.fixed.cancel_order_hash(ctx, hash)
    }

    #[must_use]
    pub fn hash_order(&self, order: &SignedOrder) -> OrderHash {
        self.fixed.hash_order(order)
    }

    // ----- Reads -----

    #[must_use]
    pub fn order(&self, id: OrderId) -> Option<&EscrowOrder> {
        self.book.order(id)
    }

    #[must_use]
    pub fn next_order_id(&self) -> OrderId {
        self.book.next_order_id()
    }

    /// # Errors
    /// Returns `OrderNotFound` for an unknown id.
    pub fn order_status(&self, id: OrderId, now: Timestamp) -> Result<OrderStatus> {
        self.book.order_status(id, now)
    }

    #[must_use]
    pub fn signed_order_status(
        &self,
        maker: &Address,
        hash: &OrderHash,
    ) -> Option<CommitmentState> {
        self.fixed.order_status(maker, hash)
    }

    #[must_use]
    pub fn custodied(&self, asset: &AssetId) -> Amount {
        self.book.custodied(asset)
    }

    #[must_use]
    pub fn book(&self) -> &EscrowMarket {
        &self.book
    }

    #[must_use]
    pub fn fixed(&self) -> &FixedMarket {
        &self.fixed
    }

    #[must_use]
    pub fn governance(&self) -> &Governance {
        &self.governance
    }

    #[must_use]
    pub fn maker_fee(&self) -> BasisPoints {
        self.governance.maker_fee()
    }

    #[must_use]
    pub fn taker_fee(&self) -> BasisPoints {
        self.governance.taker_fee()
    }

    #[must_use]
    pub fn fee_recipient(&self) -> Address {
        self.governance.fee_recipient()
    }

    #[must_use]
    pub fn is_paused(&self) -> bool {
        self.governance.is_paused()
    }

    #[must_use]
    pub fn owner(&self) -> Address {
        self.governance.owner()
    }

    // ----- Administration -----

    /// # Errors
    /// `NotOwner` or `InvalidFee`.
    pub fn set_fee(&mut self, caller: &Address, maker_bps: u16, taker_bps: u16) -> Result<()> {
        self.governance.set_fee(caller, maker_bps, taker_bps)
    }

    /// # Errors
    /// `NotOwner`, or `Configuration` for the instance address.
    pub fn set_fee_recipient(&mut self, caller: &Address, recipient: Address) -> Result<()> {
        self.governance.set_fee_recipient(caller, recipient)
    }

    /// Stops creates and fills on both markets.
    ///
    /// # Errors
    /// `NotOwner`.
    pub fn pause(&mut self, caller: &Address) -> Result<()> {
        self.governance.pause(caller)
    }

    /// # Errors
    /// `NotOwner`.
    pub fn unpause(&mut self, caller: &Address) -> Result<()> {
        self.governance.unpause(caller)
    }

    /// # Errors
    /// `NotOwner`, or `Configuration` for the zero address.
    pub fn transfer_ownership(&mut self, caller: &Address, new_owner: Address) -> Result<()> {
        self.governance.transfer_ownership(caller, new_owner)
    }
}
