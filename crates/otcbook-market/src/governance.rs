//! Owner-controlled market parameters: fee schedule, fee recipient, pause.
//!
//! One [`Governance`] is shared by both markets of an engine and passed by
//! reference into every create and fill. Fee changes take effect for fills
//! executed afterwards; nothing already settled is revisited.

use otcbook_types::{Address, Amount, BasisPoints, FeeConfig, FillFees, OtcbookError, Result};

use crate::gate::AccessGate;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Governance {
    gate: AccessGate,
    fees: FeeConfig,
    /// Custody account of the engine; never a valid fee recipient.
    custody_account: Address,
}

impl Governance {
    /// # Errors
    /// Returns `Configuration` if `fees.recipient` is the custody account.
    pub fn new(owner: Address, fees: FeeConfig, custody_account: Address) -> Result<Self> {
        Self::check_recipient(&fees.recipient, &custody_account)?;
        Ok(Self {
            gate: AccessGate::new(owner),
            fees,
            custody_account,
        })
    }

    fn check_recipient(recipient: &Address, custody_account: &Address) -> Result<()> {
        if recipient == custody_account {
            return Err(OtcbookError::Configuration(
                "fee recipient must differ from the custody account".into(),
            ));
        }
        Ok(())
    }

    // ----- Reads -----

    #[must_use]
    pub fn gate(&self) -> &AccessGate {
        &self.gate
    }

    #[must_use]
    pub fn fees(&self) -> &FeeConfig {
        &self.fees
    }

    #[must_use]
    pub fn maker_fee(&self) -> BasisPoints {
        self.fees.maker_fee
    }

    #[must_use]
    pub fn taker_fee(&self) -> BasisPoints {
        self.fees.taker_fee
    }

    #[must_use]
    pub fn fee_recipient(&self) -> Address {
        self.fees.recipient
    }

    #[must_use]
    pub fn is_paused(&self) -> bool {
        self.gate.is_paused()
    }

    #[must_use]
    pub fn owner(&self) -> Address {
        self.gate.owner()
    }

    /// Fees for a fill under the current schedule.
    #[must_use]
    pub fn quote(&self, give: Amount, take: Amount) -> FillFees {
        self.fees.quote(give, take)
    }

    /// # Errors
    /// Returns `Paused` while paused.
    pub fn ensure_open(&self) -> Result<()> {
        self.gate.ensure_not_paused()
    }

    // ----- Owner operations -----

    /// Replace both fee rates.
    ///
    /// # Errors
    /// `NotOwner` for a non-owner caller, `InvalidFee` above 10 000 bps.
    /// Neither rate changes on error.
    pub fn set_fee(&mut self, caller: &Address, maker_bps: u16, taker_bps: u16) -> Result<()> {
        self.gate.ensure_owner(caller)?;
        let maker_fee = BasisPoints::new(maker_bps)?;
        let taker_fee = BasisPoints::new(taker_bps)?;
        self.fees.maker_fee = maker_fee;
        self.fees.taker_fee = taker_fee;
        tracing::info!(
            maker_pct = %maker_fee.as_percent(),
            taker_pct = %taker_fee.as_percent(),
            "Fee schedule updated"
        );
        Ok(())
    }

    /// # Errors
    /// `NotOwner` for a non-owner caller, `Configuration` if `recipient` is
    /// the custody account.
    pub fn set_fee_recipient(&mut self, caller: &Address, recipient: Address) -> Result<()> {
        self.gate.ensure_owner(caller)?;
        Self::check_recipient(&recipient, &self.custody_account)?;
        self.fees.recipient = recipient;
        tracing::info!(recipient = %recipient, "Fee recipient updated");
        Ok(())
    }

    /// # Errors
    /// Returns `NotOwner` for a non-owner caller.
    pub fn pause(&mut self, caller: &Address) -> Result<()> {
        self.gate.pause(caller)?;
        tracing::info!("Market paused");
        Ok(())
    }

    /// # Errors
    /// Returns `NotOwner` for a non-owner caller.
    pub fn unpause(&mut self, caller: &Address) -> Result<()> {
        self.gate.unpause(caller)?;
        tracing::info!("Market unpaused");
        Ok(())
    }

    /// # Errors
    /// `NotOwner` for a non-owner caller, `Configuration` for the zero
    /// address.
    pub fn transfer_ownership(&mut self, caller: &Address, new_owner: Address) -> Result<()> {
        self.gate.transfer_ownership(caller, new_owner)?;
        tracing::info!(owner = %new_owner, "Ownership transferred");
        Ok(())
    }
}
