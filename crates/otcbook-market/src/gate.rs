//! Pause switch and owner check.
//!
//! While paused, order creation and fills are refused on both markets.
//! Cancellation never consults the gate, so makers can always get their
//! collateral back.

use otcbook_types::{Address, OtcbookError, Result};

/// Owner identity plus the pause flag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessGate {
    owner: Address,
    paused: bool,
}

impl AccessGate {
    /// Unpaused gate administered by `owner`.
    #[must_use]
    pub fn new(owner: Address) -> Self {
        Self {
            owner,
            paused: false,
        }
    }

    #[must_use]
    pub fn owner(&self) -> Address {
        self.owner
    }

    #[must_use]
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// # Errors
    /// Returns `NotOwner` unless `caller` is the owner.
    pub fn ensure_owner(&self, caller: &Address) -> Result<()> {
        if *caller == self.owner {
            Ok(())
        } else {
            Err(OtcbookError::NotOwner { caller: *caller })
        }
    }

    /// Guard a create or fill.
    ///
    /// # Errors
    /// Returns `Paused` while the gate is closed.
    pub fn ensure_not_paused(&self) -> Result<()> {
        if self.paused {
            Err(OtcbookError::Paused)
        } else {
            Ok(())
        }
    }

    /// # Errors
    /// Returns `NotOwner` for any caller but the owner.
    pub fn pause(&mut self, caller: &Address) -> Result<()> {
        self.ensure_owner(caller)?;
        self.paused = true;
        Ok(())
    }

    /// # Errors
    /// Returns `NotOwner` for any caller but the owner.
    pub fn unpause(&mut self, caller: &Address) -> Result<()> {
        self.ensure_owner(caller)?;
        self.paused = false;
        Ok(())
    }

    /// Hand administration to `new_owner`.
    ///
    /// # Errors
    /// `NotOwner` for a non-owner caller, `Configuration` for the zero
    /// address.
    pub fn transfer_ownership(&mut self, caller: &Address, new_owner: Address) -> Result<()> {
        self.ensure_owner(caller)?;
        if new_owner.is_zero() {
            return Err(OtcbookError::Configuration(
                "new owner must not be zero".into(),
            ));
        }
        self.owner = new_owner;
        Ok(())
    }
}
