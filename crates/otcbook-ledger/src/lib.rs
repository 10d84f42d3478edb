//! # otcbook-ledger
//!
//! The asset side of OTCBook: the [`AssetLedger`] interface the markets
//! settle against, the [`Custody`] adapter that routes native value and
//! tokens through the engine's custody account, and [`InMemoryLedger`], a
//! journaled reference ledger with supply-conservation checks.
//!
//! Multi-leg settlements run inside [`atomically`], which commits every leg
//! or reverts the ledger to where it started.

pub mod custody;
pub mod ledger;
pub mod memory;
pub mod supply_conservation;

pub use custody::Custody;
pub use ledger::{AssetLedger, Checkpoint, atomically};
pub use memory::InMemoryLedger;
pub use supply_conservation::SupplyConservation;
