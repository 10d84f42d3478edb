//! # otcbook-market
//!
//! The two OTCBook markets and the controls they share.
//!
//! ## Markets
//!
//! - [`EscrowMarket`]: standing orders with collateral held in custody,
//!   partial fills in give-side units, maker cancellation with refund.
//! - [`FixedMarket`]: off-ledger signed orders taken whole; only the
//!   commitment hash is recorded.
//!
//! ## Shared controls
//!
//! One [`Governance`] (fee schedule, fee recipient, and an [`AccessGate`]
//! for the owner and pause flag) serves both markets. [`OtcEngine`] owns it
//! and lends it to each market call, so a single pause or fee change takes
//! effect everywhere. Creates and fills are refused while paused;
//! cancellation never is.
//!
//! Every operation takes a [`CallContext`] and a mutable
//! [`AssetLedger`](otcbook_ledger::AssetLedger). A rejected or failed call
//! leaves both the market and the ledger unchanged.

pub mod commitments;
pub mod context;
pub mod engine;
pub mod escrow_book;
pub mod fixed_market;
pub mod gate;
pub mod governance;

pub use commitments::{CommitmentRegistry, CommitmentState};
pub use context::CallContext;
pub use engine::OtcEngine;
pub use escrow_book::{EscrowMarket, NewOrder};
pub use fixed_market::FixedMarket;
pub use gate::AccessGate;
pub use governance::Governance;
