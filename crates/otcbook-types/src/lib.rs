//! # otcbook-types
//!
//! Shared types, errors, and configuration for **OTCBook**, a custodial
//! two-asset swap engine with an escrow order book and a signed-order
//! matcher.
//!
//! This crate is the leaf dependency of the workspace; every other crate
//! depends on it. It defines:
//!
//! - **Identifiers**: [`Address`], [`AssetId`], [`OrderId`], [`OrderHash`], [`Timestamp`]
//! - **Escrow book model**: [`EscrowOrder`], [`OrderStatus`]
//! - **Signed order model**: [`SignedOrder`], [`SigningDomain`], [`OrderSignature`]
//! - **Fee policy**: [`BasisPoints`], [`FeeSplit`], [`FillFees`], [`FeeConfig`]
//! - **Receipts**: [`FillReceipt`], [`CancelReceipt`], [`OrderRef`]
//! - **Configuration**: [`EngineConfig`]
//! - **Errors**: [`OtcbookError`] with `OB_ERR_` prefix codes
//! - **Constants**: fee limits, minimum fill, signing tags

pub mod config;
pub mod constants;
pub mod error;
pub mod fee;
pub mod ids;
pub mod order;
pub mod receipt;
pub mod signed_order;

// Re-export all primary types at crate root for ergonomic imports:
//   use otcbook_types::{EscrowOrder, SignedOrder, FeeConfig, ...};

pub use config::*;
pub use error::*;
pub use fee::*;
pub use ids::*;
pub use order::*;
pub use receipt::*;
pub use signed_order::*;

// Constants are accessed via `otcbook_types::constants::FOO`
// (not re-exported to avoid name collisions).
