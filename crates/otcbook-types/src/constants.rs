//! System-wide constants for the OTCBook markets.

/// Basis-point denominator: 10 000 bps == 100%.
pub const BPS_DENOMINATOR: u16 = 10_000;

/// Highest fee rate the owner may configure (100%).
pub const MAX_FEE_BPS: u16 = BPS_DENOMINATOR;

/// Default maker fee applied by a freshly configured engine (1%).
pub const DEFAULT_MAKER_FEE_BPS: u16 = 100;

/// Default taker fee applied by a freshly configured engine (1%).
pub const DEFAULT_TAKER_FEE_BPS: u16 = 100;

/// Smallest proportional take amount a book fill may compute.
///
/// A fill whose floored take amount is below this value is rejected with
/// `AmountTooLow`, so a taker can never receive collateral for nothing.
pub const MIN_FILL_TAKE_AMOUNT: u128 = 1;

/// Default signing-domain name for signed orders.
pub const DEFAULT_DOMAIN_NAME: &str = "OTCBook Fixed Market";

/// Default signing-domain version for signed orders.
pub const DEFAULT_DOMAIN_VERSION: &str = "1.0";

/// Tag hashed into every domain separator.
pub const DOMAIN_TYPE_TAG: &[u8] =
    b"otcbook:domain:v1(name,version,chain_id,verifying_contract)";

/// Tag hashed into every signed-order struct hash.
pub const ORDER_TYPE_TAG: &[u8] = b"otcbook:order:v1(maker,maker_asset,taker_asset,\
making_amount,taking_amount,expire_time,salt)";

/// Prefix of the final signing digest (structured-data convention).
pub const SIGNING_DIGEST_PREFIX: [u8; 2] = [0x19, 0x01];
