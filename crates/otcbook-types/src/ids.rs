//! Identifiers used throughout OTCBook.
//!
//! Participants are identified by an [`Address`]: for traders this is the raw
//! ed25519 verifying key, so a signed order's `maker` field doubles as the
//! key its signature is checked against. Engine instances and fee recipients
//! use the same 32-byte space.

use std::fmt;
use std::str::FromStr;

use ed25519_dalek::VerifyingKey;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::{OtcbookError, Result};

/// Quantity of an asset in its smallest indivisible unit.
pub type Amount = u128;

// ---------------------------------------------------------------------------
// Address
// ---------------------------------------------------------------------------

/// A 32-byte account identity. Serialized as `0x`-prefixed hex.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd)]
pub struct Address(pub [u8; 32]);

impl Address {
    /// The all-zero address. Never a valid owner.
    pub const ZERO: Self = Self([0u8; 32]);

    #[must_use]
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    #[must_use]
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; 32]
    }

    /// Address of the holder of an ed25519 key.
    #[must_use]
    pub fn from_verifying_key(key: &VerifyingKey) -> Self {
        Self(key.to_bytes())
    }

    /// Interpret this address as an ed25519 verifying key.
    ///
    /// # Errors
    /// Returns `BadSignature` if the bytes are not a valid curve point, since
    /// no signature can ever verify against such an address.
    pub fn verifying_key(&self) -> Result<VerifyingKey> {
        VerifyingKey::from_bytes(&self.0).map_err(|_| OtcbookError::BadSignature)
    }

    /// First four bytes as hex, for log lines.
    #[must_use]
    pub fn short(&self) -> String {
        hex::encode(&self.0[..4])
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl FromStr for Address {
    type Err = OtcbookError;

    fn from_str(s: &str) -> Result<Self> {
        let digits = s.strip_prefix("0x").unwrap_or(s);
        let bytes = hex::decode(digits)
            .map_err(|e| OtcbookError::Serialization(format!("address {s:?}: {e}")))?;
        let bytes: [u8; 32] = bytes.try_into().map_err(|v: Vec<u8>| {
            OtcbookError::Serialization(format!(
                "address {s:?}: expected 32 bytes, got {}",
                v.len()
            ))
        })?;
        Ok(Self(bytes))
    }
}

impl Serialize for Address {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

// ---------------------------------------------------------------------------
// AssetId
// ---------------------------------------------------------------------------

/// One of the two kinds of asset the engine can custody.
///
/// `Native` is the ledger's intrinsic unit: it arrives as value attached to
/// a call and leaves by direct push. `Token` assets move through the
/// allowance-based fungible-asset interface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssetId {
    Native,
    Token(Address),
}

impl AssetId {
    #[must_use]
    pub fn is_native(&self) -> bool {
        matches!(self, Self::Native)
    }

    /// The token contract address, or `None` for the native asset.
    #[must_use]
    pub fn token(&self) -> Option<Address> {
        match self {
            Self::Native => None,
            Self::Token(addr) => Some(*addr),
        }
    }
}

impl fmt::Display for AssetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Native => write!(f, "native"),
            Self::Token(addr) => write!(f, "token:{}", addr.short()),
        }
    }
}

// ---------------------------------------------------------------------------
// OrderId
// ---------------------------------------------------------------------------

/// Sequential identifier of an escrow book order. The first order is `0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct OrderId(pub u64);

impl OrderId {
    #[must_use]
    pub fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "order:{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// OrderHash
// ---------------------------------------------------------------------------

/// Domain-separated commitment to a signed order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct OrderHash(pub [u8; 32]);

impl OrderHash {
    #[must_use]
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    #[must_use]
    pub fn short(&self) -> String {
        hex::encode(&self.0[..4])
    }
}

impl fmt::Display for OrderHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

// ---------------------------------------------------------------------------
// Timestamp
// ---------------------------------------------------------------------------

/// Seconds since the UNIX epoch, as seen by the executing environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct Timestamp(pub u64);

impl Timestamp {
    #[must_use]
    pub fn plus_secs(self, secs: u64) -> Self {
        Self(self.0.saturating_add(secs))
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}s", self.0)
    }
}

/// Random addresses for tests. **Never use in production.**
#[cfg(any(test, feature = "test-helpers"))]
impl Address {
    pub fn random() -> Self {
        Self(rand::random::<[u8; 32]>())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn address_hex_roundtrip() {
        let addr = Address::random();
        let text = addr.to_string();
        assert!(text.starts_with("0x"));
        assert_eq!(text.len(), 66);
        let back: Address = text.parse().unwrap();
        assert_eq!(addr, back);
    }

    #[test]
    fn address_parse_without_prefix() {
        let addr: Address = "11".repeat(32).parse().unwrap();
        assert_eq!(addr, Address([0x11; 32]));
    }

    #[test]
    fn address_parse_rejects_wrong_length() {
        let err = "0xabcd".parse::<Address>().unwrap_err();
        assert!(matches!(err, OtcbookError::Serialization(_)));
    }

    #[test]
    fn zero_address() {
        assert!(Address::ZERO.is_zero());
        assert!(!Address([1u8; 32]).is_zero());
    }

    #[test]
    fn asset_id_kinds() {
        let token = Address([7u8; 32]);
        assert!(AssetId::Native.is_native());
        assert_eq!(AssetId::Native.token(), None);
        assert_eq!(AssetId::Token(token).token(), Some(token));
        assert_eq!(format!("{}", AssetId::Native), "native");
        assert_eq!(format!("{}", AssetId::Token(token)), "token:07070707");
    }

    #[test]
    fn order_id_next() {
        assert_eq!(OrderId(5).next(), OrderId(6));
        assert_eq!(format!("{}", OrderId(3)), "order:3");
    }

    #[test]
    fn timestamp_plus_saturates() {
        assert_eq!(Timestamp(u64::MAX).plus_secs(5), Timestamp(u64::MAX));
        assert_eq!(Timestamp(10).plus_secs(5), Timestamp(15));
    }

    #[test]
    fn serde_roundtrips() {
        let addr = Address::random();
        let json = serde_json::to_string(&addr).unwrap();
        assert_eq!(json, format!("\"{addr}\""));
        let back: Address = serde_json::from_str(&json).unwrap();
        assert_eq!(addr, back);

        let asset = AssetId::Token(addr);
        let json = serde_json::to_string(&asset).unwrap();
        let back: AssetId = serde_json::from_str(&json).unwrap();
        assert_eq!(asset, back);

        let json = serde_json::to_string(&AssetId::Native).unwrap();
        assert_eq!(json, "\"native\"");
    }
}
