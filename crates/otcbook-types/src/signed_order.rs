//! # Signed orders: off-ledger intents redeemable once
//!
//! A maker fully specifies a [`SignedOrder`] and signs its commitment with
//! their ed25519 key. Nothing is posted on the ledger until a taker redeems
//! it; the commitment ([`OrderHash`]) is then the only thing recorded.
//!
//! ## Commitment
//!
//! ```text
//! domain_separator = sha256(DOMAIN_TAG || sha256(name) || sha256(version)
//!                           || chain_id || verifying_contract)
//! struct_hash      = sha256(ORDER_TAG || maker || maker_asset || taker_asset
//!                           || making_amount || taking_amount || expire_time || salt)
//! order_hash       = sha256(0x19 0x01 || domain_separator || struct_hash)
//! ```
//!
//! Binding the verifying contract and chain id into the separator stops a
//! signature made for one engine instance from being redeemed at another.

use ed25519_dalek::{Signature, Signer};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

pub use ed25519_dalek::SigningKey;

use crate::constants::{
    DEFAULT_DOMAIN_NAME, DEFAULT_DOMAIN_VERSION, DOMAIN_TYPE_TAG, ORDER_TYPE_TAG,
    SIGNING_DIGEST_PREFIX,
};
use crate::{Address, Amount, AssetId, OrderHash, OtcbookError, Result, Timestamp};

/// Identity of the engine instance that signatures are bound to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SigningDomain {
    pub name: String,
    pub version: String,
    pub chain_id: u64,
    /// Address of the engine instance that will redeem the order.
    pub verifying_contract: Address,
}

impl SigningDomain {
    /// Domain with the default name and version.
    #[must_use]
    pub fn new(chain_id: u64, verifying_contract: Address) -> Self {
        Self {
            name: DEFAULT_DOMAIN_NAME.to_string(),
            version: DEFAULT_DOMAIN_VERSION.to_string(),
            chain_id,
            verifying_contract,
        }
    }

    #[must_use]
    pub fn separator(&self) -> [u8; 32] {
        let mut hasher = Sha256::new();
        hasher.update(DOMAIN_TYPE_TAG);
        hasher.update(Sha256::digest(self.name.as_bytes()));
        hasher.update(Sha256::digest(self.version.as_bytes()));
        hasher.update(self.chain_id.to_be_bytes());
        hasher.update(self.verifying_contract.as_bytes());
        hasher.finalize().into()
    }
}

/// A fully specified swap intent, signed by `maker`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SignedOrder {
    pub maker: Address,
    /// Asset the maker gives. Must be a token: the maker isn't present to
    /// attach native value.
    pub maker_asset: AssetId,
    /// Asset the taker pays.
    pub taker_asset: AssetId,
    pub making_amount: Amount,
    pub taking_amount: Amount,
    pub expire_time: Timestamp,
    /// Uniqueness nonce; lets a maker sign identical terms more than once.
    pub salt: u128,
}

/// Raw ed25519 signature bytes as submitted by a taker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderSignature(pub Vec<u8>);

fn encode_asset(hasher: &mut Sha256, asset: &AssetId) {
    match asset {
        AssetId::Native => {
            hasher.update([0u8]);
            hasher.update([0u8; 32]);
        }
        AssetId::Token(addr) => {
            hasher.update([1u8]);
            hasher.update(addr.as_bytes());
        }
    }
}

impl SignedOrder {
    /// Hash of the order fields alone, before domain binding.
    #[must_use]
    pub fn struct_hash(&self) -> [u8; 32] {
        let mut hasher = Sha256::new();
        hasher.update(ORDER_TYPE_TAG);
        hasher.update(self.maker.as_bytes());
        encode_asset(&mut hasher, &self.maker_asset);
        encode_asset(&mut hasher, &self.taker_asset);
        hasher.update(self.making_amount.to_be_bytes());
        hasher.update(self.taking_amount.to_be_bytes());
        hasher.update(self.expire_time.0.to_be_bytes());
        hasher.update(self.salt.to_be_bytes());
        hasher.finalize().into()
    }

    /// The commitment tracked for fills and cancellations, and the message
    /// the maker signs.
    #[must_use]
    pub fn hash(&self, domain: &SigningDomain) -> OrderHash {
        let mut hasher = Sha256::new();
        hasher.update(SIGNING_DIGEST_PREFIX);
        hasher.update(domain.separator());
        hasher.update(self.struct_hash());
        OrderHash(hasher.finalize().into())
    }

    /// Sign this order for `domain`.
    #[must_use]
    pub fn sign(&self, domain: &SigningDomain, key: &SigningKey) -> OrderSignature {
        let hash = self.hash(domain);
        OrderSignature(key.sign(hash.as_bytes()).to_bytes().to_vec())
    }

    /// Check that `signature` was produced by `self.maker` over this exact
    /// order in `domain`.
    ///
    /// Verification is strict: small-order maker keys and non-canonical
    /// signature points are refused.
    ///
    /// # Errors
    /// Returns `BadSignature` on any malformed input or failed verification.
    pub fn verify(&self, domain: &SigningDomain, signature: &OrderSignature) -> Result<()> {
        let key = self.maker.verifying_key()?;
        let signature =
            Signature::from_slice(&signature.0).map_err(|_| OtcbookError::BadSignature)?;
        key.verify_strict(self.hash(domain).as_bytes(), &signature)
            .map_err(|_| OtcbookError::BadSignature)
    }
}

/// Fresh random signing key for tests. **Never use in production.**
#[cfg(any(test, feature = "test-helpers"))]
pub fn random_signing_key() -> SigningKey {
    SigningKey::generate(&mut rand::rngs::OsRng)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn domain() -> SigningDomain {
        SigningDomain::new(31_337, Address([0xEE; 32]))
    }

    fn order_for(key: &SigningKey) -> SignedOrder {
        SignedOrder {
            maker: Address::from_verifying_key(&key.verifying_key()),
            maker_asset: AssetId::Token(Address([0xA0; 32])),
            taker_asset: AssetId::Token(Address([0xB0; 32])),
            making_amount: 1_000,
            taking_amount: 1_000,
            expire_time: Timestamp(10_000_000_000),
            salt: 69,
        }
    }

    #[test]
    fn hash_deterministic() {
        let key = random_signing_key();
        let order = order_for(&key);
        assert_eq!(order.hash(&domain()), order.hash(&domain()));
    }

    #[test]
    fn hash_differs_by_every_field() {
        let key = random_signing_key();
        let base = order_for(&key);
        let d = domain();
        let variants = [
            SignedOrder {
                maker: Address::random(),
                ..base.clone()
            },
            SignedOrder {
                maker_asset: AssetId::Token(Address([0xA1; 32])),
                ..base.clone()
            },
            SignedOrder {
                taker_asset: AssetId::Native,
                ..base.clone()
            },
            SignedOrder {
                making_amount: 1_001,
                ..base.clone()
            },
            SignedOrder {
                taking_amount: 10_000,
                ..base.clone()
            },
            SignedOrder {
                expire_time: Timestamp(1),
                ..base.clone()
            },
            SignedOrder {
                salt: 70,
                ..base.clone()
            },
        ];
        for variant in &variants {
            assert_ne!(variant.hash(&d), base.hash(&d), "{variant:?}");
        }
    }

    #[test]
    fn hash_bound_to_domain() {
        let key = random_signing_key();
        let order = order_for(&key);
        let other_instance = SigningDomain::new(31_337, Address([0xEF; 32]));
        let other_chain = SigningDomain::new(1, Address([0xEE; 32]));
        assert_ne!(order.hash(&domain()), order.hash(&other_instance));
        assert_ne!(order.hash(&domain()), order.hash(&other_chain));
    }

    #[test]
    fn sign_and_verify() {
        let key = random_signing_key();
        let order = order_for(&key);
        let sig = order.sign(&domain(), &key);
        assert!(order.verify(&domain(), &sig).is_ok());
    }

    #[test]
    fn tampered_order_fails() {
        let key = random_signing_key();
        let order = order_for(&key);
        let sig = order.sign(&domain(), &key);
        let tampered = SignedOrder {
            taking_amount: 10_000,
            ..order
        };
        assert_eq!(
            tampered.verify(&domain(), &sig).unwrap_err(),
            OtcbookError::BadSignature
        );
    }

    #[test]
    fn signature_from_other_key_fails() {
        let key = random_signing_key();
        let order = order_for(&key);
        let sig = order.sign(&domain(), &random_signing_key());
        assert!(order.verify(&domain(), &sig).is_err());
    }

    #[test]
    fn signature_replayed_on_other_instance_fails() {
        let key = random_signing_key();
        let order = order_for(&key);
        let sig = order.sign(&domain(), &key);
        let other = SigningDomain::new(31_337, Address([0x01; 32]));
        assert!(order.verify(&other, &sig).is_err());
    }

    #[test]
    fn malformed_signature_fails() {
        let key = random_signing_key();
        let order = order_for(&key);
        let err = order
            .verify(&domain(), &OrderSignature(vec![1, 2, 3]))
            .unwrap_err();
        assert_eq!(err, OtcbookError::BadSignature);
    }

    #[test]
    fn identity_maker_key_cannot_authorize_orders() {
        // Compressed identity point. With R = identity and s = 0 the
        // verification equation holds for every message.
        let mut identity = [0u8; 32];
        identity[0] = 1;
        let mut order = order_for(&random_signing_key());
        order.maker = Address::from_bytes(identity);

        let mut forged = identity.to_vec();
        forged.extend_from_slice(&[0u8; 32]);
        let err = order.verify(&domain(), &OrderSignature(forged)).unwrap_err();
        assert_eq!(err, OtcbookError::BadSignature);
    }
}
