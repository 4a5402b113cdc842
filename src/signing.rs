// -*- mode: rust; -*-
//
// This file is part of ed25519-donna.
// Copyright (c) 2017-2019 isis lovecruft
// See LICENSE for licensing information.
//
// Authors:
// - isis agora lovecruft <isis@patternsinthevoid.net>

//! ed25519 signing keys.

use core::fmt::Debug;

use rand_core::{CryptoRng, RngCore};
use sha2::{Digest, Sha512};

#[cfg(feature = "zeroize")]
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::constants::{KEYPAIR_LENGTH, SECRET_KEY_LENGTH};
use crate::edwards::EdwardsPoint;
use crate::errors::{InternalError, SignatureError};
use crate::options::SignatureOptions;
use crate::scalar::{clamp_integer, Scalar};
use crate::signature::Signature;
use crate::verifying::VerifyingKey;

/// ed25519 secret key as defined in RFC 8032: a 32-byte seed.
pub type SecretKey = [u8; SECRET_KEY_LENGTH];

/// ed25519 signing key which can be used to produce signatures.
// Invariant: `verifying_key` is always the public half of
// `secret_key`.
#[derive(Clone)]
pub struct SigningKey {
    /// The seed, from which the signing scalar and the nonce prefix are
    /// derived.
    pub(crate) secret_key: SecretKey,
    /// The public half, cached.
    pub(crate) verifying_key: VerifyingKey,
}

/// The expanded form of a secret key: the clamped signing scalar `a`
/// and the domain-separation prefix for the deterministic nonce, both
/// halves of `SHA-512(seed)`.
pub(crate) struct ExpandedSecretKey {
    pub(crate) scalar: Scalar,
    pub(crate) hash_prefix: [u8; 32],
}

#[cfg(feature = "zeroize")]
impl Drop for ExpandedSecretKey {
    fn drop(&mut self) {
        self.scalar.zeroize();
        self.hash_prefix.zeroize();
    }
}

impl ExpandedSecretKey {
    /// Expand a seed into a signing scalar and nonce prefix.
    pub(crate) fn from_seed(seed: &SecretKey) -> ExpandedSecretKey {
        let hash = Sha512::digest(seed);
        let mut scalar_bytes = [0u8; 32];
        let mut hash_prefix = [0u8; 32];
        scalar_bytes.copy_from_slice(&hash[..32]);
        hash_prefix.copy_from_slice(&hash[32..]);

        let scalar = Scalar::from_bytes_raw(&clamp_integer(scalar_bytes));

        #[cfg(feature = "zeroize")]
        scalar_bytes.zeroize();

        ExpandedSecretKey {
            scalar,
            hash_prefix,
        }
    }
}

impl Debug for SigningKey {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("SigningKey")
            .field("verifying_key", &self.verifying_key)
            .finish_non_exhaustive() // avoids printing the secret half
    }
}

#[cfg(feature = "zeroize")]
impl Zeroize for SigningKey {
    fn zeroize(&mut self) {
        self.secret_key.zeroize();
    }
}

#[cfg(feature = "zeroize")]
impl ZeroizeOnDrop for SigningKey {}

#[cfg(feature = "zeroize")]
impl Drop for SigningKey {
    fn drop(&mut self) {
        self.zeroize();
    }
}

impl SigningKey {
    /// Construct a `SigningKey` from a 32-byte seed.
    pub fn from_bytes(secret_key: &SecretKey) -> SigningKey {
        let expanded = ExpandedSecretKey::from_seed(secret_key);
        let point = EdwardsPoint::mul_base(&expanded.scalar);
        SigningKey {
            secret_key: *secret_key,
            verifying_key: VerifyingKey::from_point(point),
        }
    }

    /// Convert this `SigningKey` into its seed bytes.
    pub fn to_bytes(&self) -> SecretKey {
        self.secret_key
    }

    /// View this `SigningKey` as its seed bytes.
    pub fn as_bytes(&self) -> &SecretKey {
        &self.secret_key
    }

    /// Generate a `SigningKey` with 32 bytes from the given `csprng`.
    ///
    /// An error from the random source is propagated rather than
    /// papered over; short reads would silently weaken the key.
    pub fn generate<R: CryptoRng + RngCore>(csprng: &mut R) -> Result<SigningKey, SignatureError> {
        let mut seed: SecretKey = [0u8; SECRET_KEY_LENGTH];
        csprng
            .try_fill_bytes(&mut seed)
            .map_err(|_| InternalError::RngUnderflow)?;
        let key = SigningKey::from_bytes(&seed);
        #[cfg(feature = "zeroize")]
        seed.zeroize();
        Ok(key)
    }

    /// Construct a `SigningKey` from the 64-byte `seed || public-key`
    /// keypair format.
    ///
    /// Fails if the embedded public half is not the public key of the
    /// seed, which would otherwise go unnoticed until signatures made
    /// with the mismatched `A` fail to verify.
    pub fn from_keypair_bytes(bytes: &[u8; KEYPAIR_LENGTH]) -> Result<SigningKey, SignatureError> {
        let mut seed = [0u8; SECRET_KEY_LENGTH];
        seed.copy_from_slice(&bytes[..SECRET_KEY_LENGTH]);
        let key = SigningKey::from_bytes(&seed);
        if key.verifying_key.as_bytes() != &bytes[SECRET_KEY_LENGTH..] {
            return Err(InternalError::MismatchedKeypair.into());
        }
        Ok(key)
    }

    /// Convert this `SigningKey` to the 64-byte `seed || public-key`
    /// keypair format.
    pub fn to_keypair_bytes(&self) -> [u8; KEYPAIR_LENGTH] {
        let mut bytes = [0u8; KEYPAIR_LENGTH];
        bytes[..SECRET_KEY_LENGTH].copy_from_slice(&self.secret_key);
        bytes[SECRET_KEY_LENGTH..].copy_from_slice(self.verifying_key.as_bytes());
        bytes
    }

    /// The public `VerifyingKey` of this `SigningKey`.
    pub fn verifying_key(&self) -> VerifyingKey {
        self.verifying_key
    }

    /// Sign `message` as pure Ed25519.
    pub fn sign(&self, message: &[u8]) -> Signature {
        // Pure Ed25519 options cannot fail validation.
        self.sign_with_options(message, &SignatureOptions::ED25519)
            .expect("pure Ed25519 options are always valid")
    }

    /// Sign `message` with the given dom2 options.
    ///
    /// For Ed25519ph (`options.prehashed`), `message` must be the
    /// 64-byte SHA-512 digest of the actual message.
    pub fn sign_with_options(
        &self,
        message: &[u8],
        options: &SignatureOptions<'_>,
    ) -> Result<Signature, SignatureError> {
        let expanded = ExpandedSecretKey::from_seed(&self.secret_key);

        // r = H(dom2 || prefix || M)
        let mut h = options.begin_hash(message)?;
        h.update(expanded.hash_prefix);
        h.update(message);
        let r = Scalar::from_bytes(h.finalize().as_slice());

        // R = rB
        let big_r = EdwardsPoint::mul_base(&r).compress();

        // k = H(dom2 || R || A || M)
        let mut h = options.begin_hash(message)?;
        h.update(big_r.as_bytes());
        h.update(self.verifying_key.as_bytes());
        h.update(message);
        let k = Scalar::from_bytes(h.finalize().as_slice());

        // s = r + k a  (mod l)
        let s = r.add(&k.mul(&expanded.scalar));

        Ok(Signature {
            r_bytes: big_r.to_bytes(),
            s_bytes: s.to_bytes(),
        })
    }

    /// Verify a signature on `message` against this key's public half,
    /// as pure Ed25519 with strict semantics.
    pub fn verify(&self, message: &[u8], signature: &Signature) -> Result<(), SignatureError> {
        self.verifying_key.verify(message, signature)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn keypair_bytes_round_trip() {
        let sk = SigningKey::from_bytes(&[42u8; 32]);
        let kp = sk.to_keypair_bytes();
        let sk2 = SigningKey::from_keypair_bytes(&kp).unwrap();
        assert_eq!(sk.to_bytes(), sk2.to_bytes());

        let mut corrupt = kp;
        corrupt[SECRET_KEY_LENGTH] ^= 1;
        assert!(SigningKey::from_keypair_bytes(&corrupt).is_err());
    }

    #[test]
    fn signing_is_deterministic() {
        let sk = SigningKey::from_bytes(&[7u8; 32]);
        let one = sk.sign(b"attack at dawn");
        let two = sk.sign(b"attack at dawn");
        assert_eq!(one.to_bytes(), two.to_bytes());
    }
}
