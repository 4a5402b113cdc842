// -*- mode: rust; -*-
//
// This file is part of ed25519-donna.
// Copyright (c) 2017-2019 isis lovecruft
// See LICENSE for licensing information.
//
// Authors:
// - isis agora lovecruft <isis@patternsinthevoid.net>

//! ed25519 public keys.

use core::fmt::Debug;

use sha2::Digest;

use crate::constants::PUBLIC_KEY_LENGTH;
use crate::edwards::{CompressedEdwardsY, EdwardsPoint};
use crate::errors::{InternalError, SignatureError};
use crate::options::SignatureOptions;
use crate::scalar::Scalar;
use crate::signature::Signature;

/// An ed25519 public key.
///
/// Holds the wire encoding alongside the decompressed *negation* of the
/// point: the verification equation is evaluated as \\( R' = k(-A) + sB
/// \\), so decoding \\( -A \\) once up front saves a negation per
/// verification.  The original bytes are kept because the challenge
/// hash commits to the encoding exactly as received, canonical or not.
// Invariant: `neg_point` is the decompression of `compressed`, negated.
#[derive(Copy, Clone)]
pub struct VerifyingKey {
    pub(crate) compressed: CompressedEdwardsY,
    pub(crate) neg_point: EdwardsPoint,
}

impl Debug for VerifyingKey {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "VerifyingKey({:?})", self.compressed)
    }
}

impl PartialEq for VerifyingKey {
    fn eq(&self, other: &VerifyingKey) -> bool {
        self.compressed == other.compressed
    }
}

impl Eq for VerifyingKey {}

impl VerifyingKey {
    /// Construct a `VerifyingKey` from its 32-byte wire encoding.
    ///
    /// Fails only when the encoded \\( y \\) determines no curve point.
    /// Non-canonical encodings and small-order points are accepted here:
    /// whether they verify anything is a property of the verification
    /// mode, not of parsing.
    pub fn from_bytes(bytes: &[u8; PUBLIC_KEY_LENGTH]) -> Result<VerifyingKey, SignatureError> {
        let compressed = CompressedEdwardsY(*bytes);
        let neg_point = compressed
            .decompress_negative_vartime()
            .ok_or(InternalError::PointDecompression)?;
        Ok(VerifyingKey {
            compressed,
            neg_point,
        })
    }

    /// Construct a `VerifyingKey` from a freshly computed public point.
    pub(crate) fn from_point(point: EdwardsPoint) -> VerifyingKey {
        VerifyingKey {
            compressed: point.compress(),
            neg_point: -&point,
        }
    }

    /// View this public key as its wire encoding.
    pub fn as_bytes(&self) -> &[u8; PUBLIC_KEY_LENGTH] {
        self.compressed.as_bytes()
    }

    /// Copy this public key's wire encoding.
    pub fn to_bytes(&self) -> [u8; PUBLIC_KEY_LENGTH] {
        self.compressed.to_bytes()
    }

    /// Does this key have small order, i.e. does every message verify
    /// under it in cofactored verification?  Variable time.
    pub fn is_small_order(&self) -> bool {
        self.neg_point.is_small_order_vartime()
    }

    /// Verify `signature` on `message` as pure Ed25519 with strict
    /// semantics.
    pub fn verify(&self, message: &[u8], signature: &Signature) -> Result<(), SignatureError> {
        self.verify_with_options(message, signature, &SignatureOptions::ED25519)
    }

    /// Verify `signature` on `message` with the given options.
    ///
    /// In strict mode (the default) the recomputed \\( R' \\) must
    /// re-compress to exactly the signature's `R` bytes, and
    /// small-order public keys are rejected.  In ZIP-215 mode the
    /// signature's `R` is decompressed leniently and accepted whenever
    /// \\( [8](R' - R) \\) is the identity.
    pub fn verify_with_options(
        &self,
        message: &[u8],
        signature: &Signature,
        options: &SignatureOptions<'_>,
    ) -> Result<(), SignatureError> {
        // Validate the dom2 options before touching the signature, so
        // option misuse is distinguishable from a bad signature.
        let mut h = options.begin_hash(message)?;

        if !options.zip215 && self.is_small_order() {
            return Err(InternalError::Verify.into());
        }

        // RFC 8032 §5.1.7: reject s >= l to rule out malleability.
        if !signature.s_is_canonical() {
            return Err(InternalError::ScalarFormat.into());
        }

        // k = H(dom2 || R || A || M)
        h.update(signature.r_bytes());
        h.update(self.as_bytes());
        h.update(message);
        let k = Scalar::from_bytes(h.finalize().as_slice());

        let s = Scalar::from_bytes(signature.s_bytes());

        // R' = k(-A) + sB
        let r_prime = EdwardsPoint::vartime_double_scalar_mul_basepoint(&k, &self.neg_point, &s);

        let ok = if options.zip215 {
            match CompressedEdwardsY(*signature.r_bytes()).decompress_vartime() {
                Some(r) => r_prime.cofactor_equal_vartime(&r),
                None => false,
            }
        } else {
            r_prime.compress().as_bytes() == signature.r_bytes()
        };

        if ok {
            Ok(())
        } else {
            Err(InternalError::Verify.into())
        }
    }
}

impl TryFrom<&[u8]> for VerifyingKey {
    type Error = SignatureError;

    fn try_from(bytes: &[u8]) -> Result<VerifyingKey, SignatureError> {
        let bytes: &[u8; PUBLIC_KEY_LENGTH] =
            bytes.try_into().map_err(|_| InternalError::BytesLength {
                name: "VerifyingKey",
                length: PUBLIC_KEY_LENGTH,
            })?;
        VerifyingKey::from_bytes(bytes)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::signing::SigningKey;

    #[test]
    fn round_trips_preserve_bytes() {
        let sk = SigningKey::from_bytes(&[3u8; 32]);
        let vk = sk.verifying_key();
        let vk2 = VerifyingKey::from_bytes(&vk.to_bytes()).unwrap();
        assert_eq!(vk, vk2);
        // The cached negated points must verify identically.
        let sig = sk.sign(b"round trip");
        assert!(vk2.verify(b"round trip", &sig).is_ok());
    }

    #[test]
    fn low_order_key_rejected_only_in_strict_mode() {
        // The identity is a (pathological but decodable) public key.
        let mut identity = [0u8; 32];
        identity[0] = 1;
        let vk = VerifyingKey::from_bytes(&identity).unwrap();
        assert!(vk.is_small_order());
        // Under ZIP-215 the identity key verifies anything with s = 0
        // and R the identity.
        let mut sig_bytes = [0u8; 64];
        sig_bytes[0] = 1;
        let sig = Signature::from_bytes(&sig_bytes).unwrap();
        assert!(vk.verify(b"msg", &sig).is_err());
        assert!(vk
            .verify_with_options(b"msg", &sig, &SignatureOptions::ZIP215)
            .is_ok());
    }
}
