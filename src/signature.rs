// -*- mode: rust; -*-
//
// This file is part of ed25519-donna.
// Copyright (c) 2017-2019 isis lovecruft
// See LICENSE for licensing information.
//
// Authors:
// - isis agora lovecruft <isis@patternsinthevoid.net>

//! An ed25519 signature.

use core::fmt::Debug;

use crate::constants::SIGNATURE_LENGTH;
use crate::errors::{InternalError, SignatureError};

/// The group order \\( \ell \\) as four little-endian 64-bit words.
const L: [u64; 4] = [
    0x5812_631a_5cf5_d3ed,
    0x14de_f9de_a2f7_9cd6,
    0x0000_0000_0000_0000,
    0x1000_0000_0000_0000,
];

/// An ed25519 signature.
///
/// A signature is the 32-byte encoding of a curve point `R` followed by
/// the 32-byte little-endian encoding of a scalar `s`.  Parsing enforces
/// only the structural property that the three high bits of `s` are
/// clear (no scalar below \\( \ell < 2^{253} \\) sets them); full
/// canonicity of `s` is checked during verification so that malleable
/// signatures are rejected rather than failing to parse.
#[derive(Copy, Clone, Eq, PartialEq)]
pub struct Signature {
    /// `R` is an `EdwardsPoint`, formed by using an hash function with
    /// 512-bits output to produce the digest of:
    ///
    /// - the nonce half of the expanded secret key, and
    /// - the message to be signed.
    ///
    /// This digest is then interpreted as a `Scalar` and reduced into an
    /// element in \\(\mathbb{Z}/\ell\mathbb{Z}\\).  The scalar is then
    /// multiplied by the basepoint to produce `R`.
    pub(crate) r_bytes: [u8; 32],

    /// `s` is a `Scalar`, formed by using an hash function with
    /// 512-bits output to produce the digest of:
    ///
    /// - the `r` portion of this `Signature`,
    /// - the `VerifyingKey` which should be used to verify this
    ///   `Signature`, and
    /// - the message to be signed.
    ///
    /// This digest is then interpreted as a `Scalar` and reduced into an
    /// element in \\(\mathbb{Z}/\ell\mathbb{Z}\\).
    pub(crate) s_bytes: [u8; 32],
}

impl Debug for Signature {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(
            f,
            "Signature {{ R: {:?}, s: {:?} }}",
            &self.r_bytes, &self.s_bytes
        )
    }
}

impl Signature {
    /// Construct a `Signature` from the bytes of `R` and `s`, enforcing
    /// the high-bit structural check on `s`.
    pub fn from_bytes(bytes: &[u8; SIGNATURE_LENGTH]) -> Result<Signature, SignatureError> {
        if bytes[63] & 0b1110_0000 != 0 {
            return Err(InternalError::ScalarFormat.into());
        }

        let mut r_bytes = [0u8; 32];
        let mut s_bytes = [0u8; 32];
        r_bytes.copy_from_slice(&bytes[..32]);
        s_bytes.copy_from_slice(&bytes[32..]);
        Ok(Signature { r_bytes, s_bytes })
    }

    /// Convert this `Signature` to its 64-byte wire form, `R || s`.
    pub fn to_bytes(&self) -> [u8; SIGNATURE_LENGTH] {
        let mut bytes = [0u8; SIGNATURE_LENGTH];
        bytes[..32].copy_from_slice(&self.r_bytes);
        bytes[32..].copy_from_slice(&self.s_bytes);
        bytes
    }

    /// View the `R` component.
    pub fn r_bytes(&self) -> &[u8; 32] {
        &self.r_bytes
    }

    /// View the `s` component.
    pub fn s_bytes(&self) -> &[u8; 32] {
        &self.s_bytes
    }

    /// Is the scalar component in the canonical range \\( [0, \ell)
    /// \\)?
    ///
    /// RFC 8032 §5.1.7 requires this check during verification to rule
    /// out signature malleability (adding \\( \ell \\) to `s` would
    /// otherwise produce a distinct valid signature).
    pub(crate) fn s_is_canonical(&self) -> bool {
        // Fast path on the top nibble: values below 2^252 are always in
        // range, and values with any of the top three bits set never
        // are.
        if self.s_bytes[31] & 0b1111_0000 == 0 {
            return true;
        }
        if self.s_bytes[31] & 0b1110_0000 != 0 {
            return false;
        }

        for i in (0..4).rev() {
            let word = u64::from_le_bytes(self.s_bytes[i * 8..(i + 1) * 8].try_into().unwrap());
            if word > L[i] {
                return false;
            } else if word < L[i] {
                break;
            } else if i == 0 {
                // s == l exactly.
                return false;
            }
        }

        true
    }
}

impl TryFrom<&[u8]> for Signature {
    type Error = SignatureError;

    fn try_from(bytes: &[u8]) -> Result<Signature, SignatureError> {
        let bytes: &[u8; SIGNATURE_LENGTH] =
            bytes.try_into().map_err(|_| InternalError::BytesLength {
                name: "Signature",
                length: SIGNATURE_LENGTH,
            })?;
        Signature::from_bytes(bytes)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    /// l, little-endian.
    const ELL: [u8; 32] = [
        0xed, 0xd3, 0xf5, 0x5c, 0x1a, 0x63, 0x12, 0x58, 0xd6, 0x9c, 0xf7, 0xa2, 0xde, 0xf9, 0xde,
        0x14, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
        0x00, 0x10,
    ];

    fn sig_with_s(s: [u8; 32]) -> Signature {
        Signature {
            r_bytes: [0u8; 32],
            s_bytes: s,
        }
    }

    #[test]
    fn high_bit_rejected_at_parse() {
        let mut bytes = [0u8; 64];
        bytes[63] = 0x20;
        assert!(Signature::from_bytes(&bytes).is_err());
        bytes[63] = 0x10;
        assert!(Signature::from_bytes(&bytes).is_ok());
    }

    #[test]
    fn canonical_boundary() {
        let mut below = ELL;
        below[0] -= 1;
        assert!(sig_with_s(below).s_is_canonical());
        assert!(!sig_with_s(ELL).s_is_canonical());

        let mut above = ELL;
        above[0] += 1;
        assert!(!sig_with_s(above).s_is_canonical());

        assert!(sig_with_s([0u8; 32]).s_is_canonical());
    }

    #[test]
    fn wrong_length_slice() {
        assert!(Signature::try_from(&[0u8; 63][..]).is_err());
        assert!(Signature::try_from(&[0u8; 64][..]).is_ok());
    }
}
