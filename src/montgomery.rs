// -*- mode: rust; -*-
//
// This file is part of ed25519-donna.
// Copyright (c) 2016-2021 isis lovecruft
// Copyright (c) 2016-2019 Henry de Valence
// See LICENSE for licensing information.
//
// Authors:
// - isis agora lovecruft <isis@patternsinthevoid.net>
// - Henry de Valence <hdevalence@hdevalence.ca>

//! Scalar multiplication on the Montgomery form of Curve25519, limited
//! to the X25519 basepoint interface.
//!
//! The Edwards and Montgomery forms are related by the birational map
//! \\( u = (1 + y) / (1 - y) \\), which in the projective coordinates of
//! an Edwards point reads \\( u = (Z + Y) / (Z - Y) \\).  Fixed-base
//! X25519 can therefore ride the (constant-time, table-driven) Edwards
//! fixed-base ladder and pay only one inversion for the map, instead of
//! running a Montgomery ladder.  General variable-base X25519 is out of
//! scope for this crate.

use crate::edwards::EdwardsPoint;
use crate::scalar::{clamp_integer, Scalar};

/// A `MontgomeryPoint` is the \\( u \\)-coordinate of a point on the
/// Montgomery form of Curve25519, in little-endian encoding.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct MontgomeryPoint(pub [u8; 32]);

impl MontgomeryPoint {
    /// Multiply the basepoint \\( u = 9 \\) by `clamp_integer(bits)`,
    /// the X25519 public-key derivation.
    pub fn mul_base_clamped(bits: [u8; 32]) -> MontgomeryPoint {
        let s = Scalar::from_bytes_raw(&clamp_integer(bits));
        EdwardsPoint::mul_base(&s).to_montgomery()
    }

    /// View this point as a byte array.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Copy this point's encoding.
    pub fn to_bytes(self) -> [u8; 32] {
        self.0
    }
}

impl EdwardsPoint {
    /// Map this point to the \\( u \\)-coordinate of its image on the
    /// Montgomery form of the curve.
    pub(crate) fn to_montgomery(&self) -> MontgomeryPoint {
        let u_num = self.Y.add_reduce(&self.Z);
        let u_den = self.Z.sub_reduce(&self.Y);
        let u = u_num.mul(&u_den.invert());
        MontgomeryPoint(u.to_bytes())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::constants;

    #[test]
    fn basepoint_maps_to_nine() {
        let u = constants::ED25519_BASEPOINT_POINT.to_montgomery();
        assert_eq!(u.to_bytes(), constants::X25519_BASEPOINT);
    }

    #[test]
    fn iterated_base_mult_self_test() {
        // Iterate u <- ScalarBaseMult(u) 1024 times from a fixed start;
        // the closed orbit value pins down clamping, the fixed-base
        // ladder, and the birational map at once.
        let mut cur = [0u8; 32];
        cur[0] = 255;
        for _ in 0..1024 {
            cur = MontgomeryPoint::mul_base_clamped(cur).to_bytes();
        }
        let expected: [u8; 32] = [
            0xac, 0xce, 0x24, 0xb1, 0xd4, 0xa2, 0x36, 0x21, 0x15, 0xe2, 0x3e, 0x84, 0x3c, 0x23,
            0x2b, 0x5f, 0x95, 0x6c, 0xc0, 0x7b, 0x95, 0x82, 0xd7, 0x93, 0xd5, 0x19, 0xb6, 0xf1,
            0xfb, 0x96, 0xd6, 0x04,
        ];
        assert_eq!(cur, expected);
    }
}
