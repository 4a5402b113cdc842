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

//! Group operations for the twisted Edwards curve
//! \\( -x\^2 + y\^2 = 1 + d x\^2 y\^2 \\)
//! with \\( d = -121665/121666 \\), in \\( \mathbb P\^3 \\) "extended"
//! coordinates.
//!
//! Point decompression comes in two variable-time flavours: the plain
//! one, and one which decodes the *negated* point, which saves a point
//! negation inside the verification equation.  Neither rejects
//! non-canonical \\( y \\) encodings; that leniency is what ZIP-215
//! verification is specified against, and strict verification gets its
//! exactness from comparing re-compressed bytes instead.

#![allow(non_snake_case)]

use core::ops::Add;

use crate::backend::serial::curve_models::{AffineNielsPoint, CompletedPoint};
use crate::backend::serial::scalar_mul;
use crate::constants;
use crate::field::FieldElement;
use crate::scalar::Scalar;
use crate::traits::Identity;

// ------------------------------------------------------------------------
// Compressed points
// ------------------------------------------------------------------------

/// In "Edwards y" / "compressed" format, the curve point \\((x,y)\\) is
/// determined by the \\(y\\)-coordinate and the sign of \\(x\\).
///
/// The first 255 bits of a `CompressedEdwardsY` represent the
/// \\(y\\)-coordinate.  The high bit of the 32nd byte gives the sign of
/// \\(x\\).
#[derive(Copy, Clone, Eq, PartialEq)]
pub(crate) struct CompressedEdwardsY(pub(crate) [u8; 32]);

impl core::fmt::Debug for CompressedEdwardsY {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "CompressedEdwardsY: {:?}", self.as_bytes())
    }
}

impl CompressedEdwardsY {
    /// View this `CompressedEdwardsY` as an array of bytes.
    pub(crate) fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Copy this `CompressedEdwardsY` to an array of bytes.
    pub(crate) fn to_bytes(self) -> [u8; 32] {
        self.0
    }

    /// Attempt to decompress to an `EdwardsPoint`, in variable time.
    ///
    /// Returns `None` if the encoding's \\( y \\)-coordinate determines
    /// no \\( x \\) on the curve.  A \\( y \\) at or above \\( p \\) is
    /// *not* rejected; it decodes as its reduced value.
    pub(crate) fn decompress_vartime(&self) -> Option<EdwardsPoint> {
        self.decompress_sign_vartime(false)
    }

    /// Attempt to decompress to the *negated* `EdwardsPoint`, in
    /// variable time.
    ///
    /// Verification computes \\( k(-A) + sB \\), so decoding \\( -A \\)
    /// directly saves a negation.
    pub(crate) fn decompress_negative_vartime(&self) -> Option<EdwardsPoint> {
        self.decompress_sign_vartime(true)
    }

    fn decompress_sign_vartime(&self, negative: bool) -> Option<EdwardsPoint> {
        let parity = self.0[31] >> 7;

        let Y = FieldElement::from_bytes(&self.0);
        let Z = FieldElement::ONE;
        let YY = Y.square();
        let den = YY.mul(&constants::EDWARDS_D); // dy²
        let num = YY.sub_reduce(&Z); // y² - 1
        let den = den.add(&Z); // dy² + 1

        // Compute sqrt(num/den) as num^((p+3)/8) den^((7p-35)/8)
        //                        = (num den^7)^((p-5)/8) num den^3.
        let den2 = den.square();
        let den3 = den2.mul(&den);
        let mut X = den3.square();
        X = X.mul(&den);
        X = X.mul(&num);
        X = X.pow_two252m3();
        X = X.mul(&den3);
        X = X.mul(&num);

        // Check whether either root of x² works; if neither does, the
        // encoding determines no curve point.
        let chk = X.square().mul(&den);
        if !chk.sub_reduce(&num).is_zero_vartime() {
            if !chk.add_reduce(&num).is_zero_vartime() {
                return None;
            }
            X = X.mul(&constants::SQRT_M1);
        }

        // Match (or, for the negative decode, oppose) the stored sign of
        // x.
        let flip = if negative {
            (X.to_bytes()[0] & 1) == parity
        } else {
            (X.to_bytes()[0] & 1) != parity
        };
        if flip {
            X = X.neg();
        }

        let T = X.mul(&Y);
        Some(EdwardsPoint { X, Y, Z, T })
    }
}

// ------------------------------------------------------------------------
// Extended points
// ------------------------------------------------------------------------

/// An `EdwardsPoint` represents a point on the Edwards form of
/// Curve25519, in extended \\( (X : Y : Z : T) \\) coordinates with
/// \\( x = X/Z \\), \\( y = Y/Z \\), \\( T = XY/Z \\).
#[derive(Copy, Clone, Debug)]
pub(crate) struct EdwardsPoint {
    pub(crate) X: FieldElement,
    pub(crate) Y: FieldElement,
    pub(crate) Z: FieldElement,
    pub(crate) T: FieldElement,
}

impl Identity for EdwardsPoint {
    fn identity() -> EdwardsPoint {
        EdwardsPoint {
            X: FieldElement::ZERO,
            Y: FieldElement::ONE,
            Z: FieldElement::ONE,
            T: FieldElement::ZERO,
        }
    }
}

impl<'a, 'b> Add<&'b EdwardsPoint> for &'a EdwardsPoint {
    type Output = EdwardsPoint;

    fn add(self, other: &'b EdwardsPoint) -> EdwardsPoint {
        let A = self.Y.sub(&self.X).mul(&other.Y.sub(&other.X));
        let B = self.Y.add(&self.X).mul(&other.Y.add(&other.X));
        let C = self.T.mul(&other.T).mul(&constants::EDWARDS_D2);
        let D = self.Z.mul(&other.Z);
        let D2 = D.add(&D);

        CompletedPoint {
            X: B.sub(&A),
            Y: B.add(&A),
            Z: D2.add_after_basic(&C),
            T: D2.sub_after_basic(&C),
        }
        .as_extended()
    }
}

impl core::ops::Neg for &EdwardsPoint {
    type Output = EdwardsPoint;

    fn neg(self) -> EdwardsPoint {
        EdwardsPoint {
            X: self.X.neg(),
            Y: self.Y,
            Z: self.Z,
            T: self.T.neg(),
        }
    }
}

impl EdwardsPoint {
    /// Compress this point to `CompressedEdwardsY` format.
    pub(crate) fn compress(&self) -> CompressedEdwardsY {
        let zinv = self.Z.invert();
        let x = self.X.mul(&zinv);
        let y = self.Y.mul(&zinv);
        let mut s = y.to_bytes();
        s[31] ^= (x.to_bytes()[0] & 1) << 7;
        CompressedEdwardsY(s)
    }

    /// Add this point to itself.
    pub(crate) fn double(&self) -> EdwardsPoint {
        self.as_projective().double().as_extended()
    }

    /// Fused mixed addition with an `AffineNielsPoint`, producing an
    /// extended point directly.
    ///
    /// This skips the completed-point detour, at the cost of always
    /// paying for the full \\( T \\) rebuild; it is the right shape for
    /// the fixed-base ladder, where every step needs extended output.
    pub(crate) fn add_affine_niels(&self, q: &AffineNielsPoint) -> EdwardsPoint {
        let a = self.Y.sub(&self.X).mul(&q.y_minus_x);
        let e = self.Y.add(&self.X).mul(&q.y_plus_x);
        let h = e.add(&a);
        let e = e.sub(&a);
        let c = self.T.mul(&q.xy2d);
        let f = self.Z.add(&self.Z);
        let g = f.add_after_basic(&c);
        let f = f.sub_after_basic(&c);

        EdwardsPoint {
            X: e.mul(&f),
            Y: h.mul(&g),
            Z: g.mul(&f),
            T: e.mul(&h),
        }
    }

    /// Fixed-base scalar multiplication: compute `scalar * B`, where `B`
    /// is the Ed25519 basepoint, in constant time.
    ///
    /// The scalar is recoded into 64 signed radix-16 digits.  The odd
    /// digits are accumulated first against the packed table (whose row
    /// \\( i \\) holds multiples of \\( 256^i B \\)), the accumulator is
    /// multiplied by 16, and the even digits are accumulated against the
    /// same rows.  The digit-0 entry comes from the d-free row 0, so its
    /// `t2d` is re-multiplied by \\( d \\) before use.
    pub(crate) fn mul_base(scalar: &Scalar) -> EdwardsPoint {
        let b = scalar.as_radix_16();
        let table = &constants::BASEPOINT_NIELS_TABLE;

        // Seed the accumulator with the digit-1 entry, at (X : Y : Z) =
        // (2x : 2y : 2).  Row 0 stores t2d = 2xy, which is exactly the
        // T-coordinate this representation needs.
        let t = table.select(0, b[1]);
        let mut r = EdwardsPoint {
            X: t.y_plus_x.sub_reduce(&t.y_minus_x),
            Y: t.y_plus_x.add_reduce(&t.y_minus_x),
            Z: FieldElement::ONE.add_reduce(&FieldElement::ONE),
            T: t.xy2d,
        };

        for i in (3..64).step_by(2) {
            let t = table.select(i / 2, b[i]);
            r = r.add_affine_niels(&t);
        }

        // Multiply the odd-digit accumulator by 16.
        let mut q = r.as_projective();
        q = q.double().as_projective();
        q = q.double().as_projective();
        q = q.double().as_projective();
        r = q.double().as_extended();

        // Digit 0 reuses row 0, whose t2d is d-free; restore the factor
        // of d that the mixed-addition formula expects.
        let mut t = table.select(0, b[0]);
        t.xy2d = t.xy2d.mul(&constants::EDWARDS_D);
        r = r.add_affine_niels(&t);

        for i in (2..64).step_by(2) {
            let t = table.select(i / 2, b[i]);
            r = r.add_affine_niels(&t);
        }

        r
    }

    /// Compute \\( aA + bB \\) in variable time, where \\( B \\) is the
    /// Ed25519 basepoint.
    pub(crate) fn vartime_double_scalar_mul_basepoint(
        a: &Scalar,
        A: &EdwardsPoint,
        b: &Scalar,
    ) -> EdwardsPoint {
        scalar_mul::vartime_double_base::mul(a, A, b)
    }

    /// Compute \\([2\^k] P \\) by successive doublings.  Requires \\( k
    /// > 0 \\).
    pub(crate) fn mul_by_pow_2(&self, k: u32) -> EdwardsPoint {
        debug_assert!(k > 0);
        let mut r: CompletedPoint;
        let mut s = self.as_projective();
        for _ in 0..(k - 1) {
            r = s.double();
            s = r.as_projective();
        }
        // Unroll last doubling so we can go directly as_extended().
        s.double().as_extended()
    }

    /// Multiply by the cofactor: return \\( [8] P \\).
    pub(crate) fn mul_by_cofactor(&self) -> EdwardsPoint {
        self.mul_by_pow_2(3)
    }

    /// Is this point the identity, comparing in projective coordinates
    /// without normalizing first?  Variable time.
    ///
    /// In projective coordinates the identity is \\( (0 : 1 : 1) \\) up
    /// to scaling, i.e. \\( X = 0 \\) and \\( Y = Z \\).
    pub(crate) fn is_neutral_vartime(&self) -> bool {
        self.X.is_zero_vartime() && self.Y.eq_vartime(&self.Z)
    }

    /// Does this point have small order, i.e. is \\( [8] P \\) the
    /// identity?  Variable time.
    ///
    /// Strict verification rejects small-order public keys; ZIP-215
    /// accepts them.
    pub(crate) fn is_small_order_vartime(&self) -> bool {
        self.mul_by_cofactor().is_neutral_vartime()
    }

    /// Are `self` and `other` equal up to small-order torsion, i.e. is
    /// \\( [8](P - Q) \\) the identity?  Variable time.
    ///
    /// This is the ZIP-215 acceptance criterion for the verification
    /// equation: the recomputed \\( R' \\) may differ from the encoded
    /// \\( R \\) by a small-order component.
    pub(crate) fn cofactor_equal_vartime(&self, other: &EdwardsPoint) -> bool {
        let diff = (self - &other.as_projective_niels()).as_extended();
        diff.mul_by_cofactor().is_neutral_vartime()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    /// The basepoint, compressed.
    fn base_compressed() -> CompressedEdwardsY {
        CompressedEdwardsY(constants::ED25519_BASEPOINT_COMPRESSED)
    }

    fn scalar_from_u64(x: u64) -> Scalar {
        Scalar::from_bytes(&x.to_le_bytes())
    }

    #[test]
    fn basepoint_round_trip() {
        let B = constants::ED25519_BASEPOINT_POINT;
        assert_eq!(B.compress(), base_compressed());
        let B2 = base_compressed().decompress_vartime().unwrap();
        assert_eq!(B2.compress(), base_compressed());
    }

    #[test]
    fn decompress_negative_gives_negation() {
        let minus_B = base_compressed().decompress_negative_vartime().unwrap();
        let B = constants::ED25519_BASEPOINT_POINT;
        // B + (-B) has small order (in fact, is the identity).
        let sum = &B + &minus_B;
        assert!(sum.is_neutral_vartime());
    }

    #[test]
    fn decompress_rejects_non_point() {
        // 2 is not a valid y-coordinate of any curve point.
        let mut bad = [0u8; 32];
        bad[0] = 2;
        assert!(CompressedEdwardsY(bad).decompress_vartime().is_none());
        assert!(CompressedEdwardsY(bad)
            .decompress_negative_vartime()
            .is_none());
    }

    #[test]
    fn double_vs_addition() {
        let B = constants::ED25519_BASEPOINT_POINT;
        let B2 = B.double();
        let B2_add = &B + &B;
        assert_eq!(B2.compress(), B2_add.compress());
    }

    #[test]
    fn mul_base_small_scalars() {
        let B = constants::ED25519_BASEPOINT_POINT;
        assert!(EdwardsPoint::mul_base(&Scalar::ZERO).is_neutral_vartime());
        assert_eq!(
            EdwardsPoint::mul_base(&scalar_from_u64(1)).compress(),
            B.compress()
        );
        assert_eq!(
            EdwardsPoint::mul_base(&scalar_from_u64(2)).compress(),
            B.double().compress()
        );
        let mut acc = B;
        for _ in 0..16 {
            acc = &acc + &B;
        }
        assert_eq!(
            EdwardsPoint::mul_base(&scalar_from_u64(17)).compress(),
            acc.compress()
        );
    }

    #[test]
    fn mul_base_matches_odd_multiples_table() {
        // 63B from the fixed-base path vs the static width-7 table.
        let got = EdwardsPoint::mul_base(&scalar_from_u64(63));
        let from_table =
            (&EdwardsPoint::identity() + &constants::AFFINE_ODD_MULTIPLES_OF_BASEPOINT.select(63))
                .as_extended();
        assert_eq!(got.compress(), from_table.compress());
    }

    #[test]
    fn double_scalar_mul_basepoint() {
        // aA + bB with A = 7B must equal (7a + b)B.
        let a = scalar_from_u64(1000);
        let b = scalar_from_u64(333);
        let A = EdwardsPoint::mul_base(&scalar_from_u64(7));
        let got = EdwardsPoint::vartime_double_scalar_mul_basepoint(&a, &A, &b);
        let expect = EdwardsPoint::mul_base(&scalar_from_u64(7 * 1000 + 333));
        assert_eq!(got.compress(), expect.compress());
    }

    #[test]
    fn eight_torsion_is_small_order() {
        // The point of order 2: (0, -1).
        let mut minus_one = [0u8; 32];
        minus_one[0] = 0xec;
        for i in 1..31 {
            minus_one[i] = 0xff;
        }
        minus_one[31] = 0x7f;
        let p2 = CompressedEdwardsY(minus_one).decompress_vartime().unwrap();
        assert!(p2.is_small_order_vartime());
        assert!(!constants::ED25519_BASEPOINT_POINT.is_small_order_vartime());
    }

    #[test]
    fn cofactor_equality_ignores_torsion() {
        let B = constants::ED25519_BASEPOINT_POINT;
        let mut minus_one = [0u8; 32];
        minus_one[0] = 0xec;
        for i in 1..31 {
            minus_one[i] = 0xff;
        }
        minus_one[31] = 0x7f;
        let torsion = CompressedEdwardsY(minus_one).decompress_vartime().unwrap();
        let B_plus_torsion = &B + &torsion;
        assert!(B.cofactor_equal_vartime(&B_plus_torsion));
        assert!(B_plus_torsion.cofactor_equal_vartime(&B));
        assert!(!B.cofactor_equal_vartime(&B.double()));
        // Byte equality does not hold, only cofactored equality.
        assert_ne!(B.compress(), B_plus_torsion.compress());
    }

    #[test]
    fn group_law_eight_times_difference() {
        let B = constants::ED25519_BASEPOINT_POINT;
        let minus_B = B.compress().decompress_negative_vartime().unwrap();
        let diff = &B + &minus_B;
        assert!(diff.mul_by_cofactor().is_neutral_vartime());
    }
}
