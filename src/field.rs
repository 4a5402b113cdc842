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

//! Field arithmetic modulo \\(p = 2\^{255} - 19\\).
//!
//! The `ed25519_donna::field` module provides a type alias
//! `ed25519_donna::field::FieldElement` to a field element type defined
//! in the `backend` module, either `FieldElement51` or `FieldElement2625`.
//!
//! Field operations defined in terms of other field operations, such as
//! the inversion and square-root exponentiation chains, are defined here
//! and do not change between backends.

use cfg_if::cfg_if;

cfg_if! {
    if #[cfg(ed25519_donna_bits = "64")] {
        /// A `FieldElement` represents an element of the field
        /// \\( \mathbb Z / (2\^{255} - 19)\\).
        ///
        /// The `FieldElement` type is an alias for one of the backend
        /// implementations.
        pub(crate) type FieldElement = crate::backend::serial::u64::field::FieldElement51;
    } else {
        /// A `FieldElement` represents an element of the field
        /// \\( \mathbb Z / (2\^{255} - 19)\\).
        ///
        /// The `FieldElement` type is an alias for one of the backend
        /// implementations.
        pub(crate) type FieldElement = crate::backend::serial::u32::field::FieldElement2625;
    }
}

impl FieldElement {
    /// Shared chain for the inversion and square-root exponents.
    ///
    /// Given \\( b = z^{2^5 - 2^0} \\), returns \\( z^{2^{250} - 2^0} \\).
    fn pow_two5_two0_two250_two0(b: &FieldElement) -> FieldElement {
        let t0 = b.square_times(5); // 2^10 - 2^5
        let b = t0.mul(b); // 2^10 - 2^0
        let t0 = b.square_times(10); // 2^20 - 2^10
        let c = t0.mul(&b); // 2^20 - 2^0
        let t0 = c.square_times(20); // 2^40 - 2^20
        let t0 = t0.mul(&c); // 2^40 - 2^0
        let t0 = t0.square_times(10); // 2^50 - 2^10
        let b = t0.mul(&b); // 2^50 - 2^0
        let t0 = b.square_times(50); // 2^100 - 2^50
        let c = t0.mul(&b); // 2^100 - 2^0
        let t0 = c.square_times(100); // 2^200 - 2^100
        let t0 = t0.mul(&c); // 2^200 - 2^0
        let t0 = t0.square_times(50); // 2^250 - 2^50
        t0.mul(&b) // 2^250 - 2^0
    }

    /// Compute \\( z^{-1} = z^{p - 2} = z^{2^{255} - 21} \\).
    ///
    /// Inversion never fails; the inverse of zero is zero.
    pub(crate) fn invert(&self) -> FieldElement {
        let a = self.square_times(1); // 2
        let t0 = a.square_times(2); // 8
        let b = t0.mul(self); // 9
        let a = b.mul(&a); // 11
        let t0 = a.square_times(1); // 22
        let b = t0.mul(&b); // 2^5 - 2^0 = 31
        let b = Self::pow_two5_two0_two250_two0(&b); // 2^250 - 2^0
        let b = b.square_times(5); // 2^255 - 2^5
        b.mul(&a) // 2^255 - 21
    }

    /// Compute \\( z^{(p - 5) / 8} = z^{2^{252} - 3} \\), the square-root
    /// candidate exponent.
    pub(crate) fn pow_two252m3(&self) -> FieldElement {
        let c = self.square_times(1); // 2
        let t0 = c.square_times(2); // 8
        let b = t0.mul(self); // 9
        let c = b.mul(&c); // 11
        let t0 = c.square_times(1); // 22
        let b = t0.mul(&b); // 2^5 - 2^0 = 31
        let b = Self::pow_two5_two0_two250_two0(&b); // 2^250 - 2^0
        let b = b.square_times(2); // 2^252 - 2^2
        b.mul(self) // 2^252 - 3
    }

    /// Test equality of the canonical encodings, in variable time.
    pub(crate) fn eq_vartime(&self, other: &FieldElement) -> bool {
        self.to_bytes() == other.to_bytes()
    }

    /// Is the canonical encoding of this field element zero, in variable
    /// time?
    pub(crate) fn is_zero_vartime(&self) -> bool {
        self.to_bytes() == [0u8; 32]
    }
}

#[cfg(test)]
mod test {
    use super::*;

    /// Random element a of GF(2^255-19), from Sage
    /// a = 1070314506888354081329385823235218444233221\
    ///     2228051251926706380353716438957572
    static A_BYTES: [u8; 32] = [
        0x04, 0xfe, 0xdf, 0x98, 0xa7, 0xfa, 0x0a, 0x68, 0x84, 0x92, 0xbd, 0x59, 0x08, 0x07, 0xa7,
        0x03, 0x9e, 0xd1, 0xf6, 0xf2, 0xe1, 0xd9, 0xe2, 0xa4, 0xa4, 0x51, 0x47, 0x36, 0xf3, 0xc3,
        0xa9, 0x17,
    ];

    /// Byte representation of a**2
    static ASQ_BYTES: [u8; 32] = [
        0x75, 0x97, 0x24, 0x9e, 0xe6, 0x06, 0xfe, 0xab, 0x24, 0x04, 0x56, 0x68, 0x07, 0x91, 0x2d,
        0x5d, 0x0b, 0x0f, 0x3f, 0x1c, 0xb2, 0x6e, 0xf2, 0xe2, 0x63, 0x9c, 0x12, 0xba, 0x73, 0x0b,
        0xe3, 0x62,
    ];

    /// Byte representation of 1/a
    static AINV_BYTES: [u8; 32] = [
        0x96, 0x1b, 0xcd, 0x8d, 0x4d, 0x5e, 0xa2, 0x3a, 0xe9, 0x36, 0x37, 0x93, 0xdb, 0x7b, 0x4d,
        0x70, 0xb8, 0x0d, 0xc0, 0x55, 0xd0, 0x4c, 0x1d, 0x7b, 0x90, 0x71, 0xd8, 0xe9, 0xb6, 0x18,
        0xe6, 0x30,
    ];

    #[test]
    fn a_mul_a_vs_a_squared_constant() {
        let a = FieldElement::from_bytes(&A_BYTES);
        let asq = FieldElement::from_bytes(&ASQ_BYTES);
        assert_eq!(asq.to_bytes(), a.mul(&a).to_bytes());
    }

    #[test]
    fn a_square_vs_a_squared_constant() {
        let a = FieldElement::from_bytes(&A_BYTES);
        let asq = FieldElement::from_bytes(&ASQ_BYTES);
        assert_eq!(asq.to_bytes(), a.square().to_bytes());
    }

    #[test]
    fn square_times_vs_iterated_square() {
        let a = FieldElement::from_bytes(&A_BYTES);
        let mut expected = a;
        for _ in 0..7 {
            expected = expected.square();
        }
        assert_eq!(a.square_times(7).to_bytes(), expected.to_bytes());
    }

    #[test]
    fn a_invert_vs_inverse_of_a_constant() {
        let a = FieldElement::from_bytes(&A_BYTES);
        let ainv = FieldElement::from_bytes(&AINV_BYTES);
        let should_be_inverse = a.invert();
        assert_eq!(ainv.to_bytes(), should_be_inverse.to_bytes());
        assert!(a.mul(&should_be_inverse).eq_vartime(&FieldElement::ONE));
    }

    #[test]
    fn add_sub_round_trip() {
        let a = FieldElement::from_bytes(&A_BYTES);
        let asq = FieldElement::from_bytes(&ASQ_BYTES);
        let sum = a.add_reduce(&asq);
        assert_eq!(sum.sub_reduce(&asq).to_bytes(), a.to_bytes());
        assert_eq!(
            a.sub_reduce(&a.neg()).to_bytes(),
            a.add_reduce(&a).to_bytes()
        );
    }

    #[test]
    fn lazy_variants_match_reduced_variants() {
        let a = FieldElement::from_bytes(&A_BYTES);
        let b = FieldElement::from_bytes(&ASQ_BYTES);
        // A basic op feeding a mul must produce the same value as the
        // carried form.
        let lazy = a.add(&b).mul(&b);
        let eager = a.add_reduce(&b).mul(&b);
        assert_eq!(lazy.to_bytes(), eager.to_bytes());

        let lazy = a.sub(&b).mul(&b);
        let eager = a.sub_reduce(&b).mul(&b);
        assert_eq!(lazy.to_bytes(), eager.to_bytes());

        let lazy = a.add(&b).sub_after_basic(&b.add(&a)).mul(&b);
        let eager = a
            .add_reduce(&b)
            .sub_reduce(&b.add_reduce(&a))
            .mul(&b);
        assert_eq!(lazy.to_bytes(), eager.to_bytes());
    }

    #[test]
    fn from_bytes_ignores_high_bit() {
        let mut high = A_BYTES;
        high[31] |= 0x80;
        let a = FieldElement::from_bytes(&A_BYTES);
        let a_high = FieldElement::from_bytes(&high);
        assert_eq!(a.to_bytes(), a_high.to_bytes());
    }

    #[test]
    fn to_bytes_is_canonical() {
        let m1 = FieldElement::ZERO.sub_reduce(&FieldElement::ONE);
        // p - 1, encoded canonically.
        let mut canonical = [0xffu8; 32];
        canonical[0] = 0xec;
        canonical[31] = 0x7f;
        assert_eq!(m1.to_bytes(), canonical);
    }
}
