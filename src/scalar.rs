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

//! Arithmetic on scalars (integers mod the group order \\( \ell \\)).
//!
//! The `Scalar` type is an alias for one of the limbed backend
//! implementations; both keep scalars fully reduced and reduce 512-bit
//! hash outputs with a single Barrett round.

use cfg_if::cfg_if;

cfg_if! {
    if #[cfg(ed25519_donna_bits = "64")] {
        /// A `Scalar` represents an element of
        /// \\(\mathbb Z / \ell\mathbb Z\\).
        pub(crate) type Scalar = crate::backend::serial::u64::scalar::Scalar56;
    } else {
        /// A `Scalar` represents an element of
        /// \\(\mathbb Z / \ell\mathbb Z\\).
        pub(crate) type Scalar = crate::backend::serial::u32::scalar::Scalar30;
    }
}

/// Clamp a 32-byte string for use as an Ed25519/X25519 secret scalar:
/// clear the low cofactor bits and the top bit, and set bit 254.
pub(crate) fn clamp_integer(mut bytes: [u8; 32]) -> [u8; 32] {
    bytes[0] &= 0b1111_1000;
    bytes[31] &= 0b0111_1111;
    bytes[31] |= 0b0100_0000;
    bytes
}

#[cfg(test)]
mod test {
    use super::*;

    /// x = 2238329342913194256032495932344128051776374960164957527413114840482143558222
    pub static X: [u8; 32] = [
        0x4e, 0x5a, 0xb4, 0x34, 0x5d, 0x47, 0x08, 0x84, 0x59, 0x13, 0xb4, 0x64, 0x1b, 0xc2, 0x7d,
        0x52, 0x52, 0xa5, 0x85, 0x10, 0x1b, 0xcc, 0x42, 0x44, 0xd4, 0x49, 0xf4, 0xa8, 0x79, 0xd9,
        0xf2, 0x04,
    ];

    /// y = 2592331292931086675770238855846338635550719849568364935475441891787804997264
    pub static Y: [u8; 32] = [
        0x90, 0x76, 0x33, 0xfe, 0x1c, 0x4b, 0x66, 0xa4, 0xa2, 0x8d, 0x2d, 0xd7, 0x67, 0x83, 0x86,
        0xc3, 0x53, 0xd0, 0xde, 0x54, 0x55, 0xd4, 0xfc, 0x9d, 0xe8, 0xef, 0x7a, 0xc3, 0x1f, 0x35,
        0xbb, 0x05,
    ];

    /// x*y = 5690045403673944803228348699031245560686958845067437804563560795922180092780
    static X_TIMES_Y: [u8; 32] = [
        0x6c, 0x33, 0x74, 0xa1, 0x89, 0x4f, 0x62, 0x21, 0x0a, 0xaa, 0x2f, 0xe1, 0x86, 0xa6, 0xf9,
        0x2c, 0xe0, 0xaa, 0x75, 0xc2, 0x77, 0x95, 0x81, 0xc2, 0x95, 0xfc, 0x08, 0x17, 0x9a, 0x73,
        0x94, 0x0c,
    ];

    #[test]
    fn multiplication_matches_sage() {
        let x = Scalar::from_bytes(&X);
        let y = Scalar::from_bytes(&Y);
        assert_eq!(x.mul(&y).to_bytes(), X_TIMES_Y);
    }

    #[test]
    fn canonical_round_trip() {
        let x = Scalar::from_bytes(&X);
        assert_eq!(Scalar::from_bytes(&x.to_bytes()).to_bytes(), x.to_bytes());
    }

    #[test]
    fn wide_reduction_matches_iterated_add() {
        // 2^256 - 1 mod l, from Sage.
        let wide = [0xffu8; 64];
        let reduced = Scalar::from_bytes(&wide);
        // Build the same value as ((2^255 - 1) * 2) + 1 out of in-range
        // pieces... simpler: compare against a second import path.
        let mut half = [0u8; 32];
        half.copy_from_slice(&wide[..32]);
        // wide = half + half * 2^256; 2^256 mod l is itself a scalar we
        // can build by reducing a 33-byte value.
        let mut shift = [0u8; 64];
        shift[32] = 1;
        let two_256 = Scalar::from_bytes(&shift);
        let expect = Scalar::from_bytes(&half)
            .mul(&two_256)
            .add(&Scalar::from_bytes(&half));
        assert_eq!(reduced.to_bytes(), expect.to_bytes());
    }

    #[test]
    fn short_input_is_not_reduced() {
        let mut sixteen = [0u8; 16];
        sixteen[15] = 0xff;
        let s = Scalar::from_bytes(&sixteen);
        let mut expect = [0u8; 32];
        expect[..16].copy_from_slice(&sixteen);
        assert_eq!(s.to_bytes(), expect);
        assert!(s.is_at_most_128_bits_vartime());
    }

    /// Recombine signed digits positionally (radix `base` per digit slot)
    /// and check they sum to `x`, keeping the positive and negative parts
    /// in separate accumulators so everything stays in \\([0, \ell)\\).
    fn check_signed_digits(x: &Scalar, digits: &[i8], base_bits: usize) {
        let mut pos = Scalar::ZERO;
        let mut neg = Scalar::ZERO;
        for &digit in digits.iter().rev() {
            for _ in 0..base_bits {
                pos = pos.add(&pos);
                neg = neg.add(&neg);
            }
            let mag = Scalar::from_bytes(&[digit.unsigned_abs()]);
            if digit > 0 {
                pos = pos.add(&mag);
            } else if digit < 0 {
                neg = neg.add(&mag);
            }
        }
        assert_eq!(pos.to_bytes(), x.add(&neg).to_bytes());
    }

    #[test]
    fn radix_16_reconstructs_scalar() {
        let x = Scalar::from_bytes(&X);
        let digits = x.as_radix_16();
        for &digit in digits.iter() {
            assert!((-8..=8).contains(&digit));
        }
        check_signed_digits(&x, &digits, 4);
    }

    #[test]
    fn non_adjacent_form_reconstructs_scalar() {
        for w in [5usize, 7] {
            let x = Scalar::from_bytes(&X);
            let naf = x.non_adjacent_form(w);
            let bound = ((1i16 << (w - 1)) - 1) as i8;
            for &digit in naf.iter() {
                assert!(digit.abs() <= bound);
            }
            check_signed_digits(&x, &naf, 1);
        }
    }

    #[test]
    fn vartime_comparisons() {
        let x = Scalar::from_bytes(&X);
        let y = Scalar::from_bytes(&Y);
        let full = Scalar::LIMBS - 1;
        // X < Y as integers.
        assert!(Scalar::lt_vartime(&x, &y, full));
        assert!(!Scalar::lt_vartime(&y, &x, full));
        assert!(Scalar::lte_vartime(&x, &x, full));
        assert!(!Scalar::lt_vartime(&x, &x, full));

        let diff = Scalar::sub_vartime(&y, &x, full);
        assert_eq!(diff.add(&x).to_bytes(), y.to_bytes());
    }

    #[test]
    fn zero_one_and_128_bit_predicates() {
        assert!(Scalar::ZERO.is_zero_vartime());
        assert!(!Scalar::ZERO.is_one_vartime());
        let one = Scalar::from_bytes(&[1]);
        assert!(one.is_one_vartime());
        let mut big = [0u8; 32];
        big[16] = 1; // 2^128
        assert!(!Scalar::from_bytes(&big).is_at_most_128_bits_vartime());
        let mut small = [0u8; 32];
        small[15] = 0x80; // 2^127
        assert!(Scalar::from_bytes(&small).is_at_most_128_bits_vartime());
    }
}
