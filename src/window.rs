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

//! Code for fixed- and sliding-window functionality
#![allow(non_snake_case)]

use subtle::Choice;
use subtle::ConditionallySelectable;
use subtle::ConstantTimeEq;

use crate::backend::serial::curve_models::AffineNielsPoint;
use crate::backend::serial::curve_models::ProjectiveNielsPoint;
use crate::edwards::EdwardsPoint;
use crate::field::FieldElement;

/// The packed table of small multiples of the basepoint, used for
/// fixed-base scalar multiplication.
///
/// Each of the 256 rows is a 96-byte entry `ysubx || xaddy || t2d`, with
/// each coordinate as a contracted field element; row \\( 8 i + j \\)
/// holds \\( (j+1) \cdot 256^i \cdot B \\).  Keeping the table in packed
/// form rather than limbs halves (or better) its cache footprint, at the
/// cost of three field expansions per lookup.
pub(crate) struct BasepointNielsTable(pub(crate) [[u8; 96]; 256]);

impl BasepointNielsTable {
    /// Given a signed radix-16 digit \\( b \\) with \\( -8 \leq b \leq 8
    /// \\), look up \\( b \cdot 256^{pos} \cdot B \\) in constant time.
    ///
    /// The row is selected by a masked byte blend over all eight
    /// candidates, and the sign is applied with a conditional coordinate
    /// swap and negation, so the access pattern is independent of `b`.
    pub(crate) fn select(&self, pos: usize, b: i8) -> AffineNielsPoint {
        let sign = Choice::from((b as u8) >> 7);
        let mask = (b as i16) >> 7;
        let babs = ((b as i16 + mask) ^ mask) as u8;

        // Start from the identity in packed form: ysubx = 1, xaddy = 1,
        // t2d = 0.
        let mut packed = [0u8; 96];
        packed[0] = 1;
        packed[32] = 1;

        for j in 0..8 {
            let row = &self.0[pos * 8 + j];
            let hit = babs.ct_eq(&(j as u8 + 1));
            for (p, t) in packed.iter_mut().zip(row.iter()) {
                p.conditional_assign(t, hit);
            }
        }

        let mut y_minus_x = FieldElement::from_bytes(packed[0..32].try_into().unwrap());
        let mut y_plus_x = FieldElement::from_bytes(packed[32..64].try_into().unwrap());
        let mut xy2d = FieldElement::from_bytes(packed[64..96].try_into().unwrap());

        // Negation of a Niels point swaps the sum and difference
        // coordinates and negates t2d.
        FieldElement::conditional_swap(&mut y_minus_x, &mut y_plus_x, sign);
        let neg_xy2d = xy2d.neg();
        xy2d.conditional_assign(&neg_xy2d, sign);

        AffineNielsPoint {
            y_plus_x,
            y_minus_x,
            xy2d,
        }
    }
}

/// A lookup table of odd multiples of a point \\(A\\), for the width-5
/// sliding window: `[A, 3A, 5A, 7A, 9A, 11A, 13A, 15A]`.
///
/// The table is only accessed by (odd, positive) index, in variable
/// time; negative digits are handled by the caller via subtraction.
#[derive(Copy, Clone)]
pub(crate) struct NafLookupTable5<T>(pub(crate) [T; 8]);

impl<T: Copy> NafLookupTable5<T> {
    /// Given public, odd \\( x \\) with \\( 0 < x < 2^4 \\), return
    /// \\( x A \\).
    pub(crate) fn select(&self, x: usize) -> T {
        debug_assert_eq!(x & 1, 1);
        debug_assert!(x < 16);

        self.0[x / 2]
    }
}

impl<'a> From<&'a EdwardsPoint> for NafLookupTable5<ProjectiveNielsPoint> {
    fn from(A: &'a EdwardsPoint) -> Self {
        let mut Ai = [A.as_projective_niels(); 8];
        let A2 = A.double();
        for i in 0..7 {
            Ai[i + 1] = (&A2 + &Ai[i]).as_extended().as_projective_niels();
        }
        // Now Ai = [A, 3A, 5A, 7A, 9A, 11A, 13A, 15A]
        NafLookupTable5(Ai)
    }
}

/// A lookup table of odd multiples of the basepoint, for the width-7
/// sliding window: `[B, 3B, 5B, ..., 63B]`.
///
/// Only instantiated as a compile-time constant in the backend
/// `constants` modules.
#[derive(Copy, Clone)]
pub(crate) struct NafLookupTable7<T>(pub(crate) [T; 32]);

impl<T: Copy> NafLookupTable7<T> {
    /// Given public, odd \\( x \\) with \\( 0 < x < 2^6 \\), return
    /// \\( x B \\).
    pub(crate) fn select(&self, x: usize) -> T {
        debug_assert_eq!(x & 1, 1);
        debug_assert!(x < 64);

        self.0[x / 2]
    }
}

#[cfg(test)]
mod test {
    use crate::constants;
    use crate::edwards::EdwardsPoint;

    #[test]
    fn select_is_sign_symmetric() {
        let table = &constants::BASEPOINT_NIELS_TABLE;
        for pos in [0usize, 1, 17, 31] {
            for b in 1i8..=8 {
                let plus = table.select(pos, b);
                let minus = table.select(pos, -b);
                assert_eq!(plus.y_plus_x.to_bytes(), minus.y_minus_x.to_bytes());
                assert_eq!(plus.y_minus_x.to_bytes(), minus.y_plus_x.to_bytes());
                assert_eq!(
                    plus.xy2d.to_bytes(),
                    minus.xy2d.neg().to_bytes()
                );
            }
        }
    }

    #[test]
    fn select_zero_is_identity() {
        let t = constants::BASEPOINT_NIELS_TABLE.select(3, 0);
        assert_eq!(t.y_plus_x.to_bytes(), t.y_minus_x.to_bytes());
        assert!(t.xy2d.is_zero_vartime());
    }

    #[test]
    fn row_zero_entry_one_is_the_basepoint() {
        // Row 0 stores t2d without the factor of d, so check only the
        // affine coordinates.
        let t = constants::BASEPOINT_NIELS_TABLE.select(0, 1);
        let B = &constants::ED25519_BASEPOINT_POINT;
        let zinv = B.Z.invert();
        let x = B.X.mul(&zinv);
        let y = B.Y.mul(&zinv);
        assert_eq!(t.y_plus_x.to_bytes(), y.add_reduce(&x).to_bytes());
        assert_eq!(t.y_minus_x.to_bytes(), y.sub_reduce(&x).to_bytes());
    }

    #[test]
    fn naf_table_entries_are_odd_multiples() {
        use crate::traits::Identity;

        let B = constants::ED25519_BASEPOINT_POINT;
        let table = super::NafLookupTable5::from(&B);
        // 3B via the table must equal B + B + B computed directly.
        let three_b = (&(&B + &B.as_projective_niels()).as_extended()
            + &B.as_projective_niels())
            .as_extended();
        let from_table = (&EdwardsPoint::identity() + &table.select(3)).as_extended();
        assert_eq!(
            three_b.compress().to_bytes(),
            from_table.compress().to_bytes()
        );
    }
}
