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

//! Bos-Coster multiscalar multiplication, in variable time.
//!
//! The algorithm keeps the scalar/point pairs in a max-heap ordered by
//! scalar magnitude.  Each round replaces the largest scalar \\( s_1 \\)
//! by \\( s_1 - s_2 \\) (where \\( s_2 \\) is the runner-up) and folds
//! its point into the runner-up's point, preserving
//! \\( \sum s_i P_i \\); the scalars shrink geometrically, and the loop
//! terminates when only one nonzero scalar remains, which is finished
//! off with a plain double-and-add.
//!
//! Two details carry most of the performance:
//!
//! * comparisons examine only the limbs up to `limb_size`, a window
//!   that shrinks as the maximum scalar loses limbs, and
//!
//! * the (much smaller) 128-bit random weights are initially left out
//!   of the heap, and inserted only once the maximum has decayed to
//!   their size.
//!
//! This path is *not* constant time, which is fine for verification.

use crate::edwards::EdwardsPoint;
use crate::scalar::Scalar;
use crate::traits::Identity;

/// Which limb holds the 128th bit, for the heap-extension trigger.
const LIMB_128_BITS: usize = (128 + Scalar::BITS_PER_LIMB - 1) / Scalar::BITS_PER_LIMB;

/// Swap two entries of the heap.
#[inline(always)]
fn heap_swap(heap: &mut [usize], a: usize, b: usize) {
    heap.swap(a, b);
}

/// Add the next scalar (at index `*size`) to the heap, sifting it up to
/// its sorted spot.
fn heap_insert_next(heap: &mut [usize], size: &mut usize, scalars: &[Scalar]) {
    let mut node = *size;
    heap[node] = node;

    let mut parent = (node.wrapping_sub(1)) / 2;
    while node != 0
        && Scalar::lt_vartime(
            &scalars[heap[parent]],
            &scalars[heap[node]],
            Scalar::LIMBS - 1,
        )
    {
        heap_swap(heap, parent, node);
        node = parent;
        parent = (node.wrapping_sub(1)) / 2;
    }
    *size += 1;
}

/// Restore the heap after the root's scalar has been made smaller: sift
/// the root down to a leaf, then back up to its sorted spot.
fn heap_updated_root(heap: &mut [usize], size: usize, scalars: &[Scalar], limb_size: usize) {
    let mut parent = 0;
    let mut node = 1;
    let mut childl = 1;
    let mut childr = 2;
    while childr < size {
        node = if Scalar::lt_vartime(&scalars[heap[childl]], &scalars[heap[childr]], limb_size) {
            childr
        } else {
            childl
        };
        heap_swap(heap, parent, node);
        parent = node;
        childl = (parent * 2) + 1;
        childr = childl + 1;
    }

    parent = (node.wrapping_sub(1)) / 2;
    while node != 0
        && Scalar::lte_vartime(&scalars[heap[parent]], &scalars[heap[node]], limb_size)
    {
        heap_swap(heap, parent, node);
        node = parent;
        parent = (node.wrapping_sub(1)) / 2;
    }
}

/// Build the heap over the first `count` scalars; `count` must be >= 3.
fn heap_build(heap: &mut [usize], size: &mut usize, scalars: &[Scalar], count: usize) {
    heap[0] = 0;
    *size = 0;
    while *size < count {
        heap_insert_next(heap, size, scalars);
    }
}

/// Read the top two entries of the heap.
fn heap_get_top2(
    heap: &[usize],
    scalars: &[Scalar],
    limb_size: usize,
) -> (usize, usize) {
    let h0 = heap[0];
    let mut h1 = heap[1];
    let h2 = heap[2];
    if Scalar::lt_vartime(&scalars[h1], &scalars[h2], limb_size) {
        h1 = h2;
    }
    (h0, h1)
}

/// Finish the reduction: compute `scalar * point` for the single
/// remaining scalar by scanning its bits from the top.
fn mul_final(point: &EdwardsPoint, scalar: &Scalar) -> EdwardsPoint {
    const TOP_BIT: u64 = 1 << (Scalar::BITS_PER_LIMB - 1);

    // Limbs widened to u64 so the bit scan is word-size independent.
    #[inline(always)]
    fn limb(s: &Scalar, i: usize) -> u64 {
        s.0[i] as u64
    }

    if scalar.is_one_vartime() {
        // This is what usually remains after Bos-Coster.
        return *point;
    }
    if scalar.is_zero_vartime() {
        // Only possible if every input scalar was zero.
        return EdwardsPoint::identity();
    }

    // Find the highest set bit; the scalar is at most 128 bits by now.
    let mut top = LIMB_128_BITS;
    while limb(scalar, top) == 0 {
        top -= 1;
    }
    let mut flag = TOP_BIT;
    while limb(scalar, top) & flag == 0 {
        flag >>= 1;
    }

    let mut r = *point;
    loop {
        r = r.double();
        if limb(scalar, top) & flag != 0 {
            r = &r + point;
        }

        flag >>= 1;
        if flag == 0 {
            if top == 0 {
                break;
            }
            top -= 1;
            flag = TOP_BIT;
        }
    }
    r
}

/// Compute \\( \sum scalars\[i\] \cdot points\[i\] \\) in variable time.
///
/// Both slices must have the same length `count`, with `count >= 5`; the
/// smaller-than-128-bit scalars (the batch's random weights) are
/// expected in the upper half of the slice, where the initial odd-sized
/// heap build leaves them out.
///
/// The scalars and points are consumed as scratch space.
pub(crate) fn multiscalar_mul_vartime(
    scalars: &mut [Scalar],
    points: &mut [EdwardsPoint],
) -> EdwardsPoint {
    let count = scalars.len();
    debug_assert_eq!(count, points.len());
    debug_assert!(count >= 5);

    // Start with the full limb window.
    let mut limb_size = Scalar::LIMBS - 1;

    // Whether the heap has been extended to include the 128-bit scalars.
    let mut extended = false;

    let mut heap = [0usize; 2 * crate::batch::MAX_BATCH_SIZE + 1];
    let mut size = 0usize;

    // Grab an odd number of scalars to build the heap, unknown limb
    // sizes.
    heap_build(&mut heap, &mut size, scalars, ((count + 1) / 2) | 1);

    let (mut max1, mut max2);
    loop {
        (max1, max2) = heap_get_top2(&heap, scalars, limb_size);

        // Only one scalar remaining, we're done.
        if scalars[max2].is_zero_vartime() {
            break;
        }

        // Exhausted another limb?
        if scalars[max1].0[limb_size] == 0 {
            limb_size -= 1;
        }

        // Can we extend to the 128-bit scalars?
        if !extended && scalars[max1].is_at_most_128_bits_vartime() {
            while size < count {
                heap_insert_next(&mut heap, &mut size, scalars);
            }
            (max1, max2) = heap_get_top2(&heap, scalars, limb_size);
            extended = true;
        }

        scalars[max1] = Scalar::sub_vartime(&scalars[max1], &scalars[max2], limb_size);
        points[max2] = &points[max2] + &points[max1];
        heap_updated_root(&mut heap, size, scalars, limb_size);
    }

    mul_final(&points[max1], &scalars[max1])
}

#[cfg(test)]
mod test {
    use alloc::vec::Vec;

    use super::*;
    use crate::constants;

    fn scalar_from_u64(x: u64) -> Scalar {
        Scalar::from_bytes(&x.to_le_bytes())
    }

    /// Brute-force sum(s_i * P_i) via mul_base relations: use points
    /// P_i = m_i * B so the expected result is (sum s_i m_i) B.
    fn check_sum(weights: &[u64], multiples: &[u64]) {
        let mut scalars: Vec<Scalar> =
            weights.iter().map(|&w| scalar_from_u64(w)).collect();
        let mut points: Vec<EdwardsPoint> = multiples
            .iter()
            .map(|&m| EdwardsPoint::mul_base(&scalar_from_u64(m)))
            .collect();

        let got = multiscalar_mul_vartime(&mut scalars, &mut points);

        let expected: u64 = weights
            .iter()
            .zip(multiples.iter())
            .map(|(&w, &m)| w * m)
            .sum();
        let expected = EdwardsPoint::mul_base(&scalar_from_u64(expected));
        assert_eq!(got.compress(), expected.compress());
    }

    #[test]
    fn small_system_matches_fixed_base() {
        check_sum(&[5, 3, 2, 9, 1], &[1, 2, 3, 4, 5]);
        check_sum(&[1, 1, 1, 1, 1], &[9, 8, 7, 6, 5]);
        check_sum(&[1000003, 999999, 2, 123456, 77], &[31, 17, 5, 3, 2]);
    }

    #[test]
    fn zero_scalars_yield_identity() {
        let mut scalars = [Scalar::ZERO; 5];
        let mut points = [constants::ED25519_BASEPOINT_POINT; 5];
        let got = multiscalar_mul_vartime(&mut scalars, &mut points);
        assert!(got.is_neutral_vartime());
    }

    #[test]
    fn wide_scalars_and_random_weights() {
        // Mimic the batch layout: large scalars first, 128-bit weights
        // in the upper half.
        let mut scalars = Vec::new();
        let mut points = Vec::new();
        let mut multiples = Vec::new();

        for i in 0..5u64 {
            let wide = [0x3du8 ^ (i as u8); 64];
            scalars.push(Scalar::from_bytes(&wide));
            multiples.push(i + 2);
        }
        for i in 0..4u64 {
            let mut small = [0u8; 16];
            small[15] = 0x80 + i as u8;
            scalars.push(Scalar::from_bytes(&small));
            multiples.push(i + 11);
        }
        for &m in multiples.iter() {
            points.push(EdwardsPoint::mul_base(&scalar_from_u64(m)));
        }

        // Expected: sum(s_i * m_i) as a scalar times B.
        let mut acc = Scalar::ZERO;
        for (s, &m) in scalars.iter().zip(multiples.iter()) {
            acc = acc.add(&s.mul(&scalar_from_u64(m)));
        }
        let expected = EdwardsPoint::mul_base(&acc);

        let got = multiscalar_mul_vartime(&mut scalars, &mut points);
        assert_eq!(got.compress(), expected.compress());
    }
}
