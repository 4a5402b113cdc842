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

//! Field arithmetic modulo \\(p = 2\^{255} - 19\\), using \\(64\\)-bit
//! limbs with \\(128\\)-bit products.
//!
//! Limbs are left unreduced between operations; the cheap `add`/`sub`
//! variants only keep the limbs inside the headroom that `mul` and
//! `square` tolerate, and a full carry chain is run only by the
//! `*_reduce` variants and by `to_bytes`.

use core::fmt::Debug;

use subtle::Choice;
use subtle::ConditionallySelectable;

#[cfg(feature = "zeroize")]
use zeroize::Zeroize;

/// A `FieldElement51` represents an element of the field
/// \\( \mathbb Z / (2\^{255} - 19)\\).
///
/// In the 64-bit implementation, a `FieldElement51` is represented in
/// radix \\(2\^{51}\\) as five `u64`s.  The layout matches the byte
/// encoding: limb \\(i\\) holds bits \\(51 i\\) up to \\(51 (i+1)\\).
#[derive(Copy, Clone)]
pub struct FieldElement51(pub(crate) [u64; 5]);

const LOW_51_BIT_MASK: u64 = (1u64 << 51) - 1;

/// Multiples of \\(p\\), added before subtraction to keep limbs positive.
///
/// `sub` assumes its inputs came out of a multiplication or an import and
/// so adds \\(2p\\); `sub_after_basic` tolerates one prior uncarried
/// add/sub on each input and adds \\(4p\\).
const TWO_P_0: u64 = 0x000f_ffff_ffff_ffda;
const TWO_P_1234: u64 = 0x000f_ffff_ffff_fffe;
const FOUR_P_0: u64 = 0x001f_ffff_ffff_ffb4;
const FOUR_P_1234: u64 = 0x001f_ffff_ffff_fffc;

impl Debug for FieldElement51 {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "FieldElement51({:?})", &self.0[..])
    }
}

#[cfg(feature = "zeroize")]
impl Zeroize for FieldElement51 {
    fn zeroize(&mut self) {
        self.0.zeroize();
    }
}

impl ConditionallySelectable for FieldElement51 {
    fn conditional_select(
        a: &FieldElement51,
        b: &FieldElement51,
        choice: Choice,
    ) -> FieldElement51 {
        FieldElement51([
            u64::conditional_select(&a.0[0], &b.0[0], choice),
            u64::conditional_select(&a.0[1], &b.0[1], choice),
            u64::conditional_select(&a.0[2], &b.0[2], choice),
            u64::conditional_select(&a.0[3], &b.0[3], choice),
            u64::conditional_select(&a.0[4], &b.0[4], choice),
        ])
    }

    fn conditional_swap(a: &mut FieldElement51, b: &mut FieldElement51, choice: Choice) {
        u64::conditional_swap(&mut a.0[0], &mut b.0[0], choice);
        u64::conditional_swap(&mut a.0[1], &mut b.0[1], choice);
        u64::conditional_swap(&mut a.0[2], &mut b.0[2], choice);
        u64::conditional_swap(&mut a.0[3], &mut b.0[3], choice);
        u64::conditional_swap(&mut a.0[4], &mut b.0[4], choice);
    }

    fn conditional_assign(&mut self, other: &FieldElement51, choice: Choice) {
        self.0[0].conditional_assign(&other.0[0], choice);
        self.0[1].conditional_assign(&other.0[1], choice);
        self.0[2].conditional_assign(&other.0[2], choice);
        self.0[3].conditional_assign(&other.0[3], choice);
        self.0[4].conditional_assign(&other.0[4], choice);
    }
}

impl FieldElement51 {
    pub(crate) const ZERO: FieldElement51 = FieldElement51([0, 0, 0, 0, 0]);
    pub(crate) const ONE: FieldElement51 = FieldElement51([1, 0, 0, 0, 0]);

    /// Add without carrying.  With 51-bit reduced inputs the sum stays
    /// within the 54-bit headroom that `mul` and `square` accept.
    pub(crate) fn add(&self, rhs: &FieldElement51) -> FieldElement51 {
        FieldElement51([
            self.0[0] + rhs.0[0],
            self.0[1] + rhs.0[1],
            self.0[2] + rhs.0[2],
            self.0[3] + rhs.0[3],
            self.0[4] + rhs.0[4],
        ])
    }

    /// Add, where one or both inputs are themselves the result of an
    /// uncarried `add`/`sub`.  In this radix the limbs still have room,
    /// so this is the same as `add`.
    pub(crate) fn add_after_basic(&self, rhs: &FieldElement51) -> FieldElement51 {
        self.add(rhs)
    }

    /// Add and run a full carry chain, returning limbs reduced below
    /// \\(2\^{51}\\) (the value may still be one subtraction above the
    /// canonical range).
    pub(crate) fn add_reduce(&self, rhs: &FieldElement51) -> FieldElement51 {
        let mut out = [0u64; 5];

        out[0] = self.0[0] + rhs.0[0];
        let mut c = out[0] >> 51;
        out[0] &= LOW_51_BIT_MASK;

        out[1] = self.0[1] + rhs.0[1] + c;
        c = out[1] >> 51;
        out[1] &= LOW_51_BIT_MASK;

        out[2] = self.0[2] + rhs.0[2] + c;
        c = out[2] >> 51;
        out[2] &= LOW_51_BIT_MASK;

        out[3] = self.0[3] + rhs.0[3] + c;
        c = out[3] >> 51;
        out[3] &= LOW_51_BIT_MASK;

        out[4] = self.0[4] + rhs.0[4] + c;
        c = out[4] >> 51;
        out[4] &= LOW_51_BIT_MASK;

        out[0] += c * 19;

        FieldElement51(out)
    }

    /// Subtract, adding \\(2p\\) first so the limbs stay non-negative.
    /// Inputs must be reduced (fresh out of `mul`, `square`, a `*_reduce`
    /// variant, or `from_bytes`).
    pub(crate) fn sub(&self, rhs: &FieldElement51) -> FieldElement51 {
        FieldElement51([
            self.0[0] + TWO_P_0 - rhs.0[0],
            self.0[1] + TWO_P_1234 - rhs.0[1],
            self.0[2] + TWO_P_1234 - rhs.0[2],
            self.0[3] + TWO_P_1234 - rhs.0[3],
            self.0[4] + TWO_P_1234 - rhs.0[4],
        ])
    }

    /// Subtract, where one or both inputs are the result of an uncarried
    /// `add`/`sub`; adds \\(4p\\) to cover the extra limb growth.
    pub(crate) fn sub_after_basic(&self, rhs: &FieldElement51) -> FieldElement51 {
        FieldElement51([
            self.0[0] + FOUR_P_0 - rhs.0[0],
            self.0[1] + FOUR_P_1234 - rhs.0[1],
            self.0[2] + FOUR_P_1234 - rhs.0[2],
            self.0[3] + FOUR_P_1234 - rhs.0[3],
            self.0[4] + FOUR_P_1234 - rhs.0[4],
        ])
    }

    /// Subtract and run a full carry chain.
    pub(crate) fn sub_reduce(&self, rhs: &FieldElement51) -> FieldElement51 {
        let mut out = [0u64; 5];

        out[0] = self.0[0] + FOUR_P_0 - rhs.0[0];
        let mut c = out[0] >> 51;
        out[0] &= LOW_51_BIT_MASK;

        out[1] = self.0[1] + FOUR_P_1234 - rhs.0[1] + c;
        c = out[1] >> 51;
        out[1] &= LOW_51_BIT_MASK;

        out[2] = self.0[2] + FOUR_P_1234 - rhs.0[2] + c;
        c = out[2] >> 51;
        out[2] &= LOW_51_BIT_MASK;

        out[3] = self.0[3] + FOUR_P_1234 - rhs.0[3] + c;
        c = out[3] >> 51;
        out[3] &= LOW_51_BIT_MASK;

        out[4] = self.0[4] + FOUR_P_1234 - rhs.0[4] + c;
        c = out[4] >> 51;
        out[4] &= LOW_51_BIT_MASK;

        out[0] += c * 19;

        FieldElement51(out)
    }

    /// Negate, with a full carry chain.
    pub(crate) fn neg(&self) -> FieldElement51 {
        let mut out = [0u64; 5];

        out[0] = TWO_P_0 - self.0[0];
        let mut c = out[0] >> 51;
        out[0] &= LOW_51_BIT_MASK;

        out[1] = TWO_P_1234 - self.0[1] + c;
        c = out[1] >> 51;
        out[1] &= LOW_51_BIT_MASK;

        out[2] = TWO_P_1234 - self.0[2] + c;
        c = out[2] >> 51;
        out[2] &= LOW_51_BIT_MASK;

        out[3] = TWO_P_1234 - self.0[3] + c;
        c = out[3] >> 51;
        out[3] &= LOW_51_BIT_MASK;

        out[4] = TWO_P_1234 - self.0[4] + c;
        c = out[4] >> 51;
        out[4] &= LOW_51_BIT_MASK;

        out[0] += c * 19;

        FieldElement51(out)
    }

    /// Multiply, reducing \\(2\^{255} \equiv 19\\) during the schoolbook
    /// pass.
    pub(crate) fn mul(&self, rhs: &FieldElement51) -> FieldElement51 {
        /// Helper function to multiply two 64-bit integers with 128
        /// bits of output.
        #[inline(always)]
        fn m(x: u64, y: u64) -> u128 {
            (x as u128) * (y as u128)
        }

        let a: &[u64; 5] = &self.0;
        let b: &[u64; 5] = &rhs.0;

        // 64-bit precomputations to avoid 128-bit multiplications.
        let b1_19 = b[1] * 19;
        let b2_19 = b[2] * 19;
        let b3_19 = b[3] * 19;
        let b4_19 = b[4] * 19;

        let t0 = m(a[0], b[0]) + m(a[4], b1_19) + m(a[3], b2_19) + m(a[2], b3_19) + m(a[1], b4_19);
        let mut t1 =
            m(a[1], b[0]) + m(a[0], b[1]) + m(a[4], b2_19) + m(a[3], b3_19) + m(a[2], b4_19);
        let mut t2 =
            m(a[2], b[0]) + m(a[1], b[1]) + m(a[0], b[2]) + m(a[4], b3_19) + m(a[3], b4_19);
        let mut t3 = m(a[3], b[0]) + m(a[2], b[1]) + m(a[1], b[2]) + m(a[0], b[3]) + m(a[4], b4_19);
        let mut t4 = m(a[4], b[0]) + m(a[3], b[1]) + m(a[2], b[2]) + m(a[1], b[3]) + m(a[0], b[4]);

        let mut r0 = (t0 as u64) & LOW_51_BIT_MASK;
        let mut c = (t0 >> 51) as u64;

        t1 += c as u128;
        let mut r1 = (t1 as u64) & LOW_51_BIT_MASK;
        c = (t1 >> 51) as u64;

        t2 += c as u128;
        let r2 = (t2 as u64) & LOW_51_BIT_MASK;
        c = (t2 >> 51) as u64;

        t3 += c as u128;
        let r3 = (t3 as u64) & LOW_51_BIT_MASK;
        c = (t3 >> 51) as u64;

        t4 += c as u128;
        let r4 = (t4 as u64) & LOW_51_BIT_MASK;
        c = (t4 >> 51) as u64;

        r0 += c * 19;
        c = r0 >> 51;
        r0 &= LOW_51_BIT_MASK;
        r1 += c;

        FieldElement51([r0, r1, r2, r3, r4])
    }

    /// Square this field element.
    pub(crate) fn square(&self) -> FieldElement51 {
        self.square_times(1)
    }

    /// Square this field element `count` times; `count` must be nonzero.
    pub(crate) fn square_times(&self, count: u32) -> FieldElement51 {
        #[inline(always)]
        fn m(x: u64, y: u64) -> u128 {
            (x as u128) * (y as u128)
        }

        debug_assert!(count > 0);

        let mut r0 = self.0[0];
        let mut r1 = self.0[1];
        let mut r2 = self.0[2];
        let mut r3 = self.0[3];
        let mut r4 = self.0[4];

        for _ in 0..count {
            let d0 = r0 * 2;
            let d1 = r1 * 2;
            let d2 = r2 * 2 * 19;
            let d419 = r4 * 19;
            let d4 = d419 * 2;

            let t0 = m(r0, r0) + m(d4, r1) + m(d2, r3);
            let t1 = m(d0, r1) + m(d4, r2) + m(r3, r3 * 19);
            let t2 = m(d0, r2) + m(r1, r1) + m(d4, r3);
            let t3 = m(d0, r3) + m(d1, r2) + m(r4, d419);
            let t4 = m(d0, r4) + m(d1, r3) + m(r2, r2);

            r0 = (t0 as u64) & LOW_51_BIT_MASK;

            r1 = (t1 as u64) & LOW_51_BIT_MASK;
            r1 += (t0 >> 51) as u64;

            r2 = (t2 as u64) & LOW_51_BIT_MASK;
            r2 += (t1 >> 51) as u64;

            r3 = (t3 as u64) & LOW_51_BIT_MASK;
            r3 += (t2 >> 51) as u64;

            r4 = (t4 as u64) & LOW_51_BIT_MASK;
            r4 += (t3 >> 51) as u64;

            r0 += ((t4 >> 51) as u64) * 19;

            let mut c = r0 >> 51;
            r0 &= LOW_51_BIT_MASK;
            r1 += c;
            c = r1 >> 51;
            r1 &= LOW_51_BIT_MASK;
            r2 += c;
            c = r2 >> 51;
            r2 &= LOW_51_BIT_MASK;
            r3 += c;
            c = r3 >> 51;
            r3 &= LOW_51_BIT_MASK;
            r4 += c;
            c = r4 >> 51;
            r4 &= LOW_51_BIT_MASK;
            r0 += c * 19;
        }

        FieldElement51([r0, r1, r2, r3, r4])
    }

    /// Load a field element from a little-endian 32-byte encoding.
    ///
    /// The high bit (the sign of \\(x\\) in a point encoding) is ignored,
    /// and the value is *not* checked against \\(p\\): encodings in
    /// \\( \[p, 2\^{255}) \\) import as their reduced values.
    pub(crate) fn from_bytes(bytes: &[u8; 32]) -> FieldElement51 {
        #[inline(always)]
        fn load8(input: &[u8]) -> u64 {
            u64::from_le_bytes(input[..8].try_into().unwrap())
        }

        let mut x0 = load8(&bytes[0..]);
        let mut x1 = load8(&bytes[8..]);
        let mut x2 = load8(&bytes[16..]);
        let x3 = load8(&bytes[24..]);

        let mut out = [0u64; 5];
        out[0] = x0 & LOW_51_BIT_MASK;
        x0 = (x0 >> 51) | (x1 << 13);
        out[1] = x0 & LOW_51_BIT_MASK;
        x1 = (x1 >> 38) | (x2 << 26);
        out[2] = x1 & LOW_51_BIT_MASK;
        x2 = (x2 >> 25) | (x3 << 39);
        out[3] = x2 & LOW_51_BIT_MASK;
        out[4] = (x3 >> 12) & LOW_51_BIT_MASK;

        FieldElement51(out)
    }

    /// Fully reduce to the canonical representative and encode as 32
    /// little-endian bytes.
    pub(crate) fn to_bytes(&self) -> [u8; 32] {
        let mut t = self.0;

        fn carry(t: &mut [u64; 5]) {
            t[1] += t[0] >> 51;
            t[0] &= LOW_51_BIT_MASK;
            t[2] += t[1] >> 51;
            t[1] &= LOW_51_BIT_MASK;
            t[3] += t[2] >> 51;
            t[2] &= LOW_51_BIT_MASK;
            t[4] += t[3] >> 51;
            t[3] &= LOW_51_BIT_MASK;
        }

        fn carry_full(t: &mut [u64; 5]) {
            carry(t);
            t[0] += 19 * (t[4] >> 51);
            t[4] &= LOW_51_BIT_MASK;
        }

        carry_full(&mut t);
        carry_full(&mut t);

        // Now t is between 0 and 2^255-1, properly carried.
        // Case 1: between 0 and 2^255-20.  Case 2: between 2^255-19 and
        // 2^255-1.  Adding 19 pushes case 2 over 2^255, so after another
        // full carry both cases are offset by exactly 19.
        t[0] += 19;
        carry_full(&mut t);

        // Subtract the 19 back off along with 2^255, by adding p offset
        // by 2^255; the final carry drops the 2^255.
        t[0] += (LOW_51_BIT_MASK + 1) - 19;
        t[1] += LOW_51_BIT_MASK;
        t[2] += LOW_51_BIT_MASK;
        t[3] += LOW_51_BIT_MASK;
        t[4] += LOW_51_BIT_MASK;
        carry(&mut t);
        t[4] &= LOW_51_BIT_MASK;

        let mut out = [0u8; 32];
        out[0..8].copy_from_slice(&(t[0] | (t[1] << 51)).to_le_bytes());
        out[8..16].copy_from_slice(&((t[1] >> 13) | (t[2] << 38)).to_le_bytes());
        out[16..24].copy_from_slice(&((t[2] >> 26) | (t[3] << 25)).to_le_bytes());
        out[24..32].copy_from_slice(&((t[3] >> 39) | (t[4] << 12)).to_le_bytes());
        out
    }
}
