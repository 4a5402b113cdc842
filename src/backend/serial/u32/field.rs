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

//! Field arithmetic modulo \\(p = 2\^{255} - 19\\), using \\(32\\)-bit
//! limbs with \\(64\\)-bit products.
//!
//! The ten limbs alternate between 26 and 25 bits, so the radix positions
//! line up with the 64-bit backend's byte encoding.  Unlike the 64-bit
//! backend, the plain `add` cannot skip carries forever: here `add` is
//! carry-free and `add_after_basic` runs the carry chain, the reverse of
//! the wider backend's arrangement.

use core::fmt::Debug;

use subtle::Choice;
use subtle::ConditionallySelectable;

#[cfg(feature = "zeroize")]
use zeroize::Zeroize;

/// A `FieldElement2625` represents an element of the field
/// \\( \mathbb Z / (2\^{255} - 19)\\).
///
/// In the 32-bit implementation, a `FieldElement2625` is represented in
/// radix \\(2\^{25.5}\\) as ten `u32`s, with even limbs holding 26 bits
/// and odd limbs 25 bits.
#[derive(Copy, Clone)]
pub struct FieldElement2625(pub(crate) [u32; 10]);

const MASK_25: u32 = (1u32 << 25) - 1;
const MASK_26: u32 = (1u32 << 26) - 1;

// Multiples of p in this radix, for subtraction.
const TWO_P_0: u32 = 0x07ff_ffda;
const TWO_P_13579: u32 = 0x03ff_fffe;
const TWO_P_2468: u32 = 0x07ff_fffe;
const FOUR_P_0: u32 = 0x0fff_ffb4;
const FOUR_P_13579: u32 = 0x07ff_fffc;
const FOUR_P_2468: u32 = 0x0fff_fffc;

impl Debug for FieldElement2625 {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "FieldElement2625({:?})", &self.0[..])
    }
}

#[cfg(feature = "zeroize")]
impl Zeroize for FieldElement2625 {
    fn zeroize(&mut self) {
        self.0.zeroize();
    }
}

impl ConditionallySelectable for FieldElement2625 {
    fn conditional_select(
        a: &FieldElement2625,
        b: &FieldElement2625,
        choice: Choice,
    ) -> FieldElement2625 {
        let mut out = *a;
        out.conditional_assign(b, choice);
        out
    }

    fn conditional_swap(a: &mut FieldElement2625, b: &mut FieldElement2625, choice: Choice) {
        for i in 0..10 {
            u32::conditional_swap(&mut a.0[i], &mut b.0[i], choice);
        }
    }

    fn conditional_assign(&mut self, other: &FieldElement2625, choice: Choice) {
        for i in 0..10 {
            self.0[i].conditional_assign(&other.0[i], choice);
        }
    }
}

impl FieldElement2625 {
    pub(crate) const ZERO: FieldElement2625 = FieldElement2625([0; 10]);
    pub(crate) const ONE: FieldElement2625 = FieldElement2625([1, 0, 0, 0, 0, 0, 0, 0, 0, 0]);

    /// Carry one step of the interleaved 26/25 chain, without folding the
    /// top carry back into limb 0.
    #[inline(always)]
    fn carry_chain(out: &mut [u32; 10]) -> u32 {
        let mut c;

        c = out[0] >> 26;
        out[0] &= MASK_26;
        out[1] += c;
        c = out[1] >> 25;
        out[1] &= MASK_25;
        out[2] += c;
        c = out[2] >> 26;
        out[2] &= MASK_26;
        out[3] += c;
        c = out[3] >> 25;
        out[3] &= MASK_25;
        out[4] += c;
        c = out[4] >> 26;
        out[4] &= MASK_26;
        out[5] += c;
        c = out[5] >> 25;
        out[5] &= MASK_25;
        out[6] += c;
        c = out[6] >> 26;
        out[6] &= MASK_26;
        out[7] += c;
        c = out[7] >> 25;
        out[7] &= MASK_25;
        out[8] += c;
        c = out[8] >> 26;
        out[8] &= MASK_26;
        out[9] += c;
        c = out[9] >> 25;
        out[9] &= MASK_25;

        c
    }

    /// Add without carrying.  Inputs must be reduced; the 26-bit limbs
    /// have exactly one bit of headroom, which is all a single lazy add
    /// is allowed to consume.
    pub(crate) fn add(&self, rhs: &FieldElement2625) -> FieldElement2625 {
        let mut out = [0u32; 10];
        for i in 0..10 {
            out[i] = self.0[i] + rhs.0[i];
        }
        FieldElement2625(out)
    }

    /// Add, where one or both inputs came from an uncarried `add`/`sub`.
    /// With only one headroom bit per limb, this variant must carry.
    pub(crate) fn add_after_basic(&self, rhs: &FieldElement2625) -> FieldElement2625 {
        let mut out = [0u32; 10];
        for i in 0..10 {
            out[i] = self.0[i] + rhs.0[i];
        }
        let c = Self::carry_chain(&mut out);
        out[0] += 19 * c;
        FieldElement2625(out)
    }

    /// Add and run the full carry chain.
    pub(crate) fn add_reduce(&self, rhs: &FieldElement2625) -> FieldElement2625 {
        self.add_after_basic(rhs)
    }

    /// Subtract reduced inputs, adding \\(2p\\) to keep limbs positive.
    ///
    /// Only the low half of the chain is carried; the upper limbs cannot
    /// overflow their headroom from a single subtraction.
    pub(crate) fn sub(&self, rhs: &FieldElement2625) -> FieldElement2625 {
        let mut out = [0u32; 10];
        let a = &self.0;
        let b = &rhs.0;

        out[0] = TWO_P_0 + a[0] - b[0];
        let mut c = out[0] >> 26;
        out[0] &= MASK_26;

        out[1] = TWO_P_13579 + a[1] - b[1] + c;
        c = out[1] >> 25;
        out[1] &= MASK_25;

        out[2] = TWO_P_2468 + a[2] - b[2] + c;
        c = out[2] >> 26;
        out[2] &= MASK_26;

        out[3] = TWO_P_13579 + a[3] - b[3] + c;
        c = out[3] >> 25;
        out[3] &= MASK_25;

        out[4] = TWO_P_2468 + a[4] - b[4] + c;

        out[5] = TWO_P_13579 + a[5] - b[5];
        out[6] = TWO_P_2468 + a[6] - b[6];
        out[7] = TWO_P_13579 + a[7] - b[7];
        out[8] = TWO_P_2468 + a[8] - b[8];
        out[9] = TWO_P_13579 + a[9] - b[9];

        FieldElement2625(out)
    }

    /// Subtract where one or both inputs came from an uncarried
    /// `add`/`sub`; adds \\(4p\\) and carries fully.
    pub(crate) fn sub_after_basic(&self, rhs: &FieldElement2625) -> FieldElement2625 {
        let mut out = [0u32; 10];

        out[0] = FOUR_P_0 + self.0[0] - rhs.0[0];
        out[1] = FOUR_P_13579 + self.0[1] - rhs.0[1];
        out[2] = FOUR_P_2468 + self.0[2] - rhs.0[2];
        out[3] = FOUR_P_13579 + self.0[3] - rhs.0[3];
        out[4] = FOUR_P_2468 + self.0[4] - rhs.0[4];
        out[5] = FOUR_P_13579 + self.0[5] - rhs.0[5];
        out[6] = FOUR_P_2468 + self.0[6] - rhs.0[6];
        out[7] = FOUR_P_13579 + self.0[7] - rhs.0[7];
        out[8] = FOUR_P_2468 + self.0[8] - rhs.0[8];
        out[9] = FOUR_P_13579 + self.0[9] - rhs.0[9];

        let c = Self::carry_chain(&mut out);
        out[0] += 19 * c;
        FieldElement2625(out)
    }

    /// Subtract and run the full carry chain.
    pub(crate) fn sub_reduce(&self, rhs: &FieldElement2625) -> FieldElement2625 {
        self.sub_after_basic(rhs)
    }

    /// Negate, with a full carry chain.
    pub(crate) fn neg(&self) -> FieldElement2625 {
        let mut out = [0u32; 10];

        out[0] = TWO_P_0 - self.0[0];
        out[1] = TWO_P_13579 - self.0[1];
        out[2] = TWO_P_2468 - self.0[2];
        out[3] = TWO_P_13579 - self.0[3];
        out[4] = TWO_P_2468 - self.0[4];
        out[5] = TWO_P_13579 - self.0[5];
        out[6] = TWO_P_2468 - self.0[6];
        out[7] = TWO_P_13579 - self.0[7];
        out[8] = TWO_P_2468 - self.0[8];
        out[9] = TWO_P_13579 - self.0[9];

        let c = Self::carry_chain(&mut out);
        out[0] += 19 * c;
        FieldElement2625(out)
    }

    /// Multiply, reducing \\(2\^{255} \equiv 19\\) during the schoolbook
    /// pass.
    pub(crate) fn mul(&self, rhs: &FieldElement2625) -> FieldElement2625 {
        #[inline(always)]
        fn m(x: u32, y: u32) -> u64 {
            (x as u64) * (y as u64)
        }

        let r = &rhs.0;
        let s = &self.0;

        let (r0, mut r1, mut r2, mut r3, mut r4) = (r[0], r[1], r[2], r[3], r[4]);
        let (mut r5, mut r6, mut r7, mut r8, mut r9) = (r[5], r[6], r[7], r[8], r[9]);

        let mut m1 = m(r0, s[1]) + m(r1, s[0]);
        let mut m3 = m(r0, s[3]) + m(r1, s[2]) + m(r2, s[1]) + m(r3, s[0]);
        let mut m5 =
            m(r0, s[5]) + m(r1, s[4]) + m(r2, s[3]) + m(r3, s[2]) + m(r4, s[1]) + m(r5, s[0]);
        let mut m7 = m(r0, s[7])
            + m(r1, s[6])
            + m(r2, s[5])
            + m(r3, s[4])
            + m(r4, s[3])
            + m(r5, s[2])
            + m(r6, s[1])
            + m(r7, s[0]);
        let m9 = m(r0, s[9])
            + m(r1, s[8])
            + m(r2, s[7])
            + m(r3, s[6])
            + m(r4, s[5])
            + m(r5, s[4])
            + m(r6, s[3])
            + m(r7, s[2])
            + m(r8, s[1])
            + m(r9, s[0]);

        r1 *= 2;
        r3 *= 2;
        r5 *= 2;
        r7 *= 2;

        let mut m0 = m(r0, s[0]);
        let mut m2 = m(r0, s[2]) + m(r1, s[1]) + m(r2, s[0]);
        let mut m4 = m(r0, s[4]) + m(r1, s[3]) + m(r2, s[2]) + m(r3, s[1]) + m(r4, s[0]);
        let mut m6 = m(r0, s[6])
            + m(r1, s[5])
            + m(r2, s[4])
            + m(r3, s[3])
            + m(r4, s[2])
            + m(r5, s[1])
            + m(r6, s[0]);
        let mut m8 = m(r0, s[8])
            + m(r1, s[7])
            + m(r2, s[6])
            + m(r3, s[5])
            + m(r4, s[4])
            + m(r5, s[3])
            + m(r6, s[2])
            + m(r7, s[1])
            + m(r8, s[0]);

        // Fold the high half down with the doubled-odd-limb bookkeeping:
        // the odd r limbs were already doubled above, so halve them back
        // before scaling by 19 where the formula wants an undoubled term.
        r1 *= 19;
        r2 *= 19;
        r3 = (r3 / 2) * 19;
        r4 *= 19;
        r5 = (r5 / 2) * 19;
        r6 *= 19;
        r7 = (r7 / 2) * 19;
        r8 *= 19;
        r9 *= 19;

        m1 += m(r9, s[2])
            + m(r8, s[3])
            + m(r7, s[4])
            + m(r6, s[5])
            + m(r5, s[6])
            + m(r4, s[7])
            + m(r3, s[8])
            + m(r2, s[9]);
        m3 += m(r9, s[4]) + m(r8, s[5]) + m(r7, s[6]) + m(r6, s[7]) + m(r5, s[8]) + m(r4, s[9]);
        m5 += m(r9, s[6]) + m(r8, s[7]) + m(r7, s[8]) + m(r6, s[9]);
        m7 += m(r9, s[8]) + m(r8, s[9]);

        r3 *= 2;
        r5 *= 2;
        r7 *= 2;
        r9 *= 2;

        m0 += m(r9, s[1])
            + m(r8, s[2])
            + m(r7, s[3])
            + m(r6, s[4])
            + m(r5, s[5])
            + m(r4, s[6])
            + m(r3, s[7])
            + m(r2, s[8])
            + m(r1, s[9]);
        m2 += m(r9, s[3])
            + m(r8, s[4])
            + m(r7, s[5])
            + m(r6, s[6])
            + m(r5, s[7])
            + m(r4, s[8])
            + m(r3, s[9]);
        m4 += m(r9, s[5]) + m(r8, s[6]) + m(r7, s[7]) + m(r6, s[8]) + m(r5, s[9]);
        m6 += m(r9, s[7]) + m(r8, s[8]) + m(r7, s[9]);
        m8 += m(r9, s[9]);

        Self::reduce_wide([m0, m1, m2, m3, m4, m5, m6, m7, m8, m9])
    }

    /// Square this field element.
    pub(crate) fn square(&self) -> FieldElement2625 {
        self.square_times(1)
    }

    /// Square this field element `count` times; `count` must be nonzero.
    pub(crate) fn square_times(&self, count: u32) -> FieldElement2625 {
        #[inline(always)]
        fn m(x: u32, y: u32) -> u64 {
            (x as u64) * (y as u64)
        }

        debug_assert!(count > 0);

        let mut out = *self;

        for _ in 0..count {
            let f = &out.0;
            let (mut r0, mut r1, mut r2, mut r3, r4) = (f[0], f[1], f[2], f[3], f[4]);
            let (r5, r6, r7, r8, r9) = (f[5], f[6], f[7], f[8], f[9]);

            let m0 = m(r0, r0);
            r0 *= 2;
            let m1 = m(r0, r1);
            let m2 = m(r0, r2) + m(r1, r1 * 2);
            r1 *= 2;
            let m3 = m(r0, r3) + m(r1, r2);
            let m4 = m(r0, r4) + m(r1, r3 * 2) + m(r2, r2);
            r2 *= 2;
            let m5 = m(r0, r5) + m(r1, r4) + m(r2, r3);
            let m6 = m(r0, r6) + m(r1, r5 * 2) + m(r2, r4) + m(r3, r3 * 2);
            r3 *= 2;
            let m7 = m(r0, r7) + m(r1, r6) + m(r2, r5) + m(r3, r4);
            let m8 = m(r0, r8) + m(r1, r7 * 2) + m(r2, r6) + m(r3, r5 * 2) + m(r4, r4);
            let m9 = m(r0, r9) + m(r1, r8) + m(r2, r7) + m(r3, r6) + m(r4, r5 * 2);

            let d6 = r6 * 19;
            let d7 = r7 * 2 * 19;
            let d8 = r8 * 19;
            let d9 = r9 * 2 * 19;

            let m0 = m0 + m(d9, r1) + m(d8, r2) + m(d7, r3) + m(d6, r4 * 2) + m(r5, r5 * 2 * 19);
            let m1 = m1 + m(d9, r2 / 2) + m(d8, r3) + m(d7, r4) + m(d6, r5 * 2);
            let m2 = m2 + m(d9, r3) + m(d8, r4 * 2) + m(d7, r5 * 2) + m(d6, r6);
            let m3 = m3 + m(d9, r4) + m(d8, r5 * 2) + m(d7, r6);
            let m4 = m4 + m(d9, r5 * 2) + m(d8, r6 * 2) + m(d7, r7);
            let m5 = m5 + m(d9, r6) + m(d8, r7 * 2);
            let m6 = m6 + m(d9, r7 * 2) + m(d8, r8);
            let m7 = m7 + m(d9, r8);
            let m8 = m8 + m(d9, r9);

            out = Self::reduce_wide([m0, m1, m2, m3, m4, m5, m6, m7, m8, m9]);
        }

        out
    }

    /// Carry a 10-limb vector of 64-bit product accumulators down to
    /// 26/25-bit limbs.
    fn reduce_wide(mut m: [u64; 10]) -> FieldElement2625 {
        let mut r = [0u32; 10];
        let mut c;

        r[0] = (m[0] as u32) & MASK_26;
        c = m[0] >> 26;
        m[1] += c;
        r[1] = (m[1] as u32) & MASK_25;
        c = m[1] >> 25;
        m[2] += c;
        r[2] = (m[2] as u32) & MASK_26;
        c = m[2] >> 26;
        m[3] += c;
        r[3] = (m[3] as u32) & MASK_25;
        c = m[3] >> 25;
        m[4] += c;
        r[4] = (m[4] as u32) & MASK_26;
        c = m[4] >> 26;
        m[5] += c;
        r[5] = (m[5] as u32) & MASK_25;
        c = m[5] >> 25;
        m[6] += c;
        r[6] = (m[6] as u32) & MASK_26;
        c = m[6] >> 26;
        m[7] += c;
        r[7] = (m[7] as u32) & MASK_25;
        c = m[7] >> 25;
        m[8] += c;
        r[8] = (m[8] as u32) & MASK_26;
        c = m[8] >> 26;
        m[9] += c;
        r[9] = (m[9] as u32) & MASK_25;
        let q = (m[9] >> 25) as u64;

        let t = (r[0] as u64) + q * 19;
        r[0] = (t as u32) & MASK_26;
        r[1] += (t >> 26) as u32;

        FieldElement2625(r)
    }

    /// Load a field element from a little-endian 32-byte encoding.
    ///
    /// The high bit is ignored, and values in \\( \[p, 2\^{255}) \\)
    /// import unreduced.
    pub(crate) fn from_bytes(bytes: &[u8; 32]) -> FieldElement2625 {
        #[inline(always)]
        fn load4(input: &[u8]) -> u32 {
            u32::from_le_bytes(input[..4].try_into().unwrap())
        }

        let x0 = load4(&bytes[0..]);
        let x1 = load4(&bytes[4..]);
        let x2 = load4(&bytes[8..]);
        let x3 = load4(&bytes[12..]);
        let x4 = load4(&bytes[16..]);
        let x5 = load4(&bytes[20..]);
        let x6 = load4(&bytes[24..]);
        let x7 = load4(&bytes[28..]);

        #[inline(always)]
        fn pair_shift(hi: u32, lo: u32, shift: u32) -> u32 {
            ((((hi as u64) << 32) | (lo as u64)) >> shift) as u32
        }

        FieldElement2625([
            x0 & MASK_26,
            pair_shift(x1, x0, 26) & MASK_25,
            pair_shift(x2, x1, 19) & MASK_26,
            pair_shift(x3, x2, 13) & MASK_25,
            (x3 >> 6) & MASK_26,
            x4 & MASK_25,
            pair_shift(x5, x4, 25) & MASK_26,
            pair_shift(x6, x5, 19) & MASK_25,
            pair_shift(x7, x6, 12) & MASK_26,
            (x7 >> 6) & MASK_25,
        ])
    }

    /// Fully reduce to the canonical representative and encode as 32
    /// little-endian bytes.
    pub(crate) fn to_bytes(&self) -> [u8; 32] {
        let mut f = self.0;

        fn carry_full(f: &mut [u32; 10]) {
            let c = FieldElement2625::carry_chain(f);
            f[0] += 19 * c;
        }

        carry_full(&mut f);
        carry_full(&mut f);

        // Now f is between 0 and 2^255-1, properly carried.
        // Case 1: between 0 and 2^255-20.  Case 2: between 2^255-19 and
        // 2^255-1.
        f[0] += 19;
        carry_full(&mut f);

        // Now between 19 and 2^255-1 in both cases, and offset by 19.
        f[0] += (MASK_26 + 1) - 19;
        f[1] += MASK_25;
        f[2] += MASK_26;
        f[3] += MASK_25;
        f[4] += MASK_26;
        f[5] += MASK_25;
        f[6] += MASK_26;
        f[7] += MASK_25;
        f[8] += MASK_26;
        f[9] += MASK_25;

        // Now between 2^255 and 2^256-20, and offset by 2^255; the final
        // carry out of limb 9 is exactly that 2^255, and is dropped.
        let _ = Self::carry_chain(&mut f);

        // Align each limb on its byte boundary and overlay into the
        // output at 3- or 4-byte strides.
        f[1] <<= 2;
        f[2] <<= 3;
        f[3] <<= 5;
        f[4] <<= 6;
        f[6] <<= 1;
        f[7] <<= 3;
        f[8] <<= 4;
        f[9] <<= 6;

        let mut out = [0u8; 32];
        #[inline(always)]
        fn write4(out: &mut [u8; 32], s: usize, v: u32) {
            out[s] |= (v & 0xff) as u8;
            out[s + 1] = ((v >> 8) & 0xff) as u8;
            out[s + 2] = ((v >> 16) & 0xff) as u8;
            out[s + 3] = ((v >> 24) & 0xff) as u8;
        }

        write4(&mut out, 0, f[0]);
        write4(&mut out, 3, f[1]);
        write4(&mut out, 6, f[2]);
        write4(&mut out, 9, f[3]);
        write4(&mut out, 12, f[4]);
        write4(&mut out, 16, f[5]);
        write4(&mut out, 19, f[6]);
        write4(&mut out, 22, f[7]);
        write4(&mut out, 25, f[8]);
        write4(&mut out, 28, f[9]);
        out
    }
}
