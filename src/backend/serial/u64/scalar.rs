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

//! Arithmetic modulo the group order \\( \ell = 2\^{252} +
//! 27742317777372353535851937790883648493 \\), using five \\(56\\)-bit
//! limbs and Barrett reduction.

use core::fmt::Debug;

#[cfg(feature = "zeroize")]
use zeroize::Zeroize;

/// The `Scalar56` struct represents an element in
/// \\(\mathbb Z / \ell \mathbb Z\\) as 5 \\(56\\)-bit limbs.
#[derive(Copy, Clone, PartialEq, Eq)]
pub struct Scalar56(pub(crate) [u64; 5]);

const MASK_56: u64 = (1u64 << 56) - 1;

/// The group order \\( \ell \\).
const M: [u64; 5] = [
    0x0012_631a_5cf5_d3ed,
    0x00f9_dea2_f79c_d658,
    0x0000_0000_0000_14de,
    0x0000_0000_0000_0000,
    0x0000_0000_1000_0000,
];

/// The Barrett constant \\( \mu = \lfloor 2^{264} / \ell \rfloor \\).
const MU: [u64; 5] = [
    0x009c_e5a3_0a2c_131b,
    0x0021_5d08_6329_a7ed,
    0x00ff_ffff_ffeb_2106,
    0x00ff_ffff_ffff_ffff,
    0x0000_000f_ffff_ffff,
];

impl Debug for Scalar56 {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "Scalar56({:?})", &self.0[..])
    }
}

#[cfg(feature = "zeroize")]
impl Zeroize for Scalar56 {
    fn zeroize(&mut self) {
        self.0.zeroize();
    }
}

/// u64 * u64 = u128 multiply helper
#[inline(always)]
fn m(x: u64, y: u64) -> u128 {
    (x as u128) * (y as u128)
}

/// Borrow of `a - b` as a full-width mask bit.
#[inline(always)]
fn lt(a: u64, b: u64) -> u64 {
    a.wrapping_sub(b) >> 63
}

impl Scalar56 {
    pub(crate) const ZERO: Scalar56 = Scalar56([0, 0, 0, 0, 0]);

    /// Number of limbs in this representation.
    pub(crate) const LIMBS: usize = 5;

    /// Bits carried per limb.
    pub(crate) const BITS_PER_LIMB: usize = 56;

    /// Conditionally subtract \\( \ell \\) once, bringing a value below
    /// \\( 2 \ell \\) into canonical range.
    fn reduce(mut self) -> Scalar56 {
        let r = &mut self.0;
        let mut t = [0u64; 5];

        let mut pb = M[0];
        let mut b = lt(r[0], pb);
        t[0] = r[0].wrapping_sub(pb).wrapping_add(b << 56);
        pb = b;

        pb += M[1];
        b = lt(r[1], pb);
        t[1] = r[1].wrapping_sub(pb).wrapping_add(b << 56);
        pb = b;

        pb += M[2];
        b = lt(r[2], pb);
        t[2] = r[2].wrapping_sub(pb).wrapping_add(b << 56);
        pb = b;

        pb += M[3];
        b = lt(r[3], pb);
        t[3] = r[3].wrapping_sub(pb).wrapping_add(b << 56);
        pb = b;

        pb += M[4];
        b = lt(r[4], pb);
        t[4] = r[4].wrapping_sub(pb).wrapping_add(b << 32);

        // Keep r if r was smaller than m.
        let mask = b.wrapping_sub(1);
        for i in 0..5 {
            r[i] ^= mask & (r[i] ^ t[i]);
        }

        self
    }

    /// Barrett reduction: given `q1 = x >> 248` and `r1 = x mod 2^264`,
    /// compute `x mod l`.  One round suffices for any `x < 2^512`.
    fn barrett_reduce(q1: &Scalar56, r1: &Scalar56) -> Scalar56 {
        let mut q3 = [0u64; 5];

        // q2 = mu * q1, of which only q3 = q2 >> 264 is kept.
        let mut c: u128 = m(MU[0], q1.0[3]) + m(MU[3], q1.0[0]) + m(MU[1], q1.0[2]) + m(MU[2], q1.0[1]);
        let mut f = (c >> 56) as u64;

        c = m(MU[0], q1.0[4])
            + (f as u128)
            + m(MU[4], q1.0[0])
            + m(MU[3], q1.0[1])
            + m(MU[1], q1.0[3])
            + m(MU[2], q1.0[2]);
        f = c as u64;
        q3[0] = (f >> 40) & 0xffff;
        f = (c >> 56) as u64;

        c = m(MU[4], q1.0[1]) + (f as u128) + m(MU[1], q1.0[4]) + m(MU[2], q1.0[3]) + m(MU[3], q1.0[2]);
        f = c as u64;
        q3[0] |= (f << 16) & MASK_56;
        q3[1] = (f >> 40) & 0xffff;
        f = (c >> 56) as u64;

        c = m(MU[4], q1.0[2]) + (f as u128) + m(MU[2], q1.0[4]) + m(MU[3], q1.0[3]);
        f = c as u64;
        q3[1] |= (f << 16) & MASK_56;
        q3[2] = (f >> 40) & 0xffff;
        f = (c >> 56) as u64;

        c = m(MU[4], q1.0[3]) + (f as u128) + m(MU[3], q1.0[4]);
        f = c as u64;
        q3[2] |= (f << 16) & MASK_56;
        q3[3] = (f >> 40) & 0xffff;
        f = (c >> 56) as u64;

        c = m(MU[4], q1.0[4]) + (f as u128);
        f = c as u64;
        q3[3] |= (f << 16) & MASK_56;
        q3[4] = (f >> 40) & 0xffff;
        f = (c >> 56) as u64;
        q3[4] |= f << 16;

        // r2 = (q3 * m) mod 2^264
        let mut r2 = [0u64; 5];

        c = m(M[0], q3[0]);
        r2[0] = (c as u64) & MASK_56;
        f = (c >> 56) as u64;

        c = m(M[0], q3[1]) + (f as u128) + m(M[1], q3[0]);
        r2[1] = (c as u64) & MASK_56;
        f = (c >> 56) as u64;

        c = m(M[0], q3[2]) + (f as u128) + m(M[2], q3[0]) + m(M[1], q3[1]);
        r2[2] = (c as u64) & MASK_56;
        f = (c >> 56) as u64;

        c = m(M[0], q3[3]) + (f as u128) + m(M[3], q3[0]) + m(M[1], q3[2]) + m(M[2], q3[1]);
        r2[3] = (c as u64) & MASK_56;
        f = (c >> 56) as u64;

        c = m(M[0], q3[4])
            + (f as u128)
            + m(M[4], q3[0])
            + m(M[3], q3[1])
            + m(M[1], q3[3])
            + m(M[2], q3[2]);
        r2[4] = (c as u64) & 0x0000_00ff_ffff_ffff;

        // r = (r1 - r2) mod 2^264
        let mut out = [0u64; 5];

        let mut pb = r2[0];
        let mut b = lt(r1.0[0], pb);
        out[0] = r1.0[0].wrapping_sub(pb).wrapping_add(b << 56);
        pb = b;

        pb += r2[1];
        b = lt(r1.0[1], pb);
        out[1] = r1.0[1].wrapping_sub(pb).wrapping_add(b << 56);
        pb = b;

        pb += r2[2];
        b = lt(r1.0[2], pb);
        out[2] = r1.0[2].wrapping_sub(pb).wrapping_add(b << 56);
        pb = b;

        pb += r2[3];
        b = lt(r1.0[3], pb);
        out[3] = r1.0[3].wrapping_sub(pb).wrapping_add(b << 56);
        pb = b;

        pb += r2[4];
        b = lt(r1.0[4], pb);
        out[4] = r1.0[4].wrapping_sub(pb).wrapping_add(b << 40);

        Scalar56(out).reduce().reduce()
    }

    /// Compute `a + b mod l`.
    pub(crate) fn add(&self, rhs: &Scalar56) -> Scalar56 {
        let mut out = [0u64; 5];

        let mut c = self.0[0] + rhs.0[0];
        out[0] = c & MASK_56;
        c >>= 56;
        c += self.0[1] + rhs.0[1];
        out[1] = c & MASK_56;
        c >>= 56;
        c += self.0[2] + rhs.0[2];
        out[2] = c & MASK_56;
        c >>= 56;
        c += self.0[3] + rhs.0[3];
        out[3] = c & MASK_56;
        c >>= 56;
        c += self.0[4] + rhs.0[4];
        out[4] = c;

        Scalar56(out).reduce()
    }

    /// Compute `a * b mod l`.
    pub(crate) fn mul(&self, rhs: &Scalar56) -> Scalar56 {
        let x = &self.0;
        let y = &rhs.0;

        let mut q1 = [0u64; 5];
        let mut r1 = [0u64; 5];

        let mut c: u128 = m(x[0], y[0]);
        let mut f = c as u64;
        r1[0] = f & MASK_56;
        c >>= 56;

        c += m(x[0], y[1]) + m(x[1], y[0]);
        f = c as u64;
        r1[1] = f & MASK_56;
        c >>= 56;

        c += m(x[0], y[2]) + m(x[2], y[0]) + m(x[1], y[1]);
        f = c as u64;
        r1[2] = f & MASK_56;
        c >>= 56;

        c += m(x[0], y[3]) + m(x[3], y[0]) + m(x[1], y[2]) + m(x[2], y[1]);
        f = c as u64;
        r1[3] = f & MASK_56;
        c >>= 56;

        c += m(x[0], y[4]) + m(x[4], y[0]) + m(x[3], y[1]) + m(x[1], y[3]) + m(x[2], y[2]);
        f = c as u64;
        r1[4] = f & 0x0000_00ff_ffff_ffff;
        q1[0] = (f >> 24) & 0xffff_ffff;
        c >>= 56;

        c += m(x[4], y[1]) + m(x[1], y[4]) + m(x[2], y[3]) + m(x[3], y[2]);
        f = c as u64;
        q1[0] |= (f << 32) & MASK_56;
        q1[1] = (f >> 24) & 0xffff_ffff;
        c >>= 56;

        c += m(x[4], y[2]) + m(x[2], y[4]) + m(x[3], y[3]);
        f = c as u64;
        q1[1] |= (f << 32) & MASK_56;
        q1[2] = (f >> 24) & 0xffff_ffff;
        c >>= 56;

        c += m(x[4], y[3]) + m(x[3], y[4]);
        f = c as u64;
        q1[2] |= (f << 32) & MASK_56;
        q1[3] = (f >> 24) & 0xffff_ffff;
        c >>= 56;

        c += m(x[4], y[4]);
        f = c as u64;
        q1[3] |= (f << 32) & MASK_56;
        q1[4] = (f >> 24) & 0xffff_ffff;
        c >>= 56;
        q1[4] |= (c as u64) << 32;

        Scalar56::barrett_reduce(&Scalar56(q1), &Scalar56(r1))
    }

    /// Import up to 64 little-endian bytes, reducing mod \\( \ell \\).
    ///
    /// Inputs shorter than 32 bytes are zero-extended and are below
    /// \\( 2^{252} \\), so no reduction is run for them.
    pub(crate) fn from_bytes(input: &[u8]) -> Scalar56 {
        debug_assert!(input.len() <= 64);

        let mut work = [0u8; 64];
        work[..input.len()].copy_from_slice(input);

        #[inline(always)]
        fn load8(input: &[u8]) -> u64 {
            u64::from_le_bytes(input[..8].try_into().unwrap())
        }

        let mut x = [0u64; 8];
        for i in 0..8 {
            x[i] = load8(&work[i * 8..]);
        }

        // r1 = x mod 2^264
        let mut out = [0u64; 5];
        out[0] = x[0] & MASK_56;
        out[1] = ((x[0] >> 56) | (x[1] << 8)) & MASK_56;
        out[2] = ((x[1] >> 48) | (x[2] << 16)) & MASK_56;
        out[3] = ((x[2] >> 40) | (x[3] << 24)) & MASK_56;
        out[4] = ((x[3] >> 32) | (x[4] << 32)) & 0x0000_00ff_ffff_ffff;

        // Under 252 bits, no need to reduce.
        if input.len() < 32 {
            return Scalar56(out);
        }

        // q1 = x >> 248
        let mut q1 = [0u64; 5];
        q1[0] = ((x[3] >> 56) | (x[4] << 8)) & MASK_56;
        q1[1] = ((x[4] >> 48) | (x[5] << 16)) & MASK_56;
        q1[2] = ((x[5] >> 40) | (x[6] << 24)) & MASK_56;
        q1[3] = ((x[6] >> 32) | (x[7] << 32)) & MASK_56;
        q1[4] = x[7] >> 24;

        Scalar56::barrett_reduce(&Scalar56(q1), &Scalar56(out))
    }

    /// Import 32 little-endian bytes without reduction, for clamped
    /// scalars that are already in range.
    pub(crate) fn from_bytes_raw(input: &[u8; 32]) -> Scalar56 {
        #[inline(always)]
        fn load8(input: &[u8]) -> u64 {
            u64::from_le_bytes(input[..8].try_into().unwrap())
        }

        let x0 = load8(&input[0..]);
        let x1 = load8(&input[8..]);
        let x2 = load8(&input[16..]);
        let x3 = load8(&input[24..]);

        Scalar56([
            x0 & MASK_56,
            ((x0 >> 56) | (x1 << 8)) & MASK_56,
            ((x1 >> 48) | (x2 << 16)) & MASK_56,
            ((x2 >> 40) | (x3 << 24)) & MASK_56,
            (x3 >> 32) & 0x0000_0000_ffff_ffff,
        ])
    }

    /// Encode as 32 little-endian bytes.
    pub(crate) fn to_bytes(&self) -> [u8; 32] {
        let s = &self.0;
        let mut out = [0u8; 32];
        out[0..8].copy_from_slice(&(s[0] | (s[1] << 56)).to_le_bytes());
        out[8..16].copy_from_slice(&((s[1] >> 8) | (s[2] << 48)).to_le_bytes());
        out[16..24].copy_from_slice(&((s[2] >> 16) | (s[3] << 40)).to_le_bytes());
        out[24..32].copy_from_slice(&((s[3] >> 24) | (s[4] << 32)).to_le_bytes());
        out
    }

    /// Recode into 64 signed radix-16 digits in \\( \[-8, 8) \\), for
    /// fixed-base multiplication.
    pub(crate) fn as_radix_16(&self) -> [i8; 64] {
        let mut r = [0i8; 64];

        let mut quads = 0;
        for i in 0..5 {
            let mut v = self.0[i];
            let nibbles = if i == 4 { 8 } else { 14 };
            for _ in 0..nibbles {
                r[quads] = (v & 15) as i8;
                quads += 1;
                v >>= 4;
            }
        }

        // Recenter to signed digits.
        let mut carry: i8 = 0;
        for i in 0..63 {
            r[i] += carry;
            r[i + 1] += r[i] >> 4;
            r[i] &= 15;
            carry = r[i] >> 3;
            r[i] -= carry << 4;
        }
        r[63] += carry;

        r
    }

    /// Recode into a sliding-window form with odd digits bounded by
    /// \\( 2^{w-1} \\), one entry per bit position.
    pub(crate) fn non_adjacent_form(&self, w: usize) -> [i8; 256] {
        debug_assert!(w == 5 || w == 7);

        let mut r = [0i8; 256];

        let mut bits = 0;
        for i in 0..4 {
            let mut v = self.0[i];
            for _ in 0..56 {
                r[bits] = (v & 1) as i8;
                bits += 1;
                v >>= 1;
            }
        }
        let mut v = self.0[4];
        for _ in 0..32 {
            r[bits] = (v & 1) as i8;
            bits += 1;
            v >>= 1;
        }

        let m: i8 = ((1 << (w - 1)) - 1) as i8;
        for j in 0..256 {
            if r[j] == 0 {
                continue;
            }
            let mut b = 1;
            while b < (256 - j) && b <= 6 {
                if (r[j] + (r[j + b] << b)) <= m {
                    r[j] += r[j + b] << b;
                    r[j + b] = 0;
                } else if (r[j] - (r[j + b] << b)) >= -m {
                    r[j] -= r[j + b] << b;
                    for k in (j + b)..256 {
                        if r[k] == 0 {
                            r[k] = 1;
                            break;
                        }
                        r[k] = 0;
                    }
                } else if r[j + b] != 0 {
                    break;
                }
                b += 1;
            }
        }

        r
    }

    // Helpers for batch verification; these may be variable-time, and the
    // windowed comparisons look only at limbs `0..=limb_size`.

    /// Compute `a - b` over the first `limb_size + 1` limbs; `a` must be
    /// at least `b` over that window.
    pub(crate) fn sub_vartime(a: &Scalar56, b: &Scalar56, limb_size: usize) -> Scalar56 {
        let mut out = *a;
        let mut carry = 0u64;
        for i in 0..limb_size {
            out.0[i] = a.0[i].wrapping_sub(b.0[i]).wrapping_sub(carry);
            carry = out.0[i] >> 63;
            out.0[i] &= MASK_56;
        }
        out.0[limb_size] = a.0[limb_size]
            .wrapping_sub(b.0[limb_size])
            .wrapping_sub(carry);
        out
    }

    /// Is `a < b`, comparing only limbs `0..=limb_size`?
    pub(crate) fn lt_vartime(a: &Scalar56, b: &Scalar56, limb_size: usize) -> bool {
        for i in (0..=limb_size).rev() {
            if a.0[i] > b.0[i] {
                return false;
            }
            if a.0[i] < b.0[i] {
                return true;
            }
        }
        false
    }

    /// Is `a <= b`, comparing only limbs `0..=limb_size`?
    pub(crate) fn lte_vartime(a: &Scalar56, b: &Scalar56, limb_size: usize) -> bool {
        for i in (0..=limb_size).rev() {
            if a.0[i] > b.0[i] {
                return false;
            }
            if a.0[i] < b.0[i] {
                return true;
            }
        }
        true
    }

    /// Is this scalar zero?
    pub(crate) fn is_zero_vartime(&self) -> bool {
        self.0 == [0, 0, 0, 0, 0]
    }

    /// Is this scalar one?
    pub(crate) fn is_one_vartime(&self) -> bool {
        self.0 == [1, 0, 0, 0, 0]
    }

    /// Does this scalar fit in 128 bits?
    pub(crate) fn is_at_most_128_bits_vartime(&self) -> bool {
        (self.0[4] | self.0[3] | (self.0[2] & 0x00ff_ffff_ffff_0000)) == 0
    }
}
