// -*- mode: rust; -*-
//
// This file is part of ed25519-donna.
// Copyright (c) 2017-2019 isis lovecruft
// See LICENSE for licensing information.
//
// Authors:
// - isis agora lovecruft <isis@patternsinthevoid.net>

//! Batch signature verification.
//!
//! Verifying \\( n \\) signatures individually costs \\( n \\)
//! double-base scalar multiplications.  Batching instead draws a random
//! 128-bit weight \\( r_i \\) per signature and checks the single
//! equation
//! $$
//!     \left( \sum_i r_i s_i \right) B
//!     + \sum_i (r_i k_i) (-A_i)
//!     + \sum_i r_i (-R_i) = O,
//! $$
//! which holds whenever every signature verifies, and fails (except with
//! probability \\( 2^{-128} \\)) if any does not.  The combined system
//! of \\( 2n + 1 \\) scalar/point pairs is evaluated with Bos-Coster
//! multiscalar multiplication, and on rejection the batch falls back to
//! individual verification so callers still learn exactly which
//! signatures were bad.

use alloc::vec;
use alloc::vec::Vec;

use rand_core::{CryptoRng, RngCore};
use sha2::Digest;

use crate::backend::serial::scalar_mul::bos_coster;
use crate::constants;
use crate::edwards::{CompressedEdwardsY, EdwardsPoint};
use crate::errors::{InternalError, SignatureError};
use crate::options::SignatureOptions;
use crate::scalar::Scalar;
use crate::signature::Signature;
use crate::traits::Identity;
use crate::verifying::VerifyingKey;

/// Signatures per round: the combined scalar/point system and its heap
/// are stack-allocated at this size.
pub(crate) const MAX_BATCH_SIZE: usize = 64;

/// Entries in the combined multiscalar system for a full round.
const HEAP_BATCH_SIZE: usize = (MAX_BATCH_SIZE * 2) + 1;

/// Verify a batch of `signatures` on `messages` with their respective
/// `verifying_keys`, using entropy from `csprng`.
///
/// Returns `(all_ok, valid)`, where `valid[i]` reports the verdict for
/// the `i`-th input, and `all_ok` is true iff every signature is valid
/// *and* every algebraic round accepted.  Batches (and tails) of fewer
/// than four signatures are verified individually, where the combined
/// equation would cost more than it saves.
///
/// # Errors
///
/// Fails without verifying anything if the input slices have mismatched
/// lengths, if the dom2 context is overlong, or if the random source
/// cannot produce the requested weights.
pub fn verify_batch<R>(
    csprng: &mut R,
    verifying_keys: &[VerifyingKey],
    messages: &[&[u8]],
    signatures: &[Signature],
    options: &SignatureOptions<'_>,
) -> Result<(bool, Vec<bool>), SignatureError>
where
    R: CryptoRng + RngCore,
{
    let num = verifying_keys.len();
    if num != messages.len() || messages.len() != signatures.len() {
        return Err(InternalError::ArrayLength {
            name_a: "verifying_keys",
            length_a: verifying_keys.len(),
            name_b: "messages",
            length_b: messages.len(),
            name_c: "signatures",
            length_c: signatures.len(),
        }
        .into());
    }
    options.validate_context()?;

    let mut valid = vec![true; num];
    let mut all_ok = true;

    let mut offset = 0;
    let mut remaining = num;
    while remaining > 3 {
        let batch_size = remaining.min(MAX_BATCH_SIZE);
        let keys = &verifying_keys[offset..offset + batch_size];
        let msgs = &messages[offset..offset + batch_size];
        let sigs = &signatures[offset..offset + batch_size];

        let mut scalars = [Scalar::ZERO; HEAP_BATCH_SIZE];
        let mut points = [EdwardsPoint::identity(); HEAP_BATCH_SIZE];

        // Generate r_i (scalars[batch_size+1 ..= 2*batch_size]).
        let mut r_bytes = [0u8; 16 * MAX_BATCH_SIZE];
        csprng
            .try_fill_bytes(&mut r_bytes[..16 * batch_size])
            .map_err(|_| InternalError::RngUnderflow)?;
        for i in 0..batch_size {
            scalars[batch_size + 1 + i] = Scalar::from_bytes(&r_bytes[16 * i..16 * (i + 1)]);
        }

        // Compute scalars[0] = sum(r_i * s_i).
        for i in 0..batch_size {
            // A non-canonical s would be accepted by the combined
            // equation (the import reduces it mod l), so mark it invalid
            // here and let the rest of the batch proceed.
            if !sigs[i].s_is_canonical() {
                all_ok = false;
                valid[offset + i] = false;
            }

            let s = Scalar::from_bytes(sigs[i].s_bytes());
            scalars[i] = s.mul(&scalars[batch_size + 1 + i]);
        }
        for i in 1..batch_size {
            scalars[0] = scalars[0].add(&scalars[i]);
        }

        // Compute scalars[1 ..= batch_size] as r_i * H(dom2 || R_i ||
        // A_i || m_i).
        for i in 0..batch_size {
            let mut h = options.begin_hash_unchecked();
            h.update(sigs[i].r_bytes());
            h.update(keys[i].as_bytes());
            h.update(msgs[i]);
            let k = Scalar::from_bytes(h.finalize().as_slice());
            scalars[i + 1] = k.mul(&scalars[batch_size + 1 + i]);
        }

        // Compute the points: the basepoint, then -A_i, then -R_i.  A
        // signature whose R does not decode forces the fallback path
        // for the whole round.
        points[0] = constants::ED25519_BASEPOINT_POINT;
        for i in 0..batch_size {
            points[i + 1] = keys[i].neg_point;
        }
        let mut ok = true;
        for i in 0..batch_size {
            match CompressedEdwardsY(*sigs[i].r_bytes()).decompress_negative_vartime() {
                Some(p) => points[batch_size + 1 + i] = p,
                None => {
                    ok = false;
                    break;
                }
            }
        }

        if ok {
            let count = (batch_size * 2) + 1;
            let p = bos_coster::multiscalar_mul_vartime(
                &mut scalars[..count],
                &mut points[..count],
            );
            // Under ZIP-215 the per-signature equation only holds up to
            // small-order torsion, so the combined sum does too; clear
            // the torsion before the neutral test.
            let p = if options.zip215 { p.mul_by_cofactor() } else { p };
            ok = p.is_neutral_vartime();
            if !ok {
                all_ok = false;
            }
        }

        // Fallback: something in the round was malformed or the
        // combined equation did not hold, so find out signature by
        // signature.
        if !ok {
            for i in 0..batch_size {
                let sig_ok = keys[i]
                    .verify_with_options(msgs[i], &sigs[i], options)
                    .is_ok();
                valid[offset + i] = sig_ok;
                all_ok &= sig_ok;
            }
        }

        offset += batch_size;
        remaining -= batch_size;
    }

    // Tail too small for Bos-Coster to pay off.
    for i in 0..remaining {
        let sig_ok = verifying_keys[offset + i]
            .verify_with_options(messages[offset + i], &signatures[offset + i], options)
            .is_ok();
        valid[offset + i] = sig_ok;
        all_ok &= sig_ok;
    }

    Ok((all_ok, valid))
}

#[cfg(test)]
pub(crate) mod test {
    use alloc::vec::Vec;

    use sha2::{Digest, Sha512};

    use super::*;
    use crate::signing::SigningKey;

    /// ISAAC+-style deterministic byte generator, matching the stream
    /// the reference batch oracle was computed with: zero state, mixed
    /// twice before the first read.
    pub(crate) struct IsaacpRng {
        state: [u32; 256],
        buffer: [u8; 1024],
        a: u32,
        b: u32,
        c: u32,
        left: usize,
        initialized: bool,
    }

    impl IsaacpRng {
        pub(crate) fn new() -> IsaacpRng {
            IsaacpRng {
                state: [0u32; 256],
                buffer: [0u8; 1024],
                a: 0,
                b: 0,
                c: 0,
                left: 0,
                initialized: false,
            }
        }

        fn mix(&mut self) {
            let mut a = self.a;
            let mut b = self.b;
            let c = self.c.wrapping_add(1);
            b = b.wrapping_add(c);

            for i in (0..256).step_by(4) {
                for offset in 0..4 {
                    // The rotation parameter uses `a` as of entering
                    // this step.
                    let mixv = match offset {
                        0 => a.rotate_left(13),
                        1 => a.rotate_right(6),
                        2 => a.rotate_left(2),
                        _ => a.rotate_right(16),
                    };
                    let x = self.state[i + offset];
                    a = (a ^ mixv).wrapping_add(self.state[(i + offset + 128) & 0xff]);
                    let y = (a ^ b).wrapping_add(self.state[(x >> 2) as usize & 0xff]);
                    self.state[i + offset] = y;
                    b = (x.wrapping_add(a)) ^ self.state[(y >> 10) as usize & 0xff];
                    self.buffer[(i + offset) * 4..(i + offset) * 4 + 4]
                        .copy_from_slice(&b.to_le_bytes());
                }
            }

            self.a = a;
            self.b = b;
            self.c = c;
            self.left = 1024;
        }

        pub(crate) fn read(&mut self, out: &mut [u8]) {
            if !self.initialized {
                self.mix();
                self.mix();
                self.initialized = true;
            }

            let mut idx = 0;
            let mut remaining = out.len();
            while remaining > 0 {
                let use_n = self.left.min(remaining);
                let b_off = self.buffer.len() - self.left;
                out[idx..idx + use_n].copy_from_slice(&self.buffer[b_off..b_off + use_n]);
                self.left -= use_n;
                idx += use_n;
                remaining -= use_n;
                if self.left == 0 {
                    self.mix();
                }
            }
        }
    }

    impl RngCore for IsaacpRng {
        fn next_u32(&mut self) -> u32 {
            rand_core::impls::next_u32_via_fill(self)
        }

        fn next_u64(&mut self) -> u64 {
            rand_core::impls::next_u64_via_fill(self)
        }

        fn fill_bytes(&mut self, dest: &mut [u8]) {
            self.read(dest);
        }

        fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand_core::Error> {
            self.read(dest);
            Ok(())
        }
    }

    impl CryptoRng for IsaacpRng {}

    /// Build keys, messages, and signatures from the deterministic
    /// generator, consuming exactly the byte stream of the reference
    /// test setup.
    pub(crate) fn batch_fixture(
        rng: &mut IsaacpRng,
        n: usize,
    ) -> (Vec<VerifyingKey>, Vec<Vec<u8>>, Vec<Signature>) {
        let mut signing_keys = Vec::with_capacity(n);
        for _ in 0..n {
            let mut seed = [0u8; 32];
            rng.read(&mut seed);
            signing_keys.push(SigningKey::from_bytes(&seed));
        }

        let mut messages = Vec::with_capacity(n);
        for i in 0..n {
            // Over-generate so the stream position matches the
            // reference, then truncate.
            let mut m = [0u8; 128];
            rng.read(&mut m);
            let len = (i & 127) + 1;
            messages.push(m[..len].to_vec());
        }

        let signatures: Vec<Signature> = signing_keys
            .iter()
            .zip(messages.iter())
            .map(|(sk, m)| sk.sign(m))
            .collect();
        let keys = signing_keys.iter().map(|sk| sk.verifying_key()).collect();

        (keys, messages, signatures)
    }

    /// The y coordinate of the final multiscalar point for the
    /// reference generator, from the 'amd64-51-30k' implementation.
    const BATCH_Y: [u8; 32] = [
        0x51, 0xe7, 0x68, 0xe0, 0xf7, 0xa1, 0x88, 0x45, 0xde, 0xa1, 0xcb, 0xd9, 0x37, 0xd4, 0x78,
        0x53, 0x1b, 0x95, 0xdb, 0xbe, 0x66, 0x59, 0x29, 0x3b, 0x94, 0x51, 0x2f, 0xbc, 0x0d, 0x66,
        0xba, 0x3f,
    ];

    #[test]
    fn multiscalar_final_point_matches_reference() {
        let mut rng = IsaacpRng::new();
        let (keys, messages, signatures) = batch_fixture(&mut rng, MAX_BATCH_SIZE);

        // Reproduce one round's combined system by hand so the final
        // point is observable before the neutral test collapses it.
        let batch_size = MAX_BATCH_SIZE;
        let mut scalars = [Scalar::ZERO; HEAP_BATCH_SIZE];
        let mut points = [EdwardsPoint::identity(); HEAP_BATCH_SIZE];

        let mut r_bytes = [0u8; 16 * MAX_BATCH_SIZE];
        rng.read(&mut r_bytes);
        for i in 0..batch_size {
            scalars[batch_size + 1 + i] = Scalar::from_bytes(&r_bytes[16 * i..16 * (i + 1)]);
        }
        for i in 0..batch_size {
            assert!(signatures[i].s_is_canonical());
            let s = Scalar::from_bytes(signatures[i].s_bytes());
            scalars[i] = s.mul(&scalars[batch_size + 1 + i]);
        }
        for i in 1..batch_size {
            scalars[0] = scalars[0].add(&scalars[i]);
        }
        for i in 0..batch_size {
            let mut h = Sha512::new();
            h.update(signatures[i].r_bytes());
            h.update(keys[i].as_bytes());
            h.update(&messages[i]);
            let k = Scalar::from_bytes(h.finalize().as_slice());
            scalars[i + 1] = k.mul(&scalars[batch_size + 1 + i]);
        }
        points[0] = constants::ED25519_BASEPOINT_POINT;
        for i in 0..batch_size {
            points[i + 1] = keys[i].neg_point;
            points[batch_size + 1 + i] = CompressedEdwardsY(*signatures[i].r_bytes())
                .decompress_negative_vartime()
                .unwrap();
        }

        let p = bos_coster::multiscalar_mul_vartime(&mut scalars, &mut points);
        assert!(p.is_neutral_vartime());
        assert_eq!(p.Y.to_bytes(), BATCH_Y);
    }

    #[test]
    fn full_batch_verifies_with_reference_stream() {
        let mut rng = IsaacpRng::new();
        let (keys, messages, signatures) = batch_fixture(&mut rng, MAX_BATCH_SIZE);
        let messages: Vec<&[u8]> = messages.iter().map(|m| m.as_slice()).collect();

        let (all_ok, valid) = verify_batch(
            &mut rng,
            &keys,
            &messages,
            &signatures,
            &SignatureOptions::ED25519,
        )
        .unwrap();
        assert!(all_ok);
        assert!(valid.iter().all(|&v| v));
    }
}
