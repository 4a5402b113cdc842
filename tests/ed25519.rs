// -*- mode: rust; -*-
//
// This file is part of ed25519-donna.
// Copyright (c) 2017-2019 isis lovecruft
// See LICENSE for licensing information.
//
// Authors:
// - isis agora lovecruft <isis@patternsinthevoid.net>

//! Integration tests for ed25519-donna.

use ed25519_donna::*;

use hex_literal::hex;
use rand_core::{CryptoRng, RngCore};

/// A tiny deterministic generator (xorshift128+) for tests whose
/// outcomes must not depend on the byte stream, just on it existing.
struct TestRng {
    s0: u64,
    s1: u64,
}

impl TestRng {
    fn seeded(seed: u64) -> TestRng {
        TestRng {
            s0: seed | 1,
            s1: 0x9e37_79b9_7f4a_7c15,
        }
    }
}

impl RngCore for TestRng {
    fn next_u64(&mut self) -> u64 {
        let mut x = self.s0;
        let y = self.s1;
        self.s0 = y;
        x ^= x << 23;
        self.s1 = x ^ y ^ (x >> 17) ^ (y >> 26);
        self.s1.wrapping_add(y)
    }

    fn next_u32(&mut self) -> u32 {
        self.next_u64() as u32
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        rand_core::impls::fill_bytes_via_next(self, dest)
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand_core::Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}

impl CryptoRng for TestRng {}

/// A generator that runs dry after a budget, to exercise rng error
/// propagation.
struct FailingRng {
    budget: usize,
}

impl RngCore for FailingRng {
    fn next_u32(&mut self) -> u32 {
        0
    }

    fn next_u64(&mut self) -> u64 {
        0
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        dest.fill(0);
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand_core::Error> {
        if dest.len() > self.budget {
            return Err(rand_core::Error::new("rng budget exhausted"));
        }
        self.budget -= dest.len();
        dest.fill(0x5a);
        Ok(())
    }
}

impl CryptoRng for FailingRng {}

mod vectors {
    use super::*;

    struct Rfc8032Vector {
        seed: [u8; 32],
        public: [u8; 32],
        message: &'static [u8],
        signature: [u8; 64],
    }

    // From https://tools.ietf.org/html/rfc8032#section-7.1
    fn rfc8032_vectors() -> [Rfc8032Vector; 3] {
        [
            Rfc8032Vector {
                seed: hex!("9d61b19deffd5a60ba844af492ec2cc44449c5697b326919703bac031cae7f60"),
                public: hex!("d75a980182b10ab7d54bfed3c964073a0ee172f3daa62325af021a68f707511a"),
                message: b"",
                signature: hex!(
                    "e5564300c360ac729086e2cc806e828a84877f1eb8e5d974d873e06522490155"
                    "5fb8821590a33bacc61e39701cf9b46bd25bf5f0595bbe24655141438e7a100b"
                ),
            },
            Rfc8032Vector {
                seed: hex!("4ccd089b28ff96da9db6c346ec114e0f5b8a319f35aba624da8cf6ed4fb8a6fb"),
                public: hex!("3d4017c3e843895a92b70aa74d1b7ebc9c982ccf2ec4968cc0cd55f12af4660c"),
                message: &[0x72],
                signature: hex!(
                    "92a009a9f0d4cab8720e820b5f642540a2b27b5416503f8fb3762223ebdb69da"
                    "085ac1e43e15996e458f3613d0f11d8c387b2eaeb4302aeeb00d291612bb0c00"
                ),
            },
            Rfc8032Vector {
                seed: hex!("c5aa8df43f9f837bedb7442f31dcb7b166d38535076f094b85ce3a2e0b4458f7"),
                public: hex!("fc51cd8e6218a1a38da47ed00230f0580816ed13ba3303ac5deb911548908025"),
                message: &[0xaf, 0x82],
                signature: hex!(
                    "6291d657deec24024827e69c3abe01a30ce548a284743a445e3680d7db5ac3ac"
                    "18ff9b538d16f290ae67f760984dc6594a7c15e9716ed28dc027beceea1ec40a"
                ),
            },
        ]
    }

    #[test]
    fn rfc8032_sign_and_verify() {
        for (i, v) in rfc8032_vectors().iter().enumerate() {
            let sk = SigningKey::from_bytes(&v.seed);
            assert_eq!(
                sk.verifying_key().to_bytes(),
                v.public,
                "public key mismatch in vector {}",
                i
            );

            let sig = sk.sign(v.message);
            assert_eq!(sig.to_bytes(), v.signature, "signature mismatch in vector {}", i);

            let vk = VerifyingKey::from_bytes(&v.public).unwrap();
            assert!(vk.verify(v.message, &sig).is_ok());
            assert!(vk
                .verify_with_options(v.message, &sig, &SignatureOptions::ZIP215)
                .is_ok());
        }
    }

    // From https://tools.ietf.org/html/rfc8032#section-7.3
    #[test]
    fn rfc8032_ed25519ph() {
        let seed = hex!("833fe62409237b9d62ec77587520911e9a759cec1d19755b7da901b96dca3d42");
        let public = hex!("ec172b93ad5e563bf4932c70e1245034c35467ef2efd4d64ebf819683467e2bf");
        let expected_sig = hex!(
            "98a70222f0b8121aa9d30f813d683f809e462b469c7ff87639499bb94e6dae41"
            "31f85042463c2a355a2003d062adf5aaa10b8c61e636062aaad11c2a26083406"
        );
        // SHA-512("abc")
        let digest = hex!(
            "ddaf35a193617abacc417349ae20413112e6fa4e89a97ea20a9eeee64b55d39a"
            "2192992a274fc1a836ba3c23a3feebbd454d4423643ce80e2a9ac94fa54ca49f"
        );

        let sk = SigningKey::from_bytes(&seed);
        assert_eq!(sk.verifying_key().to_bytes(), public);

        let opts = SignatureOptions::ed25519ph(None);
        let sig = sk.sign_with_options(&digest, &opts).unwrap();
        assert_eq!(sig.to_bytes(), expected_sig);
        assert!(sk
            .verifying_key()
            .verify_with_options(&digest, &sig, &opts)
            .is_ok());

        // The same bytes as a *pure* signature must not verify.
        assert!(sk.verifying_key().verify(&digest, &sig).is_err());
    }

    // From https://tools.ietf.org/html/rfc8032#section-7.2
    #[test]
    fn rfc8032_ed25519ctx() {
        let seed = hex!("0305334e381af78f141cb666f6199f57bc3495335a256a95bd2a55bf546663f6");
        let public = hex!("dfc9425e4f968f7f0c29f0259cf5f9aed6851c2bb4ad8bfb860cfee0ab248292");
        let message = hex!("f726936d19c800494e3fdaff20b276a8");
        let context = b"foo";
        let expected_sig = hex!(
            "55a4cc2f70a54e04288c5f4cd1e45a7bb520b36292911876cada7323198dd87a"
            "8b36950b95130022907a7fb7c4e9b2d5f6cca685a587b4b21f4b888e4e7edb0d"
        );

        let sk = SigningKey::from_bytes(&seed);
        assert_eq!(sk.verifying_key().to_bytes(), public);

        let opts = SignatureOptions::ed25519ctx(context);
        let sig = sk.sign_with_options(&message, &opts).unwrap();
        assert_eq!(sig.to_bytes(), expected_sig);
        assert!(sk
            .verifying_key()
            .verify_with_options(&message, &sig, &opts)
            .is_ok());

        // A different context must not verify.
        let other = SignatureOptions::ed25519ctx(b"bar");
        assert!(sk
            .verifying_key()
            .verify_with_options(&message, &sig, &other)
            .is_err());
    }
}

mod single {
    use super::*;

    #[test]
    fn sign_verify_round_trip() {
        let mut csprng = TestRng::seeded(1);
        let sk = SigningKey::generate(&mut csprng).unwrap();
        let good: &[u8] = b"test message";
        let bad: &[u8] = b"wrong message";

        let sig = sk.sign(good);
        assert!(sk.verifying_key().verify(good, &sig).is_ok());
        assert!(sk.verifying_key().verify(bad, &sig).is_err());

        // The keypair encoding survives a round trip and still signs.
        let sk2 = SigningKey::from_keypair_bytes(&sk.to_keypair_bytes()).unwrap();
        assert_eq!(sk2.sign(good).to_bytes(), sig.to_bytes());
    }

    #[test]
    fn generate_propagates_rng_failure() {
        let mut dry = FailingRng { budget: 0 };
        assert!(SigningKey::generate(&mut dry).is_err());
    }

    /// Add l to s, producing the malleated but still sub-2^253 twin of a
    /// signature.
    fn malleate(sig: &Signature) -> Signature {
        const ELL: [u8; 32] = [
            0xed, 0xd3, 0xf5, 0x5c, 0x1a, 0x63, 0x12, 0x58, 0xd6, 0x9c, 0xf7, 0xa2, 0xde, 0xf9,
            0xde, 0x14, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
            0x00, 0x00, 0x00, 0x10,
        ];
        let mut bytes = sig.to_bytes();
        let mut carry = 0u16;
        for i in 0..32 {
            let v = bytes[32 + i] as u16 + ELL[i] as u16 + carry;
            bytes[32 + i] = v as u8;
            carry = v >> 8;
        }
        assert_eq!(carry, 0);
        Signature::from_bytes(&bytes).expect("s + l stays below 2^253")
    }

    #[test]
    fn malleated_scalar_is_rejected() {
        let sk = SigningKey::from_bytes(&[9u8; 32]);
        let msg: &[u8] = b"malleability";
        let sig = sk.sign(msg);
        assert!(sk.verifying_key().verify(msg, &sig).is_ok());

        let mall = malleate(&sig);
        assert!(sk.verifying_key().verify(msg, &mall).is_err());
        // ZIP-215 also insists on a canonical s.
        assert!(sk
            .verifying_key()
            .verify_with_options(msg, &mall, &SignatureOptions::ZIP215)
            .is_err());
    }

    #[test]
    fn strict_accept_implies_zip215_accept() {
        let mut csprng = TestRng::seeded(7);
        for i in 0..16u8 {
            let sk = SigningKey::generate(&mut csprng).unwrap();
            let msg = [i; 11];
            let sig = sk.sign(&msg);
            let vk = sk.verifying_key();
            assert!(vk.verify(&msg, &sig).is_ok());
            assert!(vk
                .verify_with_options(&msg, &sig, &SignatureOptions::ZIP215)
                .is_ok());
        }
    }

    #[test]
    fn zip215_low_order_public_key() {
        // y = p - 1 with the sign bit clear: the order-2 point (0, -1).
        let pk_bytes =
            hex!("ecffffffffffffffffffffffffffffffffffffffffffffffffffffffffffff7f");
        let vk = VerifyingKey::from_bytes(&pk_bytes).unwrap();

        // R the same low-order point, s = 0: under ZIP-215 the equation
        // holds up to torsion for any message.
        let mut sig_bytes = [0u8; 64];
        sig_bytes[..32].copy_from_slice(&pk_bytes);
        let sig = Signature::from_bytes(&sig_bytes).unwrap();

        assert!(vk.verify(b"Zcash", &sig).is_err());
        assert!(vk
            .verify_with_options(b"Zcash", &sig, &SignatureOptions::ZIP215)
            .is_ok());
    }

    #[test]
    fn non_canonical_r_strict_vs_zip215() {
        // R encoded as p + 1 (a non-canonical encoding of y = 1, the
        // identity), with A the identity and s = 0.  ZIP-215 reduces
        // the encoding and accepts; strict mode rejects twice over, for
        // the small-order key and for the byte mismatch against the
        // re-compressed (canonical) R'.
        let r_non_canonical =
            hex!("eeffffffffffffffffffffffffffffffffffffffffffffffffffffffffffff7f");
        let mut identity = [0u8; 32];
        identity[0] = 1;
        let vk = VerifyingKey::from_bytes(&identity).unwrap();

        let mut sig_bytes = [0u8; 64];
        sig_bytes[..32].copy_from_slice(&r_non_canonical);
        let sig = Signature::from_bytes(&sig_bytes).unwrap();

        assert!(vk.verify(b"msg", &sig).is_err());
        assert!(vk
            .verify_with_options(b"msg", &sig, &SignatureOptions::ZIP215)
            .is_ok());
    }

    #[test]
    fn prehash_length_is_enforced() {
        let sk = SigningKey::from_bytes(&[1u8; 32]);
        let opts = SignatureOptions::ed25519ph(None);
        assert!(sk.sign_with_options(b"not a digest", &opts).is_err());
        let digest = [0u8; 64];
        let sig = sk.sign_with_options(&digest, &opts).unwrap();
        assert!(sk
            .verifying_key()
            .verify_with_options(b"not a digest", &sig, &opts)
            .is_err());
    }

    #[test]
    fn overlong_context_is_an_error() {
        let sk = SigningKey::from_bytes(&[2u8; 32]);
        let ctx = [0u8; 256];
        let opts = SignatureOptions::ed25519ctx(&ctx);
        assert!(sk.sign_with_options(b"m", &opts).is_err());
    }

    #[test]
    fn truncated_material_fails_to_parse() {
        assert!(VerifyingKey::try_from(&b"truncated pk"[..]).is_err());
        assert!(Signature::try_from(&b"truncated sig"[..]).is_err());
    }
}

mod batch {
    use super::*;

    fn make_batch(
        rng: &mut TestRng,
        n: usize,
        options: &SignatureOptions<'_>,
    ) -> (Vec<VerifyingKey>, Vec<Vec<u8>>, Vec<Signature>) {
        let mut keys = Vec::with_capacity(n);
        let mut msgs = Vec::with_capacity(n);
        let mut sigs = Vec::with_capacity(n);
        for i in 0..n {
            let sk = SigningKey::generate(rng).unwrap();
            let mut msg = vec![0u8; (i % 127) + 1];
            rng.fill_bytes(&mut msg);
            let msg = if options.prehashed {
                use sha2::{Digest, Sha512};
                Sha512::digest(&msg).to_vec()
            } else {
                msg
            };
            sigs.push(sk.sign_with_options(&msg, options).unwrap());
            keys.push(sk.verifying_key());
            msgs.push(msg);
        }
        (keys, msgs, sigs)
    }

    fn run(
        rng: &mut TestRng,
        keys: &[VerifyingKey],
        msgs: &[Vec<u8>],
        sigs: &[Signature],
        options: &SignatureOptions<'_>,
    ) -> (bool, Vec<bool>) {
        let msgs: Vec<&[u8]> = msgs.iter().map(|m| m.as_slice()).collect();
        verify_batch(rng, keys, &msgs, sigs, options).unwrap()
    }

    #[test]
    fn sizes_around_the_round_boundaries() {
        let mut rng = TestRng::seeded(3);
        for n in [0usize, 1, 2, 3, 4, 5, 38, 63, 64, 65, 96, 129] {
            let (keys, msgs, sigs) = make_batch(&mut rng, n, &SignatureOptions::ED25519);
            let (all_ok, valid) = run(&mut rng, &keys, &msgs, &sigs, &SignatureOptions::ED25519);
            assert!(all_ok, "batch of size {} rejected", n);
            assert_eq!(valid.len(), n);
            assert!(valid.iter().all(|&v| v));
        }
    }

    #[test]
    fn wrong_message_flags_only_that_index() {
        let mut rng = TestRng::seeded(4);
        let (keys, mut msgs, sigs) = make_batch(&mut rng, 63, &SignatureOptions::ED25519);
        msgs[0] = msgs[1].clone();

        let (all_ok, valid) = run(&mut rng, &keys, &msgs, &sigs, &SignatureOptions::ED25519);
        assert!(!all_ok);
        assert!(!valid[0]);
        assert!(valid[1..].iter().all(|&v| v));
    }

    #[test]
    fn wrong_key_flags_only_that_index() {
        let mut rng = TestRng::seeded(5);
        let (mut keys, msgs, sigs) = make_batch(&mut rng, 38, &SignatureOptions::ED25519);
        keys[0] = keys[1];

        let (all_ok, valid) = run(&mut rng, &keys, &msgs, &sigs, &SignatureOptions::ED25519);
        assert!(!all_ok);
        assert!(!valid[0]);
        assert!(valid[1..].iter().all(|&v| v));
    }

    #[test]
    fn wrong_signature_flags_only_that_index() {
        let mut rng = TestRng::seeded(6);
        let (keys, msgs, mut sigs) = make_batch(&mut rng, 12, &SignatureOptions::ED25519);
        sigs[0] = sigs[1];

        let (all_ok, valid) = run(&mut rng, &keys, &msgs, &sigs, &SignatureOptions::ED25519);
        assert!(!all_ok);
        assert!(!valid[0]);
        assert!(valid[1..].iter().all(|&v| v));
    }

    #[test]
    fn undecodable_r_falls_back_per_signature() {
        let mut rng = TestRng::seeded(8);
        let (keys, msgs, mut sigs) = make_batch(&mut rng, 24, &SignatureOptions::ED25519);
        // y = 2 is not on the curve, so this R cannot decompress and the
        // round must fall back to individual verification.
        let mut bad = [0u8; 64];
        bad[0] = 2;
        sigs[0] = Signature::from_bytes(&bad).unwrap();

        let (all_ok, valid) = run(&mut rng, &keys, &msgs, &sigs, &SignatureOptions::ED25519);
        assert!(!all_ok);
        assert!(!valid[0]);
        assert!(valid[1..].iter().all(|&v| v));
    }

    #[test]
    fn ed25519ctx_and_ph_batches() {
        let mut rng = TestRng::seeded(9);

        let ctx_opts = SignatureOptions::ed25519ctx(b"test ed25519ctx batch verify");
        let (keys, msgs, sigs) = make_batch(&mut rng, 16, &ctx_opts);
        let (all_ok, _) = run(&mut rng, &keys, &msgs, &sigs, &ctx_opts);
        assert!(all_ok);
        // Verifying the same batch with pure options must fail.
        let (all_ok, valid) = run(&mut rng, &keys, &msgs, &sigs, &SignatureOptions::ED25519);
        assert!(!all_ok);
        assert!(valid.iter().all(|&v| !v));

        let ph_opts = SignatureOptions::ed25519ph(Some(b"test ed25519ph batch verify"));
        let (keys, msgs, sigs) = make_batch(&mut rng, 16, &ph_opts);
        let (all_ok, _) = run(&mut rng, &keys, &msgs, &sigs, &ph_opts);
        assert!(all_ok);
    }

    #[test]
    fn zip215_batch_accepts_low_order_key() {
        let pk_bytes =
            hex_literal::hex!("ecffffffffffffffffffffffffffffffffffffffffffffffffffffffffffff7f");
        let vk = VerifyingKey::from_bytes(&pk_bytes).unwrap();
        let mut sig_bytes = [0u8; 64];
        sig_bytes[..32].copy_from_slice(&pk_bytes);
        let sig = Signature::from_bytes(&sig_bytes).unwrap();

        let n = 32;
        let keys = vec![vk; n];
        let msgs = vec![b"Zcash".to_vec(); n];
        let sigs = vec![sig; n];

        let mut rng = TestRng::seeded(10);
        let (all_ok, valid) = run(&mut rng, &keys, &msgs, &sigs, &SignatureOptions::ZIP215);
        assert!(all_ok);
        assert!(valid.iter().all(|&v| v));

        let (all_ok, valid) = run(&mut rng, &keys, &msgs, &sigs, &SignatureOptions::ED25519);
        assert!(!all_ok);
        assert!(valid.iter().all(|&v| !v));
    }

    #[test]
    fn malleated_scalar_is_flagged_without_aborting() {
        let mut rng = TestRng::seeded(11);
        let (keys, msgs, mut sigs) = make_batch(&mut rng, 8, &SignatureOptions::ED25519);

        // s += l on index 0: the combined equation would accept the
        // reduced scalar, so the batch must pre-mark it invalid.
        let mut bytes = sigs[0].to_bytes();
        let ell: [u8; 32] = [
            0xed, 0xd3, 0xf5, 0x5c, 0x1a, 0x63, 0x12, 0x58, 0xd6, 0x9c, 0xf7, 0xa2, 0xde, 0xf9,
            0xde, 0x14, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
            0x00, 0x00, 0x00, 0x10,
        ];
        let mut carry = 0u16;
        for i in 0..32 {
            let v = bytes[32 + i] as u16 + ell[i] as u16 + carry;
            bytes[32 + i] = v as u8;
            carry = v >> 8;
        }
        sigs[0] = Signature::from_bytes(&bytes).unwrap();

        let (all_ok, valid) = run(&mut rng, &keys, &msgs, &sigs, &SignatureOptions::ED25519);
        assert!(!all_ok);
        assert!(!valid[0]);
        assert!(valid[1..].iter().all(|&v| v));
    }

    #[test]
    fn mismatched_lengths_error() {
        let mut rng = TestRng::seeded(12);
        let (keys, msgs, sigs) = make_batch(&mut rng, 4, &SignatureOptions::ED25519);
        let msg_slices: Vec<&[u8]> = msgs.iter().map(|m| m.as_slice()).collect();
        assert!(verify_batch(
            &mut rng,
            &keys[..3],
            &msg_slices,
            &sigs,
            &SignatureOptions::ED25519
        )
        .is_err());
    }

    #[test]
    fn rng_failure_is_an_error() {
        let mut rng = TestRng::seeded(13);
        let (keys, msgs, sigs) = make_batch(&mut rng, 8, &SignatureOptions::ED25519);
        let msg_slices: Vec<&[u8]> = msgs.iter().map(|m| m.as_slice()).collect();

        let mut dry = FailingRng { budget: 64 };
        assert!(verify_batch(
            &mut dry,
            &keys,
            &msg_slices,
            &sigs,
            &SignatureOptions::ED25519
        )
        .is_err());

        // A small batch never touches the rng at all.
        let mut dry = FailingRng { budget: 0 };
        let (all_ok, _) = verify_batch(
            &mut dry,
            &keys[..3],
            &msg_slices[..3],
            &sigs[..3],
            &SignatureOptions::ED25519,
        )
        .unwrap();
        assert!(all_ok);
    }
}
