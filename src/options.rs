// -*- mode: rust; -*-
//
// This file is part of ed25519-donna.
// Copyright (c) 2017-2019 isis lovecruft
// See LICENSE for licensing information.
//
// Authors:
// - isis agora lovecruft <isis@patternsinthevoid.net>

//! Signing and verification options: the RFC 8032 dom2 domain
//! separation (Ed25519ctx / Ed25519ph) and the choice of verification
//! semantics (strict or ZIP-215).

use sha2::{Digest, Sha512};

use crate::errors::{InternalError, SignatureError};

/// The dom2 prefix magic, prepended whenever domain separation is in
/// effect.
const DOM2_PREFIX: &[u8] = b"SigEd25519 no Ed25519 collisions";

/// Options accepted by the signing and verification entry points.
///
/// The default options select pure Ed25519 with strict (RFC
/// 8032-flavoured) verification.
///
/// Note that per RFC 8032, an *empty* context together with an unhashed
/// message selects pure Ed25519, not Ed25519ctx: domain separation with
/// a zero-length context is indistinguishable from no domain separation
/// at all, so this library folds the two cases together rather than
/// emitting a dom2 prefix that the pure scheme would never produce.
#[derive(Clone, Copy, Debug, Default)]
pub struct SignatureOptions<'a> {
    /// The dom2 context, at most 255 bytes.  `None` (or `Some` of an
    /// empty slice, when `prehashed` is unset) selects pure Ed25519.
    pub context: Option<&'a [u8]>,

    /// If set, the message is a 64-byte SHA-512 digest and Ed25519ph
    /// semantics apply.
    pub prehashed: bool,

    /// If set, verification uses the ZIP-215 acceptance criteria:
    /// non-canonical point encodings and small-order public keys are
    /// admitted, and the verification equation is checked up to
    /// small-order torsion.  Ignored when signing.
    pub zip215: bool,
}

impl<'a> SignatureOptions<'a> {
    /// Pure Ed25519 with strict verification.
    pub const ED25519: SignatureOptions<'static> = SignatureOptions {
        context: None,
        prehashed: false,
        zip215: false,
    };

    /// Pure Ed25519 with ZIP-215 verification.
    pub const ZIP215: SignatureOptions<'static> = SignatureOptions {
        context: None,
        prehashed: false,
        zip215: true,
    };

    /// Ed25519ctx with the given context.
    pub fn ed25519ctx(context: &'a [u8]) -> SignatureOptions<'a> {
        SignatureOptions {
            context: Some(context),
            prehashed: false,
            zip215: false,
        }
    }

    /// Ed25519ph with an optional context.
    pub fn ed25519ph(context: Option<&'a [u8]>) -> SignatureOptions<'a> {
        SignatureOptions {
            context,
            prehashed: true,
            zip215: false,
        }
    }

    /// Check that the dom2 context fits in its one-byte length field.
    pub(crate) fn validate_context(&self) -> Result<(), SignatureError> {
        let context = self.context.unwrap_or(b"");
        if context.len() > 255 {
            return Err(InternalError::ContextLength {
                length: context.len(),
            }
            .into());
        }
        Ok(())
    }

    /// Return a SHA-512 instance primed with the dom2 prefix if one
    /// applies, without validating anything.
    ///
    /// Batch verification uses this directly: a wrong-length prehash in
    /// the middle of a batch must surface as that signature failing, not
    /// as an error aborting the whole call.
    pub(crate) fn begin_hash_unchecked(&self) -> Sha512 {
        let context = self.context.unwrap_or(b"");
        let mut h = Sha512::new();
        if self.prehashed || !context.is_empty() {
            h.update(DOM2_PREFIX);
            h.update([u8::from(self.prehashed)]);
            h.update([context.len() as u8]);
            h.update(context);
        }
        h
    }

    /// Validate the options against a message, and return a SHA-512
    /// instance primed with the dom2 prefix if one applies.
    ///
    /// This front-loads every option error, so callers past this point
    /// can only fail the verification equation itself.
    pub(crate) fn begin_hash(&self, message: &[u8]) -> Result<Sha512, SignatureError> {
        self.validate_context()?;
        if self.prehashed && message.len() != 64 {
            return Err(InternalError::PrehashLength {
                length: message.len(),
            }
            .into());
        }

        Ok(self.begin_hash_unchecked())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn empty_context_is_pure_ed25519() {
        // No context and an empty context must hash identically.
        let plain = SignatureOptions::ED25519
            .begin_hash(b"msg")
            .unwrap()
            .finalize();
        let empty_ctx = SignatureOptions::ed25519ctx(b"")
            .begin_hash(b"msg")
            .unwrap()
            .finalize();
        assert_eq!(plain.as_slice(), empty_ctx.as_slice());

        // A nonempty context must not.
        let ctx = SignatureOptions::ed25519ctx(b"x")
            .begin_hash(b"msg")
            .unwrap()
            .finalize();
        assert_ne!(plain.as_slice(), ctx.as_slice());
    }

    #[test]
    fn prehashed_demands_a_digest() {
        assert!(SignatureOptions::ed25519ph(None)
            .begin_hash(&[0u8; 64])
            .is_ok());
        assert!(SignatureOptions::ed25519ph(None)
            .begin_hash(b"short")
            .is_err());
    }

    #[test]
    fn overlong_context_is_rejected() {
        let ctx = [0u8; 256];
        assert!(SignatureOptions::ed25519ctx(&ctx).begin_hash(b"m").is_err());
        let ctx = [0u8; 255];
        assert!(SignatureOptions::ed25519ctx(&ctx).begin_hash(b"m").is_ok());
    }

    #[test]
    fn ph_uses_dom2_even_with_empty_context() {
        let digest = [0u8; 64];
        let ph = SignatureOptions::ed25519ph(None)
            .begin_hash(&digest)
            .unwrap()
            .finalize();
        let pure = SignatureOptions::ED25519
            .begin_hash(&digest)
            .unwrap()
            .finalize();
        assert_ne!(ph.as_slice(), pure.as_slice());
    }
}
