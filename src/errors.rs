// -*- mode: rust; -*-
//
// This file is part of ed25519-donna.
// Copyright (c) 2017-2019 isis lovecruft
// See LICENSE for licensing information.
//
// Authors:
// - isis agora lovecruft <isis@patternsinthevoid.net>

//! Errors which may occur when parsing keys and/or signatures to or from
//! wire formats, or while signing and verifying.

use core::fmt;
use core::fmt::Display;

/// Internal errors.  Most application-level developers will likely not
/// need to pay any attention to these.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub(crate) enum InternalError {
    PointDecompression,
    ScalarFormat,
    /// An error in the length of bytes handed to a constructor.
    ///
    /// To use this, pass a string specifying the `name` of the type
    /// which is returning the error, and the `length` in bytes which its
    /// constructor expects.
    BytesLength {
        name: &'static str,
        length: usize,
    },
    /// The lengths of the input slices to batch verification differ.
    ArrayLength {
        name_a: &'static str,
        length_a: usize,
        name_b: &'static str,
        length_b: usize,
        name_c: &'static str,
        length_c: usize,
    },
    /// A dom2 context was longer than 255 bytes.
    ContextLength {
        length: usize,
    },
    /// An Ed25519ph message was not a 64-byte SHA-512 digest.
    PrehashLength {
        length: usize,
    },
    /// The random source could not produce the requested bytes.
    RngUnderflow,
    /// The public half of a keypair was inconsistent with the secret
    /// half.
    MismatchedKeypair,
    /// The verification equation wasn't satisfied.
    Verify,
}

impl Display for InternalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            InternalError::PointDecompression => write!(f, "Cannot decompress Edwards point"),
            InternalError::ScalarFormat => write!(f, "Cannot use scalar with high-bit set"),
            InternalError::BytesLength { name: n, length: l } => {
                write!(f, "{} must be {} bytes in length", n, l)
            }
            InternalError::ArrayLength {
                name_a: na,
                length_a: la,
                name_b: nb,
                length_b: lb,
                name_c: nc,
                length_c: lc,
            } => write!(
                f,
                "Arrays must be the same length: {} has length {}, {} has length {}, {} has length {}",
                na, la, nb, lb, nc, lc
            ),
            InternalError::ContextLength { length: l } => {
                write!(f, "dom2 context must be at most 255 bytes, got {}", l)
            }
            InternalError::PrehashLength { length: l } => {
                write!(f, "Pre-hashed message must be a 64 byte digest, got {}", l)
            }
            InternalError::RngUnderflow => write!(f, "Random source failed to produce bytes"),
            InternalError::MismatchedKeypair => {
                write!(f, "Public key does not match the secret key")
            }
            InternalError::Verify => write!(f, "Verification equation was not satisfied"),
        }
    }
}

/// Errors which may occur while processing signatures and keypairs.
///
/// This error may arise due to:
///
/// * Being given bytes with a length different to what was expected.
///
/// * A problem decompressing `r`, a curve point, in the `Signature`, or
///   the curve point for a `VerifyingKey`.
///
/// * A problem with the format of `s`, a scalar, in the `Signature`.
///   This is only raised if the high-bit of the scalar was set.
///   (Scalars must only be constructed from 255-bit integers.)
///
/// * Malformed dom2 parameters: an overlong context, or an Ed25519ph
///   message that is not a 64-byte digest.
///
/// * Failure of a signature to satisfy the verification equation.
#[derive(Clone, Copy, Eq, PartialEq, Hash, Debug)]
pub struct SignatureError(pub(crate) InternalError);

impl Display for SignatureError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(feature = "std")]
impl std::error::Error for SignatureError {}

impl From<InternalError> for SignatureError {
    fn from(e: InternalError) -> SignatureError {
        SignatureError(e)
    }
}
