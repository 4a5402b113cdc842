// -*- mode: rust; -*-
//
// This file is part of ed25519-donna.
// Copyright (c) 2017-2019 isis lovecruft
// See LICENSE for licensing information.
//
// Authors:
// - isis agora lovecruft <isis@patternsinthevoid.net>

#![cfg_attr(not(feature = "std"), no_std)]
#![deny(missing_docs)]
#![doc = include_str!("../README.md")]

//! Note that batch verification holds its working set in `Vec`s, so the
//! crate always links against `alloc`.

extern crate alloc;

mod backend;
mod batch;
mod constants;
mod edwards;
mod errors;
mod field;
mod montgomery;
mod options;
mod scalar;
mod signature;
mod signing;
mod traits;
mod verifying;
mod window;

pub use crate::batch::verify_batch;
pub use crate::constants::{
    KEYPAIR_LENGTH, PUBLIC_KEY_LENGTH, SECRET_KEY_LENGTH, SIGNATURE_LENGTH,
};
pub use crate::errors::SignatureError;
pub use crate::montgomery::MontgomeryPoint;
pub use crate::options::SignatureOptions;
pub use crate::signature::Signature;
pub use crate::signing::{SecretKey, SigningKey};
pub use crate::verifying::VerifyingKey;
