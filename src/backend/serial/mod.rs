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

//! Serial implementations of field, scalar, point arithmetic, and
//! scalar multiplication.
//!
//! The curve models and scalar multiplication routines are shared; only
//! the limbed field and scalar arithmetic underneath them changes with
//! the word size.

use cfg_if::cfg_if;

cfg_if! {
    if #[cfg(ed25519_donna_bits = "32")] {
        pub mod u32;
        pub(crate) use self::u32::constants;
    } else {
        pub mod u64;
        pub(crate) use self::u64::constants;
    }
}

pub mod curve_models;
pub mod scalar_mul;
