//! Select the word size for the serial field and scalar backends.
//!
//! The 64-bit backend uses 128-bit products and is the right choice on any
//! target with a 64-bit multiplier; everything else gets the 32-bit backend.
//! `ED25519_DONNA_BITS=32|64` overrides the automatic choice.

use std::env;

#[derive(Clone, Copy, PartialEq)]
enum Bits {
    ThirtyTwo,
    SixtyFour,
}

fn selected_bits() -> Bits {
    if let Ok(bits) = env::var("ED25519_DONNA_BITS") {
        match bits.as_str() {
            "32" => return Bits::ThirtyTwo,
            "64" => return Bits::SixtyFour,
            _ => panic!("ED25519_DONNA_BITS must be 32 or 64, got {bits}"),
        }
    }

    match env::var("CARGO_CFG_TARGET_POINTER_WIDTH").as_deref() {
        Ok("64") => Bits::SixtyFour,
        _ => Bits::ThirtyTwo,
    }
}

fn main() {
    println!("cargo:rerun-if-env-changed=ED25519_DONNA_BITS");
    println!("cargo:rustc-check-cfg=cfg(ed25519_donna_bits, values(\"32\", \"64\"))");

    match selected_bits() {
        Bits::ThirtyTwo => println!("cargo:rustc-cfg=ed25519_donna_bits=\"32\""),
        Bits::SixtyFour => println!("cargo:rustc-cfg=ed25519_donna_bits=\"64\""),
    }
}
