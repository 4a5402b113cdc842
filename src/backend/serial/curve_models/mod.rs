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

//! Internal curve representations which are not part of the public API.
//!
//! Apart from the \\(\mathbb P\^3\\) `EdwardsPoint` in the `edwards`
//! module, we use several internal models for the curve:
//!
//! * `ProjectivePoint`: a point \\((X:Y:Z)\\) in the \\(\mathbb P\^2\\)
//!   model, with cheaper doubling;
//!
//! * `CompletedPoint`: a point \\(((X:Z), (Y:T))\\) in \\(\mathbb P\^1
//!   \times \mathbb P\^1\\), the output of the addition and doubling
//!   formulas, saving one multiplication until the caller decides which
//!   model it wants next;
//!
//! * `AffineNielsPoint`: a pre-computed affine point \\((y+x, y-x,
//!   2dxy)\\) in "Niels coordinates", used for table entries;
//!
//! * `ProjectiveNielsPoint`: the projective analogue \\((Y+X, Y-X, Z,
//!   2dXY)\\), used for tables computed at runtime.
//!
//! The addition formulas are the completed-coordinate forms from Hisil,
//! Wong, Carter, and Dawson, as arranged in ed25519-donna: each formula
//! states for every intermediate whether the lazily-reduced or the
//! carried form of an add/sub is required, which is what lets the field
//! backends skip most carry chains.
#![allow(non_snake_case)]

use crate::constants;
use crate::edwards::EdwardsPoint;
use crate::field::FieldElement;
use crate::traits::Identity;

use core::ops::{Add, Sub};

// ------------------------------------------------------------------------
// Internal point representations
// ------------------------------------------------------------------------

/// A `ProjectivePoint` is a point \\((X:Y:Z)\\) on the \\(\mathbb P\^2\\)
/// model of the curve.
/// A point \\((x,y)\\) in the affine model corresponds to
/// \\((x:y:1)\\).
#[derive(Copy, Clone, Debug)]
pub(crate) struct ProjectivePoint {
    pub X: FieldElement,
    pub Y: FieldElement,
    pub Z: FieldElement,
}

/// A `CompletedPoint` is a point \\(((X:Z), (Y:T))\\) on the \\(\mathbb
/// P\^1 \times \mathbb P\^1 \\) model of the curve.
/// A point \\((x,y)\\) in the affine model corresponds to
/// \\(((x:1),(y:1))\\).
#[derive(Copy, Clone, Debug)]
pub(crate) struct CompletedPoint {
    pub X: FieldElement,
    pub Y: FieldElement,
    pub Z: FieldElement,
    pub T: FieldElement,
}

/// A pre-computed point in the affine model for the curve, represented as
/// \\((y+x, y-x, 2dxy)\\) in "Niels coordinates".
#[derive(Copy, Clone, Debug)]
pub(crate) struct AffineNielsPoint {
    pub y_plus_x: FieldElement,
    pub y_minus_x: FieldElement,
    pub xy2d: FieldElement,
}

/// A pre-computed point on the \\( \mathbb P\^3 \\) model for the
/// curve, represented as \\((Y+X, Y-X, Z, 2dXY)\\) in "Niels
/// coordinates".
#[derive(Copy, Clone, Debug)]
pub(crate) struct ProjectiveNielsPoint {
    pub Y_plus_X: FieldElement,
    pub Y_minus_X: FieldElement,
    pub Z: FieldElement,
    pub T2d: FieldElement,
}

// ------------------------------------------------------------------------
// Constructors
// ------------------------------------------------------------------------

impl Identity for ProjectivePoint {
    fn identity() -> ProjectivePoint {
        ProjectivePoint {
            X: FieldElement::ZERO,
            Y: FieldElement::ONE,
            Z: FieldElement::ONE,
        }
    }
}

impl Identity for AffineNielsPoint {
    fn identity() -> AffineNielsPoint {
        AffineNielsPoint {
            y_plus_x: FieldElement::ONE,
            y_minus_x: FieldElement::ONE,
            xy2d: FieldElement::ZERO,
        }
    }
}

// ------------------------------------------------------------------------
// Point conversions
// ------------------------------------------------------------------------

impl ProjectivePoint {
    /// Convert this point from the \\( \mathbb P\^2 \\) model to the
    /// \\( \mathbb P\^3 \\) model.
    ///
    /// This costs \\(3 \mathrm M + 1 \mathrm S\\).
    pub(crate) fn as_extended(&self) -> EdwardsPoint {
        EdwardsPoint {
            X: self.X.mul(&self.Z),
            Y: self.Y.mul(&self.Z),
            Z: self.Z.square(),
            T: self.X.mul(&self.Y),
        }
    }
}

impl CompletedPoint {
    /// Convert this point from the \\( \mathbb P\^1 \times \mathbb P\^1
    /// \\) model to the \\( \mathbb P\^2 \\) model.
    ///
    /// This costs \\(3 \mathrm M \\).
    pub(crate) fn as_projective(&self) -> ProjectivePoint {
        ProjectivePoint {
            X: self.X.mul(&self.T),
            Y: self.Y.mul(&self.Z),
            Z: self.Z.mul(&self.T),
        }
    }

    /// Convert this point from the \\( \mathbb P\^1 \times \mathbb P\^1
    /// \\) model to the \\( \mathbb P\^3 \\) model.
    ///
    /// This costs \\(4 \mathrm M \\).
    pub(crate) fn as_extended(&self) -> EdwardsPoint {
        EdwardsPoint {
            X: self.X.mul(&self.T),
            Y: self.Y.mul(&self.Z),
            Z: self.Z.mul(&self.T),
            T: self.X.mul(&self.Y),
        }
    }
}

// ------------------------------------------------------------------------
// Doubling
// ------------------------------------------------------------------------

impl ProjectivePoint {
    /// Double this point: return self + self
    pub(crate) fn double(&self) -> CompletedPoint {
        let XX = self.X.square();
        let YY = self.Y.square();
        let ZZ = self.Z.square();
        let ZZ2 = ZZ.add_reduce(&ZZ);
        let X_plus_Y_sq = self.X.add(&self.Y).square();
        let YY_plus_XX = YY.add(&XX);
        let YY_minus_XX = YY.sub(&XX);

        CompletedPoint {
            X: X_plus_Y_sq.sub_after_basic(&YY_plus_XX),
            Y: YY_plus_XX,
            Z: YY_minus_XX,
            T: ZZ2.sub_after_basic(&YY_minus_XX),
        }
    }
}

// ------------------------------------------------------------------------
// Addition and Subtraction
// ------------------------------------------------------------------------

impl<'a, 'b> Add<&'b ProjectiveNielsPoint> for &'a EdwardsPoint {
    type Output = CompletedPoint;

    fn add(self, other: &'b ProjectiveNielsPoint) -> CompletedPoint {
        let MM = self.Y.sub(&self.X).mul(&other.Y_minus_X);
        let PP = self.Y.add(&self.X).mul(&other.Y_plus_X);
        let TT2d = self.T.mul(&other.T2d);
        let ZZ = self.Z.mul(&other.Z);
        let ZZ2 = ZZ.add_reduce(&ZZ);

        CompletedPoint {
            X: PP.sub(&MM),
            Y: PP.add(&MM),
            Z: ZZ2.add(&TT2d),
            T: ZZ2.sub(&TT2d),
        }
    }
}

impl<'a, 'b> Sub<&'b ProjectiveNielsPoint> for &'a EdwardsPoint {
    type Output = CompletedPoint;

    fn sub(self, other: &'b ProjectiveNielsPoint) -> CompletedPoint {
        // Negating a Niels point swaps the (Y+X, Y-X) pair and the sign
        // of T2d, so subtraction is addition with the roles exchanged.
        let MP = self.Y.sub(&self.X).mul(&other.Y_plus_X);
        let PM = self.Y.add(&self.X).mul(&other.Y_minus_X);
        let TT2d = self.T.mul(&other.T2d);
        let ZZ = self.Z.mul(&other.Z);
        let ZZ2 = ZZ.add_reduce(&ZZ);

        CompletedPoint {
            X: PM.sub(&MP),
            Y: PM.add(&MP),
            Z: ZZ2.sub(&TT2d),
            T: ZZ2.add(&TT2d),
        }
    }
}

impl<'a, 'b> Add<&'b AffineNielsPoint> for &'a EdwardsPoint {
    type Output = CompletedPoint;

    fn add(self, other: &'b AffineNielsPoint) -> CompletedPoint {
        let MM = self.Y.sub(&self.X).mul(&other.y_minus_x);
        let PP = self.Y.add(&self.X).mul(&other.y_plus_x);
        let Txy2d = self.T.mul(&other.xy2d);
        let Z2 = self.Z.add_reduce(&self.Z);

        CompletedPoint {
            X: PP.sub(&MM),
            Y: PP.add(&MM),
            Z: Z2.add(&Txy2d),
            T: Z2.sub(&Txy2d),
        }
    }
}

impl<'a, 'b> Sub<&'b AffineNielsPoint> for &'a EdwardsPoint {
    type Output = CompletedPoint;

    fn sub(self, other: &'b AffineNielsPoint) -> CompletedPoint {
        let MP = self.Y.sub(&self.X).mul(&other.y_plus_x);
        let PM = self.Y.add(&self.X).mul(&other.y_minus_x);
        let Txy2d = self.T.mul(&other.xy2d);
        let Z2 = self.Z.add_reduce(&self.Z);

        CompletedPoint {
            X: PM.sub(&MP),
            Y: PM.add(&MP),
            Z: Z2.sub(&Txy2d),
            T: Z2.add(&Txy2d),
        }
    }
}

impl EdwardsPoint {
    /// Convert to a ProjectiveNielsPoint
    pub(crate) fn as_projective_niels(&self) -> ProjectiveNielsPoint {
        ProjectiveNielsPoint {
            Y_plus_X: self.Y.add(&self.X),
            Y_minus_X: self.Y.sub(&self.X),
            Z: self.Z,
            T2d: self.T.mul(&constants::EDWARDS_D2),
        }
    }

    /// Convert the representation of this point from extended
    /// coordinates to projective coordinates.
    ///
    /// Free.
    pub(crate) fn as_projective(&self) -> ProjectivePoint {
        ProjectivePoint {
            X: self.X,
            Y: self.Y,
            Z: self.Z,
        }
    }
}
