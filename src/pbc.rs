// Copyright 2023 Mikael Lund
//
// Licensed under the Apache license, version 2.0 (the "license");
// you may not use this file except in compliance with the license.
// You may obtain a copy of the license at
//
//     http://www.apache.org/licenses/license-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the license is distributed on an "as is" basis,
// without warranties or conditions of any kind, either express or implied.
// See the license for the specific language governing permissions and
// limitations under the license.

//! Pair geometry, cutoffs, and periodic boundary conditions.

use crate::{Error, Vector3};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Method for handling long range nonbonded interactions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(
    feature = "serde",
    derive(Deserialize, Serialize),
    serde(rename_all = "lowercase")
)]
pub enum NonbondedMethod {
    /// All pairs interact, without any cutoff or periodic boundaries
    #[default]
    NoCutoff,
    /// Pairs further apart than the cutoff are ignored
    #[cfg_attr(feature = "serde", serde(alias = "cutoff"))]
    CutoffNonPeriodic,
    /// Each particle interacts with the nearest periodic image of each other
    /// particle, and pairs further apart than the cutoff are ignored
    #[cfg_attr(feature = "serde", serde(alias = "periodic"))]
    CutoffPeriodic,
}

impl NonbondedMethod {
    /// True if a cutoff is applied
    pub const fn uses_cutoff(&self) -> bool {
        !matches!(self, Self::NoCutoff)
    }
    /// True if periodic boundary conditions are applied
    pub const fn uses_periodic_boundary_conditions(&self) -> bool {
        matches!(self, Self::CutoffPeriodic)
    }
}

/// Periodic box in reduced form
///
/// The first vector lies along x, the second in the xy-plane:
/// 𝒂 = (aₓ, 0, 0), 𝒃 = (bₓ, b_y, 0), 𝒄 = (cₓ, c_y, c_z).
///
/// # Examples
/// ~~~
/// use gayberne::{PeriodicBox, Vector3};
/// let cube = PeriodicBox::cuboid(Vector3::new(3.0, 3.0, 3.0));
/// let dr = cube.minimum_image(&Vector3::new(0.1, 0.0, 0.0), &Vector3::new(2.9, 0.0, 0.0));
/// assert!((dr.x - 0.2).abs() < 1e-12);
/// ~~~
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Deserialize, Serialize))]
pub struct PeriodicBox {
    vectors: [Vector3; 3],
}

impl PeriodicBox {
    /// Triclinic box from three box vectors in reduced form
    pub const fn new(a: Vector3, b: Vector3, c: Vector3) -> Self {
        Self { vectors: [a, b, c] }
    }

    /// Rectangular box with the given side lengths
    pub fn cuboid(sides: Vector3) -> Self {
        Self::new(
            Vector3::new(sides.x, 0.0, 0.0),
            Vector3::new(0.0, sides.y, 0.0),
            Vector3::new(0.0, 0.0, sides.z),
        )
    }

    /// Box vectors, 𝒂, 𝒃, and 𝒄
    pub const fn vectors(&self) -> &[Vector3; 3] {
        &self.vectors
    }

    /// Smallest perpendicular width of the box, min(aₓ, b_y, c_z)
    pub fn min_width(&self) -> f64 {
        let [a, b, c] = &self.vectors;
        a.x.min(b.y).min(c.z)
    }

    /// Check that the box is at least twice the cutoff distance in every direction
    pub fn validate(&self, cutoff: f64) -> Result<(), Error> {
        const MIN_WIDTH_OVER_CUTOFF: f64 = 1.999999;
        let size = self.min_width();
        if size < MIN_WIDTH_OVER_CUTOFF * cutoff {
            return Err(Error::BoxTooSmall { size, cutoff });
        }
        Ok(())
    }

    /// Displacement 𝒓₁ - 𝒓₂ to the nearest periodic image of `pos2`
    pub fn minimum_image(&self, pos1: &Vector3, pos2: &Vector3) -> Vector3 {
        let [a, b, c] = &self.vectors;
        let mut dr = pos1 - pos2;
        dr -= c * (dr.z / c.z + 0.5).floor();
        dr -= b * (dr.y / b.y + 0.5).floor();
        dr -= a * (dr.x / a.x + 0.5).floor();
        dr
    }
}

/// Displacement between two particles
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PairGeometry {
    /// Displacement, 𝒓 = 𝒓₁ - 𝒓₂
    pub dr: Vector3,
    /// Distance, |𝒓|
    pub distance: f64,
}

impl PairGeometry {
    /// Resolve the displacement between two particles.
    ///
    /// Returns `None` if a cutoff is used and the distance is equal to or larger
    /// than the cutoff. A periodic box must be given with
    /// [`NonbondedMethod::CutoffPeriodic`] and is ignored otherwise.
    pub fn resolve(
        pos1: &Vector3,
        pos2: &Vector3,
        method: NonbondedMethod,
        cutoff: f64,
        periodic_box: Option<&PeriodicBox>,
    ) -> Option<Self> {
        let dr = match (method, periodic_box) {
            (NonbondedMethod::CutoffPeriodic, Some(periodic_box)) => {
                periodic_box.minimum_image(pos1, pos2)
            }
            _ => pos1 - pos2,
        };
        let distance = dr.norm();
        if method.uses_cutoff() && distance >= cutoff {
            return None;
        }
        Some(Self { dr, distance })
    }

    /// Unit vector along the displacement
    pub fn direction(&self) -> Vector3 {
        self.dr / self.distance
    }
}
