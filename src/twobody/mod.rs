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

//! ## Twobody interactions
//!
//! Module for describing exactly two particles interacting with each other.

pub use crate::Vector3;
use std::fmt::Debug;

mod gayberne;
mod lennardjones;
mod switching;
pub use self::gayberne::{GayBerne, PairGradient};
pub use self::lennardjones::LennardJones;
pub use self::switching::Switching;

/// Potential energy between a pair of isotropic particles, 𝑈(𝑟)
pub trait IsotropicTwobodyEnergy: Debug {
    /// Interaction energy between a pair of isotropic particles.
    fn isotropic_twobody_energy(&self, distance_squared: f64) -> f64;

    /// Force magnitude due to an isotropic interaction potential, 𝐹(𝑟) = -𝑑𝑈/𝑑𝑟
    ///
    /// The default implementation uses a central difference to calculate the force
    /// and should be overridden with the exact analytical expression for better speed
    /// and accuracy.
    fn isotropic_twobody_force(&self, distance_squared: f64) -> f64 {
        const EPS: f64 = 1e-6;
        let r = distance_squared.sqrt();
        let delta_u = self.isotropic_twobody_energy((r + EPS).powi(2))
            - self.isotropic_twobody_energy((r - EPS).powi(2));
        -delta_u / (2.0 * EPS)
    }

    /// Force vector on the first particle, 𝑭 = 𝐹(𝑟)𝒓̂, where 𝒓 = 𝒓₁ - 𝒓₂
    fn isotropic_twobody_force_vector(&self, distance: &Vector3) -> Vector3 {
        let r_squared = distance.norm_squared();
        self.isotropic_twobody_force(r_squared) * distance / r_squared.sqrt()
    }
}
