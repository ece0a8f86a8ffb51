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

//! # Gay-Berne
//!
//! A library for calculating anisotropic interactions between rigid, oriented
//! ellipsoids using the Gay-Berne generalization of the Lennard-Jones potential.
//!
//! Each ellipsoid derives its orientation from the positions of up to two
//! reference particles and carries two sets of semi-axis lengths: one for the
//! steric size and one for the anisotropy of the interaction range.
//!
//! ## Examples
//! ~~~
//! use gayberne::{Ellipsoid, ForceDefinition, GayBerneForce, Vector3};
//! let mut definition = ForceDefinition::default();
//! definition.add_particle(Ellipsoid::new(1.0, 0.3));
//! definition.add_particle(Ellipsoid::new(1.0, 0.3));
//! let force = GayBerneForce::new(definition).unwrap();
//!
//! let r_min = 0.3 * f64::powf(2.0, 1.0 / 6.0);
//! let positions = [Vector3::zeros(), Vector3::new(r_min, 0.0, 0.0)];
//! let mut forces = vec![Vector3::zeros(); 2];
//! let energy = force.calculate(&positions, None, &mut forces).unwrap();
//! assert!((energy + 1.0).abs() < 1e-12);
//! ~~~

#[cfg(test)]
extern crate approx;

/// A point in 3D space
pub type Vector3 = nalgebra::Vector3<f64>;
/// A stack-allocated 3x3 square matrix
pub type Matrix3 = nalgebra::Matrix3<f64>;
use num::{Float, NumCast};
#[cfg(feature = "serde")]
use serde::{Deserialize, Deserializer, Serialize, Serializer};

mod definition;
pub mod ellipsoid;
mod error;
mod force;
pub mod linalg;
pub mod pbc;
pub mod twobody;

pub use definition::{Exception, ForceDefinition};
pub use ellipsoid::{Ellipsoid, Frame};
pub use error::{Error, ShapeMatrix};
pub use force::{GayBerneForce, PairContribution};
pub use pbc::{NonbondedMethod, PeriodicBox};

/// Defines a cutoff distance
pub trait Cutoff {
    /// Squared cutoff distance
    fn cutoff_squared(&self) -> f64 {
        self.cutoff().powi(2)
    }

    /// Cutoff distance
    fn cutoff(&self) -> f64;
}

/// Descriptive information about a potential
pub trait Info {
    /// Short name, e.g. used for input/output
    fn short_name(&self) -> Option<&'static str> {
        None
    }
    /// Long, descriptive name
    fn long_name(&self) -> Option<&'static str> {
        None
    }
    /// Citation, preferably as a DOI of the form `doi:...`
    fn citation(&self) -> Option<&'static str> {
        None
    }
    /// Resolvable URL for the citation, if it is a DOI
    fn url(&self) -> Option<String> {
        self.citation()
            .and_then(|c| c.strip_prefix("doi:"))
            .map(|doi| format!("https://doi.org/{}", doi))
    }
}

/// Combination rules for mixing epsilon and sigma values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Deserialize, Serialize))]
pub enum CombinationRule {
    /// The Lorentz-Berthelot combination rule (geometric mean on epsilon, arithmetic mean on sigma)
    #[default]
    LorentzBerthelot,
    /// The Fender-Halsey combination rule (harmonic mean on epsilon, arithmetic mean on sigma)
    FenderHalsey,
}

impl CombinationRule {
    /// Combines epsilon and sigma pairs using the selected combination rule
    pub fn mix(&self, epsilons: (f64, f64), sigmas: (f64, f64)) -> (f64, f64) {
        let epsilon = self.mix_epsilons(epsilons);
        let sigma = self.mix_sigmas(sigmas);
        (epsilon, sigma)
    }

    /// Combine epsilon values using the selected combination rule
    pub fn mix_epsilons(&self, epsilons: (f64, f64)) -> f64 {
        match self {
            Self::LorentzBerthelot => geometric_mean(epsilons),
            Self::FenderHalsey => harmonic_mean(epsilons),
        }
    }

    /// Combine sigma values using the selected combination rule
    pub fn mix_sigmas(&self, sigmas: (f64, f64)) -> f64 {
        match self {
            Self::LorentzBerthelot => arithmetic_mean(sigmas),
            Self::FenderHalsey => arithmetic_mean(sigmas),
        }
    }
}

/// See Pythagorean means on [Wikipedia](https://en.wikipedia.org/wiki/Pythagorean_means)
fn geometric_mean<T: Float>(values: (T, T)) -> T {
    T::sqrt(values.0 * values.1)
}

/// See Pythagorean means on [Wikipedia](https://en.wikipedia.org/wiki/Pythagorean_means)
fn arithmetic_mean<T: Float>(values: (T, T)) -> T {
    (values.0 + values.1) * NumCast::from(0.5).unwrap()
}

/// See Pythagorean means on [Wikipedia](https://en.wikipedia.org/wiki/Pythagorean_means)
///
/// Two vanishing values give zero rather than NaN.
fn harmonic_mean<T: Float>(values: (T, T)) -> T {
    let sum = values.0 + values.1;
    if sum == T::zero() {
        return T::zero();
    }
    values.0 * values.1 / sum * NumCast::from(2.0).unwrap()
}

/// Transform x^2 --> x when serializing
#[cfg(feature = "serde")]
fn sqrt_serialize<S>(x: &f64, s: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    s.serialize_f64(x.sqrt())
}

/// Transform x --> x^2 when deserializing
#[cfg(feature = "serde")]
fn square_deserialize<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(f64::deserialize(deserializer)?.powi(2))
}

/// Transform x --> x/4 when serializing
#[cfg(feature = "serde")]
fn divide4_serialize<S>(x: &f64, s: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    s.serialize_f64(x / 4.0)
}

/// Transform x --> 4x when deserializing
#[cfg(feature = "serde")]
fn multiply4_deserialize<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(f64::deserialize(deserializer)? * 4.0)
}
