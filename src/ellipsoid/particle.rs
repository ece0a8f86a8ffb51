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

use crate::Vector3;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Static parameters of an ellipsoidal particle
///
/// The orientation is defined by up to two other particles. The local x-axis
/// points from `x_particle` towards this particle; the local y-axis is the part of
/// the vector from `y_particle` that is orthogonal to x. Without an x-reference
/// the global axes are used.
///
/// Two sets of semi-axis lengths are carried: `radii` give the steric size and
/// `scales` the anisotropy of the interaction range.
///
/// # Examples
/// ~~~
/// use gayberne::Ellipsoid;
/// let point = Ellipsoid::new(1.0, 0.3);
/// assert!(point.radii_are_zero() && point.scales_are_zero());
///
/// let rod = Ellipsoid::new(1.0, 0.3)
///     .with_frame(Some(4), None)
///     .with_radii(0.4, 0.1, 0.1)
///     .with_scales(1.0, 1.0, 1.0);
/// assert!(!rod.radii_are_zero());
/// assert_eq!(rod.shape_factor(), (0.4 * 0.1 + 0.01) * f64::sqrt(0.4 * 0.1));
/// ~~~
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(Deserialize, Serialize),
    serde(deny_unknown_fields)
)]
pub struct Ellipsoid {
    /// Interaction strength, ε
    #[cfg_attr(feature = "serde", serde(rename = "eps", alias = "ε"))]
    pub epsilon: f64,
    /// Repulsive core length scale, σ
    #[cfg_attr(feature = "serde", serde(alias = "σ"))]
    pub sigma: f64,
    /// Particle defining the direction of the local x-axis
    #[cfg_attr(feature = "serde", serde(default, rename = "xparticle"))]
    pub x_particle: Option<usize>,
    /// Particle defining the direction of the local y-axis
    #[cfg_attr(feature = "serde", serde(default, rename = "yparticle"))]
    pub y_particle: Option<usize>,
    /// Semi-axis lengths of the steric ellipsoid, (rₓ, r_y, r_z)
    #[cfg_attr(feature = "serde", serde(default))]
    pub radii: Vector3,
    /// Semi-axis lengths of the range ellipsoid, (eₓ, e_y, e_z)
    #[cfg_attr(feature = "serde", serde(default))]
    pub scales: Vector3,
}

impl Ellipsoid {
    /// Point particle with no frame and vanishing axes
    pub fn new(epsilon: f64, sigma: f64) -> Self {
        Self {
            epsilon,
            sigma,
            x_particle: None,
            y_particle: None,
            radii: Vector3::zeros(),
            scales: Vector3::zeros(),
        }
    }

    /// Set the particles defining the local x and y axes
    pub fn with_frame(mut self, x_particle: Option<usize>, y_particle: Option<usize>) -> Self {
        self.x_particle = x_particle;
        self.y_particle = y_particle;
        self
    }

    /// Set the semi-axis lengths of the steric ellipsoid
    pub fn with_radii(mut self, rx: f64, ry: f64, rz: f64) -> Self {
        self.radii = Vector3::new(rx, ry, rz);
        self
    }

    /// Set the semi-axis lengths of the range ellipsoid
    pub fn with_scales(mut self, ex: f64, ey: f64, ez: f64) -> Self {
        self.scales = Vector3::new(ex, ey, ez);
        self
    }

    /// True if all steric radii are zero, i.e. a point particle
    pub fn radii_are_zero(&self) -> bool {
        self.radii.iter().all(|r| *r == 0.0)
    }

    /// True if all range scales are zero, i.e. an isotropic range term
    pub fn scales_are_zero(&self) -> bool {
        self.scales.iter().all(|e| *e == 0.0)
    }

    /// Shape factor, s = (rₓr_y + r_z²)√(rₓr_y)
    pub fn shape_factor(&self) -> f64 {
        let (rx, ry, rz) = (self.radii.x, self.radii.y, self.radii.z);
        (rx * ry + rz * rz) * f64::sqrt(rx * ry)
    }

    /// Squared steric radii, (rₓ², r_y², r_z²)
    pub(crate) fn radii_squared(&self) -> Vector3 {
        self.radii.component_mul(&self.radii)
    }

    /// Squared range scales, (eₓ², e_y², e_z²)
    pub(crate) fn scales_squared(&self) -> Vector3 {
        self.scales.component_mul(&self.scales)
    }
}
