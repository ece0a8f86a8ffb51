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

use super::{IsotropicTwobodyEnergy, LennardJones};
use crate::ellipsoid::Oriented;
use crate::linalg::inverse;
use crate::{CombinationRule, Error, Info, Matrix3, ShapeMatrix, Vector3};

/// Gradient of a pair energy
///
/// The size and range gradients are taken with respect to the combined
/// matrices, G₁₂ = G₁ + G₂ and B₁₂ = B₁ + B₂, and hence apply equally to both
/// particles.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PairGradient {
    /// ∂U/∂𝒓 where 𝒓 = 𝒓₁ - 𝒓₂
    pub dr: Vector3,
    /// ∂U/∂G₁₂
    pub size: Matrix3,
    /// ∂U/∂B₁₂
    pub range: Matrix3,
}

impl Default for PairGradient {
    fn default() -> Self {
        Self {
            dr: Vector3::zeros(),
            size: Matrix3::zeros(),
            range: Matrix3::zeros(),
        }
    }
}

impl std::ops::MulAssign<f64> for PairGradient {
    fn mul_assign(&mut self, factor: f64) {
        self.dr *= factor;
        self.size *= factor;
        self.range *= factor;
    }
}

/// Gay-Berne potential between two ellipsoids
///
/// $$ U = u(h_{12})\\, \eta_{12}\\, \chi_{12} $$
///
/// where
///
/// - $u(h) = 4\epsilon(\rho^{12} - \rho^6)$ with $\rho = \sigma / (h + \sigma)$ is a
///   Lennard-Jones term at the contact distance
///   $h_{12} = r - (\frac{1}{2}\hat{\mathbf{r}} \cdot \mathbf{G}_{12}^{-1} \hat{\mathbf{r}})^{-1/2}$,
/// - $\eta_{12} = \sqrt{2 s_1 s_2 / \det \mathbf{G}_{12}}$ accounts for the relative shape, and
/// - $\chi_{12} = (2 \hat{\mathbf{r}} \cdot \mathbf{B}_{12}^{-1} \hat{\mathbf{r}})^2$ for the range anisotropy.
///
/// Limits:
///
/// - If both particles are points (vanishing radii), $h_{12} = r$ and
///   $\eta_{12} = 1$ so that $u$ is the plain Lennard-Jones potential,
///   $\rho = \sigma / r$.
/// - If only one particle is a point, or either shape factor vanishes,
///   $\eta_{12} = 0$ and the pair does not interact.
/// - If both range ellipsoids vanish, $\chi_{12} = 1$.
///
/// See J. G. Gay and B. J. Berne, [doi:10.1063/1.441483](https://doi.org/10.1063/1.441483)
/// and the generalization to biaxial particles by R. Berardi et al.,
/// [doi:10.1016/S0009-2614(98)00298-8](https://doi.org/10.1016/S0009-2614(98)00298-8).
#[derive(Debug, Clone, PartialEq, Copy)]
pub struct GayBerne {
    /// Used for point particles
    lennard_jones: LennardJones,
    /// Four times epsilon, 4ε
    four_times_epsilon: f64,
    sigma: f64,
}

/// Contact distance and shape terms for a pair with finite radii
#[derive(Debug)]
struct SizeTerm {
    /// η₁₂
    eta: f64,
    /// G₁₂⁻¹
    inverse: Matrix3,
    /// G₁₂⁻¹𝒓̂
    v: Vector3,
    /// (½ 𝒓̂·G₁₂⁻¹𝒓̂)^(-½)
    contact: f64,
}

/// Orientation dependent range term
#[derive(Debug)]
struct RangeTerm {
    /// χ₁₂
    chi: f64,
    /// B₁₂⁻¹𝒓̂
    w: Vector3,
    /// 𝒓̂·B₁₂⁻¹𝒓̂
    p: f64,
}

/// Intermediates of a single pair evaluation
#[derive(Debug)]
struct Terms {
    distance: f64,
    direction: Vector3,
    /// Lennard-Jones term, u
    u: f64,
    /// ∂u/∂h
    du_dh: f64,
    size: Option<SizeTerm>,
    range: Option<RangeTerm>,
}

impl Terms {
    fn eta(&self) -> f64 {
        self.size.as_ref().map_or(1.0, |s| s.eta)
    }
    fn chi(&self) -> f64 {
        self.range.as_ref().map_or(1.0, |r| r.chi)
    }
    fn energy(&self) -> f64 {
        self.u * self.eta() * self.chi()
    }

    /// Reverse-mode gradient of u·η·χ
    fn gradient(&self) -> PairGradient {
        let (eta, chi) = (self.eta(), self.chi());
        let de_dh = eta * chi * self.du_dh;
        let mut grad_direction = Vector3::zeros();
        let mut gradient = PairGradient::default();

        if let Some(size) = &self.size {
            // ∂h/∂q = c³/4 with q = 𝒓̂·G⁻¹𝒓̂ and c = (q/2)^(-½)
            let de_dq = de_dh * size.contact.powi(3) / 4.0;
            grad_direction += size.v * (2.0 * de_dq);
            // ∂q/∂G = -G⁻¹𝒓̂𝒓̂ᵀG⁻¹ and ∂η/∂G = -½ηG⁻¹
            gradient.size = -(size.v * size.v.transpose()) * de_dq
                - size.inverse * (0.5 * self.u * eta * chi);
        }
        if let Some(range) = &self.range {
            let de_dp = self.u * eta * 8.0 * range.p;
            grad_direction += range.w * (2.0 * de_dp);
            gradient.range = -(range.w * range.w.transpose()) * de_dp;
        }

        let n = self.direction;
        gradient.dr =
            n * de_dh + (grad_direction - n * n.dot(&grad_direction)) / self.distance;
        gradient
    }
}

impl GayBerne {
    pub fn new(epsilon: f64, sigma: f64) -> Self {
        Self {
            lennard_jones: LennardJones::new(epsilon, sigma),
            four_times_epsilon: 4.0 * epsilon,
            sigma,
        }
    }

    /// Construct using arbitrary combination rule.
    pub fn from_combination_rule(
        rule: CombinationRule,
        epsilons: (f64, f64),
        sigmas: (f64, f64),
    ) -> Self {
        let (epsilon, sigma) = rule.mix(epsilons, sigmas);
        Self::new(epsilon, sigma)
    }

    /// Interaction energy of two ellipsoids separated by `dr` = 𝒓₁ - 𝒓₂
    pub fn energy(&self, a: &Oriented, b: &Oriented, dr: &Vector3) -> Result<f64, Error> {
        Ok(self.terms(a, b, dr)?.map_or(0.0, |terms| terms.energy()))
    }

    /// Interaction energy and its gradient with respect to the displacement and shape matrices
    pub fn energy_and_gradient(
        &self,
        a: &Oriented,
        b: &Oriented,
        dr: &Vector3,
    ) -> Result<(f64, PairGradient), Error> {
        Ok(self
            .terms(a, b, dr)?
            .map_or((0.0, PairGradient::default()), |terms| {
                (terms.energy(), terms.gradient())
            }))
    }

    /// Evaluates all factors, or `None` if η₁₂ vanishes identically
    fn terms(&self, a: &Oriented, b: &Oriented, dr: &Vector3) -> Result<Option<Terms>, Error> {
        let points = a.ellipsoid.radii_are_zero() && b.ellipsoid.radii_are_zero();
        if !points && a.shape_factor * b.shape_factor == 0.0 {
            return Ok(None);
        }
        let singular = |matrix| Error::SingularMatrix {
            matrix,
            particle1: a.index,
            particle2: b.index,
        };
        let distance_squared = dr.norm_squared();
        let distance = distance_squared.sqrt();
        let direction = dr / distance;

        let range = if a.ellipsoid.scales_are_zero() && b.ellipsoid.scales_are_zero() {
            None
        } else {
            let (inverse, _) = inverse(&(a.frame.range + b.frame.range))
                .ok_or_else(|| singular(ShapeMatrix::Range))?;
            let w = inverse * direction;
            let p = direction.dot(&w);
            Some(RangeTerm {
                chi: (2.0 * p).powi(2),
                w,
                p,
            })
        };

        if points {
            return Ok(Some(Terms {
                distance,
                direction,
                u: self.lennard_jones.isotropic_twobody_energy(distance_squared),
                du_dh: -self.lennard_jones.isotropic_twobody_force(distance_squared),
                size: None,
                range,
            }));
        }

        let (inverse, determinant) = inverse(&(a.frame.size + b.frame.size))
            .ok_or_else(|| singular(ShapeMatrix::Size))?;
        let v = inverse * direction;
        let contact = (2.0 / direction.dot(&v)).sqrt();
        let h = distance - contact;
        let rho = self.sigma / (h + self.sigma);
        let rho6 = rho.powi(6);
        let u = self.four_times_epsilon * (rho6 * rho6 - rho6);
        let du_dh = -self.four_times_epsilon * (12.0 * rho6 * rho6 - 6.0 * rho6) * rho / self.sigma;
        let eta = (2.0 * a.shape_factor * b.shape_factor / determinant).sqrt();
        Ok(Some(Terms {
            distance,
            direction,
            u,
            du_dh,
            size: Some(SizeTerm {
                eta,
                inverse,
                v,
                contact,
            }),
            range,
        }))
    }
}

impl Info for GayBerne {
    fn short_name(&self) -> Option<&'static str> {
        Some("gayberne")
    }
    fn long_name(&self) -> Option<&'static str> {
        Some("Gay-Berne")
    }
    fn citation(&self) -> Option<&'static str> {
        Some("doi:10.1063/1.441483")
    }
}
