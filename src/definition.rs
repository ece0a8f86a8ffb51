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

//! Static force field: particles, pair exceptions, and cutoff settings.

use crate::{CombinationRule, Ellipsoid, NonbondedMethod};
use anyhow::{bail, ensure, Result};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Pair specific interaction replacing the combination rule
///
/// An exception either carries explicit (σ, ε) parameters or fully excludes
/// the pair. Exceptions are keyed by the unordered pair of particles.
///
/// # Examples
/// ~~~
/// use gayberne::Exception;
/// let exception = Exception::new(3, 1, 0.25, 0.5);
/// assert_eq!(exception.key(), (1, 3));
/// assert!(!exception.is_excluded());
/// assert!(Exception::exclusion(0, 1).is_excluded());
/// ~~~
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(Deserialize, Serialize),
    serde(deny_unknown_fields)
)]
pub struct Exception {
    pub particle1: usize,
    pub particle2: usize,
    /// Replacement (σ, ε), or `None` for a full exclusion
    #[cfg_attr(feature = "serde", serde(default))]
    pub parameters: Option<(f64, f64)>,
}

impl Exception {
    /// Exception with explicit σ and ε
    pub const fn new(particle1: usize, particle2: usize, sigma: f64, epsilon: f64) -> Self {
        Self {
            particle1,
            particle2,
            parameters: Some((sigma, epsilon)),
        }
    }

    /// Exclusion; the pair never interacts
    pub const fn exclusion(particle1: usize, particle2: usize) -> Self {
        Self {
            particle1,
            particle2,
            parameters: None,
        }
    }

    /// Unordered pair key with the smaller index first
    pub fn key(&self) -> (usize, usize) {
        (
            self.particle1.min(self.particle2),
            self.particle1.max(self.particle2),
        )
    }

    /// True if the pair contributes nothing, either as an exclusion or with ε = 0
    pub fn is_excluded(&self) -> bool {
        match self.parameters {
            None => true,
            Some((_, epsilon)) => epsilon == 0.0,
        }
    }
}

/// Default cutoff distance
const fn default_cutoff() -> f64 {
    1.0
}

/// Complete, static description of a Gay-Berne force field
///
/// Particles are added one by one and addressed by their insertion index.
///
/// # Examples
/// ~~~
/// use gayberne::{Ellipsoid, ForceDefinition, NonbondedMethod};
/// let mut definition = ForceDefinition::default()
///     .with_nonbonded_method(NonbondedMethod::CutoffPeriodic)
///     .with_cutoff(1.2)
///     .with_switching_distance(Some(1.0));
/// let center = definition.add_particle(Ellipsoid::new(1.0, 0.3).with_radii(0.3, 0.2, 0.1));
/// let reference = definition.add_particle(Ellipsoid::new(0.0, 0.3));
/// definition.particles[center].x_particle = Some(reference);
/// definition.add_exclusion(center, reference).unwrap();
/// assert!(definition.validate().is_ok());
/// assert!(definition.add_exclusion(reference, center).is_err());
/// ~~~
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(Deserialize, Serialize),
    serde(deny_unknown_fields)
)]
pub struct ForceDefinition {
    /// All particles, addressed by index
    pub particles: Vec<Ellipsoid>,
    /// Pair exceptions and exclusions
    #[cfg_attr(feature = "serde", serde(default))]
    pub exceptions: Vec<Exception>,
    #[cfg_attr(feature = "serde", serde(default, rename = "method"))]
    pub nonbonded_method: NonbondedMethod,
    /// Cutoff distance; ignored with [`NonbondedMethod::NoCutoff`]
    #[cfg_attr(feature = "serde", serde(default = "default_cutoff"))]
    pub cutoff: f64,
    /// Distance at which the switching function starts, if enabled
    #[cfg_attr(feature = "serde", serde(default, rename = "switching"))]
    pub switching_distance: Option<f64>,
    /// Rule for mixing σ and ε of pairs without an exception
    #[cfg_attr(feature = "serde", serde(default))]
    pub combination_rule: CombinationRule,
}

impl Default for ForceDefinition {
    fn default() -> Self {
        Self {
            particles: Vec::new(),
            exceptions: Vec::new(),
            nonbonded_method: NonbondedMethod::default(),
            cutoff: default_cutoff(),
            switching_distance: None,
            combination_rule: CombinationRule::default(),
        }
    }
}

impl ForceDefinition {
    /// Add a particle and return its index
    pub fn add_particle(&mut self, ellipsoid: Ellipsoid) -> usize {
        self.particles.push(ellipsoid);
        self.particles.len() - 1
    }

    /// Add an exception and return its index
    ///
    /// Fails if the pair already has an exception or if both particles are the same.
    pub fn add_exception(&mut self, exception: Exception) -> Result<usize> {
        ensure!(
            exception.particle1 != exception.particle2,
            "exception between particle {} and itself",
            exception.particle1
        );
        let key = exception.key();
        if self.exceptions.iter().any(|e| e.key() == key) {
            bail!("particles {} and {} already have an exception", key.0, key.1);
        }
        self.exceptions.push(exception);
        Ok(self.exceptions.len() - 1)
    }

    /// Exclude a pair of particles from interacting
    pub fn add_exclusion(&mut self, particle1: usize, particle2: usize) -> Result<usize> {
        self.add_exception(Exception::exclusion(particle1, particle2))
    }

    pub fn with_nonbonded_method(mut self, method: NonbondedMethod) -> Self {
        self.nonbonded_method = method;
        self
    }

    pub fn with_cutoff(mut self, cutoff: f64) -> Self {
        self.cutoff = cutoff;
        self
    }

    pub fn with_switching_distance(mut self, switching_distance: Option<f64>) -> Self {
        self.switching_distance = switching_distance;
        self
    }

    pub fn with_combination_rule(mut self, rule: CombinationRule) -> Self {
        self.combination_rule = rule;
        self
    }

    /// Check that all indices, lengths, and distances are meaningful
    pub fn validate(&self) -> Result<()> {
        for index in 0..self.particles.len() {
            self.validate_particle(index)?;
        }
        let mut keys = HashSet::with_capacity(self.exceptions.len());
        for exception in &self.exceptions {
            self.validate_exception(exception)?;
            ensure!(
                keys.insert(exception.key()),
                "particles {} and {} have more than one exception",
                exception.particle1,
                exception.particle2
            );
        }
        if self.nonbonded_method.uses_cutoff() {
            ensure!(
                self.cutoff > 0.0 && self.cutoff.is_finite(),
                "cutoff must be positive and finite, got {}",
                self.cutoff
            );
            if let Some(switching) = self.switching_distance {
                ensure!(
                    (0.0..self.cutoff).contains(&switching),
                    "switching distance ({}) must be in [0, cutoff ({}))",
                    switching,
                    self.cutoff
                );
            }
        }
        Ok(())
    }

    /// Check parameters and frame references of a single particle
    pub(crate) fn validate_particle(&self, index: usize) -> Result<()> {
        let n = self.particles.len();
        let particle = &self.particles[index];
        ensure!(
            particle.sigma >= 0.0 && particle.sigma.is_finite(),
            "particle {index}: sigma must be non-negative and finite"
        );
        ensure!(
            particle.epsilon >= 0.0 && particle.epsilon.is_finite(),
            "particle {index}: epsilon must be non-negative and finite"
        );
        ensure!(
            particle
                .radii
                .iter()
                .chain(particle.scales.iter())
                .all(|length| *length >= 0.0 && length.is_finite()),
            "particle {index}: axis lengths must be non-negative and finite"
        );
        match (particle.x_particle, particle.y_particle) {
            (None, None) => {}
            (None, Some(_)) => bail!("particle {index}: a y-reference requires an x-reference"),
            (Some(x), y) => {
                ensure!(
                    x < n && x != index,
                    "particle {index}: invalid x-reference particle {x}"
                );
                if let Some(y) = y {
                    ensure!(
                        y < n && y != index && y != x,
                        "particle {index}: invalid y-reference particle {y}"
                    );
                }
            }
        }
        Ok(())
    }

    /// Check indices and parameters of an exception
    pub(crate) fn validate_exception(&self, exception: &Exception) -> Result<()> {
        let n = self.particles.len();
        let (particle1, particle2) = (exception.particle1, exception.particle2);
        ensure!(
            particle1 < n && particle2 < n,
            "exception between particles {particle1} and {particle2} is out of range for {n} particles"
        );
        ensure!(
            particle1 != particle2,
            "exception between particle {particle1} and itself"
        );
        if let Some((sigma, epsilon)) = exception.parameters {
            ensure!(
                sigma >= 0.0 && sigma.is_finite() && epsilon >= 0.0 && epsilon.is_finite(),
                "exception between particles {particle1} and {particle2}: sigma and epsilon must be non-negative and finite"
            );
        }
        Ok(())
    }
}
