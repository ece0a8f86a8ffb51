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

//! Energy and forces of a full system of ellipsoids.

use crate::ellipsoid::{FrameGradient, Oriented};
use crate::pbc::PairGeometry;
use crate::twobody::{GayBerne, PairGradient, Switching};
use crate::{
    Cutoff, Ellipsoid, Error, Exception, ForceDefinition, Frame, PeriodicBox, Vector3,
};
use anyhow::{bail, ensure};
use itertools::Itertools;
use log::{debug, warn};
#[cfg(feature = "parallel")]
use rayon::prelude::*;
use std::collections::HashMap;

/// Energy of a single evaluated pair
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PairContribution {
    pub particle1: usize,
    pub particle2: usize,
    /// Effective σ of the pair
    pub sigma: f64,
    /// Effective ε of the pair
    pub epsilon: f64,
    /// Pair energy, including the switching function
    pub energy: f64,
}

/// Candidate pair with its effective parameters
#[derive(Debug, Clone, Copy)]
struct Pair {
    particle1: usize,
    particle2: usize,
    sigma: f64,
    epsilon: f64,
}

/// Partial sums of a sweep over pairs
#[derive(Debug, Clone)]
struct Accumulator {
    energy: f64,
    pair_count: usize,
    /// ∂U/∂𝒓ᵢ
    positions: Vec<Vector3>,
    /// ∂U/∂Bᵢ and ∂U/∂Gᵢ
    frames: Vec<FrameGradient>,
}

impl Accumulator {
    fn new(num_particles: usize) -> Self {
        Self {
            energy: 0.0,
            pair_count: 0,
            positions: vec![Vector3::zeros(); num_particles],
            frames: vec![FrameGradient::default(); num_particles],
        }
    }

    fn add(&mut self, pair: &Pair, energy: f64, gradient: &PairGradient) {
        self.energy += energy;
        self.pair_count += 1;
        self.positions[pair.particle1] += gradient.dr;
        self.positions[pair.particle2] -= gradient.dr;
        let shape = FrameGradient {
            range: gradient.range,
            size: gradient.size,
        };
        self.frames[pair.particle1] += shape;
        self.frames[pair.particle2] += shape;
    }

    #[cfg(feature = "parallel")]
    fn merge(mut self, other: Self) -> Self {
        self.energy += other.energy;
        self.pair_count += other.pair_count;
        for (sum, term) in self.positions.iter_mut().zip(other.positions) {
            *sum += term;
        }
        for (sum, term) in self.frames.iter_mut().zip(other.frames) {
            *sum += term;
        }
        self
    }
}

/// Gay-Berne force acting on a set of ellipsoids
///
/// All pairs interact through the combination rule unless the pair has an
/// exception, in which case the exception's parameters are used or, for
/// exclusions, the pair is skipped. Pairs with vanishing ε are never evaluated.
///
/// Forces include the contributions transmitted through the frames onto the
/// reference particles that define each ellipsoid's orientation.
///
/// # Examples
/// ~~~
/// use gayberne::{Ellipsoid, Exception, ForceDefinition, GayBerneForce, Vector3};
/// let mut definition = ForceDefinition::default();
/// for _ in 0..3 {
///     definition.add_particle(Ellipsoid::new(1.0, 0.3));
/// }
/// definition.add_exception(Exception::new(0, 2, 0.25, 0.5)).unwrap();
/// let force = GayBerneForce::new(definition).unwrap();
/// assert_eq!(force.pair_parameters(2, 0), Some((0.25, 0.5)));
/// assert_eq!(force.pair_parameters(0, 1), Some((0.3, 1.0)));
/// ~~~
#[derive(Debug, Clone)]
pub struct GayBerneForce {
    definition: ForceDefinition,
    /// Shape factor, s, of each particle
    shape_factors: Vec<f64>,
    /// Index of the exception of each unordered pair
    exceptions: HashMap<(usize, usize), usize>,
    switching: Option<Switching>,
}

impl GayBerneForce {
    /// Validate the definition and set up the force
    pub fn new(definition: ForceDefinition) -> anyhow::Result<Self> {
        definition.validate()?;
        let method = definition.nonbonded_method;
        let switching = match definition.switching_distance {
            Some(distance) if method.uses_cutoff() => {
                Some(Switching::new(distance, definition.cutoff))
            }
            Some(distance) => {
                warn!(
                    "switching distance {} is ignored with {:?}",
                    distance, method
                );
                None
            }
            None => None,
        };
        let exceptions = definition
            .exceptions
            .iter()
            .enumerate()
            .map(|(index, exception)| (exception.key(), index))
            .collect();
        let shape_factors = definition
            .particles
            .iter()
            .map(Ellipsoid::shape_factor)
            .collect();
        debug!(
            "Gay-Berne force with {} particles, {} exceptions, {:?}, cutoff {}",
            definition.particles.len(),
            definition.exceptions.len(),
            method,
            definition.cutoff
        );
        Ok(Self {
            definition,
            shape_factors,
            exceptions,
            switching,
        })
    }

    pub fn definition(&self) -> &ForceDefinition {
        &self.definition
    }

    pub fn num_particles(&self) -> usize {
        self.definition.particles.len()
    }

    pub fn num_exceptions(&self) -> usize {
        self.definition.exceptions.len()
    }

    /// True if a periodic box must be passed when evaluating
    pub fn uses_periodic_boundary_conditions(&self) -> bool {
        self.definition
            .nonbonded_method
            .uses_periodic_boundary_conditions()
    }

    /// Replace the parameters of a particle
    ///
    /// The force is left unchanged if the new parameters are invalid.
    pub fn set_particle_parameters(
        &mut self,
        index: usize,
        ellipsoid: Ellipsoid,
    ) -> anyhow::Result<()> {
        ensure!(
            index < self.num_particles(),
            "particle index {index} out of range"
        );
        let previous = std::mem::replace(&mut self.definition.particles[index], ellipsoid);
        if let Err(error) = self.definition.validate_particle(index) {
            self.definition.particles[index] = previous;
            return Err(error);
        }
        self.shape_factors[index] = self.definition.particles[index].shape_factor();
        Ok(())
    }

    /// Replace an exception
    ///
    /// The force is left unchanged if the new exception is invalid or if its
    /// pair already has another exception.
    pub fn set_exception_parameters(
        &mut self,
        index: usize,
        exception: Exception,
    ) -> anyhow::Result<()> {
        ensure!(
            index < self.num_exceptions(),
            "exception index {index} out of range"
        );
        self.definition.validate_exception(&exception)?;
        let key = exception.key();
        if let Some(other) = self.exceptions.get(&key).filter(|other| **other != index) {
            bail!(
                "particles {} and {} already have exception {}",
                key.0,
                key.1,
                other
            );
        }
        let previous = std::mem::replace(&mut self.definition.exceptions[index], exception);
        self.exceptions.remove(&previous.key());
        self.exceptions.insert(key, index);
        Ok(())
    }

    /// Effective (σ, ε) of a pair, or `None` if the pair is excluded
    pub fn pair_parameters(&self, particle1: usize, particle2: usize) -> Option<(f64, f64)> {
        let n = self.num_particles();
        if particle1 == particle2 || particle1 >= n || particle2 >= n {
            return None;
        }
        match self.exception(particle1, particle2) {
            Some(exception) => exception.parameters,
            None => {
                let pair = self.mixed_pair(particle1, particle2);
                Some((pair.sigma, pair.epsilon))
            }
        }
    }

    /// Total energy and forces
    ///
    /// The forces are *added* to `forces`, which is left untouched if an error is returned.
    /// A periodic box is required with [`crate::NonbondedMethod::CutoffPeriodic`] and ignored otherwise.
    pub fn calculate(
        &self,
        positions: &[Vector3],
        periodic_box: Option<&PeriodicBox>,
        forces: &mut [Vector3],
    ) -> Result<f64, Error> {
        self.check(positions, periodic_box)?;
        if forces.len() != positions.len() {
            return Err(Error::ParticleCount {
                expected: positions.len(),
                found: forces.len(),
            });
        }
        let frames = self.frames(positions)?;
        let mut accumulator = self.sweep_default_pairs(&frames, positions, periodic_box)?;
        for pair in self.exception_pairs() {
            self.accumulate(&pair, &frames, positions, periodic_box, &mut accumulator)?;
        }

        for (index, gradient) in accumulator.frames.iter().enumerate() {
            gradient.backpropagate(
                index,
                &self.definition.particles[index],
                &frames[index],
                positions,
                &mut accumulator.positions,
            );
        }
        for (force, gradient) in forces.iter_mut().zip(&accumulator.positions) {
            *force -= gradient;
        }
        debug!(
            "evaluated {} pairs, energy = {}",
            accumulator.pair_count, accumulator.energy
        );
        Ok(accumulator.energy)
    }

    /// Total energy
    pub fn energy(
        &self,
        positions: &[Vector3],
        periodic_box: Option<&PeriodicBox>,
    ) -> Result<f64, Error> {
        let mut forces = vec![Vector3::zeros(); positions.len()];
        self.calculate(positions, periodic_box, &mut forces)
    }

    /// Every evaluated pair with its effective parameters and energy
    pub fn contributions(
        &self,
        positions: &[Vector3],
        periodic_box: Option<&PeriodicBox>,
    ) -> Result<Vec<PairContribution>, Error> {
        self.check(positions, periodic_box)?;
        let frames = self.frames(positions)?;
        self.default_pairs()
            .chain(self.exception_pairs())
            .filter_map(|pair| {
                self.evaluate(&pair, &frames, positions, periodic_box)
                    .transpose()
                    .map(|result| {
                        result.map(|(energy, _)| PairContribution {
                            particle1: pair.particle1,
                            particle2: pair.particle2,
                            sigma: pair.sigma,
                            epsilon: pair.epsilon,
                            energy,
                        })
                    })
            })
            .collect()
    }

    fn check(&self, positions: &[Vector3], periodic_box: Option<&PeriodicBox>) -> Result<(), Error> {
        if positions.len() != self.num_particles() {
            return Err(Error::ParticleCount {
                expected: self.num_particles(),
                found: positions.len(),
            });
        }
        if self.uses_periodic_boundary_conditions() {
            periodic_box
                .ok_or(Error::MissingBox)?
                .validate(self.definition.cutoff)?;
        }
        Ok(())
    }

    /// Frames of all particles at the given positions
    fn frames(&self, positions: &[Vector3]) -> Result<Vec<Frame>, Error> {
        #[cfg(feature = "parallel")]
        let indices = (0..self.num_particles()).into_par_iter();
        #[cfg(not(feature = "parallel"))]
        let indices = 0..self.num_particles();
        indices
            .map(|index| Frame::new(index, &self.definition.particles[index], positions))
            .collect()
    }

    fn exception(&self, particle1: usize, particle2: usize) -> Option<&Exception> {
        let key = (particle1.min(particle2), particle1.max(particle2));
        self.exceptions
            .get(&key)
            .map(|index| &self.definition.exceptions[*index])
    }

    fn mixed_pair(&self, particle1: usize, particle2: usize) -> Pair {
        let (a, b) = (
            &self.definition.particles[particle1],
            &self.definition.particles[particle2],
        );
        let (epsilon, sigma) = self
            .definition
            .combination_rule
            .mix((a.epsilon, b.epsilon), (a.sigma, b.sigma));
        Pair {
            particle1,
            particle2,
            sigma,
            epsilon,
        }
    }

    /// Pair interacting through the combination rule, if any
    fn default_pair(&self, particle1: usize, particle2: usize) -> Option<Pair> {
        if self.exceptions.contains_key(&(particle1, particle2)) {
            return None;
        }
        Some(self.mixed_pair(particle1, particle2)).filter(|pair| pair.epsilon != 0.0)
    }

    /// Pairs using the combination rule, in a fixed order
    fn default_pairs(&self) -> impl Iterator<Item = Pair> + '_ {
        (0..self.num_particles())
            .tuple_combinations()
            .filter_map(|(i, j)| self.default_pair(i, j))
    }

    /// Exceptions that carry parameters and a non-zero ε
    fn exception_pairs(&self) -> impl Iterator<Item = Pair> + '_ {
        self.definition
            .exceptions
            .iter()
            .filter(|exception| !exception.is_excluded())
            .filter_map(|exception| {
                exception.parameters.map(|(sigma, epsilon)| Pair {
                    particle1: exception.particle1,
                    particle2: exception.particle2,
                    sigma,
                    epsilon,
                })
            })
    }

    #[cfg(not(feature = "parallel"))]
    fn sweep_default_pairs(
        &self,
        frames: &[Frame],
        positions: &[Vector3],
        periodic_box: Option<&PeriodicBox>,
    ) -> Result<Accumulator, Error> {
        let mut accumulator = Accumulator::new(self.num_particles());
        for pair in self.default_pairs() {
            self.accumulate(&pair, frames, positions, periodic_box, &mut accumulator)?;
        }
        Ok(accumulator)
    }

    /// Each task sums into its own accumulator; the partial sums are merged at the end
    #[cfg(feature = "parallel")]
    fn sweep_default_pairs(
        &self,
        frames: &[Frame],
        positions: &[Vector3],
        periodic_box: Option<&PeriodicBox>,
    ) -> Result<Accumulator, Error> {
        let n = self.num_particles();
        (0..n)
            .into_par_iter()
            .try_fold(
                || Accumulator::new(n),
                |mut accumulator, i| {
                    for pair in (i + 1..n).filter_map(|j| self.default_pair(i, j)) {
                        self.accumulate(&pair, frames, positions, periodic_box, &mut accumulator)?;
                    }
                    Ok::<_, Error>(accumulator)
                },
            )
            .try_reduce(|| Accumulator::new(n), |a, b| Ok(a.merge(b)))
    }

    fn accumulate(
        &self,
        pair: &Pair,
        frames: &[Frame],
        positions: &[Vector3],
        periodic_box: Option<&PeriodicBox>,
        accumulator: &mut Accumulator,
    ) -> Result<(), Error> {
        if let Some((energy, gradient)) = self.evaluate(pair, frames, positions, periodic_box)? {
            accumulator.add(pair, energy, &gradient);
        }
        Ok(())
    }

    /// Energy and gradient of a single pair, or `None` if beyond the cutoff
    fn evaluate(
        &self,
        pair: &Pair,
        frames: &[Frame],
        positions: &[Vector3],
        periodic_box: Option<&PeriodicBox>,
    ) -> Result<Option<(f64, PairGradient)>, Error> {
        let (i, j) = (pair.particle1, pair.particle2);
        let Some(geometry) = PairGeometry::resolve(
            &positions[i],
            &positions[j],
            self.definition.nonbonded_method,
            self.definition.cutoff,
            periodic_box,
        ) else {
            return Ok(None);
        };
        let (a, b) = (self.oriented(i, frames), self.oriented(j, frames));
        let (mut energy, mut gradient) =
            GayBerne::new(pair.epsilon, pair.sigma).energy_and_gradient(&a, &b, &geometry.dr)?;
        if let Some(switching) = &self.switching {
            let (value, derivative) = switching.switch(geometry.distance);
            gradient *= value;
            gradient.dr += geometry.direction() * (energy * derivative);
            energy *= value;
        }
        Ok(Some((energy, gradient)))
    }

    fn oriented<'a>(&'a self, index: usize, frames: &'a [Frame]) -> Oriented<'a> {
        Oriented {
            index,
            ellipsoid: &self.definition.particles[index],
            frame: &frames[index],
            shape_factor: self.shape_factors[index],
        }
    }
}

impl Cutoff for GayBerneForce {
    fn cutoff(&self) -> f64 {
        if self.definition.nonbonded_method.uses_cutoff() {
            self.definition.cutoff
        } else {
            f64::INFINITY
        }
    }
}
