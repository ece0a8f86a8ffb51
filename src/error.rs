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

//! Errors raised while evaluating energies and forces.

use std::fmt::Display;
use thiserror::Error;

/// Combined shape matrix of a particle pair
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShapeMatrix {
    /// Size (steric) matrix, G₁₂ = G₁ + G₂
    Size,
    /// Range (anisotropy) matrix, B₁₂ = B₁ + B₂
    Range,
}

impl Display for ShapeMatrix {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Size => write!(f, "size (G12)"),
            Self::Range => write!(f, "range (B12)"),
        }
    }
}

/// Fatal error aborting an energy and force evaluation.
///
/// No partial energy is returned, and the caller's force array is left unchanged.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum Error {
    #[error("the periodic box size ({size}) has decreased to less than twice the nonbonded cutoff ({cutoff})")]
    BoxTooSmall { size: f64, cutoff: f64 },

    #[error("periodic box vectors are required with a periodic nonbonded method")]
    MissingBox,

    #[error("expected {expected} particles but got {found}")]
    ParticleCount { expected: usize, found: usize },

    #[error("degenerate geometry: particle {particle} has a zero-length frame axis (reference particles coincide or are collinear)")]
    DegenerateFrame { particle: usize },

    #[error("degenerate geometry: the {matrix} matrix of particles {particle1} and {particle2} is singular")]
    SingularMatrix {
        matrix: ShapeMatrix,
        particle1: usize,
        particle2: usize,
    },
}
