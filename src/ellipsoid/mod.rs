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

//! ## Ellipsoids
//!
//! Static ellipsoid parameters and the local coordinate frames derived from
//! particle positions.

mod frame;
mod particle;
pub use self::frame::{Frame, FrameGradient};
pub use self::particle::Ellipsoid;

/// An ellipsoid together with its current frame, as seen by a pair potential
#[derive(Clone, Copy, Debug)]
pub struct Oriented<'a> {
    /// Index of the particle
    pub index: usize,
    /// Static parameters
    pub ellipsoid: &'a Ellipsoid,
    /// Frame and shape matrices at the current positions
    pub frame: &'a Frame,
    /// Shape factor, s = (rₓr_y + r_z²)√(rₓr_y)
    pub shape_factor: f64,
}
