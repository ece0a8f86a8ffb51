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

//! Local coordinate frames and shape matrices.
//!
//! The frame of a particle depends on its own position and on the positions of
//! its reference particles. Gradients with respect to the shape matrices are
//! collected in a [`FrameGradient`] and pushed back onto those positions once all
//! pairs have been visited.

use super::Ellipsoid;
use crate::linalg::rotate_diagonal;
use crate::{Error, Matrix3, Vector3};

/// Orthonormal frame and shape matrices of an ellipsoid at the current positions
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    /// Rotation matrix, A, with the local x, y, and z axes as rows
    pub axes: Matrix3,
    /// Range matrix, B = Aᵀ diag(eₓ², e_y², e_z²) A
    pub range: Matrix3,
    /// Size matrix, G = Aᵀ diag(rₓ², r_y², r_z²) A
    pub size: Matrix3,
}

/// Unnormalized intermediates of the frame construction
struct Construction {
    x: Vector3,
    x_length: f64,
    /// Reference vector for the y-axis, before orthogonalization
    y_reference: Vector3,
    y: Vector3,
    y_length: f64,
}

impl Construction {
    fn new(
        index: usize,
        ellipsoid: &Ellipsoid,
        positions: &[Vector3],
    ) -> Option<Result<Self, Error>> {
        let x_particle = ellipsoid.x_particle?;
        let x = positions[index] - positions[x_particle];
        let x_length = x.norm();
        if !(x_length > 0.0 && x_length.is_finite()) {
            return Some(Err(Error::DegenerateFrame { particle: index }));
        }
        let xdir = x / x_length;
        let y_reference = match ellipsoid.y_particle {
            Some(y_particle) => positions[index] - positions[y_particle],
            // Arbitrary tie-break keeping the fallback axis away from xdir
            None if xdir.y > -0.5 && xdir.y < 0.5 => Vector3::y(),
            None => Vector3::x(),
        };
        let y = y_reference - xdir * xdir.dot(&y_reference);
        let y_length = y.norm();
        if !(y_length > f64::EPSILON * y_reference.norm() && y_length.is_finite()) {
            return Some(Err(Error::DegenerateFrame { particle: index }));
        }
        Some(Ok(Self {
            x,
            x_length,
            y_reference,
            y,
            y_length,
        }))
    }
}

impl Frame {
    /// Build the frame of particle `index` from the current positions
    ///
    /// Fails if the particle coincides with its x-reference, or if the
    /// y-reference vector is parallel to the x-axis.
    pub fn new(index: usize, ellipsoid: &Ellipsoid, positions: &[Vector3]) -> Result<Self, Error> {
        let (xdir, ydir) = match Construction::new(index, ellipsoid, positions).transpose()? {
            Some(c) => (c.x / c.x_length, c.y / c.y_length),
            None => (Vector3::x(), Vector3::y()),
        };
        let zdir = xdir.cross(&ydir);
        let axes = Matrix3::from_rows(&[xdir.transpose(), ydir.transpose(), zdir.transpose()]);
        Ok(Self {
            range: rotate_diagonal(&axes, &ellipsoid.scales_squared()),
            size: rotate_diagonal(&axes, &ellipsoid.radii_squared()),
            axes,
        })
    }

    /// Local x-axis
    pub fn xdir(&self) -> Vector3 {
        self.axes.row(0).transpose()
    }

    /// Local y-axis
    pub fn ydir(&self) -> Vector3 {
        self.axes.row(1).transpose()
    }

    /// Local z-axis
    pub fn zdir(&self) -> Vector3 {
        self.axes.row(2).transpose()
    }
}

/// Accumulated energy gradient with respect to the shape matrices of one particle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameGradient {
    /// ∂U/∂B
    pub range: Matrix3,
    /// ∂U/∂G
    pub size: Matrix3,
}

impl Default for FrameGradient {
    fn default() -> Self {
        Self {
            range: Matrix3::zeros(),
            size: Matrix3::zeros(),
        }
    }
}

impl std::ops::AddAssign for FrameGradient {
    fn add_assign(&mut self, other: Self) {
        self.range += other.range;
        self.size += other.size;
    }
}

impl FrameGradient {
    /// Add the chain-rule contribution of this gradient to the position gradient, ∂U/∂𝒓.
    ///
    /// The gradient flows through B = AᵀDA and G = AᵀDA onto the rows of A, then
    /// through z = x × y, the Gram-Schmidt step, and the two normalizations onto
    /// the particle and its reference particles. Frames without an x-reference
    /// are fixed and receive nothing.
    pub fn backpropagate(
        &self,
        index: usize,
        ellipsoid: &Ellipsoid,
        frame: &Frame,
        positions: &[Vector3],
        gradient: &mut [Vector3],
    ) {
        let (Some(x_particle), Some(Ok(c))) = (
            ellipsoid.x_particle,
            Construction::new(index, ellipsoid, positions),
        ) else {
            return;
        };

        // ∂U/∂A = D_e A (Γ_B + Γ_Bᵀ) + D_r A (Γ_G + Γ_Gᵀ), row by row
        let range = self.range + self.range.transpose();
        let size = self.size + self.size.transpose();
        let (e2, r2) = (ellipsoid.scales_squared(), ellipsoid.radii_squared());
        let row_gradient = |k: usize, axis: Vector3| (range * e2[k] + size * r2[k]) * axis;

        let (xdir, ydir, zdir) = (frame.xdir(), frame.ydir(), frame.zdir());
        let mut grad_x = row_gradient(0, xdir);
        let mut grad_y = row_gradient(1, ydir);
        let grad_z = row_gradient(2, zdir);

        // z = x × y
        grad_x += ydir.cross(&grad_z);
        grad_y += grad_z.cross(&xdir);

        // ydir = y / |y|
        let grad_y = (grad_y - ydir * ydir.dot(&grad_y)) / c.y_length;

        // y = y_ref - xdir (xdir · y_ref)
        let projection = xdir.dot(&c.y_reference);
        let grad_y_reference = grad_y - xdir * xdir.dot(&grad_y);
        grad_x -= grad_y * projection + c.y_reference * xdir.dot(&grad_y);

        if let Some(y_particle) = ellipsoid.y_particle {
            gradient[index] += grad_y_reference;
            gradient[y_particle] -= grad_y_reference;
        }

        // xdir = x / |x|
        let grad_x = (grad_x - xdir * xdir.dot(&grad_x)) / c.x_length;
        gradient[index] += grad_x;
        gradient[x_particle] -= grad_x;
    }
}
