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

//! Closed-form 3x3 matrix algebra.
//!
//! The shape matrices are inverted once per pair, so the cofactor expressions
//! are written out explicitly. Singular input is reported as `None` instead of
//! producing non-finite entries.

use crate::Matrix3;

/// Determinant by cofactor expansion along the first row
#[inline]
pub fn determinant(m: &Matrix3) -> f64 {
    m[(0, 0)] * (m[(1, 1)] * m[(2, 2)] - m[(1, 2)] * m[(2, 1)])
        - m[(0, 1)] * (m[(1, 0)] * m[(2, 2)] - m[(1, 2)] * m[(2, 0)])
        + m[(0, 2)] * (m[(1, 0)] * m[(2, 1)] - m[(1, 1)] * m[(2, 0)])
}

/// Inverse and determinant of a 3x3 matrix from its adjugate.
///
/// Returns `None` if the determinant is not finite or vanishes relative to
/// the magnitude of the matrix, |det| ≤ ϵ‖M‖³ (Frobenius norm).
pub fn inverse(m: &Matrix3) -> Option<(Matrix3, f64)> {
    let c00 = m[(1, 1)] * m[(2, 2)] - m[(1, 2)] * m[(2, 1)];
    let c01 = m[(1, 2)] * m[(2, 0)] - m[(1, 0)] * m[(2, 2)];
    let c02 = m[(1, 0)] * m[(2, 1)] - m[(1, 1)] * m[(2, 0)];
    let det = m[(0, 0)] * c00 + m[(0, 1)] * c01 + m[(0, 2)] * c02;
    if !det.is_finite() || det.abs() <= f64::EPSILON * m.norm().powi(3) {
        return None;
    }
    let c10 = m[(0, 2)] * m[(2, 1)] - m[(0, 1)] * m[(2, 2)];
    let c11 = m[(0, 0)] * m[(2, 2)] - m[(0, 2)] * m[(2, 0)];
    let c12 = m[(0, 1)] * m[(2, 0)] - m[(0, 0)] * m[(2, 1)];
    let c20 = m[(0, 1)] * m[(1, 2)] - m[(0, 2)] * m[(1, 1)];
    let c21 = m[(0, 2)] * m[(1, 0)] - m[(0, 0)] * m[(1, 2)];
    let c22 = m[(0, 0)] * m[(1, 1)] - m[(0, 1)] * m[(1, 0)];
    // adjugate is the transposed cofactor matrix
    let adjugate = Matrix3::new(c00, c10, c20, c01, c11, c21, c02, c12, c22);
    Some((adjugate / det, det))
}

/// Rotates a diagonal matrix into the global frame, AᵀDA, where the rows of `axes` are the local axes
#[inline]
pub fn rotate_diagonal(axes: &Matrix3, diagonal: &crate::Vector3) -> Matrix3 {
    axes.transpose() * Matrix3::from_diagonal(diagonal) * axes
}
