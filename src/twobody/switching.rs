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

use crate::Cutoff;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Quintic switching function that smoothly turns off an interaction
///
/// $$ S(x) = 1 - 10x^3 + 15x^4 - 6x^5, \quad x = \frac{r - r_s}{r_c - r_s} $$
///
/// for $r_s < r < r_c$, while $S = 1$ below $r_s$ and $S = 0$ beyond $r_c$.
/// Both the first and second derivatives vanish at $r_s$ and $r_c$.
///
/// # Examples
/// ~~~
/// use gayberne::twobody::Switching;
/// let switching = Switching::new(1.0, 2.0);
/// assert_eq!(switching.switch(0.5), (1.0, 0.0));
/// assert_eq!(switching.switch(1.5).0, 0.5);
/// ~~~
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Deserialize, Serialize))]
pub struct Switching {
    /// Distance where switching starts, r_s
    switching_distance: f64,
    /// Distance where the interaction vanishes, r_c
    cutoff: f64,
}

impl Switching {
    pub const fn new(switching_distance: f64, cutoff: f64) -> Self {
        Self {
            switching_distance,
            cutoff,
        }
    }

    /// Switching value, S(r), and its derivative, dS/dr
    #[inline]
    pub fn switch(&self, distance: f64) -> (f64, f64) {
        if distance <= self.switching_distance {
            return (1.0, 0.0);
        }
        if distance >= self.cutoff {
            return (0.0, 0.0);
        }
        let width = self.cutoff - self.switching_distance;
        let x = (distance - self.switching_distance) / width;
        let value = 1.0 + x * x * x * (-10.0 + x * (15.0 - 6.0 * x));
        let derivative = x * x * (-30.0 + x * (60.0 - 30.0 * x)) / width;
        (value, derivative)
    }
}

impl Cutoff for Switching {
    fn cutoff(&self) -> f64 {
        self.cutoff
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_switching() {
        let switching = Switching::new(1.0, 2.0);
        assert_eq!(switching.switch(2.0), (0.0, 0.0));
        assert_eq!(switching.switch(3.0), (0.0, 0.0));
        assert_eq!(switching.cutoff_squared(), 4.0);

        let (value, derivative) = switching.switch(1.5);
        assert_relative_eq!(value, 0.5);
        assert_relative_eq!(derivative, -1.875);

        // continuous at both ends
        let (value, derivative) = switching.switch(1.0 + 1e-9);
        assert_relative_eq!(value, 1.0, epsilon = 1e-12);
        assert_relative_eq!(derivative, 0.0, epsilon = 1e-12);
        let (value, derivative) = switching.switch(2.0 - 1e-9);
        assert_relative_eq!(value, 0.0, epsilon = 1e-12);
        assert_relative_eq!(derivative, 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_derivative() {
        const EPS: f64 = 1e-6;
        let switching = Switching::new(0.8, 1.1);
        for r in [0.85, 0.9, 1.0, 1.05] {
            let numerical = (switching.switch(r + EPS).0 - switching.switch(r - EPS).0) / (2.0 * EPS);
            assert_relative_eq!(switching.switch(r).1, numerical, epsilon = 1e-6);
        }
    }
}
