// src/dag/curve.rs

//! Per-layer node capacity derived from a quadratic through three control
//! points: `(0, y0)`, `(max_layer / 2, y_mid)` and `(max_layer, y_max)`.

use serde::Serialize;

use crate::errors::{DagSynthError, Result};

const PIVOT_EPSILON: f64 = 1e-12;

/// Upper bound on the number of nodes a layer may hold.
///
/// Implementations must return at least 1.
pub trait LayerCapacity {
    fn capacity(&self, layer: usize) -> usize;
}

impl<F> LayerCapacity for F
where
    F: Fn(usize) -> usize,
{
    fn capacity(&self, layer: usize) -> usize {
        self(layer).max(1)
    }
}

/// Control points of the node-count curve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CurvePoints {
    pub max_layer: i64,
    pub y0: f64,
    pub y_mid: f64,
    pub y_max: f64,
}

impl CurvePoints {
    /// Points used by the `generate` command: three nodes at the top layer,
    /// `layer_node / 2` halfway down and `layer_node` at `max_layer`.
    pub fn from_layer_node(max_layer: i64, layer_node: u32) -> Self {
        Self {
            max_layer,
            y0: 3.0,
            y_mid: f64::from(layer_node) / 2.0,
            y_max: f64::from(layer_node),
        }
    }
}

/// `f(x) = a·x² + b·x + c`, fitted exactly through three points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NodeCountCurve {
    a: f64,
    b: f64,
    c: f64,
}

impl NodeCountCurve {
    /// Solve the 3×3 Vandermonde system for the given control points.
    ///
    /// Fails with [`DagSynthError::SingularSystem`] when `max_layer <= 0`.
    pub fn fit(points: CurvePoints) -> Result<Self> {
        if points.max_layer <= 0 {
            return Err(DagSynthError::SingularSystem {
                max_layer: points.max_layer,
            });
        }

        let x_max = points.max_layer as f64;
        let x_mid = x_max / 2.0;
        let rows = [
            [1.0, 0.0, 0.0, points.y0],
            [1.0, x_mid, x_mid * x_mid, points.y_mid],
            [1.0, x_max, x_max * x_max, points.y_max],
        ];

        let [c, b, a] = solve3(rows).ok_or(DagSynthError::SingularSystem {
            max_layer: points.max_layer,
        })?;

        Ok(Self { a, b, c })
    }

    pub fn coefficients(&self) -> (f64, f64, f64) {
        (self.a, self.b, self.c)
    }

    /// Raw curve value; may be negative or non-monotonic.
    pub fn eval(&self, x: f64) -> f64 {
        self.a * x * x + self.b * x + self.c
    }
}

impl LayerCapacity for NodeCountCurve {
    fn capacity(&self, layer: usize) -> usize {
        let rounded = self.eval(layer as f64).round_ties_even();
        if rounded < 1.0 { 1 } else { rounded as usize }
    }
}

/// Gaussian elimination with partial pivoting on an augmented 3×4 matrix.
fn solve3(mut m: [[f64; 4]; 3]) -> Option<[f64; 3]> {
    for col in 0..3 {
        let pivot_row = (col..3).max_by(|&i, &j| m[i][col].abs().total_cmp(&m[j][col].abs()))?;
        if m[pivot_row][col].abs() < PIVOT_EPSILON {
            return None;
        }
        m.swap(col, pivot_row);

        for row in (col + 1)..3 {
            let factor = m[row][col] / m[col][col];
            for k in col..4 {
                m[row][k] -= factor * m[col][k];
            }
        }
    }

    let mut x = [0.0; 3];
    for row in (0..3).rev() {
        let tail: f64 = ((row + 1)..3).map(|k| m[row][k] * x[k]).sum();
        x[row] = (m[row][3] - tail) / m[row][row];
    }
    Some(x)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn points(max_layer: i64, y0: f64, y_mid: f64, y_max: f64) -> CurvePoints {
        CurvePoints {
            max_layer,
            y0,
            y_mid,
            y_max,
        }
    }

    #[test]
    fn fit_passes_through_control_points() {
        let curve = NodeCountCurve::fit(points(100, 3.0, 5.0, 10.0)).unwrap();
        assert!((curve.eval(0.0) - 3.0).abs() < 1e-6);
        assert!((curve.eval(50.0) - 5.0).abs() < 1e-6);
        assert!((curve.eval(100.0) - 10.0).abs() < 1e-6);
    }

    #[test]
    fn odd_max_layer_uses_fractional_midpoint() {
        let curve = NodeCountCurve::fit(points(3, 3.0, 1.5, 3.0)).unwrap();
        assert!((curve.eval(1.5) - 1.5).abs() < 1e-9);
        assert!((curve.eval(3.0) - 3.0).abs() < 1e-9);
    }

    #[test]
    fn non_positive_max_layer_is_singular() {
        for max_layer in [0, -4] {
            match NodeCountCurve::fit(points(max_layer, 3.0, 5.0, 10.0)) {
                Err(DagSynthError::SingularSystem { max_layer: got }) => assert_eq!(got, max_layer),
                other => panic!("expected SingularSystem, got {other:?}"),
            }
        }
    }

    #[test]
    fn capacity_is_clamped_to_one() {
        // Dips well below zero between the endpoints.
        let curve = NodeCountCurve::fit(points(10, 1.0, -50.0, 1.0)).unwrap();
        assert!(curve.eval(5.0) < 0.0);
        assert_eq!(curve.capacity(5), 1);
        assert_eq!(curve.capacity(0), 1);
    }

    #[test]
    fn capacity_rounds_half_to_even() {
        let flat = NodeCountCurve::fit(points(4, 2.5, 2.5, 2.5)).unwrap();
        assert_eq!(flat.capacity(2), 2);

        let flat = NodeCountCurve::fit(points(4, 3.5, 3.5, 3.5)).unwrap();
        assert_eq!(flat.capacity(2), 4);
    }

    #[test]
    fn closures_are_capacities() {
        let zero = |_layer: usize| 0usize;
        assert_eq!(zero.capacity(7), 1);
        let wide = |layer: usize| layer + 2;
        assert_eq!(wide.capacity(3), 5);
    }
}
