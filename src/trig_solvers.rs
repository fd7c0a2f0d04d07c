//! Solvers for a·sinθ + b·cosθ + c compared against a constant, over one
//! turn of the circle.
//!
//! Everything reduces through the tangent half-angle substitution
//! t = tan(θ/2): the sin/cos linear form becomes the rational quadratic
//! ((c−f)−b)t² + 2at + ((c−f)+b), whose sign set on the real line lifts
//! back to arcs via θ = 2·atan t. The point θ = π (t = ∞) needs separate
//! care wherever the quadratic degenerates.

use std::f64::consts::PI;

use crate::angular_interval::{AngularInterval, AngularIntervalSet};
use crate::quadratic::Quadratic;

/// All θ in (-π, π] with a·sinθ + b·cosθ + c = f.
pub(crate) fn solve_sin_cos_eq(a: f64, b: f64, c: f64, f: f64) -> Vec<f64> {
    let cf = c - f;
    let roots = Quadratic::new(cf - b, 2.0 * a, cf + b).solve(0.0);
    let mut res: Vec<f64> = roots.v.iter().map(|t| 2.0 * t.atan()).collect();
    // A vanishing leading coefficient means the form is zero at θ = π, a
    // point the half-angle parameterization cannot reach.
    if roots.order < 2 && roots.n != -1 {
        res.push(PI);
    }
    res
}

/// The set of θ in (-π, π] with a·sinθ + b·cosθ + c ≤ f.
pub(crate) fn solve_sin_cos_leq(a: f64, b: f64, c: f64, f: f64) -> AngularIntervalSet {
    let cf = c - f;
    let q = Quadratic::new(cf - b, 2.0 * a, cf + b);
    let mut res = AngularIntervalSet::new();
    for (t1, t2) in q.solve_leq(0.0) {
        // atan(±∞) is exactly ±π/2, so unbounded intervals lift to arcs
        // pinned at ∓π.
        res.insert(AngularInterval::new(2.0 * t1.atan(), 2.0 * t2.atan()));
    }
    res
}

/// The set of θ in (-π, π] with a·sinθ + b·cosθ + c ≥ f.
pub(crate) fn solve_sin_cos_geq(a: f64, b: f64, c: f64, f: f64) -> AngularIntervalSet {
    solve_sin_cos_leq(-a, -b, -c, -f)
}
