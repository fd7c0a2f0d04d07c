//! Feasible-ψ computation for joint equations of the two closed forms
//! produced by the Rodrigues parameterization:
//!
//! - tan type: θ(ψ) = atan2(L·(sinψ, cosψ, 1), R·(sinψ, cosψ, 1)),
//! - cos type: θ(ψ) = arccos(F·(sinψ, cosψ, 1)).
//!
//! Both carry a two-fold branch ambiguity: the joint triples around a
//! spherical joint admit a mirrored solution in which the middle (cos-type)
//! joint flips sign and the two tan-type numerator/denominator pairs are
//! negated. Each solver therefore returns a pair of sets, one per branch
//! sign, which the caller intersects triple-wise.

use std::f64::consts::PI;

use crate::angular_interval::{AngularInterval, AngularIntervalSet};
use crate::round_eps;
use crate::trig_solvers::{solve_sin_cos_geq, solve_sin_cos_leq};

/// ψ-set on which the branch's angle satisfies θ ≤ u, within the
/// half-circle selected by `s2` (sign of sinθ) for the branch selected by
/// `s1` (sign of the hidden common factor of numerator and denominator).
///
/// For bounds strictly inside the half-circle, θ ≤ u reduces to
/// s₁s₂·(cot(u)·L(ψ) − R(ψ)) ≤ 0. Bounds at the half-circle ends make the
/// constraint empty or vacuous; on the negative half the wrap endpoint is
/// represented as -π.
pub(crate) fn solve_quadrant_leq(
    s1: f64,
    s2: f64,
    lhs: &[f64; 3],
    rhs: &[f64; 3],
    u: f64,
) -> AngularIntervalSet {
    if (s2 < 0.0 && u == -PI) || (s2 > 0.0 && u == 0.0) {
        return AngularIntervalSet::new();
    }
    if (s2 < 0.0 && u == 0.0) || (s2 > 0.0 && u == PI) {
        return AngularIntervalSet::full();
    }
    let s = s1 * s2;
    let v = 1.0 / u.tan();
    let a = round_eps(s * (v * lhs[0] - rhs[0]));
    let b = round_eps(s * (v * lhs[1] - rhs[1]));
    let c = round_eps(s * (v * lhs[2] - rhs[2]));
    solve_sin_cos_leq(a, b, c, 0.0)
}

/// Lower-bound companion of [`solve_quadrant_leq`]: θ ≥ l.
pub(crate) fn solve_quadrant_geq(
    s1: f64,
    s2: f64,
    lhs: &[f64; 3],
    rhs: &[f64; 3],
    l: f64,
) -> AngularIntervalSet {
    if (s2 < 0.0 && l == -PI) || (s2 > 0.0 && l == 0.0) {
        return AngularIntervalSet::full();
    }
    if (s2 < 0.0 && l == 0.0) || (s2 > 0.0 && l == PI) {
        return AngularIntervalSet::new();
    }
    let s = s1 * s2;
    let v = 1.0 / l.tan();
    let a = round_eps(s * (v * lhs[0] - rhs[0]));
    let b = round_eps(s * (v * lhs[1] - rhs[1]));
    let c = round_eps(s * (v * lhs[2] - rhs[2]));
    solve_sin_cos_geq(a, b, c, 0.0)
}

/// ψ-set on which the (s1, s2) branch keeps θ inside `within` (arcs of one
/// half-circle). The numerator sign constraint s₁s₂·L(ψ) ≥ 0 confines ψ to
/// the half-circle actually realized by this branch.
pub(crate) fn solve_quadrant(
    s1: f64,
    s2: f64,
    lhs: &[f64; 3],
    rhs: &[f64; 3],
    within: &AngularIntervalSet,
) -> AngularIntervalSet {
    if within.is_empty() {
        return AngularIntervalSet::new();
    }
    let s = s1 * s2;
    let sign_set = solve_sin_cos_geq(s * lhs[0], s * lhs[1], s * lhs[2], 0.0);
    let mut bounded = AngularIntervalSet::new();
    for arc in within.arcs() {
        let from_l = solve_quadrant_geq(s1, s2, lhs, rhs, arc.lower());
        let to_u = solve_quadrant_leq(s1, s2, lhs, rhs, arc.upper());
        bounded.union_with(&(from_l & to_u));
    }
    sign_set & bounded
}

/// Feasible ψ-sets of a tan-type joint against its limit arcs, returned as
/// (negative branch, positive branch).
pub(crate) fn solve_tan_type(
    lhs: &[f64; 3],
    rhs: &[f64; 3],
    within: &AngularIntervalSet,
) -> (AngularIntervalSet, AngularIntervalSet) {
    let neg = AngularIntervalSet::from(AngularInterval::new(-PI, 0.0)) & within.clone();
    let pos = AngularIntervalSet::from(AngularInterval::new(0.0, PI)) & within.clone();
    let r1 = solve_quadrant(1.0, 1.0, lhs, rhs, &pos);
    let r4 = solve_quadrant(1.0, -1.0, lhs, rhs, &neg);
    let r2 = solve_quadrant(-1.0, 1.0, lhs, rhs, &pos);
    let r3 = solve_quadrant(-1.0, -1.0, lhs, rhs, &neg);
    (r2 | r3, r1 | r4)
}

fn cos_type_bounds(
    coeffs: &[f64; 3],
    l: Option<f64>,
    u: Option<f64>,
) -> AngularIntervalSet {
    let to_u = match u {
        Some(u) => solve_sin_cos_leq(coeffs[0], coeffs[1], coeffs[2], u.cos()),
        None => AngularIntervalSet::full(),
    };
    let from_l = match l {
        Some(l) => solve_sin_cos_geq(coeffs[0], coeffs[1], coeffs[2], l.cos()),
        None => AngularIntervalSet::full(),
    };
    to_u & from_l
}

/// Feasible ψ-sets of a cos-type joint against its limit arcs, returned as
/// (negative branch, positive branch).
///
/// A symmetric open neighborhood (-σ, σ) of zero is excluded first: inside
/// it the joint is algorithmically singular and handled elsewhere. On each
/// side, θ ∈ [l, u] maps to a two-sided bound on cosθ through the
/// monotonicity of cos on that half; bounds that degenerate to 0 or ±π are
/// dropped rather than pushed through the half-angle substitution.
pub(crate) fn solve_cos_type(
    coeffs: &[f64; 3],
    within: &AngularIntervalSet,
    singular_bound: f64,
) -> (AngularIntervalSet, AngularIntervalSet) {
    let in_neg =
        AngularIntervalSet::from(AngularInterval::new(-PI, -singular_bound)) & within.clone();
    let in_pos =
        AngularIntervalSet::from(AngularInterval::new(singular_bound, PI)) & within.clone();
    let mut res_neg = AngularIntervalSet::new();
    for arc in in_neg.arcs() {
        let l = (arc.lower() != -PI).then_some(arc.lower());
        let u = (arc.upper() != 0.0).then_some(arc.upper());
        res_neg.union_with(&cos_type_bounds(coeffs, l, u));
    }
    let mut res_pos = AngularIntervalSet::new();
    for arc in in_pos.arcs() {
        let l = (arc.upper() != PI).then_some(arc.upper());
        let u = (arc.lower() != 0.0).then_some(arc.lower());
        res_pos.union_with(&cos_type_bounds(coeffs, l, u));
    }
    (res_neg, res_pos)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const SB: f64 = 5e-5;

    fn limit(l: f64, u: f64) -> AngularIntervalSet {
        AngularInterval::new(l, u).into()
    }

    // With L = (1, 0, 0) and R = (0, 1, 0) the positive branch angle is
    // atan2(sinψ, cosψ) = ψ itself, and the negative branch is its
    // antipode.
    const L_ID: [f64; 3] = [1.0, 0.0, 0.0];
    const R_ID: [f64; 3] = [0.0, 1.0, 0.0];

    #[test]
    fn tan_type_identity_map() {
        let (neg, pos) = solve_tan_type(&L_ID, &R_ID, &limit(-1.0, 2.0));
        assert_eq!(pos.arcs().len(), 1);
        // Coefficient rounding on the EPS grid nudges the cut points.
        assert_relative_eq!(pos.arcs()[0].lower(), -1.0, epsilon = 1e-6);
        assert_relative_eq!(pos.arcs()[0].upper(), 2.0, epsilon = 1e-6);
        // Antipodal branch: ψ ∓ π lands in the limit arc.
        assert!(neg.contains(2.1416 + 0.5));
        assert!(neg.contains(-3.0));
        assert!(!neg.contains(0.0));
        assert_relative_eq!(neg.measure(), 3.0, epsilon = 1e-3);
    }

    #[test]
    fn tan_type_full_limits_cover_the_circle() {
        let (neg, pos) = solve_tan_type(&L_ID, &R_ID, &AngularIntervalSet::full());
        let both = neg | pos;
        assert_relative_eq!(both.measure(), 2.0 * PI, epsilon = 1e-6);
    }

    #[test]
    fn cos_type_identity_map() {
        // F = (0, 1, 0): cos-form is cosψ, so the positive-branch angle is
        // |ψ|.
        let f = [0.0, 1.0, 0.0];
        let (neg, pos) = solve_cos_type(&f, &limit(0.5, 1.5), SB);
        assert!(neg.is_empty());
        assert_eq!(pos.arcs().len(), 2);
        assert_relative_eq!(pos.arcs()[0].lower(), -1.5, epsilon = 1e-9);
        assert_relative_eq!(pos.arcs()[0].upper(), -0.5, epsilon = 1e-9);
        assert_relative_eq!(pos.arcs()[1].lower(), 0.5, epsilon = 1e-9);
        assert_relative_eq!(pos.arcs()[1].upper(), 1.5, epsilon = 1e-9);
    }

    #[test]
    fn cos_type_negative_half() {
        let f = [0.0, 1.0, 0.0];
        let (neg, pos) = solve_cos_type(&f, &limit(-1.5, -0.5), SB);
        assert!(pos.is_empty());
        assert!(neg.contains(1.0));
        assert!(neg.contains(-1.0));
        assert!(!neg.contains(0.0));
        assert!(!neg.contains(2.0));
    }

    #[test]
    fn cos_type_unions_across_split_limits() {
        // A limit set with one arc per half must keep both results.
        let f = [0.0, 1.0, 0.0];
        let mut both_halves = limit(0.5, 1.5);
        both_halves.union_with(&limit(-2.5, -2.0));
        let (neg, pos) = solve_cos_type(&f, &both_halves, SB);
        assert!(!pos.is_empty());
        assert!(!neg.is_empty());
        assert!(neg.contains(2.2));
        assert!(pos.contains(1.0));
    }

    #[test]
    fn quadrant_bounds_collapse_at_the_half_circle_ends() {
        assert!(solve_quadrant_leq(1.0, 1.0, &L_ID, &R_ID, 0.0).is_empty());
        assert!(solve_quadrant_leq(1.0, 1.0, &L_ID, &R_ID, PI).arcs()[0].is_full());
        assert!(solve_quadrant_geq(1.0, -1.0, &L_ID, &R_ID, -PI).arcs()[0].is_full());
        assert!(solve_quadrant_geq(1.0, -1.0, &L_ID, &R_ID, 0.0).is_empty());
    }
}
