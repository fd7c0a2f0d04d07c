//! Closed-form kinematics for a 7 degree-of-freedom S-R-S manipulator
//! (spherical shoulder, revolute elbow, spherical wrist).
//!
//! The arm is redundant: a 6-D end-effector pose leaves one degree of
//! freedom free, the *arm angle* ψ (rotation of the elbow about the
//! shoulder-to-wrist line). [`Kine7::inverse`] computes, for every elbow
//! root, the set of arm angles compatible with all seven joint limits as a
//! union of arcs on the circle, packaged as a [`SelfMotion`] that maps any
//! admissible ψ back to full joint vectors.

pub mod angular_interval;
pub mod dh;
mod feasibility;
pub mod kine7;
pub mod quadratic;
pub mod self_motion;
mod trig_solvers;

pub use angular_interval::{AngularInterval, AngularIntervalSet, wrap_angle};
pub use kine7::Kine7;
pub use quadratic::Quadratic;
pub use self_motion::{SelfMotion, SingularityHandler};

/// Rounding quantum for the numeric pipeline.
///
/// Coefficients are snapped to multiples of this value before any
/// order/discriminant classification, so that nearly-zero terms become
/// exactly zero and the quadratic solver's case analysis stays stable. It
/// must stay far below the square of the singularity threshold: arccos
/// amplifies a quantum-sized perturbation of a near-unit cosine into an
/// angle of √(2·EPS), and that angle has to remain inside the singular
/// detection band.
pub const EPS: f64 = 1e-10;

/// Snap a value onto the `EPS` grid (`x - x mod EPS`).
pub(crate) fn round_eps(x: f64) -> f64 {
    x - x % EPS
}
