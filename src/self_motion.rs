use std::f64::consts::PI;

use nalgebra::{Matrix3, SVector, Vector3};
use tracing::trace;

use crate::EPS;
use crate::angular_interval::{AngularInterval, AngularIntervalSet};

const TAU: f64 = 2.0 * PI;

// -----------------------------------------------------------------------------
// SingularityHandler: redundancy resolution when a spherical joint aligns
// -----------------------------------------------------------------------------

/// Splits a joint-angle sum into its two members when the enclosed joint is
/// aligned (shoulder θ₂ ≈ 0 or wrist θ₆ ≈ 0) and only the sum is
/// determined by the kinematics.
///
/// The handler remembers the last commanded joint vector and allocates the
/// required change proportionally to each member's remaining travel toward
/// its limit on the side the change moves it. Each consumer of sampled
/// joints should own one handler and keep it updated via
/// [`update_current_joints`](Self::update_current_joints).
#[derive(Debug, Clone)]
pub struct SingularityHandler {
    joint_limits: [AngularInterval; 7],
    current_joints: SVector<f64, 7>,
}

impl SingularityHandler {
    pub fn new(joint_limits: [AngularInterval; 7]) -> Self {
        Self { joint_limits, current_joints: SVector::zeros() }
    }

    pub fn update_current_joints(&mut self, q: &SVector<f64, 7>) {
        self.current_joints = *q;
    }

    /// Split θ₁ + θ₃ = `t13` into (θ₁, θ₃).
    pub fn get_upper_joints(&self, t13: f64) -> (f64, f64) {
        self.split(t13, 0, 2)
    }

    /// Split θ₅ + θ₇ = `t57` into (θ₅, θ₇).
    pub fn get_lower_joints(&self, t57: f64) -> (f64, f64) {
        self.split(t57, 4, 6)
    }

    fn split(&self, sum: f64, i: usize, j: usize) -> (f64, f64) {
        let t = self.current_joints[i];
        let tt = self.current_joints[j];
        let (l, u) = (self.joint_limits[i].lower(), self.joint_limits[i].upper());
        let (ll, uu) = (self.joint_limits[j].lower(), self.joint_limits[j].upper());
        // Travel toward the limit boundary on the side the sum moves us;
        // wrapped through 2π when the current angle sits past the boundary.
        let (d, dd) = if sum < t + tt {
            (
                if t > l { t - l } else { t - l + TAU },
                if tt > ll { tt - ll } else { tt - ll + TAU },
            )
        } else {
            (
                if u > t { u - t } else { u - t + TAU },
                if uu > tt { uu - tt } else { uu - tt + TAU },
            )
        };
        let delta = sum - t - tt;
        let alpha = d / (d + dd);
        trace!(alpha, delta, "splitting aligned joint pair");
        (t + alpha * delta, tt + (1.0 - alpha) * delta)
    }
}

// -----------------------------------------------------------------------------
// SelfMotion: one elbow branch of the inverse solution
// -----------------------------------------------------------------------------

/// The self-motion manifold of one elbow root: the feasible arm-angle set
/// together with the Rodrigues coefficient matrices that map any ψ to
/// joint angles in closed form.
///
/// Immutable once built, and self-contained: sampling does not need the
/// [`Kine7`](crate::Kine7) that produced it.
#[derive(Debug, Clone)]
pub struct SelfMotion {
    phi: AngularIntervalSet,
    theta4: f64,
    a_s: Matrix3<f64>,
    b_s: Matrix3<f64>,
    c_s: Matrix3<f64>,
    a_w: Matrix3<f64>,
    b_w: Matrix3<f64>,
    c_w: Matrix3<f64>,
    joint_limits: [AngularInterval; 7],
    singular_bound: f64,
}

/// Evaluate a coefficient triple at (sinψ, cosψ, 1).
fn at(a: &Matrix3<f64>, b: &Matrix3<f64>, c: &Matrix3<f64>, r: usize, col: usize, sp: f64, cp: f64) -> f64 {
    a[(r, col)] * sp + b[(r, col)] * cp + c[(r, col)]
}

impl SelfMotion {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        phi: AngularIntervalSet,
        theta4: f64,
        a_s: Matrix3<f64>,
        b_s: Matrix3<f64>,
        c_s: Matrix3<f64>,
        a_w: Matrix3<f64>,
        b_w: Matrix3<f64>,
        c_w: Matrix3<f64>,
        joint_limits: [AngularInterval; 7],
        singular_bound: f64,
    ) -> Self {
        Self { phi, theta4, a_s, b_s, c_s, a_w, b_w, c_w, joint_limits, singular_bound }
    }

    /// Arm angles for which all seven joints stay within their limits.
    pub fn arm_angle_range(&self) -> &AngularIntervalSet {
        &self.phi
    }

    /// The elbow angle θ₄ shared by every sample of this branch.
    pub fn elbow_joint(&self) -> f64 {
        self.theta4
    }

    /// Joint vectors realizing this branch at arm angle ψ.
    ///
    /// Away from the shoulder and wrist singularities each spherical joint
    /// contributes two mirrored triples, so up to four candidates are
    /// formed; the joint-limit filter decides what survives. At a
    /// singularity the handler splits the determined sum instead and only
    /// one triple is produced for that side.
    pub fn get_joints(
        &self,
        arm_angle: f64,
        handler: &SingularityHandler,
    ) -> Vec<SVector<f64, 7>> {
        let sp = arm_angle.sin();
        let cp = arm_angle.cos();

        let mut shoulder: Vec<Vector3<f64>> = Vec::with_capacity(2);
        let c2 = -at(&self.a_s, &self.b_s, &self.c_s, 2, 1, sp, cp);
        let t2 = if c2 <= 1.0 { c2.acos() } else { 0.0 };
        if t2.abs() <= self.singular_bound + EPS {
            let t13 = at(&self.a_s, &self.b_s, &self.c_s, 1, 0, sp, cp)
                .atan2(at(&self.a_s, &self.b_s, &self.c_s, 0, 0, sp, cp));
            let (t1, t3) = handler.get_upper_joints(t13);
            shoulder.push(Vector3::new(t1, t2, t3));
        } else {
            let s1 = -at(&self.a_s, &self.b_s, &self.c_s, 1, 1, sp, cp);
            let c1 = -at(&self.a_s, &self.b_s, &self.c_s, 0, 1, sp, cp);
            let mut t1 = s1.atan2(c1);
            let s3 = at(&self.a_s, &self.b_s, &self.c_s, 2, 2, sp, cp);
            let c3 = -at(&self.a_s, &self.b_s, &self.c_s, 2, 0, sp, cp);
            let mut t3 = s3.atan2(c3);
            shoulder.push(Vector3::new(t1, t2, t3));
            t1 = if t1 > 0.0 { t1 - PI } else { t1 + PI };
            t3 = if t3 > 0.0 { t3 - PI } else { t3 + PI };
            shoulder.push(Vector3::new(t1, -t2, t3));
        }

        let mut wrist: Vec<Vector3<f64>> = Vec::with_capacity(2);
        let c6 = at(&self.a_w, &self.b_w, &self.c_w, 2, 2, sp, cp);
        let t6 = if c6 <= 1.0 { c6.acos() } else { 0.0 };
        if t6.abs() <= self.singular_bound + EPS {
            let t57 = at(&self.a_w, &self.b_w, &self.c_w, 1, 0, sp, cp)
                .atan2(at(&self.a_w, &self.b_w, &self.c_w, 0, 0, sp, cp));
            let (t5, t7) = handler.get_lower_joints(t57);
            wrist.push(Vector3::new(t5, t6, t7));
        } else {
            let s5 = at(&self.a_w, &self.b_w, &self.c_w, 1, 2, sp, cp);
            let c5 = at(&self.a_w, &self.b_w, &self.c_w, 0, 2, sp, cp);
            let mut t5 = s5.atan2(c5);
            let s7 = at(&self.a_w, &self.b_w, &self.c_w, 2, 1, sp, cp);
            let c7 = -at(&self.a_w, &self.b_w, &self.c_w, 2, 0, sp, cp);
            let mut t7 = s7.atan2(c7);
            wrist.push(Vector3::new(t5, t6, t7));
            t5 = if t5 > 0.0 { t5 - PI } else { t5 + PI };
            t7 = if t7 > 0.0 { t7 - PI } else { t7 + PI };
            wrist.push(Vector3::new(t5, -t6, t7));
        }

        let mut joints = Vec::with_capacity(shoulder.len() * wrist.len());
        for s in &shoulder {
            for w in &wrist {
                let q = SVector::<f64, 7>::from_column_slice(&[
                    s.x, s.y, s.z, self.theta4, w.x, w.y, w.z,
                ]);
                if self.within_limits(&q) {
                    joints.push(q);
                }
            }
        }
        joints
    }

    fn within_limits(&self, q: &SVector<f64, 7>) -> bool {
        self.joint_limits
            .iter()
            .zip(q.iter())
            .all(|(limit, &qi)| limit.contains(qi))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn default_limits() -> [AngularInterval; 7] {
        [
            AngularInterval::new(-2.62, 2.62),
            AngularInterval::new(-2.01, 2.01),
            AngularInterval::new(-2.97, 2.97),
            AngularInterval::new(-0.87, 3.14),
            AngularInterval::new(-1.27, 4.79),
            AngularInterval::new(-1.57, 1.57),
            AngularInterval::new(-2.35, 2.35),
        ]
    }

    #[test]
    fn split_preserves_the_sum_exactly() {
        let mut handler = SingularityHandler::new(default_limits());
        let mut q = SVector::<f64, 7>::zeros();
        q[0] = 0.5;
        q[2] = -0.3;
        handler.update_current_joints(&q);
        for t13 in [-1.0, 0.2, 2.5] {
            let (t1, t3) = handler.get_upper_joints(t13);
            assert_relative_eq!(t1 + t3, t13, epsilon = 1e-12);
        }
    }

    #[test]
    fn split_is_proportional_to_remaining_travel() {
        let mut handler = SingularityHandler::new(default_limits());
        let q = SVector::<f64, 7>::zeros();
        handler.update_current_joints(&q);
        // Moving the sum up from 0: travel is 2.62 for θ₁ and 2.97 for θ₃.
        let (t1, t3) = handler.get_upper_joints(1.0);
        let alpha = 2.62 / (2.62 + 2.97);
        assert_relative_eq!(t1, alpha * 1.0, epsilon = 1e-12);
        assert_relative_eq!(t3, (1.0 - alpha) * 1.0, epsilon = 1e-12);
        // Neither joint may cross its limit when the sum is extreme but
        // representable.
        let (t1, t3) = handler.get_upper_joints(2.62 + 2.97);
        assert_relative_eq!(t1, 2.62, epsilon = 1e-12);
        assert_relative_eq!(t3, 2.97, epsilon = 1e-12);
    }

    #[test]
    fn split_wraps_travel_for_out_of_limit_joints() {
        let mut handler = SingularityHandler::new(default_limits());
        let mut q = SVector::<f64, 7>::zeros();
        // θ₅ past its wrapped upper bound: travel must go through 2π.
        q[4] = -1.4;
        handler.update_current_joints(&q);
        let (t5, t7) = handler.get_lower_joints(-1.0);
        assert_relative_eq!(t5 + t7, -1.0, epsilon = 1e-12);
        let limits = default_limits();
        let d5 = limits[4].upper() - q[4] + TAU;
        let d7 = limits[6].upper() - 0.0;
        let alpha = d5 / (d5 + d7);
        assert_relative_eq!(t5, q[4] + alpha * 0.4, epsilon = 1e-12);
    }
}
