use std::f64::consts::{FRAC_PI_2, PI};

use nalgebra::{Matrix3, Matrix4, SVector, Vector3};
use tracing::debug;

use crate::angular_interval::{AngularInterval, AngularIntervalSet};
use crate::dh::{DhRow, DhTable};
use crate::feasibility::{solve_cos_type, solve_quadrant, solve_tan_type};
use crate::round_eps;
use crate::self_motion::SelfMotion;
use crate::trig_solvers::{solve_sin_cos_eq, solve_sin_cos_geq};

// -----------------------------------------------------------------------------
// Kine7: geometry, forward kinematics, and the analytical inverse
// -----------------------------------------------------------------------------

/// Immutable geometric description of the 7-DoF S-R-S arm.
///
/// `l1` and `l2` are the upper-arm and forearm lengths, `l3` the wrist-to-
/// tool offset, and `d` the lateral elbow offset. Joint limits are arcs, so
/// a wrist roll with more than a full turn of travel minus a gap is
/// representable.
#[derive(Debug, Clone)]
pub struct Kine7 {
    l1: f64,
    l2: f64,
    l3: f64,
    d: f64,
    joint_limits: [AngularInterval; 7],
    dh: DhTable,
    singular_bound: f64,
}

impl Kine7 {
    pub fn new(l1: f64, l2: f64, l3: f64, d: f64, joint_limits: [AngularInterval; 7]) -> Self {
        let dh = DhTable::new([
            DhRow::new(-FRAC_PI_2, 0.0, 0.0, 0.0),
            DhRow::new(FRAC_PI_2, 0.0, 0.0, 0.0),
            DhRow::new(-FRAC_PI_2, d, 0.0, l1),
            DhRow::new(FRAC_PI_2, -d, 0.0, 0.0),
            DhRow::new(-FRAC_PI_2, 0.0, 0.0, l2),
            DhRow::new(FRAC_PI_2, 0.0, 0.0, 0.0),
            DhRow::new(0.0, 0.0, 0.0, l3),
        ]);
        Self { l1, l2, l3, d, joint_limits, dh, singular_bound: 5e-5 }
    }

    pub fn joint_limits(&self) -> &[AngularInterval; 7] {
        &self.joint_limits
    }

    /// Base-to-tool transform for a joint vector.
    pub fn forward(&self, q: &SVector<f64, 7>) -> Matrix4<f64> {
        self.dh.forward(q)
    }

    /// Base-frame origin of every link frame (for drawing the chain).
    pub fn frame_positions(&self, q: &SVector<f64, 7>) -> [Vector3<f64>; 8] {
        self.dh.frame_positions(q)
    }

    /// All self-motion branches realizing the tool pose `t_07`, one per
    /// real elbow root. Unreachable poses yield an empty vector; a branch
    /// whose feasible arm-angle set is empty is still reported so callers
    /// can inspect it.
    pub fn inverse(&self, t_07: &Matrix4<f64>) -> Vec<SelfMotion> {
        let x_st: Vector3<f64> = t_07.fixed_view::<3, 1>(0, 3).into_owned();
        let r_70: Matrix3<f64> = t_07.fixed_view::<3, 3>(0, 0).into_owned();
        let x_wt = Vector3::new(0.0, 0.0, self.l3);
        let mut x_sw = x_st - r_70 * x_wt;
        for i in 0..3 {
            x_sw[i] -= x_sw[i] % self.singular_bound;
        }
        let (p0, q0, r0) = (x_sw.x, x_sw.y, x_sw.z);

        let elbow_roots = solve_sin_cos_eq(
            2.0 * self.d * (self.l1 + self.l2),
            2.0 * (self.l1 * self.l2 - self.d * self.d),
            2.0 * self.d * self.d + self.l1 * self.l1 + self.l2 * self.l2,
            x_sw.norm_squared(),
        );
        if elbow_roots.is_empty() {
            debug!(reach = x_sw.norm(), "elbow equation has no real root");
            return Vec::new();
        }

        let mut self_motions = Vec::with_capacity(elbow_roots.len());
        for theta4 in elbow_roots {
            let (theta1_ref, theta2_ref) = self.reference_plane(theta4, p0, q0, r0);
            let (s4, c4) = theta4.sin_cos();
            let r_43 = Matrix3::new(
                c4, 0.0, s4,
                s4, 0.0, -c4,
                0.0, 1.0, 0.0,
            );
            let (s1r, c1r) = theta1_ref.sin_cos();
            let (s2r, c2r) = theta2_ref.sin_cos();
            let r_30_ref = Matrix3::new(
                c1r * c2r, -c1r * s2r, -s1r,
                s1r * c2r, -s1r * s2r, c1r,
                -s2r, -c2r, 0.0,
            );
            let v = x_sw.normalize();
            let vx = Matrix3::new(
                0.0, -v.z, v.y,
                v.z, 0.0, -v.x,
                -v.y, v.x, 0.0,
            );
            let vx2 = vx * vx;
            // Rodrigues decomposition: R₃₀(ψ) = Aₛ sinψ + Bₛ cosψ + Cₛ.
            let a_s = round_mat(&(vx * r_30_ref));
            let b_s = round_mat(&(-vx2 * r_30_ref));
            let c_s = round_mat(&((Matrix3::identity() + vx2) * r_30_ref));

            // Shoulder triple: θ₂ is cos-type, θ₁ and θ₃ tan-type.
            let p2 = solve_cos_type(
                &[-a_s[(2, 1)], -b_s[(2, 1)], -c_s[(2, 1)]],
                &self.limit_set(1),
                self.singular_bound,
            );
            let p1 = solve_tan_type(
                &[-a_s[(1, 1)], -b_s[(1, 1)], -c_s[(1, 1)]],
                &[-a_s[(0, 1)], -b_s[(0, 1)], -c_s[(0, 1)]],
                &self.limit_set(0),
            );
            let p3 = solve_tan_type(
                &[a_s[(2, 2)], b_s[(2, 2)], c_s[(2, 2)]],
                &[-a_s[(2, 0)], -b_s[(2, 0)], -c_s[(2, 0)]],
                &self.limit_set(2),
            );
            let mut pu = (p1.0 & p2.0 & p3.0) | (p1.1 & p2.1 & p3.1);
            self.handle_singularity(
                [-a_s[(2, 1)], -b_s[(2, 1)], -c_s[(2, 1)]],
                [a_s[(1, 0)], b_s[(1, 0)], c_s[(1, 0)]],
                [a_s[(0, 0)], b_s[(0, 0)], c_s[(0, 0)]],
                self.joint_limits[0].sum(&self.joint_limits[2]).into(),
                &mut pu,
            );

            // Wrist triple, through the fixed elbow rotation and the pose.
            let a_w = round_mat(&((a_s * r_43).transpose() * r_70));
            let b_w = round_mat(&((b_s * r_43).transpose() * r_70));
            let c_w = round_mat(&((c_s * r_43).transpose() * r_70));
            let p6 = solve_cos_type(
                &[a_w[(2, 2)], b_w[(2, 2)], c_w[(2, 2)]],
                &self.limit_set(5),
                self.singular_bound,
            );
            let p5 = solve_tan_type(
                &[a_w[(1, 2)], b_w[(1, 2)], c_w[(1, 2)]],
                &[a_w[(0, 2)], b_w[(0, 2)], c_w[(0, 2)]],
                &self.limit_set(4),
            );
            let p7 = solve_tan_type(
                &[a_w[(2, 1)], b_w[(2, 1)], c_w[(2, 1)]],
                &[-a_w[(2, 0)], -b_w[(2, 0)], -c_w[(2, 0)]],
                &self.limit_set(6),
            );
            let mut pl = (p5.0 & p6.0 & p7.0) | (p5.1 & p6.1 & p7.1);
            self.handle_singularity(
                [a_w[(2, 2)], b_w[(2, 2)], c_w[(2, 2)]],
                [a_w[(1, 0)], b_w[(1, 0)], c_w[(1, 0)]],
                [a_w[(0, 0)], b_w[(0, 0)], c_w[(0, 0)]],
                self.joint_limits[4].sum(&self.joint_limits[6]).into(),
                &mut pl,
            );

            let phi = pu & pl;
            debug!(theta4, arcs = phi.arcs().len(), "self-motion branch");
            self_motions.push(SelfMotion::new(
                phi,
                theta4,
                a_s,
                b_s,
                c_s,
                a_w,
                b_w,
                c_w,
                self.joint_limits,
                self.singular_bound,
            ));
        }
        self_motions
    }

    /// Anchor configuration (θ₁, θ₂) of the virtual arm at θ₃ = 0 that
    /// places the elbow in the canonical plane for the given elbow angle
    /// and shoulder-to-wrist vector (p0, q0, r0).
    fn reference_plane(&self, theta4: f64, p0: f64, q0: f64, r0: f64) -> (f64, f64) {
        let (s4, c4) = theta4.sin_cos();
        // Wrist position in the θ₁ = θ₂ = θ₃ = 0 shoulder frame: (p3, 0, -q3).
        let p3 = -c4 * self.d + s4 * self.l2 + self.d;
        let q3 = -self.d * s4 - self.l2 * c4 - self.l1;
        if p0 == 0.0 && q0 == 0.0 {
            // Wrist on the base axis: θ₁ is free, pick zero.
            return (0.0, (-p3).atan2(-q3));
        }
        let candidates = if r0 * r0 >= p3 * p3 + q3 * q3 {
            // Numerically saturated: the vertical reach alone accounts for
            // the whole wrist distance.
            vec![if r0 >= 0.0 { p3.atan2(q3) } else { -PI + p3.atan2(q3) }]
        } else {
            solve_sin_cos_eq(p3, q3, r0, 0.0)
        };
        let mut theta1_ref = 0.0;
        let mut theta2_ref = 0.0;
        for t2 in candidates {
            let (s2, c2) = t2.sin_cos();
            let a = if p3 * c2 - q3 * s2 >= 0.0 { 1.0 } else { -1.0 };
            let b = if p3 >= 0.0 { 1.0 } else { -1.0 };
            theta2_ref = t2;
            theta1_ref = (a * q0).atan2(a * p0);
            if a * b >= 0.0 {
                break;
            }
        }
        (theta1_ref, theta2_ref)
    }

    /// Add back the arm angles at which a spherical joint aligns with the
    /// arm axis. There only the sum of the surrounding joints is
    /// determined, so feasibility is checked against the Minkowski sum of
    /// their limits (`valid_range`) instead of the per-joint sets, within
    /// the ψ-region where the cos-type coefficient says the joint is
    /// aligned.
    fn handle_singularity(
        &self,
        f_cos: [f64; 3],
        f_sum_sin: [f64; 3],
        f_sum_cos: [f64; 3],
        valid_range: AngularIntervalSet,
        arm_angle_range: &mut AngularIntervalSet,
    ) {
        let neg_range =
            AngularIntervalSet::from(AngularInterval::new(-PI, 0.0)) & valid_range.clone();
        let pos_range = AngularIntervalSet::from(AngularInterval::new(0.0, PI)) & valid_range;
        let singular_range = solve_sin_cos_geq(
            f_cos[0],
            f_cos[1],
            f_cos[2],
            self.singular_bound.cos(),
        );
        let res_pos = solve_quadrant(1.0, 1.0, &f_sum_sin, &f_sum_cos, &pos_range);
        let res_neg = solve_quadrant(1.0, -1.0, &f_sum_sin, &f_sum_cos, &neg_range);
        arm_angle_range.union_with(&((res_pos | res_neg) & singular_range));
    }

    fn limit_set(&self, i: usize) -> AngularIntervalSet {
        self.joint_limits[i].into()
    }
}

impl Default for Kine7 {
    /// The reference 7-DoF arm geometry and limits.
    fn default() -> Self {
        Self::new(
            55.0,
            30.0,
            6.1,
            4.5,
            [
                AngularInterval::new(-2.62, 2.62),
                AngularInterval::new(-2.01, 2.01),
                AngularInterval::new(-2.97, 2.97),
                AngularInterval::new(-0.87, 3.14),
                AngularInterval::new(-1.27, 4.79),
                AngularInterval::new(-1.57, 1.57),
                AngularInterval::new(-2.35, 2.35),
            ],
        )
    }
}

fn round_mat(m: &Matrix3<f64>) -> Matrix3<f64> {
    m.map(round_eps)
}
