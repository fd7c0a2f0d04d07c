use nalgebra::{Matrix4, SVector, Vector3};

// -----------------------------------------------------------------------------
// DhRow: one Denavit-Hartenberg link
// -----------------------------------------------------------------------------

/// One Denavit-Hartenberg row (α, d, θ-offset, a).
///
/// `d` translates along the rotated x axis and `a` along the link z axis;
/// `alpha` twists about x after the joint rotation about z.
#[derive(Debug, Clone, Copy)]
pub struct DhRow {
    pub alpha: f64,
    pub d: f64,
    pub theta_offset: f64,
    pub a: f64,
}

impl DhRow {
    pub const fn new(alpha: f64, d: f64, theta_offset: f64, a: f64) -> Self {
        Self { alpha, d, theta_offset, a }
    }

    /// Link transform for joint angle `q`:
    /// Rz(q − θ-offset) · Tz(a) · Tx(d) · Rx(α).
    pub fn transform(&self, q: f64) -> Matrix4<f64> {
        let theta = q - self.theta_offset;
        let (st, ct) = theta.sin_cos();
        let (sa, ca) = self.alpha.sin_cos();
        Matrix4::new(
            ct, -st * ca, st * sa, self.d * ct,
            st, ct * ca, -ct * sa, self.d * st,
            0.0, sa, ca, self.a,
            0.0, 0.0, 0.0, 1.0,
        )
    }
}

// -----------------------------------------------------------------------------
// DhTable: the fixed 7-link chain
// -----------------------------------------------------------------------------

/// The seven-link table of the arm, fixed at construction.
#[derive(Debug, Clone)]
pub struct DhTable {
    rows: [DhRow; 7],
}

impl DhTable {
    pub fn new(rows: [DhRow; 7]) -> Self {
        Self { rows }
    }

    pub fn rows(&self) -> &[DhRow; 7] {
        &self.rows
    }

    /// Base-to-tool transform: the product of all link transforms.
    pub fn forward(&self, q: &SVector<f64, 7>) -> Matrix4<f64> {
        let mut t = Matrix4::identity();
        for (row, qi) in self.rows.iter().zip(q.iter()) {
            t *= row.transform(*qi);
        }
        t
    }

    /// Base-frame origin of every link frame, base first, tool last.
    pub fn frame_positions(&self, q: &SVector<f64, 7>) -> [Vector3<f64>; 8] {
        let mut out = [Vector3::zeros(); 8];
        let mut t = Matrix4::identity();
        for (i, (row, qi)) in self.rows.iter().zip(q.iter()).enumerate() {
            t *= row.transform(*qi);
            out[i + 1] = t.fixed_view::<3, 1>(0, 3).into_owned();
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::FRAC_PI_2;

    #[test]
    fn transform_at_zero_is_pure_link_offset() {
        let row = DhRow::new(0.0, 2.0, 0.0, 3.0);
        let t = row.transform(0.0);
        assert_relative_eq!(t[(0, 3)], 2.0);
        assert_relative_eq!(t[(2, 3)], 3.0);
        assert_relative_eq!(t.fixed_view::<3, 3>(0, 0).determinant(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn twist_moves_the_z_axis() {
        let row = DhRow::new(-FRAC_PI_2, 0.0, 0.0, 0.0);
        let t = row.transform(0.0);
        // New z axis is the old y.
        assert_relative_eq!(t[(1, 2)], 1.0);
        assert_relative_eq!(t[(2, 2)], 0.0);
    }

    #[test]
    fn theta_offset_shifts_the_joint_angle() {
        let row = DhRow::new(0.0, 1.0, FRAC_PI_2, 0.0);
        let t = row.transform(FRAC_PI_2);
        // Offset cancels the joint angle: identity rotation.
        assert_relative_eq!(t[(0, 0)], 1.0);
        assert_relative_eq!(t[(0, 3)], 1.0);
    }
}
