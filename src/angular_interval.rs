use std::f64::consts::PI;

const TAU: f64 = 2.0 * PI;

/// Normalize an angle into (-π, π].
pub fn wrap_angle(x: f64) -> f64 {
    let a = (x + PI).rem_euclid(TAU) - PI;
    if a == -PI { PI } else { a }
}

// -----------------------------------------------------------------------------
// AngularInterval: one directed arc on the unit circle
// -----------------------------------------------------------------------------

/// A directed arc on the unit circle, running counterclockwise from its
/// lower endpoint.
///
/// Stored as a normalized lower endpoint in [-π, π) plus a width in
/// [0, 2π]. An arc of width 2π is the full circle. A lower endpoint of
/// exactly -π marks an arc that is closed through the ±π cut; the solvers
/// treat such an endpoint as the absence of a lower bound.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AngularInterval {
    lo: f64,
    width: f64,
}

impl AngularInterval {
    /// Arc from `lower` counterclockwise to `upper`. The endpoints are taken
    /// as real numbers: `new(-1.27, 4.79)` is an arc of width 6.06 that
    /// wraps through ±π, and any span of 2π or more is the full circle.
    pub fn new(lower: f64, upper: f64) -> Self {
        let mut width = upper - lower;
        if width < 0.0 {
            width = width.rem_euclid(TAU);
        }
        if width >= TAU {
            return Self::full();
        }
        let mut lo = wrap_angle(lower);
        if lo == PI {
            lo = -PI;
        }
        Self { lo, width }
    }

    /// The whole circle.
    pub fn full() -> Self {
        Self { lo: -PI, width: TAU }
    }

    pub fn lower(&self) -> f64 {
        self.lo
    }

    /// Upper endpoint, normalized into (-π, π].
    pub fn upper(&self) -> f64 {
        let u = self.lo + self.width;
        if u > PI { u - TAU } else { u }
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn is_full(&self) -> bool {
        self.width >= TAU
    }

    /// Closed membership test (endpoints included, up to rounding noise).
    /// -π and π are the same point.
    pub fn contains(&self, x: f64) -> bool {
        if self.is_full() {
            return true;
        }
        const SLACK: f64 = 1e-9;
        let d = (wrap_angle(x) - self.lo).rem_euclid(TAU);
        d <= self.width + SLACK || d >= TAU - SLACK
    }

    /// Minkowski sum of two arcs: every pairwise sum of a point of `self`
    /// and a point of `other`. Widths add; at 2π the sum saturates to the
    /// full circle.
    pub fn sum(&self, other: &Self) -> Self {
        let width = self.width + other.width;
        if width >= TAU {
            return Self::full();
        }
        let mut lo = wrap_angle(self.lo + other.lo);
        if lo == PI {
            lo = -PI;
        }
        Self { lo, width }
    }

    /// Split into linear segments within [-π, π] (one segment, or two when
    /// the arc crosses the cut).
    fn segments(&self) -> (Segment, Option<Segment>) {
        let hi = self.lo + self.width;
        if hi <= PI {
            (Segment { lo: self.lo, hi }, None)
        } else {
            (
                Segment { lo: self.lo, hi: PI },
                Some(Segment { lo: -PI, hi: hi - TAU }),
            )
        }
    }

    fn from_segment(seg: Segment) -> Self {
        Self { lo: seg.lo, width: seg.hi - seg.lo }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Segment {
    lo: f64,
    hi: f64,
}

// -----------------------------------------------------------------------------
// AngularIntervalSet: a canonical union of arcs
// -----------------------------------------------------------------------------

/// A finite union of arcs in canonical form: an endpoint-sorted vector of
/// disjoint, non-adjacent arcs, none of which crosses the ±π cut (an arc
/// through the cut is stored split). Canonical form is unique for a given
/// point set, so equality is structural.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AngularIntervalSet {
    arcs: Vec<AngularInterval>,
}

impl AngularIntervalSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn full() -> Self {
        AngularInterval::full().into()
    }

    pub fn is_empty(&self) -> bool {
        self.arcs.is_empty()
    }

    /// The canonical arcs, sorted by lower endpoint.
    pub fn arcs(&self) -> &[AngularInterval] {
        &self.arcs
    }

    pub fn contains(&self, x: f64) -> bool {
        self.arcs.iter().any(|a| a.contains(x))
    }

    /// Total arc length.
    pub fn measure(&self) -> f64 {
        self.arcs.iter().map(|a| a.width()).sum()
    }

    /// Add one arc, re-canonicalizing.
    pub fn insert(&mut self, arc: AngularInterval) {
        let mut segs = self.to_segments();
        let (s1, s2) = arc.segments();
        segs.push(s1);
        if let Some(s2) = s2 {
            segs.push(s2);
        }
        *self = Self::from_segments(segs);
    }

    pub fn union_with(&mut self, other: &Self) {
        let mut segs = self.to_segments();
        segs.extend(other.to_segments());
        *self = Self::from_segments(segs);
    }

    pub fn intersect_with(&mut self, other: &Self) {
        let mut out = Vec::new();
        for a in self.to_segments() {
            for b in other.to_segments() {
                let lo = a.lo.max(b.lo);
                let hi = a.hi.min(b.hi);
                if lo <= hi {
                    out.push(Segment { lo, hi });
                }
            }
        }
        *self = Self::from_segments(out);
    }

    /// Closure of the complement (shared endpoints remain in both sets).
    pub fn complement(&self) -> Self {
        if self.arcs.is_empty() {
            return Self::full();
        }
        let segs = self.to_segments();
        let mut out = Vec::new();
        let mut cursor = -PI;
        for seg in &segs {
            if seg.lo > cursor {
                out.push(Segment { lo: cursor, hi: seg.lo });
            }
            cursor = seg.hi;
        }
        if cursor < PI {
            out.push(Segment { lo: cursor, hi: PI });
        }
        Self::from_segments(out)
    }

    fn to_segments(&self) -> Vec<Segment> {
        // Stored arcs never cross the cut.
        self.arcs
            .iter()
            .map(|a| Segment { lo: a.lo, hi: a.lo + a.width })
            .collect()
    }

    fn from_segments(mut segs: Vec<Segment>) -> Self {
        segs.retain(|s| s.hi >= s.lo);
        segs.sort_by(|a, b| a.lo.total_cmp(&b.lo).then(a.hi.total_cmp(&b.hi)));
        let mut merged: Vec<Segment> = Vec::with_capacity(segs.len());
        for seg in segs {
            match merged.last_mut() {
                Some(last) if seg.lo <= last.hi => {
                    if seg.hi > last.hi {
                        last.hi = seg.hi;
                    }
                }
                _ => merged.push(seg),
            }
        }
        Self {
            arcs: merged.into_iter().map(AngularInterval::from_segment).collect(),
        }
    }
}

impl From<AngularInterval> for AngularIntervalSet {
    fn from(arc: AngularInterval) -> Self {
        let mut set = Self::new();
        set.insert(arc);
        set
    }
}

impl std::ops::BitOr for AngularIntervalSet {
    type Output = AngularIntervalSet;
    fn bitor(mut self, rhs: Self) -> Self {
        self.union_with(&rhs);
        self
    }
}

impl std::ops::BitAnd for AngularIntervalSet {
    type Output = AngularIntervalSet;
    fn bitand(mut self, rhs: Self) -> Self {
        self.intersect_with(&rhs);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn set(pairs: &[(f64, f64)]) -> AngularIntervalSet {
        let mut s = AngularIntervalSet::new();
        for &(l, u) in pairs {
            s.insert(AngularInterval::new(l, u));
        }
        s
    }

    #[test]
    fn wrap_angle_lands_in_half_open_range() {
        assert_relative_eq!(wrap_angle(0.5), 0.5);
        assert_relative_eq!(wrap_angle(PI + 0.5), -PI + 0.5, epsilon = 1e-12);
        assert_relative_eq!(wrap_angle(-3.0 * PI), PI);
        assert_eq!(wrap_angle(PI), PI);
        assert_eq!(wrap_angle(-PI), PI);
    }

    #[test]
    fn wrapping_arc_contains_the_cut() {
        let a = AngularInterval::new(2.5, 4.0); // upper wraps to 4 - 2π
        assert!(a.contains(3.0));
        assert!(a.contains(PI));
        assert!(a.contains(-PI));
        assert!(a.contains(4.0 - TAU));
        assert!(!a.contains(0.0));
        assert_relative_eq!(a.upper(), 4.0 - TAU);
    }

    #[test]
    fn wide_joint_limit_splits_at_the_cut() {
        let s: AngularIntervalSet = AngularInterval::new(-1.27, 4.79).into();
        assert_eq!(s.arcs().len(), 2);
        assert!(s.contains(3.0));
        assert!(s.contains(-3.0));
        assert!(!s.contains(-1.4));
        assert_relative_eq!(s.measure(), 6.06, epsilon = 1e-12);
    }

    #[test]
    fn union_merges_overlap_and_adjacency() {
        let s = set(&[(0.0, 1.0), (0.5, 2.0), (2.0, 2.5), (3.0, 3.1)]);
        assert_eq!(s.arcs().len(), 2);
        assert_relative_eq!(s.arcs()[0].lower(), 0.0);
        assert_relative_eq!(s.arcs()[0].upper(), 2.5);
        assert_relative_eq!(s.measure(), 2.6, epsilon = 1e-12);
    }

    #[test]
    fn intersection_basic_and_wrapped() {
        let mut a = set(&[(-1.0, 1.0)]);
        a.intersect_with(&set(&[(0.5, 2.0)]));
        assert_eq!(a, set(&[(0.5, 1.0)]));

        let mut wide = set(&[(2.5, 4.0)]);
        wide.intersect_with(&set(&[(-PI, 0.0)]));
        assert_eq!(wide.arcs().len(), 1);
        assert_relative_eq!(wide.arcs()[0].lower(), -PI);
        assert_relative_eq!(wide.arcs()[0].upper(), 4.0 - TAU);
    }

    #[test]
    fn set_algebra_laws() {
        let a = set(&[(-2.0, -0.5), (1.0, 2.0)]);
        let b = set(&[(-1.0, 1.5)]);
        let c = set(&[(2.8, 3.5)]);
        assert_eq!(a.clone() | b.clone(), b.clone() | a.clone());
        assert_eq!(a.clone() & b.clone(), b.clone() & a.clone());
        assert_eq!(
            (a.clone() | b.clone()) | c.clone(),
            a.clone() | (b.clone() | c.clone())
        );
        assert_eq!(a.clone() | a.clone(), a);
        assert_eq!(a.clone() & a.clone(), a);
        // Closed-set complement: the overlap is at most the boundary points.
        let boundary = a.clone() & a.complement();
        assert_relative_eq!(boundary.measure(), 0.0);
    }

    #[test]
    fn full_circle_absorbs() {
        let a = set(&[(-2.0, 2.0)]);
        assert_eq!(a.clone() | AngularIntervalSet::full(), AngularIntervalSet::full());
        assert_eq!(a.clone() & AngularIntervalSet::full(), a);
        assert!(AngularIntervalSet::full().contains(PI));
        assert!(AngularIntervalSet::new().complement().contains(0.3));
    }

    #[test]
    fn minkowski_sum_of_arcs() {
        let a = AngularInterval::new(-0.5, 0.5);
        let b = AngularInterval::new(1.0, 2.0);
        let s = a.sum(&b);
        assert_relative_eq!(s.lower(), 0.5);
        assert_relative_eq!(s.upper(), 2.5);

        let wide = AngularInterval::new(-2.62, 2.62).sum(&AngularInterval::new(-2.97, 2.97));
        assert!(wide.is_full());
    }
}
