/// A real quadratic polynomial ax² + bx + c, degenerate orders included.
#[derive(Debug, Clone, Copy)]
pub struct Quadratic {
    pub a: f64,
    pub b: f64,
    pub c: f64,
}

/// Result of [`Quadratic::solve`].
///
/// `order` is the effective degree after dropping zero leading
/// coefficients. `n` is the real root count, with `-1` encoding the
/// identically-zero polynomial (every point is a root); `v` holds the roots
/// in ascending order.
#[derive(Debug, Clone)]
pub struct Roots {
    pub order: usize,
    pub n: isize,
    pub v: Vec<f64>,
}

impl Quadratic {
    pub fn new(a: f64, b: f64, c: f64) -> Self {
        Self { a, b, c }
    }

    pub fn eval(&self, x: f64) -> f64 {
        (self.a * x + self.b) * x + self.c
    }

    /// Real roots of ax² + bx + c = f.
    pub fn solve(&self, f: f64) -> Roots {
        let (a, b, c) = (self.a, self.b, self.c - f);
        if a == 0.0 {
            if b == 0.0 {
                Roots { order: 0, n: if c == 0.0 { -1 } else { 0 }, v: Vec::new() }
            } else {
                Roots { order: 1, n: 1, v: vec![-c / b] }
            }
        } else {
            let disc = b * b - 4.0 * a * c;
            if disc < 0.0 {
                Roots { order: 2, n: 0, v: Vec::new() }
            } else if disc == 0.0 {
                Roots { order: 2, n: 1, v: vec![-b / (2.0 * a)] }
            } else {
                let ds = disc.sqrt();
                let x1 = (-b - ds) / (2.0 * a);
                let x2 = (-b + ds) / (2.0 * a);
                Roots { order: 2, n: 2, v: vec![x1.min(x2), x1.max(x2)] }
            }
        }
    }

    /// The subset of the real line where ax² + bx + c ≤ f, as closed
    /// intervals with ±∞ endpoints.
    pub fn solve_leq(&self, f: f64) -> Vec<(f64, f64)> {
        let roots = self.solve(f);
        let inf = f64::INFINITY;
        let mut res = Vec::new();
        match roots.order {
            0 => {
                if self.c - f <= 0.0 {
                    res.push((-inf, inf));
                }
            }
            1 => {
                if self.b > 0.0 {
                    res.push((-inf, roots.v[0]));
                } else {
                    res.push((roots.v[0], inf));
                }
            }
            _ => match roots.n {
                2 => {
                    if self.a > 0.0 {
                        res.push((roots.v[0], roots.v[1]));
                    } else {
                        res.push((-inf, roots.v[0]));
                        res.push((roots.v[1], inf));
                    }
                }
                1 => {
                    if self.a > 0.0 {
                        res.push((roots.v[0], roots.v[0]));
                    } else {
                        res.push((-inf, inf));
                    }
                }
                _ => {
                    // No real roots: a sign-definite parabola.
                    if self.a <= 0.0 {
                        res.push((-inf, inf));
                    }
                }
            },
        }
        res
    }
}
