//! Single axis interpolating curves over a shared parameter.
//!
//! Both linear and natural cubic curves are represented by their knot values and the second
//! derivative at each knot. With all second derivatives zero the cubic form reduces to linear
//! interpolation, so one evaluation routine serves both.

// ------------------------------------------------------------------------------------------------
// DATA STRUCTURES
// ------------------------------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub(crate) struct AxisSpline<'a> {
    /// Strictly increasing knot parameters
    knots: &'a [f64],

    /// Value at each knot
    values: Vec<f64>,

    /// Second derivative at each knot
    second_derivs: Vec<f64>,
}

// ------------------------------------------------------------------------------------------------
// IMPLEMENTATIONS
// ------------------------------------------------------------------------------------------------

impl<'a> AxisSpline<'a> {
    /// Piecewise linear curve through the knots.
    ///
    /// `knots` must be strictly increasing and have the same length as `values` (at least 2).
    pub fn linear(knots: &'a [f64], values: Vec<f64>) -> Self {
        let second_derivs = vec![0.0; values.len()];
        Self {
            knots,
            values,
            second_derivs,
        }
    }

    /// Natural cubic curve through the knots (zero curvature at both ends).
    ///
    /// `knots` must be strictly increasing and have the same length as `values` (at least 2).
    pub fn natural_cubic(knots: &'a [f64], values: Vec<f64>) -> Self {
        let n = values.len();
        let mut second_derivs = vec![0.0; n];

        if n >= 3 {
            // Tridiagonal system for the interior second derivatives
            let m = n - 2;
            let mut sub = vec![0.0; m];
            let mut diag = vec![0.0; m];
            let mut sup = vec![0.0; m];
            let mut rhs = vec![0.0; m];

            for row in 0..m {
                let i = row + 1;
                let h_prev = knots[i] - knots[i - 1];
                let h_next = knots[i + 1] - knots[i];

                sub[row] = h_prev;
                diag[row] = 2.0 * (h_prev + h_next);
                sup[row] = h_next;
                rhs[row] = 6.0
                    * ((values[i + 1] - values[i]) / h_next - (values[i] - values[i - 1]) / h_prev);
            }

            let interior = solve_tridiagonal(&sub, &diag, &sup, &rhs);
            second_derivs[1..(n - 1)].copy_from_slice(&interior);
        }

        Self {
            knots,
            values,
            second_derivs,
        }
    }

    /// Evaluate the curve at `t`. Values outside the knot range are extrapolated from the end
    /// segments.
    pub fn eval(&self, t: f64) -> f64 {
        let n = self.knots.len();

        // Index of the segment containing t
        let i = self
            .knots
            .partition_point(|&k| k <= t)
            .saturating_sub(1)
            .min(n - 2);

        let h = self.knots[i + 1] - self.knots[i];
        let a = (self.knots[i + 1] - t) / h;
        let b = (t - self.knots[i]) / h;

        a * self.values[i]
            + b * self.values[i + 1]
            + ((a * a * a - a) * self.second_derivs[i]
                + (b * b * b - b) * self.second_derivs[i + 1])
                * h
                * h
                / 6.0
    }
}

// ------------------------------------------------------------------------------------------------
// FUNCTIONS
// ------------------------------------------------------------------------------------------------

/// Solve a tridiagonal system with the Thomas algorithm.
///
/// `sub[0]` and `sup[m - 1]` are ignored. The systems built above are strictly diagonally
/// dominant so no pivoting is needed.
fn solve_tridiagonal(sub: &[f64], diag: &[f64], sup: &[f64], rhs: &[f64]) -> Vec<f64> {
    let m = diag.len();
    let mut c = vec![0.0; m];
    let mut d = vec![0.0; m];

    c[0] = sup[0] / diag[0];
    d[0] = rhs[0] / diag[0];

    for i in 1..m {
        let denom = diag[i] - sub[i] * c[i - 1];
        c[i] = sup[i] / denom;
        d[i] = (rhs[i] - sub[i] * d[i - 1]) / denom;
    }

    let mut x = vec![0.0; m];
    x[m - 1] = d[m - 1];
    for i in (0..(m - 1)).rev() {
        x[i] = d[i] - c[i] * x[i + 1];
    }

    x
}

// ------------------------------------------------------------------------------------------------
// TESTS
// ------------------------------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_linear() {
        let knots = [0.0, 1.0, 3.0];
        let spline = AxisSpline::linear(&knots, vec![0.0, 2.0, 0.0]);

        assert_relative_eq!(spline.eval(0.0), 0.0);
        assert_relative_eq!(spline.eval(0.5), 1.0);
        assert_relative_eq!(spline.eval(1.0), 2.0);
        assert_relative_eq!(spline.eval(2.0), 1.0);
        assert_relative_eq!(spline.eval(3.0), 0.0);
    }

    #[test]
    fn test_cubic_passes_through_knots() {
        let knots = [0.0, 0.2, 0.5, 0.7, 1.0];
        let values = vec![1.0, -3.0, 4.0, 0.5, 2.0];
        let spline = AxisSpline::natural_cubic(&knots, values.clone());

        for (k, v) in knots.iter().zip(values.iter()) {
            assert_relative_eq!(spline.eval(*k), *v, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_cubic_reproduces_line() {
        // A natural cubic through collinear data is the line itself
        let knots = [0.0, 0.1, 0.45, 1.0];
        let values: Vec<f64> = knots.iter().map(|k| 3.0 * k - 1.0).collect();
        let spline = AxisSpline::natural_cubic(&knots, values);

        for t in &[0.05, 0.3, 0.8, 0.99] {
            assert_relative_eq!(spline.eval(*t), 3.0 * t - 1.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_solve_tridiagonal() {
        // [2 1 0; 1 2 1; 0 1 2] x = [3, 4, 3] -> x = [1, 1, 1]
        let x = solve_tridiagonal(&[0.0, 1.0, 1.0], &[2.0, 2.0, 2.0], &[1.0, 1.0, 0.0], &[
            3.0, 4.0, 3.0,
        ]);
        for v in x {
            assert_relative_eq!(v, 1.0, epsilon = 1e-12);
        }
    }
}
