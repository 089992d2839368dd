//! Small numeric helpers shared by filter design and convolution.

/// Cubic interpolation weights for a fractional offset in `[0, 1)`.
///
/// The result should be equivalent to fitting a cubic through four
/// consecutive table entries and evaluating it `frac` of the way between the
/// middle two. The blend is the MMSE-optimal family for sinc tables rather
/// than a textbook Catmull-Rom spline.
///
/// The weights sum to exactly 1: the third coefficient is derived from the
/// other three so that consecutive blends match at table nodes.
#[inline]
pub fn cubic_coef(frac: f64) -> [f64; 4] {
    let frac2 = frac * frac;
    let frac3 = frac2 * frac;
    let half_frac2 = 0.5 * frac2;
    let sixth_frac3 = 0.1666666667 * frac3;
    let c0 = -0.1666666667 * frac + sixth_frac3;
    let c1 = frac + half_frac2 - 0.5 * frac3;
    // c2 = 1 - 0.5*frac - frac^2 + 0.5*frac^3, computed as the remainder to
    // avoid rounding drift in the sum.
    let c3 = -0.3333333333 * frac + half_frac2 - sixth_frac3;
    let c2 = 1.0 - c0 - c1 - c3;
    [c0, c1, c2, c3]
}

#[cfg(test)]
mod test {
    use super::*;
    use quickcheck::{quickcheck, TestResult};

    quickcheck! {
        fn coefficients_sum_to_one(frac: u16) -> TestResult {
            let frac = frac as f64 / (u16::MAX as f64 + 1.0);
            let sum: f64 = cubic_coef(frac).iter().sum();
            TestResult::from_bool((sum - 1.0).abs() < 1e-12)
        }
    }

    #[test]
    fn exact_at_nodes() {
        // frac == 0 must select the second of the four entries untouched.
        assert_eq!(cubic_coef(0.0), [0.0, 0.0, 1.0, 0.0]);
    }

    #[test]
    fn weights_hand_over_at_the_next_node() {
        // Approaching frac == 1 the blend must converge on a single
        // neighboring entry again, so consecutive table nodes meet without a
        // step.
        let c = cubic_coef(1.0 - 1e-9);
        assert!((c[1] - 1.0).abs() < 1e-6);
        assert!(c[0].abs() < 1e-6 && c[2].abs() < 1e-6 && c[3].abs() < 1e-6);
    }
}
