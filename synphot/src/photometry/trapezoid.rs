//! Sampled-curve helpers: linear interpolation and trapezoidal integration.
//!
//! Both functions expect the abscissa to be strictly increasing. Callers in
//! this crate validate that at construction time, so no check is repeated
//! on the hot path.

/// Integrate `y(x)` with the trapezoidal rule.
///
/// Returns 0.0 for fewer than two samples. Extra samples in the longer slice
/// are ignored.
pub fn trap_integrate(x: &[f64], y: &[f64]) -> f64 {
    debug_assert_eq!(x.len(), y.len(), "trapezoid inputs must have equal length");

    x.windows(2)
        .zip(y.windows(2))
        .map(|(xs, ys)| (xs[1] - xs[0]) * (ys[0] + ys[1]) / 2.0)
        .sum()
}

/// Linearly interpolate the samples `(xp, fp)` at `x`.
///
/// Values outside `[xp[0], xp[last]]` evaluate to 0.0, as does an empty
/// table.
pub fn interpolate(xp: &[f64], fp: &[f64], x: f64) -> f64 {
    let (first, last) = match (xp.first(), xp.last()) {
        (Some(first), Some(last)) => (*first, *last),
        _ => return 0.0,
    };
    if !(first..=last).contains(&x) {
        return 0.0;
    }

    // Index of the first sample strictly greater than x
    let upper = xp.partition_point(|&v| v <= x);
    if upper == 0 {
        return fp[0];
    }
    if upper >= xp.len() {
        return fp[xp.len() - 1];
    }

    let lower = upper - 1;
    let t = (x - xp[lower]) / (xp[upper] - xp[lower]);
    fp[lower] * (1.0 - t) + fp[upper] * t
}

/// Interpolate `(xp, fp)` at every point of `grid`
pub fn resample(xp: &[f64], fp: &[f64], grid: &[f64]) -> Vec<f64> {
    grid.iter().map(|&x| interpolate(xp, fp, x)).collect()
}

/// Merge two sorted grids into one strictly increasing grid, keeping only
/// points inside `[lower, upper]` and adding both bounds.
pub(crate) fn merged_grid(a: &[f64], b: &[f64], lower: f64, upper: f64) -> Vec<f64> {
    let mut grid: Vec<f64> = a
        .iter()
        .chain(b.iter())
        .copied()
        .filter(|&x| x > lower && x < upper)
        .collect();
    grid.push(lower);
    grid.push(upper);
    grid.sort_by(f64::total_cmp);
    grid.dedup();
    grid
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_trap_integrate_linear_is_exact() {
        let x = vec![0.0, 1.0, 3.0, 4.0];
        let y: Vec<f64> = x.iter().map(|v| 2.0 * v + 1.0).collect();
        // ∫0..4 (2x + 1) dx = 16 + 4
        assert_relative_eq!(trap_integrate(&x, &y), 20.0, epsilon = 1e-12);
    }

    #[test]
    fn test_trap_integrate_degenerate() {
        assert_eq!(trap_integrate(&[], &[]), 0.0);
        assert_eq!(trap_integrate(&[1.0], &[5.0]), 0.0);
    }

    #[test]
    fn test_interpolate() {
        let xp = [1.0, 2.0, 4.0];
        let fp = [10.0, 20.0, 0.0];

        assert_eq!(interpolate(&xp, &fp, 1.0), 10.0);
        assert_eq!(interpolate(&xp, &fp, 2.0), 20.0);
        assert_eq!(interpolate(&xp, &fp, 4.0), 0.0);
        assert_relative_eq!(interpolate(&xp, &fp, 1.5), 15.0);
        assert_relative_eq!(interpolate(&xp, &fp, 3.0), 10.0);

        // Zero outside support
        assert_eq!(interpolate(&xp, &fp, 0.5), 0.0);
        assert_eq!(interpolate(&xp, &fp, 4.5), 0.0);
        assert_eq!(interpolate(&[], &[], 1.0), 0.0);
    }

    #[test]
    fn test_resample() {
        let out = resample(&[0.0, 10.0], &[0.0, 100.0], &[-1.0, 0.0, 2.5, 10.0, 11.0]);
        assert_eq!(out, vec![0.0, 0.0, 25.0, 100.0, 0.0]);
    }

    #[test]
    fn test_merged_grid() {
        let grid = merged_grid(&[1.0, 2.0, 3.0, 4.0], &[2.0, 2.5, 5.0], 1.5, 4.0);
        assert_eq!(grid, vec![1.5, 2.0, 2.5, 3.0, 4.0]);
    }
}
