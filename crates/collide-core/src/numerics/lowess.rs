//! Locally weighted scatterplot smoothing (Cleveland 1979).
//!
//! Tricube neighbourhood weights, local linear fits and bisquare robustness
//! iterations, with the same defaults as `statsmodels.nonparametric.lowess`
//! (`frac = 2/3`, `it = 3`, no interpolation shortcut).

pub const DEFAULT_FRACTION: f64 = 2.0 / 3.0;
pub const DEFAULT_ROBUST_ITERATIONS: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LowessConfig {
    pub fraction: f64,
    pub iterations: usize,
}

impl Default for LowessConfig {
    fn default() -> Self {
        Self {
            fraction: DEFAULT_FRACTION,
            iterations: DEFAULT_ROBUST_ITERATIONS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LowessError {
    #[error("lowess input length mismatch: x={x}, y={y}")]
    LengthMismatch { x: usize, y: usize },
    #[error("lowess fraction must lie in (0, 1], got {fraction}")]
    InvalidFraction { fraction: f64 },
    #[error("lowess input '{field}' must be finite, index {index} got {value}")]
    NonFinite {
        field: &'static str,
        index: usize,
        value: f64,
    },
}

/// Smooth `y(x)`; returns `(x, fitted)` pairs sorted by `x`.
pub fn lowess(x: &[f64], y: &[f64], config: LowessConfig) -> Result<Vec<(f64, f64)>, LowessError> {
    validate(x, y, config)?;

    let mut points = x.iter().copied().zip(y.iter().copied()).collect::<Vec<_>>();
    points.sort_by(|left, right| left.0.total_cmp(&right.0));
    let xs = points.iter().map(|point| point.0).collect::<Vec<_>>();
    let ys = points.iter().map(|point| point.1).collect::<Vec<_>>();

    let count = xs.len();
    if count == 0 {
        return Ok(Vec::new());
    }

    let neighbours = ((config.fraction * count as f64 + 1.0e-10) as usize).clamp(1, count);
    let mut robustness = vec![1.0; count];
    let mut fitted = vec![0.0; count];

    for iteration in 0..=config.iterations {
        fit_pass(&xs, &ys, &robustness, neighbours, &mut fitted);
        if iteration == config.iterations {
            break;
        }

        let residuals = ys
            .iter()
            .zip(&fitted)
            .map(|(observed, estimate)| (observed - estimate).abs())
            .collect::<Vec<_>>();
        let scale = 6.0 * median(&residuals);
        if scale <= f64::EPSILON * ys.iter().map(|value| value.abs()).fold(1.0, f64::max) {
            break;
        }
        for (weight, residual) in robustness.iter_mut().zip(&residuals) {
            *weight = bisquare(residual / scale);
        }
    }

    Ok(xs.into_iter().zip(fitted).collect())
}

fn validate(x: &[f64], y: &[f64], config: LowessConfig) -> Result<(), LowessError> {
    if x.len() != y.len() {
        return Err(LowessError::LengthMismatch {
            x: x.len(),
            y: y.len(),
        });
    }
    if !(config.fraction > 0.0 && config.fraction <= 1.0) {
        return Err(LowessError::InvalidFraction {
            fraction: config.fraction,
        });
    }
    for (field, values) in [("x", x), ("y", y)] {
        if let Some((index, value)) = values
            .iter()
            .copied()
            .enumerate()
            .find(|(_, value)| !value.is_finite())
        {
            return Err(LowessError::NonFinite {
                field,
                index,
                value,
            });
        }
    }
    Ok(())
}

fn fit_pass(xs: &[f64], ys: &[f64], robustness: &[f64], neighbours: usize, fitted: &mut [f64]) {
    let count = xs.len();
    let mut left = 0;
    let mut right = neighbours - 1;

    for (index, &x0) in xs.iter().enumerate() {
        // Slide the k-nearest window; it only ever moves right as x0 grows.
        while right + 1 < count && x0 - xs[left] > xs[right + 1] - x0 {
            left += 1;
            right += 1;
        }
        let radius = (x0 - xs[left]).max(xs[right] - x0);

        let mut sum_w = 0.0;
        let mut sum_wx = 0.0;
        let mut sum_wy = 0.0;
        for j in left..=right {
            let w = neighbour_weight(xs[j], x0, radius) * robustness[j];
            sum_w += w;
            sum_wx += w * xs[j];
            sum_wy += w * ys[j];
        }
        if sum_w <= 0.0 {
            fitted[index] = ys[index];
            continue;
        }

        let mean_x = sum_wx / sum_w;
        let mean_y = sum_wy / sum_w;
        let mut sxx = 0.0;
        let mut sxy = 0.0;
        for j in left..=right {
            let w = neighbour_weight(xs[j], x0, radius) * robustness[j];
            let dx = xs[j] - mean_x;
            sxx += w * dx * dx;
            sxy += w * dx * (ys[j] - mean_y);
        }

        fitted[index] = if sxx > 1.0e-12 * sum_w * radius * radius && sxx > 0.0 {
            mean_y + sxy / sxx * (x0 - mean_x)
        } else {
            mean_y
        };
    }
}

fn neighbour_weight(x: f64, x0: f64, radius: f64) -> f64 {
    if radius <= 0.0 {
        return 1.0;
    }
    let distance = (x - x0).abs() / radius;
    if distance >= 1.0 {
        0.0
    } else {
        let tri = 1.0 - distance * distance * distance;
        tri * tri * tri
    }
}

fn bisquare(u: f64) -> f64 {
    if u.abs() >= 1.0 {
        0.0
    } else {
        let one_minus = 1.0 - u * u;
        one_minus * one_minus
    }
}

fn median(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        0.5 * (sorted[mid - 1] + sorted[mid])
    } else {
        sorted[mid]
    }
}
