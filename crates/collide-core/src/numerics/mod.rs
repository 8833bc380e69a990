pub mod lowess;

pub use lowess::{LowessConfig, LowessError, lowess};

/// Largest finite value in `values`, or `None` for an empty slice.
pub fn finite_max(values: &[f64]) -> Option<f64> {
    values
        .iter()
        .copied()
        .filter(|value| value.is_finite())
        .reduce(f64::max)
}
