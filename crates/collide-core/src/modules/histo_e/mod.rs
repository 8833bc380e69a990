//! Reader for `pspHistoE` energy histograms and the Maxwellian comparison.

mod model;
mod parser;

pub use model::EnergyHistogram;
pub use parser::{OVERFLOW_MARKER, parse_energy_histogram, read_energy_histogram};

use crate::common::constants::{EXPECTED_CURVE_YMAX_SEED, thermal_energy_ev};
use crate::domain::DiagResult;
use crate::modules::figure::{Figure, MarkerStyle, Panel, Series, SeriesStyle};
use crate::numerics::finite_max;
use model::missing_field_error;

pub const ENERGY_LABEL: &str = "Energy";
pub const EXPECTED_LABEL: &str = "Expected";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HistogramPreset {
    /// Total ion and electron energies.
    Species,
    Electrons,
    Ions,
    Hydrogen,
    Helium,
}

impl HistogramPreset {
    pub const fn labels(self) -> &'static [&'static str] {
        match self {
            Self::Species => &["Total_i", "Total_e"],
            Self::Electrons => &["(1,1)_e", "(1,2)_e", "(2,1)_e", "(2,2)_e", "(2,3)_e"],
            Self::Ions => &["(1,1)_i", "(1,2)_i", "(2,1)_i", "(2,2)_i", "(2,3)_i"],
            Self::Hydrogen => &["(1,1)_e", "(1,2)_e", "(1,1)_i", "(1,2)_i"],
            Self::Helium => &[
                "(2,1)_e", "(2,2)_e", "(2,3)_e", "(2,1)_i", "(2,2)_i", "(2,3)_i",
            ],
        }
    }
}

/// `ymax * sqrt(E) * exp(-E / kT)` with `kT` in eV.
pub fn maxwellian_expected(energy: &[f64], ymax: f64, temperature_k: f64) -> Vec<f64> {
    let kt = thermal_energy_ev(temperature_k);
    energy
        .iter()
        .map(|&e| ymax * e.sqrt() * (-e / kt).exp())
        .collect()
}

#[derive(Debug, Clone, PartialEq)]
pub struct EnergyComparison {
    pub energy: Vec<f64>,
    /// Requested columns with a positive maximum, in request order.
    pub curves: Vec<(String, Vec<f64>)>,
    pub ymax: f64,
    pub expected: Vec<f64>,
}

impl EnergyComparison {
    pub fn to_figure(&self, name: impl Into<String>, marker: Option<MarkerStyle>) -> Figure {
        let style = marker.map_or(SeriesStyle::Smooth, SeriesStyle::Markers);
        let mut series = self
            .curves
            .iter()
            .map(|(label, values)| Series::new(label.clone(), pair(&self.energy, values), style))
            .collect::<Vec<_>>();
        series.push(Series::new(
            EXPECTED_LABEL,
            pair(&self.energy, &self.expected),
            SeriesStyle::Smooth,
        ));
        Figure::single(
            name,
            Panel::new("Energy distribution", ENERGY_LABEL, "Counts", series),
        )
    }
}

/// Compare `labels` against the Maxwellian for `temperature_k`.
///
/// Every label is checked before anything is computed, so a single unknown
/// label aborts the whole comparison.
pub fn compare_to_maxwellian(
    histogram: &EnergyHistogram,
    labels: &[&str],
    temperature_k: f64,
) -> DiagResult<EnergyComparison> {
    if let Some(missing) = labels.iter().find(|label| !histogram.contains(label)) {
        return Err(missing_field_error(missing, histogram.labels()));
    }
    let energy = histogram.require(ENERGY_LABEL)?.to_vec();

    let mut ymax = EXPECTED_CURVE_YMAX_SEED;
    let mut curves = Vec::new();
    for &label in labels {
        let values = histogram.require(label)?;
        match finite_max(values) {
            Some(peak) if peak > 0.0 => {
                ymax = ymax.max(peak);
                curves.push((label.to_string(), values.to_vec()));
            }
            _ => tracing::debug!(label, "histogram column has no positive counts; omitted"),
        }
    }

    let expected = maxwellian_expected(&energy, ymax, temperature_k);
    Ok(EnergyComparison {
        energy,
        curves,
        ymax,
        expected,
    })
}

fn pair(x: &[f64], y: &[f64]) -> Vec<(f64, f64)> {
    x.iter().copied().zip(y.iter().copied()).collect()
}
