use super::model::DiagnosticTable;
use crate::common::constants::RATIO_FLOOR;
use crate::domain::{DiagError, DiagResult};
use crate::numerics::{LowessConfig, lowess};
use serde::Serialize;

/// Elastic and charge-exchange counts summed into the scattering count.
pub const SCATTERING_FIELDS: [&str; 3] = ["N(nn)", "N(ne)", "N(ie)"];

pub const DEFAULT_TIME_MIN: f64 = 0.0;
pub const DEFAULT_TIME_MAX: f64 = 1.0e20;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum CollisionProcess {
    Collide,
    Ionize,
    FreeFree,
    Recombine,
}

impl CollisionProcess {
    pub const ALL: [Self; 4] = [Self::Collide, Self::Ionize, Self::FreeFree, Self::Recombine];

    pub const fn field(self) -> &'static str {
        match self {
            Self::Collide => "N(ce)",
            Self::Ionize => "N(ci)",
            Self::FreeFree => "N(ff)",
            Self::Recombine => "N(rr)",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Collide => "collide",
            Self::Ionize => "ionize",
            Self::FreeFree => "free-free",
            Self::Recombine => "recomb",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum XAxis {
    Time,
    #[default]
    Temperature,
}

impl XAxis {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Time => "Time",
            Self::Temperature => "Temperature",
        }
    }

    pub fn values(self, table: &DiagnosticTable) -> &[f64] {
        match self {
            Self::Time => table.time(),
            Self::Temperature => table.temp(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ZeroPolicy {
    /// Keep every index; a zero denominator becomes `RATIO_FLOOR`.
    #[default]
    Floor,
    /// Drop indices whose numerator or denominator is zero.
    Ignore,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeriesWindow {
    pub tmin: f64,
    pub tmax: f64,
    pub stride: usize,
}

impl Default for SeriesWindow {
    fn default() -> Self {
        Self {
            tmin: DEFAULT_TIME_MIN,
            tmax: DEFAULT_TIME_MAX,
            stride: 1,
        }
    }
}

impl SeriesWindow {
    /// Every `stride`-th index whose time lies inside `[tmin, tmax]`.
    pub fn indices(&self, time: &[f64]) -> DiagResult<Vec<usize>> {
        if self.stride == 0 {
            return Err(DiagError::input_validation(
                "INPUT.SERIES_STRIDE",
                "series stride must be at least 1",
            ));
        }
        Ok((0..time.len())
            .step_by(self.stride)
            .filter(|&index| time[index] >= self.tmin && time[index] <= self.tmax)
            .collect())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RatioOptions {
    pub zero_policy: ZeroPolicy,
    pub smooth: bool,
    pub x_axis: XAxis,
    pub window: SeriesWindow,
}

impl RatioOptions {
    /// Ignore-zero and smoothing exclude each other; ignore-zero wins.
    pub fn smoothing_active(&self) -> bool {
        self.smooth && self.zero_policy == ZeroPolicy::Floor
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesPoints {
    pub label: String,
    pub smoothed: bool,
    pub points: Vec<(f64, f64)>,
}

/// Elementwise `N(nn) + N(ne) + N(ie)` for `species`.
pub fn scattering_counts(table: &DiagnosticTable, species: &str) -> DiagResult<Vec<f64>> {
    let [nn, ne, ie] = SCATTERING_FIELDS.map(|field| table.require_column(species, field));
    let (nn, ne, ie) = (nn?, ne?, ie?);
    Ok(nn
        .iter()
        .zip(ne)
        .zip(ie)
        .map(|((nn, ne), ie)| nn + ne + ie)
        .collect())
}

/// Ratio at one index under `policy`; `None` means the index is dropped.
pub fn ratio_point(numerator: f64, denominator: f64, policy: ZeroPolicy) -> Option<f64> {
    match policy {
        ZeroPolicy::Ignore => {
            (denominator > 0.0 && numerator > 0.0).then(|| numerator / denominator)
        }
        ZeroPolicy::Floor => Some(if denominator > 0.0 {
            numerator / denominator
        } else {
            RATIO_FLOOR
        }),
    }
}

/// `process / scattering` for `species` over the windowed indices.
pub fn process_ratio(
    table: &DiagnosticTable,
    species: &str,
    process: CollisionProcess,
    options: &RatioOptions,
) -> DiagResult<Vec<(f64, f64)>> {
    let scattering = scattering_counts(table, species)?;
    let events = table.require_column(species, process.field())?;
    let x_values = options.x_axis.values(table);

    let points = options
        .window
        .indices(table.time())?
        .into_iter()
        .filter_map(|index| {
            ratio_point(events[index], scattering[index], options.zero_policy)
                .map(|ratio| (x_values[index], ratio))
        })
        .collect::<Vec<_>>();
    finish_series(points, options)
}

/// Windowed scattering counts for `species`.
pub fn scattering_series(
    table: &DiagnosticTable,
    species: &str,
    options: &RatioOptions,
) -> DiagResult<Vec<(f64, f64)>> {
    let scattering = scattering_counts(table, species)?;
    let x_values = options.x_axis.values(table);

    let points = options
        .window
        .indices(table.time())?
        .into_iter()
        .filter(|&index| options.zero_policy == ZeroPolicy::Floor || scattering[index] > 0.0)
        .map(|index| (x_values[index], scattering[index]))
        .collect::<Vec<_>>();
    finish_series(points, options)
}

fn finish_series(points: Vec<(f64, f64)>, options: &RatioOptions) -> DiagResult<Vec<(f64, f64)>> {
    if !options.smoothing_active() {
        if options.smooth {
            tracing::debug!("smoothing skipped because ignore-zero mode is active");
        }
        return Ok(points);
    }
    smooth_points(&points)
}

/// LOWESS curve through `points` with the default span.
pub fn smooth_points(points: &[(f64, f64)]) -> DiagResult<Vec<(f64, f64)>> {
    let (x, y): (Vec<f64>, Vec<f64>) = points.iter().copied().unzip();
    lowess(&x, &y, LowessConfig::default())
        .map_err(|error| DiagError::computation("RUN.LOWESS", error.to_string()))
}

#[cfg(test)]
mod tests {
    use super::{
        CollisionProcess, RatioOptions, SeriesWindow, XAxis, ZeroPolicy, process_ratio,
        ratio_point, scattering_counts, scattering_series,
    };
    use crate::common::constants::RATIO_FLOOR;
    use crate::modules::ion_coll::{DiagnosticTable, ParseOptions, parse_ion_coll};

    // One aggregate species with N(nn) N(ne) N(ie) N(ce) N(ci) N(ff) N(rr) + two spare.
    fn table() -> DiagnosticTable {
        let source = "\
# Species: (65535, 65535)
# Time | Temp | N(nn) | N(ne) | N(ie) | N(ce) | N(ci) | N(ff) | N(rr) | X | Y | Etot | Eloss
# [1] | [2] | [3] | [4] | [5] | [6] | [7] | [8] | [9] | [10] | [11] | [12] | [13]
0.0 100.0 1 1 2 2 0 1 0 0 0 9 0
1.0 200.0 0 0 0 3 1 0 0 0 0 9 0
2.0 300.0 2 2 4 4 8 0 1 0 0 9 0
3.0 400.0 5 0 5 1 1 1 1 0 0 9 0
";
        parse_ion_coll(source.as_bytes(), ParseOptions::default()).expect("table should parse")
    }

    #[test]
    fn scattering_is_sum_of_three_fields() {
        let counts = scattering_counts(&table(), "All").expect("counts");
        assert_eq!(counts, vec![4.0, 0.0, 8.0, 10.0]);
    }

    #[test]
    fn floor_policy_keeps_every_index() {
        let options = RatioOptions::default();
        let ratio = process_ratio(&table(), "All", CollisionProcess::Collide, &options)
            .expect("ratio");

        assert_eq!(
            ratio,
            vec![(100.0, 0.5), (200.0, RATIO_FLOOR), (300.0, 0.5), (400.0, 0.1)]
        );
    }

    #[test]
    fn ignore_policy_drops_zero_numerators_and_denominators() {
        let options = RatioOptions {
            zero_policy: ZeroPolicy::Ignore,
            ..RatioOptions::default()
        };
        let ratio =
            process_ratio(&table(), "All", CollisionProcess::Ionize, &options).expect("ratio");

        assert_eq!(ratio, vec![(300.0, 1.0), (400.0, 0.1)]);
    }

    #[test]
    fn window_and_stride_restrict_indices() {
        let options = RatioOptions {
            x_axis: XAxis::Time,
            window: SeriesWindow {
                tmin: 1.0,
                tmax: 3.0,
                stride: 2,
            },
            ..RatioOptions::default()
        };
        let ratio =
            process_ratio(&table(), "All", CollisionProcess::Collide, &options).expect("ratio");

        assert_eq!(ratio, vec![(2.0, 0.5)]);
    }

    #[test]
    fn zero_stride_is_rejected() {
        let window = SeriesWindow {
            stride: 0,
            ..SeriesWindow::default()
        };
        let error = window.indices(&[0.0]).expect_err("stride 0 is invalid");
        assert_eq!(error.placeholder(), "INPUT.SERIES_STRIDE");
    }

    #[test]
    fn ratio_point_policies() {
        assert_eq!(ratio_point(2.0, 4.0, ZeroPolicy::Floor), Some(0.5));
        assert_eq!(ratio_point(2.0, 0.0, ZeroPolicy::Floor), Some(RATIO_FLOOR));
        assert_eq!(ratio_point(0.0, 4.0, ZeroPolicy::Floor), Some(0.0));
        assert_eq!(ratio_point(2.0, 0.0, ZeroPolicy::Ignore), None);
        assert_eq!(ratio_point(0.0, 4.0, ZeroPolicy::Ignore), None);
    }

    #[test]
    fn smoothing_yields_sorted_curve_of_same_length() {
        let options = RatioOptions {
            smooth: true,
            ..RatioOptions::default()
        };
        let curve =
            process_ratio(&table(), "All", CollisionProcess::Collide, &options).expect("curve");

        assert_eq!(curve.len(), 4);
        assert!(curve.windows(2).all(|pair| pair[0].0 <= pair[1].0));
    }

    #[test]
    fn ignore_zero_takes_precedence_over_smoothing() {
        let options = RatioOptions {
            smooth: true,
            zero_policy: ZeroPolicy::Ignore,
            ..RatioOptions::default()
        };
        assert!(!options.smoothing_active());
        let ratio =
            process_ratio(&table(), "All", CollisionProcess::Ionize, &options).expect("ratio");
        assert_eq!(ratio, vec![(300.0, 1.0), (400.0, 0.1)]);
    }

    #[test]
    fn scattering_series_respects_zero_policy() {
        let floor = scattering_series(&table(), "All", &RatioOptions::default()).expect("floor");
        assert_eq!(floor.len(), 4);

        let ignore = scattering_series(
            &table(),
            "All",
            &RatioOptions {
                zero_policy: ZeroPolicy::Ignore,
                ..RatioOptions::default()
            },
        )
        .expect("ignore");
        assert_eq!(ignore, vec![(100.0, 4.0), (300.0, 8.0), (400.0, 10.0)]);
    }

    #[test]
    fn unknown_species_or_field_is_reported() {
        let error = scattering_counts(&table(), "He+").expect_err("species absent");
        assert_eq!(error.placeholder(), "FORMAT.ION_COLL_SPECIES");
    }
}
