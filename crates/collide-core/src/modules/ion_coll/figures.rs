use super::metrics::{CollisionProcess, RatioOptions, process_ratio, scattering_series};
use super::model::DiagnosticTable;
use crate::domain::DiagResult;
use crate::modules::figure::{Figure, MarkerStyle, Panel, Series, SeriesStyle, file_safe_label};

/// The two curves of the He+/He++ balance plot, each its own (species, process) pair.
pub const EQUILIBRIUM_CURVES: [(&str, CollisionProcess, &str); 2] = [
    ("He+", CollisionProcess::Ionize, "He+ ionize"),
    ("He++", CollisionProcess::Recombine, "He++ recomb"),
];

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FigureOptions {
    pub ratio: RatioOptions,
    pub marker: MarkerStyle,
}

impl FigureOptions {
    fn series_style(&self) -> SeriesStyle {
        if self.ratio.smoothing_active() {
            SeriesStyle::Smooth
        } else {
            SeriesStyle::Markers(self.marker)
        }
    }

    fn x_label(&self) -> &'static str {
        self.ratio.x_axis.label()
    }
}

/// Every figure of an `ion-coll` run, in display order.
pub fn ion_coll_figures(table: &DiagnosticTable, options: &FigureOptions) -> DiagResult<Vec<Figure>> {
    let mut figures = vec![process_ratio_figure(table, options)?];
    figures.extend(species_figures(table, options)?);
    if let Some(equilibrium) = equilibrium_figure(table, options)? {
        figures.push(equilibrium);
    }
    figures.push(scattering_figure(table, options)?);
    Ok(figures)
}

/// 2x2 grid, one panel per process, one series per species.
pub fn process_ratio_figure(table: &DiagnosticTable, options: &FigureOptions) -> DiagResult<Figure> {
    let panels = CollisionProcess::ALL
        .iter()
        .map(|&process| {
            let series = table
                .species()
                .iter()
                .map(|&species| {
                    let points = process_ratio(table, species, process, &options.ratio)?;
                    Ok(Series::new(species, points, options.series_style()))
                })
                .collect::<DiagResult<Vec<_>>>()?;
            Ok(Panel::new(process.label(), options.x_label(), "Ratio", series))
        })
        .collect::<DiagResult<Vec<_>>>()?;
    Ok(Figure::grid("process-ratios", "Process ratios", 2, 2, panels))
}

/// One figure per species with all four process ratios.
pub fn species_figures(table: &DiagnosticTable, options: &FigureOptions) -> DiagResult<Vec<Figure>> {
    table
        .species()
        .iter()
        .map(|&species| {
            let series = CollisionProcess::ALL
                .iter()
                .map(|&process| {
                    let points = process_ratio(table, species, process, &options.ratio)?;
                    Ok(Series::new(process.label(), points, options.series_style()))
                })
                .collect::<DiagResult<Vec<_>>>()?;
            Ok(Figure::single(
                format!("species-{}", file_safe_label(species)),
                Panel::new(species, options.x_label(), "Ratio", series),
            ))
        })
        .collect()
}

/// He+ ionization against He++ recombination; `None` without those species.
pub fn equilibrium_figure(
    table: &DiagnosticTable,
    options: &FigureOptions,
) -> DiagResult<Option<Figure>> {
    if EQUILIBRIUM_CURVES
        .iter()
        .any(|(species, _, _)| table.species_set().position(species).is_none())
    {
        return Ok(None);
    }

    let series = EQUILIBRIUM_CURVES
        .iter()
        .map(|&(species, process, label)| {
            let points = process_ratio(table, species, process, &options.ratio)?;
            Ok(Series::new(label, points, options.series_style()))
        })
        .collect::<DiagResult<Vec<_>>>()?;
    Ok(Some(Figure::single(
        "equilibrium",
        Panel::new("He+/He++ equilibrium", options.x_label(), "Ratio", series),
    )))
}

pub fn scattering_figure(table: &DiagnosticTable, options: &FigureOptions) -> DiagResult<Figure> {
    let series = table
        .species()
        .iter()
        .map(|&species| {
            let points = scattering_series(table, species, &options.ratio)?;
            Ok(Series::new(species, points, options.series_style()))
        })
        .collect::<DiagResult<Vec<_>>>()?;
    Ok(Figure::single(
        "scattering",
        Panel::new("Scattering counts", options.x_label(), "Counts", series),
    ))
}

#[cfg(test)]
mod tests {
    use super::{FigureOptions, equilibrium_figure, ion_coll_figures};
    use crate::modules::figure::SeriesStyle;
    use crate::modules::ion_coll::metrics::RatioOptions;
    use crate::modules::ion_coll::{ParseOptions, parse_ion_coll};

    fn quintet_source() -> String {
        // `N(nn)` in the label line selects 16-column species blocks.
        let fields = ["N(nn)", "N(ne)", "N(ie)", "N(ce)", "N(ci)", "N(ff)", "N(rr)"];
        let mut labels = vec!["Time".to_string(), "Temp".to_string()];
        for _ in 0..5 {
            labels.extend(fields.iter().map(|field| field.to_string()));
            labels.extend((1..=9).map(|n| format!("F{n}")));
        }
        labels.extend(["Etot".to_string(), "Eloss".to_string()]);
        let index = (1..=labels.len())
            .map(|n| format!("[{n}]"))
            .collect::<Vec<_>>()
            .join(" | ");
        let block = "1 1 1 2 1 0 1 0 0 0 0 0 0 0 0 0";
        let row = |time: f64| {
            format!(
                "{time} {} {} 7.0 0.0",
                100.0 + time,
                vec![block; 5].join(" ")
            )
        };
        format!(
            "# Species: (1, 0) (1, 1) (2, 0) (2, 1) (2, 2)\n# {}\n# {}\n{}\n{}\n",
            labels.join(" | "),
            index,
            row(0.0),
            row(1.0)
        )
    }

    #[test]
    fn quintet_file_builds_all_figures() {
        let table = parse_ion_coll(quintet_source().as_bytes(), ParseOptions::default())
            .expect("quintet should parse");
        assert_eq!(table.species().len(), 5);

        let figures = ion_coll_figures(&table, &FigureOptions::default()).expect("figures");

        let names = figures.iter().map(|figure| figure.name.as_str()).collect::<Vec<_>>();
        assert_eq!(
            names,
            vec![
                "process-ratios",
                "species-H",
                "species-Hp",
                "species-He",
                "species-Hep",
                "species-Hepp",
                "equilibrium",
                "scattering"
            ]
        );
        assert_eq!(figures[0].panels.len(), 4);
        assert_eq!(figures[0].panels[0].series.len(), 5);
        let collide = &figures[0].panels[0].series[0];
        assert_eq!(collide.points, vec![(100.0, 2.0 / 3.0), (101.0, 2.0 / 3.0)]);
    }

    #[test]
    fn equilibrium_is_skipped_for_aggregate_files() {
        let source = "\
# Species: (65535, 65535)
# Time | Temp | N(nn) | N(ne) | N(ie) | N(ce) | N(ci) | N(ff) | N(rr) | X | Y | Etot | Eloss
# [1] | [2] | [3] | [4] | [5] | [6] | [7] | [8] | [9] | [10] | [11] | [12] | [13]
0.0 100.0 1 1 2 2 0 1 0 0 0 9 0
";
        let table =
            parse_ion_coll(source.as_bytes(), ParseOptions::default()).expect("table should parse");

        assert!(equilibrium_figure(&table, &FigureOptions::default())
            .expect("figure")
            .is_none());
        assert_eq!(
            ion_coll_figures(&table, &FigureOptions::default())
                .expect("figures")
                .len(),
            3
        );
    }

    #[test]
    fn smoothing_switches_series_style() {
        let options = FigureOptions {
            ratio: RatioOptions {
                smooth: true,
                ..RatioOptions::default()
            },
            ..FigureOptions::default()
        };
        assert_eq!(options.series_style(), SeriesStyle::Smooth);
    }
}
