use super::metrics::{CollisionProcess, scattering_counts};
use super::model::{DiagnosticTable, SpeciesSet};
use crate::common::format_general_width;
use crate::domain::DiagResult;
use serde::Serialize;

const SUMMARY_RULE: &str = "--------------------------------";
const SUMMARY_TITLE: &str = "Ionization/recombination summary";
const COLUMN_WIDTH: usize = 13;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryEntry {
    pub species: String,
    pub process: CollisionProcess,
    pub scattering_total: f64,
    pub event_total: f64,
    /// `None` when the scattering total is zero.
    pub ratio: Option<f64>,
}

impl SummaryEntry {
    fn tag(&self) -> &'static str {
        match self.process {
            CollisionProcess::Ionize => "ionz",
            CollisionProcess::Recombine => "rcmb",
            CollisionProcess::Collide => "coll",
            CollisionProcess::FreeFree => "ffree",
        }
    }

    pub fn render_line(&self) -> String {
        let ratio = match self.ratio {
            Some(ratio) => format_general_width(ratio, COLUMN_WIDTH),
            None => format!("{:<width$}", "inf", width = COLUMN_WIDTH),
        };
        format!(
            "N({:<6}{}) = {} {} {}",
            format!("{},", self.species),
            self.tag(),
            format_general_width(self.scattering_total, COLUMN_WIDTH),
            format_general_width(self.event_total, COLUMN_WIDTH),
            ratio
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IonizationSummary {
    pub entries: Vec<SummaryEntry>,
}

impl IonizationSummary {
    pub fn render_text(&self) -> String {
        let mut lines = vec![
            SUMMARY_RULE.to_string(),
            SUMMARY_TITLE.to_string(),
            SUMMARY_RULE.to_string(),
        ];
        lines.extend(self.entries.iter().map(SummaryEntry::render_line));
        lines.join("\n")
    }
}

/// Species/process pairs reported for each species set.
pub fn summary_targets(species: SpeciesSet) -> &'static [(&'static str, CollisionProcess)] {
    match species {
        SpeciesSet::IonElectron => &[
            ("H", CollisionProcess::Ionize),
            ("H+", CollisionProcess::Recombine),
            ("He+", CollisionProcess::Ionize),
            ("He++", CollisionProcess::Recombine),
        ],
        SpeciesSet::Aggregate => &[
            ("All", CollisionProcess::Ionize),
            ("All", CollisionProcess::Recombine),
        ],
    }
}

/// Whole-run totals; no time window or stride is applied.
pub fn summarize(table: &DiagnosticTable) -> DiagResult<IonizationSummary> {
    let entries = summary_targets(table.species_set())
        .iter()
        .map(|&(species, process)| {
            let scattering_total = scattering_counts(table, species)?.iter().sum::<f64>();
            let event_total = table
                .require_column(species, process.field())?
                .iter()
                .sum::<f64>();
            Ok(SummaryEntry {
                species: species.to_string(),
                process,
                scattering_total,
                event_total,
                ratio: (scattering_total > 0.0).then(|| event_total / scattering_total),
            })
        })
        .collect::<DiagResult<Vec<_>>>()?;
    Ok(IonizationSummary { entries })
}

#[cfg(test)]
mod tests {
    use super::{IonizationSummary, SummaryEntry, summarize};
    use crate::modules::ion_coll::metrics::CollisionProcess;
    use crate::modules::ion_coll::{ParseOptions, parse_ion_coll};

    #[test]
    fn line_layout_matches_fixed_columns() {
        let entry = SummaryEntry {
            species: "H".to_string(),
            process: CollisionProcess::Ionize,
            scattering_total: 200.0,
            event_total: 5.0,
            ratio: Some(0.025),
        };
        assert_eq!(
            entry.render_line(),
            "N(H,    ionz) =           200             5         0.025"
        );
    }

    #[test]
    fn zero_scattering_prints_inf() {
        let entry = SummaryEntry {
            species: "He++".to_string(),
            process: CollisionProcess::Recombine,
            scattering_total: 0.0,
            event_total: 3.0,
            ratio: None,
        };
        assert_eq!(
            entry.render_line(),
            "N(He++, rcmb) =             0             3 inf          "
        );
    }

    #[test]
    fn text_starts_with_banner() {
        let text = IonizationSummary { entries: vec![] }.render_text();
        assert_eq!(
            text,
            "--------------------------------\nIonization/recombination summary\n--------------------------------"
        );
    }

    #[test]
    fn aggregate_summary_totals_whole_series() {
        let source = "\
# Species: (65535, 65535)
# Time | Temp | N(nn) | N(ne) | N(ie) | N(ce) | N(ci) | N(ff) | N(rr) | X | Y | Etot | Eloss
# [1] | [2] | [3] | [4] | [5] | [6] | [7] | [8] | [9] | [10] | [11] | [12] | [13]
0.0 100.0 1 1 2 2 0 1 0 0 0 9 0
1.0 200.0 2 2 4 4 8 0 1 0 0 9 0
";
        let table =
            parse_ion_coll(source.as_bytes(), ParseOptions::default()).expect("table should parse");

        let summary = summarize(&table).expect("summary");

        assert_eq!(summary.entries.len(), 2);
        assert_eq!(summary.entries[0].scattering_total, 12.0);
        assert_eq!(summary.entries[0].event_total, 8.0);
        assert_eq!(summary.entries[1].event_total, 1.0);
        assert!(summary.render_text().contains("N(All,  ionz)"));
    }
}
