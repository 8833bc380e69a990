use super::dialect::RecordDialect;
use crate::domain::{DiagError, DiagResult};
use serde::Serialize;
use std::collections::BTreeMap;

/// Header marker identifying a file that aggregates every species into one block.
pub const AGGREGATE_SPECIES_MARKER: &str = "(65535, 65535)";

const AGGREGATE_SPECIES: [&str; 1] = ["All"];
const ION_ELECTRON_SPECIES: [&str; 5] = ["H", "H+", "He", "He+", "He++"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum SpeciesSet {
    Aggregate,
    IonElectron,
}

impl SpeciesSet {
    pub fn from_header(line: &str) -> Self {
        if line.contains(AGGREGATE_SPECIES_MARKER) {
            Self::Aggregate
        } else {
            Self::IonElectron
        }
    }

    pub const fn labels(self) -> &'static [&'static str] {
        match self {
            Self::Aggregate => &AGGREGATE_SPECIES,
            Self::IonElectron => &ION_ELECTRON_SPECIES,
        }
    }

    pub fn position(self, species: &str) -> Option<usize> {
        self.labels().iter().position(|label| *label == species)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RowMismatch {
    pub line_number: usize,
    pub token_count: usize,
    pub label_count: usize,
}

/// Per-file accounting of how every data line was disposed of.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ParseReport {
    pub accepted_rows: usize,
    pub zero_rows: usize,
    pub mismatched: Vec<RowMismatch>,
}

impl ParseReport {
    pub fn mismatched_rows(&self) -> usize {
        self.mismatched.len()
    }

    pub fn data_lines(&self) -> usize {
        self.accepted_rows + self.zero_rows + self.mismatched_rows()
    }
}

/// Parsed `*.ION_coll` content. Immutable once built by the parser.
#[derive(Debug, Clone, PartialEq)]
pub struct DiagnosticTable {
    pub(super) species: SpeciesSet,
    pub(super) dialect: RecordDialect,
    pub(super) labels: Vec<String>,
    pub(super) fields: BTreeMap<String, usize>,
    pub(super) columns: Vec<BTreeMap<String, Vec<f64>>>,
    pub(super) time: Vec<f64>,
    pub(super) temp: Vec<f64>,
    pub(super) etot: Vec<f64>,
    pub(super) report: ParseReport,
}

impl DiagnosticTable {
    pub fn species_set(&self) -> SpeciesSet {
        self.species
    }

    pub fn species(&self) -> &'static [&'static str] {
        self.species.labels()
    }

    pub fn dialect(&self) -> RecordDialect {
        self.dialect
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Raw 0-based column position of `label`, from the index header.
    pub fn field_index(&self, label: &str) -> Option<usize> {
        self.fields.get(label).copied()
    }

    pub fn fields(&self) -> &BTreeMap<String, usize> {
        &self.fields
    }

    pub fn time(&self) -> &[f64] {
        &self.time
    }

    pub fn temp(&self) -> &[f64] {
        &self.temp
    }

    pub fn etot(&self) -> &[f64] {
        &self.etot
    }

    pub fn report(&self) -> &ParseReport {
        &self.report
    }

    pub fn row_count(&self) -> usize {
        self.time.len()
    }

    pub fn column(&self, species: &str, field: &str) -> Option<&[f64]> {
        let index = self.species.position(species)?;
        self.columns
            .get(index)?
            .get(field)
            .map(|values| values.as_slice())
    }

    /// Field labels registered for `species`, in sorted order.
    pub fn fields_for(&self, species: &str) -> Vec<&str> {
        self.species
            .position(species)
            .and_then(|index| self.columns.get(index))
            .map(|fields| fields.keys().map(String::as_str).collect())
            .unwrap_or_default()
    }

    pub fn require_column(&self, species: &str, field: &str) -> DiagResult<&[f64]> {
        if self.species.position(species).is_none() {
            return Err(DiagError::input_validation(
                "FORMAT.ION_COLL_SPECIES",
                format!(
                    "species '{}' is not present; available species: {}",
                    species,
                    self.species().join(", ")
                ),
            ));
        }
        self.column(species, field).ok_or_else(|| {
            DiagError::input_validation(
                "FORMAT.ION_COLL_FIELD",
                format!(
                    "field '{}' is not present for species '{}'; available fields: {}",
                    field,
                    species,
                    self.fields_for(species).join(" ")
                ),
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::{ParseReport, RowMismatch, SpeciesSet};

    #[test]
    fn species_set_follows_aggregate_marker() {
        assert_eq!(
            SpeciesSet::from_header("# Species: (65535, 65535)"),
            SpeciesSet::Aggregate
        );
        assert_eq!(SpeciesSet::from_header("# Species: (1, 0) (1, 1)").labels().len(), 5);
        assert_eq!(SpeciesSet::Aggregate.labels(), &["All"]);
    }

    #[test]
    fn species_positions_follow_fixed_order() {
        assert_eq!(SpeciesSet::IonElectron.position("He+"), Some(3));
        assert_eq!(SpeciesSet::IonElectron.position("All"), None);
    }

    #[test]
    fn report_totals_every_disposition() {
        let report = ParseReport {
            accepted_rows: 3,
            zero_rows: 2,
            mismatched: vec![RowMismatch {
                line_number: 9,
                token_count: 4,
                label_count: 6,
            }],
        };
        assert_eq!(report.mismatched_rows(), 1);
        assert_eq!(report.data_lines(), 6);
    }
}
