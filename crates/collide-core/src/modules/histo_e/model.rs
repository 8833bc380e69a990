use crate::domain::{DiagError, DiagResult};
use std::collections::HashMap;

const LISTING_COLUMNS: usize = 6;
const LISTING_WIDTH: usize = 10;

/// Transposed `pspHistoE` table: one column per header label.
#[derive(Debug, Clone, PartialEq)]
pub struct EnergyHistogram {
    labels: Vec<String>,
    columns: Vec<Vec<f64>>,
    positions: HashMap<String, usize>,
}

impl EnergyHistogram {
    pub(super) fn from_rows(labels: Vec<String>, rows: Vec<Vec<f64>>) -> Self {
        let mut columns = vec![Vec::with_capacity(rows.len()); labels.len()];
        for row in rows {
            for (column, value) in columns.iter_mut().zip(row) {
                column.push(value);
            }
        }
        let positions = labels
            .iter()
            .enumerate()
            .map(|(index, label)| (label.clone(), index))
            .collect();
        Self {
            labels,
            columns,
            positions,
        }
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn row_count(&self) -> usize {
        self.columns.first().map_or(0, Vec::len)
    }

    pub fn column(&self, label: &str) -> Option<&[f64]> {
        self.positions
            .get(label)
            .map(|&index| self.columns[index].as_slice())
    }

    pub fn contains(&self, label: &str) -> bool {
        self.positions.contains_key(label)
    }

    pub fn require(&self, label: &str) -> DiagResult<&[f64]> {
        self.column(label)
            .ok_or_else(|| missing_field_error(label, &self.labels))
    }

    /// Labels in `{:10}` cells, six to a line.
    pub fn label_listing(&self) -> String {
        self.labels
            .chunks(LISTING_COLUMNS)
            .map(|chunk| {
                chunk
                    .iter()
                    .map(|label| format!("{:<width$}", label, width = LISTING_WIDTH))
                    .collect::<Vec<_>>()
                    .join(" ")
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

pub(super) fn missing_field_error(label: &str, available: &[String]) -> DiagError {
    DiagError::input_validation(
        "FORMAT.HISTO_FIELD",
        format!(
            "no such field '{}'; available data is: {}",
            label,
            available.join(" ")
        ),
    )
}

#[cfg(test)]
mod tests {
    use super::EnergyHistogram;

    fn histogram() -> EnergyHistogram {
        EnergyHistogram::from_rows(
            vec!["Energy".to_string(), "Total_i".to_string()],
            vec![vec![0.5, 10.0], vec![1.5, 4.0]],
        )
    }

    #[test]
    fn rows_are_transposed_into_columns() {
        let histogram = histogram();
        assert_eq!(histogram.row_count(), 2);
        assert_eq!(histogram.column("Energy"), Some(&[0.5, 1.5][..]));
        assert_eq!(histogram.column("Total_i"), Some(&[10.0, 4.0][..]));
        assert!(histogram.column("Total_e").is_none());
    }

    #[test]
    fn missing_field_lists_available_labels() {
        let error = histogram().require("Total_e").expect_err("absent");
        assert_eq!(error.placeholder(), "FORMAT.HISTO_FIELD");
        assert!(error.message().ends_with("Energy Total_i"));
    }

    #[test]
    fn listing_wraps_after_six_labels() {
        let labels = (1..=7).map(|n| format!("L{n}")).collect::<Vec<_>>();
        let listing = EnergyHistogram::from_rows(labels, vec![]).label_listing();
        let lines = listing.lines().collect::<Vec<_>>();

        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("L1         L2"));
        assert_eq!(lines[1], "L7        ");
    }
}
