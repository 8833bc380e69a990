use super::model::EnergyHistogram;
use crate::domain::{DiagError, ParserResult};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Second-column marker of the out-of-range bin row.
pub const OVERFLOW_MARKER: &str = "Overflow";

pub fn read_energy_histogram(path: impl AsRef<Path>) -> ParserResult<EnergyHistogram> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| {
        DiagError::io_system(
            "IO.HISTO_OPEN",
            format!("failed to open pspHistoE file '{}': {}", path.display(), source),
        )
    })?;
    parse_energy_histogram(BufReader::new(file))
}

pub fn parse_energy_histogram<R: BufRead>(reader: R) -> ParserResult<EnergyHistogram> {
    let mut lines = reader.lines().enumerate();

    let labels = match lines.next() {
        Some((_, line)) => {
            let line = line.map_err(|source| read_error(1, source))?;
            let mut chars = line.chars();
            chars.next();
            chars
                .as_str()
                .split_whitespace()
                .map(str::to_string)
                .collect::<Vec<_>>()
        }
        None => Vec::new(),
    };
    if labels.is_empty() {
        return Err(DiagError::input_validation(
            "FORMAT.HISTO_HEADER",
            "pspHistoE input has no label line",
        ));
    }

    // Separator line.
    if let Some((_, line)) = lines.next() {
        line.map_err(|source| read_error(2, source))?;
    }

    let mut rows = Vec::new();
    let mut skipped = 0usize;
    for (offset, line) in lines {
        let line_number = offset + 1;
        let line = line.map_err(|source| read_error(line_number, source))?;
        let tokens = line.split_whitespace().collect::<Vec<_>>();
        if tokens.len() != labels.len() || tokens.get(1) == Some(&OVERFLOW_MARKER) {
            if !tokens.is_empty() {
                skipped += 1;
            }
            continue;
        }
        let row = tokens
            .iter()
            .enumerate()
            .map(|(position, token)| {
                token.parse::<f64>().map_err(|_| {
                    DiagError::input_validation(
                        "FORMAT.HISTO_NUMERIC",
                        format!(
                            "malformed numeric token '{}' at line {}, column {}",
                            token,
                            line_number,
                            position + 1
                        ),
                    )
                })
            })
            .collect::<ParserResult<Vec<_>>>()?;
        rows.push(row);
    }

    tracing::debug!(
        labels = labels.len(),
        rows = rows.len(),
        skipped,
        "pspHistoE table parsed"
    );
    Ok(EnergyHistogram::from_rows(labels, rows))
}

fn read_error(line_number: usize, source: std::io::Error) -> DiagError {
    DiagError::io_system(
        "IO.HISTO_READ",
        format!("failed to read pspHistoE line {}: {}", line_number, source),
    )
}
