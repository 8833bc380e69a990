use super::dialect::{RecordDialect, TrailerLayout, species_index, split_record};
use super::model::{DiagnosticTable, ParseReport, RowMismatch, SpeciesSet};
use crate::domain::{DiagError, ParserResult};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

const SPECIES_MARKER: &str = "Species";
const LABEL_MARKER: &str = "Time";
const INDEX_MARKER: &str = "[1]";
const COMMENT_MARKER: char = '#';

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParseOptions {
    /// Forces the trailer layout instead of sniffing it from the label line.
    pub trailer: Option<TrailerLayout>,
}

pub fn read_ion_coll(path: impl AsRef<Path>, options: ParseOptions) -> ParserResult<DiagnosticTable> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| {
        DiagError::io_system(
            "IO.ION_COLL_OPEN",
            format!("failed to open ION_coll file '{}': {}", path.display(), source),
        )
    })?;
    tracing::debug!(path = %path.display(), "reading ION_coll file");
    parse_ion_coll(BufReader::new(file), options)
}

pub fn parse_ion_coll<R: BufRead>(reader: R, options: ParseOptions) -> ParserResult<DiagnosticTable> {
    let mut builder = TableBuilder::new(options);
    for (offset, line) in reader.lines().enumerate() {
        let line = line.map_err(|source| {
            DiagError::io_system(
                "IO.ION_COLL_READ",
                format!("failed to read ION_coll line {}: {}", offset + 1, source),
            )
        })?;
        builder.consume(offset + 1, &line)?;
    }
    builder.finish()
}

#[derive(Debug)]
struct TableBuilder {
    options: ParseOptions,
    species: Option<SpeciesSet>,
    dialect: RecordDialect,
    labels: Option<Vec<String>>,
    index_seen: bool,
    fields: BTreeMap<String, usize>,
    columns: Vec<BTreeMap<String, Vec<f64>>>,
    time: Vec<f64>,
    temp: Vec<f64>,
    etot: Vec<f64>,
    report: ParseReport,
}

impl TableBuilder {
    fn new(options: ParseOptions) -> Self {
        Self {
            options,
            species: None,
            dialect: RecordDialect::default(),
            labels: None,
            index_seen: false,
            fields: BTreeMap::new(),
            columns: Vec::new(),
            time: Vec::new(),
            temp: Vec::new(),
            etot: Vec::new(),
            report: ParseReport::default(),
        }
    }

    // A single line may carry several roles; each test is independent.
    fn consume(&mut self, line_number: usize, line: &str) -> ParserResult<()> {
        if line.contains(SPECIES_MARKER) {
            self.set_species(line_number, SpeciesSet::from_header(line))?;
        }
        if line.contains(LABEL_MARKER) {
            self.set_labels(line_number, line)?;
        }
        if line.contains(INDEX_MARKER) {
            self.register_index(line_number, line)?;
        }
        if !line.contains(COMMENT_MARKER) {
            self.push_data(line_number, line)?;
        }
        Ok(())
    }

    fn set_species(&mut self, line_number: usize, species: SpeciesSet) -> ParserResult<()> {
        match self.species {
            Some(current) if current == species => Ok(()),
            Some(current) => Err(header_error(format!(
                "species header at line {} selects {:?} but the file already declared {:?}",
                line_number, species, current
            ))),
            None => {
                tracing::debug!(line = line_number, species = ?species, "species set fixed");
                self.columns = vec![BTreeMap::new(); species.labels().len()];
                self.species = Some(species);
                Ok(())
            }
        }
    }

    fn set_labels(&mut self, line_number: usize, line: &str) -> ParserResult<()> {
        let labels = split_record(line);
        let mut dialect = RecordDialect::sniff(line);
        if let Some(trailer) = self.options.trailer {
            dialect = dialect.with_trailer(trailer);
        }

        if self.report.accepted_rows > 0
            && (self.labels.as_ref() != Some(&labels) || self.dialect != dialect)
        {
            return Err(header_error(format!(
                "column labels at line {} differ from the labels already used for {} rows",
                line_number, self.report.accepted_rows
            )));
        }

        tracing::debug!(
            line = line_number,
            labels = labels.len(),
            stride = dialect.stride(),
            tail = dialect.tail(),
            "record dialect sniffed"
        );
        self.dialect = dialect;
        self.labels = Some(labels);
        Ok(())
    }

    fn register_index(&mut self, line_number: usize, line: &str) -> ParserResult<()> {
        let species = self.require_species(line_number, "index header")?;
        let labels = self.require_labels(line_number, "index header")?.clone();
        let tokens = split_record(line);
        let dialect = self.dialect;

        for position in dialect.species_columns(tokens.len()) {
            let token = &tokens[position];
            let label_index = parse_bracketed_index(token).ok_or_else(|| {
                header_error(format!(
                    "index header at line {} has malformed column tag '{}' at position {}",
                    line_number,
                    token,
                    position + 1
                ))
            })?;
            let label = labels.get(label_index).ok_or_else(|| {
                header_error(format!(
                    "index header at line {} refers to column {} but only {} labels are known",
                    line_number,
                    label_index + 1,
                    labels.len()
                ))
            })?;
            let block = block_for(species, position, dialect, line_number)?;

            self.fields.insert(label.clone(), position);
            self.columns[block].entry(label.clone()).or_default();
        }

        self.index_seen = true;
        Ok(())
    }

    fn push_data(&mut self, line_number: usize, line: &str) -> ParserResult<()> {
        let tokens = split_record(line);
        if tokens.is_empty() {
            return Ok(());
        }
        let values = tokens
            .iter()
            .enumerate()
            .map(|(position, token)| parse_value(token, line_number, position))
            .collect::<ParserResult<Vec<_>>>()?;

        if values.iter().skip(2).all(|value| *value == 0.0) {
            self.report.zero_rows += 1;
            return Ok(());
        }

        let species = self.require_species(line_number, "data row")?;
        let label_count = self.require_labels(line_number, "data row")?.len();
        if values.len() != label_count {
            tracing::warn!(
                line = line_number,
                toks = values.len(),
                labels = label_count,
                "row token count does not match label count; row skipped"
            );
            self.report.mismatched.push(RowMismatch {
                line_number,
                token_count: values.len(),
                label_count,
            });
            return Ok(());
        }

        let dialect = self.dialect;
        let energy_column = dialect.energy_column(values.len()).ok_or_else(|| {
            header_error(format!(
                "data row at line {} is too short to carry a total-energy column",
                line_number
            ))
        })?;

        for position in dialect.species_columns(values.len()) {
            let block = block_for(species, position, dialect, line_number)?;
            let label = self
                .labels
                .as_ref()
                .and_then(|labels| labels.get(position))
                .ok_or_else(|| {
                    header_error(format!(
                        "data row at line {} has no label for column {}",
                        line_number,
                        position + 1
                    ))
                })?;
            let column = self.columns[block].get_mut(label).ok_or_else(|| {
                header_error(format!(
                    "column '{}' of species '{}' at line {} was not declared by the index header",
                    label,
                    species.labels()[block],
                    line_number
                ))
            })?;
            column.push(values[position]);
        }

        self.time.push(values[0]);
        self.temp.push(values[1]);
        self.etot.push(values[energy_column]);
        self.report.accepted_rows += 1;
        Ok(())
    }

    fn require_species(&self, line_number: usize, context: &str) -> ParserResult<SpeciesSet> {
        self.species.ok_or_else(|| {
            header_error(format!(
                "{} at line {} precedes the Species header",
                context, line_number
            ))
        })
    }

    fn require_labels(&self, line_number: usize, context: &str) -> ParserResult<&Vec<String>> {
        self.labels.as_ref().ok_or_else(|| {
            header_error(format!(
                "{} at line {} precedes the Time label header",
                context, line_number
            ))
        })
    }

    fn finish(self) -> ParserResult<DiagnosticTable> {
        let missing = [
            (self.species.is_none(), "Species"),
            (self.labels.is_none(), "Time label"),
            (!self.index_seen, "[1] index"),
        ]
        .into_iter()
        .filter_map(|(absent, name)| absent.then_some(name))
        .collect::<Vec<_>>();

        if !missing.is_empty() {
            return Err(header_error(format!(
                "ION_coll input is missing the {} header(s)",
                missing.join(", ")
            )));
        }
        let (Some(species), Some(labels)) = (self.species, self.labels) else {
            return Err(header_error("ION_coll input is missing its headers".to_string()));
        };

        let rows = self.time.len();
        for (block, fields) in self.columns.iter().enumerate() {
            if let Some((label, values)) = fields.iter().find(|(_, values)| values.len() != rows) {
                return Err(DiagError::input_validation(
                    "FORMAT.ION_COLL_COLUMNS",
                    format!(
                        "column '{}' of species '{}' holds {} values but {} rows were accepted",
                        label,
                        species.labels()[block],
                        values.len(),
                        rows
                    ),
                ));
            }
        }

        tracing::debug!(
            rows,
            zero_rows = self.report.zero_rows,
            mismatched = self.report.mismatched_rows(),
            "ION_coll table parsed"
        );

        Ok(DiagnosticTable {
            species,
            dialect: self.dialect,
            labels,
            fields: self.fields,
            columns: self.columns,
            time: self.time,
            temp: self.temp,
            etot: self.etot,
            report: self.report,
        })
    }
}

fn block_for(
    species: SpeciesSet,
    position: usize,
    dialect: RecordDialect,
    line_number: usize,
) -> ParserResult<usize> {
    let block = species_index(position, dialect.head(), dialect.stride());
    if block >= species.labels().len() {
        return Err(header_error(format!(
            "column {} at line {} falls in species block {} but only {} species are declared",
            position + 1,
            line_number,
            block,
            species.labels().len()
        )));
    }
    Ok(block)
}

/// `(N)` or `[N]` to the 0-based column `N - 1`.
fn parse_bracketed_index(token: &str) -> Option<usize> {
    let mut chars = token.chars();
    chars.next()?;
    chars.next_back()?;
    chars.as_str().trim().parse::<usize>().ok()?.checked_sub(1)
}

fn parse_value(token: &str, line_number: usize, position: usize) -> ParserResult<f64> {
    token.parse::<f64>().map_err(|_| {
        DiagError::input_validation(
            "FORMAT.ION_COLL_NUMERIC",
            format!(
                "malformed numeric token '{}' at line {}, column {}",
                token,
                line_number,
                position + 1
            ),
        )
    })
}

fn header_error(message: String) -> DiagError {
    DiagError::input_validation("FORMAT.ION_COLL_HEADER", message)
}
