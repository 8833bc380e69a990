//! Record layout of an `*.ION_coll` file, sniffed once from the label line.
//!
//! The trailer widths are tied to an undocumented upstream writer: 2 for the
//! plain record, 12 once energy-ratio columns are present, and 7 for a
//! record whose total energy is the final column. None of them is explained
//! by the writer's headers; treat them as observed facts.

use serde::Serialize;

/// Leading `Time Temp` columns that precede the species blocks.
pub const HEADER_COLUMNS: usize = 2;
pub const STANDARD_TRAILER: usize = 2;
pub const ENERGY_RATIO_TRAILER: usize = 12;
pub const TOTAL_ENERGY_LAST_TRAILER: usize = 7;

const WEIGHTED_MARKER: &str = "W(";
const NEUTRAL_MARKER: &str = "N(nn)";
const ENERGY_RATIO_MARKERS: [&str; 2] = ["EratC", "Efrac"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub enum SpeciesBlockLayout {
    #[default]
    Basic,
    Weighted,
    Neutral,
}

impl SpeciesBlockLayout {
    pub const fn stride(self) -> usize {
        match self {
            Self::Basic => 9,
            Self::Weighted => 13,
            Self::Neutral => 16,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub enum TrailerLayout {
    #[default]
    Standard,
    EnergyRatio,
    TotalEnergyLast,
}

impl TrailerLayout {
    pub const fn width(self) -> usize {
        match self {
            Self::Standard => STANDARD_TRAILER,
            Self::EnergyRatio => ENERGY_RATIO_TRAILER,
            Self::TotalEnergyLast => TOTAL_ENERGY_LAST_TRAILER,
        }
    }

    /// Position of the total-energy token counted back from the row end.
    pub const fn energy_offset_from_end(self) -> usize {
        if self.width() == TOTAL_ENERGY_LAST_TRAILER {
            1
        } else {
            2
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub struct RecordDialect {
    pub block: SpeciesBlockLayout,
    pub trailer: TrailerLayout,
}

impl RecordDialect {
    /// Derive the dialect from the raw label line. `N(nn)` wins over `W(`.
    pub fn sniff(label_line: &str) -> Self {
        let block = if label_line.contains(NEUTRAL_MARKER) {
            SpeciesBlockLayout::Neutral
        } else if label_line.contains(WEIGHTED_MARKER) {
            SpeciesBlockLayout::Weighted
        } else {
            SpeciesBlockLayout::Basic
        };
        let trailer = if ENERGY_RATIO_MARKERS
            .iter()
            .any(|marker| label_line.contains(marker))
        {
            TrailerLayout::EnergyRatio
        } else {
            TrailerLayout::Standard
        };
        Self { block, trailer }
    }

    pub const fn with_trailer(self, trailer: TrailerLayout) -> Self {
        Self {
            block: self.block,
            trailer,
        }
    }

    pub const fn stride(self) -> usize {
        self.block.stride()
    }

    pub const fn head(self) -> usize {
        HEADER_COLUMNS
    }

    pub const fn tail(self) -> usize {
        self.trailer.width()
    }

    /// Range of flat column positions that belong to species blocks.
    pub fn species_columns(self, token_count: usize) -> std::ops::Range<usize> {
        self.head()..token_count.saturating_sub(self.tail()).max(self.head())
    }

    /// Index of the total-energy token in a row of `token_count` tokens.
    pub fn energy_column(self, token_count: usize) -> Option<usize> {
        token_count.checked_sub(self.trailer.energy_offset_from_end())
    }
}

/// Species block that owns flat column `column_index`.
pub const fn species_index(column_index: usize, head: usize, stride: usize) -> usize {
    (column_index - head) / stride
}

/// Replace the `#` and `|` decorations with spaces and split on whitespace.
pub fn split_record(line: &str) -> Vec<String> {
    line.replace(['#', '|'], " ")
        .split_whitespace()
        .map(str::to_string)
        .collect()
}
