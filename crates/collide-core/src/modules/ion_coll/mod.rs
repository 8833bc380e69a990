//! Reader and derived metrics for the `*.ION_coll` collision-count diagnostics.

pub mod dialect;
pub mod figures;
pub mod metrics;
mod model;
mod parser;
pub mod summary;

pub use dialect::{RecordDialect, SpeciesBlockLayout, TrailerLayout, species_index};
pub use figures::{FigureOptions, ion_coll_figures};
pub use metrics::{
    CollisionProcess, RatioOptions, SeriesWindow, XAxis, ZeroPolicy, process_ratio,
    scattering_counts, scattering_series,
};
pub use model::{
    AGGREGATE_SPECIES_MARKER, DiagnosticTable, ParseReport, RowMismatch, SpeciesSet,
};
pub use parser::{ParseOptions, parse_ion_coll, read_ion_coll};
pub use summary::{IonizationSummary, SummaryEntry, summarize};
