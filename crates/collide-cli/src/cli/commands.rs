use super::CliError;
use super::dispatch::tool_command_spec;
use super::helpers::{figure_stem, input_path_for, write_figures};
use anyhow::Context;
use collide_core::domain::{AnalysisTool, DiagError};
use collide_core::modules::figure::{DEFAULT_MARKER_SIZE, Figure, MarkerStyle};
use collide_core::modules::histo_e::{
    EnergyHistogram, HistogramPreset, compare_to_maxwellian, read_energy_histogram,
};
use collide_core::modules::ion_coll::metrics::{DEFAULT_TIME_MAX, DEFAULT_TIME_MIN};
use collide_core::modules::ion_coll::{
    FigureOptions, ParseOptions, RatioOptions, SeriesWindow, TrailerLayout, XAxis, ZeroPolicy,
    ion_coll_figures, read_ion_coll, summarize,
};
use std::path::{Path, PathBuf};

const HISTO_FIELD_PLACEHOLDER: &str = "FORMAT.HISTO_FIELD";
const HISTO_FIGURE_NAME: &str = "energy";
/// Exit status when a requested histogram column does not exist.
const MISSING_FIELD_EXIT_CODE: i32 = 1;

#[derive(clap::Args)]
pub(super) struct IonCollArgs {
    /// Run tag; the input file is <RUNTAG>.ION_coll
    #[arg(value_name = "RUNTAG", default_value = "run")]
    runtag: String,

    /// Use unconnected dot markers instead of joined stars
    #[arg(short = 'p', long)]
    point: bool,

    /// Marker size
    #[arg(short = 'm', long, default_value_t = DEFAULT_MARKER_SIZE)]
    msize: u32,

    /// Print the ionization/recombination summary without plotting
    #[arg(short = 's', long)]
    summary: bool,

    /// Drop points with zero counts instead of flooring the ratio
    #[arg(short = 'z', long)]
    ignore: bool,

    /// Smooth every series with LOWESS (no effect with --ignore)
    #[arg(short = 'L', long)]
    lowess: bool,

    /// Join dot markers with lines
    #[arg(long)]
    line: bool,

    /// Plot against time instead of temperature
    #[arg(long)]
    time: bool,

    /// Keep every Nth row
    #[arg(long, default_value_t = 1)]
    stride: usize,

    /// Earliest time included in plotted series
    #[arg(long, default_value_t = DEFAULT_TIME_MIN)]
    tmin: f64,

    /// Latest time included in plotted series
    #[arg(long, default_value_t = DEFAULT_TIME_MAX)]
    tmax: f64,

    /// Override the trailing-column layout sniffed from the label line
    #[arg(long, value_enum)]
    trailer: Option<TrailerArg>,

    /// Directory receiving the rendered SVG figures
    #[arg(long, default_value = ".")]
    plot_dir: PathBuf,

    /// Print the summary as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum TrailerArg {
    Standard,
    EnergyRatio,
    TotalEnergyLast,
}

impl From<TrailerArg> for TrailerLayout {
    fn from(value: TrailerArg) -> Self {
        match value {
            TrailerArg::Standard => Self::Standard,
            TrailerArg::EnergyRatio => Self::EnergyRatio,
            TrailerArg::TotalEnergyLast => Self::TotalEnergyLast,
        }
    }
}

impl IonCollArgs {
    fn figure_options(&self) -> FigureOptions {
        FigureOptions {
            ratio: RatioOptions {
                zero_policy: if self.ignore {
                    ZeroPolicy::Ignore
                } else {
                    ZeroPolicy::Floor
                },
                smooth: self.lowess,
                x_axis: if self.time {
                    XAxis::Time
                } else {
                    XAxis::Temperature
                },
                window: SeriesWindow {
                    tmin: self.tmin,
                    tmax: self.tmax,
                    stride: self.stride,
                },
            },
            marker: MarkerStyle::from_flags(self.line, self.point, self.msize),
        }
    }
}

#[derive(clap::Args)]
pub(super) struct HistoEArgs {
    /// pspHistoE output file
    #[arg(value_name = "FILE")]
    file: PathBuf,

    /// Temperature in Kelvin of the expected Maxwellian
    #[arg(short = 'T', long = "temp", required_unless_present = "list")]
    temperature: Option<f64>,

    /// Named label set to plot
    #[arg(long, value_enum, conflicts_with = "field")]
    preset: Option<PresetArg>,

    /// Label to plot; repeat for several
    #[arg(long = "field", value_name = "LABEL")]
    field: Vec<String>,

    /// Print the available labels and exit
    #[arg(long)]
    list: bool,

    /// Directory receiving the rendered SVG figure
    #[arg(long, default_value = ".")]
    plot_dir: PathBuf,
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum PresetArg {
    Species,
    Electrons,
    Ions,
    Hydrogen,
    Helium,
}

impl From<PresetArg> for HistogramPreset {
    fn from(value: PresetArg) -> Self {
        match value {
            PresetArg::Species => Self::Species,
            PresetArg::Electrons => Self::Electrons,
            PresetArg::Ions => Self::Ions,
            PresetArg::Hydrogen => Self::Hydrogen,
            PresetArg::Helium => Self::Helium,
        }
    }
}

pub(super) fn run_ion_coll_command(args: IonCollArgs) -> Result<i32, CliError> {
    let spec = tool_command_spec(AnalysisTool::IonColl);
    let input_path = input_path_for(spec.tool, &args.runtag);
    let table = read_ion_coll(
        &input_path,
        ParseOptions {
            trailer: args.trailer.map(Into::into),
        },
    )
    .map_err(CliError::Diag)?;

    let report = table.report();
    tracing::info!(
        command = spec.command,
        input = %input_path.display(),
        accepted = report.accepted_rows,
        zero = report.zero_rows,
        mismatched = report.mismatched_rows(),
        "diagnostic table loaded"
    );

    if !args.summary {
        let options = args.figure_options();
        if args.lowess && !options.ratio.smoothing_active() {
            tracing::warn!("--lowess has no effect together with --ignore");
        }
        let figures = ion_coll_figures(&table, &options).map_err(CliError::Diag)?;
        emit_figures(&args.plot_dir, Path::new(&args.runtag), &figures)?;
    }

    let summary = summarize(&table).map_err(CliError::Diag)?;
    if args.json {
        let rendered =
            serde_json::to_string_pretty(&summary).context("failed to serialize summary")?;
        println!("{}", rendered);
    } else {
        println!("{}", summary.render_text());
    }
    Ok(0)
}

pub(super) fn run_histo_e_command(args: HistoEArgs) -> Result<i32, CliError> {
    let spec = tool_command_spec(AnalysisTool::HistoE);
    let histogram = read_energy_histogram(&args.file).map_err(CliError::Diag)?;
    tracing::info!(
        command = spec.command,
        input = %args.file.display(),
        labels = histogram.labels().len(),
        rows = histogram.row_count(),
        "energy histogram loaded"
    );

    if args.list {
        println!("{}", histogram.label_listing());
        return Ok(0);
    }

    let temperature = args.temperature.ok_or_else(|| {
        CliError::Usage("--temp is required unless --list is given".to_string())
    })?;
    let labels = requested_labels(&args);
    let comparison = match compare_to_maxwellian(&histogram, &labels, temperature) {
        Ok(comparison) => comparison,
        Err(error) if error.placeholder() == HISTO_FIELD_PLACEHOLDER => {
            return Ok(report_missing_field(&error, &histogram));
        }
        Err(error) => return Err(CliError::Diag(error)),
    };

    let figure = comparison.to_figure(HISTO_FIGURE_NAME, None);
    emit_figures(&args.plot_dir, &args.file, std::slice::from_ref(&figure))?;
    Ok(0)
}

fn requested_labels(args: &HistoEArgs) -> Vec<&str> {
    if !args.field.is_empty() {
        return args.field.iter().map(String::as_str).collect();
    }
    let preset = args.preset.map_or(HistogramPreset::Species, Into::into);
    preset.labels().to_vec()
}

fn report_missing_field(error: &DiagError, histogram: &EnergyHistogram) -> i32 {
    tracing::warn!("{}", error.message());
    println!("No such field, available data is:");
    println!("{}", histogram.label_listing());
    MISSING_FIELD_EXIT_CODE
}

fn emit_figures(plot_dir: &Path, tag: &Path, figures: &[Figure]) -> Result<(), CliError> {
    let stem = figure_stem(tag);
    for path in write_figures(plot_dir, &stem, figures)? {
        println!("Figure: {}", path.display());
    }
    Ok(())
}
