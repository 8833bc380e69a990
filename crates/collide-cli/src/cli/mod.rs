mod commands;
mod dispatch;
mod helpers;
mod render;

use clap::Parser;
use collide_core::domain::DiagError;
use dispatch::{PROGRAM_NAME, command_alias_from_program_name};

pub fn run_from_env() -> i32 {
    let mut args = std::env::args();
    let program_name = args.next().unwrap_or_else(|| PROGRAM_NAME.to_string());
    let remaining: Vec<String> = args.collect();

    match run_with_program_name(&program_name, remaining) {
        Ok(code) => code,
        Err(error) => {
            let diag_error = error.as_diag_error();
            eprintln!("{}", diag_error.diagnostic_line());
            diag_error.exit_code()
        }
    }
}

fn run_with_program_name(program_name: &str, args: Vec<String>) -> Result<i32, CliError> {
    let alias = command_alias_from_program_name(program_name);
    let full_args = std::iter::once(PROGRAM_NAME.to_string())
        .chain(alias.map(str::to_string))
        .chain(args)
        .collect::<Vec<_>>();
    parse_and_dispatch(full_args)
}

fn parse_and_dispatch(args: Vec<String>) -> Result<i32, CliError> {
    match Cli::try_parse_from(&args) {
        Ok(cli) => {
            helpers::init_logging(cli.verbose);
            dispatch_parsed(cli.command)
        }
        Err(err) => match err.kind() {
            clap::error::ErrorKind::DisplayHelp | clap::error::ErrorKind::DisplayVersion => {
                print!("{}", err);
                Ok(0)
            }
            _ => Err(CliError::Usage(err.to_string())),
        },
    }
}

#[derive(Parser)]
#[command(
    name = "collide-diag",
    about = "Diagnostic analysis tools for CollideIon simulation output",
    version
)]
struct Cli {
    /// Emit debug diagnostics on stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: CliCommand,
}

#[derive(clap::Subcommand)]
enum CliCommand {
    /// Plot collision-process ratios from <RUNTAG>.ION_coll
    #[command(name = "ion-coll")]
    IonColl(commands::IonCollArgs),
    /// Compare pspHistoE energy histograms with a Maxwellian
    #[command(name = "histo-e")]
    HistoE(commands::HistoEArgs),
}

fn dispatch_parsed(command: CliCommand) -> Result<i32, CliError> {
    match command {
        CliCommand::IonColl(args) => commands::run_ion_coll_command(args),
        CliCommand::HistoE(args) => commands::run_histo_e_command(args),
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("{0}")]
    Usage(String),
    #[error("{0}")]
    Diag(DiagError),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl CliError {
    fn as_diag_error(&self) -> DiagError {
        match self {
            Self::Usage(message) => DiagError::input_validation("INPUT.CLI_USAGE", message.clone()),
            Self::Diag(error) => error.clone(),
            Self::Internal(error) => DiagError::computation("RUN.CLI_OUTPUT", format!("{error:#}")),
        }
    }
}
