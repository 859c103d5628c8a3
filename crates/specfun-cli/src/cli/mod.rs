mod commands;
mod helpers;

use clap::Parser;
use specfun_core::domain::{EvaluationTier, SpecFunError};
use specfun_core::numerics::special::{Evaluator, EvaluatorConfig};
use tracing_subscriber::EnvFilter;

const USAGE_EXIT_CODE: i32 = 2;
const INTERNAL_EXIT_CODE: i32 = 3;

pub fn run_from_env() -> i32 {
    init_tracing();

    match parse_and_dispatch(std::env::args()) {
        Ok(code) => code,
        Err(error) => {
            eprintln!("{}", error.diagnostic_line());
            error.exit_code()
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    // A subscriber may already be installed when the CLI is embedded.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .with_target(false)
        .try_init();
}

fn parse_and_dispatch<I, S>(args: I) -> Result<i32, CliError>
where
    I: IntoIterator<Item = S>,
    S: Into<std::ffi::OsString> + Clone,
{
    match Cli::try_parse_from(args) {
        Ok(cli) => dispatch_parsed(cli),
        Err(err) => match err.kind() {
            clap::error::ErrorKind::DisplayHelp | clap::error::ErrorKind::DisplayVersion => {
                print!("{}", err);
                Ok(0)
            }
            _ => Err(CliError::Usage(err.to_string().trim_end().to_string())),
        },
    }
}

#[derive(Parser)]
#[command(
    name = "specfun",
    version,
    about = "Error-tracked coupling coefficients and Legendre functions"
)]
struct Cli {
    /// Render results as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Report non-success outcomes through the log before returning them
    #[arg(long, global = true)]
    checked: bool,

    #[command(subcommand)]
    command: CliCommand,
}

#[derive(clap::Subcommand)]
enum CliCommand {
    /// Wigner 3j symbol from doubled angular momenta and projections
    #[command(name = "3j")]
    ThreeJ(commands::ThreeJArgs),
    /// Wigner 6j symbol from six doubled angular momenta
    #[command(name = "6j")]
    SixJ(commands::SixJArgs),
    /// Wigner 9j symbol from nine doubled angular momenta, rows first
    #[command(name = "9j")]
    NineJ(commands::NineJArgs),
    /// Legendre polynomial P_l(x)
    Pl(commands::PlArgs),
    /// Associated Legendre function P_l^m(x)
    Plm(commands::PlmArgs),
    /// Spherical-harmonic normalized associated Legendre function
    SphPlm(commands::PlmArgs),
    /// Complex spherical harmonic Y_l^m(theta, phi)
    Ylm(commands::YlmArgs),
    /// Evaluate a reference-case table against the tolerance policy
    Regression(commands::RegressionArgs),
}

fn dispatch_parsed(cli: Cli) -> Result<i32, CliError> {
    let tier = if cli.checked {
        EvaluationTier::Checked
    } else {
        EvaluationTier::Raw
    };
    let output = helpers::OutputFormat::from_json_flag(cli.json);
    let evaluator = Evaluator::new(EvaluatorConfig::new(tier));

    match cli.command {
        CliCommand::ThreeJ(args) => commands::run_three_j_command(&evaluator, args, output),
        CliCommand::SixJ(args) => commands::run_six_j_command(&evaluator, args, output),
        CliCommand::NineJ(args) => commands::run_nine_j_command(&evaluator, args, output),
        CliCommand::Pl(args) => commands::run_pl_command(&evaluator, args, output),
        CliCommand::Plm(args) => commands::run_plm_command(&evaluator, args, output),
        CliCommand::SphPlm(args) => commands::run_sph_plm_command(&evaluator, args, output),
        CliCommand::Ylm(args) => commands::run_ylm_command(&evaluator, args, output),
        CliCommand::Regression(args) => commands::run_regression_command(args, tier),
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("{0}")]
    Usage(String),
    #[error("{0}")]
    Compute(#[from] SpecFunError),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl CliError {
    fn diagnostic_line(&self) -> String {
        match self {
            Self::Usage(message) => format!("ERROR: [USAGE] {message}"),
            Self::Compute(error) => error.diagnostic_line(),
            Self::Internal(error) => format!("ERROR: [INTERNAL] {error:#}"),
        }
    }

    fn exit_code(&self) -> i32 {
        match self {
            Self::Usage(_) => USAGE_EXIT_CODE,
            Self::Compute(error) => error.exit_code(),
            Self::Internal(_) => INTERNAL_EXIT_CODE,
        }
    }
}
