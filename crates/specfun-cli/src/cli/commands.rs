use super::CliError;
use super::helpers::{EvaluationReport, OutputFormat, emit_report, require_values};
use specfun_core::domain::{EntryPoint, EvaluationTier};
use specfun_core::numerics::NUMERIC_TOLERANCE_POLICY_PATH;
use specfun_core::numerics::special::{
    Evaluator, LegendreApi, LegendreArgument, SphericalHarmonicsApi, SphericalHarmonicsInput,
    Wigner3jInput, Wigner6jInput, Wigner9jInput, WignerSymbolsApi, legendre_array_size,
};
use specfun_core::regression::{
    REFERENCE_CASES_PATH, RegressionRunnerConfig, render_human_summary, run_regression,
};
use std::path::PathBuf;

#[derive(clap::Args)]
pub(super) struct ThreeJArgs {
    /// 2*j1 2*j2 2*j3 2*m1 2*m2 2*m3
    #[arg(
        num_args = 6,
        required = true,
        allow_negative_numbers = true,
        value_names = ["TWO_J1", "TWO_J2", "TWO_J3", "TWO_M1", "TWO_M2", "TWO_M3"]
    )]
    values: Vec<i32>,
}

#[derive(clap::Args)]
pub(super) struct SixJArgs {
    /// 2*j1 .. 2*j6 of {j1 j2 j3; j4 j5 j6}
    #[arg(
        num_args = 6,
        required = true,
        allow_negative_numbers = true,
        value_names = ["TWO_J1", "TWO_J2", "TWO_J3", "TWO_J4", "TWO_J5", "TWO_J6"]
    )]
    values: Vec<i32>,
}

#[derive(clap::Args)]
pub(super) struct NineJArgs {
    /// 2*j1 .. 2*j9 of {j1 j2 j3; j4 j5 j6; j7 j8 j9}
    #[arg(
        num_args = 9,
        required = true,
        allow_negative_numbers = true,
        value_name = "TWO_J"
    )]
    values: Vec<i32>,
}

#[derive(clap::Args)]
pub(super) struct PlArgs {
    /// Degree
    #[arg(allow_negative_numbers = true)]
    l: i32,

    /// Argument in [-1, 1]
    #[arg(allow_negative_numbers = true)]
    x: f64,

    /// Print the value at every degree 0..=l
    #[arg(long)]
    array: bool,
}

#[derive(clap::Args)]
pub(super) struct PlmArgs {
    /// Degree
    #[arg(allow_negative_numbers = true)]
    l: i32,

    /// Order, 0 <= m <= l
    #[arg(allow_negative_numbers = true)]
    m: i32,

    /// Argument in [-1, 1]
    #[arg(allow_negative_numbers = true)]
    x: f64,

    /// Print the value at every degree m..=l
    #[arg(long)]
    array: bool,
}

#[derive(clap::Args)]
pub(super) struct YlmArgs {
    /// Degree
    #[arg(allow_negative_numbers = true)]
    l: i32,

    /// Order, |m| <= l
    #[arg(allow_negative_numbers = true)]
    m: i32,

    /// Polar angle in radians
    #[arg(allow_negative_numbers = true)]
    theta: f64,

    /// Azimuthal angle in radians
    #[arg(allow_negative_numbers = true)]
    phi: f64,
}

#[derive(clap::Args)]
pub(super) struct RegressionArgs {
    /// Reference case table path
    #[arg(long, default_value = REFERENCE_CASES_PATH)]
    cases: PathBuf,

    /// Numeric tolerance policy path
    #[arg(long, default_value = NUMERIC_TOLERANCE_POLICY_PATH)]
    policy: PathBuf,

    /// JSON report output path
    #[arg(long)]
    report: Option<PathBuf>,
}

impl RegressionArgs {
    fn into_config(self, tier: EvaluationTier) -> RegressionRunnerConfig {
        RegressionRunnerConfig {
            cases_path: self.cases,
            policy_path: self.policy,
            report_path: self.report,
            tier,
        }
    }
}

/// Largest degree `--array` will allocate a harvest buffer for.
const MAX_HARVEST_DEGREE: i32 = 1 << 20;

fn harvest_buffer(l: i32, m: i32) -> Result<Vec<f64>, CliError> {
    if l > MAX_HARVEST_DEGREE {
        return Err(CliError::Usage(format!(
            "--array supports degrees up to {MAX_HARVEST_DEGREE}, got {l}"
        )));
    }
    Ok(vec![0.0; legendre_array_size(l, m)])
}

pub(super) fn run_three_j_command(
    evaluator: &Evaluator,
    args: ThreeJArgs,
    output: OutputFormat,
) -> Result<i32, CliError> {
    let [two_j1, two_j2, two_j3, two_m1, two_m2, two_m3] = require_values(args.values)?;
    let result = evaluator.wigner_3j(Wigner3jInput::new(
        two_j1, two_j2, two_j3, two_m1, two_m2, two_m3,
    ))?;
    emit_report(&EvaluationReport::coupling(EntryPoint::Coupling3j, result), output)
}

pub(super) fn run_six_j_command(
    evaluator: &Evaluator,
    args: SixJArgs,
    output: OutputFormat,
) -> Result<i32, CliError> {
    let [two_j1, two_j2, two_j3, two_j4, two_j5, two_j6] = require_values(args.values)?;
    let result = evaluator.wigner_6j(Wigner6jInput::new(
        two_j1, two_j2, two_j3, two_j4, two_j5, two_j6,
    ))?;
    emit_report(&EvaluationReport::coupling(EntryPoint::Coupling6j, result), output)
}

pub(super) fn run_nine_j_command(
    evaluator: &Evaluator,
    args: NineJArgs,
    output: OutputFormat,
) -> Result<i32, CliError> {
    let two_j = require_values(args.values)?;
    let result = evaluator.wigner_9j(Wigner9jInput::new(two_j))?;
    emit_report(&EvaluationReport::coupling(EntryPoint::Coupling9j, result), output)
}

pub(super) fn run_pl_command(
    evaluator: &Evaluator,
    args: PlArgs,
    output: OutputFormat,
) -> Result<i32, CliError> {
    let report = if args.array {
        let mut harvest = harvest_buffer(args.l, 0)?;
        let value = evaluator.legendre_pl_array(args.l, args.x, &mut harvest)?;
        EvaluationReport::real(EntryPoint::LegendrePlArray, value).with_harvest(0, harvest)
    } else {
        let value = evaluator.legendre_pl(args.l, args.x)?;
        EvaluationReport::real(EntryPoint::LegendrePl, value)
    };
    emit_report(&report, output)
}

pub(super) fn run_plm_command(
    evaluator: &Evaluator,
    args: PlmArgs,
    output: OutputFormat,
) -> Result<i32, CliError> {
    let argument = LegendreArgument::from_x(args.x);
    let report = if args.array {
        let mut harvest = harvest_buffer(args.l, args.m)?;
        let value = evaluator.legendre_plm_array(args.l, args.m, argument, &mut harvest)?;
        EvaluationReport::real(EntryPoint::LegendrePlmArray, value).with_harvest(args.m, harvest)
    } else {
        let value = evaluator.legendre_plm(args.l, args.m, argument)?;
        EvaluationReport::real(EntryPoint::LegendrePlm, value)
    };
    emit_report(&report, output)
}

pub(super) fn run_sph_plm_command(
    evaluator: &Evaluator,
    args: PlmArgs,
    output: OutputFormat,
) -> Result<i32, CliError> {
    let argument = LegendreArgument::from_x(args.x);
    let report = if args.array {
        let mut harvest = harvest_buffer(args.l, args.m)?;
        let value = evaluator.legendre_sph_plm_array(args.l, args.m, argument, &mut harvest)?;
        EvaluationReport::real(EntryPoint::LegendreSphPlmArray, value)
            .with_harvest(args.m, harvest)
    } else {
        let value = evaluator.legendre_sph_plm(args.l, args.m, argument)?;
        EvaluationReport::real(EntryPoint::LegendreSphPlm, value)
    };
    emit_report(&report, output)
}

pub(super) fn run_ylm_command(
    evaluator: &Evaluator,
    args: YlmArgs,
    output: OutputFormat,
) -> Result<i32, CliError> {
    let value = evaluator.y_lm(SphericalHarmonicsInput::new(
        args.l, args.m, args.theta, args.phi,
    ))?;
    emit_report(
        &EvaluationReport::complex(EntryPoint::SphericalHarmonic, value.re, value.im),
        output,
    )
}

pub(super) fn run_regression_command(
    args: RegressionArgs,
    tier: EvaluationTier,
) -> Result<i32, CliError> {
    let config = args.into_config(tier);
    let report = run_regression(&config).map_err(anyhow::Error::from)?;
    println!("{}", render_human_summary(&report));
    if let Some(report_path) = &config.report_path {
        println!("JSON report: {}", report_path.display());
    }

    if report.passed { Ok(0) } else { Ok(1) }
}
