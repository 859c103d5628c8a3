//! Reference-table regression runner.
//!
//! A case table lists evaluations together with either an expected value or an
//! expected status label. Values are compared under the tolerance of the
//! function family they belong to, taken from a [`NumericTolerancePolicy`].

use crate::domain::{ErrorCategory, EvaluationTier, SpecFunResult};
use crate::numerics::special::{
    Evaluator, EvaluatorConfig, LegendreApi, LegendreArgument, SphericalHarmonicsApi,
    SphericalHarmonicsInput, Wigner3jInput, Wigner6jInput, Wigner9jInput, WignerSymbolsApi,
};
use crate::numerics::{
    NumericTolerance, NumericTolerancePolicy, NumericTolerancePolicyError, ValueWithError,
    compare_with_policy_tolerance, format_numeric_for_policy, load_numeric_tolerance_policy,
};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const REFERENCE_CASES_PATH: &str = "tasks/reference-cases.json";

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ReferenceCaseTable {
    pub cases: Vec<ReferenceCase>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ReferenceCase {
    pub id: String,
    pub evaluate: ReferenceEvaluation,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected: Option<f64>,
    #[serde(rename = "expectedImag", default, skip_serializing_if = "Option::is_none")]
    pub expected_imag: Option<f64>,
    #[serde(rename = "expectedStatus", default, skip_serializing_if = "Option::is_none")]
    pub expected_status: Option<String>,
}

impl ReferenceCase {
    fn expected_status_label(&self) -> &str {
        self.expected_status
            .as_deref()
            .unwrap_or(ErrorCategory::Success.status_label())
    }

    /// A case expected to succeed must name at least one value to compare.
    fn has_expectation(&self) -> bool {
        self.expected.is_some()
            || self.expected_imag.is_some()
            || self.expected_status_label() != ErrorCategory::Success.status_label()
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(tag = "function", rename_all = "camelCase")]
pub enum ReferenceEvaluation {
    Wigner3j {
        #[serde(rename = "twoJ")]
        two_j: [i32; 3],
        #[serde(rename = "twoM")]
        two_m: [i32; 3],
    },
    Wigner6j {
        #[serde(rename = "twoJ")]
        two_j: [i32; 6],
    },
    Wigner9j {
        #[serde(rename = "twoJ")]
        two_j: [i32; 9],
    },
    LegendrePl {
        l: i32,
        x: f64,
    },
    LegendrePlm {
        l: i32,
        m: i32,
        x: f64,
    },
    LegendreSphPlm {
        l: i32,
        m: i32,
        x: f64,
    },
    SphericalHarmonic {
        l: i32,
        m: i32,
        theta: f64,
        phi: f64,
    },
}

/// A successful evaluation flattened for comparison.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EvaluatedValue {
    pub re: f64,
    pub im: f64,
    pub reported_error: Option<f64>,
}

impl EvaluatedValue {
    fn real(re: f64) -> Self {
        Self {
            re,
            im: 0.0,
            reported_error: None,
        }
    }
}

impl ReferenceEvaluation {
    /// Tolerance-policy category the evaluation is compared under.
    pub fn category(&self) -> &'static str {
        match self {
            Self::Wigner3j { .. } | Self::Wigner6j { .. } | Self::Wigner9j { .. } => "coupling",
            Self::LegendrePl { .. } | Self::LegendrePlm { .. } | Self::LegendreSphPlm { .. } => {
                "legendre"
            }
            Self::SphericalHarmonic { .. } => "harmonics",
        }
    }

    pub fn evaluate(&self, evaluator: &Evaluator) -> SpecFunResult<EvaluatedValue> {
        let coupled = |result: ValueWithError| EvaluatedValue {
            re: result.val,
            im: 0.0,
            reported_error: Some(result.err),
        };

        match *self {
            Self::Wigner3j { two_j, two_m } => evaluator
                .wigner_3j(Wigner3jInput::new(
                    two_j[0], two_j[1], two_j[2], two_m[0], two_m[1], two_m[2],
                ))
                .map(coupled),
            Self::Wigner6j { two_j } => evaluator
                .wigner_6j(Wigner6jInput::new(
                    two_j[0], two_j[1], two_j[2], two_j[3], two_j[4], two_j[5],
                ))
                .map(coupled),
            Self::Wigner9j { two_j } => evaluator
                .wigner_9j(Wigner9jInput::new(two_j))
                .map(coupled),
            Self::LegendrePl { l, x } => evaluator.legendre_pl(l, x).map(EvaluatedValue::real),
            Self::LegendrePlm { l, m, x } => evaluator
                .legendre_plm(l, m, LegendreArgument::from_x(x))
                .map(EvaluatedValue::real),
            Self::LegendreSphPlm { l, m, x } => evaluator
                .legendre_sph_plm(l, m, LegendreArgument::from_x(x))
                .map(EvaluatedValue::real),
            Self::SphericalHarmonic { l, m, theta, phi } => evaluator
                .y_lm(SphericalHarmonicsInput::new(l, m, theta, phi))
                .map(|value| EvaluatedValue {
                    re: value.re,
                    im: value.im,
                    reported_error: None,
                }),
        }
    }
}

#[derive(Debug, Clone)]
pub struct RegressionRunnerConfig {
    pub cases_path: PathBuf,
    pub policy_path: PathBuf,
    pub report_path: Option<PathBuf>,
    pub tier: EvaluationTier,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegressionReport {
    pub passed: bool,
    pub tier: String,
    pub case_count: usize,
    pub failed_count: usize,
    pub cases: Vec<CaseReport>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CaseReport {
    pub id: String,
    pub category: String,
    pub passed: bool,
    pub status: String,
    pub expected_status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actual: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reported_error: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub abs_diff: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rel_diff: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum RegressionError {
    #[error("failed to read reference cases '{}': {source}", path.display())]
    ReadCases {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse reference cases '{}': {source}", path.display())]
    ParseCases {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error(transparent)]
    Policy(#[from] NumericTolerancePolicyError),
    #[error("reference case '{id}' expects success but names no expected value")]
    MissingExpectation { id: String },
    #[error("numeric tolerance policy has no tolerance for category '{category}'")]
    MissingTolerance { category: String },
    #[error("failed to write regression report '{}': {source}", path.display())]
    WriteReport {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to serialize regression report: {0}")]
    SerializeReport(#[from] serde_json::Error),
}

pub fn load_reference_cases(
    cases_path: impl AsRef<Path>,
) -> Result<ReferenceCaseTable, RegressionError> {
    let cases_path = cases_path.as_ref();
    let source = fs::read_to_string(cases_path).map_err(|source| RegressionError::ReadCases {
        path: cases_path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&source).map_err(|source| RegressionError::ParseCases {
        path: cases_path.to_path_buf(),
        source,
    })
}

pub fn run_regression(config: &RegressionRunnerConfig) -> Result<RegressionReport, RegressionError> {
    let table = load_reference_cases(&config.cases_path)?;
    let policy = load_numeric_tolerance_policy(&config.policy_path)?;
    let report = evaluate_reference_cases(&table, &policy, config.tier)?;

    if let Some(report_path) = &config.report_path {
        write_regression_report(report_path, &report)?;
    }
    Ok(report)
}

pub fn evaluate_reference_cases(
    table: &ReferenceCaseTable,
    policy: &NumericTolerancePolicy,
    tier: EvaluationTier,
) -> Result<RegressionReport, RegressionError> {
    let evaluator = Evaluator::new(EvaluatorConfig::new(tier));
    let mut cases = Vec::with_capacity(table.cases.len());

    for case in &table.cases {
        if !case.has_expectation() {
            return Err(RegressionError::MissingExpectation {
                id: case.id.clone(),
            });
        }
        let category = case.evaluate.category();
        let tolerance = policy.tolerance_for_category(category).ok_or_else(|| {
            RegressionError::MissingTolerance {
                category: category.to_string(),
            }
        })?;
        let report = compare_case(case, case.evaluate.evaluate(&evaluator), tolerance);
        tracing::debug!(case = %report.id, passed = report.passed, "evaluated reference case");
        cases.push(report);
    }

    let failed_count = cases.iter().filter(|case| !case.passed).count();
    Ok(RegressionReport {
        passed: failed_count == 0,
        tier: tier.as_str().to_string(),
        case_count: cases.len(),
        failed_count,
        cases,
    })
}

fn compare_case(
    case: &ReferenceCase,
    outcome: SpecFunResult<EvaluatedValue>,
    tolerance: NumericTolerance,
) -> CaseReport {
    let expected_status = case.expected_status_label().to_string();
    let mut report = CaseReport {
        id: case.id.clone(),
        category: case.evaluate.category().to_string(),
        passed: false,
        status: ErrorCategory::Success.status_label().to_string(),
        expected_status,
        expected: case.expected.map(format_numeric_for_policy),
        actual: None,
        reported_error: None,
        abs_diff: None,
        rel_diff: None,
        message: None,
    };

    let value = match outcome {
        Ok(value) => value,
        Err(error) => {
            report.status = error.status_label().to_string();
            report.passed = report.status == report.expected_status;
            report.message = Some(error.to_string());
            return report;
        }
    };

    report.actual = Some(format_numeric_for_policy(value.re));
    report.reported_error = value.reported_error;
    if report.status != report.expected_status {
        report.message = Some(format!(
            "expected status {} but evaluation succeeded",
            report.expected_status
        ));
        return report;
    }

    let mut passed = true;
    let mut abs_diff = 0.0_f64;
    let mut rel_diff = 0.0_f64;
    let components = [(case.expected, value.re), (case.expected_imag, value.im)];
    for (expected, actual) in components {
        let Some(expected) = expected else {
            continue;
        };
        let comparison = compare_with_policy_tolerance(expected, actual, tolerance);
        passed &= comparison.passes;
        abs_diff = abs_diff.max(comparison.abs_diff);
        rel_diff = rel_diff.max(comparison.rel_diff);
    }

    if case.expected.is_some() || case.expected_imag.is_some() {
        report.abs_diff = Some(abs_diff);
        report.rel_diff = Some(rel_diff);
    }
    if !passed {
        report.message = Some("value outside policy tolerance".to_string());
    }
    report.passed = passed;
    report
}

pub fn write_regression_report(
    report_path: &Path,
    report: &RegressionReport,
) -> Result<(), RegressionError> {
    if let Some(parent) = report_path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|source| RegressionError::WriteReport {
            path: report_path.to_path_buf(),
            source,
        })?;
    }
    let rendered = serde_json::to_string_pretty(report)?;
    fs::write(report_path, rendered).map_err(|source| RegressionError::WriteReport {
        path: report_path.to_path_buf(),
        source,
    })
}

pub fn render_human_summary(report: &RegressionReport) -> String {
    let mut lines = vec![
        format!(
            "Regression status: {}",
            if report.passed { "PASS" } else { "FAIL" }
        ),
        format!(
            "Cases: {} total, {} passed, {} failed",
            report.case_count,
            report.case_count - report.failed_count,
            report.failed_count
        ),
    ];

    for case in report.cases.iter().filter(|case| !case.passed) {
        let mut line = format!(
            "  FAIL {} [{}] status={} expected_status={}",
            case.id, case.category, case.status, case.expected_status
        );
        if let (Some(expected), Some(actual)) = (&case.expected, &case.actual) {
            line.push_str(&format!(" expected={expected} actual={actual}"));
        }
        if let Some(message) = &case.message {
            line.push_str(&format!(" ({message})"));
        }
        lines.push(line);
    }

    lines.join("\n")
}
