pub mod result;
pub mod special;

pub use result::{ScaledValueWithError, ValueWithError};

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const NUMERIC_TOLERANCE_POLICY_PATH: &str = "tasks/numeric-tolerance-policy.json";

#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct NumericTolerance {
    #[serde(rename = "absTol")]
    pub abs_tol: f64,
    #[serde(rename = "relTol")]
    pub rel_tol: f64,
    #[serde(rename = "relativeFloor")]
    pub relative_floor: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PolicyToleranceComparison {
    pub abs_diff: f64,
    pub rel_diff: f64,
    pub passes: bool,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct NumericTolerancePolicy {
    #[serde(rename = "policyVersion", default)]
    pub policy_version: String,
    #[serde(rename = "defaultMode")]
    pub default_mode: String,
    #[serde(default)]
    pub categories: Vec<NumericToleranceCategory>,
}

impl NumericTolerancePolicy {
    pub fn tolerance_for_category(&self, category_id: &str) -> Option<NumericTolerance> {
        self.categories
            .iter()
            .find(|category| category.id == category_id)
            .and_then(|category| category.tolerance)
    }
}

/// Tolerances for one family of functions (`coupling`, `legendre`, `harmonics`).
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct NumericToleranceCategory {
    pub id: String,
    pub mode: String,
    pub tolerance: Option<NumericTolerance>,
}

#[derive(Debug, thiserror::Error)]
pub enum NumericTolerancePolicyError {
    #[error("failed to read numeric tolerance policy '{}': {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse numeric tolerance policy '{}': {source}", path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

pub fn load_numeric_tolerance_policy(
    policy_path: impl AsRef<Path>,
) -> Result<NumericTolerancePolicy, NumericTolerancePolicyError> {
    let policy_path = policy_path.as_ref();
    let source =
        fs::read_to_string(policy_path).map_err(|source| NumericTolerancePolicyError::Read {
            path: policy_path.to_path_buf(),
            source,
        })?;
    serde_json::from_str(&source).map_err(|source| NumericTolerancePolicyError::Parse {
        path: policy_path.to_path_buf(),
        source,
    })
}

pub fn compare_with_policy_tolerance(
    baseline: f64,
    actual: f64,
    tolerance: NumericTolerance,
) -> PolicyToleranceComparison {
    let abs_diff = (actual - baseline).abs();
    let rel_denominator = baseline.abs().max(tolerance.relative_floor);
    let rel_diff = abs_diff / rel_denominator;
    let passes = abs_diff <= tolerance.abs_tol || abs_diff <= tolerance.rel_tol * rel_denominator;

    PolicyToleranceComparison {
        abs_diff,
        rel_diff,
        passes,
    }
}

pub fn format_numeric_for_policy(value: f64) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }

    if value == f64::INFINITY {
        return "inf".to_string();
    }

    if value == f64::NEG_INFINITY {
        return "-inf".to_string();
    }

    format!("{value:.15E}")
}

pub fn relative_difference(lhs: f64, rhs: f64, relative_floor: f64) -> f64 {
    let scale = lhs.abs().max(rhs.abs()).max(relative_floor);
    (lhs - rhs).abs() / scale
}

pub fn within_tolerance(
    lhs: f64,
    rhs: f64,
    abs_tol: f64,
    rel_tol: f64,
    relative_floor: f64,
) -> bool {
    let abs_diff = (lhs - rhs).abs();
    abs_diff <= abs_tol || relative_difference(lhs, rhs, relative_floor) <= rel_tol
}

#[cfg(test)]
mod tests {
    use super::{
        NUMERIC_TOLERANCE_POLICY_PATH, NumericTolerance, NumericTolerancePolicyError,
        compare_with_policy_tolerance, format_numeric_for_policy, load_numeric_tolerance_policy,
        relative_difference, within_tolerance,
    };
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    #[test]
    fn relative_difference_uses_relative_floor() {
        let diff = relative_difference(0.0, 1.0e-10, 1.0e-6);
        assert!((diff - 1.0e-4).abs() < 1.0e-12);
    }

    #[test]
    fn within_tolerance_accepts_abs_or_relative_match() {
        assert!(within_tolerance(10.0, 10.001, 1.0e-2, 1.0e-6, 1.0e-12));
        assert!(within_tolerance(1000.0, 1000.2, 1.0e-6, 5.0e-4, 1.0e-12));
        assert!(!within_tolerance(1.0, 1.1, 1.0e-3, 1.0e-3, 1.0e-12));
    }

    #[test]
    fn compare_with_policy_tolerance_uses_baseline_relative_scale() {
        let tolerance = NumericTolerance {
            abs_tol: 1.0e-9,
            rel_tol: 0.1,
            relative_floor: 1.0e-12,
        };
        let comparison = compare_with_policy_tolerance(2.0, 2.19, tolerance);
        assert!((comparison.abs_diff - 0.19).abs() < 1.0e-12);
        assert!((comparison.rel_diff - 0.095).abs() < 1.0e-12);
        assert!(comparison.passes);

        let failing = compare_with_policy_tolerance(-0.5, -0.4, tolerance);
        assert!(!failing.passes);
    }

    #[test]
    fn format_numeric_for_policy_handles_special_values() {
        assert_eq!(format_numeric_for_policy(f64::NAN), "NaN");
        assert_eq!(format_numeric_for_policy(f64::INFINITY), "inf");
        assert_eq!(format_numeric_for_policy(f64::NEG_INFINITY), "-inf");
        assert_eq!(format_numeric_for_policy(12.5), "1.250000000000000E1");
    }

    #[test]
    fn load_numeric_tolerance_policy_reads_category_tolerance() {
        let workspace_root = Path::new(env!("CARGO_MANIFEST_DIR"))
            .parent()
            .unwrap()
            .parent()
            .unwrap();
        let policy_path = workspace_root.join(NUMERIC_TOLERANCE_POLICY_PATH);
        let policy = load_numeric_tolerance_policy(&policy_path).expect("policy should load");

        let coupling = policy
            .tolerance_for_category("coupling")
            .expect("coupling tolerance should exist");
        assert_eq!(coupling.abs_tol, 1.0e-12);
        assert_eq!(coupling.rel_tol, 1.0e-10);
        assert!(policy.tolerance_for_category("legendre").is_some());
        assert!(policy.tolerance_for_category("harmonics").is_some());
        assert!(policy.tolerance_for_category("bessel").is_none());
    }

    #[test]
    fn load_numeric_tolerance_policy_reports_missing_and_malformed_files() {
        let temp = TempDir::new().expect("tempdir should be created");

        let missing = load_numeric_tolerance_policy(temp.path().join("absent.json"))
            .expect_err("missing policy should fail");
        assert!(matches!(missing, NumericTolerancePolicyError::Read { .. }));

        let malformed_path = temp.path().join("malformed.json");
        fs::write(&malformed_path, "{\"policyVersion\": 1").expect("policy should be written");
        let malformed = load_numeric_tolerance_policy(&malformed_path)
            .expect_err("malformed policy should fail");
        assert!(matches!(malformed, NumericTolerancePolicyError::Parse { .. }));
        assert!(malformed.to_string().contains("malformed.json"));
    }
}
