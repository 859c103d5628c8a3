use super::CliError;
use anyhow::Context;
use serde::Serialize;
use specfun_core::domain::{EntryPoint, ErrorCategory};
use specfun_core::numerics::ValueWithError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub(super) fn from_json_flag(json: bool) -> Self {
        if json { Self::Json } else { Self::Text }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct EvaluationReport {
    entry: &'static str,
    status: &'static str,
    value: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    imaginary: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error_estimate: Option<f64>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    harvest: Vec<HarvestEntry>,
}

#[derive(Debug, Serialize)]
pub(super) struct HarvestEntry {
    degree: i32,
    value: f64,
}

impl EvaluationReport {
    pub(super) fn real(entry: EntryPoint, value: f64) -> Self {
        Self {
            entry: entry.as_str(),
            status: ErrorCategory::Success.status_label(),
            value,
            imaginary: None,
            error_estimate: None,
            harvest: Vec::new(),
        }
    }

    pub(super) fn coupling(entry: EntryPoint, result: ValueWithError) -> Self {
        Self {
            error_estimate: Some(result.err),
            ..Self::real(entry, result.val)
        }
    }

    pub(super) fn complex(entry: EntryPoint, re: f64, im: f64) -> Self {
        Self {
            imaginary: Some(im),
            ..Self::real(entry, re)
        }
    }

    /// Attaches harvested values, `harvest[i]` belonging to degree `first_degree + i`.
    pub(super) fn with_harvest(mut self, first_degree: i32, harvest: Vec<f64>) -> Self {
        self.harvest = harvest
            .into_iter()
            .zip(first_degree..)
            .map(|(value, degree)| HarvestEntry { degree, value })
            .collect();
        self
    }

    fn render_text(&self) -> String {
        let mut lines = self
            .harvest
            .iter()
            .map(|entry| format!("{:>5} {}", entry.degree, format_value(entry.value)))
            .collect::<Vec<_>>();

        let mut summary = format!("{} = {}", self.entry, format_value(self.value));
        if let Some(imaginary) = self.imaginary {
            let sign = if imaginary.is_sign_negative() { '-' } else { '+' };
            summary.push_str(&format!(" {sign} {}i", format_value(imaginary.abs())));
        }
        if let Some(error_estimate) = self.error_estimate {
            summary.push_str(&format!(" +/- {error_estimate:.3e}"));
        }
        lines.push(summary);
        lines.join("\n")
    }
}

fn format_value(value: f64) -> String {
    format!("{value:.16e}")
}

pub(super) fn emit_report(report: &EvaluationReport, output: OutputFormat) -> Result<i32, CliError> {
    let rendered = match output {
        OutputFormat::Text => report.render_text(),
        OutputFormat::Json => serde_json::to_string_pretty(report)
            .context("failed to serialize evaluation report")?,
    };
    println!("{rendered}");
    Ok(0)
}

pub(super) fn require_values<const N: usize>(values: Vec<i32>) -> Result<[i32; N], CliError> {
    let provided = values.len();
    values
        .try_into()
        .map_err(|_| CliError::Usage(format!("expected {N} values but {provided} were given")))
}

#[cfg(test)]
mod tests {
    use super::{EvaluationReport, require_values};
    use specfun_core::domain::EntryPoint;
    use specfun_core::numerics::ValueWithError;

    #[test]
    fn text_rendering_lists_harvest_before_the_final_value() {
        let report = EvaluationReport::real(EntryPoint::LegendrePlmArray, 3.0)
            .with_harvest(2, vec![1.0, 2.0, 3.0]);
        let rendered = report.render_text();
        let lines: Vec<&str> = rendered.lines().collect();

        assert_eq!(lines.len(), 4);
        assert!(lines[0].trim_start().starts_with("2 1.0000000000000000e0"));
        assert!(lines[2].trim_start().starts_with("4 3.0000000000000000e0"));
        assert_eq!(lines[3], "legendre_plm_array = 3.0000000000000000e0");
    }

    #[test]
    fn text_rendering_shows_error_estimate_and_imaginary_part() {
        let coupling =
            EvaluationReport::coupling(EntryPoint::Coupling6j, ValueWithError::new(0.5, 1.0e-16));
        assert_eq!(
            coupling.render_text(),
            "coupling_6j = 5.0000000000000000e-1 +/- 1.000e-16"
        );

        let harmonic = EvaluationReport::complex(EntryPoint::SphericalHarmonic, 0.25, -0.5);
        assert_eq!(
            harmonic.render_text(),
            "spherical_harmonic = 2.5000000000000000e-1 - 5.0000000000000000e-1i"
        );
    }

    #[test]
    fn json_rendering_skips_absent_fields() {
        let report = EvaluationReport::real(EntryPoint::LegendrePl, -0.4375);
        let json = serde_json::to_value(&report).expect("report should serialize");
        assert_eq!(json["entry"], "legendre_pl");
        assert_eq!(json["status"], "SUCCESS");
        assert_eq!(json["value"], -0.4375);
        assert!(json.get("errorEstimate").is_none());
        assert!(json.get("harvest").is_none());
    }

    #[test]
    fn require_values_rejects_wrong_arity() {
        assert_eq!(require_values::<3>(vec![1, 2, 3]).expect("arity"), [1, 2, 3]);
        assert!(require_values::<3>(vec![1, 2]).is_err());
    }
}
