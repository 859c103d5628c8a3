//! Two-tier front end over the free functions of this module.
//!
//! The raw tier returns every outcome silently. The checked tier reports each
//! non-success outcome through `tracing` before handing it back unchanged.

use super::harmonics::{SphericalHarmonicsApi, SphericalHarmonicsInput, spherical_y};
use super::legendre::{self, LegendreApi, LegendreArgument};
use super::wigner::{
    self, Wigner3jInput, Wigner6jInput, Wigner9jInput, WignerSymbolsApi,
};
use crate::domain::{EvaluationTier, SpecFunResult};
use crate::numerics::result::ValueWithError;
use num_complex::Complex64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EvaluatorConfig {
    pub tier: EvaluationTier,
}

impl EvaluatorConfig {
    pub fn new(tier: EvaluationTier) -> Self {
        Self { tier }
    }

    pub fn checked() -> Self {
        Self::new(EvaluationTier::Checked)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Evaluator {
    config: EvaluatorConfig,
}

impl Evaluator {
    pub fn new(config: EvaluatorConfig) -> Self {
        Self { config }
    }

    pub fn tier(&self) -> EvaluationTier {
        self.config.tier
    }

    fn observe<T>(&self, outcome: SpecFunResult<T>) -> SpecFunResult<T> {
        if let (EvaluationTier::Checked, Err(error)) = (self.config.tier, &outcome) {
            tracing::error!(
                entry = error.entry().as_str(),
                status = error.status_label(),
                code = error.status_code(),
                "{error}"
            );
        }
        outcome
    }
}

impl WignerSymbolsApi for Evaluator {
    fn wigner_3j(&self, input: Wigner3jInput) -> SpecFunResult<ValueWithError> {
        self.observe(wigner::wigner_3j(input))
    }

    fn wigner_6j(&self, input: Wigner6jInput) -> SpecFunResult<ValueWithError> {
        self.observe(wigner::wigner_6j(input))
    }

    fn wigner_9j(&self, input: Wigner9jInput) -> SpecFunResult<ValueWithError> {
        self.observe(wigner::wigner_9j(input))
    }
}

impl LegendreApi for Evaluator {
    fn legendre_pl(&self, l: i32, x: f64) -> SpecFunResult<f64> {
        self.observe(legendre::legendre_pl(l, x))
    }

    fn legendre_plm(&self, l: i32, m: i32, argument: LegendreArgument) -> SpecFunResult<f64> {
        self.observe(legendre::legendre_plm(l, m, argument))
    }

    fn legendre_sph_plm(
        &self,
        l: i32,
        m: i32,
        argument: LegendreArgument,
    ) -> SpecFunResult<f64> {
        self.observe(legendre::legendre_sph_plm(l, m, argument))
    }

    fn legendre_pl_array(&self, l: i32, x: f64, harvest: &mut [f64]) -> SpecFunResult<f64> {
        self.observe(legendre::legendre_pl_array(l, x, harvest))
    }

    fn legendre_plm_array(
        &self,
        l: i32,
        m: i32,
        argument: LegendreArgument,
        harvest: &mut [f64],
    ) -> SpecFunResult<f64> {
        self.observe(legendre::legendre_plm_array(l, m, argument, harvest))
    }

    fn legendre_sph_plm_array(
        &self,
        l: i32,
        m: i32,
        argument: LegendreArgument,
        harvest: &mut [f64],
    ) -> SpecFunResult<f64> {
        self.observe(legendre::legendre_sph_plm_array(l, m, argument, harvest))
    }
}

impl SphericalHarmonicsApi for Evaluator {
    fn y_lm(&self, input: SphericalHarmonicsInput) -> SpecFunResult<Complex64> {
        self.observe(spherical_y(input))
    }
}
