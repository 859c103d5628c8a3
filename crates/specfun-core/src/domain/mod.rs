pub mod errors;

pub use errors::{ErrorCategory, SpecFunError, SpecFunResult, StatusPlaceholder};

use std::fmt::{Display, Formatter};

/// Whether non-success outcomes are reported through `tracing` before being returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum EvaluationTier {
    #[default]
    Raw,
    Checked,
}

impl EvaluationTier {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Raw => "raw",
            Self::Checked => "checked",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryPoint {
    Factorial,
    Coupling3j,
    Coupling6j,
    Coupling9j,
    LegendrePl,
    LegendrePlm,
    LegendreSphPlm,
    LegendrePlArray,
    LegendrePlmArray,
    LegendreSphPlmArray,
    SphericalHarmonic,
    Smash,
}

impl EntryPoint {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Factorial => "factorial",
            Self::Coupling3j => "coupling_3j",
            Self::Coupling6j => "coupling_6j",
            Self::Coupling9j => "coupling_9j",
            Self::LegendrePl => "legendre_pl",
            Self::LegendrePlm => "legendre_plm",
            Self::LegendreSphPlm => "legendre_sph_plm",
            Self::LegendrePlArray => "legendre_pl_array",
            Self::LegendrePlmArray => "legendre_plm_array",
            Self::LegendreSphPlmArray => "legendre_sph_plm_array",
            Self::SphericalHarmonic => "spherical_harmonic",
            Self::Smash => "smash",
        }
    }
}

impl Display for EntryPoint {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str((*self).as_str())
    }
}
