pub mod evaluator;
pub mod factorial;
pub mod harmonics;
pub mod legendre;
pub mod wigner;

pub use evaluator::{Evaluator, EvaluatorConfig};
pub use factorial::{FACTORIAL_NMAX, factorial};
pub use harmonics::{SphericalHarmonicsApi, SphericalHarmonicsInput, spherical_y, y_lm};
pub use legendre::{
    LegendreApi, LegendreArgument, legendre_array_size, legendre_p1, legendre_p2, legendre_p3,
    legendre_p4, legendre_p5, legendre_pl, legendre_pl_array, legendre_plm, legendre_plm_array,
    legendre_sph_plm, legendre_sph_plm_array,
};
pub use wigner::{
    Wigner3jInput, Wigner6jInput, Wigner9jInput, WignerSymbolsApi, wigner_3j, wigner_6j,
    wigner_9j,
};
