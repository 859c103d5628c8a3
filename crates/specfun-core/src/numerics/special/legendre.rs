//! Legendre polynomials `P_l(x)`, associated Legendre functions `P_l^m(x)` and
//! their spherical-harmonic normalization, by upward recurrence on the degree.
//!
//! The associated forms take `(1-x, 1+x)` instead of `x` so that callers close
//! to `x = ±1` can supply both half-differences without cancellation.
//!
//! Every family has a scalar entry point and an `_array` entry point that also
//! records the value at each intermediate degree into a caller-owned buffer.
//! Both run the same recurrence, so the final value is bit-identical.

use crate::common::constants::{FOUR_PI, LOG_DBL_MIN};
use crate::domain::{EntryPoint, SpecFunError, SpecFunResult};
use std::f64::consts::FRAC_1_SQRT_2;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LegendreArgument {
    pub one_minus_x: f64,
    pub one_plus_x: f64,
}

impl LegendreArgument {
    pub const fn new(one_minus_x: f64, one_plus_x: f64) -> Self {
        Self {
            one_minus_x,
            one_plus_x,
        }
    }

    pub fn from_x(x: f64) -> Self {
        Self::new(1.0 - x, 1.0 + x)
    }

    /// `x = cos(theta)`, with `1 ∓ x` formed from half-angle sines and cosines.
    pub fn from_polar_angle(theta: f64) -> Self {
        let (sin_half, cos_half) = (0.5 * theta).sin_cos();
        Self::new(2.0 * sin_half * sin_half, 2.0 * cos_half * cos_half)
    }

    pub fn x(self) -> f64 {
        0.5 * (self.one_plus_x - self.one_minus_x)
    }

    fn is_admissible(self) -> bool {
        self.one_minus_x >= 0.0 && self.one_plus_x >= 0.0
    }
}

pub trait LegendreApi {
    fn legendre_pl(&self, l: i32, x: f64) -> SpecFunResult<f64>;
    fn legendre_plm(&self, l: i32, m: i32, argument: LegendreArgument) -> SpecFunResult<f64>;
    fn legendre_sph_plm(&self, l: i32, m: i32, argument: LegendreArgument)
    -> SpecFunResult<f64>;
    fn legendre_pl_array(&self, l: i32, x: f64, harvest: &mut [f64]) -> SpecFunResult<f64>;
    fn legendre_plm_array(
        &self,
        l: i32,
        m: i32,
        argument: LegendreArgument,
        harvest: &mut [f64],
    ) -> SpecFunResult<f64>;
    fn legendre_sph_plm_array(
        &self,
        l: i32,
        m: i32,
        argument: LegendreArgument,
        harvest: &mut [f64],
    ) -> SpecFunResult<f64>;
}

/// Number of entries an `_array` entry point writes for degrees `m..=lmax`.
pub fn legendre_array_size(lmax: i32, m: i32) -> usize {
    usize::try_from(lmax - m + 1).unwrap_or(0)
}

pub fn legendre_p1(x: f64) -> f64 {
    x
}

pub fn legendre_p2(x: f64) -> f64 {
    0.5 * (3.0 * x * x - 1.0)
}

pub fn legendre_p3(x: f64) -> f64 {
    0.5 * x * (5.0 * x * x - 3.0)
}

pub fn legendre_p4(x: f64) -> f64 {
    let x2 = x * x;
    (35.0 * x2 * x2 - 30.0 * x2 + 3.0) / 8.0
}

pub fn legendre_p5(x: f64) -> f64 {
    let x2 = x * x;
    x * (63.0 * x2 * x2 - 70.0 * x2 + 15.0) / 8.0
}

pub fn legendre_pl(l: i32, x: f64) -> SpecFunResult<f64> {
    let degree = validate_pl(EntryPoint::LegendrePl, l, x)?;
    Ok(pl_recurrence(degree, x, |_, _| {}))
}

/// `harvest[i]` receives `P_i(x)` for `i = 0..=l`.
pub fn legendre_pl_array(l: i32, x: f64, harvest: &mut [f64]) -> SpecFunResult<f64> {
    let degree = validate_pl(EntryPoint::LegendrePlArray, l, x)?;
    let harvest = harvest_prefix(EntryPoint::LegendrePlArray, harvest, degree + 1)?;
    Ok(pl_recurrence(degree, x, |index, value| {
        harvest[index] = value;
    }))
}

pub fn legendre_plm(l: i32, m: i32, argument: LegendreArgument) -> SpecFunResult<f64> {
    let (degree, order) = validate_plm(EntryPoint::LegendrePlm, l, m, argument)?;
    check_plm_magnitude(EntryPoint::LegendrePlm, degree, order)?;
    Ok(plm_recurrence(degree, order, argument, |_, _| {}))
}

/// `harvest[i]` receives `P_{m+i}^m(x)` for `i = 0..=l-m`.
pub fn legendre_plm_array(
    l: i32,
    m: i32,
    argument: LegendreArgument,
    harvest: &mut [f64],
) -> SpecFunResult<f64> {
    let (degree, order) = validate_plm(EntryPoint::LegendrePlmArray, l, m, argument)?;
    check_plm_magnitude(EntryPoint::LegendrePlmArray, degree, order)?;
    let harvest = harvest_prefix(EntryPoint::LegendrePlmArray, harvest, degree - order + 1)?;
    Ok(plm_recurrence(degree, order, argument, |index, value| {
        harvest[index] = value;
    }))
}

pub fn legendre_sph_plm(l: i32, m: i32, argument: LegendreArgument) -> SpecFunResult<f64> {
    let (degree, order) = validate_plm(EntryPoint::LegendreSphPlm, l, m, argument)?;
    Ok(sph_plm_recurrence(degree, order, argument, |_, _| {}))
}

/// `harvest[i]` receives the normalized function at degree `m+i`, each entry
/// carrying its own `sqrt((2(m+i)+1)/4π)` factor.
pub fn legendre_sph_plm_array(
    l: i32,
    m: i32,
    argument: LegendreArgument,
    harvest: &mut [f64],
) -> SpecFunResult<f64> {
    let (degree, order) = validate_plm(EntryPoint::LegendreSphPlmArray, l, m, argument)?;
    let harvest = harvest_prefix(EntryPoint::LegendreSphPlmArray, harvest, degree - order + 1)?;
    Ok(sph_plm_recurrence(degree, order, argument, |index, value| {
        harvest[index] = value;
    }))
}

fn validate_pl(entry: EntryPoint, l: i32, x: f64) -> SpecFunResult<usize> {
    if l < 0 {
        return Err(SpecFunError::domain(entry, "degree must be non-negative"));
    }
    if !(-1.0..=1.0).contains(&x) {
        return Err(SpecFunError::domain(entry, "x must lie in [-1, 1]"));
    }
    Ok(l as usize)
}

fn validate_plm(
    entry: EntryPoint,
    l: i32,
    m: i32,
    argument: LegendreArgument,
) -> SpecFunResult<(usize, usize)> {
    if m < 0 || l < m {
        return Err(SpecFunError::domain(entry, "order must satisfy 0 <= m <= l"));
    }
    if !argument.is_admissible() {
        return Err(SpecFunError::domain(
            entry,
            "1-x and 1+x must both be non-negative",
        ));
    }
    Ok((l as usize, m as usize))
}

fn harvest_prefix(
    entry: EntryPoint,
    harvest: &mut [f64],
    required: usize,
) -> SpecFunResult<&mut [f64]> {
    let provided = harvest.len();
    harvest
        .get_mut(..required)
        .ok_or(SpecFunError::buffer_too_small(entry, required, provided))
}

/// Rejects `P_l^m` whose normalization `sqrt((2l+1)(l-m)!/(l+m)!)` falls
/// below the representable range, which makes `P_l^m` itself overflow.
fn check_plm_magnitude(entry: EntryPoint, degree: usize, order: usize) -> SpecFunResult<()> {
    let dif = (degree - order) as f64;
    let sum = (degree + order) as f64;
    let exp_check = 0.5 * (2.0 * degree as f64 + 1.0).ln() + 0.5 * stirling_exponent(dif)
        - 0.5 * stirling_exponent(sum);

    if exp_check < LOG_DBL_MIN + 10.0 {
        tracing::debug!(degree, order, exp_check, "P_l^m rejected by magnitude pre-check");
        return Err(SpecFunError::overflow(
            entry,
            "P_l^m magnitude exceeds double range",
        ));
    }
    Ok(())
}

/// `n (ln n - 1)`, continuous at zero.
fn stirling_exponent(n: f64) -> f64 {
    if n == 0.0 { 0.0 } else { n * (n.ln() - 1.0) }
}

fn pl_recurrence(degree: usize, x: f64, mut record: impl FnMut(usize, f64)) -> f64 {
    match degree {
        0 => {
            record(0, 1.0);
            1.0
        }
        1 => {
            record(0, 1.0);
            record(1, x);
            x
        }
        2 => {
            let p2 = legendre_p2(x);
            record(0, 1.0);
            record(1, x);
            record(2, p2);
            p2
        }
        _ => {
            let mut pmm = 1.0;
            let mut pmmp1 = x;
            let mut p_ell = pmmp1;
            record(0, pmm);
            record(1, pmmp1);
            for ell in 2..=degree {
                p_ell = (x * (2 * ell - 1) as f64 * pmmp1 - (ell - 1) as f64 * pmm) / ell as f64;
                pmm = pmmp1;
                pmmp1 = p_ell;
                record(ell, p_ell);
            }
            p_ell
        }
    }
}

fn plm_recurrence(
    degree: usize,
    order: usize,
    argument: LegendreArgument,
    mut record: impl FnMut(usize, f64),
) -> f64 {
    let x = argument.x();

    // P_m^m = (-1)^m (2m-1)!! (1-x^2)^(m/2), built one factor at a time.
    let mut pmm = 1.0;
    if order > 0 {
        let circ = argument.one_minus_x.sqrt() * argument.one_plus_x.sqrt();
        let mut fact = 1.0;
        for _ in 0..order {
            pmm *= -fact * circ;
            fact += 2.0;
        }
    }
    record(0, pmm);
    if degree == order {
        return pmm;
    }

    let mut pmmp1 = x * (2 * order + 1) as f64 * pmm;
    record(1, pmmp1);

    let mut p_ell = pmmp1;
    for ell in (order + 2)..=degree {
        p_ell = (x * (2 * ell - 1) as f64 * pmmp1 - (ell + order - 1) as f64 * pmm)
            / (ell - order) as f64;
        pmm = pmmp1;
        pmmp1 = p_ell;
        record(ell - order, p_ell);
    }
    p_ell
}

fn sph_plm_recurrence(
    degree: usize,
    order: usize,
    argument: LegendreArgument,
    mut record: impl FnMut(usize, f64),
) -> f64 {
    let x = argument.x();

    // sqrt((l-m)!/(l+m)!) P_l^m, seeded with sqrt(1/(2m)!) (-1)^m (2m-1)!! (1-x^2)^(m/2).
    let mut ymm = 1.0;
    if order > 0 {
        let circ = (argument.one_minus_x * argument.one_plus_x).sqrt();
        let mut fact1 = 1.0;
        let mut fact2 = FRAC_1_SQRT_2;
        for _ in 0..order {
            ymm *= -fact1 * fact2 * circ;
            fact1 += 2.0;
            fact2 = 1.0 / (fact1 * (fact1 + 1.0)).sqrt();
        }
    }
    record(0, degree_normalization(order) * ymm);
    if degree == order {
        return degree_normalization(degree) * ymm;
    }

    let mut ymmp1 = x * (2.0 * order as f64 + 1.0).sqrt() * ymm;
    record(1, degree_normalization(order + 1) * ymmp1);

    let mut y_ell = ymmp1;
    for ell in (order + 2)..=degree {
        let factor1 = ((ell - order) as f64 / (ell + order) as f64).sqrt();
        let factor2 = factor1 * ((ell - order - 1) as f64 / (ell + order - 1) as f64).sqrt();
        y_ell = (x * (2 * ell - 1) as f64 * ymmp1 * factor1
            - (ell + order - 1) as f64 * ymm * factor2)
            / (ell - order) as f64;
        ymm = ymmp1;
        ymmp1 = y_ell;
        record(ell - order, degree_normalization(ell) * y_ell);
    }
    degree_normalization(degree) * y_ell
}

fn degree_normalization(degree: usize) -> f64 {
    ((2 * degree + 1) as f64 / FOUR_PI).sqrt()
}
