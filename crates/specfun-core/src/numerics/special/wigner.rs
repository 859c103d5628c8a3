//! Wigner 3j, 6j and 9j coupling coefficients with forward error bounds.
//!
//! All `two_*` values represent `2*j` or `2*m` (e.g., `two_j=3` means `j=3/2`).
//! Selection-rule violations are not errors: they evaluate to an exact zero.

use super::factorial::{FACTORIAL_NMAX, half_sum_factorial as fact};
use crate::common::constants::DBL_EPSILON;
use crate::domain::{EntryPoint, SpecFunError, SpecFunResult};
use crate::numerics::result::ValueWithError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Wigner3jInput {
    pub two_j1: i32,
    pub two_j2: i32,
    pub two_j3: i32,
    pub two_m1: i32,
    pub two_m2: i32,
    pub two_m3: i32,
}

impl Wigner3jInput {
    pub fn new(
        two_j1: i32,
        two_j2: i32,
        two_j3: i32,
        two_m1: i32,
        two_m2: i32,
        two_m3: i32,
    ) -> Self {
        Self {
            two_j1,
            two_j2,
            two_j3,
            two_m1,
            two_m2,
            two_m3,
        }
    }
}

/// `{j1 j2 j3; j4 j5 j6}` in doubled units.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Wigner6jInput {
    pub two_j1: i32,
    pub two_j2: i32,
    pub two_j3: i32,
    pub two_j4: i32,
    pub two_j5: i32,
    pub two_j6: i32,
}

impl Wigner6jInput {
    pub fn new(
        two_j1: i32,
        two_j2: i32,
        two_j3: i32,
        two_j4: i32,
        two_j5: i32,
        two_j6: i32,
    ) -> Self {
        Self {
            two_j1,
            two_j2,
            two_j3,
            two_j4,
            two_j5,
            two_j6,
        }
    }
}

/// `{j1 j2 j3; j4 j5 j6; j7 j8 j9}` in doubled units, rows first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Wigner9jInput {
    pub two_j: [i32; 9],
}

impl Wigner9jInput {
    pub fn new(two_j: [i32; 9]) -> Self {
        Self { two_j }
    }
}

pub trait WignerSymbolsApi {
    fn wigner_3j(&self, input: Wigner3jInput) -> SpecFunResult<ValueWithError>;
    fn wigner_6j(&self, input: Wigner6jInput) -> SpecFunResult<ValueWithError>;
    fn wigner_9j(&self, input: Wigner9jInput) -> SpecFunResult<ValueWithError>;
}

/// Computes the Wigner 3j symbol `(j1 j2 j3; m1 m2 m3)`.
pub fn wigner_3j(input: Wigner3jInput) -> SpecFunResult<ValueWithError> {
    let Wigner3jInput {
        two_j1,
        two_j2,
        two_j3,
        two_m1,
        two_m2,
        two_m3,
    } = input;

    if two_j1 < 0 || two_j2 < 0 || two_j3 < 0 {
        return Err(SpecFunError::domain(
            EntryPoint::Coupling3j,
            "angular momenta must be non-negative",
        ));
    }

    if triangle_selection_fails(two_j1, two_j2, two_j3) || m_selection_fails(input) {
        return Ok(ValueWithError::ZERO);
    }
    // Bounds every j, and through the m rules every m, well inside i32.
    check_half_perimeter(EntryPoint::Coupling3j, two_j1, two_j2, two_j3)?;

    let n1 = fact((two_j3 + two_j1 - two_j2) / 2)? * fact((two_j3 - two_j1 + two_j2) / 2)?;
    let n2 = fact((two_j1 + two_j2 - two_j3) / 2)?;
    let n3 = fact((two_j3 - two_m3) / 2)? * fact((two_j3 + two_m3) / 2)?;
    let d1 = fact((two_j1 + two_j2 + two_j3) / 2 + 1)?;
    let d2 = fact((two_j1 - two_m1) / 2)? * fact((two_j1 + two_m1) / 2)?;
    let d3 = fact((two_j2 - two_m2) / 2)? * fact((two_j2 + two_m2) / 2)?;

    let norm = parity_sign((two_j1 - two_j2 - two_m3) / 2)
        * (n1.val.sqrt() * n2.val.sqrt() * n3.val.sqrt())
        / (d1.val.sqrt() * d2.val.sqrt() * d3.val.sqrt());

    let tk_min = 0_i32.max(two_j2 - two_j1 - two_m3);
    let tk_max = (two_j3 - two_j1 + two_j2).min(two_j3 - two_m3);
    tracing::trace!(tk_min, tk_max, "3j series range");

    let mut phase = parity_sign((tk_min + two_j2 + two_m2) / 2);
    let mut sums = SignedPartialSums::default();
    for tk in (tk_min..=tk_max).step_by(2) {
        let n1 = fact((two_j2 + two_j3 + two_m1 - tk) / 2)?;
        let n2 = fact((two_j1 - two_m1 + tk) / 2)?;
        let d1 = fact(tk / 2)? * fact((two_j3 - two_j1 + two_j2 - tk) / 2)?;
        let d2 = fact((two_j3 - two_m3 - tk) / 2)?;
        let d3 = fact((two_j1 - two_j2 + two_m3 + tk) / 2)?;

        let term = phase * n1.val * n2.val / (d1.val * d2.val * d3.val);
        phase = -phase;
        sums.accumulate(norm * term);
    }

    let result = ValueWithError::new(sums.value(), 2.0 * DBL_EPSILON * sums.magnitude())
        .with_rounding_floor(2.0 * f64::from(tk_max - tk_min));
    finite_or_overflow(EntryPoint::Coupling3j, result)
}

/// Computes the Wigner 6j symbol `{j1 j2 j3; j4 j5 j6}` by the Racah sum.
///
/// Arguments follow the row order of the symbol: `two_j1..two_j3` are the top
/// row and `two_j4..two_j6` the bottom row, so the triads are `(j1 j2 j3)`,
/// `(j1 j5 j6)`, `(j4 j2 j6)` and `(j4 j5 j3)`. Code written against the
/// `(a, b, c, d, e, f) -> {a b e; d c f}` convention must swap its third and
/// fifth arguments.
pub fn wigner_6j(input: Wigner6jInput) -> SpecFunResult<ValueWithError> {
    let Wigner6jInput {
        two_j1,
        two_j2,
        two_j3,
        two_j4,
        two_j5,
        two_j6,
    } = input;

    if [two_j1, two_j2, two_j3, two_j4, two_j5, two_j6]
        .iter()
        .any(|two_j| *two_j < 0)
    {
        return Err(SpecFunError::domain(
            EntryPoint::Coupling6j,
            "angular momenta must be non-negative",
        ));
    }

    if triangle_selection_fails(two_j1, two_j2, two_j3)
        || triangle_selection_fails(two_j1, two_j5, two_j6)
        || triangle_selection_fails(two_j4, two_j2, two_j6)
        || triangle_selection_fails(two_j4, two_j5, two_j3)
    {
        return Ok(ValueWithError::ZERO);
    }
    for [two_a, two_b, two_c] in [
        [two_j1, two_j2, two_j3],
        [two_j1, two_j5, two_j6],
        [two_j4, two_j2, two_j6],
        [two_j4, two_j5, two_j3],
    ] {
        check_half_perimeter(EntryPoint::Coupling6j, two_a, two_b, two_c)?;
    }

    let norm = triangle_coefficient(two_j1, two_j2, two_j3)?.val.sqrt()
        * triangle_coefficient(two_j1, two_j5, two_j6)?.val.sqrt()
        * triangle_coefficient(two_j2, two_j4, two_j6)?.val.sqrt()
        * triangle_coefficient(two_j3, two_j4, two_j5)?.val.sqrt();

    let tk_min = 0_i32
        .max(two_j1 + two_j4 - two_j3 - two_j6)
        .max(two_j2 + two_j5 - two_j3 - two_j6);
    let tk_max = (two_j1 + two_j2 + two_j4 + two_j5 + 2)
        .min(two_j1 + two_j2 - two_j3)
        .min(two_j4 + two_j5 - two_j3)
        .min(two_j1 + two_j5 - two_j6)
        .min(two_j2 + two_j4 - two_j6);
    tracing::trace!(tk_min, tk_max, "6j series range");

    let mut phase = parity_sign((two_j1 + two_j2 + two_j4 + two_j5 + tk_min) / 2);
    let mut sums = SignedPartialSums::default();
    let mut sumsq_err = 0.0;
    for tk in (tk_min..=tk_max).step_by(2) {
        let n1 = fact((two_j1 + two_j2 + two_j4 + two_j5 - tk) / 2 + 1)?;
        let den_1 = fact(tk / 2)?
            * fact((two_j3 + two_j6 - two_j1 - two_j4 + tk) / 2)?
            * fact((two_j3 + two_j6 - two_j2 - two_j5 + tk) / 2)?
            * fact((two_j1 + two_j2 - two_j3 - tk) / 2)?;
        let den_2 = fact((two_j4 + two_j5 - two_j3 - tk) / 2)?
            * fact((two_j1 + two_j5 - two_j6 - tk) / 2)?
            * fact((two_j2 + two_j4 - two_j6 - tk) / 2)?;

        let term = (n1 / den_1 / den_2).scale(phase);
        phase = -phase;

        sums.accumulate(norm * term.val);
        sumsq_err += norm * norm * term.err * term.err;
    }

    let result = quadrature_result(&sums, sumsq_err, tk_min, tk_max);
    finite_or_overflow(EntryPoint::Coupling6j, result)
}

/// Computes the Wigner 9j symbol as a weighted sum over products of three 6j symbols.
pub fn wigner_9j(input: Wigner9jInput) -> SpecFunResult<ValueWithError> {
    let [
        two_j1,
        two_j2,
        two_j3,
        two_j4,
        two_j5,
        two_j6,
        two_j7,
        two_j8,
        two_j9,
    ] = input.two_j;

    if input.two_j.iter().any(|two_j| *two_j < 0) {
        return Err(SpecFunError::domain(
            EntryPoint::Coupling9j,
            "angular momenta must be non-negative",
        ));
    }

    if triangle_selection_fails(two_j1, two_j2, two_j3)
        || triangle_selection_fails(two_j4, two_j5, two_j6)
        || triangle_selection_fails(two_j7, two_j8, two_j9)
        || triangle_selection_fails(two_j1, two_j4, two_j7)
        || triangle_selection_fails(two_j2, two_j5, two_j8)
        || triangle_selection_fails(two_j3, two_j6, two_j9)
    {
        return Ok(ValueWithError::ZERO);
    }

    let wide = input.two_j.map(i64::from);
    let wide_tk_min = (wide[0] - wide[8])
        .abs()
        .max((wide[7] - wide[3]).abs())
        .max((wide[1] - wide[5]).abs());
    let wide_tk_max = (wide[0] + wide[8])
        .min(wide[7] + wide[3])
        .min(wide[1] + wide[5]);
    if wide_tk_min > wide_tk_max {
        return Ok(ValueWithError::ZERO);
    }
    // Every term evaluates a 6j on each row and column triad.
    for [two_a, two_b, two_c] in [
        [two_j1, two_j2, two_j3],
        [two_j4, two_j5, two_j6],
        [two_j7, two_j8, two_j9],
        [two_j1, two_j4, two_j7],
        [two_j2, two_j5, two_j8],
        [two_j3, two_j6, two_j9],
    ] {
        check_half_perimeter(EntryPoint::Coupling9j, two_a, two_b, two_c)?;
    }

    let tk_min = (two_j1 - two_j9)
        .abs()
        .max((two_j8 - two_j4).abs())
        .max((two_j2 - two_j6).abs());
    let tk_max = (two_j1 + two_j9)
        .min(two_j8 + two_j4)
        .min(two_j2 + two_j6);
    tracing::trace!(tk_min, tk_max, "9j series range");

    let mut sums = SignedPartialSums::default();
    let mut sumsq_err = 0.0;
    for tk in (tk_min..=tk_max).step_by(2) {
        let s1 = wigner_6j(Wigner6jInput::new(
            two_j1, two_j9, tk, two_j8, two_j4, two_j7,
        ))?;
        let s2 = wigner_6j(Wigner6jInput::new(
            two_j2, two_j6, tk, two_j4, two_j8, two_j5,
        ))?;
        let s3 = wigner_6j(Wigner6jInput::new(
            two_j1, two_j9, tk, two_j6, two_j2, two_j3,
        ))?;

        let weight = f64::from(tk + 1);
        let term = (s1 * s2 * s3).scale(weight);
        sums.accumulate(term.val);
        sumsq_err += term.err * term.err;
    }

    let result = quadrature_result(&sums, sumsq_err, tk_min, tk_max).scale(parity_sign(tk_min));
    finite_or_overflow(EntryPoint::Coupling9j, result)
}

/// Positive contributions and negated negative contributions, kept apart
/// until the final subtraction.
#[derive(Debug, Default)]
struct SignedPartialSums {
    positive: f64,
    negative: f64,
}

impl SignedPartialSums {
    fn accumulate(&mut self, contribution: f64) {
        if contribution >= 0.0 {
            self.positive += contribution;
        } else {
            self.negative -= contribution;
        }
    }

    fn value(&self) -> f64 {
        self.positive - self.negative
    }

    fn magnitude(&self) -> f64 {
        self.positive + self.negative
    }
}

fn quadrature_result(
    sums: &SignedPartialSums,
    sumsq_err: f64,
    tk_min: i32,
    tk_max: i32,
) -> ValueWithError {
    let span = f64::from(tk_max - tk_min);
    let err = 2.0 * DBL_EPSILON * sums.magnitude() + (sumsq_err / (0.5 * span + 1.0)).sqrt();
    ValueWithError::new(sums.value(), err).with_rounding_floor(2.0 * (span + 2.0))
}

/// `((a+b-c)/2)! ((a+c-b)/2)! ((b+c-a)/2)! / ((a+b+c)/2 + 1)!`
fn triangle_coefficient(two_a: i32, two_b: i32, two_c: i32) -> SpecFunResult<ValueWithError> {
    let f1 = fact((two_a + two_b - two_c) / 2)?;
    let f2 = fact((two_a + two_c - two_b) / 2)?;
    let f3 = fact((two_b + two_c - two_a) / 2)?;
    let f4 = fact((two_a + two_b + two_c) / 2 + 1)?;
    Ok(ValueWithError::exact(f1.val * f2.val * f3.val / f4.val).with_rounding_floor(4.0))
}

/// Selection rules are evaluated in `i64` so that any pair of `i32` inputs is
/// accepted without wrapping.
fn triangle_selection_fails(two_ja: i32, two_jb: i32, two_jc: i32) -> bool {
    let (two_ja, two_jb, two_jc) = (i64::from(two_ja), i64::from(two_jb), i64::from(two_jc));
    two_jb < (two_ja - two_jc).abs()
        || two_jb > two_ja + two_jc
        || (two_ja + two_jb + two_jc).rem_euclid(2) != 0
}

fn m_selection_fails(input: Wigner3jInput) -> bool {
    let pairs = [
        (input.two_j1, input.two_m1),
        (input.two_j2, input.two_m2),
        (input.two_j3, input.two_m3),
    ]
    .map(|(two_j, two_m)| (i64::from(two_j), i64::from(two_m)));

    pairs
        .iter()
        .any(|&(two_j, two_m)| two_m.abs() > two_j || (two_j + two_m).rem_euclid(2) != 0)
        || pairs.iter().map(|&(_, two_m)| two_m).sum::<i64>() != 0
}

/// Fails with overflow when `((a+b+c)/2 + 1)!` lies beyond the factorial table.
/// Past this check every angular momentum of the triad is small enough for
/// the `i32` series arithmetic.
fn check_half_perimeter(
    entry: EntryPoint,
    two_a: i32,
    two_b: i32,
    two_c: i32,
) -> SpecFunResult<()> {
    let half_perimeter = (i64::from(two_a) + i64::from(two_b) + i64::from(two_c)) / 2 + 1;
    if half_perimeter > i64::from(FACTORIAL_NMAX) {
        return Err(SpecFunError::overflow(
            entry,
            "triangle perimeter exceeds the factorial range",
        ));
    }
    Ok(())
}

fn parity_sign(exponent: i32) -> f64 {
    if exponent.rem_euclid(2) != 0 {
        -1.0
    } else {
        1.0
    }
}

fn finite_or_overflow(
    entry: EntryPoint,
    result: ValueWithError,
) -> SpecFunResult<ValueWithError> {
    if result.val.is_finite() && result.err.is_finite() {
        Ok(result)
    } else {
        Err(SpecFunError::overflow(
            entry,
            "intermediate factorial products exceed double range",
        ))
    }
}
