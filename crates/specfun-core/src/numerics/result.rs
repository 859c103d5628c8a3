//! Value/error pairs with worst-case forward error propagation.
//!
//! `err` is an absolute bound on the deviation of `val` from the exact
//! mathematical result. The arithmetic operators propagate errors linearly
//! (triangle inequality, never quadrature) and do not add a rounding floor;
//! callers add one explicitly with [`ValueWithError::with_rounding_floor`]
//! after the final combination step.

use crate::common::constants::{DBL_EPSILON, LOG_DBL_MAX, LOG_DBL_MIN};
use crate::domain::{EntryPoint, SpecFunError, SpecFunResult};
use serde::{Deserialize, Serialize};
use std::f64::consts::LN_10;
use std::ops::{Add, Div, Mul, Neg, Sub};

#[derive(Debug, Clone, Copy, PartialEq, Default, Deserialize, Serialize)]
pub struct ValueWithError {
    pub val: f64,
    pub err: f64,
}

impl ValueWithError {
    pub const ZERO: Self = Self { val: 0.0, err: 0.0 };

    pub const fn new(val: f64, err: f64) -> Self {
        Self { val, err }
    }

    pub const fn exact(val: f64) -> Self {
        Self { val, err: 0.0 }
    }

    /// Adds `ulps * ε * |val|` to the error to cover rounding of the last step.
    pub fn with_rounding_floor(self, ulps: f64) -> Self {
        Self {
            val: self.val,
            err: self.err + ulps * DBL_EPSILON * self.val.abs(),
        }
    }

    pub fn scale(self, factor: f64) -> Self {
        Self {
            val: self.val * factor,
            err: self.err * factor.abs(),
        }
    }

    pub fn sqrt(self) -> Self {
        let val = self.val.sqrt();
        let err = if val > 0.0 {
            self.err / (2.0 * val)
        } else {
            0.0
        };
        Self { val, err }.with_rounding_floor(2.0)
    }

    pub fn relative_error(self) -> f64 {
        if self.val == 0.0 {
            return self.err;
        }
        self.err / self.val.abs()
    }

    /// True when `expected` lies inside `val ± err`.
    pub fn bounds(self, expected: f64) -> bool {
        (self.val - expected).abs() <= self.err
    }
}

impl Mul for ValueWithError {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self {
        Self {
            val: self.val * rhs.val,
            err: self.err * rhs.val.abs() + self.val.abs() * rhs.err,
        }
    }
}

impl Div for ValueWithError {
    type Output = Self;

    fn div(self, rhs: Self) -> Self {
        let val = self.val / rhs.val;
        Self {
            val,
            err: (self.err + val.abs() * rhs.err) / rhs.val.abs(),
        }
    }
}

impl Add for ValueWithError {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self {
            val: self.val + rhs.val,
            err: self.err + rhs.err,
        }
    }
}

impl Sub for ValueWithError {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self {
            val: self.val - rhs.val,
            err: self.err + rhs.err,
        }
    }
}

impl Neg for ValueWithError {
    type Output = Self;

    fn neg(self) -> Self {
        Self {
            val: -self.val,
            err: self.err,
        }
    }
}

/// A value/error pair carrying an extra decimal exponent: `val * 10^e10`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Deserialize, Serialize)]
pub struct ScaledValueWithError {
    pub val: f64,
    pub err: f64,
    pub e10: i32,
}

impl ScaledValueWithError {
    pub const fn new(val: f64, err: f64, e10: i32) -> Self {
        Self { val, err, e10 }
    }

    /// Folds the decimal exponent into an ordinary [`ValueWithError`].
    pub fn smash(self) -> SpecFunResult<ValueWithError> {
        if self.e10 == 0 {
            return Ok(ValueWithError::new(self.val, self.err));
        }

        let shift = f64::from(self.e10) * LN_10;
        if self.val == 0.0 {
            let err = rescale_magnitude(self.err, shift)?;
            return Ok(ValueWithError::new(0.0, err));
        }

        let log_magnitude = self.val.abs().ln() + shift;
        if log_magnitude > LOG_DBL_MAX {
            return Err(SpecFunError::overflow(
                EntryPoint::Smash,
                "scaled magnitude exceeds the largest finite double",
            ));
        }
        if log_magnitude < LOG_DBL_MIN {
            return Err(SpecFunError::underflow(
                EntryPoint::Smash,
                "scaled magnitude is below the smallest normal double",
            ));
        }

        let val = self.val.signum() * log_magnitude.exp();
        let err = rescale_magnitude(self.err, shift)?;
        // exp(ln|v| + s) loses roughly |ln|v| + s| ulps.
        Ok(ValueWithError::new(val, err).with_rounding_floor(2.0 * (log_magnitude.abs() + 2.0)))
    }
}

fn rescale_magnitude(magnitude: f64, shift: f64) -> SpecFunResult<f64> {
    if magnitude == 0.0 {
        return Ok(0.0);
    }
    let log_magnitude = magnitude.abs().ln() + shift;
    if log_magnitude > LOG_DBL_MAX {
        return Err(SpecFunError::overflow(
            EntryPoint::Smash,
            "scaled error bound exceeds the largest finite double",
        ));
    }
    Ok(log_magnitude.exp())
}
