//! Machine and mathematical constants shared by the special-function kernels.
//!
//! Values follow the conventional special-function library definitions so that
//! error floors and overflow thresholds stay comparable with published tables.

pub const PI: f64 = 3.141_592_653_589_793_238_462_643_383_279_5_f64;
pub const FOUR_PI: f64 = 4.0 * PI;

pub const DBL_EPSILON: f64 = f64::EPSILON;
pub const DBL_MIN: f64 = f64::MIN_POSITIVE;
pub const DBL_MAX: f64 = f64::MAX;
pub const LOG_DBL_MIN: f64 = -7.083_964_185_322_641_e2_f64;
pub const LOG_DBL_MAX: f64 = 7.097_827_128_933_840_e2_f64;
