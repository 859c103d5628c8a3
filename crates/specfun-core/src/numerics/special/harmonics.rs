use super::legendre::{LegendreArgument, legendre_sph_plm};
use crate::domain::{EntryPoint, SpecFunError, SpecFunResult};
use num_complex::Complex64;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SphericalHarmonicsInput {
    pub degree: i32,
    pub order: i32,
    pub theta: f64,
    pub phi: f64,
}

impl SphericalHarmonicsInput {
    pub fn new(degree: i32, order: i32, theta: f64, phi: f64) -> Self {
        Self {
            degree,
            order,
            theta,
            phi,
        }
    }
}

pub trait SphericalHarmonicsApi {
    fn y_lm(&self, input: SphericalHarmonicsInput) -> SpecFunResult<Complex64>;
}

/// `Y_l^m(θ, φ)` with the Condon-Shortley phase.
pub fn y_lm(degree: i32, order: i32, theta: f64, phi: f64) -> SpecFunResult<Complex64> {
    if degree < 0 || order.abs() > degree {
        return Err(SpecFunError::domain(
            EntryPoint::SphericalHarmonic,
            "order must satisfy |m| <= l",
        ));
    }
    if !theta.is_finite() || !phi.is_finite() {
        return Err(SpecFunError::domain(
            EntryPoint::SphericalHarmonic,
            "angles must be finite",
        ));
    }

    let positive_order = order.abs();
    let normalized_legendre = legendre_sph_plm(
        degree,
        positive_order,
        LegendreArgument::from_polar_angle(theta),
    )?;
    let phase = Complex64::from_polar(1.0, f64::from(positive_order) * phi);
    let positive = phase * normalized_legendre;

    if order >= 0 {
        return Ok(positive);
    }
    if positive_order % 2 == 0 {
        Ok(positive.conj())
    } else {
        Ok(-positive.conj())
    }
}

pub fn spherical_y(input: SphericalHarmonicsInput) -> SpecFunResult<Complex64> {
    y_lm(input.degree, input.order, input.theta, input.phi)
}

#[cfg(test)]
mod tests {
    use super::{SphericalHarmonicsInput, spherical_y, y_lm};
    use crate::common::constants::PI;
    use crate::domain::ErrorCategory;
    use num_complex::Complex64;

    #[test]
    fn y_lm_matches_representative_known_values() {
        let y00 = y_lm(0, 0, 1.2, -0.8).expect("Y_0^0");
        assert_complex_close(
            "Y_0^0",
            Complex64::new((1.0 / (4.0 * PI)).sqrt(), 0.0),
            y00,
            1.0e-14,
            1.0e-13,
        );

        let theta = PI / 3.0;
        let y10 = y_lm(1, 0, theta, 0.4).expect("Y_1^0");
        assert_complex_close(
            "Y_1^0",
            Complex64::new((3.0 / (4.0 * PI)).sqrt() * theta.cos(), 0.0),
            y10,
            1.0e-14,
            1.0e-13,
        );

        let y11 = y_lm(1, 1, PI / 2.0, 0.0).expect("Y_1^1");
        assert_complex_close(
            "Y_1^1",
            Complex64::new(-(3.0 / (8.0 * PI)).sqrt(), 0.0),
            y11,
            1.0e-14,
            1.0e-13,
        );

        let phi = 0.9;
        let y22 = y_lm(2, 2, theta, phi).expect("Y_2^2");
        let amplitude = 0.25 * (15.0 / (2.0 * PI)).sqrt() * theta.sin().powi(2);
        assert_complex_close(
            "Y_2^2",
            Complex64::from_polar(amplitude, 2.0 * phi),
            y22,
            1.0e-14,
            1.0e-13,
        );
    }

    #[test]
    fn y_lm_satisfies_negative_order_symmetry_identity() {
        let theta = 1.1;
        let phi = -0.7;

        for degree in 1..=6 {
            for order in 1..=degree {
                let positive = y_lm(degree, order, theta, phi).expect("positive order");
                let expected_negative = if order % 2 == 0 {
                    positive.conj()
                } else {
                    -positive.conj()
                };
                let actual_negative = y_lm(degree, -order, theta, phi).expect("negative order");

                assert_complex_close(
                    &format!("l={degree} m={order}"),
                    expected_negative,
                    actual_negative,
                    1.0e-13,
                    1.0e-12,
                );
            }
        }
    }

    #[test]
    fn y_lm_satisfies_normalization_sum_rule() {
        let samples = [(0.3, -1.2), (1.1, 0.4), (2.4, 2.2)];

        for degree in [0, 1, 2, 4, 6, 20] {
            let expected_power = (2 * degree + 1) as f64 / (4.0 * PI);
            for (theta, phi) in samples {
                let mut accumulated = 0.0;
                for order in -degree..=degree {
                    accumulated += y_lm(degree, order, theta, phi)
                        .expect("valid harmonic")
                        .norm_sqr();
                }

                assert_scalar_close(
                    &format!("l={degree} theta={theta} phi={phi}"),
                    expected_power,
                    accumulated,
                    5.0e-12,
                    5.0e-11,
                );
            }
        }
    }

    #[test]
    fn y_lm_rejects_invalid_degree_order_and_angles() {
        for (degree, order, theta) in [(-1, 0, 0.5), (2, 3, 0.5), (2, -3, 0.5), (2, 1, f64::NAN)] {
            let error = y_lm(degree, order, theta, 0.0).unwrap_err();
            assert_eq!(error.category(), ErrorCategory::DomainError);
        }
    }

    #[test]
    fn spherical_y_forwards_struct_input_to_y_lm() {
        let input = SphericalHarmonicsInput::new(3, -2, 0.8, 1.4);
        let expected = y_lm(input.degree, input.order, input.theta, input.phi).expect("y_lm");
        let actual = spherical_y(input).expect("spherical_y");

        assert_complex_close("spherical_y", expected, actual, 1.0e-15, 1.0e-15);
    }

    fn assert_scalar_close(label: &str, expected: f64, actual: f64, abs_tol: f64, rel_tol: f64) {
        let abs_diff = (actual - expected).abs();
        let rel_diff = abs_diff / expected.abs().max(1.0);
        assert!(
            abs_diff <= abs_tol || rel_diff <= rel_tol,
            "{label} expected={expected:.15e} actual={actual:.15e} abs_diff={abs_diff:.15e} rel_diff={rel_diff:.15e} abs_tol={abs_tol:.15e} rel_tol={rel_tol:.15e}"
        );
    }

    fn assert_complex_close(
        label: &str,
        expected: Complex64,
        actual: Complex64,
        abs_tol: f64,
        rel_tol: f64,
    ) {
        let abs_diff = (actual - expected).norm();
        let rel_diff = abs_diff / expected.norm().max(1.0);
        assert!(
            abs_diff <= abs_tol || rel_diff <= rel_tol,
            "{label} expected=({:.15e},{:.15e}) actual=({:.15e},{:.15e}) abs_diff={:.15e} rel_diff={:.15e} abs_tol={:.15e} rel_tol={:.15e}",
            expected.re,
            expected.im,
            actual.re,
            actual.im,
            abs_diff,
            rel_diff,
            abs_tol,
            rel_tol
        );
    }
}
