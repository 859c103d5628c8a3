use specfun_core::numerics::special::{
    Wigner3jInput, Wigner6jInput, Wigner9jInput, wigner_3j, wigner_6j, wigner_9j,
};

fn triangle_holds(two_a: i32, two_b: i32, two_c: i32) -> bool {
    two_c >= (two_a - two_b).abs() && two_c <= two_a + two_b && (two_a + two_b + two_c) % 2 == 0
}

fn six_j(two_j: [i32; 6]) -> f64 {
    wigner_6j(Wigner6jInput::new(
        two_j[0], two_j[1], two_j[2], two_j[3], two_j[4], two_j[5],
    ))
    .unwrap_or_else(|error| panic!("6j {two_j:?} should compute: {error}"))
    .val
}

#[test]
fn three_j_columns_are_orthonormal() {
    for (two_j1, two_j2) in [(6_i32, 5_i32), (8, 8), (3, 7)] {
        for two_j3 in ((two_j1 - two_j2).abs()..=two_j1 + two_j2).step_by(2) {
            for two_m3 in (-two_j3..=two_j3).step_by(2) {
                let mut accumulated = 0.0;
                for two_m1 in (-two_j1..=two_j1).step_by(2) {
                    let two_m2 = -two_m1 - two_m3;
                    if two_m2.abs() > two_j2 {
                        continue;
                    }
                    let symbol = wigner_3j(Wigner3jInput::new(
                        two_j1, two_j2, two_j3, two_m1, two_m2, two_m3,
                    ))
                    .expect("3j should compute");
                    accumulated += f64::from(two_j3 + 1) * symbol.val * symbol.val;
                }

                assert!(
                    (accumulated - 1.0).abs() < 5.0e-12,
                    "j1={two_j1}/2 j2={two_j2}/2 j3={two_j3}/2 m3={two_m3}/2 sum={accumulated:.15e}"
                );
            }
        }
    }
}

#[test]
fn six_j_symbols_are_orthogonal_in_the_recoupled_momentum() {
    for [two_a, two_b, two_c, two_d] in [[2, 4, 4, 2], [3, 5, 3, 5], [6, 4, 6, 4]] {
        let allowed_f: Vec<i32> = (0..30)
            .filter(|two_f| {
                triangle_holds(two_a, two_d, *two_f) && triangle_holds(two_c, two_b, *two_f)
            })
            .collect();
        assert!(!allowed_f.is_empty());

        for &two_f in &allowed_f {
            for &two_f_prime in &allowed_f {
                let mut accumulated = 0.0;
                for two_x in 0..30 {
                    accumulated += f64::from(two_x + 1)
                        * f64::from(two_f + 1)
                        * six_j([two_a, two_b, two_x, two_c, two_d, two_f])
                        * six_j([two_a, two_b, two_x, two_c, two_d, two_f_prime]);
                }
                let expected = if two_f == two_f_prime { 1.0 } else { 0.0 };
                assert!(
                    (accumulated - expected).abs() < 1.0e-13,
                    "a={two_a} b={two_b} c={two_c} d={two_d} f={two_f} f'={two_f_prime} sum={accumulated:.15e}"
                );
            }
        }
    }
}

#[test]
fn nine_j_with_vanishing_corner_reduces_to_six_j() {
    let momenta = [0, 2, 4, 6];
    for two_a in momenta {
        for two_b in momenta {
            for two_c in momenta {
                for two_d in momenta {
                    for two_e in momenta {
                        for two_f in momenta {
                            let nine = wigner_9j(Wigner9jInput::new([
                                two_a, two_b, two_e, two_c, two_d, two_e, two_f, two_f, 0,
                            ]))
                            .expect("9j should compute");
                            let phase = if ((two_b + two_c + two_e + two_f) / 2) % 2 == 0 {
                                1.0
                            } else {
                                -1.0
                            };
                            let expected = phase
                                / f64::from((two_e + 1) * (two_f + 1)).sqrt()
                                * six_j([two_a, two_b, two_e, two_d, two_c, two_f]);

                            assert!(
                                (nine.val - expected).abs() <= nine.err.max(1.0e-15),
                                "a={two_a} b={two_b} c={two_c} d={two_d} e={two_e} f={two_f} nine={:.15e} expected={expected:.15e} err={:.3e}",
                                nine.val,
                                nine.err
                            );
                        }
                    }
                }
            }
        }
    }
}

#[test]
fn reported_errors_are_non_negative_and_zero_only_for_forbidden_symbols() {
    let allowed = wigner_3j(Wigner3jInput::new(8, 8, 16, 0, 0, 0)).expect("3j should compute");
    assert!(allowed.err > 0.0);
    assert!(allowed.err < 1.0e-11);

    let forbidden = wigner_3j(Wigner3jInput::new(8, 8, 18, 0, 0, 0)).expect("3j should compute");
    assert_eq!((forbidden.val, forbidden.err), (0.0, 0.0));

    let six = wigner_6j(Wigner6jInput::new(6, 4, 2, 4, 6, 4)).expect("6j should compute");
    assert!(six.err > 0.0);
    assert!(six.err < 1.0e-14);
}
