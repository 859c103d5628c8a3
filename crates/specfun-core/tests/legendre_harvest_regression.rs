use serde::Deserialize;
use specfun_core::numerics::special::{
    LegendreArgument, legendre_array_size, legendre_pl, legendre_pl_array, legendre_plm,
    legendre_plm_array, legendre_sph_plm, legendre_sph_plm_array,
};
use std::fs;
use std::path::PathBuf;

fn workspace_root() -> PathBuf {
    std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .unwrap()
        .parent()
        .unwrap()
        .to_path_buf()
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LegendreHarvestFixtures {
    harvest_cases: Vec<HarvestCaseFixture>,
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
enum LegendreFamily {
    Pl,
    Plm,
    SphPlm,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct HarvestCaseFixture {
    id: String,
    family: LegendreFamily,
    l: i32,
    m: i32,
    x: f64,
    expected: Vec<f64>,
    abs_tol: f64,
    rel_tol: f64,
}

#[test]
fn harvest_buffers_match_high_precision_reference_vectors() {
    let fixtures = load_fixtures();
    for case in &fixtures.harvest_cases {
        let mut harvest = vec![0.0; legendre_array_size(case.l, case.m)];
        assert_eq!(harvest.len(), case.expected.len(), "{} length", case.id);

        let argument = LegendreArgument::from_x(case.x);
        let last = match case.family {
            LegendreFamily::Pl => legendre_pl_array(case.l, case.x, &mut harvest),
            LegendreFamily::Plm => legendre_plm_array(case.l, case.m, argument, &mut harvest),
            LegendreFamily::SphPlm => {
                legendre_sph_plm_array(case.l, case.m, argument, &mut harvest)
            }
        }
        .unwrap_or_else(|error| panic!("{} should compute: {}", case.id, error));

        for (index, (expected, actual)) in case.expected.iter().zip(&harvest).enumerate() {
            assert_scalar_close(
                &format!("{}[{}]", case.id, index),
                *expected,
                *actual,
                case.abs_tol,
                case.rel_tol,
            );
        }
        assert_eq!(harvest.last().copied(), Some(last), "{} final value", case.id);
    }
}

#[test]
fn scalar_entry_points_reproduce_every_harvested_degree() {
    let fixtures = load_fixtures();
    for case in &fixtures.harvest_cases {
        let argument = LegendreArgument::from_x(case.x);
        let first_degree = if case.family == LegendreFamily::Pl {
            0
        } else {
            case.m
        };

        for (offset, expected) in case.expected.iter().enumerate() {
            let degree = first_degree + offset as i32;
            let actual = match case.family {
                LegendreFamily::Pl => legendre_pl(degree, case.x),
                LegendreFamily::Plm => legendre_plm(degree, case.m, argument),
                LegendreFamily::SphPlm => legendre_sph_plm(degree, case.m, argument),
            }
            .unwrap_or_else(|error| panic!("{} degree {} should compute: {}", case.id, degree, error));

            assert_scalar_close(
                &format!("{}.l={}", case.id, degree),
                *expected,
                actual,
                case.abs_tol,
                case.rel_tol,
            );
        }
    }
}

fn load_fixtures() -> LegendreHarvestFixtures {
    let fixture_path = workspace_root().join("tasks/legendre-harvest-fixtures.json");
    let source = fs::read_to_string(&fixture_path).unwrap_or_else(|error| {
        panic!(
            "fixture file {} should be readable: {}",
            fixture_path.display(),
            error
        )
    });

    serde_json::from_str(&source).unwrap_or_else(|error| {
        panic!(
            "fixture file {} should parse as JSON: {}",
            fixture_path.display(),
            error
        )
    })
}

fn assert_scalar_close(label: &str, expected: f64, actual: f64, abs_tol: f64, rel_tol: f64) {
    let abs_diff = (actual - expected).abs();
    let rel_diff = abs_diff / expected.abs().max(1.0);
    assert!(
        abs_diff <= abs_tol || rel_diff <= rel_tol,
        "{} expected={:.15e} actual={:.15e} abs_diff={:.15e} rel_diff={:.15e} abs_tol={:.15e} rel_tol={:.15e}",
        label,
        expected,
        actual,
        abs_diff,
        rel_diff,
        abs_tol,
        rel_tol,
    );
}
