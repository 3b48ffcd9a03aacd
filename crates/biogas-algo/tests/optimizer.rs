//! Production optimizer tests

use biogas_algo::{
    biogas_production, maximize_production, maximize_production_table, ProductionProblem,
};
use biogas_core::{
    BiogasError, CompositionTable, Density, ParameterSet, Substrate, SubstrateKey,
    SubstrateVector, Table,
};

fn straw() -> SubstrateKey {
    SubstrateKey::new(Density::Cropland, Substrate::Straw)
}

fn single(value: f64) -> CompositionTable {
    [(Density::Cropland, [(Substrate::Straw, value)].into_iter().collect())]
        .into_iter()
        .collect()
}

/// One substrate whose composition satisfies every blending limit.
fn single_substrate_params() -> ParameterSet {
    ParameterSet {
        biogas_yields: single(200.0),
        dm_fracs: single(0.85),
        vs_fracs: single(0.9),
        c_fracs: single(0.5),
        n_fracs: single(0.01),
        d_min: 0.0,
        d_max: 1.0,
        cn_min: 0.0,
        cn_max: 1000.0,
        p_min: 0.0,
        ..ParameterSet::default()
    }
}

fn point(amount: f64) -> SubstrateVector {
    [(straw(), amount)].into_iter().collect()
}

#[test]
fn single_substrate_uses_everything_available() {
    let params = single_substrate_params();
    let usage = maximize_production(&point(10.0), &params).unwrap();
    let used = usage[&straw()];
    assert!((used - 10.0).abs() < 1e-4, "expected 10, got {used}");
}

#[test]
fn infeasible_blend_yields_zero_usage() {
    // Straw is far too dry for the DM ceiling, yet a plant needs some output.
    let params = ParameterSet {
        d_max: 0.1,
        p_min: 1.0,
        ..single_substrate_params()
    };
    let usage = maximize_production(&point(10.0), &params).unwrap();
    assert_eq!(usage[&straw()], 0.0);
}

#[test]
fn plant_size_limit_excludes_small_points() {
    let params = ParameterSet {
        p_min: 1e6,
        ..single_substrate_params()
    };
    let usage = maximize_production(&point(10.0), &params).unwrap();
    assert_eq!(usage[&straw()], 0.0);
}

#[test]
fn point_missing_a_substrate_is_misaligned() {
    let params = ParameterSet::default();
    assert!(matches!(
        maximize_production(&point(10.0), &params),
        Err(BiogasError::MisalignedIndex { .. })
    ));
}

#[test]
fn constrained_production_never_exceeds_theoretical() {
    let params = ParameterSet::default();
    let available: SubstrateVector = params
        .index()
        .keys()
        .iter()
        .enumerate()
        .map(|(i, key)| (*key, 5_000.0 + 1_000.0 * i as f64))
        .collect();

    let usage = maximize_production(&available, &params).unwrap();
    let constrained = biogas_production(&usage, &params).unwrap();
    let theoretical = biogas_production(&available, &params).unwrap();
    assert!(constrained <= theoretical + 1e-9);
    for (key, used) in &usage {
        assert!(*used >= 0.0 && *used <= available[key]);
    }
}

#[test]
fn table_rows_are_solved_independently() {
    let params = single_substrate_params();
    let table: Table<&str, SubstrateKey> =
        [("a", straw(), 10.0), ("b", straw(), 0.0), ("c", straw(), 3.0)]
            .into_iter()
            .collect();
    let solved = maximize_production_table(&table, &params).unwrap();
    assert_eq!(solved.len(), 3);
    assert!((solved.get(&"a", &straw()).unwrap() - 10.0).abs() < 1e-4);
    assert!(solved.get(&"b", &straw()).unwrap().abs() < 1e-6);
    assert!((solved.get(&"c", &straw()).unwrap() - 3.0).abs() < 1e-4);
}

#[test]
fn unconstrained_production_is_a_dot_product() {
    let params = single_substrate_params();
    assert_eq!(biogas_production(&point(3.0), &params).unwrap(), 600.0);
}

#[test]
fn unlimited_availability_is_unbounded() {
    let problem = ProductionProblem::new(&single_substrate_params()).unwrap();
    assert!(matches!(
        problem.solve(&[f64::INFINITY]),
        Err(BiogasError::SolverUnexpectedStatus(_))
    ));
}

#[test]
fn negative_or_nan_availability_is_rejected() {
    let params = single_substrate_params();
    assert!(matches!(
        maximize_production(&point(-1.0), &params),
        Err(BiogasError::Validation(_))
    ));
    assert!(matches!(
        maximize_production(&point(f64::NAN), &params),
        Err(BiogasError::Validation(_))
    ));
}
