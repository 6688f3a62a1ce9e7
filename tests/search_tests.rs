// tests/search_tests.rs
//! Scenario-tests voor de volledige zoektocht: kleine instanties met bekend
//! optimum, foutieve invoer, validatie en de batch-laag.

extern crate skcp;
use approx::assert_relative_eq;
use rand::{rngs::StdRng, SeedableRng};
use skcp::batch::{execute, run_trials, BatchError, RunSpec};
use skcp::construct::greedy;
use skcp::{check_solution, run, search, CheckError, Instance, InstanceError, Params, Solution};
use std::path::PathBuf;

fn triangle() -> Instance {
    Instance::parse("3 3\n1 1 1\n2 1 2\n2 2 3\n2 1 3\n".as_bytes()).unwrap()
}

fn single_row_five_columns() -> Instance {
    Instance::parse("1 5\n5 1 3 2 4\n5 1 2 3 4 5\n".as_bytes()).unwrap()
}

/// Deterministische, middelgrote instantie: rij `r` wordt gedekt door vier kolommen.
fn lattice(rows: usize, cols: usize) -> Instance {
    let weights: Vec<i64> = (0..cols).map(|c| 1 + (c as i64 * 7) % 5).collect();
    let covers: Vec<Vec<i64>> = (0..rows)
        .map(|r| {
            let mut ids: Vec<i64> = [r, r + 3, r * 5 + 1, r * 11 + 2]
                .iter()
                .map(|&x| (x % cols) as i64 + 1)
                .collect();
            ids.sort_unstable();
            ids.dedup();
            ids
        })
        .collect();
    Instance::from_rows(cols, &weights, &covers).unwrap()
}

#[test]
fn triangle_optimum_is_two() {
    let inst = triangle();
    assert_relative_eq!(inst.density(), 6.0 / 9.0, epsilon = 1e-12);
    for c in 0..3 {
        let mut alone = Solution::new(&inst, 1);
        alone.add_column(c);
        assert!(!alone.is_feasible());
    }
    for seed in 0..5 {
        let sol = run(&inst, 1, 200, &mut StdRng::seed_from_u64(seed));
        assert!(sol.is_feasible());
        assert_eq!(sol.total_weight(), 2);
        assert_eq!(check_solution(&inst, &sol), Ok(()));
    }
}

#[test]
fn single_row_k2_picks_two_lightest() {
    let inst = single_row_five_columns();
    let sol = run(&inst, 2, 100, &mut StdRng::seed_from_u64(3));
    assert_eq!(sol.total_weight(), 3);
    assert_eq!(sol.chosen_columns(), vec![2, 4]);
}

#[test]
fn malformed_column_ids_fail_to_load() {
    let zero = Instance::parse("2 2\n1 1\n1 0\n1 2\n".as_bytes());
    assert!(matches!(zero, Err(InstanceError::ColumnOutOfRange { row: 1, column: 0, .. })));

    let too_big = Instance::parse("2 2\n1 1\n1 1\n1 3\n".as_bytes());
    assert!(matches!(too_big, Err(InstanceError::ColumnOutOfRange { row: 2, column: 3, .. })));

    let bad_token = Instance::parse("2 2\n1 x\n".as_bytes());
    assert!(matches!(bad_token, Err(InstanceError::InvalidToken { .. })));

    let bad_weight = Instance::parse("1 2\n1 0\n1 1\n".as_bytes());
    assert!(matches!(bad_weight, Err(InstanceError::NonPositiveWeight { column: 2, .. })));

    let empty_row = Instance::parse("2 2\n1 1\n1 1\n0\n".as_bytes());
    assert!(matches!(empty_row, Err(InstanceError::UncoveredRow { row: 2 })));
}

#[test]
fn same_seed_same_result() {
    let inst = lattice(40, 25);
    let p = Params::default().with_max_iter(500);
    let a = search(&inst, 2, &p, &mut StdRng::seed_from_u64(9));
    let b = search(&inst, 2, &p, &mut StdRng::seed_from_u64(9));
    assert_eq!(a.best_weight(), b.best_weight());
    assert_eq!(
        a.best.as_ref().map(Solution::chosen_columns),
        b.best.as_ref().map(Solution::chosen_columns)
    );
    assert_eq!(a.best_iteration, b.best_iteration);
}

#[test]
fn search_improves_on_or_matches_greedy() {
    let inst = lattice(60, 30);
    for k in 1..=3 {
        let greedy_weight = greedy(&inst, k, &mut StdRng::seed_from_u64(1)).total_weight();
        let p = Params::default().with_max_iter(1_000);
        let out = search(&inst, k, &p, &mut StdRng::seed_from_u64(1));
        let best = out.best.as_ref().expect("lattice admits a K-cover for K <= 3");
        assert_eq!(check_solution(&inst, best), Ok(()));
        assert!(best.total_weight() <= greedy_weight, "k={k}");
    }
}

#[test]
fn variants_stay_valid() {
    let inst = lattice(50, 20);
    let variants = [
        Params::default().with_p_greedy_remove(0.0),
        Params::default().with_skip_idle_columns(false),
        Params::default().with_cost_reset_factor(None),
        Params::default().with_cost_reset_factor(Some(0.001)),
    ];
    for (i, p) in variants.iter().enumerate() {
        let p = p.clone().with_max_iter(400);
        let out = search(&inst, 2, &p, &mut StdRng::seed_from_u64(i as u64));
        let best = out.best.expect("feasible");
        assert_eq!(check_solution(&inst, &best), Ok(()), "variant {i}");
    }
}

#[test]
fn nan_remove_probability_does_not_abort_search() {
    let inst = triangle();
    let mut p = Params::default().with_max_iter(100);
    p.p_greedy_remove = f64::NAN;
    let out = search(&inst, 1, &p, &mut StdRng::seed_from_u64(4));
    assert_eq!(out.best_weight(), Some(2));

    let built = Params::default().with_max_iter(100).with_p_greedy_remove(f64::NAN);
    let out = search(&inst, 1, &built, &mut StdRng::seed_from_u64(4));
    assert_eq!(out.best_weight(), Some(2));
}

#[test]
fn weight_mismatch_is_reported() {
    let light = triangle();
    let heavy = Instance::parse("3 3\n2 2 2\n2 1 2\n2 2 3\n2 1 3\n".as_bytes()).unwrap();
    let mut sol = Solution::new(&light, 1);
    sol.add_column(0);
    sol.add_column(1);
    assert_eq!(
        check_solution(&heavy, &sol),
        Err(CheckError::WeightMismatch { recorded: 2, recomputed: 4 })
    );
}

#[test]
fn trials_are_summarised() {
    let inst = triangle();
    let p = Params::default().with_max_iter(50).with_trials(3).with_seed(5);
    let summary = run_trials(&inst, 1, &p);
    assert_eq!(summary.weights, vec![Some(2), Some(2), Some(2)]);
    assert_eq!(summary.best, Some(2));
    let columns = summary.best_columns.expect("a valid trial keeps its columns");
    assert_eq!(columns.len(), 2);
    let mut check = Solution::new(&inst, 1);
    for &id in &columns {
        check.add_column(id - 1);
    }
    assert_eq!(check_solution(&inst, &check), Ok(()));
    assert_relative_eq!(summary.average, 2.0);
}

#[test]
fn unreachable_k_counts_as_failed_trial() {
    let inst = Instance::from_rows(2, &[1, 1], &[vec![1, 2], vec![1]]).unwrap();
    let p = Params::default().with_max_iter(20).with_trials(2);
    let summary = run_trials(&inst, 2, &p);
    assert_eq!(summary.weights, vec![None, None]);
    assert_eq!(summary.best, None);
    assert_eq!(summary.best_columns, None);
    assert_relative_eq!(summary.average, 0.0);
}

#[test]
fn missing_instance_file_is_a_batch_error() {
    let missing = RunSpec {
        instance: PathBuf::from("does/not/exist.txt"),
        k: 1,
        max_iter: 10,
    };
    let err = execute(&missing, &Params::default()).unwrap_err();
    assert!(matches!(err, BatchError::Instance { source: InstanceError::Io(_), .. }));
}
