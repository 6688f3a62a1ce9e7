//! src/check.rs
//!
//! Onafhankelijke controle van een oplossing: dekking en gewicht worden opnieuw
//! berekend uit alleen de lijst van gekozen kolommen, los van de gecachte tellers.

use crate::{instance::Instance, solution::Solution};
use thiserror::Error;

/// Reden waarom een oplossing de controle niet doorstaat.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CheckError {
    #[error("not a feasible solution: row {row} is covered {covered} times, K = {k}")]
    Infeasible { row: usize, covered: usize, k: usize },
    #[error("wrong total weight: recorded {recorded}, recomputed {recomputed}")]
    WeightMismatch { recorded: u64, recomputed: u64 },
}

/// Controleert haalbaarheid en totaalgewicht van `sol` tegen `inst`.
/// Rijnummers in de fout zijn 1-gebaseerd.
pub fn check_solution(inst: &Instance, sol: &Solution) -> Result<(), CheckError> {
    let mut cov = vec![0usize; inst.num_rows()];
    let mut weight = 0u64;

    for &c in sol.columns() {
        weight += inst.weight(c);
        for &r in inst.col_entries(c) {
            cov[r] += 1;
        }
    }

    if let Some((r, &covered)) = cov.iter().enumerate().find(|&(_, &n)| n < sol.k()) {
        return Err(CheckError::Infeasible { row: r + 1, covered, k: sol.k() });
    }

    if weight != sol.total_weight() {
        return Err(CheckError::WeightMismatch {
            recorded: sol.total_weight(),
            recomputed: weight,
        });
    }
    Ok(())
}

/// Booleaanse vorm van [`check_solution`].
pub fn is_valid(inst: &Instance, sol: &Solution) -> bool {
    check_solution(inst, sol).is_ok()
}
