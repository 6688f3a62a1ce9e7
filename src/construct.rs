//! src/construct.rs
//!
//! Greedy constructie van een initiële K-cover. Geen configuration checking en
//! geen penalties: alleen de verhouding tussen het aantal nog onder-gedekte rijen
//! dat een kolom dekt en haar gewicht.
use std::cmp::Ordering;

use crate::{instance::Instance, select::cmp_ratio, solution::Solution};
use rand::seq::SliceRandom;
use rand::Rng;

/// Creëert een initiële oplossing met de greedy heuristiek.
/// 1. `gain[c]` = aantal rijen van `c` dat nog minder dan `K` keer gedekt is.
/// 2. Voeg iteratief de niet-gekozen kolom met de hoogste `gain / gewicht` toe.
///    Bij een gelijke stand wordt een willekeurige kandidaat gekozen.
/// 3. Stop zodra de oplossing haalbaar is.
///
/// Als geen enkele kolom nog winst oplevert (K groter dan de graad van een rij)
/// stopt de constructie met een niet-haalbare oplossing.
pub fn greedy<'i, R>(inst: &'i Instance, k: usize, rng: &mut R) -> Solution<'i>
where
    R: Rng + ?Sized,
{
    let mut sol = Solution::new(inst, k);
    let mut gain: Vec<i64> = (0..inst.num_columns())
        .map(|c| inst.col_entries(c).len() as i64)
        .collect();
    let mut candidates = Vec::new();

    while !sol.is_feasible() {
        candidates.clear();
        let mut best: Option<usize> = None;

        for c in 0..inst.num_columns() {
            if sol.contains(c) || gain[c] <= 0 {
                continue;
            }
            let ord = match best {
                None => Ordering::Greater,
                Some(b) => cmp_ratio(gain[c], inst.weight(c), gain[b], inst.weight(b)),
            };
            match ord {
                Ordering::Greater => {
                    best = Some(c);
                    candidates.clear();
                    candidates.push(c);
                }
                Ordering::Equal => candidates.push(c),
                Ordering::Less => {}
            }
        }

        // Kies willekeurig uit de beste kandidaten (tie-breaking).
        let Some(&chosen) = candidates.choose(rng) else {
            // Geen enkele kolom helpt nog: deze K is voor deze instantie onhaalbaar.
            break;
        };
        sol.add_column(chosen);
        gain[chosen] = 0;

        for &r in inst.col_entries(chosen) {
            if sol.covered(r) == k {
                for &rc in inst.row_covers(r) {
                    if rc != chosen && !sol.contains(rc) {
                        gain[rc] -= 1;
                    }
                }
            }
        }
    }
    sol
}
