//! src/score.rs
//!
//! Incrementele score- en kostenadministratie voor de lokale zoektocht.
//!
//! Voor elke kolom `c` geldt na elke mutatie de invariant
//!
//! ```text
//! score[c] = Σ_{r ∈ col_entries[c]}  +cost[r]  als c niet gekozen en covered[r] <  K
//!                                   −cost[r]  als c gekozen     en covered[r] == K
//!                                    0         anders
//! ```
//!
//! `on_add` en `on_remove` raken alleen de rijen van de omgeschakelde kolom en de
//! kolommen die die rijen dekken. `reference_score` berekent de waarde vanaf nul
//! en is bedoeld voor tests en voor het lokaal herstellen na een kostenreset.

use crate::solution::Solution;

/// Score per kolom en kosten (penalty-gewicht) per rij, eigendom van één trial.
#[derive(Clone, Debug)]
pub struct Scoring {
    score: Vec<i64>,
    cost: Vec<i64>,
}

impl Scoring {
    /// Nieuwe administratie: alle kosten 1, alle scores 0. Roep daarna `rebuild` aan.
    pub fn new(num_columns: usize, num_rows: usize) -> Self {
        Self {
            score: vec![0; num_columns],
            cost: vec![1; num_rows],
        }
    }

    /// Berekent alle scores opnieuw voor de gegeven oplossing. Alleen voor initialisatie.
    pub fn rebuild(&mut self, sol: &Solution) {
        for c in 0..self.score.len() {
            self.score[c] = self.reference_score(sol, c);
        }
    }

    #[inline]
    pub fn score(&self, c: usize) -> i64 {
        self.score[c]
    }

    #[inline]
    pub fn cost(&self, r: usize) -> i64 {
        self.cost[r]
    }

    /// Score van kolom `c` volgens de definitie, vanaf nul berekend.
    pub fn reference_score(&self, sol: &Solution, c: usize) -> i64 {
        let k = sol.k();
        let selected = sol.contains(c);
        sol.instance()
            .col_entries(c)
            .iter()
            .map(|&r| {
                let cov = sol.covered(r);
                if selected && cov == k {
                    -self.cost[r]
                } else if !selected && cov < k {
                    self.cost[r]
                } else {
                    0
                }
            })
            .sum()
    }

    /// Werkt de scores bij nadat kolom `c` is toegevoegd (`sol` bevat `c` al).
    pub fn on_add(&mut self, sol: &Solution, c: usize) {
        let inst = sol.instance();
        let k = sol.k();
        self.score[c] = self.reference_score(sol, c);

        for &r in inst.col_entries(c) {
            let cov = sol.covered(r);
            let cost = self.cost[r];
            if cov == k {
                // Rij net voldaan: toevoegen levert niets meer op, verwijderen breekt haar.
                for &rc in inst.row_covers(r) {
                    if rc != c {
                        self.score[rc] -= cost;
                    }
                }
            } else if cov == k + 1 {
                // Rij overgedekt: de andere gekozen kolommen zijn niet langer kritiek.
                for &rc in inst.row_covers(r) {
                    if rc != c && sol.contains(rc) {
                        self.score[rc] += cost;
                    }
                }
            }
        }
    }

    /// Werkt de scores bij nadat kolom `c` is verwijderd (`sol` bevat `c` niet meer).
    pub fn on_remove(&mut self, sol: &Solution, c: usize) {
        let inst = sol.instance();
        let k = sol.k();
        self.score[c] = self.reference_score(sol, c);

        for &r in inst.col_entries(c) {
            let cov = sol.covered(r);
            let cost = self.cost[r];
            if cov + 1 == k {
                // Rij niet meer voldaan: winst voor niet-gekozen kolommen,
                // en de gekozen kolommen zijn er niet langer kritiek voor.
                for &rc in inst.row_covers(r) {
                    if rc != c {
                        self.score[rc] += cost;
                    }
                }
            } else if cov == k {
                // Rij precies op K: elke andere gekozen kolom is nu kritiek.
                for &rc in inst.row_covers(r) {
                    if rc != c && sol.contains(rc) {
                        self.score[rc] -= cost;
                    }
                }
            }
        }
    }

    /// Penalty-escalatie: verhoogt de kosten van elke onder-gedekte rij met 1,
    /// en de score van elke niet-gekozen kolom die zo'n rij dekt.
    pub fn escalate(&mut self, sol: &Solution) {
        let inst = sol.instance();
        for &r in sol.under_covered() {
            self.cost[r] += 1;
            for &rc in inst.row_covers(r) {
                if !sol.contains(rc) {
                    self.score[rc] += 1;
                }
            }
        }
    }

    /// Penalty-reset: elke rij uit `rows` die voldaan is en waarvan de kosten boven
    /// `threshold` liggen krijgt weer kosten 1; de scores van haar kolommen worden
    /// lokaal herberekend. Geeft het aantal gereset rijen terug.
    pub fn relax(&mut self, sol: &Solution, rows: &[usize], threshold: i64) -> usize {
        let inst = sol.instance();
        let mut resets = 0;
        for &r in rows {
            if sol.covered(r) < sol.k() || self.cost[r] <= threshold {
                continue;
            }
            self.cost[r] = 1;
            for &rc in inst.row_covers(r) {
                self.score[rc] = self.reference_score(sol, rc);
            }
            resets += 1;
        }
        resets
    }

    /// Eerste kolom waarvan de score afwijkt van de referentiewaarde, met (score, referentie).
    pub fn first_inconsistency(&self, sol: &Solution) -> Option<(usize, i64, i64)> {
        (0..self.score.len()).find_map(|c| {
            let reference = self.reference_score(sol, c);
            (reference != self.score[c]).then_some((c, self.score[c], reference))
        })
    }
}
