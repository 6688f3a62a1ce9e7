//! src/search.rs
//!
//! De zoekdriver voor één trial: greedy constructie, daarna de lus van
//! verwijderen en repareren met configuration checking, penalty-escalatie en
//! pruning op het gewicht van de beste gevonden oplossing.
//!
//! Elke trial bezit haar eigen `Solution`, `Scoring` en `ConfigChecker`; er is
//! geen gedeelde toestand tussen trials.
use crate::{
    construct::greedy,
    instance::Instance,
    params::Params,
    score::Scoring,
    select::{add_rule, remove_rule},
    solution::Solution,
    tabu::ConfigChecker,
};
use rand::Rng;
use tracing::{debug, trace};

/// Resultaat van één trial.
#[derive(Clone, Debug)]
pub struct SearchOutcome<'i> {
    /// Beste haalbare oplossing, `None` als er nooit een gevonden is.
    pub best: Option<Solution<'i>>,
    /// Huidige oplossing op het moment dat het budget op was.
    pub last: Solution<'i>,
    /// Iteratie waarin `best` voor het laatst verbeterde (`None` = de constructie zelf).
    pub best_iteration: Option<usize>,
    /// Aantal uitgevoerde iteraties.
    pub iterations: usize,
    /// Aantal kolommen dat tijdens het repareren is toegevoegd.
    pub repairs: usize,
    /// Aantal rijen waarvan de kosten zijn gereset.
    pub cost_resets: usize,
}

impl<'i> SearchOutcome<'i> {
    /// Gewicht van de beste oplossing, of `None`.
    pub fn best_weight(&self) -> Option<u64> {
        self.best.as_ref().map(Solution::total_weight)
    }

    /// De beste oplossing, of de laatste als er nooit een haalbare oplossing was.
    pub fn into_solution(self) -> Solution<'i> {
        self.best.unwrap_or(self.last)
    }
}

/// Zoekt een K-cover met minimaal gewicht met `max_iter` iteraties en standaardparameters.
pub fn run<'i, R>(inst: &'i Instance, k: usize, max_iter: usize, rng: &mut R) -> Solution<'i>
where
    R: Rng + ?Sized,
{
    let p = Params::default().with_max_iter(max_iter);
    search(inst, k, &p, rng).into_solution()
}

/// Voert één volledige trial uit met de gegeven parameters.
pub fn search<'i, R>(inst: &'i Instance, k: usize, p: &Params, rng: &mut R) -> SearchOutcome<'i>
where
    R: Rng + ?Sized,
{
    // 1. CONSTRUCTIE
    let mut cur = greedy(inst, k, rng);
    let mut scoring = Scoring::new(inst.num_columns(), inst.num_rows());
    scoring.rebuild(&cur);
    let mut cc = ConfigChecker::new(inst.num_columns());

    let mut best = cur.is_feasible().then(|| cur.clone());
    let mut best_iteration = None;
    let mut repairs = 0usize;
    let mut cost_resets = 0usize;
    let reset_threshold = p.cost_reset_threshold();

    debug!(
        k,
        columns = cur.len(),
        weight = cur.total_weight(),
        feasible = cur.is_feasible(),
        "greedy construction finished"
    );

    // 2. ITERATIES
    for iter in 0..p.max_iter {
        if cur.is_feasible() {
            // 2a. Haalbaar: bewaar als verbetering, en de-optimaliseer om verder te zoeken.
            if improves(&cur, best.as_ref()) {
                debug!(iter, weight = cur.total_weight(), "new best solution");
                best = Some(cur.clone());
                best_iteration = Some(iter);
            }
            if let Some(c) = remove_rule(&cur, &scoring, &cc, None, p, rng) {
                remove(&mut cur, &mut scoring, &mut cc, c, iter);
            }
            continue;
        }

        // 2b. Niet haalbaar: verwijder één kolom en repareer.
        if let Some(c) = remove_rule(&cur, &scoring, &cc, Some(iter), p, rng) {
            remove(&mut cur, &mut scoring, &mut cc, c, iter);
        }

        let limit = best.as_ref().map_or(u64::MAX, Solution::total_weight);
        let step = repair(&mut cur, &mut scoring, &mut cc, iter, limit, reset_threshold);
        repairs += step.added;
        if step.resets > 0 {
            trace!(iter, resets = step.resets, "row costs reset");
            cost_resets += step.resets;
        }
    }

    // 3. Een haalbare eindtoestand telt ook mee.
    if cur.is_feasible() && improves(&cur, best.as_ref()) {
        best = Some(cur.clone());
        best_iteration = Some(p.max_iter);
    }

    SearchOutcome {
        best,
        last: cur,
        best_iteration,
        iterations: p.max_iter,
        repairs,
        cost_resets,
    }
}

/// Wat één reparatie heeft gedaan.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct RepairStep {
    pub added: usize,
    pub resets: usize,
}

/// Voegt kolommen toe volgens de add-regel tot de oplossing haalbaar is, er geen
/// kandidaat meer is, of een toevoeging het gewicht op of boven `limit` zou brengen.
/// Na elke toevoeging escaleren de kosten van nog onder-gedekte rijen en worden de
/// voldane rijen van de toegevoegde kolom tegen `reset_threshold` gereset.
pub(crate) fn repair(
    cur: &mut Solution,
    scoring: &mut Scoring,
    cc: &mut ConfigChecker,
    iter: usize,
    limit: u64,
    reset_threshold: Option<i64>,
) -> RepairStep {
    let inst = cur.instance();
    let mut step = RepairStep::default();

    while !cur.is_feasible() {
        let Some(c) = add_rule(cur, scoring, cc) else {
            break;
        };
        // Pruning: een reparatie die het record niet kan verbeteren heeft geen zin.
        if cur.total_weight() + inst.weight(c) >= limit {
            break;
        }
        cur.add_column(c);
        scoring.on_add(cur, c);
        cc.on_add(inst, c, iter);
        step.added += 1;

        scoring.escalate(cur);
        if let Some(threshold) = reset_threshold {
            step.resets += scoring.relax(cur, inst.col_entries(c), threshold);
        }
    }
    step
}

fn improves(cur: &Solution, best: Option<&Solution>) -> bool {
    best.map_or(true, |b| cur.total_weight() < b.total_weight())
}

fn remove(cur: &mut Solution, scoring: &mut Scoring, cc: &mut ConfigChecker, c: usize, iter: usize) {
    cur.remove_column(c);
    scoring.on_remove(cur, c);
    cc.on_remove(cur.instance(), c, iter);
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn incumbent_never_gets_heavier() {
        let inst = Instance::from_rows(
            6,
            &[3, 2, 4, 1, 5, 2],
            &[
                vec![1, 2, 4],
                vec![2, 3, 6],
                vec![1, 5, 6],
                vec![3, 4, 5],
                vec![2, 4, 6],
            ],
        )
        .unwrap();
        let p = Params::default().with_max_iter(300);
        let mut rng = StdRng::seed_from_u64(11);
        let greedy_weight = greedy(&inst, 2, &mut StdRng::seed_from_u64(11)).total_weight();
        let out = search(&inst, 2, &p, &mut rng);
        let best = out.best.expect("instance is feasible for K=2");
        assert!(best.is_feasible());
        assert!(best.total_weight() <= greedy_weight);
        assert_eq!(out.iterations, 300);
    }

    /// Twee rijen, elk door precies één kolom gedekt.
    fn two_singletons() -> Instance {
        Instance::from_rows(2, &[1, 1], &[vec![1], vec![2]]).unwrap()
    }

    #[test]
    fn repair_resets_costs_of_rows_it_satisfies() {
        let inst = two_singletons();
        let mut cur = Solution::new(&inst, 1);
        let mut scoring = Scoring::new(2, 2);
        scoring.rebuild(&cur);
        scoring.escalate(&cur);
        scoring.escalate(&cur);
        assert_eq!(scoring.cost(0), 3);
        let mut cc = ConfigChecker::new(2);

        let step = repair(&mut cur, &mut scoring, &mut cc, 0, u64::MAX, Some(1));
        assert!(cur.is_feasible());
        assert_eq!(step, RepairStep { added: 2, resets: 2 });
        assert_eq!((scoring.cost(0), scoring.cost(1)), (1, 1));
        assert_eq!(scoring.first_inconsistency(&cur), None);
    }

    #[test]
    fn repair_without_reset_keeps_costs() {
        let inst = two_singletons();
        let mut cur = Solution::new(&inst, 1);
        let mut scoring = Scoring::new(2, 2);
        scoring.rebuild(&cur);
        scoring.escalate(&cur);
        let mut cc = ConfigChecker::new(2);

        let step = repair(&mut cur, &mut scoring, &mut cc, 0, u64::MAX, None);
        assert_eq!(step, RepairStep { added: 2, resets: 0 });
        assert_eq!(scoring.cost(0), 2);
        // Rij 1 bleef na de eerste toevoeging onder-gedekt en escaleerde nog eens.
        assert_eq!(scoring.cost(1), 3);
    }

    #[test]
    fn repair_stops_before_reaching_incumbent_weight() {
        let inst = two_singletons();
        let mut cur = Solution::new(&inst, 1);
        let mut scoring = Scoring::new(2, 2);
        scoring.rebuild(&cur);
        let mut cc = ConfigChecker::new(2);

        // Een record met gewicht 2: de tweede kolom zou het gewicht op 2 brengen.
        let step = repair(&mut cur, &mut scoring, &mut cc, 0, 2, None);
        assert_eq!(step.added, 1);
        assert!(!cur.is_feasible());
        assert_eq!(cur.total_weight(), 1);
        assert!(cur.total_weight() < 2);
    }

    #[test]
    fn small_reset_factor_triggers_resets() {
        // K=2 is onhaalbaar voor rij 2; rij 1 wordt herhaaldelijk gerepareerd na escalatie.
        let inst = Instance::from_rows(2, &[1, 1], &[vec![1, 2], vec![1]]).unwrap();
        let p = Params::default().with_max_iter(50).with_cost_reset_factor(Some(0.001));
        let out = search(&inst, 2, &p, &mut StdRng::seed_from_u64(0));
        assert!(out.best.is_none());
        assert!(out.repairs > 0);
        assert!(out.cost_resets > 0);

        let off = Params::default().with_max_iter(50).with_cost_reset_factor(None);
        let out = search(&inst, 2, &off, &mut StdRng::seed_from_u64(0));
        assert_eq!(out.cost_resets, 0);
    }

    #[test]
    fn infeasible_k_yields_no_best() {
        let inst = Instance::from_rows(2, &[1, 1], &[vec![1, 2], vec![1]]).unwrap();
        let p = Params::default().with_max_iter(50);
        let out = search(&inst, 2, &p, &mut StdRng::seed_from_u64(0));
        assert!(out.best.is_none());
        assert!(!out.into_solution().is_feasible());
    }
}
