//! src/select.rs
//!
//! Selectieregels van de lokale zoektocht: welke kolom wordt toegevoegd tijdens
//! het repareren en welke kolom wordt verwijderd aan het begin van een iteratie.
//! Verhoudingen `score / gewicht` worden exact vergeleken via kruisvermenigvuldiging.

use std::cmp::Ordering;

use crate::{params::Params, score::Scoring, solution::Solution, tabu::ConfigChecker};
use rand::Rng;

/// Vergelijkt `sa / wa` met `sb / wb` zonder floating point (gewichten zijn positief).
#[inline]
pub fn cmp_ratio(sa: i64, wa: u64, sb: i64, wb: u64) -> Ordering {
    (sa as i128 * wb as i128).cmp(&(sb as i128 * wa as i128))
}

/// ADD-regel: de niet-gekozen, toegestane kolom met positieve score en de hoogste
/// `score / gewicht`. Bij gelijkspel wint de kolom die het langst niet is aangeraakt,
/// daarna de laagste index. `None` als geen kolom in aanmerking komt.
pub fn add_rule(sol: &Solution, scoring: &Scoring, cc: &ConfigChecker) -> Option<usize> {
    let inst = sol.instance();
    let mut best: Option<usize> = None;

    for c in 0..inst.num_columns() {
        if sol.contains(c) || !cc.is_eligible(c) {
            continue;
        }
        let s = scoring.score(c);
        if s <= 0 {
            continue;
        }
        best = match best {
            None => Some(c),
            Some(b) => match cmp_ratio(s, inst.weight(c), scoring.score(b), inst.weight(b)) {
                Ordering::Greater => Some(c),
                Ordering::Equal if cc.last_touched(c) < cc.last_touched(b) => Some(c),
                _ => Some(b),
            },
        };
    }
    best
}

/// REMOVE-regel. Met kans `p.p_greedy_remove` de score-gestuurde keuze, anders
/// (of als de score-gestuurde tak geen kandidaat overhoudt) de diversificatietak.
///
/// `iter` is de huidige iteratie; kolommen die in `iter - 1` zijn omgeschakeld
/// worden dan door de score-gestuurde tak overgeslagen. `None` schakelt dat venster uit.
pub fn remove_rule<R>(
    sol: &Solution,
    scoring: &Scoring,
    cc: &ConfigChecker,
    iter: Option<usize>,
    p: &Params,
    rng: &mut R,
) -> Option<usize>
where
    R: Rng + ?Sized,
{
    if sol.is_empty() {
        return None;
    }
    if rng.gen_bool(p.greedy_remove_probability()) {
        if let Some(c) = greedy_remove(sol, scoring, cc, iter, p.skip_idle_columns) {
            return Some(c);
        }
    }
    oldest_remove(sol, cc)
}

/// Score-gestuurde tak: hoogste `score / gewicht` onder de gekozen kolommen,
/// tie-break op oudste `last_touched`, daarna laagste index.
fn greedy_remove(
    sol: &Solution,
    scoring: &Scoring,
    cc: &ConfigChecker,
    iter: Option<usize>,
    skip_idle: bool,
) -> Option<usize> {
    let inst = sol.instance();
    let k = sol.k();
    let mut best: Option<usize> = None;

    for &c in sol.columns() {
        if let Some(it) = iter {
            if cc.touched_just_before(c, it) {
                continue;
            }
        }
        let s = scoring.score(c);
        // Score 0 maar nog nodig: de kolom dekt een rij die nog niet voldaan is.
        if skip_idle && s == 0 && inst.col_entries(c).iter().any(|&r| sol.covered(r) < k) {
            continue;
        }
        best = match best {
            None => Some(c),
            Some(b) => {
                let ord = cmp_ratio(s, inst.weight(c), scoring.score(b), inst.weight(b))
                    .then_with(|| cc.last_touched(b).cmp(&cc.last_touched(c)))
                    .then_with(|| b.cmp(&c));
                if ord == Ordering::Greater {
                    Some(c)
                } else {
                    Some(b)
                }
            }
        };
    }
    best
}

/// Diversificatietak: de gekozen kolom die het langst niet is aangeraakt,
/// tie-break op grootste gewicht, daarna laagste index. Negeert de score.
fn oldest_remove(sol: &Solution, cc: &ConfigChecker) -> Option<usize> {
    let inst = sol.instance();
    sol.columns().iter().copied().min_by(|&a, &b| {
        cc.last_touched(a)
            .cmp(&cc.last_touched(b))
            .then_with(|| inst.weight(b).cmp(&inst.weight(a)))
            .then_with(|| a.cmp(&b))
    })
}
