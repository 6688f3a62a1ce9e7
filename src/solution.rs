//! src/solution.rs
//!
//! Representeert een kandidaat-oplossing: een deelverzameling gekozen kolommen
//! met gecachte waarden voor het totale gewicht, de dekking per rij en het
//! aantal rijen dat minstens `K` keer gedekt is. Toevoegen en verwijderen kosten
//! O(|col_entries[c]|), wat de incrementele score-updates betaalbaar maakt.

use crate::instance::Instance;
use bitvec::prelude::*;

/// Markering voor een rij of kolom die niet in de bijbehorende lijst zit.
const ABSENT: usize = usize::MAX;

/// Een veranderlijke K-cover kandidaat, gebonden aan een specifieke `Instance` en `K`.
#[derive(Clone, Debug)]
pub struct Solution<'i> {
    instance: &'i Instance,
    k: usize,
    /// Gekozen kolommen, zonder vaste volgorde.
    chosen: Vec<usize>,
    /// `member[c]` is 1 als kolom `c` gekozen is.
    member: BitVec,
    /// Positie van kolom `c` in `chosen` (alleen geldig als `member[c]`).
    chosen_pos: Vec<usize>,
    /// `covered[r]`: aantal gekozen kolommen dat rij `r` dekt.
    covered: Vec<usize>,
    satisfied: usize,
    total_weight: u64,
    /// Rijen met `covered[r] < K`, zonder vaste volgorde.
    under: Vec<usize>,
    /// Positie van rij `r` in `under`, of `ABSENT`.
    under_pos: Vec<usize>,
}

impl<'i> Solution<'i> {
    /*────────── Constructors ──────────*/

    /// Creëert een nieuwe, lege oplossing voor de gegeven instantie en dekkingseis `k`.
    pub fn new(instance: &'i Instance, k: usize) -> Self {
        assert!(k > 0, "K moet minstens 1 zijn");
        let n_rows = instance.num_rows();
        Self {
            instance,
            k,
            chosen: Vec::new(),
            member: bitvec![0; instance.num_columns()],
            chosen_pos: vec![ABSENT; instance.num_columns()],
            covered: vec![0; n_rows],
            satisfied: 0,
            total_weight: 0,
            under: (0..n_rows).collect(),
            under_pos: (0..n_rows).collect(),
        }
    }

    /// Zet de oplossing terug naar de lege oplossing.
    pub fn initialize(&mut self) {
        self.chosen.clear();
        self.member.fill(false);
        self.chosen_pos.fill(ABSENT);
        self.covered.fill(0);
        self.satisfied = 0;
        self.total_weight = 0;
        self.under.clear();
        self.under.extend(0..self.instance.num_rows());
        for (r, pos) in self.under_pos.iter_mut().enumerate() {
            *pos = r;
        }
    }

    /*────────── Queries ──────────*/

    #[inline]
    pub fn instance(&self) -> &'i Instance {
        self.instance
    }

    #[inline]
    pub fn k(&self) -> usize {
        self.k
    }

    /// Aantal gekozen kolommen.
    #[inline]
    pub fn len(&self) -> usize {
        self.chosen.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.chosen.is_empty()
    }

    #[inline]
    pub fn total_weight(&self) -> u64 {
        self.total_weight
    }

    /// Aantal rijen dat minstens `K` keer gedekt is.
    #[inline]
    pub fn satisfied_rows(&self) -> usize {
        self.satisfied
    }

    #[inline]
    pub fn is_feasible(&self) -> bool {
        self.satisfied == self.instance.num_rows()
    }

    #[inline]
    pub fn contains(&self, c: usize) -> bool {
        self.member[c]
    }

    /// Dekking van rij `r` door de huidige keuze.
    #[inline]
    pub fn covered(&self, r: usize) -> usize {
        self.covered[r]
    }

    /// Gekozen kolommen (0-gebaseerd). Volgorde is stabiel tussen mutaties, maar
    /// verwijderen verplaatst de laatste kolom naar de vrijgekomen plek.
    #[inline]
    pub fn columns(&self) -> &[usize] {
        &self.chosen
    }

    /// Rijen die nog minder dan `K` keer gedekt zijn, in willekeurige volgorde.
    #[inline]
    pub fn under_covered(&self) -> &[usize] {
        &self.under
    }

    /// Gekozen kolommen als externe, 1-gebaseerde id's in oplopende volgorde.
    pub fn chosen_columns(&self) -> Vec<usize> {
        let mut ids: Vec<usize> = self.chosen.iter().map(|&c| c + 1).collect();
        ids.sort_unstable();
        ids
    }

    /*────────── Mutators ──────────*/

    /// Voegt kolom `c` toe. Een kolom die al gekozen is toevoegen is een programmeerfout.
    pub fn add_column(&mut self, c: usize) {
        assert!(!self.member[c], "column {} is already selected", c + 1);

        self.member.set(c, true);
        self.chosen_pos[c] = self.chosen.len();
        self.chosen.push(c);
        self.total_weight += self.instance.weight(c);

        for &r in self.instance.col_entries(c) {
            self.covered[r] += 1;
            if self.covered[r] == self.k {
                self.satisfied += 1;
                self.leave_under(r);
            }
        }
    }

    /// Verwijdert kolom `c`. Een kolom die niet gekozen is verwijderen is een programmeerfout.
    pub fn remove_column(&mut self, c: usize) {
        assert!(self.member[c], "column {} is not selected", c + 1);

        self.member.set(c, false);
        let pos = self.chosen_pos[c];
        self.chosen.swap_remove(pos);
        if let Some(&moved) = self.chosen.get(pos) {
            self.chosen_pos[moved] = pos;
        }
        self.chosen_pos[c] = ABSENT;
        self.total_weight -= self.instance.weight(c);

        for &r in self.instance.col_entries(c) {
            self.covered[r] -= 1;
            if self.covered[r] == self.k - 1 {
                self.satisfied -= 1;
                self.join_under(r);
            }
        }
    }

    fn leave_under(&mut self, r: usize) {
        let pos = self.under_pos[r];
        debug_assert_ne!(pos, ABSENT);
        self.under.swap_remove(pos);
        if let Some(&moved) = self.under.get(pos) {
            self.under_pos[moved] = pos;
        }
        self.under_pos[r] = ABSENT;
    }

    fn join_under(&mut self, r: usize) {
        debug_assert_eq!(self.under_pos[r], ABSENT);
        self.under_pos[r] = self.under.len();
        self.under.push(r);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn five_columns() -> Instance {
        Instance::from_rows(5, &[5, 1, 3, 2, 4], &[vec![1, 2, 3, 4, 5]]).unwrap()
    }

    #[test]
    fn coverage_crosses_k_threshold() {
        let inst = five_columns();
        let mut sol = Solution::new(&inst, 2);
        sol.add_column(1);
        assert_eq!(sol.covered(0), 1);
        assert!(!sol.is_feasible());
        assert_eq!(sol.under_covered(), &[0]);

        sol.add_column(3);
        assert!(sol.is_feasible());
        assert!(sol.under_covered().is_empty());
        assert_eq!(sol.total_weight(), 3);
        assert_eq!(sol.chosen_columns(), vec![2, 4]);

        sol.add_column(0);
        assert_eq!(sol.satisfied_rows(), 1);
        sol.remove_column(1);
        assert!(sol.is_feasible());
        sol.remove_column(3);
        assert!(!sol.is_feasible());
        assert_eq!(sol.total_weight(), 5);
    }

    #[test]
    fn initialize_resets_everything() {
        let inst = five_columns();
        let mut sol = Solution::new(&inst, 1);
        sol.add_column(2);
        sol.initialize();
        assert!(sol.is_empty());
        assert_eq!(sol.total_weight(), 0);
        assert_eq!(sol.covered(0), 0);
        assert_eq!(sol.under_covered(), &[0]);
        assert!(!sol.contains(2));
    }

    #[test]
    #[should_panic(expected = "already selected")]
    fn double_add_panics() {
        let inst = five_columns();
        let mut sol = Solution::new(&inst, 1);
        sol.add_column(0);
        sol.add_column(0);
    }

    #[test]
    #[should_panic(expected = "not selected")]
    fn remove_of_absent_column_panics() {
        let inst = five_columns();
        let mut sol = Solution::new(&inst, 1);
        sol.remove_column(4);
    }
}
