//! src/tabu.rs
//!
//! Korte-termijn geheugen van de lokale zoektocht: configuration checking
//! (welke kolommen mogen worden toegevoegd) en het tijdstip waarop elke kolom
//! voor het laatst is omgeschakeld (voor tie-breaking en het tabu-venster van
//! één iteratie in de remove-regel).

use crate::instance::Instance;
use bitvec::prelude::*;

/// Configuration-checking vlaggen en recentheidsgeheugen voor alle kolommen.
#[derive(Clone, Debug)]
pub struct ConfigChecker {
    /// `eligible[c]` is 1 als `c` in de huidige fase mag worden toegevoegd.
    eligible: BitVec,
    /// `last_touched[c]`: iteratie van de laatste add/remove van `c`, `None` als nooit.
    last_touched: Vec<Option<usize>>,
}

impl ConfigChecker {
    /// Creëert een nieuw geheugen voor `n` kolommen; alle kolommen zijn toegestaan.
    pub fn new(n: usize) -> Self {
        Self {
            eligible: bitvec![1; n],
            last_touched: vec![None; n],
        }
    }

    #[inline]
    pub fn is_eligible(&self, c: usize) -> bool {
        self.eligible[c]
    }

    #[inline]
    pub fn last_touched(&self, c: usize) -> Option<usize> {
        self.last_touched[c]
    }

    /// Controleert of kolom `c` in iteratie `iter - 1` is omgeschakeld.
    #[inline]
    pub fn touched_just_before(&self, c: usize, iter: usize) -> bool {
        iter > 0 && self.last_touched[c] == Some(iter - 1)
    }

    /// Registreert dat kolom `c` in iteratie `iter` is verwijderd:
    /// `c` wordt geblokkeerd, haar buren worden vrijgegeven.
    pub fn on_remove(&mut self, inst: &Instance, c: usize, iter: usize) {
        self.eligible.set(c, false);
        self.release_neighbours(inst, c);
        self.last_touched[c] = Some(iter);
    }

    /// Registreert dat kolom `c` in iteratie `iter` is toegevoegd.
    pub fn on_add(&mut self, inst: &Instance, c: usize, iter: usize) {
        self.release_neighbours(inst, c);
        self.eligible.set(c, false);
        self.last_touched[c] = Some(iter);
    }

    fn release_neighbours(&mut self, inst: &Instance, c: usize) {
        for &nb in inst.neighbourhood(c) {
            self.eligible.set(nb, true);
        }
    }
}
