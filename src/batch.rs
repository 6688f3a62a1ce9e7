//! src/batch.rs
//!
//! Batch-laag rond de kern: het inlezen van een run-lijst (`instantie K iteraties`
//! per regel), het herhalen van onafhankelijke trials met deterministische seeds
//! en het samenvatten van de resultaten tot één rapportregel per run.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use thiserror::Error;
use tracing::{info, warn};

use crate::{
    check::check_solution,
    instance::{Instance, InstanceError},
    params::Params,
    search::search,
};

#[derive(Debug, Error)]
pub enum BatchError {
    #[error("failed to read run list: {0}")]
    Io(#[from] io::Error),
    #[error("run list line {line}: {reason}")]
    RunList { line: usize, reason: String },
    #[error("instance {path}: {source}")]
    Instance {
        path: PathBuf,
        #[source]
        source: InstanceError,
    },
}

/// Eén regel uit de run-lijst.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RunSpec {
    pub instance: PathBuf,
    pub k: usize,
    pub max_iter: usize,
}

/// Parset een run-lijst. Lege regels en regels die met `#` beginnen worden genegeerd.
pub fn parse_run_list(text: &str) -> Result<Vec<RunSpec>, BatchError> {
    let mut runs = Vec::new();
    for (idx, raw) in text.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let parts: Vec<_> = line.split_whitespace().collect();
        if parts.len() != 3 {
            return Err(BatchError::RunList {
                line: idx + 1,
                reason: format!("expected 'instance K iterations', got {} fields", parts.len()),
            });
        }
        let k: usize = parts[1].parse().map_err(|_| BatchError::RunList {
            line: idx + 1,
            reason: format!("invalid K '{}'", parts[1]),
        })?;
        if k == 0 {
            return Err(BatchError::RunList { line: idx + 1, reason: "K must be at least 1".into() });
        }
        let max_iter: usize = parts[2].parse().map_err(|_| BatchError::RunList {
            line: idx + 1,
            reason: format!("invalid iteration budget '{}'", parts[2]),
        })?;
        runs.push(RunSpec { instance: PathBuf::from(parts[0]), k, max_iter });
    }
    Ok(runs)
}

/// Leest en parset een run-lijst van schijf.
pub fn read_run_list<P: AsRef<Path>>(path: P) -> Result<Vec<RunSpec>, BatchError> {
    let text = fs::read_to_string(path)?;
    parse_run_list(&text)
}

/// Samenvatting van de trials van één run.
#[derive(Clone, Debug, PartialEq)]
pub struct TrialSummary {
    /// Gewicht per trial; `None` als de trial geen geldige oplossing opleverde.
    pub weights: Vec<Option<u64>>,
    /// Laagste gewicht over alle geldige trials.
    pub best: Option<u64>,
    /// Gekozen kolommen (1-gebaseerd, oplopend) van de eerste trial die `best` haalde.
    pub best_columns: Option<Vec<usize>>,
    /// Som van de geldige gewichten gedeeld door het aantal trials.
    pub average: f64,
}

impl TrialSummary {
    fn new(weights: Vec<Option<u64>>, best_columns: Option<Vec<usize>>) -> Self {
        let best = weights.iter().flatten().copied().min();
        let sum: u64 = weights.iter().flatten().sum();
        let average = if weights.is_empty() { 0.0 } else { sum as f64 / weights.len() as f64 };
        Self { weights, best, best_columns, average }
    }

    /// Rapportregel `pad,K,iteraties,w1,...,wn,beste,gemiddelde`.
    /// Ongeldige trials worden als lege velden weergegeven.
    pub fn report_line(&self, instance: &Path, k: usize, max_iter: usize) -> String {
        let mut fields = vec![instance.display().to_string(), k.to_string(), max_iter.to_string()];
        fields.extend(self.weights.iter().map(|w| w.map(|w| w.to_string()).unwrap_or_default()));
        fields.push(self.best.map(|b| b.to_string()).unwrap_or_default());
        fields.push(self.average.to_string());
        fields.join(",")
    }
}

/// Voert `p.trials` onafhankelijke trials uit; trial `t` gebruikt seed `p.seed + t`.
/// Alleen oplossingen die `check_solution` doorstaan tellen mee.
pub fn run_trials(inst: &Instance, k: usize, p: &Params) -> TrialSummary {
    let mut weights = Vec::with_capacity(p.trials);
    let mut best: Option<(u64, Vec<usize>)> = None;
    for t in 0..p.trials {
        let mut rng = ChaCha8Rng::seed_from_u64(p.seed.wrapping_add(t as u64));
        let outcome = search(inst, k, p, &mut rng);
        let weight = match outcome.best.as_ref() {
            Some(sol) => match check_solution(inst, sol) {
                Ok(()) => {
                    let w = sol.total_weight();
                    if best.as_ref().map_or(true, |(b, _)| w < *b) {
                        best = Some((w, sol.chosen_columns()));
                    }
                    Some(w)
                }
                Err(e) => {
                    warn!(trial = t, error = %e, "trial produced an invalid solution");
                    None
                }
            },
            None => {
                warn!(trial = t, k, "no feasible solution found");
                None
            }
        };
        info!(trial = t, weight = ?weight, best_iteration = ?outcome.best_iteration, "trial finished");
        weights.push(weight);
    }
    TrialSummary::new(weights, best.map(|(_, columns)| columns))
}

/// Voert één regel uit de run-lijst uit: laadt de instantie en draait de trials.
pub fn execute(run: &RunSpec, base: &Params) -> Result<TrialSummary, BatchError> {
    let inst = Instance::open(&run.instance).map_err(|source| BatchError::Instance {
        path: run.instance.clone(),
        source,
    })?;
    let p = base.clone().with_max_iter(run.max_iter);
    info!(
        instance = %run.instance.display(),
        rows = inst.num_rows(),
        columns = inst.num_columns(),
        density = inst.density(),
        k = run.k,
        "starting run"
    );
    Ok(run_trials(&inst, run.k, &p))
}
