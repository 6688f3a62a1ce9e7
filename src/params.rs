//! src/params.rs
//!
//! Bundelt alle afstembare parameters voor de K-set-cover zoektocht en de
//! batch-laag. Verschillen tussen varianten van de heuristiek zijn hier expliciete
//! velden in plaats van aparte codepaden.

#[cfg(feature = "python")]
use pyo3::prelude::*;

/// Standaardkans op de score-gestuurde remove-tak.
pub const DEFAULT_P_GREEDY_REMOVE: f64 = 0.95;

/// Alle afstembare besturingselementen voor de zoektocht.
#[cfg_attr(feature = "python", pyclass)]
#[derive(Clone, Debug)]
pub struct Params {
    /// Iteratiebudget per trial.
    #[cfg_attr(feature = "python", pyo3(get, set))]
    pub max_iter: usize,
    /// Kans dat de remove-regel de score-gestuurde tak kiest (anders de oudste kolom).
    #[cfg_attr(feature = "python", pyo3(get, set))]
    pub p_greedy_remove: f64,
    /// Sla gekozen kolommen met score 0 over die nog een onder-gedekte rij dekken.
    #[cfg_attr(feature = "python", pyo3(get, set))]
    pub skip_idle_columns: bool,
    /// Kostendrempel voor de penalty-reset, als veelvoud van `max_iter`. `None` schakelt de reset uit.
    #[cfg_attr(feature = "python", pyo3(get, set))]
    pub cost_reset_factor: Option<f64>,
    /// Aantal onafhankelijke trials per run.
    #[cfg_attr(feature = "python", pyo3(get, set))]
    pub trials: usize,
    /// Basis-seed; trial `t` gebruikt `seed + t`.
    #[cfg_attr(feature = "python", pyo3(get, set))]
    pub seed: u64,
}

impl Default for Params {
    fn default() -> Self {
        Params {
            max_iter: 10_000,
            p_greedy_remove: DEFAULT_P_GREEDY_REMOVE,
            skip_idle_columns: true,
            cost_reset_factor: Some(1.0),
            trials: 10,
            seed: 42,
        }
    }
}

impl Params {
    pub fn with_max_iter(mut self, n: usize) -> Self {
        self.max_iter = n;
        self
    }

    /// Stelt de kans op de score-gestuurde remove-tak in; zie [`Params::greedy_remove_probability`].
    pub fn with_p_greedy_remove(mut self, p: f64) -> Self {
        self.p_greedy_remove = p;
        self.p_greedy_remove = self.greedy_remove_probability();
        self
    }

    /// Bruikbare kans voor `gen_bool`: afgekapt op [0, 1], NaN en oneindig vallen
    /// terug op de standaardwaarde. Het veld zelf kan via Python ongecontroleerd gezet zijn.
    pub fn greedy_remove_probability(&self) -> f64 {
        if self.p_greedy_remove.is_finite() {
            self.p_greedy_remove.clamp(0.0, 1.0)
        } else {
            DEFAULT_P_GREEDY_REMOVE
        }
    }

    pub fn with_skip_idle_columns(mut self, skip: bool) -> Self {
        self.skip_idle_columns = skip;
        self
    }

    pub fn with_cost_reset_factor(mut self, factor: Option<f64>) -> Self {
        self.cost_reset_factor = factor;
        self
    }

    pub fn with_trials(mut self, trials: usize) -> Self {
        self.trials = trials;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Absolute kostendrempel voor de penalty-reset, of `None` als de reset uit staat.
    pub fn cost_reset_threshold(&self) -> Option<i64> {
        self.cost_reset_factor
            .map(|f| (f * self.max_iter as f64).ceil().max(1.0) as i64)
    }
}
