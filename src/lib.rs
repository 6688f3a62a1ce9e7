// src/lib.rs

// Publieke modules voor gebruik binnen de Rust-crate
pub mod batch;
pub mod check;
pub mod construct;
pub mod instance;
pub mod params;
pub mod score;
pub mod search;
pub mod select;
pub mod solution;
pub mod tabu;

// Her-exporteer de belangrijkste types voor Rust-gebruikers
pub use check::{check_solution, CheckError};
pub use instance::{Instance, InstanceError};
pub use params::Params;
pub use search::{run, search, SearchOutcome};
pub use solution::Solution;

#[cfg(feature = "python")]
mod python {
    use crate::{batch::run_trials, Instance, Params};
    use pyo3::prelude::*;

    #[pymethods]
    impl Params {
        #[new]
        #[pyo3(signature = (
            max_iter = 10_000,
            p_greedy_remove = 0.95,
            skip_idle_columns = true,
            cost_reset_factor = Some(1.0),
            trials = 10,
            seed = 42,
        ))]
        fn py_new(
            max_iter: usize,
            p_greedy_remove: f64,
            skip_idle_columns: bool,
            cost_reset_factor: Option<f64>,
            trials: usize,
            seed: u64,
        ) -> Self {
            Params::default()
                .with_max_iter(max_iter)
                .with_p_greedy_remove(p_greedy_remove)
                .with_skip_idle_columns(skip_idle_columns)
                .with_cost_reset_factor(cost_reset_factor)
                .with_trials(trials)
                .with_seed(seed)
        }

        // Methode om een kopie te maken, blootgesteld aan Python
        fn copy(&self) -> Self {
            self.clone()
        }
    }

    fn load(instance_path: &str) -> PyResult<Instance> {
        Instance::open(instance_path)
            .map_err(|e| PyErr::new::<pyo3::exceptions::PyValueError, _>(e.to_string()))
    }

    /// Python-binding: beste gevalideerde oplossing over `params.trials` trials.
    /// Geeft (gewicht, 1-gebaseerde kolommen, geldig) terug; (0, [], false) als geen
    /// enkele trial een geldige K-cover vond.
    #[pyfunction]
    #[pyo3(signature = (instance_path, k, py_params))]
    fn solve_py(
        instance_path: String,
        k: usize,
        py_params: Py<Params>,
    ) -> PyResult<(u64, Vec<usize>, bool)> {
        if k == 0 {
            return Err(PyErr::new::<pyo3::exceptions::PyValueError, _>("K must be at least 1"));
        }
        let inst = load(&instance_path)?;
        let p = Python::with_gil(|py| py_params.borrow(py).clone());
        let trials = p.trials.max(1);
        let summary = run_trials(&inst, k, &p.with_trials(trials));

        Ok(match (summary.best, summary.best_columns) {
            (Some(weight), Some(columns)) => (weight, columns, true),
            _ => (0, Vec::new(), false),
        })
    }

    /// Helperfunctie om een instantie te parsen en (rijen, kolommen, dichtheid) terug te geven.
    #[pyfunction]
    fn parse_instance_py(instance_path: String) -> PyResult<(usize, usize, f64)> {
        let inst = load(&instance_path)?;
        Ok((inst.num_rows(), inst.num_columns(), inst.density()))
    }

    /// Definieert de Python-module `_native`.
    #[pymodule]
    fn _native(_py: Python<'_>, m: &Bound<'_, PyModule>) -> PyResult<()> {
        m.add_class::<Params>()?;
        m.add_function(wrap_pyfunction!(solve_py, m)?)?;
        m.add_function(wrap_pyfunction!(parse_instance_py, m)?)?;
        Ok(())
    }
}
