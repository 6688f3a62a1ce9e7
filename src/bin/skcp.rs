//! src/bin/skcp.rs
//!
//! Commandoregel rond de batch-laag. Ofwel een run-lijst (`instantie K iteraties`
//! per regel), ofwel één instantie via `--instance`, `-k` en `--iterations`.
//! Schrijft per run één rapportregel naar stdout; logging gaat naar stderr.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use skcp::batch::{execute, read_run_list, BatchError, RunSpec};
use skcp::Params;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "skcp", version, about = "Local search for the weighted K-set cover problem")]
struct Cli {
    /// Run-lijst met per regel `instantie K iteraties`.
    #[arg(required_unless_present = "instance")]
    run_list: Option<PathBuf>,

    /// Eén instantiebestand in plaats van een run-lijst.
    #[arg(long, conflicts_with = "run_list", requires = "k")]
    instance: Option<PathBuf>,

    /// Dekkingseis K (alleen met --instance).
    #[arg(short = 'k', long, requires = "instance", value_parser = clap::value_parser!(u64).range(1..))]
    k: Option<u64>,

    /// Iteratiebudget (alleen met --instance).
    #[arg(long, default_value_t = 10_000)]
    iterations: usize,

    #[arg(long, default_value_t = 10)]
    trials: usize,

    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Kans op de score-gestuurde remove-tak, in [0, 1].
    #[arg(long, default_value_t = 0.95, value_parser = parse_probability)]
    p_remove: f64,

    /// Penalty-reset drempel als veelvoud van het iteratiebudget.
    #[arg(long, default_value_t = 1.0, value_parser = parse_factor)]
    reset_factor: f64,

    /// Schakelt de penalty-reset uit.
    #[arg(long)]
    no_reset: bool,

    /// Schakelt de overslaregel voor kolommen met score 0 uit.
    #[arg(long)]
    no_idle_skip: bool,

    /// Print de gekozen kolommen van de beste trial (alleen met --instance).
    #[arg(long, requires = "instance")]
    print_solution: bool,
}

fn parse_probability(s: &str) -> Result<f64, String> {
    let p: f64 = s.parse().map_err(|e| format!("{e}"))?;
    if p.is_finite() && (0.0..=1.0).contains(&p) {
        Ok(p)
    } else {
        Err(format!("{s} is not a probability in [0, 1]"))
    }
}

fn parse_factor(s: &str) -> Result<f64, String> {
    let f: f64 = s.parse().map_err(|e| format!("{e}"))?;
    if f.is_finite() && f > 0.0 {
        Ok(f)
    } else {
        Err(format!("{s} is not a positive finite factor"))
    }
}

fn enable_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .try_init();
}

fn main() -> ExitCode {
    enable_tracing();
    let cli = Cli::parse();

    let params = Params::default()
        .with_trials(cli.trials)
        .with_seed(cli.seed)
        .with_p_greedy_remove(cli.p_remove)
        .with_skip_idle_columns(!cli.no_idle_skip)
        .with_cost_reset_factor((!cli.no_reset).then_some(cli.reset_factor));

    match dispatch(&cli, &params) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn dispatch(cli: &Cli, params: &Params) -> Result<(), BatchError> {
    // clap garandeert: ofwel een run-lijst, ofwel --instance samen met -k.
    let runs = match (&cli.instance, cli.k, &cli.run_list) {
        (Some(path), Some(k), _) => {
            vec![RunSpec { instance: path.clone(), k: k as usize, max_iter: cli.iterations }]
        }
        (_, _, Some(list)) => read_run_list(list)?,
        _ => unreachable!("clap requires a run list or --instance with -k"),
    };

    for run in &runs {
        let summary = execute(run, params)?;
        println!("{}", summary.report_line(&run.instance, run.k, run.max_iter));

        if cli.print_solution {
            if let (Some(weight), Some(columns)) = (summary.best, &summary.best_columns) {
                let ids: Vec<String> = columns.iter().map(usize::to_string).collect();
                println!("{}", ids.join(" "));
                println!("{weight}");
            }
        }
    }
    Ok(())
}
