use std::path::PathBuf;

use anyhow::{bail, Context};
use clap::Parser;
use rayon::prelude::*;
use statesearch::cargo::{generate, CargoProblem, InstanceSize};
use statesearch::graphplan::{GraphConfig, Heuristic};
use statesearch::trace::Verbosity;
use statesearch::{append_records, Explorer, RunRecord, SearchConfig, Strategy};

/// Solves an air-cargo problem with one or more search algorithms.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Options {
    /// Problem file (PLANES/AIRPORTS/CARGOES/INITIAL_STATE/GOAL_STATE sections).
    #[arg(long, required_unless_present = "random", conflicts_with = "random")]
    file: Option<PathBuf>,
    /// Generate a random instance of the given size instead of reading one.
    #[arg(long, value_name = "PLANES,AIRPORTS,CARGOES")]
    random: Option<InstanceSize>,
    #[arg(long, default_value_t = 0)]
    seed: u64,
    /// Comma-separated algorithms: bfs, dfs, mincost, a*:<heuristic>, bfg:<heuristic>, where
    /// <heuristic> is blind, unmet-goals or set-level.
    #[arg(long, alias = "algorithms", value_delimiter = ',', required = true)]
    algos: Vec<String>,
    #[arg(long, allow_hyphen_values = true)]
    max_depth: Option<i64>,
    /// Keep searching for cheaper plans after the first one.
    #[arg(long)]
    anytime: bool,
    /// 0 (none), 1 (statistics), 2 (low) or 3 (high).
    #[arg(short, long, default_value = "0")]
    verbosity: Verbosity,
    /// Append run statistics to this CSV file.
    #[arg(long)]
    stats: Option<PathBuf>,
    /// Print the planning graph of the initial state.
    #[arg(long)]
    show_graph: bool,
    #[arg(long, default_value_t = GraphConfig::default().max_layers)]
    max_layers: usize,
}

struct Algorithm {
    strategy: Strategy,
    heuristic: Heuristic,
    label: String,
}

fn parse_algorithm(text: &str) -> anyhow::Result<Algorithm> {
    let (strategy, heuristic) = match text.split_once(':') {
        Some((strategy, heuristic)) => (strategy.parse::<Strategy>()?, Some(heuristic.parse::<Heuristic>()?)),
        None => (text.parse::<Strategy>()?, None),
    };
    let heuristic = match (strategy.is_informed(), heuristic) {
        (true, h) => h.unwrap_or(Heuristic::SetLevel),
        (false, None) => Heuristic::Blind,
        (false, Some(_)) => bail!("{strategy} does not use a heuristic"),
    };
    let label = if strategy.is_informed() {
        format!("{strategy}:{}", heuristic_name(heuristic))
    } else {
        strategy.to_string()
    };
    Ok(Algorithm {
        strategy,
        heuristic,
        label,
    })
}

fn heuristic_name(heuristic: Heuristic) -> &'static str {
    match heuristic {
        Heuristic::Blind => "blind",
        Heuristic::UnmetGoals => "unmet-goals",
        Heuristic::SetLevel => "set-level",
    }
}

fn main() -> anyhow::Result<()> {
    let opt = Options::parse();

    let filter = match opt.verbosity {
        Verbosity::None => "warn",
        Verbosity::StatsOnly => "info",
        Verbosity::Low => "debug",
        Verbosity::High => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .with_target(false)
        .init();

    let (problem, name) = match (&opt.file, opt.random) {
        (Some(path), _) => (
            CargoProblem::from_file(path).with_context(|| format!("reading {}", path.display()))?,
            path.display().to_string(),
        ),
        (None, Some(size)) => (
            generate(size, opt.seed).context("generating instance")?,
            format!("random:{size}"),
        ),
        (None, None) => bail!("either --file or --random is required"),
    };
    let algorithms = opt
        .algos
        .iter()
        .map(|a| parse_algorithm(a))
        .collect::<anyhow::Result<Vec<_>>>()?;
    let config = SearchConfig {
        max_depth: opt.max_depth,
        anytime: opt.anytime,
        verbosity: opt.verbosity,
    };
    let graph_config = GraphConfig {
        max_layers: opt.max_layers,
    };

    println!("Problem {name}:\n{problem}");
    if opt.show_graph {
        let (strips, initial) = problem.to_strips(Heuristic::SetLevel, graph_config);
        println!("{}", strips.planning_graph(&initial));
    }

    let outcomes = algorithms
        .par_iter()
        .map(|algo| -> anyhow::Result<_> {
            let (_, initial) = problem.to_strips(algo.heuristic, graph_config);
            let mut explorer = Explorer::new(algo.strategy, config)?;
            let plan = explorer.run(initial);
            let record = RunRecord {
                seed: opt.random.map(|_| opt.seed),
                algorithm: algo.label.clone(),
                problem: name.clone(),
                millis: u64::try_from(explorer.duration_msec()).unwrap_or(u64::MAX),
                iterations: explorer.iterations(),
                max_frontier_size: explorer.max_frontier_size(),
                plan_length: plan.as_ref().map(Vec::len),
                cost: explorer.solution_cost(),
            };
            Ok((plan, record))
        })
        .collect::<anyhow::Result<Vec<_>>>()?;

    let mut records = vec![];
    for (plan, record) in outcomes {
        println!("===================\nAlgorithm {}", record.algorithm);
        println!(
            "{} iterations, max frontier size {}, {} ms",
            record.iterations, record.max_frontier_size, record.millis
        );
        match plan {
            Some(plan) => {
                println!("Solution with {} actions:", plan.len());
                for (i, action) in plan.iter().enumerate() {
                    println!(" [{i}] {action}");
                }
            }
            None => println!("No solution found"),
        }
        records.push(record);
    }

    if let Some(path) = &opt.stats {
        append_records(path, &records).with_context(|| format!("writing {}", path.display()))?;
    }

    Ok(())
}
