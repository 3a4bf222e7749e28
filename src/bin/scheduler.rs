use std::error::Error;
use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::{Parser, ValueEnum};
use serde::Serialize;

use jobshop_lib::algorithms::scheduling::{self, Algorithm};
use jobshop_lib::data_structures::shop::{JobShopInstance, Schedule};
use jobshop_lib::io::{self, problem, schedule, size_category};

#[derive(Parser, Debug)]
#[command(about = "Compute a job-shop schedule that minimizes the makespan.")]
#[command(next_line_help = true)]
struct Args {
    /// The scheduling algorithm to run.
    #[arg(value_enum)]
    algorithm: Selector,

    /// The problem file to load.
    input: PathBuf,

    /// Where to write the resulting schedule.
    output: PathBuf,

    /// Number of worker threads, capped at 8.
    ///
    /// Required by the parallel algorithms, rejected by the sequential ones.
    threads: Option<usize>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Selector {
    /// Greedy list scheduling, earliest-available rule.
    #[clap(name = "greedy-ea")]
    GreedyEa,
    /// Greedy list scheduling, shortest-processing-time rule.
    #[clap(name = "greedy-spt")]
    GreedySpt,
    /// Round-based parallel greedy.
    #[clap(name = "greedy-par")]
    GreedyPar,
    /// Sequential branch and bound, 10000-node budget.
    #[clap(name = "bb-seq")]
    BbSeq,
    /// Parallel branch and bound, 2000 nodes per worker.
    #[clap(name = "bb-par")]
    BbPar,
    /// Sequential shifting bottleneck.
    #[clap(name = "sb-seq")]
    SbSeq,
    /// Shifting bottleneck with parallel machine evaluation.
    #[clap(name = "sb-par")]
    SbPar,
}

impl Selector {
    fn algorithm(self) -> Algorithm {
        match self {
            Selector::GreedyEa => Algorithm::GreedyEarliestAvailable,
            Selector::GreedySpt => Algorithm::GreedyShortestProcessingTime,
            Selector::GreedyPar => Algorithm::ParallelGreedy,
            Selector::BbSeq => Algorithm::SequentialBranchAndBound,
            Selector::BbPar => Algorithm::ParallelBranchAndBound,
            Selector::SbSeq => Algorithm::SequentialShiftingBottleneck,
            Selector::SbPar => Algorithm::ParallelShiftingBottleneck,
        }
    }
}

/// One line of the run summary appended next to the output file.
#[derive(Serialize)]
struct RunRecord {
    input: String,
    category: &'static str,
    algorithm: &'static str,
    threads: usize,
    makespan: i64,
    elapsed_ms: u64,
}

fn main() {
    simple_logger::init_with_level(log::Level::Info).unwrap();

    let args = Args::parse();
    if let Err(why) = run(args) {
        log::error!("{why}");
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<(), Box<dyn Error>> {
    let algorithm = args.algorithm.algorithm();

    // argument validation happens before the input is touched
    let workers = match (algorithm.is_parallel(), args.threads) {
        (true, Some(threads)) if threads >= 1 => threads,
        (true, Some(_)) => return Err("the thread count must be at least 1".into()),
        (true, None) => return Err("this algorithm requires a thread count".into()),
        (false, None) => 1,
        (false, Some(_)) => return Err("this algorithm does not take a thread count".into()),
    };

    let instance = problem::read_problem(&args.input)?;
    log::info!(
        "Loaded problem: {} jobs, {} machines, {} operations per job",
        instance.num_jobs(),
        instance.num_machines(),
        instance.ops_per_job()
    );

    let started = Instant::now();
    let result = scheduling::solve(&instance, algorithm, workers)?;
    let elapsed = started.elapsed();

    let makespan = result.makespan(&instance);
    write_schedule(&args.output, algorithm, &instance, &result)?;
    log::info!(
        "{}: makespan {makespan} in {:.3} ms, written to {}",
        algorithm.name(),
        elapsed.as_secs_f64() * 1e3,
        args.output.display()
    );

    let record = RunRecord {
        input: args
            .input
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_default(),
        category: size_category(instance.num_jobs(), instance.num_machines()),
        algorithm: algorithm.name(),
        threads: if algorithm.is_parallel() { workers } else { 1 },
        makespan,
        elapsed_ms: elapsed.as_millis() as u64,
    };
    let summary_path = args.output.with_extension("runs.csv");
    if let Err(why) = io::csv::append_to_file(&summary_path, std::slice::from_ref(&record)) {
        // the schedule itself is already on disk; a failing summary only warns
        log::warn!("Could not append the run summary: {why}");
    }

    Ok(())
}

fn write_schedule(
    path: &Path,
    algorithm: Algorithm,
    instance: &JobShopInstance,
    result: &Schedule,
) -> Result<(), io::IOError> {
    match algorithm {
        Algorithm::SequentialBranchAndBound | Algorithm::ParallelBranchAndBound => {
            schedule::write_starts(path, instance, result)
        }
        _ => schedule::write_triplets(path, instance, result),
    }
}
