//! pagesim command-line interface.
//!
//! Three modes over the simulation core:
//! 1. **single:** one policy, one frame count; writes the timeline (and the
//!    MGLRU generation log) to the results directory.
//! 2. **compare:** all four policies over a range of frame counts; writes a
//!    CSV table.
//! 3. **multi:** a generated multi-process trace under fixed or global
//!    allocation.

use std::error::Error as StdError;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use log::{error, info};
use rand::rngs::StdRng;
use rand::SeedableRng;

use pagesim::common::config::{
    DEFAULT_AGING_THRESHOLD, DEFAULT_NUM_GENERATIONS, DEFAULT_RESULTS_DIR,
};
use pagesim::{
    allocation, simulation, workload, AllocationStrategy, FileReport, PageId, PolicyConfig,
    PolicyKind, ReplacementPolicy, ReportSink, Stats, WorkloadKind,
};

type CliResult<T> = std::result::Result<T, Box<dyn StdError>>;

#[derive(Parser, Debug)]
#[command(
    name = "pagesim",
    version,
    about = "Page replacement algorithm simulator",
    long_about = "Simulate FIFO, LRU, Optimal and MGLRU page replacement over a recorded or generated trace.\n\nExamples:\n  pagesim single --policy LRU --frames 4 --generate locality 1000 50\n  pagesim compare --min 1 --max 16 --file trace.txt\n  pagesim multi --strategy fixed --policy FIFO --frames 128 --processes 4 --generate locality 5000 100"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Where a single-process trace comes from.
#[derive(Args, Debug)]
struct TraceSource {
    /// Trace file of page numbers separated by whitespace or commas.
    #[arg(short, long, conflicts_with = "generate")]
    file: Option<PathBuf>,

    /// Generate a trace instead: TYPE (random|sequential|locality) LEN MAX_PAGE.
    #[arg(short, long, num_args = 3, value_names = ["TYPE", "LEN", "MAX_PAGE"])]
    generate: Option<Vec<String>>,

    /// Seed for the workload generator (random if omitted).
    #[arg(long)]
    seed: Option<u64>,
}

/// MGLRU knobs, ignored by the other policies.
#[derive(Args, Debug)]
struct MglruArgs {
    /// Number of MGLRU generations.
    #[arg(long, default_value_t = DEFAULT_NUM_GENERATIONS)]
    generations: usize,

    /// Requests between two MGLRU aging events.
    #[arg(long, default_value_t = DEFAULT_AGING_THRESHOLD)]
    aging_threshold: usize,
}

impl MglruArgs {
    fn config(&self, num_frames: usize) -> PolicyConfig {
        PolicyConfig::new(num_frames)
            .with_generations(self.generations)
            .with_aging_threshold(self.aging_threshold)
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run one policy with a fixed number of frames.
    Single {
        /// FIFO, LRU, Optimal or MGLRU.
        #[arg(short, long)]
        policy: String,

        #[arg(long)]
        frames: usize,

        #[command(flatten)]
        source: TraceSource,

        #[command(flatten)]
        mglru: MglruArgs,

        /// Directory for report files.
        #[arg(short, long, default_value = DEFAULT_RESULTS_DIR)]
        out: PathBuf,
    },

    /// Run every policy over a range of frame counts.
    Compare {
        #[arg(long)]
        min: usize,

        #[arg(long)]
        max: usize,

        #[command(flatten)]
        source: TraceSource,

        #[command(flatten)]
        mglru: MglruArgs,

        /// Directory for report files.
        #[arg(short, long, default_value = DEFAULT_RESULTS_DIR)]
        out: PathBuf,
    },

    /// Run a generated multi-process trace under fixed or global allocation.
    Multi {
        /// fixed or global.
        #[arg(long)]
        strategy: String,

        /// FIFO, LRU, Optimal or MGLRU.
        #[arg(short, long)]
        policy: String,

        /// Total frames shared by (global) or divided among (fixed) tenants.
        #[arg(long)]
        frames: usize,

        #[arg(long)]
        processes: usize,

        /// TYPE (random|sequential|locality) LEN MAX_PAGE_PER_PROCESS.
        #[arg(
            short,
            long,
            num_args = 3,
            required = true,
            value_names = ["TYPE", "LEN", "MAX_PAGE"]
        )]
        generate: Vec<String>,

        /// Seed for the workload generator (random if omitted).
        #[arg(long)]
        seed: Option<u64>,

        /// Run fixed-allocation tenants on separate threads.
        #[arg(long)]
        parallel: bool,

        #[command(flatten)]
        mglru: MglruArgs,
    },
}

/// Parsed `TYPE LEN MAX_PAGE` triple.
struct Generator {
    kind: WorkloadKind,
    length: usize,
    max_page: u32,
}

impl Generator {
    fn parse(args: &[String]) -> CliResult<Self> {
        match args {
            [kind, length, max_page] => Ok(Self {
                kind: kind.parse()?,
                length: length.parse()?,
                max_page: max_page.parse()?,
            }),
            _ => Err("expected TYPE LEN MAX_PAGE".into()),
        }
    }
}

fn make_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

fn load_trace(source: &TraceSource) -> CliResult<Vec<PageId>> {
    if let Some(path) = &source.file {
        info!("parsing workload from {}", path.display());
        return Ok(workload::parse_workload(path));
    }

    let args = source
        .generate
        .as_deref()
        .ok_or("either --file or --generate is required")?;
    let gen = Generator::parse(args)?;
    info!(
        "generating workload: {}, length={}, max page={}",
        gen.kind, gen.length, gen.max_page
    );
    let mut rng = make_rng(source.seed);
    Ok(workload::generate(gen.kind, gen.length, gen.max_page, &mut rng))
}

fn print_stats(stats: &Stats) {
    println!("Total Requests: {}", stats.total);
    println!("Page Hits: {}", stats.hits);
    println!("Page Faults: {}", stats.faults);
    println!("Hit Ratio: {:.2}%", stats.hit_ratio() * 100.0);
    println!("Miss Ratio: {:.2}%", stats.miss_ratio() * 100.0);
}

fn cmd_single(
    policy: &str,
    frames: usize,
    source: &TraceSource,
    mglru: &MglruArgs,
    out: PathBuf,
) -> CliResult<()> {
    let kind: PolicyKind = policy.parse()?;
    let trace = load_trace(source)?;
    if trace.is_empty() {
        error!("no workload to process, exiting");
        return Ok(());
    }

    println!("--- Running Single-Process Simulation ---");
    println!("Algorithm: {}", kind);
    println!("Frames: {}", frames);
    println!("Total Page Requests: {}", trace.len());

    let (policy, stats) = simulation::run_kind(kind, &mglru.config(frames), &trace)?;

    println!("\n--- Simulation Results ---");
    print_stats(&stats);

    let mut report = FileReport::new(out);
    let sink: &mut dyn ReportSink<PageId> = &mut report;
    sink.stats(&kind.to_string(), &stats)?;
    sink.timeline(policy.timeline())?;
    if let Some(log) = policy.generation_log() {
        sink.generation_log(log)?;
    }
    Ok(())
}

fn cmd_compare(
    min: usize,
    max: usize,
    source: &TraceSource,
    mglru: &MglruArgs,
    out: PathBuf,
) -> CliResult<()> {
    let trace = load_trace(source)?;
    if trace.is_empty() {
        error!("no workload to process, exiting");
        return Ok(());
    }

    println!("--- Running Comparison Simulation ---");
    println!("Workload Length: {}", trace.len());
    println!("Frame Range: {} to {}", min, max);

    let rows = simulation::compare(&trace, min..=max, &mglru.config(min))?;

    println!(
        "\n{:<8} {:>6} {:>8} {:>8} {:>10}",
        "Policy", "Frames", "Hits", "Faults", "Miss Ratio"
    );
    for row in &rows {
        println!(
            "{:<8} {:>6} {:>8} {:>8} {:>9.2}%",
            row.policy.to_string(),
            row.frames,
            row.stats.hits,
            row.stats.faults,
            row.stats.miss_ratio() * 100.0
        );
    }

    let mut report = FileReport::new(out);
    let sink: &mut dyn ReportSink<PageId> = &mut report;
    sink.comparison(&rows)?;
    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn cmd_multi(
    strategy: &str,
    policy: &str,
    frames: usize,
    processes: usize,
    generate: &[String],
    seed: Option<u64>,
    parallel: bool,
    mglru: &MglruArgs,
) -> CliResult<()> {
    let strategy: AllocationStrategy = strategy.parse()?;
    let kind: PolicyKind = policy.parse()?;
    let gen = Generator::parse(generate)?;

    info!("generating multi-process workload");
    let mut rng = make_rng(seed);
    let trace =
        workload::generate_multiprocess(gen.kind, gen.length, processes, gen.max_page, &mut rng)?;

    println!("--- Running Multi-Process Simulation ---");
    println!("Allocation: {}", strategy);
    println!("Algorithm: {}", kind);
    println!("Total Frames: {}", frames);
    println!("Num Processes: {}", processes);
    println!("Workload: {}, Length={}", gen.kind, gen.length);

    let config = mglru.config(frames);
    let report = match strategy {
        AllocationStrategy::Fixed if parallel => {
            allocation::run_fixed_parallel(kind, &config, &trace, frames, processes)?
        }
        _ => allocation::run(strategy, kind, &config, &trace, frames, processes)?,
    };

    println!("\n--- Multi-Process Results ---");
    print_stats(&report.total);
    for (tenant, stats) in &report.per_tenant {
        println!("  {}: {}", tenant, stats);
    }
    Ok(())
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Single {
            policy,
            frames,
            source,
            mglru,
            out,
        } => cmd_single(&policy, frames, &source, &mglru, out),
        Commands::Compare {
            min,
            max,
            source,
            mglru,
            out,
        } => cmd_compare(min, max, &source, &mglru, out),
        Commands::Multi {
            strategy,
            policy,
            frames,
            processes,
            generate,
            seed,
            parallel,
            mglru,
        } => cmd_multi(
            &strategy, &policy, frames, processes, &generate, seed, parallel, &mglru,
        ),
    };

    if let Err(e) = result {
        error!("{}", e);
        std::process::exit(1);
    }
}
