use std::path::PathBuf;
use std::time::Instant;
use clap::{Args, Parser, Subcommand};
use evictlib::config::{read_config, PolicyKind, SimulationConfig};
use evictlib::generator::{write_cases, AnswerSource, GeneratorParams};
use evictlib::io::read_trace_file;
use evictlib::simulator::Simulator;
use evictlib::util::{discover_cases, verify_cases};

#[cfg(debug_assertions)]
const DEBUG_DEFAULT: bool = true;

#[cfg(not(debug_assertions))]
const DEBUG_DEFAULT: bool = false;

#[derive(Parser, Debug)]
#[command(about = String::from("Exact LRU and Belady-optimal hit counts for cache traces"))]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Simulate a trace file and print the results as JSON
    Simulate(SimulateArgs),
    /// Generate random trace files with their answers
    Generate(GenerateArgs),
    /// Check stored answers against the simulators
    Verify(VerifyArgs),
}

#[derive(Args, Debug)]
struct SimulateArgs {
    trace: PathBuf,

    /// JSON file listing the policies to simulate. Takes precedence over --policy
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Policies to simulate, all of them if not given
    #[arg(long, value_enum)]
    policy: Vec<PolicyKind>,

    /// Print only the hit count. Requires exactly one policy
    #[arg(long)]
    hits_only: bool,

    #[arg(short, long)]
    performance: bool,

    #[arg(short, long, default_value_t = DEBUG_DEFAULT)]
    debug: bool,
}

#[derive(Args, Debug)]
struct GenerateArgs {
    #[arg(short, long, default_value = "tests/test_data")]
    dir: PathBuf,

    /// Number of cases to generate
    #[arg(short, long, default_value_t = 10)]
    number: usize,

    #[arg(short, long, default_value_t = 0)]
    seed: u64,

    /// Policies to write answers for, all of them if not given
    #[arg(long, value_enum)]
    policy: Vec<PolicyKind>,

    #[arg(long, default_value_t = 10_000)]
    max_capacity: usize,

    #[arg(long, default_value_t = 1_000_000)]
    max_len: usize,

    #[arg(long, default_value_t = 1_000)]
    max_key_bound: i64,

    /// Compute answers with the naive reference engines. Very slow on large traces
    #[arg(long)]
    reference: bool,
}

#[derive(Args, Debug)]
struct VerifyArgs {
    #[arg(short, long, default_value = "tests/test_data")]
    dir: PathBuf,

    /// Policies to verify, all of them if not given
    #[arg(long, value_enum)]
    policy: Vec<PolicyKind>,

    /// Number of worker threads, defaults to the available parallelism
    #[arg(short, long)]
    workers: Option<usize>,
}

fn main() -> Result<(), String> {
    let start = Instant::now();
    match Cli::parse().command {
        Command::Simulate(args) => simulate(args, start),
        Command::Generate(args) => generate(args),
        Command::Verify(args) => verify(args),
    }
}

fn simulate(args: SimulateArgs, start: Instant) -> Result<(), String> {
    let config = match &args.config {
        Some(path) => read_config(path)
            .map_err(|e| format!("Couldn't load the config file at path {}: {e}", path.display()))?,
        None => SimulationConfig::new(args.policy),
    };
    if args.hits_only && config.policies.len() != 1 {
        return Err(format!("--hits-only needs exactly one policy, got {}", config.policies.len()));
    }
    let trace = read_trace_file(&args.trace)
        .map_err(|e| format!("Couldn't read the trace file at path {}: {e}", args.trace.display()))?;
    let mut simulator = Simulator::new(&config);
    let result = simulator.simulate(&trace);
    if args.hits_only {
        println!("{}", result.policies[0].hits);
    } else {
        println!("{}", serde_json::to_string_pretty(result).map_err(|e| format!("Couldn't serialise the output {e}"))?);
    }
    if args.performance {
        let simulation_time = simulator.get_execution_time();
        let total_time = start.elapsed();
        println!("Simulation time: {}s", simulation_time.as_nanos() as f64 / 1e9);
        println!("Total execution time (includes parsing and output): {}s", total_time.as_nanos() as f64 / 1e9)
    }
    if args.debug {
        #[cfg(debug_assertions)]
        println!("Running the debug binary, debug mode is enabled by default. If benchmarking, do not use this binary, re-compile with the --release argument when using cargo run");
        println!("Parsed configuration: {config:?}");
        println!("Trace: capacity {}, {} accesses, {} distinct keys", trace.capacity, trace.keys.len(), trace.distinct_keys());
    }
    Ok(())
}

fn generate(args: GenerateArgs) -> Result<(), String> {
    let config = SimulationConfig::new(args.policy);
    let params = GeneratorParams {
        capacity: 1..=args.max_capacity,
        length: 1..=args.max_len,
        key_bound: 1..=args.max_key_bound,
        answers: if args.reference { AnswerSource::Reference } else { AnswerSource::Indexed },
    };
    println!("Start generating test data for caches...");
    let written = write_cases(&args.dir, args.number, &config.policies, &params, args.seed)
        .map_err(|e| format!("Couldn't generate test data in {}: {e}", args.dir.display()))?;
    println!("{} test cases were written to {}", written.len(), args.dir.display());
    Ok(())
}

fn verify(args: VerifyArgs) -> Result<(), String> {
    let config = SimulationConfig::new(args.policy);
    let workers = args
        .workers
        .or_else(|| std::thread::available_parallelism().ok().map(|n| n.get()))
        .unwrap_or(1);
    let mut failures = 0;
    let mut total = 0;
    for policy in &config.policies {
        let cases = discover_cases(&args.dir, *policy)
            .map_err(|e| format!("Couldn't find {policy} test cases in {}: {e}", args.dir.display()))?;
        let outcomes = verify_cases(&cases, *policy, workers).map_err(|e| format!("Couldn't verify {policy}: {e}"))?;
        for outcome in outcomes {
            let status = if outcome.passed() { "ok" } else { "FAILED" };
            println!(
                "{policy} {}: {status} (expected {}, got {}, {} accesses, {}s)",
                outcome.case.name,
                outcome.expected,
                outcome.actual,
                outcome.accesses,
                outcome.time.as_nanos() as f64 / 1e9
            );
            total += 1;
            if !outcome.passed() {
                failures += 1;
            }
        }
    }
    println!("{} of {total} cases passed", total - failures);
    if failures > 0 {
        return Err(format!("{failures} case(s) did not match their answer"));
    }
    Ok(())
}
