//! # sat-reducer
//!
//! `sat-reducer` is a command-line tool that reduces SAT problems in general
//! CNF (clauses of any arity) to equisatisfiable strict 3-CNF (every clause
//! exactly three literals), introducing auxiliary variables as needed.
//!
//! Beyond the reduction itself it can solve the reduced formula with a plain
//! backtracking solver, verify the model, and project it back onto the
//! original variables.
//!
//! ## Usage
//!
//! ```sh
//! # Reduce a DIMACS file and print statistics
//! sat-reducer problem.cnf
//!
//! # Reduce, write the 3-CNF out, then solve and project the model
//! sat-reducer file --path problem.cnf --export reduced.cnf --solve
//!
//! # Reduce a formula given as text
//! sat-reducer text --input "1 -2 3 4 0\n2 0"
//!
//! # Reduce every .cnf file under a directory
//! sat-reducer dir --path benchmarks/
//!
//! # Generate shell completions
//! sat-reducer completions bash
//! ```

use crate::sat::cnf::Cnf;
use crate::sat::dimacs;
use crate::sat::reduction::{Reducer, Reduction};
use crate::sat::solver::Backtracking;
use crate::sat::verifier;
use clap::{Args, CommandFactory, Parser, Subcommand};
use itertools::Itertools;
use std::path::PathBuf;
use std::time::Duration;
use tikv_jemalloc_ctl::{epoch, stats};

mod sat;

/// Global allocator using `tikv-jemallocator`, which also backs the memory
/// usage statistics reported after a reduction.
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

/// Defines the command-line interface, parsed with `clap`.
#[derive(Parser, Debug)]
#[command(name = "sat-reducer", version, about = "A SAT to 3-SAT clause reducer")]
struct Cli {
    /// An optional path argument. If provided without a subcommand, it's
    /// treated as the path to a DIMACS .cnf file to reduce.
    path: Option<PathBuf>,

    /// The subcommand to execute.
    #[clap(subcommand)]
    command: Option<Commands>,

    /// Common options applicable to all commands.
    #[command(flatten)]
    common: CommonOptions,
}

/// The available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Reduce a CNF file in DIMACS format.
    File {
        /// Path to the DIMACS .cnf file.
        #[arg(long)]
        path: PathBuf,

        /// Common options for this subcommand.
        #[command(flatten)]
        common: CommonOptions,
    },

    /// Reduce a CNF formula provided as plain text.
    Text {
        /// Literal CNF input as a string (e.g., "1 -2 0\n2 3 0").
        /// Each line is a clause; literals are space-separated; 0 terminates a clause.
        #[arg(short, long)]
        input: String,

        /// Common options for this subcommand.
        #[command(flatten)]
        common: CommonOptions,
    },

    /// Reduce every .cnf file under a directory (recursively).
    Dir {
        /// Path to the directory to scan.
        #[arg(long)]
        path: PathBuf,

        /// Common options for this subcommand.
        #[command(flatten)]
        common: CommonOptions,
    },

    /// Generate shell completion scripts.
    Completions {
        /// The shell to generate completions for.
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

/// Common command-line options shared across subcommands.
#[derive(Args, Debug, Default)]
struct CommonOptions {
    /// Enable debug output, printing the reduced formula.
    #[arg(short, long, default_value_t = false)]
    debug: bool,

    /// Solve the reduced 3-CNF with the backtracking solver.
    #[arg(short, long, default_value_t = false)]
    solve: bool,

    /// Verify the model against the reduced and the original formula
    /// (only meaningful together with --solve).
    #[arg(long, default_value_t = true)]
    verify: bool,

    /// Print reduction statistics.
    #[arg(long, default_value_t = true)]
    stats: bool,

    /// Print the satisfying assignment and its projection onto the original
    /// variables (only meaningful together with --solve).
    #[arg(short, long, default_value_t = false)]
    print_solution: bool,

    /// Write the reduced 3-CNF to this path in DIMACS format.
    #[arg(short, long)]
    export: Option<PathBuf>,
}

/// Main entry point: parses arguments and dispatches to the command handlers.
fn main() {
    let cli = Cli::parse();

    // A bare path without a subcommand reduces a DIMACS file.
    if let Some(path) = cli.path.clone() {
        if cli.command.is_none() {
            reduce_path(&path, &cli.common);
            return;
        }
    }

    match cli.command {
        Some(Commands::File { path, common }) => reduce_path(&path, &common),

        Some(Commands::Text { input, common }) => {
            let time = std::time::Instant::now();
            let cnf = Cnf::from(parse_textual_cnf(&input));
            let elapsed = time.elapsed();

            reduce_and_report(&cnf, &common, None, elapsed);
        }

        Some(Commands::Dir { path, common }) => reduce_dir(&path, &common),

        Some(Commands::Completions { shell }) => {
            clap_complete::generate(
                shell,
                &mut Cli::command(),
                "sat-reducer",
                &mut std::io::stdout(),
            );
        }

        None => {
            if cli.path.is_none() {
                eprintln!("No command provided. Use --help for more information.");
                std::process::exit(1);
            }
        }
    }
}

/// Parses plain-text CNF input: one clause per line, literals as signed
/// integers, 0 terminating each clause.
fn parse_textual_cnf(input: &str) -> Vec<Vec<i32>> {
    input
        .split(['\n', ';'])
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| {
            line.split_whitespace()
                .map(|s| {
                    s.parse::<i32>()
                        .unwrap_or_else(|e| panic!("Failed to parse literal '{s}' as i32: {e}"))
                })
                .take_while(|&l| l != 0)
                .collect_vec()
        })
        .collect()
}

/// Parses and reduces a single DIMACS file.
fn reduce_path(path: &PathBuf, common: &CommonOptions) {
    let time = std::time::Instant::now();
    let cnf: Cnf =
        dimacs::parse_file(path).unwrap_or_else(|e| panic!("Failed to parse {}: {e}", path.display()));
    let elapsed = time.elapsed();

    reduce_and_report(&cnf, common, path.to_str(), elapsed);
}

/// Reduces every .cnf file under `path`, recursively.
fn reduce_dir(path: &PathBuf, common: &CommonOptions) {
    if !path.is_dir() {
        eprintln!("Provided path is not a directory: {}", path.display());
        std::process::exit(1);
    }

    for entry in walkdir::WalkDir::new(path)
        .into_iter()
        .filter_map(Result::ok)
    {
        let file_path = entry.path().to_path_buf();

        if !file_path.is_file() || file_path.extension().is_none_or(|ext| ext != "cnf") {
            continue;
        }

        reduce_path(&file_path, common);
    }
}

/// Reduces a formula and reports statistics, then optionally exports, solves,
/// verifies, and projects.
fn reduce_and_report(cnf: &Cnf, common: &CommonOptions, label: Option<&str>, parse_time: Duration) {
    if let Some(name) = label {
        println!("Reducing: {name}");
    }

    epoch::advance().unwrap();

    let mut reducer = Reducer::new();
    let reduction = match reducer.reduce_cnf(cnf) {
        Ok(reduction) => reduction,
        Err(e) => {
            eprintln!("Reduction failed: {e}");
            std::process::exit(1);
        }
    };

    epoch::advance().unwrap();
    let allocated_bytes = stats::allocated::mib().unwrap().read().unwrap();
    let resident_bytes = stats::resident::mib().unwrap().read().unwrap();
    let allocated_mib = allocated_bytes as f64 / (1024.0 * 1024.0);
    let resident_mib = resident_bytes as f64 / (1024.0 * 1024.0);

    if common.debug {
        println!("Reduced formula:\n{}", reduction.cnf);
    }

    if common.stats {
        print_stats(&reduction, parse_time, allocated_mib, resident_mib);
    }

    if let Some(export_path) = &common.export {
        let comment = format!(
            "reduced from {} clauses / {} variables",
            reduction.stats.original_clauses, reduction.stats.original_vars
        );
        dimacs::write_file(export_path, &reduction.cnf, &[&comment])
            .unwrap_or_else(|e| panic!("Unable to write file {}: {e}", export_path.display()));
        println!("3-CNF written to: {}", export_path.display());
    }

    if common.solve {
        solve_and_project(cnf, &reduction, common);
    }
}

/// Solves the reduced formula, verifies the model against both formulas, and
/// projects it back onto the original variables.
fn solve_and_project(source: &Cnf, reduction: &Reduction, common: &CommonOptions) {
    let time = std::time::Instant::now();
    let mut solver = Backtracking::new(reduction.cnf.clone());
    let solutions = solver.solve();
    let elapsed = time.elapsed();

    println!("Solve time: {elapsed:?} ({} backtracks)", solver.backtracks());

    let Some(solutions) = solutions else {
        println!("UNSAT");
        return;
    };

    let projected = reduction.project_solutions(&solutions);

    if common.verify {
        let ok = verifier::check_model(&reduction.cnf, &solutions);
        println!("Verified (3-CNF): {ok:?}");
        assert!(ok, "model failed verification against the reduced formula");

        let ok = verifier::check_model(source, &projected);
        println!("Verified (original): {ok:?}");
        assert!(ok, "projected model failed verification against the source formula");
    }

    if common.print_solution {
        println!("Model (3-CNF): {solutions:?}");
        println!("Model (original): {projected:?}");
    }
}

/// Prints the reduction statistics block.
fn print_stats(reduction: &Reduction, parse_time: Duration, allocated_mib: f64, resident_mib: f64) {
    let stats = &reduction.stats;

    println!("Original formula:");
    println!("  Variables: {}", stats.original_vars);
    println!("  Clauses: {}", stats.original_clauses);
    println!("Transformations:");
    println!("  k=1: {}", stats.clauses_k1);
    println!("  k=2: {}", stats.clauses_k2);
    println!("  k=3: {}", stats.clauses_k3);
    println!("  k>=4: {}", stats.clauses_k4plus);
    println!("Reduced formula:");
    println!(
        "  Variables: {} (+{} auxiliary)",
        reduction.cnf.num_vars, stats.auxiliary_vars
    );
    println!("  Clauses: {}", stats.output_clauses);
    if stats.original_clauses > 0 {
        println!(
            "  Expansion factor: {:.2}x",
            stats.output_clauses as f64 / stats.original_clauses as f64
        );
    }
    println!("Performance:");
    println!("  Parse time: {parse_time:?}");
    println!("  Reduce time: {:?}", stats.elapsed);
    println!("  Memory allocated: {allocated_mib:.2} MiB");
    println!("  Memory resident: {resident_mib:.2} MiB");
}
