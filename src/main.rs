//! Polyomino Grid-Packing Test Harness
//!
//! Drives an external polyomino solver with generated puzzles and reports how
//! it fared, or compares its self-test output against a gold file.

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use polypack::oracle::{self, Verdict};
use polypack::{persistence, ExternalSolver, HarnessError, Mode, RunConfig};

/// Generates polyomino packing puzzles and checks an external solver against them.
#[derive(Parser)]
#[command(name = "polypack")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run fully tiled puzzles that always have a solution.
    Simple(RunArgs),
    /// Run randomly packed puzzles with blocked cells.
    Stress(RunArgs),
    /// Compare solver self-test output against a gold file.
    Compare {
        #[arg(default_value = "generated_test_output.txt")]
        generated: PathBuf,
        #[arg(default_value = "shapes_gold.txt")]
        gold: PathBuf,
    },
    /// Parse a puzzle file and check that its shapes match its grid.
    Check { file: PathBuf },
}

#[derive(Args)]
struct RunArgs {
    /// Solver binary, invoked as `<solver> <puzzle_file>`.
    #[arg(long, default_value = "./artetris")]
    solver: PathBuf,
    /// Number of puzzles to generate.
    #[arg(long)]
    tests: Option<usize>,
    /// Seed for puzzle generation; random when omitted.
    #[arg(long)]
    seed: Option<u64>,
    /// Per-puzzle solver time budget in milliseconds.
    #[arg(long)]
    timeout_ms: Option<u64>,
    #[arg(long)]
    max_rows: Option<usize>,
    #[arg(long)]
    max_cols: Option<usize>,
    /// Shape ids to draw puzzles from.
    #[arg(long)]
    shapes: Option<String>,
    /// Directory for scratch puzzle files.
    #[arg(long, default_value = ".")]
    work_dir: PathBuf,
}

impl RunArgs {
    fn into_config(self, mode: Mode) -> RunConfig {
        let mut config = match mode {
            Mode::Simple => RunConfig::simple(),
            Mode::Stress => RunConfig::stress(),
        };
        config.seed = self.seed.unwrap_or_else(rand::random);
        config.work_dir = self.work_dir;
        if let Some(tests) = self.tests {
            config.tests = tests;
        }
        if let Some(ms) = self.timeout_ms {
            config.timeout = Duration::from_millis(ms);
        }
        if let Some(max_rows) = self.max_rows {
            config.max_rows = max_rows;
        }
        if let Some(max_cols) = self.max_cols {
            config.max_cols = max_cols;
        }
        if let Some(shapes) = self.shapes {
            config.pool = shapes.chars().collect();
        }
        config
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Command::Simple(args) => run_tests(args, Mode::Simple),
        Command::Stress(args) => run_tests(args, Mode::Stress),
        Command::Compare { generated, gold } => run_compare(&generated, &gold),
        Command::Check { file } => run_check(&file),
    };

    match result {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

/// Runs a batch of puzzles against the solver and prints the summary.
fn run_tests(args: RunArgs, mode: Mode) -> Result<bool, HarnessError> {
    let solver = ExternalSolver::new(&args.solver);
    let config = args.into_config(mode);

    let report = polypack::harness::run(&config, &solver, |record| {
        println!("{record}");
        if let Some((stdout, stderr)) = &record.output {
            println!("Stdout:\n{stdout}\nStderr:\n{stderr}");
        }
    })?;

    println!();
    print!("{report}");
    Ok(true)
}

/// Diffs the solver's self-test output against the gold file.
fn run_compare(generated: &Path, gold: &Path) -> Result<bool, HarnessError> {
    let verdict = oracle::compare(generated, gold)?;

    if let Verdict::Differs { .. } | Verdict::Missing { .. } = verdict {
        println!("{verdict}");
    }
    if verdict.passed() {
        println!(
            "Test Passed! {} is identical to {}",
            generated.display(),
            gold.display()
        );
    } else {
        println!(
            "Test Failed! {} differs from {}",
            generated.display(),
            gold.display()
        );
    }
    Ok(verdict.passed())
}

/// Parses a puzzle file and verifies its declared shapes.
fn run_check(file: &Path) -> Result<bool, HarnessError> {
    let puzzle = persistence::load(file)?;
    puzzle.check_consistency()?;
    println!(
        "{}: {}x{} grid, shapes {}, {} blocked, {} empty",
        file.display(),
        puzzle.grid.rows(),
        puzzle.grid.cols(),
        puzzle.shape_line(),
        puzzle.grid.count_blocked(),
        puzzle.grid.count_empty()
    );
    Ok(true)
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_run_args_override_defaults() {
        let cli = Cli::try_parse_from([
            "polypack", "stress", "--tests", "3", "--seed", "9", "--shapes", "KN", "--timeout-ms",
            "250",
        ])
        .unwrap();
        let Command::Stress(args) = cli.command else {
            panic!("expected stress subcommand");
        };

        let config = args.into_config(Mode::Stress);
        assert_eq!(config.tests, 3);
        assert_eq!(config.seed, 9);
        assert_eq!(config.pool, vec!['K', 'N']);
        assert_eq!(config.timeout, Duration::from_millis(250));
        assert_eq!((config.min_rows, config.max_rows), (5, 20));
    }

    #[test]
    fn test_compare_defaults() {
        let cli = Cli::try_parse_from(["polypack", "compare"]).unwrap();
        let Command::Compare { generated, gold } = cli.command else {
            panic!("expected compare subcommand");
        };
        assert_eq!(generated, PathBuf::from("generated_test_output.txt"));
        assert_eq!(gold, PathBuf::from("shapes_gold.txt"));
    }
}
