//! Classifying solver runs and tallying outcomes.
//!
//! The solver reports failures only as free text, so categories are decided
//! by substring containment. This module is the one place that knows those
//! strings.

use std::fmt;

use rustc_hash::FxHashMap;

use crate::invoker::{SolverRun, TIMEOUT_EXIT_CODE, TIMEOUT_STDOUT};

const ERROR_MARKER: &str = "Error:";
const NO_SOLUTION_MARKER: &str = "No solution found";
const PARSE_ERROR_MARKER: &str = "Error reading grid file";

/// Result category for one puzzle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Outcome {
    Solved,
    NoSolution,
    ParseError,
    OtherFailure,
    Timeout,
    /// The generator could not produce a puzzle, so the solver never ran.
    GenerationFailure,
}

impl Outcome {
    /// Every outcome, in report order.
    pub const ALL: [Outcome; 6] = [
        Outcome::Solved,
        Outcome::NoSolution,
        Outcome::ParseError,
        Outcome::OtherFailure,
        Outcome::Timeout,
        Outcome::GenerationFailure,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Outcome::Solved => "solved",
            Outcome::NoSolution => "no_solution",
            Outcome::ParseError => "parse_error",
            Outcome::OtherFailure => "other_failure",
            Outcome::Timeout => "timeout",
            Outcome::GenerationFailure => "generation_failure",
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Classifies a raw `(stdout, stderr, exit_code)` triple.
///
/// Rules apply in order and the first match wins: exit code 0 is solved even
/// if the output mentions an error; exit code -1 with `Timeout` on stdout is
/// a timeout; anything else goes through [`classify_failure`].
pub fn classify(stdout: &str, stderr: &str, exit_code: i32) -> Outcome {
    if exit_code == 0 {
        Outcome::Solved
    } else if exit_code == TIMEOUT_EXIT_CODE && stdout.contains(TIMEOUT_STDOUT) {
        Outcome::Timeout
    } else {
        classify_failure(stdout, stderr)
    }
}

/// Classifies the output of a solver that exited unsuccessfully.
pub fn classify_failure(stdout: &str, stderr: &str) -> Outcome {
    let either = |marker: &str| stdout.contains(marker) || stderr.contains(marker);

    if !either(ERROR_MARKER) {
        Outcome::OtherFailure
    } else if stdout.contains(NO_SOLUTION_MARKER) {
        Outcome::NoSolution
    } else if either(PARSE_ERROR_MARKER) {
        Outcome::ParseError
    } else {
        Outcome::OtherFailure
    }
}

impl SolverRun {
    /// The outcome category for this run.
    pub fn outcome(&self) -> Outcome {
        match self {
            SolverRun::Solved { .. } => Outcome::Solved,
            SolverRun::TimedOut => Outcome::Timeout,
            SolverRun::Exited { stdout, stderr, .. } => classify_failure(stdout, stderr),
        }
    }
}

/// The classification of one generated puzzle, with what it was built from.
#[derive(Debug, Clone, PartialEq)]
pub struct OutcomeRecord {
    pub index: usize,
    pub rows: usize,
    pub cols: usize,
    pub shapes: String,
    /// Only set for stress puzzles.
    pub difficulty: Option<f64>,
    pub outcome: Outcome,
    /// Solver output kept for failures nobody anticipated.
    pub output: Option<(String, String)>,
}

impl fmt::Display for OutcomeRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let verdict = match self.outcome {
            Outcome::Solved => "PASS",
            Outcome::Timeout => "TIMEOUT",
            Outcome::NoSolution => "FAIL (No Solution)",
            Outcome::ParseError => "FAIL (Parsing)",
            Outcome::OtherFailure => "FAIL (Other)",
            Outcome::GenerationFailure => "Generation FAIL",
        };
        write!(
            f,
            "Test {}: {} (Grid: {}x{}, Shapes: {}",
            self.index, verdict, self.rows, self.cols, self.shapes
        )?;
        if let Some(difficulty) = self.difficulty {
            write!(f, ", Difficulty: {difficulty:.2}")?;
        }
        write!(f, ")")
    }
}

/// Running count of outcomes over one test run.
#[derive(Debug, Clone, Default)]
pub struct Tally {
    counts: FxHashMap<Outcome, usize>,
    total: usize,
}

impl Tally {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, outcome: Outcome) {
        *self.counts.entry(outcome).or_default() += 1;
        self.total += 1;
    }

    pub fn count(&self, outcome: Outcome) -> usize {
        self.counts.get(&outcome).copied().unwrap_or(0)
    }

    /// Number of puzzles attempted.
    pub fn total(&self) -> usize {
        self.total
    }

    /// Number of puzzles that were generated and handed to the solver.
    pub fn generated(&self) -> usize {
        self.total - self.count(Outcome::GenerationFailure)
    }
}

/// Summary of a finished run.
#[derive(Debug, Clone)]
pub struct Report {
    pub title: &'static str,
    pub seed: u64,
    pub tally: Tally,
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let total = self.tally.total();
        let generated = self.tally.generated();
        writeln!(f, "--- {} Summary ---", self.title)?;
        writeln!(f, "Seed: {}", self.seed)?;
        writeln!(f, "Total Tests: {total}")?;
        writeln!(f, "Puzzles generated: {generated}/{total}")?;
        // solver outcomes are relative to the puzzles the solver actually saw
        for outcome in Outcome::ALL {
            let denominator = match outcome {
                Outcome::GenerationFailure => total,
                _ => generated,
            };
            writeln!(f, "{outcome}: {}/{denominator}", self.tally.count(outcome))?;
        }
        Ok(())
    }
}
