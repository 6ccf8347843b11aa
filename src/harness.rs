//! Sequential test runs: generate a puzzle, run the solver, classify.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use tracing::{debug, warn};

use crate::error::HarnessError;
use crate::generator::Strategy;
use crate::invoker::Solver;
use crate::outcome::{Outcome, OutcomeRecord, Report, Tally};
use crate::shapes;

/// Which generator a run uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Fully tiled puzzles with a known solution.
    Simple,
    /// Randomly packed, partially blocked puzzles.
    Stress,
}

/// Parameters for one test run.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub mode: Mode,
    pub tests: usize,
    pub min_rows: usize,
    pub max_rows: usize,
    pub min_cols: usize,
    pub max_cols: usize,
    /// Upper bound on distinct shapes drawn for one puzzle.
    pub max_shapes: usize,
    /// Shape ids puzzles draw from.
    pub pool: Vec<char>,
    /// Difficulty range for stress puzzles, sampled uniformly.
    pub difficulty: (f64, f64),
    pub timeout: Duration,
    pub seed: u64,
    /// Directory for scratch puzzle files.
    pub work_dir: PathBuf,
}

impl RunConfig {
    /// Small fully tiled grids with a short timeout.
    pub fn simple() -> Self {
        Self {
            mode: Mode::Simple,
            tests: 100,
            min_rows: 2,
            max_rows: 8,
            min_cols: 2,
            max_cols: 8,
            max_shapes: 4,
            pool: shapes::DEFAULT_POOL.chars().collect(),
            difficulty: (0.0, 0.0),
            timeout: Duration::from_secs(2),
            seed: 0,
            work_dir: PathBuf::from("."),
        }
    }

    /// Larger blocked grids with a longer timeout.
    pub fn stress() -> Self {
        Self {
            mode: Mode::Stress,
            min_rows: 5,
            max_rows: 20,
            min_cols: 5,
            max_cols: 20,
            max_shapes: 6,
            difficulty: (0.2, 0.8),
            timeout: Duration::from_secs(10),
            ..Self::simple()
        }
    }

    /// Rejects ranges the run loop cannot sample from.
    pub fn validate(&self) -> Result<(), HarnessError> {
        if self.min_rows == 0 || self.min_rows > self.max_rows {
            return Err(HarnessError::Config(format!(
                "row range {}..={} is empty",
                self.min_rows, self.max_rows
            )));
        }
        if self.min_cols == 0 || self.min_cols > self.max_cols {
            return Err(HarnessError::Config(format!(
                "column range {}..={} is empty",
                self.min_cols, self.max_cols
            )));
        }
        if self.max_shapes == 0 || self.pool.is_empty() {
            return Err(HarnessError::Config("no shapes to draw from".to_string()));
        }
        if let Some(&unknown) = self.pool.iter().find(|&&id| !shapes::is_shape_id(id)) {
            return Err(HarnessError::Config(format!("unknown shape id {unknown:?}")));
        }
        let (low, high) = self.difficulty;
        if !(0.0..=1.0).contains(&low) || !(0.0..=1.0).contains(&high) || low > high {
            return Err(HarnessError::Config(format!(
                "difficulty range {low}..{high} is outside [0, 1]"
            )));
        }
        Ok(())
    }

    fn title(&self) -> &'static str {
        match self.mode {
            Mode::Simple => "Simple Test",
            Mode::Stress => "Stress Test",
        }
    }

    fn file_name(&self, index: usize) -> String {
        match self.mode {
            Mode::Simple => format!("test_grid_{index}.txt"),
            Mode::Stress => format!("stress_test_grid_{index}.txt"),
        }
    }
}

/// A puzzle file that is removed when dropped.
struct ScratchFile {
    path: PathBuf,
}

impl ScratchFile {
    /// Claims `path`, clearing any file a previous run left behind.
    fn claim(path: PathBuf) -> Result<Self, HarnessError> {
        match fs::remove_file(&path) {
            Ok(()) => debug!(path = %path.display(), "removed stale puzzle file"),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => return Err(HarnessError::io(path, e)),
        }
        Ok(Self { path })
    }

    fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for ScratchFile {
    fn drop(&mut self) {
        match fs::remove_file(&self.path) {
            Ok(()) => {}
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => warn!(
                path = %self.path.display(),
                error = %e,
                "failed to remove puzzle file"
            ),
        }
    }
}

/// Runs `config.tests` puzzles one after another and tallies the outcomes.
///
/// `observe` sees every record as soon as it is classified. A solver that
/// cannot be launched aborts the run; every other failure is counted.
pub fn run<S: Solver + ?Sized>(
    config: &RunConfig,
    solver: &S,
    mut observe: impl FnMut(&OutcomeRecord),
) -> Result<Report, HarnessError> {
    config.validate()?;
    let mut rng = StdRng::seed_from_u64(config.seed);
    let mut tally = Tally::new();

    for index in 0..config.tests {
        let rows = rng.gen_range(config.min_rows..=config.max_rows);
        let cols = rng.gen_range(config.min_cols..=config.max_cols);
        let count = rng.gen_range(1..=config.max_shapes.min(config.pool.len()));
        let allowed: Vec<char> = config
            .pool
            .choose_multiple(&mut rng, count)
            .copied()
            .collect();

        let (strategy, difficulty) = match config.mode {
            Mode::Simple => (Strategy::Simple, None),
            Mode::Stress => {
                let (low, high) = config.difficulty;
                let difficulty = if high > low {
                    rng.gen_range(low..high)
                } else {
                    low
                };
                (Strategy::Stress { difficulty }, Some(difficulty))
            }
        };

        let scratch = ScratchFile::claim(config.work_dir.join(config.file_name(index)))?;
        let generated =
            strategy.generate_to_file(rows, cols, &allowed, scratch.path(), &mut rng)?;

        let (outcome, output) = if generated {
            let solver_run = solver.invoke(scratch.path(), config.timeout)?;
            let outcome = solver_run.outcome();
            let output = (outcome == Outcome::OtherFailure).then(|| {
                let (stdout, stderr) = solver_run.output();
                (stdout.to_string(), stderr.to_string())
            });
            (outcome, output)
        } else {
            (Outcome::GenerationFailure, None)
        };
        drop(scratch);

        tally.record(outcome);
        let record = OutcomeRecord {
            index,
            rows,
            cols,
            shapes: allowed.iter().collect(),
            difficulty,
            outcome,
            output,
        };
        debug!(index, %outcome, "classified puzzle");
        observe(&record);
    }

    Ok(Report {
        title: config.title(),
        seed: config.seed,
        tally,
    })
}
