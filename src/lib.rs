//! Polyomino Grid-Packing Test Harness
//!
//! Generates puzzle grids from a fixed catalog of polyomino shapes, runs an
//! external solver against each one under a time budget, and classifies what
//! the solver reported. A separate oracle diffs solver self-test output
//! against a gold file.

pub mod error;
pub mod generator;
pub mod grid;
pub mod harness;
pub mod invoker;
pub mod oracle;
pub mod outcome;
pub mod persistence;
pub mod puzzle;
pub mod shapes;

pub use error::{HarnessError, PuzzleError};
pub use generator::Strategy;
pub use grid::{Cell, Grid};
pub use harness::{Mode, RunConfig};
pub use invoker::{ExternalSolver, Solver, SolverRun};
pub use outcome::{classify, Outcome, OutcomeRecord, Report, Tally};
pub use puzzle::Puzzle;
