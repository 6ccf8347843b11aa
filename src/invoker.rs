//! Running the external solver against a puzzle file.
//!
//! The solver is invoked as `<solver> <puzzle_file>` with both output streams
//! captured. A run that outlives its time budget is killed and reported as
//! [`SolverRun::TimedOut`].

use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use tracing::{debug, warn};

use crate::error::HarnessError;

/// Interval between checks on a running solver.
const POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Exit code standing in for a timeout in the raw result triple.
pub const TIMEOUT_EXIT_CODE: i32 = -1;

/// Stdout standing in for a timeout in the raw result triple.
pub const TIMEOUT_STDOUT: &str = "Timeout";

/// What happened when the solver ran.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SolverRun {
    /// Exited with status 0.
    Solved { stdout: String, stderr: String },
    /// Killed after exceeding the time budget.
    TimedOut,
    /// Exited with a non-zero status, or `None` when killed by a signal.
    Exited {
        code: Option<i32>,
        stdout: String,
        stderr: String,
    },
}

impl SolverRun {
    /// Flattens the run into `(stdout, stderr, exit_code)`.
    ///
    /// Timeouts become `("Timeout", "", -1)`; signal deaths also report -1.
    pub fn into_raw(self) -> (String, String, i32) {
        match self {
            SolverRun::Solved { stdout, stderr } => (stdout, stderr, 0),
            SolverRun::TimedOut => (TIMEOUT_STDOUT.to_string(), String::new(), TIMEOUT_EXIT_CODE),
            SolverRun::Exited {
                code,
                stdout,
                stderr,
            } => (stdout, stderr, code.unwrap_or(TIMEOUT_EXIT_CODE)),
        }
    }

    /// Captured stdout and stderr, empty for a timeout.
    pub fn output(&self) -> (&str, &str) {
        match self {
            SolverRun::Solved { stdout, stderr } | SolverRun::Exited { stdout, stderr, .. } => {
                (stdout.as_str(), stderr.as_str())
            }
            SolverRun::TimedOut => ("", ""),
        }
    }
}

/// Something that can attempt a puzzle file within a time budget.
pub trait Solver {
    fn invoke(&self, puzzle_path: &Path, timeout: Duration) -> Result<SolverRun, HarnessError>;
}

/// An external solver binary.
#[derive(Debug, Clone)]
pub struct ExternalSolver {
    program: PathBuf,
}

impl ExternalSolver {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    pub fn program(&self) -> &Path {
        &self.program
    }
}

impl Solver for ExternalSolver {
    fn invoke(&self, puzzle_path: &Path, timeout: Duration) -> Result<SolverRun, HarnessError> {
        let start = Instant::now();
        let mut child = Command::new(&self.program)
            .arg(puzzle_path)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| HarnessError::Launch {
                program: self.program.clone(),
                source,
            })?;
        debug!(pid = child.id(), path = %puzzle_path.display(), "spawned solver");

        // drain both pipes so a chatty solver cannot stall on a full buffer
        let stdout_reader = child.stdout.take().map(spawn_reader);
        let stderr_reader = child.stderr.take().map(spawn_reader);

        let status = loop {
            if let Some(status) = child.try_wait().map_err(HarnessError::Wait)? {
                break status;
            }
            if start.elapsed() >= timeout {
                debug!(pid = child.id(), ?timeout, "solver timed out, killing");
                // the child may exit between try_wait and kill
                let _ = child.kill();
                child.wait().map_err(HarnessError::Wait)?;
                // readers are left detached: a grandchild may still hold the pipes
                return Ok(SolverRun::TimedOut);
            }
            thread::sleep(POLL_INTERVAL);
        };

        let stdout = join_reader(stdout_reader);
        let stderr = join_reader(stderr_reader);
        debug!(code = ?status.code(), elapsed = ?start.elapsed(), "solver exited");

        Ok(match status.code() {
            Some(0) => SolverRun::Solved { stdout, stderr },
            code => SolverRun::Exited {
                code,
                stdout,
                stderr,
            },
        })
    }
}

fn spawn_reader<R: Read + Send + 'static>(stream: R) -> thread::JoinHandle<String> {
    thread::spawn(move || read_lossy(stream))
}

/// Reads a stream to its end, keeping whatever arrived before a read error.
fn read_lossy<R: Read>(mut stream: R) -> String {
    let mut buffer = Vec::new();
    if let Err(e) = stream.read_to_end(&mut buffer) {
        warn!(error = %e, bytes = buffer.len(), "solver output truncated by read error");
    }
    String::from_utf8_lossy(&buffer).into_owned()
}

fn join_reader(handle: Option<thread::JoinHandle<String>>) -> String {
    handle
        .and_then(|handle| handle.join().ok())
        .unwrap_or_default()
}
