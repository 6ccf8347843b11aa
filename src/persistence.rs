//! Reading and writing puzzle files.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::error::HarnessError;
use crate::puzzle::Puzzle;

/// Writes a puzzle in the puzzle file format, replacing any existing file.
pub fn save(path: &Path, puzzle: &Puzzle) -> Result<(), HarnessError> {
    let write = || -> std::io::Result<()> {
        let mut file = BufWriter::new(File::create(path)?);
        write!(file, "{puzzle}")?;
        file.flush()
    };
    write().map_err(|e| HarnessError::io(path, e))
}

/// Reads and parses a puzzle file.
pub fn load(path: &Path) -> Result<Puzzle, HarnessError> {
    let text = fs::read_to_string(path).map_err(|e| HarnessError::io(path, e))?;
    Ok(text.parse()?)
}
