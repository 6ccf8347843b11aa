//! The puzzle file model.
//!
//! A puzzle file holds the shape ids in placement order on its first line,
//! followed by one line per grid row:
//!
//! ```text
//! KF
//! K-KFF
//! KKKFF
//! ##--F
//! ```

use std::fmt;
use std::str::FromStr;

use rustc_hash::FxHashSet;

use crate::error::PuzzleError;
use crate::grid::{Cell, Grid};

/// A generated puzzle: the shapes placed, in order, and the resulting grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Puzzle {
    pub shapes: Vec<char>,
    pub grid: Grid,
}

impl Puzzle {
    /// The declared shape sequence as written on the first line.
    pub fn shape_line(&self) -> String {
        self.shapes.iter().collect()
    }

    /// Checks that the declared shapes and the grid's occupied cells agree.
    ///
    /// Every declared id must cover at least one cell, and every occupied
    /// cell must belong to a declared id.
    pub fn check_consistency(&self) -> Result<(), PuzzleError> {
        let declared: FxHashSet<char> = self.shapes.iter().copied().collect();
        let mut present = FxHashSet::default();

        for (_, _, cell) in self.grid.iter() {
            if let Cell::Occupied(id) = cell {
                if !declared.contains(&id) {
                    return Err(PuzzleError::UndeclaredShape(id));
                }
                present.insert(id);
            }
        }

        match self.shapes.iter().find(|id| !present.contains(id)) {
            Some(&missing) => Err(PuzzleError::MissingShape(missing)),
            None => Ok(()),
        }
    }
}

impl fmt::Display for Puzzle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.shape_line())?;
        write!(f, "{}", self.grid)
    }
}

impl FromStr for Puzzle {
    type Err = PuzzleError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let mut lines = text.lines();
        let shapes = lines.next().ok_or(PuzzleError::Empty)?.chars().collect();

        // blank lines after the last grid row are tolerated
        let mut grid_lines: Vec<&str> = lines.collect();
        let last = grid_lines.iter().rposition(|line| !line.is_empty());
        grid_lines.truncate(last.map_or(0, |last| last + 1));

        let mut rows: Vec<Vec<Cell>> = Vec::new();
        for (offset, line) in grid_lines.into_iter().enumerate() {
            // line 1 is the shape sequence
            let line_number = offset + 2;
            let row = line
                .chars()
                .enumerate()
                .map(|(column, symbol)| {
                    Cell::from_symbol(symbol).ok_or(PuzzleError::UnknownCell {
                        line: line_number,
                        column: column + 1,
                        symbol,
                    })
                })
                .collect::<Result<Vec<_>, _>>()?;

            if let Some(first) = rows.first() {
                if row.len() != first.len() {
                    return Err(PuzzleError::RaggedRow {
                        line: line_number,
                        expected: first.len(),
                        found: row.len(),
                    });
                }
            }
            rows.push(row);
        }

        if rows.is_empty() || rows[0].is_empty() {
            return Err(PuzzleError::MissingGrid);
        }

        Ok(Self {
            shapes,
            grid: Grid::from_rows(rows),
        })
    }
}
