//! Grid representation and shape placement.
//!
//! The grid is a flat row-major vector of cells. A cell is empty, blocked,
//! or occupied by a shape, and is written with the same character the
//! puzzle file format uses.

use std::fmt;

use crate::shapes;

/// Character for an empty cell.
pub const EMPTY: char = '-';
/// Character for a blocked cell.
pub const BLOCKED: char = '#';

/// State of a single grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cell {
    Empty,
    Blocked,
    /// Covered by the shape with this id.
    Occupied(char),
}

impl Cell {
    /// The character this cell is written as.
    pub fn symbol(self) -> char {
        match self {
            Cell::Empty => EMPTY,
            Cell::Blocked => BLOCKED,
            Cell::Occupied(id) => id,
        }
    }

    /// Parses a cell character. Only catalog shape ids count as occupied.
    pub fn from_symbol(symbol: char) -> Option<Self> {
        match symbol {
            EMPTY => Some(Cell::Empty),
            BLOCKED => Some(Cell::Blocked),
            id if shapes::is_shape_id(id) => Some(Cell::Occupied(id)),
            _ => None,
        }
    }
}

/// A `rows x cols` matrix of cells.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    rows: usize,
    cols: usize,
    cells: Vec<Cell>,
}

impl Grid {
    /// Creates a grid with every cell empty.
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            cells: vec![Cell::Empty; rows * cols],
        }
    }

    /// Builds a grid from parsed rows. Rows must share one width.
    pub(crate) fn from_rows(rows: Vec<Vec<Cell>>) -> Self {
        let cols = rows.first().map_or(0, Vec::len);
        debug_assert!(rows.iter().all(|row| row.len() == cols));
        Self {
            rows: rows.len(),
            cols,
            cells: rows.into_iter().flatten().collect(),
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Total number of cells.
    pub fn area(&self) -> usize {
        self.cells.len()
    }

    #[inline(always)]
    fn index(&self, row: usize, col: usize) -> usize {
        row * self.cols + col
    }

    /// Returns the cell at `(row, col)`, or `None` when out of bounds.
    pub fn get(&self, row: usize, col: usize) -> Option<Cell> {
        if row < self.rows && col < self.cols {
            Some(self.cells[self.index(row, col)])
        } else {
            None
        }
    }

    /// Marks an empty cell as blocked. Occupied cells are left untouched.
    pub fn block(&mut self, row: usize, col: usize) {
        let idx = self.index(row, col);
        if self.cells[idx] == Cell::Empty {
            self.cells[idx] = Cell::Blocked;
        }
    }

    /// Checks whether `shape_id` can be anchored with its top-left corner at
    /// `(row, col)`.
    ///
    /// The bounding box must fit inside the grid and every filled mask cell
    /// must land on an empty grid cell. Unknown shape ids never fit.
    pub fn can_place(&self, shape_id: char, row: usize, col: usize) -> bool {
        let Some(shape) = shapes::lookup(shape_id) else {
            return false;
        };
        if row + shape.height > self.rows || col + shape.width > self.cols {
            return false;
        }
        shape
            .filled_cells()
            .all(|(dr, dc)| self.cells[self.index(row + dr, col + dc)] == Cell::Empty)
    }

    /// Writes `shape_id` into every filled mask cell anchored at `(row, col)`.
    ///
    /// The caller must have checked [`Grid::can_place`]; nothing is
    /// re-validated here. Unknown shape ids are ignored.
    pub fn place(&mut self, shape_id: char, row: usize, col: usize) {
        let Some(shape) = shapes::lookup(shape_id) else {
            return;
        };
        for (dr, dc) in shape.filled_cells() {
            let idx = self.index(row + dr, col + dc);
            self.cells[idx] = Cell::Occupied(shape_id);
        }
    }

    /// Iterates `(row, col, cell)` in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, Cell)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .map(move |(idx, &cell)| (idx / self.cols, idx % self.cols, cell))
    }

    /// Coordinates of every empty cell, row-major.
    pub fn empty_cells(&self) -> Vec<(usize, usize)> {
        self.iter()
            .filter(|&(_, _, cell)| cell == Cell::Empty)
            .map(|(r, c, _)| (r, c))
            .collect()
    }

    pub fn count_empty(&self) -> usize {
        self.cells.iter().filter(|&&c| c == Cell::Empty).count()
    }

    pub fn count_blocked(&self) -> usize {
        self.cells.iter().filter(|&&c| c == Cell::Blocked).count()
    }

    pub fn count_occupied(&self) -> usize {
        self.cells
            .iter()
            .filter(|c| matches!(c, Cell::Occupied(_)))
            .count()
    }

    /// True when every cell is covered by a shape.
    pub fn is_fully_covered(&self) -> bool {
        self.count_occupied() == self.area()
    }
}

/// One line per row, each terminated by a newline.
impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.cells.chunks(self.cols.max(1)) {
            let line: String = row.iter().map(|cell| cell.symbol()).collect();
            writeln!(f, "{line}")?;
        }
        Ok(())
    }
}
