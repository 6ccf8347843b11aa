//! Polyomino shape catalog.
//!
//! Each shape is a rectangular mask of filled and empty cells, identified by
//! a single character. The catalog is built at compile time and shared
//! read-only by the grid model and both generators.

/// Mask character marking a cell that is not part of the shape's footprint.
pub const TRANSPARENT: u8 = b'.';

/// Shape ids the run drivers sample from by default.
pub const DEFAULT_POOL: &str = "ACDFIJKLMN";

/// A fixed polyomino with its bounding box and occupancy mask.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Shape {
    pub id: char,
    pub height: usize,
    pub width: usize,
    /// Mask rows, top to bottom. Any byte other than `.` is filled.
    pub mask: &'static [&'static str],
    /// Number of filled cells, derived from `mask`.
    pub area: usize,
}

impl Shape {
    /// Creates a shape, deriving its dimensions and area from the mask.
    ///
    /// Panics at compile time on an empty or ragged mask, or one with no
    /// filled cells.
    pub const fn new(id: char, mask: &'static [&'static str]) -> Self {
        assert!(!mask.is_empty(), "shape mask has no rows");
        let width = mask[0].len();
        assert!(width > 0, "shape mask has no columns");

        let mut area = 0;
        let mut r = 0;
        while r < mask.len() {
            let row = mask[r].as_bytes();
            assert!(row.len() == width, "shape mask rows differ in width");
            let mut c = 0;
            while c < row.len() {
                if row[c] != TRANSPARENT {
                    area += 1;
                }
                c += 1;
            }
            r += 1;
        }
        assert!(area > 0, "shape mask has no filled cells");

        Self {
            id,
            height: mask.len(),
            width,
            mask,
            area,
        }
    }

    /// Returns whether the mask cell at `(row, col)` belongs to the footprint.
    #[inline]
    pub fn is_filled(&self, row: usize, col: usize) -> bool {
        self.mask[row].as_bytes()[col] != TRANSPARENT
    }

    /// Offsets of the filled mask cells, row-major.
    pub fn filled_cells(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        (0..self.height).flat_map(move |r| {
            (0..self.width)
                .filter(move |&c| self.is_filled(r, c))
                .map(move |c| (r, c))
        })
    }
}

/// Every shape in the catalog, ordered by id.
pub const ALL: &[Shape] = &[
    // vertical bar
    Shape::new('A', &["A", "A", "A", "A", "A"]),
    Shape::new('C', &["CC.", ".CC", ".C."]),
    Shape::new('D', &[".D", ".D", ".D", "DD"]),
    Shape::new('F', &["FF", "FF", ".F"]),
    Shape::new('I', &["I.", "I.", "II", ".I"]),
    Shape::new('J', &["JJJ", ".J.", ".J."]),
    // u-shape
    Shape::new('K', &["K.K", "KKK"]),
    Shape::new('L', &["..L", "..L", "LLL"]),
    Shape::new('M', &["..M", ".MM", "MM."]),
    // plus sign
    Shape::new('N', &[".N.", "NNN", ".N."]),
    Shape::new('O', &["O.", "OO", "O.", "O."]),
    Shape::new('Q', &[".QQ", ".Q.", "QQ."]),
];

/// Looks up a shape by id. Unknown ids yield `None`.
pub fn lookup(id: char) -> Option<&'static Shape> {
    ALL.iter().find(|shape| shape.id == id)
}

/// Area of the shape with the given id, or 0 for an unknown id.
pub fn area(id: char) -> usize {
    lookup(id).map_or(0, |shape| shape.area)
}

/// Returns whether `id` names a catalog shape.
pub fn is_shape_id(id: char) -> bool {
    lookup(id).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_shape_has_positive_area() {
        for shape in ALL {
            assert!(shape.area > 0, "shape {} has no area", shape.id);
            assert_eq!(shape.filled_cells().count(), shape.area);
        }
    }

    #[test]
    fn test_mask_characters_match_id() {
        for shape in ALL {
            for row in shape.mask {
                for ch in row.chars() {
                    assert!(
                        ch == '.' || ch == shape.id,
                        "shape {} has stray mask character {ch:?}",
                        shape.id
                    );
                }
            }
        }
    }

    #[test]
    fn test_catalog_ids_are_unique() {
        let mut ids: Vec<char> = ALL.iter().map(|shape| shape.id).collect();
        ids.dedup();
        assert_eq!(ids.len(), ALL.len());
        assert_eq!(ids.iter().collect::<String>(), "ACDFIJKLMNOQ");
    }

    #[test]
    fn test_unknown_id_is_a_no_op_shape() {
        assert_eq!(area('Z'), 0);
        assert!(lookup('Z').is_none());
        assert!(!is_shape_id('-'));
    }

    #[test]
    fn test_dimensions() {
        let a = lookup('A').unwrap();
        assert_eq!((a.height, a.width, a.area), (5, 1, 5));

        let k = lookup('K').unwrap();
        assert_eq!((k.height, k.width), (2, 3));
        assert!(!k.is_filled(0, 1));
        assert_eq!(
            k.filled_cells().collect::<Vec<_>>(),
            vec![(0, 0), (0, 2), (1, 0), (1, 1), (1, 2)]
        );
    }

    #[test]
    fn test_default_pool_is_in_catalog() {
        assert!(DEFAULT_POOL.chars().all(is_shape_id));
    }
}
