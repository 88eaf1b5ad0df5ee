//! Game board representation, bounds-aware reads and row collapse

/// Standard board dimensions
pub const BOARD_WIDTH: usize = 10;
pub const BOARD_HEIGHT: usize = 20;

/// Cell value meaning "nothing here"
pub const EMPTY: u8 = 0;

/// What `read` returns outside the grid. Never equal to `EMPTY`, so an
/// out-of-bounds cell looks occupied to every occupancy check.
pub const OUT_OF_BOUNDS: i8 = -1;

/// The game board: 20 rows of 10 cells, row 0 at the top.
/// Each cell holds 0 for empty or the catalog id (1..=7) of the piece that filled it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Board {
    cells: [[u8; BOARD_WIDTH]; BOARD_HEIGHT],
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl Board {
    /// Create a new empty board
    pub fn new() -> Self {
        Self {
            cells: [[EMPTY; BOARD_WIDTH]; BOARD_HEIGHT],
        }
    }

    fn index(row: i32, col: i32) -> Option<(usize, usize)> {
        if row < 0 || col < 0 {
            return None;
        }
        let (row, col) = (row as usize, col as usize);
        if row >= BOARD_HEIGHT || col >= BOARD_WIDTH {
            return None;
        }
        Some((row, col))
    }

    /// Read a cell, returning `OUT_OF_BOUNDS` for coordinates off the grid
    pub fn read(&self, row: i32, col: i32) -> i8 {
        match Self::index(row, col) {
            Some((r, c)) => self.cells[r][c] as i8,
            None => OUT_OF_BOUNDS,
        }
    }

    pub fn is_free(&self, row: i32, col: i32) -> bool {
        self.read(row, col) == EMPTY as i8
    }

    /// Write a cell; writes off the grid are dropped
    pub fn set(&mut self, row: i32, col: i32, id: u8) {
        if let Some((r, c)) = Self::index(row, col) {
            self.cells[r][c] = id;
        }
    }

    /// Write the same id into every listed cell
    pub fn fill(&mut self, positions: &[(i32, i32)], id: u8) {
        for &(row, col) in positions {
            self.set(row, col, id);
        }
    }

    /// Rows top to bottom, for renderers
    pub fn rows(&self) -> &[[u8; BOARD_WIDTH]; BOARD_HEIGHT] {
        &self.cells
    }

    fn is_row_complete(&self, row: usize) -> bool {
        self.cells[row].iter().all(|&cell| cell != EMPTY)
    }

    /// Indices of every fully occupied row, top to bottom
    pub fn complete_rows(&self) -> Vec<usize> {
        (0..BOARD_HEIGHT)
            .filter(|&row| self.is_row_complete(row))
            .collect()
    }

    /// Remove complete rows and let everything above fall into the gaps.
    /// Returns the number of rows removed.
    pub fn collapse(&mut self) -> usize {
        let complete = self.complete_rows();
        if complete.is_empty() {
            return 0;
        }
        // Next destination, scanning upward from the bottom
        let mut write_row = BOARD_HEIGHT;

        for read_row in (0..BOARD_HEIGHT).rev() {
            if complete.contains(&read_row) {
                continue;
            }
            write_row -= 1;
            if write_row != read_row {
                self.cells[write_row] = self.cells[read_row];
            }
        }

        for row in 0..write_row {
            self.cells[row] = [EMPTY; BOARD_WIDTH];
        }

        complete.len()
    }

    /// Number of occupied cells
    pub fn occupied(&self) -> usize {
        self.cells
            .iter()
            .map(|row| row.iter().filter(|&&cell| cell != EMPTY).count())
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.occupied() == 0
    }
}
