//! Game field: settled grid, the active figure and collision checks

use crate::coord::Coord;
use crate::figure::{Figure, ShiftDirection};
use crate::tetromino::{FigureForm, TileColor};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info};

/// Field dimensions in cells
pub const COUNT_CELLS_X: usize = 10;
pub const COUNT_CELLS_Y: usize = 20;

/// A grid cell - either empty or settled with a color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Cell {
    #[default]
    Empty,
    Settled(TileColor),
}

impl Cell {
    pub fn is_settled(&self) -> bool {
        matches!(self, Cell::Settled(_))
    }
}

/// Result of one gravity step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FallOutcome {
    /// The figure moved down one row
    Fell,
    /// The figure could not fall and was locked into the grid
    Locked { rows_cleared: usize },
}

/// Everything a renderer needs for one frame
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub width: usize,
    pub height: usize,
    /// Stored as [row][col], row 0 is bottom
    pub cells: [[Cell; COUNT_CELLS_X]; COUNT_CELLS_Y],
    pub figure_cells: [Coord; 4],
    pub figure_color: TileColor,
    pub overfilled: bool,
}

impl Snapshot {
    /// Settled color at (x, y), Empty when out of range
    pub fn color(&self, x: i32, y: i32) -> Cell {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return Cell::Empty;
        }
        self.cells[y as usize][x as usize]
    }
}

pub struct GameField {
    /// Grid stored as [row][col], row 0 is bottom, row increases upward
    cells: [[Cell; COUNT_CELLS_X]; COUNT_CELLS_Y],
    /// The falling figure. Never merged into `cells` until lock-in.
    figure: Figure,
    rng: ChaCha8Rng,
    overfilled: bool,
}

impl GameField {
    /// Empty field with a first figure drawn from the seeded generator
    pub fn new(seed: u64) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let figure = Figure::spawn(FigureForm::random(&mut rng));
        debug!("First figure {:?}", figure.form());

        Self {
            cells: [[Cell::Empty; COUNT_CELLS_X]; COUNT_CELLS_Y],
            figure,
            rng,
            overfilled: false,
        }
    }

    pub fn figure(&self) -> &Figure {
        &self.figure
    }

    /// True once a freshly spawned figure overlapped settled cells
    pub fn is_overfilled(&self) -> bool {
        self.overfilled
    }

    /// Get the cell at (x, y).
    /// Returns None if out of bounds
    pub fn get(&self, x: i32, y: i32) -> Option<Cell> {
        if !Self::in_bounds(x, y) {
            return None;
        }
        Some(self.cells[y as usize][x as usize])
    }

    /// Settled color at (x, y), Empty outside the field
    pub fn color(&self, x: i32, y: i32) -> Cell {
        self.get(x, y).unwrap_or_default()
    }

    /// Set a cell. Returns false if out of bounds
    pub fn set(&mut self, x: i32, y: i32, cell: Cell) -> bool {
        if !Self::in_bounds(x, y) {
            return false;
        }
        self.cells[y as usize][x as usize] = cell;
        true
    }

    fn in_bounds(x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && x < COUNT_CELLS_X as i32 && y < COUNT_CELLS_Y as i32
    }

    /// A candidate cell set is valid when every cell is inside the field
    /// and not settled
    pub fn are_coords_valid(&self, coords: &[Coord]) -> bool {
        coords
            .iter()
            .all(|c| matches!(self.get(c.x, c.y), Some(Cell::Empty)))
    }

    /// Shift the figure one column if the target cells are free.
    /// Returns whether the shift was committed
    pub fn try_shift_figure(&mut self, direction: ShiftDirection) -> bool {
        if self.are_coords_valid(&self.figure.shifted_coords(direction)) {
            self.figure.shift(direction);
            true
        } else {
            false
        }
    }

    /// Rotate the figure counter-clockwise if the target cells are free.
    /// No kick offsets are tried
    pub fn try_rotate_figure(&mut self) -> bool {
        if self.are_coords_valid(&self.figure.rotated_coords()) {
            self.figure.rotate();
            true
        } else {
            false
        }
    }

    /// Gravity step: fall one row, or lock the figure, clear full rows and
    /// spawn the next figure
    pub fn let_fall_down(&mut self) -> FallOutcome {
        if self.are_coords_valid(&self.figure.fallen_coords()) {
            self.figure.fall();
            return FallOutcome::Fell;
        }

        self.lock_figure();
        let rows_cleared = self.clear_rows();
        if rows_cleared > 0 {
            debug!("Cleared {} rows", rows_cleared);
        }
        self.spawn_figure();

        FallOutcome::Locked { rows_cleared }
    }

    /// Copy the active figure's cells into the grid
    fn lock_figure(&mut self) {
        let color = self.figure.color();
        for c in self.figure.coords() {
            self.set(c.x, c.y, Cell::Settled(color));
        }
        debug!(
            "Locked {:?} {:?} at ({}, {})",
            self.figure.form(),
            self.figure.rotation(),
            self.figure.anchor().x,
            self.figure.anchor().y
        );
    }

    fn spawn_figure(&mut self) {
        let next = Figure::spawn(FigureForm::random(&mut self.rng));
        let blocked = next
            .coords()
            .iter()
            .any(|c| self.color(c.x, c.y).is_settled());
        if blocked && !self.overfilled {
            info!("Field overfilled: {:?} cannot spawn", next.form());
            self.overfilled = true;
        }
        debug!("Spawned {:?}", next.form());
        self.figure = next;
    }

    /// Remove full rows and compact the rest downward.
    /// Returns the number of rows removed
    pub fn clear_rows(&mut self) -> usize {
        let mut rows_cleared = 0;
        let mut write_row = 0;

        for read_row in 0..COUNT_CELLS_Y {
            if !self.is_row_full(read_row) {
                if write_row != read_row {
                    self.cells[write_row] = self.cells[read_row];
                }
                write_row += 1;
            } else {
                rows_cleared += 1;
            }
        }

        for row in write_row..COUNT_CELLS_Y {
            self.cells[row] = [Cell::Empty; COUNT_CELLS_X];
        }

        rows_cleared
    }

    fn is_row_full(&self, row: usize) -> bool {
        self.cells[row].iter().all(|cell| cell.is_settled())
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            width: COUNT_CELLS_X,
            height: COUNT_CELLS_Y,
            cells: self.cells,
            figure_cells: self.figure.coords(),
            figure_color: self.figure.color(),
            overfilled: self.overfilled,
        }
    }

    #[cfg(test)]
    pub(crate) fn set_figure(&mut self, figure: Figure) {
        self.figure = figure;
    }
}
