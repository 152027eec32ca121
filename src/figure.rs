//! The active falling figure
//!
//! Every mutator has a pure preview twin. The field checks the preview
//! against the grid and only then commits, so a figure is never left
//! overlapping settled cells or outside the field.

use crate::coord::Coord;
use crate::field::{COUNT_CELLS_X, COUNT_CELLS_Y};
use crate::tetromino::{FigureForm, RotationMode, TileColor};

/// Horizontal shift direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShiftDirection {
    Left,
    Right,
}

impl ShiftDirection {
    fn dx(self) -> i32 {
        match self {
            ShiftDirection::Left => -1,
            ShiftDirection::Right => 1,
        }
    }
}

/// Where every new figure appears: top row, centered
pub const SPAWN_ANCHOR: Coord = Coord::new(COUNT_CELLS_X as i32 / 2 - 1, COUNT_CELLS_Y as i32 - 1);

#[derive(Debug, Clone)]
pub struct Figure {
    /// Reference point the mask generates cells from
    anchor: Coord,
    rotation: RotationMode,
    form: FigureForm,
}

impl Figure {
    pub fn new(anchor: Coord, rotation: RotationMode, form: FigureForm) -> Self {
        Self {
            anchor,
            rotation,
            form,
        }
    }

    /// A fresh figure at the spawn anchor in Normal rotation
    pub fn spawn(form: FigureForm) -> Self {
        Self::new(SPAWN_ANCHOR, RotationMode::Normal, form)
    }

    pub fn anchor(&self) -> Coord {
        self.anchor
    }

    pub fn rotation(&self) -> RotationMode {
        self.rotation
    }

    pub fn form(&self) -> FigureForm {
        self.form
    }

    pub fn color(&self) -> TileColor {
        self.form.color()
    }

    /// Cells covered right now
    pub fn coords(&self) -> [Coord; 4] {
        self.form.generate(self.anchor, self.rotation)
    }

    /// Cells after one counter-clockwise turn
    pub fn rotated_coords(&self) -> [Coord; 4] {
        self.form.generate(self.anchor, self.rotation.next())
    }

    pub fn rotate(&mut self) {
        self.rotation = self.rotation.next();
    }

    /// Cells after a one-column shift
    pub fn shifted_coords(&self, direction: ShiftDirection) -> [Coord; 4] {
        self.form
            .generate(self.anchor.offset(direction.dx(), 0), self.rotation)
    }

    pub fn shift(&mut self, direction: ShiftDirection) {
        self.anchor.translate(direction.dx(), 0);
    }

    /// Cells after dropping one row
    pub fn fallen_coords(&self) -> [Coord; 4] {
        self.form.generate(self.anchor.offset(0, -1), self.rotation)
    }

    pub fn fall(&mut self) {
        self.anchor.translate(0, -1);
    }
}
