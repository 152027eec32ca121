//! Grid coordinates

/// A cell position in grid units.
/// x grows rightward, y grows upward (row 0 is the bottom of the field).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Coord {
    pub x: i32,
    pub y: i32,
}

impl Coord {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Move this coordinate in place
    pub fn translate(&mut self, dx: i32, dy: i32) {
        self.x += dx;
        self.y += dy;
    }

    /// A new coordinate displaced by (dx, dy)
    pub const fn offset(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_translate_in_place() {
        let mut c = Coord::new(4, 19);
        c.translate(-1, 0);
        c.translate(0, -1);
        assert_eq!(c, Coord::new(3, 18));
    }

    #[test]
    fn test_offset_leaves_original() {
        let c = Coord::new(2, 2);
        let moved = c.offset(1, -2);
        assert_eq!(moved, Coord::new(3, 0));
        assert_eq!(c, Coord::new(2, 2));
    }
}
