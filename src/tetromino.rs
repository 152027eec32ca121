//! Figure forms, rotation states and shape masks
//!
//! A mask turns an anchor coordinate and a rotation state into the four grid
//! cells a figure covers. Offsets are (dx, dy) with y growing upward.

use crate::coord::Coord;
use rand::Rng;

/// Quarter-turn rotation states, in counter-clockwise order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RotationMode {
    #[default]
    Normal, // Spawn state
    FlipCcw, // One turn counter-clockwise
    Invert,  // Two turns
    FlipCw,  // Three turns counter-clockwise (one clockwise)
}

impl RotationMode {
    pub const ALL: [RotationMode; 4] = [
        RotationMode::Normal,
        RotationMode::FlipCcw,
        RotationMode::Invert,
        RotationMode::FlipCw,
    ];

    /// Number of counter-clockwise quarter-turns from Normal
    pub fn ordinal(self) -> usize {
        self as usize
    }

    /// The state one counter-clockwise quarter-turn further
    pub fn next(self) -> RotationMode {
        Self::ALL[(self.ordinal() + 1) % Self::ALL.len()]
    }
}

/// Display colors, independent of any rendering library
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TileColor {
    Aqua,
    Yellow,
    Purple,
    Green,
    Red,
    Blue,
    Orange,
}

/// The seven figure kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FigureForm {
    I, // Aqua - long bar
    O, // Yellow - square
    T, // Purple - T-shape
    S, // Green - S-shape
    Z, // Red - Z-shape
    J, // Blue - J-shape
    L, // Orange - L-shape
}

impl FigureForm {
    pub fn all() -> [FigureForm; 7] {
        [
            FigureForm::I,
            FigureForm::O,
            FigureForm::T,
            FigureForm::S,
            FigureForm::Z,
            FigureForm::J,
            FigureForm::L,
        ]
    }

    /// Uniform pick over all forms
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> FigureForm {
        let forms = Self::all();
        forms[rng.gen_range(0..forms.len())]
    }

    pub fn color(&self) -> TileColor {
        match self {
            FigureForm::I => TileColor::Aqua,
            FigureForm::O => TileColor::Yellow,
            FigureForm::T => TileColor::Purple,
            FigureForm::S => TileColor::Green,
            FigureForm::Z => TileColor::Red,
            FigureForm::J => TileColor::Blue,
            FigureForm::L => TileColor::Orange,
        }
    }

    /// Offsets of the four cells relative to the anchor.
    /// Normal layouts sit on the anchor row and the row below it, so a
    /// figure spawned on the top row is fully inside the field.
    pub fn offsets(&self, rotation: RotationMode) -> [(i32, i32); 4] {
        use RotationMode::*;

        match self {
            // Normal: IIII    FlipCcw: I
            //                          I
            //                          I
            //                          I
            FigureForm::I => match rotation {
                Normal => [(-1, 0), (0, 0), (1, 0), (2, 0)],
                FlipCcw => [(0, -1), (0, 0), (0, 1), (0, 2)],
                Invert => [(1, 0), (0, 0), (-1, 0), (-2, 0)],
                FlipCw => [(0, 1), (0, 0), (0, -1), (0, -2)],
            },
            // O does not change under rotation
            FigureForm::O => [(0, 0), (1, 0), (0, -1), (1, -1)],
            FigureForm::T => match rotation {
                Normal => [(-1, 0), (0, 0), (1, 0), (0, -1)],
                FlipCcw => [(0, -1), (0, 0), (0, 1), (1, 0)],
                Invert => [(1, 0), (0, 0), (-1, 0), (0, 1)],
                FlipCw => [(0, 1), (0, 0), (0, -1), (-1, 0)],
            },
            // Normal: .SS
            //         SS.
            FigureForm::S => match rotation {
                Normal => [(0, 0), (1, 0), (-1, -1), (0, -1)],
                FlipCcw => [(0, 0), (0, 1), (1, -1), (1, 0)],
                Invert => [(0, 0), (-1, 0), (1, 1), (0, 1)],
                FlipCw => [(0, 0), (0, -1), (-1, 1), (-1, 0)],
            },
            // Normal: ZZ.
            //         .ZZ
            FigureForm::Z => match rotation {
                Normal => [(-1, 0), (0, 0), (0, -1), (1, -1)],
                FlipCcw => [(0, -1), (0, 0), (1, 0), (1, 1)],
                Invert => [(1, 0), (0, 0), (0, 1), (-1, 1)],
                FlipCw => [(0, 1), (0, 0), (-1, 0), (-1, -1)],
            },
            FigureForm::J => match rotation {
                Normal => [(-1, 0), (0, 0), (1, 0), (1, -1)],
                FlipCcw => [(0, -1), (0, 0), (0, 1), (1, 1)],
                Invert => [(1, 0), (0, 0), (-1, 0), (-1, 1)],
                FlipCw => [(0, 1), (0, 0), (0, -1), (-1, -1)],
            },
            FigureForm::L => match rotation {
                Normal => [(-1, 0), (0, 0), (1, 0), (-1, -1)],
                FlipCcw => [(0, -1), (0, 0), (0, 1), (1, -1)],
                Invert => [(1, 0), (0, 0), (-1, 0), (1, 1)],
                FlipCw => [(0, 1), (0, 0), (0, -1), (-1, 1)],
            },
        }
    }

    /// The mask: concrete cells for an anchor in a rotation state
    pub fn generate(&self, anchor: Coord, rotation: RotationMode) -> [Coord; 4] {
        self.offsets(rotation).map(|(dx, dy)| anchor.offset(dx, dy))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use std::collections::HashSet;

    fn rotate_ccw((dx, dy): (i32, i32)) -> (i32, i32) {
        (-dy, dx)
    }

    #[test]
    fn test_next_is_a_four_cycle() {
        for start in RotationMode::ALL {
            let mut r = start;
            for _ in 0..4 {
                r = r.next();
            }
            assert_eq!(r, start);
        }
        assert_eq!(RotationMode::Normal.next(), RotationMode::FlipCcw);
        assert_eq!(RotationMode::FlipCcw.next(), RotationMode::Invert);
        assert_eq!(RotationMode::Invert.next(), RotationMode::FlipCw);
        assert_eq!(RotationMode::FlipCw.next(), RotationMode::Normal);
    }

    #[test]
    fn test_ordinals() {
        let ordinals: Vec<_> = RotationMode::ALL.iter().map(|r| r.ordinal()).collect();
        assert_eq!(ordinals, vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_masks_have_four_distinct_cells() {
        let anchor = Coord::new(4, 10);
        for form in FigureForm::all() {
            for rotation in RotationMode::ALL {
                let cells = form.generate(anchor, rotation);
                let unique: HashSet<_> = cells.iter().collect();
                assert_eq!(unique.len(), 4, "{:?} {:?}", form, rotation);
            }
        }
    }

    #[test]
    fn test_mask_stable_under_full_turn() {
        let anchor = Coord::new(-3, 7);
        for form in FigureForm::all() {
            for rotation in RotationMode::ALL {
                let turned = rotation.next().next().next().next();
                assert_eq!(form.generate(anchor, rotation), form.generate(anchor, turned));
            }
        }
    }

    #[test]
    fn test_each_table_is_ccw_turn_of_previous() {
        for form in FigureForm::all() {
            if form == FigureForm::O {
                continue;
            }
            for rotation in RotationMode::ALL {
                let expected: HashSet<_> =
                    form.offsets(rotation).iter().map(|&o| rotate_ccw(o)).collect();
                let actual: HashSet<_> = form.offsets(rotation.next()).into_iter().collect();
                assert_eq!(actual, expected, "{:?} {:?}", form, rotation);
            }
        }
    }

    #[test]
    fn test_normal_layout_stays_at_or_below_anchor() {
        for form in FigureForm::all() {
            for (_, dy) in form.offsets(RotationMode::Normal) {
                assert!(dy == 0 || dy == -1);
            }
        }
    }

    #[test]
    fn test_o_is_rotation_invariant() {
        let anchor = Coord::new(0, 1);
        let normal = FigureForm::O.generate(anchor, RotationMode::Normal);
        for rotation in RotationMode::ALL {
            assert_eq!(FigureForm::O.generate(anchor, rotation), normal);
        }
    }

    #[test]
    fn test_random_covers_every_form() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let seen: HashSet<_> = (0..500).map(|_| FigureForm::random(&mut rng)).collect();
        assert_eq!(seen.len(), 7);
    }
}
