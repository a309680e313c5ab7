//! The puzzle façade: moves in, permutation strings out.

use std::sync::OnceLock;

use circle_core::{fixed::two_pi, Angle, Fixed, Permutation};
use log::info;
use rustc_hash::FxHashMap;
use thiserror::Error;

use crate::{cuts, faces, faces::Part, geometry::Geometry};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PuzzleError {
    #[error("a move must have an increment of at least 2, got {0}")]
    IncrementTooSmall(u32),
    #[error(transparent)]
    Fixed(#[from] circle_core::FixedError),
}

/// An atomic rotation: the interior of `disk` turns counterclockwise by
/// `2pi / increment`.
#[derive(Clone, Debug)]
pub struct Move<G: Geometry> {
    disk: G::Disk,
    increment: u32,
    angle: Angle,
    nonzero_angles: Vec<Angle>,
}

impl<G: Geometry> Move<G> {
    /// # Errors
    ///
    /// The increment must be at least 2.
    pub fn new(disk: G::Disk, increment: u32) -> Result<Move<G>, PuzzleError> {
        if increment < 2 {
            return Err(PuzzleError::IncrementTooSmall(increment));
        }
        let step = two_pi() / Fixed::from(increment);
        Ok(Move {
            disk,
            increment,
            angle: Angle::from_radians(step),
            nonzero_angles: (1..increment)
                .map(|multiple| Angle::from_radians(step * Fixed::from(multiple)))
                .collect(),
        })
    }

    #[must_use]
    pub fn disk(&self) -> &G::Disk {
        &self.disk
    }

    #[must_use]
    pub fn increment(&self) -> u32 {
        self.increment
    }

    /// The rotation angle of a single application.
    #[must_use]
    pub fn angle(&self) -> &Angle {
        &self.angle
    }

    /// Every nontrivial multiple of the rotation angle.
    #[must_use]
    pub fn nonzero_angles(&self) -> &[Angle] {
        &self.nonzero_angles
    }
}

impl<G: Geometry> PartialEq for Move<G> {
    fn eq(&self, other: &Self) -> bool {
        self.disk == other.disk && self.increment == other.increment
    }
}

/// An immutable puzzle and its six derived views, each computed on first
/// access and memoized. The cut-set closure runs behind `grouped_cuts` (and
/// therefore behind everything downstream); it does not return for jumbling
/// puzzles.
#[derive(Debug)]
pub struct Puzzle<G: Geometry> {
    moves: Vec<Move<G>>,
    grouped_cuts: OnceLock<Vec<G::ArcsOnCircle>>,
    flat_cuts: OnceLock<Vec<G::Arc>>,
    parts: OnceLock<Vec<Part<G>>>,
    part_ids: OnceLock<FxHashMap<Part<G>, usize>>,
    part_permutations: OnceLock<Vec<Permutation>>,
    permutation_strings: OnceLock<Vec<String>>,
}

impl<G: Geometry> Puzzle<G> {
    /// Duplicate moves collapse to their first occurrence; declaration order
    /// is otherwise preserved.
    #[must_use]
    pub fn new(moves: &[Move<G>]) -> Puzzle<G> {
        let mut unique: Vec<Move<G>> = Vec::with_capacity(moves.len());
        for a_move in moves {
            if !unique.contains(a_move) {
                unique.push(a_move.clone());
            }
        }
        Puzzle {
            moves: unique,
            grouped_cuts: OnceLock::new(),
            flat_cuts: OnceLock::new(),
            parts: OnceLock::new(),
            part_ids: OnceLock::new(),
            part_permutations: OnceLock::new(),
            permutation_strings: OnceLock::new(),
        }
    }

    #[must_use]
    pub fn moves(&self) -> &[Move<G>] {
        &self.moves
    }

    /// The closed cut set, grouped by supporting circle.
    pub fn grouped_cuts(&self) -> &[G::ArcsOnCircle] {
        self.grouped_cuts
            .get_or_init(|| cuts::grouped_cuts(&self.moves))
    }

    /// The cut set as maximal arcs meeting only at their endpoints.
    pub fn flat_cuts(&self) -> &[G::Arc] {
        self.flat_cuts
            .get_or_init(|| faces::flatten::<G>(self.grouped_cuts()))
    }

    /// The connected faces of the arrangement.
    pub fn parts(&self) -> &[Part<G>] {
        self.parts
            .get_or_init(|| faces::extract_parts::<G>(self.flat_cuts()))
    }

    /// Each part's stable id in `[0, N)`.
    pub fn part_ids(&self) -> &FxHashMap<Part<G>, usize> {
        self.part_ids.get_or_init(|| {
            self.parts()
                .iter()
                .enumerate()
                .map(|(id, part)| (part.clone(), id))
                .collect()
        })
    }

    /// One permutation per move, in declaration order.
    pub fn part_permutations(&self) -> &[Permutation] {
        self.part_permutations.get_or_init(|| {
            let parts = self.parts();
            let ids = self.part_ids();
            let permutations = self
                .moves
                .iter()
                .map(|a_move| faces::part_permutation(parts, ids, a_move))
                .collect();
            info!(
                "{} parts, {} generator permutations",
                parts.len(),
                self.moves.len()
            );
            permutations
        })
    }

    /// The permutations in the 1-indexed bracket encoding, one string per
    /// move, ready for an external algebra system.
    pub fn permutation_strings(&self) -> &[String] {
        self.permutation_strings.get_or_init(|| {
            self.part_permutations()
                .iter()
                .map(Permutation::encode)
                .collect()
        })
    }
}

#[cfg(test)]
mod tests {
    use circle_core::Fixed;

    use super::{Move, Puzzle, PuzzleError};
    use crate::planar::{Circle, Plane, Point};

    fn disk(x: i64, radius: f64) -> Circle {
        Circle::new(Point::new(Fixed::from(x), Fixed::ZERO), Fixed::from(radius))
    }

    #[test]
    fn increment_must_be_at_least_two() {
        assert_eq!(
            Move::<Plane>::new(disk(0, 1.0), 1).unwrap_err(),
            PuzzleError::IncrementTooSmall(1)
        );
        assert!(Move::<Plane>::new(disk(0, 1.0), 2).is_ok());
    }

    #[test]
    fn move_angles() {
        let quarter = Move::<Plane>::new(disk(0, 1.0), 4).unwrap();
        assert_eq!(quarter.nonzero_angles().len(), 3);
        assert_eq!(
            quarter.angle().radians(),
            circle_core::fixed::half_pi()
        );
        assert_eq!(
            quarter.nonzero_angles()[2].radians(),
            circle_core::fixed::three_half_pi()
        );
    }

    #[test]
    fn duplicate_moves_collapse() {
        let a_move = Move::<Plane>::new(disk(0, 1.0), 3).unwrap();
        let puzzle = Puzzle::new(&[a_move.clone(), a_move.clone()]);
        assert_eq!(puzzle.moves().len(), 1);
        let other = Move::<Plane>::new(disk(3, 1.0), 3).unwrap();
        let puzzle = Puzzle::new(&[a_move.clone(), other, a_move]);
        assert_eq!(puzzle.moves().len(), 2);
    }
}
