//! End-to-end planar scenarios.

use circle_core::Fixed;
use circle_geometry::{
    planar::{Circle, Plane, Point},
    Move, Puzzle,
};
use itertools::Itertools;

fn disk(x: f64, y: f64, radius: f64) -> Circle {
    Circle::new(Point::new(Fixed::from(x), Fixed::from(y)), Fixed::from(radius))
}

fn planar_move(x: f64, radius: f64, increment: u32) -> Move<Plane> {
    Move::new(disk(x, 0.0, radius), increment).expect("increment is at least 2")
}

/// Cycle lengths, sorted, as a relabeling-invariant fingerprint.
fn cycle_type(permutation: &circle_core::Permutation) -> Vec<usize> {
    permutation
        .cycles()
        .iter()
        .map(Vec::len)
        .sorted()
        .collect()
}

/// Two unit disks with centers one apart, each a half-turn. The closure adds
/// one mirrored circle per side, tangent to the opposite disk, and the plane
/// falls into eight parts: the lens, a sliver inside each disk, a cusped
/// piece above and below each tangency, and the unbounded face. Each move
/// swaps the lens with its sliver and the two cusped pieces of its own disk.
#[test_log::test]
fn mirrored_pair_of_half_turn_disks() {
    let puzzle = Puzzle::new(&[planar_move(0.0, 1.0, 2), planar_move(1.0, 1.0, 2)]);
    assert_eq!(puzzle.grouped_cuts().len(), 4);
    assert_eq!(puzzle.flat_cuts().len(), 14);
    assert_eq!(puzzle.parts().len(), 8);
    let permutations = puzzle.part_permutations();
    assert_eq!(permutations.len(), 2);
    for permutation in permutations {
        assert_eq!(permutation.element_count(), 8);
        assert_eq!(permutation.order(), 2);
        assert_eq!(cycle_type(permutation), vec![2, 2]);
        let mut squared = permutation.clone();
        squared.compose(permutation);
        assert!(squared.is_identity());
    }
}

/// The two-disk trisection puzzle: both permutations have order three and
/// cube to the identity.
#[test_log::test]
fn two_trisection_disks() {
    let puzzle = Puzzle::new(&[planar_move(-1.0, 2.5, 3), planar_move(1.0, 2.5, 3)]);
    let part_count = puzzle.parts().len();
    assert!(part_count > 2);
    let permutations = puzzle.part_permutations();
    assert_eq!(permutations.len(), 2);
    for permutation in permutations {
        assert_eq!(permutation.element_count(), part_count);
        assert_eq!(permutation.order(), 3);
        let mut cubed = permutation.clone();
        cubed.compose(permutation);
        cubed.compose(permutation);
        assert!(cubed.is_identity());
    }
    let strings = puzzle.permutation_strings();
    assert_eq!(strings.len(), 2);
    for string in strings {
        assert!(string.starts_with('[') && string.ends_with(']'));
        assert_eq!(string.matches(',').count(), part_count - 1);
    }
}

/// A disk that overlaps nothing cuts out one interior part and fixes it.
#[test_log::test]
fn lone_disk_is_identity() {
    let puzzle = Puzzle::new(&[planar_move(0.0, 1.0, 4)]);
    assert_eq!(puzzle.parts().len(), 1);
    assert_eq!(puzzle.permutation_strings(), ["[1]"]);
    assert!(puzzle.part_permutations()[0].is_identity());
}

#[test_log::test]
fn repeating_a_move_increment_times_is_the_identity() {
    let puzzle = Puzzle::new(&[planar_move(0.0, 1.0, 2), planar_move(1.0, 1.0, 2)]);
    for (index, permutation) in puzzle.part_permutations().iter().enumerate() {
        let increment = puzzle.moves()[index].increment();
        let mut accumulated = circle_core::Permutation::identity(permutation.element_count());
        for _ in 0..increment {
            accumulated.compose(permutation);
        }
        assert!(accumulated.is_identity());
    }
}

#[test_log::test]
fn duplicate_moves_are_deduplicated() {
    let once = Puzzle::new(&[planar_move(0.0, 1.0, 2), planar_move(1.0, 1.0, 2)]);
    let twice = Puzzle::new(&[
        planar_move(0.0, 1.0, 2),
        planar_move(1.0, 1.0, 2),
        planar_move(0.0, 1.0, 2),
    ]);
    assert_eq!(once.moves().len(), twice.moves().len());
    assert_eq!(once.permutation_strings(), twice.permutation_strings());
}

/// Rotating the whole puzzle rigidly must not change the permutation
/// structure, only (possibly) the part numbering.
#[test_log::test]
fn rotation_invariance_up_to_relabeling() {
    use circle_core::Angle;

    let original = Puzzle::new(&[planar_move(0.0, 1.0, 2), planar_move(1.0, 1.0, 2)]);
    let pivot = Point::new(Fixed::from(0.3), Fixed::from(0.5));
    let angle = Angle::from_radians(Fixed::from(0.7));
    let rotated_moves = original
        .moves()
        .iter()
        .map(|a_move| {
            let turned = Circle::new(a_move.disk().center.rotate(&pivot, &angle), a_move.disk().radius);
            Move::<Plane>::new(turned, a_move.increment()).expect("increment is unchanged")
        })
        .collect_vec();
    let rotated = Puzzle::new(&rotated_moves);
    assert_eq!(original.parts().len(), rotated.parts().len());
    for (ours, theirs) in original
        .part_permutations()
        .iter()
        .zip(rotated.part_permutations())
    {
        assert_eq!(cycle_type(ours), cycle_type(theirs));
    }
}
