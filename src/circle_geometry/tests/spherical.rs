//! End-to-end spherical scenarios.

use circle_core::fixed::{half_pi, Fixed};
use circle_geometry::{
    spherical::{Disk, Point, Sphere},
    Move, Puzzle,
};

/// A cube's face hemisphere (half turn) and vertex hemisphere (third turn).
/// Together they generate the rotation group of the tetrahedron, so the
/// orbit of the two great circles is the three coordinate great circles plus
/// the four diagonal ones, and the arrangement cuts each octant triangle
/// into a central triangle and three corners: 32 parts.
#[test_log::test]
fn cube_face_and_vertex_hemispheres() {
    let face = Move::<Sphere>::new(
        Disk::new(Point::new(Fixed::from(1), Fixed::ZERO, Fixed::ZERO), half_pi()),
        2,
    )
    .expect("increment is at least 2");
    let vertex = Move::<Sphere>::new(
        Disk::new(
            Point::unit(Fixed::from(1), Fixed::from(1), Fixed::from(1)),
            half_pi(),
        ),
        3,
    )
    .expect("increment is at least 2");
    let puzzle = Puzzle::new(&[face, vertex]);
    assert_eq!(puzzle.grouped_cuts().len(), 7);
    assert_eq!(puzzle.parts().len(), 32);
    let permutations = puzzle.part_permutations();
    assert_eq!(permutations.len(), 2);
    assert_eq!(permutations[0].order(), 2);
    assert_eq!(permutations[1].order(), 3);
    for (index, permutation) in permutations.iter().enumerate() {
        assert_eq!(permutation.element_count(), 32);
        let increment = puzzle.moves()[index].increment();
        let mut accumulated = circle_core::Permutation::identity(32);
        for _ in 0..increment {
            accumulated.compose(permutation);
        }
        assert!(accumulated.is_identity());
    }
}

/// A cap overlapping nothing cuts the sphere into its two caps and fixes
/// both.
#[test_log::test]
fn lone_cap_is_identity() {
    let cap = Move::<Sphere>::new(
        Disk::new(Point::new(Fixed::ZERO, Fixed::ZERO, Fixed::from(1)), Fixed::from(0.5)),
        3,
    )
    .expect("increment is at least 2");
    let puzzle = Puzzle::new(&[cap]);
    assert_eq!(puzzle.parts().len(), 2);
    assert_eq!(puzzle.permutation_strings(), ["[1,2]"]);
    assert!(puzzle.part_permutations()[0].is_identity());
}

/// Two half-turn caps meeting at right angles: the same puzzle expressed
/// with one disk's boundary circle in the dual representation must collide
/// in the cut map and give the same result.
#[test_log::test]
fn dedup_spans_equal_disks() {
    let cap = |x: i64, z: i64| {
        Move::<Sphere>::new(
            Disk::new(Point::unit(Fixed::from(x), Fixed::ZERO, Fixed::from(z)), half_pi()),
            2,
        )
        .expect("increment is at least 2")
    };
    let puzzle = Puzzle::new(&[cap(1, 0), cap(0, 1), cap(1, 0)]);
    assert_eq!(puzzle.moves().len(), 2);
    let permutations = puzzle.part_permutations();
    assert_eq!(permutations.len(), 2);
    for permutation in permutations {
        assert_eq!(permutation.order(), 2);
    }
}
