//! From the closed cut set to parts and per-move part permutations.
//!
//! The cut arcs are flattened into maximal pieces meeting only at their
//! endpoints, every intersection point gets its incident arc ends arranged
//! in cyclic order, and faces are read off by repeatedly following "the next
//! arc counterclockwise" until each walk closes. A move's permutation then
//! falls out of rotating each part's boundary and looking the image up by
//! its canonical boundary set.

use std::{collections::BTreeMap, hash::{Hash, Hasher}, ops::Bound};

use circle_core::{Fixed, Permutation};
use log::debug;
use rustc_hash::FxHashMap;

use crate::{
    geometry::{hash_one, Containment, Geometry},
    puzzle::Move,
};

/// One connected face, held as its canonical boundary: no two adjacent arcs
/// share a supporting circle. Identity is the *set* of boundary arcs; the
/// traversal order and orientation the walk happened to use are ignored.
#[derive(Clone, Debug)]
pub struct Part<G: Geometry> {
    arcs: Vec<G::Arc>,
}

impl<G: Geometry> Part<G> {
    pub(crate) fn new(boundary: Vec<G::Arc>) -> Part<G> {
        Part {
            arcs: canonical_boundary::<G>(boundary),
        }
    }

    #[must_use]
    pub fn arcs(&self) -> &[G::Arc] {
        &self.arcs
    }
}

impl<G: Geometry> PartialEq for Part<G> {
    fn eq(&self, other: &Self) -> bool {
        self.arcs.len() == other.arcs.len()
            && self.arcs.iter().all(|arc| other.arcs.contains(arc))
    }
}

impl<G: Geometry> Eq for Part<G> {}

impl<G: Geometry> Hash for Part<G> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        // Order-insensitive: the sum of the element hashes.
        let combined = self
            .arcs
            .iter()
            .fold(0_u64, |acc, arc| acc.wrapping_add(hash_one(arc)));
        state.write_u64(combined);
    }
}

/// Fold adjacent coincident-circle arcs into single arcs, wrap-around
/// included. One forward pass cascades, then the seam between last and
/// first is folded until it stops.
fn canonical_boundary<G: Geometry>(arcs: Vec<G::Arc>) -> Vec<G::Arc> {
    let mut out: Vec<G::Arc> = Vec::with_capacity(arcs.len());
    for arc in arcs {
        match out.last_mut() {
            Some(last) => match G::join(last, &arc) {
                Some(joined) => *last = joined,
                None => out.push(arc),
            },
            None => out.push(arc),
        }
    }
    while out.len() >= 2 {
        match G::join(out.last().expect("non-empty"), &out[0]) {
            Some(joined) => {
                *out.last_mut().expect("non-empty") = joined;
                out.remove(0);
            }
            None => break,
        }
    }
    out
}

/// Split every grouped cut at its intersections with the other present cuts
/// and materialize concrete arcs.
pub(crate) fn flatten<G: Geometry>(grouped: &[G::ArcsOnCircle]) -> Vec<G::Arc> {
    let mut flat = Vec::new();
    for (index, arcs) in grouped.iter().enumerate() {
        let mut splits: Vec<Fixed> = Vec::new();
        for (other_index, other) in grouped.iter().enumerate() {
            if other_index == index {
                continue;
            }
            for crossing in G::circle_intersections(G::circle_of(arcs), G::circle_of(other)) {
                // Only crossings with *present* arcs of the other circle cut
                // this one; closure membership keeps T-junctions where a cut
                // terminates exactly here.
                if G::unit_arcs(other).contains_closure(G::angle_of(other, &crossing)) {
                    splits.push(G::angle_of(arcs, &crossing));
                }
            }
        }
        splits.sort_unstable();
        splits.dedup();
        flat.extend(G::materialize(arcs, &splits));
    }
    debug!("flattened cut set: {} arcs", flat.len());
    flat
}

type AdjacencySets<G> =
    FxHashMap<<G as Geometry>::Point, BTreeMap<(Fixed, Fixed), (usize, bool)>>;

/// Walk the arrangement into faces. Every non-degenerate arc is traversed
/// exactly twice, once per orientation, and contributes to exactly two
/// parts.
pub(crate) fn extract_parts<G: Geometry>(flat: &[G::Arc]) -> Vec<Part<G>> {
    let mut parts = Vec::new();
    let mut adjacency: AdjacencySets<G> = FxHashMap::default();
    for (id, arc) in flat.iter().enumerate() {
        if G::arc_is_full_circle(arc) {
            // An isolated circle bounds its interior by itself. On a closed
            // surface the complement is a second cap with the same boundary;
            // a planar complement is not simply connected and goes
            // unrecorded.
            parts.push(Part::new(vec![arc.clone()]));
            if G::CLOSED_SURFACE {
                parts.push(Part::new(vec![arc.clone()]));
            }
            continue;
        }
        adjacency
            .entry(G::arc_start(arc))
            .or_default()
            .insert(G::incidence_key(arc, true), (id, true));
        adjacency
            .entry(G::arc_end(arc))
            .or_default()
            .insert(G::incidence_key(arc, false), (id, false));
    }

    loop {
        // Any remaining entry seeds the next face.
        let Some((seed_point, seed_key, seed)) = adjacency
            .iter()
            .find(|(_, bucket)| !bucket.is_empty())
            .map(|(point, bucket)| {
                let (key, entry) = bucket.first_key_value().expect("bucket is non-empty");
                (point.clone(), *key, *entry)
            })
        else {
            break;
        };
        let mut boundary = vec![flat[seed.0].clone()];
        let (mut current, mut forwards) = seed;
        loop {
            // Step off the far endpoint of the current arc: its cyclic
            // successor there is the next arc of the same face.
            let arrival_point = if forwards {
                G::arc_end(&flat[current])
            } else {
                G::arc_start(&flat[current])
            };
            let arrival_key = G::incidence_key(&flat[current], !forwards);
            let bucket = adjacency
                .get_mut(&arrival_point)
                .expect("every arc endpoint has a bucket");
            let (next_key, next) = bucket
                .range((Bound::Excluded(arrival_key), Bound::Unbounded))
                .next()
                .or_else(|| bucket.iter().next())
                .map(|(key, entry)| (*key, *entry))
                .expect("the arrival entry itself is still present");
            if next == seed {
                // Closed up; only now may the seed entry be consumed.
                adjacency
                    .get_mut(&seed_point)
                    .expect("the seed bucket exists")
                    .remove(&seed_key);
                break;
            }
            bucket.remove(&next_key);
            boundary.push(flat[next.0].clone());
            (current, forwards) = next;
        }
        parts.push(Part::new(boundary));
    }
    debug!("extracted {} parts", parts.len());
    parts
}

/// Does the move's disk carry this part along when it turns?
fn rotated_by<G: Geometry>(part: &Part<G>, a_move: &Move<G>) -> bool {
    let inside = |point: &G::Point| G::classify(a_move.disk(), point) == Containment::Inside;
    match part.arcs.len() {
        0 => false,
        // A lone boundary circle: probe its anchor point.
        1 => inside(&G::arc_start(&part.arcs[0])),
        // Two arcs meet at two points that may both lie on the disk
        // boundary; the midpoints decide.
        2 => part.arcs.iter().any(|arc| inside(&G::arc_midpoint(arc))),
        // With three or more arcs, the part is carried iff some boundary
        // vertex is strictly inside.
        _ => part
            .arcs
            .iter()
            .any(|arc| inside(&G::arc_start(arc)) || inside(&G::arc_end(arc))),
    }
}

/// The permutation a move induces on the numbered parts.
pub(crate) fn part_permutation<G: Geometry>(
    parts: &[Part<G>],
    ids: &FxHashMap<Part<G>, usize>,
    a_move: &Move<G>,
) -> Permutation {
    let center = G::disk_center(a_move.disk());
    let mapping = parts
        .iter()
        .enumerate()
        .map(|(id, part)| {
            if !rotated_by(part, a_move) {
                return id;
            }
            let image = Part::new(
                part.arcs
                    .iter()
                    .map(|arc| G::rotate_arc(arc, &center, a_move.angle()))
                    .collect(),
            );
            *ids.get(&image)
                .expect("the cut set is closed, so every part's image is a part")
        })
        .collect();
    Permutation::from_mapping(mapping)
}

#[cfg(test)]
mod tests {
    use circle_core::Fixed;
    use itertools::Itertools;

    use super::{extract_parts, flatten, Part};
    use crate::{
        geometry::Geometry,
        planar::{Circle, Plane, Point},
    };

    fn two_overlapping_unit_circles() -> Vec<<Plane as Geometry>::ArcsOnCircle> {
        vec![
            Plane::full_arcs(&Circle::new(Point::new(Fixed::ZERO, Fixed::ZERO), Fixed::from(1))),
            Plane::full_arcs(&Circle::new(Point::new(Fixed::from(1), Fixed::ZERO), Fixed::from(1))),
        ]
    }

    #[test]
    fn flatten_splits_at_crossings() {
        let flat = flatten::<Plane>(&two_overlapping_unit_circles());
        // Each circle breaks into its inner and outer arc.
        assert_eq!(flat.len(), 4);
        assert!(flat.iter().all(|arc| !Plane::arc_is_full_circle(arc)));
    }

    #[test]
    fn two_circles_make_four_faces() {
        let flat = flatten::<Plane>(&two_overlapping_unit_circles());
        let parts = extract_parts::<Plane>(&flat);
        // Lens, two crescents, and the unbounded face.
        assert_eq!(parts.len(), 4);
        assert!(parts.iter().all_unique());
        // Every face here is bounded by one arc of each circle.
        assert_eq!(parts.iter().filter(|part| part.arcs().len() == 2).count(), 4);
        // Every flattened arc lies on exactly two part boundaries.
        for arc in &flat {
            let bounded = parts
                .iter()
                .filter(|part| part.arcs().contains(arc))
                .count();
            assert_eq!(bounded, 2);
        }
    }

    #[test]
    fn isolated_circle_bounds_its_interior() {
        let lone = vec![Plane::full_arcs(&Circle::new(
            Point::new(Fixed::from(5), Fixed::from(5)),
            Fixed::from(1),
        ))];
        let flat = flatten::<Plane>(&lone);
        assert_eq!(flat.len(), 1);
        assert!(Plane::arc_is_full_circle(&flat[0]));
        let parts = extract_parts::<Plane>(&flat);
        assert_eq!(parts.len(), 1);
        assert_eq!(parts[0].arcs().len(), 1);
    }

    #[test]
    fn isolated_circle_on_the_sphere_bounds_both_caps() {
        use crate::spherical::{self, Sphere};

        let lone = vec![Sphere::full_arcs(&spherical::Circle::new(
            spherical::Point::new(Fixed::ZERO, Fixed::ZERO, Fixed::from(1)),
            Fixed::from(0.5),
        ))];
        let flat = flatten::<Sphere>(&lone);
        assert_eq!(flat.len(), 1);
        let parts = extract_parts::<Sphere>(&flat);
        // The interior cap and the complementary cap; they share their one
        // boundary circle, so as parts they compare equal.
        assert_eq!(parts.len(), 2);
        assert!(parts.iter().all(|part| part.arcs().len() == 1));
        assert_eq!(parts[0], parts[1]);
    }

    #[test]
    fn part_identity_ignores_orientation_and_order() {
        let flat = flatten::<Plane>(&two_overlapping_unit_circles());
        assert_eq!(flat.len(), 4);
        let forwards = Part::<Plane>::new(vec![flat[0].clone(), flat[2].clone()]);
        let backwards = Part::<Plane>::new(vec![flat[2].clone(), flat[0].clone()]);
        assert_eq!(forwards, backwards);
        let different = Part::<Plane>::new(vec![flat[0].clone(), flat[3].clone()]);
        assert_ne!(forwards, different);
    }

    #[test]
    fn canonical_boundary_folds_split_arcs() {
        // A full circle split in three, handed over as three arcs, folds
        // back to the single full-circle arc.
        let circle = Circle::new(Point::new(Fixed::ZERO, Fixed::ZERO), Fixed::from(2));
        let arcs = Plane::materialize(
            &Plane::full_arcs(&circle),
            &[Fixed::from(1), Fixed::from(2), Fixed::from(4)],
        );
        assert_eq!(arcs.len(), 3);
        let part = Part::<Plane>::new(arcs);
        assert_eq!(part.arcs().len(), 1);
        assert!(Plane::arc_is_full_circle(&part.arcs()[0]));
    }
}
