//! The cut-set closure: the smallest set of arcs containing every move's
//! boundary circle and closed under every move's rotations.

use std::{collections::hash_map::Entry, mem};

use log::{debug, trace};
use rustc_hash::FxHashMap;

use crate::{geometry::Geometry, puzzle::Move};

/// Close the moves' boundary circles under the move group, grouped by
/// supporting circle.
///
/// The worklist fixed point: whatever part of a known cut lies strictly
/// inside a move's disk gets carried around by that move, and only coverage
/// never seen before is queued for the *other* moves to act on. Equal
/// circles (including dual representations on the sphere) collide in the
/// map, which is what makes the "seen before" test work.
///
/// Does not return for puzzles whose orbit is infinite.
pub(crate) fn grouped_cuts<G: Geometry>(moves: &[Move<G>]) -> Vec<G::ArcsOnCircle> {
    let mut all_cuts: FxHashMap<G::Circle, G::ArcsOnCircle> = FxHashMap::default();
    for a_move in moves {
        let circle = G::disk_circle(a_move.disk());
        all_cuts
            .entry(circle.clone())
            .or_insert_with(|| G::full_arcs(&circle));
    }

    // Per move, the cuts whose images it has not expanded yet. A move's own
    // circle starts closed under it, so it is left out of the snapshot.
    let mut pending: Vec<FxHashMap<G::Circle, G::ArcsOnCircle>> = moves
        .iter()
        .map(|a_move| {
            let own = G::disk_circle(a_move.disk());
            all_cuts
                .iter()
                .filter(|(circle, _)| **circle != own)
                .map(|(circle, arcs)| (circle.clone(), arcs.clone()))
                .collect()
        })
        .collect();

    let mut rounds: u64 = 0;
    while let Some(index) = pending.iter().position(|worklist| !worklist.is_empty()) {
        let worklist = mem::take(&mut pending[index]);
        let a_move = &moves[index];
        rounds += 1;
        trace!(
            "round {rounds}: expanding {} cut circles under move {index}",
            worklist.len(),
        );
        for arcs in worklist.into_values() {
            let inside = G::intersect_disk(&arcs, a_move.disk());
            if !G::non_empty(&inside) {
                // Entirely outside the disk interior: fixed by this move.
                continue;
            }
            let center = G::disk_center(a_move.disk());
            for angle in a_move.nonzero_angles() {
                let rotated = G::rotate_arcs(&inside, &center, angle);
                let circle = G::circle_of(&rotated).clone();
                let (merged, fresh) = match all_cuts.get(&circle) {
                    Some(existing) => (
                        G::same_circle_union(existing, &rotated),
                        G::same_circle_difference(&rotated, existing),
                    ),
                    None => (rotated.clone(), rotated.clone()),
                };
                all_cuts.insert(circle.clone(), merged);
                if !G::non_empty(&fresh) {
                    continue;
                }
                for (other_index, other_pending) in pending.iter_mut().enumerate() {
                    if other_index == index {
                        continue;
                    }
                    match other_pending.entry(circle.clone()) {
                        Entry::Occupied(mut slot) => {
                            let merged = G::same_circle_union(slot.get(), &fresh);
                            slot.insert(merged);
                        }
                        Entry::Vacant(slot) => {
                            slot.insert(fresh.clone());
                        }
                    }
                }
            }
        }
    }
    debug!(
        "cut set closed after {rounds} rounds: {} circles",
        all_cuts.len()
    );
    all_cuts.into_values().collect()
}
