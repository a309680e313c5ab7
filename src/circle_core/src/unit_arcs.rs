//! A boolean-valued set algebra on the unit circle modulo 2pi.
//!
//! The representation is a list of `(boundary, present)` entries: the first
//! boundary is always 0, boundaries increase strictly within `[0, 2pi)`, and
//! entry `i`'s flag covers the span from its boundary to the next one (the
//! last entry wraps back to 0). The set described is the topological closure
//! of the present spans, so an isolated boundary point is never
//! distinguishable from its neighbors.

use crate::fixed::{two_pi, Fixed};

#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub struct UnitArcs {
    entries: Vec<(Fixed, bool)>,
}

/// Drop every entry whose flag repeats its predecessor's. The leading
/// 0-boundary entry always survives.
fn simplify(entries: Vec<(Fixed, bool)>) -> Vec<(Fixed, bool)> {
    let mut out: Vec<(Fixed, bool)> = Vec::with_capacity(entries.len());
    for entry in entries {
        match out.last() {
            Some(last) if last.1 == entry.1 => {}
            _ => out.push(entry),
        }
    }
    out
}

impl UnitArcs {
    #[must_use]
    pub fn full_circle() -> UnitArcs {
        UnitArcs {
            entries: vec![(Fixed::ZERO, true)],
        }
    }

    #[must_use]
    pub fn empty() -> UnitArcs {
        UnitArcs {
            entries: vec![(Fixed::ZERO, false)],
        }
    }

    /// The closed arc running counterclockwise from `start` to `end`.
    /// Coincident endpoints mean the full circle.
    #[must_use]
    pub fn of(start: Fixed, end: Fixed) -> UnitArcs {
        let start = start.mod_two_pi();
        let end = end.mod_two_pi();
        let entries = if start == end {
            vec![(Fixed::ZERO, true)]
        } else if start.is_zero() {
            vec![(Fixed::ZERO, true), (end, false)]
        } else if end.is_zero() {
            vec![(Fixed::ZERO, false), (start, true)]
        } else if start < end {
            vec![(Fixed::ZERO, false), (start, true), (end, false)]
        } else {
            vec![(Fixed::ZERO, true), (end, false), (start, true)]
        };
        UnitArcs { entries }
    }

    #[must_use]
    pub fn entries(&self) -> &[(Fixed, bool)] {
        &self.entries
    }

    #[must_use]
    pub fn non_empty(&self) -> bool {
        self.entries.iter().any(|entry| entry.1)
    }

    /// Membership of an angle: the flag of the largest boundary at or below
    /// it. An angle at 0 (or indistinguishable from 2pi) is answered by the
    /// wrapping entry; boundary points are ambiguous under closure semantics
    /// anyway, so either neighbor's flag is a faithful answer there.
    #[must_use]
    pub fn contains(&self, angle: Fixed) -> bool {
        if angle.is_zero() || angle == two_pi() {
            return self.entries.last().expect("entry lists are non-empty").1;
        }
        let index = self.entries.partition_point(|entry| entry.0 <= angle);
        self.entries[index - 1].1
    }

    /// Membership in the represented *closed* set: like [`contains`], but an
    /// angle landing on a boundary belongs whenever either adjacent span is
    /// present. Cut arcs that terminate exactly on another circle are found
    /// by this and missed by the open-ended flag lookup.
    ///
    /// [`contains`]: UnitArcs::contains
    #[must_use]
    pub fn contains_closure(&self, angle: Fixed) -> bool {
        let entries = &self.entries;
        if angle.is_zero() || angle == two_pi() {
            return entries[entries.len() - 1].1 || entries[0].1;
        }
        let index = entries.partition_point(|entry| entry.0 <= angle);
        let at_or_below = entries[index - 1];
        if index >= 2 && at_or_below.0 == angle {
            return at_or_below.1 || entries[index - 2].1;
        }
        at_or_below.1
    }

    /// Shift the whole set counterclockwise by `by`.
    #[must_use]
    pub fn rotate(&self, by: Fixed) -> UnitArcs {
        let by = by.mod_two_pi();
        if by.is_zero() {
            return self.clone();
        }
        let tau = two_pi();
        // Shifted boundaries that pass 2pi wrap around to the front.
        let mut wrapped = Vec::new();
        let mut kept = Vec::with_capacity(self.entries.len());
        for &(boundary, present) in &self.entries {
            let shifted = boundary + by;
            if shifted >= tau {
                wrapped.push((shifted - tau, present));
            } else {
                kept.push((shifted, present));
            }
        }
        let mut entries = wrapped;
        entries.append(&mut kept);
        if entries[0].0.is_zero() {
            entries[0].0 = Fixed::ZERO;
        } else {
            let wrap_flag = entries.last().expect("entry lists are non-empty").1;
            entries.insert(0, (Fixed::ZERO, wrap_flag));
        }
        UnitArcs {
            entries: simplify(entries),
        }
    }

    /// Reflect the set through angle 0 (counterclockwise becomes clockwise).
    #[must_use]
    pub fn mirror(&self) -> UnitArcs {
        let n = self.entries.len();
        let mut entries = Vec::with_capacity(n);
        entries.push((Fixed::ZERO, self.entries[n - 1].1));
        for i in (1..n).rev() {
            entries.push((two_pi() - self.entries[i].0, self.entries[i - 1].1));
        }
        UnitArcs {
            entries: simplify(entries),
        }
    }

    /// The single two-way merge behind every boolean operation: walk both
    /// boundary lists in step, carrying each side's current flag, and emit
    /// every boundary from either list with the combined flag.
    fn merge(&self, other: &UnitArcs, keep: impl Fn(bool, bool) -> bool, simplified: bool) -> UnitArcs {
        let a = &self.entries;
        let b = &other.entries;
        let mut out = Vec::with_capacity(a.len() + b.len());
        let (mut i, mut j) = (0, 0);
        let mut flag_a = a[a.len() - 1].1;
        let mut flag_b = b[b.len() - 1].1;
        while i < a.len() || j < b.len() {
            let boundary = match (a.get(i), b.get(j)) {
                (Some(&(boundary_a, present_a)), Some(&(boundary_b, present_b))) => {
                    match boundary_a.cmp(&boundary_b) {
                        std::cmp::Ordering::Less => {
                            flag_a = present_a;
                            i += 1;
                            boundary_a
                        }
                        std::cmp::Ordering::Greater => {
                            flag_b = present_b;
                            j += 1;
                            boundary_b
                        }
                        std::cmp::Ordering::Equal => {
                            flag_a = present_a;
                            flag_b = present_b;
                            i += 1;
                            j += 1;
                            boundary_a
                        }
                    }
                }
                (Some(&(boundary_a, present_a)), None) => {
                    flag_a = present_a;
                    i += 1;
                    boundary_a
                }
                (None, Some(&(boundary_b, present_b))) => {
                    flag_b = present_b;
                    j += 1;
                    boundary_b
                }
                (None, None) => unreachable!(),
            };
            out.push((boundary, keep(flag_a, flag_b)));
        }
        UnitArcs {
            entries: if simplified { simplify(out) } else { out },
        }
    }

    #[must_use]
    pub fn union(&self, other: &UnitArcs) -> UnitArcs {
        self.merge(other, |a, b| a || b, true)
    }

    #[must_use]
    pub fn intersection(&self, other: &UnitArcs) -> UnitArcs {
        self.merge(other, |a, b| a && b, true)
    }

    #[must_use]
    pub fn difference(&self, other: &UnitArcs) -> UnitArcs {
        self.merge(other, |a, b| a && !b, true)
    }

    #[must_use]
    pub fn symmetric_difference(&self, other: &UnitArcs) -> UnitArcs {
        self.merge(other, |a, b| a != b, true)
    }

    /// Enumerate the present arcs as `(start, end)` pairs, cut additionally
    /// at each of `splits` (sorted, deduplicated angles).
    ///
    /// The splits are introduced as phantom boundaries by merging against an
    /// everywhere-absent list without simplifying, so a present span crossed
    /// by a split yields one pair per fragment. A single present span
    /// covering the whole circle with no splits comes back as `(0, 0)`; a
    /// span wrapping past 0 is rejoined unless 0 itself is a split.
    #[must_use]
    pub fn split_at_intersections(&self, splits: &[Fixed]) -> Vec<(Fixed, Fixed)> {
        debug_assert!(splits.windows(2).all(|pair| pair[0] < pair[1]));
        let zero_split = splits
            .iter()
            .any(|split| split.is_zero() || *split == two_pi());
        let mut phantom = vec![(Fixed::ZERO, false)];
        phantom.extend(
            splits
                .iter()
                .filter(|split| !split.is_zero() && **split != two_pi())
                .map(|&split| (split, false)),
        );
        let merged = self.merge(&UnitArcs { entries: phantom }, |present, _| present, false);
        let n = merged.entries.len();
        let mut arcs = Vec::new();
        for k in 0..n {
            if merged.entries[k].1 {
                arcs.push((merged.entries[k].0, merged.entries[(k + 1) % n].0));
            }
        }
        if arcs.len() >= 2 && merged.entries[0].1 && merged.entries[n - 1].1 && !zero_split {
            let first = arcs.remove(0);
            let last = arcs.last_mut().expect("two or more arcs");
            last.1 = first.1;
        }
        arcs
    }
}

#[cfg(test)]
mod tests {
    use super::UnitArcs;
    use crate::fixed::{half_pi, pi, two_pi, Fixed};

    fn assert_simplified(arcs: &UnitArcs) {
        let entries = arcs.entries();
        assert_eq!(entries[0].0, Fixed::ZERO);
        for pair in entries.windows(2) {
            assert!(pair[0].0 < pair[1].0);
            assert_ne!(pair[0].1, pair[1].1);
        }
    }

    #[test]
    fn construction() {
        assert!(UnitArcs::full_circle().non_empty());
        assert!(!UnitArcs::empty().non_empty());
        assert_eq!(UnitArcs::of(pi(), pi()), UnitArcs::full_circle());
        let quadrant = UnitArcs::of(Fixed::ZERO, half_pi());
        assert_simplified(&quadrant);
        assert!(quadrant.contains(half_pi() / Fixed::from(2)));
        assert!(!quadrant.contains(pi()));
    }

    #[test]
    fn wrapping_arc() {
        let wrapping = UnitArcs::of(three_quarters(), half_pi());
        assert_simplified(&wrapping);
        assert!(wrapping.contains(Fixed::ZERO));
        assert!(wrapping.contains(two_pi() - Fixed::from(0.1)));
        assert!(!wrapping.contains(pi()));
    }

    fn three_quarters() -> Fixed {
        pi() + half_pi()
    }

    #[test]
    fn boolean_algebra() {
        let a = UnitArcs::of(Fixed::ZERO, pi());
        let b = UnitArcs::of(half_pi(), three_quarters());
        assert_eq!(a.union(&b), b.union(&a));
        assert_eq!(a.union(&b), UnitArcs::of(Fixed::ZERO, three_quarters()));
        assert_eq!(a.intersection(&b), UnitArcs::of(half_pi(), pi()));
        assert_eq!(a.difference(&a), UnitArcs::empty());
        assert_eq!(a.intersection(&UnitArcs::full_circle()), a);
        assert_eq!(
            a.symmetric_difference(&b),
            UnitArcs::of(Fixed::ZERO, half_pi()).union(&UnitArcs::of(pi(), three_quarters()))
        );
        assert_simplified(&a.union(&b));
        assert_simplified(&a.difference(&b));
    }

    #[test]
    fn closure_membership_at_boundaries() {
        let quadrant = UnitArcs::of(half_pi(), pi());
        // The flag lookup is open-ended at a span's end...
        assert!(!quadrant.contains(pi()));
        // ...but the closed set owns both endpoints.
        assert!(quadrant.contains_closure(pi()));
        assert!(quadrant.contains_closure(half_pi()));
        assert!(!quadrant.contains_closure(half_pi() / Fixed::from(2)));
        let wrapping = UnitArcs::of(three_quarters(), half_pi());
        assert!(wrapping.contains_closure(Fixed::ZERO));
        assert!(!quadrant.contains_closure(Fixed::ZERO));
    }

    #[test]
    fn rotation() {
        let quadrant = UnitArcs::of(Fixed::ZERO, half_pi());
        let rotated = quadrant.rotate(pi());
        assert_eq!(rotated, UnitArcs::of(pi(), three_quarters()));
        assert_eq!(rotated.rotate(-pi()), quadrant);
        // rotating across the wrap point
        let late = UnitArcs::of(three_quarters(), two_pi() - Fixed::from(0.1));
        let wrapped = late.rotate(half_pi());
        assert_simplified(&wrapped);
        assert!(wrapped.contains(Fixed::from(0.2)));
        assert_eq!(quadrant.rotate(two_pi()), quadrant);
    }

    #[test]
    fn mirror() {
        let quadrant = UnitArcs::of(Fixed::ZERO, half_pi());
        let mirrored = quadrant.mirror();
        assert_simplified(&mirrored);
        assert_eq!(mirrored, UnitArcs::of(three_quarters(), two_pi()));
        assert_eq!(mirrored.mirror(), quadrant);
        assert_eq!(UnitArcs::full_circle().mirror(), UnitArcs::full_circle());
    }

    #[test]
    fn split_full_circle() {
        assert_eq!(
            UnitArcs::full_circle().split_at_intersections(&[]),
            vec![(Fixed::ZERO, Fixed::ZERO)]
        );
        let split = UnitArcs::full_circle().split_at_intersections(&[half_pi(), pi()]);
        assert_eq!(split, vec![(half_pi(), pi()), (pi(), half_pi())]);
    }

    #[test]
    fn split_wrapping_span() {
        // A span through 0 with no split there stays in one piece.
        let wrapping = UnitArcs::of(three_quarters(), half_pi());
        assert_eq!(
            wrapping.split_at_intersections(&[]),
            vec![(three_quarters(), half_pi())]
        );
        // With a split at 0 it breaks in two.
        assert_eq!(
            wrapping.split_at_intersections(&[Fixed::ZERO]),
            vec![(Fixed::ZERO, half_pi()), (three_quarters(), Fixed::ZERO)]
        );
    }

    #[test]
    fn split_introduces_phantom_boundaries() {
        let half = UnitArcs::of(Fixed::ZERO, pi());
        assert_eq!(
            half.split_at_intersections(&[half_pi()]),
            vec![(Fixed::ZERO, half_pi()), (half_pi(), pi())]
        );
        // splits in the absent span change nothing
        assert_eq!(
            half.split_at_intersections(&[three_quarters()]),
            vec![(Fixed::ZERO, pi())]
        );
    }

    #[test]
    fn split_round_trip() {
        let set = UnitArcs::of(Fixed::from(0.5), Fixed::from(2))
            .union(&UnitArcs::of(Fixed::from(4), Fixed::from(5)));
        let rebuilt = set
            .split_at_intersections(&[])
            .into_iter()
            .map(|(start, end)| UnitArcs::of(start, end))
            .fold(UnitArcs::empty(), |acc, arc| acc.union(&arc));
        assert_eq!(rebuilt, set);
    }
}
