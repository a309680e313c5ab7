//! The seam between the engines and a concrete surface.
//!
//! Both engines (cut-set closure and face extraction) are generic over a
//! [`Geometry`] and monomorphize against it; nothing here is dispatched at
//! runtime. The associated types are immutable value types whose equality
//! and hashing must be *fuzzy-consistent*: values built from [`Fixed`]
//! components that compare equal must collide as hash keys, because the
//! closure engine groups cuts by circle identity in a hash map.

use std::{
    fmt::Debug,
    hash::{DefaultHasher, Hash, Hasher},
};

use circle_core::{Angle, Fixed, UnitArcs};

/// Hash a single value to a `u64`, for order-insensitive combined hashes
/// (dual circle representations, part boundary sets).
pub(crate) fn hash_one<T: Hash>(value: &T) -> u64 {
    let mut hasher = DefaultHasher::new();
    value.hash(&mut hasher);
    hasher.finish()
}

/// Where a point sits relative to a disk.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Containment {
    Inside,
    Boundary,
    Outside,
}

/// A plane-like surface: the Euclidean plane or the unit sphere.
pub trait Geometry: Clone + Debug + Sized + 'static {
    /// Whether the surface is closed. An isolated circle on a closed
    /// surface bounds a second, complementary face; in the plane the
    /// complement wraps around the outside and is not simply connected.
    const CLOSED_SURFACE: bool;

    type Point: Clone + Eq + Hash + Debug;
    type Circle: Clone + Eq + Hash + Debug;
    type Disk: Clone + PartialEq + Debug;
    type Arc: Clone + Eq + Hash + Debug;
    /// A subset of one circle: the supporting circle, an angular frame, and
    /// a [`UnitArcs`] in that frame.
    type ArcsOnCircle: Clone + Debug;

    fn disk_circle(disk: &Self::Disk) -> Self::Circle;
    fn disk_center(disk: &Self::Disk) -> Self::Point;
    fn classify(disk: &Self::Disk, point: &Self::Point) -> Containment;

    fn rotate_point(point: &Self::Point, center: &Self::Point, angle: &Angle) -> Self::Point;
    fn rotate_arc(arc: &Self::Arc, center: &Self::Point, angle: &Angle) -> Self::Arc;
    fn rotate_arcs(
        arcs: &Self::ArcsOnCircle,
        center: &Self::Point,
        angle: &Angle,
    ) -> Self::ArcsOnCircle;

    /// The whole boundary circle as an arc set.
    fn full_arcs(circle: &Self::Circle) -> Self::ArcsOnCircle;

    /// The boundary circle with nothing present.
    fn empty_arcs(circle: &Self::Circle) -> Self::ArcsOnCircle;

    /// The transverse intersection points of two circles: empty for
    /// non-intersecting (or identical) circles, one point for a tangency,
    /// two otherwise.
    fn circle_intersections(a: &Self::Circle, b: &Self::Circle) -> Vec<Self::Point>;

    fn circle_of(arcs: &Self::ArcsOnCircle) -> &Self::Circle;
    fn unit_arcs(arcs: &Self::ArcsOnCircle) -> &UnitArcs;
    fn non_empty(arcs: &Self::ArcsOnCircle) -> bool {
        Self::unit_arcs(arcs).non_empty()
    }

    /// Union with another arc set on an equal circle, expressed in `arcs`'s
    /// own frame.
    fn same_circle_union(
        arcs: &Self::ArcsOnCircle,
        other: &Self::ArcsOnCircle,
    ) -> Self::ArcsOnCircle;

    /// Difference against another arc set on an equal circle, expressed in
    /// `arcs`'s own frame.
    fn same_circle_difference(
        arcs: &Self::ArcsOnCircle,
        other: &Self::ArcsOnCircle,
    ) -> Self::ArcsOnCircle;

    /// The portion of `arcs` strictly inside `disk`.
    fn intersect_disk(arcs: &Self::ArcsOnCircle, disk: &Self::Disk) -> Self::ArcsOnCircle;

    /// The angle of a point lying on the supporting circle, in the set's
    /// frame.
    fn angle_of(arcs: &Self::ArcsOnCircle, point: &Self::Point) -> Fixed;

    /// Concrete arcs for every present span, cut at the given sorted angles.
    fn materialize(arcs: &Self::ArcsOnCircle, splits: &[Fixed]) -> Vec<Self::Arc>;

    fn arc_start(arc: &Self::Arc) -> Self::Point;
    fn arc_end(arc: &Self::Arc) -> Self::Point;
    fn arc_midpoint(arc: &Self::Arc) -> Self::Point;
    fn arc_is_full_circle(arc: &Self::Arc) -> bool;

    /// Merge two arcs on an equal circle that share an endpoint; `None` when
    /// they sit on different circles or do not meet end-to-start.
    fn join(a: &Self::Arc, b: &Self::Arc) -> Option<Self::Arc>;

    /// The sort key ordering arcs around their shared endpoint, for the arc's
    /// start (`starts_here`) or end.
    ///
    /// The first component is the tangent direction the arc *leaves* the
    /// point in, as a counterclockwise angle; the second breaks ties between
    /// tangent arcs by leftward curvature (an arc curving harder to the left
    /// sorts later). Walking from an entry to its cyclic successor at a point
    /// always stays on one face.
    fn incidence_key(arc: &Self::Arc, starts_here: bool) -> (Fixed, Fixed);
}
