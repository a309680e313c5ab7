//! The unit sphere.
//!
//! A circle here is the locus at angular distance `radius` from a center
//! point, which makes every circle describable two ways: `(c, r)` and its
//! dual `(-c, pi - r)`. Equality and hashing treat the two as one circle,
//! while orientation-sensitive structures (arcs, angular frames) keep the
//! stored representation, whose center always lies to the left of
//! counterclockwise travel.

use std::{
    cmp::Ordering,
    hash::{Hash, Hasher},
    ops::{Add, Mul, Neg, Sub},
};

use circle_core::{
    fixed::{self, Fixed},
    Angle, UnitArcs,
};

use crate::geometry::{hash_one, Containment, Geometry};

/// A point on the sphere; also used as a free vector by the internal math.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub struct Point {
    pub x: Fixed,
    pub y: Fixed,
    pub z: Fixed,
}

impl Point {
    #[must_use]
    pub fn new(x: impl Into<Fixed>, y: impl Into<Fixed>, z: impl Into<Fixed>) -> Point {
        Point {
            x: x.into(),
            y: y.into(),
            z: z.into(),
        }
    }

    /// The unit-sphere point in the direction of `(x, y, z)`.
    ///
    /// # Panics
    ///
    /// The vector must not be zero.
    #[must_use]
    pub fn unit(x: impl Into<Fixed>, y: impl Into<Fixed>, z: impl Into<Fixed>) -> Point {
        Point::new(x, y, z).normalize()
    }

    #[must_use]
    pub fn dot(&self, other: &Point) -> Fixed {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    #[must_use]
    pub fn cross(&self, other: &Point) -> Point {
        Point {
            x: self.y * other.z - self.z * other.y,
            y: self.z * other.x - self.x * other.z,
            z: self.x * other.y - self.y * other.x,
        }
    }

    #[must_use]
    pub fn norm_squared(&self) -> Fixed {
        self.dot(self)
    }

    /// # Panics
    ///
    /// The vector must not be zero.
    #[must_use]
    pub fn normalize(&self) -> Point {
        let norm = self.norm_squared().sqrt();
        assert!(!norm.is_zero(), "cannot normalize a zero vector");
        Point {
            x: self.x / norm,
            y: self.y / norm,
            z: self.z / norm,
        }
    }

    /// The component of `self` perpendicular to the unit vector `axis`.
    fn reject_from(&self, axis: &Point) -> Point {
        self.clone() - axis.clone() * self.dot(axis)
    }
}

impl Add for Point {
    type Output = Point;

    fn add(self, rhs: Point) -> Point {
        Point {
            x: self.x + rhs.x,
            y: self.y + rhs.y,
            z: self.z + rhs.z,
        }
    }
}

impl Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        Point {
            x: self.x - rhs.x,
            y: self.y - rhs.y,
            z: self.z - rhs.z,
        }
    }
}

impl Mul<Fixed> for Point {
    type Output = Point;

    fn mul(self, rhs: Fixed) -> Point {
        Point {
            x: self.x * rhs,
            y: self.y * rhs,
            z: self.z * rhs,
        }
    }
}

impl Neg for Point {
    type Output = Point;

    fn neg(self) -> Point {
        Point {
            x: -self.x,
            y: -self.y,
            z: -self.z,
        }
    }
}

/// The counterclockwise angle about the unit vector `pivot` from `from` to
/// `to`, both projected onto the plane perpendicular to `pivot`.
fn ccw_angle(pivot: &Point, from: &Point, to: &Point) -> Fixed {
    let a = from.reject_from(pivot);
    let b = to.reject_from(pivot);
    let norms = (a.norm_squared() * b.norm_squared()).sqrt();
    if norms.is_zero() {
        // One of the directions is (anti)parallel to the pivot; no angle is
        // defined and callers keep such configurations away from here.
        return Fixed::ZERO;
    }
    let convex = (a.dot(&b) / norms).acos();
    if a.cross(&b).dot(pivot).cmp_zero() == Ordering::Less {
        (fixed::two_pi() - convex).mod_two_pi()
    } else {
        convex
    }
}

/// A deterministic tangent direction at `point`: the coordinate axis least
/// aligned with it, rejected onto the tangent plane. Fuzzy-equal points pick
/// the same axis, so keys computed at one intersection point are comparable.
fn reference_direction(point: &Point) -> Point {
    let axes = [
        Point::new(Fixed::from(1), Fixed::ZERO, Fixed::ZERO),
        Point::new(Fixed::ZERO, Fixed::from(1), Fixed::ZERO),
        Point::new(Fixed::ZERO, Fixed::ZERO, Fixed::from(1)),
    ];
    let axis = axes
        .iter()
        .min_by_key(|axis| point.dot(axis).abs())
        .expect("three candidate axes")
        .clone();
    axis.reject_from(point)
}

#[derive(Clone, Debug)]
pub struct Circle {
    pub center: Point,
    pub radius: Fixed,
}

impl Circle {
    /// # Panics
    ///
    /// The radius must lie strictly between 0 and pi.
    #[must_use]
    pub fn new(center: Point, radius: impl Into<Fixed>) -> Circle {
        let radius = radius.into();
        assert!(radius.cmp_zero() == Ordering::Greater && radius < fixed::pi());
        Circle {
            center: center.normalize(),
            radius,
        }
    }

    /// The other representation of the same circle.
    #[must_use]
    pub fn dual(&self) -> Circle {
        Circle {
            center: -self.center.clone(),
            radius: fixed::pi() - self.radius,
        }
    }

    /// A deterministic point on the circle.
    fn any_point(&self) -> Point {
        let tangent = reference_direction(&self.center);
        let around = self.center.cross(&tangent).normalize();
        self.center.clone() * self.radius.cos() + around * self.radius.sin()
    }
}

impl PartialEq for Circle {
    fn eq(&self, other: &Self) -> bool {
        let direct = self.center == other.center && self.radius == other.radius;
        direct || {
            let dual = other.dual();
            self.center == dual.center && self.radius == dual.radius
        }
    }
}

impl Eq for Circle {}

impl Hash for Circle {
    fn hash<H: Hasher>(&self, state: &mut H) {
        // Both representations must collide as keys, so hash the sum of the
        // two representation hashes.
        let dual = self.dual();
        let forward = hash_one(&(&self.center, self.radius));
        let reverse = hash_one(&(&dual.center, dual.radius));
        state.write_u64(forward.wrapping_add(reverse));
    }
}

/// One side of a circle: the cap of points within `radius` of `center`. The
/// dual pair is *not* identified here, because the two describe different
/// caps.
#[derive(Clone, PartialEq, Debug)]
pub struct Disk {
    pub center: Point,
    pub radius: Fixed,
}

impl Disk {
    /// # Panics
    ///
    /// The radius must lie strictly between 0 and pi.
    #[must_use]
    pub fn new(center: Point, radius: impl Into<Fixed>) -> Disk {
        let radius = radius.into();
        assert!(radius.cmp_zero() == Ordering::Greater && radius < fixed::pi());
        Disk {
            center: center.normalize(),
            radius,
        }
    }
}

/// A counterclockwise arc about the stored circle's center from `start` to
/// `end`; coincident endpoints mean the full circle. The reversed arc on the
/// dual circle is the same arc.
#[derive(Clone, Debug)]
pub struct Arc {
    pub circle: Circle,
    pub start: Point,
    pub end: Point,
}

impl PartialEq for Arc {
    fn eq(&self, other: &Self) -> bool {
        let direct = self.circle.center == other.circle.center
            && self.circle.radius == other.circle.radius
            && self.start == other.start
            && self.end == other.end;
        direct || {
            let dual = other.circle.dual();
            self.circle.center == dual.center
                && self.circle.radius == dual.radius
                && self.start == other.end
                && self.end == other.start
        }
    }
}

impl Eq for Arc {}

impl Hash for Arc {
    fn hash<H: Hasher>(&self, state: &mut H) {
        let dual = self.circle.dual();
        let forward = hash_one(&(&self.circle.center, self.circle.radius, &self.start, &self.end));
        let reverse = hash_one(&(&dual.center, dual.radius, &self.end, &self.start));
        state.write_u64(forward.wrapping_add(reverse));
    }
}

/// A subset of one circle. `zero` is the point on the circle where angles
/// are measured from, counterclockwise about the stored center.
#[derive(Clone, Debug)]
pub struct ArcsOnCircle {
    pub circle: Circle,
    pub zero: Point,
    pub arcs: UnitArcs,
}

impl ArcsOnCircle {
    /// The point at `angle` in this set's frame.
    fn point_at(&self, angle: Fixed) -> Point {
        Sphere::rotate_point(&self.zero, &self.circle.center, &Angle::from_radians(angle))
    }

    /// Re-express another set on an equal circle in this set's frame:
    /// mirror if the representations are opposite (the two directions of
    /// travel disagree), then rotate by where the other frame's zero sits in
    /// this frame.
    fn transported(&self, other: &ArcsOnCircle) -> UnitArcs {
        let same_representation = self.circle.center == other.circle.center;
        debug_assert!(same_representation || self.circle == other.circle);
        let base = if same_representation {
            other.arcs.clone()
        } else {
            other.arcs.mirror()
        };
        base.rotate(Sphere::angle_of(self, &other.zero))
    }
}

/// The unit sphere as a [`Geometry`].
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Sphere;

impl Geometry for Sphere {
    const CLOSED_SURFACE: bool = true;

    type Point = Point;
    type Circle = Circle;
    type Disk = Disk;
    type Arc = Arc;
    type ArcsOnCircle = ArcsOnCircle;

    fn disk_circle(disk: &Disk) -> Circle {
        Circle {
            center: disk.center.clone(),
            radius: disk.radius,
        }
    }

    fn disk_center(disk: &Disk) -> Point {
        disk.center.clone()
    }

    fn classify(disk: &Disk, point: &Point) -> Containment {
        // Angular distance below the radius means cosine above its cosine.
        match disk.center.dot(point).cmp(&disk.radius.cos()) {
            Ordering::Greater => Containment::Inside,
            Ordering::Equal => Containment::Boundary,
            Ordering::Less => Containment::Outside,
        }
    }

    /// Rodrigues' formula about the unit axis `center`.
    fn rotate_point(point: &Point, center: &Point, angle: &Angle) -> Point {
        let (sin, cos) = (angle.sin(), angle.cos());
        point.clone() * cos
            + center.cross(point) * sin
            + center.clone() * (center.dot(point) * (Fixed::from(1) - cos))
    }

    fn rotate_arc(arc: &Arc, center: &Point, angle: &Angle) -> Arc {
        Arc {
            circle: Circle {
                center: Self::rotate_point(&arc.circle.center, center, angle),
                radius: arc.circle.radius,
            },
            start: Self::rotate_point(&arc.start, center, angle),
            end: Self::rotate_point(&arc.end, center, angle),
        }
    }

    fn rotate_arcs(arcs: &ArcsOnCircle, center: &Point, angle: &Angle) -> ArcsOnCircle {
        // The frame anchor rides along, so the unit arcs are untouched.
        ArcsOnCircle {
            circle: Circle {
                center: Self::rotate_point(&arcs.circle.center, center, angle),
                radius: arcs.circle.radius,
            },
            zero: Self::rotate_point(&arcs.zero, center, angle),
            arcs: arcs.arcs.clone(),
        }
    }

    fn full_arcs(circle: &Circle) -> ArcsOnCircle {
        ArcsOnCircle {
            circle: circle.clone(),
            zero: circle.any_point(),
            arcs: UnitArcs::full_circle(),
        }
    }

    fn empty_arcs(circle: &Circle) -> ArcsOnCircle {
        ArcsOnCircle {
            circle: circle.clone(),
            zero: circle.any_point(),
            arcs: UnitArcs::empty(),
        }
    }

    /// Intersections as `x0 +- t (c1 x c2)` where `x0 = a c1 + b c2` solves
    /// the two cosine constraints in the span of the centers.
    fn circle_intersections(a: &Circle, b: &Circle) -> Vec<Point> {
        let q = a.center.dot(&b.center);
        let spread = Fixed::from(1) - q * q;
        if spread.cmp_zero() != Ordering::Greater {
            // Equal or antipodal centers: coaxial circles never cross
            // transversely.
            return vec![];
        }
        let cos_a = a.radius.cos();
        let cos_b = b.radius.cos();
        let along_a = (cos_a - q * cos_b) / spread;
        let along_b = (cos_b - q * cos_a) / spread;
        let base = a.center.clone() * along_a + b.center.clone() * along_b;
        let remainder = Fixed::from(1) - base.norm_squared();
        match remainder.cmp_zero() {
            Ordering::Less => vec![],
            Ordering::Equal => vec![base.normalize()],
            Ordering::Greater => {
                let axis = a.center.cross(&b.center);
                let t = (remainder / axis.norm_squared()).sqrt();
                vec![
                    base.clone() + axis.clone() * t,
                    base - axis * t,
                ]
            }
        }
    }

    fn circle_of(arcs: &ArcsOnCircle) -> &Circle {
        &arcs.circle
    }

    fn unit_arcs(arcs: &ArcsOnCircle) -> &UnitArcs {
        &arcs.arcs
    }

    fn same_circle_union(arcs: &ArcsOnCircle, other: &ArcsOnCircle) -> ArcsOnCircle {
        ArcsOnCircle {
            circle: arcs.circle.clone(),
            zero: arcs.zero.clone(),
            arcs: arcs.arcs.union(&arcs.transported(other)),
        }
    }

    fn same_circle_difference(arcs: &ArcsOnCircle, other: &ArcsOnCircle) -> ArcsOnCircle {
        ArcsOnCircle {
            circle: arcs.circle.clone(),
            zero: arcs.zero.clone(),
            arcs: arcs.arcs.difference(&arcs.transported(other)),
        }
    }

    fn intersect_disk(arcs: &ArcsOnCircle, disk: &Disk) -> ArcsOnCircle {
        let crossings = Self::circle_intersections(&arcs.circle, &Self::disk_circle(disk));
        if crossings.len() < 2 {
            let probe_angle = match crossings.first() {
                Some(touch) => Self::angle_of(arcs, touch) + fixed::pi(),
                None => Fixed::ZERO,
            };
            let probe = arcs.point_at(probe_angle);
            return match Self::classify(disk, &probe) {
                Containment::Inside => arcs.clone(),
                _ => Self::empty_arcs(&arcs.circle),
            };
        }
        let first = Self::angle_of(arcs, &crossings[0]);
        let second = Self::angle_of(arcs, &crossings[1]);
        let span = (second - first).mod_two_pi();
        let midpoint = arcs.point_at(first + span / Fixed::from(2));
        let inside = if Self::classify(disk, &midpoint) == Containment::Inside {
            UnitArcs::of(first, second)
        } else {
            UnitArcs::of(second, first)
        };
        ArcsOnCircle {
            circle: arcs.circle.clone(),
            zero: arcs.zero.clone(),
            arcs: arcs.arcs.intersection(&inside),
        }
    }

    fn angle_of(arcs: &ArcsOnCircle, point: &Point) -> Fixed {
        ccw_angle(&arcs.circle.center, &arcs.zero, point)
    }

    fn materialize(arcs: &ArcsOnCircle, splits: &[Fixed]) -> Vec<Arc> {
        arcs.arcs
            .split_at_intersections(splits)
            .into_iter()
            .map(|(start, end)| Arc {
                circle: arcs.circle.clone(),
                start: arcs.point_at(start),
                end: arcs.point_at(end),
            })
            .collect()
    }

    fn arc_start(arc: &Arc) -> Point {
        arc.start.clone()
    }

    fn arc_end(arc: &Arc) -> Point {
        arc.end.clone()
    }

    fn arc_midpoint(arc: &Arc) -> Point {
        let span = ccw_angle(&arc.circle.center, &arc.start, &arc.end);
        let half_way = if span.is_zero() {
            fixed::pi()
        } else {
            span / Fixed::from(2)
        };
        Self::rotate_point(
            &arc.start,
            &arc.circle.center,
            &Angle::from_radians(half_way),
        )
    }

    fn arc_is_full_circle(arc: &Arc) -> bool {
        arc.start == arc.end
    }

    fn join(a: &Arc, b: &Arc) -> Option<Arc> {
        if Self::arc_is_full_circle(a) || Self::arc_is_full_circle(b) {
            return None;
        }
        // Align representations so both travel the same way.
        let aligned;
        let b = if a.circle.center == b.circle.center {
            b
        } else if a.circle == b.circle {
            aligned = Arc {
                circle: b.circle.dual(),
                start: b.end.clone(),
                end: b.start.clone(),
            };
            &aligned
        } else {
            return None;
        };
        if a.circle.radius != b.circle.radius {
            return None;
        }
        if a.end == b.start {
            Some(Arc {
                circle: a.circle.clone(),
                start: a.start.clone(),
                end: b.end.clone(),
            })
        } else if b.end == a.start {
            Some(Arc {
                circle: a.circle.clone(),
                start: b.start.clone(),
                end: a.end.clone(),
            })
        } else {
            None
        }
    }

    fn incidence_key(arc: &Arc, starts_here: bool) -> (Fixed, Fixed) {
        // Leaving direction of counterclockwise travel is center x point; an
        // arc ending here leaves backwards. The stored center of a
        // counterclockwise arc lies to the left of travel, so the leftward
        // radius is the stored radius for a start and its supplement for an
        // end; tie-break tangent arcs by leftward geodesic curvature cot.
        let (point, direction, left_radius) = if starts_here {
            (
                &arc.start,
                arc.circle.center.cross(&arc.start),
                arc.circle.radius,
            )
        } else {
            (
                &arc.end,
                arc.end.cross(&arc.circle.center),
                fixed::pi() - arc.circle.radius,
            )
        };
        let phi = ccw_angle(point, &reference_direction(point), &direction);
        let kappa = left_radius.cos() / left_radius.sin();
        (phi, kappa)
    }
}
