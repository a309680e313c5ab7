//! The Euclidean plane.
//!
//! Angles on a circle are measured counterclockwise from the positive x
//! direction, so every circle shares one absolute frame and same-circle set
//! operations need no frame transport.

use circle_core::{
    fixed::{self, Fixed},
    Angle, UnitArcs,
};

use crate::geometry::{Containment, Geometry};

#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub struct Point {
    pub x: Fixed,
    pub y: Fixed,
}

impl Point {
    #[must_use]
    pub fn new(x: impl Into<Fixed>, y: impl Into<Fixed>) -> Point {
        Point {
            x: x.into(),
            y: y.into(),
        }
    }

    /// Rotate about `center` by the 2x2 rotation matrix of `angle`.
    #[must_use]
    pub fn rotate(&self, center: &Point, angle: &Angle) -> Point {
        let dx = self.x - center.x;
        let dy = self.y - center.y;
        let (sin, cos) = (angle.sin(), angle.cos());
        Point {
            x: center.x + dx * cos - dy * sin,
            y: center.y + dx * sin + dy * cos,
        }
    }
}

#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub struct Circle {
    pub center: Point,
    pub radius: Fixed,
}

impl Circle {
    /// # Panics
    ///
    /// The radius must be positive.
    #[must_use]
    pub fn new(center: Point, radius: impl Into<Fixed>) -> Circle {
        let radius = radius.into();
        assert!(radius.cmp_zero() == std::cmp::Ordering::Greater);
        Circle { center, radius }
    }

    /// The point at the given angle on the circle.
    #[must_use]
    pub fn point_at(&self, angle: &Angle) -> Point {
        Point {
            x: self.center.x + self.radius * angle.cos(),
            y: self.center.y + self.radius * angle.sin(),
        }
    }

    /// The angle at which a point on the circle sits.
    fn angle_to(&self, point: &Point) -> Fixed {
        Fixed::atan2_mod_two_pi(point.y - self.center.y, point.x - self.center.x)
            .expect("a point on a circle is distinct from its center")
    }
}

/// A disk is bounded by (and identified with) its circle.
pub type Disk = Circle;

/// A counterclockwise arc from `start` to `end`; coincident endpoints mean
/// the full circle.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub struct Arc {
    pub circle: Circle,
    pub start: Angle,
    pub end: Angle,
}

#[derive(Clone, Debug)]
pub struct ArcsOnCircle {
    pub circle: Circle,
    pub arcs: UnitArcs,
}

/// The Euclidean plane as a [`Geometry`].
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Plane;

impl Geometry for Plane {
    const CLOSED_SURFACE: bool = false;

    type Point = Point;
    type Circle = Circle;
    type Disk = Disk;
    type Arc = Arc;
    type ArcsOnCircle = ArcsOnCircle;

    fn disk_circle(disk: &Disk) -> Circle {
        disk.clone()
    }

    fn disk_center(disk: &Disk) -> Point {
        disk.center.clone()
    }

    fn classify(disk: &Disk, point: &Point) -> Containment {
        let dx = point.x - disk.center.x;
        let dy = point.y - disk.center.y;
        match (dx * dx + dy * dy).cmp(&(disk.radius * disk.radius)) {
            std::cmp::Ordering::Less => Containment::Inside,
            std::cmp::Ordering::Equal => Containment::Boundary,
            std::cmp::Ordering::Greater => Containment::Outside,
        }
    }

    fn rotate_point(point: &Point, center: &Point, angle: &Angle) -> Point {
        point.rotate(center, angle)
    }

    fn rotate_arc(arc: &Arc, center: &Point, angle: &Angle) -> Arc {
        // Rotating a circle shifts every on-circle angle by the same amount.
        Arc {
            circle: Circle {
                center: arc.circle.center.rotate(center, angle),
                radius: arc.circle.radius,
            },
            start: Angle::from_radians(arc.start.radians() + angle.radians()),
            end: Angle::from_radians(arc.end.radians() + angle.radians()),
        }
    }

    fn rotate_arcs(arcs: &ArcsOnCircle, center: &Point, angle: &Angle) -> ArcsOnCircle {
        ArcsOnCircle {
            circle: Circle {
                center: arcs.circle.center.rotate(center, angle),
                radius: arcs.circle.radius,
            },
            arcs: arcs.arcs.rotate(angle.radians()),
        }
    }

    fn full_arcs(circle: &Circle) -> ArcsOnCircle {
        ArcsOnCircle {
            circle: circle.clone(),
            arcs: UnitArcs::full_circle(),
        }
    }

    fn empty_arcs(circle: &Circle) -> ArcsOnCircle {
        ArcsOnCircle {
            circle: circle.clone(),
            arcs: UnitArcs::empty(),
        }
    }

    /// The classical construction: with center distance d,
    /// a = (d^2 + r1^2 - r2^2) / 2d and h^2 = r1^2 - a^2; the chord midpoint
    /// sits a along the center line and the intersections h to either side.
    fn circle_intersections(a: &Circle, b: &Circle) -> Vec<Point> {
        let dx = b.center.x - a.center.x;
        let dy = b.center.y - a.center.y;
        let distance_squared = dx * dx + dy * dy;
        if distance_squared.is_zero() {
            // Concentric (or equal) circles have no transverse intersections.
            return vec![];
        }
        let distance = distance_squared.sqrt();
        let two = Fixed::from(2);
        let along = (distance_squared + a.radius * a.radius - b.radius * b.radius)
            / (two * distance);
        let height_squared = a.radius * a.radius - along * along;
        if height_squared.cmp_zero() == std::cmp::Ordering::Less {
            return vec![];
        }
        let mid_x = a.center.x + along * dx / distance;
        let mid_y = a.center.y + along * dy / distance;
        if height_squared.is_zero() {
            return vec![Point { x: mid_x, y: mid_y }];
        }
        let height = height_squared.sqrt();
        let offset_x = height * dy / distance;
        let offset_y = height * dx / distance;
        vec![
            Point {
                x: mid_x + offset_x,
                y: mid_y - offset_y,
            },
            Point {
                x: mid_x - offset_x,
                y: mid_y + offset_y,
            },
        ]
    }

    fn circle_of(arcs: &ArcsOnCircle) -> &Circle {
        &arcs.circle
    }

    fn unit_arcs(arcs: &ArcsOnCircle) -> &UnitArcs {
        &arcs.arcs
    }

    fn same_circle_union(arcs: &ArcsOnCircle, other: &ArcsOnCircle) -> ArcsOnCircle {
        debug_assert!(arcs.circle == other.circle);
        ArcsOnCircle {
            circle: arcs.circle.clone(),
            arcs: arcs.arcs.union(&other.arcs),
        }
    }

    fn same_circle_difference(arcs: &ArcsOnCircle, other: &ArcsOnCircle) -> ArcsOnCircle {
        debug_assert!(arcs.circle == other.circle);
        ArcsOnCircle {
            circle: arcs.circle.clone(),
            arcs: arcs.arcs.difference(&other.arcs),
        }
    }

    fn intersect_disk(arcs: &ArcsOnCircle, disk: &Disk) -> ArcsOnCircle {
        let crossings = Self::circle_intersections(&arcs.circle, disk);
        if crossings.len() < 2 {
            // No transverse crossing: the circle is wholly inside or wholly
            // outside. Probe a point away from any tangency.
            let probe_angle = match crossings.first() {
                Some(touch) => arcs.circle.angle_to(touch) + fixed::pi(),
                None => Fixed::ZERO,
            };
            let probe = arcs.circle.point_at(&Angle::from_radians(probe_angle));
            return match Self::classify(disk, &probe) {
                Containment::Inside => arcs.clone(),
                _ => Self::empty_arcs(&arcs.circle),
            };
        }
        let first = arcs.circle.angle_to(&crossings[0]);
        let second = arcs.circle.angle_to(&crossings[1]);
        // One of the two arcs between the crossings is the inside one; ask
        // its midpoint.
        let span = (second - first).mod_two_pi();
        let midpoint = arcs
            .circle
            .point_at(&Angle::from_radians(first + span / Fixed::from(2)));
        let inside = if Self::classify(disk, &midpoint) == Containment::Inside {
            UnitArcs::of(first, second)
        } else {
            UnitArcs::of(second, first)
        };
        ArcsOnCircle {
            circle: arcs.circle.clone(),
            arcs: arcs.arcs.intersection(&inside),
        }
    }

    fn angle_of(arcs: &ArcsOnCircle, point: &Point) -> Fixed {
        arcs.circle.angle_to(point)
    }

    fn materialize(arcs: &ArcsOnCircle, splits: &[Fixed]) -> Vec<Arc> {
        arcs.arcs
            .split_at_intersections(splits)
            .into_iter()
            .map(|(start, end)| Arc {
                circle: arcs.circle.clone(),
                start: Angle::from_radians(start),
                end: Angle::from_radians(end),
            })
            .collect()
    }

    fn arc_start(arc: &Arc) -> Point {
        arc.circle.point_at(&arc.start)
    }

    fn arc_end(arc: &Arc) -> Point {
        arc.circle.point_at(&arc.end)
    }

    fn arc_midpoint(arc: &Arc) -> Point {
        let span = (arc.end.radians() - arc.start.radians()).mod_two_pi();
        let half_way = if span.is_zero() {
            // Any point opposite the seam of a full circle.
            fixed::pi()
        } else {
            span / Fixed::from(2)
        };
        arc.circle
            .point_at(&Angle::from_radians(arc.start.radians() + half_way))
    }

    fn arc_is_full_circle(arc: &Arc) -> bool {
        arc.start == arc.end
    }

    fn join(a: &Arc, b: &Arc) -> Option<Arc> {
        if a.circle != b.circle || Self::arc_is_full_circle(a) || Self::arc_is_full_circle(b) {
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
        // Leaving tangent: a quarter turn left of the outward radius at the
        // start, a quarter turn right at the end. Tie-break by leftward
        // curvature 1/r, negated when the arc ends here (its center then
        // lies to the right of the leaving direction).
        let curvature = Fixed::from(1) / arc.circle.radius;
        if starts_here {
            (
                (arc.start.radians() + fixed::half_pi()).mod_two_pi(),
                curvature,
            )
        } else {
            (
                (arc.end.radians() - fixed::half_pi()).mod_two_pi(),
                -curvature,
            )
        }
    }
}
