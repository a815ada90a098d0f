//! Almost all nontrivial graphics programs are built on a foundation
//! of geometric classes. These classes represent mathematical
//! constructs like points, vectors, and rays.
//!
//! # Points
//!
//! A **point** is a zero-dimensional location in 2D or 3D space. The
//! **Point2f** and **Point3f** structs represent points in the obvious
//! way: using x, y, z (in 3D) coordinates with respect to a coordinate
//! system. Although the same representation is used for vectors, a
//! point represents a position whereas a vector represents a
//! direction.
//!
//! ```rust
//! use rs_bsp::core::geometry::Point3f;
//!
//!     let origin = Point3f {
//!         x: 0.0,
//!         y: 0.0,
//!         z: 0.0,
//!     };
//!
//!     println!("origin {:?}", origin);
//! ```
//!
//! # Vectors
//!
//! Vectors are used for directions and for surface normals. Normals
//! are never transformed here, so they share the **Vector3f** type.
//!
//! # Bounding Boxes
//!
//! Axis-aligned bounding boxes are represented by the minimum and
//! maximum corner. A box built with **Bounds3f::default()** is empty
//! (inverted corners) and grows as points or other boxes are added.
//!
//! ```rust
//! use rs_bsp::core::geometry::{Bounds3f, Point3f};
//!
//!     let mut b = Bounds3f::default();
//!     assert!(b.is_empty());
//!     b.add_point(&Point3f { x: 1.0, y: 2.0, z: 3.0 });
//!     b.add_point(&Point3f { x: -1.0, y: 0.0, z: 0.0 });
//!     assert_eq!(b.surface_area(), 2.0 * (2.0 * 2.0 + 2.0 * 3.0 + 3.0 * 2.0));
//! ```
//!
//! # Rays
//!
//! A **ray** is a semi-infinite line specified by its origin and
//! direction, limited to the parametric interval `[t_min, t_max]`.
//! Besides the query it carries the hit record which accelerators and
//! shapes fill in. During a closest-hit query `t_max` only ever
//! shrinks: every successful intersection sets it to the hit distance,
//! so any later candidate has to be closer to be accepted.

// std
use std::ops;
use std::ops::{Index, IndexMut};
// others
use strum_macros::EnumIter;
// rs_bsp
use crate::core::base::{Float, BIG, RAY_T_MIN};
use crate::core::primitive::ObjectId;

#[derive(EnumIter, Debug, Copy, Clone, PartialEq, Eq)]
#[repr(u8)]
pub enum XYZEnum {
    X = 0,
    Y = 1,
    Z = 2,
}

#[derive(Debug, Default, Copy, Clone, PartialEq)]
pub struct Point2f {
    pub x: Float,
    pub y: Float,
}

#[derive(Debug, Default, Copy, Clone, PartialEq)]
pub struct Vector3f {
    pub x: Float,
    pub y: Float,
    pub z: Float,
}

impl Vector3f {
    pub fn new(x: Float, y: Float, z: Float) -> Self {
        Vector3f { x, y, z }
    }
    pub fn length_squared(&self) -> Float {
        self.x * self.x + self.y * self.y + self.z * self.z
    }
    pub fn length(&self) -> Float {
        self.length_squared().sqrt()
    }
    /// Compute a new vector pointing in the same direction but with unit
    /// length. A zero vector stays zero.
    pub fn normalize(&self) -> Vector3f {
        let len: Float = self.length();
        if len > 0.0 as Float {
            *self / len
        } else {
            *self
        }
    }
}

#[derive(Debug, Default, Copy, Clone, PartialEq)]
pub struct Point3f {
    pub x: Float,
    pub y: Float,
    pub z: Float,
}

impl Point3f {
    pub fn new(x: Float, y: Float, z: Float) -> Self {
        Point3f { x, y, z }
    }
}

impl From<Point3f> for Vector3f {
    fn from(p: Point3f) -> Self {
        Vector3f {
            x: p.x,
            y: p.y,
            z: p.z,
        }
    }
}

impl From<Vector3f> for Point3f {
    fn from(v: Vector3f) -> Self {
        Point3f {
            x: v.x,
            y: v.y,
            z: v.z,
        }
    }
}

impl Index<XYZEnum> for Vector3f {
    type Output = Float;
    fn index(&self, index: XYZEnum) -> &Float {
        match index {
            XYZEnum::X => &self.x,
            XYZEnum::Y => &self.y,
            _ => &self.z,
        }
    }
}

impl IndexMut<XYZEnum> for Vector3f {
    fn index_mut(&mut self, index: XYZEnum) -> &mut Float {
        match index {
            XYZEnum::X => &mut self.x,
            XYZEnum::Y => &mut self.y,
            _ => &mut self.z,
        }
    }
}

impl Index<XYZEnum> for Point3f {
    type Output = Float;
    fn index(&self, index: XYZEnum) -> &Float {
        match index {
            XYZEnum::X => &self.x,
            XYZEnum::Y => &self.y,
            _ => &self.z,
        }
    }
}

impl IndexMut<XYZEnum> for Point3f {
    fn index_mut(&mut self, index: XYZEnum) -> &mut Float {
        match index {
            XYZEnum::X => &mut self.x,
            XYZEnum::Y => &mut self.y,
            _ => &mut self.z,
        }
    }
}

impl_op!(-|a: Vector3f| -> Vector3f {
    Vector3f {
        x: -a.x,
        y: -a.y,
        z: -a.z,
    }
});

impl_op_ex!(+|a: &Vector3f, b: &Vector3f| -> Vector3f {
    Vector3f {
        x: a.x + b.x,
        y: a.y + b.y,
        z: a.z + b.z,
    }
});

impl_op_ex!(-|a: &Vector3f, b: &Vector3f| -> Vector3f {
    Vector3f {
        x: a.x - b.x,
        y: a.y - b.y,
        z: a.z - b.z,
    }
});

impl_op_ex_commutative!(*|a: &Vector3f, b: Float| -> Vector3f {
    Vector3f {
        x: a.x * b,
        y: a.y * b,
        z: a.z * b,
    }
});

impl_op_ex!(/|a: &Vector3f, b: Float| -> Vector3f {
    assert_ne!(b, 0.0 as Float);
    let inv: Float = 1.0 as Float / b;
    Vector3f {
        x: a.x * inv,
        y: a.y * inv,
        z: a.z * inv,
    }
});

impl_op!(+= |a: &mut Vector3f, b: Vector3f| {
    a.x += b.x;
    a.y += b.y;
    a.z += b.z;
});

impl_op_ex!(+|a: &Point3f, b: &Point3f| -> Point3f {
    Point3f {
        x: a.x + b.x,
        y: a.y + b.y,
        z: a.z + b.z,
    }
});

impl_op_ex!(+|a: &Point3f, b: &Vector3f| -> Point3f {
    Point3f {
        x: a.x + b.x,
        y: a.y + b.y,
        z: a.z + b.z,
    }
});

impl_op_ex!(-|a: &Point3f, b: &Point3f| -> Vector3f {
    Vector3f {
        x: a.x - b.x,
        y: a.y - b.y,
        z: a.z - b.z,
    }
});

impl_op_ex!(-|a: &Point3f, b: &Vector3f| -> Point3f {
    Point3f {
        x: a.x - b.x,
        y: a.y - b.y,
        z: a.z - b.z,
    }
});

impl_op_ex!(*|a: &Point3f, b: Float| -> Point3f {
    Point3f {
        x: a.x * b,
        y: a.y * b,
        z: a.z * b,
    }
});

impl_op_ex!(/|a: &Point3f, b: Float| -> Point3f {
    assert_ne!(b, 0.0 as Float);
    let inv: Float = 1.0 as Float / b;
    Point3f {
        x: a.x * inv,
        y: a.y * inv,
        z: a.z * inv,
    }
});

/// Product of the Euclidean magnitudes of the two vectors and the
/// cosine of the angle between them. A return value of zero means
/// both vectors are orthogonal, a value if one means they are
/// codirectional.
pub fn vec3_dot_vec3f(v1: &Vector3f, v2: &Vector3f) -> Float {
    v1.x * v2.x + v1.y * v2.y + v1.z * v2.z
}

/// Given two vectors in 3D, the cross product is a vector that is
/// perpendicular to both of them.
pub fn vec3_cross_vec3(v1: &Vector3f, v2: &Vector3f) -> Vector3f {
    let v1x: f64 = v1.x as f64;
    let v1y: f64 = v1.y as f64;
    let v1z: f64 = v1.z as f64;
    let v2x: f64 = v2.x as f64;
    let v2y: f64 = v2.y as f64;
    let v2z: f64 = v2.z as f64;
    Vector3f {
        x: ((v1y * v2z) - (v1z * v2y)) as Float,
        y: ((v1z * v2x) - (v1x * v2z)) as Float,
        z: ((v1x * v2y) - (v1y * v2x)) as Float,
    }
}

/// Construct a local coordinate system given only a single 3D vector.
pub fn vec3_coordinate_system(v1: &Vector3f, v2: &mut Vector3f, v3: &mut Vector3f) {
    if v1.x.abs() > v1.y.abs() {
        *v2 = Vector3f {
            x: -v1.z,
            y: 0.0 as Float,
            z: v1.x,
        } / (v1.x * v1.x + v1.z * v1.z).sqrt();
    } else {
        *v2 = Vector3f {
            x: 0.0 as Float,
            y: v1.z,
            z: -v1.y,
        } / (v1.y * v1.y + v1.z * v1.z).sqrt();
    }
    *v3 = vec3_cross_vec3(v1, &*v2);
}

/// Componentwise minimum of two points.
pub fn pnt3_min_pnt3(p1: &Point3f, p2: &Point3f) -> Point3f {
    Point3f {
        x: p1.x.min(p2.x),
        y: p1.y.min(p2.y),
        z: p1.z.min(p2.z),
    }
}

/// Componentwise maximum of two points.
pub fn pnt3_max_pnt3(p1: &Point3f, p2: &Point3f) -> Point3f {
    Point3f {
        x: p1.x.max(p2.x),
        y: p1.y.max(p2.y),
        z: p1.z.max(p2.z),
    }
}

/// The distance between two points is the length of the vector
/// between them.
pub fn pnt3_distancef(p1: &Point3f, p2: &Point3f) -> Float {
    (p1 - p2).length()
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Bounds3f {
    pub p_min: Point3f,
    pub p_max: Point3f,
}

impl Default for Bounds3f {
    fn default() -> Bounds3f {
        Bounds3f {
            p_min: Point3f {
                x: BIG,
                y: BIG,
                z: BIG,
            },
            p_max: Point3f {
                x: -BIG,
                y: -BIG,
                z: -BIG,
            },
        }
    }
}

impl Bounds3f {
    pub fn new(p1: Point3f, p2: Point3f) -> Self {
        Bounds3f {
            p_min: pnt3_min_pnt3(&p1, &p2),
            p_max: pnt3_max_pnt3(&p1, &p2),
        }
    }
    /// The box covering all of space, used for unbounded geometry.
    pub fn infinite() -> Self {
        Bounds3f {
            p_min: Point3f {
                x: -BIG,
                y: -BIG,
                z: -BIG,
            },
            p_max: Point3f {
                x: BIG,
                y: BIG,
                z: BIG,
            },
        }
    }
    /// Grow the box in place so it encloses *p*.
    pub fn add_point(&mut self, p: &Point3f) {
        self.p_min = pnt3_min_pnt3(&self.p_min, p);
        self.p_max = pnt3_max_pnt3(&self.p_max, p);
    }
    /// Grow the box in place so it encloses *other*.
    pub fn add_bounds(&mut self, other: &Bounds3f) {
        self.p_min = pnt3_min_pnt3(&self.p_min, &other.p_min);
        self.p_max = pnt3_max_pnt3(&self.p_max, &other.p_max);
    }
    /// Separating axis test. Touching boxes count as overlapping.
    pub fn intersects(&self, other: &Bounds3f) -> bool {
        !(other.p_max.x < self.p_min.x
            || other.p_min.x > self.p_max.x
            || other.p_max.y < self.p_min.y
            || other.p_min.y > self.p_max.y
            || other.p_max.z < self.p_min.z
            || other.p_min.z > self.p_max.z)
    }
    pub fn is_empty(&self) -> bool {
        self.p_min.x > self.p_max.x || self.p_min.y > self.p_max.y || self.p_min.z > self.p_max.z
    }
    pub fn center(&self) -> Point3f {
        (self.p_min + self.p_max) * 0.5 as Float
    }
    pub fn diagonal(&self) -> Vector3f {
        self.p_max - self.p_min
    }
    pub fn surface_area(&self) -> Float {
        let d: Vector3f = self.diagonal();
        // 2 * (d.x * d.y + d.y * d.z + d.z * d.x)
        let r: Float = d.x * d.y + d.y * d.z + d.z * d.x;
        r + r
    }
    /// Center and radius of a sphere enclosing the box. An empty box
    /// reports a zero radius.
    pub fn bounding_sphere(&self) -> (Point3f, Float) {
        let center: Point3f = self.center();
        if pnt3_inside_bnd3(&center, self) {
            (center, pnt3_distancef(&center, &self.p_max))
        } else {
            (center, 0.0 as Float)
        }
    }
}

/// Construct a new box that bounds the space encompassed by two other
/// bounding boxes.
pub fn bnd3_union_bnd3f(b1: &Bounds3f, b2: &Bounds3f) -> Bounds3f {
    let mut ret: Bounds3f = *b1;
    ret.add_bounds(b2);
    ret
}

/// Determine if a given point is inside the bounding box.
pub fn pnt3_inside_bnd3(p: &Point3f, b: &Bounds3f) -> bool {
    p.x >= b.p_min.x
        && p.x <= b.p_max.x
        && p.y >= b.p_min.y
        && p.y <= b.p_max.y
        && p.z >= b.p_min.z
        && p.z <= b.p_max.z
}

#[derive(Debug, Copy, Clone)]
pub struct Ray {
    /// origin
    pub origin: Point3f,
    /// direction
    pub direction: Vector3f,
    /// near end of the valid segment
    pub t_min: Float,
    /// far end of the valid segment, narrowed by every hit
    pub t_max: Float,
    pub has_hit: bool,
    /// parametric distance of the recorded hit
    pub dist: Float,
    pub hit_pos: Point3f,
    pub hit_normal: Vector3f,
    pub hit_object: Option<ObjectId>,
    pub hit_face_id: usize,
    /// barycentric coordinates of a triangle hit
    pub u: Float,
    pub v: Float,
}

impl Default for Ray {
    fn default() -> Self {
        Ray {
            origin: Point3f::default(),
            direction: Vector3f::default(),
            t_min: RAY_T_MIN,
            t_max: BIG,
            has_hit: false,
            dist: BIG,
            hit_pos: Point3f::default(),
            hit_normal: Vector3f::default(),
            hit_object: None,
            hit_face_id: 0,
            u: 0.0,
            v: 0.0,
        }
    }
}

impl Ray {
    pub fn new(origin: Point3f, direction: Vector3f) -> Self {
        Ray {
            origin,
            direction,
            ..Default::default()
        }
    }
    pub fn position(&self, t: Float) -> Point3f {
        self.origin + self.direction * t
    }
    /// Clear the hit record and reopen the default interval, keeping
    /// origin and direction.
    pub fn reset(&mut self) {
        *self = Ray::new(self.origin, self.direction);
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use strum::IntoEnumIterator;

    fn unit_box() -> Bounds3f {
        Bounds3f::new(Point3f::new(0.0, 0.0, 0.0), Point3f::new(1.0, 1.0, 1.0))
    }

    #[test]
    fn default_bounds_are_empty() {
        let b = Bounds3f::default();
        assert!(b.is_empty());
        let mut c = b;
        c.add_point(&Point3f::new(2.0, 3.0, 4.0));
        assert!(!c.is_empty());
        assert_eq!(c.p_min, c.p_max);
        assert_eq!(c.surface_area(), 0.0);
    }

    #[test]
    fn union_grows_monotonically() {
        let a = unit_box();
        let b = Bounds3f::new(Point3f::new(-1.0, 0.5, 0.5), Point3f::new(0.5, 3.0, 0.5));
        let u = bnd3_union_bnd3f(&a, &b);
        assert_eq!(u.p_min, Point3f::new(-1.0, 0.0, 0.0));
        assert_eq!(u.p_max, Point3f::new(1.0, 3.0, 1.0));
        assert!(pnt3_inside_bnd3(&Point3f::new(0.5, 0.5, 0.5), &u));
        assert!(!pnt3_inside_bnd3(&Point3f::new(0.0, 0.0, -2.0), &u));
    }

    #[test]
    fn overlap_test() {
        let a = unit_box();
        let touching = Bounds3f::new(Point3f::new(1.0, 0.0, 0.0), Point3f::new(2.0, 1.0, 1.0));
        let apart = Bounds3f::new(Point3f::new(1.5, 0.0, 0.0), Point3f::new(2.0, 1.0, 1.0));
        let inside = Bounds3f::new(Point3f::new(0.25, 0.25, 0.25), Point3f::new(0.5, 0.5, 0.5));
        assert!(a.intersects(&touching));
        assert!(!a.intersects(&apart));
        assert!(a.intersects(&inside));
        assert!(inside.intersects(&a));
        for axis in XYZEnum::iter() {
            let mut shifted = a;
            shifted.p_min[axis] += 5.0;
            shifted.p_max[axis] += 5.0;
            assert!(!a.intersects(&shifted));
        }
    }

    #[test]
    fn area_center_sphere() {
        let b = Bounds3f::new(Point3f::new(0.0, 0.0, 0.0), Point3f::new(1.0, 2.0, 3.0));
        assert_eq!(b.surface_area(), 22.0);
        assert_eq!(b.center(), Point3f::new(0.5, 1.0, 1.5));
        let (c, r) = b.bounding_sphere();
        assert_eq!(c, b.center());
        assert!((r - (0.25 as Float + 1.0 + 2.25).sqrt()).abs() < 1.0e-6);
        assert_eq!(Bounds3f::default().bounding_sphere().1, 0.0);
    }

    #[test]
    fn cross_is_orthogonal() {
        let a = Vector3f::new(1.0, 2.0, 3.0);
        let b = Vector3f::new(-2.0, 0.5, 4.0);
        let c = vec3_cross_vec3(&a, &b);
        assert!(vec3_dot_vec3f(&a, &c).abs() < 1.0e-5);
        assert!(vec3_dot_vec3f(&b, &c).abs() < 1.0e-5);
        let z = vec3_cross_vec3(&Vector3f::new(1.0, 0.0, 0.0), &Vector3f::new(0.0, 1.0, 0.0));
        assert_eq!(z, Vector3f::new(0.0, 0.0, 1.0));
    }

    #[test]
    fn ray_reset_restores_interval() {
        let mut ray = Ray::new(Point3f::new(0.0, 0.0, 5.0), Vector3f::new(0.0, 0.0, -1.0));
        assert_eq!(ray.t_min, RAY_T_MIN);
        assert_eq!(ray.t_max, BIG);
        ray.t_max = 2.0;
        ray.has_hit = true;
        ray.hit_object = Some(3);
        ray.reset();
        assert!(!ray.has_hit);
        assert_eq!(ray.hit_object, None);
        assert_eq!(ray.t_max, BIG);
        assert_eq!(ray.origin, Point3f::new(0.0, 0.0, 5.0));
        assert_eq!(ray.position(1.0), Point3f::new(0.0, 0.0, 4.0));
    }
}
