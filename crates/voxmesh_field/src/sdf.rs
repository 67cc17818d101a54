//! Implicit surface expression trees.
//!
//! An `SdfNode` is a tree of primitives and combinators. Evaluation walks
//! the tree once with dual-number coordinates, producing the signed distance
//! and its exact gradient together. Negative values are inside.

use glam::{Mat3, Quat, Vec3};

use crate::dual::{Dual3, DualVec3};
use crate::field::{GridVertex, ScalarField};

/// Signed distance expression.
#[derive(Debug, Clone, PartialEq)]
pub enum SdfNode {
    /// Sphere centered at the origin.
    Sphere {
        /// Radius.
        radius: f32,
    },
    /// Axis-aligned box centered at the origin.
    Cuboid {
        /// Half-size along each axis.
        half_extents: Vec3,
    },
    /// Cone along Y with its apex at the origin and its base disk at
    /// `y = -height`.
    Cone {
        /// Base radius.
        radius: f32,
        /// Apex-to-base height.
        height: f32,
    },
    /// Half-space `dot(normal, p) - offset <= 0`.
    Plane {
        /// Unit normal pointing out of the solid.
        normal: Vec3,
        /// Signed distance of the plane from the origin.
        offset: f32,
    },
    /// `min(a, b)`.
    Union(Box<SdfNode>, Box<SdfNode>),
    /// `max(a, -b)`: `a` with `b` carved out.
    Subtraction(Box<SdfNode>, Box<SdfNode>),
    /// `max(a, b)`.
    Intersection(Box<SdfNode>, Box<SdfNode>),
    /// Rigid transform of the child.
    Transform {
        /// Inverse of the child's rotation.
        inverse_rotation: Mat3,
        /// Position of the child's origin.
        translation: Vec3,
        /// Transformed shape.
        child: Box<SdfNode>,
    },
    /// Rotation about Y by `rate * y` radians.
    Twist {
        /// Radians per unit of height.
        rate: f32,
        /// Twisted shape.
        child: Box<SdfNode>,
    },
}

impl SdfNode {
    /// Sphere of the given radius.
    #[must_use]
    pub const fn sphere(radius: f32) -> Self {
        Self::Sphere { radius }
    }

    /// Box with the given half extents.
    #[must_use]
    pub const fn cuboid(half_extents: Vec3) -> Self {
        Self::Cuboid { half_extents }
    }

    /// Cone with the given base radius and height.
    #[must_use]
    pub const fn cone(radius: f32, height: f32) -> Self {
        Self::Cone { radius, height }
    }

    /// Half-space bounded by a plane. `normal` is normalized here.
    #[must_use]
    pub fn plane(normal: Vec3, offset: f32) -> Self {
        Self::Plane {
            normal: normal.normalize_or_zero(),
            offset,
        }
    }

    /// Union with another shape.
    #[must_use]
    pub fn union(self, other: Self) -> Self {
        Self::Union(Box::new(self), Box::new(other))
    }

    /// Subtract another shape from this one.
    #[must_use]
    pub fn subtract(self, other: Self) -> Self {
        Self::Subtraction(Box::new(self), Box::new(other))
    }

    /// Intersection with another shape.
    #[must_use]
    pub fn intersect(self, other: Self) -> Self {
        Self::Intersection(Box::new(self), Box::new(other))
    }

    /// Rotates, then translates this shape.
    #[must_use]
    pub fn transform(self, rotation: Quat, translation: Vec3) -> Self {
        Self::Transform {
            inverse_rotation: Mat3::from_quat(rotation.inverse()),
            translation,
            child: Box::new(self),
        }
    }

    /// Moves this shape.
    #[must_use]
    pub fn translate(self, offset: Vec3) -> Self {
        self.transform(Quat::IDENTITY, offset)
    }

    /// Rotates this shape about the origin.
    #[must_use]
    pub fn rotate(self, rotation: Quat) -> Self {
        self.transform(rotation, Vec3::ZERO)
    }

    /// Twists this shape about the Y axis.
    #[must_use]
    pub fn twist(self, rate: f32) -> Self {
        Self::Twist {
            rate,
            child: Box::new(self),
        }
    }

    /// Evaluates the expression at a dual-number point.
    #[must_use]
    pub fn eval_dual(&self, p: DualVec3) -> Dual3 {
        match self {
            Self::Sphere { radius } => p.length() - *radius,
            Self::Cuboid { half_extents } => {
                let q = p.abs() - *half_extents;
                let outside = q.max_scalar(0.0).length();
                let inside = q.max_element().min(Dual3::ZERO);
                outside + inside
            }
            Self::Cone { radius, height } => eval_cone(p, *radius, *height),
            Self::Plane { normal, offset } => p.dot_const(*normal) - *offset,
            Self::Union(a, b) => a.eval_dual(p).min(b.eval_dual(p)),
            Self::Subtraction(a, b) => a.eval_dual(p).max(-b.eval_dual(p)),
            Self::Intersection(a, b) => a.eval_dual(p).max(b.eval_dual(p)),
            Self::Transform {
                inverse_rotation,
                translation,
                child,
            } => child.eval_dual((p - *translation).transform(inverse_rotation)),
            Self::Twist { rate, child } => {
                let angle = p.y * *rate;
                let (s, c) = (angle.sin(), angle.cos());
                let q = DualVec3::new(c * p.x - s * p.z, p.y, s * p.x + c * p.z);
                child.eval_dual(q)
            }
        }
    }

    /// Signed distance at a point.
    #[must_use]
    pub fn distance(&self, p: Vec3) -> f32 {
        self.eval_dual(DualVec3::constant(p)).val
    }
}

impl ScalarField for SdfNode {
    #[inline]
    fn sample(&self, position: Vec3) -> GridVertex {
        let d = self.eval_dual(DualVec3::seed(position));
        GridVertex::new(d.val, d.grad)
    }

    #[inline]
    fn value(&self, position: Vec3) -> f32 {
        self.distance(position)
    }
}

/// Exact cone distance in the (radial, height) half-plane.
fn eval_cone(p: DualVec3, radius: f32, height: f32) -> Dual3 {
    let wx = (p.x * p.x + p.z * p.z).sqrt();
    let wy = p.y;
    let (qx, qy) = (radius, -height);
    let qq = qx * qx + qy * qy;

    // Closest point on the slanted side.
    let t = ((wx * qx + wy * qy) / qq).clamp(0.0, 1.0);
    let ax = wx - t * qx;
    let ay = wy - t * qy;

    // Closest point on the base disk.
    let u = (wx / qx).clamp(0.0, 1.0);
    let bx = wx - u * qx;
    let by = wy - qy;

    let d = (ax * ax + ay * ay).min(bx * bx + by * by);
    let s = (wx * height + wy * radius).max(-(wy - qy));

    if s.val >= 0.0 {
        d.sqrt()
    } else {
        -d.sqrt()
    }
}
