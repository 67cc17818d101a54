//! Forward-mode automatic differentiation.
//!
//! `Dual3` carries a value and its three partial derivatives with respect to
//! x, y and z. Every operation applies the matching calculus rule, so seeding
//! the inputs with unit derivatives yields the exact gradient after a single
//! evaluation.

use std::ops::{Add, Div, Mul, Neg, Sub};

use glam::{Mat3, Vec3};

/// Square roots below this keep a zero derivative instead of blowing up.
const SQRT_EPSILON: f32 = 1e-10;

/// Value plus gradient: `(f, df/dx, df/dy, df/dz)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Dual3 {
    /// Function value.
    pub val: f32,
    /// Partial derivatives.
    pub grad: Vec3,
}

impl Dual3 {
    /// Zero with zero derivative.
    pub const ZERO: Self = Self::constant(0.0);

    /// Constant (derivative = 0).
    #[inline]
    #[must_use]
    pub const fn constant(val: f32) -> Self {
        Self { val, grad: Vec3::ZERO }
    }

    /// Value with an explicit derivative.
    #[inline]
    #[must_use]
    pub const fn new(val: f32, grad: Vec3) -> Self {
        Self { val, grad }
    }

    /// Absolute value.
    #[inline]
    #[must_use]
    pub fn abs(self) -> Self {
        if self.val >= 0.0 {
            self
        } else {
            -self
        }
    }

    /// Minimum; the derivative follows the selected operand.
    #[inline]
    #[must_use]
    pub fn min(self, other: Self) -> Self {
        if self.val <= other.val {
            self
        } else {
            other
        }
    }

    /// Maximum; the derivative follows the selected operand.
    #[inline]
    #[must_use]
    pub fn max(self, other: Self) -> Self {
        if self.val >= other.val {
            self
        } else {
            other
        }
    }

    /// Clamp to a constant range.
    #[inline]
    #[must_use]
    pub fn clamp(self, lo: f32, hi: f32) -> Self {
        self.max(Self::constant(lo)).min(Self::constant(hi))
    }

    /// Square root.
    #[inline]
    #[must_use]
    pub fn sqrt(self) -> Self {
        let root = self.val.max(0.0).sqrt();
        let grad = if root > SQRT_EPSILON {
            self.grad / (2.0 * root)
        } else {
            Vec3::ZERO
        };
        Self { val: root, grad }
    }

    /// Sine.
    #[inline]
    #[must_use]
    pub fn sin(self) -> Self {
        let (sin, cos) = self.val.sin_cos();
        Self { val: sin, grad: self.grad * cos }
    }

    /// Cosine.
    #[inline]
    #[must_use]
    pub fn cos(self) -> Self {
        let (sin, cos) = self.val.sin_cos();
        Self { val: cos, grad: self.grad * -sin }
    }
}

impl Add for Dual3 {
    type Output = Self;
    #[inline]
    fn add(self, rhs: Self) -> Self {
        Self::new(self.val + rhs.val, self.grad + rhs.grad)
    }
}

impl Add<f32> for Dual3 {
    type Output = Self;
    #[inline]
    fn add(self, rhs: f32) -> Self {
        Self::new(self.val + rhs, self.grad)
    }
}

impl Sub for Dual3 {
    type Output = Self;
    #[inline]
    fn sub(self, rhs: Self) -> Self {
        Self::new(self.val - rhs.val, self.grad - rhs.grad)
    }
}

impl Sub<f32> for Dual3 {
    type Output = Self;
    #[inline]
    fn sub(self, rhs: f32) -> Self {
        Self::new(self.val - rhs, self.grad)
    }
}

impl Mul for Dual3 {
    type Output = Self;
    #[inline]
    fn mul(self, rhs: Self) -> Self {
        Self::new(self.val * rhs.val, self.grad * rhs.val + rhs.grad * self.val)
    }
}

impl Mul<f32> for Dual3 {
    type Output = Self;
    #[inline]
    fn mul(self, rhs: f32) -> Self {
        Self::new(self.val * rhs, self.grad * rhs)
    }
}

impl Div<f32> for Dual3 {
    type Output = Self;
    #[inline]
    fn div(self, rhs: f32) -> Self {
        let inv = 1.0 / rhs;
        Self::new(self.val * inv, self.grad * inv)
    }
}

impl Neg for Dual3 {
    type Output = Self;
    #[inline]
    fn neg(self) -> Self {
        Self::new(-self.val, -self.grad)
    }
}

impl Mul<Dual3> for f32 {
    type Output = Dual3;
    #[inline]
    fn mul(self, rhs: Dual3) -> Dual3 {
        rhs * self
    }
}

/// A point whose coordinates are dual numbers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DualVec3 {
    /// X component.
    pub x: Dual3,
    /// Y component.
    pub y: Dual3,
    /// Z component.
    pub z: Dual3,
}

impl DualVec3 {
    /// Creates a vector from components.
    #[inline]
    #[must_use]
    pub const fn new(x: Dual3, y: Dual3, z: Dual3) -> Self {
        Self { x, y, z }
    }

    /// Seeds a sampling point: each coordinate is differentiated with
    /// respect to itself.
    #[inline]
    #[must_use]
    pub const fn seed(p: Vec3) -> Self {
        Self {
            x: Dual3::new(p.x, Vec3::X),
            y: Dual3::new(p.y, Vec3::Y),
            z: Dual3::new(p.z, Vec3::Z),
        }
    }

    /// A point with no derivatives.
    #[inline]
    #[must_use]
    pub const fn constant(p: Vec3) -> Self {
        Self {
            x: Dual3::constant(p.x),
            y: Dual3::constant(p.y),
            z: Dual3::constant(p.z),
        }
    }

    /// Values without derivatives.
    #[inline]
    #[must_use]
    pub fn value(self) -> Vec3 {
        Vec3::new(self.x.val, self.y.val, self.z.val)
    }

    /// Component-wise absolute value.
    #[inline]
    #[must_use]
    pub fn abs(self) -> Self {
        Self::new(self.x.abs(), self.y.abs(), self.z.abs())
    }

    /// Component-wise maximum with a constant.
    #[inline]
    #[must_use]
    pub fn max_scalar(self, value: f32) -> Self {
        let c = Dual3::constant(value);
        Self::new(self.x.max(c), self.y.max(c), self.z.max(c))
    }

    /// Largest component.
    #[inline]
    #[must_use]
    pub fn max_element(self) -> Dual3 {
        self.x.max(self.y).max(self.z)
    }

    /// Dot product with a constant vector.
    #[inline]
    #[must_use]
    pub fn dot_const(self, v: Vec3) -> Dual3 {
        self.x * v.x + self.y * v.y + self.z * v.z
    }

    /// Euclidean length.
    #[inline]
    #[must_use]
    pub fn length(self) -> Dual3 {
        (self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }

    /// Applies a constant linear map.
    #[inline]
    #[must_use]
    pub fn transform(self, m: &Mat3) -> Self {
        Self::new(
            self.x * m.x_axis.x + self.y * m.y_axis.x + self.z * m.z_axis.x,
            self.x * m.x_axis.y + self.y * m.y_axis.y + self.z * m.z_axis.y,
            self.x * m.x_axis.z + self.y * m.y_axis.z + self.z * m.z_axis.z,
        )
    }
}

impl Sub<Vec3> for DualVec3 {
    type Output = Self;
    #[inline]
    fn sub(self, rhs: Vec3) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}
