use crate::impl_component_views;
use crate::linalg::{Matrix, Vector};
use crate::Scalar;
use core::borrow::Borrow;
use core::fmt::{Debug, Formatter};
use core::ops::{Add, Mul, Neg, Sub};
use uniform_array_derive::UniformArray;

/// A three-dimensional vector, e.g. a reference or line-of-sight direction.
#[derive(UniformArray)]
#[cfg_attr(test, ensure_uniform_type::ensure_uniform_type)]
#[repr(C)]
pub struct Vector3<T> {
    pub x: T,
    pub y: T,
    pub z: T,
}

impl<T> Vector3<T> {
    /// Initializes a new [`Vector3`] instance.
    #[inline(always)]
    pub const fn new(x: T, y: T, z: T) -> Self {
        Self { x, y, z }
    }
}

impl<T> Vector3<T> {
    /// Calculates the squared vector length.
    #[inline(always)]
    #[doc(alias = "length")]
    pub fn norm_sq(&self) -> T
    where
        T: Clone + Mul<T, Output = T> + Add<T, Output = T>,
    {
        (self.x.clone() * self.x.clone())
            + (self.y.clone() * self.y.clone())
            + (self.z.clone() * self.z.clone())
    }

    /// Calculates the vector length, i.e. its norm.
    #[inline(always)]
    pub fn norm(&self) -> T
    where
        T: Scalar,
    {
        self.norm_sq().sqrt()
    }

    /// Returns a normalized version of the vector.
    ///
    /// A vector of (near) zero length is returned unchanged.
    pub fn normalized(&self) -> Self
    where
        T: Scalar,
    {
        let norm = self.norm();
        if norm.is_negligible() {
            return *self;
        }

        let norm_inv = norm.recip();
        Self {
            x: self.x * norm_inv,
            y: self.y * norm_inv,
            z: self.z * norm_inv,
        }
    }

    /// Calculates the inner product with another vector.
    #[inline]
    pub fn dot<V>(&self, rhs: V) -> T
    where
        T: Scalar,
        V: Borrow<Vector3<T>>,
    {
        let rhs = rhs.borrow();
        self.x * rhs.x + self.y * rhs.y + self.z * rhs.z
    }

    /// Calculates the 3D vector cross product.
    pub fn cross<V>(&self, rhs: V) -> Vector3<T>
    where
        T: Scalar,
        V: Borrow<Vector3<T>>,
    {
        let rhs = rhs.borrow();
        Self {
            x: self.y * rhs.z - self.z * rhs.y,
            y: self.z * rhs.x - self.x * rhs.z,
            z: self.x * rhs.y - self.y * rhs.x,
        }
    }

    /// Builds the skew-symmetric matrix `[v×]` such that `[v×] w = v × w`.
    pub fn cross_matrix(&self) -> Matrix<3, 3, T>
    where
        T: Scalar,
    {
        let zero = T::zero();
        Matrix::from_rows([
            [zero, -self.z, self.y],
            [self.z, zero, -self.x],
            [-self.y, self.x, zero],
        ])
    }
}

impl<T> Default for Vector3<T>
where
    T: Default,
{
    #[inline]
    fn default() -> Self {
        Self::new(Default::default(), Default::default(), Default::default())
    }
}

impl<T> Clone for Vector3<T>
where
    T: Clone,
{
    fn clone(&self) -> Self {
        Self {
            x: self.x.clone(),
            y: self.y.clone(),
            z: self.z.clone(),
        }
    }
}

impl<T> Debug for Vector3<T>
where
    T: Debug,
{
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        f.debug_tuple("Vector3")
            .field(&self.x)
            .field(&self.y)
            .field(&self.z)
            .finish()
    }
}

impl<T> PartialEq for Vector3<T>
where
    T: PartialEq,
{
    fn eq(&self, other: &Self) -> bool {
        self.x == other.x && self.y == other.y && self.z == other.z
    }
}

impl<T> From<Vector<3, T>> for Vector3<T>
where
    T: Copy,
{
    #[inline]
    fn from(value: Vector<3, T>) -> Self {
        Self::new(value[0], value[1], value[2])
    }
}

impl<T> From<Vector3<T>> for Vector<3, T> {
    #[inline]
    fn from(value: Vector3<T>) -> Self {
        Vector::from_array([value.x, value.y, value.z])
    }
}

impl<T> From<Vector3<T>> for (T, T, T) {
    fn from(value: Vector3<T>) -> Self {
        (value.x, value.y, value.z)
    }
}

/// Implements the unary negation.
impl<T> Neg for Vector3<T>
where
    T: Neg<Output = T>,
{
    type Output = Vector3<T>;

    #[inline]
    fn neg(self) -> Self::Output {
        Self {
            x: -self.x,
            y: -self.y,
            z: -self.z,
        }
    }
}

/// Implements the vector dot product.
impl<T> Mul<Vector3<T>> for Vector3<T>
where
    T: Mul<T, Output = T> + Add<T, Output = T>,
{
    type Output = T;

    /// Calculates the inner product, also known as dot product.
    #[inline]
    fn mul(self, rhs: Vector3<T>) -> Self::Output {
        (self.x * rhs.x) + (self.y * rhs.y) + (self.z * rhs.z)
    }
}

impl<T> Mul<T> for Vector3<T>
where
    T: Mul<T, Output = T> + Clone,
{
    type Output = Vector3<T>;

    #[inline]
    fn mul(self, rhs: T) -> Self::Output {
        Self {
            x: self.x * rhs.clone(),
            y: self.y * rhs.clone(),
            z: self.z * rhs,
        }
    }
}

impl<T> Add<Vector3<T>> for Vector3<T>
where
    T: Add<T, Output = T>,
{
    type Output = Vector3<T>;

    #[inline]
    fn add(self, rhs: Vector3<T>) -> Self::Output {
        Self {
            x: self.x + rhs.x,
            y: self.y + rhs.y,
            z: self.z + rhs.z,
        }
    }
}

impl<T> Sub<Vector3<T>> for Vector3<T>
where
    T: Sub<T, Output = T>,
{
    type Output = Vector3<T>;

    #[inline]
    fn sub(self, rhs: Vector3<T>) -> Self::Output {
        Self {
            x: self.x - rhs.x,
            y: self.y - rhs.y,
            z: self.z - rhs.z,
        }
    }
}

impl_component_views!(Vector3, T, 3, [x, y, z]);
