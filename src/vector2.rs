use crate::impl_component_views;
use crate::linalg::Vector;
use crate::{Scalar, Vector3};
use core::fmt::{Debug, Formatter};
use core::ops::{Add, Mul, Sub};
use uniform_array_derive::UniformArray;

/// A two-dimensional vector, e.g. the `x` and `y` components of an observed
/// unit pointing vector in a sensor frame.
#[derive(UniformArray)]
#[cfg_attr(test, ensure_uniform_type::ensure_uniform_type)]
#[repr(C)]
pub struct Vector2<T> {
    pub x: T,
    pub y: T,
}

impl<T> Vector2<T> {
    /// Initializes a new [`Vector2`] instance.
    #[inline(always)]
    pub const fn new(x: T, y: T) -> Self {
        Self { x, y }
    }

    /// Calculates the squared vector length.
    #[inline(always)]
    pub fn norm_sq(&self) -> T
    where
        T: Clone + Mul<T, Output = T> + Add<T, Output = T>,
    {
        (self.x.clone() * self.x.clone()) + (self.y.clone() * self.y.clone())
    }

    /// Calculates the vector length, i.e. its norm.
    #[inline(always)]
    pub fn norm(&self) -> T
    where
        T: Scalar,
    {
        self.norm_sq().sqrt()
    }

    /// Completes the `x` and `y` components of a unit vector with the
    /// non-negative `z` component, i.e. `z = sqrt(1 - x² - y²)`.
    ///
    /// Components describing a vector longer than one yield `z = 0`.
    pub fn to_unit_vector(&self) -> Vector3<T>
    where
        T: Scalar,
    {
        let z_sq = T::one() - self.norm_sq();
        Vector3::new(self.x, self.y, z_sq.max(T::zero()).sqrt())
    }
}

impl<T> Default for Vector2<T>
where
    T: Default,
{
    #[inline]
    fn default() -> Self {
        Self::new(Default::default(), Default::default())
    }
}

impl<T> Clone for Vector2<T>
where
    T: Clone,
{
    fn clone(&self) -> Self {
        Self {
            x: self.x.clone(),
            y: self.y.clone(),
        }
    }
}

impl<T> Debug for Vector2<T>
where
    T: Debug,
{
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        f.debug_tuple("Vector2")
            .field(&self.x)
            .field(&self.y)
            .finish()
    }
}

impl<T> PartialEq for Vector2<T>
where
    T: PartialEq,
{
    fn eq(&self, other: &Self) -> bool {
        self.x == other.x && self.y == other.y
    }
}

impl<T> Sub<Vector2<T>> for Vector2<T>
where
    T: Sub<T, Output = T>,
{
    type Output = Vector2<T>;

    #[inline]
    fn sub(self, rhs: Vector2<T>) -> Self::Output {
        Self {
            x: self.x - rhs.x,
            y: self.y - rhs.y,
        }
    }
}

impl<T> From<Vector2<T>> for Vector<2, T> {
    #[inline]
    fn from(value: Vector2<T>) -> Self {
        Vector::from_array([value.x, value.y])
    }
}

impl<T> From<Vector<2, T>> for Vector2<T>
where
    T: Copy,
{
    #[inline]
    fn from(value: Vector<2, T>) -> Self {
        Self::new(value[0], value[1])
    }
}

impl_component_views!(Vector2, T, 2, [x, y]);

#[cfg(test)]
mod test {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_index() {
        let vec = Vector2::<f32>::new(1.0, 2.0);
        assert_eq!(vec[0], 1.0);
        assert_eq!(vec[1], 2.0);
    }

    #[test]
    fn test_unit_vector_completion() {
        let vec = Vector2::new(0.6_f64, 0.0).to_unit_vector();
        assert_relative_eq!(vec.z, 0.8);
        assert_relative_eq!(vec.norm(), 1.0);
    }

    #[test]
    fn test_unit_vector_completion_clamps() {
        let vec = Vector2::new(1.0_f64, 1.0).to_unit_vector();
        assert_eq!(vec.z, 0.0);
    }
}
