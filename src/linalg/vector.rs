use crate::linalg::Matrix;
use crate::Scalar;
use core::ops::{Add, AddAssign, Index, IndexMut, Mul, Neg, Sub, SubAssign};

/// A fixed-length column vector of `N` elements.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vector<const N: usize, T> {
    data: [T; N],
}

impl<const N: usize, T> Vector<N, T> {
    /// Initializes a new [`Vector`] from its elements.
    #[inline(always)]
    pub const fn from_array(data: [T; N]) -> Self {
        Self { data }
    }

    /// Returns the number of elements.
    #[inline(always)]
    pub const fn len(&self) -> usize {
        N
    }

    /// Indicates whether the vector has no elements.
    #[inline(always)]
    pub const fn is_empty(&self) -> bool {
        N == 0
    }

    /// Returns the elements.
    #[inline(always)]
    pub const fn as_array(&self) -> &[T; N] {
        &self.data
    }

    /// Returns an iterator over the elements.
    #[inline]
    pub fn iter(&self) -> core::slice::Iter<'_, T> {
        self.data.iter()
    }

    /// Consumes the vector and returns its elements.
    #[inline(always)]
    pub fn into_array(self) -> [T; N] {
        self.data
    }
}

impl<const N: usize, T> Vector<N, T>
where
    T: Scalar,
{
    /// Returns a vector of zeros.
    #[inline]
    pub fn zeros() -> Self {
        Self {
            data: [T::zero(); N],
        }
    }

    /// Returns the `index`-th unit basis vector.
    ///
    /// ## Panics
    /// Panics if `index` is out of range.
    pub fn unit(index: usize) -> Self {
        let mut vector = Self::zeros();
        vector[index] = T::one();
        vector
    }

    /// Calculates the inner product.
    pub fn dot(&self, rhs: &Self) -> T {
        self.data
            .iter()
            .zip(rhs.data.iter())
            .fold(T::zero(), |sum, (&a, &b)| sum + a * b)
    }

    /// Calculates the squared Euclidean norm.
    #[inline]
    pub fn norm_sq(&self) -> T {
        self.dot(self)
    }

    /// Calculates the Euclidean norm.
    #[inline]
    pub fn norm(&self) -> T {
        self.norm_sq().sqrt()
    }

    /// Multiplies every element by `factor`.
    pub fn scale(&self, factor: T) -> Self {
        Self {
            data: self.data.map(|value| value * factor),
        }
    }

    /// Indicates whether all elements are finite.
    pub fn is_finite(&self) -> bool {
        self.data.iter().all(|value| value.is_finite())
    }
}

impl<const N: usize, T> Default for Vector<N, T>
where
    T: Scalar,
{
    #[inline]
    fn default() -> Self {
        Self::zeros()
    }
}

impl<const N: usize, T> From<[T; N]> for Vector<N, T> {
    #[inline]
    fn from(value: [T; N]) -> Self {
        Self::from_array(value)
    }
}

impl<const N: usize, T> From<Matrix<N, 1, T>> for Vector<N, T>
where
    T: Scalar,
{
    fn from(value: Matrix<N, 1, T>) -> Self {
        value.column(0)
    }
}

impl<const N: usize, T> From<Vector<N, T>> for Matrix<N, 1, T>
where
    T: Copy,
{
    fn from(value: Vector<N, T>) -> Self {
        Matrix::from_rows(value.data.map(|element| [element]))
    }
}

impl<const N: usize, T> Index<usize> for Vector<N, T> {
    type Output = T;

    #[inline(always)]
    fn index(&self, index: usize) -> &Self::Output {
        &self.data[index]
    }
}

impl<const N: usize, T> IndexMut<usize> for Vector<N, T> {
    #[inline(always)]
    fn index_mut(&mut self, index: usize) -> &mut Self::Output {
        &mut self.data[index]
    }
}

impl<const N: usize, T> Add for Vector<N, T>
where
    T: Scalar,
{
    type Output = Self;

    fn add(mut self, rhs: Self) -> Self::Output {
        self += rhs;
        self
    }
}

impl<const N: usize, T> AddAssign for Vector<N, T>
where
    T: Scalar,
{
    fn add_assign(&mut self, rhs: Self) {
        for (lhs, rhs) in self.data.iter_mut().zip(rhs.data) {
            *lhs = *lhs + rhs;
        }
    }
}

impl<const N: usize, T> Sub for Vector<N, T>
where
    T: Scalar,
{
    type Output = Self;

    fn sub(mut self, rhs: Self) -> Self::Output {
        self -= rhs;
        self
    }
}

impl<const N: usize, T> SubAssign for Vector<N, T>
where
    T: Scalar,
{
    fn sub_assign(&mut self, rhs: Self) {
        for (lhs, rhs) in self.data.iter_mut().zip(rhs.data) {
            *lhs = *lhs - rhs;
        }
    }
}

impl<const N: usize, T> Neg for Vector<N, T>
where
    T: Scalar,
{
    type Output = Self;

    fn neg(self) -> Self::Output {
        Self {
            data: self.data.map(|value| -value),
        }
    }
}

impl<const N: usize, T> Mul<T> for Vector<N, T>
where
    T: Scalar,
{
    type Output = Self;

    #[inline]
    fn mul(self, rhs: T) -> Self::Output {
        self.scale(rhs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_arithmetic() {
        let a = Vector::from_array([1.0_f64, 2.0, 3.0]);
        let b = Vector::from_array([4.0_f64, 5.0, 6.0]);

        assert_eq!(a + b, Vector::from_array([5.0, 7.0, 9.0]));
        assert_eq!(b - a, Vector::from_array([3.0, 3.0, 3.0]));
        assert_eq!(-a, Vector::from_array([-1.0, -2.0, -3.0]));
        assert_eq!(a * 2.0, Vector::from_array([2.0, 4.0, 6.0]));
        assert_eq!(a.dot(&b), 32.0);
    }

    #[test]
    fn test_norm() {
        let a = Vector::from_array([3.0_f64, 4.0]);
        assert_eq!(a.norm_sq(), 25.0);
        assert_relative_eq!(a.norm(), 5.0);
    }

    #[test]
    fn test_unit() {
        let e1 = Vector::<3, f32>::unit(1);
        assert_eq!(e1.into_array(), [0.0, 1.0, 0.0]);
    }

    #[test]
    #[should_panic]
    fn test_index_out_of_range() {
        let a = Vector::<2, f64>::zeros();
        let _ = a[2];
    }

    #[test]
    fn test_matrix_conversion() {
        let a = Vector::from_array([1.0_f64, 2.0]);
        let column: Matrix<2, 1, f64> = a.into();
        assert_eq!(column.get(1, 0), 2.0);
        assert_eq!(Vector::from(column), a);
    }
}
