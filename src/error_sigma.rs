use crate::impl_component_views;
use crate::linalg::Matrix;
use crate::Scalar;
use core::fmt::{Debug, Formatter};
use core::ops::Mul;
use uniform_array_derive::UniformArray;

/// The per-axis random error (one sigma) of a two-component pointing measurement.
#[derive(UniformArray)]
#[cfg_attr(test, ensure_uniform_type::ensure_uniform_type)]
#[repr(C)]
pub struct ErrorSigma<T> {
    /// The standard deviation of the `x` component.
    pub x: T,
    /// The standard deviation of the `y` component.
    pub y: T,
}

impl<T> ErrorSigma<T> {
    /// Initializes a new [`ErrorSigma`] instance.
    #[inline(always)]
    pub const fn new(x: T, y: T) -> Self {
        Self { x, y }
    }

    /// Returns the squared magnitude `σx² + σy²`, used to rank sensors by quality.
    #[inline]
    pub fn magnitude_sq(&self) -> T
    where
        T: Scalar,
    {
        self.x * self.x + self.y * self.y
    }

    /// Indicates whether both sigmas are strictly positive.
    #[inline]
    pub fn is_valid(&self) -> bool
    where
        T: Scalar,
    {
        self.x > T::zero() && self.y > T::zero()
    }

    /// Builds the diagonal weighting matrix `diag(1/σx², 1/σy²)`.
    ///
    /// If either sigma is not strictly positive the measurement is treated as
    /// unweighted on both axes and the identity is returned.
    // Either both axes are weighted or neither; a single valid sigma is not used on its own.
    pub fn weight_matrix(&self) -> Matrix<2, 2, T>
    where
        T: Scalar,
    {
        if self.is_valid() {
            Matrix::from_diagonal([
                (self.x * self.x).recip(),
                (self.y * self.y).recip(),
            ])
        } else {
            Matrix::identity()
        }
    }
}

impl<T> Default for ErrorSigma<T>
where
    T: Default,
{
    #[inline]
    fn default() -> Self {
        Self::new(Default::default(), Default::default())
    }
}

impl<T> Clone for ErrorSigma<T>
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

impl<T> Debug for ErrorSigma<T>
where
    T: Debug,
{
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        f.debug_tuple("ErrorSigma")
            .field(&self.x)
            .field(&self.y)
            .finish()
    }
}

impl<T> Mul<T> for ErrorSigma<T>
where
    T: Mul<T, Output = T> + Clone,
{
    type Output = ErrorSigma<T>;

    fn mul(self, rhs: T) -> Self::Output {
        Self {
            x: self.x * rhs.clone(),
            y: self.y * rhs,
        }
    }
}

impl_component_views!(ErrorSigma, T, 2, [x, y]);
