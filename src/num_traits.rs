use core::fmt::Debug;
use num_traits::Float;

/// Magnitude below which pivots, norms and diagonal terms are treated as zero.
pub trait SingularityThreshold<T> {
    /// The singularity threshold, e.g. `1e-100` for `f64`.
    const SINGULAR: T;
}

/// Default convergence tolerances of the iterative attitude estimators.
pub trait ConvergenceTolerance<T> {
    /// Step norm below which the quaternion vector-part estimator stops.
    const QUATERNION_VECTOR: T;

    /// Step norm below which the full quaternion estimator stops.
    const QUATERNION: T;
}

impl SingularityThreshold<f32> for f32 {
    const SINGULAR: f32 = 1e-30;
}

impl SingularityThreshold<f64> for f64 {
    const SINGULAR: f64 = 1e-100;
}

impl ConvergenceTolerance<f32> for f32 {
    const QUATERNION_VECTOR: f32 = 1e-4;
    const QUATERNION: f32 = 1e-5;
}

impl ConvergenceTolerance<f64> for f64 {
    const QUATERNION_VECTOR: f64 = 1e-8;
    const QUATERNION: f64 = 1e-10;
}

/// The scalar type all vectors, matrices and estimators are generic over.
///
/// Implemented for `f32` and `f64`.
pub trait Scalar:
    Float + Default + Debug + SingularityThreshold<Self> + ConvergenceTolerance<Self>
{
    /// Returns the constant `2`.
    #[inline(always)]
    fn two() -> Self {
        Self::one() + Self::one()
    }

    /// Returns the constant `1/2`.
    #[inline(always)]
    fn half() -> Self {
        Self::one() / Self::two()
    }

    /// Indicates whether the magnitude of the value is below [`SingularityThreshold::SINGULAR`].
    #[inline(always)]
    fn is_negligible(self) -> bool {
        self.abs() < Self::SINGULAR
    }
}

impl<T> Scalar for T where
    T: Float + Default + Debug + SingularityThreshold<T> + ConvergenceTolerance<T>
{
}
