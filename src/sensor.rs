use crate::{ErrorSigma, Quaternion, Scalar, Vector2, Vector3};

/// A source of unit-vector pointing observations, e.g. a sun sensor or star tracker.
///
/// Each measurement pairs a known reference direction, expressed in the
/// master (reference) frame, with the observed direction as seen by the sensor.
/// The observed direction is reported by its `x` and `y` components; the `z`
/// component points along the boresight and is reconstructed from the unit norm.
pub trait VectorSensor<T> {
    /// Returns the number of measurements currently available.
    fn measurement_count(&self) -> usize;

    /// Returns the reference direction of measurement `index`, in the master frame.
    ///
    /// ## Panics
    /// Implementations may panic if `index` is not below [`measurement_count`](Self::measurement_count).
    fn reference_vector(&self, index: usize) -> Vector3<T>;

    /// Returns the observed direction of measurement `index`, in the sensor frame.
    ///
    /// ## Panics
    /// Implementations may panic if `index` is not below [`measurement_count`](Self::measurement_count).
    fn observed_vector(&self, index: usize) -> Vector2<T>;

    /// Returns the fixed orientation of the sensor frame relative to the body frame.
    fn orientation(&self) -> Quaternion<T>;

    /// Returns the per-axis random error of the observed components.
    fn error_sigma(&self) -> ErrorSigma<T>;

    /// Indicates whether the sensor has at least one measurement.
    #[inline]
    fn has_measurements(&self) -> bool {
        self.measurement_count() > 0
    }
}

impl<T, S> VectorSensor<T> for &S
where
    S: VectorSensor<T> + ?Sized,
{
    #[inline]
    fn measurement_count(&self) -> usize {
        (**self).measurement_count()
    }

    #[inline]
    fn reference_vector(&self, index: usize) -> Vector3<T> {
        (**self).reference_vector(index)
    }

    #[inline]
    fn observed_vector(&self, index: usize) -> Vector2<T> {
        (**self).observed_vector(index)
    }

    #[inline]
    fn orientation(&self) -> Quaternion<T> {
        (**self).orientation()
    }

    #[inline]
    fn error_sigma(&self) -> ErrorSigma<T> {
        (**self).error_sigma()
    }
}

/// A [`VectorSensor`] borrowing its reference and observed vectors from caller-owned slices.
#[derive(Debug, Clone, Copy)]
pub struct SensorObservations<'a, T> {
    references: &'a [Vector3<T>],
    observations: &'a [Vector2<T>],
    orientation: Quaternion<T>,
    error_sigma: ErrorSigma<T>,
}

impl<'a, T> SensorObservations<'a, T> {
    /// Initializes a new [`SensorObservations`] instance.
    ///
    /// ## Arguments
    /// * `references` - The reference directions in the master frame.
    /// * `observations` - The observed directions in the sensor frame, one per reference.
    /// * `orientation` - The orientation of the sensor frame relative to the body frame.
    /// * `error_sigma` - The per-axis random error of the observations.
    ///
    /// ## Panics
    /// Panics if the slices differ in length.
    pub fn new(
        references: &'a [Vector3<T>],
        observations: &'a [Vector2<T>],
        orientation: Quaternion<T>,
        error_sigma: ErrorSigma<T>,
    ) -> Self {
        assert_eq!(
            references.len(),
            observations.len(),
            "every reference vector requires exactly one observation"
        );
        Self {
            references,
            observations,
            orientation,
            error_sigma,
        }
    }

    /// Builds a sensor without measurements.
    pub fn empty(orientation: Quaternion<T>, error_sigma: ErrorSigma<T>) -> Self {
        Self {
            references: &[],
            observations: &[],
            orientation,
            error_sigma,
        }
    }
}

impl<'a, T> VectorSensor<T> for SensorObservations<'a, T>
where
    T: Scalar,
{
    #[inline]
    fn measurement_count(&self) -> usize {
        self.references.len()
    }

    #[inline]
    fn reference_vector(&self, index: usize) -> Vector3<T> {
        self.references[index]
    }

    #[inline]
    fn observed_vector(&self, index: usize) -> Vector2<T> {
        self.observations[index]
    }

    #[inline]
    fn orientation(&self) -> Quaternion<T> {
        self.orientation
    }

    #[inline]
    fn error_sigma(&self) -> ErrorSigma<T> {
        self.error_sigma
    }
}
