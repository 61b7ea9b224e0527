use crate::attitude::measurement::{
    observation_jacobian, predict_observation, FullQuaternion, Parametrization, VectorPart,
};
use crate::attitude::triad::{active_sensors, triad};
use crate::attitude::{Convergence, EstimationError};
use crate::linalg::{Matrix, Vector};
use crate::{NormalEquations, Quaternion, Scalar, VectorSensor};
use core::marker::PhantomData;

/// The default iteration budget of the attitude estimators.
pub const DEFAULT_MAX_ITERATIONS: usize = 50;

/// Estimates the attitude by solving for the quaternion vector part; the
/// scalar part follows from the unit norm constraint.
pub type QuaternionVectorEstimator<T> = WlsAttitudeEstimator<3, T, VectorPart>;

/// Estimates the attitude by solving for all four quaternion components.
pub type QuaternionEstimator<T> = WlsAttitudeEstimator<4, T, FullQuaternion>;

/// An iterative weighted least-squares (Gauss-Newton) attitude estimator over
/// `P` parameters, seeded by [`triad`].
///
/// Every call owns its normal equations on the stack. An instance holds only its
/// configuration and the results of the last call, and is not meant to be shared
/// between concurrent estimations.
#[derive(Debug, Clone)]
pub struct WlsAttitudeEstimator<const P: usize, T, M> {
    max_iterations: usize,
    tolerance: T,
    attitude: Quaternion<T>,
    covariance: Option<Matrix<P, P, T>>,
    iterations: usize,
    halvings: usize,
    _parametrization: PhantomData<M>,
}

impl<const P: usize, T, M> WlsAttitudeEstimator<P, T, M>
where
    T: Scalar,
    M: Parametrization<P, T>,
{
    /// Initializes a new estimator with the default iteration budget and tolerance.
    pub fn new() -> Self {
        Self {
            max_iterations: DEFAULT_MAX_ITERATIONS,
            tolerance: M::default_tolerance(),
            attitude: Quaternion::identity(),
            covariance: None,
            iterations: 0,
            halvings: 0,
            _parametrization: PhantomData,
        }
    }

    /// Sets the maximum number of Gauss-Newton iterations.
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Sets the convergence tolerance on the update norm.
    pub fn with_tolerance(mut self, tolerance: T) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Returns the maximum number of Gauss-Newton iterations.
    #[inline]
    pub fn max_iterations(&self) -> usize {
        self.max_iterations
    }

    /// Sets the maximum number of Gauss-Newton iterations.
    #[inline]
    pub fn set_max_iterations(&mut self, max_iterations: usize) {
        self.max_iterations = max_iterations;
    }

    /// Returns the convergence tolerance on the update norm.
    #[inline]
    pub fn tolerance(&self) -> T {
        self.tolerance
    }

    /// Sets the convergence tolerance on the update norm.
    #[inline]
    pub fn set_tolerance(&mut self, tolerance: T) {
        self.tolerance = tolerance;
    }

    /// Returns the attitude estimate of the last call, or the identity before the first call.
    #[inline]
    pub fn attitude(&self) -> Quaternion<T> {
        self.attitude
    }

    /// Returns the parameter covariance of the last completed iteration.
    ///
    /// This is `None` before the first call and after a call that stopped
    /// before completing an iteration.
    #[inline]
    pub fn covariance(&self) -> Option<&Matrix<P, P, T>> {
        self.covariance.as_ref()
    }

    /// Returns the number of iterations completed by the last call.
    #[inline]
    pub fn iterations(&self) -> usize {
        self.iterations
    }

    /// Returns how often the last call halved an update that outgrew its predecessor.
    #[inline]
    pub fn step_halvings(&self) -> usize {
        self.halvings
    }

    /// Estimates the attitude from the sensors, starting from the [`triad`] solution.
    ///
    /// ## Errors
    /// Returns an [`EstimationError`] if the first directions of the two TRIAD
    /// sensors are parallel, the TRIAD rotation matrix cannot be converted, or the
    /// information matrix of an iteration is not positive definite.
    pub fn solve<S>(&mut self, sensors: &[S]) -> Result<Convergence, EstimationError>
    where
        S: VectorSensor<T>,
    {
        if !self.begin(sensors) {
            return Ok(Convergence::InsufficientData);
        }

        let Some(initial) = triad(sensors)? else {
            return Ok(Convergence::InsufficientData);
        };

        self.iterate(sensors, initial.normalized().standardized())
    }

    /// Estimates the attitude from the sensors, starting from `initial` instead of
    /// the [`triad`] solution.
    ///
    /// ## Errors
    /// Returns an [`EstimationError`] if the information matrix of an iteration
    /// is not positive definite.
    pub fn solve_from<S>(
        &mut self,
        sensors: &[S],
        initial: Quaternion<T>,
    ) -> Result<Convergence, EstimationError>
    where
        S: VectorSensor<T>,
    {
        if !self.begin(sensors) {
            return Ok(Convergence::InsufficientData);
        }

        self.iterate(sensors, initial.normalized().standardized())
    }

    /// Clears the results of the previous call and checks for sufficient data.
    fn begin<S>(&mut self, sensors: &[S]) -> bool
    where
        S: VectorSensor<T>,
    {
        self.covariance = None;
        self.iterations = 0;
        self.halvings = 0;

        let active = active_sensors(sensors);
        if active < 2 {
            log::warn!("Attitude estimation requires two sensors with measurements, got {active}");
            return false;
        }

        true
    }

    fn iterate<S>(
        &mut self,
        sensors: &[S],
        initial: Quaternion<T>,
    ) -> Result<Convergence, EstimationError>
    where
        S: VectorSensor<T>,
    {
        self.attitude = initial;
        let mut previous_step = T::infinity();

        for iteration in 1..=self.max_iterations {
            let mut equations = NormalEquations::<P, T>::new();
            self.accumulate(&mut equations, sensors);

            let mut delta = equations.solve().map_err(|error| {
                log::warn!("Aborting attitude estimation in iteration {iteration}: {error}");
                error
            })?;

            if !delta.is_finite() {
                log::warn!("Non-finite attitude update in iteration {iteration}");
                return Ok(Convergence::NotConverged);
            }

            M::project_update(&self.attitude, &mut delta);
            let step = delta.norm();
            let halvings = limit_step(&mut delta, previous_step);
            M::apply_update(&mut self.attitude, &delta);
            self.halvings += halvings;

            self.covariance = equations.covariance();
            self.iterations = iteration;
            log::debug!(
                "Iteration {iteration}: update norm {step:?}, halved {halvings} times"
            );

            if step < self.tolerance && step <= previous_step {
                return Ok(Convergence::Converged {
                    iterations: iteration,
                });
            }

            previous_step = delta.norm();
        }

        log::warn!(
            "Attitude estimate did not converge within {} iterations",
            self.max_iterations
        );
        Ok(Convergence::NotConverged)
    }

    /// Adds one weighted block per measurement at the current attitude estimate.
    fn accumulate<S>(&self, equations: &mut NormalEquations<P, T>, sensors: &[S])
    where
        S: VectorSensor<T>,
    {
        for sensor in sensors.iter().filter(|sensor| sensor.has_measurements()) {
            let orientation = sensor.orientation();
            let weight = sensor.error_sigma().weight_matrix();

            for index in 0..sensor.measurement_count() {
                let reference = sensor.reference_vector(index).normalized();
                let observed: Vector<2, T> = sensor.observed_vector(index).into();
                let predicted: Vector<2, T> =
                    predict_observation(&self.attitude, &orientation, &reference).into();
                let jacobian =
                    observation_jacobian::<P, T, M>(&self.attitude, &orientation, &reference);

                equations.accumulate_weighted(&jacobian, &weight, &(observed - predicted));
            }
        }
    }
}

impl<const P: usize, T, M> Default for WlsAttitudeEstimator<P, T, M>
where
    T: Scalar,
    M: Parametrization<P, T>,
{
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

/// Halves `delta` until its norm no longer exceeds `previous`.
///
/// Returns the number of halvings. A non-finite `delta` is left untouched.
pub fn limit_step<const P: usize, T>(delta: &mut Vector<P, T>, previous: T) -> usize
where
    T: Scalar,
{
    if !delta.is_finite() {
        return 0;
    }

    let mut halvings = 0;
    while delta.norm() > previous {
        *delta = delta.scale(T::half());
        halvings += 1;
    }
    halvings
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attitude::test_scenario::Scenario;
    use crate::{ErrorSigma, SensorObservations, SingularQuaternion, Vector3};
    use approx::assert_relative_eq;

    fn offset(truth: &Quaternion<f64>, angle: f64) -> Quaternion<f64> {
        *truth * Quaternion::from_axis_angle(&Vector3::new(0.4, 1.0, -0.3), angle)
    }

    fn assert_converged_to<const P: usize, M>(
        estimator: &WlsAttitudeEstimator<P, f64, M>,
        outcome: Convergence,
        truth: &Quaternion<f64>,
    ) where
        M: Parametrization<P, f64>,
    {
        let iterations = outcome.iterations().expect("estimate should converge");
        assert!(iterations <= 10, "took {iterations} iterations");
        assert_eq!(estimator.iterations(), iterations);
        assert!(estimator.attitude().angle_to(truth) < 1e-7);
        assert!(estimator.attitude().w >= 0.0);

        let covariance = estimator.covariance().expect("covariance should be available");
        for i in 0..P {
            assert!(covariance.get(i, i) >= 0.0);
        }
    }

    #[test]
    fn test_defaults() {
        let estimator = QuaternionVectorEstimator::<f64>::new();
        assert_eq!(estimator.max_iterations(), DEFAULT_MAX_ITERATIONS);
        assert_eq!(estimator.tolerance(), 1e-8);
        assert!(estimator.covariance().is_none());
        assert_eq!(estimator.attitude(), Quaternion::identity());
        assert_eq!(estimator.step_halvings(), 0);

        let estimator = QuaternionEstimator::<f32>::default()
            .with_max_iterations(12)
            .with_tolerance(1e-3);
        assert_eq!(estimator.max_iterations(), 12);
        assert_eq!(estimator.tolerance(), 1e-3);

        let mut estimator = QuaternionEstimator::<f64>::new();
        assert_eq!(estimator.tolerance(), 1e-10);
        estimator.set_tolerance(1e-6);
        estimator.set_max_iterations(3);
        assert_eq!(estimator.tolerance(), 1e-6);
        assert_eq!(estimator.max_iterations(), 3);
    }

    #[test]
    fn test_noise_free_convergence() {
        let truth = Scenario::default_truth();
        let scenario = Scenario::new(truth);
        let sensors = scenario.sensors();

        let mut vector_part = QuaternionVectorEstimator::new();
        let outcome = vector_part.solve(&sensors).unwrap();
        assert_converged_to(&vector_part, outcome, &truth);

        let mut full = QuaternionEstimator::new();
        let outcome = full.solve(&sensors).unwrap();
        assert_converged_to(&full, outcome, &truth);
    }

    #[test]
    fn test_convergence_from_offset_guess() {
        let truth = Scenario::default_truth();
        let scenario = Scenario::new(truth);
        let sensors = scenario.sensors();
        let initial = offset(&truth, 10f64.to_radians());

        let mut vector_part = QuaternionVectorEstimator::new();
        let outcome = vector_part.solve_from(&sensors, initial).unwrap();
        assert_converged_to(&vector_part, outcome, &truth);
        assert!(outcome.code() > 1);

        let mut full = QuaternionEstimator::new();
        let outcome = full.solve_from(&sensors, initial).unwrap();
        assert_converged_to(&full, outcome, &truth);
    }

    #[test]
    fn test_growing_updates_are_halved() {
        let truth = Scenario::default_truth();
        let scenario = Scenario::new(truth);
        let sensors = scenario.sensors();

        // From this far off the second update outgrows the first. Later updates are
        // compared against the halved norm, so the halving repeats while they shrink.
        let mut estimator = QuaternionEstimator::new();
        let outcome = estimator
            .solve_from(&sensors, offset(&truth, 80f64.to_radians()))
            .unwrap();
        assert!(outcome.is_converged());
        assert!(estimator.step_halvings() >= 3);
        assert!(estimator.attitude().angle_to(&truth) < 1e-7);

        // A nearby start never halves and the count is reset per call.
        estimator
            .solve_from(&sensors, offset(&truth, 10f64.to_radians()))
            .unwrap();
        assert_eq!(estimator.step_halvings(), 0);
    }

    #[test]
    fn test_parallel_triad_directions_are_fatal() {
        let truth = Scenario::default_truth();
        let mut scenario = Scenario::new(truth);
        scenario.duplicate_sensor(0, 1, 2.0);
        let sensors = scenario.sensors();

        let mut estimator = QuaternionEstimator::new();
        assert_eq!(
            estimator.solve(&sensors[..2]),
            Err(EstimationError::SingularQuaternion(SingularQuaternion))
        );

        // The measurements themselves still determine the attitude.
        let outcome = estimator
            .solve_from(&sensors[..2], offset(&truth, 10f64.to_radians()))
            .unwrap();
        assert!(outcome.is_converged());
        assert!(estimator.attitude().angle_to(&truth) < 1e-7);
    }

    #[test]
    fn test_noisy_observations() {
        let truth = Scenario::default_truth();
        let mut scenario = Scenario::new(truth);
        scenario.perturb_observations(1e-4);
        let sensors = scenario.sensors();

        let mut vector_part = QuaternionVectorEstimator::new();
        assert!(vector_part.solve(&sensors).unwrap().is_converged());

        let mut full = QuaternionEstimator::new();
        assert!(full.solve(&sensors).unwrap().is_converged());

        assert!(vector_part.attitude().angle_to(&full.attitude()) < 1e-3);
        assert!(vector_part.attitude().angle_to(&truth) < 1e-2);
    }

    #[test]
    fn test_exhausted_iterations() {
        let truth = Scenario::default_truth();
        let scenario = Scenario::new(truth);
        let sensors = scenario.sensors();

        let mut estimator = QuaternionEstimator::new().with_max_iterations(1);
        let outcome = estimator
            .solve_from(&sensors, offset(&truth, 10f64.to_radians()))
            .unwrap();
        assert_eq!(outcome, Convergence::NotConverged);
        assert_eq!(outcome.code(), Convergence::NOT_CONVERGED);
        assert_eq!(estimator.iterations(), 1);
        assert!(estimator.covariance().is_some());
    }

    #[test]
    fn test_insufficient_data() {
        let truth = Scenario::default_truth();
        let scenario = Scenario::new(truth);
        let sensors = scenario.sensors();
        let empty = SensorObservations::empty(Quaternion::identity(), ErrorSigma::new(1.0, 1.0));

        let mut estimator = QuaternionVectorEstimator::new();
        let none: [SensorObservations<'_, f64>; 0] = [];
        assert_eq!(estimator.solve(&none), Ok(Convergence::InsufficientData));
        assert_eq!(
            estimator.solve(&[empty, sensors[0], empty]),
            Ok(Convergence::InsufficientData)
        );
        assert_eq!(
            estimator.solve_from(&[sensors[1]], truth),
            Ok(Convergence::InsufficientData)
        );
        assert_eq!(estimator.iterations(), 0);
        assert_eq!(
            Convergence::InsufficientData.code(),
            Convergence::INSUFFICIENT_DATA
        );
    }

    #[test]
    fn test_singular_information_is_fatal() {
        let truth = Scenario::default_truth();
        let mut scenario = Scenario::new(truth);
        scenario.set_sigmas(ErrorSigma::new(f64::INFINITY, f64::INFINITY));
        let sensors = scenario.sensors();

        let mut estimator = QuaternionVectorEstimator::new();
        assert_eq!(
            estimator.solve(&sensors),
            Err(EstimationError::Matrix(
                crate::linalg::MatrixError::NotPositiveDefinite
            ))
        );
        assert!(estimator.covariance().is_none());
    }

    #[test]
    fn test_unweighted_fallback_matches_equal_weights() {
        let truth = Scenario::default_truth();
        let mut scenario = Scenario::new(truth);
        scenario.perturb_observations(1e-4);

        scenario.set_sigmas(ErrorSigma::new(0.0, 1e-3));
        let mut unweighted = QuaternionEstimator::new();
        unweighted.solve(&scenario.sensors()).unwrap();

        scenario.set_sigmas(ErrorSigma::new(1e-3, 1e-3));
        let mut weighted = QuaternionEstimator::new();
        weighted.solve(&scenario.sensors()).unwrap();

        assert!(unweighted.attitude().angle_to(&weighted.attitude()) < 1e-8);

        let scaled = weighted.covariance().unwrap().get(0, 0) / 1e-6;
        assert_relative_eq!(scaled, unweighted.covariance().unwrap().get(0, 0), max_relative = 1e-6);
    }

    #[test]
    fn test_limit_step() {
        let mut delta = Vector::from_array([3.0, 4.0]);
        assert_eq!(limit_step(&mut delta, f64::INFINITY), 0);
        assert_eq!(delta, Vector::from_array([3.0, 4.0]));

        assert_eq!(limit_step(&mut delta, 1.5), 2);
        assert_eq!(delta, Vector::from_array([0.75, 1.0]));

        let mut non_finite = Vector::from_array([f64::NAN, 1.0]);
        assert_eq!(limit_step(&mut non_finite, 1.0), 0);
    }

    #[test]
    fn test_limit_step_prevents_growth() {
        // Raw updates that grow fourfold every iteration are held to the first norm.
        let mut previous = f64::INFINITY;
        for raw in [1.0, 4.0, 16.0, 64.0] {
            let mut delta = Vector::from_array([0.0, raw, 0.0]);
            limit_step(&mut delta, previous);
            assert!(delta.norm() <= previous);
            assert!(delta.norm() <= 1.0);
            previous = delta.norm();
        }
    }
}
