//! Attitude determination from unit-vector observations.
//!
//! [`triad`] provides a closed-form attitude from two sensors. The
//! [`WlsAttitudeEstimator`] refines it by Gauss-Newton iteration over all
//! measurements of all sensors, either over the quaternion vector part
//! ([`QuaternionVectorEstimator`]) or over the full quaternion
//! ([`QuaternionEstimator`]).
//!
//! The attitude `q` relates master-frame reference directions `r` to body-frame
//! directions by `q.frame_rotate(r)`. A sensor with orientation `s` then observes
//! `s.frame_rotate(q.frame_rotate(r))`.

mod error;
mod measurement;
#[cfg(test)]
mod test_scenario;
mod triad;
mod wls;

pub use error::{Convergence, EstimationError};
pub use measurement::{
    observation_jacobian, predict_observation, FullQuaternion, Parametrization, VectorPart,
};
pub use triad::triad;
pub use wls::{
    limit_step, QuaternionEstimator, QuaternionVectorEstimator, WlsAttitudeEstimator,
    DEFAULT_MAX_ITERATIONS,
};
