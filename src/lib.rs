//! Attitude determination from unit-vector observations.
//!
//! Estimates the orientation of a body, as a unit [`Quaternion`], from the
//! directions reported by several [`VectorSensor`]s (e.g. sun sensors or star
//! trackers). A closed-form [TRIAD](attitude::triad) solution seeds an iterative
//! weighted least-squares estimator, which accumulates its
//! [`NormalEquations`] one measurement at a time and reports the parameter
//! covariance on completion.
//!
//! The [`linalg`] module provides the const-sized matrices, vectors and
//! decompositions the estimators are built on.

// Enable no_std mode.
#![cfg_attr(not(feature = "std"), no_std)]
// Ensure allow(unsafe_code) / forbid(unsafe_code) markers.
#![cfg_attr(feature = "unsafe", allow(unsafe_code))]
#![cfg_attr(not(feature = "unsafe"), forbid(unsafe_code))]
// Only enables the `doc_cfg` feature when the `docsrs` configuration attribute is defined.
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod attitude;
mod error_sigma;
mod euler_angles;
pub mod linalg;
mod macros;
mod normal_equations;
mod num_traits;
mod quaternion;
mod sensor;
mod vector2;
mod vector3;

pub use crate::attitude::{
    triad, Convergence, EstimationError, QuaternionEstimator, QuaternionVectorEstimator,
    WlsAttitudeEstimator,
};
pub use crate::error_sigma::ErrorSigma;
pub use crate::euler_angles::EulerAngles;
pub use crate::normal_equations::NormalEquations;
pub use crate::num_traits::*;
pub use crate::quaternion::{Quaternion, SingularQuaternion};
pub use crate::sensor::{SensorObservations, VectorSensor};
pub use crate::vector2::Vector2;
pub use crate::vector3::Vector3;
