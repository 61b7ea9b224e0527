//! Small dense linear algebra on stack-allocated, const-sized storage.
//!
//! Matrices and vectors carry their shape in the type, so operand mismatches
//! are rejected at compile time. The square-matrix decompositions ([`Lu`],
//! [`Cholesky`]) and the thin [`Qr`] factorization own their factors: once
//! obtained, a decomposition cannot go stale when the source matrix changes.

mod cholesky;
mod error;
mod lu;
mod matrix;
mod qr;
mod vector;

pub use cholesky::Cholesky;
pub use error::MatrixError;
pub use lu::Lu;
pub use matrix::Matrix;
pub use qr::Qr;
pub use vector::Vector;
